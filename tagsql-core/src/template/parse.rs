use super::{Data, FuncMap};
use crate::{Error, MetaError, Result, consume_while};

#[derive(Debug, Clone)]
pub(crate) enum Node {
    Text(String),
    Output(Pipeline),
    If {
        branches: Vec<(Pipeline, Vec<Node>)>,
        otherwise: Vec<Node>,
    },
    Range {
        variables: Vec<String>,
        pipeline: Pipeline,
        body: Vec<Node>,
        otherwise: Vec<Node>,
    },
    With {
        pipeline: Pipeline,
        body: Vec<Node>,
        otherwise: Vec<Node>,
    },
}

#[derive(Debug, Clone)]
pub(crate) enum Assign {
    Declare(String),
    Set(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Pipeline {
    pub(crate) assign: Option<Assign>,
    pub(crate) commands: Vec<Command>,
}

/// A function call or a single operand.
pub(crate) type Command = Vec<Operand>;

#[derive(Debug, Clone)]
pub(crate) enum Operand {
    Function(String),
    /// `.A.B`, empty for the dot itself.
    Field(Vec<String>),
    Variable(String, Vec<String>),
    Literal(Data),
    Pipeline(Box<Pipeline>),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Field(Vec<String>),
    Variable(String, Vec<String>),
    Literal(Data),
    LeftParen,
    RightParen,
    Pipe,
    Declare,
    Assign,
    Comma,
}

type Tokens = Vec<(Token, usize)>;

#[derive(Debug, Clone, Copy)]
enum Item<'a> {
    Text(&'a str),
    Action { content: &'a str, offset: usize },
}

enum Stop {
    End(usize),
    Else(usize),
    ElseIf(Tokens, usize),
    Eof,
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn is_ident(c: &char) -> bool {
    c.is_alphanumeric() || *c == '_'
}

/// Index of the closing `}}`, ignoring the ones inside quotes and comments.
fn find_close(content: &str) -> Option<usize> {
    let mut chars = content.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                while let Some((_, c)) = chars.next() {
                    match c {
                        '\\' => {
                            chars.next();
                        }
                        '"' => break,
                        _ => {}
                    }
                }
            }
            '`' => {
                for (_, c) in chars.by_ref() {
                    if c == '`' {
                        break;
                    }
                }
            }
            '/' if content[i..].starts_with("/*") => {
                let end = content[i + 2..].find("*/")?;
                while chars.peek().is_some_and(|(j, _)| *j < i + 2 + end + 2) {
                    chars.next();
                }
            }
            '}' if content[i..].starts_with("}}") => return Some(i),
            _ => {}
        }
    }
    None
}

pub(crate) struct Parser<'a> {
    name: &'a str,
    source: &'a str,
    funcs: &'a FuncMap,
    items: Vec<Item<'a>>,
    index: usize,
    variables: Vec<String>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(name: &'a str, source: &'a str, funcs: &'a FuncMap) -> Self {
        Self {
            name,
            source,
            funcs,
            items: Vec::new(),
            index: 0,
            variables: vec!["$".into()],
        }
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> Error {
        let before = &self.source[..offset.min(self.source.len())];
        let line = before.matches('\n').count() + 1;
        let column = before[before.rfind('\n').map(|i| i + 1).unwrap_or(0)..]
            .chars()
            .count()
            + 1;
        MetaError::TemplateSyntax {
            name: self.name.to_string(),
            line,
            column,
            message: message.into(),
        }
        .into()
    }

    pub(crate) fn parse(mut self) -> Result<Vec<Node>> {
        self.split()?;
        let (nodes, stop) = self.list()?;
        match stop {
            Stop::Eof => Ok(nodes),
            Stop::End(offset) => Err(self.error(offset, "unexpected {{end}}")),
            Stop::Else(offset) | Stop::ElseIf(_, offset) => {
                Err(self.error(offset, "unexpected {{else}}"))
            }
        }
    }

    /// Splits the source into text and actions, applying the trim markers.
    fn split(&mut self) -> Result<()> {
        let source = self.source;
        let mut offset = 0;
        let mut trim_next = false;
        while offset < source.len() {
            let rest = &source[offset..];
            let Some(open) = rest.find("{{") else {
                self.push_text(rest, trim_next, false);
                break;
            };
            let mut start = offset + open + 2;
            let trim_before = source[start..].starts_with('-')
                && source[start + 1..].starts_with(is_space);
            if trim_before {
                start += 2;
            }
            self.push_text(&rest[..open], trim_next, trim_before);
            let Some(close) = find_close(&source[start..]) else {
                return Err(self.error(offset + open, "unclosed action"));
            };
            let mut content = &source[start..start + close];
            trim_next = content.ends_with('-')
                && content[..content.len() - 1].ends_with(is_space);
            if trim_next {
                content = &content[..content.len() - 2];
            }
            let trimmed = content.trim_matches(is_space);
            if !(trimmed.starts_with("/*") && trimmed.ends_with("*/")) {
                self.items.push(Item::Action {
                    content,
                    offset: start,
                });
            }
            offset = start + close + 2;
        }
        Ok(())
    }

    fn push_text(&mut self, mut text: &'a str, trim_start: bool, trim_end: bool) {
        if trim_start {
            text = text.trim_start_matches(is_space);
        }
        if trim_end {
            text = text.trim_end_matches(is_space);
        }
        if !text.is_empty() {
            self.items.push(Item::Text(text));
        }
    }

    fn list(&mut self) -> Result<(Vec<Node>, Stop)> {
        let mut nodes = Vec::new();
        while let Some(item) = self.items.get(self.index).copied() {
            self.index += 1;
            let (content, offset) = match item {
                Item::Text(text) => {
                    nodes.push(Node::Text(text.to_string()));
                    continue;
                }
                Item::Action { content, offset } => (content, offset),
            };
            let tokens = self.tokenize(content, offset)?;
            let keyword = match tokens.first() {
                Some((Token::Ident(v), _)) => v.as_str(),
                None => return Err(self.error(offset, "missing value for command")),
                _ => "",
            };
            match keyword {
                "end" => {
                    self.expect_nothing(&tokens[1..])?;
                    return Ok((nodes, Stop::End(offset)));
                }
                "else" => {
                    if let Some((Token::Ident(v), _)) = tokens.get(1)
                        && v == "if"
                    {
                        return Ok((nodes, Stop::ElseIf(tokens[2..].to_vec(), offset)));
                    }
                    self.expect_nothing(&tokens[1..])?;
                    return Ok((nodes, Stop::Else(offset)));
                }
                "if" => nodes.push(self.parse_if(&tokens[1..], offset)?),
                "range" => nodes.push(self.parse_range(&tokens[1..], offset)?),
                "with" => nodes.push(self.parse_with(&tokens[1..], offset)?),
                _ => nodes.push(Node::Output(self.full_pipeline(&tokens, offset)?)),
            }
        }
        Ok((nodes, Stop::Eof))
    }

    fn expect_nothing(&self, tokens: &[(Token, usize)]) -> Result<()> {
        match tokens.first() {
            None => Ok(()),
            Some((token, at)) => Err(self.error(*at, format!("unexpected {:?} after keyword", token))),
        }
    }

    /// Body after `{{else}}`, up to the matching `{{end}}`.
    fn closing_block(&mut self, keyword: &str, offset: usize) -> Result<Vec<Node>> {
        let mark = self.variables.len();
        let (body, stop) = self.list()?;
        self.variables.truncate(mark);
        match stop {
            Stop::End(..) => Ok(body),
            Stop::Else(at) | Stop::ElseIf(_, at) => {
                Err(self.error(at, format!("unexpected {{{{else}}}} after {{{{else}}}} in {}", keyword)))
            }
            Stop::Eof => Err(self.error(offset, format!("missing {{{{end}}}} for {}", keyword))),
        }
    }

    fn parse_if(&mut self, tokens: &[(Token, usize)], offset: usize) -> Result<Node> {
        let mark = self.variables.len();
        let mut branches = Vec::new();
        let mut condition = self.full_pipeline(tokens, offset)?;
        let result = loop {
            let scope = self.variables.len();
            let (body, stop) = self.list()?;
            self.variables.truncate(scope);
            branches.push((condition, body));
            match stop {
                Stop::End(..) => {
                    break Node::If {
                        branches,
                        otherwise: Vec::new(),
                    };
                }
                Stop::Else(..) => {
                    let otherwise = self.closing_block("if", offset)?;
                    break Node::If {
                        branches,
                        otherwise,
                    };
                }
                Stop::ElseIf(tokens, at) => condition = self.full_pipeline(&tokens, at)?,
                Stop::Eof => return Err(self.error(offset, "missing {{end}} for if")),
            }
        };
        self.variables.truncate(mark);
        Ok(result)
    }

    fn parse_range(&mut self, tokens: &[(Token, usize)], offset: usize) -> Result<Node> {
        let mark = self.variables.len();
        let (variables, rest) = match tokens {
            [
                (Token::Variable(a, pa), _),
                (Token::Comma, _),
                (Token::Variable(b, pb), _),
                (Token::Declare, _),
                rest @ ..,
            ] if pa.is_empty() && pb.is_empty() => (vec![a.clone(), b.clone()], rest),
            [(Token::Variable(a, pa), _), (Token::Declare, _), rest @ ..] if pa.is_empty() => {
                (vec![a.clone()], rest)
            }
            _ => (Vec::new(), tokens),
        };
        let pipeline = self.full_pipeline(rest, offset)?;
        self.variables.extend(variables.iter().cloned());
        let (body, stop) = self.list()?;
        self.variables.truncate(mark);
        let otherwise = match stop {
            Stop::End(..) => Vec::new(),
            Stop::Else(..) => self.closing_block("range", offset)?,
            Stop::ElseIf(_, at) => return Err(self.error(at, "unexpected {{else if}} in range")),
            Stop::Eof => return Err(self.error(offset, "missing {{end}} for range")),
        };
        Ok(Node::Range {
            variables,
            pipeline,
            body,
            otherwise,
        })
    }

    fn parse_with(&mut self, tokens: &[(Token, usize)], offset: usize) -> Result<Node> {
        let mark = self.variables.len();
        let pipeline = self.full_pipeline(tokens, offset)?;
        let (body, stop) = self.list()?;
        self.variables.truncate(mark);
        let otherwise = match stop {
            Stop::End(..) => Vec::new(),
            Stop::Else(..) => self.closing_block("with", offset)?,
            Stop::ElseIf(_, at) => return Err(self.error(at, "unexpected {{else if}} in with")),
            Stop::Eof => return Err(self.error(offset, "missing {{end}} for with")),
        };
        Ok(Node::With {
            pipeline,
            body,
            otherwise,
        })
    }

    /// Optional `$x :=` or `$x =`, then the commands, consuming every token.
    fn full_pipeline(&mut self, tokens: &[(Token, usize)], offset: usize) -> Result<Pipeline> {
        let (assign, rest) = match tokens {
            [(Token::Variable(name, path), _), (Token::Declare, _), rest @ ..] if path.is_empty() => {
                (Some(Assign::Declare(name.clone())), rest)
            }
            [(Token::Variable(name, path), at), (Token::Assign, _), rest @ ..] if path.is_empty() => {
                if !self.variables.contains(name) {
                    return Err(self.error(*at, format!("undefined variable \"{}\"", name)));
                }
                (Some(Assign::Set(name.clone())), rest)
            }
            _ => (None, tokens),
        };
        let mut pos = 0;
        let commands = self.commands(rest, &mut pos, offset)?;
        if let Some((token, at)) = rest.get(pos) {
            return Err(self.error(*at, format!("unexpected {:?} in command", token)));
        }
        if let Some(Assign::Declare(name)) = &assign {
            self.variables.push(name.clone());
        }
        Ok(Pipeline { assign, commands })
    }

    fn commands(
        &mut self,
        tokens: &[(Token, usize)],
        pos: &mut usize,
        offset: usize,
    ) -> Result<Vec<Command>> {
        let mut commands = Vec::new();
        loop {
            let at = tokens.get(*pos).map(|(_, at)| *at).unwrap_or(offset);
            let mut command = Vec::new();
            while let Some(operand) = self.operand(tokens, pos)? {
                command.push(operand);
            }
            match command.first() {
                None => return Err(self.error(at, "missing value for command")),
                Some(Operand::Function(..)) => {}
                Some(..) if command.len() > 1 => {
                    return Err(self.error(at, "cannot give arguments to a non-function"));
                }
                Some(..) if !commands.is_empty() => {
                    return Err(self.error(at, "non executable command in pipeline stage"));
                }
                Some(..) => {}
            }
            commands.push(command);
            match tokens.get(*pos) {
                Some((Token::Pipe, _)) => *pos += 1,
                _ => break,
            }
        }
        Ok(commands)
    }

    fn operand(&mut self, tokens: &[(Token, usize)], pos: &mut usize) -> Result<Option<Operand>> {
        let Some((token, at)) = tokens.get(*pos) else {
            return Ok(None);
        };
        let operand = match token {
            Token::Pipe | Token::RightParen => return Ok(None),
            Token::Ident(name) => match name.as_str() {
                "true" => Operand::Literal(Data::Bool(true)),
                "false" => Operand::Literal(Data::Bool(false)),
                "nil" => Operand::Literal(Data::Nil),
                _ if self.funcs.contains(name) => Operand::Function(name.clone()),
                _ => return Err(self.error(*at, format!("function \"{}\" not defined", name))),
            },
            Token::Field(path) => Operand::Field(path.clone()),
            Token::Variable(name, path) => {
                if !self.variables.contains(name) {
                    return Err(self.error(*at, format!("undefined variable \"{}\"", name)));
                }
                Operand::Variable(name.clone(), path.clone())
            }
            Token::Literal(v) => Operand::Literal(v.clone()),
            Token::LeftParen => {
                *pos += 1;
                let commands = self.commands(tokens, pos, *at)?;
                let Some((Token::RightParen, _)) = tokens.get(*pos) else {
                    return Err(self.error(*at, "unclosed left paren"));
                };
                Operand::Pipeline(Box::new(Pipeline {
                    assign: None,
                    commands,
                }))
            }
            Token::Declare | Token::Assign | Token::Comma => {
                return Err(self.error(*at, format!("unexpected {:?} in operand", token)));
            }
        };
        *pos += 1;
        Ok(Some(operand))
    }

    fn tokenize(&self, content: &str, offset: usize) -> Result<Tokens> {
        let mut tokens = Vec::new();
        let mut rest = content;
        loop {
            rest = rest.trim_start_matches(is_space);
            let Some(c) = rest.chars().next() else {
                break;
            };
            let at = offset + content.len() - rest.len();
            let token = match c {
                '(' | ')' | '|' | ',' | '=' => {
                    rest = &rest[1..];
                    match c {
                        '(' => Token::LeftParen,
                        ')' => Token::RightParen,
                        '|' => Token::Pipe,
                        ',' => Token::Comma,
                        _ => Token::Assign,
                    }
                }
                ':' if rest.starts_with(":=") => {
                    rest = &rest[2..];
                    Token::Declare
                }
                '"' => Token::Literal(Data::Str(self.quoted(&mut rest, at)?)),
                '`' => {
                    let Some(end) = rest[1..].find('`') else {
                        return Err(self.error(at, "unterminated raw quoted string"));
                    };
                    let value = rest[1..1 + end].to_string();
                    rest = &rest[end + 2..];
                    Token::Literal(Data::Str(value))
                }
                '.' if !rest[1..].starts_with(|c: char| c.is_ascii_digit()) => {
                    Token::Field(Self::field_chain(&mut rest))
                }
                '$' => {
                    rest = &rest[1..];
                    let name = format!("${}", consume_while(&mut rest, is_ident));
                    Token::Variable(name, Self::field_chain(&mut rest))
                }
                '0'..='9' | '-' | '+' | '.' => Token::Literal(self.number(&mut rest, at)?),
                c if is_ident(&c) => Token::Ident(consume_while(&mut rest, is_ident).to_string()),
                c => return Err(self.error(at, format!("unexpected character {:?} in action", c))),
            };
            tokens.push((token, at));
        }
        Ok(tokens)
    }

    /// `.A.B` segments; a lone `.` is the empty chain.
    fn field_chain(rest: &mut &str) -> Vec<String> {
        let mut path = Vec::new();
        while let Some(after) = rest.strip_prefix('.') {
            if path.is_empty() && !after.starts_with(|c: char| is_ident(&c)) {
                *rest = after;
                break;
            }
            if !after.starts_with(|c: char| is_ident(&c)) {
                break;
            }
            *rest = after;
            path.push(consume_while(rest, is_ident).to_string());
        }
        path
    }

    fn quoted(&self, rest: &mut &str, at: usize) -> Result<String> {
        let text = *rest;
        let mut value = String::new();
        let mut chars = text[1..].char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => {
                    *rest = &text[i + 2..];
                    return Ok(value);
                }
                '\\' => match chars.next() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, '0')) => value.push('\0'),
                    Some((_, c @ ('\\' | '"' | '\''))) => value.push(c),
                    Some((_, c)) => {
                        return Err(self.error(at, format!("unknown escape sequence \\{}", c)));
                    }
                    None => break,
                },
                '\n' => break,
                c => value.push(c),
            }
        }
        Err(self.error(at, "unterminated quoted string"))
    }

    fn number(&self, rest: &mut &str, at: usize) -> Result<Data> {
        let mut previous = ' ';
        let text = consume_while(rest, |c| {
            let accept = c.is_ascii_alphanumeric()
                || *c == '.'
                || *c == '_'
                || (matches!(*c, '+' | '-') && matches!(previous, ' ' | 'e' | 'E'));
            previous = *c;
            accept
        });
        let clean = text.replace('_', "");
        if let Ok(v) = clean.parse::<i64>() {
            return Ok(Data::Int(v));
        }
        if let Some(hex) = clean.strip_prefix("0x").or_else(|| clean.strip_prefix("0X"))
            && let Ok(v) = i64::from_str_radix(hex, 16)
        {
            return Ok(Data::Int(v));
        }
        match clean.parse::<f64>() {
            Ok(v) if !text.is_empty() => Ok(Data::Float(v)),
            _ => Err(self.error(at, format!("bad number syntax: {:?}", text))),
        }
    }
}
