use super::{
    Data, FuncMap,
    parse::{Assign, Node, Operand, Pipeline},
};
use crate::{MetaError, Result};
use anyhow::Context;
use std::fmt::Write;

/// Execution state of one render: variables in scope and the output.
pub(crate) struct State<'a> {
    name: &'a str,
    funcs: &'a FuncMap,
    variables: Vec<(String, Data)>,
    out: String,
}

impl<'a> State<'a> {
    pub(crate) fn new(name: &'a str, funcs: &'a FuncMap, root: &Data) -> Self {
        Self {
            name,
            funcs,
            variables: vec![("$".into(), root.clone())],
            out: String::new(),
        }
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }

    pub(crate) fn walk(&mut self, dot: &Data, nodes: &[Node]) -> Result<()> {
        for node in nodes {
            match node {
                Node::Text(text) => self.out.push_str(text),
                Node::Output(pipeline) => {
                    let value = self.pipeline(dot, pipeline)?;
                    if pipeline.assign.is_none() {
                        let _ = write!(self.out, "{}", value);
                    }
                }
                Node::If {
                    branches,
                    otherwise,
                } => {
                    let mark = self.variables.len();
                    let mut taken = false;
                    for (condition, body) in branches {
                        if self.pipeline(dot, condition)?.truth() {
                            self.block(dot, body)?;
                            taken = true;
                            break;
                        }
                    }
                    if !taken {
                        self.block(dot, otherwise)?;
                    }
                    self.variables.truncate(mark);
                }
                Node::With {
                    pipeline,
                    body,
                    otherwise,
                } => {
                    let mark = self.variables.len();
                    let value = self.pipeline(dot, pipeline)?;
                    if value.truth() {
                        self.block(&value, body)?;
                    } else {
                        self.block(dot, otherwise)?;
                    }
                    self.variables.truncate(mark);
                }
                Node::Range {
                    variables,
                    pipeline,
                    body,
                    otherwise,
                } => {
                    let mark = self.variables.len();
                    let value = self.pipeline(dot, pipeline)?;
                    let entries = self.entries(value)?;
                    if entries.is_empty() {
                        self.block(dot, otherwise)?;
                    }
                    for (key, item) in entries {
                        let scope = self.variables.len();
                        match variables.as_slice() {
                            [element] => self.variables.push((element.clone(), item.clone())),
                            [index, element] => {
                                self.variables.push((index.clone(), key));
                                self.variables.push((element.clone(), item.clone()));
                            }
                            _ => {}
                        }
                        self.block(&item, body)?;
                        self.variables.truncate(scope);
                    }
                    self.variables.truncate(mark);
                }
            }
        }
        Ok(())
    }

    fn block(&mut self, dot: &Data, nodes: &[Node]) -> Result<()> {
        let mark = self.variables.len();
        self.walk(dot, nodes)?;
        self.variables.truncate(mark);
        Ok(())
    }

    /// Key and element pairs a range iterates over.
    fn entries(&self, value: Data) -> Result<Vec<(Data, Data)>> {
        Ok(match value {
            Data::Nil => Vec::new(),
            Data::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.into(), v))
                .collect(),
            Data::Map(entries) => entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            Data::Int(n) => (0..n.max(0)).map(|i| (i.into(), i.into())).collect(),
            v => {
                return Err(MetaError::Function {
                    name: "range".into(),
                    message: format!("template `{}`: cannot range over {}", self.name, v.type_name()),
                }
                .into());
            }
        })
    }

    fn pipeline(&mut self, dot: &Data, pipeline: &Pipeline) -> Result<Data> {
        let mut value = None;
        for command in &pipeline.commands {
            value = Some(self.command(dot, command, value)?);
        }
        let value = value.unwrap_or_default();
        match &pipeline.assign {
            Some(Assign::Declare(name)) => self.variables.push((name.clone(), value.clone())),
            Some(Assign::Set(name)) => {
                if let Some((_, slot)) = self.variables.iter_mut().rev().find(|(k, _)| k == name) {
                    *slot = value.clone();
                }
            }
            None => {}
        }
        Ok(value)
    }

    /// The piped value, if any, becomes the last argument of a function.
    fn command(&mut self, dot: &Data, command: &[Operand], piped: Option<Data>) -> Result<Data> {
        match command.first() {
            Some(Operand::Function(name)) => {
                let mut args = command[1..]
                    .iter()
                    .map(|v| self.operand(dot, v))
                    .collect::<Result<Vec<_>>>()?;
                args.extend(piped);
                self.call(name, &args)
            }
            Some(operand) => self.operand(dot, operand),
            None => Ok(Data::Nil),
        }
    }

    fn operand(&mut self, dot: &Data, operand: &Operand) -> Result<Data> {
        Ok(match operand {
            Operand::Function(name) => self.call(name, &[])?,
            Operand::Field(path) => dot.path(path),
            Operand::Variable(name, path) => self
                .variables
                .iter()
                .rev()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.path(path))
                .unwrap_or_default(),
            Operand::Literal(value) => value.clone(),
            Operand::Pipeline(pipeline) => self.pipeline(dot, pipeline)?,
        })
    }

    fn call(&self, name: &str, args: &[Data]) -> Result<Data> {
        let Some(func) = self.funcs.get(name) else {
            return Err(MetaError::Function {
                name: name.into(),
                message: "function not defined".into(),
            }
            .into());
        };
        func(args).with_context(|| format!("template `{}`: error calling `{}`", self.name, name))
    }
}
