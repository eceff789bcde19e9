//! A small text template language with the double brace syntax:
//! `{{ .Field }}`, pipelines with `|`, variables, `if`, `range` and `with`.
mod data;
mod exec;
mod funcs;
mod parse;

pub use data::*;
pub use funcs::*;

use crate::Result;
use exec::State;
use parse::{Node, Parser};

/// A parsed template, reusable across renders.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    nodes: Vec<Node>,
}

impl Template {
    /// Function names are resolved against `funcs` at parse time.
    pub fn parse(name: impl Into<String>, text: &str, funcs: &FuncMap) -> Result<Self> {
        let name = name.into();
        let nodes = Parser::new(&name, text, funcs).parse()?;
        Ok(Self { name, nodes })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Missing keys evaluate to nil and print as nothing.
    pub fn execute(&self, data: &Data, funcs: &FuncMap) -> Result<String> {
        let mut state = State::new(&self.name, funcs, data);
        state.walk(data, &self.nodes)?;
        Ok(state.finish())
    }
}
