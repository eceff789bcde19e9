use crate::Kind;
use thiserror::Error;

/// Typed failures raised by the engine.
///
/// They travel inside [`crate::Error`] and can be recovered with
/// `error.downcast_ref::<MetaError>()`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetaError {
    #[error("invalid value: {0}")]
    InvalidValue(String),
    #[error("`{type_name}` is a {kind:?}, not a struct or a collection of structs")]
    NotAStruct { kind: Kind, type_name: String },
    #[error("template `{name}` {line}:{column}: {message}")]
    TemplateSyntax {
        name: String,
        line: usize,
        column: usize,
        message: String,
    },
    #[error("lists to zip have different lengths: {0:?}")]
    LengthMismatch(Vec<usize>),
    #[error("`{0}` has no children")]
    NoChildren(String),
    #[error("`{type_name}` has no child `{key}`")]
    NoSuchChild { type_name: String, key: String },
    #[error("`{0}` is not a collection")]
    NotACollection(String),
    #[error("error calling `{name}`: {message}")]
    Function { name: String, message: String },
}
