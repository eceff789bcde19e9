mod column;
mod dialect;
mod error;
mod field;
mod fields;
mod name;
mod reflect;
mod structure;
mod tags;
mod template;
mod templator;
mod type_map;
mod util;
mod value;
mod value_map;

pub use ::anyhow::Context;
pub use column::*;
pub use dialect::*;
pub use error::*;
pub use field::*;
pub use fields::*;
pub use name::*;
pub use reflect::*;
pub use structure::*;
pub use tags::*;
pub use template::*;
pub use templator::*;
pub use type_map::*;
pub use util::*;
pub use value::*;
pub use value_map::*;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
