mod dialect;
mod templates;
mod type_map;

pub use dialect::*;
pub use templates::*;
pub use type_map::*;
