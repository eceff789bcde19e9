pub use tagsql_core::*;
pub use tagsql_macros::*;
