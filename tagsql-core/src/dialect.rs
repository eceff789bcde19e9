use crate::{FuncMap, Templates, Templator, TemplatorConfig, TypeMap};

/// A SQL flavor: its defaults, its artifact templates and its type names.
pub trait Dialect {
    const NAME: &'static str;

    fn config(&self) -> TemplatorConfig;
    fn templates(&self) -> Templates;
    fn type_map(&self) -> TypeMap;

    /// Extra template functions of the dialect.
    fn functions(&self) -> FuncMap {
        FuncMap::new()
    }

    /// Ready to render templator, the builtin functions extended with the
    /// dialect ones.
    fn templator(&self) -> Templator {
        Templator::new(self.config(), self.templates())
            .with_type_map(self.type_map())
            .with_functions(&self.functions())
    }
}
