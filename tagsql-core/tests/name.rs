#[cfg(test)]
mod tests {
    use tagsql_core::{Name, identifier, join_namespace};

    #[test]
    fn name_display() {
        assert_eq!(Name::new(["public"], "orders").to_string(), "public.orders");
        assert_eq!(Name::new(["a"], "").to_string(), "a");
        assert_eq!(Name::new(Vec::<String>::new(), "orders").to_string(), "orders");
        let name = Name::parse("crm..public.Orders", ".");
        assert_eq!(name.namespace, ["crm", "public"]);
        assert_eq!(name.name, "Orders");
        assert_eq!(name.identifier(), "crm.public.orders");
    }

    #[test]
    fn join_skips_empty_parts() {
        assert_eq!(join_namespace(["", "a", "", "b", ""], "::"), "a::b");
        assert_eq!(join_namespace(Vec::<&str>::new(), "."), "");
        assert_eq!(identifier(&["Metrics", ""], "Readings", "."), "metrics.readings");
    }
}
