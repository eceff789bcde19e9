use tagsql_core::{TypeMap, TypeMaps};

/// Column type used for anything the type map does not know.
pub const FALLBACK_TYPE: &str = "text";

/// Rust type names to Postgres column types, and back.
pub fn postgres_type_map() -> TypeMap {
    TypeMap::new()
        .with("String", "text")
        .with("str", "text")
        .with("char", "text")
        .with("bool", "boolean")
        .with("i16", "smallint")
        .with("i8", "smallint")
        .with("u8", "smallint")
        .with("i32", "integer")
        .with("u16", "integer")
        .with("i64", "bigint")
        .with("u32", "bigint")
        .with("isize", "bigint")
        .with("Decimal", "numeric")
        .with("u64", "numeric")
        .with("usize", "numeric")
        .with("i128", "numeric")
        .with("u128", "numeric")
        .with("f32", "float4")
        .with("f64", "float8")
        .with("Date", "date")
        .with("Time", "time without time zone")
        .with("PrimitiveDateTime", "timestamp without time zone")
        .with("OffsetDateTime", "timestamp with time zone")
        .with("Uuid", "uuid")
        .with("Vec<u8>", "bytea")
        .with_from("varchar", "String")
        .with_from("real", "f32")
        .with_from("double precision", "f64")
        .with_from("timestamp", "PrimitiveDateTime")
        .with_from("timestamptz", "OffsetDateTime")
}

/// Every type map shipped by this crate, keyed by system name.
pub fn type_maps() -> TypeMaps {
    TypeMaps::new().with("postgres", postgres_type_map())
}
