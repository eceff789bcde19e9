use crate::{FieldMetadata, decode_field, decode_tags};
use syn::ItemStruct;

pub(crate) struct StructMetadata {
    pub(crate) name: String,
    pub(crate) tag: String,
    pub(crate) fields: Vec<FieldMetadata>,
}

pub(crate) fn decode_struct(item: &ItemStruct) -> StructMetadata {
    StructMetadata {
        name: item.ident.to_string(),
        tag: decode_tags(&item.attrs).to_string(),
        fields: item.fields.iter().filter_map(decode_field).collect(),
    }
}
