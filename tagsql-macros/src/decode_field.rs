use crate::decode_tags;
use syn::{Field, Ident, Type, Visibility};

pub(crate) struct FieldMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    pub(crate) name: String,
    pub(crate) tag: String,
}

/// Visible named fields become members, private ones are not introspected.
pub(crate) fn decode_field(field: &Field) -> Option<FieldMetadata> {
    if matches!(field.vis, Visibility::Inherited) {
        return None;
    }
    let ident = field.ident.clone()?;
    let name = ident.to_string();
    let name = name.strip_prefix("r#").unwrap_or(&name).to_string();
    Some(FieldMetadata {
        ident,
        ty: field.ty.clone(),
        name,
        tag: decode_tags(&field.attrs).to_string(),
    })
}
