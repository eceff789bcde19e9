use quote::ToTokens;
use syn::{Attribute, Expr, ExprLit, Lit, LitStr, Meta, parse::ParseBuffer};
use tagsql_core::{Tag, Tags};

/// Collects every `#[tag(...)]` and `#[tag = "..."]` attribute into one annotation.
pub(crate) fn decode_tags(attrs: &[Attribute]) -> Tags {
    let mut tags = Tags::default();
    for attr in attrs.iter().filter(|a| a.meta.path().is_ident("tag")) {
        match &attr.meta {
            Meta::NameValue(meta) => {
                let Expr::Lit(ExprLit {
                    lit: Lit::Str(v), ..
                }) = &meta.value
                else {
                    panic!(
                        "Error while parsing `tag`, use it like: `#[tag = \"db:\\\"name\\\" json:\\\"-\\\"\"]`"
                    );
                };
                tags.merge(&Tags::parse(&v.value()));
            }
            Meta::List(list) => {
                let _ = list.parse_nested_meta(|arg| {
                    let Some(key) = arg.path.get_ident() else {
                        panic!(
                            "Unexpected path `{}` inside tag, keys are single identifiers",
                            arg.path.to_token_stream()
                        );
                    };
                    let key = key.to_string();
                    let key = key.strip_prefix("r#").unwrap_or(&key).to_string();
                    let tag = if arg.input.is_empty() || arg.input.peek(syn::Token![,]) {
                        Tag::new([""])
                    } else {
                        let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                            panic!(
                                "Error while parsing `{}`, use it like: `#[tag({} = \"value,option\")]`",
                                key, key
                            );
                        };
                        Tag::parse(&v.value())
                    };
                    tags.set(key, tag);
                    Ok(())
                });
            }
            Meta::Path(..) => {
                panic!("Error while parsing `tag`, use it like: `#[tag(db = \"name\", primarykey)]`");
            }
        }
    }
    tags
}
