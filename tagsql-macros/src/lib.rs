mod decode_field;
mod decode_struct;
mod decode_tags;

use decode_field::*;
use decode_struct::*;
use decode_tags::*;
use proc_macro::TokenStream;
use quote::quote;
use syn::{GenericParam, ItemStruct, parse_macro_input, parse_quote};

/// Implements `Reflect` for a struct. Only visible fields are introspected,
/// each one annotated by its `#[tag(...)]` attributes:
///
/// ```ignore
/// #[derive(Reflect)]
/// #[tag(table = "things")]
/// pub struct Thing {
///     #[tag(db = "id_hash", primarykey)]
///     pub id: String,
///     #[tag = "db:\"-\""]
///     pub cache: Vec<u8>,
/// }
/// ```
#[proc_macro_derive(Reflect, attributes(tag))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let mut item: ItemStruct = parse_macro_input!(input as ItemStruct);
    let metadata = decode_struct(&item);
    let ident = &item.ident;
    let name = &metadata.name;
    let tag = &metadata.tag;
    let type_params: Vec<_> = item
        .generics
        .type_params()
        .map(|p| p.ident.clone())
        .collect();
    for param in item.generics.params.iter_mut() {
        if let GenericParam::Type(param) = param {
            param.bounds.push(parse_quote!(::tagsql::Reflect));
        }
    }
    let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();
    let type_name: proc_macro2::TokenStream = if type_params.is_empty() {
        quote!(::std::borrow::Cow::Borrowed(#name))
    } else {
        quote! {
            ::std::borrow::Cow::Owned(format!(
                "{}<{}>",
                #name,
                [#(<#type_params as ::tagsql::Reflect>::type_name()),*].join(", ")
            ))
        }
    };
    let names: Vec<_> = metadata.fields.iter().map(|f| &f.name).collect();
    let tags: Vec<_> = metadata.fields.iter().map(|f| &f.tag).collect();
    let idents = metadata.fields.iter().map(|f| &f.ident);
    let types = metadata.fields.iter().map(|f| &f.ty);
    quote! {
        impl #impl_generics ::tagsql::Reflect for #ident #ty_generics #where_clause {
            fn type_name() -> ::std::borrow::Cow<'static, str> {
                #type_name
            }

            fn reflect(&self) -> ::tagsql::Value {
                ::tagsql::Value::structure(
                    <Self as ::tagsql::Reflect>::type_name(),
                    #tag,
                    vec![#(::tagsql::Member::new(
                        #names,
                        #tags,
                        ::tagsql::Reflect::reflect(&self.#idents),
                    )),*],
                )
            }

            fn reflect_type() -> ::tagsql::Value {
                ::tagsql::Value::structure(
                    <Self as ::tagsql::Reflect>::type_name(),
                    #tag,
                    vec![#(::tagsql::Member::deferred(
                        #names,
                        #tags,
                        <#types as ::tagsql::Reflect>::reflect_type,
                    )),*],
                )
            }
        }
    }
    .into()
}
