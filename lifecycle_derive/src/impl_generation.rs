//! Trait implementations emitted for a `#[document]` struct
//!
//! Generated paths go through `document_store::`, which `softkeep::prelude` re-exports.

use crate::parsing::{DocumentInfo, FieldInfo};
use quote::quote;
use syn::Ident;

pub fn generate_document_impl(
    name: &Ident,
    document_info: &DocumentInfo,
    field_info: &FieldInfo,
) -> proc_macro2::TokenStream {
    let collection = &document_info.collection;
    let pk_ident = &field_info.primary_key.ident;
    let pk_type = &field_info.primary_key.ty;
    let pk_name = syn::ext::IdentExt::unraw(pk_ident).to_string();
    let indexed_fields = &field_info.indexed_fields;

    quote! {
        impl document_store::Document for #name {
            type Id = #pk_type;

            fn collection_name() -> &'static str {
                #collection
            }

            fn primary_key_field() -> &'static str {
                #pk_name
            }

            fn document_id(&self) -> Self::Id {
                ::std::clone::Clone::clone(&self.#pk_ident)
            }

            fn create_indexes_sql() -> Vec<String> {
                let mut indexes = vec![document_store::lifecycle::lifecycle_index_sql(#collection)];
                #(
                    indexes.push(document_store::query_builder::SqlGenerator::field_index_sql(
                        #collection,
                        #indexed_fields,
                    ));
                )*
                indexes
            }
        }
    }
}

pub fn generate_lifecycle_impl(name: &Ident) -> proc_macro2::TokenStream {
    quote! {
        impl document_store::Lifecycle for #name {
            fn lifecycle(&self) -> &document_store::LifecycleFlags {
                &self.lifecycle
            }

            fn lifecycle_mut(&mut self) -> &mut document_store::LifecycleFlags {
                &mut self.lifecycle
            }
        }
    }
}

/// `new` taking the declared fields; the flags start at their defaults
pub fn generate_constructor(name: &Ident, field_info: &FieldInfo) -> proc_macro2::TokenStream {
    let params = field_info.fields.iter().map(|field| {
        let ident = &field.ident;
        let ty = &field.ty;
        quote! { #ident: #ty }
    });
    let idents = field_info.fields.iter().map(|field| &field.ident);

    quote! {
        impl #name {
            #[allow(clippy::too_many_arguments)]
            pub fn new(#(#params),*) -> Self {
                Self {
                    #(#idents,)*
                    lifecycle: document_store::LifecycleFlags::default(),
                }
            }
        }
    }
}
