use crate::impl_generation::{
    generate_constructor, generate_document_impl, generate_lifecycle_impl,
};
use crate::parsing::{parse_document_attributes, parse_field_attributes, FIELD_MARKERS};
use proc_macro::TokenStream;
use quote::quote;
use syn::parse::Parser;
use syn::{parse_macro_input, Data, DeriveInput, Field, Fields, Result};

pub fn document_attribute(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);

    match expand_document(attr.into(), input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand_document(
    attr: proc_macro2::TokenStream,
    mut input: DeriveInput,
) -> Result<proc_macro2::TokenStream> {
    let document_info = parse_document_attributes(attr)?;
    let field_info = parse_field_attributes(&input)?;

    let name = input.ident.clone();
    let document_impl = generate_document_impl(&name, &document_info, &field_info);
    let lifecycle_impl = generate_lifecycle_impl(&name);
    let constructor = generate_constructor(&name, &field_info);

    add_lifecycle_field(&mut input)?;

    Ok(quote! {
        #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
        #input
        #document_impl
        #lifecycle_impl
        #constructor
    })
}

/// Drop the marker attributes and append the flattened lifecycle flags
fn add_lifecycle_field(input: &mut DeriveInput) -> Result<()> {
    let Data::Struct(data) = &mut input.data else {
        return Ok(());
    };
    let Fields::Named(fields) = &mut data.fields else {
        return Ok(());
    };

    for field in fields.named.iter_mut() {
        field
            .attrs
            .retain(|attr| !FIELD_MARKERS.iter().any(|marker| attr.path().is_ident(marker)));
    }

    let lifecycle = Field::parse_named.parse2(quote! {
        #[serde(flatten)]
        pub lifecycle: document_store::LifecycleFlags
    })?;
    fields.named.push(lifecycle);

    Ok(())
}
