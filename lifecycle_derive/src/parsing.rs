//! Parsing utilities for the `#[document]` attribute and its struct
//!
//! Collection and field names are checked here with the same rules the store applies at
//! runtime, so a bad name fails the build instead of the first query.

use proc_macro2::Span;
use syn::ext::IdentExt;
use syn::parse::Parser;
use syn::{Attribute, Data, DeriveInput, Error, Fields, Ident, LitStr, Result, Type};

/// Field attributes consumed by the macro and removed from the output
pub const FIELD_MARKERS: [&str; 2] = ["primary_key", "index"];

/// Names owned by the lifecycle layer
const RESERVED_FIELDS: [&str; 4] = ["lifecycle", "is_deleted", "deleted_at", "is_active"];

/// Validate collection name and return syn::Error for better proc macro error handling
pub fn validate_collection_name_syn(name: &str, span: Span) -> Result<()> {
    validate_identifier(name)
        .and_then(|()| {
            if is_reserved_keyword(name) {
                Err(format!("Name '{}' is a reserved SQL keyword", name))
            } else {
                Ok(())
            }
        })
        .map_err(|e| Error::new(span, format!("Invalid collection name '{}': {}", name, e)))
}

/// Validate field name and return syn::Error for better proc macro error handling
pub fn validate_field_name_syn(name: &str, span: Span) -> Result<()> {
    if RESERVED_FIELDS.contains(&name) {
        return Err(Error::new(
            span,
            format!(
                "Field '{}' is added by #[document]: the lifecycle flags are managed for you",
                name
            ),
        ));
    }

    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid field name '{}': {}", name, e)))
}

/// Same rules as the store's runtime validation
fn validate_identifier(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    // PostgreSQL limit
    if name.len() > 63 {
        return Err(format!(
            "Name '{}' is too long: {} characters (max 63)",
            name,
            name.len()
        ));
    }

    let first_char = name
        .chars()
        .next()
        .ok_or_else(|| "Name cannot be empty".to_string())?;
    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(format!(
            "Name '{}' must start with a letter or underscore",
            name
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("Name '{}' contains invalid characters: only alphanumeric characters and underscores are allowed", name));
    }

    Ok(())
}

/// Keep in sync with `ValidatedCollectionName` in document-store
fn is_reserved_keyword(name: &str) -> bool {
    const RESERVED_KEYWORDS: &[&str] = &[
        "SELECT", "INSERT", "UPDATE", "DELETE", "FROM", "WHERE", "JOIN", "INNER", "LEFT",
        "RIGHT", "FULL", "OUTER", "ON", "AS", "AND", "OR", "NOT", "NULL", "TRUE", "FALSE",
        "CASE", "WHEN", "THEN", "ELSE", "END", "IF", "EXISTS", "IN", "LIKE", "BETWEEN",
        "ORDER", "BY", "GROUP", "HAVING", "LIMIT", "OFFSET", "UNION", "ALL", "DISTINCT",
        "CREATE", "DROP", "ALTER", "TABLE", "INDEX", "VIEW", "DATABASE", "SCHEMA",
        "PRIMARY", "KEY", "FOREIGN", "REFERENCES", "UNIQUE", "CHECK", "DEFAULT",
        "CONSTRAINT", "COLUMN", "USER", "RETURNING", "CONFLICT", "EXCLUDED", "TRIGGER",
        "FUNCTION",
    ];

    RESERVED_KEYWORDS.contains(&name.to_ascii_uppercase().as_str())
}

#[derive(Debug)]
pub struct DocumentInfo {
    pub collection: String,
}

#[derive(Debug)]
pub struct DocumentField {
    pub ident: Ident,
    pub ty: Type,
}

#[derive(Debug)]
pub struct FieldInfo {
    pub primary_key: DocumentField,
    /// Declared fields in order, primary key included
    pub fields: Vec<DocumentField>,
    /// Keys marked with #[index]
    pub indexed_fields: Vec<String>,
}

/// Parse `collection = "..."` from the attribute arguments
pub fn parse_document_attributes(args: proc_macro2::TokenStream) -> Result<DocumentInfo> {
    let mut collection: Option<LitStr> = None;

    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("collection") {
            collection = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported document option, expected `collection = \"...\"`"))
        }
    });
    parser.parse2(args)?;

    let collection = collection.ok_or_else(|| {
        Error::new(
            Span::call_site(),
            "collection is required: use #[document(collection = \"collection_name\")]",
        )
    })?;

    validate_collection_name_syn(&collection.value(), collection.span())?;

    Ok(DocumentInfo {
        collection: collection.value(),
    })
}

pub fn parse_field_attributes(input: &DeriveInput) -> Result<FieldInfo> {
    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "#[document] structs cannot be generic",
        ));
    }

    let fields_named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields_named) => fields_named,
            _ => {
                return Err(Error::new_spanned(
                    &input.ident,
                    "#[document] requires a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new_spanned(
                &input.ident,
                "#[document] can only be used on structs",
            ))
        }
    };

    let mut primary_key = None;
    let mut fields = Vec::new();
    let mut indexed_fields = Vec::new();

    for field in &fields_named.named {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new_spanned(field, "Field must have a name"))?;
        // serde stores `r#type` under `type`
        let key = ident.unraw().to_string();
        validate_field_name_syn(&key, ident.span())?;

        if has_attribute(&field.attrs, "primary_key") {
            if primary_key.is_some() {
                return Err(Error::new_spanned(
                    ident,
                    "only one field can be marked #[primary_key]",
                ));
            }
            primary_key = Some(DocumentField {
                ident: ident.clone(),
                ty: field.ty.clone(),
            });
        }

        if has_attribute(&field.attrs, "index") {
            indexed_fields.push(key);
        }

        fields.push(DocumentField {
            ident: ident.clone(),
            ty: field.ty.clone(),
        });
    }

    let primary_key = primary_key.ok_or_else(|| {
        Error::new_spanned(
            &input.ident,
            "a #[primary_key] field is required: mark the document id field",
        )
    })?;

    Ok(FieldInfo {
        primary_key,
        fields,
        indexed_fields,
    })
}

pub fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
