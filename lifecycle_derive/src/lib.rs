//! Procedural macro turning a plain struct into a soft-deletable document
//!
//! The `#[document]` attribute adds the lifecycle flags to the struct, derives serde and
//! implements `Document` and `Lifecycle` for it.

use proc_macro::TokenStream;

mod document_macro;
mod impl_generation;
mod parsing;

/// Attribute macro that makes a struct a soft-deletable document
///
/// Usage:
/// ```rust,ignore
/// use softkeep::prelude::*;
///
/// #[document(collection = "accounts")]
/// pub struct Account {
///     #[primary_key]
///     pub id: Uuid,
///     #[index]
///     pub email: String,
///     pub plan: String,
/// }
///
/// let account = Account::new(Uuid::new_v4(), "a@example.com".into(), "pro".into());
/// assert!(account.lifecycle.is_active);
/// ```
///
/// The struct gets a `lifecycle: LifecycleFlags` field (serialized as the top-level
/// `is_deleted`, `deleted_at` and `is_active` keys), `Debug`, `Clone`, `Serialize`,
/// `Deserialize`, and a `new` constructor taking the declared fields in order.
/// Do not derive those traits again on the struct.
///
/// Field attributes:
/// - `#[primary_key]`: exactly one field, used as the document id
/// - `#[index]`: adds an expression index on the key to `create_indexes_sql()`
#[proc_macro_attribute]
pub fn document(attr: TokenStream, item: TokenStream) -> TokenStream {
    document_macro::document_attribute(attr, item)
}
