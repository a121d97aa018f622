mod document;

use proc_macro::TokenStream;

// ============================================================================
// #[derive(Document)] derive macro
// ============================================================================

/// Derive macro for the `Document` trait.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Document)]
/// #[document(collection = "profiles")]
/// struct UserProfile {
///     #[document(id)]
///     pub user_id: String,
///     pub name: String,
/// }
/// ```
///
/// - `#[document(collection = "...")]` sets the collection name.
///   If omitted, defaults to the struct name lower-cased (`UserProfile` -> `userprofile`).
/// - `#[document(id)]` marks the field used as the unique identifier and the
///   stored key id lookups filter on. If omitted, defaults to a field named `id`.
///   Serde renames on that field are not followed.
#[proc_macro_derive(Document, attributes(document))]
pub fn derive_document(input: TokenStream) -> TokenStream {
    document::derive_document(input)
}
