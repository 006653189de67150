#![allow(unreachable_pub)]

//! # Macros
//!
//! Procedural macros shared by the packhub workspace.
//!
//! Only one macro lives here for now: [`macro@packhub_error`], which turns a plain enum
//! into a `thiserror`-backed error type with a context extension trait.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for defining crate-level error enums.
///
/// # Generated items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * A companion `<Name>Ext` trait with `.context(..)` for `Result<T, Name>`.
/// * For variants whose only fields are `source` and `context`: `From<Source>` and
///   `<Name>Ext` for `Result<T, Source>`, so `?` and `.context(..)` work on upstream errors.
///   Variants carrying extra payload (a resource name, a key) are built explicitly.
/// * `From<&'static str>` and `From<String>` when an `Internal { message, context }`
///   variant exists.
/// * A module-private `format_context` helper for the `#[error(..)]` strings.
///
/// # Requirements
///
/// 1. Applied to an enum with named-field variants only.
/// 2. `context`, when present, must be `Option<Cow<'static, str>>`.
/// 3. Variants with a `source` field must also have a `context` field.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[packhub_derive::packhub_error]
/// pub enum LoadError {
///     #[error("Read failed{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Unknown bundle{}: {bundle}", format_context(.context))]
///     UnknownBundle { bundle: String, context: Option<Cow<'static, str>> },
/// }
///
/// fn read(path: &str) -> Result<Vec<u8>, LoadError> {
///     std::fs::read(path).context("Reading the stats file")
/// }
/// ```
#[proc_macro_attribute]
pub fn packhub_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}
