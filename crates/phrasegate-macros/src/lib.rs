//! Derive macros for the phrasegate plugin crates.
//!
//! This crate provides `#[derive(Parameters)]`, which implements the
//! `Parameters` trait for a struct of `IntParameter` fields, and
//! `#[derive(HasParameters)]`, which wires a plugin or processor to the
//! field holding its parameters.
//!
//! # Example
//!
//! ```ignore
//! use phrasegate::prelude::*;
//!
//! #[derive(Parameters)]
//! pub struct GateParameters {
//!     #[parameter(id = "channel")]
//!     pub channel: IntParameter,
//! }
//!
//! impl Default for GateParameters {
//!     fn default() -> Self {
//!         let mut parameters = Self {
//!             channel: IntParameter::new("Channel", 1, 1..=16),
//!         };
//!         parameters.assign_ids();
//!         parameters
//!     }
//! }
//! ```

use proc_macro::TokenStream;

mod codegen;
mod has_parameters;
mod ir;
mod parse;
mod validate;

/// Derive macro for implementing the `Parameters` trait.
///
/// This macro generates:
/// - One `PARAMETER_<FIELD>_ID` constant per parameter (FNV-1a hash of its id)
/// - An `assign_ids()` method that stores those ids in the parameters
/// - The `Parameters` trait implementation (count, iter, by_id)
/// - Compile-time hash collision detection
///
/// # Attributes
///
/// - `#[parameter(id = "...")]` - Required on every `IntParameter` field.
///   The string id is hashed to the numeric id hosts address the parameter by.
#[proc_macro_derive(Parameters, attributes(parameter))]
pub fn derive_parameters(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);

    match derive_parameters_impl(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn derive_parameters_impl(input: syn::DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let ir = parse::parse(input)?;
    validate::validate(&ir)?;
    Ok(codegen::generate(&ir))
}

/// Derive macro for implementing the `HasParameters` trait.
///
/// Exactly one field must be marked with `#[parameters]`.
///
/// ```ignore
/// #[derive(Default, HasParameters)]
/// pub struct GatePlugin {
///     #[parameters]
///     parameters: GateParameters,
/// }
/// ```
#[proc_macro_derive(HasParameters, attributes(parameters))]
pub fn derive_has_parameters(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);

    match has_parameters::derive_has_parameters_impl(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
