//! Derive macro for the `HasParameters` trait.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, Type};

/// Derive `HasParameters` for a struct with one `#[parameters]` field.
pub fn derive_has_parameters_impl(input: DeriveInput) -> syn::Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            Fields::Unnamed(_) | Fields::Unit => {
                return Err(syn::Error::new_spanned(
                    struct_name,
                    "HasParameters can only be derived for structs with named fields",
                ));
            }
        },
        Data::Enum(_) | Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "HasParameters can only be derived for structs",
            ));
        }
    };

    let mut parameters_field: Option<(&Ident, &Type)> = None;

    for field in fields {
        if !field.attrs.iter().any(|attr| attr.path().is_ident("parameters")) {
            continue;
        }
        if parameters_field.is_some() {
            return Err(syn::Error::new_spanned(
                field,
                "Only one field can be marked with #[parameters]",
            ));
        }
        let field_ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "Field must have a name"))?;
        parameters_field = Some((field_ident, &field.ty));
    }

    let (field_name, field_type) = parameters_field.ok_or_else(|| {
        syn::Error::new_spanned(
            struct_name,
            "No field marked with #[parameters]. Add #[parameters] to the field holding the parameters.",
        )
    })?;

    Ok(quote! {
        impl #impl_generics ::phrasegate::core::plugin::HasParameters for #struct_name #ty_generics #where_clause {
            type Parameters = #field_type;

            fn parameters(&self) -> &Self::Parameters {
                &self.#field_name
            }

            fn parameters_mut(&mut self) -> &mut Self::Parameters {
                &mut self.#field_name
            }
        }
    })
}
