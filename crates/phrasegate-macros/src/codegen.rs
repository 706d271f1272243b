//! Code generation for the `Parameters` derive macro.

use proc_macro2::TokenStream;
use quote::quote;

use crate::ir::ParametersIR;

/// Generate all code for the derive macro.
pub fn generate(ir: &ParametersIR) -> TokenStream {
    let inherent_impl = generate_inherent_impl(ir);
    let collision_check = generate_collision_check(ir);
    let parameters_impl = generate_parameters_impl(ir);

    quote! {
        #inherent_impl
        #collision_check
        #parameters_impl
    }
}

/// Generate the id constants and `assign_ids()`.
fn generate_inherent_impl(ir: &ParametersIR) -> TokenStream {
    let struct_name = &ir.struct_name;
    let (impl_generics, ty_generics, where_clause) = ir.generics.split_for_impl();

    let const_defs: Vec<TokenStream> = ir
        .fields
        .iter()
        .map(|parameter| {
            let const_name = parameter.const_name();
            let hash = parameter.hash_id;
            let doc = format!("Host-facing id of the `{}` parameter.", parameter.string_id);
            quote! {
                #[doc = #doc]
                pub const #const_name: ::phrasegate::core::types::ParameterId = #hash;
            }
        })
        .collect();

    let assignments: Vec<TokenStream> = ir
        .fields
        .iter()
        .map(|parameter| {
            let field = &parameter.field_name;
            let const_name = parameter.const_name();
            quote! {
                self.#field.set_id(Self::#const_name);
            }
        })
        .collect();

    quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#const_defs)*

            /// Store the hashed id of every parameter in its metadata.
            ///
            /// Call once after construction, typically at the end of `Default`.
            pub fn assign_ids(&mut self) {
                #(#assignments)*
            }
        }
    }
}

/// Generate compile-time collision detection.
fn generate_collision_check(ir: &ParametersIR) -> TokenStream {
    if ir.parameter_count() < 2 {
        return quote! {};
    }

    let id_pairs: Vec<TokenStream> = ir
        .fields
        .iter()
        .map(|parameter| {
            let id_str = &parameter.string_id;
            let hash = parameter.hash_id;
            quote! { (#id_str, #hash) }
        })
        .collect();

    let struct_name = &ir.struct_name;

    quote! {
        const _: () = {
            const IDS: &[(&str, u32)] = &[#(#id_pairs),*];

            let mut i = 0;
            while i < IDS.len() {
                let mut j = i + 1;
                while j < IDS.len() {
                    if IDS[i].1 == IDS[j].1 {
                        panic!(concat!(
                            "Parameter ID hash collision in ",
                            stringify!(#struct_name),
                            ": two IDs hash to the same value"
                        ));
                    }
                    j += 1;
                }
                i += 1;
            }
        };
    }
}

/// Generate the `Parameters` trait implementation.
fn generate_parameters_impl(ir: &ParametersIR) -> TokenStream {
    let struct_name = &ir.struct_name;
    let (impl_generics, ty_generics, where_clause) = ir.generics.split_for_impl();
    let count = ir.parameter_count();

    let refs: Vec<TokenStream> = ir
        .fields
        .iter()
        .map(|parameter| {
            let field = &parameter.field_name;
            quote! { &self.#field as &dyn ::phrasegate::core::parameter_types::ParameterRef }
        })
        .collect();

    let match_arms: Vec<TokenStream> = ir
        .fields
        .iter()
        .map(|parameter| {
            let field = &parameter.field_name;
            let const_name = parameter.const_name();
            quote! {
                Self::#const_name => Some(&self.#field),
            }
        })
        .collect();

    quote! {
        impl #impl_generics ::phrasegate::core::parameter_types::Parameters for #struct_name #ty_generics #where_clause {
            fn count(&self) -> usize {
                #count
            }

            fn iter(&self) -> Box<dyn Iterator<Item = &dyn ::phrasegate::core::parameter_types::ParameterRef> + '_> {
                Box::new([#(#refs),*].into_iter())
            }

            fn by_id(&self, id: ::phrasegate::core::types::ParameterId) -> Option<&dyn ::phrasegate::core::parameter_types::ParameterRef> {
                match id {
                    #(#match_arms)*
                    _ => None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;
    use syn::parse_quote;

    fn expand(input: syn::DeriveInput) -> String {
        generate(&parse(input).unwrap()).to_string()
    }

    #[test]
    fn emits_id_constants_and_trait_impl() {
        let code = expand(parse_quote! {
            struct GateParameters {
                #[parameter(id = "channel")]
                channel: IntParameter,
            }
        });

        assert!(code.contains("PARAMETER_CHANNEL_ID"));
        assert!(code.contains("fn assign_ids"));
        assert!(code.contains("Parameters for GateParameters"));
        // A single parameter cannot collide
        assert!(!code.contains("hash collision"));
    }

    #[test]
    fn emits_collision_check_for_several_parameters() {
        let code = expand(parse_quote! {
            struct GateParameters {
                #[parameter(id = "channel")]
                channel: IntParameter,
                #[parameter(id = "phraseBeats")]
                phrase_beats: IntParameter,
            }
        });

        assert!(code.contains("hash collision"));
        assert!(code.contains("PARAMETER_PHRASE_BEATS_ID"));
    }
}
