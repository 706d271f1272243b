//! Semantic validation for the `Parameters` derive macro.

use std::collections::HashMap;

use crate::ir::ParametersIR;

/// Validate the IR for semantic correctness.
pub fn validate(ir: &ParametersIR) -> syn::Result<()> {
    check_unique_string_ids(ir)?;
    check_no_hash_collisions(ir)?;
    Ok(())
}

/// Check that all string IDs are unique.
fn check_unique_string_ids(ir: &ParametersIR) -> syn::Result<()> {
    let mut seen: HashMap<&str, &syn::Ident> = HashMap::new();

    for parameter in &ir.fields {
        if let Some(first_field) = seen.get(parameter.string_id.as_str()) {
            return Err(syn::Error::new(
                parameter.span,
                format!(
                    "Duplicate parameter id \"{}\": already used by field `{}`",
                    parameter.string_id, first_field
                ),
            ));
        }
        seen.insert(&parameter.string_id, &parameter.field_name);
    }

    Ok(())
}

/// Check that no two parameter IDs hash to the same value.
fn check_no_hash_collisions(ir: &ParametersIR) -> syn::Result<()> {
    let mut seen: HashMap<u32, &str> = HashMap::new();

    for parameter in &ir.fields {
        if let Some(first_id) = seen.get(&parameter.hash_id) {
            return Err(syn::Error::new(
                parameter.span,
                format!(
                    "Parameter ID hash collision: \"{}\" and \"{}\" both hash to 0x{:08x}. \
                     Rename one of these parameters to avoid the collision.",
                    parameter.string_id, first_id, parameter.hash_id
                ),
            ));
        }
        seen.insert(parameter.hash_id, &parameter.string_id);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ParameterFieldIR;
    use proc_macro2::Span;

    fn field(name: &str, id: &str, hash_id: u32) -> ParameterFieldIR {
        ParameterFieldIR {
            field_name: syn::Ident::new(name, Span::call_site()),
            string_id: id.to_string(),
            hash_id,
            span: Span::call_site(),
        }
    }

    fn ir(fields: Vec<ParameterFieldIR>) -> ParametersIR {
        ParametersIR {
            struct_name: syn::Ident::new("GateParameters", Span::call_site()),
            generics: syn::Generics::default(),
            fields,
        }
    }

    #[test]
    fn accepts_distinct_ids() {
        let ir = ir(vec![field("channel", "channel", 1), field("beats", "phraseBeats", 2)]);
        assert!(validate(&ir).is_ok());
    }

    #[test]
    fn rejects_duplicate_string_id() {
        let ir = ir(vec![field("a", "channel", 1), field("b", "channel", 1)]);
        let err = validate(&ir).unwrap_err();
        assert!(err.to_string().contains("Duplicate parameter id \"channel\""));
    }

    #[test]
    fn rejects_hash_collision() {
        let ir = ir(vec![field("a", "first", 7), field("b", "second", 7)]);
        let err = validate(&ir).unwrap_err();
        assert!(err.to_string().contains("0x00000007"));
    }
}
