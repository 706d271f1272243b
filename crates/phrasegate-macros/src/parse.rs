//! AST parsing for the `Parameters` derive macro.
//!
//! Transforms `syn::DeriveInput` into [`ParametersIR`].

use syn::{Data, DeriveInput, Field, Fields};

use crate::ir::{ParameterFieldIR, ParametersIR};
use phrasegate_utils::fnv1a_32;

/// Field types the derive knows how to expose.
const SUPPORTED_TYPES: &[&str] = &["IntParameter"];

/// Parse a `DeriveInput` into our intermediate representation.
pub fn parse(input: DeriveInput) -> syn::Result<ParametersIR> {
    let data_struct = match &input.data {
        Data::Struct(s) => s,
        Data::Enum(_) => {
            return Err(syn::Error::new_spanned(
                &input,
                "#[derive(Parameters)] only supports structs, not enums",
            ))
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                &input,
                "#[derive(Parameters)] only supports structs, not unions",
            ))
        }
    };

    let fields = match &data_struct.fields {
        Fields::Named(named) => &named.named,
        Fields::Unnamed(_) => {
            return Err(syn::Error::new_spanned(
                &input,
                "#[derive(Parameters)] only supports structs with named fields",
            ))
        }
        Fields::Unit => {
            return Err(syn::Error::new_spanned(
                &input,
                "#[derive(Parameters)] requires at least one field",
            ))
        }
    };

    let mut parsed_fields = Vec::new();
    for field in fields {
        if let Some(field_ir) = parse_field(field)? {
            parsed_fields.push(field_ir);
        }
        // Fields without #[parameter] are left alone
    }

    if parsed_fields.is_empty() {
        return Err(syn::Error::new_spanned(
            &input,
            "#[derive(Parameters)] requires at least one #[parameter] field",
        ));
    }

    Ok(ParametersIR {
        struct_name: input.ident.clone(),
        generics: input.generics.clone(),
        fields: parsed_fields,
    })
}

/// Parse a single field, returning None if it carries no `#[parameter]`.
fn parse_field(field: &Field) -> syn::Result<Option<ParameterFieldIR>> {
    if let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("parameter")) {
        return parse_parameter_field(field, attr).map(Some);
    }

    // A parameter type without the attribute would silently vanish from the host
    if let Some(type_name) = extract_type_name(&field.ty) {
        if SUPPORTED_TYPES.contains(&type_name.as_str()) {
            return Err(syn::Error::new_spanned(
                field,
                format!("{} field is missing #[parameter(id = \"...\")] attribute", type_name),
            ));
        }
    }

    Ok(None)
}

/// Parse a field with a `#[parameter(id = "...")]` attribute.
fn parse_parameter_field(field: &Field, attr: &syn::Attribute) -> syn::Result<ParameterFieldIR> {
    let field_name = field
        .ident
        .clone()
        .ok_or_else(|| syn::Error::new_spanned(field, "Field must have a name"))?;

    let mut string_id: Option<String> = None;

    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("id") {
            let value: syn::LitStr = meta.value()?.parse()?;
            string_id = Some(value.value());
            Ok(())
        } else {
            Err(meta.error("unknown attribute. Expected: id"))
        }
    })?;

    let string_id = string_id.ok_or_else(|| {
        syn::Error::new_spanned(
            attr,
            format!(
                "#[parameter] on field `{}` requires id attribute: #[parameter(id = \"...\")]",
                field_name
            ),
        )
    })?;

    let supported = extract_type_name(&field.ty)
        .is_some_and(|name| SUPPORTED_TYPES.contains(&name.as_str()));
    if !supported {
        return Err(syn::Error::new_spanned(
            &field.ty,
            "#[parameter] can only be used on IntParameter fields",
        ));
    }

    let hash_id = fnv1a_32(&string_id);

    Ok(ParameterFieldIR {
        field_name,
        string_id,
        hash_id,
        span: attr.path().segments[0].ident.span(),
    })
}

/// Last path segment of a type (e.g., `IntParameter` from `core::IntParameter`).
fn extract_type_name(ty: &syn::Type) -> Option<String> {
    if let syn::Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return Some(segment.ident.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn parses_parameter_fields_in_order() {
        let input: DeriveInput = parse_quote! {
            struct GateParameters {
                #[parameter(id = "channel")]
                channel: IntParameter,
                #[parameter(id = "phraseBeats")]
                phrase_beats: phrasegate::core::IntParameter,
                scratch: u32,
            }
        };

        let ir = parse(input).unwrap();
        assert_eq!(ir.struct_name, "GateParameters");
        assert_eq!(ir.parameter_count(), 2);
        assert_eq!(ir.fields[0].string_id, "channel");
        assert_eq!(ir.fields[0].hash_id, fnv1a_32("channel"));
        assert_eq!(ir.fields[1].field_name, "phrase_beats");
        assert_eq!(ir.fields[1].const_name(), "PARAMETER_PHRASE_BEATS_ID");
    }

    #[test]
    fn rejects_parameter_without_attribute() {
        let input: DeriveInput = parse_quote! {
            struct GateParameters {
                #[parameter(id = "channel")]
                channel: IntParameter,
                phrase_beats: IntParameter,
            }
        };
        let err = parse(input).err().unwrap();
        assert!(err.to_string().contains("missing #[parameter"));
    }

    #[test]
    fn rejects_missing_id_and_unknown_keys() {
        let missing: DeriveInput = parse_quote! {
            struct P {
                #[parameter()]
                channel: IntParameter,
            }
        };
        assert!(parse(missing).err().unwrap().to_string().contains("requires id"));

        let unknown: DeriveInput = parse_quote! {
            struct P {
                #[parameter(id = "channel", range = 1)]
                channel: IntParameter,
            }
        };
        assert!(parse(unknown).is_err());
    }

    #[test]
    fn rejects_unsupported_shapes() {
        let wrong_type: DeriveInput = parse_quote! {
            struct P {
                #[parameter(id = "gain")]
                gain: f32,
            }
        };
        assert!(parse(wrong_type).is_err());

        let tuple: DeriveInput = parse_quote! { struct P(IntParameter); };
        assert!(parse(tuple).is_err());

        let empty: DeriveInput = parse_quote! { struct P { scratch: u32 } };
        assert!(parse(empty).is_err());
    }
}
