//! Intermediate representation for the `Parameters` derive macro.

use proc_macro2::Span;

/// A parsed parameter struct, ready for validation and code generation.
pub struct ParametersIR {
    /// The struct name (e.g., `GateParameters`)
    pub struct_name: syn::Ident,
    /// Generic parameters, if any
    pub generics: syn::Generics,
    /// The `#[parameter]` fields, in declaration order
    pub fields: Vec<ParameterFieldIR>,
}

/// A single `#[parameter(id = "...")]` field.
pub struct ParameterFieldIR {
    /// Field name (e.g., `phrase_beats`)
    pub field_name: syn::Ident,
    /// String id from the attribute (e.g., `phraseBeats`)
    pub string_id: String,
    /// FNV-1a hash of the string id
    pub hash_id: u32,
    /// Span for error reporting
    pub span: Span,
}

impl ParametersIR {
    /// Number of parameter fields.
    pub fn parameter_count(&self) -> usize {
        self.fields.len()
    }
}

impl ParameterFieldIR {
    /// Name of the generated id constant.
    ///
    /// E.g., `phrase_beats` -> `PARAMETER_PHRASE_BEATS_ID`
    pub fn const_name(&self) -> syn::Ident {
        let name = self.field_name.to_string().to_uppercase();
        syn::Ident::new(&format!("PARAMETER_{}_ID", name), self.span)
    }
}
