//! Common types used throughout the phrase gate.

/// Parameter identifier (FNV-1a hash of the string ID).
pub type ParameterId = u32;

/// Parameter value (normalized 0.0 to 1.0, or plain depending on context).
pub type ParameterValue = f64;

/// Absolute timeline position in samples.
///
/// Signed because some hosts report negative positions during pre-roll.
pub type SamplePosition = i64;
