//! Parameter types with encapsulated atomic storage.
//!
//! Parameters are written by the host or UI thread and read by the audio
//! thread without locks. Each value lives in an atomic and is read with a
//! single load, so a reader always sees one consistent value per call.
//!
//! # The `Parameters` Trait
//!
//! Use `#[derive(Parameters)]` (from the `phrasegate` facade) for automatic
//! implementation:
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
//!         Self {
//!             channel: IntParameter::new("Channel", 1, 1..=16),
//!         }
//!     }
//! }
//! ```

use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::parameter_info::{ParameterFlags, ParameterInfo};
use crate::types::{ParameterId, ParameterValue};

// =============================================================================
// ParameterRef Trait - Type-erased parameter access
// =============================================================================

/// Trait for type-erased parameter access at runtime.
///
/// All implementations must be thread-safe (`Send + Sync`) for concurrent
/// access from audio, UI, and host threads.
pub trait ParameterRef: Send + Sync {
    /// Get the parameter's unique ID.
    fn id(&self) -> ParameterId {
        self.info().id
    }

    /// Get the parameter's display name.
    fn name(&self) -> &'static str {
        self.info().name
    }

    /// Get the parameter flags.
    fn flags(&self) -> &ParameterFlags {
        &self.info().flags
    }

    /// Get the full metadata for this parameter.
    fn info(&self) -> &ParameterInfo;

    /// Get the current normalized value (0.0-1.0).
    ///
    /// This is lock-free and safe to call from the audio thread.
    fn get_normalized(&self) -> ParameterValue;

    /// Set the normalized value (0.0-1.0). Values are clamped.
    fn set_normalized(&self, value: ParameterValue);

    /// Get the current plain value in natural units.
    fn get_plain(&self) -> ParameterValue;

    /// Set the plain value in natural units.
    fn set_plain(&self, value: ParameterValue);

    /// Format a normalized value for display.
    fn display_normalized(&self, normalized: ParameterValue) -> String;

    /// Format the current value for display.
    fn display(&self) -> String {
        self.display_normalized(self.get_normalized())
    }

    /// Parse a display string to a normalized value.
    fn parse(&self, s: &str) -> Option<ParameterValue>;

    /// Convert a normalized value to a plain value.
    fn normalized_to_plain(&self, normalized: ParameterValue) -> ParameterValue;

    /// Convert a plain value to a normalized value.
    fn plain_to_normalized(&self, plain: ParameterValue) -> ParameterValue;
}

// =============================================================================
// Parameters Trait - Parameter collection
// =============================================================================

/// Trait for parameter collections.
///
/// Provides type-erased iteration and lookup for the host side.
pub trait Parameters: Send + Sync {
    /// Returns the total number of parameters.
    fn count(&self) -> usize;

    /// Iterate over all parameters (type-erased).
    fn iter(&self) -> Box<dyn Iterator<Item = &dyn ParameterRef> + '_>;

    /// Get a parameter by its ID.
    fn by_id(&self, id: ParameterId) -> Option<&dyn ParameterRef>;

    /// Get parameter info by index (0 to count-1).
    fn info(&self, index: usize) -> Option<&ParameterInfo> {
        self.iter().nth(index).map(|parameter| parameter.info())
    }

    /// Set a parameter from the host's normalized value.
    ///
    /// Returns `false` if no parameter has this ID.
    fn set_normalized(&self, id: ParameterId, value: ParameterValue) -> bool {
        match self.by_id(id) {
            Some(parameter) => {
                parameter.set_normalized(value);
                true
            }
            None => false,
        }
    }

    /// Current normalized value of a parameter, or `None` for unknown IDs.
    fn get_normalized(&self, id: ParameterId) -> Option<ParameterValue> {
        self.by_id(id).map(|parameter| parameter.get_normalized())
    }
}

/// Empty parameter collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoParameters;

impl Parameters for NoParameters {
    fn count(&self) -> usize {
        0
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn ParameterRef> + '_> {
        Box::new(std::iter::empty())
    }

    fn by_id(&self, _id: ParameterId) -> Option<&dyn ParameterRef> {
        None
    }
}

// =============================================================================
// IntParameter - Integer parameter with atomic storage
// =============================================================================

/// Integer parameter with atomic storage.
///
/// ```ignore
/// let beats = IntParameter::new("Beats per phrase", 8, 4..=16).with_units("beats");
/// beats.set(12);
/// assert_eq!(beats.get(), 12);
/// ```
pub struct IntParameter {
    info: ParameterInfo,
    value: AtomicI64,
    min: i64,
    max: i64,
}

impl IntParameter {
    /// Create an integer parameter.
    ///
    /// The parameter ID defaults to 0 and should be set via
    /// [`with_id`](Self::with_id) or the `#[derive(Parameters)]` macro.
    pub fn new(name: &'static str, default: i64, range: RangeInclusive<i64>) -> Self {
        let (min, max) = (*range.start(), *range.end());
        let default = default.clamp(min, max);
        // i128 so that extreme ranges don't overflow
        let span = i128::from(max) - i128::from(min);
        let default_normalized = if span == 0 {
            0.5
        } else {
            ((i128::from(default) - i128::from(min)) as f64 / span as f64).clamp(0.0, 1.0)
        };

        let mut info = ParameterInfo::new(0, name);
        info.default_normalized = default_normalized;
        info.step_count = span.min(i128::from(i32::MAX)) as i32;

        Self {
            info,
            value: AtomicI64::new(default),
            min,
            max,
        }
    }

    // === Builder methods ===

    /// Set the parameter ID.
    pub fn with_id(mut self, id: ParameterId) -> Self {
        self.info.id = id;
        self
    }

    /// Set the unit label shown after the value.
    pub fn with_units(mut self, units: &'static str) -> Self {
        self.info.units = units;
        self
    }

    /// Assign the ID in place. Used by the derive macro.
    pub fn set_id(&mut self, id: ParameterId) {
        self.info.id = id;
    }

    // === Value access ===

    /// Get the current integer value.
    #[inline]
    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Set the integer value, clamped into range.
    #[inline]
    pub fn set(&self, value: i64) {
        self.value.store(value.clamp(self.min, self.max), Ordering::Relaxed);
    }

    /// Restore the default value.
    pub fn reset(&self) {
        self.set_normalized(self.info.default_normalized);
    }
}

impl std::fmt::Debug for IntParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntParameter")
            .field("id", &self.info.id)
            .field("name", &self.info.name)
            .field("value", &self.get())
            .field("range", &(self.min..=self.max))
            .finish()
    }
}

impl ParameterRef for IntParameter {
    fn info(&self) -> &ParameterInfo {
        &self.info
    }

    fn get_normalized(&self) -> ParameterValue {
        self.plain_to_normalized(self.get() as f64)
    }

    fn set_normalized(&self, value: ParameterValue) {
        self.set(self.normalized_to_plain(value).round() as i64);
    }

    fn get_plain(&self) -> ParameterValue {
        self.get() as f64
    }

    fn set_plain(&self, value: ParameterValue) {
        self.set(value.round() as i64);
    }

    fn display_normalized(&self, normalized: ParameterValue) -> String {
        let plain = self.normalized_to_plain(normalized).round() as i64;
        if self.info.units.is_empty() {
            plain.to_string()
        } else {
            format!("{} {}", plain, self.info.units)
        }
    }

    fn parse(&self, s: &str) -> Option<ParameterValue> {
        let s = s.trim();
        let number = s.strip_suffix(self.info.units).unwrap_or(s).trim();
        let plain: f64 = number.parse().ok()?;
        plain
            .is_finite()
            .then(|| self.plain_to_normalized(plain.round()))
    }

    fn normalized_to_plain(&self, normalized: ParameterValue) -> ParameterValue {
        let normalized = normalized.clamp(0.0, 1.0);
        self.min as f64 + normalized * (self.max - self.min) as f64
    }

    fn plain_to_normalized(&self, plain: ParameterValue) -> ParameterValue {
        if self.max == self.min {
            return 0.5;
        }
        ((plain - self.min as f64) / (self.max - self.min) as f64).clamp(0.0, 1.0)
    }
}
