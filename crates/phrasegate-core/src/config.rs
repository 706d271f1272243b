//! Static plugin metadata.
//!
//! Format adapters read this when registering the plugin with a host.
//!
//! ```ignore
//! use phrasegate::prelude::*;
//!
//! pub static CONFIG: PluginConfig = PluginConfig::midi_effect("Phrase Channel Gate")
//!     .with_vendor("My Company")
//!     .with_version(env!("CARGO_PKG_VERSION"));
//! ```

/// Sub-category string hosts use to file MIDI effects.
pub const MIDI_EFFECT_SUB_CATEGORIES: &str = "Fx|MIDI";

/// Format-agnostic plugin metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginConfig {
    /// Plugin name displayed in the DAW.
    pub name: &'static str,
    /// Vendor/company name.
    pub vendor: &'static str,
    /// Plugin version string.
    pub version: &'static str,
    /// Pipe-separated host categories, e.g. "Fx|MIDI".
    pub sub_categories: &'static str,
}

impl PluginConfig {
    /// Metadata for a MIDI effect called `name`.
    pub const fn midi_effect(name: &'static str) -> Self {
        Self {
            name,
            vendor: "Unknown Vendor",
            version: "0.0.0",
            sub_categories: MIDI_EFFECT_SUB_CATEGORIES,
        }
    }

    /// Set the vendor name.
    pub const fn with_vendor(mut self, vendor: &'static str) -> Self {
        self.vendor = vendor;
        self
    }

    /// Set the version string.
    pub const fn with_version(mut self, version: &'static str) -> Self {
        self.version = version;
        self
    }

    /// True if hosts will list this under MIDI effects.
    pub fn is_midi_effect(&self) -> bool {
        self.sub_categories.split('|').any(|category| category == "MIDI")
    }
}
