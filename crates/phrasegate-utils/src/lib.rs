//! Internal utilities shared by `phrasegate-core` and `phrasegate-macros`.
//!
//! Everything here is `const fn` so the derive macro and runtime code agree on
//! the exact same values. Plugin code should go through the `phrasegate`
//! facade instead of depending on this crate directly.

pub mod hash;

pub use hash::{fnv1a_32, parameter_id};
