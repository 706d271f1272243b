//! Stable hashing of string parameter identifiers.
//!
//! Hosts address parameters by `u32`. Plugins name them with strings such as
//! `"channel"` or `"phraseBeats"`. The mapping between the two must never change
//! between releases, otherwise automation stored in host projects points at the
//! wrong parameter. FNV-1a is used because it is trivially `const` and has no
//! platform-dependent behavior.

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// FNV-1a 32-bit hash of `s`.
///
/// ```
/// use phrasegate_utils::fnv1a_32;
///
/// const CHANNEL: u32 = fnv1a_32("channel");
/// assert_eq!(CHANNEL, fnv1a_32("channel"));
/// ```
#[inline]
pub const fn fnv1a_32(s: &str) -> u32 {
    let bytes = s.as_bytes();
    let mut hash = FNV_OFFSET_BASIS;
    let mut i = 0;
    while i < bytes.len() {
        hash = (hash ^ bytes[i] as u32).wrapping_mul(FNV_PRIME);
        i += 1;
    }
    hash
}

/// Host-facing parameter ID for a string identifier.
///
/// Same value the `#[derive(Parameters)]` macro bakes into the generated code.
#[inline]
pub const fn parameter_id(string_id: &str) -> u32 {
    fnv1a_32(string_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_offset_basis() {
        assert_eq!(fnv1a_32(""), 0x811c_9dc5);
    }

    #[test]
    fn known_vector() {
        assert_eq!(fnv1a_32("a"), 0xe40c_292c);
    }

    #[test]
    fn usable_in_const_context() {
        const ID: u32 = parameter_id("phraseBeats");
        assert_eq!(ID, fnv1a_32("phraseBeats"));
    }

    #[test]
    fn gate_parameter_ids_are_distinct() {
        assert_ne!(parameter_id("channel"), parameter_id("phraseBeats"));
    }
}
