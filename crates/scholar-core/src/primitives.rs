//! # Innate Primitives
//!
//! Hardcoded constants for the Scholar CORE.
//!
//! These are compiled into the binary and are immutable at runtime.

/// Honorific prefixes stripped from faculty names before comparison.
///
/// Matched case-insensitively against leading whitespace-separated words.
/// The dotted forms are also stripped when glued to the name, as in `Dr.Jane`.
pub const HONORIFIC_PREFIXES: &[&str] = &["dr", "dr.", "prof", "prof.", "professor"];

/// Maximum number of prerequisite chains enumerated for one course.
///
/// Chain enumeration is exponential in the worst case; this bounds it.
pub const MAX_PREREQUISITE_CHAINS: usize = 256;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for free-text query parameters (search terms, names).
pub const MAX_SEARCH_TERM_LENGTH: usize = 256;

/// Maximum number of entries in a `completed_courses` parameter.
pub const MAX_COMPLETED_COURSES: usize = 512;

/// Maximum size of a dataset document accepted by the loader.
///
/// Checked before parsing so an oversized file is never deserialized.
pub const MAX_DATASET_BYTES: usize = 16 * 1024 * 1024; // 16 MB

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn honorifics_are_lowercase() {
        for prefix in HONORIFIC_PREFIXES {
            assert_eq!(*prefix, prefix.to_lowercase());
        }
    }
}
