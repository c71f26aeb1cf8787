//! Char Matcher - composable single-character matchers for Rust
//!
//! This library classifies UTF-16 code units and transforms text with the result:
//! - Matchers for single units, explicit sets, ranges and named classes
//! - Logical composition with `and`, `or` and `negate`
//! - Precomputed bit set and hashed small-set forms for hot loops
//! - Scanning, counting, trimming, removal, replacement and run collapsing
//!
//! # Example
//!
//! ```rust
//! use char_matcher_r::{utf16, CharMatcher, CharPredicate};
//!
//! let dash = CharMatcher::is('-' as u16);
//! let text = utf16("x-x--xx---x----x");
//! let collapsed = dash.collapse_from(&text, '_' as u16);
//! assert_eq!(String::from_utf16(&collapsed).unwrap(), "x_x_xx_x_x");
//!
//! let ab = CharMatcher::any_of("ab");
//! let word = utf16("abacatbab");
//! assert_eq!(ab.trim_from(&word), utf16("cat").as_slice());
//!
//! let separators = CharMatcher::whitespace().or(CharMatcher::any_of(",;")).precomputed();
//! assert!(separators.matches(';' as u16));
//! ```
//!
//! # Matchers
//!
//! | Factory | Matches |
//! |---------|---------|
//! | `any()` / `none()` | every / no code unit |
//! | `is(c)` / `is_not(c)` | exactly `c` / everything but `c` |
//! | `any_of("…")` / `none_of("…")` | members / non-members of a set |
//! | `in_range(lo, hi)` | `lo..=hi` (fails when `lo > hi`) |
//! | `from_predicate(f)` | whatever `f` accepts |
//! | `whitespace()`, `breaking_whitespace()`, `ascii()`, `digit()`, `invisible()`, `single_width()`, `iso_control()` | named classes |
//! | `alphabetic()`, `alphanumeric()`, `uppercase()`, `lowercase()` | `char` properties, surrogates excluded |
//!
//! Matchers are immutable, so a precomputed matcher can be built once and shared
//! by any number of threads.

pub mod error;
pub mod matcher;
pub mod precompute;
pub mod text;
pub mod types;

// Re-export commonly used items
pub use error::{MatchError, Result};
pub use matcher::{CharMatcher, CharPredicate, CharSet, Classifier};
pub use precompute::{
    BitSet, BitSetMatcher, PrecomputePolicy, SmallSetMatcher, DEFAULT_MAX_SMALL_SET_SIZE,
    DEFAULT_SMALL_SET_DENSITY,
};
pub use types::{decode, utf16, valid_surrogate_pair_at, CodeUnit, DISTINCT_CHARS};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_workflow() {
        let separators = CharMatcher::whitespace()
            .or(CharMatcher::any_of(",;"))
            .precomputed();

        let input = utf16("  alpha, beta;;gamma  ");
        let trimmed = separators.trim_and_collapse_from(&input, ' ' as u16);
        assert_eq!(decode(&trimmed).unwrap(), "alpha beta gamma");

        let words = CharMatcher::alphabetic();
        assert_eq!(words.count_in(&input), 14);
        assert_eq!(separators.index_in(&input), Some(0));
        assert_eq!(separators.last_index_in(&input), Some(input.len() - 1));

        let input = utf16("tel: +1 (555) 010-9999");
        let digits_only = CharMatcher::digit().retain_from(&input);
        assert_eq!(decode(&digits_only).unwrap(), "15550109999");

        let err = CharMatcher::in_range('z' as u16, 'a' as u16).unwrap_err();
        assert!(matches!(err, MatchError::InvalidArgument(_)));
    }
}
