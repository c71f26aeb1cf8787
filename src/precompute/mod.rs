//! Precomputation of matchers into fast lookup forms.
//!
//! A matcher is evaluated once for every code unit and the resulting member set
//! is stored in whichever form is cheapest to query:
//! - no members or every code unit: `CharMatcher::None` / `CharMatcher::Any`
//! - one or two members (or non-members): `Is`, `IsNot`, two-unit `AnyOf`
//! - few, widely spread members: [`SmallSetMatcher`]
//! - everything else: [`BitSetMatcher`]
//!
//! When more than half of the domain matches, the complement is stored instead
//! and the result answers negated.
//!
//! ## Example
//!
//! ```
//! use char_matcher_r::{CharMatcher, CharPredicate};
//!
//! let vowels = CharMatcher::any_of("aeiou").precomputed();
//! assert!(vowels.matches('e' as u16));
//! assert!(!vowels.matches('z' as u16));
//! ```

pub mod bitset;
pub mod small_set;

pub use bitset::{BitSet, BitSetMatcher};
pub use small_set::SmallSetMatcher;

use crate::matcher::CharMatcher;
use crate::types::DISTINCT_CHARS;

/// Default upper bound on members stored in a [`SmallSetMatcher`]
pub const DEFAULT_MAX_SMALL_SET_SIZE: usize = 1023;

/// Default bits of dense table tolerated per small-set member
pub const DEFAULT_SMALL_SET_DENSITY: usize = 64;

/// Tuning knobs for choosing a precomputed representation.
///
/// Every policy yields a matcher with identical classification; only the
/// memory/speed trade-off changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecomputePolicy {
    /// Largest member count that may use the hashed small-set form
    pub max_small_set_size: usize,
    /// Small-set form is used only when the dense table would need more than
    /// `members * small_set_density` bits
    pub small_set_density: usize,
}

impl Default for PrecomputePolicy {
    fn default() -> Self {
        Self {
            max_small_set_size: DEFAULT_MAX_SMALL_SET_SIZE,
            small_set_density: DEFAULT_SMALL_SET_DENSITY,
        }
    }
}

impl PrecomputePolicy {
    /// Create a policy with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the small-set size limit.
    pub fn with_max_small_set_size(mut self, size: usize) -> Self {
        self.max_small_set_size = size;
        self
    }

    /// Set the small-set density factor.
    pub fn with_small_set_density(mut self, density: usize) -> Self {
        self.small_set_density = density;
        self
    }

    /// `table_len` is the highest member + 1
    fn is_small(&self, members: usize, table_len: usize) -> bool {
        members <= self.max_small_set_size
            && table_len > members.saturating_mul(self.small_set_density)
    }
}

pub(crate) fn precompute(matcher: CharMatcher, policy: &PrecomputePolicy) -> CharMatcher {
    if matcher.is_fast() {
        log::trace!("{} is already fast, not precomputing", matcher);
        return matcher;
    }

    let description = matcher.to_string();
    let mut table = BitSet::new();
    matcher.set_bits(&mut table);

    let total = table.cardinality();
    let negated = total * 2 > DISTINCT_CHARS;
    if negated {
        table.flip_all();
    }
    let members = if negated { DISTINCT_CHARS - total } else { total };

    let result = from_table(table, members, negated, description, policy);
    let representation = match &result {
        CharMatcher::SmallSet(_) => "small set",
        CharMatcher::BitSet(_) => "bit set",
        _ => "plain matcher",
    };
    log::debug!(
        "precomputed {} ({} matching code units) as {}",
        result,
        total,
        representation
    );
    result
}

fn from_table(
    table: BitSet,
    members: usize,
    negated: bool,
    description: String,
    policy: &PrecomputePolicy,
) -> CharMatcher {
    let (first, second) = {
        let mut iter = table.iter();
        (iter.next(), iter.next())
    };

    let positive = match (members, first, second) {
        (0, _, _) => CharMatcher::None,
        (1, Some(c), _) => CharMatcher::is(c),
        (2, Some(c1), Some(c2)) => CharMatcher::any_of_units(&[c1, c2]),
        _ if policy.is_small(members, table.len()) => {
            return CharMatcher::SmallSet(SmallSetMatcher::from_bits(
                &table,
                negated,
                description,
            ));
        }
        _ => {
            return CharMatcher::BitSet(BitSetMatcher::new(table, negated, description));
        }
    };

    if negated {
        positive.negate()
    } else {
        positive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::CharPredicate;

    fn assert_same_membership(original: &CharMatcher, precomputed: &CharMatcher) {
        for c in 0..=u16::MAX {
            assert_eq!(
                original.matches(c),
                precomputed.matches(c),
                "{original} vs {precomputed} at code unit {c:#06X}"
            );
        }
    }

    #[test]
    fn test_policy_builder() {
        let policy = PrecomputePolicy::new()
            .with_max_small_set_size(16)
            .with_small_set_density(8);
        assert_eq!(policy.max_small_set_size, 16);
        assert_eq!(policy.small_set_density, 8);
        assert_eq!(PrecomputePolicy::default().max_small_set_size, 1023);
    }

    #[test]
    fn test_is_small() {
        let policy = PrecomputePolicy::default();
        assert!(policy.is_small(3, 0x3000));
        assert!(!policy.is_small(3, 100));
        assert!(!policy.is_small(2000, DISTINCT_CHARS));
    }

    #[test]
    fn test_sparse_set_becomes_small_set() {
        let original = CharMatcher::any_of("a\u{3000}\u{FF10}");
        let precomputed = original.clone().precomputed();
        assert!(matches!(precomputed, CharMatcher::SmallSet(_)));
        assert_eq!(precomputed.to_string(), original.to_string());
        assert_same_membership(&original, &precomputed);
    }

    #[test]
    fn test_dense_set_becomes_bitset() {
        let original = CharMatcher::in_range(b'A' as u16, b'Z' as u16)
            .unwrap()
            .and(CharMatcher::in_range(b'F' as u16, b'K' as u16).unwrap().negate());
        let precomputed = original.clone().precomputed();
        assert!(matches!(precomputed, CharMatcher::BitSet(_)));
        assert_same_membership(&original, &precomputed);
    }

    #[test]
    fn test_policy_can_force_bitset() {
        let original = CharMatcher::any_of("a\u{3000}\u{FF10}");
        let policy = PrecomputePolicy::new().with_max_small_set_size(0);
        let precomputed = original.clone().precomputed_with(&policy);
        assert!(matches!(precomputed, CharMatcher::BitSet(_)));
        assert_same_membership(&original, &precomputed);
    }

    #[test]
    fn test_large_complement_is_negated() {
        let original = CharMatcher::none_of("xyz\u{2000}");
        let precomputed = original.clone().precomputed();
        assert!(matches!(precomputed, CharMatcher::SmallSet(_)));
        assert_eq!(precomputed.to_string(), original.to_string());
        assert_same_membership(&original, &precomputed);
    }

    #[test]
    fn test_degenerate_results() {
        let nothing = CharMatcher::from_predicate(|_| false).precomputed();
        assert_eq!(nothing, CharMatcher::None);

        let everything = CharMatcher::from_predicate(|_| true).precomputed();
        assert_eq!(everything, CharMatcher::Any);

        let single = CharMatcher::from_predicate(|c| c == 0x41).precomputed();
        assert_eq!(single, CharMatcher::is(0x41));

        let all_but_one = CharMatcher::from_predicate(|c| c != 0x41).precomputed();
        assert_eq!(all_but_one, CharMatcher::is_not(0x41));

        let pair = CharMatcher::from_predicate(|c| c == 0x41 || c == 0x42).precomputed();
        assert_eq!(pair, CharMatcher::any_of("AB"));
    }
}
