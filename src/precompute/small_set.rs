//! Hashed matcher for sets too sparse to justify a dense bit set.
//!
//! Members live in an open-addressed table with linear probing. A 64-bit filter
//! keyed on the low six bits of the code unit rejects most non-members before
//! the table is touched. Slot value 0 marks an empty slot, so membership of
//! U+0000 is tracked by a separate flag.

use std::fmt;
use std::sync::Arc;

use super::bitset::{toggle_negate_suffix, BitSet};
use crate::matcher::CharPredicate;
use crate::types::CodeUnit;

const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;

/// Tables are kept at most half full
const DESIRED_LOAD_FACTOR: f64 = 0.5;

/// Murmur3 mixing step, spreads sequential code units across the table
#[inline]
fn smear(hash: u32) -> u32 {
    C2.wrapping_mul(hash.wrapping_mul(C1).rotate_left(15))
}

/// Power-of-two table size that keeps the load factor at or below 0.5
pub(crate) fn choose_table_size(set_size: usize) -> usize {
    if set_size <= 1 {
        return 2;
    }
    // highest one bit of (size - 1), doubled
    let mut table_size = 1usize << (usize::BITS - (set_size - 1).leading_zeros());
    while (table_size as f64) * DESIRED_LOAD_FACTOR < set_size as f64 {
        table_size <<= 1;
    }
    table_size
}

/// Precomputed matcher for small member sets
#[derive(Clone)]
pub struct SmallSetMatcher {
    table: Arc<[CodeUnit]>,
    filter: u64,
    contains_zero: bool,
    negated: bool,
    description: Arc<str>,
}

impl SmallSetMatcher {
    /// Build from the members of `chars`.
    ///
    /// When `negated` is set the matcher answers for the complement of `chars`.
    pub fn from_bits(chars: &BitSet, negated: bool, description: impl Into<Arc<str>>) -> Self {
        let size = chars.cardinality();
        let mut table = vec![0 as CodeUnit; choose_table_size(size)];
        let mask = table.len() - 1;
        let mut filter = 0u64;
        let mut contains_zero = false;

        for c in chars.iter() {
            if c == 0 {
                contains_zero = true;
                continue;
            }
            filter |= 1u64 << (c % 64);
            let mut index = smear(c as u32) as usize & mask;
            while table[index] != 0 {
                index = (index + 1) & mask;
            }
            table[index] = c;
        }

        Self {
            table: table.into(),
            filter,
            contains_zero,
            negated,
            description: description.into(),
        }
    }

    /// Same table, complemented answer
    pub fn negate(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
            filter: self.filter,
            contains_zero: self.contains_zero,
            negated: !self.negated,
            description: toggle_negate_suffix(&self.description).into(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Number of table slots
    pub fn capacity(&self) -> usize {
        self.table.len()
    }

    #[inline]
    fn check_filter(&self, c: CodeUnit) -> bool {
        (self.filter >> (c % 64)) & 1 == 1
    }

    fn contains(&self, c: CodeUnit) -> bool {
        if c == 0 {
            return self.contains_zero;
        }
        if !self.check_filter(c) {
            return false;
        }
        let mask = self.table.len() - 1;
        let start = smear(c as u32) as usize & mask;
        let mut index = start;
        loop {
            match self.table[index] {
                0 => return false,
                slot if slot == c => return true,
                _ => index = (index + 1) & mask,
            }
            if index == start {
                return false;
            }
        }
    }

    pub(crate) fn set_bits(&self, table: &mut BitSet) {
        let mut members = BitSet::new();
        if self.contains_zero {
            members.set(0);
        }
        for &c in self.table.iter().filter(|&&c| c != 0) {
            members.set(c);
        }
        if self.negated {
            members.flip_all();
        }
        table.union_with(&members);
    }

    pub(crate) fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.table, &other.table)
            && self.negated == other.negated
            && self.description == other.description
    }
}

impl CharPredicate for SmallSetMatcher {
    #[inline]
    fn matches(&self, c: CodeUnit) -> bool {
        self.contains(c) != self.negated
    }
}

impl fmt::Debug for SmallSetMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmallSetMatcher")
            .field("capacity", &self.table.len())
            .field("negated", &self.negated)
            .field("description", &self.description)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits_of(chars: &str) -> BitSet {
        let mut bits = BitSet::new();
        for c in chars.encode_utf16() {
            bits.set(c);
        }
        bits
    }

    #[test]
    fn test_choose_table_size() {
        assert_eq!(choose_table_size(1), 2);
        assert_eq!(choose_table_size(2), 4);
        assert_eq!(choose_table_size(3), 8);
        assert_eq!(choose_table_size(4), 8);
        assert_eq!(choose_table_size(5), 16);
        assert_eq!(choose_table_size(63), 128);
        assert_eq!(choose_table_size(64), 128);
        assert_eq!(choose_table_size(65), 256);
    }

    #[test]
    fn test_small_lengths() {
        let len1 = SmallSetMatcher::from_bits(&bits_of("#"), false, "#");
        assert!(len1.matches(b'#' as u16));
        assert!(!len1.matches(b'!' as u16));

        let len2 = SmallSetMatcher::from_bits(&bits_of("ab"), false, "ab");
        assert!(len2.matches(b'a' as u16));
        assert!(len2.matches(b'b' as u16));
        for c in b'c'..b'z' {
            assert!(!len2.matches(c as u16));
        }

        let len4 = SmallSetMatcher::from_bits(&bits_of("abcd"), false, "abcd");
        for c in b'a'..=b'd' {
            assert!(len4.matches(c as u16));
        }
        for c in b'e'..b'z' {
            assert!(!len4.matches(c as u16));
        }
    }

    #[test]
    fn test_zero_member() {
        let mut bits = bits_of("@");
        bits.set(0);
        let matcher = SmallSetMatcher::from_bits(&bits, false, "zero");
        assert!(matcher.matches(0));
        assert!(matcher.matches(b'@' as u16));
        assert!(!matcher.matches(64));

        let without = SmallSetMatcher::from_bits(&bits_of("@"), false, "no zero");
        assert!(!without.matches(0));
    }

    #[test]
    fn test_colliding_filter_bits() {
        // 'A' and 'A' + 64 share a filter bit; both must still resolve exactly.
        let matcher = SmallSetMatcher::from_bits(&bits_of("A\u{81}"), false, "pair");
        assert!(matcher.matches(0x41));
        assert!(matcher.matches(0x81));
        assert!(!matcher.matches(0xC1));
        assert!(!matcher.matches(0x101));
    }

    #[test]
    fn test_negated_exact() {
        let bits = bits_of("xyz");
        let matcher = SmallSetMatcher::from_bits(&bits, true, "none");
        for c in 0..=u16::MAX {
            assert_eq!(matcher.matches(c), !bits.get(c), "code unit {c}");
        }
    }

    #[test]
    fn test_set_bits_matches_membership() {
        let bits = bits_of("CharMatcher\u{3000}");
        let matcher = SmallSetMatcher::from_bits(&bits, false, "m");
        let mut table = BitSet::new();
        matcher.set_bits(&mut table);
        assert_eq!(table, bits);

        let mut flipped = BitSet::new();
        matcher.negate().set_bits(&mut flipped);
        for c in 0..=u16::MAX {
            assert_eq!(flipped.get(c), !bits.get(c));
        }
    }
}
