//! Dense bitmap over the full code unit domain.

use std::fmt;
use std::sync::Arc;

use crate::matcher::CharPredicate;
use crate::types::{CodeUnit, DISTINCT_CHARS};

const WORDS: usize = DISTINCT_CHARS / 64;

/// One bit per code unit (8 KiB)
#[derive(Clone, PartialEq, Eq)]
pub struct BitSet {
    words: Box<[u64; WORDS]>,
}

impl Default for BitSet {
    fn default() -> Self {
        Self::new()
    }
}

impl BitSet {
    /// Create an empty bit set
    pub fn new() -> Self {
        Self {
            words: Box::new([0u64; WORDS]),
        }
    }

    /// Mark a code unit as a member
    #[inline]
    pub fn set(&mut self, c: CodeUnit) {
        let idx = c as usize;
        self.words[idx / 64] |= 1u64 << (idx % 64);
    }

    /// Check membership of a code unit
    #[inline]
    pub fn get(&self, c: CodeUnit) -> bool {
        let idx = c as usize;
        (self.words[idx / 64] >> (idx % 64)) & 1 == 1
    }

    /// Mark every code unit in `lo..=hi` as a member
    pub fn set_range(&mut self, lo: CodeUnit, hi: CodeUnit) {
        if lo > hi {
            return;
        }
        let (lo, hi) = (lo as usize, hi as usize);
        let (first_word, last_word) = (lo / 64, hi / 64);

        if first_word == last_word {
            self.words[first_word] |= range_mask(lo % 64, hi % 64);
            return;
        }

        self.words[first_word] |= range_mask(lo % 64, 63);
        for word in &mut self.words[first_word + 1..last_word] {
            *word = u64::MAX;
        }
        self.words[last_word] |= range_mask(0, hi % 64);
    }

    /// Complement every bit
    pub fn flip_all(&mut self) {
        for word in self.words.iter_mut() {
            *word = !*word;
        }
    }

    /// Add every member of `other`
    pub fn union_with(&mut self, other: &BitSet) {
        for (word, other) in self.words.iter_mut().zip(other.words.iter()) {
            *word |= *other;
        }
    }

    /// Number of members
    pub fn cardinality(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Highest member + 1, or 0 when empty
    pub fn len(&self) -> usize {
        for (word_idx, &word) in self.words.iter().enumerate().rev() {
            if word != 0 {
                return word_idx * 64 + (64 - word.leading_zeros() as usize);
            }
        }
        0
    }

    /// Check if the set has no members
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Iterate members in ascending order
    pub fn iter(&self) -> impl Iterator<Item = CodeUnit> + '_ {
        self.words
            .iter()
            .enumerate()
            .filter(|&(_, &word)| word != 0)
            .flat_map(|(word_idx, &word)| {
                let mut remaining = word;
                std::iter::from_fn(move || {
                    if remaining == 0 {
                        return None;
                    }
                    let bit = remaining.trailing_zeros() as usize;
                    remaining &= remaining - 1;
                    Some((word_idx * 64 + bit) as CodeUnit)
                })
            })
    }
}

impl fmt::Debug for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitSet")
            .field("cardinality", &self.cardinality())
            .finish()
    }
}

/// Bits `lo..=hi` of a word
#[inline]
fn range_mask(lo: usize, hi: usize) -> u64 {
    let upper = if hi == 63 {
        u64::MAX
    } else {
        (1u64 << (hi + 1)) - 1
    };
    upper & !((1u64 << lo) - 1)
}

/// Precomputed matcher backed by a dense bit set.
///
/// The bits always hold the membership of the positive set; `negated` flips the
/// answer so negation never has to copy the table.
#[derive(Clone)]
pub struct BitSetMatcher {
    bits: Arc<BitSet>,
    negated: bool,
    description: Arc<str>,
}

impl BitSetMatcher {
    pub fn new(bits: BitSet, negated: bool, description: impl Into<Arc<str>>) -> Self {
        Self {
            bits: Arc::new(bits),
            negated,
            description: description.into(),
        }
    }

    /// Same table, complemented answer
    pub fn negate(&self) -> Self {
        Self {
            bits: Arc::clone(&self.bits),
            negated: !self.negated,
            description: toggle_negate_suffix(&self.description).into(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn set_bits(&self, table: &mut BitSet) {
        if self.negated {
            let mut tmp = (*self.bits).clone();
            tmp.flip_all();
            table.union_with(&tmp);
        } else {
            table.union_with(&self.bits);
        }
    }

    pub(crate) fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.bits, &other.bits)
            && self.negated == other.negated
            && self.description == other.description
    }
}

impl CharPredicate for BitSetMatcher {
    #[inline]
    fn matches(&self, c: CodeUnit) -> bool {
        self.bits.get(c) != self.negated
    }
}

impl fmt::Debug for BitSetMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitSetMatcher")
            .field("negated", &self.negated)
            .field("description", &self.description)
            .finish()
    }
}

/// Add or strip a trailing `.negate()` so a negated description reads like the
/// matcher it came from.
pub(crate) fn toggle_negate_suffix(description: &str) -> String {
    const SUFFIX: &str = ".negate()";
    match description.strip_suffix(SUFFIX) {
        Some(stripped) => stripped.to_string(),
        None => format!("{description}{SUFFIX}"),
    }
}
