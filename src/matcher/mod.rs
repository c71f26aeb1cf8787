mod classifier;

pub use classifier::Classifier;

use std::fmt;
use std::sync::Arc;

use crate::error::{MatchError, Result};
use crate::precompute::{self, BitSet, BitSetMatcher, PrecomputePolicy, SmallSetMatcher};
use crate::types::CodeUnit;

/// Trait for single code unit predicates
pub trait CharPredicate: Send + Sync {
    /// Check if the code unit matches this predicate
    fn matches(&self, c: CodeUnit) -> bool;
}

impl<F> CharPredicate for F
where
    F: Fn(CodeUnit) -> bool + Send + Sync,
{
    fn matches(&self, c: CodeUnit) -> bool {
        self(c)
    }
}

/// Sorted, deduplicated members of an explicit set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharSet(Arc<[CodeUnit]>);

impl CharSet {
    fn from_units(units: &[CodeUnit]) -> Self {
        let mut sorted = units.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        Self(sorted.into())
    }

    pub fn as_slice(&self) -> &[CodeUnit] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    fn contains(&self, c: CodeUnit) -> bool {
        self.0.binary_search(&c).is_ok()
    }
}

/// Immutable single code unit matcher.
///
/// Built through the factory functions (`CharMatcher::is`, `CharMatcher::any_of`, ...)
/// and composed with [`and`](CharMatcher::and), [`or`](CharMatcher::or) and
/// [`negate`](CharMatcher::negate). Combinators own their operands, so a matcher is a
/// plain tree and is freely shared across threads.
///
/// Equality is structural for plain values and identity (same shared allocation)
/// for predicates and precomputed tables.
#[derive(Clone)]
pub enum CharMatcher {
    /// Matches every code unit
    Any,
    /// Matches no code unit
    None,
    Is(CodeUnit),
    IsNot(CodeUnit),
    /// Membership in two or more explicit code units
    AnyOf(CharSet),
    /// `lo..=hi`
    InRange(CodeUnit, CodeUnit),
    Named(Classifier),
    And(Box<CharMatcher>, Box<CharMatcher>),
    Or(Box<CharMatcher>, Box<CharMatcher>),
    Negate(Box<CharMatcher>),
    Predicate(Arc<dyn CharPredicate>),
    SmallSet(SmallSetMatcher),
    BitSet(BitSetMatcher),
}

impl CharMatcher {
    pub fn any() -> Self {
        CharMatcher::Any
    }

    pub fn none() -> Self {
        CharMatcher::None
    }

    pub fn is(c: CodeUnit) -> Self {
        CharMatcher::Is(c)
    }

    pub fn is_not(c: CodeUnit) -> Self {
        CharMatcher::IsNot(c)
    }

    /// Match any code unit of `chars` (UTF-16 encoded).
    ///
    /// Collapses to `None` for an empty set and `Is` for a single distinct unit.
    pub fn any_of(chars: &str) -> Self {
        let units: Vec<CodeUnit> = chars.encode_utf16().collect();
        Self::any_of_units(&units)
    }

    pub fn any_of_units(units: &[CodeUnit]) -> Self {
        let set = CharSet::from_units(units);
        match set.as_slice() {
            [] => CharMatcher::None,
            [c] => CharMatcher::Is(*c),
            _ => CharMatcher::AnyOf(set),
        }
    }

    /// Match every code unit not in `chars`.
    ///
    /// Collapses to `Any` for an empty set and `IsNot` for a single distinct unit.
    pub fn none_of(chars: &str) -> Self {
        Self::any_of(chars).negate()
    }

    pub fn none_of_units(units: &[CodeUnit]) -> Self {
        Self::any_of_units(units).negate()
    }

    /// Match code units in `lo..=hi`.
    pub fn in_range(lo: CodeUnit, hi: CodeUnit) -> Result<Self> {
        if lo > hi {
            return Err(MatchError::InvalidArgument(format!(
                "in_range: start {:#06X} is greater than end {:#06X}",
                lo, hi
            )));
        }
        Ok(CharMatcher::InRange(lo, hi))
    }

    /// Adapt an arbitrary predicate.
    pub fn from_predicate<F>(predicate: F) -> Self
    where
        F: Fn(CodeUnit) -> bool + Send + Sync + 'static,
    {
        CharMatcher::Predicate(Arc::new(predicate))
    }

    pub fn whitespace() -> Self {
        CharMatcher::Named(Classifier::Whitespace)
    }

    /// Whitespace that allows a line break; a subset of [`whitespace`](Self::whitespace).
    pub fn breaking_whitespace() -> Self {
        CharMatcher::Named(Classifier::BreakingWhitespace)
    }

    pub fn ascii() -> Self {
        CharMatcher::Named(Classifier::Ascii)
    }

    pub fn digit() -> Self {
        CharMatcher::Named(Classifier::Digit)
    }

    pub fn invisible() -> Self {
        CharMatcher::Named(Classifier::Invisible)
    }

    pub fn single_width() -> Self {
        CharMatcher::Named(Classifier::SingleWidth)
    }

    pub fn iso_control() -> Self {
        CharMatcher::Named(Classifier::IsoControl)
    }

    pub fn alphabetic() -> Self {
        CharMatcher::Named(Classifier::Alphabetic)
    }

    pub fn alphanumeric() -> Self {
        CharMatcher::Named(Classifier::Alphanumeric)
    }

    pub fn uppercase() -> Self {
        CharMatcher::Named(Classifier::Uppercase)
    }

    pub fn lowercase() -> Self {
        CharMatcher::Named(Classifier::Lowercase)
    }

    /// Logical complement.
    ///
    /// `Any` and `None` swap, `Is`/`IsNot` swap, and negating a negation returns the
    /// inner matcher.
    pub fn negate(self) -> Self {
        match self {
            CharMatcher::Any => CharMatcher::None,
            CharMatcher::None => CharMatcher::Any,
            CharMatcher::Is(c) => CharMatcher::IsNot(c),
            CharMatcher::IsNot(c) => CharMatcher::Is(c),
            CharMatcher::Negate(inner) => *inner,
            CharMatcher::SmallSet(m) => CharMatcher::SmallSet(m.negate()),
            CharMatcher::BitSet(m) => CharMatcher::BitSet(m.negate()),
            other => CharMatcher::Negate(Box::new(other)),
        }
    }

    /// Match when both operands match; `other` is not consulted once `self` fails.
    pub fn and(self, other: CharMatcher) -> Self {
        match (self, other) {
            (CharMatcher::Any, other) | (other, CharMatcher::Any) => other,
            (CharMatcher::None, _) | (_, CharMatcher::None) => CharMatcher::None,
            (first, second) => CharMatcher::And(Box::new(first), Box::new(second)),
        }
    }

    /// Match when either operand matches; `other` is not consulted once `self` matches.
    pub fn or(self, other: CharMatcher) -> Self {
        match (self, other) {
            (CharMatcher::None, other) | (other, CharMatcher::None) => other,
            (CharMatcher::Any, _) | (_, CharMatcher::Any) => CharMatcher::Any,
            (first, second) => CharMatcher::Or(Box::new(first), Box::new(second)),
        }
    }

    /// Equivalent matcher tuned for repeated lookups, using the default policy.
    ///
    /// Building a table costs a full pass over the code unit domain; keep the result
    /// rather than calling this per use.
    pub fn precomputed(self) -> Self {
        self.precomputed_with(&PrecomputePolicy::default())
    }

    pub fn precomputed_with(self, policy: &PrecomputePolicy) -> Self {
        precompute::precompute(self, policy)
    }

    /// Whether lookups are already constant time without branching through a tree
    pub(crate) fn is_fast(&self) -> bool {
        match self {
            CharMatcher::Any
            | CharMatcher::None
            | CharMatcher::Is(_)
            | CharMatcher::IsNot(_)
            | CharMatcher::InRange(..)
            | CharMatcher::SmallSet(_)
            | CharMatcher::BitSet(_) => true,
            CharMatcher::AnyOf(set) => set.len() <= 2,
            CharMatcher::Named(classifier) => classifier.is_fast(),
            CharMatcher::Negate(inner) => inner.is_fast(),
            CharMatcher::And(..) | CharMatcher::Or(..) | CharMatcher::Predicate(_) => false,
        }
    }

    /// Set the bit of every matching code unit in `table`; other bits are untouched.
    pub fn set_bits(&self, table: &mut BitSet) {
        match self {
            CharMatcher::Any => table.set_range(0, CodeUnit::MAX),
            CharMatcher::None => {}
            CharMatcher::Is(c) => table.set(*c),
            CharMatcher::IsNot(c) => {
                if *c > 0 {
                    table.set_range(0, c - 1);
                }
                if *c < CodeUnit::MAX {
                    table.set_range(c + 1, CodeUnit::MAX);
                }
            }
            CharMatcher::AnyOf(set) => {
                for &c in set.as_slice() {
                    table.set(c);
                }
            }
            CharMatcher::InRange(lo, hi) => table.set_range(*lo, *hi),
            CharMatcher::Named(classifier) => classifier.set_bits(table),
            CharMatcher::Or(first, second) => {
                first.set_bits(table);
                second.set_bits(table);
            }
            CharMatcher::Negate(inner) => {
                let mut tmp = BitSet::new();
                inner.set_bits(&mut tmp);
                tmp.flip_all();
                table.union_with(&tmp);
            }
            CharMatcher::SmallSet(m) => m.set_bits(table),
            CharMatcher::BitSet(m) => m.set_bits(table),
            CharMatcher::And(..) | CharMatcher::Predicate(_) => {
                for c in 0..=CodeUnit::MAX {
                    if self.matches(c) {
                        table.set(c);
                    }
                }
            }
        }
    }
}

impl CharPredicate for CharMatcher {
    #[inline]
    fn matches(&self, c: CodeUnit) -> bool {
        match self {
            CharMatcher::Any => true,
            CharMatcher::None => false,
            CharMatcher::Is(m) => c == *m,
            CharMatcher::IsNot(m) => c != *m,
            CharMatcher::AnyOf(set) => set.contains(c),
            CharMatcher::InRange(lo, hi) => *lo <= c && c <= *hi,
            CharMatcher::Named(classifier) => classifier.matches(c),
            CharMatcher::And(first, second) => first.matches(c) && second.matches(c),
            CharMatcher::Or(first, second) => first.matches(c) || second.matches(c),
            CharMatcher::Negate(inner) => !inner.matches(c),
            CharMatcher::Predicate(predicate) => predicate.matches(c),
            CharMatcher::SmallSet(m) => m.matches(c),
            CharMatcher::BitSet(m) => m.matches(c),
        }
    }
}

/// `\uXXXX` with uppercase hex digits
struct ShowUnit(CodeUnit);

impl fmt::Display for ShowUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\\u{:04X}", self.0)
    }
}

impl fmt::Display for CharMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharMatcher::Any => f.write_str("CharMatcher::any()"),
            CharMatcher::None => f.write_str("CharMatcher::none()"),
            CharMatcher::Is(c) => write!(f, "CharMatcher::is('{}')", ShowUnit(*c)),
            CharMatcher::IsNot(c) => write!(f, "CharMatcher::is_not('{}')", ShowUnit(*c)),
            CharMatcher::AnyOf(set) => {
                f.write_str("CharMatcher::any_of(\"")?;
                for &c in set.as_slice() {
                    write!(f, "{}", ShowUnit(c))?;
                }
                f.write_str("\")")
            }
            CharMatcher::InRange(lo, hi) => write!(
                f,
                "CharMatcher::in_range('{}', '{}')",
                ShowUnit(*lo),
                ShowUnit(*hi)
            ),
            CharMatcher::Named(classifier) => write!(f, "CharMatcher::{}()", classifier.name()),
            CharMatcher::And(first, second) => write!(f, "CharMatcher::and({first}, {second})"),
            CharMatcher::Or(first, second) => write!(f, "CharMatcher::or({first}, {second})"),
            CharMatcher::Negate(inner) => write!(f, "{inner}.negate()"),
            CharMatcher::Predicate(_) => f.write_str("CharMatcher::from_predicate(..)"),
            CharMatcher::SmallSet(m) => f.write_str(m.description()),
            CharMatcher::BitSet(m) => f.write_str(m.description()),
        }
    }
}

impl fmt::Debug for CharMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl PartialEq for CharMatcher {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CharMatcher::Any, CharMatcher::Any) | (CharMatcher::None, CharMatcher::None) => true,
            (CharMatcher::Is(a), CharMatcher::Is(b))
            | (CharMatcher::IsNot(a), CharMatcher::IsNot(b)) => a == b,
            (CharMatcher::AnyOf(a), CharMatcher::AnyOf(b)) => a == b,
            (CharMatcher::InRange(lo1, hi1), CharMatcher::InRange(lo2, hi2)) => {
                lo1 == lo2 && hi1 == hi2
            }
            (CharMatcher::Named(a), CharMatcher::Named(b)) => a == b,
            (CharMatcher::And(a1, b1), CharMatcher::And(a2, b2))
            | (CharMatcher::Or(a1, b1), CharMatcher::Or(a2, b2)) => a1 == a2 && b1 == b2,
            (CharMatcher::Negate(a), CharMatcher::Negate(b)) => a == b,
            (CharMatcher::Predicate(a), CharMatcher::Predicate(b)) => {
                Arc::ptr_eq(a, b)
            }
            (CharMatcher::SmallSet(a), CharMatcher::SmallSet(b)) => a.same_as(b),
            (CharMatcher::BitSet(a), CharMatcher::BitSet(b)) => a.same_as(b),
            _ => false,
        }
    }
}
