//! Text operations shared by every matcher.
//!
//! Text is a slice of UTF-16 code units; an owned `Vec<u16>` buffer derefs to the
//! same slice and behaves identically. Operations that build new text return
//! `Cow::Borrowed(input)` when nothing changed, and trimming returns a sub-slice
//! of the input.

use std::borrow::Cow;

use crate::error::{MatchError, Result};
use crate::matcher::{CharMatcher, CharPredicate};
use crate::types::CodeUnit;

impl CharMatcher {
    /// Offset of the first matching code unit.
    pub fn index_in(&self, seq: &[CodeUnit]) -> Option<usize> {
        seq.iter().position(|&c| self.matches(c))
    }

    /// Offset of the first matching code unit at or after `start`.
    ///
    /// `start == seq.len()` is legal and finds nothing.
    pub fn index_in_from(&self, seq: &[CodeUnit], start: usize) -> Result<Option<usize>> {
        if start > seq.len() {
            return Err(MatchError::IndexOutOfBounds {
                index: start,
                len: seq.len(),
            });
        }
        Ok(self.index_in(&seq[start..]).map(|i| i + start))
    }

    /// Offset of the last matching code unit.
    pub fn last_index_in(&self, seq: &[CodeUnit]) -> Option<usize> {
        seq.iter().rposition(|&c| self.matches(c))
    }

    /// True for empty input.
    pub fn matches_all_of(&self, seq: &[CodeUnit]) -> bool {
        seq.iter().all(|&c| self.matches(c))
    }

    /// False for empty input.
    pub fn matches_any_of(&self, seq: &[CodeUnit]) -> bool {
        seq.iter().any(|&c| self.matches(c))
    }

    /// True for empty input.
    pub fn matches_none_of(&self, seq: &[CodeUnit]) -> bool {
        !self.matches_any_of(seq)
    }

    pub fn count_in(&self, seq: &[CodeUnit]) -> usize {
        seq.iter().filter(|&&c| self.matches(c)).count()
    }

    /// Delete every matching code unit.
    pub fn remove_from<'a>(&self, seq: &'a [CodeUnit]) -> Cow<'a, [CodeUnit]> {
        self.filter_from(seq, false)
    }

    /// Keep only the matching code units.
    pub fn retain_from<'a>(&self, seq: &'a [CodeUnit]) -> Cow<'a, [CodeUnit]> {
        self.filter_from(seq, true)
    }

    fn filter_from<'a>(&self, seq: &'a [CodeUnit], keep: bool) -> Cow<'a, [CodeUnit]> {
        let Some(first) = seq.iter().position(|&c| self.matches(c) != keep) else {
            return Cow::Borrowed(seq);
        };
        let mut out = Vec::with_capacity(seq.len() - 1);
        out.extend_from_slice(&seq[..first]);
        out.extend(
            seq[first + 1..]
                .iter()
                .copied()
                .filter(|&c| self.matches(c) == keep),
        );
        Cow::Owned(out)
    }

    /// Replace every matching code unit with `replacement`.
    pub fn replace_from<'a>(
        &self,
        seq: &'a [CodeUnit],
        replacement: CodeUnit,
    ) -> Cow<'a, [CodeUnit]> {
        let Some(first) = self.index_in(seq) else {
            return Cow::Borrowed(seq);
        };
        let mut out = seq.to_vec();
        out[first] = replacement;
        for c in &mut out[first + 1..] {
            if self.matches(*c) {
                *c = replacement;
            }
        }
        Cow::Owned(out)
    }

    /// Replace every matching code unit with the whole of `replacement`.
    pub fn replace_from_units<'a>(
        &self,
        seq: &'a [CodeUnit],
        replacement: &[CodeUnit],
    ) -> Cow<'a, [CodeUnit]> {
        match replacement {
            [] => return self.remove_from(seq),
            [single] => return self.replace_from(seq, *single),
            _ => {}
        }
        let Some(first) = self.index_in(seq) else {
            return Cow::Borrowed(seq);
        };
        let mut out = Vec::with_capacity(seq.len() + replacement.len());
        out.extend_from_slice(&seq[..first]);
        for &c in &seq[first..] {
            if self.matches(c) {
                out.extend_from_slice(replacement);
            } else {
                out.push(c);
            }
        }
        Cow::Owned(out)
    }

    /// Strip matching code units from both ends.
    pub fn trim_from<'a>(&self, seq: &'a [CodeUnit]) -> &'a [CodeUnit] {
        self.trim_trailing_from(self.trim_leading_from(seq))
    }

    pub fn trim_leading_from<'a>(&self, seq: &'a [CodeUnit]) -> &'a [CodeUnit] {
        match seq.iter().position(|&c| !self.matches(c)) {
            Some(first) => &seq[first..],
            None => &seq[seq.len()..],
        }
    }

    pub fn trim_trailing_from<'a>(&self, seq: &'a [CodeUnit]) -> &'a [CodeUnit] {
        match seq.iter().rposition(|&c| !self.matches(c)) {
            Some(last) => &seq[..=last],
            None => &seq[..0],
        }
    }

    /// Replace each run of matching code units with a single `replacement`.
    ///
    /// Runs at either end are collapsed too, not removed.
    pub fn collapse_from<'a>(
        &self,
        seq: &'a [CodeUnit],
        replacement: CodeUnit,
    ) -> Cow<'a, [CodeUnit]> {
        let len = seq.len();
        let mut i = 0;
        while i < len {
            let c = seq[i];
            if self.matches(c) {
                if c == replacement && (i == len - 1 || !self.matches(seq[i + 1])) {
                    // Already a lone replacement; the next unit is known not to match.
                    i += 1;
                } else {
                    let mut out = Vec::with_capacity(len);
                    out.extend_from_slice(&seq[..i]);
                    out.push(replacement);
                    self.finish_collapse(&seq[i + 1..], replacement, &mut out, true);
                    return Cow::Owned(out);
                }
            }
            i += 1;
        }
        Cow::Borrowed(seq)
    }

    /// Remove runs at either end, then collapse interior runs to one `replacement`.
    pub fn trim_and_collapse_from<'a>(
        &self,
        seq: &'a [CodeUnit],
        replacement: CodeUnit,
    ) -> Cow<'a, [CodeUnit]> {
        self.collapse_from(self.trim_from(seq), replacement)
    }

    fn finish_collapse(
        &self,
        rest: &[CodeUnit],
        replacement: CodeUnit,
        out: &mut Vec<CodeUnit>,
        mut in_run: bool,
    ) {
        for &c in rest {
            if self.matches(c) {
                if !in_run {
                    out.push(replacement);
                    in_run = true;
                }
            } else {
                out.push(c);
                in_run = false;
            }
        }
    }
}
