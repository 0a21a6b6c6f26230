// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Anthologize-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Anthologize and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cmp::Ordering;
use std::fmt;

use smol_str::SmolStr;

/// Boundary characters of the key space. Every generated key sorts strictly
/// between them; neither is ever issued as a key value of its own.
const LOW_SENTINEL: &str = "a";
const HIGH_SENTINEL: &str = "z";

const BASE: u8 = 26;

/// An order key for one edge among its siblings.
///
/// Keys are short strings over `a..=z`, totally ordered by [`SortKey::cmp`]
/// with an explicit prefix rule: when one key is a strict prefix of another,
/// the prefix sorts first. New keys come from [`SortKey::between`], which
/// subdivides the gap between two neighbors without touching any other key.
///
/// A key never ends with the low boundary character: such a key would leave
/// no room between itself and its own prefix, which breaks subdivision.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortKey(SmolStr);

impl SortKey {
    pub fn new(value: impl AsRef<str>) -> Result<Self, SortKeyError> {
        let value = value.as_ref();
        if value.is_empty() {
            return Err(SortKeyError::Empty);
        }
        if let Some(ch) = value.chars().find(|ch| !ch.is_ascii_lowercase()) {
            return Err(SortKeyError::InvalidChar { ch });
        }
        if value.ends_with(LOW_SENTINEL) {
            return Err(SortKeyError::EndsWithLow);
        }
        Ok(Self(SmolStr::new(value)))
    }

    /// A key strictly between `after` and `before`; `None` stands for the
    /// low/high boundary of the key space.
    ///
    /// Subdivision is deterministic: strip the digits the bounds share, then
    /// either emit the midpoint digit of the first gap or descend past a
    /// pair of adjacent digits with the upper bound released. Repeated
    /// insertion at one spot grows the key instead of running out of room.
    ///
    /// # Panics
    ///
    /// Panics when the bounds are not in strictly ascending order. Two equal
    /// sibling keys mean ordering is already undefined, so this is treated
    /// as a broken invariant rather than a recoverable error.
    pub fn between(after: Option<&SortKey>, before: Option<&SortKey>) -> SortKey {
        let lo = after.map_or(LOW_SENTINEL, SortKey::as_str);
        let hi = before.map_or(HIGH_SENTINEL, SortKey::as_str);
        assert!(
            cmp_raw(lo, hi) == Ordering::Less,
            "sort key bounds out of order: {lo:?} is not below {hi:?}"
        );

        let digits = midpoint(&to_digits(lo), &to_digits(hi));
        SortKey(from_digits(&digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key is a bare boundary value. Stored keys must never be;
    /// the persistence boundary rejects such records.
    pub fn is_sentinel(&self) -> bool {
        self.0 == LOW_SENTINEL || self.0 == HIGH_SENTINEL
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_raw(self.as_str(), other.as_str())
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Character-by-character comparison with the prefix rule spelled out: the
/// side that runs out first sorts first.
fn cmp_raw(a: &str, b: &str) -> Ordering {
    let mut lhs = a.bytes();
    let mut rhs = b.bytes();
    loop {
        match (lhs.next(), rhs.next()) {
            (Some(x), Some(y)) => match x.cmp(&y) {
                Ordering::Equal => continue,
                diverged => return diverged,
            },
            // `b` is a strict prefix of `a`.
            (Some(_), None) => return Ordering::Greater,
            // `a` is a strict prefix of `b`.
            (None, Some(_)) => return Ordering::Less,
            (None, None) => return Ordering::Equal,
        }
    }
}

fn to_digits(key: &str) -> Vec<u8> {
    key.bytes().map(|b| b - b'a').collect()
}

fn from_digits(digits: &[u8]) -> SmolStr {
    digits.iter().map(|d| (b'a' + d) as char).collect()
}

/// Longest run of leading digits shared by the bounds, with `lo` padded by
/// zero digits once it runs out (a key and the same key with trailing zeros
/// denote the same position in the subdivision).
fn shared_prefix_len(lo: &[u8], hi: &[u8]) -> usize {
    let mut n = 0;
    while n < hi.len() {
        if lo.get(n).copied().unwrap_or(0) != hi[n] {
            break;
        }
        n += 1;
    }
    n
}

/// Digits strictly between `lo` and `hi`, where an empty `hi` means the
/// bound is released (unbounded above at this depth). The result never ends
/// in a zero digit.
fn midpoint(lo: &[u8], hi: &[u8]) -> Vec<u8> {
    if !hi.is_empty() {
        let n = shared_prefix_len(lo, hi);
        if n > 0 {
            let mut out = hi[..n].to_vec();
            out.extend(midpoint(lo.get(n..).unwrap_or(&[]), &hi[n..]));
            return out;
        }
    }

    let lo_digit = lo.first().copied().unwrap_or(0);
    let hi_digit = hi.first().copied().unwrap_or(BASE);
    if hi_digit - lo_digit > 1 {
        return vec![(lo_digit + hi_digit) / 2];
    }

    // Adjacent digits: keep the low digit and subdivide the tail with the
    // upper bound released.
    let mut out = vec![lo_digit];
    out.extend(midpoint(lo.get(1..).unwrap_or(&[]), &[]));
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKeyError {
    Empty,
    InvalidChar { ch: char },
    EndsWithLow,
}

impl fmt::Display for SortKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("sort key must not be empty"),
            Self::InvalidChar { ch } => {
                write!(f, "sort key may only contain 'a'..='z', found {ch:?}")
            }
            Self::EndsWithLow => {
                write!(f, "sort key must not end with the low boundary {LOW_SENTINEL:?}")
            }
        }
    }
}

impl std::error::Error for SortKeyError {}
