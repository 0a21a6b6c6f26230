// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Anthologize-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Anthologize and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use rand::Rng;

/// A stable identifier used across the model and persistence surfaces.
///
/// The id is treated as opaque; it only has to be a non-empty value that
/// contains no `/`, because ids appear as path segments in store documents
/// and debug output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

/// Alphabet for generated ids. Lowercase, no lookalike characters and almost
/// no vowels, so an id stays easy to read aloud.
pub const SPEAKABLE_ALPHABET: &[u8] = b"245689bcdfghjkmnpqrstvwxyza";

/// Length of generated ids.
pub const SPEAKABLE_ID_LEN: usize = 16;

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        validate_id_segment(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    /// Generates a fresh id from [`SPEAKABLE_ALPHABET`] using the supplied
    /// random source. Tests pass a seeded generator to stay deterministic.
    pub fn speakable(rng: &mut impl Rng) -> Self {
        let value = (0..SPEAKABLE_ID_LEN)
            .map(|_| SPEAKABLE_ALPHABET[rng.gen_range(0..SPEAKABLE_ALPHABET.len())] as char)
            .collect::<String>();
        Self {
            value,
            _marker: PhantomData,
        }
    }

    /// [`Id::speakable`] seeded from the thread-local random source.
    pub fn random() -> Self {
        Self::speakable(&mut rand::thread_rng())
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<T> Borrow<str> for Id<T> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl<T> TryFrom<String> for Id<T> {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    Empty,
    ContainsSlash,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("id must not be empty"),
            Self::ContainsSlash => f.write_str("id must not contain '/'"),
        }
    }
}

impl std::error::Error for IdError {}

fn validate_id_segment(value: &str) -> Result<(), IdError> {
    if value.is_empty() {
        return Err(IdError::Empty);
    }
    if value.contains('/') {
        return Err(IdError::ContainsSlash);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemIdTag {}
pub type ItemId = Id<ItemIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BulletKeyTag {}
pub type BulletKey = Id<BulletKeyTag>;

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::{Id, IdError, SPEAKABLE_ALPHABET, SPEAKABLE_ID_LEN};

    #[test]
    fn id_rejects_empty() {
        let result: Result<Id<()>, _> = Id::new("");
        assert_eq!(result, Err(IdError::Empty));
    }

    #[test]
    fn id_rejects_slash() {
        let result: Result<Id<()>, _> = Id::new("a/b");
        assert_eq!(result, Err(IdError::ContainsSlash));
    }

    #[test]
    fn speakable_id_uses_the_alphabet() {
        let mut rng = StdRng::seed_from_u64(7);
        let id: Id<()> = Id::speakable(&mut rng);
        assert_eq!(id.as_str().len(), SPEAKABLE_ID_LEN);
        assert!(id
            .as_str()
            .bytes()
            .all(|b| SPEAKABLE_ALPHABET.contains(&b)));
    }

    #[test]
    fn speakable_id_is_deterministic_per_seed() {
        let a: Id<()> = Id::speakable(&mut StdRng::seed_from_u64(42));
        let b: Id<()> = Id::speakable(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
