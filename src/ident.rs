//! Identifier generation for newly minted metadata objects.
//!
//! Every cloned entity needs fresh 128-bit identifiers for its root, its
//! generated types and its registry records. Generators are stateless apart
//! from what they need to produce the next value; collisions between random
//! identifiers are not checked.
//!
//! [`IdMap`] remembers which new identifier replaced which source identifier,
//! so an object that shows up in several files keeps one identity in the
//! clone.

use std::collections::HashMap;

use uuid::Uuid;

/// Source of fresh identifiers.
pub trait IdGenerator {
    /// Produce the next identifier.
    fn next_id(&mut self) -> Uuid;
}

/// Random version 4 UUIDs. This is what real runs use.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic identifiers counting up from a seed.
///
/// Two runs started from the same seed produce the same identifiers in the
/// same order, which makes whole-run output reproducible.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u128,
}

impl SequentialIds {
    pub fn starting_at(seed: u128) -> Self {
        Self { next: seed }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> Uuid {
        let id = Uuid::from_u128(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for &mut G {
    fn next_id(&mut self) -> Uuid {
        (**self).next_id()
    }
}

/// Replacements for the identifiers of a source entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdMap {
    replaced: HashMap<String, Uuid>,
}

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The replacement for `old`, taken from `ids` the first time `old` is
    /// seen. Identifiers are compared case-insensitively.
    pub fn replace<G: IdGenerator>(&mut self, old: &str, ids: &mut G) -> Uuid {
        *self
            .replaced
            .entry(old.trim().to_ascii_lowercase())
            .or_insert_with(|| ids.next_id())
    }

    /// The replacement already assigned to `old`, if any.
    pub fn get(&self, old: &str) -> Option<Uuid> {
        self.replaced.get(&old.trim().to_ascii_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.replaced.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replaced.is_empty()
    }
}
