//! Table-scoped identifier issuance.
//!
//! Identifiers are version-4 UUIDs whose 128 random bits come from the
//! table's own RNG stream, so a seeded run reissues the same ids.
//! RULE: an IdGenerator lives for exactly one table run. Uniqueness is
//! guaranteed within that run only; nothing is shared across tables.

use crate::{rng::TableRng, types::EntityId};
use std::collections::HashSet;
use uuid::{Builder, Uuid};

pub struct IdGenerator {
    table: &'static str,
    issued: HashSet<EntityId>,
    collisions: u64,
}

impl IdGenerator {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            issued: HashSet::new(),
            collisions: 0,
        }
    }

    /// Issue an identifier never handed out before by this generator.
    pub fn next_id(&mut self, rng: &mut TableRng) -> EntityId {
        loop {
            let candidate = random_uuid(rng).hyphenated().to_string();
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
            self.collisions += 1;
            log::warn!(
                "{}: identifier collision on {candidate}, retrying ({} so far)",
                self.table,
                self.collisions
            );
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.issued.contains(id)
    }

    pub fn issued(&self) -> usize {
        self.issued.len()
    }

    pub fn collisions(&self) -> u64 {
        self.collisions
    }

    /// Pre-register an identifier so it is never reissued.
    /// Returns false if it was already known.
    pub fn reserve(&mut self, id: &str) -> bool {
        self.issued.insert(id.to_string())
    }
}

fn random_uuid(rng: &mut TableRng) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    Builder::from_random_bytes(bytes).into_uuid()
}
