//! Per-table generation state.
//!
//! One GenContext lives for one table run. It owns that table's RNG
//! stream and identifier registry; the faker and clock are shared
//! read-only across tables.

use crate::{
    clock::ReferenceClock,
    faker::TextFaker,
    identity::IdGenerator,
    rng::TableRng,
    types::EntityId,
};

pub struct GenContext<'a> {
    pub rng: TableRng,
    pub ids: IdGenerator,
    pub faker: &'a dyn TextFaker,
    pub clock: ReferenceClock,
}

impl<'a> GenContext<'a> {
    pub fn new(
        rng: TableRng,
        table: &'static str,
        faker: &'a dyn TextFaker,
        clock: ReferenceClock,
    ) -> Self {
        Self {
            rng,
            ids: IdGenerator::new(table),
            faker,
            clock,
        }
    }

    pub fn next_id(&mut self) -> EntityId {
        self.ids.next_id(&mut self.rng)
    }
}
