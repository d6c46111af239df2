//! Finished tables and the read-only parent index child tables sample from.

use crate::{
    account::Account,
    corruption::CorruptionTally,
    credit_history::CreditHistoryEntry,
    customer::Customer,
    entity::{Entity, Value},
    rng::TableRng,
    transaction::Transaction,
    types::{EntityId, RowOrigin},
};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow<E> {
    pub record: E,
    pub origin: RowOrigin,
}

/// An ordered, append-only sequence of rows of one entity type.
#[derive(Debug, Clone)]
pub struct Table<E: Entity> {
    rows: Vec<TableRow<E>>,
    defects: CorruptionTally,
}

impl<E: Entity> Default for Table<E> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            defects: CorruptionTally::new(),
        }
    }
}

impl<E: Entity> Table<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: E, origin: RowOrigin) {
        self.rows.push(TableRow { record, origin });
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[TableRow<E>] {
        &self.rows
    }

    pub fn records(&self) -> impl Iterator<Item = &E> {
        self.rows.iter().map(|r| &r.record)
    }

    pub fn with_origin(&self, origin: RowOrigin) -> impl Iterator<Item = &E> {
        self.rows
            .iter()
            .filter(move |r| r.origin == origin)
            .map(|r| &r.record)
    }

    pub fn count_origin(&self, origin: RowOrigin) -> usize {
        self.rows.iter().filter(|r| r.origin == origin).count()
    }

    pub fn defects(&self) -> &CorruptionTally {
        &self.defects
    }

    pub(crate) fn set_defects(&mut self, defects: CorruptionTally) {
        self.defects = defects;
    }

    pub fn parent_index(&self) -> ParentIndex {
        ParentIndex::new(E::TABLE, self.records().map(|r| r.id().to_string()))
    }
}

/// Identifier → existence, plus the ordered list sampling draws from.
/// Built once per parent table; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ParentIndex {
    table: &'static str,
    ids: Vec<EntityId>,
    members: HashSet<EntityId>,
}

impl ParentIndex {
    /// Keeps every id in order, repeats included, so sampling weights a
    /// duplicated parent row like any other row.
    pub fn new(table: &'static str, ids: impl IntoIterator<Item = EntityId>) -> Self {
        let ids: Vec<EntityId> = ids.into_iter().collect();
        let members = ids.iter().cloned().collect();
        Self { table, ids, members }
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Uniform pick. Panics on an empty index; callers check first.
    pub fn sample(&self, rng: &mut TableRng) -> &str {
        rng.pick(&self.ids).as_str()
    }
}

/// Schema-level view of a table, independent of its entity type.
pub trait TableView {
    fn name(&self) -> &'static str;
    fn columns(&self) -> &'static [&'static str];
    fn row_count(&self) -> usize;
    fn value_rows(&self) -> Vec<Vec<Value>>;
    fn defects(&self) -> &CorruptionTally;
}

impl<E: Entity> TableView for Table<E> {
    fn name(&self) -> &'static str {
        E::TABLE
    }

    fn columns(&self) -> &'static [&'static str] {
        E::COLUMNS
    }

    fn row_count(&self) -> usize {
        self.len()
    }

    fn value_rows(&self) -> Vec<Vec<Value>> {
        self.records().map(E::to_row).collect()
    }

    fn defects(&self) -> &CorruptionTally {
        &self.defects
    }
}

/// The four finished tables of one run.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub customers: Table<Customer>,
    pub accounts: Table<Account>,
    pub transactions: Table<Transaction>,
    pub credit_history: Table<CreditHistoryEntry>,
}

impl Dataset {
    /// Tables in generation order.
    pub fn tables(&self) -> [&dyn TableView; 4] {
        [
            &self.customers,
            &self.accounts,
            &self.transactions,
            &self.credit_history,
        ]
    }

    pub fn total_rows(&self) -> usize {
        self.tables().iter().map(|t| t.row_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, TableSlot};

    #[test]
    fn parent_index_keeps_order_and_repeats() {
        let index = ParentIndex::new("customers", ["a", "b", "a"].map(String::from));
        assert_eq!(index.len(), 3);
        assert_eq!(index.iter().collect::<Vec<_>>(), vec!["a", "b", "a"]);
        assert!(index.contains("b"));
        assert!(!index.contains("c"));
    }

    #[test]
    fn parent_index_samples_members_only() {
        let index = ParentIndex::new("accounts", ["x", "y", "z"].map(String::from));
        assert_eq!(index.table(), "accounts");
        let mut rng = RngBank::new(8).for_table(TableSlot::Transactions);
        let mut seen = HashSet::new();
        for _ in 0..100 {
            let id: &str = index.sample(&mut rng);
            assert!(index.contains(id));
            seen.insert(id.to_string());
        }
        assert_eq!(seen.len(), 3);
    }
}
