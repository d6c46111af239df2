//! SQLite persistence for finished datasets.
//!
//! RULE: Only store.rs talks to the database.
//! Tables are written exactly as assembled: duplicates and orphan
//! references included, nulls stored as SQL NULL. Every data row is
//! tagged with the `run_id` from `insert_run`, and reads are scoped to
//! one run.

use crate::{
    account::Account,
    credit_history::CreditHistoryEntry,
    customer::Customer,
    entity::{Entity, Value, TIMESTAMP_FORMAT},
    error::{GenError, GenResult},
    table::{Dataset, TableView},
    transaction::Transaction,
};
use chrono::NaiveDateTime;
use rusqlite::{params, params_from_iter, types::Value as SqlValue, Connection};

pub struct DatasetStore {
    conn: Connection,
}

impl DatasetStore {
    /// Open (or create) the dataset database at `path`.
    pub fn open(path: &str) -> GenResult<Self> {
        let conn = Connection::open(path)?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |r| r.get(0))?;
        log::debug!("Opened {path} (journal_mode={mode})");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> GenResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> GenResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_dataset.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    /// Record one generation run. Returns the new run id.
    pub fn insert_run(
        &self,
        seed: u64,
        reference_time: NaiveDateTime,
        version: &str,
    ) -> GenResult<i64> {
        self.conn.execute(
            "INSERT INTO generation_run (seed, reference_time, version) VALUES (?1, ?2, ?3)",
            params![
                seed as i64,
                reference_time.format(TIMESTAMP_FORMAT).to_string(),
                version
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    // ── Tables ─────────────────────────────────────────────────

    /// Append every row of `table` under `run_id` inside one transaction.
    pub fn write_table(&self, run_id: i64, table: &dyn TableView) -> GenResult<()> {
        let columns = schema(table.name())?;
        let placeholders = vec!["?"; columns.len() + 1].join(", ");
        let sql = format!(
            "INSERT INTO {} (run_id, {}) VALUES ({})",
            table.name(),
            columns.join(", "),
            placeholders
        );

        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(&sql)?;
            for row in table.value_rows() {
                let values = std::iter::once(SqlValue::Integer(run_id))
                    .chain(row.into_iter().map(to_sql));
                stmt.execute(params_from_iter(values))?;
            }
        }
        tx.commit()?;
        log::debug!(
            "Stored {} rows into {} for run {run_id}",
            table.row_count(),
            table.name()
        );
        Ok(())
    }

    pub fn write_dataset(&self, run_id: i64, dataset: &Dataset) -> GenResult<()> {
        for table in dataset.tables() {
            self.write_table(run_id, table)?;
        }
        Ok(())
    }

    /// Rows of `table` written by `run_id`.
    pub fn row_count(&self, run_id: i64, table: &str) -> GenResult<u64> {
        schema(table)?;
        let n: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {table} WHERE run_id = ?1"),
            params![run_id],
            |r| r.get(0),
        )?;
        Ok(n as u64)
    }

    /// Nulls in `table.column` among the rows written by `run_id`.
    pub fn null_count(&self, run_id: i64, table: &str, column: &str) -> GenResult<u64> {
        if !schema(table)?.contains(&column) {
            return Err(GenError::Config(format!(
                "Unknown column '{column}' in table '{table}'"
            )));
        }
        let n: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {table} WHERE run_id = ?1 AND {column} IS NULL"),
            params![run_id],
            |r| r.get(0),
        )?;
        Ok(n as u64)
    }
}

/// Column list for a known table. Table and column names are spliced
/// into SQL, so anything outside the fixed schema is refused.
fn schema(table: &str) -> GenResult<&'static [&'static str]> {
    match table {
        t if t == Customer::TABLE => Ok(Customer::COLUMNS),
        t if t == Account::TABLE => Ok(Account::COLUMNS),
        t if t == Transaction::TABLE => Ok(Transaction::COLUMNS),
        t if t == CreditHistoryEntry::TABLE => Ok(CreditHistoryEntry::COLUMNS),
        _ => Err(GenError::Config(format!("Unknown table '{table}'"))),
    }
}

fn to_sql(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Text(s) => SqlValue::Text(s),
        Value::Int(n) => SqlValue::Integer(n),
        Value::Decimal(d) => SqlValue::Real(d),
        v @ (Value::Date(_) | Value::Timestamp(_)) => SqlValue::Text(v.render()),
    }
}
