//! Table assembler: turns the config into four finished tables.
//!
//! EXECUTION ORDER (fixed, never reordered):
//!   1. customers        (no parent)
//!   2. accounts         (samples customers, then orphans)
//!   3. transactions     (samples accounts, orphans included)
//!   4. credit_history   (walks every customer row in order)
//!
//! Within one table:
//!   primary rows (synthesize → corrupt → finalize), then duplicates,
//!   then orphans.
//!
//! RULES:
//!   - Each table draws from its own RNG slot. Generating one table never
//!     moves another table's stream.
//!   - A parent table is read-only once its ParentIndex is built.
//!   - Duplicates copy primary rows verbatim, identifiers included.
//!   - Orphans are nominal: they skip the corruptor.

use crate::{
    account::Account,
    clock::ReferenceClock,
    config::{row_count, GeneratorConfig},
    context::GenContext,
    corruption::{CorruptionRule, Corruptor},
    credit_history::CreditHistoryEntry,
    customer::Customer,
    entity::Entity,
    error::{GenError, GenResult},
    faker::CuratedFaker,
    rng::{RngBank, TableSlot},
    table::{Dataset, ParentIndex, Table},
    transaction::Transaction,
    types::{RowOrigin, ORPHAN_CUSTOMER_ID},
};

pub struct DatasetGenerator {
    config: GeneratorConfig,
    rng_bank: RngBank,
    faker: CuratedFaker,
    clock: ReferenceClock,
    customer_rules: Vec<CorruptionRule<Customer>>,
    account_rules: Vec<CorruptionRule<Account>>,
    transaction_rules: Vec<CorruptionRule<Transaction>>,
    credit_history_rules: Vec<CorruptionRule<CreditHistoryEntry>>,
}

impl DatasetGenerator {
    /// Validate the config and resolve every table's rule list up front,
    /// so a bad config fails before any row is produced.
    pub fn new(config: GeneratorConfig) -> GenResult<Self> {
        config.validate()?;

        let corruption = &config.corruption;
        let customer_rules = corruption.customers.resolve::<Customer>()?;
        let account_rules = corruption.accounts.resolve::<Account>()?;
        let transaction_rules = corruption.transactions.resolve::<Transaction>()?;
        let credit_history_rules = corruption.credit_history.resolve::<CreditHistoryEntry>()?;

        Ok(Self {
            rng_bank: RngBank::new(config.seed),
            faker: CuratedFaker::new(&config.locales),
            clock: ReferenceClock::new(config.reference_time),
            customer_rules,
            account_rules,
            transaction_rules,
            credit_history_rules,
            config,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.rng_bank.seed()
    }

    pub fn clock(&self) -> &ReferenceClock {
        &self.clock
    }

    /// Build all four tables in dependency order using the configured
    /// row counts.
    pub fn generate_all(&self) -> GenResult<Dataset> {
        let counts = &self.config.row_counts;
        let customers = self.generate_customers(row_count("customers", counts.customers)?);
        let accounts =
            self.generate_accounts(row_count("accounts", counts.accounts)?, &customers)?;
        let transactions = self
            .generate_transactions(row_count("transactions", counts.transactions)?, &accounts)?;
        let credit_history = self.generate_credit_history(&customers);

        let dataset = Dataset {
            customers,
            accounts,
            transactions,
            credit_history,
        };
        log::info!(
            "Dataset complete: seed={} rows={} reference_time={}",
            self.seed(),
            dataset.total_rows(),
            self.clock.now()
        );
        Ok(dataset)
    }

    pub fn generate_customers(&self, count: usize) -> Table<Customer> {
        let mut ctx = self.context::<Customer>(TableSlot::Customers);
        let mut table = self.primary_rows(&mut ctx, count, &self.customer_rules, Customer::synthesize);
        inject_duplicates(&mut table, &mut ctx, self.config.duplicates.customers);
        log_table(&table);
        table
    }

    /// `count` primary accounts, each owned by a uniformly sampled customer
    /// row, followed by duplicates and orphans.
    pub fn generate_accounts(
        &self,
        count: usize,
        customers: &Table<Customer>,
    ) -> GenResult<Table<Account>> {
        let parents = require_parent::<Account, _>(customers, count)?;
        let mut ctx = self.context::<Account>(TableSlot::Accounts);

        let mut table = self.primary_rows(&mut ctx, count, &self.account_rules, |ctx| {
            let customer_id = parents.sample(&mut ctx.rng).to_string();
            Account::synthesize(ctx, customer_id)
        });
        inject_duplicates(&mut table, &mut ctx, self.config.duplicates.accounts);

        let orphans = (count as f64 * self.config.orphans.accounts).floor() as usize;
        for _ in 0..orphans {
            let orphan = Account::synthesize(&mut ctx, ORPHAN_CUSTOMER_ID.to_string());
            table.push(orphan, RowOrigin::Orphan);
        }

        log_table(&table);
        Ok(table)
    }

    /// `count` primary transactions over uniformly sampled account rows.
    /// Orphan accounts are valid parents here.
    pub fn generate_transactions(
        &self,
        count: usize,
        accounts: &Table<Account>,
    ) -> GenResult<Table<Transaction>> {
        let parents = require_parent::<Transaction, _>(accounts, count)?;
        let mut ctx = self.context::<Transaction>(TableSlot::Transactions);

        let mut table = self.primary_rows(&mut ctx, count, &self.transaction_rules, |ctx| {
            let account_id = parents.sample(&mut ctx.rng).to_string();
            Transaction::synthesize(ctx, account_id)
        });
        inject_duplicates(&mut table, &mut ctx, self.config.duplicates.transactions);

        log_table(&table);
        Ok(table)
    }

    /// Between the configured min and max entries for every customer row,
    /// in parent order. Duplicate customer rows get their own entries.
    pub fn generate_credit_history(&self, customers: &Table<Customer>) -> Table<CreditHistoryEntry> {
        let parents = customers.parent_index();
        let mut ctx = self.context::<CreditHistoryEntry>(TableSlot::CreditHistory);
        let mut corruptor = Corruptor::new();
        let mut table = Table::new();
        let (lo, hi) = self.config.credit_history_per_customer;

        for customer_id in parents.iter() {
            let entries = ctx.rng.int_inclusive(i64::from(lo), i64::from(hi));
            for _ in 0..entries {
                let entry = CreditHistoryEntry::synthesize(&mut ctx, customer_id.to_string());
                let entry = corruptor.corrupt(entry, &self.credit_history_rules, &mut ctx);
                table.push(entry, RowOrigin::Primary);
            }
        }
        table.set_defects(corruptor.into_tally());
        inject_duplicates(&mut table, &mut ctx, self.config.duplicates.credit_history);

        log_table(&table);
        table
    }

    // ── Internals ──────────────────────────────────────────────────────────

    fn context<E: Entity>(&self, slot: TableSlot) -> GenContext<'_> {
        GenContext::new(self.rng_bank.for_table(slot), E::TABLE, &self.faker, self.clock)
    }

    fn primary_rows<E, F>(
        &self,
        ctx: &mut GenContext<'_>,
        count: usize,
        rules: &[CorruptionRule<E>],
        mut synthesize: F,
    ) -> Table<E>
    where
        E: Entity,
        F: FnMut(&mut GenContext<'_>) -> E,
    {
        let mut corruptor = Corruptor::new();
        let mut table = Table::new();
        for _ in 0..count {
            let record = synthesize(ctx);
            let record = corruptor.corrupt(record, rules, ctx);
            table.push(record, RowOrigin::Primary);
        }
        table.set_defects(corruptor.into_tally());
        table
    }
}

/// Build the parent index, failing when rows are requested against an
/// empty parent table.
fn require_parent<E: Entity, P: Entity>(parent: &Table<P>, count: usize) -> GenResult<ParentIndex> {
    let index = parent.parent_index();
    if count > 0 && index.is_empty() {
        return Err(GenError::EmptyParent {
            table: E::TABLE.to_string(),
            parent: index.table().to_string(),
        });
    }
    log::debug!("{}: sampling from {} {} rows", E::TABLE, index.len(), index.table());
    Ok(index)
}

/// Append round(fraction × primary) rows copied from primary rows chosen
/// uniformly with replacement.
fn inject_duplicates<E: Entity>(table: &mut Table<E>, ctx: &mut GenContext<'_>, fraction: f64) {
    let primary = table.count_origin(RowOrigin::Primary);
    let duplicates = (primary as f64 * fraction).round() as usize;
    if primary == 0 || duplicates == 0 {
        return;
    }
    for _ in 0..duplicates {
        let index = ctx.rng.next_u64_below(primary as u64) as usize;
        let copy = table.rows()[index].record.clone();
        table.push(copy, RowOrigin::Duplicate);
    }
}

fn log_table<E: Entity>(table: &Table<E>) {
    log::info!(
        "Assembled {}: {} rows ({} primary, {} duplicate, {} orphan)",
        E::TABLE,
        table.len(),
        table.count_origin(RowOrigin::Primary),
        table.count_origin(RowOrigin::Duplicate),
        table.count_origin(RowOrigin::Orphan),
    );
    for (label, fired) in table.defects() {
        log::debug!("  {}: {label} fired {fired} times", E::TABLE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> DatasetGenerator {
        DatasetGenerator::new(GeneratorConfig::default_test()).unwrap()
    }

    #[test]
    fn primary_rows_come_first_then_duplicates_then_orphans() {
        let gen = generator();
        let customers = gen.generate_customers(100);
        let accounts = gen.generate_accounts(200, &customers).unwrap();

        let origins: Vec<RowOrigin> = accounts.rows().iter().map(|r| r.origin).collect();
        let first_orphan = origins.iter().position(|o| *o == RowOrigin::Orphan).unwrap();
        assert!(origins[..200].iter().all(|o| *o == RowOrigin::Primary));
        assert!(origins[first_orphan..].iter().all(|o| *o == RowOrigin::Orphan));
        assert_eq!(accounts.count_origin(RowOrigin::Orphan), 2);
    }

    #[test]
    fn duplicate_count_is_rounded_fraction_of_primary() {
        let gen = generator();
        let customers = gen.generate_customers(150);
        // 0.02 × 150 = 3
        assert_eq!(customers.count_origin(RowOrigin::Duplicate), 3);
        assert_eq!(customers.len(), 153);

        let primary_ids: Vec<&str> = customers
            .with_origin(RowOrigin::Primary)
            .map(|c| c.customer_id.as_str())
            .collect();
        for dup in customers.with_origin(RowOrigin::Duplicate) {
            assert!(primary_ids.contains(&dup.customer_id.as_str()));
        }
    }

    #[test]
    fn zero_count_yields_empty_table() {
        let gen = generator();
        let customers = gen.generate_customers(0);
        assert!(customers.is_empty());
        let accounts = gen.generate_accounts(0, &customers).unwrap();
        assert!(accounts.is_empty());
    }

    #[test]
    fn child_of_empty_parent_is_an_error() {
        let gen = generator();
        let customers = gen.generate_customers(0);
        let err = gen.generate_accounts(5, &customers).unwrap_err();
        match err {
            GenError::EmptyParent { table, parent } => {
                assert_eq!(table, "accounts");
                assert_eq!(parent, "customers");
            }
            other => panic!("expected EmptyParent, got {other}"),
        }
    }

    #[test]
    fn credit_history_walks_every_customer_row() {
        let gen = generator();
        let customers = gen.generate_customers(50);
        let history = gen.generate_credit_history(&customers);

        let parents = customers.parent_index();
        let mut per_parent = std::collections::HashMap::<&str, usize>::new();
        for entry in history.records() {
            assert!(parents.contains(&entry.customer_id));
            *per_parent.entry(entry.customer_id.as_str()).or_default() += 1;
        }
        for id in parents.iter() {
            let copies = parents.iter().filter(|p| *p == id).count();
            let n = per_parent.get(id).copied().unwrap_or(0);
            assert!(
                (copies..=5 * copies).contains(&n),
                "{id}: {n} entries for {copies} parent rows"
            );
        }
    }

    #[test]
    fn generator_exposes_its_validated_config() {
        let config = GeneratorConfig::default_test();
        let gen = DatasetGenerator::new(config.clone()).unwrap();
        assert_eq!(gen.config(), &config);
        assert_eq!(gen.seed(), config.seed);
        assert_eq!(gen.clock().now(), config.reference_time);
    }

    #[test]
    fn tables_do_not_share_streams() {
        let gen = generator();
        let customers = gen.generate_customers(40);
        let a = gen.generate_accounts(60, &customers).unwrap();

        // Regenerating customers must not move the account stream.
        let _ = gen.generate_customers(40);
        let b = gen.generate_accounts(60, &customers).unwrap();
        assert_eq!(a.rows(), b.rows());
    }
}
