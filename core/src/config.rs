use crate::{
    account::Account,
    corruption::{apply_overrides, CorruptionRule},
    credit_history::CreditHistoryEntry,
    customer::Customer,
    entity::Entity,
    error::{GenError, GenResult},
    faker::Locale,
    transaction::Transaction,
};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Requested primary-row volumes. Signed so a negative count in a config
/// file reaches validation instead of failing to parse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RowCounts {
    pub customers: i64,
    pub accounts: i64,
    pub transactions: i64,
}

impl Default for RowCounts {
    fn default() -> Self {
        Self {
            customers: 5_000,
            accounts: 8_000,
            transactions: 20_000,
        }
    }
}

/// Fraction of primary rows re-appended as verbatim duplicates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DuplicateFractions {
    pub customers: f64,
    pub accounts: f64,
    pub transactions: f64,
    pub credit_history: f64,
}

impl Default for DuplicateFractions {
    fn default() -> Self {
        Self {
            customers: 0.02,
            accounts: 0.0,
            transactions: 0.01,
            credit_history: 0.0,
        }
    }
}

/// Extra rows with an invalid parent reference, as a fraction of the
/// requested count. Only accounts are orphaned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OrphanFractions {
    pub accounts: f64,
}

impl Default for OrphanFractions {
    fn default() -> Self {
        Self { accounts: 0.01 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CorruptionSettings {
    pub enabled: bool,
    /// Rule label (`<column>.<operator>`) → replacement probability.
    pub overrides: BTreeMap<String, f64>,
}

impl Default for CorruptionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            overrides: BTreeMap::new(),
        }
    }
}

impl CorruptionSettings {
    /// The entity's default rules with overrides applied, or no rules at
    /// all when disabled. Overrides are checked either way.
    pub fn resolve<E: Entity>(&self) -> GenResult<Vec<CorruptionRule<E>>> {
        let mut rules = E::default_rules();
        apply_overrides(&mut rules, &self.overrides)?;
        if !self.enabled {
            rules.clear();
        }
        Ok(rules)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct CorruptionConfig {
    pub customers: CorruptionSettings,
    pub accounts: CorruptionSettings,
    pub transactions: CorruptionSettings,
    pub credit_history: CorruptionSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub seed: u64,
    /// The run's "now". Every date in the output is drawn relative to it.
    pub reference_time: NaiveDateTime,
    pub row_counts: RowCounts,
    pub duplicates: DuplicateFractions,
    pub orphans: OrphanFractions,
    /// Inclusive range of history entries per customer row.
    pub credit_history_per_customer: (u32, u32),
    pub locales: Vec<Locale>,
    pub corruption: CorruptionConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            reference_time: default_reference_time(),
            row_counts: RowCounts::default(),
            duplicates: DuplicateFractions::default(),
            orphans: OrphanFractions::default(),
            credit_history_per_customer: (1, 5),
            locales: Locale::ALL.to_vec(),
            corruption: CorruptionConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Load from a JSON file. Missing keys take their defaults.
    pub fn load(path: &str) -> GenResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| GenError::Config(format!("Cannot read {path}: {e}")))?;
        let config: GeneratorConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject anything that would yield partial or meaningless output.
    pub fn validate(&self) -> GenResult<()> {
        row_count("customers", self.row_counts.customers)?;
        row_count("accounts", self.row_counts.accounts)?;
        row_count("transactions", self.row_counts.transactions)?;

        let fractions = [
            ("duplicates.customers", self.duplicates.customers),
            ("duplicates.accounts", self.duplicates.accounts),
            ("duplicates.transactions", self.duplicates.transactions),
            ("duplicates.credit_history", self.duplicates.credit_history),
            ("orphans.accounts", self.orphans.accounts),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(GenError::InvalidFraction {
                    name: name.to_string(),
                    value,
                });
            }
        }

        let (lo, hi) = self.credit_history_per_customer;
        if lo > hi {
            return Err(GenError::Config(format!(
                "credit_history_per_customer range is inverted: [{lo}, {hi}]"
            )));
        }
        if self.locales.is_empty() {
            return Err(GenError::Config("locales must not be empty".into()));
        }

        self.corruption.customers.resolve::<Customer>()?;
        self.corruption.accounts.resolve::<Account>()?;
        self.corruption.transactions.resolve::<Transaction>()?;
        self.corruption.credit_history.resolve::<CreditHistoryEntry>()?;
        Ok(())
    }

    /// Small fixed configuration for tests.
    pub fn default_test() -> Self {
        Self {
            seed: 0x5EED_1234,
            reference_time: at_unix_seconds(TEST_REFERENCE_SECS),
            row_counts: RowCounts {
                customers: 200,
                accounts: 300,
                transactions: 600,
            },
            ..Self::default()
        }
    }
}

/// 2025-01-01 00:00:00.
const DEFAULT_REFERENCE_SECS: i64 = 1_735_689_600;
/// 2025-06-30 12:00:00.
const TEST_REFERENCE_SECS: i64 = 1_751_284_800;

/// Fixed "now" used when a config does not name one.
pub fn default_reference_time() -> NaiveDateTime {
    at_unix_seconds(DEFAULT_REFERENCE_SECS)
}

fn at_unix_seconds(secs: i64) -> NaiveDateTime {
    NaiveDateTime::default() + Duration::seconds(secs)
}

/// A validated, non-negative row count.
pub fn row_count(table: &str, count: i64) -> GenResult<usize> {
    usize::try_from(count).map_err(|_| GenError::InvalidRowCount {
        table: table.to_string(),
        count,
    })
}
