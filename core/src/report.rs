//! Data-quality report over a finished dataset.
//!
//! Counts what a downstream cleaning exercise would find: null cells,
//! repeated rows and the defects the corruptor injected.

use crate::{
    corruption::CorruptionTally,
    table::{Dataset, TableView},
};
use serde::Serialize;
use std::{collections::HashSet, fmt};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing: usize,
    /// Share of rows, 0–100.
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableReport {
    pub name: String,
    pub total_records: usize,
    pub total_columns: usize,
    pub missing_values: usize,
    /// Rows identical to an earlier row in the same table.
    pub duplicate_rows: usize,
    /// Every column, in schema order, including those with no nulls.
    pub missing_by_column: Vec<ColumnMissing>,
    /// Fired-rule counts from the corruptor, keyed by rule label.
    pub injected: CorruptionTally,
}

impl TableReport {
    pub fn build(table: &dyn TableView) -> Self {
        let columns = table.columns();
        let rows = table.value_rows();
        let total = rows.len();

        let mut missing = vec![0usize; columns.len()];
        let mut seen: HashSet<Vec<Option<String>>> = HashSet::with_capacity(total);
        let mut duplicate_rows = 0;

        for row in &rows {
            for (i, value) in row.iter().enumerate() {
                if value.is_null() {
                    missing[i] += 1;
                }
            }
            let key = row
                .iter()
                .map(|v| (!v.is_null()).then(|| v.render()))
                .collect();
            if !seen.insert(key) {
                duplicate_rows += 1;
            }
        }

        let missing_by_column = columns
            .iter()
            .zip(&missing)
            .map(|(column, &n)| ColumnMissing {
                column: column.to_string(),
                missing: n,
                percent: percent(n, total),
            })
            .collect();

        Self {
            name: table.name().to_string(),
            total_records: total,
            total_columns: columns.len(),
            missing_values: missing.iter().sum(),
            duplicate_rows,
            missing_by_column,
            injected: table.defects().clone(),
        }
    }

    pub fn missing_in(&self, column: &str) -> Option<usize> {
        self.missing_by_column
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.missing)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataQualityReport {
    pub tables: Vec<TableReport>,
}

impl DataQualityReport {
    pub fn build(dataset: &Dataset) -> Self {
        Self {
            tables: dataset.tables().into_iter().map(TableReport::build).collect(),
        }
    }

    pub fn table(&self, name: &str) -> Option<&TableReport> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn total_records(&self) -> usize {
        self.tables.iter().map(|t| t.total_records).sum()
    }

    /// Console form. Columns without nulls are left out.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DataQualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{rule}\nDATA QUALITY REPORT\n{rule}")?;
        for t in &self.tables {
            writeln!(f, "\n{} Dataset:", t.name.to_uppercase())?;
            writeln!(f, "Total Records: {}", t.total_records)?;
            writeln!(f, "Total Columns: {}", t.total_columns)?;
            writeln!(f, "Missing Values: {}", t.missing_values)?;
            writeln!(f, "Duplicate Rows: {}", t.duplicate_rows)?;
            if t.missing_values > 0 {
                writeln!(f, "Missing Values by Column:")?;
                for c in t.missing_by_column.iter().filter(|c| c.missing > 0) {
                    writeln!(f, "  {}: {} ({:.1}%)", c.column, c.missing, c.percent)?;
                }
            }
            if !t.injected.is_empty() {
                writeln!(f, "Injected Defects:")?;
                for (label, n) in &t.injected {
                    writeln!(f, "  {label}: {n}")?;
                }
            }
            writeln!(f, "{}", "-".repeat(40))?;
        }
        Ok(())
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 10_000.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assembler::DatasetGenerator, config::GeneratorConfig, customer::Customer, table::Table,
        types::RowOrigin,
    };

    fn customers() -> Table<Customer> {
        DatasetGenerator::new(GeneratorConfig::default_test())
            .unwrap()
            .generate_customers(100)
    }

    #[test]
    fn duplicate_rows_match_injected_duplicates() {
        let table = customers();
        let report = TableReport::build(&table);
        // Primary rows carry unique ids, so every repeat is an injected copy.
        assert_eq!(report.duplicate_rows, table.count_origin(RowOrigin::Duplicate));
        assert_eq!(report.total_records, table.len());
        assert_eq!(report.total_columns, 17);
    }

    #[test]
    fn missing_counts_agree_with_records() {
        let table = customers();
        let report = TableReport::build(&table);
        let nulls = table.records().filter(|c| c.first_name.is_none()).count();
        assert_eq!(report.missing_in("first_name"), Some(nulls));
        assert_eq!(report.missing_in("customer_id"), Some(0));
        let sum: usize = report.missing_by_column.iter().map(|c| c.missing).sum();
        assert_eq!(report.missing_values, sum);
    }

    #[test]
    fn percent_rounds_to_two_places() {
        assert_eq!(percent(1, 3), 33.33);
        assert_eq!(percent(0, 0), 0.0);
    }

    #[test]
    fn render_lists_only_columns_with_nulls() {
        let table = customers();
        let report = DataQualityReport {
            tables: vec![TableReport::build(&table)],
        };
        let text = report.render();
        assert!(text.contains("CUSTOMERS Dataset:"));
        assert!(!text.contains("  customer_id:"));
    }

    #[test]
    fn render_lays_out_one_block_per_table() {
        let report = DataQualityReport {
            tables: vec![TableReport {
                name: "accounts".into(),
                total_records: 4,
                total_columns: 2,
                missing_values: 1,
                duplicate_rows: 0,
                missing_by_column: vec![
                    ColumnMissing { column: "account_id".into(), missing: 0, percent: 0.0 },
                    ColumnMissing { column: "balance".into(), missing: 1, percent: 25.0 },
                ],
                injected: [("balance.set_null".to_string(), 1)].into_iter().collect(),
            }],
        };
        let rule = "=".repeat(60);
        let expected = format!(
            "{rule}\nDATA QUALITY REPORT\n{rule}\n\
             \nACCOUNTS Dataset:\n\
             Total Records: 4\n\
             Total Columns: 2\n\
             Missing Values: 1\n\
             Duplicate Rows: 0\n\
             Missing Values by Column:\n  balance: 1 (25.0%)\n\
             Injected Defects:\n  balance.set_null: 1\n\
             {}\n",
            "-".repeat(40)
        );
        assert_eq!(report.render(), expected);
        assert_eq!(format!("{report}"), expected);
    }
}
