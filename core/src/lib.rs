//! finqual-core: seeded generator of deliberately dirty financial tables.
//!
//! Four related tables (customers, accounts, transactions, credit
//! history) are synthesized, run through a rule-driven corruptor, then
//! padded with duplicate and orphan rows. Same seed and reference time,
//! same bytes.

pub mod account;
pub mod assembler;
pub mod clock;
pub mod config;
pub mod context;
pub mod corruption;
pub mod credit_history;
pub mod customer;
pub mod entity;
pub mod error;
pub mod export;
pub mod faker;
pub mod identity;
pub mod report;
pub mod rng;
pub mod store;
pub mod table;
pub mod transaction;
pub mod types;

pub use assembler::DatasetGenerator;
pub use config::GeneratorConfig;
pub use error::{GenError, GenResult};
pub use table::{Dataset, Table, TableView};
