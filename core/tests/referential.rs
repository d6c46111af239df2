//! Parent references: sampled children, isolated orphans.

use finqual_core::{
    account::Account, entity::Entity, types::RowOrigin, types::ORPHAN_CUSTOMER_ID, Dataset,
    DatasetGenerator, GenError, GeneratorConfig, Table,
};

fn dataset() -> Dataset {
    DatasetGenerator::new(GeneratorConfig::default_test())
        .unwrap()
        .generate_all()
        .unwrap()
}

/// Child rows whose parent id is missing from `parents`, with their origin.
fn dangling<C: Entity, P: Entity>(children: &Table<C>, parents: &Table<P>) -> Vec<(RowOrigin, String)> {
    let index = parents.parent_index();
    children
        .rows()
        .iter()
        .filter_map(|row| {
            let parent = row.record.parent_id().expect("child rows name a parent");
            (!index.contains(parent)).then(|| (row.origin, parent.to_string()))
        })
        .collect()
}

#[test]
fn only_orphan_accounts_reference_missing_customers() {
    let ds = dataset();
    let missing = dangling(&ds.accounts, &ds.customers);
    assert_eq!(missing.len(), ds.accounts.count_origin(RowOrigin::Orphan));
    for (origin, parent) in &missing {
        assert_eq!(*origin, RowOrigin::Orphan, "non-orphan row references {parent}");
        assert_eq!(parent, ORPHAN_CUSTOMER_ID);
    }
}

#[test]
fn customers_have_no_parent() {
    let ds = dataset();
    assert!(ds.customers.records().all(|c| c.parent_id().is_none()));
}

#[test]
fn orphan_accounts_carry_the_sentinel_and_nothing_else_does() {
    let ds = dataset();
    let orphans: Vec<&Account> = ds.accounts.with_origin(RowOrigin::Orphan).collect();
    // floor(300 × 0.01)
    assert_eq!(orphans.len(), 3);
    for a in &orphans {
        assert_eq!(a.customer_id, ORPHAN_CUSTOMER_ID);
    }
    assert!(!ds.customers.parent_index().contains(ORPHAN_CUSTOMER_ID));

    let sentinel_rows = ds
        .accounts
        .records()
        .filter(|a| a.customer_id == ORPHAN_CUSTOMER_ID)
        .count();
    assert_eq!(sentinel_rows, orphans.len());
}

#[test]
fn orphan_accounts_are_nominal() {
    let ds = dataset();
    for a in ds.accounts.with_origin(RowOrigin::Orphan) {
        assert!(a.known_type().is_some(), "orphan has corrupted type {:?}", a.account_type);
        assert!(a.balance.is_some());
        assert!(a.account_number.is_some());
        assert!(a.opened_date.is_some_and(|d| d <= ds_now()));
    }
}

fn ds_now() -> chrono::NaiveDateTime {
    GeneratorConfig::default_test().reference_time
}

#[test]
fn transactions_reference_accounts_including_orphans() {
    let ds = dataset();
    assert_eq!(dangling(&ds.transactions, &ds.accounts), vec![]);
}

#[test]
fn credit_history_references_customers() {
    let ds = dataset();
    let customers = ds.customers.parent_index();
    assert!(ds.credit_history.len() >= customers.len());
    assert!(ds.credit_history.len() <= 5 * customers.len());
    assert_eq!(dangling(&ds.credit_history, &ds.customers), vec![]);
}

#[test]
fn child_table_needs_a_parent() {
    let mut config = GeneratorConfig::default_test();
    config.row_counts.customers = 0;
    let err = DatasetGenerator::new(config)
        .unwrap()
        .generate_all()
        .unwrap_err();
    match err {
        GenError::EmptyParent { table, parent } => {
            assert_eq!(table, Account::TABLE);
            assert_eq!(parent, "customers");
        }
        other => panic!("expected EmptyParent, got {other}"),
    }
}
