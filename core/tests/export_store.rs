//! CSV files and the SQLite store hold exactly what was assembled.

use finqual_core::{
    account::Account,
    customer::Customer,
    entity::Entity,
    export::{to_csv_string, write_dataset},
    report::DataQualityReport,
    store::DatasetStore,
    Dataset, DatasetGenerator, GeneratorConfig,
};

fn dataset() -> Dataset {
    DatasetGenerator::new(GeneratorConfig::default_test())
        .unwrap()
        .generate_all()
        .unwrap()
}

#[test]
fn csv_files_carry_exact_headers() {
    let ds = dataset();
    let dir = tempfile::tempdir().unwrap();
    let paths = write_dataset(dir.path(), &ds).unwrap();

    let names: Vec<String> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        ["customers.csv", "accounts.csv", "transactions.csv", "credit_history.csv"]
    );

    let customers = std::fs::read_to_string(dir.path().join("customers.csv")).unwrap();
    assert_eq!(
        customers.lines().next().unwrap(),
        "customer_id,first_name,last_name,email,phone,ssn,date_of_birth,address,city,state,\
         zip_code,country,annual_income,employment_status,credit_score,credit_range,created_date"
    );
    let accounts = std::fs::read_to_string(dir.path().join("accounts.csv")).unwrap();
    assert_eq!(accounts.lines().next().unwrap(), Account::COLUMNS.join(","));
    assert_eq!(accounts.lines().count(), ds.accounts.len() + 1);
}

#[test]
fn nulls_are_written_as_empty_fields() {
    let ds = dataset();
    let csv = to_csv_string(&ds.accounts).unwrap();
    let limit_col = Account::COLUMNS
        .iter()
        .position(|c| *c == "credit_limit")
        .unwrap();

    // Account fields never contain commas, so a plain split is exact here.
    for (line, account) in csv.lines().skip(1).zip(ds.accounts.records()) {
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields.len(), Account::COLUMNS.len(), "{line}");
        assert_eq!(fields[limit_col].is_empty(), account.credit_limit.is_none(), "{line}");
        if account.balance.is_none() {
            assert_eq!(fields[5], "");
        }
    }
}

#[test]
fn locations_are_quoted_around_their_comma() {
    let ds = dataset();
    let csv = to_csv_string(&ds.transactions).unwrap();
    for (line, t) in csv.lines().skip(1).zip(ds.transactions.records()) {
        if let Some(location) = &t.location {
            assert!(line.contains(&format!("\"{location}\"")), "{line}");
        }
    }
}

#[test]
fn sqlite_store_matches_the_dataset() {
    let ds = dataset();
    let store = DatasetStore::in_memory().unwrap();
    store.migrate().unwrap();
    let now = GeneratorConfig::default_test().reference_time;
    let run_id = store.insert_run(0x5EED_1234, now, "0.1.0-test").unwrap();
    store.write_dataset(run_id, &ds).unwrap();

    for table in ds.tables() {
        assert_eq!(
            store.row_count(run_id, table.name()).unwrap(),
            table.row_count() as u64,
            "{}",
            table.name()
        );
    }

    let report = DataQualityReport::build(&ds);
    let customers = report.table(Customer::TABLE).unwrap();
    for column in ["first_name", "phone", "zip_code", "customer_id"] {
        assert_eq!(
            store.null_count(run_id, Customer::TABLE, column).unwrap() as usize,
            customers.missing_in(column).unwrap(),
            "{column}"
        );
    }
}

#[test]
fn runs_sharing_a_database_stay_separate() {
    let generate = |seed: u64, customers: i64| {
        let mut config = GeneratorConfig {
            seed,
            ..GeneratorConfig::default_test()
        };
        config.row_counts.customers = customers;
        DatasetGenerator::new(config).unwrap().generate_all().unwrap()
    };
    let first = generate(1, 200);
    let second = generate(2, 120);

    let store = DatasetStore::in_memory().unwrap();
    store.migrate().unwrap();
    let now = GeneratorConfig::default_test().reference_time;
    let first_run = store.insert_run(1, now, "0.1.0-test").unwrap();
    store.write_dataset(first_run, &first).unwrap();
    let second_run = store.insert_run(2, now, "0.1.0-test").unwrap();
    store.write_dataset(second_run, &second).unwrap();
    assert_ne!(first_run, second_run);

    for (run_id, ds) in [(first_run, &first), (second_run, &second)] {
        for table in ds.tables() {
            assert_eq!(
                store.row_count(run_id, table.name()).unwrap(),
                table.row_count() as u64,
                "run {run_id} {}",
                table.name()
            );
        }
        let customers = DataQualityReport::build(ds);
        let customers = customers.table(Customer::TABLE).unwrap();
        assert_eq!(
            store.null_count(run_id, Customer::TABLE, "first_name").unwrap() as usize,
            customers.missing_in("first_name").unwrap()
        );
    }
    assert_eq!(store.row_count(second_run + 1, Customer::TABLE).unwrap(), 0);
}

#[test]
fn report_json_round_trips_through_serde() {
    let report = DataQualityReport::build(&dataset());
    let json = serde_json::to_value(&report).unwrap();
    let tables = json["tables"].as_array().unwrap();
    assert_eq!(tables.len(), 4);
    assert_eq!(tables[0]["name"], "customers");
    assert_eq!(tables[0]["total_columns"], 17);
}
