use chrono::NaiveDate;
use configuration::DataSettings;
use data_store::{SalesStore, StoreError};
use std::fs;
use std::path::Path;

const RAW_EXPORT: &str = "\
CUSTOMER_CODE,CUSTOMER_NAME,QUANTITY_ORDERED,SALES,Total profit / loss,Status,ORDER_DATE,COUNTRY, Region
C-1,Land of Toys,30,2871.0,350.5,Shipped,2003-02-24 00:00:00,USA,NA
C-2,Reims Collectables,34,bad,120.0,Shipped,2003-05-07 00:00:00,France,EMEA
C-3,Lyon Souveniers,41,3884.34,,Cancelled,not-a-date,France,EMEA
";

fn settings_in(dir: &Path) -> DataSettings {
    DataSettings {
        raw_path: dir.join("raw").join("sales_dataset.csv"),
        canonical_path: dir.join("sales_data.csv"),
        processed_path: dir.join("processed").join("sales_dataset.csv"),
    }
}

fn write_raw(settings: &DataSettings) {
    fs::create_dir_all(settings.raw_path.parent().unwrap()).unwrap();
    fs::write(&settings.raw_path, RAW_EXPORT).unwrap();
}

#[test]
fn raw_export_is_normalized_and_cached() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(dir.path());
    write_raw(&settings);

    let table = SalesStore::new(settings.clone()).load().unwrap();
    assert_eq!(table.len(), 3);
    for column in ["Customer ID", "Customer Name", "Quantity Ordered", "Order Date", "Sales", "Country"] {
        assert!(table.has_column(column), "missing {column}");
    }
    assert!(table.has_column("Region"));

    let first = &table.records()[0];
    assert_eq!(first.customer_id.as_deref(), Some("C-1"));
    assert_eq!(first.quantity_ordered, Some(30));
    assert_eq!(first.order_date, NaiveDate::from_ymd_opt(2003, 2, 24));
    assert_eq!(first.extra.get("Region").map(String::as_str), Some("NA"));

    // Unparsable values are missing, not zero.
    assert_eq!(table.records()[1].sales, None);
    assert_eq!(table.records()[2].total_profit, None);
    assert_eq!(table.records()[2].order_date, None);

    assert!(settings.canonical_path.exists());
    assert!(settings.processed_path.exists());
}

#[test]
fn canonical_cache_is_preferred_once_written() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(dir.path());
    write_raw(&settings);
    let store = SalesStore::new(settings.clone());
    let first = store.load().unwrap();

    // With the raw export gone the cache alone must suffice.
    fs::remove_file(&settings.raw_path).unwrap();
    let second = store.load().unwrap();
    assert_eq!(first, second);

    let err = store.load_with(true).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn missing_sources_report_not_found_with_both_paths() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(dir.path());

    let err = SalesStore::new(settings.clone()).load().unwrap_err();
    let message = err.to_string();
    assert!(matches!(err, StoreError::NotFound { .. }));
    assert!(message.contains("sales_data.csv"));
    assert!(message.contains("sales_dataset.csv"));
}

#[test]
fn distinct_filters_come_back_sorted() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(dir.path());
    write_raw(&settings);

    let table = SalesStore::new(settings).load().unwrap();
    assert_eq!(table.distinct_countries(), vec!["France", "USA"]);
    assert_eq!(table.distinct_statuses(), vec!["Cancelled", "Shipped"]);
}

fn write_workbook(path: &Path) {
    use rust_xlsxwriter::{Format, Workbook};

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let headers = [
        "CUSTOMER_CODE",
        "QUANTITY_ORDERED",
        "SALES",
        "Total profit / loss",
        "Status",
        "ORDER_DATE",
        "COUNTRY",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }

    // 37676 is 2003-02-24 as an Excel serial date.
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    sheet.write_string(1, 0, "C-1").unwrap();
    sheet.write_number(1, 1, 30.0).unwrap();
    sheet.write_number(1, 2, 2871.0).unwrap();
    sheet.write_number(1, 3, 350.5).unwrap();
    sheet.write_string(1, 4, "Shipped").unwrap();
    sheet.write_number_with_format(1, 5, 37676.0, &date_format).unwrap();
    sheet.write_string(1, 6, "USA").unwrap();

    sheet.write_string(2, 0, "C-2").unwrap();
    sheet.write_number(2, 1, 34.0).unwrap();
    sheet.write_string(2, 2, "n/a").unwrap();
    sheet.write_number(2, 3, 120.0).unwrap();
    sheet.write_string(2, 4, "Cancelled").unwrap();
    sheet.write_string(2, 5, "2003-05-07").unwrap();
    sheet.write_string(2, 6, "France").unwrap();

    workbook.save(path).unwrap();
}

#[test]
fn raw_workbook_is_normalized_and_cached() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = settings_in(dir.path());
    settings.raw_path = dir.path().join("raw").join("Sales_dataset.xlsx");
    fs::create_dir_all(settings.raw_path.parent().unwrap()).unwrap();
    write_workbook(&settings.raw_path);

    let table = SalesStore::new(settings.clone()).load().unwrap();
    assert_eq!(table.len(), 2);
    assert!(table.has_column("Customer ID"));
    assert!(table.has_column("Total Profit/Loss"));

    let first = &table.records()[0];
    assert_eq!(first.customer_id.as_deref(), Some("C-1"));
    assert_eq!(first.quantity_ordered, Some(30));
    assert_eq!(first.sales, Some(2871.0));
    assert_eq!(first.total_profit, Some(350.5));
    assert_eq!(first.order_date, NaiveDate::from_ymd_opt(2003, 2, 24));

    let second = &table.records()[1];
    assert_eq!(second.sales, None);
    assert_eq!(second.order_date, NaiveDate::from_ymd_opt(2003, 5, 7));

    // The canonical cache is plain delimited text and reads back identically.
    let cached = data_store::read_table(&settings.canonical_path).unwrap();
    assert_eq!(cached, table);
    assert!(settings.processed_path.exists());
}

#[test]
fn corrupt_workbook_is_a_workbook_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = settings_in(dir.path());
    settings.raw_path = dir.path().join("Sales_dataset.xlsx");
    fs::write(&settings.raw_path, b"PK\x03\x04 not really a zip archive").unwrap();

    let err = SalesStore::new(settings).load().unwrap_err();
    assert!(matches!(err, StoreError::Workbook { .. }), "{err}");
}
