//! Column-name normalization and value coercion for the sales dataset.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use core_types::SalesRecord;
use core_types::columns::*;

/// Maps source-specific headers of the raw export onto canonical labels.
const RENAME_TABLE: [(&str, &str); 18] = [
    ("CUSTOMER_CODE", CUSTOMER_ID),
    ("CUSTOMER_NAME", CUSTOMER_NAME),
    ("QUANTITY_ORDERED", QUANTITY_ORDERED),
    ("MSRP", MSRP),
    ("Estimated Cost Price (50%)", COST_PRICE),
    ("Selling price", SELLING_PRICE),
    ("SALES", SALES),
    ("Profit per unit", PROFIT_PER_UNIT),
    ("Total profit / loss", TOTAL_PROFIT),
    ("Status", STATUS),
    ("ORDER_DATE", ORDER_DATE),
    ("MONTH", MONTH),
    ("YEAR", YEAR),
    ("PRODUCT", PRODUCT),
    ("PRODUCT_CODE", PRODUCT_CODE),
    ("CITY", CITY),
    ("COUNTRY", COUNTRY),
    ("DEALSIZE", DEAL_SIZE),
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// Returns the canonical label for a source header.
///
/// Headers are whitespace-trimmed first; anything not in the rename table
/// passes through as the trimmed header.
pub fn canonical_name(header: &str) -> String {
    let trimmed = header.trim();
    RENAME_TABLE
        .iter()
        .find(|(source, _)| *source == trimmed)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Normalizes a source header row.
///
/// Returns the canonical name of every position (duplicates included) and the
/// distinct columns in first-seen order.
pub fn header_layout<'a, I>(headers: I) -> (Vec<String>, Vec<String>)
where
    I: IntoIterator<Item = &'a str>,
{
    let positions: Vec<String> = headers.into_iter().map(canonical_name).collect();
    let mut columns: Vec<String> = Vec::with_capacity(positions.len());
    for name in &positions {
        if !columns.contains(name) {
            columns.push(name.clone());
        }
    }
    (positions, columns)
}

/// Builds one record from raw cells laid out as `positions`.
pub fn record_from<'a, I>(positions: &[String], cells: I) -> SalesRecord
where
    I: IntoIterator<Item = &'a str>,
{
    let mut record = SalesRecord::default();
    for (column, raw) in positions.iter().zip(cells) {
        assign(&mut record, column, raw);
    }
    record
}

pub fn parse_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Coerces to a finite float; anything else is missing.
pub fn parse_float(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerces to an integer. Integral floats such as `"3.0"` are accepted.
pub fn parse_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }
    parse_float(trimmed)
        .filter(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64)
        .map(|v| v as i64)
}

/// Parses an order date. The time of day, when present, is dropped.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(datetime.date());
        }
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|datetime| datetime.date_naive())
}

/// Stores one raw cell into the record field named by `column`.
pub fn assign(record: &mut SalesRecord, column: &str, raw: &str) {
    match column {
        CUSTOMER_ID => record.customer_id = parse_text(raw),
        CUSTOMER_NAME => record.customer_name = parse_text(raw),
        QUANTITY_ORDERED => record.quantity_ordered = parse_int(raw),
        MSRP => record.msrp = parse_float(raw),
        COST_PRICE => record.cost_price = parse_float(raw),
        SELLING_PRICE => record.selling_price = parse_float(raw),
        SALES => record.sales = parse_float(raw),
        PROFIT_PER_UNIT => record.profit_per_unit = parse_float(raw),
        TOTAL_PROFIT => record.total_profit = parse_float(raw),
        STATUS => record.status = parse_text(raw),
        ORDER_DATE => record.order_date = parse_date(raw),
        MONTH => record.month = parse_text(raw),
        YEAR => record.year = parse_int(raw),
        PRODUCT => record.product = parse_text(raw),
        PRODUCT_CODE => record.product_code = parse_text(raw),
        CITY => record.city = parse_text(raw),
        COUNTRY => record.country = parse_text(raw),
        DEAL_SIZE => record.deal_size = parse_text(raw),
        other => {
            record.extra.insert(other.to_string(), raw.to_string());
        }
    }
}

/// Renders the field named by `column` back to its on-disk text form.
pub fn render(record: &SalesRecord, column: &str) -> String {
    fn text(value: &Option<String>) -> String {
        value.clone().unwrap_or_default()
    }
    fn number<T: ToString>(value: Option<T>) -> String {
        value.map(|v| v.to_string()).unwrap_or_default()
    }

    match column {
        CUSTOMER_ID => text(&record.customer_id),
        CUSTOMER_NAME => text(&record.customer_name),
        QUANTITY_ORDERED => number(record.quantity_ordered),
        MSRP => number(record.msrp),
        COST_PRICE => number(record.cost_price),
        SELLING_PRICE => number(record.selling_price),
        SALES => number(record.sales),
        PROFIT_PER_UNIT => number(record.profit_per_unit),
        TOTAL_PROFIT => number(record.total_profit),
        STATUS => text(&record.status),
        ORDER_DATE => record
            .order_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        MONTH => text(&record.month),
        YEAR => number(record.year),
        PRODUCT => text(&record.product),
        PRODUCT_CODE => text(&record.product_code),
        CITY => text(&record.city),
        COUNTRY => text(&record.country),
        DEAL_SIZE => text(&record.deal_size),
        other => record.extra.get(other).cloned().unwrap_or_default(),
    }
}
