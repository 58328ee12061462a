use chrono::NaiveDate;
use core_types::SalesRecord;
use core_types::columns::{CANONICAL_COLUMNS, COUNTRY, ORDER_DATE, STATUS};
use serde::Serialize;
use std::collections::BTreeSet;

/// The in-memory canonical sales table.
///
/// Alongside the records it remembers which columns the source actually
/// carried, so an absent column can be told apart from one whose values are
/// all missing. Tables are never mutated in place: every query returns a new one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalesTable {
    columns: Vec<String>,
    records: Vec<SalesRecord>,
}

impl SalesTable {
    pub fn new(columns: Vec<String>, records: Vec<SalesRecord>) -> Self {
        Self { columns, records }
    }

    /// Builds a table that claims every canonical column.
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        let columns = CANONICAL_COLUMNS.iter().map(|c| c.to_string()).collect();
        Self::new(columns, records)
    }

    /// An empty table with the same columns as `self`.
    pub fn empty_like(&self) -> Self {
        Self::new(self.columns.clone(), Vec::new())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns a new table holding the records that satisfy `predicate`.
    pub fn retain_where<F>(&self, predicate: F) -> Self
    where
        F: Fn(&SalesRecord) -> bool,
    {
        let records = self.records.iter().filter(|r| predicate(r)).cloned().collect();
        Self::new(self.columns.clone(), records)
    }

    /// Applies the dashboard filters.
    ///
    /// Dates are matched on the inclusive range `[start, end]`; records without
    /// a valid date are dropped when the table has a date column. A `None` or
    /// empty country/status list means no restriction on that dimension.
    pub fn filter(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        countries: Option<&[String]>,
        statuses: Option<&[String]>,
    ) -> Self {
        let check_dates = self.has_column(ORDER_DATE);
        let countries = countries.filter(|c| !c.is_empty());
        let statuses = statuses.filter(|s| !s.is_empty());

        let filtered = self.retain_where(|record| {
            if check_dates {
                match record.order_date {
                    Some(date) if date >= start && date <= end => {}
                    _ => return false,
                }
            }
            if let Some(allowed) = countries {
                if !contains(allowed, record.country.as_deref()) {
                    return false;
                }
            }
            if let Some(allowed) = statuses {
                if !contains(allowed, record.status.as_deref()) {
                    return false;
                }
            }
            true
        });

        tracing::debug!(
            input = self.len(),
            output = filtered.len(),
            %start,
            %end,
            "Applied dashboard filters."
        );
        filtered
    }

    /// Distinct non-missing countries, ascending.
    pub fn distinct_countries(&self) -> Vec<String> {
        self.distinct(COUNTRY, |r| r.country.as_deref())
    }

    /// Distinct non-missing statuses, ascending.
    pub fn distinct_statuses(&self) -> Vec<String> {
        self.distinct(STATUS, |r| r.status.as_deref())
    }

    /// The earliest and latest valid order dates.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.records.iter().filter_map(|r| r.order_date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }

    fn distinct<'a, F>(&'a self, column: &str, accessor: F) -> Vec<String>
    where
        F: Fn(&'a SalesRecord) -> Option<&'a str>,
    {
        if !self.has_column(column) {
            return Vec::new();
        }
        self.records
            .iter()
            .filter_map(accessor)
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

fn contains(allowed: &[String], value: Option<&str>) -> bool {
    value.is_some_and(|v| allowed.iter().any(|a| a == v))
}
