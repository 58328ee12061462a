//! Reading the raw sales source from a spreadsheet workbook.

use crate::error::StoreError;
use crate::schema;
use crate::table::SalesTable;
use calamine::{Data, Reader, open_workbook_auto};
use std::path::Path;

/// File extensions read as workbooks rather than delimited text.
pub const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

pub fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| WORKBOOK_EXTENSIONS.iter().any(|w| w.eq_ignore_ascii_case(ext)))
}

/// Reads the first worksheet. Its first row is the header row.
pub fn read_workbook(path: &Path) -> Result<SalesTable, StoreError> {
    let workbook_err = |source| StoreError::Workbook {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(workbook_err)?;
    let range = workbook
        .worksheet_range_at(0)
        .unwrap_or(Err(calamine::Error::Msg("workbook has no worksheets")))
        .map_err(workbook_err)?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(SalesTable::default());
    };
    let headers: Vec<String> = header_row.iter().map(cell_text).collect();
    let (positions, columns) = schema::header_layout(headers.iter().map(String::as_str));

    let records: Vec<_> = rows
        .map(|row| {
            let cells: Vec<String> = row.iter().map(cell_text).collect();
            schema::record_from(&positions, cells.iter().map(String::as_str))
        })
        .collect();

    tracing::debug!(
        path = %path.display(),
        rows = records.len(),
        columns = columns.len(),
        "Read sales workbook."
    );
    Ok(SalesTable::new(columns, records))
}

/// Renders a cell as the text the coercion rules expect.
///
/// Date-formatted cells become `YYYY-MM-DD HH:MM:SS`; errors and blanks are empty.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| dt.as_f64().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workbook_extensions_are_case_insensitive() {
        assert!(is_workbook(Path::new("data/raw/Sales_dataset.xlsx")));
        assert!(is_workbook(Path::new("legacy.XLS")));
        assert!(!is_workbook(Path::new("data/raw/sales_dataset.csv")));
        assert!(!is_workbook(Path::new("no_extension")));
    }

    #[test]
    fn cells_render_as_coercible_text() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::String("Shipped".into())), "Shipped");
        assert_eq!(cell_text(&Data::Float(2871.5)), "2871.5");
        // Whole floats keep integer columns parseable.
        assert_eq!(cell_text(&Data::Float(30.0)), "30");
        assert_eq!(cell_text(&Data::Int(2003)), "2003");
        assert_eq!(schema::parse_int(&cell_text(&Data::Float(30.0))), Some(30));
    }
}
