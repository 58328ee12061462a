use crate::error::StoreError;
use crate::schema;
use crate::table::SalesTable;
use crate::workbook;
use configuration::DataSettings;
use std::fs;
use std::path::{Path, PathBuf};

/// Owns the on-disk locations of the sales dataset and produces the canonical table.
#[derive(Debug, Clone)]
pub struct SalesStore {
    settings: DataSettings,
}

impl SalesStore {
    pub fn new(settings: DataSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &DataSettings {
        &self.settings
    }

    /// Loads the canonical table, preferring the cached canonical file.
    pub fn load(&self) -> Result<SalesTable, StoreError> {
        self.load_with(false)
    }

    /// Loads the canonical table.
    ///
    /// With `force_refresh` the raw source is re-read even when the canonical
    /// cache exists. Reading the raw source rewrites both canonical copies.
    pub fn load_with(&self, force_refresh: bool) -> Result<SalesTable, StoreError> {
        let canonical = &self.settings.canonical_path;
        if !force_refresh && canonical.exists() {
            let table = read_table(canonical)?;
            tracing::info!(
                path = %canonical.display(),
                rows = table.len(),
                "Loaded canonical sales dataset."
            );
            return Ok(table);
        }

        let raw = &self.settings.raw_path;
        if !raw.exists() {
            return Err(StoreError::NotFound {
                canonical: canonical.clone(),
                raw: raw.clone(),
            });
        }

        let table = read_raw(raw)?;
        tracing::info!(
            path = %raw.display(),
            rows = table.len(),
            "Normalized raw sales source."
        );
        write_table(canonical, &table)?;
        write_table(&self.settings.processed_path, &table)?;
        Ok(table)
    }
}

/// Reads a delimited sales file, normalizing headers and coercing values.
pub fn read_table(path: &Path) -> Result<SalesTable, StoreError> {
    let csv_err = |source| StoreError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let headers = reader.headers().map_err(csv_err)?.clone();
    let (positions, columns) = schema::header_layout(headers.iter());

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(csv_err)?;
        records.push(schema::record_from(&positions, row.iter()));
    }

    Ok(SalesTable::new(columns, records))
}

/// Reads the raw source, dispatching on its extension.
///
/// Spreadsheet workbooks go through `calamine`; anything else is read as
/// delimited text.
pub fn read_raw(path: &Path) -> Result<SalesTable, StoreError> {
    if workbook::is_workbook(path) {
        workbook::read_workbook(path)
    } else {
        read_table(path)
    }
}

/// Writes the table in canonical form, creating parent directories.
pub fn write_table(path: &Path, table: &SalesTable) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let csv_err = |source| StoreError::Csv {
        path: PathBuf::from(path),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    writer.write_record(table.columns()).map_err(csv_err)?;
    for record in table.records() {
        let fields = table.columns().iter().map(|c| schema::render(record, c));
        writer.write_record(fields).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), rows = table.len(), "Wrote canonical sales copy.");
    Ok(())
}
