use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(
        "Sales dataset not found. Expected the canonical file at {} or the raw workbook at {}. \
         Place the raw workbook at that path (or point SALES__DATA__RAW_PATH at it) and retry.",
        canonical.display(),
        raw.display()
    )]
    NotFound { canonical: PathBuf, raw: PathBuf },

    #[error("I/O error while accessing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed delimited file {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Unreadable workbook {}: {source}", path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
}
