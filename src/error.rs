//! Errors of the recipe data layer
//!
//! The calculation modules never fail; everything here comes from reading
//! production files or talking to the store.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The productions directory could not be walked.
    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    /// A production file could not be parsed.
    #[error("parse error in {file}: {source}")]
    Parse {
        file: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A production file name is not a usable good id.
    #[error("'{0}' is not a valid good id")]
    InvalidGoodId(String),

    #[error(transparent)]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, DataError>;
