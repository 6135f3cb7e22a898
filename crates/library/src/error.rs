//! Error types for library document loading

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Library document not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported top-level {found} in {}; expected an object or array", path.display())]
    UnsupportedShape { path: PathBuf, found: &'static str },
}

pub type Result<T> = std::result::Result<T, LibraryError>;
