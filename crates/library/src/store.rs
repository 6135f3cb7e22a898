use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::document::LibraryDocument;
use crate::error::{LibraryError, Result};
use crate::index::LibraryIndex;
use crate::report::{DocumentSummary, LibraryReport};

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "data";

/// The three documents that make up the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryFile {
    Index,
    Derailers,
    MicroActions,
}

impl LibraryFile {
    pub const ALL: [LibraryFile; 3] = [
        LibraryFile::Index,
        LibraryFile::Derailers,
        LibraryFile::MicroActions,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            LibraryFile::Index => "library-index.json",
            LibraryFile::Derailers => "derailer-library.json",
            LibraryFile::MicroActions => "micro-actions.json",
        }
    }
}

/// Reads library documents from a directory. Nothing is cached: every call
/// goes back to disk.
#[derive(Debug, Clone)]
pub struct LibraryStore {
    data_dir: PathBuf,
}

impl LibraryStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_of(&self, file: LibraryFile) -> PathBuf {
        self.data_dir.join(file.file_name())
    }

    pub fn load_document(&self, file: LibraryFile) -> Result<LibraryDocument> {
        let path = self.path_of(file);
        let bytes = fs::read(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => LibraryError::NotFound { path: path.clone() },
            _ => LibraryError::Io {
                path: path.clone(),
                source,
            },
        })?;
        let document = LibraryDocument::decode(&path, &bytes)?;
        debug!(
            "Loaded {} ({} items, version {:?})",
            path.display(),
            document.count(),
            document.version
        );
        Ok(document)
    }

    pub fn load_index(&self) -> Result<LibraryIndex> {
        let document = self.load_document(LibraryFile::Index)?;
        Ok(LibraryIndex::from_document(&document))
    }

    /// Summarizes all three documents plus the directory listing.
    ///
    /// Fails on the first document that is missing or malformed.
    pub fn introspect(&self) -> Result<LibraryReport> {
        let data_dir_exists = self.data_dir.is_dir();
        let files = if data_dir_exists {
            self.json_files()?
        } else {
            Vec::new()
        };

        Ok(LibraryReport {
            data_dir: self.data_dir.display().to_string(),
            data_dir_exists,
            files,
            library_index: self.summarize(LibraryFile::Index)?,
            derailer_library: self.summarize(LibraryFile::Derailers)?,
            micro_actions: self.summarize(LibraryFile::MicroActions)?,
        })
    }

    fn summarize(&self, file: LibraryFile) -> Result<DocumentSummary> {
        let document = self.load_document(file)?;
        Ok(DocumentSummary::new(file.file_name(), &document))
    }

    /// Sorted names of the `*.json` files directly inside the data directory.
    fn json_files(&self) -> Result<Vec<String>> {
        let io_err = |source| LibraryError::Io {
            path: self.data_dir.clone(),
            source,
        };
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.data_dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                files.push(name.to_string());
            }
        }
        files.sort();
        Ok(files)
    }
}

impl Default for LibraryStore {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}
