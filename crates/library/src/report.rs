use serde::Serialize;

use crate::document::{CollectionShape, LibraryDocument};

/// Shape and size of one library document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    pub file: String,
    pub version: Option<String>,
    pub shape: CollectionShape,
    pub count: usize,
    pub levels: Option<Vec<String>>,
}

impl DocumentSummary {
    pub fn new(file: impl Into<String>, document: &LibraryDocument) -> Self {
        Self {
            file: file.into(),
            version: document.version.clone(),
            shape: document.shape.clone(),
            count: document.count(),
            levels: document.level_keys(),
        }
    }
}

/// Payload of `/debug/library`.
///
/// Every collection in here is sorted, so the serialized form only changes
/// when the files on disk do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryReport {
    pub data_dir: String,
    pub data_dir_exists: bool,
    pub files: Vec<String>,
    pub library_index: DocumentSummary,
    pub derailer_library: DocumentSummary,
    pub micro_actions: DocumentSummary,
}
