use lnac_types::{AssessedLevel, NO_DERAILER_FOUND};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::document::LibraryDocument;

/// Level → ordered candidate derailer identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryIndex {
    version: Option<String>,
    levels: BTreeMap<String, Vec<String>>,
}

impl LibraryIndex {
    /// Builds the index from a decoded `library-index.json`.
    ///
    /// Only keyed items holding an array contribute; non-string entries in a
    /// candidate list are skipped.
    pub fn from_document(document: &LibraryDocument) -> Self {
        let levels = document
            .items
            .iter()
            .filter_map(|item| {
                let key = item.key.as_ref()?;
                let candidates = item.value.as_array()?;
                Some((key.clone(), string_entries(candidates)))
            })
            .collect();

        Self {
            version: document.version.clone(),
            levels,
        }
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn candidates(&self, level: AssessedLevel) -> &[String] {
        self.levels
            .get(&level.as_key())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// First candidate for `level`, or [`NO_DERAILER_FOUND`].
    pub fn primary_derailer(&self, level: AssessedLevel) -> &str {
        self.candidates(level)
            .first()
            .map(String::as_str)
            .unwrap_or(NO_DERAILER_FOUND)
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}

fn string_entries(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .filter_map(|value| value.as_str().map(str::to_string))
        .collect()
}
