//! Static LNAC library documents.
//!
//! Documents are decoded into one canonical [`LibraryDocument`] form at load
//! time. The level lookup ([`LibraryIndex`]) and the debug introspection
//! ([`LibraryReport`]) both work on that form.

pub mod document;
pub mod error;
pub mod index;
pub mod report;
pub mod store;

pub use document::{CollectionShape, LibraryDocument, LibraryItem};
pub use error::{LibraryError, Result};
pub use index::LibraryIndex;
pub use report::{DocumentSummary, LibraryReport};
pub use store::{LibraryFile, LibraryStore, DEFAULT_DATA_DIR};
