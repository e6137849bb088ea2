//! Core entry point for the solicitud_pdf crate.
//!
//! The crate turns one stored credit application into a PDF report. The
//! [`generator`] module drives the whole pipeline; the remaining modules are
//! the pieces it is assembled from.

pub mod builder;
pub mod config;
pub mod elements;
pub mod error;
pub mod finance;
pub mod fonts;
pub mod format;
pub mod generator;
pub mod model;
pub mod outcome;
pub mod record;
pub mod report;
pub mod richtext;
pub mod store;

#[cfg(feature = "bookmarks")]
pub mod bookmarks;

pub use config::{GenerationRequest, StoreConfig};
pub use error::{ErrorKind, GenerationError};
pub use generator::{generate_report, run};
pub use outcome::{GenerationResult, ReportMetadata};
pub use record::ApplicationRecord;
pub use store::{MongoStore, RecordStore};
