#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! CSV ingestion: turns rows of tabular product data into work items.
//!
//! Layout: `reader.rs` (discovery and row conversion), `error.rs`
//! (structured ingest errors).

pub mod error;
pub mod reader;

pub use error::{IngestError, IngestResult};
pub use reader::{IngestOutcome, discover_csv_files, material_from_file_name, read_work_items};
