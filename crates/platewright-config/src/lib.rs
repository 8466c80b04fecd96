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

//! File-backed configuration for the platewright replication engine.
//!
//! Layout: `model.rs` (typed config models, defaults, TOML loading),
//! `error.rs` (structured configuration errors).

pub mod error;
pub mod model;

pub use error::{ConfigError, ConfigResult};
pub use model::{IngestSettings, ReplicatorConfig};
