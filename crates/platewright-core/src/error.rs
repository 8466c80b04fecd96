//! # Design
//!
//! - Provide structured, constant-message errors for the replication pipeline.
//! - Capture operation context (paths, fields, inputs) to make failures reproducible in tests.
//! - Preserve source errors without interpolating context into error messages.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for replication operations.
pub type ReplicateResult<T> = Result<T, ReplicateError>;

/// Errors produced by the resolution and replication pipeline.
#[derive(Debug, Error)]
pub enum ReplicateError {
    /// IO failures while interacting with the filesystem.
    #[error("replicate io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A configured root failed the startup accessibility check.
    #[error("replicate preflight failure")]
    Preflight {
        /// Role of the offending path (`source_root` or `destination_base`).
        role: &'static str,
        /// Path that failed the check.
        path: PathBuf,
    },
    /// Work item data that cannot be turned into a valid plan.
    #[error("replicate invalid work item")]
    InvalidItem {
        /// Field that failed validation.
        field: &'static str,
        /// Static reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
    /// Manifest parsing failures.
    #[error("replicate manifest failure")]
    Manifest {
        /// Operation that triggered the manifest failure.
        operation: &'static str,
        /// Path of the manifest involved.
        path: PathBuf,
        /// Line number when the failure is positional.
        line: Option<usize>,
        /// Static reason for the failure.
        reason: &'static str,
    },
}

impl ReplicateError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn preflight(role: &'static str, path: impl Into<PathBuf>) -> Self {
        Self::Preflight {
            role,
            path: path.into(),
        }
    }

    pub(crate) fn manifest(
        operation: &'static str,
        path: impl Into<PathBuf>,
        line: Option<usize>,
        reason: &'static str,
    ) -> Self {
        Self::Manifest {
            operation,
            path: path.into(),
            line,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn error_helpers_build_variants() {
        let io_err = ReplicateError::io("read", "path", io::Error::other("io"));
        assert!(matches!(io_err, ReplicateError::Io { .. }));
        assert!(io_err.source().is_some());

        let preflight = ReplicateError::preflight("source_root", "/missing");
        assert!(matches!(preflight, ReplicateError::Preflight { .. }));
        assert!(preflight.source().is_none());

        let manifest = ReplicateError::manifest("parse_manifest", "m.txt", Some(3), "bad record");
        assert!(matches!(
            manifest,
            ReplicateError::Manifest { line: Some(3), .. }
        ));
    }
}
