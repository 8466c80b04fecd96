//! Idempotent copy execution with per-operation failure tolerance.
//!
//! # Design
//! - A destination whose size already matches its source counts as
//!   satisfied and is never re-copied, so reruns and resumed runs converge
//!   on the same destination tree.
//! - Bytes land under a temporary name and are renamed into place, so an
//!   interrupt cannot leave a visible partial file.
//! - Failures are per-operation: one bad copy never aborts the rest of the
//!   item or the run.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::ReplicateError;
use crate::model::{ItemOutcome, ReplicationPlan};

/// Suffix appended to in-flight copies before the final rename.
const PARTIAL_SUFFIX: &str = ".partial";

/// One failed operation within an otherwise-continuing item.
#[derive(Debug)]
pub struct CopyFailure {
    /// Destination the operation was writing.
    pub destination: PathBuf,
    /// Error that stopped the operation.
    pub error: ReplicateError,
}

/// Accumulated result of executing one replication plan.
#[derive(Debug, Default)]
pub struct ItemCopyResult {
    /// Operations that copied new bytes.
    pub copied: usize,
    /// Operations skipped because the destination already matched.
    pub already_satisfied: usize,
    /// Operations that failed.
    pub failures: Vec<CopyFailure>,
}

impl ItemCopyResult {
    /// Classify the item per the run state machine.
    ///
    /// Already-satisfied operations count as successes, so a rerun over a
    /// complete destination classifies as `Copied` with zero new copies.
    #[must_use]
    pub fn outcome(&self) -> ItemOutcome {
        let succeeded = self.copied + self.already_satisfied;
        if self.failures.is_empty() {
            ItemOutcome::Copied
        } else if succeeded == 0 {
            ItemOutcome::CopyFailed
        } else {
            ItemOutcome::PartiallyCopied
        }
    }
}

enum CopyAction {
    Copied,
    AlreadySatisfied,
}

/// Executes replication plans against the destination tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyExecutor;

impl CopyExecutor {
    /// Run every operation in the plan, tolerating per-operation failures.
    ///
    /// The destination folder is created idempotently on first use; when it
    /// cannot be created the plan fails as a whole with a single recorded
    /// failure and no operation is attempted.
    #[must_use]
    pub fn execute(&self, plan: &ReplicationPlan) -> ItemCopyResult {
        let mut result = ItemCopyResult::default();
        if plan.is_noop() {
            return result;
        }

        if let Err(source) = fs::create_dir_all(&plan.destination_folder) {
            let error =
                ReplicateError::io("create_destination_folder", &plan.destination_folder, source);
            warn!(
                folder = %plan.destination_folder.display(),
                ?error,
                "destination folder unavailable"
            );
            result.failures.push(CopyFailure {
                destination: plan.destination_folder.clone(),
                error,
            });
            return result;
        }

        for operation in &plan.operations {
            let destination = plan.destination_folder.join(&operation.destination_name);
            match copy_operation(&operation.source, &destination) {
                Ok(CopyAction::Copied) => {
                    result.copied += 1;
                    info!(
                        source = %operation.source.display(),
                        destination = %destination.display(),
                        "copied"
                    );
                }
                Ok(CopyAction::AlreadySatisfied) => {
                    result.already_satisfied += 1;
                    debug!(destination = %destination.display(), "destination already satisfied");
                }
                Err(error) => {
                    warn!(destination = %destination.display(), ?error, "copy operation failed");
                    result.failures.push(CopyFailure { destination, error });
                }
            }
        }

        result
    }
}

/// Copy one file unless the destination already matches the source size.
fn copy_operation(source: &Path, destination: &Path) -> Result<CopyAction, ReplicateError> {
    let source_len = fs::metadata(source)
        .map_err(|err| ReplicateError::io("stat_source", source, err))?
        .len();

    if let Ok(existing) = fs::metadata(destination) {
        if existing.is_file() && existing.len() == source_len {
            return Ok(CopyAction::AlreadySatisfied);
        }
    }

    let staging = partial_path(destination);
    fs::copy(source, &staging).map_err(|err| ReplicateError::io("copy_bytes", source, err))?;
    fs::rename(&staging, destination).map_err(|err| {
        let _ = fs::remove_file(&staging);
        ReplicateError::io("finalize_copy", destination, err)
    })?;
    Ok(CopyAction::Copied)
}

fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map_or_else(|| OsString::from("copy"), ToOwned::to_owned);
    name.push(PARTIAL_SUFFIX);
    destination.with_file_name(name)
}
