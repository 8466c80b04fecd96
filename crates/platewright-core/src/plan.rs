//! Destination planning for resolved work items.
//!
//! # Design
//! - The planner is pure: it computes folders and numbered file names but
//!   never touches the filesystem. Folder creation happens in the executor,
//!   idempotently, on first use.

use std::path::PathBuf;

use crate::error::ReplicateError;
use crate::model::{CopyOperation, MatchCandidate, ReplicationPlan, WorkItem};

/// Fallback folder component when a label sanitizes to nothing.
const UNKNOWN_COMPONENT: &str = "unknown";

/// Characters that cannot appear in destination folder components.
const RESERVED: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Computes destination folders and numbered copy operations.
#[derive(Debug, Clone)]
pub struct ReplicationPlanner {
    destination_base: PathBuf,
}

impl ReplicationPlanner {
    /// Build a planner rooted at the destination base directory.
    #[must_use]
    pub fn new(destination_base: impl Into<PathBuf>) -> Self {
        Self {
            destination_base: destination_base.into(),
        }
    }

    /// Turn a work item and its resolved candidate into a replication plan.
    ///
    /// The destination folder is `<base>/<material>/<thickness>` with the
    /// labels used verbatim apart from reserved-character replacement, so
    /// differently-spelled labels land in distinct folders. A zero-quantity
    /// item produces an empty, zero-operation plan rather than an error;
    /// such items are normally filtered upstream.
    ///
    /// # Errors
    ///
    /// Returns [`ReplicateError::InvalidItem`] when the candidate path has
    /// no usable file name.
    pub fn plan(
        &self,
        item: &WorkItem,
        candidate: &MatchCandidate,
    ) -> Result<ReplicationPlan, ReplicateError> {
        let file_name = candidate
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ReplicateError::InvalidItem {
                field: "candidate",
                reason: "resolved path has no usable file name",
                value: Some(candidate.path.display().to_string()),
            })?;

        let destination_folder = self
            .destination_base
            .join(folder_component(&item.material))
            .join(folder_component(&item.thickness));

        let operations = match item.quantity {
            0 => Vec::new(),
            1 => vec![CopyOperation {
                source: candidate.path.clone(),
                destination_name: file_name.to_string(),
            }],
            quantity => (1..=quantity)
                .map(|index| CopyOperation {
                    source: candidate.path.clone(),
                    destination_name: format!("{index}_{file_name}"),
                })
                .collect(),
        };

        Ok(ReplicationPlan {
            destination_folder,
            operations,
        })
    }
}

/// Map a raw label to a filesystem-safe folder component.
///
/// Labels pass through verbatim apart from reserved-character replacement;
/// an empty result falls back to `"unknown"`.
fn folder_component(label: &str) -> String {
    let cleaned: String = label
        .trim()
        .chars()
        .map(|ch| {
            if RESERVED.contains(&ch) || ch.is_control() {
                '_'
            } else {
                ch
            }
        })
        .collect();
    if cleaned.is_empty() {
        UNKNOWN_COMPONENT.to_string()
    } else {
        cleaned
    }
}
