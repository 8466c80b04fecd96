//! Domain models for asset resolution and replication.
//!
//! # Design
//! - Keep work items and plans as lightweight data carriers.
//! - Avoid embedding IO handles; callers supply references.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One unit of work derived from a row of tabular product data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Product identifier used to locate a design file.
    pub product_name: String,
    /// Raw thickness label from the source data, not necessarily numeric.
    pub thickness: String,
    /// Number of copies requested; zero means the item is skipped.
    pub quantity: u32,
    /// Material label inferred from the originating source name.
    pub material: String,
}

impl WorkItem {
    /// Whether the item carries enough data to be searched and replicated.
    ///
    /// Zero-quantity and nameless items are skipped before the search stage
    /// and never count toward any run counter.
    #[must_use]
    pub fn is_actionable(&self) -> bool {
        self.quantity > 0 && !self.product_name.trim().is_empty()
    }
}

/// A file resolved for a work item, with the extension that matched it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCandidate {
    /// Path of the resolved file.
    pub path: PathBuf,
    /// Recognized extension (lowercase) the match was made under.
    pub extension: String,
}

/// A single planned copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyOperation {
    /// Source file to copy.
    pub source: PathBuf,
    /// File name to create inside the destination folder.
    pub destination_name: String,
}

/// Concrete set of destination operations for one work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicationPlan {
    /// Destination folder `<base>/<material>/<thickness>`.
    pub destination_folder: PathBuf,
    /// Ordered copy operations; empty for a zero-quantity no-op plan.
    pub operations: Vec<CopyOperation>,
}

impl ReplicationPlan {
    /// Whether the plan performs no work.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Terminal state reached by one work item during a run.
///
/// `NotFound` and `CopyFailed` are recoverable in a later pass;
/// `Copied` and `PartiallyCopied` are terminal for the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Every operation succeeded or was already satisfied.
    Copied,
    /// Some, but not all, operations succeeded (quantity > 1).
    PartiallyCopied,
    /// Every operation failed.
    CopyFailed,
    /// No candidate matched under any strategy or root.
    NotFound,
}

impl ItemOutcome {
    /// Render the outcome as a stable lowercase label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Copied => "copied",
            Self::PartiallyCopied => "partially_copied",
            Self::CopyFailed => "copy_failed",
            Self::NotFound => "not_found",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: u32) -> WorkItem {
        WorkItem {
            product_name: "DR02-04-16-003_R3".to_string(),
            thickness: "1".to_string(),
            quantity,
            material: "1060 Alloy".to_string(),
        }
    }

    #[test]
    fn zero_quantity_items_are_not_actionable() {
        assert!(!item(0).is_actionable());
        assert!(item(1).is_actionable());
        assert!(item(4).is_actionable());
    }

    #[test]
    fn nameless_items_are_not_actionable() {
        let mut nameless = item(2);
        nameless.product_name = "   ".to_string();
        assert!(!nameless.is_actionable());
    }

    #[test]
    fn outcome_labels_are_stable() {
        assert_eq!(ItemOutcome::Copied.as_str(), "copied");
        assert_eq!(ItemOutcome::PartiallyCopied.as_str(), "partially_copied");
        assert_eq!(ItemOutcome::CopyFailed.as_str(), "copy_failed");
        assert_eq!(ItemOutcome::NotFound.as_str(), "not_found");
    }
}
