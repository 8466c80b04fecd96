//! Run accumulation and unresolved-item records.
//!
//! # Design
//! - The report is an explicitly owned accumulator threaded through the
//!   pipeline driver, never process-wide state.

use serde::{Deserialize, Serialize};

use crate::model::WorkItem;

/// An unresolved work item persisted for a later recovery pass.
///
/// Carries every field needed to re-submit the item verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotFoundRecord {
    /// Product identifier that failed to resolve.
    pub product_name: String,
    /// Raw thickness label carried through for re-submission.
    pub thickness: String,
    /// Material label carried through for re-submission.
    pub material: String,
    /// Requested quantity carried through for re-submission.
    pub quantity: u32,
}

impl NotFoundRecord {
    /// Rebuild the work item this record was captured from.
    #[must_use]
    pub fn to_work_item(&self) -> WorkItem {
        WorkItem {
            product_name: self.product_name.clone(),
            thickness: self.thickness.clone(),
            quantity: self.quantity,
            material: self.material.clone(),
        }
    }
}

impl From<&WorkItem> for NotFoundRecord {
    fn from(item: &WorkItem) -> Self {
        Self {
            product_name: item.product_name.clone(),
            thickness: item.thickness.clone(),
            material: item.material.clone(),
            quantity: item.quantity,
        }
    }
}

/// Counters and unresolved items accumulated over one run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct RunReport {
    /// Actionable work items that entered the pipeline.
    pub files_processed: usize,
    /// Copy operations that wrote new bytes.
    pub files_copied: usize,
    /// Work items with no candidate under any root.
    pub files_not_found: usize,
    /// Per-item and per-operation errors observed.
    pub errors: usize,
    /// Unresolved items in processing order.
    pub not_found: Vec<NotFoundRecord>,
}

impl RunReport {
    /// Record an item that could not be resolved under any root.
    pub fn record_not_found(&mut self, item: &WorkItem) {
        self.files_not_found += 1;
        self.not_found.push(NotFoundRecord::from(item));
    }

    /// Count additional errors surfaced by a collaborator, such as
    /// malformed rows reported by the ingest layer.
    pub fn add_errors(&mut self, count: usize) {
        self.errors += count;
    }

    /// Fold another report into this one, preserving record order.
    pub fn absorb(&mut self, other: Self) {
        self.files_processed += other.files_processed;
        self.files_copied += other.files_copied;
        self.files_not_found += other.files_not_found;
        self.errors += other.errors;
        self.not_found.extend(other.not_found);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> WorkItem {
        WorkItem {
            product_name: "SC09-03-52-017_R3".to_string(),
            thickness: "1".to_string(),
            quantity: 1,
            material: "1060 Alloy".to_string(),
        }
    }

    #[test]
    fn not_found_records_round_trip_to_work_items() {
        let original = item();
        let record = NotFoundRecord::from(&original);
        assert_eq!(record.to_work_item(), original);
    }

    #[test]
    fn recording_not_found_keeps_counter_and_list_in_step() {
        let mut report = RunReport::default();
        report.record_not_found(&item());
        assert_eq!(report.files_not_found, 1);
        assert_eq!(report.not_found.len(), 1);
        assert_eq!(report.not_found[0].product_name, "SC09-03-52-017_R3");
    }

    #[test]
    fn absorb_merges_counters_and_preserves_order() {
        let mut first = RunReport::default();
        first.files_processed = 2;
        first.files_copied = 1;
        first.record_not_found(&item());

        let mut second = RunReport::default();
        second.files_processed = 3;
        second.errors = 1;
        let mut other_item = item();
        other_item.product_name = "DR02-04-16-003_R3".to_string();
        second.record_not_found(&other_item);

        first.absorb(second);
        assert_eq!(first.files_processed, 5);
        assert_eq!(first.files_copied, 1);
        assert_eq!(first.files_not_found, 2);
        assert_eq!(first.errors, 1);
        assert_eq!(first.not_found[0].product_name, "SC09-03-52-017_R3");
        assert_eq!(first.not_found[1].product_name, "DR02-04-16-003_R3");
    }
}
