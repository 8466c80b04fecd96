//! Pipeline driver: preflight, run, and recovery entry points.
//!
//! # Design
//! - Sequential pipeline over the item list; the report accumulator is
//!   owned here and mutated only after each item completes or fails.
//! - Recovery feeds a parsed manifest back into the same pipeline, so the
//!   two entry points cannot drift in behavior.
//! - Only preflight failures abort a run; everything downstream is
//!   per-item or per-operation and is recorded, never raised.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use uuid::Uuid;

use platewright_config::ReplicatorConfig;

use crate::copy::CopyExecutor;
use crate::error::{ReplicateError, ReplicateResult};
use crate::manifest;
use crate::matcher::PathMatcher;
use crate::model::WorkItem;
use crate::plan::ReplicationPlanner;
use crate::report::{NotFoundRecord, RunReport};
use crate::search::MultiRootSearcher;

/// Drives work items through search, planning, and copy execution.
#[derive(Debug, Clone)]
pub struct ReplicationService {
    searcher: MultiRootSearcher,
    planner: ReplicationPlanner,
    executor: CopyExecutor,
    destination_base: PathBuf,
    manifest_dir: PathBuf,
}

impl ReplicationService {
    /// Wire the pipeline from a validated configuration snapshot.
    #[must_use]
    pub fn new(config: &ReplicatorConfig) -> Self {
        let matcher = PathMatcher::new(&config.extensions);
        Self {
            searcher: MultiRootSearcher::new(
                config.source_roots.clone(),
                config.max_depth,
                matcher,
            ),
            planner: ReplicationPlanner::new(&config.destination_base),
            executor: CopyExecutor,
            destination_base: config.destination_base.clone(),
            manifest_dir: config.manifest_dir.clone(),
        }
    }

    /// Verify the configured roots before any copying begins.
    ///
    /// # Errors
    ///
    /// Returns [`ReplicateError::Preflight`] when a source root is not a
    /// readable directory, and `Io` when the destination base cannot be
    /// created. These are the only run-fatal failure classes.
    pub fn preflight(&self) -> ReplicateResult<()> {
        for root in self.searcher.roots() {
            if !root.is_dir() {
                return Err(ReplicateError::preflight("source_root", root));
            }
        }
        fs::create_dir_all(&self.destination_base).map_err(|err| {
            ReplicateError::io("create_destination_base", &self.destination_base, err)
        })?;
        Ok(())
    }

    /// Process `items` through search → plan → copy and return the report.
    ///
    /// Non-actionable items (zero quantity, blank name) are skipped before
    /// the search stage. Per-item and per-operation failures are recorded
    /// in the report and never abort the run. When any item stays
    /// unresolved, a timestamped manifest is written under the configured
    /// manifest directory for a later recovery pass.
    ///
    /// # Errors
    ///
    /// Only preflight failures are returned; see [`Self::preflight`].
    pub fn run<I>(&self, items: I) -> ReplicateResult<RunReport>
    where
        I: IntoIterator<Item = WorkItem>,
    {
        self.preflight()?;

        let run_id = Uuid::new_v4();
        let mut report = RunReport::default();

        for item in items {
            if !item.is_actionable() {
                debug!(
                    run_id = %run_id,
                    product = %item.product_name,
                    quantity = item.quantity,
                    "skipping non-actionable item"
                );
                continue;
            }
            report.files_processed += 1;
            self.process_item(run_id, &item, &mut report);
        }

        if !report.not_found.is_empty() {
            match manifest::write_manifest(&self.manifest_dir, &report.not_found, run_id) {
                Ok(path) => info!(
                    run_id = %run_id,
                    manifest = %path.display(),
                    unresolved = report.not_found.len(),
                    "unresolved items persisted"
                ),
                Err(error) => {
                    warn!(run_id = %run_id, ?error, "failed to persist not-found manifest");
                    report.errors += 1;
                }
            }
        }

        info!(
            run_id = %run_id,
            processed = report.files_processed,
            copied = report.files_copied,
            not_found = report.files_not_found,
            errors = report.errors,
            "run complete"
        );
        Ok(report)
    }

    /// Re-run resolution for a previously persisted manifest.
    ///
    /// Reuses the run pipeline verbatim, so items still unresolved are
    /// written to a fresh manifest rather than silently dropped and
    /// recovery is itself retryable.
    ///
    /// # Errors
    ///
    /// Returns manifest read/parse failures and preflight failures.
    pub fn recover(&self, manifest_path: &Path) -> ReplicateResult<RunReport> {
        let records = manifest::parse_manifest(manifest_path)?;
        info!(
            manifest = %manifest_path.display(),
            records = records.len(),
            "recovery pass started"
        );
        self.run(records.iter().map(NotFoundRecord::to_work_item))
    }

    fn process_item(&self, run_id: Uuid, item: &WorkItem, report: &mut RunReport) {
        info!(
            run_id = %run_id,
            product = %item.product_name,
            material = %item.material,
            thickness = %item.thickness,
            quantity = item.quantity,
            "searching"
        );

        let Some(candidate) = self.searcher.search(&item.product_name) else {
            warn!(run_id = %run_id, product = %item.product_name, "no candidate under any root");
            report.record_not_found(item);
            return;
        };

        let plan = match self.planner.plan(item, &candidate) {
            Ok(plan) => plan,
            Err(error) => {
                warn!(
                    run_id = %run_id,
                    product = %item.product_name,
                    ?error,
                    "item could not be planned"
                );
                report.errors += 1;
                return;
            }
        };

        let result = self.executor.execute(&plan);
        report.files_copied += result.copied;
        report.errors += result.failures.len();

        info!(
            run_id = %run_id,
            product = %item.product_name,
            outcome = result.outcome().as_str(),
            copied = result.copied,
            already_satisfied = result.already_satisfied,
            failed = result.failures.len(),
            "item finished"
        );
    }
}
