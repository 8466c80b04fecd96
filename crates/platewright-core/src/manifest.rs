//! Line-oriented manifest of unresolved items.
//!
//! The record layout is kept compatible with the manifests written by the
//! tool's predecessors, so previously captured files remain consumable:
//!
//! ```text
//! Product Name: SC09-03-52-017_R3
//! Material: 1060 Alloy
//! Thickness: 1
//! Quantity: 1
//! ```
//!
//! with records separated by blank lines.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{ReplicateError, ReplicateResult};
use crate::report::NotFoundRecord;

const FIELD_PRODUCT: &str = "Product Name:";
const FIELD_MATERIAL: &str = "Material:";
const FIELD_THICKNESS: &str = "Thickness:";
const FIELD_QUANTITY: &str = "Quantity:";

/// File name for a manifest written at `timestamp` by run `run_id`.
///
/// The run fragment keeps two back-to-back runs within the same second from
/// clobbering each other's manifests.
#[must_use]
pub fn manifest_file_name(timestamp: &DateTime<Utc>, run_id: Uuid) -> String {
    let run = run_id.simple().to_string();
    format!(
        "not_found_{}_{}.txt",
        timestamp.format("%Y%m%d-%H%M%S"),
        &run[..8]
    )
}

/// Write `records` to a timestamped manifest under `dir`.
///
/// Returns the path of the manifest written.
///
/// # Errors
///
/// Returns `Io` when the directory cannot be created or the file cannot be
/// written.
pub fn write_manifest(
    dir: &Path,
    records: &[NotFoundRecord],
    run_id: Uuid,
) -> ReplicateResult<PathBuf> {
    let path = dir.join(manifest_file_name(&Utc::now(), run_id));

    let mut body = String::new();
    for record in records {
        let _ = writeln!(body, "{FIELD_PRODUCT} {}", record.product_name);
        let _ = writeln!(body, "{FIELD_MATERIAL} {}", record.material);
        let _ = writeln!(body, "{FIELD_THICKNESS} {}", record.thickness);
        let _ = writeln!(body, "{FIELD_QUANTITY} {}", record.quantity);
        body.push('\n');
    }

    fs::create_dir_all(dir).map_err(|err| ReplicateError::io("create_manifest_dir", dir, err))?;
    fs::write(&path, body).map_err(|err| ReplicateError::io("write_manifest", &path, err))?;
    Ok(path)
}

/// Parse a manifest produced by [`write_manifest`] or the legacy tooling.
///
/// Unknown lines are ignored; records are delimited by their `Quantity:`
/// line, which must close a record whose other fields have all been seen.
///
/// # Errors
///
/// Returns `Io` when the file cannot be read and `Manifest` for truncated
/// records or unparsable quantities, with the offending line number.
pub fn parse_manifest(path: &Path) -> ReplicateResult<Vec<NotFoundRecord>> {
    let content =
        fs::read_to_string(path).map_err(|err| ReplicateError::io("read_manifest", path, err))?;

    let mut records = Vec::new();
    let mut current = PartialRecord::default();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(value) = line.strip_prefix(FIELD_PRODUCT) {
            if current.started() {
                return Err(ReplicateError::manifest(
                    "parse_manifest",
                    path,
                    Some(index + 1),
                    "record restarted before its quantity line",
                ));
            }
            current.product_name = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix(FIELD_MATERIAL) {
            current.material = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix(FIELD_THICKNESS) {
            current.thickness = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix(FIELD_QUANTITY) {
            let quantity = value.trim().parse::<u32>().map_err(|_| {
                ReplicateError::manifest(
                    "parse_manifest",
                    path,
                    Some(index + 1),
                    "quantity is not a non-negative integer",
                )
            })?;
            let record = current.take(quantity).ok_or_else(|| {
                ReplicateError::manifest(
                    "parse_manifest",
                    path,
                    Some(index + 1),
                    "quantity closed an incomplete record",
                )
            })?;
            records.push(record);
        }
    }

    if current.started() {
        return Err(ReplicateError::manifest(
            "parse_manifest",
            path,
            None,
            "manifest ended mid-record",
        ));
    }

    Ok(records)
}

#[derive(Default)]
struct PartialRecord {
    product_name: Option<String>,
    material: Option<String>,
    thickness: Option<String>,
}

impl PartialRecord {
    fn started(&self) -> bool {
        self.product_name.is_some() || self.material.is_some() || self.thickness.is_some()
    }

    fn take(&mut self, quantity: u32) -> Option<NotFoundRecord> {
        Some(NotFoundRecord {
            product_name: self.product_name.take()?,
            material: self.material.take()?,
            thickness: self.thickness.take()?,
            quantity,
        })
    }
}
