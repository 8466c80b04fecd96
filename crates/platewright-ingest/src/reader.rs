//! CSV discovery and row-to-work-item conversion.
//!
//! # Design
//! - Row-level problems are tolerated and counted; only an unreadable file
//!   or a missing required column fails a whole CSV.
//! - Quantity cells may carry float formatting (`"4.0"`); an empty cell
//!   parses as zero and the zero-quantity filter downstream drops the item.

use std::fs;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

use platewright_config::IngestSettings;
use platewright_core::WorkItem;

use crate::error::{IngestError, IngestResult};

/// Work items read from one CSV file plus the rows that failed to convert.
#[derive(Debug, Default)]
pub struct IngestOutcome {
    /// Converted work items in row order.
    pub items: Vec<WorkItem>,
    /// Rows skipped because a required field was missing or unparsable.
    pub malformed: usize,
}

/// List the `*.csv` files under `dir` in lexicographic order.
///
/// # Errors
///
/// Returns `Io` when the directory cannot be enumerated.
pub fn discover_csv_files(dir: &Path) -> IngestResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| IngestError::Io {
        operation: "read_csv_dir",
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| IngestError::Io {
            operation: "read_csv_dir",
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Derive the material label from a CSV file name.
///
/// Strips the configured prefix and the `.csv` suffix; whatever remains is
/// the label, verbatim.
#[must_use]
pub fn material_from_file_name(file_name: &str, prefix: &str) -> String {
    let stem = file_name
        .strip_suffix(".csv")
        .or_else(|| file_name.strip_suffix(".CSV"))
        .unwrap_or(file_name);
    stem.strip_prefix(prefix).unwrap_or(stem).trim().to_string()
}

/// Read one CSV file into work items labelled with `material`.
///
/// Blank rows are skipped silently. Rows with an empty product name, an
/// empty thickness, or an unparsable quantity are logged and counted as
/// malformed, never silently dropped.
///
/// # Errors
///
/// Returns `Csv` when the file cannot be opened or its header row read and
/// `MissingColumn` when a configured column is absent.
pub fn read_work_items(
    path: &Path,
    settings: &IngestSettings,
    material: &str,
) -> IngestResult<IngestOutcome> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let headers = reader
        .headers()
        .map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();
    let product_idx = required_column(path, &headers, &settings.product_column)?;
    let thickness_idx = required_column(path, &headers, &settings.thickness_column)?;
    let quantity_idx = required_column(path, &headers, &settings.quantity_column)?;

    let mut outcome = IngestOutcome::default();
    for (row, record) in reader.records().enumerate() {
        // Header is row 1; data rows are reported 2-based like a spreadsheet.
        let row_number = row + 2;
        let record = match record {
            Ok(record) => record,
            Err(error) => {
                warn!(path = %path.display(), row = row_number, %error, "unreadable csv row");
                outcome.malformed += 1;
                continue;
            }
        };

        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let product = record.get(product_idx).unwrap_or("").trim();
        if product.is_empty() {
            warn!(path = %path.display(), row = row_number, "row missing product name");
            outcome.malformed += 1;
            continue;
        }

        let thickness = record.get(thickness_idx).unwrap_or("").trim();
        if thickness.is_empty() {
            warn!(
                path = %path.display(),
                row = row_number,
                product,
                "row missing thickness"
            );
            outcome.malformed += 1;
            continue;
        }

        let quantity_raw = record.get(quantity_idx).unwrap_or("").trim();
        let Some(quantity) = parse_quantity(quantity_raw) else {
            warn!(
                path = %path.display(),
                row = row_number,
                product,
                value = quantity_raw,
                "row has unparsable quantity"
            );
            outcome.malformed += 1;
            continue;
        };

        outcome.items.push(WorkItem {
            product_name: product.to_string(),
            thickness: thickness.to_string(),
            quantity,
            material: material.to_string(),
        });
    }

    debug!(
        path = %path.display(),
        items = outcome.items.len(),
        malformed = outcome.malformed,
        "csv ingested"
    );
    Ok(outcome)
}

fn required_column(path: &Path, headers: &StringRecord, name: &str) -> IngestResult<usize> {
    headers
        .iter()
        .position(|header| header.trim() == name)
        .ok_or_else(|| IngestError::MissingColumn {
            path: path.to_path_buf(),
            column: name.to_string(),
        })
}

/// Parse a quantity cell, accepting integer and float spellings.
fn parse_quantity(raw: &str) -> Option<u32> {
    if raw.is_empty() {
        return Some(0);
    }
    let value = raw.parse::<f64>().ok()?;
    let truncated = value.trunc();
    if !truncated.is_finite() || truncated < 0.0 || truncated > f64::from(u32::MAX) {
        return None;
    }
    Some(truncated as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use tempfile::TempDir;

    #[test]
    fn material_labels_come_from_the_file_name() {
        let prefix = "Copy of THICKNESS AND MATERIAL DATA - ";
        assert_eq!(
            material_from_file_name("Copy of THICKNESS AND MATERIAL DATA - 1060 Alloy.csv", prefix),
            "1060 Alloy"
        );
        assert_eq!(
            material_from_file_name("AISI 1020.csv", prefix),
            "AISI 1020"
        );
    }

    #[test]
    fn quantities_accept_integer_and_float_spellings() {
        assert_eq!(parse_quantity("4"), Some(4));
        assert_eq!(parse_quantity("4.0"), Some(4));
        assert_eq!(parse_quantity(""), Some(0));
        assert_eq!(parse_quantity("lots"), None);
        assert_eq!(parse_quantity("-2"), None);
    }

    #[test]
    fn rows_become_work_items_and_bad_rows_are_counted() -> Result<(), Box<dyn Error>> {
        let temp = TempDir::new()?;
        let path = temp.path().join("Copy of THICKNESS AND MATERIAL DATA - 1060 Alloy.csv");
        fs::write(
            &path,
            "Product Name,Thickness(mm),Quantity\n\
             SC09-03-52-017_R3,1,1\n\
             DR02-04-16-003_R3,1,4.0\n\
             ,,\n\
             NO-THICKNESS_R1,,2\n\
             BAD-QTY_R1,2,lots\n",
        )?;

        let outcome = read_work_items(&path, &IngestSettings::default(), "1060 Alloy")?;
        assert_eq!(outcome.items.len(), 2);
        assert_eq!(outcome.malformed, 2);
        assert_eq!(outcome.items[0].product_name, "SC09-03-52-017_R3");
        assert_eq!(outcome.items[0].quantity, 1);
        assert_eq!(outcome.items[1].quantity, 4);
        assert_eq!(outcome.items[1].material, "1060 Alloy");
        Ok(())
    }

    #[test]
    fn missing_columns_fail_the_whole_file() -> Result<(), Box<dyn Error>> {
        let temp = TempDir::new()?;
        let path = temp.path().join("data.csv");
        fs::write(&path, "Part,Thickness(mm),Quantity\nX,1,1\n")?;

        let err = read_work_items(&path, &IngestSettings::default(), "Steel").unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { .. }));
        Ok(())
    }

    #[test]
    fn discovery_lists_csv_files_in_order() -> Result<(), Box<dyn Error>> {
        let temp = TempDir::new()?;
        fs::write(temp.path().join("b.csv"), "Product Name\n")?;
        fs::write(temp.path().join("a.CSV"), "Product Name\n")?;
        fs::write(temp.path().join("notes.txt"), "ignored")?;

        let files = discover_csv_files(temp.path())?;
        let names: Vec<_> = files
            .iter()
            .filter_map(|path| path.file_name().and_then(|name| name.to_str()))
            .collect();
        assert_eq!(names, vec!["a.CSV", "b.csv"]);
        Ok(())
    }
}
