//! End-to-end pipeline coverage over real temporary trees.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use platewright_config::{IngestSettings, ReplicatorConfig};
use platewright_core::{ReplicationService, WorkItem};
use tempfile::TempDir;

fn config_for(temp: &TempDir, roots: Vec<PathBuf>) -> ReplicatorConfig {
    ReplicatorConfig {
        source_roots: roots,
        destination_base: temp.path().join("layout"),
        max_depth: 4,
        extensions: vec!["dwg".to_string(), "dxf".to_string()],
        manifest_dir: temp.path().join("manifests"),
        ingest: IngestSettings::default(),
    }
}

fn item(product: &str, thickness: &str, quantity: u32, material: &str) -> WorkItem {
    WorkItem {
        product_name: product.to_string(),
        thickness: thickness.to_string(),
        quantity,
        material: material.to_string(),
    }
}

fn manifest_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect();
    paths.sort();
    Ok(paths)
}

#[test]
fn single_quantity_items_keep_their_original_name() -> Result<()> {
    let temp = TempDir::new()?;
    let root = temp.path().join("designs");
    fs::create_dir_all(root.join("released"))?;
    fs::write(root.join("released").join("SC09-03-52-017_R3.dwg"), b"cad")?;

    let config = config_for(&temp, vec![root]);
    let service = ReplicationService::new(&config);
    let report = service.run(vec![item("SC09-03-52-017_R3", "1", 1, "1060 Alloy")])?;

    assert_eq!(report.files_processed, 1);
    assert_eq!(report.files_copied, 1);
    assert_eq!(report.files_not_found, 0);
    assert!(
        config
            .destination_base
            .join("1060 Alloy")
            .join("1")
            .join("SC09-03-52-017_R3.dwg")
            .is_file()
    );
    Ok(())
}

#[test]
fn larger_quantities_are_replicated_with_numbered_prefixes() -> Result<()> {
    let temp = TempDir::new()?;
    let root = temp.path().join("designs");
    fs::create_dir_all(&root)?;
    fs::write(root.join("DR02-04-16-003_R3.dwg"), b"cad")?;

    let config = config_for(&temp, vec![root]);
    let service = ReplicationService::new(&config);
    let report = service.run(vec![item("DR02-04-16-003_R3", "1", 4, "1060 Alloy")])?;

    assert_eq!(report.files_copied, 4);
    let folder = config.destination_base.join("1060 Alloy").join("1");
    for index in 1..=4 {
        assert!(folder.join(format!("{index}_DR02-04-16-003_R3.dwg")).is_file());
    }
    Ok(())
}

#[test]
fn reruns_leave_the_destination_tree_unchanged() -> Result<()> {
    let temp = TempDir::new()?;
    let root = temp.path().join("designs");
    fs::create_dir_all(&root)?;
    fs::write(root.join("DR02-04-16-003_R3.dwg"), b"cad")?;

    let config = config_for(&temp, vec![root]);
    let service = ReplicationService::new(&config);
    let items = || vec![item("DR02-04-16-003_R3", "1", 4, "1060 Alloy")];

    let first = service.run(items())?;
    assert_eq!(first.files_copied, 4);

    let folder = config.destination_base.join("1060 Alloy").join("1");
    let before: Vec<String> = list_names(&folder)?;

    let second = service.run(items())?;
    assert_eq!(second.files_copied, 0);
    assert_eq!(second.errors, 0);
    assert_eq!(list_names(&folder)?, before);
    Ok(())
}

#[test]
fn the_first_root_wins_across_roots() -> Result<()> {
    let temp = TempDir::new()?;
    let root_a = temp.path().join("primary");
    let root_b = temp.path().join("fallback");
    fs::create_dir_all(&root_a)?;
    fs::create_dir_all(&root_b)?;
    fs::write(root_a.join("PART-100.dwg"), b"primary-bytes")?;
    fs::write(root_b.join("PART-100.dwg"), b"fallback!")?;

    let config = config_for(&temp, vec![root_a, root_b]);
    let service = ReplicationService::new(&config);
    service.run(vec![item("PART-100", "2", 1, "Steel")])?;

    let copied = config
        .destination_base
        .join("Steel")
        .join("2")
        .join("PART-100.dwg");
    assert_eq!(fs::read(copied)?, b"primary-bytes");
    Ok(())
}

#[test]
fn recovery_resolves_items_that_appeared_since_the_run() -> Result<()> {
    let temp = TempDir::new()?;
    let root = temp.path().join("designs");
    fs::create_dir_all(&root)?;

    let config = config_for(&temp, vec![root.clone()]);
    let service = ReplicationService::new(&config);

    let first = service.run(vec![
        item("LATE-ARRIVAL_R1", "3", 2, "Brass"),
        item("STILL-MISSING_R1", "3", 1, "Brass"),
    ])?;
    assert_eq!(first.files_not_found, 2);

    let manifests = manifest_paths(&config.manifest_dir)?;
    assert_eq!(manifests.len(), 1);
    let first_manifest = manifests[0].clone();

    // The operator drops the missing drawing into the share, then retries.
    fs::write(root.join("LATE-ARRIVAL_R1.dwg"), b"recovered")?;

    let recovery = service.recover(&first_manifest)?;
    assert_eq!(recovery.files_processed, 2);
    assert_eq!(recovery.files_copied, 2);
    assert_eq!(recovery.files_not_found, 1);
    assert_eq!(recovery.not_found[0].product_name, "STILL-MISSING_R1");

    let folder = config.destination_base.join("Brass").join("3");
    assert!(folder.join("1_LATE-ARRIVAL_R1.dwg").is_file());
    assert!(folder.join("2_LATE-ARRIVAL_R1.dwg").is_file());

    // Still-unresolved items land in a fresh manifest, so recovery is
    // itself retryable.
    let manifests_after = manifest_paths(&config.manifest_dir)?;
    assert_eq!(manifests_after.len(), 2);
    Ok(())
}

#[test]
fn files_below_the_depth_bound_stay_unresolved() -> Result<()> {
    let temp = TempDir::new()?;
    let root = temp.path().join("designs");
    let deep = root.join("a").join("b").join("c").join("d");
    fs::create_dir_all(&deep)?;
    fs::write(deep.join("BURIED-001.dwg"), b"cad")?;

    let config = config_for(&temp, vec![root]);
    let service = ReplicationService::new(&config);
    let report = service.run(vec![item("BURIED-001", "1", 1, "Steel")])?;

    // The file sits five levels below the root; max_depth is four.
    assert_eq!(report.files_not_found, 1);
    assert_eq!(report.files_copied, 0);
    Ok(())
}

fn list_names(folder: &Path) -> Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(folder)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort();
    Ok(names)
}
