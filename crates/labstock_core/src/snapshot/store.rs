//! Snapshot store contracts and JSON file implementation.
//!
//! # Responsibility
//! - Define the persistence seam consumed by embedding applications.
//! - Implement it over a single JSON document on disk.

use super::{SnapshotError, SnapshotResult};
use crate::model::inventory::{Inventory, SUPPORTED_MAJOR_VER};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Persistence seam for whole-inventory snapshots.
pub trait SnapshotStore {
    /// Writes the full document, replacing any previous snapshot.
    fn save(&self, inventory: &Inventory) -> SnapshotResult<()>;
    /// Reads the full document back; history is never restored.
    fn load(&self) -> SnapshotResult<Inventory>;
}

/// Snapshot store over one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn save(&self, inventory: &Inventory) -> SnapshotResult<()> {
        let started_at = Instant::now();
        let result = serde_json::to_string_pretty(inventory)
            .map_err(SnapshotError::from)
            .and_then(|body| std::fs::write(&self.path, body).map_err(SnapshotError::from));

        match &result {
            Ok(()) => info!(
                "event=snapshot_save module=snapshot status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=snapshot_save module=snapshot status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    fn load(&self) -> SnapshotResult<Inventory> {
        let started_at = Instant::now();
        let result = load_inventory(&self.path);

        match &result {
            Ok(_) => info!(
                "event=snapshot_load module=snapshot status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=snapshot_load module=snapshot status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

fn load_inventory(path: &Path) -> SnapshotResult<Inventory> {
    let body = std::fs::read_to_string(path)?;
    let inventory: Inventory = serde_json::from_str(&body)?;
    if inventory.major_ver > SUPPORTED_MAJOR_VER {
        return Err(SnapshotError::UnsupportedVersion {
            found: inventory.major_ver,
            supported: SUPPORTED_MAJOR_VER,
        });
    }
    Ok(inventory)
}
