//! Core record-keeping engine for labstock.
//!
//! Holds the hierarchical inventory model and the mutation/history
//! subsystem that keeps every structural change sorted, identified,
//! and undoable. This crate is the single source of truth for
//! business invariants; embedding layers stay thin.

pub mod history;
pub mod logging;
pub mod model;
pub mod registry;
pub mod service;
pub mod snapshot;
pub mod sorted;

pub use history::{
    Action, ActionError, AddAction, DeleteAction, EditAction, EditTarget, FieldValue, HistoryTree,
    Payload, PayloadKind, Property, Target,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::inventory::{Catalog, Inventory, SUPPORTED_MAJOR_VER};
pub use model::item::{Container, Item, SubItem, Tag, TagValidationError};
pub use model::record::Record;
pub use registry::{IdentityRegistry, ItemId, RegistryError};
pub use service::catalog_service::{CatalogService, CatalogServiceError};
pub use snapshot::{JsonFileStore, SnapshotError, SnapshotResult, SnapshotStore};
pub use sorted::{by_record_name, sorted_add};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
