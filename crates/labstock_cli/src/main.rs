//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable that drives the editing flow end to
//!   end for quick local sanity checks.
//! - Keep output deterministic apart from issued IDs.

use labstock_core::{CatalogService, CatalogServiceError, Container, Inventory, Record};

fn main() {
    println!("labstock_core version={}", labstock_core::core_version());

    let log_dir = std::env::temp_dir().join("labstock-logs");
    if let Err(err) =
        labstock_core::init_logging(labstock_core::default_log_level(), &log_dir.to_string_lossy())
    {
        eprintln!("logging disabled: {err}");
    }

    if let Err(err) = run_demo() {
        eprintln!("demo failed: {err}");
        std::process::exit(1);
    }
}

fn run_demo() -> Result<(), CatalogServiceError> {
    let mut inventory = Inventory::new();
    let mut service = CatalogService::new();
    let chemicals = &mut inventory.chemicals;

    let ethanol = service.add_item(chemicals, "Ethanol", "store away from flames")?;
    service.add_item(chemicals, "Acetone", "")?;
    service.add_subitem(chemicals, &ethanol, "95%", "denatured")?;
    service.add_tag(chemicals, &ethanol, 0, "flammable", "#ff4500")?;
    service.add_container(chemicals, &ethanol, 0, Container::new(2, 500.0, 750.0, "mL"))?;

    println!("after edits:");
    print_catalog(chemicals);

    service.undo(chemicals)?;
    service.undo(chemicals)?;
    println!("after two undos:");
    print_catalog(chemicals);

    service.redo(chemicals)?;
    service.redo(chemicals)?;
    println!("after two redos (actions={}):", service.history_size());
    print_catalog(chemicals);

    Ok(())
}

fn print_catalog(catalog: &labstock_core::Catalog) {
    for item in catalog.items() {
        let id = item.id().map(|id| id.to_string()).unwrap_or_default();
        println!("  [{id}] {}", item.name());
        for sub in item.subitems() {
            let tags: Vec<&str> = sub.tags().iter().map(|tag| tag.name()).collect();
            println!(
                "      {} tags={:?} containers={}",
                sub.name(),
                tags,
                sub.containers().len()
            );
        }
    }
}
