use labstock_core::{
    Catalog, CatalogService, CatalogServiceError, Container, EditTarget, FieldValue, Property,
    Record,
};

fn names(catalog: &Catalog) -> Vec<String> {
    catalog
        .items()
        .iter()
        .map(|item| item.name().to_string())
        .collect()
}

#[test]
fn add_item_returns_the_issued_id_and_registers_it() {
    let mut service = CatalogService::new();
    let mut catalog = Catalog::new();

    let first = service.add_item(&mut catalog, "Beaker", "borosilicate").unwrap();
    let second = service.add_item(&mut catalog, "Flask", "").unwrap();

    assert_eq!(first.as_str(), "0");
    assert_eq!(second.as_str(), "1");
    assert!(catalog.registry().contains(&first));
    assert_eq!(catalog.registry().len(), 2);
    let (_, item) = catalog.find_item(&first).unwrap();
    assert_eq!(item.name(), "Beaker");
    assert_eq!(item.notes, "borosilicate");
}

#[test]
fn registry_stays_in_lockstep_with_the_item_sequence() {
    let mut service = CatalogService::new();
    let mut catalog = Catalog::new();
    let id = service.add_item(&mut catalog, "Pipette", "").unwrap();
    service.add_item(&mut catalog, "Burette", "").unwrap();

    service.delete_item(&mut catalog, id.clone()).unwrap();
    assert_eq!(catalog.len(), catalog.registry().len());
    assert!(!catalog.registry().contains(&id));

    service.undo(&mut catalog).unwrap();
    assert_eq!(catalog.len(), catalog.registry().len());
    assert!(catalog.registry().contains(&id));
}

#[test]
fn rename_item_repositions_it_in_sort_order() {
    let mut service = CatalogService::new();
    let mut catalog = Catalog::new();
    let id = service.add_item(&mut catalog, "Acetone", "").unwrap();
    service.add_item(&mut catalog, "Methanol", "").unwrap();
    assert_eq!(names(&catalog), ["Acetone", "Methanol"]);

    assert!(service.rename_item(&mut catalog, &id, "Toluene").unwrap());
    assert_eq!(names(&catalog), ["Methanol", "Toluene"]);

    service.undo(&mut catalog).unwrap();
    assert_eq!(names(&catalog), ["Acetone", "Methanol"]);
    assert_eq!(catalog.items()[0].id(), Some(&id));
}

#[test]
fn rename_subitem_repositions_and_round_trips() {
    let mut service = CatalogService::new();
    let mut catalog = Catalog::new();
    let id = service.add_item(&mut catalog, "Ethanol", "").unwrap();
    service.add_subitem(&mut catalog, &id, "70%", "").unwrap();
    service.add_subitem(&mut catalog, &id, "95%", "").unwrap();

    // Rename "70%" so it sorts after "95%".
    assert!(service.rename_subitem(&mut catalog, &id, 0, "99%").unwrap());
    let (_, item) = catalog.find_item(&id).unwrap();
    let subitem_names: Vec<&str> = item.subitems().iter().map(|sub| sub.name()).collect();
    assert_eq!(subitem_names, ["95%", "99%"]);

    service.undo(&mut catalog).unwrap();
    let (_, item) = catalog.find_item(&id).unwrap();
    let subitem_names: Vec<&str> = item.subitems().iter().map(|sub| sub.name()).collect();
    assert_eq!(subitem_names, ["70%", "95%"]);
}

#[test]
fn noop_edits_create_no_history_entries() {
    let mut service = CatalogService::new();
    let mut catalog = Catalog::new();
    let id = service.add_item(&mut catalog, "Hexane", "dry").unwrap();
    let before = service.history_size();

    assert!(!service.set_item_notes(&mut catalog, &id, "dry").unwrap());
    assert!(!service.rename_item(&mut catalog, &id, "Hexane").unwrap());
    assert_eq!(service.history_size(), before);
    assert!(!service.redoable());
}

#[test]
fn tag_and_container_edits_round_trip_through_undo() {
    let mut service = CatalogService::new();
    let mut catalog = Catalog::new();
    let id = service.add_item(&mut catalog, "Ethanol", "").unwrap();
    service.add_subitem(&mut catalog, &id, "95%", "").unwrap();
    service
        .add_tag(&mut catalog, &id, 0, "flammable", "#ff4500")
        .unwrap();
    service
        .add_container(&mut catalog, &id, 0, Container::new(2, 500.0, 600.0, "mL"))
        .unwrap();

    assert!(service
        .apply_edit(
            &mut catalog,
            EditTarget::Tag(id.clone(), 0, 0),
            Property::Color,
            FieldValue::Text("#00ff00".to_string()),
        )
        .unwrap());
    assert!(service
        .apply_edit(
            &mut catalog,
            EditTarget::Container(id.clone(), 0, 0),
            Property::Remaining,
            FieldValue::Quantity(150.0),
        )
        .unwrap());

    let sub = catalog.subitem(&id, 0).unwrap();
    assert_eq!(sub.tags()[0].color(), "#00ff00");
    assert_eq!(sub.containers()[0].remaining, 150.0);

    service.undo(&mut catalog).unwrap();
    service.undo(&mut catalog).unwrap();
    let sub = catalog.subitem(&id, 0).unwrap();
    assert_eq!(sub.tags()[0].color(), "#ff4500");
    assert_eq!(sub.containers()[0].remaining, 600.0);
}

#[test]
fn invalid_tag_color_is_rejected_before_history_grows() {
    let mut service = CatalogService::new();
    let mut catalog = Catalog::new();
    let id = service.add_item(&mut catalog, "Ethanol", "").unwrap();
    service.add_subitem(&mut catalog, &id, "95%", "").unwrap();
    let before = service.history_size();

    let err = service
        .add_tag(&mut catalog, &id, 0, "flammable", "orange")
        .unwrap_err();
    assert!(matches!(err, CatalogServiceError::Tag(_)));
    assert_eq!(service.history_size(), before);

    service
        .add_tag(&mut catalog, &id, 0, "flammable", "#ff4500")
        .unwrap();
    let err = service
        .apply_edit(
            &mut catalog,
            EditTarget::Tag(id.clone(), 0, 0),
            Property::Color,
            FieldValue::Text("blue".to_string()),
        )
        .unwrap_err();
    assert!(matches!(err, CatalogServiceError::Action(_)));
}

#[test]
fn deleting_nested_entries_restores_their_slots_on_undo() {
    let mut service = CatalogService::new();
    let mut catalog = Catalog::new();
    let id = service.add_item(&mut catalog, "Ethanol", "").unwrap();
    service.add_subitem(&mut catalog, &id, "95%", "").unwrap();
    service.add_tag(&mut catalog, &id, 0, "first", "#111111").unwrap();
    service.add_tag(&mut catalog, &id, 0, "second", "#222222").unwrap();
    service.add_tag(&mut catalog, &id, 0, "third", "#333333").unwrap();

    // Delete the middle tag and undo; it must come back in place, not
    // at the end.
    service.delete_tag(&mut catalog, &id, 0, 1).unwrap();
    let tag_names: Vec<&str> = catalog.subitem(&id, 0).unwrap().tags().iter().map(|t| t.name()).collect();
    assert_eq!(tag_names, ["first", "third"]);

    service.undo(&mut catalog).unwrap();
    let tag_names: Vec<&str> = catalog.subitem(&id, 0).unwrap().tags().iter().map(|t| t.name()).collect();
    assert_eq!(tag_names, ["first", "second", "third"]);
}

#[test]
fn delete_of_unknown_targets_fails_fast() {
    let mut service = CatalogService::new();
    let mut catalog = Catalog::new();
    let id = service.add_item(&mut catalog, "Ethanol", "").unwrap();

    let err = service.delete_subitem(&mut catalog, &id, 0).unwrap_err();
    assert!(matches!(err, CatalogServiceError::Action(_)));

    service.delete_item(&mut catalog, id.clone()).unwrap();
    let err = service.delete_item(&mut catalog, id).unwrap_err();
    assert!(matches!(err, CatalogServiceError::Action(_)));
    assert_eq!(service.history_size(), 2);
}

#[test]
fn divergent_edits_keep_both_futures_reachable() {
    let mut service = CatalogService::new();
    let mut catalog = Catalog::new();
    let id = service.add_item(&mut catalog, "Ethanol", "old notes").unwrap();

    service.set_item_notes(&mut catalog, &id, "path one").unwrap();
    service.undo(&mut catalog).unwrap();
    service.set_item_notes(&mut catalog, &id, "path two").unwrap();
    service.undo(&mut catalog).unwrap();

    // Earliest flagged sibling wins the redo tie-break.
    assert!(service.redo(&mut catalog).unwrap());
    let (_, item) = catalog.find_item(&id).unwrap();
    assert_eq!(item.notes, "path one");
}
