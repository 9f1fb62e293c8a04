//! Catalog editing use-case service.
//!
//! # Responsibility
//! - Build actions from caller input and route them through one
//!   history tree per catalog.
//! - Normalize names and skip no-op edits before any history entry is
//!   created.
//!
//! # Invariants
//! - Every mutation offered here is undoable; the service never
//!   touches catalog collections directly.
//! - Blank (all-whitespace) names are rejected before action
//!   construction.
//! - An edit whose captured value equals the requested value creates
//!   no history entry.

use crate::history::action::{
    Action, ActionError, DeleteAction, EditAction, EditTarget, FieldValue, Payload, Property,
    Target,
};
use crate::history::tree::HistoryTree;
use crate::model::inventory::Catalog;
use crate::model::item::{Container, Item, SubItem, Tag, TagValidationError};
use crate::registry::ItemId;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from catalog service operations.
#[derive(Debug)]
pub enum CatalogServiceError {
    /// Name is blank after trimming.
    InvalidName,
    /// Tag input failed validation.
    Tag(TagValidationError),
    /// Mutation-layer failure.
    Action(ActionError),
    /// Internal mismatch between a performed action and its read-back.
    Inconsistent(&'static str),
}

impl Display for CatalogServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(f, "name must not be blank"),
            Self::Tag(err) => write!(f, "{err}"),
            Self::Action(err) => write!(f, "{err}"),
            Self::Inconsistent(details) => write!(f, "inconsistent catalog state: {details}"),
        }
    }
}

impl Error for CatalogServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Tag(err) => Some(err),
            Self::Action(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ActionError> for CatalogServiceError {
    fn from(value: ActionError) -> Self {
        Self::Action(value)
    }
}

impl From<TagValidationError> for CatalogServiceError {
    fn from(value: TagValidationError) -> Self {
        Self::Tag(value)
    }
}

/// Editing facade over one catalog's history tree.
///
/// The catalog itself is borrowed per call, so one service can drive
/// any catalog it is consistently paired with; the history tree is
/// owned here and dies with the service (it is never persisted).
#[derive(Debug)]
pub struct CatalogService {
    history: HistoryTree,
}

impl Default for CatalogService {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogService {
    pub fn new() -> Self {
        Self {
            history: HistoryTree::new(),
        }
    }

    /// Adds a top-level item; reports the freshly issued ID.
    pub fn add_item(
        &mut self,
        catalog: &mut Catalog,
        name: &str,
        notes: &str,
    ) -> Result<ItemId, CatalogServiceError> {
        let name = normalize_name(name)?;
        let serial = catalog.registry().next_serial();
        let item = Item::new(name).with_notes(notes);
        self.history
            .do_action(Action::add(Payload::Item(item), Target::Catalog), catalog)?;
        let id = ItemId::from_serial(serial);
        if !catalog.registry().contains(&id) {
            return Err(CatalogServiceError::Inconsistent(
                "issued id missing after item add",
            ));
        }
        Ok(id)
    }

    /// Adds a sub-item under a live item.
    pub fn add_subitem(
        &mut self,
        catalog: &mut Catalog,
        item: &ItemId,
        name: &str,
        specifications: &str,
    ) -> Result<(), CatalogServiceError> {
        let name = normalize_name(name)?;
        let sub = SubItem::new(name).with_specifications(specifications);
        self.history.do_action(
            Action::add(Payload::SubItem(sub), Target::Item(item.clone())),
            catalog,
        )?;
        Ok(())
    }

    /// Appends a container to a sub-item.
    pub fn add_container(
        &mut self,
        catalog: &mut Catalog,
        item: &ItemId,
        subitem: usize,
        container: Container,
    ) -> Result<(), CatalogServiceError> {
        self.history.do_action(
            Action::add(
                Payload::Container(container),
                Target::SubItem(item.clone(), subitem),
            ),
            catalog,
        )?;
        Ok(())
    }

    /// Appends a validated tag to a sub-item.
    pub fn add_tag(
        &mut self,
        catalog: &mut Catalog,
        item: &ItemId,
        subitem: usize,
        name: &str,
        color: &str,
    ) -> Result<(), CatalogServiceError> {
        let name = normalize_name(name)?;
        let tag = Tag::new(name, color)?;
        self.history.do_action(
            Action::add(Payload::Tag(tag), Target::SubItem(item.clone(), subitem)),
            catalog,
        )?;
        Ok(())
    }

    /// Applies a tracked property edit.
    ///
    /// Returns `Ok(false)` without touching history when the requested
    /// value equals the current one.
    pub fn apply_edit(
        &mut self,
        catalog: &mut Catalog,
        target: EditTarget,
        property: Property,
        to: FieldValue,
    ) -> Result<bool, CatalogServiceError> {
        let edit = EditAction::capture(catalog, target, property, to)?;
        if edit.is_noop() {
            debug!("event=edit_skip module=service status=noop property={property}");
            return Ok(false);
        }
        self.history.do_action(edit.into(), catalog)?;
        Ok(true)
    }

    /// Renames a top-level item (repositions it in sort order).
    pub fn rename_item(
        &mut self,
        catalog: &mut Catalog,
        item: &ItemId,
        name: &str,
    ) -> Result<bool, CatalogServiceError> {
        let name = normalize_name(name)?;
        self.apply_edit(
            catalog,
            EditTarget::Item(item.clone()),
            Property::Name,
            FieldValue::Text(name),
        )
    }

    /// Replaces a top-level item's notes.
    pub fn set_item_notes(
        &mut self,
        catalog: &mut Catalog,
        item: &ItemId,
        notes: &str,
    ) -> Result<bool, CatalogServiceError> {
        self.apply_edit(
            catalog,
            EditTarget::Item(item.clone()),
            Property::Notes,
            FieldValue::Text(notes.to_string()),
        )
    }

    /// Renames a sub-item (repositions it in sort order).
    pub fn rename_subitem(
        &mut self,
        catalog: &mut Catalog,
        item: &ItemId,
        subitem: usize,
        name: &str,
    ) -> Result<bool, CatalogServiceError> {
        let name = normalize_name(name)?;
        self.apply_edit(
            catalog,
            EditTarget::SubItem(item.clone(), subitem),
            Property::Name,
            FieldValue::Text(name),
        )
    }

    /// Replaces a sub-item's specification text.
    pub fn set_subitem_specifications(
        &mut self,
        catalog: &mut Catalog,
        item: &ItemId,
        subitem: usize,
        specifications: &str,
    ) -> Result<bool, CatalogServiceError> {
        self.apply_edit(
            catalog,
            EditTarget::SubItem(item.clone(), subitem),
            Property::Specifications,
            FieldValue::Text(specifications.to_string()),
        )
    }

    /// Deletes a top-level item by ID.
    pub fn delete_item(
        &mut self,
        catalog: &mut Catalog,
        item: ItemId,
    ) -> Result<(), CatalogServiceError> {
        let action = DeleteAction::item(catalog, item)?;
        self.history.do_action(action.into(), catalog)?;
        Ok(())
    }

    /// Deletes a sub-item at a position.
    pub fn delete_subitem(
        &mut self,
        catalog: &mut Catalog,
        item: &ItemId,
        index: usize,
    ) -> Result<(), CatalogServiceError> {
        let action = DeleteAction::subitem(catalog, item.clone(), index)?;
        self.history.do_action(action.into(), catalog)?;
        Ok(())
    }

    /// Deletes a container at a position.
    pub fn delete_container(
        &mut self,
        catalog: &mut Catalog,
        item: &ItemId,
        subitem: usize,
        index: usize,
    ) -> Result<(), CatalogServiceError> {
        let action = DeleteAction::container(catalog, item.clone(), subitem, index)?;
        self.history.do_action(action.into(), catalog)?;
        Ok(())
    }

    /// Deletes a tag at a position.
    pub fn delete_tag(
        &mut self,
        catalog: &mut Catalog,
        item: &ItemId,
        subitem: usize,
        index: usize,
    ) -> Result<(), CatalogServiceError> {
        let action = DeleteAction::tag(catalog, item.clone(), subitem, index)?;
        self.history.do_action(action.into(), catalog)?;
        Ok(())
    }

    /// Undoes the most recent action on the current path.
    pub fn undo(&mut self, catalog: &mut Catalog) -> Result<bool, CatalogServiceError> {
        Ok(self.history.undo(catalog)?)
    }

    /// Redoes the earliest flagged branch off the current node.
    pub fn redo(&mut self, catalog: &mut Catalog) -> Result<bool, CatalogServiceError> {
        Ok(self.history.redo(catalog)?)
    }

    pub fn undoable(&self) -> bool {
        self.history.undoable()
    }

    pub fn redoable(&self) -> bool {
        self.history.redoable()
    }

    /// Lifetime count of performed actions.
    pub fn history_size(&self) -> u64 {
        self.history.size()
    }
}

fn normalize_name(value: &str) -> Result<String, CatalogServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogServiceError::InvalidName);
    }
    Ok(trimmed.to_string())
}
