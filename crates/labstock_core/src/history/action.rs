//! Reversible command values for catalog mutations.
//!
//! # Responsibility
//! - Pair every forward mutation with its exact inverse.
//! - Dispatch on a discriminated payload/target pair instead of
//!   runtime type inspection.
//!
//! # Invariants
//! - `perform` records whatever location bookkeeping `unperform`
//!   needs; `unperform` consumes it.
//! - Payloads live either in the action's slot (detached) or in the
//!   catalog (live), never in both.
//! - A failed dispatch restores the payload slot and leaves the
//!   catalog untouched.

use crate::model::inventory::Catalog;
use crate::model::item::{Container, Item, SubItem, Tag};
use crate::model::record::Record;
use crate::registry::{ItemId, RegistryError};
use crate::sorted::{by_record_name, sorted_add};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Payload category carried alongside the value for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Item,
    SubItem,
    Container,
    Tag,
}

impl Display for PayloadKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Item => "item",
            Self::SubItem => "subitem",
            Self::Container => "container",
            Self::Tag => "tag",
        };
        f.write_str(text)
    }
}

/// The entity an add/delete action moves in or out of the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Item(Item),
    SubItem(SubItem),
    Container(Container),
    Tag(Tag),
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::Item(_) => PayloadKind::Item,
            Self::SubItem(_) => PayloadKind::SubItem,
            Self::Container(_) => PayloadKind::Container,
            Self::Tag(_) => PayloadKind::Tag,
        }
    }
}

/// Direct container of the mutated entity, addressed by value path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// The catalog's top-level item sequence.
    Catalog,
    /// A live item's sub-item sequence.
    Item(ItemId),
    /// A live sub-item's tag/container collections.
    SubItem(ItemId, usize),
}

impl Target {
    fn kind_name(&self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Item(_) => "item",
            Self::SubItem(_, _) => "subitem",
        }
    }
}

/// The record an edit action writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    Item(ItemId),
    SubItem(ItemId, usize),
    Tag(ItemId, usize, usize),
    Container(ItemId, usize, usize),
}

impl EditTarget {
    fn kind_name(&self) -> &'static str {
        match self {
            Self::Item(_) => "item",
            Self::SubItem(_, _) => "subitem",
            Self::Tag(_, _, _) => "tag",
            Self::Container(_, _, _) => "container",
        }
    }
}

/// Tracked, editable property of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    Name,
    Notes,
    Specifications,
    Color,
    Count,
    UnitCapacity,
    Remaining,
    CapacityUnit,
}

impl Display for Property {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Name => "name",
            Self::Notes => "notes",
            Self::Specifications => "specifications",
            Self::Color => "color",
            Self::Count => "count",
            Self::UnitCapacity => "unit_capacity",
            Self::Remaining => "remaining",
            Self::CapacityUnit => "capacity_unit",
        };
        f.write_str(text)
    }
}

/// Property value shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Count(u32),
    Quantity(f64),
}

/// Errors from action construction, `perform`, and `unperform`.
///
/// All variants are fatal and propagate to the caller unretried.
#[derive(Debug)]
pub enum ActionError {
    /// Payload category cannot be applied against the given target.
    UnsupportedOperand {
        payload: PayloadKind,
        target: &'static str,
    },
    /// The target record does not carry this property.
    UnsupportedProperty {
        property: Property,
        target: &'static str,
    },
    /// The supplied value has the wrong shape for this property.
    MismatchedValue(Property),
    /// No live item carries this ID.
    ItemNotFound(ItemId),
    /// Sub-item index out of range for the addressed item.
    SubItemNotFound { item: ItemId, index: usize },
    /// Tag/container index out of range for the addressed sub-item.
    EntryNotFound {
        item: ItemId,
        subitem: usize,
        index: usize,
    },
    /// The payload slot was already consumed (perform called twice).
    PayloadMissing,
    /// Recorded location bookkeeping is absent or out of range.
    LocationMissing,
    /// Color value is not a `#rrggbb` hex string.
    InvalidColor(String),
    /// Identity bookkeeping failure.
    Registry(RegistryError),
}

impl Display for ActionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedOperand { payload, target } => {
                write!(f, "cannot apply {payload} payload to {target} target")
            }
            Self::UnsupportedProperty { property, target } => {
                write!(f, "{target} records carry no `{property}` property")
            }
            Self::MismatchedValue(property) => {
                write!(f, "wrong value shape for property `{property}`")
            }
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::SubItemNotFound { item, index } => {
                write!(f, "subitem {index} not found on item {item}")
            }
            Self::EntryNotFound {
                item,
                subitem,
                index,
            } => write!(f, "entry {index} not found on item {item} subitem {subitem}"),
            Self::PayloadMissing => write!(f, "action payload already consumed"),
            Self::LocationMissing => write!(f, "action location bookkeeping is unavailable"),
            Self::InvalidColor(value) => {
                write!(f, "tag color must be a `#rrggbb` hex string, got `{value}`")
            }
            Self::Registry(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ActionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Registry(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RegistryError> for ActionError {
    fn from(value: RegistryError) -> Self {
        Self::Registry(value)
    }
}

/// One reversible mutation.
#[derive(Debug)]
pub enum Action {
    Add(AddAction),
    Edit(EditAction),
    Delete(DeleteAction),
}

impl Action {
    /// Builds an add action; the payload/target combination is checked
    /// at perform time.
    pub fn add(payload: Payload, target: Target) -> Self {
        Self::Add(AddAction::new(payload, target))
    }

    /// Short label for logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Edit(_) => "edit",
            Self::Delete(_) => "delete",
        }
    }

    pub(crate) fn perform(&mut self, catalog: &mut Catalog) -> Result<(), ActionError> {
        match self {
            Self::Add(action) => action.perform(catalog),
            Self::Edit(action) => action.perform(catalog),
            Self::Delete(action) => action.perform(catalog),
        }
    }

    pub(crate) fn unperform(&mut self, catalog: &mut Catalog) -> Result<(), ActionError> {
        match self {
            Self::Add(action) => action.unperform(catalog),
            Self::Edit(action) => action.unperform(catalog),
            Self::Delete(action) => action.unperform(catalog),
        }
    }
}

impl From<AddAction> for Action {
    fn from(value: AddAction) -> Self {
        Self::Add(value)
    }
}

impl From<EditAction> for Action {
    fn from(value: EditAction) -> Self {
        Self::Edit(value)
    }
}

impl From<DeleteAction> for Action {
    fn from(value: DeleteAction) -> Self {
        Self::Delete(value)
    }
}

/// Inserts a payload into the catalog; the inverse removes it.
#[derive(Debug)]
pub struct AddAction {
    kind: PayloadKind,
    payload: Option<Payload>,
    target: Target,
    location: Option<usize>,
}

impl AddAction {
    pub fn new(payload: Payload, target: Target) -> Self {
        Self {
            kind: payload.kind(),
            payload: Some(payload),
            target,
            location: None,
        }
    }

    fn perform(&mut self, catalog: &mut Catalog) -> Result<(), ActionError> {
        let payload = self.payload.take().ok_or(ActionError::PayloadMissing)?;
        match (payload, &self.target) {
            (Payload::Item(mut item), Target::Catalog) => {
                let (items, registry) = catalog.parts_mut();
                match registry.register(&mut item) {
                    Ok(_) => {
                        self.location = Some(sorted_add(item, items, by_record_name));
                        Ok(())
                    }
                    Err(err) => {
                        self.payload = Some(Payload::Item(item));
                        Err(err.into())
                    }
                }
            }
            (Payload::SubItem(sub), Target::Item(id)) => match catalog.item_mut(id) {
                Some(item) => {
                    self.location = Some(sorted_add(sub, item.subitems_mut(), by_record_name));
                    Ok(())
                }
                None => {
                    let id = id.clone();
                    self.payload = Some(Payload::SubItem(sub));
                    Err(ActionError::ItemNotFound(id))
                }
            },
            (Payload::Container(container), Target::SubItem(id, index)) => {
                match resolve_subitem_mut(catalog, id, *index) {
                    Ok(sub) => {
                        sub.containers_mut().push(container);
                        self.location = Some(sub.containers().len() - 1);
                        Ok(())
                    }
                    Err(err) => {
                        self.payload = Some(Payload::Container(container));
                        Err(err)
                    }
                }
            }
            (Payload::Tag(tag), Target::SubItem(id, index)) => {
                match resolve_subitem_mut(catalog, id, *index) {
                    Ok(sub) => {
                        sub.tags_mut().push(tag);
                        self.location = Some(sub.tags().len() - 1);
                        Ok(())
                    }
                    Err(err) => {
                        self.payload = Some(Payload::Tag(tag));
                        Err(err)
                    }
                }
            }
            (payload, target) => {
                let err = ActionError::UnsupportedOperand {
                    payload: payload.kind(),
                    target: target.kind_name(),
                };
                self.payload = Some(payload);
                Err(err)
            }
        }
    }

    fn unperform(&mut self, catalog: &mut Catalog) -> Result<(), ActionError> {
        let location = self.location.ok_or(ActionError::LocationMissing)?;
        match (self.kind, &self.target) {
            (PayloadKind::Item, Target::Catalog) => {
                let (items, registry) = catalog.parts_mut();
                if location >= items.len() {
                    return Err(ActionError::LocationMissing);
                }
                registry.deregister(&items[location])?;
                let item = items.remove(location);
                self.payload = Some(Payload::Item(item));
            }
            (PayloadKind::SubItem, Target::Item(id)) => {
                let item = catalog
                    .item_mut(id)
                    .ok_or_else(|| ActionError::ItemNotFound(id.clone()))?;
                if location >= item.subitems().len() {
                    return Err(ActionError::LocationMissing);
                }
                let sub = item.subitems_mut().remove(location);
                self.payload = Some(Payload::SubItem(sub));
            }
            (PayloadKind::Container, Target::SubItem(id, index)) => {
                let sub = resolve_subitem_mut(catalog, id, *index)?;
                if location >= sub.containers().len() {
                    return Err(ActionError::LocationMissing);
                }
                let container = sub.containers_mut().remove(location);
                self.payload = Some(Payload::Container(container));
            }
            (PayloadKind::Tag, Target::SubItem(id, index)) => {
                let sub = resolve_subitem_mut(catalog, id, *index)?;
                if location >= sub.tags().len() {
                    return Err(ActionError::LocationMissing);
                }
                let tag = sub.tags_mut().remove(location);
                self.payload = Some(Payload::Tag(tag));
            }
            (kind, target) => {
                return Err(ActionError::UnsupportedOperand {
                    payload: kind,
                    target: target.kind_name(),
                });
            }
        }
        self.location = None;
        Ok(())
    }
}

/// Writes one tracked property; the inverse restores the prior value.
#[derive(Debug)]
pub struct EditAction {
    target: EditTarget,
    property: Property,
    from: FieldValue,
    to: FieldValue,
}

impl EditAction {
    /// Captures the current value of the property and builds the edit.
    ///
    /// Fails fast on a missing target, a property the target kind does
    /// not carry, a value of the wrong shape, or an invalid color.
    pub fn capture(
        catalog: &Catalog,
        target: EditTarget,
        property: Property,
        to: FieldValue,
    ) -> Result<Self, ActionError> {
        let from = read_property(catalog, &target, property)?;
        if std::mem::discriminant(&from) != std::mem::discriminant(&to) {
            return Err(ActionError::MismatchedValue(property));
        }
        if property == Property::Color {
            if let FieldValue::Text(value) = &to {
                crate::model::item::validate_color(value)
                    .map_err(|_| ActionError::InvalidColor(value.clone()))?;
            }
        }
        Ok(Self {
            target,
            property,
            from,
            to,
        })
    }

    /// True when the edit would not change anything.
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }

    fn perform(&mut self, catalog: &mut Catalog) -> Result<(), ActionError> {
        let value = self.to.clone();
        self.apply(catalog, value)
    }

    fn unperform(&mut self, catalog: &mut Catalog) -> Result<(), ActionError> {
        let value = self.from.clone();
        self.apply(catalog, value)
    }

    fn apply(&mut self, catalog: &mut Catalog, value: FieldValue) -> Result<(), ActionError> {
        let target = self.target.clone();
        match (&target, self.property) {
            (EditTarget::Item(id), Property::Name) => {
                let name = expect_text(self.property, value)?;
                let index = catalog
                    .find_index(id)
                    .ok_or_else(|| ActionError::ItemNotFound(id.clone()))?;
                let items = catalog.items_mut();
                items[index].rename(name);
                // Reposition so the sequence is sorted after the edit.
                let item = items.remove(index);
                sorted_add(item, items, by_record_name);
                Ok(())
            }
            (EditTarget::Item(id), Property::Notes) => {
                let notes = expect_text(self.property, value)?;
                let item = catalog
                    .item_mut(id)
                    .ok_or_else(|| ActionError::ItemNotFound(id.clone()))?;
                item.notes = notes;
                item.touch();
                Ok(())
            }
            (EditTarget::SubItem(id, index), Property::Name) => {
                let name = expect_text(self.property, value)?;
                let id = id.clone();
                let index = *index;
                let item = catalog
                    .item_mut(&id)
                    .ok_or_else(|| ActionError::ItemNotFound(id.clone()))?;
                if index >= item.subitems().len() {
                    return Err(ActionError::SubItemNotFound { item: id, index });
                }
                let subitems = item.subitems_mut();
                subitems[index].rename(name);
                let sub = subitems.remove(index);
                let new_index = sorted_add(sub, subitems, by_record_name);
                // The rename may have moved the record; keep the target
                // index valid for the inverse call.
                self.target = EditTarget::SubItem(id, new_index);
                Ok(())
            }
            (EditTarget::SubItem(id, index), Property::Specifications) => {
                let text = expect_text(self.property, value)?;
                let sub = resolve_subitem_mut(catalog, id, *index)?;
                sub.specifications = text;
                sub.touch();
                Ok(())
            }
            (EditTarget::Tag(id, subitem, index), property) => {
                let tag = resolve_tag_mut(catalog, id, *subitem, *index)?;
                match property {
                    Property::Name => {
                        tag.set_name(expect_text(property, value)?);
                        Ok(())
                    }
                    Property::Color => {
                        let color = expect_text(property, value)?;
                        tag.set_color(color)
                            .map_err(|err| match err {
                                crate::model::item::TagValidationError::InvalidColor(v) => {
                                    ActionError::InvalidColor(v)
                                }
                            })
                    }
                    other => Err(ActionError::UnsupportedProperty {
                        property: other,
                        target: target.kind_name(),
                    }),
                }
            }
            (EditTarget::Container(id, subitem, index), property) => {
                let container = resolve_container_mut(catalog, id, *subitem, *index)?;
                match property {
                    Property::Count => {
                        container.count = expect_count(property, value)?;
                        Ok(())
                    }
                    Property::UnitCapacity => {
                        container.unit_capacity = expect_quantity(property, value)?;
                        Ok(())
                    }
                    Property::Remaining => {
                        container.remaining = expect_quantity(property, value)?;
                        Ok(())
                    }
                    Property::CapacityUnit => {
                        container.capacity_unit = expect_text(property, value)?;
                        Ok(())
                    }
                    other => Err(ActionError::UnsupportedProperty {
                        property: other,
                        target: target.kind_name(),
                    }),
                }
            }
            (target, property) => Err(ActionError::UnsupportedProperty {
                property,
                target: target.kind_name(),
            }),
        }
    }
}

/// Removes a payload from the catalog; the inverse re-inserts it.
#[derive(Debug)]
pub struct DeleteAction {
    locator: DeleteLocator,
    payload: Option<Payload>,
}

#[derive(Debug)]
enum DeleteLocator {
    Item(ItemId),
    SubItem {
        item: ItemId,
        index: usize,
    },
    Container {
        item: ItemId,
        subitem: usize,
        index: usize,
    },
    Tag {
        item: ItemId,
        subitem: usize,
        index: usize,
    },
}

impl DeleteAction {
    /// Deletes a top-level item, located by its stable ID.
    pub fn item(catalog: &Catalog, id: ItemId) -> Result<Self, ActionError> {
        if catalog.find_index(&id).is_none() {
            return Err(ActionError::ItemNotFound(id));
        }
        Ok(Self {
            locator: DeleteLocator::Item(id),
            payload: None,
        })
    }

    /// Deletes a sub-item at a caller-supplied position.
    pub fn subitem(catalog: &Catalog, item: ItemId, index: usize) -> Result<Self, ActionError> {
        let (_, owner) = catalog
            .find_item(&item)
            .ok_or_else(|| ActionError::ItemNotFound(item.clone()))?;
        if index >= owner.subitems().len() {
            return Err(ActionError::SubItemNotFound { item, index });
        }
        Ok(Self {
            locator: DeleteLocator::SubItem { item, index },
            payload: None,
        })
    }

    /// Deletes a container at a caller-supplied position.
    pub fn container(
        catalog: &Catalog,
        item: ItemId,
        subitem: usize,
        index: usize,
    ) -> Result<Self, ActionError> {
        let sub = resolve_subitem(catalog, &item, subitem)?;
        if index >= sub.containers().len() {
            return Err(ActionError::EntryNotFound {
                item,
                subitem,
                index,
            });
        }
        Ok(Self {
            locator: DeleteLocator::Container {
                item,
                subitem,
                index,
            },
            payload: None,
        })
    }

    /// Deletes a tag at a caller-supplied position.
    pub fn tag(
        catalog: &Catalog,
        item: ItemId,
        subitem: usize,
        index: usize,
    ) -> Result<Self, ActionError> {
        let sub = resolve_subitem(catalog, &item, subitem)?;
        if index >= sub.tags().len() {
            return Err(ActionError::EntryNotFound {
                item,
                subitem,
                index,
            });
        }
        Ok(Self {
            locator: DeleteLocator::Tag {
                item,
                subitem,
                index,
            },
            payload: None,
        })
    }

    fn perform(&mut self, catalog: &mut Catalog) -> Result<(), ActionError> {
        if self.payload.is_some() {
            return Err(ActionError::PayloadMissing);
        }
        match &self.locator {
            DeleteLocator::Item(id) => {
                let (items, registry) = catalog.parts_mut();
                let index = items
                    .iter()
                    .position(|item| item.id() == Some(id))
                    .ok_or_else(|| ActionError::ItemNotFound(id.clone()))?;
                registry.deregister(&items[index])?;
                self.payload = Some(Payload::Item(items.remove(index)));
            }
            DeleteLocator::SubItem { item, index } => {
                let owner = catalog
                    .item_mut(item)
                    .ok_or_else(|| ActionError::ItemNotFound(item.clone()))?;
                if *index >= owner.subitems().len() {
                    return Err(ActionError::SubItemNotFound {
                        item: item.clone(),
                        index: *index,
                    });
                }
                self.payload = Some(Payload::SubItem(owner.subitems_mut().remove(*index)));
            }
            DeleteLocator::Container {
                item,
                subitem,
                index,
            } => {
                let sub = resolve_subitem_mut(catalog, item, *subitem)?;
                if *index >= sub.containers().len() {
                    return Err(ActionError::EntryNotFound {
                        item: item.clone(),
                        subitem: *subitem,
                        index: *index,
                    });
                }
                self.payload = Some(Payload::Container(sub.containers_mut().remove(*index)));
            }
            DeleteLocator::Tag {
                item,
                subitem,
                index,
            } => {
                let sub = resolve_subitem_mut(catalog, item, *subitem)?;
                if *index >= sub.tags().len() {
                    return Err(ActionError::EntryNotFound {
                        item: item.clone(),
                        subitem: *subitem,
                        index: *index,
                    });
                }
                self.payload = Some(Payload::Tag(sub.tags_mut().remove(*index)));
            }
        }
        Ok(())
    }

    fn unperform(&mut self, catalog: &mut Catalog) -> Result<(), ActionError> {
        let payload = self.payload.take().ok_or(ActionError::PayloadMissing)?;
        match (payload, &self.locator) {
            (Payload::Item(mut item), DeleteLocator::Item(_)) => {
                let (items, registry) = catalog.parts_mut();
                match registry.register(&mut item) {
                    Ok(_) => {
                        // Undoing a delete re-runs the sorted insertion
                        // rather than restoring the original index.
                        sorted_add(item, items, by_record_name);
                        Ok(())
                    }
                    Err(err) => {
                        self.payload = Some(Payload::Item(item));
                        Err(err.into())
                    }
                }
            }
            (Payload::SubItem(sub), DeleteLocator::SubItem { item, .. }) => {
                match catalog.item_mut(item) {
                    Some(owner) => {
                        sorted_add(sub, owner.subitems_mut(), by_record_name);
                        Ok(())
                    }
                    None => {
                        let id = item.clone();
                        self.payload = Some(Payload::SubItem(sub));
                        Err(ActionError::ItemNotFound(id))
                    }
                }
            }
            (
                Payload::Container(container),
                DeleteLocator::Container {
                    item,
                    subitem,
                    index,
                },
            ) => match resolve_subitem_mut(catalog, item, *subitem) {
                Ok(sub) => {
                    if *index > sub.containers().len() {
                        let restored = Payload::Container(container);
                        self.payload = Some(restored);
                        return Err(ActionError::LocationMissing);
                    }
                    // Unordered collection: restore the recorded slot so
                    // round trips are deep-equal.
                    sub.containers_mut().insert(*index, container);
                    Ok(())
                }
                Err(err) => {
                    self.payload = Some(Payload::Container(container));
                    Err(err)
                }
            },
            (
                Payload::Tag(tag),
                DeleteLocator::Tag {
                    item,
                    subitem,
                    index,
                },
            ) => match resolve_subitem_mut(catalog, item, *subitem) {
                Ok(sub) => {
                    if *index > sub.tags().len() {
                        self.payload = Some(Payload::Tag(tag));
                        return Err(ActionError::LocationMissing);
                    }
                    sub.tags_mut().insert(*index, tag);
                    Ok(())
                }
                Err(err) => {
                    self.payload = Some(Payload::Tag(tag));
                    Err(err)
                }
            },
            (payload, _) => {
                let err = ActionError::UnsupportedOperand {
                    payload: payload.kind(),
                    target: "delete locator",
                };
                self.payload = Some(payload);
                Err(err)
            }
        }
    }
}

fn resolve_subitem<'c>(
    catalog: &'c Catalog,
    id: &ItemId,
    index: usize,
) -> Result<&'c SubItem, ActionError> {
    let (_, item) = catalog
        .find_item(id)
        .ok_or_else(|| ActionError::ItemNotFound(id.clone()))?;
    item.subitems()
        .get(index)
        .ok_or_else(|| ActionError::SubItemNotFound {
            item: id.clone(),
            index,
        })
}

fn resolve_subitem_mut<'c>(
    catalog: &'c mut Catalog,
    id: &ItemId,
    index: usize,
) -> Result<&'c mut SubItem, ActionError> {
    let item = catalog
        .item_mut(id)
        .ok_or_else(|| ActionError::ItemNotFound(id.clone()))?;
    if index >= item.subitems().len() {
        return Err(ActionError::SubItemNotFound {
            item: id.clone(),
            index,
        });
    }
    Ok(&mut item.subitems_mut()[index])
}

fn resolve_tag_mut<'c>(
    catalog: &'c mut Catalog,
    id: &ItemId,
    subitem: usize,
    index: usize,
) -> Result<&'c mut Tag, ActionError> {
    let id_owned = id.clone();
    let sub = resolve_subitem_mut(catalog, id, subitem)?;
    if index >= sub.tags().len() {
        return Err(ActionError::EntryNotFound {
            item: id_owned,
            subitem,
            index,
        });
    }
    Ok(&mut sub.tags_mut()[index])
}

fn resolve_container_mut<'c>(
    catalog: &'c mut Catalog,
    id: &ItemId,
    subitem: usize,
    index: usize,
) -> Result<&'c mut Container, ActionError> {
    let id_owned = id.clone();
    let sub = resolve_subitem_mut(catalog, id, subitem)?;
    if index >= sub.containers().len() {
        return Err(ActionError::EntryNotFound {
            item: id_owned,
            subitem,
            index,
        });
    }
    Ok(&mut sub.containers_mut()[index])
}

fn read_property(
    catalog: &Catalog,
    target: &EditTarget,
    property: Property,
) -> Result<FieldValue, ActionError> {
    match (target, property) {
        (EditTarget::Item(id), Property::Name) => {
            let (_, item) = catalog
                .find_item(id)
                .ok_or_else(|| ActionError::ItemNotFound(id.clone()))?;
            Ok(FieldValue::Text(item.name().to_string()))
        }
        (EditTarget::Item(id), Property::Notes) => {
            let (_, item) = catalog
                .find_item(id)
                .ok_or_else(|| ActionError::ItemNotFound(id.clone()))?;
            Ok(FieldValue::Text(item.notes.clone()))
        }
        (EditTarget::SubItem(id, index), Property::Name) => {
            let sub = resolve_subitem(catalog, id, *index)?;
            Ok(FieldValue::Text(sub.name().to_string()))
        }
        (EditTarget::SubItem(id, index), Property::Specifications) => {
            let sub = resolve_subitem(catalog, id, *index)?;
            Ok(FieldValue::Text(sub.specifications.clone()))
        }
        (EditTarget::Tag(id, subitem, index), Property::Name | Property::Color) => {
            let sub = resolve_subitem(catalog, id, *subitem)?;
            let tag = sub
                .tags()
                .get(*index)
                .ok_or_else(|| ActionError::EntryNotFound {
                    item: id.clone(),
                    subitem: *subitem,
                    index: *index,
                })?;
            Ok(FieldValue::Text(match property {
                Property::Color => tag.color().to_string(),
                _ => tag.name().to_string(),
            }))
        }
        (EditTarget::Container(id, subitem, index), property) => {
            let sub = resolve_subitem(catalog, id, *subitem)?;
            let container =
                sub.containers()
                    .get(*index)
                    .ok_or_else(|| ActionError::EntryNotFound {
                        item: id.clone(),
                        subitem: *subitem,
                        index: *index,
                    })?;
            match property {
                Property::Count => Ok(FieldValue::Count(container.count)),
                Property::UnitCapacity => Ok(FieldValue::Quantity(container.unit_capacity)),
                Property::Remaining => Ok(FieldValue::Quantity(container.remaining)),
                Property::CapacityUnit => Ok(FieldValue::Text(container.capacity_unit.clone())),
                other => Err(ActionError::UnsupportedProperty {
                    property: other,
                    target: target.kind_name(),
                }),
            }
        }
        (target, property) => Err(ActionError::UnsupportedProperty {
            property,
            target: target.kind_name(),
        }),
    }
}

fn expect_text(property: Property, value: FieldValue) -> Result<String, ActionError> {
    match value {
        FieldValue::Text(text) => Ok(text),
        _ => Err(ActionError::MismatchedValue(property)),
    }
}

fn expect_count(property: Property, value: FieldValue) -> Result<u32, ActionError> {
    match value {
        FieldValue::Count(count) => Ok(count),
        _ => Err(ActionError::MismatchedValue(property)),
    }
}

fn expect_quantity(property: Property, value: FieldValue) -> Result<f64, ActionError> {
    match value {
        FieldValue::Quantity(quantity) => Ok(quantity),
        _ => Err(ActionError::MismatchedValue(property)),
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, ActionError, EditAction, EditTarget, FieldValue, Payload, Property, Target};
    use crate::model::inventory::Catalog;
    use crate::model::item::{Item, SubItem};
    use crate::registry::ItemId;

    fn catalog_with_item() -> (Catalog, ItemId) {
        let mut catalog = Catalog::new();
        let mut action = Action::add(Payload::Item(Item::new("water")), Target::Catalog);
        action.perform(&mut catalog).unwrap();
        let id = catalog.items()[0].id().unwrap().clone();
        (catalog, id)
    }

    #[test]
    fn mismatched_payload_and_target_is_unsupported() {
        let (mut catalog, id) = catalog_with_item();
        let mut action = Action::add(Payload::SubItem(SubItem::new("1 M")), Target::Catalog);
        let err = action.perform(&mut catalog).unwrap_err();
        assert!(matches!(err, ActionError::UnsupportedOperand { .. }));

        let mut action = Action::add(Payload::Item(Item::new("salt")), Target::Item(id));
        let err = action.perform(&mut catalog).unwrap_err();
        assert!(matches!(err, ActionError::UnsupportedOperand { .. }));
        // Failed dispatch must leave the catalog untouched.
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn failed_perform_keeps_the_payload_for_retry_inspection() {
        let mut catalog = Catalog::new();
        let missing = ItemId::from_serial(9);
        let mut action = Action::add(Payload::SubItem(SubItem::new("x")), Target::Item(missing));
        assert!(action.perform(&mut catalog).is_err());
        // A second attempt still sees the payload rather than failing
        // with PayloadMissing.
        let err = action.perform(&mut catalog).unwrap_err();
        assert!(matches!(err, ActionError::ItemNotFound(_)));
    }

    #[test]
    fn edit_capture_rejects_unknown_properties_and_shapes() {
        let (catalog, id) = catalog_with_item();

        let err = EditAction::capture(
            &catalog,
            EditTarget::Item(id.clone()),
            Property::Count,
            FieldValue::Count(3),
        )
        .unwrap_err();
        assert!(matches!(err, ActionError::UnsupportedProperty { .. }));

        let err = EditAction::capture(
            &catalog,
            EditTarget::Item(id),
            Property::Notes,
            FieldValue::Count(3),
        )
        .unwrap_err();
        assert!(matches!(err, ActionError::MismatchedValue(Property::Notes)));
    }

    #[test]
    fn edit_capture_detects_noops() {
        let (catalog, id) = catalog_with_item();
        let edit = EditAction::capture(
            &catalog,
            EditTarget::Item(id.clone()),
            Property::Name,
            FieldValue::Text("water".to_string()),
        )
        .unwrap();
        assert!(edit.is_noop());

        let edit = EditAction::capture(
            &catalog,
            EditTarget::Item(id),
            Property::Name,
            FieldValue::Text("ice".to_string()),
        )
        .unwrap();
        assert!(!edit.is_noop());
    }
}
