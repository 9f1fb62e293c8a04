//! Item, SubItem, Tag, and Container records.
//!
//! # Responsibility
//! - Define the hierarchical inventory entities and their validated
//!   constructors.
//! - Expose structural collections read-only; mutation goes through
//!   the action layer so it stays sorted and undoable.
//!
//! # Invariants
//! - `subitems` is sorted by name (code-point order).
//! - `tags` and `containers` are unordered, append-only collections.
//! - Tag colors are `#rrggbb` hex strings.

use crate::model::record::{Record, RecordCore};
use crate::registry::ItemId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid hex color regex"));

/// Validation failures for tag construction and edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValidationError {
    /// Color is not a `#rrggbb` hex string.
    InvalidColor(String),
}

impl Display for TagValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidColor(value) => {
                write!(f, "tag color must be a `#rrggbb` hex string, got `{value}`")
            }
        }
    }
}

impl Error for TagValidationError {}

/// Top-level inventory record owning an ordered SubItem sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(flatten)]
    core: RecordCore,
    /// Stable registry ID, stamped once at first registration.
    id: Option<ItemId>,
    /// Free-form notes recorded on this item.
    pub notes: String,
    subitems: Vec<SubItem>,
}

impl Item {
    /// Creates an unregistered item with no sub-items.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            core: RecordCore::new(name),
            id: None,
            notes: String::new(),
            subitems: Vec::new(),
        }
    }

    /// Sets initial notes; intended for use before the first insertion.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Stable registry ID, if the item has been registered.
    pub fn id(&self) -> Option<&ItemId> {
        self.id.as_ref()
    }

    pub(crate) fn stamp_id(&mut self, id: ItemId) {
        self.id = Some(id);
    }

    /// Ordered sub-item sequence, sorted by name.
    pub fn subitems(&self) -> &[SubItem] {
        &self.subitems
    }

    pub(crate) fn subitems_mut(&mut self) -> &mut Vec<SubItem> {
        &mut self.subitems
    }

    pub(crate) fn touch(&mut self) {
        self.core.touch();
    }
}

impl Record for Item {
    fn name(&self) -> &str {
        &self.core.name
    }

    fn edited_at(&self) -> i64 {
        self.core.edited_at
    }

    fn rename(&mut self, name: impl Into<String>) {
        self.core.rename(name);
    }
}

/// Named variant/batch owned by an Item; carries tags and containers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubItem {
    #[serde(flatten)]
    core: RecordCore,
    /// Free-form specification text for this variant.
    pub specifications: String,
    tags: Vec<Tag>,
    containers: Vec<Container>,
}

impl SubItem {
    /// Creates a sub-item with no tags or containers.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            core: RecordCore::new(name),
            specifications: String::new(),
            tags: Vec::new(),
            containers: Vec::new(),
        }
    }

    /// Sets initial specification text.
    pub fn with_specifications(mut self, specifications: impl Into<String>) -> Self {
        self.specifications = specifications.into();
        self
    }

    /// Tags assigned to this sub-item, in insertion order.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Containers assigned to this sub-item, in insertion order.
    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    pub(crate) fn tags_mut(&mut self) -> &mut Vec<Tag> {
        &mut self.tags
    }

    pub(crate) fn containers_mut(&mut self) -> &mut Vec<Container> {
        &mut self.containers
    }

    pub(crate) fn touch(&mut self) {
        self.core.touch();
    }
}

impl Record for SubItem {
    fn name(&self) -> &str {
        &self.core.name
    }

    fn edited_at(&self) -> i64 {
        self.core.edited_at
    }

    fn rename(&mut self, name: impl Into<String>) {
        self.core.rename(name);
    }
}

/// Colored label attached to a sub-item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TagWire", into = "TagWire")]
pub struct Tag {
    name: String,
    color: String,
}

impl Tag {
    /// Creates a tag, validating the color string.
    pub fn new(
        name: impl Into<String>,
        color: impl Into<String>,
    ) -> Result<Self, TagValidationError> {
        let color = color.into();
        validate_color(&color)?;
        Ok(Self {
            name: name.into(),
            color,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `#rrggbb` hex color.
    pub fn color(&self) -> &str {
        &self.color
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub(crate) fn set_color(&mut self, color: String) -> Result<(), TagValidationError> {
        validate_color(&color)?;
        self.color = color;
        Ok(())
    }
}

/// Rejects color values that are not `#rrggbb` hex strings.
pub fn validate_color(value: &str) -> Result<(), TagValidationError> {
    if HEX_COLOR_RE.is_match(value) {
        Ok(())
    } else {
        Err(TagValidationError::InvalidColor(value.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TagWire {
    name: String,
    color: String,
}

impl TryFrom<TagWire> for Tag {
    type Error = String;

    fn try_from(wire: TagWire) -> Result<Self, Self::Error> {
        Tag::new(wire.name, wire.color).map_err(|err| err.to_string())
    }
}

impl From<Tag> for TagWire {
    fn from(tag: Tag) -> Self {
        Self {
            name: tag.name,
            color: tag.color,
        }
    }
}

/// Physical container quantities for a sub-item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    /// Number of containers of this kind.
    pub count: u32,
    /// Numeric capacity of one container.
    pub unit_capacity: f64,
    /// Total remaining amount across the containers.
    pub remaining: f64,
    /// Unit for `unit_capacity` and `remaining` (e.g. "mL", "g").
    pub capacity_unit: String,
}

impl Container {
    pub fn new(count: u32, unit_capacity: f64, remaining: f64, capacity_unit: impl Into<String>) -> Self {
        Self {
            count,
            unit_capacity,
            remaining,
            capacity_unit: capacity_unit.into(),
        }
    }
}
