//! Mutation and history subsystem.
//!
//! # Responsibility
//! - Define reversible command values for every structural mutation
//!   and tracked property edit.
//! - Record performed commands in a branching tree supporting
//!   multi-path undo/redo.
//!
//! # Invariants
//! - Every structural mutation of a catalog goes through an action, so
//!   it is sort-order-preserving and undoable.
//! - Failed actions leave both the catalog and the tree unchanged.

pub mod action;
pub mod tree;

pub use action::{
    Action, ActionError, AddAction, DeleteAction, EditAction, EditTarget, FieldValue, Payload,
    PayloadKind, Property, Target,
};
pub use tree::HistoryTree;
