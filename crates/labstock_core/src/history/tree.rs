//! Branching undo/redo tree over performed actions.
//!
//! # Responsibility
//! - Execute actions against a catalog and record them as tree
//!   branches from the current position.
//! - Walk the tree on undo/redo, re-running inverses and forwards.
//!
//! # Invariants
//! - Exactly one current node exists at all times; node 0 is the
//!   empty root.
//! - Every non-root node has exactly one incoming branch; branches are
//!   never removed, only re-flagged.
//! - A branch flag of `true` means "undone, available for redo".

use crate::history::action::{Action, ActionError};
use crate::model::inventory::Catalog;
use log::debug;

/// Edge of the tree: an action plus its redo flag and descendant.
#[derive(Debug)]
struct Branch {
    action: Action,
    flagged: bool,
    desc: usize,
}

/// Arena node: optional incoming link plus outgoing branches.
#[derive(Debug, Default)]
struct Node {
    parent: Option<ParentLink>,
    branches: Vec<Branch>,
}

#[derive(Debug, Clone, Copy)]
struct ParentLink {
    node: usize,
    branch: usize,
}

/// History of performed actions with multi-path undo/redo.
///
/// Nodes live in a flat arena addressed by index; "current" is a plain
/// index into it. Abandoned futures stay reachable as flagged sibling
/// branches.
#[derive(Debug)]
pub struct HistoryTree {
    nodes: Vec<Node>,
    current: usize,
    performed: u64,
}

impl Default for HistoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryTree {
    /// Creates a tree holding only the empty root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
            current: 0,
            performed: 0,
        }
    }

    /// Performs an action and records it as a new branch from the
    /// current node.
    ///
    /// On failure the action is dropped and neither the catalog nor
    /// the tree changes.
    pub fn do_action(&mut self, mut action: Action, catalog: &mut Catalog) -> Result<(), ActionError> {
        let kind = action.kind_name();
        action.perform(catalog)?;

        let desc = self.nodes.len();
        let branch = self.nodes[self.current].branches.len();
        self.nodes[self.current].branches.push(Branch {
            action,
            flagged: false,
            desc,
        });
        self.nodes.push(Node {
            parent: Some(ParentLink {
                node: self.current,
                branch,
            }),
            branches: Vec::new(),
        });
        self.current = desc;
        self.performed += 1;

        debug!(
            "event=action_do module=history status=ok kind={} node={} size={}",
            kind, desc, self.performed
        );
        Ok(())
    }

    /// True when the current node has a parent to undo into.
    pub fn undoable(&self) -> bool {
        self.nodes[self.current].parent.is_some()
    }

    /// Reverses the action leading into the current node.
    ///
    /// Returns `Ok(false)` at the root (safe no-op). The reversed
    /// branch is flagged as available for redo.
    pub fn undo(&mut self, catalog: &mut Catalog) -> Result<bool, ActionError> {
        let Some(link) = self.nodes[self.current].parent else {
            return Ok(false);
        };

        let branch = &mut self.nodes[link.node].branches[link.branch];
        branch.action.unperform(catalog)?;
        branch.flagged = true;
        self.current = link.node;

        debug!(
            "event=action_undo module=history status=ok kind={} node={}",
            self.nodes[link.node].branches[link.branch].action.kind_name(),
            self.current
        );
        Ok(true)
    }

    /// True when some outgoing branch of the current node is flagged.
    pub fn redoable(&self) -> bool {
        self.nodes[self.current]
            .branches
            .iter()
            .any(|branch| branch.flagged)
    }

    /// Re-performs the earliest-created flagged branch off the current
    /// node.
    ///
    /// Returns `Ok(false)` when nothing is flagged (safe no-op).
    /// Sibling branches may each carry a flag from having been undone
    /// on their own path; creation order breaks the tie.
    pub fn redo(&mut self, catalog: &mut Catalog) -> Result<bool, ActionError> {
        let Some(branch_index) = self.nodes[self.current]
            .branches
            .iter()
            .position(|branch| branch.flagged)
        else {
            return Ok(false);
        };

        let branch = &mut self.nodes[self.current].branches[branch_index];
        branch.action.perform(catalog)?;
        branch.flagged = false;
        let desc = branch.desc;
        let kind = branch.action.kind_name();
        self.current = desc;

        debug!(
            "event=action_redo module=history status=ok kind={} node={}",
            kind, self.current
        );
        Ok(true)
    }

    /// Lifetime count of accepted `do_action` calls.
    ///
    /// Nodes are never pruned, so this only grows, regardless of any
    /// interleaved undo/redo.
    pub fn size(&self) -> u64 {
        self.performed
    }
}

#[cfg(test)]
mod tests {
    use super::HistoryTree;
    use crate::history::action::{Action, Payload, Target};
    use crate::model::inventory::Catalog;
    use crate::model::item::Item;

    fn add(name: &str) -> Action {
        Action::add(Payload::Item(Item::new(name)), Target::Catalog)
    }

    #[test]
    fn empty_tree_is_neither_undoable_nor_redoable() {
        let tree = HistoryTree::new();
        assert!(!tree.undoable());
        assert!(!tree.redoable());
        assert_eq!(tree.size(), 0);
    }

    #[test]
    fn boundary_undo_and_redo_are_noops() {
        let mut tree = HistoryTree::new();
        let mut catalog = Catalog::new();
        assert!(!tree.undo(&mut catalog).unwrap());
        assert!(!tree.redo(&mut catalog).unwrap());
        assert!(catalog.is_empty());
    }

    #[test]
    fn failed_action_leaves_the_tree_unchanged() {
        let mut tree = HistoryTree::new();
        let mut catalog = Catalog::new();
        let bad = Action::add(
            Payload::Item(Item::new("x")),
            Target::Item(crate::registry::ItemId::from_serial(0)),
        );
        assert!(tree.do_action(bad, &mut catalog).is_err());
        assert_eq!(tree.size(), 0);
        assert!(!tree.undoable());
        assert!(catalog.is_empty());
    }

    #[test]
    fn size_counts_do_action_calls_only() {
        let mut tree = HistoryTree::new();
        let mut catalog = Catalog::new();
        tree.do_action(add("a"), &mut catalog).unwrap();
        tree.do_action(add("b"), &mut catalog).unwrap();
        tree.undo(&mut catalog).unwrap();
        tree.redo(&mut catalog).unwrap();
        tree.undo(&mut catalog).unwrap();
        tree.do_action(add("c"), &mut catalog).unwrap();
        assert_eq!(tree.size(), 3);
    }
}
