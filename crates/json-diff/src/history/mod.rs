//! Branching, patch-based state history.
//!
//! A [`History`] owns a tree of immutable edit records rooted at the initial
//! value, a tip pointer, a linear undo trail and the materialised current
//! value. Every operation takes `&self` and returns a new `History` that
//! shares the node map and every untouched subtree of the current value with
//! its input; on error the input is unchanged.
//!
//! # Example
//!
//! ```
//! use json_diff::builder::PathBuilder;
//! use json_diff::history::{History, SequentialIds};
//! use json_diff_util::Value;
//! use serde_json::json;
//!
//! let mut ids = SequentialIds::new();
//! let doc = PathBuilder::new();
//! let h = History::new(Value::from(json!({"title": "First Draft", "tags": ["draft"]})));
//!
//! let edits = [
//!     doc.key("title").replace("Revised"),
//!     doc.key("tags").push("published"),
//! ];
//! let h = h.dispatch(&edits, &mut ids).unwrap();
//! assert_eq!(h.current().to_json(), json!({"title": "Revised", "tags": ["draft", "published"]}));
//!
//! let h = h.undo().unwrap();
//! assert_eq!(h.current().to_json(), json!({"title": "First Draft", "tags": ["draft"]}));
//! assert!(h.can_redo());
//! ```

mod ids;
mod split;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use json_diff_util::{deep_equal, EqualFn, Value};

use crate::json_patch::{apply_ops_with, revert_ops_with, PatchError, PatchOp};
use crate::pending::{resolve_and_apply, PendingOp, ResolveError};

pub use ids::{IdGenerator, NodeId, RandomIds, SequentialIds};
pub use split::{split_path_to_destination, SplitPath};

/// Id given to the root node by [`History::new`].
pub const DEFAULT_ROOT_ID: &str = "root";

// ── Error ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq)]
pub enum HistoryError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Patch(#[from] PatchError),
    #[error("MISSING_NODE: {0}")]
    MissingNode(NodeId),
    #[error("NO_COMMON_ANCESTOR: {from} and {to} are not connected")]
    NoCommonAncestor { from: NodeId, to: NodeId },
    #[error("DUPLICATE_ID: {0}")]
    DuplicateId(NodeId),
    #[error("CORRUPT: {0}")]
    Corrupt(String),
    #[error("SERIALIZATION: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for HistoryError {
    fn from(e: serde_json::Error) -> Self {
        HistoryError::Serialization(e.to_string())
    }
}

// ── Types ─────────────────────────────────────────────────────────────────

/// One edit record. The root is its own parent and has no changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryNode {
    pub id: NodeId,
    pub parent: NodeId,
    /// Patch turning the parent's value into this node's value.
    pub changes: Vec<PatchOp>,
    pub children: Vec<NodeId>,
}

impl HistoryNode {
    fn root(id: NodeId) -> Self {
        Self {
            parent: id.clone(),
            id,
            changes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent == self.id
    }
}

/// Options for [`History`].
#[derive(Clone, Copy)]
pub struct HistoryOptions {
    /// Equality used by the replace/remove guards.
    pub equal: EqualFn,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self { equal: deep_equal }
    }
}

impl fmt::Debug for HistoryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryOptions").finish_non_exhaustive()
    }
}

/// Control input for [`History::reduce`].
#[derive(Debug, Clone)]
pub enum Action {
    Dispatch(Vec<PendingOp>),
    Undo,
    Redo,
    Jump(NodeId),
    Clear,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    nodes: Arc<IndexMap<NodeId, Arc<HistoryNode>>>,
    root: NodeId,
    tip: NodeId,
    current: Value,
    undo_trail: Vec<NodeId>,
    #[serde(skip)]
    options: HistoryOptions,
}

impl History {
    /// Fresh history whose root (id [`DEFAULT_ROOT_ID`]) holds `initial`.
    pub fn new(initial: Value) -> Self {
        Self::with_root(initial, NodeId::from(DEFAULT_ROOT_ID))
    }

    pub fn with_root(initial: Value, root: NodeId) -> Self {
        let mut nodes = IndexMap::new();
        nodes.insert(root.clone(), Arc::new(HistoryNode::root(root.clone())));
        Self {
            nodes: Arc::new(nodes),
            tip: root.clone(),
            root,
            current: initial,
            undo_trail: Vec::new(),
            options: HistoryOptions::default(),
        }
    }

    pub fn with_options(mut self, options: HistoryOptions) -> Self {
        self.options = options;
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn current(&self) -> &Value {
        &self.current
    }

    /// Typed view of the current value.
    pub fn current_as<T: DeserializeOwned>(&self) -> Result<T, HistoryError> {
        Ok(serde_json::from_value(self.current.to_json())?)
    }

    pub fn tip(&self) -> &NodeId {
        &self.tip
    }

    pub fn root(&self) -> &NodeId {
        &self.root
    }

    pub fn node(&self, id: &NodeId) -> Option<&HistoryNode> {
        self.nodes.get(id).map(|n| n.as_ref())
    }

    /// Nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &HistoryNode> {
        self.nodes.values().map(|n| n.as_ref())
    }

    pub fn children(&self, id: &NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn undo_trail(&self) -> &[NodeId] {
        &self.undo_trail
    }

    pub fn can_undo(&self) -> bool {
        self.tip != self.root
    }

    pub fn can_redo(&self) -> bool {
        !self.undo_trail.is_empty()
    }

    /// Number of edits between the root and the tip.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cur = &self.tip;
        while let Some(parent) = self.parent_of(cur) {
            if parent == cur || depth > self.nodes.len() {
                break;
            }
            depth += 1;
            cur = parent;
        }
        depth
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn options(&self) -> HistoryOptions {
        self.options
    }

    fn parent_of(&self, id: &NodeId) -> Option<&NodeId> {
        self.nodes.get(id).map(|n| &n.parent)
    }

    fn expect_node(&self, id: &NodeId) -> Result<&HistoryNode, HistoryError> {
        self.node(id)
            .ok_or_else(|| HistoryError::MissingNode(id.clone()))
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Resolves `ops` against the current value and records them as a new
    /// child of the tip.
    ///
    /// Dispatching after an undo starts a sibling branch; the undone nodes
    /// stay in the tree and remain reachable through [`jump`](Self::jump).
    pub fn dispatch<G>(&self, ops: &[PendingOp], ids: &mut G) -> Result<History, HistoryError>
    where
        G: IdGenerator + ?Sized,
    {
        let resolved = resolve_and_apply(&self.current, ops, self.options.equal)?;
        let id = ids.next_id();
        if self.nodes.contains_key(&id) {
            return Err(HistoryError::DuplicateId(id));
        }

        let mut nodes = Arc::clone(&self.nodes);
        let map = Arc::make_mut(&mut nodes);
        let parent = map
            .get_mut(&self.tip)
            .ok_or_else(|| HistoryError::MissingNode(self.tip.clone()))?;
        Arc::make_mut(parent).children.push(id.clone());
        map.insert(
            id.clone(),
            Arc::new(HistoryNode {
                id: id.clone(),
                parent: self.tip.clone(),
                changes: resolved.changes,
                children: Vec::new(),
            }),
        );
        debug!(node = %id, parent = %self.tip, "dispatch");

        Ok(History {
            nodes,
            root: self.root.clone(),
            tip: id,
            current: resolved.value,
            undo_trail: Vec::new(),
            options: self.options,
        })
    }

    /// Reverts the tip's changes and moves to its parent. No-op at the root.
    pub fn undo(&self) -> Result<History, HistoryError> {
        if !self.can_undo() {
            return Ok(self.clone());
        }
        let node = self.expect_node(&self.tip)?;
        let current = revert_ops_with(&self.current, &node.changes, self.options.equal)?;
        let mut undo_trail = Vec::with_capacity(self.undo_trail.len() + 1);
        undo_trail.push(self.tip.clone());
        undo_trail.extend(self.undo_trail.iter().cloned());
        debug!(from = %self.tip, to = %node.parent, "undo");

        Ok(History {
            nodes: Arc::clone(&self.nodes),
            root: self.root.clone(),
            tip: node.parent.clone(),
            current,
            undo_trail,
            options: self.options,
        })
    }

    /// Re-applies the first node of the undo trail. No-op if it is empty.
    pub fn redo(&self) -> Result<History, HistoryError> {
        let Some((next, rest)) = self.undo_trail.split_first() else {
            return Ok(self.clone());
        };
        let node = self.expect_node(next)?;
        let current = apply_ops_with(&self.current, &node.changes, self.options.equal)?;
        debug!(from = %self.tip, to = %next, "redo");

        Ok(History {
            nodes: Arc::clone(&self.nodes),
            root: self.root.clone(),
            tip: next.clone(),
            current,
            undo_trail: rest.to_vec(),
            options: self.options,
        })
    }

    /// Moves to any node: reverts up to the common ancestor, then re-applies
    /// down to `destination`. Always clears the undo trail.
    pub fn jump(&self, destination: &NodeId) -> Result<History, HistoryError> {
        let split = self.split_path(destination)?;
        let mut current = self.current.clone();
        for id in &split.up {
            let node = self.expect_node(id)?;
            current = revert_ops_with(&current, &node.changes, self.options.equal)?;
        }
        for id in &split.down {
            let node = self.expect_node(id)?;
            current = apply_ops_with(&current, &node.changes, self.options.equal)?;
        }
        debug!(
            from = %self.tip,
            to = %destination,
            via = %split.ancestor,
            up = split.up.len(),
            down = split.down.len(),
            "jump"
        );

        Ok(History {
            nodes: Arc::clone(&self.nodes),
            root: self.root.clone(),
            tip: destination.clone(),
            current,
            undo_trail: Vec::new(),
            options: self.options,
        })
    }

    /// Route from the tip to `destination`.
    pub fn split_path(&self, destination: &NodeId) -> Result<SplitPath, HistoryError> {
        split_path_to_destination(self, destination, None)
    }

    /// Drops every node; the tip becomes a new, empty root holding the
    /// current value as its baseline.
    pub fn clear(&self) -> History {
        debug!(root = %self.tip, dropped = self.nodes.len().saturating_sub(1), "clear");
        let mut history = History::with_root(self.current.clone(), self.tip.clone());
        history.options = self.options;
        history
    }

    /// Applies one [`Action`].
    pub fn reduce<G>(&self, action: Action, ids: &mut G) -> Result<History, HistoryError>
    where
        G: IdGenerator + ?Sized,
    {
        match action {
            Action::Dispatch(ops) => self.dispatch(&ops, ids),
            Action::Undo => self.undo(),
            Action::Redo => self.redo(),
            Action::Jump(destination) => self.jump(&destination),
            Action::Clear => Ok(self.clear()),
        }
    }

    // ── Persistence ───────────────────────────────────────────────────────

    pub fn to_json_string(&self) -> Result<String, HistoryError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restores a serialized history and checks its structure. Options are
    /// not persisted and come back as the defaults.
    pub fn from_json_str(s: &str) -> Result<History, HistoryError> {
        let history: History = serde_json::from_str(s)?;
        history.validate()?;
        Ok(history)
    }

    /// Checks the tree invariants: the root is its own parent, every map key
    /// matches its node, parent and child links agree, every node reaches the
    /// root, and the tip and undo trail name existing nodes along one path.
    pub fn validate(&self) -> Result<(), HistoryError> {
        let root = self.expect_node(&self.root)?;
        if !root.is_root() {
            return Err(HistoryError::Corrupt(format!(
                "root {} has parent {}",
                self.root, root.parent
            )));
        }
        for (key, node) in self.nodes.iter() {
            if key != &node.id {
                return Err(HistoryError::Corrupt(format!(
                    "node stored under {key} has id {}",
                    node.id
                )));
            }
            if node.is_root() && node.id != self.root {
                return Err(HistoryError::Corrupt(format!(
                    "{} is its own parent but is not the root",
                    node.id
                )));
            }
            let parent = self.expect_node(&node.parent)?;
            if !node.is_root() && !parent.children.contains(&node.id) {
                return Err(HistoryError::Corrupt(format!(
                    "{} is missing from the children of {}",
                    node.id, node.parent
                )));
            }
            for child in &node.children {
                if self.expect_node(child)?.parent != node.id {
                    return Err(HistoryError::Corrupt(format!(
                        "{child} is listed under {} but has another parent",
                        node.id
                    )));
                }
            }
            self.split_path_to_root(&node.id)?;
        }
        self.expect_node(&self.tip)?;
        let mut parent = &self.tip;
        for id in &self.undo_trail {
            if &self.expect_node(id)?.parent != parent {
                return Err(HistoryError::Corrupt(format!(
                    "undo trail entry {id} is not a child of {parent}"
                )));
            }
            parent = id;
        }
        Ok(())
    }

    fn split_path_to_root(&self, id: &NodeId) -> Result<(), HistoryError> {
        split_path_to_destination(self, &self.root, Some(id)).map(|_| ())
    }
}
