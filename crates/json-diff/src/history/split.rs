//! Lowest-common-ancestor split between two history nodes.

use std::collections::HashMap;

use super::{History, HistoryError, NodeId};

/// Route from one node to another through their lowest common ancestor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPath {
    pub ancestor: NodeId,
    /// Nodes to undo, starting at the origin and excluding the ancestor.
    pub up: Vec<NodeId>,
    /// Nodes to redo, from the ancestor's child down to the destination.
    pub down: Vec<NodeId>,
}

/// Computes the route from `from` (the tip when `None`) to `destination`.
///
/// Fails with `MissingNode` if either end is unknown and with
/// `NoCommonAncestor` if the two nodes do not share a root. Walks are
/// bounded by the node count, so a corrupted parent cycle fails instead of
/// looping.
pub fn split_path_to_destination(
    history: &History,
    destination: &NodeId,
    from: Option<&NodeId>,
) -> Result<SplitPath, HistoryError> {
    let from = from.unwrap_or(&history.tip);
    for id in [from, destination] {
        if !history.nodes.contains_key(id) {
            return Err(HistoryError::MissingNode(id.clone()));
        }
    }
    let no_ancestor = || HistoryError::NoCommonAncestor {
        from: from.clone(),
        to: destination.clone(),
    };
    let limit = history.nodes.len();

    let mut up_walk = Vec::new();
    let mut distance: HashMap<&NodeId, usize> = HashMap::new();
    let mut cur = from;
    loop {
        distance.insert(cur, up_walk.len());
        up_walk.push(cur.clone());
        let parent = history.parent_of(cur).ok_or_else(no_ancestor)?;
        if parent == cur {
            break;
        }
        if up_walk.len() > limit {
            return Err(no_ancestor());
        }
        cur = parent;
    }

    let mut down_walk = Vec::new();
    let mut cur = destination;
    let ancestor = loop {
        if let Some(&d) = distance.get(cur) {
            up_walk.truncate(d);
            break cur.clone();
        }
        down_walk.push(cur.clone());
        let parent = history.parent_of(cur).ok_or_else(no_ancestor)?;
        if parent == cur || down_walk.len() > limit {
            return Err(no_ancestor());
        }
        cur = parent;
    };
    down_walk.reverse();

    Ok(SplitPath {
        ancestor,
        up: up_walk,
        down: down_walk,
    })
}
