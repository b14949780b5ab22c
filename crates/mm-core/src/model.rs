//! Mind map tree model.
//!
//! A `MindMap` is a rooted, ordered tree of labeled `Node`s stored as a flat
//! table keyed by `NodeId`. Parent→child order in `Node::children` is the
//! display order.
//!
//! Every operation is copy-on-write: it borrows the current map and returns a
//! new one, leaving the caller's value untouched. The node table sits behind
//! an `Arc`, so cloning a map (for a tab snapshot, or for a selection-only
//! change) does not copy any nodes. A failed operation returns an error and
//! produces nothing, so a mutation is never partially applied.

use crate::clock::{Clock, Timestamp};
use crate::id::{IdSource, NodeId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::collections::hash_map::Values;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Label given to the root of a fresh map.
pub const ROOT_CONTENT: &str = "Central Node";

// ─── Errors ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// The referenced node id is not in the map.
    #[error("node {0} not found")]
    NotFound(NodeId),
    /// The operation is structurally forbidden (sibling of root, delete root).
    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),
    /// The id source handed out an id that is already in use.
    #[error("id {0} is already in use")]
    DuplicateId(NodeId),
    /// A map assembled from external parts breaks a tree invariant.
    #[error("invalid tree: {0}")]
    InvalidTree(String),
}

// ─── Revision ────────────────────────────────────────────────────────────

/// Identity stamp of one node table.
///
/// Drawn from a process-wide counter, so two different node tables never
/// carry the same revision, even when they belong to different tabs.
/// Renderers compare revisions to decide whether cached output is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Revision(u64);

impl Revision {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Revision(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

// ─── Node ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub content: String,
    pub parent: Option<NodeId>,
    /// Child ids in display order.
    pub children: SmallVec<[NodeId; 4]>,
    /// World position, assigned by the layout engine.
    pub x: f32,
    pub y: f32,
    /// Icon tags, drawn before the label in this order.
    pub icons: SmallVec<[String; 2]>,
    pub created: Timestamp,
    pub modified: Timestamp,
}

impl Node {
    fn fresh(id: NodeId, content: String, parent: Option<NodeId>, now: Timestamp) -> Self {
        Self {
            id,
            content,
            parent,
            children: SmallVec::new(),
            x: 0.0,
            y: 0.0,
            icons: SmallVec::new(),
            created: now,
            modified: now,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Keyboard navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Previous sibling.
    Up,
    /// Next sibling.
    Down,
    /// Parent.
    Left,
    /// First child.
    Right,
}

// ─── MindMap ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct MindMap {
    nodes: Arc<HashMap<NodeId, Node>>,
    root_id: NodeId,
    selected_node_id: NodeId,
    revision: Revision,
}

impl MindMap {
    /// Create a map holding only the root, which is also selected.
    pub fn new<C, G>(clock: &C, ids: &mut G) -> Self
    where
        C: Clock + ?Sized,
        G: IdSource + ?Sized,
    {
        let root_id = ids.next_id();
        let root = Node::fresh(root_id, ROOT_CONTENT.to_string(), None, clock.now());
        let mut nodes = HashMap::new();
        nodes.insert(root_id, root);
        Self {
            nodes: Arc::new(nodes),
            root_id,
            selected_node_id: root_id,
            revision: Revision::next(),
        }
    }

    /// Assemble a map from nodes produced elsewhere (a file loader, a
    /// clipboard payload). Every tree invariant is checked.
    pub fn from_parts(
        nodes: impl IntoIterator<Item = Node>,
        root_id: NodeId,
        selected_node_id: NodeId,
    ) -> Result<Self, MapError> {
        let mut table = HashMap::new();
        for node in nodes {
            let id = node.id;
            if table.insert(id, node).is_some() {
                return Err(MapError::InvalidTree(format!("node {id} appears twice")));
            }
        }
        let map = Self {
            nodes: Arc::new(table),
            root_id,
            selected_node_id,
            revision: Revision::next(),
        };
        map.validate()?;
        Ok(map)
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn root_id(&self) -> NodeId {
        self.root_id
    }

    pub fn selected_node_id(&self) -> NodeId {
        self.selected_node_id
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn root(&self) -> Option<&Node> {
        self.node(self.root_id)
    }

    pub fn selected(&self) -> Option<&Node> {
        self.node(self.selected_node_id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Nodes in unspecified order. Use [`MindMap::walk`] for display order.
    pub fn nodes(&self) -> Values<'_, NodeId, Node> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false for a valid map; the root cannot be removed.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pre-order traversal from the root, children in display order.
    /// Child ids missing from the table are skipped.
    pub fn walk(&self) -> Walk<'_> {
        let stack = if self.nodes.contains_key(&self.root_id) {
            vec![self.root_id]
        } else {
            Vec::new()
        };
        Walk { map: self, stack }
    }

    fn require(&self, id: NodeId) -> Result<&Node, MapError> {
        self.nodes.get(&id).ok_or(MapError::NotFound(id))
    }

    /// Build the successor map around a new node table.
    fn successor(&self, nodes: HashMap<NodeId, Node>, selected_node_id: NodeId) -> Self {
        let next = Self {
            nodes: Arc::new(nodes),
            root_id: self.root_id,
            selected_node_id,
            revision: Revision::next(),
        };
        debug_assert!(next.validate().is_ok(), "tree invariant broken: {:?}", next.validate());
        next
    }

    /// Copy the table and apply `f` to one node of the copy.
    fn update_node(&self, id: NodeId, f: impl FnOnce(&mut Node)) -> Result<Self, MapError> {
        self.require(id)?;
        let mut nodes = (*self.nodes).clone();
        if let Some(node) = nodes.get_mut(&id) {
            f(node);
        }
        Ok(self.successor(nodes, self.selected_node_id))
    }

    // ─── Structural edits ────────────────────────────────────────────────

    /// Append a new child as the last child of `parent_id`.
    pub fn add_child<C, G>(
        &self,
        parent_id: NodeId,
        content: impl Into<String>,
        clock: &C,
        ids: &mut G,
    ) -> Result<(Self, NodeId), MapError>
    where
        C: Clock + ?Sized,
        G: IdSource + ?Sized,
    {
        self.require(parent_id)?;
        let new_id = ids.next_id();
        if self.contains(new_id) {
            return Err(MapError::DuplicateId(new_id));
        }

        let mut nodes = (*self.nodes).clone();
        let node = Node::fresh(new_id, content.into(), Some(parent_id), clock.now());
        nodes.insert(new_id, node);
        if let Some(parent) = nodes.get_mut(&parent_id) {
            parent.children.push(new_id);
        }

        log::debug!("add_child {new_id} under {parent_id}");
        Ok((self.successor(nodes, self.selected_node_id), new_id))
    }

    /// Insert a new node right after `node_id` in its parent's child order.
    pub fn add_sibling<C, G>(
        &self,
        node_id: NodeId,
        content: impl Into<String>,
        clock: &C,
        ids: &mut G,
    ) -> Result<(Self, NodeId), MapError>
    where
        C: Clock + ?Sized,
        G: IdSource + ?Sized,
    {
        if node_id == self.root_id {
            return Err(MapError::InvalidOperation("the root has no siblings"));
        }
        let node = self.require(node_id)?;
        let parent_id = node.parent.ok_or(MapError::NotFound(node_id))?;
        self.require(parent_id)?;
        let new_id = ids.next_id();
        if self.contains(new_id) {
            return Err(MapError::DuplicateId(new_id));
        }

        let mut nodes = (*self.nodes).clone();
        let sibling = Node::fresh(new_id, content.into(), Some(parent_id), clock.now());
        nodes.insert(new_id, sibling);
        if let Some(parent) = nodes.get_mut(&parent_id) {
            match parent.children.iter().position(|c| *c == node_id) {
                Some(index) => parent.children.insert(index + 1, new_id),
                None => parent.children.push(new_id),
            }
        }

        log::debug!("add_sibling {new_id} after {node_id}");
        Ok((self.successor(nodes, self.selected_node_id), new_id))
    }

    /// Replace a node's label.
    pub fn change_node<C>(
        &self,
        node_id: NodeId,
        content: impl Into<String>,
        clock: &C,
    ) -> Result<Self, MapError>
    where
        C: Clock + ?Sized,
    {
        let content = content.into();
        let now = clock.now();
        self.update_node(node_id, |node| {
            node.content = content;
            node.modified = now;
        })
    }

    pub fn add_icon<C>(
        &self,
        node_id: NodeId,
        icon: impl Into<String>,
        clock: &C,
    ) -> Result<Self, MapError>
    where
        C: Clock + ?Sized,
    {
        let icon = icon.into();
        let now = clock.now();
        self.update_node(node_id, |node| {
            node.icons.push(icon);
            node.modified = now;
        })
    }

    /// Drop the last icon. An empty icon list stays empty.
    pub fn remove_last_icon<C>(&self, node_id: NodeId, clock: &C) -> Result<Self, MapError>
    where
        C: Clock + ?Sized,
    {
        let now = clock.now();
        self.update_node(node_id, |node| {
            node.icons.pop();
            node.modified = now;
        })
    }

    /// Remove a node together with its whole subtree.
    ///
    /// If the selection was inside the removed subtree it moves to the
    /// removed node's parent.
    pub fn remove_node(&self, node_id: NodeId) -> Result<Self, MapError> {
        if node_id == self.root_id {
            return Err(MapError::InvalidOperation("the root cannot be removed"));
        }
        let target = self.require(node_id)?;
        let parent_id = target.parent.ok_or(MapError::NotFound(node_id))?;
        self.require(parent_id)?;

        let doomed = self.collect_subtree(node_id);
        let mut nodes = (*self.nodes).clone();
        for id in &doomed {
            nodes.remove(id);
        }
        if let Some(parent) = nodes.get_mut(&parent_id) {
            parent.children.retain(|c| *c != node_id);
        }

        let selected = if doomed.contains(&self.selected_node_id) {
            parent_id
        } else {
            self.selected_node_id
        };

        log::debug!("remove_node {node_id}: {} node(s) removed", doomed.len());
        Ok(self.successor(nodes, selected))
    }

    /// `node_id` and all its descendants, breadth first.
    fn collect_subtree(&self, node_id: NodeId) -> Vec<NodeId> {
        let mut out = vec![node_id];
        let mut i = 0;
        while i < out.len() {
            if let Some(node) = self.nodes.get(&out[i]) {
                out.extend(node.children.iter().copied());
            }
            i += 1;
        }
        out
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn select_node(&self, node_id: NodeId) -> Result<Self, MapError> {
        self.require(node_id)?;
        Ok(self.with_selection(node_id))
    }

    /// Same node table, same revision, different selection.
    fn with_selection(&self, node_id: NodeId) -> Self {
        Self {
            nodes: Arc::clone(&self.nodes),
            root_id: self.root_id,
            selected_node_id: node_id,
            revision: self.revision,
        }
    }

    /// Move the selection one step. Returns an equal map when there is
    /// nowhere to go.
    pub fn navigate(&self, direction: Direction) -> Self {
        match self.navigation_target(direction) {
            Some(target) => self.with_selection(target),
            None => self.clone(),
        }
    }

    fn navigation_target(&self, direction: Direction) -> Option<NodeId> {
        let current = self.selected()?;
        match direction {
            Direction::Right => current.children.first().copied(),
            Direction::Left => current.parent,
            Direction::Down | Direction::Up => {
                let parent = self.node(current.parent?)?;
                let index = parent.children.iter().position(|c| *c == current.id)?;
                let target = if direction == Direction::Down {
                    index.checked_add(1)?
                } else {
                    index.checked_sub(1)?
                };
                parent.children.get(target).copied()
            }
        }
    }

    // ─── Positions ───────────────────────────────────────────────────────

    /// Same structure and selection, with positions supplied per node.
    /// Nodes `position` returns `None` for keep their position. Used by the
    /// layout engine.
    pub fn with_positions(&self, mut position: impl FnMut(&Node) -> Option<(f32, f32)>) -> Self {
        let nodes = self
            .nodes
            .iter()
            .map(|(id, node)| {
                let mut node = node.clone();
                if let Some((x, y)) = position(&node) {
                    node.x = x;
                    node.y = y;
                }
                (*id, node)
            })
            .collect();
        self.successor(nodes, self.selected_node_id)
    }
}

/// Pre-order iterator over a map. See [`MindMap::walk`].
pub struct Walk<'a> {
    map: &'a MindMap,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        while let Some(id) = self.stack.pop() {
            if let Some(node) = self.map.node(id) {
                self.stack.extend(node.children.iter().rev().copied());
                return Some(node);
            }
        }
        None
    }
}
