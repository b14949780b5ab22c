//! Tree invariant checks.
//!
//! Builds a `petgraph` view of the parent→child edges and verifies that the
//! map is a single rooted tree with consistent back-pointers.

use crate::id::NodeId;
use crate::model::{MapError, MindMap};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::{HashMap, HashSet};

impl MindMap {
    /// Check every structural invariant of the map.
    ///
    /// - root and selection exist, the root has no parent;
    /// - every other node has an existing parent that lists it as a child;
    /// - children are unique, exist, and point back at their owner;
    /// - the child graph is acyclic and every node is reachable from the root.
    pub fn validate(&self) -> Result<(), MapError> {
        let root = self
            .node(self.root_id())
            .ok_or_else(|| invalid(format!("root {} is missing", self.root_id())))?;
        if root.parent.is_some() {
            return Err(invalid(format!("root {} has a parent", root.id)));
        }
        if !self.contains(self.selected_node_id()) {
            return Err(invalid(format!(
                "selected node {} is missing",
                self.selected_node_id()
            )));
        }

        for node in self.nodes() {
            if node.id != self.root_id() {
                let parent_id = node
                    .parent
                    .ok_or_else(|| invalid(format!("{} has no parent but is not the root", node.id)))?;
                let parent = self
                    .node(parent_id)
                    .ok_or_else(|| invalid(format!("parent {parent_id} of {} is missing", node.id)))?;
                if !parent.children.contains(&node.id) {
                    return Err(invalid(format!("{parent_id} does not list child {}", node.id)));
                }
            }

            let mut seen = HashSet::new();
            for child_id in &node.children {
                if !seen.insert(*child_id) {
                    return Err(invalid(format!("{} lists {child_id} twice", node.id)));
                }
                let child = self
                    .node(*child_id)
                    .ok_or_else(|| invalid(format!("child {child_id} of {} is missing", node.id)))?;
                if child.parent != Some(node.id) {
                    return Err(invalid(format!("{child_id} does not point back at {}", node.id)));
                }
            }
        }

        let (graph, index) = self.child_graph();
        if toposort(&graph, None).is_err() {
            return Err(invalid("child links form a cycle".to_string()));
        }

        let mut reached = 0usize;
        let mut dfs = Dfs::new(&graph, index[&self.root_id()]);
        while dfs.next(&graph).is_some() {
            reached += 1;
        }
        if reached != self.len() {
            return Err(invalid(format!(
                "{} node(s) unreachable from the root",
                self.len() - reached
            )));
        }

        Ok(())
    }

    /// Parent→child edges as a petgraph digraph, plus the id → index map.
    fn child_graph(&self) -> (DiGraph<NodeId, ()>, HashMap<NodeId, NodeIndex>) {
        let mut graph = DiGraph::with_capacity(self.len(), self.len());
        let mut index = HashMap::with_capacity(self.len());
        for node in self.nodes() {
            index.insert(node.id, graph.add_node(node.id));
        }
        for node in self.nodes() {
            for child_id in &node.children {
                if let (Some(&from), Some(&to)) = (index.get(&node.id), index.get(child_id)) {
                    graph.add_edge(from, to, ());
                }
            }
        }
        (graph, index)
    }
}

fn invalid(reason: String) -> MapError {
    MapError::InvalidTree(reason)
}

#[cfg(test)]
mod tests {
    use crate::id::{NodeId, SequentialIds};
    use crate::model::{MapError, MindMap, Node};
    use smallvec::smallvec;

    fn node(id: &str, parent: Option<&str>, children: &[&str]) -> Node {
        Node {
            id: NodeId::intern(id),
            content: id.to_string(),
            parent: parent.map(NodeId::intern),
            children: children.iter().map(|c| NodeId::intern(c)).collect(),
            x: 0.0,
            y: 0.0,
            icons: smallvec![],
            created: 0,
            modified: 0,
        }
    }

    #[test]
    fn fresh_map_is_valid() {
        let map = MindMap::new(&|| 0u64, &mut SequentialIds::new("v"));
        assert_eq!(map.validate(), Ok(()));
    }

    #[test]
    fn from_parts_accepts_a_tree() {
        let map = MindMap::from_parts(
            [
                node("vr", None, &["va", "vb"]),
                node("va", Some("vr"), &[]),
                node("vb", Some("vr"), &[]),
            ],
            NodeId::intern("vr"),
            NodeId::intern("vb"),
        )
        .unwrap();
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn from_parts_rejects_broken_back_pointer() {
        let result = MindMap::from_parts(
            [node("br", None, &["bc"]), node("bc", Some("elsewhere"), &[])],
            NodeId::intern("br"),
            NodeId::intern("br"),
        );
        assert!(matches!(result, Err(MapError::InvalidTree(_))));
    }

    #[test]
    fn from_parts_rejects_cycle() {
        // x and y claim each other; neither hangs off the root.
        let result = MindMap::from_parts(
            [
                node("cr", None, &[]),
                node("cx", Some("cy"), &["cy"]),
                node("cy", Some("cx"), &["cx"]),
            ],
            NodeId::intern("cr"),
            NodeId::intern("cr"),
        );
        assert!(matches!(result, Err(MapError::InvalidTree(_))));
    }

    #[test]
    fn from_parts_rejects_dangling_child_and_selection() {
        let dangling = MindMap::from_parts(
            [node("dr", None, &["gone"])],
            NodeId::intern("dr"),
            NodeId::intern("dr"),
        );
        assert!(matches!(dangling, Err(MapError::InvalidTree(_))));

        let bad_selection = MindMap::from_parts(
            [node("sr2", None, &[])],
            NodeId::intern("sr2"),
            NodeId::intern("missing_sel"),
        );
        assert!(matches!(bad_selection, Err(MapError::InvalidTree(_))));
    }
}
