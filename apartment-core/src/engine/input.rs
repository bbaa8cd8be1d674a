//! Pointer listener registry.

use std::collections::BTreeSet;

use crate::engine::graph::{NodeId, SceneGraph};

/// Routes pointer presses to the nodes that registered for them.
///
/// A node must be both interactive in the graph and registered here to
/// receive presses; detaching a listener leaves the node in place.
#[derive(Debug, Default)]
pub struct InputRouter {
    listeners: BTreeSet<NodeId>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen for presses on `node`, marking it interactive.
    pub fn on_pointer_down(&mut self, graph: &mut SceneGraph, node: NodeId) {
        graph.set_interactive(node, true);
        self.listeners.insert(node);
    }

    /// Resolve a press at `(x, y)` to a listening node.
    pub fn press(&self, graph: &SceneGraph, x: f32, y: f32) -> Option<NodeId> {
        graph
            .hit_test(x, y)
            .filter(|node| self.listeners.contains(node))
    }

    /// Remove every listener. Returns how many were detached.
    pub fn detach_all(&mut self) -> usize {
        let count = self.listeners.len();
        self.listeners.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
