//! # ras_scene
//!
//! A scene of named transform nodes in the host's right-handed RAS-style
//! convention (x Right, y Anterior, z Superior).  Each node holds a
//! parent-relative 4×4 transform; writers address nodes by a stable string
//! name and overwrite their transforms through the [`TransformSink`] trait.
//!
//! The scene serializes its own mutations: callers on different threads
//! share a [`SharedScene`] handle and never coordinate with each other.
//!
//! ## Quick start
//!
//! ```rust
//! use ras_scene::{RasScene, TransformNode, TransformSink};
//! use glam::{Mat4, Vec3};
//!
//! let mut scene = RasScene::new();
//! let id = scene.add_node(TransformNode::new("Hand1Finger1"));
//! scene.set_local_transform(id, Mat4::from_translation(Vec3::new(-1.0, 3.0, 2.0)));
//!
//! assert_eq!(scene.find_node("Hand1Finger1"), Some(id));
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use glam::Mat4;
use log::warn;

// ════════════════════════════════════════════════════════════════════════════
// NodeId
// ════════════════════════════════════════════════════════════════════════════

/// Handle to a node registered in a scene.
///
/// Ids are only meaningful for the scene that issued them and stay valid for
/// the scene's lifetime (nodes are never removed).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

// ════════════════════════════════════════════════════════════════════════════
// TransformNode
// ════════════════════════════════════════════════════════════════════════════

/// A named node holding a parent-relative linear transform.
///
/// Freshly created nodes carry the identity transform until a writer sets
/// one.
#[derive(Clone, Debug)]
pub struct TransformNode {
    name:            String,
    local_transform: Mat4,
}

impl TransformNode {
    pub fn new(name: impl Into<String>) -> Self {
        TransformNode {
            name:            name.into(),
            local_transform: Mat4::IDENTITY,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn local_transform(&self) -> Mat4 {
        self.local_transform
    }

    pub fn set_local_transform(&mut self, transform: Mat4) {
        self.local_transform = transform;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// TransformSink — the contract writers depend on
// ════════════════════════════════════════════════════════════════════════════

/// The slice of scene behavior a transform writer needs: look a node up by
/// exact name, register a new node, and overwrite a node's local transform.
///
/// Kept narrow so tests can substitute a recording implementation and count
/// calls.
pub trait TransformSink {
    /// Look up a node by exact name.
    fn find_node(&self, name: &str) -> Option<NodeId>;

    /// Register a freshly created node and return its handle.
    fn add_node(&mut self, node: TransformNode) -> NodeId;

    /// Overwrite the node's parent-relative transform.  Last writer wins.
    fn set_local_transform(&mut self, id: NodeId, transform: Mat4);
}

// ════════════════════════════════════════════════════════════════════════════
// RasScene — in-memory implementation
// ════════════════════════════════════════════════════════════════════════════

/// In-memory scene: an arena of nodes plus a name index.
///
/// When two nodes are registered under the same name, lookups keep resolving
/// to the first one, so repeated auto-creates always find the original node.
#[derive(Debug, Default)]
pub struct RasScene {
    nodes:   Vec<TransformNode>,
    by_name: HashMap<String, usize>,
}

impl RasScene {
    pub fn new() -> Self {
        RasScene::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&TransformNode> {
        self.nodes.get(id.0)
    }

    /// All nodes, in registration order.
    pub fn nodes(&self) -> impl Iterator<Item = &TransformNode> + '_ {
        self.nodes.iter()
    }
}

impl TransformSink for RasScene {
    fn find_node(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied().map(NodeId)
    }

    fn add_node(&mut self, node: TransformNode) -> NodeId {
        let idx = self.nodes.len();
        if self.by_name.contains_key(node.name()) {
            warn!("duplicate node name {:?}; lookups keep the first", node.name());
        } else {
            self.by_name.insert(node.name().to_string(), idx);
        }
        self.nodes.push(node);
        NodeId(idx)
    }

    fn set_local_transform(&mut self, id: NodeId, transform: Mat4) {
        match self.nodes.get_mut(id.0) {
            Some(node) => node.set_local_transform(transform),
            None       => warn!("set_local_transform on unknown node id {}", id.0),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SharedScene
// ════════════════════════════════════════════════════════════════════════════

/// A scene behind its own mutex, cloneable across threads.
pub type SharedScene = Arc<Mutex<RasScene>>;

/// Create an empty [`SharedScene`].
pub fn shared_scene() -> SharedScene {
    Arc::new(Mutex::new(RasScene::new()))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};

    #[test]
    fn find_after_add() {
        let mut scene = RasScene::new();
        let id = scene.add_node(TransformNode::new("Hand1Finger1"));
        assert_eq!(scene.find_node("Hand1Finger1"), Some(id));
    }

    #[test]
    fn find_missing_is_none() {
        let scene = RasScene::new();
        assert_eq!(scene.find_node("Hand1Finger1"), None);
    }

    #[test]
    fn new_node_is_identity() {
        let mut scene = RasScene::new();
        let id = scene.add_node(TransformNode::new("n"));
        assert_eq!(scene.node(id).unwrap().local_transform(), Mat4::IDENTITY);
    }

    #[test]
    fn set_transform_overwrites() {
        let mut scene = RasScene::new();
        let id = scene.add_node(TransformNode::new("n"));
        scene.set_local_transform(id, Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)));
        scene.set_local_transform(id, Mat4::from_translation(Vec3::new(4.0, 5.0, 6.0)));
        let m = scene.node(id).unwrap().local_transform();
        assert_eq!(m.w_axis, Vec4::new(4.0, 5.0, 6.0, 1.0));
    }

    #[test]
    fn duplicate_name_first_wins_lookup() {
        let mut scene = RasScene::new();
        let first  = scene.add_node(TransformNode::new("n"));
        let second = scene.add_node(TransformNode::new("n"));
        assert_ne!(first, second);
        assert_eq!(scene.find_node("n"), Some(first));
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn stale_id_is_ignored() {
        let mut scene = RasScene::new();
        let id = scene.add_node(TransformNode::new("n"));
        scene.set_local_transform(NodeId(99), Mat4::from_translation(Vec3::X));
        assert_eq!(scene.node(id).unwrap().local_transform(), Mat4::IDENTITY);
    }

    #[test]
    fn nodes_iterate_in_registration_order() {
        let mut scene = RasScene::new();
        scene.add_node(TransformNode::new("a"));
        scene.add_node(TransformNode::new("b"));
        let names: Vec<_> = scene.nodes().map(|n| n.name().to_string()).collect();
        assert_eq!(names, ["a", "b"]);
    }
}
