use std::fmt;
use std::sync::Arc;

use posekit_core::Transform;

use crate::material::Material;

/// Index of a node inside its [`SceneGraph`](crate::SceneGraph).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The slot index of this node.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// What a node represents to the renderer.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Plain transform node
    Group,
    /// Skeleton joint, the only kind poses are applied to
    Bone,
    /// Drawable mesh with a (possibly shared) material slot
    Mesh { material: Arc<Material> },
}

/// A single scene graph node.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub transform: Transform,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub fn is_bone(&self) -> bool {
        matches!(self.kind, NodeKind::Bone)
    }

    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh { .. })
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The material slot, for mesh nodes.
    pub fn material(&self) -> Option<&Arc<Material>> {
        match &self.kind {
            NodeKind::Mesh { material } => Some(material),
            _ => None,
        }
    }
}
