use std::sync::Arc;

use glam::Mat4;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use posekit_core::Transform;

use crate::material::Material;
use crate::node::{Node, NodeId, NodeKind};

/// Arena-backed node hierarchy. Nodes are never removed; a scene is built
/// once by a loader and then only has transforms and materials rewritten.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in model shown before anything is uploaded: a single gray
    /// mesh under a root group, no skeleton.
    pub fn default_model() -> Self {
        let mut scene = Self::new();
        let root = scene.add_root("default_model", NodeKind::Group, Transform::default());
        scene.add_child(
            root,
            "body",
            NodeKind::Mesh {
                material: Arc::new(Material::new(Some("default".into()), posekit_core::Color::GRAY)),
            },
            Transform::default(),
        );
        scene
    }

    /// Add a top-level node.
    pub fn add_root(&mut self, name: impl Into<String>, kind: NodeKind, transform: Transform) -> NodeId {
        let id = self.push(name.into(), kind, transform, None);
        self.roots.push(id);
        id
    }

    /// Add a node under `parent`.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        kind: NodeKind,
        transform: Transform,
    ) -> NodeId {
        let id = self.push(name.into(), kind, transform, Some(parent));
        self.nodes[parent.index()].children.push(id);
        id
    }

    fn push(&mut self, name: String, kind: NodeKind, transform: Transform, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            name,
            kind,
            transform,
            parent,
            children: Vec::new(),
        });
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Depth-first, pre-order walk from every root.
    pub fn traverse(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id.index()].children.iter().rev().copied());
        }
        order
    }

    /// Visit every reachable node mutably, in [`traverse`](Self::traverse) order.
    pub fn traverse_mut(&mut self, mut f: impl FnMut(NodeId, &mut Node)) {
        for id in self.traverse() {
            f(id, &mut self.nodes[id.index()]);
        }
    }

    /// First node (in traversal order) with exactly this name.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.traverse()
            .into_iter()
            .find(|id| self.nodes[id.index()].name == name)
    }

    /// Names of all skeleton joints, in traversal order.
    pub fn bone_names(&self) -> Vec<&str> {
        self.traverse()
            .into_iter()
            .map(|id| &self.nodes[id.index()])
            .filter(|node| node.is_bone())
            .map(|node| node.name.as_str())
            .collect()
    }

    pub fn mesh_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_mesh()).count()
    }

    /// Model matrix of a node: its local transform composed with every ancestor's.
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &self.nodes[node_id.index()];
            matrix = node.transform.matrix() * matrix;
            current = node.parent;
        }
        matrix
    }
}

/// Handle to a scene graph shared between the playback core (writer) and
/// the renderer (reader). Cloning the handle shares the same scene.
#[derive(Debug, Clone, Default)]
pub struct SharedScene(Arc<RwLock<SceneGraph>>);

impl SharedScene {
    pub fn new(scene: SceneGraph) -> Self {
        Self(Arc::new(RwLock::new(scene)))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, SceneGraph> {
        self.0.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, SceneGraph> {
        self.0.write()
    }

    /// Whether two handles refer to the same scene.
    pub fn ptr_eq(&self, other: &SharedScene) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn skeleton() -> (SceneGraph, NodeId, NodeId) {
        let mut scene = SceneGraph::new();
        let root = scene.add_root("Armature", NodeKind::Group, Transform::default());
        let hip = scene.add_child(root, "hip", NodeKind::Bone, Transform::from_position(Vec3::Y));
        let spine = scene.add_child(hip, "spine", NodeKind::Bone, Transform::from_position(Vec3::Y));
        (scene, hip, spine)
    }

    #[test]
    fn traversal_is_depth_first() {
        let (mut scene, hip, _) = skeleton();
        let root = scene.roots()[0];
        let leg = scene.add_child(root, "leg", NodeKind::Bone, Transform::default());
        let names: Vec<_> = scene
            .traverse()
            .into_iter()
            .map(|id| scene.get(id).unwrap().name.clone())
            .collect();
        assert_eq!(names, vec!["Armature", "hip", "spine", "leg"]);
        assert_eq!(scene.get(leg).unwrap().parent(), Some(root));
        assert_eq!(scene.get(hip).unwrap().children().len(), 1);
    }

    #[test]
    fn bone_names_skip_groups() {
        let (scene, _, _) = skeleton();
        assert_eq!(scene.bone_names(), vec!["hip", "spine"]);
    }

    #[test]
    fn world_matrix_composes_parents() {
        let (scene, _, spine) = skeleton();
        let translation = scene.world_matrix(spine).col(3).truncate();
        assert_eq!(translation, Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn find_by_name_exact_match() {
        let (scene, hip, _) = skeleton();
        assert_eq!(scene.find_by_name("hip"), Some(hip));
        assert_eq!(scene.find_by_name("Hip"), None);
    }

    #[test]
    fn default_model_has_one_mesh() {
        let scene = SceneGraph::default_model();
        assert_eq!(scene.mesh_count(), 1);
        assert!(scene.bone_names().is_empty());
    }

    #[test]
    fn shared_scene_writes_are_visible() {
        let (scene, hip, _) = skeleton();
        let shared = SharedScene::new(scene);
        let renderer_view = shared.clone();
        shared.write().get_mut(hip).unwrap().transform.position = Vec3::X;
        assert_eq!(renderer_view.read().get(hip).unwrap().transform.position, Vec3::X);
        assert!(shared.ptr_eq(&renderer_view));
    }
}
