use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use posekit_core::{Color, Transform};
use posekit_scene::{Material, NodeId, NodeKind, SceneGraph};
use tracing::debug;

use crate::error::LoadError;
use crate::format::FormatKind;
use crate::loader::{LoadedScene, ModelLoader};

/// Loader for glTF 2.0 files (.gltf or .glb). Only the document is read;
/// vertex buffers stay with the renderer.
pub struct GltfLoader;

impl ModelLoader for GltfLoader {
    fn decode(&self, name: &str, bytes: &[u8]) -> Result<LoadedScene, LoadError> {
        let format = if bytes.starts_with(b"glTF") {
            FormatKind::Glb
        } else {
            FormatKind::Gltf
        };
        let gltf = gltf::Gltf::from_slice(bytes).map_err(|e| LoadError::decode(format, name, e.to_string()))?;
        let document = &gltf.document;

        // Nodes referenced by any skin are skeleton joints.
        let joints: HashSet<usize> = document
            .skins()
            .flat_map(|skin| skin.joints().map(|joint| joint.index()).collect::<Vec<_>>())
            .collect();

        let roots: Vec<gltf::Node> = match document.default_scene().or_else(|| document.scenes().next()) {
            Some(scene) => scene.nodes().collect(),
            None => {
                let children: HashSet<usize> = document
                    .nodes()
                    .flat_map(|node| node.children().map(|child| child.index()).collect::<Vec<_>>())
                    .collect();
                document
                    .nodes()
                    .filter(|node| !children.contains(&node.index()))
                    .collect()
            }
        };

        let mut scene = SceneGraph::new();
        let mut materials: HashMap<Option<usize>, Arc<Material>> = HashMap::new();
        let mut names = UniqueNames::default();
        let mut visited = HashSet::new();
        let mut stack: Vec<(gltf::Node, Option<NodeId>)> = roots.into_iter().rev().map(|node| (node, None)).collect();

        while let Some((node, parent)) = stack.pop() {
            if !visited.insert(node.index()) {
                continue;
            }

            let (translation, rotation, scale) = node.transform().decomposed();
            let transform = Transform::from_decomposed(translation, rotation, scale);
            let node_name = names.unique(node.name().unwrap_or(""));
            let is_joint = joints.contains(&node.index());

            let mesh_materials: Vec<Arc<Material>> = node
                .mesh()
                .map(|mesh| {
                    mesh.primitives()
                        .map(|primitive| shared_material(&mut materials, primitive.material()))
                        .collect()
                })
                .unwrap_or_default();

            let kind = match mesh_materials.first() {
                _ if is_joint => NodeKind::Bone,
                Some(material) => NodeKind::Mesh {
                    material: Arc::clone(material),
                },
                None => NodeKind::Group,
            };

            let base_name = node_name.clone();
            let id = match parent {
                Some(parent) => scene.add_child(parent, node_name, kind, transform),
                None => scene.add_root(node_name, kind, transform),
            };

            // Extra primitives (and meshes attached to joints) hang off the
            // node as their own mesh children.
            let inline = if is_joint { 0 } else { 1 };
            for (i, material) in mesh_materials.into_iter().enumerate().skip(inline) {
                scene.add_child(
                    id,
                    format!("{}_primitive{}", base_name, i),
                    NodeKind::Mesh { material },
                    Transform::default(),
                );
            }

            let children: Vec<gltf::Node> = node.children().collect();
            for child in children.into_iter().rev() {
                stack.push((child, Some(id)));
            }
        }

        let clips: Vec<String> = document
            .animations()
            .map(|anim| {
                anim.name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("animation_{}", anim.index()))
            })
            .collect();

        debug!(
            "glTF '{}': {} nodes, {} joints, {} materials, {} clips",
            name,
            scene.len(),
            joints.len(),
            materials.len(),
            clips.len()
        );

        Ok(LoadedScene { scene, clips })
    }
}

/// One `Arc<Material>` per glTF material index, so primitives that share a
/// material in the file share it in the scene graph too.
fn shared_material(cache: &mut HashMap<Option<usize>, Arc<Material>>, material: gltf::Material) -> Arc<Material> {
    Arc::clone(cache.entry(material.index()).or_insert_with(|| {
        let pbr = material.pbr_metallic_roughness();
        Arc::new(Material {
            name: material.name().map(str::to_string),
            base_color: Color::from_array(pbr.base_color_factor()),
            metallic: pbr.metallic_factor(),
            roughness: pbr.roughness_factor(),
        })
    }))
}

/// Node naming that matches what web viewers expose to pose files:
/// whitespace becomes `_`, the characters `[ ] . : /` are dropped, and
/// repeated names get a `_N` suffix.
#[derive(Default)]
struct UniqueNames {
    used: HashMap<String, usize>,
}

impl UniqueNames {
    fn unique(&mut self, raw: &str) -> String {
        let sanitized: String = raw
            .chars()
            .filter(|c| !matches!(c, '[' | ']' | '.' | ':' | '/'))
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .collect();
        match self.used.get_mut(&sanitized) {
            Some(count) => {
                *count += 1;
                format!("{}_{}", sanitized, count)
            }
            None => {
                self.used.insert(sanitized.clone(), 0);
                sanitized
            }
        }
    }
}
