use std::collections::HashMap;
use std::sync::Arc;

use posekit_core::Transform;
use posekit_scene::{Material, NodeId, NodeKind, SceneGraph};
use tracing::debug;

use crate::error::LoadError;
use crate::format::FormatKind;
use crate::loader::{LoadedScene, ModelLoader};

/// Loader for Wavefront OBJ text. Each object/group and material pairing
/// that owns faces becomes a mesh node; OBJ carries no skeleton or clips.
pub struct ObjLoader;

impl ModelLoader for ObjLoader {
    fn decode(&self, name: &str, bytes: &[u8]) -> Result<LoadedScene, LoadError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| LoadError::decode(FormatKind::Obj, name, format!("not UTF-8 text: {e}")))?;

        let mut scene = SceneGraph::new();
        let root = scene.add_root(name, NodeKind::Group, Transform::default());
        let mut materials: HashMap<String, Arc<Material>> = HashMap::new();

        let mut object = String::new();
        let mut material_name: Option<String> = None;
        let mut current: Option<NodeId> = None;
        let mut vertices = 0usize;
        let mut faces = 0usize;

        for line in text.lines() {
            let line = line.trim();
            let (keyword, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            let rest = rest.trim();

            match keyword {
                "v" => vertices += 1,
                "o" | "g" => {
                    object = rest.to_string();
                    current = None;
                }
                "usemtl" => {
                    material_name = Some(rest.to_string());
                    current = None;
                }
                "f" => {
                    faces += 1;
                    if current.is_none() {
                        let material = match &material_name {
                            Some(mtl) => Arc::clone(
                                materials
                                    .entry(mtl.clone())
                                    .or_insert_with(|| Arc::new(Material::new(Some(mtl.clone()), Default::default()))),
                            ),
                            None => Arc::new(Material::default()),
                        };
                        current = Some(scene.add_child(
                            root,
                            object.clone(),
                            NodeKind::Mesh { material },
                            Transform::default(),
                        ));
                    }
                }
                _ => {}
            }
        }

        if vertices == 0 {
            return Err(LoadError::decode(FormatKind::Obj, name, "no vertex data"));
        }

        debug!(
            "OBJ '{}': {} vertices, {} faces, {} meshes",
            name,
            vertices,
            faces,
            scene.mesh_count()
        );

        Ok(LoadedScene {
            scene,
            clips: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_CUBES: &str = "\
# two objects sharing one material
mtllib cubes.mtl
o cube_a
v 0 0 0
v 1 0 0
v 1 1 0
usemtl red
f 1 2 3
o cube_b
v 0 0 1
v 1 0 1
v 1 1 1
usemtl red
f 4 5 6
usemtl blue
f 4 6 5
";

    #[test]
    fn objects_become_meshes() {
        let loaded = ObjLoader.decode("cubes.obj", TWO_CUBES.as_bytes()).unwrap();
        let scene = &loaded.scene;
        assert_eq!(scene.mesh_count(), 3);
        assert!(loaded.clips.is_empty());
        assert!(scene.bone_names().is_empty());
    }

    #[test]
    fn material_names_are_shared() {
        let loaded = ObjLoader.decode("cubes.obj", TWO_CUBES.as_bytes()).unwrap();
        let scene = &loaded.scene;
        let meshes: Vec<_> = scene
            .traverse()
            .into_iter()
            .filter_map(|id| scene.get(id).unwrap().material().cloned())
            .collect();
        assert!(Arc::ptr_eq(&meshes[0], &meshes[1]));
        assert!(!Arc::ptr_eq(&meshes[1], &meshes[2]));
        assert_eq!(meshes[2].name.as_deref(), Some("blue"));
    }

    #[test]
    fn empty_obj_is_rejected() {
        let result = ObjLoader.decode("empty.obj", b"# nothing here\n");
        assert!(matches!(result, Err(LoadError::DecodeFailure { .. })));
    }

    #[test]
    fn binary_payload_is_rejected() {
        let result = ObjLoader.decode("bad.obj", &[0xff, 0xfe, 0x00]);
        assert!(matches!(result, Err(LoadError::DecodeFailure { .. })));
    }
}
