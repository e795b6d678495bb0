use std::collections::HashMap;

use posekit_scene::SceneGraph;
use tracing::debug;

use crate::error::LoadError;
use crate::format::FormatKind;
use crate::gltf_loader::GltfLoader;
use crate::obj_loader::ObjLoader;

/// Result of decoding a model payload.
#[derive(Debug, Clone, Default)]
pub struct LoadedScene {
    pub scene: SceneGraph,
    /// Names of animation clips embedded in the file
    pub clips: Vec<String>,
}

/// A format-specific decoder turning raw bytes into a scene graph.
pub trait ModelLoader: Send + Sync {
    fn decode(&self, name: &str, bytes: &[u8]) -> Result<LoadedScene, LoadError>;
}

/// Capability table mapping each model format to its loader.
pub struct LoaderRegistry {
    loaders: HashMap<FormatKind, Box<dyn ModelLoader>>,
}

impl LoaderRegistry {
    /// An empty table; every decode fails until loaders are registered.
    pub fn empty() -> Self {
        Self {
            loaders: HashMap::new(),
        }
    }

    /// Table with the bundled glTF/GLB and OBJ loaders. FBX has no bundled
    /// loader and must be registered by the host.
    pub fn with_builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(FormatKind::Glb, GltfLoader);
        registry.register(FormatKind::Gltf, GltfLoader);
        registry.register(FormatKind::Obj, ObjLoader);
        registry
    }

    /// Install `loader` for `format`, replacing any previous one.
    pub fn register(&mut self, format: FormatKind, loader: impl ModelLoader + 'static) {
        self.loaders.insert(format, Box::new(loader));
    }

    pub fn supports(&self, format: FormatKind) -> bool {
        self.loaders.contains_key(&format)
    }

    pub fn decode(&self, format: FormatKind, name: &str, bytes: &[u8]) -> Result<LoadedScene, LoadError> {
        let loader = self
            .loaders
            .get(&format)
            .ok_or_else(|| LoadError::decode(format, name, "no loader registered for this format"))?;
        debug!("Decoding '{}' ({} bytes) as {}", name, bytes.len(), format);
        loader.decode(name, bytes)
    }
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}
