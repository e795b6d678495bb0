use posekit_core::Color;

/// Surface material of a mesh node. Loaders hand these out behind `Arc`
/// so several meshes (or several copies of one asset) can share a single
/// instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: Option<String>,
    pub base_color: Color,
    pub metallic: f32,
    pub roughness: f32,
}

impl Material {
    /// A named material with the given base color and glTF default factors.
    pub fn new(name: Option<String>, base_color: Color) -> Self {
        Self {
            name,
            base_color,
            metallic: 1.0,
            roughness: 1.0,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(None, Color::GRAY)
    }
}
