use std::sync::Arc;

use posekit_core::Color;
use posekit_scene::{NodeKind, SceneGraph};

/// Tint every mesh in the scene. Each mesh gets its own clone of its
/// current material with the new base color; the material it was sharing
/// is left untouched. The caller is responsible for telling the renderer
/// the scene changed.
pub fn apply_color(scene: &mut SceneGraph, color: Color) {
    scene.traverse_mut(|_, node| {
        if let NodeKind::Mesh { material } = &mut node.kind {
            let mut tinted = (**material).clone();
            tinted.base_color = color;
            *material = Arc::new(tinted);
        }
    });
}
