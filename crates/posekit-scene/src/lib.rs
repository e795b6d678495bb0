//! posekit Scene - Scene graph shared with the renderer
//!
//! Loaders build a [`SceneGraph`]; the viewer wraps it in a [`SharedScene`]
//! handle. The playback core writes joint transforms and mesh materials into
//! it, the renderer reads it on every draw.

mod graph;
mod material;
mod node;

pub use graph::{SceneGraph, SharedScene};
pub use material::Material;
pub use node::{Node, NodeId, NodeKind};
