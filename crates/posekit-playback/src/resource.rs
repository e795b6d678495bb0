//! Model resources and their origins.

use posekit_assets::{BlobId, FormatKind, TransientHandle};
use posekit_core::ResourceId;
use posekit_scene::SceneGraph;
use serde::Serialize;

use crate::pose::AnimationFrameTable;

/// URL the built-in default model is known under.
pub const DEFAULT_MODEL_URL: &str = "builtin:default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResourceStatus {
    /// The built-in model
    Default,
    /// A model decoded from an upload
    Uploaded,
    /// Nothing shown
    Cleared,
    /// Nothing shown, and the last upload failed
    Error,
}

/// Where a model's bytes came from. Only `Transient` owns anything that
/// needs releasing; dropping it revokes the blob.
#[derive(Debug)]
pub enum Origin {
    Empty,
    BuiltIn(&'static str),
    /// A URL named by a pose file, fetched from the asset source
    Remote(String),
    Transient(TransientHandle),
}

impl Origin {
    pub fn url(&self) -> Option<&str> {
        match self {
            Origin::Empty => None,
            Origin::BuiltIn(url) => Some(*url),
            Origin::Remote(url) => Some(url.as_str()),
            Origin::Transient(handle) => Some(handle.url()),
        }
    }

    pub fn transient_id(&self) -> Option<BlobId> {
        match self {
            Origin::Transient(handle) => Some(handle.id()),
            _ => None,
        }
    }
}

/// The model currently (or about to be) shown.
#[derive(Debug)]
pub struct ModelResource {
    pub id: ResourceId,
    pub origin: Origin,
    pub format: FormatKind,
    pub display_name: String,
    pub status: ResourceStatus,
}

impl ModelResource {
    pub fn uploaded(origin: Origin, format: FormatKind, display_name: impl Into<String>) -> Self {
        Self {
            id: ResourceId::new(),
            origin,
            format,
            display_name: display_name.into(),
            status: ResourceStatus::Uploaded,
        }
    }

    pub fn builtin_default() -> Self {
        Self {
            id: ResourceId::new(),
            origin: Origin::BuiltIn(DEFAULT_MODEL_URL),
            format: FormatKind::Default,
            display_name: "Default model".into(),
            status: ResourceStatus::Default,
        }
    }

    pub fn cleared() -> Self {
        Self {
            id: ResourceId::new(),
            origin: Origin::Empty,
            format: FormatKind::Default,
            display_name: String::new(),
            status: ResourceStatus::Cleared,
        }
    }

    pub fn descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor {
            id: self.id,
            name: self.display_name.clone(),
            format: self.format,
            status: self.status,
            url: self.origin.url().map(str::to_string),
        }
    }
}

/// Read-only view of a [`ModelResource`] for UI binding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceDescriptor {
    pub id: ResourceId,
    pub name: String,
    pub format: FormatKind,
    pub status: ResourceStatus,
    pub url: Option<String>,
}

/// A decoded model ready for activation.
#[derive(Debug)]
pub struct LoadedModel {
    pub resource: ModelResource,
    pub scene: SceneGraph,
    /// Names of clips embedded in the model file
    pub clips: Vec<String>,
    pub poses: Option<AnimationFrameTable>,
}

impl LoadedModel {
    pub fn builtin_default() -> Self {
        Self {
            resource: ModelResource::builtin_default(),
            scene: SceneGraph::default_model(),
            clips: Vec::new(),
            poses: None,
        }
    }
}
