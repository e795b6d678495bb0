//! posekit Playback - Pose playback engine
//!
//! Owns the active model resource and its release, validates pose files,
//! advances a time-gated frame cursor and writes each frame's joint
//! transforms into the shared scene graph. The [`Viewer`] ties these
//! together behind the operations a UI binds to.

mod applier;
mod config;
mod error;
mod material;
mod pose;
mod resource;
mod scheduler;
mod viewer;

pub use applier::{apply_frame, ApplyReport};
pub use config::{ViewerConfig, ViewerMode};
pub use error::{ErrorKind, ViewerError};
pub use material::apply_color;
pub use pose::{parse_pose_file, AnimationFrameTable, FramePose, JointTransform, ValidationError};
pub use resource::{LoadedModel, ModelResource, Origin, ResourceDescriptor, ResourceStatus};
pub use scheduler::{FrameScheduler, PlaybackState};
pub use viewer::{PlaybackDescriptor, Viewer, ViewerEvent, ViewerSnapshot};
