//! posekit Core - Core types shared by the viewer crates
//!
//! This crate provides the foundational types used throughout the viewer:
//! - Mathematical primitives (re-exported from glam)
//! - Transform used for scene nodes and joint poses
//! - Playback timing configuration
//! - Resource identity

pub mod time;
pub mod types;

pub use glam::{EulerRot, Mat4, Quat, Vec3};
pub use time::PlaybackConfig;
pub use types::{Color, ResourceId, Transform};
