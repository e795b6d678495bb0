//! Pose files: a JSON sequence of per-joint transforms targeting one model.
//!
//! ```json
//! {
//!   "modelUrl": "models/character.glb",
//!   "frames": [
//!     { "hip": { "position": {"x": 0, "y": 1, "z": 0},
//!                "rotation": {"x": 0, "y": 0.5, "z": 0},
//!                "scale":    {"x": 1, "y": 1, "z": 1} } }
//!   ]
//! }
//! ```
//!
//! Rotations are XYZ Euler angles in radians. `scale` is optional and leaves
//! the joint's scale alone when absent. A frame only lists the joints it
//! moves.

use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Errors raised while validating a pose file.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("pose file is not valid JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    #[error("pose file has an invalid structure: {0}")]
    SchemaViolation(String),
}

/// Target transform for one joint in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawJoint")]
pub struct JointTransform {
    pub position: Vec3,
    /// XYZ Euler angles in radians
    pub rotation: Vec3,
    pub scale: Option<Vec3>,
}

/// Joint name to transform, for one discrete sample.
pub type FramePose = BTreeMap<String, JointTransform>;

/// Validated, immutable pose sequence and the model URL it was authored for.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationFrameTable {
    model_url: String,
    frames: Vec<FramePose>,
}

impl AnimationFrameTable {
    pub fn new(model_url: impl Into<String>, frames: Vec<FramePose>) -> Self {
        Self {
            model_url: model_url.into(),
            frames,
        }
    }

    /// URL of the model this table targets.
    pub fn model_url(&self) -> &str {
        &self.model_url
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// An empty table is valid but cannot be played.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, index: usize) -> Option<&FramePose> {
        self.frames.get(index)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPoseFile {
    model_url: String,
    frames: Vec<BTreeMap<String, JointTransform>>,
}

#[derive(Deserialize)]
struct RawJoint {
    position: RawVec3,
    rotation: RawVec3,
    #[serde(default)]
    scale: Option<RawVec3>,
}

#[derive(Deserialize)]
struct RawVec3 {
    x: f32,
    y: f32,
    z: f32,
}

impl From<RawVec3> for Vec3 {
    fn from(v: RawVec3) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

impl From<RawJoint> for JointTransform {
    fn from(raw: RawJoint) -> Self {
        Self {
            position: raw.position.into(),
            rotation: raw.rotation.into(),
            scale: raw.scale.map(Vec3::from),
        }
    }
}

/// Parse and validate a pose file. Syntax errors are `MalformedJson`;
/// well-formed JSON missing `modelUrl` or `frames`, or with entries of the
/// wrong shape, is a `SchemaViolation`. `"frames": []` is accepted.
pub fn parse_pose_file(bytes: &[u8]) -> Result<AnimationFrameTable, ValidationError> {
    let value: serde_json::Value = serde_json::from_slice(bytes).map_err(ValidationError::MalformedJson)?;
    let raw: RawPoseFile =
        serde_json::from_value(value).map_err(|e| ValidationError::SchemaViolation(e.to_string()))?;

    if raw.model_url.trim().is_empty() {
        return Err(ValidationError::SchemaViolation("`modelUrl` must not be empty".into()));
    }

    Ok(AnimationFrameTable::new(raw.model_url, raw.frames))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_FRAMES: &str = r#"{
        "modelUrl": "m.glb",
        "frames": [
            {
                "hip":   { "position": {"x": 0, "y": 1, "z": 0}, "rotation": {"x": 0, "y": 0, "z": 0} },
                "spine": { "position": {"x": 0, "y": 2, "z": 0}, "rotation": {"x": 0.5, "y": 0, "z": 0},
                           "scale": {"x": 2, "y": 2, "z": 2} }
            },
            {
                "hip":   { "position": {"x": 1, "y": 1, "z": 0}, "rotation": {"x": 0, "y": 1, "z": 0} }
            }
        ]
    }"#;

    #[test]
    fn parses_sparse_frames() {
        let table = parse_pose_file(TWO_FRAMES.as_bytes()).unwrap();
        assert_eq!(table.model_url(), "m.glb");
        assert_eq!(table.len(), 2);

        let first = table.frame(0).unwrap();
        assert_eq!(first["spine"].scale, Some(Vec3::splat(2.0)));
        assert_eq!(first["hip"].scale, None);
        assert_eq!(first["spine"].rotation, Vec3::new(0.5, 0.0, 0.0));

        let second = table.frame(1).unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second["hip"].position, Vec3::new(1.0, 1.0, 0.0));
        assert!(table.frame(2).is_none());
    }

    #[test]
    fn missing_model_url_is_schema_violation() {
        let result = parse_pose_file(br#"{"frames": []}"#);
        assert!(matches!(result, Err(ValidationError::SchemaViolation(_))));
    }

    #[test]
    fn empty_frames_are_legal() {
        let table = parse_pose_file(br#"{"modelUrl":"m.glb","frames":[]}"#).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn missing_or_null_frames_are_schema_violations() {
        for doc in [
            r#"{"modelUrl":"m.glb"}"#,
            r#"{"modelUrl":"m.glb","frames":null}"#,
            r#"{"modelUrl":"m.glb","frames":{}}"#,
            r#"{"modelUrl":"","frames":[]}"#,
            r#"{"modelUrl":42,"frames":[]}"#,
            r#"[1, 2, 3]"#,
        ] {
            assert!(
                matches!(parse_pose_file(doc.as_bytes()), Err(ValidationError::SchemaViolation(_))),
                "accepted: {doc}"
            );
        }
    }

    #[test]
    fn malformed_joint_is_schema_violation() {
        let doc = r#"{"modelUrl":"m.glb","frames":[{"hip":{"position":{"x":0,"y":0},"rotation":{"x":0,"y":0,"z":0}}}]}"#;
        assert!(matches!(
            parse_pose_file(doc.as_bytes()),
            Err(ValidationError::SchemaViolation(_))
        ));
    }

    #[test]
    fn syntax_error_is_malformed_json() {
        assert!(matches!(
            parse_pose_file(b"{\"modelUrl\": \"m.glb\", "),
            Err(ValidationError::MalformedJson(_))
        ));
        assert!(matches!(
            parse_pose_file(&[0xff, 0x00]),
            Err(ValidationError::MalformedJson(_))
        ));
    }
}
