//! Viewer configuration.

use posekit_assets::UploadKind;
use posekit_core::PlaybackConfig;
use serde::{Deserialize, Serialize};

/// Which uploads the viewer accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerMode {
    /// Model files only
    Inspect,
    /// Model files plus JSON pose sequences
    #[default]
    PosePlayback,
}

impl ViewerMode {
    pub fn accepts(&self, kind: UploadKind) -> bool {
        match kind {
            UploadKind::Model(_) => true,
            UploadKind::PoseData => *self == ViewerMode::PosePlayback,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub mode: ViewerMode,
    pub playback: PlaybackConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use posekit_assets::FormatKind;

    #[test]
    fn inspect_mode_refuses_pose_files() {
        assert!(ViewerMode::Inspect.accepts(UploadKind::Model(FormatKind::Fbx)));
        assert!(!ViewerMode::Inspect.accepts(UploadKind::PoseData));
        assert!(ViewerMode::PosePlayback.accepts(UploadKind::PoseData));
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: ViewerConfig = serde_json::from_str(r#"{"mode": "inspect"}"#).unwrap();
        assert_eq!(config.mode, ViewerMode::Inspect);
        assert_eq!(config.playback.frame_rate, 30.0);
    }
}
