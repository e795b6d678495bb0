use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Model payload format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    Glb,
    Gltf,
    Obj,
    Fbx,
    /// The built-in default model
    Default,
}

impl FormatKind {
    /// Map a lowercase file extension (without the dot) to a model format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "glb" => Some(Self::Glb),
            "gltf" => Some(Self::Gltf),
            "obj" => Some(Self::Obj),
            "fbx" => Some(Self::Fbx),
            _ => None,
        }
    }

    /// Guess the format of a model URL from its path extension, ignoring
    /// any query or fragment.
    pub fn from_url(url: &str) -> Option<Self> {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        extension(path).and_then(|ext| Self::from_extension(&ext))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Glb => "glb",
            Self::Gltf => "gltf",
            Self::Obj => "obj",
            Self::Fbx => "fbx",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What an uploaded file is, judged by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Model(FormatKind),
    /// JSON pose sequence naming the model it targets
    PoseData,
}

impl UploadKind {
    /// Classify a file name by its extension, case-insensitively.
    pub fn from_file_name(file_name: &str) -> Result<Self, LoadError> {
        let ext = extension(file_name)
            .ok_or_else(|| LoadError::UnsupportedFormat(file_name.to_string()))?;
        if ext == "json" {
            return Ok(Self::PoseData);
        }
        FormatKind::from_extension(&ext)
            .map(Self::Model)
            .ok_or_else(|| LoadError::UnsupportedFormat(format!(".{ext}")))
    }
}

fn extension(path: &str) -> Option<String> {
    let file = path.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(path);
    let (stem, ext) = file.rsplit_once('.')?;
    if stem.is_empty() && ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_are_case_insensitive() {
        assert_eq!(
            UploadKind::from_file_name("Robot.GLB").unwrap(),
            UploadKind::Model(FormatKind::Glb)
        );
        assert_eq!(
            UploadKind::from_file_name("scan.Obj").unwrap(),
            UploadKind::Model(FormatKind::Obj)
        );
        assert_eq!(UploadKind::from_file_name("walk.JSON").unwrap(), UploadKind::PoseData);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        match UploadKind::from_file_name("notes.txt") {
            Err(LoadError::UnsupportedFormat(ext)) => assert_eq!(ext, ".txt"),
            other => panic!("expected UnsupportedFormat, got: {:?}", other),
        }
        assert!(matches!(
            UploadKind::from_file_name("README"),
            Err(LoadError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn only_last_extension_counts() {
        assert_eq!(
            UploadKind::from_file_name("character.glb.json").unwrap(),
            UploadKind::PoseData
        );
    }

    #[test]
    fn url_format_ignores_query() {
        assert_eq!(FormatKind::from_url("models/hero.gltf?v=2"), Some(FormatKind::Gltf));
        assert_eq!(FormatKind::from_url("https://cdn.example/a/b.FBX"), Some(FormatKind::Fbx));
        assert_eq!(FormatKind::from_url("blob:posekit/1234"), None);
    }
}
