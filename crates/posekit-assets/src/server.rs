use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::info;

use crate::error::LoadError;

/// Where model URLs named by pose files are fetched from.
pub trait AssetSource: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadError>;
}

/// Serves model URLs from the local filesystem, resolving relative paths
/// against a base directory.
pub struct DirectorySource {
    base_path: PathBuf,
}

impl DirectorySource {
    /// Create a source rooted at the given base path.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        info!("DirectorySource created with base path: {}", base_path.display());
        Self { base_path }
    }

    /// Resolve a relative asset path against the base path. Absolute paths
    /// and paths with `..` would leave the base directory and resolve to `None`.
    fn resolve(&self, path: &Path) -> Option<PathBuf> {
        let contained = path
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
        contained.then(|| self.base_path.join(path))
    }

    /// The base path this source resolves relative paths against.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl AssetSource for DirectorySource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        let path = url.strip_prefix("file://").unwrap_or(url);
        if path.contains("://") || path.starts_with("blob:") {
            return Err(LoadError::ReadFailure(
                url.to_string(),
                io::Error::new(io::ErrorKind::Unsupported, "not a local path"),
            ));
        }

        let Some(full_path) = self.resolve(Path::new(path)) else {
            return Err(LoadError::ReadFailure(
                url.to_string(),
                io::Error::new(io::ErrorKind::PermissionDenied, "path leaves the asset directory"),
            ));
        };
        std::fs::read(&full_path).map_err(|e| LoadError::ReadFailure(full_path.display().to_string(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_returns_error() {
        let source = DirectorySource::new("/nonexistent");
        match source.fetch("does_not_exist.glb") {
            Err(LoadError::ReadFailure(path, e)) => {
                assert!(path.ends_with("does_not_exist.glb"));
                assert_eq!(e.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected ReadFailure, got: {:?}", other),
        }
    }

    #[test]
    fn remote_urls_are_refused() {
        let source = DirectorySource::new("/nonexistent");
        assert!(matches!(
            source.fetch("https://example.com/m.glb"),
            Err(LoadError::ReadFailure(..))
        ));
        assert!(matches!(source.fetch("blob:posekit/123"), Err(LoadError::ReadFailure(..))));
    }

    #[test]
    fn reads_relative_to_base() {
        let dir = std::env::temp_dir().join(format!("posekit-source-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("m.obj"), b"v 0 0 0\n").unwrap();

        let source = DirectorySource::new(&dir);
        assert_eq!(source.fetch("m.obj").unwrap(), b"v 0 0 0\n");
        assert_eq!(source.fetch("file://m.obj").unwrap(), b"v 0 0 0\n");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn resolve_refuses_paths_outside_base() {
        let source = DirectorySource::new("/home/user/assets");
        assert_eq!(source.resolve(Path::new("/absolute/path.glb")), None);
        assert_eq!(source.resolve(Path::new("../secret.glb")), None);
        assert_eq!(source.resolve(Path::new("models/../../secret.glb")), None);
    }

    #[test]
    fn fetch_cannot_escape_base() {
        let dir = std::env::temp_dir().join(format!("posekit-escape-{}", std::process::id()));
        let base = dir.join("assets");
        std::fs::create_dir_all(&base).unwrap();
        std::fs::write(dir.join("outside.obj"), b"v 0 0 0\n").unwrap();

        let source = DirectorySource::new(&base);
        for url in ["../outside.obj", "file://../outside.obj"] {
            match source.fetch(url) {
                Err(LoadError::ReadFailure(_, e)) => assert_eq!(e.kind(), io::ErrorKind::PermissionDenied),
                other => panic!("expected ReadFailure for {url}, got: {:?}", other),
            }
        }
        let absolute = dir.join("outside.obj");
        assert!(source.fetch(&absolute.display().to_string()).is_err());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn resolve_relative_path() {
        let source = DirectorySource::new("/home/user/assets");
        assert_eq!(
            source.resolve(Path::new("models/box.glb")),
            Some(PathBuf::from("/home/user/assets/models/box.glb"))
        );
    }
}
