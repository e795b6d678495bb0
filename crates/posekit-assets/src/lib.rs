//! posekit Assets - Model uploads and decoding
//!
//! Recognizes upload formats by file extension, decodes model payloads
//! through a per-format loader table into a scene graph, and owns the
//! transient blob handles that back uploaded models until they are revoked.

mod error;
mod format;
mod gltf_loader;
mod handle;
mod loader;
mod obj_loader;
mod reader;
mod server;

pub use error::LoadError;
pub use format::{FormatKind, UploadKind};
pub use gltf_loader::GltfLoader;
pub use handle::{BlobEntry, BlobId, BlobStore, TransientHandle};
pub use loader::{LoadedScene, LoaderRegistry, ModelLoader};
pub use obj_loader::ObjLoader;
pub use reader::{FileReader, PendingRead};
pub use server::{AssetSource, DirectorySource};
