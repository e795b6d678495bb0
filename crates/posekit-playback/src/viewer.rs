//! The viewer controller.
//!
//! One `Viewer` owns the active [`ModelResource`], its scene, the optional
//! pose table and the frame scheduler. Every state change goes through its
//! methods; the UI reads [`Viewer::snapshot`] and drains [`ViewerEvent`]s,
//! the renderer reads the [`SharedScene`] handle.

use std::mem;
use std::sync::Arc;
use std::time::Duration;

use posekit_assets::{
    AssetSource, BlobStore, FormatKind, LoadError, LoaderRegistry, ModelLoader, PendingRead, UploadKind,
};
use posekit_core::{Color, ResourceId};
use posekit_scene::SharedScene;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::applier::{self, ApplyReport};
use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::material::apply_color;
use crate::pose::{parse_pose_file, AnimationFrameTable};
use crate::resource::{LoadedModel, ModelResource, Origin, ResourceDescriptor, ResourceStatus};
use crate::scheduler::{FrameScheduler, PlaybackState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaybackDescriptor {
    pub current_frame: usize,
    pub is_playing: bool,
    pub total_frames: usize,
}

/// Everything a UI displays, captured at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewerSnapshot {
    pub resource: ResourceDescriptor,
    pub playback: PlaybackDescriptor,
    pub error: Option<String>,
    /// A file read is in flight
    pub loading: bool,
    /// Seconds into the embedded clip, for models played without a pose table
    pub clip_time: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    ModelActivated { id: ResourceId, name: String },
    ModelCleared,
    FrameApplied { frame: usize, joints: usize },
    /// Materials changed outside the transform path; redraw
    SceneDirty,
    LoadFailed(String),
}

struct SceneContent {
    scene: SharedScene,
    clips: Vec<String>,
    poses: Option<Arc<AnimationFrameTable>>,
}

pub struct Viewer {
    config: ViewerConfig,
    loaders: LoaderRegistry,
    source: Box<dyn AssetSource>,
    blobs: BlobStore,
    resource: ModelResource,
    content: Option<SceneContent>,
    scheduler: FrameScheduler,
    pending: Option<PendingRead>,
    last_error: Option<String>,
    events: Vec<ViewerEvent>,
}

impl Viewer {
    /// Create a viewer showing the built-in default model. Pose files
    /// resolve their `modelUrl` through `source`.
    pub fn new(config: ViewerConfig, source: impl AssetSource + 'static) -> Self {
        let scheduler = FrameScheduler::new(&config.playback);
        let mut viewer = Self {
            config,
            loaders: LoaderRegistry::with_builtin(),
            source: Box::new(source),
            blobs: BlobStore::new(),
            resource: ModelResource::cleared(),
            content: None,
            scheduler,
            pending: None,
            last_error: None,
            events: Vec::new(),
        };
        viewer.reset_to_default();
        viewer
    }

    /// Install a decoder for a format, e.g. FBX.
    pub fn register_loader(&mut self, format: FormatKind, loader: impl ModelLoader + 'static) {
        self.loaders.register(format, loader);
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// The store backing uploaded models; the renderer resolves `blob:` URLs here.
    pub fn blob_store(&self) -> &BlobStore {
        &self.blobs
    }

    pub fn resource(&self) -> &ModelResource {
        &self.resource
    }

    /// Handle to the active scene for the renderer, if a model is shown.
    pub fn scene(&self) -> Option<SharedScene> {
        self.content.as_ref().map(|content| content.scene.clone())
    }

    pub fn pose_table(&self) -> Option<&AnimationFrameTable> {
        self.content.as_ref()?.poses.as_deref()
    }

    pub fn clips(&self) -> &[String] {
        self.content.as_ref().map_or(&[], |content| content.clips.as_slice())
    }

    pub fn playback(&self) -> PlaybackState {
        self.scheduler.state()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Decode an uploaded file without touching the active model.
    ///
    /// Model files are decoded and backed by a fresh transient blob. A pose
    /// file is validated first, then the model it names is fetched (from a
    /// live blob URL or the asset source) and decoded.
    pub fn load_from_file(&self, bytes: Vec<u8>, file_name: &str) -> Result<LoadedModel, ViewerError> {
        let kind = UploadKind::from_file_name(file_name)?;
        if !self.config.mode.accepts(kind) {
            return Err(LoadError::UnsupportedFormat(file_name.to_string()).into());
        }

        match kind {
            UploadKind::Model(format) => {
                let loaded = self.loaders.decode(format, file_name, &bytes)?;
                let handle = self.blobs.allocate(bytes, format);
                Ok(LoadedModel {
                    resource: ModelResource::uploaded(Origin::Transient(handle), format, file_name),
                    scene: loaded.scene,
                    clips: loaded.clips,
                    poses: None,
                })
            }
            UploadKind::PoseData => {
                let table = parse_pose_file(&bytes)?;
                let (model_bytes, format) = self.fetch_model(table.model_url())?;
                let loaded = self.loaders.decode(format, table.model_url(), &model_bytes)?;
                let origin = Origin::Remote(table.model_url().to_string());
                Ok(LoadedModel {
                    resource: ModelResource::uploaded(origin, format, file_name),
                    scene: loaded.scene,
                    clips: loaded.clips,
                    poses: Some(table),
                })
            }
        }
    }

    fn fetch_model(&self, url: &str) -> Result<(Arc<[u8]>, FormatKind), LoadError> {
        if let Some(entry) = self.blobs.resolve(url) {
            return Ok((entry.bytes, entry.format));
        }
        let format = FormatKind::from_url(url).ok_or_else(|| LoadError::UnsupportedFormat(url.to_string()))?;
        let bytes = self.source.fetch(url)?;
        Ok((bytes.into(), format))
    }

    /// Make `model` the active resource. The previous resource is dropped,
    /// which revokes its blob if it had one, unless the new model was
    /// loaded from that very blob URL, in which case the handle moves over.
    pub fn activate(&mut self, model: LoadedModel) -> ResourceId {
        self.pending = None;
        self.scheduler.stop();

        let LoadedModel {
            resource,
            scene,
            clips,
            poses,
        } = model;
        let previous = mem::replace(&mut self.resource, resource);
        self.adopt_origin(previous);

        let total_frames = match &poses {
            Some(table) => table.len(),
            None if !clips.is_empty() => self.config.playback.embedded_clip_frames,
            None => 0,
        };
        self.content = Some(SceneContent {
            scene: SharedScene::new(scene),
            clips,
            poses: poses.map(Arc::new),
        });
        self.scheduler.load(total_frames);
        self.last_error = None;

        info!(
            "Activated '{}' ({}, {} frames)",
            self.resource.display_name, self.resource.format, total_frames
        );
        self.events.push(ViewerEvent::ModelActivated {
            id: self.resource.id,
            name: self.resource.display_name.clone(),
        });
        self.apply_current();
        self.resource.id
    }

    fn adopt_origin(&mut self, previous: ModelResource) {
        match previous.origin {
            Origin::Transient(handle) if self.resource.origin.url() == Some(handle.url()) => {
                debug!("'{}' keeps blob {}", self.resource.display_name, handle.id());
                self.resource.origin = Origin::Transient(handle);
            }
            // Dropped here: a transient handle revokes its blob.
            _ => {}
        }
    }

    /// Load and activate in one step. On failure the active model stays
    /// as it was and the error is recorded for display.
    pub fn upload(&mut self, bytes: Vec<u8>, file_name: &str) -> Result<ResourceId, ViewerError> {
        self.last_error = None;
        match self.load_from_file(bytes, file_name) {
            Ok(model) => Ok(self.activate(model)),
            Err(e) => {
                self.record_error(&e);
                Err(e)
            }
        }
    }

    /// Track an asynchronous read started with a
    /// [`FileReader`](posekit_assets::FileReader). The payload is loaded on
    /// a later [`tick`](Self::tick). Starting another upload, or replacing
    /// or clearing the model first, abandons this one.
    pub fn begin_upload(&mut self, pending: PendingRead) {
        if let Some(previous) = self.pending.replace(pending) {
            debug!("Abandoned read of '{}'", previous.file_name());
        }
        self.last_error = None;
    }

    fn poll_upload(&mut self) {
        let Some(result) = self.pending.as_ref().and_then(PendingRead::try_recv) else {
            return;
        };
        let Some(pending) = self.pending.take() else {
            return;
        };

        let outcome = result
            .map_err(ViewerError::from)
            .and_then(|bytes| self.load_from_file(bytes, pending.file_name()));
        match outcome {
            Ok(model) => {
                self.activate(model);
            }
            Err(e) => self.record_error(&e),
        }
    }

    fn record_error(&mut self, error: &ViewerError) {
        warn!("Upload failed: {}", error);
        if self.content.is_none() {
            self.resource.status = ResourceStatus::Error;
        }
        let message = error.to_string();
        self.last_error = Some(message.clone());
        self.events.push(ViewerEvent::LoadFailed(message));
    }

    /// Show nothing. Releases the active blob and stops playback.
    pub fn clear(&mut self) {
        self.pending = None;
        self.scheduler.stop();
        self.content = None;
        let previous = mem::replace(&mut self.resource, ModelResource::cleared());
        info!("Cleared '{}'", previous.display_name);
        self.events.push(ViewerEvent::ModelCleared);
    }

    /// Replace whatever is shown with the built-in default model.
    pub fn reset_to_default(&mut self) -> ResourceId {
        self.activate(LoadedModel::builtin_default())
    }

    /// Discard the viewer, releasing any outstanding blob.
    pub fn teardown(mut self) {
        self.pending = None;
        self.scheduler.stop();
        self.content = None;
        let previous = mem::replace(&mut self.resource, ModelResource::cleared());
        info!("Viewer torn down (last model '{}')", previous.display_name);
    }

    pub fn play(&mut self) -> bool {
        self.scheduler.play()
    }

    pub fn pause(&mut self) -> bool {
        self.scheduler.pause()
    }

    pub fn toggle_playback(&mut self) -> bool {
        self.scheduler.toggle()
    }

    /// Jump to a frame (wrapped into the timeline) and pose it immediately.
    pub fn scrub_to(&mut self, frame: usize) -> usize {
        let frame = self.scheduler.scrub_to(frame);
        self.apply_current();
        frame
    }

    /// Drive the viewer from the host's animation callback. Finishes any
    /// completed upload, then advances playback if a frame period has
    /// passed. Returns the new frame index when the cursor moved.
    pub fn tick(&mut self, now: Duration) -> Option<usize> {
        self.poll_upload();
        let frame = self.scheduler.tick(now)?;
        self.apply_current();
        Some(frame)
    }

    /// Pose `frame` onto the scene of `resource`. Does nothing when that
    /// resource is no longer the active one or carries no pose table.
    pub fn apply_frame(&mut self, resource: ResourceId, frame: usize) -> Option<ApplyReport> {
        if resource != self.resource.id {
            debug!("Discarding frame {} for superseded resource {}", frame, resource);
            return None;
        }
        let content = self.content.as_ref()?;
        let poses = content.poses.as_ref()?;
        let report = applier::apply_frame(frame, poses, &mut content.scene.write());
        self.events.push(ViewerEvent::FrameApplied {
            frame,
            joints: report.written.len(),
        });
        Some(report)
    }

    fn apply_current(&mut self) -> Option<ApplyReport> {
        self.apply_frame(self.resource.id, self.scheduler.current_frame())
    }

    /// Tint every mesh of the active model. Returns `false` when nothing is shown.
    pub fn set_model_color(&mut self, color: Color) -> bool {
        let Some(content) = &self.content else {
            return false;
        };
        apply_color(&mut content.scene.write(), color);
        self.events.push(ViewerEvent::SceneDirty);
        true
    }

    pub fn snapshot(&self) -> ViewerSnapshot {
        let state = self.scheduler.state();
        let clip_time = self
            .content
            .as_ref()
            .filter(|content| content.poses.is_none() && !content.clips.is_empty())
            .map(|_| self.config.playback.clip_time(state.current_frame));

        ViewerSnapshot {
            resource: self.resource.descriptor(),
            playback: PlaybackDescriptor {
                current_frame: state.current_frame,
                is_playing: state.is_playing,
                total_frames: self.scheduler.total_frames(),
            },
            error: self.last_error.clone(),
            loading: self.pending.is_some(),
            clip_time,
        }
    }

    /// Take all events queued since the last call.
    pub fn drain_events(&mut self) -> Vec<ViewerEvent> {
        mem::take(&mut self.events)
    }
}
