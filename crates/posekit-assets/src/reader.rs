use std::io;
use std::path::PathBuf;
use std::sync::mpsc;

use tracing::debug;

use crate::error::LoadError;

/// A non-blocking handle to an in-flight file read.
/// Call `try_recv()` each frame to check for the payload without blocking
/// the draw loop. Dropping it abandons the read; the result is discarded.
pub struct PendingRead {
    file_name: String,
    receiver: mpsc::Receiver<Result<Vec<u8>, LoadError>>,
}

impl PendingRead {
    /// File name of the upload, used for format detection.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Non-blocking check for the result. Returns `None` if still pending.
    pub fn try_recv(&self) -> Option<Result<Vec<u8>, LoadError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => Some(Err(self.interrupted())),
        }
    }

    /// Blocking wait for the result. Only use outside the draw loop.
    pub fn wait(self) -> Result<Vec<u8>, LoadError> {
        self.receiver.recv().map_err(|_| self.interrupted())?
    }

    fn interrupted(&self) -> LoadError {
        LoadError::ReadFailure(
            self.file_name.clone(),
            io::Error::new(io::ErrorKind::Interrupted, "read task ended without a result"),
        )
    }
}

/// Reads uploaded files on a background tokio runtime so the single
/// cooperative thread never blocks on I/O.
pub struct FileReader {
    runtime: tokio::runtime::Runtime,
}

impl FileReader {
    /// Create a new file reader with a background tokio runtime.
    pub fn new() -> Result<Self, LoadError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("posekit-reader")
            .enable_all()
            .build()
            .map_err(|e| LoadError::ReadFailure("background runtime".into(), e))?;
        Ok(Self { runtime })
    }

    /// Start reading `path` fully into memory.
    pub fn read(&self, path: impl Into<PathBuf>) -> PendingRead {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let (tx, rx) = mpsc::channel();

        let display_name = file_name.clone();
        self.runtime.spawn(async move {
            let result = tokio::fs::read(&path)
                .await
                .map_err(|e| LoadError::ReadFailure(path.display().to_string(), e));
            if tx.send(result).is_err() {
                debug!("Read of '{}' finished after it was abandoned", display_name);
            }
        });

        PendingRead {
            file_name,
            receiver: rx,
        }
    }
}
