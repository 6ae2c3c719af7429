//! Staging areas for uploaded history files
//!
//! A decoder reads its input by path, so every upload is first written to a
//! uniquely named artifact. [`StagedArtifact`] owns that artifact and removes
//! it exactly once: explicitly through [`StagedArtifact::release`], or on drop
//! if the owner never got that far (early return, panic in the decoder).

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::error::{IngestError, IngestResult};

/// Default file name prefix for staged uploads
pub const DEFAULT_PREFIX: &str = "history-";
/// Default file name suffix identifying the strap's binary stream format
pub const DEFAULT_SUFFIX: &str = ".bin";

/// Where uploads are staged before decoding
pub trait StagingArea: Send + Sync {
    /// Write `bytes` to a new artifact with a name no other caller can get,
    /// and return its path
    fn stage(&self, bytes: &[u8]) -> io::Result<PathBuf>;

    /// Remove an artifact previously returned by [`StagingArea::stage`]
    fn remove(&self, path: &Path) -> io::Result<()>;
}

// =============================================================================
// Scoped artifact
// =============================================================================

/// A staged upload that is removed when released or dropped
pub struct StagedArtifact {
    area: Arc<dyn StagingArea>,
    path: PathBuf,
    released: bool,
}

impl StagedArtifact {
    /// Stage `bytes` in `area`
    pub fn stage(area: Arc<dyn StagingArea>, bytes: &[u8]) -> IngestResult<Self> {
        let path = area.stage(bytes).map_err(IngestError::Staging)?;
        debug!(path = %path.display(), size = bytes.len(), "Upload staged");
        Ok(Self {
            area,
            path,
            released: false,
        })
    }

    /// Path of the staged file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the artifact, reporting a failure to the caller
    pub fn release(mut self) -> IngestResult<()> {
        self.released = true;
        match self.area.remove(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Staged upload removed");
                Ok(())
            }
            Err(source) => {
                error!(
                    path = %self.path.display(),
                    error = %source,
                    "Failed to remove staged upload, artifact leaked"
                );
                Err(IngestError::Cleanup {
                    path: self.path.clone(),
                    source,
                })
            }
        }
    }
}

impl Drop for StagedArtifact {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = self.area.remove(&self.path) {
            error!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove staged upload on unwind, artifact leaked"
            );
        } else {
            warn!(path = %self.path.display(), "Staged upload removed without explicit release");
        }
    }
}

impl std::fmt::Debug for StagedArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagedArtifact")
            .field("path", &self.path)
            .field("released", &self.released)
            .finish()
    }
}

// =============================================================================
// Directory-backed staging
// =============================================================================

/// Stages uploads as files in a directory
///
/// Names come from `tempfile`, which creates each file exclusively with a
/// random component, so concurrent requests never collide.
#[derive(Debug, Clone)]
pub struct TempDirStaging {
    dir: PathBuf,
    prefix: String,
    suffix: String,
}

impl TempDirStaging {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: DEFAULT_PREFIX.to_string(),
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }

    /// Stage in the OS temp directory
    pub fn system() -> Self {
        Self::new(std::env::temp_dir())
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl StagingArea for TempDirStaging {
    fn stage(&self, bytes: &[u8]) -> io::Result<PathBuf> {
        // A write failure drops the NamedTempFile, which deletes it
        let mut file = tempfile::Builder::new()
            .prefix(&self.prefix)
            .suffix(&self.suffix)
            .tempfile_in(&self.dir)?;
        file.write_all(bytes)?;
        file.flush()?;

        let (_file, path) = file.keep().map_err(|e| e.error)?;
        Ok(path)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

// =============================================================================
// In-memory staging
// =============================================================================

/// Keeps staged uploads in memory under virtual paths
///
/// Useful wherever touching the file system is unwanted. Decoders read the
/// content back with [`MemoryStaging::read`]. Staging and removal failures
/// can be switched on to exercise error paths.
#[derive(Debug)]
pub struct MemoryStaging {
    root: PathBuf,
    suffix: String,
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
    fail_stage: AtomicBool,
    fail_remove: AtomicBool,
}

impl Default for MemoryStaging {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStaging {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("/memory-staging"),
            suffix: DEFAULT_SUFFIX.to_string(),
            files: Mutex::new(HashMap::new()),
            fail_stage: AtomicBool::new(false),
            fail_remove: AtomicBool::new(false),
        }
    }

    /// Content of a staged artifact
    pub fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }

    /// Number of artifacts currently staged
    pub fn live_count(&self) -> usize {
        self.files.lock().len()
    }

    /// Whether `path` is currently staged
    pub fn contains(&self, path: &Path) -> bool {
        self.files.lock().contains_key(path)
    }

    /// Make every subsequent `stage` call fail
    pub fn set_fail_stage(&self, fail: bool) {
        self.fail_stage.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `remove` call fail
    pub fn set_fail_remove(&self, fail: bool) {
        self.fail_remove.store(fail, Ordering::SeqCst);
    }
}

impl StagingArea for MemoryStaging {
    fn stage(&self, bytes: &[u8]) -> io::Result<PathBuf> {
        if self.fail_stage.load(Ordering::SeqCst) {
            return Err(io::Error::other("staging disabled"));
        }
        let path = self.root.join(format!("{}{}", Uuid::new_v4(), self.suffix));
        self.files.lock().insert(path.clone(), bytes.to_vec());
        Ok(path)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "removal disabled",
            ));
        }
        self.files
            .lock()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }
}
