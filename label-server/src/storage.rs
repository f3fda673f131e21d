//! Transient artifact storage
//!
//! PDF artifacts handed to the OS spooler are written under
//! `<work_dir>/tmp` with deterministic names, so a rebuild of the same
//! label overwrites the previous file instead of accumulating copies.
//! Writes are flushed to disk before success is reported; there is no
//! retention guarantee beyond the handoff.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use label_engine::PdfArtifact;
use tracing::{info, instrument};

/// Filesystem store for rendered artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(work_dir: impl AsRef<Path>) -> Self {
        Self { dir: work_dir.as_ref().join("tmp") }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the artifact under its suggested name, overwriting any
    /// previous file, and return the full path.
    #[instrument(skip(artifact), fields(filename = %artifact.filename))]
    pub fn store(&self, artifact: &PdfArtifact) -> std::io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&artifact.filename);

        let mut file = File::create(&path)?;
        file.write_all(&artifact.bytes)?;
        file.sync_all()?;

        info!(path = %path.display(), bytes = artifact.bytes.len(), "stored artifact");
        Ok(path)
    }
}
