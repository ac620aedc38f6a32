//! Destinations for exported artifacts.

use super::Artifact;
use crate::error::{ConfigError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Receives artifacts, then a single close once every write is queued.
pub trait Sink {
    fn write(&mut self, artifact: Artifact) -> Result<()>;

    fn close(&mut self) -> Result<()>;
}

/// Writes artifacts as files under a root directory, creating parent
/// directories as needed.
#[derive(Debug, Clone)]
pub struct DirSink {
    root: PathBuf,
    written: Vec<PathBuf>,
}

impl DirSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            written: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full paths of every file written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl Sink for DirSink {
    fn write(&mut self, artifact: Artifact) -> Result<()> {
        let path = self.root.join(&artifact.path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }
        std::fs::write(&path, &artifact.contents).map_err(|e| ConfigError::io(&path, e))?;
        debug!(path = %path.display(), "Wrote artifact");
        self.written.push(path);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Keeps artifacts in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    artifacts: Vec<Artifact>,
    closed: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn into_artifacts(self) -> Vec<Artifact> {
        self.artifacts
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Sink for MemorySink {
    fn write(&mut self, artifact: Artifact) -> Result<()> {
        self.artifacts.push(artifact);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

/// Streams artifact contents to a writer such as stdout, each followed by a
/// newline. Closing flushes the writer.
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for WriterSink<W> {
    fn write(&mut self, artifact: Artifact) -> Result<()> {
        self.writer
            .write_all(&artifact.contents)
            .and_then(|_| self.writer.write_all(b"\n"))
            .map_err(|e| ConfigError::io(&artifact.path, e))
    }

    fn close(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| ConfigError::io("<output>", e))
    }
}
