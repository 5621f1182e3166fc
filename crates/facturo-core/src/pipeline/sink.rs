//! Destinations for generated documents.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Receives each finished document as it is produced.
pub trait DocumentSink {
    /// Store one document under a file name.
    fn write(&mut self, name: &str, bytes: &[u8]) -> io::Result<()>;
}

/// Writes documents as files in a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path a document name is written to.
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl DocumentSink for DirectorySink {
    fn write(&mut self, name: &str, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_of(name);
        fs::write(&path, bytes)?;
        debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

/// Keeps documents in memory, in production order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    documents: Vec<(String, Vec<u8>)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> &[(String, Vec<u8>)] {
        &self.documents
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.documents
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, bytes)| bytes.as_slice())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn into_documents(self) -> Vec<(String, Vec<u8>)> {
        self.documents
    }
}

impl DocumentSink for MemorySink {
    fn write(&mut self, name: &str, bytes: &[u8]) -> io::Result<()> {
        self.documents.push((name.to_string(), bytes.to_vec()));
        Ok(())
    }
}

impl<S: DocumentSink + ?Sized> DocumentSink for &mut S {
    fn write(&mut self, name: &str, bytes: &[u8]) -> io::Result<()> {
        (**self).write(name, bytes)
    }
}
