//! File access collaborator.
//!
//! The core never opens script files itself. Callers hand it text and get
//! text back; loading and saving go through this trait so that embedders
//! can substitute their own storage. Failures propagate unchanged, retry
//! policy belongs to the caller.

use std::{fs, io, path::Path};

/// Collaborator which reads and writes script files.
pub trait FileService {
    /// Read the full text of a script file.
    fn read(&self, path: &Path) -> io::Result<String>;

    /// Write the full text of a script file, replacing previous content.
    fn write(&self, path: &Path, text: &str) -> io::Result<()>;
}

/// [`FileService`] backed by the local file system.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiskFileService;

impl FileService for DiskFileService {
    fn read(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Path, text: &str) -> io::Result<()> {
        fs::write(path, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disk_file_service_round_trips_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("story.ink");

        let service = DiskFileService;
        service.write(&path, "=== start ===\nHello\n").unwrap();

        assert_eq!(service.read(&path).unwrap(), "=== start ===\nHello\n");
    }

    #[test]
    fn reading_a_missing_file_propagates_the_error() {
        let dir = tempfile::tempdir().unwrap();

        let result = DiskFileService.read(&dir.path().join("missing.ink"));

        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }
}
