use std::io::{self, Write};
use std::path::Path;
use tempfile::{Builder, NamedTempFile};
use tracing::debug;

/// A uniquely named file handed to an external tool, removed on drop
#[derive(Debug)]
pub struct ScratchFile {
    file: NamedTempFile,
}

impl ScratchFile {
    pub fn create(dir: &Path, prefix: &str, extension: &str, contents: &str) -> io::Result<Self> {
        let mut file = Builder::new()
            .prefix(&format!("{}-", prefix))
            .suffix(&format!(".{}", extension))
            .tempfile_in(dir)?;
        file.write_all(contents.as_bytes())?;
        file.flush()?;
        debug!(path = %file.path().display(), "wrote scratch file");
        Ok(ScratchFile { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_written_and_removed() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let scratch = ScratchFile::create(dir.path(), "constraint", "dl", "produce 5\n").unwrap();
            assert_eq!(fs::read_to_string(scratch.path()).unwrap(), "produce 5\n");
            assert_eq!(scratch.path().extension().unwrap(), "dl");
            assert!(scratch
                .path()
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("constraint-"));
            scratch.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_names_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let files: Vec<ScratchFile> = (0..50)
            .map(|_| ScratchFile::create(dir.path(), "deal", "pbn", "").unwrap())
            .collect();
        let mut names: Vec<&Path> = files.iter().map(ScratchFile::path).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 50);
    }

    #[test]
    fn test_concurrent_creation() {
        let dir = tempfile::tempdir().unwrap();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let dir = dir.path().to_path_buf();
                std::thread::spawn(move || {
                    (0..10)
                        .map(|_| ScratchFile::create(&dir, "c", "dl", "x").unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let all: Vec<ScratchFile> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), all.len());
        drop(all);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        assert!(ScratchFile::create(&missing, "deals", "txt", "x").is_err());
    }
}
