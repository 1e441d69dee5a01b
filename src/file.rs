use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A file selected by a job, ready to be bundled.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchedFile {
    /// Absolute path to the file
    pub absolute_path: PathBuf,

    /// Relative path from the project root, as shown in headers
    pub relative_path: String,
}

impl MatchedFile {
    /// Creates a matched file, deriving the relative path from `root`.
    ///
    /// Falls back to the absolute path when `path` is not below `root`.
    #[must_use]
    pub fn new(path: PathBuf, root: &Path) -> Self {
        let relative_path = pathdiff::diff_paths(&path, root)
            .unwrap_or_else(|| path.clone())
            .display()
            .to_string();

        Self {
            absolute_path: path,
            relative_path,
        }
    }

    /// Reads the file as text, replacing invalid UTF-8 sequences.
    ///
    /// # Errors
    ///
    /// Returns the underlying IO error if the file cannot be read.
    pub fn read_lossy(&self) -> io::Result<String> {
        read_lossy(&self.absolute_path)
    }
}

/// Reads a file as text, replacing invalid UTF-8 with U+FFFD.
pub(crate) fn read_lossy(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_relative_path() {
        let root = Path::new("/project");
        let file = MatchedFile::new(PathBuf::from("/project/src/main.js"), root);

        assert_eq!(file.relative_path, Path::new("src/main.js").display().to_string());
        assert_eq!(file.absolute_path, PathBuf::from("/project/src/main.js"));
    }

    #[test]
    fn test_read_text_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let child = temp.child("README.md");
        child.write_str("# Title\n").unwrap();

        let file = MatchedFile::new(child.path().to_path_buf(), temp.path());
        assert_eq!(file.read_lossy().unwrap(), "# Title\n");
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let temp = assert_fs::TempDir::new().unwrap();
        let child = temp.child("latin1.txt");
        child.write_binary(b"caf\xe9 ok").unwrap();

        let text = read_lossy(child.path()).unwrap();
        assert_eq!(text, "caf\u{FFFD} ok");
    }

    #[test]
    fn test_missing_file_errors() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = MatchedFile::new(temp.path().join("gone.js"), temp.path());

        let err = file.read_lossy().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
