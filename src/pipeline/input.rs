//! Input handling: the [`Document`] unit of work and text decoding.
//!
//! A `Document` is the raw bytes of one file plus its name and, when the
//! caller knows it, the reported MIME type. Reading from disk is the only
//! I/O in the library besides writing results; a failed read surfaces as
//! [`ConvertError::ReadFailure`] straight away with no retry.

use crate::error::ConvertError;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::str::Utf8Error;
use tracing::{debug, warn};

/// Raw input bytes together with the name they were supplied under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File name (not a path) used for type matching and output naming.
    pub filename: String,
    /// MIME type reported by whoever supplied the bytes, if any.
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            mime_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = Some(mime.into());
        self
    }

    /// Read a document from disk.
    pub async fn read(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ConvertError::ReadFailure {
                path: path.to_path_buf(),
                source: e,
            })?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());
        Ok(Self::new(file_name(path), bytes))
    }

    /// Blocking variant of [`Document::read`].
    pub fn read_sync(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| ConvertError::ReadFailure {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());
        Ok(Self::new(file_name(path), bytes))
    }

    /// Decode the content as UTF-8 text, dropping a leading byte-order mark.
    ///
    /// In lossy mode invalid sequences become U+FFFD; in strict mode they are
    /// an error.
    pub fn text(&self, strict: bool) -> Result<Cow<'_, str>, Utf8Error> {
        let bytes = self.bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(self.bytes.as_slice());
        if strict {
            return std::str::from_utf8(bytes).map(Cow::Borrowed);
        }
        let text = String::from_utf8_lossy(bytes);
        if let Cow::Owned(_) = text {
            warn!(
                "'{}' is not valid UTF-8; invalid bytes replaced with U+FFFD",
                self.filename
            );
        }
        Ok(text)
    }
}

/// Last path component as a string, or the whole path if there is none.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Output path next to `input` (or inside `dir` when given).
pub fn output_path(input: &Path, dir: Option<&Path>, output_name: &str) -> PathBuf {
    match dir {
        Some(d) => d.join(output_name),
        None => input
            .parent()
            .map(|p| p.join(output_name))
            .unwrap_or_else(|| PathBuf::from(output_name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_strips_bom() {
        let doc = Document::new("a.txt", b"\xEF\xBB\xBFhello".to_vec());
        assert_eq!(doc.text(true).unwrap(), "hello");
        assert_eq!(doc.text(false).unwrap(), "hello");
    }

    #[test]
    fn lossy_decoding_replaces_invalid_bytes() {
        let doc = Document::new("a.txt", vec![b'a', 0xff, b'b']);
        assert_eq!(doc.text(false).unwrap(), "a\u{FFFD}b");
    }

    #[test]
    fn strict_decoding_rejects_invalid_bytes() {
        let doc = Document::new("a.txt", vec![b'a', 0xff, b'b']);
        assert!(doc.text(true).is_err());
    }

    #[test]
    fn file_name_of_path() {
        assert_eq!(file_name(Path::new("/tmp/docs/notes.md")), "notes.md");
        assert_eq!(file_name(Path::new("notes.md")), "notes.md");
    }

    #[test]
    fn output_path_defaults_to_input_dir() {
        assert_eq!(
            output_path(Path::new("/tmp/docs/notes.md"), None, "notes.html"),
            PathBuf::from("/tmp/docs/notes.html")
        );
        assert_eq!(
            output_path(Path::new("notes.md"), None, "notes.html"),
            PathBuf::from("notes.html")
        );
        assert_eq!(
            output_path(Path::new("/a/notes.md"), Some(Path::new("/out")), "notes.html"),
            PathBuf::from("/out/notes.html")
        );
    }

    #[test]
    fn read_sync_missing_file() {
        let err = Document::read_sync("/definitely/not/here.md").unwrap_err();
        assert!(matches!(err, ConvertError::ReadFailure { .. }));
    }

    #[test]
    fn read_sync_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.md");
        std::fs::write(&path, "# x").unwrap();
        let doc = Document::read_sync(&path).unwrap();
        assert_eq!(doc.filename, "x.md");
        assert_eq!(doc.bytes, b"# x");
        assert!(doc.mime_type.is_none());
    }
}
