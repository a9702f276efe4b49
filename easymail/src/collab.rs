//! Collaborators the composer hands its output to

use std::fs;
use std::path::{Path, PathBuf};

/// Destination for the exported markup
///
/// Failures are reported through the return value, never raised.
pub trait Clipboard {
    /// Copy `text`, returning whether it succeeded
    fn copy(&mut self, text: &str) -> bool;
}

/// Clipboard that keeps the last copied text in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
    fail: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that refuses every copy
    pub fn failing() -> Self {
        Self {
            contents: None,
            fail: true,
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn copy(&mut self, text: &str) -> bool {
        if self.fail {
            return false;
        }
        self.contents = Some(text.to_string());
        true
    }
}

/// Clipboard that writes each copy to a file
#[derive(Debug, Clone)]
pub struct FileClipboard {
    path: PathBuf,
}

impl FileClipboard {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Clipboard for FileClipboard {
    fn copy(&mut self, text: &str) -> bool {
        match fs::write(&self.path, text) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Could not write {}: {}", self.path.display(), e);
                false
            }
        }
    }
}

/// The rich-text editor surface the composer presents to its host
pub trait RichTextEditor {
    /// Current markup; `clean` selects the exported form over the live
    /// editing surface
    fn html(&mut self, clean: bool) -> String;

    /// Replace the content with previously exported markup
    fn load(&mut self, html: &str);
}

/// User-visible outcome of the last export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Copied,
    CopyFailed,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::Copied => "successfully copied!",
            Notice::CopyFailed => "Copy failed. Select the code and copy it manually.",
        }
    }
}

/// Result of an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub markup: String,
    pub copied: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard_keeps_last_copy() {
        let mut clipboard = MemoryClipboard::new();
        assert!(clipboard.copy("a"));
        assert!(clipboard.copy("b"));
        assert_eq!(clipboard.contents(), Some("b"));
    }

    #[test]
    fn test_failing_clipboard_reports_failure() {
        let mut clipboard = MemoryClipboard::failing();
        assert!(!clipboard.copy("a"));
        assert_eq!(clipboard.contents(), None);
    }

    #[test]
    fn test_file_clipboard_reports_io_failure() {
        let dir = std::env::temp_dir().join("easymail-no-such-dir").join("nested");
        let mut clipboard = FileClipboard::new(dir.join("out.html"));
        assert!(!clipboard.copy("<p></p>"));
    }

    #[test]
    fn test_file_clipboard_writes() {
        let path = std::env::temp_dir().join(format!("easymail-clip-{}.html", std::process::id()));
        let mut clipboard = FileClipboard::new(&path);
        assert!(clipboard.copy("<p>hi</p>"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "<p>hi</p>");
        let _ = fs::remove_file(&path);
    }
}
