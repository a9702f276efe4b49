//! Metadata about the email being edited

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// File type tag carried by every saved document
pub const DOCUMENT_FILE_TYPE: &str = "isa-easy-email";

/// Title, creation date and contents of a document
///
/// Setters only store; callers that show the title somewhere refresh that
/// display themselves from [`DocInfo::window_title`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocInfo {
    file_type: String,
    title: String,
    date_created: String,
    #[serde(default)]
    contents: String,
}

impl DocInfo {
    /// New document info dated `date`, titled after it
    pub fn new(date: NaiveDate) -> Self {
        let date_created = format_date(date);
        Self {
            file_type: DOCUMENT_FILE_TYPE.to_string(),
            title: format!("ISA Email {}", date_created),
            date_created,
            contents: String::new(),
        }
    }

    /// New document info dated today
    pub fn today() -> Self {
        Self::new(Local::now().date_naive())
    }

    pub fn file_type(&self) -> &str {
        &self.file_type
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn date_created(&self) -> &str {
        &self.date_created
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    pub fn set_contents(&mut self, contents: String) {
        self.contents = contents;
    }

    /// Text for the window title bar
    pub fn window_title(&self) -> String {
        format!("Editing {} | ISA Easy Email", self.title)
    }

    /// Take every field from `other`
    ///
    /// Refused (returning false) when `other` lacks a title or contents, or
    /// was saved by a different kind of document.
    pub fn apply(&mut self, other: &DocInfo) -> bool {
        if other.title.is_empty() || other.contents.is_empty() {
            return false;
        }
        if other.file_type != self.file_type {
            log::debug!("Refusing document of type '{}'", other.file_type);
            return false;
        }
        *self = other.clone();
        true
    }
}

/// `MM/DD/YYYY`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}
