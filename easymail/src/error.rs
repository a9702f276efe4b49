//! Error types for the composer

use thiserror::Error;

/// Errors raised while assembling the composer on a page
///
/// A missing anchor is a broken page, not a recoverable condition, so these
/// surface once at startup rather than mid-session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposerError {
    /// An element the composer attaches to is not on the page
    #[error("Required element '{0}' is missing from the page")]
    MissingElement(String),
}

/// Errors raised when reading previously exported markup back in
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The markup lacks a scaffold element every export carries
    #[error("Markup has no '{0}' element; it was not produced by an export")]
    MissingElement(String),
}
