//! easymail - editable email composer
//!
//! Builds multi-section HTML email bodies. Every piece of content is an
//! editable component with a live editing surface and a clean final copy;
//! export assembles the final copies into portable, inline-styled markup.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::enum_variant_names)]

pub mod collab;
pub mod component;
pub mod composer;
pub mod config;
pub mod doc_info;
pub mod document;
pub mod dom;
pub mod draft;
pub mod error;
pub mod events;
pub mod field;
pub mod page;
pub mod popout;
pub mod section;

pub use collab::{Clipboard, ExportReport, FileClipboard, MemoryClipboard, Notice, RichTextEditor};
pub use component::{EditableComponent, FieldValue, Mode};
pub use composer::Composer;
pub use config::ComposerConfig;
pub use doc_info::DocInfo;
pub use document::Document;
pub use draft::Draft;
pub use error::{ComposerError, LoadError};
pub use events::{Action, Event, Key};
