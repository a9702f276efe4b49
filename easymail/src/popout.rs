//! Popout editing: components whose value needs several structured inputs,
//! and the single shared form that edits them

mod editable;
mod form;

pub use editable::{PopoutEditable, PopoutInit, SaveHandler};
pub use form::{OwnerRegistry, PopoutForm, POPOUT_EDITOR_ID, POPOUT_CANCEL_ID, POPOUT_SAVE_ID};

use crate::section::SectionId;

/// Which popout-backed slot of a section a component occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PopoutSlot {
    Image,
    Link,
}

/// Key identifying a popout-backed component
///
/// The form holds one of these instead of a reference to its owner; once the
/// owning section is gone the key simply resolves to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerKey {
    pub section: SectionId,
    pub slot: PopoutSlot,
}

impl OwnerKey {
    pub fn new(section: SectionId, slot: PopoutSlot) -> Self {
        Self { section, slot }
    }
}
