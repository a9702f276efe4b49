//! Interaction events and the actions they trigger
//!
//! Nodes carry `(EventKind, Action)` bindings; the composer resolves an
//! incoming [`Event`] against those bindings (bubbling from the target up
//! through its ancestors) and against the keyboard table below.

use crate::dom::NodeId;
use crate::popout::OwnerKey;
use crate::section::SectionId;

/// Interaction type used to key bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Submit,
    KeyDown,
    Input,
}

/// Keys with a meaning while the popout form is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Escape,
    Other(char),
}

/// An interaction delivered by the host
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Pointer click on a node
    Click { target: NodeId },
    /// Form submission originating at a node
    Submit { target: NodeId },
    /// Key press while the page has focus
    KeyDown { key: Key },
    /// The user replaced the text of an in-place editable surface
    Input { target: NodeId, text: String },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Click { .. } => EventKind::Click,
            Event::Submit { .. } => EventKind::Submit,
            Event::KeyDown { .. } => EventKind::KeyDown,
            Event::Input { .. } => EventKind::Input,
        }
    }
}

/// What a binding does when its event fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Bind the popout form to a component and show it
    OpenPopout(OwnerKey),
    /// Commit the popout form to its owner and hide it
    SavePopout,
    /// Hide the popout form without committing
    CancelPopout,
    DeleteSection(SectionId),
    AddSection,
    Export,
    StartOver,
}

/// Keyboard shortcuts honoured while the popout form is visible
pub const POPOUT_KEYS: &[(Key, Action)] = &[
    (Key::Enter, Action::SavePopout),
    (Key::Escape, Action::CancelPopout),
];

/// Look up the popout shortcut for a key
pub fn popout_key_action(key: Key) -> Option<Action> {
    POPOUT_KEYS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, action)| *action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_table() {
        assert_eq!(popout_key_action(Key::Enter), Some(Action::SavePopout));
        assert_eq!(popout_key_action(Key::Escape), Some(Action::CancelPopout));
        assert_eq!(popout_key_action(Key::Other('a')), None);
    }
}
