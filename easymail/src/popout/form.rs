//! The shared popout form
//!
//! One form serves every popout-backed component on the page. It is bound to
//! at most one owner at a time; binding a new owner first releases the old
//! one, so two owners never share the form.

use super::{OwnerKey, PopoutEditable, SaveHandler};
use crate::component::{Anchor, EditableComponent};
use crate::dom::{Dom, NodeId};
use crate::error::ComposerError;
use crate::events::{Action, EventKind};
use crate::field::FormValues;
use std::fmt;

pub const POPOUT_EDITOR_ID: &str = "popoutEditor";
pub const POPOUT_SAVE_ID: &str = "popoutSave";
pub const POPOUT_CANCEL_ID: &str = "popoutCancel";

const HIDE_CLASS: &str = "hide";

/// Resolves owner keys to live components
pub trait OwnerRegistry {
    fn owner(&self, key: OwnerKey) -> Option<&PopoutEditable>;
    fn owner_mut(&mut self, key: OwnerKey) -> Option<&mut PopoutEditable>;
}

/// Controller for the floating popout form
pub struct PopoutForm {
    editor: NodeId,
    form: NodeId,
    save_button: NodeId,
    cancel_button: NodeId,
    owner: Option<OwnerKey>,
    attached: Vec<NodeId>,
    handler: Option<SaveHandler>,
    visible: bool,
    anchor: Option<Anchor>,
}

impl fmt::Debug for PopoutForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopoutForm")
            .field("owner", &self.owner)
            .field("attached", &self.attached)
            .field("has_handler", &self.handler.is_some())
            .field("visible", &self.visible)
            .field("anchor", &self.anchor)
            .finish_non_exhaustive()
    }
}

impl PopoutForm {
    /// Find the form on the page, bind its buttons and start hidden
    ///
    /// # Returns
    /// * `Ok(PopoutForm)` - The form with its submit and cancel bindings
    /// * `Err(ComposerError)` - The editor, its form or a button is missing
    pub fn mount(dom: &mut Dom) -> Result<Self, ComposerError> {
        let editor = require(dom, POPOUT_EDITOR_ID)?;
        let form = dom
            .find_descendant(editor, |d, n| d.tag(n) == Some("form"))
            .ok_or_else(|| ComposerError::MissingElement(format!("{} form", POPOUT_EDITOR_ID)))?;
        let save_button = require(dom, POPOUT_SAVE_ID)?;
        let cancel_button = require(dom, POPOUT_CANCEL_ID)?;

        dom.listen(form, EventKind::Submit, Action::SavePopout);
        dom.listen(save_button, EventKind::Click, Action::SavePopout);
        dom.listen(cancel_button, EventKind::Click, Action::CancelPopout);
        dom.add_class(editor, HIDE_CLASS);

        Ok(Self {
            editor,
            form,
            save_button,
            cancel_button,
            owner: None,
            attached: Vec::new(),
            handler: None,
            visible: false,
            anchor: None,
        })
    }

    /// Bind the form to `key`'s component
    ///
    /// Releases any previous owner (unfocusing it and detaching its inputs),
    /// attaches the new owner's inputs in declared order, prefilled with its
    /// committed values, and installs its save handler as the only handler.
    /// Returns false if `key` no longer resolves; the form is then unbound.
    pub fn bind<R: OwnerRegistry>(&mut self, dom: &mut Dom, registry: &mut R, key: OwnerKey) -> bool {
        self.release(dom, registry);
        let Some(owner) = registry.owner_mut(key) else {
            log::debug!("Popout owner {:?} no longer exists", key);
            return false;
        };
        owner.prefill(dom);
        for field in owner.fields() {
            for node in [field.label(), field.input()] {
                dom.insert_before(self.form, node, self.save_button);
                self.attached.push(node);
            }
        }
        self.handler = Some(owner.save_handler());
        self.owner = Some(key);
        log::debug!(
            "Popout bound to {} with {} fields",
            owner.id(),
            owner.fields().len()
        );
        true
    }

    /// Make the form visible at `anchor`
    pub fn show(&mut self, dom: &mut Dom, anchor: Anchor) {
        dom.set_attr(
            self.editor,
            "style",
            &format!("top: {}px; left: {}px;", anchor.y, anchor.x),
        );
        dom.remove_class(self.editor, HIDE_CLASS);
        self.visible = true;
        self.anchor = Some(anchor);
    }

    /// Hide the form and unbind its owner. Safe to call repeatedly.
    pub fn hide<R: OwnerRegistry>(&mut self, dom: &mut Dom, registry: &mut R) {
        if self.visible {
            log::debug!("Popout hidden");
        }
        dom.add_class(self.editor, HIDE_CLASS);
        self.visible = false;
        self.anchor = None;
        self.release(dom, registry);
    }

    /// Commit the form to its owner, then hide
    ///
    /// Values are read from the inputs and passed to the installed handler;
    /// blank inputs count as absent, so they leave prior values in place.
    /// Returns false when nothing was bound.
    pub fn submit<R: OwnerRegistry>(&mut self, dom: &mut Dom, registry: &mut R) -> bool {
        let committed = match (self.owner, self.handler) {
            (Some(key), Some(handler)) => match registry.owner_mut(key) {
                Some(owner) => {
                    let values = FormValues::read(dom, owner.fields());
                    handler(owner, dom, &values);
                    true
                }
                None => false,
            },
            _ => false,
        };
        self.hide(dom, registry);
        committed
    }

    /// Whether a click on `target` lands inside the form itself
    pub fn is_point_within(&self, dom: &Dom, target: NodeId) -> bool {
        dom.contains(self.editor, target)
    }

    /// Whether the bound owner counts `target` as its own surface
    pub fn owner_claims<R: OwnerRegistry>(&self, dom: &Dom, registry: &R, target: NodeId) -> bool {
        self.owner
            .and_then(|key| registry.owner(key))
            .is_some_and(|owner| owner.claims(dom, target))
    }

    /// Whether a click on `target` should dismiss the visible form
    pub fn dismissed_by<R: OwnerRegistry>(&self, dom: &Dom, registry: &R, target: NodeId) -> bool {
        self.visible
            && !self.is_point_within(dom, target)
            && !self.owner_claims(dom, registry, target)
    }

    fn release<R: OwnerRegistry>(&mut self, dom: &mut Dom, registry: &mut R) {
        if let Some(owner) = self.owner.take().and_then(|key| registry.owner_mut(key)) {
            owner.unfocus(dom);
        }
        for node in self.attached.drain(..) {
            dom.remove_child(self.form, node);
        }
        self.handler = None;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn owner(&self) -> Option<OwnerKey> {
        self.owner
    }

    pub fn anchor(&self) -> Option<Anchor> {
        self.anchor
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Input and label nodes currently attached to the form
    pub fn attached(&self) -> &[NodeId] {
        &self.attached
    }

    pub fn editor(&self) -> NodeId {
        self.editor
    }

    pub fn form(&self) -> NodeId {
        self.form
    }

    pub fn save_button(&self) -> NodeId {
        self.save_button
    }

    pub fn cancel_button(&self) -> NodeId {
        self.cancel_button
    }
}

fn require(dom: &Dom, id: &str) -> Result<NodeId, ComposerError> {
    dom.get_element_by_id(id)
        .ok_or_else(|| ComposerError::MissingElement(id.to_string()))
}
