//! The composer: page, popout form and document behind one event loop
//!
//! Hosts deliver [`Event`]s to [`Composer::dispatch`]. Bindings are resolved
//! by bubbling from the target through its ancestors, the bound actions run
//! in that order, and then the outside-click check decides whether the
//! popout form should close. Because the check runs last and the owner
//! claims its own trigger, the click that opens the form never closes it.

use crate::collab::{Clipboard, ExportReport, Notice, RichTextEditor};
use crate::component::EditableComponent;
use crate::config::ComposerConfig;
use crate::doc_info::DocInfo;
use crate::document::Document;
use crate::dom::{Dom, NodeId, Viewport};
use crate::error::{ComposerError, LoadError};
use crate::events::{popout_key_action, Action, Event, EventKind};
use crate::page::{self, ADD_SECTION_BTN_ID, COPY_CODE_BTN_ID, START_OVER_BTN_ID};
use crate::popout::{OwnerKey, OwnerRegistry, PopoutForm};

/// Page controls and the actions their clicks trigger
const CONTROL_BINDINGS: &[(&str, Action)] = &[
    (ADD_SECTION_BTN_ID, Action::AddSection),
    (COPY_CODE_BTN_ID, Action::Export),
    (START_OVER_BTN_ID, Action::StartOver),
];

/// A mounted email composer
pub struct Composer<C: Clipboard> {
    config: ComposerConfig,
    dom: Dom,
    form: PopoutForm,
    document: Document,
    clipboard: C,
    viewport: Viewport,
    notice: Option<Notice>,
    doc_info: DocInfo,
}

impl<C: Clipboard> Composer<C> {
    /// Build the page and mount the form and document onto it
    ///
    /// # Parameters
    /// * `config` - Placeholders and styles
    /// * `clipboard` - Where exports are copied to
    ///
    /// # Returns
    /// * `Ok(Composer)` - Ready composer with one empty section
    /// * `Err(ComposerError)` - The page lacks an element the composer needs
    pub fn new(config: ComposerConfig, clipboard: C) -> Result<Self, ComposerError> {
        let (dom, form, document) = mount(&config)?;
        Ok(Self {
            config,
            dom,
            form,
            document,
            clipboard,
            viewport: Viewport::default(),
            notice: None,
            doc_info: DocInfo::today(),
        })
    }

    /// Deliver one interaction
    ///
    /// # Returns
    /// The actions that ran, in order
    pub fn dispatch(&mut self, event: Event) -> Vec<Action> {
        let actions = match &event {
            Event::KeyDown { key } => {
                if self.form.is_visible() {
                    popout_key_action(*key).into_iter().collect()
                } else {
                    Vec::new()
                }
            }
            Event::Input { target, text } => {
                self.write_input(*target, text);
                Vec::new()
            }
            Event::Click { target } | Event::Submit { target } => {
                self.bound_actions(*target, event.kind())
            }
        };

        for action in &actions {
            self.perform(*action);
        }

        // A fresh page reuses node ids, so the old target means nothing now
        if actions.contains(&Action::StartOver) {
            return actions;
        }
        if let Event::Click { target } = event {
            if self.dom.exists(target) && self.form.dismissed_by(&self.dom, &self.document, target) {
                log::debug!("Click outside the popout");
                self.form.hide(&mut self.dom, &mut self.document);
            }
        }
        actions
    }

    fn bound_actions(&self, target: NodeId, kind: EventKind) -> Vec<Action> {
        self.dom
            .ancestors(target)
            .into_iter()
            .flat_map(|node| self.dom.bindings(node).iter())
            .filter(|binding| binding.kind == kind)
            .map(|binding| binding.action)
            .collect()
    }

    fn write_input(&mut self, target: NodeId, text: &str) {
        let surface = self
            .dom
            .ancestors(target)
            .into_iter()
            .find(|node| self.dom.attr(*node, "contenteditable") == Some("true"));
        match surface {
            Some(node) => self.dom.set_text_content(node, text),
            None => log::debug!("Ignoring input on a surface that is not editable"),
        }
    }

    fn perform(&mut self, action: Action) {
        match action {
            Action::OpenPopout(key) => {
                self.open_popout(key);
            }
            Action::SavePopout => {
                self.form.submit(&mut self.dom, &mut self.document);
            }
            Action::CancelPopout => self.form.hide(&mut self.dom, &mut self.document),
            Action::DeleteSection(id) => {
                self.document.remove_section(&mut self.dom, &mut self.form, id);
            }
            Action::AddSection => {
                self.document.add_section(&mut self.dom);
            }
            Action::Export => {
                if let Err(e) = self.export() {
                    log::error!("Export failed: {}", e);
                }
            }
            Action::StartOver => {
                if let Err(e) = self.start_over() {
                    log::error!("Start over failed: {}", e);
                }
            }
        }
    }

    /// Bind the form to `key`'s component, focus it and show the form
    /// beside it. Returns false if the component no longer exists.
    pub fn open_popout(&mut self, key: OwnerKey) -> bool {
        if !self.form.bind(&mut self.dom, &mut self.document, key) {
            return false;
        }
        let viewport = self.viewport;
        let anchor = self
            .document
            .owner_mut(key)
            .and_then(|owner| owner.focus(&mut self.dom, viewport));
        if let Some(anchor) = anchor {
            self.form.show(&mut self.dom, anchor);
        }
        true
    }

    /// Export the email and copy it to the clipboard
    ///
    /// A failed copy is not an error: it is reported through
    /// [`ExportReport::copied`] and the [`Notice`].
    pub fn export(&mut self) -> Result<ExportReport, ComposerError> {
        let markup = self.document.export(&mut self.dom)?;
        let copied = self.clipboard.copy(&markup);
        if copied {
            self.notice = Some(Notice::Copied);
        } else {
            log::warn!("Copy to clipboard failed");
            self.notice = Some(Notice::CopyFailed);
        }
        self.doc_info.set_contents(markup.clone());
        Ok(ExportReport { markup, copied })
    }

    /// Discard everything and start from a fresh page
    pub fn start_over(&mut self) -> Result<(), ComposerError> {
        let (dom, form, document) = mount(&self.config)?;
        self.dom = dom;
        self.form = form;
        self.document = document;
        self.viewport = Viewport::default();
        self.notice = None;
        self.doc_info = DocInfo::today();
        log::debug!("Started over");
        Ok(())
    }

    /// Replace the document with the content of exported markup
    pub fn load_markup(&mut self, markup: &str) -> Result<usize, LoadError> {
        let count = self.document.load(&mut self.dom, &mut self.form, markup)?;
        self.doc_info.set_contents(markup.to_string());
        Ok(count)
    }

    /// Refresh the document info's contents from the current document
    pub fn snapshot_doc_info(&mut self) -> &DocInfo {
        let markup = self.html(true);
        self.doc_info.set_contents(markup);
        &self.doc_info
    }

    /// Record how far the page is scrolled; used to anchor the form
    pub fn set_scroll(&mut self, scroll_y: f64) {
        self.viewport.scroll_y = scroll_y;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    /// Mutable page access for hosts that lay out nodes
    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    pub fn form(&self) -> &PopoutForm {
        &self.form
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Notice from the last export, if not yet taken
    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn doc_info(&self) -> &DocInfo {
        &self.doc_info
    }

    pub fn doc_info_mut(&mut self) -> &mut DocInfo {
        &mut self.doc_info
    }

    /// Text of the introduction as currently typed
    pub fn introduction_text(&self) -> String {
        self.document.introduction().text(&self.dom)
    }
}

impl<C: Clipboard> RichTextEditor for Composer<C> {
    fn html(&mut self, clean: bool) -> String {
        if !clean {
            return self.dom.outer_html(self.dom.root());
        }
        match self.document.export(&mut self.dom) {
            Ok(markup) => markup,
            Err(e) => {
                log::error!("Export failed: {}", e);
                String::new()
            }
        }
    }

    fn load(&mut self, html: &str) {
        if let Err(e) = self.load_markup(html) {
            log::warn!("Could not load markup: {}", e);
        }
    }
}

fn mount(config: &ComposerConfig) -> Result<(Dom, PopoutForm, Document), ComposerError> {
    let mut dom = Dom::new();
    page::build(&mut dom, config);
    for (id, action) in CONTROL_BINDINGS {
        let button = dom
            .get_element_by_id(id)
            .ok_or_else(|| ComposerError::MissingElement(id.to_string()))?;
        dom.listen(button, EventKind::Click, *action);
    }
    let form = PopoutForm::mount(&mut dom)?;
    let document = Document::mount(&mut dom, config)?;
    Ok((dom, form, document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::MemoryClipboard;
    use crate::events::Key;
    use crate::popout::PopoutSlot;

    fn composer() -> Composer<MemoryClipboard> {
        Composer::new(ComposerConfig::default(), MemoryClipboard::new()).unwrap()
    }

    fn button(c: &Composer<MemoryClipboard>, id: &str) -> NodeId {
        c.dom().get_element_by_id(id).unwrap()
    }

    #[test]
    fn test_add_section_button() {
        let mut c = composer();
        let target = button(&c, ADD_SECTION_BTN_ID);
        assert_eq!(c.dispatch(Event::Click { target }), vec![Action::AddSection]);
        assert_eq!(c.document().len(), 2);
    }

    #[test]
    fn test_click_bubbles_from_trigger_label() {
        let mut c = composer();
        let trigger = c.document().sections()[0].image().trigger();
        let label = c.dom().element_children(trigger)[0];
        let key = OwnerKey::new(c.document().sections()[0].id(), PopoutSlot::Image);
        assert_eq!(
            c.dispatch(Event::Click { target: label }),
            vec![Action::OpenPopout(key)]
        );
        assert!(c.form().is_visible());
        assert_eq!(c.form().owner(), Some(key));
    }

    #[test]
    fn test_keys_only_act_while_form_is_open() {
        let mut c = composer();
        assert!(c.dispatch(Event::KeyDown { key: Key::Escape }).is_empty());

        let trigger = c.document().sections()[0].link().trigger();
        c.dispatch(Event::Click { target: trigger });
        assert_eq!(
            c.dispatch(Event::KeyDown { key: Key::Escape }),
            vec![Action::CancelPopout]
        );
        assert!(!c.form().is_visible());
    }

    #[test]
    fn test_input_writes_editable_surface_only() {
        let mut c = composer();
        let intro = c.document().introduction().node();
        c.dispatch(Event::Input {
            target: intro,
            text: "Hi all".to_string(),
        });
        assert_eq!(c.introduction_text(), "Hi all");

        let add = button(&c, ADD_SECTION_BTN_ID);
        c.dispatch(Event::Input {
            target: add,
            text: "nope".to_string(),
        });
        assert_eq!(c.dom().text_content(add), "Add Section");
    }

    #[test]
    fn test_start_over_resets_everything() {
        let mut c = composer();
        c.dispatch(Event::Click {
            target: button(&c, ADD_SECTION_BTN_ID),
        });
        c.dispatch(Event::Click {
            target: button(&c, START_OVER_BTN_ID),
        });
        assert_eq!(c.document().len(), 1);
        assert_eq!(c.introduction_text(), "Enter your introduction here!");
        assert!(!c.form().is_visible());
    }

    #[test]
    fn test_export_button_copies() {
        let mut c = composer();
        let actions = c.dispatch(Event::Click {
            target: button(&c, COPY_CODE_BTN_ID),
        });
        assert_eq!(actions, vec![Action::Export]);
        assert_eq!(c.notice(), Some(Notice::Copied));
        assert!(c.clipboard().contents().unwrap().contains("introPara"));
    }

    #[test]
    fn test_clean_html_matches_export() {
        let mut c = composer();
        let clean = c.html(true);
        let report = c.export().unwrap();
        assert_eq!(clean, report.markup);
        assert!(c.html(false).contains("contenteditable"));
    }
}
