//! The email document: introduction plus ordered sections
//!
//! Owns section lifecycle on the live page and assembles the exported
//! markup from the `copyTarget` scaffold.

use crate::component::EditableComponent;
use crate::config::ComposerConfig;
use crate::dom::{parse_fragment, Dom, NodeId};
use crate::error::{ComposerError, LoadError};
use crate::field::InlineEditable;
use crate::page::{
    BOTTOM_BTNS_ID, COPY_TARGET_BOTTOM_ID, COPY_TARGET_ID, COPY_TARGET_INTRO_ID,
    COPY_TARGET_SECTIONS_ID, INTRO_CTN_ID, SECTIONS_CTN_ID,
};
use crate::popout::{OwnerKey, OwnerRegistry, PopoutEditable, PopoutForm};
use crate::section::{Section, SectionContent, SectionId};

/// Id of the introduction paragraph
pub const INTRO_ID: &str = "introPara";

/// Introduction and sections of the email being composed
#[derive(Debug)]
pub struct Document {
    config: ComposerConfig,
    sections_ctn: NodeId,
    bottom_btns: NodeId,
    copy_target: NodeId,
    introduction: InlineEditable,
    sections: Vec<Section>,
    next_id: u32,
}

impl Document {
    /// Attach to the page, render the introduction and the first section
    ///
    /// # Parameters
    /// * `dom` - Page holding the scaffold built by [`crate::page::build`]
    /// * `config` - Placeholders and styles for every field
    ///
    /// # Returns
    /// * `Ok(Document)` - Mounted document with one section
    /// * `Err(ComposerError)` - A scaffold element is missing
    pub fn mount(dom: &mut Dom, config: &ComposerConfig) -> Result<Self, ComposerError> {
        let intro_ctn = require(dom, INTRO_CTN_ID)?;
        let sections_ctn = require(dom, SECTIONS_CTN_ID)?;
        let bottom_btns = require(dom, BOTTOM_BTNS_ID)?;
        let copy_target = require(dom, COPY_TARGET_ID)?;

        let mut introduction =
            InlineEditable::new(dom, "p", INTRO_ID, &config.placeholders.introduction, None);
        let intro = introduction.render_editing(dom);
        dom.append(intro_ctn, intro);

        let mut document = Self {
            config: config.clone(),
            sections_ctn,
            bottom_btns,
            copy_target,
            introduction,
            sections: Vec::new(),
            next_id: 1,
        };
        document.add_section(dom);
        Ok(document)
    }

    pub fn introduction(&self) -> &InlineEditable {
        &self.introduction
    }

    /// Sections in reading order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id() == id)
    }

    pub fn section_mut(&mut self, id: SectionId) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id() == id)
    }

    /// 1-based position of a section in reading order
    pub fn position_of(&self, id: SectionId) -> Option<usize> {
        self.sections.iter().position(|s| s.id() == id).map(|i| i + 1)
    }

    /// Section at a 1-based position
    pub fn section_at(&self, position: usize) -> Option<&Section> {
        position.checked_sub(1).and_then(|i| self.sections.get(i))
    }

    /// Append a new section just above the control row
    pub fn add_section(&mut self, dom: &mut Dom) -> SectionId {
        let id = SectionId::new(self.next_id);
        self.next_id += 1;
        let position = self.sections.len() + 1;

        let mut section = Section::new(dom, id, position, &self.config);
        let node = section.render_editing(dom);
        dom.insert_before(self.sections_ctn, node, self.bottom_btns);
        self.sections.push(section);
        log::debug!("Added section {} at position {}", id, position);
        id
    }

    /// Delete a section by id
    ///
    /// Unknown ids and the first section are ignored. If the popout form is
    /// bound to one of the section's fields it is hidden first.
    ///
    /// # Returns
    /// `true` if a section was removed
    pub fn remove_section(&mut self, dom: &mut Dom, form: &mut PopoutForm, id: SectionId) -> bool {
        let Some(index) = self.sections.iter().position(|s| s.id() == id) else {
            log::debug!("Ignoring delete of unknown section {}", id);
            return false;
        };
        if index == 0 {
            log::debug!("Ignoring delete of the first section");
            return false;
        }
        if form.owner().is_some_and(|key| key.section == id) {
            form.hide(dom, self);
        }
        let section = self.sections.remove(index);
        section.delete(dom);
        log::debug!("Removed section {} from position {}", id, index + 1);
        true
    }

    /// Delete the section at a 1-based position, with the same rules as
    /// [`Document::remove_section`]
    pub fn remove_section_at(
        &mut self,
        dom: &mut Dom,
        form: &mut PopoutForm,
        position: usize,
    ) -> bool {
        match self.section_at(position).map(Section::id) {
            Some(id) => self.remove_section(dom, form, id),
            None => {
                log::debug!("Ignoring delete at out-of-range position {}", position);
                false
            }
        }
    }

    /// Serialize the final form of the email
    ///
    /// Clones the `copyTarget` scaffold, fills it with final renders of the
    /// introduction and every section, serializes it and frees the clone.
    /// The live page is left as it was.
    pub fn export(&self, dom: &mut Dom) -> Result<String, ComposerError> {
        let target = dom
            .clone_node(self.copy_target, true)
            .ok_or_else(|| ComposerError::MissingElement(COPY_TARGET_ID.to_string()))?;
        let markup = self.fill_export(dom, target);
        dom.discard(target);
        let markup = markup?;
        log::info!(
            "Exported {} sections ({} bytes)",
            self.sections.len(),
            markup.len()
        );
        Ok(markup)
    }

    fn fill_export(&self, dom: &mut Dom, target: NodeId) -> Result<String, ComposerError> {
        let lookup = |dom: &Dom, id: &str| {
            dom.query_id(target, id)
                .ok_or_else(|| ComposerError::MissingElement(id.to_string()))
        };
        let intro_ctn = lookup(dom, COPY_TARGET_INTRO_ID)?;
        let sections_ctn = lookup(dom, COPY_TARGET_SECTIONS_ID)?;
        let bottom = lookup(dom, COPY_TARGET_BOTTOM_ID)?;

        let intro = self.introduction.render_final(dom);
        dom.append(intro_ctn, intro);
        for section in &self.sections {
            let row = section.render_final(dom);
            dom.insert_before(sections_ctn, row, bottom);
        }
        dom.discard(bottom);
        Ok(dom.outer_html(target))
    }

    /// Replace the document's content with that of exported markup
    ///
    /// The form is hidden, sections past the first are removed, and enough
    /// sections are added to hold every section in the markup. The kept
    /// section is reset to its placeholders, then fields are written as an
    /// author would write them.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of sections read from the markup
    /// * `Err(LoadError)` - The markup is not an export
    pub fn load(&mut self, dom: &mut Dom, form: &mut PopoutForm, markup: &str) -> Result<usize, LoadError> {
        let mut scratch = Dom::new();
        let root = scratch.root();
        for node in parse_fragment(&mut scratch, markup) {
            scratch.append(root, node);
        }
        let find = |id: &str| {
            scratch
                .get_element_by_id(id)
                .ok_or_else(|| LoadError::MissingElement(id.to_string()))
        };
        let intro_ctn = find(COPY_TARGET_INTRO_ID)?;
        let sections_ctn = find(COPY_TARGET_SECTIONS_ID)?;

        let intro = scratch
            .query_id(intro_ctn, INTRO_ID)
            .map(|node| scratch.text_content(node))
            .unwrap_or_else(|| scratch.text_content(intro_ctn));
        let contents: Vec<SectionContent> = scratch
            .element_children(sections_ctn)
            .into_iter()
            .filter(|row| is_section_row(&scratch, *row))
            .map(|row| {
                SectionContent::read(&scratch, row).without_placeholders(&self.config.placeholders)
            })
            .collect();

        form.hide(dom, self);
        let keep = self.sections.len().min(1);
        for section in self.sections.split_off(keep) {
            section.delete(dom);
        }
        while self.sections.len() < contents.len() {
            self.add_section(dom);
        }

        self.introduction.set_text(dom, &intro);
        for section in &mut self.sections {
            section.reset(dom);
        }
        for (section, content) in self.sections.iter_mut().zip(&contents) {
            section.restore(dom, content);
        }
        log::debug!("Loaded {} sections from markup", contents.len());
        Ok(contents.len())
    }
}

impl OwnerRegistry for Document {
    fn owner(&self, key: OwnerKey) -> Option<&PopoutEditable> {
        self.section(key.section).map(|s| s.popout(key.slot))
    }

    fn owner_mut(&mut self, key: OwnerKey) -> Option<&mut PopoutEditable> {
        self.section_mut(key.section).map(|s| s.popout_mut(key.slot))
    }
}

fn is_section_row(dom: &Dom, row: NodeId) -> bool {
    dom.find_descendant(row, |d, n| {
        d.attr(n, "id")
            .is_some_and(|id| id.starts_with("section") && id.ends_with("_contentType"))
    })
    .is_some()
}

fn require(dom: &Dom, id: &str) -> Result<NodeId, ComposerError> {
    dom.get_element_by_id(id)
        .ok_or_else(|| ComposerError::MissingElement(id.to_string()))
}
