//! Content sections: one block of the email
//!
//! A section is a fixed template of five fields laid out as a table row:
//! a heading region holding the type label and title, followed by the
//! image, body text and link.

use crate::component::{AttributeBundle, EditableComponent, FieldValue, Mode};
use crate::config::{ComposerConfig, Placeholders};
use crate::dom::{Dom, NodeId};
use crate::events::{Action, EventKind};
use crate::field::{FormValues, InlineEditable};
use crate::popout::{OwnerKey, PopoutEditable, PopoutInit, PopoutSlot};
use std::fmt;

/// Inputs offered for a section image
pub const IMAGE_FIELDS: &[&str] = &["URL", "Title", "Alt Text"];
/// Inputs offered for a section link
pub const LINK_FIELDS: &[&str] = &["URL", "Text"];

/// Form input to `img` attribute
const IMAGE_ATTRS: &[(&str, &str)] = &[("URL", "src"), ("Title", "title"), ("Alt Text", "alt")];

/// Stable identity of a section, assigned once at creation
///
/// Positions shift as sections are removed; ids never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(u32);

impl SectionId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fields of a section in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    ContentType,
    ContentTitle,
    ContentImage,
    ContentBlurb,
    ContentLink,
}

impl FieldName {
    pub const ALL: [FieldName; 5] = [
        FieldName::ContentType,
        FieldName::ContentTitle,
        FieldName::ContentImage,
        FieldName::ContentBlurb,
        FieldName::ContentLink,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::ContentType => "contentType",
            FieldName::ContentTitle => "contentTitle",
            FieldName::ContentImage => "contentImage",
            FieldName::ContentBlurb => "contentBlurb",
            FieldName::ContentLink => "contentLink",
        }
    }
}

/// Plain values of a section, as read from exported markup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionContent {
    pub content_type: String,
    pub title: String,
    pub blurb: String,
    /// Keyed by [`IMAGE_FIELDS`]
    pub image: AttributeBundle,
    /// Keyed by [`LINK_FIELDS`]
    pub link: AttributeBundle,
}

impl SectionContent {
    /// Read the values out of a rendered section (live or final)
    pub fn read(dom: &Dom, node: NodeId) -> Self {
        let find = |name: FieldName| {
            let suffix = format!("_{}", name.as_str());
            dom.find_descendant(node, |d, n| {
                d.attr(n, "id").is_some_and(|id| id.ends_with(&suffix))
            })
        };
        let text = |name: FieldName| find(name).map(|n| dom.text_content(n)).unwrap_or_default();

        let mut image = AttributeBundle::new();
        if let Some(img) = find(FieldName::ContentImage) {
            for (field, attr) in IMAGE_ATTRS {
                if let Some(value) = dom.attr(img, attr) {
                    image.set(field, value);
                }
            }
        }

        let mut link = AttributeBundle::new();
        if let Some(a) = find(FieldName::ContentLink) {
            if let Some(href) = dom.attr(a, "href") {
                link.set("URL", href);
            }
            link.set("Text", &dom.text_content(a));
        }

        Self {
            content_type: text(FieldName::ContentType),
            title: text(FieldName::ContentTitle),
            blurb: text(FieldName::ContentBlurb),
            image,
            link,
        }
    }

    /// Drop popout values that are only the placeholders showing through
    pub fn without_placeholders(self, placeholders: &Placeholders) -> Self {
        let image = self
            .image
            .iter()
            .filter(|(field, value)| !(*field == "URL" && *value == placeholders.image_url))
            .collect();
        let link = self
            .link
            .iter()
            .filter(|(field, value)| {
                !(*field == "Text" && is_numbered_placeholder(value, &placeholders.link_text))
            })
            .collect();
        Self { image, link, ..self }
    }
}

/// Matches `text` itself or the "Section N text" form sections display
fn is_numbered_placeholder(value: &str, text: &str) -> bool {
    value == text
        || value
            .strip_prefix("Section ")
            .and_then(|rest| rest.split_once(' '))
            .is_some_and(|(n, tail)| {
                tail == text && !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit())
            })
}

/// One content block of the email
#[derive(Debug)]
pub struct Section {
    id: SectionId,
    container: NodeId,
    cell: NodeId,
    heading: NodeId,
    delete_button: Option<NodeId>,
    content_type: InlineEditable,
    title: InlineEditable,
    image: PopoutEditable,
    blurb: InlineEditable,
    link: PopoutEditable,
    mode: Mode,
}

impl Section {
    /// Build a section and its fields
    ///
    /// # Parameters
    /// * `id` - Stable identity for the section
    /// * `position` - 1-based position at creation; numbers the placeholders
    ///   and decides deletability (the first section cannot be deleted)
    /// * `config` - Placeholders and inline styles
    pub fn new(dom: &mut Dom, id: SectionId, position: usize, config: &ComposerConfig) -> Self {
        let styles = &config.styles;
        let placeholders = &config.placeholders;
        let id_prefix = format!("section{}_", id);
        let numbered = |text: &str| format!("Section {} {}", position, text);

        let container = dom.create_element("tr");
        let cell = dom.create_element("td");
        dom.set_attr(cell, "style", &styles.cell);
        let heading = dom.create_element("div");
        dom.set_attr(heading, "style", &styles.heading);
        dom.append(cell, heading);
        dom.append(container, cell);

        let delete_button = (position != 1).then(|| {
            let button = dom.create_element("button");
            dom.set_attr(button, "id", &format!("{}deleteBtn", id_prefix));
            dom.add_class(button, "contentSection__deleteBtn");
            dom.add_class(button, "standardBtn");
            dom.set_attr(button, "title", "Delete Section");
            dom.set_text_content(button, "\u{d7}");
            dom.append(cell, button);
            button
        });

        let field_id = |name: FieldName| format!("{}{}", id_prefix, name.as_str());

        let content_type = InlineEditable::new(
            dom,
            "h2",
            field_id(FieldName::ContentType),
            &numbered(&placeholders.content_type),
            Some(&styles.content_type),
        );
        let title = InlineEditable::new(
            dom,
            "h1",
            field_id(FieldName::ContentTitle),
            &numbered(&placeholders.title),
            Some(&styles.title),
        );
        let image = PopoutEditable::new(
            dom,
            PopoutInit {
                key: OwnerKey::new(id, PopoutSlot::Image),
                tag: "img",
                id: field_id(FieldName::ContentImage),
                placeholder: &placeholders.image_url,
                style: &styles.image,
                trigger_class: "imgEdit",
                wrapper_style: None,
                outer: container,
                fields: IMAGE_FIELDS,
                save_handler: save_image,
            },
        );
        let blurb = InlineEditable::new(
            dom,
            "div",
            field_id(FieldName::ContentBlurb),
            &numbered(&placeholders.blurb),
            Some(&styles.blurb),
        );
        let link_placeholder = numbered(&placeholders.link_text);
        let link = PopoutEditable::new(
            dom,
            PopoutInit {
                key: OwnerKey::new(id, PopoutSlot::Link),
                tag: "a",
                id: field_id(FieldName::ContentLink),
                placeholder: &link_placeholder,
                style: &styles.link,
                trigger_class: "linkEdit",
                wrapper_style: Some(&styles.link_container),
                outer: container,
                fields: LINK_FIELDS,
                save_handler: save_link,
            },
        );

        Self {
            id,
            container,
            cell,
            heading,
            delete_button,
            content_type,
            title,
            image,
            blurb,
            link,
            mode: Mode::Final,
        }
    }

    pub fn id(&self) -> SectionId {
        self.id
    }

    /// The section's row element
    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn delete_button(&self) -> Option<NodeId> {
        self.delete_button
    }

    pub fn is_deletable(&self) -> bool {
        self.delete_button.is_some()
    }

    pub fn content_type(&self) -> &InlineEditable {
        &self.content_type
    }

    pub fn title(&self) -> &InlineEditable {
        &self.title
    }

    pub fn blurb(&self) -> &InlineEditable {
        &self.blurb
    }

    pub fn image(&self) -> &PopoutEditable {
        &self.image
    }

    pub fn link(&self) -> &PopoutEditable {
        &self.link
    }

    pub fn popout(&self, slot: PopoutSlot) -> &PopoutEditable {
        match slot {
            PopoutSlot::Image => &self.image,
            PopoutSlot::Link => &self.link,
        }
    }

    pub fn popout_mut(&mut self, slot: PopoutSlot) -> &mut PopoutEditable {
        match slot {
            PopoutSlot::Image => &mut self.image,
            PopoutSlot::Link => &mut self.link,
        }
    }

    /// Fields in display order
    pub fn fields(&self) -> [(FieldName, &dyn EditableComponent); 5] {
        [
            (FieldName::ContentType, &self.content_type),
            (FieldName::ContentTitle, &self.title),
            (FieldName::ContentImage, &self.image),
            (FieldName::ContentBlurb, &self.blurb),
            (FieldName::ContentLink, &self.link),
        ]
    }

    /// Remove the section's row from the page and free its nodes,
    /// including the popout inputs that live outside the row
    pub fn delete(&self, dom: &mut Dom) {
        for popout in [&self.image, &self.link] {
            for field in popout.fields() {
                dom.discard(field.label());
                dom.discard(field.input());
            }
        }
        dom.discard(self.container);
    }

    /// Current values: live text and committed popout values
    pub fn content(&self, dom: &Dom) -> SectionContent {
        SectionContent {
            content_type: self.content_type.text(dom),
            title: self.title.text(dom),
            blurb: self.blurb.text(dom),
            image: self.image.value().clone(),
            link: self.link.value().clone(),
        }
    }

    /// Put every field back to its placeholder and forget committed values
    pub fn reset(&mut self, dom: &mut Dom) {
        for field in [&self.content_type, &self.title, &self.blurb] {
            field.set_text(dom, field.placeholder());
        }
        self.image.reset(dom);
        self.link.reset(dom);
    }

    /// Write plain values back into the fields, as an author would
    pub fn restore(&mut self, dom: &mut Dom, content: &SectionContent) {
        self.content_type.set_text(dom, &content.content_type);
        self.title.set_text(dom, &content.title);
        self.blurb.set_text(dom, &content.blurb);
        self.image.commit(dom, &FormValues::from(&content.image));
        self.link.commit(dom, &FormValues::from(&content.link));
    }
}

impl EditableComponent for Section {
    fn mode(&self) -> Mode {
        self.mode
    }

    fn render_editing(&mut self, dom: &mut Dom) -> NodeId {
        if let Some(button) = self.delete_button {
            dom.listen(button, EventKind::Click, Action::DeleteSection(self.id));
        }
        let content_type = self.content_type.render_editing(dom);
        let title = self.title.render_editing(dom);
        dom.append(self.heading, content_type);
        dom.append(self.heading, title);

        let image = self.image.render_editing(dom);
        let blurb = self.blurb.render_editing(dom);
        let link = self.link.render_editing(dom);
        for node in [image, blurb, link] {
            dom.append(self.cell, node);
        }
        self.mode = Mode::Editing;
        self.container
    }

    fn render_final(&self, dom: &mut Dom) -> NodeId {
        let (Some(container), Some(cell), Some(heading)) = (
            dom.clone_node(self.container, false),
            dom.clone_node(self.cell, false),
            dom.clone_node(self.heading, false),
        ) else {
            log::error!("Row of section {} is missing from the page", self.id);
            return dom.create_text("");
        };
        dom.append(cell, heading);
        for (name, field) in self.fields() {
            let copy = field.render_final(dom);
            match name {
                FieldName::ContentType | FieldName::ContentTitle => dom.append(heading, copy),
                _ => dom.append(cell, copy),
            };
        }
        dom.append(container, cell);
        container
    }

    fn current_value(&self, dom: &Dom) -> FieldValue {
        FieldValue::Composite(
            self.fields()
                .into_iter()
                .map(|(name, field)| (name.as_str().to_string(), field.current_value(dom)))
                .collect(),
        )
    }

    fn claims(&self, dom: &Dom, target: NodeId) -> bool {
        dom.contains(self.container, target)
    }
}

fn save_image(owner: &mut PopoutEditable, dom: &mut Dom, values: &FormValues) {
    for (field, attr) in IMAGE_ATTRS {
        if let Some(value) = values.get(field) {
            owner.set_element_attr(dom, attr, value);
            owner.record(field, value);
        }
    }
}

fn save_link(owner: &mut PopoutEditable, dom: &mut Dom, values: &FormValues) {
    if let Some(url) = values.get("URL") {
        owner.set_element_attr(dom, "href", url);
        owner.record("URL", url);
    }
    if let Some(text) = values.get("Text") {
        owner.set_element_text(dom, text);
        owner.record("Text", text);
    }
}
