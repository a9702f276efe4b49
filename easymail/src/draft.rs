//! Scripted drafts
//!
//! A draft is a TOML description of an email's content. Replaying it drives
//! the composer the way an author would: clicking controls, typing into
//! in-place fields and filling the popout form.

use crate::collab::Clipboard;
use crate::composer::Composer;
use crate::dom::NodeId;
use crate::events::Event;
use crate::page::ADD_SECTION_BTN_ID;
use crate::popout::PopoutSlot;
use crate::section::{SectionContent, SectionId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Sample written by `easymail init`
pub const SAMPLE_DRAFT: &str = r#"introduction = "Here is what is happening this month."

[[sections]]
content_type = "Event"
title = "Spring Open House"
blurb = "Drop by the center to meet the advising team."

[sections.image]
url = "https://example.com/images/open-house.jpg"
alt = "Students at the open house"

[sections.link]
url = "https://example.com/open-house"
text = "RSVP"

[[sections]]
content_type = "Reminder"
title = "Applications close Friday"
blurb = "Submit your application before the deadline."
"#;

/// Errors reading or writing a draft
#[derive(Error, Debug)]
pub enum DraftError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Draft parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Draft serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Content of an email, independent of any page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Draft {
    pub introduction: Option<String>,
    pub sections: Vec<SectionDraft>,
}

/// One section of a draft; absent fields keep their placeholders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionDraft {
    pub content_type: Option<String>,
    pub title: Option<String>,
    pub blurb: Option<String>,
    pub image: Option<ImageDraft>,
    pub link: Option<LinkDraft>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageDraft {
    pub url: Option<String>,
    pub title: Option<String>,
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkDraft {
    pub url: Option<String>,
    pub text: Option<String>,
}

impl Draft {
    /// Load a draft from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DraftError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, DraftError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, DraftError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Read the current content of a composer back into a draft
    pub fn capture<C: Clipboard>(composer: &Composer<C>) -> Self {
        let dom = composer.dom();
        let sections = composer
            .document()
            .sections()
            .iter()
            .map(|section| SectionDraft::from(section.content(dom)))
            .collect();
        Self {
            introduction: Some(composer.introduction_text()),
            sections,
        }
    }

    /// Drive `composer` through the edits that produce this draft
    ///
    /// Sections beyond the first are added with the add-section control;
    /// text is typed into the in-place fields and image and link values go
    /// through the popout form.
    pub fn replay<C: Clipboard>(&self, composer: &mut Composer<C>) {
        if let Some(intro) = &self.introduction {
            let target = composer.document().introduction().node();
            type_into(composer, target, intro);
        }

        for (index, section) in self.sections.iter().enumerate() {
            if index >= composer.document().len() {
                if let Some(add) = composer.dom().get_element_by_id(ADD_SECTION_BTN_ID) {
                    composer.dispatch(Event::Click { target: add });
                }
            }
            let Some(id) = composer.document().section_at(index + 1).map(|s| s.id()) else {
                log::warn!("Section {} could not be created", index + 1);
                continue;
            };
            section.replay(composer, id);
        }
        log::info!("Replayed draft with {} sections", self.sections.len());
    }
}

impl SectionDraft {
    fn replay<C: Clipboard>(&self, composer: &mut Composer<C>, id: SectionId) {
        let Some(section) = composer.document().section(id) else {
            return;
        };
        let texts = [
            (section.content_type().node(), &self.content_type),
            (section.title().node(), &self.title),
            (section.blurb().node(), &self.blurb),
        ];
        for (node, text) in texts {
            if let Some(text) = text {
                type_into(composer, node, text);
            }
        }

        if let Some(image) = &self.image {
            let values = [
                ("URL", &image.url),
                ("Title", &image.title),
                ("Alt Text", &image.alt),
            ];
            fill_popout(composer, id, PopoutSlot::Image, &values);
        }
        if let Some(link) = &self.link {
            let values = [("URL", &link.url), ("Text", &link.text)];
            fill_popout(composer, id, PopoutSlot::Link, &values);
        }
    }
}

impl From<SectionContent> for SectionDraft {
    fn from(content: SectionContent) -> Self {
        let owned = |value: Option<&str>| value.map(str::to_string);
        Self {
            content_type: Some(content.content_type),
            title: Some(content.title),
            blurb: Some(content.blurb),
            image: Some(ImageDraft {
                url: owned(content.image.get("URL")),
                title: owned(content.image.get("Title")),
                alt: owned(content.image.get("Alt Text")),
            }),
            link: Some(LinkDraft {
                url: owned(content.link.get("URL")),
                text: owned(content.link.get("Text")),
            }),
        }
    }
}

fn type_into<C: Clipboard>(composer: &mut Composer<C>, target: NodeId, text: &str) {
    composer.dispatch(Event::Input {
        target,
        text: text.to_string(),
    });
}

/// Open the popout for a slot, type each supplied value and submit
fn fill_popout<C: Clipboard>(
    composer: &mut Composer<C>,
    id: SectionId,
    slot: PopoutSlot,
    values: &[(&str, &Option<String>)],
) {
    let Some(popout) = composer.document().section(id).map(|s| s.popout(slot)) else {
        return;
    };
    let trigger = popout.trigger();
    let inputs: Vec<_> = values
        .iter()
        .filter_map(|(name, value)| {
            let value = value.as_deref()?;
            let field = popout.field(name)?;
            Some((field.input(), value.to_string()))
        })
        .collect();

    composer.dispatch(Event::Click { target: trigger });
    for (input, value) in inputs {
        type_into(composer, input, &value);
    }
    let form = composer.form().form();
    composer.dispatch(Event::Submit { target: form });
}
