//! The host page the composer mounts onto
//!
//! Mirrors the static markup of the composer page: the popout editor, the
//! live email table with its control row, and the hidden `copyTarget`
//! scaffold that export clones.

use crate::config::ComposerConfig;
use crate::dom::{Dom, NodeId};
use crate::popout::{POPOUT_CANCEL_ID, POPOUT_EDITOR_ID, POPOUT_SAVE_ID};

pub const INTRO_CTN_ID: &str = "introCtn";
pub const SECTIONS_CTN_ID: &str = "contentSectionsCtn";
pub const BOTTOM_BTNS_ID: &str = "bottomBtns";
pub const ADD_SECTION_BTN_ID: &str = "addSectionBtn";
pub const COPY_CODE_BTN_ID: &str = "copyCodeBtn";
pub const START_OVER_BTN_ID: &str = "startoverBtn";

pub const COPY_TARGET_ID: &str = "copyTarget";
pub const COPY_TARGET_INTRO_ID: &str = "copyTarget-introCtn";
pub const COPY_TARGET_SECTIONS_ID: &str = "copyTarget-contentSectionsCtn";
pub const COPY_TARGET_BOTTOM_ID: &str = "copyTarget-bottomBtns";

/// Build the page scaffold under the document root
pub fn build(dom: &mut Dom, config: &ComposerConfig) {
    let root = dom.root();

    let editor = element(dom, "div", Some(POPOUT_EDITOR_ID));
    dom.add_class(editor, "popoutEditor");
    let form = dom.create_element("form");
    let save = button(dom, POPOUT_SAVE_ID, "Save");
    let cancel = button(dom, POPOUT_CANCEL_ID, "Cancel");
    dom.append(form, save);
    dom.append(form, cancel);
    dom.append(editor, form);
    dom.append(root, editor);

    let live = email_table(dom, config, None);
    let sections = element(dom, "tbody", Some(SECTIONS_CTN_ID));
    let intro_row = dom.create_element("tr");
    let intro = element(dom, "td", Some(INTRO_CTN_ID));
    dom.append(intro_row, intro);
    dom.append(sections, intro_row);

    let controls = element(dom, "tr", Some(BOTTOM_BTNS_ID));
    let controls_cell = dom.create_element("td");
    for (id, label) in [
        (ADD_SECTION_BTN_ID, "Add Section"),
        (COPY_CODE_BTN_ID, "Copy Code"),
        (START_OVER_BTN_ID, "Start Over"),
    ] {
        let btn = button(dom, id, label);
        dom.add_class(btn, "standardBtn");
        dom.append(controls_cell, btn);
    }
    dom.append(controls, controls_cell);
    dom.append(sections, controls);
    dom.append(live, sections);
    dom.append(root, live);

    let hidden = dom.create_element("div");
    dom.set_attr(hidden, "style", "display: none;");
    let target = email_table(dom, config, Some(COPY_TARGET_ID));
    let target_sections = element(dom, "tbody", Some(COPY_TARGET_SECTIONS_ID));
    let target_intro_row = dom.create_element("tr");
    let target_intro = element(dom, "td", Some(COPY_TARGET_INTRO_ID));
    dom.append(target_intro_row, target_intro);
    dom.append(target_sections, target_intro_row);
    let target_bottom = element(dom, "tr", Some(COPY_TARGET_BOTTOM_ID));
    dom.append(target_sections, target_bottom);
    dom.append(target, target_sections);
    dom.append(hidden, target);
    dom.append(root, hidden);
}

/// Anchor elements the composer requires, looked up by id
pub const REQUIRED_IDS: &[&str] = &[
    POPOUT_EDITOR_ID,
    POPOUT_SAVE_ID,
    POPOUT_CANCEL_ID,
    INTRO_CTN_ID,
    SECTIONS_CTN_ID,
    BOTTOM_BTNS_ID,
    ADD_SECTION_BTN_ID,
    COPY_CODE_BTN_ID,
    START_OVER_BTN_ID,
    COPY_TARGET_ID,
];

fn email_table(dom: &mut Dom, config: &ComposerConfig, id: Option<&str>) -> NodeId {
    let table = element(dom, "table", id);
    for (name, value) in [
        ("align", "center"),
        ("cellpadding", "0"),
        ("cellspacing", "0"),
        ("border", "0"),
        ("width", "600"),
    ] {
        dom.set_attr(table, name, value);
    }
    dom.set_attr(table, "style", &config.styles.table);
    table
}

fn element(dom: &mut Dom, tag: &str, id: Option<&str>) -> NodeId {
    let node = dom.create_element(tag);
    if let Some(id) = id {
        dom.set_attr(node, "id", id);
    }
    node
}

fn button(dom: &mut Dom, id: &str, label: &str) -> NodeId {
    let node = element(dom, "button", Some(id));
    dom.set_text_content(node, label);
    node
}
