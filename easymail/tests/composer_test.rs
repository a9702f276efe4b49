use easymail::component::{has_editing_markers, POPOUT_FOCUS_CLASS};
use easymail::dom::{NodeId, Rect};
use easymail::draft::SAMPLE_DRAFT;
use easymail::page::ADD_SECTION_BTN_ID;
use easymail::popout::PopoutSlot;
use easymail::section::SectionId;
use easymail::{
    Composer, ComposerConfig, Draft, EditableComponent, Event, Key, MemoryClipboard, Notice,
    RichTextEditor,
};
use pretty_assertions::assert_eq;

fn composer() -> Composer<MemoryClipboard> {
    Composer::new(ComposerConfig::default(), MemoryClipboard::new()).unwrap()
}

fn click(c: &mut Composer<MemoryClipboard>, target: NodeId) {
    c.dispatch(Event::Click { target });
}

fn type_text(c: &mut Composer<MemoryClipboard>, target: NodeId, text: &str) {
    c.dispatch(Event::Input {
        target,
        text: text.to_string(),
    });
}

fn add_section(c: &mut Composer<MemoryClipboard>) -> SectionId {
    let add = c.dom().get_element_by_id(ADD_SECTION_BTN_ID).unwrap();
    click(c, add);
    c.document().sections().last().unwrap().id()
}

fn trigger(c: &Composer<MemoryClipboard>, id: SectionId, slot: PopoutSlot) -> NodeId {
    c.document().section(id).unwrap().popout(slot).trigger()
}

fn input(c: &Composer<MemoryClipboard>, id: SectionId, slot: PopoutSlot, field: &str) -> NodeId {
    c.document()
        .section(id)
        .unwrap()
        .popout(slot)
        .field(field)
        .unwrap()
        .input()
}

fn open(c: &mut Composer<MemoryClipboard>, id: SectionId, slot: PopoutSlot) {
    let target = trigger(c, id, slot);
    click(c, target);
}

fn fill(c: &mut Composer<MemoryClipboard>, id: SectionId, slot: PopoutSlot, field: &str, text: &str) {
    let target = input(c, id, slot, field);
    type_text(c, target, text);
}

fn submit(c: &mut Composer<MemoryClipboard>) {
    let form = c.form().form();
    c.dispatch(Event::Submit { target: form });
}

fn first(c: &Composer<MemoryClipboard>) -> SectionId {
    c.document().sections()[0].id()
}

#[test]
fn test_final_render_never_carries_editing_markers() {
    let mut c = composer();
    let id = first(&c);
    open(&mut c, id, PopoutSlot::Image);
    assert!(c.form().is_visible());

    let section = c.document().section(id).unwrap();
    let mut finals = Vec::new();
    let mut dom = c.dom().clone();
    finals.push(section.render_final(&mut dom));
    for (_, field) in section.fields() {
        finals.push(field.render_final(&mut dom));
    }
    finals.push(c.document().introduction().render_final(&mut dom));
    for node in finals {
        assert!(!has_editing_markers(&dom, node));
        assert_eq!(dom.binding_count(node), 0);
    }

    // A section that was never put into editing mode renders cleanly too
    let mut fresh = easymail::dom::Dom::new();
    let unrendered = easymail::section::Section::new(
        &mut fresh,
        SectionId::new(9),
        2,
        &ComposerConfig::default(),
    );
    let copy = unrendered.render_final(&mut fresh);
    assert!(!has_editing_markers(&fresh, copy));
}

#[test]
fn test_final_render_is_independent_of_live_surface() {
    let mut c = composer();
    let intro = c.document().introduction().node();
    type_text(&mut c, intro, "Before");

    let mut dom = c.dom().clone();
    let first_copy = c.document().introduction().render_final(&mut dom);
    let second_copy = c.document().introduction().render_final(&mut dom);
    assert_ne!(first_copy, second_copy);

    c.document().introduction().set_text(&mut dom, "After");
    assert_eq!(dom.text_content(first_copy), "Before");
    assert_eq!(dom.text_content(second_copy), "Before");
    assert!(c.dom().is_attached(c.document().introduction().node()));
}

#[test]
fn test_binding_a_new_owner_releases_the_old_one() {
    let mut c = composer();
    let a = first(&c);
    let b = add_section(&mut c);

    open(&mut c, a, PopoutSlot::Image);
    let a_trigger = trigger(&c, a, PopoutSlot::Image);
    assert!(c.dom().has_class(a_trigger, POPOUT_FOCUS_CLASS));

    open(&mut c, b, PopoutSlot::Link);
    assert!(c.form().is_visible());
    assert!(!c.dom().has_class(a_trigger, POPOUT_FOCUS_CLASS));
    let form = c.form().form();
    for field in c.document().section(a).unwrap().image().fields() {
        assert_ne!(c.dom().parent(field.input()), Some(form));
        assert_ne!(c.dom().parent(field.label()), Some(form));
    }
    let b_fields = c.document().section(b).unwrap().link().fields().len();
    assert_eq!(c.form().attached().len(), b_fields * 2);
}

#[test]
fn test_opening_click_does_not_dismiss() {
    let mut c = composer();
    let id = first(&c);
    let trigger = trigger(&c, id, PopoutSlot::Image);
    let label = c.dom().element_children(trigger)[0];
    click(&mut c, label);
    assert!(c.form().is_visible());

    // Clicks inside the form keep it open
    let url = input(&c, id, PopoutSlot::Image, "URL");
    click(&mut c, url);
    assert!(c.form().is_visible());
}

#[test]
fn test_partial_save_keeps_unsupplied_attributes() {
    let mut c = composer();
    let id = first(&c);

    open(&mut c, id, PopoutSlot::Image);
    fill(&mut c, id, PopoutSlot::Image, "URL", "http://x");
    fill(&mut c, id, PopoutSlot::Image, "Title", "T");
    submit(&mut c);
    assert!(!c.form().is_visible());

    open(&mut c, id, PopoutSlot::Image);
    fill(&mut c, id, PopoutSlot::Image, "URL", "http://y");
    fill(&mut c, id, PopoutSlot::Image, "Title", "");
    submit(&mut c);

    let image = c.document().section(id).unwrap().image();
    assert_eq!(image.value().get("URL"), Some("http://y"));
    assert_eq!(image.value().get("Title"), Some("T"));
    assert_eq!(image.value().get("Alt Text"), None);
    assert_eq!(c.dom().attr(image.element(), "src"), Some("http://y"));
    assert_eq!(c.dom().attr(image.element(), "title"), Some("T"));
    assert_eq!(c.dom().attr(image.element(), "alt"), None);
}

#[test]
fn test_enter_submits_the_form() {
    let mut c = composer();
    let id = first(&c);
    open(&mut c, id, PopoutSlot::Link);
    fill(&mut c, id, PopoutSlot::Link, "Text", "Read more");
    c.dispatch(Event::KeyDown { key: Key::Enter });

    let link = c.document().section(id).unwrap().link();
    assert_eq!(c.dom().text_content(link.element()), "Read more");
    assert!(!c.form().is_visible());
}

#[test]
fn test_dismiss_leaves_committed_value() {
    let mut c = composer();
    let id = first(&c);
    open(&mut c, id, PopoutSlot::Link);
    fill(&mut c, id, PopoutSlot::Link, "URL", "http://x");
    submit(&mut c);
    let before = c.document().section(id).unwrap().link().value().clone();

    open(&mut c, id, PopoutSlot::Link);
    fill(&mut c, id, PopoutSlot::Link, "URL", "http://changed");
    let intro = c.document().introduction().node();
    click(&mut c, intro);
    assert!(!c.form().is_visible());

    let link = c.document().section(id).unwrap().link();
    assert_eq!(link.value(), &before);
    assert_eq!(c.dom().attr(link.element(), "href"), Some("http://x"));

    // Reopening shows the committed value, not the abandoned edit
    open(&mut c, id, PopoutSlot::Link);
    let url = input(&c, id, PopoutSlot::Link, "URL");
    assert_eq!(c.dom().text_content(url), "http://x");
}

#[test]
fn test_cancel_button_leaves_committed_value() {
    let mut c = composer();
    let id = first(&c);
    open(&mut c, id, PopoutSlot::Image);
    fill(&mut c, id, PopoutSlot::Image, "URL", "http://nope");
    let cancel = c.form().cancel_button();
    click(&mut c, cancel);

    let image = c.document().section(id).unwrap().image();
    assert!(image.value().is_empty());
    assert_eq!(
        c.dom().attr(image.element(), "src"),
        Some("./images/placeholder.gif")
    );
}

#[test]
fn test_delete_keeps_relative_order() {
    let mut c = composer();
    let one = first(&c);
    let two = add_section(&mut c);
    let three = add_section(&mut c);
    assert!(c.document().section(one).unwrap().delete_button().is_none());

    let delete = c.document().section(two).unwrap().delete_button().unwrap();
    click(&mut c, delete);

    let ids: Vec<SectionId> = c.document().sections().iter().map(|s| s.id()).collect();
    assert_eq!(ids, vec![one, three]);
    assert_eq!(c.document().position_of(three), Some(2));

    let markup = c.export().unwrap().markup;
    assert!(markup.contains("section1_contentTitle"));
    assert!(!markup.contains("section2_contentTitle"));
    assert!(markup.contains("section3_contentTitle"));
}

#[test]
fn test_deleting_the_bound_section_hides_the_form() {
    let mut c = composer();
    let two = add_section(&mut c);
    open(&mut c, two, PopoutSlot::Image);
    assert!(c.form().is_visible());

    let delete = c.document().section(two).unwrap().delete_button().unwrap();
    click(&mut c, delete);
    assert!(!c.form().is_visible());
    assert_eq!(c.form().owner(), None);
    assert_eq!(c.document().len(), 1);
}

#[test]
fn test_hide_is_idempotent() {
    let mut c = composer();
    let cancel = c.form().cancel_button();
    let before = c.dom().outer_html(c.form().editor());

    click(&mut c, cancel);
    click(&mut c, cancel);
    assert!(!c.form().is_visible());
    assert_eq!(c.dom().outer_html(c.form().editor()), before);
}

#[test]
fn test_form_is_anchored_beside_the_section() {
    let mut c = composer();
    let id = first(&c);
    let section = c.document().section(id).unwrap();
    let row = section.container();
    let img = section.image().element();
    c.dom_mut().set_bounds(row, Rect::new(0.0, 100.0, 600.0, 500.0));
    c.dom_mut().set_bounds(img, Rect::new(20.0, 150.0, 580.0, 300.0));
    c.set_scroll(40.0);

    open(&mut c, id, PopoutSlot::Image);
    let editor = c.form().editor();
    assert_eq!(c.dom().attr(editor, "style"), Some("top: 190px; left: 625px;"));
}

#[test]
fn test_failed_copy_is_reported() {
    let mut c = Composer::new(ComposerConfig::default(), MemoryClipboard::failing()).unwrap();
    let report = c.export().unwrap();
    assert!(!report.copied);
    assert!(!report.markup.is_empty());
    assert_eq!(c.take_notice(), Some(Notice::CopyFailed));
    assert_eq!(c.notice(), None);
}

#[test]
fn test_export_then_load_round_trips() {
    let mut c = composer();
    Draft::parse(SAMPLE_DRAFT).unwrap().replay(&mut c);
    let exported = c.export().unwrap().markup;
    assert!(exported.contains("https://example.com/images/open-house.jpg"));
    assert!(exported.contains("Applications close Friday"));

    let mut reloaded = composer();
    reloaded.load(&exported);
    assert_eq!(reloaded.document().len(), 2);
    assert_eq!(
        reloaded.introduction_text(),
        "Here is what is happening this month."
    );
    assert_eq!(Draft::capture(&reloaded), Draft::capture(&c));
    assert_eq!(reloaded.html(true), exported);
}

#[test]
fn test_load_replaces_previously_saved_values() {
    let clean = composer().export().unwrap().markup;

    let mut c = composer();
    let id = first(&c);
    open(&mut c, id, PopoutSlot::Link);
    fill(&mut c, id, PopoutSlot::Link, "URL", "http://stale.example");
    submit(&mut c);
    open(&mut c, id, PopoutSlot::Image);
    fill(&mut c, id, PopoutSlot::Image, "Title", "Old photo");
    submit(&mut c);
    assert!(c.html(true).contains("http://stale.example"));

    c.load(&clean);
    assert_eq!(c.html(true), clean);
    assert!(!c.html(true).contains("Old photo"));

    let loaded = Draft::capture(&c);
    let link = loaded.sections[0].link.as_ref().unwrap();
    assert_eq!(link.url, None);
    assert_eq!(link.text, None);
    assert_eq!(loaded.sections[0].image.as_ref().unwrap().url, None);

    // The form no longer offers the old values
    open(&mut c, id, PopoutSlot::Link);
    let url = input(&c, id, PopoutSlot::Link, "URL");
    assert_eq!(c.dom().text_content(url), "");
}

#[test]
fn test_replayed_draft_matches_capture() {
    let mut c = composer();
    let draft = Draft::parse(SAMPLE_DRAFT).unwrap();
    draft.replay(&mut c);
    let captured = Draft::capture(&c);

    assert_eq!(captured.introduction, draft.introduction);
    assert_eq!(captured.sections[0].title, draft.sections[0].title);
    let image = captured.sections[0].image.as_ref().unwrap();
    assert_eq!(image.url, draft.sections[0].image.as_ref().unwrap().url);
    assert_eq!(image.alt, draft.sections[0].image.as_ref().unwrap().alt);
    let link = captured.sections[0].link.as_ref().unwrap();
    assert_eq!(link.text.as_deref(), Some("RSVP"));
    assert!(!c.form().is_visible());
}

#[test]
fn test_snapshot_updates_doc_info() {
    let mut c = composer();
    let contents = c.snapshot_doc_info().contents().to_string();
    assert!(contents.starts_with("<table id=\"copyTarget\""));
    assert!(c.doc_info().title().starts_with("ISA Email "));
}
