//! Components edited through the popout form

use super::OwnerKey;
use crate::component::{
    AttributeBundle, Anchor, EditableComponent, FieldValue, Mode, POPOUT_EDIT_CLASS,
    POPOUT_FOCUS_CLASS,
};
use crate::dom::{Dom, NodeId, Viewport};
use crate::events::{Action, EventKind};
use crate::field::{FormValues, PopoutField};

/// Horizontal gap between the owner's container and the popout form
const POPOUT_OFFSET_X: f64 = 25.0;

/// Commits submitted form values into a component and its live element
pub type SaveHandler = fn(&mut PopoutEditable, &mut Dom, &FormValues);

/// Construction parameters for a [`PopoutEditable`]
#[derive(Clone)]
pub struct PopoutInit<'a> {
    pub key: OwnerKey,
    pub tag: &'a str,
    pub id: String,
    pub placeholder: &'a str,
    pub style: &'a str,
    /// Class for the trigger container (e.g. `imgEdit`)
    pub trigger_class: &'a str,
    /// Optional static wrapper around the element (e.g. a styled `div`)
    pub wrapper_style: Option<&'a str>,
    /// The owning block, used to position the form
    pub outer: NodeId,
    pub fields: &'a [&'a str],
    pub save_handler: SaveHandler,
}

/// An element whose attributes are edited through the popout form
///
/// Edits are buffered in the form's inputs; only a submit runs the save
/// handler, which commits into `value` and updates the live element.
pub struct PopoutEditable {
    key: OwnerKey,
    id: String,
    element: NodeId,
    placeholder: String,
    wrapper: Option<NodeId>,
    trigger: NodeId,
    outer: NodeId,
    fields: Vec<PopoutField>,
    value: AttributeBundle,
    save_handler: SaveHandler,
    mode: Mode,
    bound: bool,
}

impl std::fmt::Debug for PopoutEditable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PopoutEditable")
            .field("key", &self.key)
            .field("id", &self.id)
            .field("element", &self.element)
            .field("value", &self.value)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl PopoutEditable {
    pub fn new(dom: &mut Dom, init: PopoutInit<'_>) -> Self {
        let element = dom.create_element(init.tag);
        dom.set_attr(element, "id", &init.id);
        dom.set_attr(element, "style", init.style);
        show_placeholder(dom, element, init.placeholder);

        let wrapper = init.wrapper_style.map(|style| {
            let wrapper = dom.create_element("div");
            dom.set_attr(wrapper, "style", style);
            wrapper
        });

        let trigger = dom.create_element("div");
        dom.add_class(trigger, init.trigger_class);
        dom.add_class(trigger, POPOUT_EDIT_CLASS);
        let label = dom.create_element("div");
        dom.add_class(label, &format!("{}__text", init.trigger_class));
        dom.set_text_content(label, "edit");
        dom.append(trigger, label);

        let fields = init
            .fields
            .iter()
            .map(|name| PopoutField::new(dom, &init.id, name))
            .collect();

        Self {
            key: init.key,
            id: init.id,
            element,
            placeholder: init.placeholder.to_string(),
            wrapper,
            trigger,
            outer: init.outer,
            fields,
            value: AttributeBundle::new(),
            save_handler: init.save_handler,
            mode: Mode::Final,
            bound: false,
        }
    }

    pub fn key(&self) -> OwnerKey {
        self.key
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The live content element (`img`, `a`, ...)
    pub fn element(&self) -> NodeId {
        self.element
    }

    /// The clickable container that opens the form
    pub fn trigger(&self) -> NodeId {
        self.trigger
    }

    /// What the element shows until a value is committed
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn fields(&self) -> &[PopoutField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&PopoutField> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Last committed values
    pub fn value(&self) -> &AttributeBundle {
        &self.value
    }

    pub fn save_handler(&self) -> SaveHandler {
        self.save_handler
    }

    /// Run the save handler against `values`
    pub fn commit(&mut self, dom: &mut Dom, values: &FormValues) {
        let handler = self.save_handler;
        handler(self, dom, values);
    }

    /// Record a committed value for one field
    pub fn record(&mut self, field: &str, value: &str) {
        self.value.set(field, value);
    }

    pub fn set_element_attr(&self, dom: &mut Dom, name: &str, value: &str) {
        dom.set_attr(self.element, name, value);
    }

    pub fn set_element_text(&self, dom: &mut Dom, text: &str) {
        dom.set_text_content(self.element, text);
    }

    /// Drop every committed value and put the placeholder back
    ///
    /// Only `id` and `style` survive on the live element.
    pub fn reset(&mut self, dom: &mut Dom) {
        let stale: Vec<String> = dom
            .attrs(self.element)
            .iter()
            .map(|(name, _)| name.clone())
            .filter(|name| name != "id" && name != "style")
            .collect();
        for name in &stale {
            dom.remove_attr(self.element, name);
        }
        show_placeholder(dom, self.element, &self.placeholder);
        self.value = AttributeBundle::new();
    }

    /// Load the committed values into the form inputs
    pub fn prefill(&self, dom: &mut Dom) {
        for field in &self.fields {
            field.fill(dom, self.value.get(field.name()).unwrap_or(""));
        }
    }
}

impl EditableComponent for PopoutEditable {
    fn mode(&self) -> Mode {
        self.mode
    }

    fn render_editing(&mut self, dom: &mut Dom) -> NodeId {
        if !self.bound {
            dom.listen(self.trigger, EventKind::Click, Action::OpenPopout(self.key));
            self.bound = true;
        }
        let content = match self.wrapper {
            Some(wrapper) => {
                dom.append(wrapper, self.element);
                wrapper
            }
            None => self.element,
        };
        dom.append(self.trigger, content);
        self.mode = Mode::Editing;
        self.trigger
    }

    fn render_final(&self, dom: &mut Dom) -> NodeId {
        let Some(element) = dom.clone_node(self.element, true) else {
            log::error!("Live element of {} is missing from the page", self.id);
            return dom.create_text("");
        };
        match self.wrapper.and_then(|w| dom.clone_node(w, false)) {
            Some(wrapper) => {
                dom.append(wrapper, element);
                wrapper
            }
            None => element,
        }
    }

    fn current_value(&self, _dom: &Dom) -> FieldValue {
        FieldValue::Attributes(self.value.clone())
    }

    fn focus(&mut self, dom: &mut Dom, viewport: Viewport) -> Option<Anchor> {
        dom.add_class(self.trigger, POPOUT_FOCUS_CLASS);
        let x = dom.bounds(self.outer).right + POPOUT_OFFSET_X;
        let y = dom.bounds(self.element).top + viewport.scroll_y;
        Some(Anchor { x, y })
    }

    fn unfocus(&mut self, dom: &mut Dom) {
        dom.remove_class(self.trigger, POPOUT_FOCUS_CLASS);
    }

    fn claims(&self, dom: &Dom, target: NodeId) -> bool {
        dom.contains(self.trigger, target)
    }
}

/// Images show the placeholder as their source, everything else as text
fn show_placeholder(dom: &mut Dom, element: NodeId, placeholder: &str) {
    if dom.tag(element) == Some("img") {
        dom.set_attr(element, "src", placeholder);
    } else {
        dom.set_text_content(element, placeholder);
    }
}
