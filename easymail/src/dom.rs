//! Headless element tree
//!
//! A small arena-backed stand-in for the browser DOM. Components build their
//! editing and final representations here, the popout form attaches and
//! detaches field nodes here, and export serializes subtrees of it.
//!
//! Listener bindings live on nodes as `(EventKind, Action)` pairs. Cloning a
//! node never carries its bindings over, so cloned subtrees are inert.

mod parse;

pub use parse::{decode_entities, parse_fragment};

use crate::events::{Action, EventKind};
use itertools::Itertools;

/// Elements serialized without a closing tag
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "wbr",
];

/// Handle to a node in a [`Dom`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// On-screen bounding box of a node, supplied by the host
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

/// Scroll state of the host window
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub scroll_y: f64,
}

/// A listener binding attached to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub kind: EventKind,
    pub action: Action,
}

#[derive(Debug, Clone)]
enum Content {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    content: Content,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    bindings: Vec<Binding>,
    bounds: Rect,
}

impl Node {
    fn new(content: Content) -> Self {
        Self {
            content,
            parent: None,
            children: Vec::new(),
            bindings: Vec::new(),
            bounds: Rect::default(),
        }
    }
}

/// Arena of element and text nodes rooted at a `body` element
///
/// Discarded slots are never reused, so a stale [`NodeId`] can only ever
/// resolve to nothing. Every accessor treats a stale id as an empty node.
#[derive(Debug, Clone)]
pub struct Dom {
    nodes: Vec<Option<Node>>,
    root: NodeId,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    /// Create a tree holding only the `body` root
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        dom.root = dom.create_element("body");
        dom
    }

    /// The `body` element every attached node descends from
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes in the arena (attached or detached)
    pub fn live_nodes(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(Content::Element {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        })
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(Content::Text(text.to_string()))
    }

    fn alloc(&mut self, content: Content) -> NodeId {
        self.nodes.push(Some(Node::new(content)));
        NodeId(self.nodes.len() - 1)
    }

    fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn exists(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Tag name of an element, `None` for text nodes
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match self.get(id).map(|n| &n.content) {
            Some(Content::Element { tag, .. }) => Some(tag),
            _ => None,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.tag(id).is_some()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Element children only, in document order
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.is_element(*c))
            .collect()
    }

    /// Whether `node` is attached under the root
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.contains(self.root, node)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tree mutation
    // ─────────────────────────────────────────────────────────────────────

    /// Append `child` as the last child of `parent`, moving it if attached
    /// elsewhere. Refuses to create a cycle.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> bool {
        self.insert_at(parent, child, None)
    }

    /// Insert `child` before `reference` under `parent`. Falls back to
    /// appending when `reference` is not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> bool {
        self.insert_at(parent, child, Some(reference))
    }

    fn insert_at(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) -> bool {
        if !self.is_element(parent) || !self.exists(child) || self.contains(child, parent) {
            return false;
        }
        self.detach(child);
        let Some(parent_node) = self.get_mut(parent) else {
            return false;
        };
        let index = reference
            .and_then(|r| parent_node.children.iter().position(|c| *c == r))
            .unwrap_or(parent_node.children.len());
        parent_node.children.insert(index, child);
        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = Some(parent);
        }
        true
    }

    /// Remove `child` from `parent`. Returns false when it was not a child.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(parent_node) = self.get_mut(parent) else {
            return false;
        };
        let Some(index) = parent_node.children.iter().position(|c| *c == child) else {
            return false;
        };
        parent_node.children.remove(index);
        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = None;
        }
        true
    }

    /// Detach a node from whatever parent it has
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.parent(node) {
            self.remove_child(parent, node);
        }
    }

    /// Detach a subtree and free its slots
    pub fn discard(&mut self, node: NodeId) {
        self.detach(node);
        for id in self.descendants(node) {
            if let Some(slot) = self.nodes.get_mut(id.0) {
                *slot = None;
            }
        }
    }

    /// Inclusive containment: a node contains itself
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return self.exists(id);
            }
            current = self.parent(id);
        }
        false
    }

    /// `node` followed by each of its ancestors up to the top of its tree
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = self.exists(node).then_some(node);
        while let Some(id) = current {
            path.push(id);
            current = self.parent(id);
        }
        path
    }

    /// Pre-order list of `scope` and every node below it
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![scope];
        while let Some(id) = stack.pop() {
            if !self.exists(id) {
                continue;
            }
            out.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        out
    }

    /// First node at or below `scope` satisfying `pred`, in document order
    pub fn find_descendant<F>(&self, scope: NodeId, pred: F) -> Option<NodeId>
    where
        F: Fn(&Dom, NodeId) -> bool,
    {
        self.descendants(scope).into_iter().find(|id| pred(self, *id))
    }

    /// Look up an attached element by `id` attribute
    pub fn get_element_by_id(&self, id_value: &str) -> Option<NodeId> {
        self.query_id(self.root, id_value)
    }

    /// Look up an element by `id` attribute at or below `scope`, attached or not
    pub fn query_id(&self, scope: NodeId, id_value: &str) -> Option<NodeId> {
        self.find_descendant(scope, |dom, n| dom.attr(n, "id") == Some(id_value))
    }

    /// Copy a node. Attributes and text are copied; bindings and bounds are
    /// not. The copy starts detached.
    pub fn clone_node(&mut self, id: NodeId, deep: bool) -> Option<NodeId> {
        let content = self.get(id)?.content.clone();
        let copy = self.alloc(content);
        if deep {
            let children = self.children(id).to_vec();
            for child in children {
                if let Some(child_copy) = self.clone_node(child, true) {
                    self.append(copy, child_copy);
                }
            }
        }
        Some(copy)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Attributes and classes
    // ─────────────────────────────────────────────────────────────────────

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match self.get(id).map(|n| &n.content) {
            Some(Content::Element { attrs, .. }) => attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn attrs(&self, id: NodeId) -> &[(String, String)] {
        match self.get(id).map(|n| &n.content) {
            Some(Content::Element { attrs, .. }) => attrs,
            _ => &[],
        }
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(Node {
            content: Content::Element { attrs, .. },
            ..
        }) = self.get_mut(id)
        {
            match attrs.iter_mut().find(|(k, _)| k == name) {
                Some(entry) => entry.1 = value.to_string(),
                None => attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(Node {
            content: Content::Element { attrs, .. },
            ..
        }) = self.get_mut(id)
        {
            attrs.retain(|(k, _)| k != name);
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .is_some_and(|list| list.split_whitespace().any(|c| c == class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if !self.is_element(id) || self.has_class(id, class) {
            return;
        }
        let list = match self.attr(id, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        self.set_attr(id, "class", &list);
    }

    /// Remove a class; drops the `class` attribute once it is empty
    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        let Some(existing) = self.attr(id, "class") else {
            return;
        };
        let list = existing.split_whitespace().filter(|c| *c != class).join(" ");
        if list.is_empty() {
            self.remove_attr(id, "class");
        } else {
            self.set_attr(id, "class", &list);
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Text
    // ─────────────────────────────────────────────────────────────────────

    /// Concatenated text of the node and all its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            if let Some(Content::Text(text)) = self.get(node).map(|n| &n.content) {
                out.push_str(text);
            }
        }
        out
    }

    /// Replace all children with a single text node (or the text itself for
    /// text nodes). Replaced children are freed.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        if let Some(Node {
            content: Content::Text(existing),
            ..
        }) = self.get_mut(id)
        {
            *existing = text.to_string();
            return;
        }
        if !self.is_element(id) {
            return;
        }
        for child in self.children(id).to_vec() {
            self.discard(child);
        }
        if !text.is_empty() {
            let node = self.create_text(text);
            self.append(id, node);
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Bindings and layout
    // ─────────────────────────────────────────────────────────────────────

    /// Bind an action to an event on a node. Identical bindings are stored
    /// once; returns false when the binding already existed.
    pub fn listen(&mut self, id: NodeId, kind: EventKind, action: Action) -> bool {
        let Some(node) = self.get_mut(id) else {
            return false;
        };
        let binding = Binding { kind, action };
        if node.bindings.contains(&binding) {
            return false;
        }
        node.bindings.push(binding);
        true
    }

    pub fn bindings(&self, id: NodeId) -> &[Binding] {
        self.get(id).map(|n| n.bindings.as_slice()).unwrap_or(&[])
    }

    /// Total bindings at or below `scope`
    pub fn binding_count(&self, scope: NodeId) -> usize {
        self.descendants(scope)
            .into_iter()
            .map(|n| self.bindings(n).len())
            .sum()
    }

    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) {
        if let Some(node) = self.get_mut(id) {
            node.bounds = bounds;
        }
    }

    pub fn bounds(&self, id: NodeId) -> Rect {
        self.get(id).map(|n| n.bounds).unwrap_or_default()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Serialization
    // ─────────────────────────────────────────────────────────────────────

    /// Serialize a node and its subtree
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    /// Serialize only the children of a node
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            self.write_html(*child, &mut out);
        }
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else {
            return;
        };
        match &node.content {
            Content::Text(text) => out.push_str(&escape_text(text)),
            Content::Element { tag, attrs } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push_str(&format!(" {}=\"{}\"", name, escape_attr(value)));
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                for child in &node.children {
                    self.write_html(*child, out);
                }
                out.push_str(&format!("</{}>", tag));
            }
        }
    }
}

/// Escape text content for HTML output
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape an attribute value for double-quoted HTML output
pub fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> (Dom, NodeId, NodeId, NodeId) {
        let mut dom = Dom::new();
        let outer = dom.create_element("div");
        let inner = dom.create_element("p");
        let text = dom.create_text("hello");
        dom.append(dom.root(), outer);
        dom.append(outer, inner);
        dom.append(inner, text);
        (dom, outer, inner, text)
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_text("<div>"), "&lt;div&gt;");
        assert_eq!(escape_text("a & b"), "a &amp; b");
        assert_eq!(escape_attr("\"quoted\""), "&quot;quoted&quot;");
    }

    #[test]
    fn test_outer_html_nests_and_escapes() {
        let (mut dom, outer, inner, _) = tree();
        dom.set_attr(outer, "style", "color: \"red\"");
        dom.set_text_content(inner, "a < b");
        assert_eq!(
            dom.outer_html(outer),
            "<div style=\"color: &quot;red&quot;\"><p>a &lt; b</p></div>"
        );
    }

    #[test]
    fn test_void_elements_have_no_closing_tag() {
        let mut dom = Dom::new();
        let img = dom.create_element("img");
        dom.set_attr(img, "src", "x.gif");
        assert_eq!(dom.outer_html(img), "<img src=\"x.gif\">");
    }

    #[test]
    fn test_contains_is_inclusive_and_follows_parents() {
        let (dom, outer, inner, text) = tree();
        assert!(dom.contains(outer, outer));
        assert!(dom.contains(outer, text));
        assert!(!dom.contains(inner, outer));
    }

    #[test]
    fn test_append_moves_node_and_refuses_cycles() {
        let (mut dom, outer, inner, _) = tree();
        assert!(!dom.append(inner, outer));
        dom.append(dom.root(), inner);
        assert_eq!(dom.parent(inner), Some(dom.root()));
        assert!(dom.children(outer).is_empty());
    }

    #[test]
    fn test_insert_before_reference() {
        let mut dom = Dom::new();
        let anchor = dom.create_element("tr");
        let row = dom.create_element("tr");
        dom.append(dom.root(), anchor);
        dom.insert_before(dom.root(), row, anchor);
        assert_eq!(dom.children(dom.root()), &[row, anchor]);
    }

    #[test]
    fn test_clone_drops_bindings_and_is_independent() {
        let (mut dom, outer, inner, _) = tree();
        dom.listen(inner, EventKind::Click, Action::AddSection);
        let copy = dom.clone_node(outer, true).unwrap();
        assert_eq!(dom.binding_count(copy), 0);
        assert_eq!(dom.parent(copy), None);

        dom.set_text_content(inner, "changed");
        assert_eq!(dom.text_content(copy), "hello");
    }

    #[test]
    fn test_shallow_clone_has_no_children() {
        let (mut dom, outer, _, _) = tree();
        dom.set_attr(outer, "id", "x");
        let copy = dom.clone_node(outer, false).unwrap();
        assert!(dom.children(copy).is_empty());
        assert_eq!(dom.attr(copy, "id"), Some("x"));
    }

    #[test]
    fn test_class_list_helpers() {
        let mut dom = Dom::new();
        let el = dom.create_element("div");
        dom.add_class(el, "a");
        dom.add_class(el, "b");
        dom.add_class(el, "a");
        assert_eq!(dom.attr(el, "class"), Some("a b"));
        dom.remove_class(el, "a");
        dom.remove_class(el, "b");
        assert_eq!(dom.attr(el, "class"), None);
    }

    #[test]
    fn test_get_element_by_id_ignores_detached_nodes() {
        let (mut dom, outer, _, _) = tree();
        dom.set_attr(outer, "id", "target");
        let copy = dom.clone_node(outer, true).unwrap();
        assert_eq!(dom.get_element_by_id("target"), Some(outer));
        assert_eq!(dom.query_id(copy, "target"), Some(copy));
    }

    #[test]
    fn test_listen_dedupes() {
        let (mut dom, outer, _, _) = tree();
        assert!(dom.listen(outer, EventKind::Click, Action::Export));
        assert!(!dom.listen(outer, EventKind::Click, Action::Export));
        assert_eq!(dom.bindings(outer).len(), 1);
    }

    #[test]
    fn test_discard_frees_subtree() {
        let (mut dom, outer, inner, text) = tree();
        let before = dom.live_nodes();
        dom.discard(outer);
        assert!(!dom.exists(inner));
        assert!(!dom.exists(text));
        assert_eq!(dom.live_nodes(), before - 3);
        assert_eq!(dom.text_content(inner), "");
    }
}
