//! Markup reader for exported emails
//!
//! Reads back the markup [`Dom::outer_html`](super::Dom::outer_html) writes:
//! tags with quoted or bare attributes, text, comments, and character
//! references. It is forgiving rather than validating. Unknown closing tags
//! are skipped, unclosed elements are closed at end of input, and
//! whitespace-only text between tags is dropped.

use super::{Dom, NodeId, VOID_ELEMENTS};
use regex::Regex;
use std::sync::OnceLock;

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?s)<!--.*?-->|<![^>]*>|</\s*([a-zA-Z][a-zA-Z0-9-]*)\s*>|<([a-zA-Z][a-zA-Z0-9-]*)((?:\s+[^\s=/>]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+))?)*)\s*(/?)>|[^<]+|<"#,
        )
        .expect("token regex")
    })
}

fn attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"([^\s=/>]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+)))?"#)
            .expect("attribute regex")
    })
}

fn entity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("entity regex"))
}

/// Parse markup into detached nodes of `dom`, returning the top-level nodes
pub fn parse_fragment(dom: &mut Dom, markup: &str) -> Vec<NodeId> {
    let mut top_level = Vec::new();
    let mut open: Vec<NodeId> = Vec::new();

    for caps in token_re().captures_iter(markup) {
        let token = caps.get(0).map_or("", |m| m.as_str());

        if let Some(closing) = caps.get(1) {
            let tag = closing.as_str().to_ascii_lowercase();
            if let Some(depth) = open.iter().rposition(|n| dom.tag(*n) == Some(tag.as_str())) {
                open.truncate(depth);
            }
            continue;
        }

        let node = if let Some(opening) = caps.get(2) {
            let tag = opening.as_str().to_ascii_lowercase();
            let element = dom.create_element(&tag);
            if let Some(attrs) = caps.get(3) {
                for attr in attr_re().captures_iter(attrs.as_str()) {
                    let name = attr[1].to_ascii_lowercase();
                    let value = attr
                        .get(2)
                        .or_else(|| attr.get(3))
                        .or_else(|| attr.get(4))
                        .map_or("", |m| m.as_str());
                    dom.set_attr(element, &name, &decode_entities(value));
                }
            }
            let self_closing = caps.get(4).is_some_and(|m| !m.as_str().is_empty());
            attach(dom, &open, &mut top_level, element);
            if !self_closing && !VOID_ELEMENTS.contains(&tag.as_str()) {
                open.push(element);
            }
            continue;
        } else if token.starts_with("<!") {
            continue;
        } else {
            if token.trim().is_empty() {
                continue;
            }
            dom.create_text(&decode_entities(token))
        };
        attach(dom, &open, &mut top_level, node);
    }

    top_level
}

fn attach(dom: &mut Dom, open: &[NodeId], top_level: &mut Vec<NodeId>, node: NodeId) {
    match open.last() {
        Some(parent) => {
            dom.append(*parent, node);
        }
        None => top_level.push(node),
    }
}

/// Replace character references with the characters they name.
/// Unknown named references are left as written.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    entity_re()
        .replace_all(text, |caps: &regex::Captures| {
            let body = &caps[1];
            let decoded = if let Some(hex) = body
                .strip_prefix("#x")
                .or_else(|| body.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                named_entity(body)
            };
            decoded.map_or_else(|| caps[0].to_string(), |c| c.to_string())
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "times" => '\u{d7}',
        "copy" => '\u{a9}',
        "mdash" => '\u{2014}',
        "ndash" => '\u{2013}',
        "hellip" => '\u{2026}',
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("&#215;"), "\u{d7}");
        assert_eq!(decode_entities("&#x41;&lt;"), "A<");
        assert_eq!(decode_entities("&bogus;"), "&bogus;");
    }

    #[test]
    fn test_parse_reproduces_serialized_tree() {
        let mut dom = Dom::new();
        let markup = "<div id=\"a\" style=\"color: red;\"><p>one &amp; two</p><img src=\"x.gif\" alt=\"\"><a href=\"#\">link</a></div>";
        let nodes = parse_fragment(&mut dom, markup);
        assert_eq!(nodes.len(), 1);
        assert_eq!(dom.outer_html(nodes[0]), markup);
    }

    #[test]
    fn test_parse_is_forgiving() {
        let mut dom = Dom::new();
        let nodes = parse_fragment(
            &mut dom,
            "<!DOCTYPE html>\n<table>\n  <tr><td>cell</span></td></tr>\n<br/><p>open",
        );
        assert_eq!(nodes.len(), 1);
        let table = nodes[0];
        assert_eq!(dom.tag(table), Some("table"));
        assert_eq!(dom.text_content(table), "cellopen");
    }

    #[test]
    fn test_parse_unquoted_and_single_quoted_attrs() {
        let mut dom = Dom::new();
        let nodes = parse_fragment(&mut dom, "<table width=600 align='center'></table>");
        assert_eq!(dom.attr(nodes[0], "width"), Some("600"));
        assert_eq!(dom.attr(nodes[0], "align"), Some("center"));
    }
}
