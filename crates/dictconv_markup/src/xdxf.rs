//! XDXF transform for `x` chunks.
//!
//! A payload chunk holds the body of a single `<ar>` article rather than a full
//! document, so it is wrapped in a synthetic `<xdxf>` root before parsing. The parsed
//! tree is then rendered element by element into the house XHTML subset.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::warn;

use crate::dialect::{plain_text, RESOURCE_PLACEHOLDER};
use crate::error::{Error, Result};
use crate::escape::escape;

const ROOT: &str = "xdxf";

/// Elements rendered as `<div class="NAME">`
const BLOCK_ELEMENTS: &[&str] = &["ar", "def", "blockquote"];

/// Elements rendered as `<span class="NAME">`
const SPAN_ELEMENTS: &[&str] = &[
    "dtrn", "co", "ex", "abr", "gr", "pos", "nu", "deftext", "etm", "opt",
];

/// Elements that are already part of the XHTML subset
const INLINE_ELEMENTS: &[&str] = &["b", "i", "u", "sub", "sup", "em", "strong"];

/// A node of a parsed XDXF fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Unescaped character data
    Text(String),

    /// An element with its attributes in document order
    Element {
        name: String,
        attributes: Vec<(String, String)>,
        children: Vec<Node>,
    },
}

impl Node {
    fn text_content(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element { children, .. } => children.iter().for_each(|c| c.text_content(out)),
        }
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        match self {
            Node::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            Node::Text(_) => None,
        }
    }
}

fn resolve_entity(entity: &str) -> Option<&'static str> {
    match entity {
        "lt" => Some("<"),
        "gt" => Some(">"),
        "amp" => Some("&"),
        "apos" => Some("'"),
        "quot" => Some("\""),
        "nbsp" => Some("\u{a0}"),
        _ => None,
    }
}

fn open_element(start: &BytesStart) -> Result<Node> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        attributes.push((
            String::from_utf8_lossy(attribute.key.as_ref()).into_owned(),
            attribute.unescape_value()?.into_owned(),
        ));
    }

    Ok(Node::Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn append(stack: &mut [Node], top: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(Node::Element { children, .. }) => children.push(node),
        _ => top.push(node),
    }
}

/// Parse an XDXF fragment into the children of its synthetic root.
pub fn parse_fragment(fragment: &str) -> Result<Vec<Node>> {
    let wrapped = format!("<{ROOT}>{fragment}</{ROOT}>");
    let mut reader = Reader::from_str(&wrapped);

    let mut stack: Vec<Node> = Vec::new();
    let mut top: Vec<Node> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(open_element(&start)?),
            Event::Empty(start) => {
                let node = open_element(&start)?;
                append(&mut stack, &mut top, node);
            }
            Event::End(end) => {
                let node = stack.pop().ok_or_else(|| {
                    Error::UnexpectedClose(String::from_utf8_lossy(end.name().as_ref()).into_owned())
                })?;
                append(&mut stack, &mut top, node);
            }
            Event::Text(text) => {
                let text = text.unescape_with(resolve_entity)?.into_owned();
                append(&mut stack, &mut top, Node::Text(text));
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data).into_owned();
                append(&mut stack, &mut top, Node::Text(text));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(Node::Element { name, .. }) = stack.pop() {
        return Err(Error::Unclosed(name));
    }

    Ok(top
        .into_iter()
        .find_map(|node| match node {
            Node::Element { name, children, .. } if name == ROOT => Some(children),
            _ => None,
        })
        .unwrap_or_default())
}

fn render_children(children: &[Node], out: &mut String) {
    children.iter().for_each(|c| render_node(c, out));
}

fn render_wrapped(open: &str, close: &str, children: &[Node], out: &mut String) {
    out.push_str(open);
    render_children(children, out);
    out.push_str(close);
}

fn render_node(node: &Node, out: &mut String) {
    let (name, children) = match node {
        Node::Text(text) => {
            out.push_str(&escape(text));
            return;
        }
        Node::Element { name, children, .. } => (name.as_str(), children),
    };

    match name {
        "k" => {}
        "br" => out.push_str("<br/>"),
        "tr" => render_wrapped("<span class=\"tr\">[", "]</span>", children, out),
        "kref" => {
            let mut target = String::new();
            node.text_content(&mut target);
            let target = escape(target.trim());
            out.push_str(&format!(
                "<a href=\"x-dictionary:d:{target}\">{target}</a>"
            ));
        }
        "iref" => {
            let href = escape(node.attribute("href").unwrap_or_default());
            render_wrapped(&format!("<a href=\"{href}\">"), "</a>", children, out);
        }
        "c" => {
            let color = escape(node.attribute("c").unwrap_or("green"));
            render_wrapped(&format!("<font color=\"{color}\">"), "</font>", children, out);
        }
        "rref" => out.push_str(&format!(
            "<span class=\"rref\">{RESOURCE_PLACEHOLDER}</span>"
        )),
        _ if BLOCK_ELEMENTS.contains(&name) => {
            render_wrapped(&format!("<div class=\"{name}\">"), "</div>", children, out)
        }
        _ if SPAN_ELEMENTS.contains(&name) => {
            render_wrapped(&format!("<span class=\"{name}\">"), "</span>", children, out)
        }
        _ if INLINE_ELEMENTS.contains(&name) => {
            render_wrapped(&format!("<{name}>"), &format!("</{name}>"), children, out)
        }
        _ => render_children(children, out),
    }
}

/// Render parsed XDXF nodes as XHTML.
pub fn render(nodes: &[Node]) -> String {
    let mut out = String::new();
    render_children(nodes, &mut out);
    out
}

/// Decoder for `x` chunks.
///
/// Fragments that are not well-formed fall back to plain text rendering.
pub fn decode(data: &[u8]) -> String {
    let fragment = String::from_utf8_lossy(data);
    match parse_fragment(&fragment) {
        Ok(nodes) => render(&nodes),
        Err(err) => {
            warn!(%err, "malformed xdxf fragment, rendering as plain text");
            plain_text(&fragment)
        }
    }
}
