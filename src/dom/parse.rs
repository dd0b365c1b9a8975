use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use super::{is_raw_text_element, is_void_element, Document, Element, Node};
use crate::error::PageError;

/// Parse XHTML-compatible page markup into a `Document`.
///
/// Tolerates the HTML habits seen in generated tutorial pages: void elements
/// without a closing slash, attributes without values, mismatched end tags
/// (open elements are closed implicitly) and stray end tags (ignored).
/// `script` and `style` bodies are kept as raw text up to their end tag.
pub fn parse_document(markup: &str) -> Result<Document, PageError> {
    let mut reader = page_reader(markup);
    // Byte offset of the reader's input within `markup`.
    let mut base = 0;

    let mut doctype = None;
    let mut root: Option<Element> = None;
    let mut stack: Vec<Element> = Vec::new();

    loop {
        let position = base as u64 + reader.buffer_position();
        let event = reader.read_event().map_err(|err| PageError::Markup {
            position,
            message: err.to_string(),
        })?;

        match event {
            Event::Start(start) => {
                let element = start_element(&reader, &start, position)?;
                if is_void_element(&element.tag) {
                    attach(&mut stack, &mut root, Node::Element(element));
                } else if is_raw_text_element(&element.tag) {
                    let body_start = base + reader.buffer_position() as usize;
                    let (body, resume) = raw_text(markup, body_start, &element.tag);
                    let mut element = element;
                    if !body.is_empty() {
                        element.children.push(Node::Text(body.to_string()));
                    }
                    attach(&mut stack, &mut root, Node::Element(element));
                    base = resume;
                    reader = page_reader(&markup[resume..]);
                } else {
                    stack.push(element);
                }
            }
            Event::Empty(start) => {
                let element = start_element(&reader, &start, position)?;
                attach(&mut stack, &mut root, Node::Element(element));
            }
            Event::End(end) => {
                let name = String::from_utf8_lossy(end.name().as_ref()).to_ascii_lowercase();
                if let Some(depth) = stack.iter().rposition(|open| open.tag == name) {
                    while stack.len() > depth {
                        let Some(closed) = stack.pop() else { break };
                        attach(&mut stack, &mut root, Node::Element(closed));
                    }
                }
            }
            Event::Text(text) => {
                let text = text.decode().map_err(|err| markup_error(position, err))?;
                push_text(&mut stack, &text);
            }
            Event::CData(data) => {
                let text = reader
                    .decoder()
                    .decode(&data)
                    .map_err(|err| markup_error(position, err))?;
                push_text(&mut stack, &text);
            }
            Event::GeneralRef(reference) => {
                let name = reference.decode().map_err(|err| markup_error(position, err))?;
                push_text(&mut stack, &resolve_entity(&name));
            }
            Event::Comment(comment) => {
                if let Some(open) = stack.last_mut() {
                    let body = comment.decode().map_err(|err| markup_error(position, err))?;
                    open.children.push(Node::Comment(body.into_owned()));
                }
            }
            Event::DocType(text) => {
                let text = text.decode().map_err(|err| markup_error(position, err))?;
                doctype = Some(text.trim().to_string());
            }
            Event::Eof => break,
            _ => {}
        }
    }

    while let Some(closed) = stack.pop() {
        attach(&mut stack, &mut root, Node::Element(closed));
    }

    let root = root.ok_or(PageError::NoRoot)?;
    Ok(Document { doctype, root })
}

fn page_reader(input: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(input);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    reader
}

/// Body of a raw-text element starting at `from`, and the offset just past
/// its end tag. An unterminated body runs to the end of the input.
fn raw_text<'a>(markup: &'a str, from: usize, tag: &str) -> (&'a str, usize) {
    let rest = &markup[from..];
    let close_tag = format!("</{tag}");
    match rest.to_ascii_lowercase().find(&close_tag) {
        Some(close) => {
            let after = rest[close..].find('>').map_or(rest.len(), |gt| close + gt + 1);
            (&rest[..close], from + after)
        }
        None => (rest, markup.len()),
    }
}

fn markup_error(position: u64, err: impl std::fmt::Display) -> PageError {
    PageError::Markup {
        position,
        message: err.to_string(),
    }
}

fn start_element(
    reader: &Reader<&[u8]>,
    start: &BytesStart<'_>,
    position: u64,
) -> Result<Element, PageError> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).to_ascii_lowercase();
    let mut element = Element::new(&tag);
    for attr in start.html_attributes() {
        let attr = attr.map_err(|err| markup_error(position, err))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = reader
            .decoder()
            .decode(attr.value.as_ref())
            .map_err(|err| markup_error(position, err))?;
        let value = quick_xml::escape::unescape(&raw).unwrap_or(Cow::Borrowed(raw.as_ref()));
        element.attrs.push((key, value.into_owned()));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            if let Node::Element(element) = node {
                if root.is_none() {
                    *root = Some(element);
                }
            }
        }
    }
}

fn push_text(stack: &mut [Element], text: &str) {
    let Some(open) = stack.last_mut() else {
        return;
    };
    if let Some(Node::Text(existing)) = open.children.last_mut() {
        existing.push_str(text);
    } else {
        open.children.push(Node::Text(text.to_string()));
    }
}

/// Resolve the name inside `&...;`. Unknown HTML entities are kept verbatim.
fn resolve_entity(name: &str) -> String {
    let named = match name {
        "nbsp" => Some('\u{a0}'),
        "ndash" => Some('–'),
        "mdash" => Some('—'),
        "hellip" => Some('…'),
        "copy" => Some('©'),
        "lsquo" => Some('‘'),
        "rsquo" => Some('’'),
        "ldquo" => Some('“'),
        "rdquo" => Some('”'),
        "laquo" => Some('«'),
        "raquo" => Some('»'),
        "middot" => Some('·'),
        _ => None,
    };
    if let Some(ch) = named {
        return ch.to_string();
    }
    let reference = format!("&{name};");
    match quick_xml::escape::unescape(&reference) {
        Ok(resolved) => resolved.into_owned(),
        Err(_) => reference,
    }
}
