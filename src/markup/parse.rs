//! Markup fragment parsing via roxmltree.

use roxmltree::{Document, Node, NodeType, ParsingOptions};

use super::node::SvgElement;
use crate::error::{Result, StickerError};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Parses a markup fragment and returns a detached copy of its first `<svg>`
/// element (in document order).
///
/// The fragment may contain surrounding whitespace, sibling elements, or a
/// leading XML declaration/DOCTYPE. Fails with [`StickerError::Template`] if
/// the fragment is not well-formed or contains no `<svg>` element.
pub fn parse_fragment(markup: &str) -> Result<SvgElement> {
    let (prolog, body) = split_prolog(markup);
    // Wrapping lets fragments with several top-level nodes parse as one
    // document. The prolog stays in front so DTD entities still resolve.
    let wrapped = format!("{prolog}<fragment>{body}</fragment>");

    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(&wrapped, options)
        .map_err(|e| StickerError::Template(e.to_string()))?;

    let svg = doc
        .root_element()
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == "svg")
        .ok_or_else(|| StickerError::Template("no root <svg> element found".into()))?;

    Ok(convert(svg, None))
}

/// Splits a leading `<?xml ...?>` declaration and `<!DOCTYPE ...>` (with or
/// without an internal subset) from the rest of the fragment. A byte order
/// mark and leading whitespace are dropped.
fn split_prolog(markup: &str) -> (&str, &str) {
    let markup = markup.trim_start_matches('\u{FEFF}').trim_start();
    let mut end = 0;

    loop {
        let rest = &markup[end..];
        let trimmed = rest.trim_start();
        let skipped = rest.len() - trimmed.len();

        let consumed = if trimmed.starts_with("<?xml") {
            trimmed.find("?>").map(|i| i + 2)
        } else if trimmed.starts_with("<!DOCTYPE") || trimmed.starts_with("<!doctype") {
            doctype_len(trimmed)
        } else {
            None
        };

        match consumed {
            Some(len) => end += skipped + len,
            None => return markup.split_at(end),
        }
    }
}

/// Length of a DOCTYPE declaration at the start of `rest`, including an
/// internal subset (`[ ... ]`) when one comes before the closing `>`.
fn doctype_len(rest: &str) -> Option<usize> {
    let open = rest.find(['[', '>'])?;
    if rest[open..].starts_with('>') {
        return Some(open + 1);
    }

    let close = open + rest[open..].find(']')?;
    let after = rest[close + 1..].trim_start();
    after
        .starts_with('>')
        .then(|| rest.len() - after.len() + 1)
}

fn convert(node: Node<'_, '_>, parent: Option<Node<'_, '_>>) -> SvgElement {
    let tag = node.tag_name();
    let mut el = SvgElement::new(qualified_name(node, tag.namespace(), tag.name(), false));

    // Re-declare namespaces that come into scope on this element. The root
    // gets every namespace in scope, since the wrapper is discarded.
    for ns in node.namespaces() {
        if ns.uri() == XML_NAMESPACE {
            continue;
        }
        let inherited = parent.is_some_and(|p| {
            p.namespaces()
                .any(|other| other.name() == ns.name() && other.uri() == ns.uri())
        });
        if inherited {
            continue;
        }
        match ns.name() {
            Some(prefix) => el.set_attr(format!("xmlns:{prefix}"), ns.uri()),
            None => el.set_attr("xmlns", ns.uri()),
        }
    }

    for attr in node.attributes() {
        let name = qualified_name(node, attr.namespace(), attr.name(), true);
        el.set_attr(name, attr.value());
    }

    for child in node.children() {
        match child.node_type() {
            NodeType::Element => el.append_child(convert(child, Some(node))),
            NodeType::Text => {
                if let Some(text) = child.text() {
                    el.push_text(text);
                }
            }
            _ => {}
        }
    }

    el
}

/// Rebuilds a `prefix:local` name from an expanded name. Elements in the
/// default namespace stay unprefixed; attributes never use the default
/// namespace.
fn qualified_name(node: Node<'_, '_>, namespace: Option<&str>, local: &str, is_attr: bool) -> String {
    let Some(uri) = namespace else {
        return local.to_string();
    };

    if uri == XML_NAMESPACE {
        return format!("xml:{local}");
    }

    let mut prefix = None;
    for ns in node.namespaces().filter(|ns| ns.uri() == uri) {
        match ns.name() {
            None if !is_attr => return local.to_string(),
            None => {}
            Some(p) => prefix = prefix.or(Some(p)),
        }
    }

    match prefix {
        Some(p) => format!("{p}:{local}"),
        None => local.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================
