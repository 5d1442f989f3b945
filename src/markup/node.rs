//! Owned SVG element tree with attribute, style and text helpers.

use std::fmt::{self, Write as _};

/// The SVG namespace URI.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

// ============================================================================
// SvgNode
// ============================================================================

/// A child of an [`SvgElement`]: either a nested element or character data.
#[derive(Debug, Clone, PartialEq)]
pub enum SvgNode {
    Element(SvgElement),
    Text(String),
}

impl SvgNode {
    /// Returns the element if this node is one.
    pub fn as_element(&self) -> Option<&SvgElement> {
        match self {
            Self::Element(el) => Some(el),
            Self::Text(_) => None,
        }
    }
}

impl From<SvgElement> for SvgNode {
    fn from(el: SvgElement) -> Self {
        Self::Element(el)
    }
}

// ============================================================================
// SvgElement
// ============================================================================

/// A detached SVG element.
///
/// Attributes keep their source order so serialized output stays close to the
/// template it came from. Namespace declarations (`xmlns`, `xmlns:*`) are
/// stored as ordinary attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<SvgNode>,
}

impl SvgElement {
    /// Creates an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// The qualified tag name (e.g. `svg`, `text`, `xlink:foo`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the tag name matches, ignoring any prefix.
    pub fn is(&self, local_name: &str) -> bool {
        let local = self.name.rsplit(':').next().unwrap_or(&self.name);
        local == local_name
    }

    // ---- Attributes ----

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Sets an attribute, overwriting in place if it already exists.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Removes an attribute, returning its previous value.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let index = self.attributes.iter().position(|(key, _)| key == name)?;
        Some(self.attributes.remove(index).1)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Inserts an attribute at the front (used for namespace declarations).
    pub(crate) fn prepend_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(0, (name.into(), value.into()));
    }

    // ---- Children ----

    pub fn children(&self) -> &[SvgNode] {
        &self.children
    }

    pub fn append_child(&mut self, child: impl Into<SvgNode>) {
        self.children.push(child.into());
    }

    pub(crate) fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(SvgNode::Text(text.into()));
    }

    /// Iterates over the direct child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &SvgElement> {
        self.children.iter().filter_map(SvgNode::as_element)
    }

    /// Concatenated character data of this element and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Replaces all children with a single text node.
    pub fn set_text_content(&mut self, text: impl Into<String>) {
        self.children.clear();
        self.children.push(SvgNode::Text(text.into()));
    }

    // ---- Queries ----

    /// Finds the first descendant (excluding `self`) matching `pred`, in
    /// document order.
    pub fn find(&self, pred: &dyn Fn(&SvgElement) -> bool) -> Option<&SvgElement> {
        for child in self.child_elements() {
            if pred(child) {
                return Some(child);
            }
            if let Some(found) = child.find(pred) {
                return Some(found);
            }
        }
        None
    }

    /// Mutable variant of [`find`](Self::find).
    pub fn find_mut(&mut self, pred: &dyn Fn(&SvgElement) -> bool) -> Option<&mut SvgElement> {
        for child in &mut self.children {
            if let SvgNode::Element(el) = child {
                if pred(el) {
                    return Some(el);
                }
                if let Some(found) = el.find_mut(pred) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Collects every descendant (excluding `self`) matching `pred`.
    pub fn find_all(&self, pred: &dyn Fn(&SvgElement) -> bool) -> Vec<&SvgElement> {
        let mut found = Vec::new();
        self.walk(&mut |el| {
            if pred(el) {
                found.push(el);
            }
        });
        found
    }

    /// Visits every descendant (excluding `self`) in document order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a SvgElement)) {
        for child in self.child_elements() {
            visit(child);
            child.walk(visit);
        }
    }

    /// Visits every descendant (excluding `self`) mutably, in document order.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut SvgElement)) {
        for child in &mut self.children {
            if let SvgNode::Element(el) = child {
                visit(el);
                el.walk_mut(visit);
            }
        }
    }

    // ---- Inline style ----

    /// Parses the `style` attribute into `(property, value)` pairs.
    pub fn style_declarations(&self) -> Vec<(String, String)> {
        self.attr("style").map(parse_style).unwrap_or_default()
    }

    /// Reads a single inline style property.
    pub fn style_property(&self, property: &str) -> Option<String> {
        self.style_declarations()
            .into_iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value)
    }

    /// Sets an inline style property. An empty value removes it, matching how
    /// script hosts treat `element.style.prop = ""`.
    pub fn set_style_property(&mut self, property: &str, value: &str) {
        let mut declarations = self.style_declarations();
        let value = value.trim();

        match declarations.iter().position(|(name, _)| name == property) {
            Some(index) if value.is_empty() => {
                declarations.remove(index);
            }
            Some(index) => declarations[index].1 = value.to_string(),
            None if value.is_empty() => {}
            None => declarations.push((property.to_string(), value.to_string())),
        }

        self.write_style(&declarations);
    }

    /// Removes an inline style property.
    pub fn remove_style_property(&mut self, property: &str) {
        self.set_style_property(property, "");
    }

    fn write_style(&mut self, declarations: &[(String, String)]) {
        if declarations.is_empty() {
            self.remove_attr("style");
            return;
        }
        let style = declarations
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attr("style", style);
    }

    // ---- Serialization ----

    /// Serializes this element and its subtree to markup.
    pub fn to_markup(&self) -> String {
        self.to_string()
    }

    fn write_markup(&self, out: &mut impl fmt::Write) -> fmt::Result {
        write!(out, "<{}", self.name)?;
        for (name, value) in &self.attributes {
            write!(out, " {}=\"{}\"", name, escape_attr(value))?;
        }

        if self.children.is_empty() {
            return out.write_str("/>");
        }

        out.write_char('>')?;
        for child in &self.children {
            match child {
                SvgNode::Element(el) => el.write_markup(out)?,
                SvgNode::Text(text) => out.write_str(&escape_text(text))?,
            }
        }
        write!(out, "</{}>", self.name)
    }
}

impl fmt::Display for SvgElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_markup(f)
    }
}

fn collect_text(el: &SvgElement, out: &mut String) {
    for child in &el.children {
        match child {
            SvgNode::Text(text) => out.push_str(text),
            SvgNode::Element(nested) => collect_text(nested, out),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            let value = value.trim();
            (!name.is_empty() && !value.is_empty()).then(|| (name.to_string(), value.to_string()))
        })
        .collect()
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Formats a number the way a script host stringifies it: integral values
/// have no fractional part (`50`, not `50.0`), magnitudes from `1e21` up or
/// below `1e-6` use exponent form (`1e+21`, `1.5e-7`), and non-finite values
/// print as `NaN`, `Infinity` and `-Infinity`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.into();
    }
    if value == 0.0 {
        return "0".into();
    }

    if (1e-6..1e21).contains(&value.abs()) {
        return value.to_string();
    }

    let exp_form = format!("{value:e}");
    match exp_form.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => format!("{mantissa}e+{exponent}"),
        _ => exp_form,
    }
}

/// Converts a camelCase style property name to its CSS form
/// (`backgroundColor` -> `background-color`). Names that are already
/// kebab-case pass through unchanged.
pub fn css_property_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
