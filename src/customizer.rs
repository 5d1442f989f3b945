//! Template customization: stamps a [`StickerConfig`] into a markup fragment.
//!
//! [`build`] runs a fixed sequence of steps, each skipped when its config
//! field is absent:
//!
//! 1. Parse the fragment and take its first `<svg>` element as the root
//! 2. `width` / `height` -> root size attributes
//! 3. `className` -> root `class`
//! 4. `color` -> every fill-bearing descendant except the background and
//!    `fill="none"` shapes
//! 5. `backgroundColor` -> the element tagged `data-background="true"`
//! 6. `text` -> the dynamic text element, updated or synthesized
//! 7. `style` -> inline style overrides on the root
//!
//! The result is detached; no document is touched.
//!
//! # Example
//!
//! ```
//! use sticker_kit::{StickerConfig, customizer};
//!
//! let markup = r##"<svg viewBox="0 0 100 100"><circle r="45" fill="#2ecc71"/></svg>"##;
//! let config = StickerConfig::new().with_color("#123456").with_text("Hi");
//!
//! let svg = customizer::build(markup, &config).unwrap();
//! assert!(svg.to_markup().contains(r##"fill="#123456""##));
//! assert!(svg.to_markup().contains(">Hi</text>"));
//! ```

use crate::config::{StickerConfig, StyleOverrides};
use crate::error::Result;
use crate::markup::{SvgElement, css_property_name, format_number, parse_fragment};

pub const BACKGROUND_ATTR: &str = "data-background";
pub const DYNAMIC_ATTR: &str = "data-dynamic";

pub const DEFAULT_TEXT_COLOR: &str = "#000000";
pub const DEFAULT_FONT_SIZE: f64 = 16.0;
pub const DEFAULT_FONT_FAMILY: &str = "Arial, sans-serif";

// ============================================================================
// Build
// ============================================================================

/// Builds a customized, detached graphic node from `markup` and `config`.
///
/// Fails with [`StickerError::Template`](crate::StickerError::Template) if the
/// markup has no parseable `<svg>` root.
pub fn build(markup: &str, config: &StickerConfig) -> Result<SvgElement> {
    let mut svg = parse_fragment(markup)?;

    if let Some(width) = config.width {
        svg.set_attr("width", format_number(width));
    }
    if let Some(height) = config.height {
        svg.set_attr("height", format_number(height));
    }
    if let Some(class_name) = &config.class_name {
        svg.set_attr("class", class_name.as_str());
    }
    if let Some(color) = &config.color {
        replace_fill(&mut svg, color);
    }
    if let Some(background) = &config.background_color {
        set_background(&mut svg, background);
    }
    if let Some(text) = &config.text {
        apply_text(&mut svg, text, config);
    }
    if let Some(style) = &config.style {
        apply_styles(&mut svg, style);
    }

    Ok(svg)
}

// ============================================================================
// Steps
// ============================================================================

/// Returns true for the element tagged as the template's background.
pub fn is_background(el: &SvgElement) -> bool {
    el.attr(BACKGROUND_ATTR) == Some("true")
}

/// Returns true for the `<text>` element that receives caller text.
pub fn is_dynamic_text(el: &SvgElement) -> bool {
    el.is("text") && el.attr(DYNAMIC_ATTR) == Some("true")
}

/// Overwrites the fill of every descendant that has one, except the
/// background and shapes whose fill is exactly `none` (intentional
/// transparency such as negative space).
pub fn replace_fill(svg: &mut SvgElement, color: &str) {
    svg.walk_mut(&mut |el| {
        if is_background(el) {
            return;
        }
        if matches!(el.attr("fill"), Some(fill) if fill != "none") {
            el.set_attr("fill", color);
        }
    });
}

/// Sets the fill of the background element. Templates without one are left
/// unchanged.
pub fn set_background(svg: &mut SvgElement, color: &str) {
    if let Some(background) = svg.find_mut(&is_background) {
        background.set_attr("fill", color);
    }
}

/// Writes `text` into the dynamic text element, or synthesizes one centered
/// in the root's viewBox.
///
/// An existing element keeps its own styling unless the config carries
/// `textColor`, `fontSize` or `fontFamily`. Without a usable viewBox no
/// element is synthesized.
pub fn apply_text(svg: &mut SvgElement, text: &str, config: &StickerConfig) {
    if let Some(existing) = svg.find_mut(&is_dynamic_text) {
        existing.set_text_content(text);
        if let Some(color) = &config.text_color {
            existing.set_attr("fill", color.as_str());
        }
        if let Some(size) = config.font_size {
            existing.set_attr("font-size", format_number(size));
        }
        if let Some(family) = &config.font_family {
            existing.set_attr("font-family", family.as_str());
        }
        return;
    }

    let Some((width, height)) = svg.attr("viewBox").and_then(view_box_size) else {
        return;
    };

    let mut node = SvgElement::new("text")
        .with_attr(DYNAMIC_ATTR, "true")
        .with_attr("x", format_number(width / 2.0))
        .with_attr("y", format_number(height / 2.0))
        .with_attr("text-anchor", "middle")
        .with_attr("dominant-baseline", "middle")
        .with_attr("fill", config.text_color.as_deref().unwrap_or(DEFAULT_TEXT_COLOR))
        .with_attr("font-size", format_number(config.font_size.unwrap_or(DEFAULT_FONT_SIZE)))
        .with_attr("font-family", config.font_family.as_deref().unwrap_or(DEFAULT_FONT_FAMILY));
    node.set_text_content(text);

    svg.append_child(node);
}

/// Applies each present style override to the root's inline style.
pub fn apply_styles(svg: &mut SvgElement, styles: &StyleOverrides) {
    for (property, value) in styles {
        if let Some(value) = value {
            svg.set_style_property(&css_property_name(property), value);
        }
    }
}

/// Width and height of a `viewBox` value (`min-x min-y width height`,
/// separated by whitespace and/or commas).
fn view_box_size(view_box: &str) -> Option<(f64, f64)> {
    let values: Vec<f64> = view_box
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect::<std::result::Result<_, _>>()
        .ok()?;

    match values.as_slice() {
        [_, _, width, height] => Some((*width, *height)),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StickerError;
    use pretty_assertions::assert_eq;

    const HEART_WITH_HOLE: &str = r##"
      <svg viewBox="0 0 100 100" xmlns="http://www.w3.org/2000/svg">
        <path d="M50,25 C30,0 0,12.5 0,35 Z" fill="#FF69B4"/>
        <circle cx="50" cy="40" r="5" fill="none" stroke="black"/>
        <g><rect width="5" height="5" fill="#000"/></g>
      </svg>
    "##;

    const BADGE: &str = r##"
      <svg viewBox="0 0 120 120" xmlns="http://www.w3.org/2000/svg">
        <rect data-background="true" width="120" height="120" fill="#3498db"/>
        <text data-dynamic="true" x="60" y="60" fill="white" font-size="24">BADGE</text>
      </svg>
    "##;

    fn fills(svg: &SvgElement) -> Vec<String> {
        svg.find_all(&|el| el.has_attr("fill"))
            .iter()
            .map(|el| el.attr("fill").unwrap().to_string())
            .collect()
    }

    #[test]
    fn empty_config_leaves_template_alone() {
        let svg = build(HEART_WITH_HOLE, &StickerConfig::new()).unwrap();
        assert_eq!(fills(&svg), vec!["#FF69B4", "none", "#000"]);
        assert!(!svg.has_attr("width"));
        assert!(!svg.has_attr("style"));
    }

    #[test]
    fn size_and_class_on_root() {
        let config = StickerConfig::new().with_size(64.0, 48.5).with_class_name("sticker big");
        let svg = build(HEART_WITH_HOLE, &config).unwrap();
        assert_eq!(svg.attr("width"), Some("64"));
        assert_eq!(svg.attr("height"), Some("48.5"));
        assert_eq!(svg.attr("class"), Some("sticker big"));
    }

    #[test]
    fn color_skips_none_fills() {
        let svg = build(HEART_WITH_HOLE, &StickerConfig::new().with_color("#123456")).unwrap();
        assert_eq!(fills(&svg), vec!["#123456", "none", "#123456"]);
    }

    #[test]
    fn color_skips_background() {
        let svg = build(BADGE, &StickerConfig::new().with_color("#123456")).unwrap();
        let background = svg.find(&is_background).unwrap();
        assert_eq!(background.attr("fill"), Some("#3498db"));
        let text = svg.find(&is_dynamic_text).unwrap();
        assert_eq!(text.attr("fill"), Some("#123456"));
    }

    #[test]
    fn background_color() {
        let svg = build(BADGE, &StickerConfig::new().with_background_color("#e74c3c")).unwrap();
        assert_eq!(svg.find(&is_background).unwrap().attr("fill"), Some("#e74c3c"));

        // No background element: silent no-op.
        let svg = build(HEART_WITH_HOLE, &StickerConfig::new().with_background_color("red")).unwrap();
        assert_eq!(fills(&svg), vec!["#FF69B4", "none", "#000"]);
    }

    #[test]
    fn text_updates_existing_dynamic_node() {
        let config = StickerConfig {
            text: Some("NEW".into()),
            font_size: Some(30.0),
            ..Default::default()
        };
        let svg = build(BADGE, &config).unwrap();

        let texts = svg.find_all(&is_dynamic_text);
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].text_content(), "NEW");
        assert_eq!(texts[0].attr("font-size"), Some("30"));
        assert_eq!(texts[0].attr("fill"), Some("white"));
    }

    #[test]
    fn text_is_synthesized_at_view_box_center() {
        let svg = build(HEART_WITH_HOLE, &StickerConfig::new().with_text("Love")).unwrap();

        let text = svg.find(&is_dynamic_text).unwrap();
        assert_eq!(text.text_content(), "Love");
        assert_eq!(text.attr("x"), Some("50"));
        assert_eq!(text.attr("y"), Some("50"));
        assert_eq!(text.attr("fill"), Some(DEFAULT_TEXT_COLOR));
        assert_eq!(text.attr("font-size"), Some("16"));
        assert_eq!(text.attr("font-family"), Some(DEFAULT_FONT_FAMILY));

        // Appended as the root's last child.
        let last = svg.child_elements().last().unwrap();
        assert!(is_dynamic_text(last));
    }

    #[test]
    fn synthesized_text_uses_config_styling() {
        let config = StickerConfig {
            text: Some("x".into()),
            text_color: Some("#fff".into()),
            font_family: Some("Georgia".into()),
            ..Default::default()
        };
        let svg = build(r#"<svg viewBox="0,0,150,75"/>"#, &config).unwrap();
        let text = svg.find(&is_dynamic_text).unwrap();
        assert_eq!(text.attr("x"), Some("75"));
        assert_eq!(text.attr("y"), Some("37.5"));
        assert_eq!(text.attr("fill"), Some("#fff"));
        assert_eq!(text.attr("font-family"), Some("Georgia"));
    }

    #[test]
    fn no_view_box_means_no_text() {
        let svg = build(r#"<svg><rect fill="red"/></svg>"#, &StickerConfig::new().with_text("Hi")).unwrap();
        assert!(svg.find(&is_dynamic_text).is_none());

        let svg = build(r#"<svg viewBox="junk"/>"#, &StickerConfig::new().with_text("Hi")).unwrap();
        assert!(svg.find(&is_dynamic_text).is_none());
    }

    #[test]
    fn styles_skip_absent_values() {
        let mut config = StickerConfig::new()
            .with_style("opacity", "0.5")
            .with_style("backgroundColor", "white");
        config.style.as_mut().unwrap().insert("cursor".into(), None);

        let svg = build(BADGE, &config).unwrap();
        assert_eq!(svg.style_property("opacity").as_deref(), Some("0.5"));
        assert_eq!(svg.style_property("background-color").as_deref(), Some("white"));
        assert_eq!(svg.style_property("cursor"), None);
    }

    #[test]
    fn invalid_markup_is_a_template_error() {
        let err = build("<div>no graphic</div>", &StickerConfig::new()).unwrap_err();
        assert!(matches!(err, StickerError::Template(_)));
    }

    #[test]
    fn values_are_not_validated() {
        let svg = build(BADGE, &StickerConfig::new().with_color("not-a-color")).unwrap();
        assert!(svg.to_markup().contains(r#"fill="not-a-color""#));
    }
}
