//! Built-in sticker templates.
//!
//! Each preset pairs a self-contained SVG fragment with a default
//! configuration sized to the fragment's coordinate space. The markup lives
//! in `templates/*.svg` and is embedded at compile time.
//!
//! Templates opt into customization through two data attributes:
//!
//! - `data-background="true"` marks the element that receives
//!   `backgroundColor` and is skipped by `color`.
//! - `data-dynamic="true"` on a `<text>` element marks where `text` goes.
//!   Templates without one get a centered text element synthesized from
//!   their `viewBox`.

use std::borrow::Cow;
use std::sync::LazyLock;

use crate::config::StickerConfig;

/// Name given to presets synthesized from caller markup.
pub const CUSTOM_TEMPLATE_NAME: &str = "custom";

// ============================================================================
// TemplatePreset
// ============================================================================

/// A named markup fragment plus its default configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplatePreset {
    pub name: Cow<'static, str>,
    pub markup: Cow<'static, str>,
    pub default_config: StickerConfig,
}

impl TemplatePreset {
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        markup: impl Into<Cow<'static, str>>,
        default_config: StickerConfig,
    ) -> Self {
        Self {
            name: name.into(),
            markup: markup.into(),
            default_config,
        }
    }

    /// An unregistered preset for one-off markup.
    pub fn custom(markup: impl Into<String>, default_config: StickerConfig) -> Self {
        Self::new(CUSTOM_TEMPLATE_NAME, markup.into(), default_config)
    }
}

// ============================================================================
// TemplateRegistry
// ============================================================================

/// An ordered, read-only set of presets.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    presets: Vec<TemplatePreset>,
}

impl TemplateRegistry {
    /// The process-wide built-in registry.
    pub fn builtin() -> &'static TemplateRegistry {
        static BUILTIN: LazyLock<TemplateRegistry> = LazyLock::new(TemplateRegistry::with_builtins);
        &BUILTIN
    }

    fn with_builtins() -> Self {
        let shape = |color: &str, width: f64, height: f64| {
            StickerConfig::new().with_size(width, height).with_color(color)
        };
        let text = |config: StickerConfig, font_size: f64| StickerConfig {
            text_color: Some("#ffffff".into()),
            font_size: Some(font_size),
            ..config
        };

        let presets = vec![
            TemplatePreset::new("star", include_str!("templates/star.svg"), shape("#FFD700", 100.0, 100.0)),
            TemplatePreset::new("heart", include_str!("templates/heart.svg"), shape("#FF69B4", 100.0, 100.0)),
            TemplatePreset::new(
                "badge",
                include_str!("templates/badge.svg"),
                text(
                    StickerConfig::new()
                        .with_size(120.0, 120.0)
                        .with_background_color("#3498db"),
                    24.0,
                ),
            ),
            TemplatePreset::new("circle", include_str!("templates/circle.svg"), shape("#2ecc71", 100.0, 100.0)),
            TemplatePreset::new("triangle", include_str!("templates/triangle.svg"), shape("#e74c3c", 100.0, 100.0)),
            TemplatePreset::new(
                "ribbon",
                include_str!("templates/ribbon.svg"),
                text(shape("#9b59b6", 150.0, 100.0), 20.0),
            ),
            TemplatePreset::new("sparkle", include_str!("templates/sparkle.svg"), shape("#f39c12", 100.0, 100.0)),
            TemplatePreset::new("cloud", include_str!("templates/cloud.svg"), shape("#ecf0f1", 150.0, 100.0)),
            TemplatePreset::new(
                "tag",
                include_str!("templates/tag.svg"),
                text(shape("#1abc9c", 120.0, 120.0), 18.0),
            ),
            TemplatePreset::new("burst", include_str!("templates/burst.svg"), shape("#e67e22", 100.0, 100.0)),
        ];

        Self { presets }
    }

    pub fn get(&self, name: &str) -> Option<&TemplatePreset> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// Template names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.presets.iter().map(|p| p.name.as_ref()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TemplatePreset> {
        self.presets.iter()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_fragment;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_names_in_order() {
        assert_eq!(
            TemplateRegistry::builtin().names(),
            vec![
                "star", "heart", "badge", "circle", "triangle", "ribbon", "sparkle", "cloud",
                "tag", "burst"
            ]
        );
    }

    #[test]
    fn lookup() {
        let registry = TemplateRegistry::builtin();
        let badge = registry.get("badge").unwrap();
        assert_eq!(badge.default_config.background_color.as_deref(), Some("#3498db"));
        assert_eq!(badge.default_config.font_size, Some(24.0));
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn every_template_parses_with_a_view_box() {
        for preset in TemplateRegistry::builtin().iter() {
            let svg = parse_fragment(&preset.markup)
                .unwrap_or_else(|e| panic!("{} failed to parse: {e}", preset.name));
            assert!(svg.has_attr("viewBox"), "{} has no viewBox", preset.name);
        }
    }

    #[test]
    fn defaults_match_view_box() {
        for preset in TemplateRegistry::builtin().iter() {
            let svg = parse_fragment(&preset.markup).unwrap();
            let view_box: Vec<f64> = svg
                .attr("viewBox")
                .unwrap()
                .split_whitespace()
                .map(|v| v.parse().unwrap())
                .collect();
            assert_eq!(preset.default_config.width, Some(view_box[2]), "{}", preset.name);
            assert_eq!(preset.default_config.height, Some(view_box[3]), "{}", preset.name);
        }
    }

    #[test]
    fn text_templates_carry_one_dynamic_node() {
        for name in ["badge", "ribbon", "tag"] {
            let preset = TemplateRegistry::builtin().get(name).unwrap();
            let svg = parse_fragment(&preset.markup).unwrap();
            let dynamic = svg.find_all(&|el| el.attr("data-dynamic") == Some("true"));
            assert_eq!(dynamic.len(), 1, "{name}");
        }
    }

    #[test]
    fn custom_preset_is_unregistered() {
        let preset = TemplatePreset::custom("<svg/>", StickerConfig::new());
        assert_eq!(preset.name, CUSTOM_TEMPLATE_NAME);
        assert!(TemplateRegistry::builtin().get(CUSTOM_TEMPLATE_NAME).is_none());
    }
}
