//! Serializable sticker configuration.
//!
//! A [`StickerConfig`] describes every customization a template accepts. All
//! fields are optional and values are applied verbatim; nothing is validated.
//! Configs serialize to JSON with camelCase keys so a host can hand them
//! across a process or WASM boundary.
//!
//! # Example
//!
//! ```
//! use sticker_kit::StickerConfig;
//!
//! let base = StickerConfig::new().with_color("#FFD700").with_size(100.0, 100.0);
//! let patch = StickerConfig::new().with_color("#123456");
//!
//! let merged = base.merged_with(&patch);
//! assert_eq!(merged.color.as_deref(), Some("#123456"));
//! assert_eq!(merged.width, Some(100.0));
//!
//! let json = merged.to_json().unwrap();
//! assert_eq!(StickerConfig::from_json(&json).unwrap(), merged);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::animation::AnimationConfig;
use crate::error::Result;

/// Inline style overrides keyed by property name. `None` values are skipped
/// when applied.
pub type StyleOverrides = BTreeMap<String, Option<String>>;

// ============================================================================
// StickerConfig
// ============================================================================

/// Customization values for a sticker.
///
/// # JSON Format
///
/// ```json
/// {
///   "width": 120,
///   "backgroundColor": "#3498db",
///   "text": "NEW",
///   "fontSize": 24,
///   "animation": { "type": "pulse", "iterationCount": "infinite" },
///   "style": { "opacity": "0.8" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "tsify", derive(tsify_next::Tsify))]
#[serde(rename_all = "camelCase")]
pub struct StickerConfig {
    /// Root `width` attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,

    /// Root `height` attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    /// Fill applied to every fill-bearing element except the background.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Fill applied to the element tagged `data-background="true"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,

    /// Content of the dynamic text element.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,

    /// Animation descriptor. Replaced wholesale on merge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<AnimationConfig>,

    /// Root `class` attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    /// Inline style overrides on the root. Replaced wholesale on merge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleOverrides>,
}

impl StickerConfig {
    /// Creates an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the text color, size and family from a [`TextStyle`], leaving
    /// fields the style does not carry untouched.
    pub fn with_text_style(mut self, style: TextStyle) -> Self {
        if style.color.is_some() {
            self.text_color = style.color;
        }
        if style.font_size.is_some() {
            self.font_size = style.font_size;
        }
        if style.font_family.is_some() {
            self.font_family = style.font_family;
        }
        self
    }

    pub fn with_animation(mut self, animation: AnimationConfig) -> Self {
        self.animation = Some(animation);
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Adds one inline style override.
    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style
            .get_or_insert_with(StyleOverrides::new)
            .insert(property.into(), Some(value.into()));
        self
    }

    /// Shallow, field-by-field merge: every field present in `patch` wins,
    /// every absent one keeps the value from `self`.
    ///
    /// `animation` and `style` are replaced as a whole, never merged.
    pub fn merged_with(&self, patch: &StickerConfig) -> StickerConfig {
        fn pick<T: Clone>(base: &Option<T>, patch: &Option<T>) -> Option<T> {
            patch.as_ref().or(base.as_ref()).cloned()
        }

        StickerConfig {
            width: pick(&self.width, &patch.width),
            height: pick(&self.height, &patch.height),
            color: pick(&self.color, &patch.color),
            background_color: pick(&self.background_color, &patch.background_color),
            text: pick(&self.text, &patch.text),
            text_color: pick(&self.text_color, &patch.text_color),
            font_size: pick(&self.font_size, &patch.font_size),
            font_family: pick(&self.font_family, &patch.font_family),
            animation: pick(&self.animation, &patch.animation),
            class_name: pick(&self.class_name, &patch.class_name),
            style: pick(&self.style, &patch.style),
        }
    }

    /// The text styling fields currently set.
    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            color: self.text_color.clone(),
            font_size: self.font_size,
            font_family: self.font_family.clone(),
        }
    }

    /// Serializes the config to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the config to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// ============================================================================
// TextStyle
// ============================================================================

/// Optional styling passed alongside new text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "tsify", derive(tsify_next::Tsify))]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

// ============================================================================
// Tests
// ============================================================================
