//! CSS keyframe animation descriptors and the style mutations that apply them.
//!
//! Animation state lives entirely in the node's inline style: the composed
//! `animation` shorthand plus an optional `animation-play-state`. Nothing is
//! tracked elsewhere, so pausing a node that is not animated is harmless.
//!
//! The keyframe definitions themselves are a document-global stylesheet,
//! injected once per document under [`STYLESHEET_ID`].

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::document::Document;
use crate::markup::{SvgElement, format_number};

/// Id of the injected keyframe stylesheet.
pub const STYLESHEET_ID: &str = "sticker-kit-animations";

/// Keyframe definitions for every animation kind except `none`.
pub const KEYFRAMES_CSS: &str = r#"
@keyframes bounce {
  0%, 20%, 50%, 80%, 100% { transform: translateY(0); }
  40% { transform: translateY(-30px); }
  60% { transform: translateY(-15px); }
}

@keyframes rotate {
  from { transform: rotate(0deg); }
  to { transform: rotate(360deg); }
}

@keyframes pulse {
  0% { transform: scale(1); }
  50% { transform: scale(1.1); }
  100% { transform: scale(1); }
}

@keyframes shake {
  0%, 100% { transform: translateX(0); }
  10%, 30%, 50%, 70%, 90% { transform: translateX(-10px); }
  20%, 40%, 60%, 80% { transform: translateX(10px); }
}

@keyframes fade {
  0% { opacity: 0; }
  100% { opacity: 1; }
}
"#;

pub const DEFAULT_DURATION_MS: f64 = 1000.0;
pub const DEFAULT_DELAY_MS: f64 = 0.0;
pub const DEFAULT_EASING: &str = "ease-in-out";

const ANIMATION: &str = "animation";
const PLAY_STATE: &str = "animation-play-state";

// ============================================================================
// AnimationKind
// ============================================================================

/// The named keyframe sequence to run.
///
/// [`AnimationKind::None`] is a sentinel meaning "clear the animation".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "tsify", derive(tsify_next::Tsify))]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    Bounce,
    Rotate,
    Pulse,
    Shake,
    Fade,
    None,
}

impl AnimationKind {
    /// The keyframe name used in CSS.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bounce => "bounce",
            Self::Rotate => "rotate",
            Self::Pulse => "pulse",
            Self::Shake => "shake",
            Self::Fade => "fade",
            Self::None => "none",
        }
    }
}

impl fmt::Display for AnimationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// IterationCount
// ============================================================================

/// How many times the animation runs: a count, or `infinite`.
///
/// Serializes as a JSON number or the string `"infinite"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IterationCount {
    Count(f64),
    Infinite,
}

impl Default for IterationCount {
    fn default() -> Self {
        Self::Count(1.0)
    }
}

impl fmt::Display for IterationCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => f.write_str(&format_number(*n)),
            Self::Infinite => f.write_str("infinite"),
        }
    }
}

impl From<u32> for IterationCount {
    fn from(count: u32) -> Self {
        Self::Count(count.into())
    }
}

impl Serialize for IterationCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Count(n) => serializer.serialize_f64(*n),
            Self::Infinite => serializer.serialize_str("infinite"),
        }
    }
}

impl<'de> Deserialize<'de> for IterationCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CountVisitor;

        impl Visitor<'_> for CountVisitor {
            type Value = IterationCount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number or \"infinite\"")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(IterationCount::Count(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(IterationCount::Count(v as f64))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(IterationCount::Count(v as f64))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                if v == "infinite" {
                    Ok(IterationCount::Infinite)
                } else {
                    Err(E::invalid_value(de::Unexpected::Str(v), &self))
                }
            }
        }

        deserializer.deserialize_any(CountVisitor)
    }
}

// ============================================================================
// AnimationConfig
// ============================================================================

/// Describes one animation run. Unset fields fall back to
/// [`DEFAULT_DURATION_MS`], [`DEFAULT_EASING`], [`DEFAULT_DELAY_MS`] and a
/// single iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "tsify", derive(tsify_next::Tsify))]
#[serde(rename_all = "camelCase")]
pub struct AnimationConfig {
    #[serde(rename = "type")]
    pub kind: AnimationKind,

    /// Duration in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    /// Delay in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "jsonschema", schemars(with = "Option<serde_json::Value>"))]
    #[cfg_attr(feature = "tsify", tsify(type = "number | \"infinite\""))]
    pub iteration_count: Option<IterationCount>,

    /// CSS timing function.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub easing: Option<String>,
}

impl AnimationConfig {
    /// An animation of `kind` with every other field defaulted.
    pub const fn new(kind: AnimationKind) -> Self {
        Self {
            kind,
            duration: None,
            delay: None,
            iteration_count: None,
            easing: None,
        }
    }

    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration = Some(duration_ms);
        self
    }

    pub fn with_delay(mut self, delay_ms: f64) -> Self {
        self.delay = Some(delay_ms);
        self
    }

    pub fn with_iteration_count(mut self, count: impl Into<IterationCount>) -> Self {
        self.iteration_count = Some(count.into());
        self
    }

    pub fn infinite(mut self) -> Self {
        self.iteration_count = Some(IterationCount::Infinite);
        self
    }

    pub fn with_easing(mut self, easing: impl Into<String>) -> Self {
        self.easing = Some(easing.into());
        self
    }

    /// Composes the `animation` shorthand:
    /// `"{type} {duration}ms {easing} {delay}ms {iteration-count}"`.
    ///
    /// ```
    /// use sticker_kit::{AnimationConfig, AnimationKind};
    ///
    /// let bounce = AnimationConfig::new(AnimationKind::Bounce).with_duration(500.0);
    /// assert_eq!(bounce.shorthand(), "bounce 500ms ease-in-out 0ms 1");
    /// ```
    pub fn shorthand(&self) -> String {
        format!(
            "{} {}ms {} {}ms {}",
            self.kind,
            format_number(self.duration.unwrap_or(DEFAULT_DURATION_MS)),
            self.easing.as_deref().unwrap_or(DEFAULT_EASING),
            format_number(self.delay.unwrap_or(DEFAULT_DELAY_MS)),
            self.iteration_count.unwrap_or_default(),
        )
    }
}

// ============================================================================
// Style mutations
// ============================================================================

/// Applies an animation to `node`, injecting the keyframe stylesheet into
/// `document` if it is not there yet.
///
/// An absent animation or [`AnimationKind::None`] clears any existing one.
/// Assigning the shorthand resets the play state, as CSS shorthands do.
pub fn apply(node: &mut SvgElement, animation: Option<&AnimationConfig>, document: &dyn Document) {
    let Some(animation) = animation.filter(|a| a.kind != AnimationKind::None) else {
        clear(node);
        return;
    };

    node.remove_style_property(PLAY_STATE);
    node.set_style_property(ANIMATION, &animation.shorthand());

    ensure_keyframes(document);
}

/// Removes the animation and its play state from `node`.
pub fn clear(node: &mut SvgElement) {
    node.remove_style_property(ANIMATION);
    node.remove_style_property(PLAY_STATE);
}

/// Sets the play state to `paused`. The shorthand is left untouched.
pub fn pause(node: &mut SvgElement) {
    node.set_style_property(PLAY_STATE, "paused");
}

/// Sets the play state to `running`. The shorthand is left untouched.
pub fn resume(node: &mut SvgElement) {
    node.set_style_property(PLAY_STATE, "running");
}

/// Injects the keyframe stylesheet unless an element with
/// [`STYLESHEET_ID`] already exists.
///
/// This is a check-then-insert on the document and assumes a single-threaded
/// host. Returns true if the stylesheet was injected by this call.
pub fn ensure_keyframes(document: &dyn Document) -> bool {
    if document.contains_element_id(STYLESHEET_ID) {
        tracing::trace!(id = STYLESHEET_ID, "keyframe stylesheet already present");
        return false;
    }

    document.append_style(STYLESHEET_ID, KEYFRAMES_CSS);
    tracing::trace!(id = STYLESHEET_ID, "injected keyframe stylesheet");
    true
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemoryDocument;
    use pretty_assertions::assert_eq;

    fn node() -> SvgElement {
        SvgElement::new("svg")
    }

    #[test]
    fn shorthand_uses_defaults() {
        let config = AnimationConfig::new(AnimationKind::Rotate);
        assert_eq!(config.shorthand(), "rotate 1000ms ease-in-out 0ms 1");
    }

    #[test]
    fn shorthand_uses_every_field() {
        let config = AnimationConfig::new(AnimationKind::Shake)
            .with_duration(250.0)
            .with_delay(100.0)
            .with_easing("linear")
            .infinite();
        assert_eq!(config.shorthand(), "shake 250ms linear 100ms infinite");

        let config = AnimationConfig::new(AnimationKind::Fade).with_iteration_count(3);
        assert_eq!(config.shorthand(), "fade 1000ms ease-in-out 0ms 3");
    }

    #[test]
    fn apply_sets_shorthand_and_injects_keyframes() {
        let doc = MemoryDocument::new();
        let mut el = node();

        apply(&mut el, Some(&AnimationConfig::new(AnimationKind::Bounce)), &doc);

        assert_eq!(
            el.style_property("animation").as_deref(),
            Some("bounce 1000ms ease-in-out 0ms 1")
        );
        assert!(doc.contains_element_id(STYLESHEET_ID));
        assert_eq!(doc.style_count(), 1);
    }

    #[test]
    fn keyframes_are_injected_once() {
        let doc = MemoryDocument::new();
        let mut a = node();
        let mut b = node();

        apply(&mut a, Some(&AnimationConfig::new(AnimationKind::Pulse)), &doc);
        apply(&mut b, Some(&AnimationConfig::new(AnimationKind::Fade)), &doc);

        assert_eq!(doc.style_count(), 1);
        assert!(!ensure_keyframes(&doc));
    }

    #[test]
    fn none_and_absent_clear() {
        let doc = MemoryDocument::new();
        let mut el = node();
        apply(&mut el, Some(&AnimationConfig::new(AnimationKind::Bounce)), &doc);
        pause(&mut el);

        apply(&mut el, Some(&AnimationConfig::new(AnimationKind::None)), &doc);
        assert_eq!(el.style_property("animation"), None);
        assert_eq!(el.style_property("animation-play-state"), None);

        apply(&mut el, Some(&AnimationConfig::new(AnimationKind::Bounce)), &doc);
        apply(&mut el, None, &doc);
        assert_eq!(el.style_property("animation"), None);
    }

    #[test]
    fn none_does_not_inject_keyframes() {
        let doc = MemoryDocument::new();
        let mut el = node();
        apply(&mut el, Some(&AnimationConfig::new(AnimationKind::None)), &doc);
        assert_eq!(doc.style_count(), 0);
    }

    #[test]
    fn pause_and_resume_only_touch_play_state() {
        let doc = MemoryDocument::new();
        let mut el = node();
        let config = AnimationConfig::new(AnimationKind::Bounce).with_duration(500.0);
        apply(&mut el, Some(&config), &doc);

        pause(&mut el);
        assert_eq!(el.style_property("animation").as_deref(), Some("bounce 500ms ease-in-out 0ms 1"));
        assert_eq!(el.style_property("animation-play-state").as_deref(), Some("paused"));

        resume(&mut el);
        assert_eq!(el.style_property("animation").as_deref(), Some("bounce 500ms ease-in-out 0ms 1"));
        assert_eq!(el.style_property("animation-play-state").as_deref(), Some("running"));
    }

    #[test]
    fn reapplying_resets_play_state() {
        let doc = MemoryDocument::new();
        let mut el = node();
        apply(&mut el, Some(&AnimationConfig::new(AnimationKind::Bounce)), &doc);
        pause(&mut el);
        apply(&mut el, Some(&AnimationConfig::new(AnimationKind::Rotate)), &doc);
        assert_eq!(el.style_property("animation-play-state"), None);
    }

    #[test]
    fn pausing_unanimated_node_is_harmless() {
        let mut el = node();
        pause(&mut el);
        resume(&mut el);
        clear(&mut el);
        assert!(!el.has_attr("style"));
    }

    #[test]
    fn iteration_count_serde() {
        let json = serde_json::to_string(&IterationCount::Infinite).unwrap();
        assert_eq!(json, "\"infinite\"");
        let parsed: IterationCount = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, IterationCount::Count(3.0));
        assert!(serde_json::from_str::<IterationCount>("\"forever\"").is_err());
    }

    #[test]
    fn config_serializes_type_key() {
        let json = serde_json::to_string(&AnimationConfig::new(AnimationKind::Bounce)).unwrap();
        assert_eq!(json, r#"{"type":"bounce"}"#);
    }
}
