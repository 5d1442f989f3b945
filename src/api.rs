//! Factory functions, animation presets and the host namespace.

use std::rc::Rc;

use crate::animation::{AnimationConfig, AnimationKind};
use crate::config::StickerConfig;
use crate::document::Document;
use crate::error::Result;
use crate::registry::{TemplatePreset, TemplateRegistry};
use crate::sticker::StickerHandle;

/// Name of the global namespace registered by [`register_global`].
pub const GLOBAL_NAME: &str = "StickerKit";

pub const BOUNCE: AnimationConfig = AnimationConfig::new(AnimationKind::Bounce);
pub const ROTATE: AnimationConfig = AnimationConfig::new(AnimationKind::Rotate);
pub const PULSE: AnimationConfig = AnimationConfig::new(AnimationKind::Pulse);
pub const SHAKE: AnimationConfig = AnimationConfig::new(AnimationKind::Shake);
pub const FADE: AnimationConfig = AnimationConfig::new(AnimationKind::Fade);

/// The five animation shorthands, keyed by name.
pub const ANIMATION_PRESETS: [(&str, AnimationConfig); 5] = [
    ("bounce", BOUNCE),
    ("rotate", ROTATE),
    ("pulse", PULSE),
    ("shake", SHAKE),
    ("fade", FADE),
];

/// Creates a sticker from a registered template.
pub fn create_sticker(
    document: &Rc<dyn Document>,
    template_name: &str,
    config: Option<StickerConfig>,
) -> Result<StickerHandle> {
    StickerHandle::new(document, template_name, config)
}

/// Creates a sticker from caller-supplied SVG markup.
pub fn create_custom_sticker(
    document: &Rc<dyn Document>,
    markup: &str,
    config: Option<StickerConfig>,
) -> Result<StickerHandle> {
    StickerHandle::from_custom_markup(document, markup, config)
}

/// Names of every built-in template, in registration order.
pub fn list_template_names() -> Vec<&'static str> {
    TemplateRegistry::builtin().names()
}

pub fn get_template(name: &str) -> Option<&'static TemplatePreset> {
    TemplateRegistry::builtin().get(name)
}

// ============================================================================
// Namespace
// ============================================================================

type Factory = fn(&Rc<dyn Document>, &str, Option<StickerConfig>) -> Result<StickerHandle>;

/// The object a host exposes under [`GLOBAL_NAME`].
#[derive(Debug, Clone)]
pub struct Namespace {
    pub create: Factory,
    pub create_custom: Factory,
    pub templates: Vec<&'static str>,
    pub animations: [(&'static str, AnimationConfig); 5],
    /// The handle constructor itself.
    pub constructor: Factory,
}

impl Namespace {
    pub fn new() -> Self {
        Self {
            create: create_sticker,
            create_custom: create_custom_sticker,
            templates: list_template_names(),
            animations: ANIMATION_PRESETS,
            constructor: StickerHandle::new,
        }
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new()
    }
}

/// Defines the [`GLOBAL_NAME`] namespace on `document` unless something
/// already occupies it. Returns true if this call registered it.
///
/// Check-then-insert; assumes a single-threaded host.
pub fn register_global(document: &dyn Document) -> bool {
    if document.has_global(GLOBAL_NAME) {
        tracing::debug!(name = GLOBAL_NAME, "global already defined, leaving it alone");
        return false;
    }

    document.define_global(GLOBAL_NAME, Namespace::new());
    tracing::debug!(name = GLOBAL_NAME, "registered global namespace");
    true
}

// ============================================================================
// Tests
// ============================================================================
