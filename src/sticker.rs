//! Stateful sticker handles.

use std::rc::Rc;

use crate::animation::{self, AnimationConfig};
use crate::config::{StickerConfig, TextStyle};
use crate::customizer;
use crate::document::{Container, Document, SharedNode, share};
use crate::error::{Result, StickerError};
use crate::export::{self, SvgBlob};
use crate::markup::SvgElement;
use crate::raster::RasterImage;
use crate::registry::{TemplatePreset, TemplateRegistry};

// ============================================================================
// AttachTarget
// ============================================================================

/// Where to attach a sticker: a selector resolved by the document, or a
/// container the caller already holds.
pub enum AttachTarget {
    Selector(String),
    Container(Rc<dyn Container>),
}

impl From<&str> for AttachTarget {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_string())
    }
}

impl From<String> for AttachTarget {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

impl<C: Container + 'static> From<Rc<C>> for AttachTarget {
    fn from(container: Rc<C>) -> Self {
        Self::Container(container)
    }
}

impl From<Rc<dyn Container>> for AttachTarget {
    fn from(container: Rc<dyn Container>) -> Self {
        Self::Container(container)
    }
}

// ============================================================================
// StickerHandle
// ============================================================================

enum Mount {
    Detached,
    Attached(Rc<dyn Container>),
    Destroyed,
}

/// A live sticker: one graphic node bound to one configuration and template.
///
/// The node is always regenerated from `(template, config)` as a whole and
/// swapped in place; it is never patched field by field. Only the animation
/// wrappers touch the current node directly, and only its inline style.
///
/// Lifecycle: detached -> attached -> destroyed. After [`destroy`](Self::destroy)
/// every mutation is a silent no-op and exports fail with
/// [`StickerError::NotInitialized`].
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use sticker_kit::{AnimationConfig, AnimationKind, Document, MemoryDocument, StickerConfig, StickerHandle};
///
/// let doc = Rc::new(MemoryDocument::new());
/// let app = doc.add_container("app");
/// let document: Rc<dyn Document> = doc.clone();
///
/// let mut badge = StickerHandle::new(&document, "badge", Some(StickerConfig::new().with_text("NEW"))).unwrap();
/// badge.attach(app.clone()).unwrap();
///
/// badge.set_background_color("#e74c3c");
/// badge.set_animation(AnimationConfig::new(AnimationKind::Pulse).infinite());
///
/// assert!(app.to_markup().contains(">NEW</text>"));
/// assert_eq!(doc.style_count(), 1);
/// ```
pub struct StickerHandle {
    document: Rc<dyn Document>,
    template: TemplatePreset,
    config: StickerConfig,
    node: Option<SharedNode>,
    mount: Mount,
}

impl StickerHandle {
    /// Creates a handle from a registered template.
    ///
    /// The template's default config is merged with `config` (caller wins per
    /// field). Fails with [`StickerError::TemplateNotFound`] for unknown names.
    pub fn new(document: &Rc<dyn Document>, template_name: &str, config: Option<StickerConfig>) -> Result<Self> {
        let template = TemplateRegistry::builtin()
            .get(template_name)
            .cloned()
            .ok_or_else(|| StickerError::TemplateNotFound(template_name.to_string()))?;

        let config = match config {
            Some(config) => template.default_config.merged_with(&config),
            None => template.default_config.clone(),
        };

        Self::from_preset(document, template, config)
    }

    /// Creates a handle from caller markup without touching the registry.
    ///
    /// The synthesized preset is named `custom` and uses `config` as its
    /// default. Fails with [`StickerError::Template`] if the markup has no
    /// parseable `<svg>` root.
    pub fn from_custom_markup(
        document: &Rc<dyn Document>,
        markup: impl Into<String>,
        config: Option<StickerConfig>,
    ) -> Result<Self> {
        let config = config.unwrap_or_default();
        let template = TemplatePreset::custom(markup, config.clone());
        Self::from_preset(document, template, config)
    }

    fn from_preset(document: &Rc<dyn Document>, template: TemplatePreset, config: StickerConfig) -> Result<Self> {
        let node = render(document.as_ref(), &template, &config)?;
        tracing::debug!(template = %template.name, "created sticker");

        Ok(Self {
            document: document.clone(),
            template,
            config,
            node: Some(share(node)),
            mount: Mount::Detached,
        })
    }

    // ---- Accessors ----

    /// The current node, or `None` once destroyed.
    pub fn node(&self) -> Option<SharedNode> {
        self.node.clone()
    }

    /// A copy of the current configuration.
    pub fn config(&self) -> StickerConfig {
        self.config.clone()
    }

    pub fn template(&self) -> &TemplatePreset {
        &self.template
    }

    pub fn is_attached(&self) -> bool {
        matches!(self.mount, Mount::Attached(_))
    }

    pub fn is_destroyed(&self) -> bool {
        matches!(self.mount, Mount::Destroyed)
    }

    /// Serializes the current node as-is.
    pub fn to_markup(&self) -> Result<String> {
        let node = self.node.as_ref().ok_or(StickerError::NotInitialized)?;
        Ok(node.borrow().to_markup())
    }

    // ---- Attachment ----

    /// Appends the node to `target`.
    ///
    /// A selector that resolves to nothing fails with
    /// [`StickerError::ContainerNotFound`]. An attached node is moved: it is
    /// removed from its current parent and appended as the last child of
    /// `target`, which may be the same container.
    pub fn attach(&mut self, target: impl Into<AttachTarget>) -> Result<()> {
        let node = self.node.clone().ok_or(StickerError::NotInitialized)?;

        let container = match target.into() {
            AttachTarget::Container(container) => container,
            AttachTarget::Selector(selector) => self
                .document
                .query_selector(&selector)
                .ok_or(StickerError::ContainerNotFound(selector))?,
        };

        // Appending moves the node: it leaves any previous parent first.
        if let Mount::Attached(previous) = &self.mount {
            previous.remove_child(&node);
        }
        container.append_child(node);
        self.mount = Mount::Attached(container);
        tracing::debug!(template = %self.template.name, "attached sticker");
        Ok(())
    }

    // ---- Updates ----

    /// Merges `patch` into the config and rebuilds the node.
    ///
    /// When attached, the exact prior node is replaced in its parent, in the
    /// same position. If the prior node is no longer in that parent the
    /// handle becomes detached. A rebuild failure leaves the handle
    /// unchanged. No-op once destroyed.
    pub fn update(&mut self, patch: StickerConfig) -> Result<()> {
        let Some(old) = self.node.clone() else {
            return Ok(());
        };

        let config = self.config.merged_with(&patch);
        let node = share(render(self.document.as_ref(), &self.template, &config)?);

        if let Mount::Attached(parent) = &self.mount {
            if !parent.replace_child(&old, node.clone()) {
                tracing::debug!(template = %self.template.name, "node left its parent, now detached");
                self.mount = Mount::Detached;
            }
        }

        self.config = config;
        self.node = Some(node);
        tracing::debug!(template = %self.template.name, "updated sticker");
        Ok(())
    }

    /// Sets the text, keeping the current text color, size and family unless
    /// `style` overrides them.
    pub fn set_text(&mut self, text: impl Into<String>, style: Option<TextStyle>) {
        let patch = StickerConfig::new()
            .with_text(text)
            .with_text_style(self.config.text_style())
            .with_text_style(style.unwrap_or_default());
        self.apply_patch(patch);
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.apply_patch(StickerConfig::new().with_color(color));
    }

    pub fn set_background_color(&mut self, color: impl Into<String>) {
        self.apply_patch(StickerConfig::new().with_background_color(color));
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.apply_patch(StickerConfig::new().with_size(width, height));
    }

    /// Runs [`update`](Self::update) and logs a rebuild failure as a warning.
    fn apply_patch(&mut self, patch: StickerConfig) {
        if let Err(err) = self.update(patch) {
            tracing::warn!(template = %self.template.name, error = %err, "sticker rebuild failed");
        }
    }

    // ---- Animation ----

    /// Records `animation` in the config and applies it to the current node.
    pub fn set_animation(&mut self, animation: AnimationConfig) {
        let Some(node) = &self.node else { return };
        animation::apply(&mut node.borrow_mut(), Some(&animation), self.document.as_ref());
        self.config.animation = Some(animation);
    }

    /// Drops the animation from the config and clears it from the node.
    pub fn remove_animation(&mut self) {
        let Some(node) = &self.node else { return };
        animation::clear(&mut node.borrow_mut());
        self.config.animation = None;
    }

    pub fn pause_animation(&self) {
        if let Some(node) = &self.node {
            animation::pause(&mut node.borrow_mut());
        }
    }

    pub fn resume_animation(&self) {
        if let Some(node) = &self.node {
            animation::resume(&mut node.borrow_mut());
        }
    }

    // ---- Export ----

    /// The node as an `image/svg+xml` data URL.
    pub fn export_as_data_url(&self) -> Result<String> {
        let node = self.node.as_ref().ok_or(StickerError::NotInitialized)?;
        Ok(export::to_data_url(&node.borrow()))
    }

    /// The node as SVG bytes tagged with their MIME type.
    pub fn export_as_blob(&self) -> Result<SvgBlob> {
        let node = self.node.as_ref().ok_or(StickerError::NotInitialized)?;
        Ok(export::to_blob(&node.borrow()))
    }

    /// Asks the host to decode the exported data URL into a raster image.
    ///
    /// Resolves once decoding finishes. There is no cancellation or timeout;
    /// drop the future to abandon it.
    pub async fn export_as_raster_image(&self) -> Result<RasterImage> {
        let data_url = self.export_as_data_url()?;
        self.document.decode_image(&data_url).await
    }

    // ---- Lifecycle ----

    /// A new, detached handle built from the same template and a copy of the
    /// current config. Works for custom markup as well as registered names.
    pub fn clone_sticker(&self) -> Result<StickerHandle> {
        Self::from_preset(&self.document, self.template.clone(), self.config.clone())
    }

    /// Detaches the node if attached and releases it. Further mutations are
    /// no-ops.
    pub fn destroy(&mut self) {
        if let (Mount::Attached(parent), Some(node)) = (&self.mount, &self.node) {
            parent.remove_child(node);
        }
        self.node = None;
        self.mount = Mount::Destroyed;
        tracing::debug!(template = %self.template.name, "destroyed sticker");
    }
}

/// Builds the node for `(template, config)` and applies its animation.
fn render(document: &dyn Document, template: &TemplatePreset, config: &StickerConfig) -> Result<SvgElement> {
    let mut node = customizer::build(&template.markup, config)?;
    if config.animation.is_some() {
        animation::apply(&mut node, config.animation.as_ref(), document);
    }
    Ok(node)
}

// ============================================================================
// Tests
// ============================================================================
