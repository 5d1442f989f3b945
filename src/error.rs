//! Error types shared by every sticker operation.

use thiserror::Error;

/// Errors returned by template lookup, markup building, attachment and export.
///
/// Every failure is scoped to the call that produced it. Nothing is retried
/// or recovered internally.
#[derive(Debug, Error)]
pub enum StickerError {
    /// No template is registered under the requested name.
    #[error("template \"{0}\" not found")]
    TemplateNotFound(String),

    /// An attachment selector resolved to nothing in the document.
    #[error("container \"{0}\" not found")]
    ContainerNotFound(String),

    /// The markup fragment could not be parsed or has no root `<svg>` element.
    #[error("invalid SVG template: {0}")]
    Template(String),

    /// The handle has no node (it was destroyed).
    #[error("sticker element not initialized")]
    NotInitialized,

    /// The host could not decode an exported image.
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// A configuration could not be converted to or from JSON.
    #[error("invalid configuration JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StickerError {
    /// Returns true for the two "input not found" failures: an unknown
    /// template name or an attachment target that resolves to nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TemplateNotFound(_) | Self::ContainerNotFound(_))
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, StickerError>;
