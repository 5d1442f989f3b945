//! sticker-kit: customizable, animatable SVG stickers
//!
//! A sticker is an SVG template recolored, labeled, resized and optionally
//! animated according to a [`StickerConfig`]. Each sticker is owned by a
//! [`StickerHandle`] that can attach it to a host [`Document`], update it
//! in place, export it and destroy it.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use sticker_kit::{BOUNCE, Document, MemoryDocument, StickerConfig, create_sticker};
//!
//! let doc = Rc::new(MemoryDocument::new());
//! let app = doc.add_container("app");
//! let document: Rc<dyn Document> = doc.clone();
//!
//! let config = StickerConfig::new().with_color("#123456").with_animation(BOUNCE);
//! let mut star = create_sticker(&document, "star", Some(config)).unwrap();
//! star.attach("#app").unwrap();
//! assert_eq!(app.len(), 1);
//!
//! star.set_text("Hi", None);
//! let url = star.export_as_data_url().unwrap();
//! assert!(url.starts_with("data:image/svg+xml"));
//!
//! star.destroy();
//! assert!(app.is_empty());
//! ```
//!
//! # Serializable Configs
//!
//! [`StickerConfig`] round-trips through camelCase JSON, matching what a
//! script host passes in:
//!
//! ```
//! use sticker_kit::StickerConfig;
//!
//! let config = StickerConfig::from_json(r##"{"backgroundColor":"#000","fontSize":12}"##).unwrap();
//! assert_eq!(config.font_size, Some(12.0));
//! ```

pub mod animation;
mod api;
mod config;
pub mod customizer;
mod document;
mod error;
pub mod export;
pub mod markup;
mod raster;
pub mod registry;
mod sticker;

pub use animation::{AnimationConfig, AnimationKind, IterationCount};
pub use api::{
    ANIMATION_PRESETS, BOUNCE, FADE, GLOBAL_NAME, Namespace, PULSE, ROTATE, SHAKE,
    create_custom_sticker, create_sticker, get_template, list_template_names, register_global,
};
pub use config::{StickerConfig, StyleOverrides, TextStyle};
pub use document::{
    Container, Document, MemoryContainer, MemoryDocument, SharedNode, StyleEntry, share,
};
pub use error::{Result, StickerError};
pub use export::SvgBlob;
pub use markup::{SvgElement, SvgNode};
pub use raster::{MAX_RASTER_PIXELS, RasterImage, decode_data_url, render_svg};
pub use registry::{TemplatePreset, TemplateRegistry};
pub use sticker::{AttachTarget, StickerHandle};
