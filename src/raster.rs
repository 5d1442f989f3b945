//! Raster decoding of exported stickers using resvg/usvg.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::error::{Result, StickerError};
use crate::export;

/// Largest raster, in pixels, that [`render_svg`] will allocate
/// (8192 x 8192, 256 MiB of RGBA).
pub const MAX_RASTER_PIXELS: u64 = 8192 * 8192;

// ============================================================================
// RasterImage
// ============================================================================

/// A decoded, displayable sticker image.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    /// Straight (non-premultiplied) RGBA pixels.
    pub data: RgbaImage,
}

impl RasterImage {
    pub fn width(&self) -> u32 {
        self.data.width()
    }

    pub fn height(&self) -> u32 {
        self.data.height()
    }

    /// Encodes the image as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Cursor::new(Vec::new());
        self.data
            .write_to(&mut bytes, ImageFormat::Png)
            .map_err(|e| StickerError::Decode(e.to_string()))?;
        Ok(bytes.into_inner())
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// Decodes an `image/svg+xml` data URL produced by
/// [`export::to_data_url`] into a raster image at its intrinsic size.
pub fn decode_data_url(data_url: &str) -> Result<RasterImage> {
    let markup = export::markup_from_data_url(data_url)?;
    render_svg(&markup)
}

/// Renders SVG markup at the size declared by its `width`/`height`
/// (or viewBox when those are absent).
///
/// Fails with [`StickerError::Decode`] if the image exceeds
/// [`MAX_RASTER_PIXELS`].
pub fn render_svg(markup: &str) -> Result<RasterImage> {
    let opts = Options::default();
    let tree = Tree::from_str(markup, &opts).map_err(|e| StickerError::Decode(e.to_string()))?;

    let size = tree.size().to_int_size();
    let pixels = u64::from(size.width()) * u64::from(size.height());
    if pixels > MAX_RASTER_PIXELS {
        return Err(StickerError::Decode(format!(
            "image too large: {}x{} exceeds {MAX_RASTER_PIXELS} pixels",
            size.width(),
            size.height()
        )));
    }

    let mut pixmap = Pixmap::new(size.width(), size.height())
        .ok_or_else(|| StickerError::Decode("image has zero size".into()))?;
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

    Ok(RasterImage {
        data: pixmap_to_rgba_image(&pixmap),
    })
}

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());

    for (pixel, out) in pixmap.pixels().iter().zip(img.pixels_mut()) {
        // tiny_skia stores premultiplied alpha
        let (r, g, b, a) = unpremultiply(pixel.red(), pixel.green(), pixel.blue(), pixel.alpha());
        *out = Rgba([r, g, b, a]);
    }

    img
}

fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        (0, 0, 0, 0)
    } else {
        let a_f = a as f32 / 255.0;
        (
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10"><rect width="20" height="10" fill="#00ff00"/></svg>"##;

    #[test]
    fn renders_at_intrinsic_size() {
        let img = render_svg(SQUARE).unwrap();
        assert_eq!((img.width(), img.height()), (20, 10));
        assert_eq!(img.data.get_pixel(5, 5).0, [0, 255, 0, 255]);
    }

    #[test]
    fn decodes_exported_data_url() {
        let url = export::to_data_url_from_markup(SQUARE);
        let img = decode_data_url(&url).unwrap();
        assert_eq!(img.width(), 20);
    }

    #[test]
    fn rejects_non_svg() {
        let err = decode_data_url("data:image/svg+xml;charset=utf-8,not%20svg").unwrap_err();
        assert!(matches!(err, StickerError::Decode(_)));
    }

    #[test]
    fn refuses_oversized_images() {
        let huge = r#"<svg xmlns="http://www.w3.org/2000/svg" width="200000" height="200000"/>"#;
        let err = render_svg(huge).unwrap_err();
        assert!(matches!(err, StickerError::Decode(ref msg) if msg.starts_with("image too large")));

        let at_cap = r#"<svg xmlns="http://www.w3.org/2000/svg" width="8193" height="8192"/>"#;
        assert!(render_svg(at_cap).is_err());
    }

    #[test]
    fn png_has_signature() {
        let png = render_svg(SQUARE).unwrap().to_png().unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn unpremultiply_transparent() {
        assert_eq!(unpremultiply(10, 10, 10, 0), (0, 0, 0, 0));
        assert_eq!(unpremultiply(128, 0, 0, 128), (255, 0, 0, 128));
    }
}
