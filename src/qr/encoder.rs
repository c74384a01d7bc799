//! QR code PNG encoder.
//!
//! Symbol construction is delegated to the `qrcode` crate; this module only
//! parses the colors, paints the module matrix onto a pixel buffer and
//! encodes it as PNG.
//!
//! # Design Decisions
//!
//! - **Fixed error correction**: symbols always use level L, and `qrcode`
//!   picks the smallest version (1-40) that fits the content.
//!
//! - **Variable quiet zone**: the border is painted here rather than by the
//!   `qrcode` renderer, whose quiet zone is fixed at four modules.
//!
//! - **Alpha only when asked**: output is RGB unless one of the colors is
//!   translucent, which keeps the common black-on-white PNG small.

use std::io::{Cursor, Seek, Write};

use bytes::Bytes;
use image::{ImageBuffer, ImageFormat, Pixel, Rgb, RgbImage, Rgba, RgbaImage};
use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode};
use tracing::debug;

use crate::error::EncodingError;

use super::request::GenerationRequest;

/// Content type of every image produced by [`QrEncoder`].
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// Error-correction level used for every symbol.
pub const ERROR_CORRECTION: EcLevel = EcLevel::L;

// =============================================================================
// QR Encoder
// =============================================================================

/// Renders validated generation requests to PNG bytes.
///
/// # Example
///
/// ```
/// use qrgen_server::qr::{GenerationRequest, QrEncoder};
///
/// let encoder = QrEncoder::new();
/// let png = encoder.encode(&GenerationRequest::new("https://example.com")).unwrap();
/// assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
/// ```
#[derive(Debug, Clone, Default)]
pub struct QrEncoder {}

impl QrEncoder {
    /// Create a new QR encoder.
    pub fn new() -> Self {
        Self {}
    }

    /// Build the symbol for `request.content` and render it as PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The content exceeds the capacity of a version 40 symbol
    /// - Either color cannot be parsed
    /// - PNG encoding fails
    pub fn encode(&self, request: &GenerationRequest) -> Result<Bytes, EncodingError> {
        let foreground = parse_color("foreground", &request.foreground_color)?;
        let background = parse_color("background", &request.background_color)?;

        let code = build_symbol(&request.content)?;

        debug!(
            version = ?code.version(),
            modules = code.width(),
            module_size = request.module_size,
            border_width = request.border_width,
            "Built QR symbol"
        );

        let raster = rasterize(
            &code,
            request.module_size,
            request.border_width,
            foreground,
            background,
        );

        let mut output = Vec::new();
        raster
            .write_png(&mut Cursor::new(&mut output))
            .map_err(|e| EncodingError::Image(e.to_string()))?;

        Ok(Bytes::from(output))
    }
}

// =============================================================================
// Utility Functions
// =============================================================================

/// Parse a CSS-style color into RGBA bytes.
pub fn parse_color(field: &'static str, value: &str) -> Result<[u8; 4], EncodingError> {
    csscolorparser::parse(value.trim())
        .map(|c| c.to_rgba8())
        .map_err(|e| EncodingError::InvalidColor {
            field,
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Smallest symbol at [`ERROR_CORRECTION`] that holds `content`.
fn build_symbol(content: &str) -> Result<QrCode, EncodingError> {
    QrCode::with_error_correction_level(content.as_bytes(), ERROR_CORRECTION).map_err(|e| match e {
        QrError::DataTooLong => EncodingError::DataTooLong {
            length: content.len(),
        },
        other => EncodingError::Symbol(other.to_string()),
    })
}

fn side_length(modules: u32, module_size: u32, border_width: u32) -> u32 {
    (modules + 2 * border_width) * module_size
}

/// Pixel buffer in its final color type.
#[derive(Debug)]
enum Raster {
    /// Both colors opaque
    Rgb(RgbImage),

    /// At least one color carries alpha
    Rgba(RgbaImage),
}

impl Raster {
    fn write_png<W: Write + Seek>(&self, writer: &mut W) -> image::ImageResult<()> {
        match self {
            Raster::Rgb(pixels) => pixels.write_to(writer, ImageFormat::Png),
            Raster::Rgba(pixels) => pixels.write_to(writer, ImageFormat::Png),
        }
    }
}

/// Paint the module matrix, surrounded by `border_width` light modules.
///
/// Opaque colors are painted straight into an RGB buffer; only translucent
/// colors pay for the alpha channel.
fn rasterize(
    code: &QrCode,
    module_size: u32,
    border_width: u32,
    foreground: [u8; 4],
    background: [u8; 4],
) -> Raster {
    if foreground[3] == u8::MAX && background[3] == u8::MAX {
        let [fr, fg, fb, _] = foreground;
        let [br, bg, bb, _] = background;
        Raster::Rgb(paint(
            code,
            module_size,
            border_width,
            Rgb([fr, fg, fb]),
            Rgb([br, bg, bb]),
        ))
    } else {
        Raster::Rgba(paint(
            code,
            module_size,
            border_width,
            Rgba(foreground),
            Rgba(background),
        ))
    }
}

fn paint<P: Pixel<Subpixel = u8>>(
    code: &QrCode,
    module_size: u32,
    border_width: u32,
    dark: P,
    light: P,
) -> ImageBuffer<P, Vec<u8>> {
    let modules = code.width() as u32;
    let colors = code.to_colors();
    let side = side_length(modules, module_size, border_width);

    ImageBuffer::from_fn(side, side, |px, py| {
        let mx = (px / module_size).checked_sub(border_width);
        let my = (py / module_size).checked_sub(border_width);

        match (mx, my) {
            (Some(mx), Some(my))
                if mx < modules
                    && my < modules
                    && colors[(my * modules + mx) as usize] == Color::Dark =>
            {
                dark
            }
            _ => light,
        }
    })
}

// =============================================================================
// Tests
// =============================================================================
