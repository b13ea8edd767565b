//! QR symbol rendering.
//!
//! Encodes arbitrary text into a black-on-white PNG. Symbol version is chosen
//! by the encoder (smallest that fits); error correction, module size and
//! quiet zone come from [`QrRenderer`].

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{imageops, DynamicImage, GrayImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

use crate::error::WifiQrError;

pub const DEFAULT_BOX_SIZE: u32 = 10;
pub const DEFAULT_BORDER: u32 = 4;

/// Error-correction level, as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorCorrection {
    /// ~7% recoverable.
    L,
    /// ~15% recoverable.
    #[default]
    M,
    /// ~25% recoverable.
    Q,
    /// ~30% recoverable.
    H,
}

impl From<ErrorCorrection> for EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::L => EcLevel::L,
            ErrorCorrection::M => EcLevel::M,
            ErrorCorrection::Q => EcLevel::Q,
            ErrorCorrection::H => EcLevel::H,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrRenderer {
    pub ec_level: ErrorCorrection,
    /// Pixels per module edge.
    pub box_size: u32,
    /// Quiet zone width, in modules.
    pub border: u32,
}

impl Default for QrRenderer {
    fn default() -> Self {
        Self {
            ec_level: ErrorCorrection::M,
            box_size: DEFAULT_BOX_SIZE,
            border: DEFAULT_BORDER,
        }
    }
}

impl QrRenderer {
    pub fn with_box_size(box_size: u32) -> Self {
        Self {
            box_size,
            ..Self::default()
        }
    }

    /// Rasterises `data` into a grayscale bitmap including the quiet zone.
    ///
    /// Fails with [`WifiQrError::Encoding`] when `data` does not fit the
    /// largest symbol at the configured error-correction level.
    pub fn encode_symbol(&self, data: &str) -> Result<GrayImage, WifiQrError> {
        let code = QrCode::with_error_correction_level(data.as_bytes(), self.ec_level.into())?;

        let symbol = code
            .render::<Luma<u8>>()
            .quiet_zone(false)
            .module_dimensions(self.box_size, self.box_size)
            .build();

        let pad = self.border * self.box_size;
        let mut canvas = GrayImage::from_pixel(
            symbol.width() + 2 * pad,
            symbol.height() + 2 * pad,
            Luma([255]),
        );
        imageops::replace(&mut canvas, &symbol, i64::from(pad), i64::from(pad));

        Ok(canvas)
    }

    /// Encodes `data` as PNG bytes. The returned buffer starts at the PNG
    /// signature.
    pub fn render_png(&self, data: &str) -> Result<Vec<u8>, WifiQrError> {
        let bitmap = self.encode_symbol(data)?;

        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(bitmap).write_to(&mut buf, ImageFormat::Png)?;
        buf.set_position(0);

        tracing::debug!(bytes = buf.get_ref().len(), "rendered QR png");
        Ok(buf.into_inner())
    }

    /// PNG wrapped in a `data:` URI for inline `<img>` tags.
    pub fn render_data_uri(&self, data: &str) -> Result<String, WifiQrError> {
        let png = self.render_png(data)?;
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
    }
}

/// Renders `data` with the default policy (EC level M, 4-module border).
pub fn render(data: &str, box_size: u32) -> Result<Vec<u8>, WifiQrError> {
    QrRenderer::with_box_size(box_size).render_png(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn output_starts_with_png_signature() {
        let png = render("WIFI:T:WPA;S:Home;P:pw;H:false;;", DEFAULT_BOX_SIZE).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn rendering_is_deterministic() {
        let a = render("hello", 6).unwrap();
        let b = render("hello", 6).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn bitmap_has_border_and_box_size() {
        let renderer = QrRenderer::with_box_size(3);
        let bitmap = renderer.encode_symbol("short").unwrap();

        // "short" fits a version 1 symbol: 21 modules plus 4 each side.
        assert_eq!(bitmap.width(), (21 + 2 * DEFAULT_BORDER) * 3);
        assert_eq!(bitmap.width(), bitmap.height());

        // Quiet zone is white, the finder pattern corner is black.
        assert_eq!(bitmap.get_pixel(0, 0), &Luma([255]));
        let edge = DEFAULT_BORDER * 3;
        assert_eq!(bitmap.get_pixel(edge, edge), &Luma([0]));
        assert_eq!(bitmap.get_pixel(edge - 1, edge), &Luma([255]));
    }

    #[test]
    fn version_grows_with_data() {
        let renderer = QrRenderer::with_box_size(1);
        let small = renderer.encode_symbol("a").unwrap();
        let large = renderer.encode_symbol(&"a".repeat(200)).unwrap();
        assert!(large.width() > small.width());
    }

    #[test]
    fn oversized_data_is_an_encoding_error() {
        let err = render(&"x".repeat(3000), DEFAULT_BOX_SIZE).unwrap_err();
        assert!(matches!(err, WifiQrError::Encoding(_)));
    }

    #[test]
    fn data_uri_is_base64_png() {
        let uri = QrRenderer::default().render_data_uri("hello").unwrap();
        let encoded = uri.strip_prefix("data:image/png;base64,").unwrap();
        let png = STANDARD.decode(encoded).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }
}
