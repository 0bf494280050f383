//! QR rendering for coupon codes.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use tracing::error;

use crate::domain::Error;
use crate::domain::ports::QrEncoder;

/// Minimum rendered edge length in pixels; small symbols scale up so phone
/// cameras can lock on.
const MIN_IMAGE_EDGE: u32 = 200;

/// Stateless QR encoder producing PNG bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngQrEncoder;

impl QrEncoder for PngQrEncoder {
    fn encode_png(&self, text: &str) -> Result<Vec<u8>, Error> {
        let symbol = QrCode::new(text.as_bytes()).map_err(|err| {
            error!(error = %err, "QR encoding failed");
            Error::internal("QR encoding failed")
        })?;

        let rendered = symbol
            .render::<Luma<u8>>()
            .min_dimensions(MIN_IMAGE_EDGE, MIN_IMAGE_EDGE)
            .build();

        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(rendered)
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|err| {
                error!(error = %err, "PNG encoding failed");
                Error::internal("PNG encoding failed")
            })?;
        Ok(buffer.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[rstest]
    fn encodes_a_coupon_code_as_png() {
        let bytes = PngQrEncoder
            .encode_png("CHIP-ABCDEFGH12")
            .expect("encode code");
        assert!(bytes.starts_with(PNG_MAGIC));
    }

    #[rstest]
    fn encoding_is_deterministic() {
        let first = PngQrEncoder.encode_png("CHIP-ABCDEFGH12").expect("encode");
        let second = PngQrEncoder.encode_png("CHIP-ABCDEFGH12").expect("encode");
        assert_eq!(first, second);
    }
}
