//! # Barcode and QR Generation
//!
//! Rasterizes the receipt's Code128 barcode and QR symbols from string
//! payloads. Both are deterministic pure functions of their input with zero
//! quiet-space padding; the native module rasters are scaled up by fixed
//! integer factors so the bars stay crisp when the layout places them.

use barcoders::sym::code128::Code128;
use image::{GrayImage, Luma};
use qrcode::{EcLevel, QrCode};

use crate::error::RecuerdoError;

/// Integer upscale applied to the native Code128 raster, both axes.
pub const BARCODE_SCALE: u32 = 3;
/// Rows in the native Code128 raster (1 px per module horizontally).
pub const BARCODE_NATIVE_HEIGHT: u32 = 32;
/// Integer upscale applied to the native QR raster, both axes.
pub const QR_SCALE: u32 = 10;

/// Encode a payload as a Code128 barcode image.
///
/// Code128 requires a character set prefix; Set B supports the widest range
/// of printable characters. Fails with [`RecuerdoError::Encoding`] on
/// non-ASCII payloads or when the encoder produces no modules.
pub fn barcode(payload: &str) -> Result<GrayImage, RecuerdoError> {
    if !payload.is_ascii() {
        return Err(RecuerdoError::Encoding(format!(
            "Code128 payload must be ASCII: {:?}",
            payload
        )));
    }

    let prefixed = format!("\u{0181}{}", payload);
    let encoded = Code128::new(&prefixed)
        .map_err(|e| RecuerdoError::Encoding(format!("Code128 rejected payload: {}", e)))?
        .encode();
    if encoded.is_empty() {
        return Err(RecuerdoError::Encoding(
            "Code128 produced no modules".to_string(),
        ));
    }

    let width = encoded.len() as u32 * BARCODE_SCALE;
    let height = BARCODE_NATIVE_HEIGHT * BARCODE_SCALE;
    let mut img = GrayImage::from_pixel(width, height, Luma([255]));
    for (module_x, &module) in encoded.iter().enumerate() {
        if module == 1 {
            for dx in 0..BARCODE_SCALE {
                let x = module_x as u32 * BARCODE_SCALE + dx;
                for y in 0..height {
                    img.put_pixel(x, y, Luma([0]));
                }
            }
        }
    }
    Ok(img)
}

/// Encode a payload as a QR symbol at error-correction level M.
///
/// Unused by the receipt layout itself but part of the same service; the
/// CLI exposes it directly.
pub fn qr(payload: &str) -> Result<GrayImage, RecuerdoError> {
    let code = QrCode::with_error_correction_level(payload, EcLevel::M)
        .map_err(|e| RecuerdoError::Encoding(format!("QR encoding failed: {}", e)))?;

    let modules = code.width();
    let size = modules as u32 * QR_SCALE;
    let mut img = GrayImage::from_pixel(size, size, Luma([255]));
    for qy in 0..modules {
        for qx in 0..modules {
            if code[(qx, qy)] == qrcode::Color::Dark {
                for dy in 0..QR_SCALE {
                    for dx in 0..QR_SCALE {
                        img.put_pixel(
                            qx as u32 * QR_SCALE + dx,
                            qy as u32 * QR_SCALE + dy,
                            Luma([0]),
                        );
                    }
                }
            }
        }
    }
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_barcode_dimensions_are_scaled() {
        let img = barcode("581234567890").unwrap();
        assert_eq!(img.width() % BARCODE_SCALE, 0);
        assert_eq!(img.height(), BARCODE_NATIVE_HEIGHT * BARCODE_SCALE);
        // Bars and spaces both present
        assert!(img.pixels().any(|p| p[0] == 0));
        assert!(img.pixels().any(|p| p[0] == 255));
    }

    #[test]
    fn test_barcode_is_deterministic() {
        let a = barcode("100000000000").unwrap();
        let b = barcode("100000000000").unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_barcode_bars_span_full_height() {
        let img = barcode("42").unwrap();
        // Column 0 is the start pattern: a bar from top to bottom
        assert!((0..img.height()).all(|y| img.get_pixel(0, y)[0] == 0));
    }

    #[test]
    fn test_barcode_rejects_non_ascii() {
        let err = barcode("señal").unwrap_err();
        assert!(matches!(err, RecuerdoError::Encoding(_)));
    }

    #[test]
    fn test_qr_is_square_and_scaled() {
        let img = qr("https://example.invalid/recuerdo").unwrap();
        assert_eq!(img.width(), img.height());
        assert_eq!(img.width() % QR_SCALE, 0);
        assert!(img.pixels().any(|p| p[0] == 0));
    }

    #[test]
    fn test_qr_accepts_utf8() {
        assert!(qr("recuerdo más allá").is_ok());
    }
}
