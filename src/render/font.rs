//! Bitmap font metrics and glyph generation for receipt composition.
//!
//! Uses the Spleen bitmap font family. Three sizes cover the receipt's
//! typography: 12x24 for the header title, 8x16 for body rows, 6x12 for
//! the tagline, dividers and footer boilerplate.

use spleen_font::{FONT_6X12, FONT_8X16, FONT_12X24, PSF2Font};

/// Font roles on the receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReceiptFont {
    /// 12x24 — header title.
    Title,
    /// 8x16 — metadata, memo and item rows.
    Body,
    /// 6x12 — tagline, dividers, footer fine print.
    Small,
}

/// Character cell dimensions for a font role.
#[derive(Debug, Clone, Copy)]
pub struct FontMetrics {
    pub char_width: usize,
    pub char_height: usize,
}

impl FontMetrics {
    pub fn for_font(font: ReceiptFont) -> FontMetrics {
        match font {
            ReceiptFont::Title => FontMetrics {
                char_width: 12,
                char_height: 24,
            },
            ReceiptFont::Body => FontMetrics {
                char_width: 8,
                char_height: 16,
            },
            ReceiptFont::Small => FontMetrics {
                char_width: 6,
                char_height: 12,
            },
        }
    }
}

/// Generate a glyph bitmap for a character.
///
/// Returns `char_width * char_height` bytes, 0 = paper, 1 = ink. Characters
/// missing from the font render as a box outline.
pub fn generate_glyph(font: ReceiptFont, ch: char) -> Vec<u8> {
    let metrics = FontMetrics::for_font(font);
    let mut glyph = vec![0u8; metrics.char_width * metrics.char_height];

    let data = match font {
        ReceiptFont::Title => FONT_12X24,
        ReceiptFont::Body => FONT_8X16,
        ReceiptFont::Small => FONT_6X12,
    };
    let mut spleen = PSF2Font::new(data).unwrap();
    let utf8 = ch.to_string();

    if let Some(spleen_glyph) = spleen.glyph_for_utf8(utf8.as_bytes()) {
        for (row_y, row) in spleen_glyph.enumerate() {
            for (col_x, on) in row.enumerate() {
                let idx = row_y * metrics.char_width + col_x;
                if idx < glyph.len() && col_x < metrics.char_width && on {
                    glyph[idx] = 1;
                }
            }
        }
    } else {
        draw_box(&mut glyph, metrics.char_width, metrics.char_height);
    }

    glyph
}

/// Draw a box outline, the stand-in for unknown characters.
fn draw_box(glyph: &mut [u8], width: usize, height: usize) {
    for x in 0..width {
        glyph[x] = 1;
        glyph[(height - 1) * width + x] = 1;
    }
    for y in 0..height {
        glyph[y * width] = 1;
        glyph[y * width + width - 1] = 1;
    }
}
