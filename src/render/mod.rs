//! # Receipt Composition
//!
//! Composes an [`Entry`], its processed photo and its barcode into the
//! final receipt raster. The renderer owns a growable 1-bit buffer with a
//! vertical cursor; every element appends rows, then the composite is
//! trimmed, optionally blurred (ink bleed) and clipped through the torn
//! edge.
//!
//! ```text
//! Entry + processed photo
//!        │
//!        ▼
//!  header / dividers / metadata / content / item rows / footer
//!        │                                   (1-bit buffer)
//!        ▼
//!  grayscale composite ──► ink bleed blur (display only)
//!        │
//!        ▼
//!  torn-edge clip ──► RGBA receipt
//! ```
//!
//! Composition never fails: an absent photo skips the image block, a
//! barcode encoding failure drops only the barcode image. The display
//! render (`ink_bleed: true`) and the archival render (`ink_bleed: false`)
//! share everything but the blur.

pub mod dither;
pub mod font;

use std::collections::HashMap;

use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{GrayImage, ImageEncoder, Luma, RgbaImage};
use rand::Rng;

use crate::codes;
use crate::entry::Entry;
use crate::error::RecuerdoError;
use crate::tear::{self, TearParams};
use font::{FontMetrics, ReceiptFont, generate_glyph};

/// Total paper width in logical units.
pub const PAPER_WIDTH: usize = 320;
/// Printable area width.
pub const PRINT_WIDTH: usize = 288;
/// Side margin in units.
const SIDE_MARGIN: usize = 16;
/// Top margin; keeps the torn top edge clear of the header.
const TOP_MARGIN: usize = 16;
/// Blank feed below the footer, mirrored margin for the bottom tear.
const BOTTOM_FEED: usize = 16;

/// Tallest the processed photo may render.
const MAX_PHOTO_HEIGHT: usize = 240;
/// Tallest the barcode may render.
const BARCODE_MAX_HEIGHT: usize = 72;
/// Extra pixels between letters of the barcode digit row.
const DIGIT_TRACKING: usize = 6;
/// Gaussian sigma for the cosmetic ink-bleed blur.
const INK_BLEED_SIGMA: f32 = 0.9;
/// Vertical gap between stacked text lines.
const LINE_GAP: usize = 4;

const TITLE: &str = "RECUERDO MART";
const TAGLINE: &str = "24H MEMORY PRINTING";
/// Dash repetitions forming a section divider.
const DIVIDER_DASHES: usize = 40;

/// Horizontal placement of a text run within the printable area.
#[derive(Debug, Clone, Copy)]
enum Align {
    Left,
    Center,
    Right,
}

/// Stateful receipt compositor. One instance per render.
pub struct ReceiptRenderer {
    /// Print-area pixels, 1 = ink. Rows grow on demand.
    buffer: Vec<u8>,
    height: usize,
    y: usize,
    glyph_cache: HashMap<(ReceiptFont, char), Vec<u8>>,
}

/// Render the receipt for an entry, seeding the torn edge from system
/// entropy.
///
/// `ink_bleed: true` is the on-screen display variant; `false` is the
/// archival variant that gets persisted. Absent inputs degrade the layout,
/// they never abort it.
pub fn render(entry: &Entry, processed: Option<&GrayImage>, ink_bleed: bool) -> RgbaImage {
    render_with_rng(entry, processed, ink_bleed, &mut rand::rng())
}

/// Render with an injected random source (seedable for tests). Randomness
/// only affects the torn edge.
pub fn render_with_rng(
    entry: &Entry,
    processed: Option<&GrayImage>,
    ink_bleed: bool,
    rng: &mut impl Rng,
) -> RgbaImage {
    let mut renderer = ReceiptRenderer::new();
    renderer.compose(entry, processed);
    renderer.finalize(ink_bleed, rng)
}

/// Render and encode as PNG (the archival storage format).
pub fn render_png(
    entry: &Entry,
    processed: Option<&GrayImage>,
    ink_bleed: bool,
) -> Result<Vec<u8>, RecuerdoError> {
    encode_png(&render(entry, processed, ink_bleed))
}

/// Encode an RGBA composite as PNG bytes.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, RecuerdoError> {
    let mut png = Vec::new();
    let encoder = PngEncoder::new(&mut png);
    encoder.write_image(
        img.as_raw(),
        img.width(),
        img.height(),
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(png)
}

impl Default for ReceiptRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptRenderer {
    pub fn new() -> Self {
        let initial_height = 100;
        Self {
            buffer: vec![0u8; PRINT_WIDTH * initial_height],
            height: initial_height,
            y: 0,
            glyph_cache: HashMap::new(),
        }
    }

    /// Compose every receipt section into the buffer.
    fn compose(&mut self, entry: &Entry, processed: Option<&GrayImage>) {
        // Header
        self.draw_text(TITLE, ReceiptFont::Title, Align::Center);
        self.feed(2);
        self.draw_text(TAGLINE, ReceiptFont::Small, Align::Center);

        self.draw_divider();

        // Metadata
        self.draw_kv_row("DATE:", &entry.formatted_date(), ReceiptFont::Body);
        self.feed(2);
        self.draw_kv_row("TXN:", &entry.transaction_id, ReceiptFont::Body);

        self.draw_divider();

        // Content
        if let Some(img) = processed {
            self.draw_image(img, MAX_PHOTO_HEIGHT);
            self.feed(6);
        }
        if !entry.content.is_empty() {
            self.draw_text("MEMO:", ReceiptFont::Body, Align::Left);
            self.feed(LINE_GAP);
            let metrics = FontMetrics::for_font(ReceiptFont::Body);
            let max_chars = PRINT_WIDTH / metrics.char_width;
            for line in wrap_text(&entry.content.to_uppercase(), max_chars) {
                self.draw_text(&line, ReceiptFont::Body, Align::Left);
                self.feed(LINE_GAP);
            }
        }

        self.draw_divider();

        // Fixed item rows
        self.draw_kv_row("TIME SPENT", "1 MOMENT", ReceiptFont::Body);
        self.feed(2);
        self.draw_kv_row("VALUE", "PRICELESS", ReceiptFont::Body);

        self.draw_divider();

        // Footer: barcode image (dropped silently on encoding failure),
        // digit row, boilerplate, closing marker.
        if let Ok(code) = codes::barcode(&entry.barcode_string) {
            self.draw_image(&code, BARCODE_MAX_HEIGHT);
            self.feed(4);
        }
        self.draw_text_tracked(
            &entry.barcode_string,
            ReceiptFont::Body,
            Align::Center,
            DIGIT_TRACKING,
        );
        self.feed(6);
        let small = FontMetrics::for_font(ReceiptFont::Small);
        for line in wrap_text(&entry.footer_message, PRINT_WIDTH / small.char_width) {
            self.draw_text(&line, ReceiptFont::Small, Align::Center);
            self.feed(2);
        }
        self.feed(2);
        self.draw_text("* * *", ReceiptFont::Body, Align::Center);
    }

    /// Trim, add margins, blur if requested, clip through the torn edge.
    fn finalize(&mut self, ink_bleed: bool, rng: &mut impl Rng) -> RgbaImage {
        let content_height = self.y + BOTTOM_FEED;
        self.ensure_height(content_height);

        let total_w = PAPER_WIDTH as u32;
        let total_h = (TOP_MARGIN + content_height) as u32;
        let mut gray = GrayImage::from_pixel(total_w, total_h, Luma([255]));
        for y in 0..content_height {
            for x in 0..PRINT_WIDTH {
                if self.buffer[y * PRINT_WIDTH + x] != 0 {
                    gray.put_pixel((x + SIDE_MARGIN) as u32, (y + TOP_MARGIN) as u32, Luma([0]));
                }
            }
        }

        let composite = if ink_bleed {
            imageops::blur(&gray, INK_BLEED_SIGMA)
        } else {
            gray
        };

        tear::apply(&composite, &TearParams::default(), rng)
    }

    /// Ensure the buffer has rows up to `y` inclusive.
    fn ensure_height(&mut self, y: usize) {
        let needed = y + 1;
        if needed > self.height {
            let new_height = needed.max(self.height + 100);
            self.buffer.resize(PRINT_WIDTH * new_height, 0);
            self.height = new_height;
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, ink: bool) {
        if x >= PRINT_WIDTH {
            return;
        }
        self.ensure_height(y);
        self.buffer[y * PRINT_WIDTH + x] = ink as u8;
    }

    /// Advance the cursor over blank rows.
    fn feed(&mut self, rows: usize) {
        self.y += rows;
    }

    /// Get or generate a glyph for the given font and character.
    fn glyph(&mut self, font: ReceiptFont, ch: char) -> Vec<u8> {
        if let Some(glyph) = self.glyph_cache.get(&(font, ch)) {
            return glyph.to_vec();
        }
        let glyph = generate_glyph(font, ch);
        self.glyph_cache.insert((font, ch), glyph.clone());
        glyph
    }

    fn draw_text(&mut self, text: &str, font: ReceiptFont, align: Align) {
        self.draw_text_tracked(text, font, align, 0);
    }

    /// Draw one line of text with the given letter tracking, then advance
    /// the cursor by the line height. Empty text still advances (blank
    /// memo lines keep their vertical rhythm).
    fn draw_text_tracked(&mut self, text: &str, font: ReceiptFont, align: Align, tracking: usize) {
        let metrics = FontMetrics::for_font(font);
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            self.y += metrics.char_height;
            return;
        }

        let advance = metrics.char_width + tracking;
        let text_width = chars.len() * advance - tracking;
        let start_x = match align {
            Align::Left => 0,
            Align::Center => PRINT_WIDTH.saturating_sub(text_width) / 2,
            Align::Right => PRINT_WIDTH.saturating_sub(text_width),
        };

        self.ensure_height(self.y + metrics.char_height);
        for (i, &ch) in chars.iter().enumerate() {
            let glyph = self.glyph(font, ch);
            let gx = start_x + i * advance;
            for row in 0..metrics.char_height {
                for col in 0..metrics.char_width {
                    if glyph[row * metrics.char_width + col] != 0 {
                        self.set_pixel(gx + col, self.y + row, true);
                    }
                }
            }
        }
        self.y += metrics.char_height;
    }

    /// One row with the key at the left margin and the value right-justified.
    fn draw_kv_row(&mut self, key: &str, value: &str, font: ReceiptFont) {
        let row_y = self.y;
        self.draw_text(key, font, Align::Left);
        self.y = row_y;
        self.draw_text(value, font, Align::Right);
    }

    /// A section divider: dashes centered on their own line.
    fn draw_divider(&mut self) {
        self.feed(4);
        self.draw_text(&"-".repeat(DIVIDER_DASHES), ReceiptFont::Small, Align::Center);
        self.feed(4);
    }

    /// Blit a grayscale image, scaled nearest-neighbor to fit the print
    /// width and `max_height`, centered. No smoothing: binary pixels stay
    /// binary, and continuous-tone pixels go through ordered dithering.
    fn draw_image(&mut self, img: &GrayImage, max_height: usize) {
        let (w, h) = img.dimensions();
        if w == 0 || h == 0 {
            return;
        }

        let scale = (PRINT_WIDTH as f32 / w as f32).min(max_height as f32 / h as f32);
        let tw = ((w as f32 * scale).round() as u32).clamp(1, PRINT_WIDTH as u32);
        let th = ((h as f32 * scale).round() as u32).clamp(1, max_height as u32);
        let resized = imageops::resize(img, tw, th, FilterType::Nearest);

        let start_x = (PRINT_WIDTH - tw as usize) / 2;
        self.ensure_height(self.y + th as usize);
        for y in 0..th as usize {
            for x in 0..tw as usize {
                let v = resized.get_pixel(x as u32, y as u32)[0];
                let intensity = 1.0 - v as f32 / 255.0;
                if dither::should_print(x, y, intensity) {
                    self.set_pixel(start_x + x, self.y + y, true);
                }
            }
        }
        self.y += th as usize;
    }
}

/// Word-wrap text to `max_chars` columns. Words longer than a line are
/// hard-split; blank source lines survive as blank output lines.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for raw_line in text.lines() {
        if raw_line.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            let word_len = word.chars().count();

            if word_len > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let mut chunk = String::new();
                for ch in word.chars() {
                    chunk.push(ch);
                    if chunk.chars().count() == max_chars {
                        lines.push(std::mem::take(&mut chunk));
                    }
                }
                current = chunk;
                continue;
            }

            let current_len = current.chars().count();
            let needed = if current.is_empty() {
                word_len
            } else {
                current_len + 1 + word_len
            };
            if needed > max_chars {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
            } else {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn test_entry(content: &str) -> Entry {
        let mut rng = StdRng::seed_from_u64(99);
        Entry::with_rng(content, None, &mut rng)
    }

    #[test]
    fn test_wrap_text_basic() {
        let lines = wrap_text("THE QUICK BROWN FOX JUMPS", 10);
        assert_eq!(lines, vec!["THE QUICK", "BROWN FOX", "JUMPS"]);
    }

    #[test]
    fn test_wrap_text_hard_splits_long_words() {
        let lines = wrap_text("ABCDEFGHIJKLMNOP", 5);
        assert_eq!(lines, vec!["ABCDE", "FGHIJ", "KLMNO", "P"]);
    }

    #[test]
    fn test_wrap_text_preserves_blank_lines() {
        let lines = wrap_text("ONE\n\nTWO", 20);
        assert_eq!(lines, vec!["ONE", "", "TWO"]);
    }

    #[test]
    fn test_render_paper_width_is_fixed() {
        let entry = test_entry("memo");
        let mut rng = StdRng::seed_from_u64(1);
        let img = render_with_rng(&entry, None, false, &mut rng);
        assert_eq!(img.width(), PAPER_WIDTH as u32);
        assert!(img.height() > 0);
    }

    #[test]
    fn test_render_longer_memo_grows_receipt() {
        let short = test_entry("X");
        let long = test_entry(
            "a much longer memo that needs to wrap over several receipt lines to fit the column",
        );
        let mut rng_a = StdRng::seed_from_u64(2);
        let mut rng_b = StdRng::seed_from_u64(2);
        let a = render_with_rng(&short, None, false, &mut rng_a);
        let b = render_with_rng(&long, None, false, &mut rng_b);
        assert!(b.height() > a.height());
    }

    #[test]
    fn test_render_has_ink_and_paper() {
        let entry = test_entry("Coffee afternoon");
        let mut rng = StdRng::seed_from_u64(3);
        let img = render_with_rng(&entry, None, false, &mut rng);
        let opaque = |p: &image::Rgba<u8>| p[3] == 255;
        assert!(img.pixels().any(|p| opaque(p) && p[0] == 0));
        assert!(img.pixels().any(|p| opaque(p) && p[0] == 255));
    }

    #[test]
    fn test_archival_render_stays_binary() {
        let entry = test_entry("memo");
        let mut rng = StdRng::seed_from_u64(4);
        let img = render_with_rng(&entry, None, false, &mut rng);
        assert!(
            img.pixels()
                .filter(|p| p[3] == 255)
                .all(|p| p[0] == 0 || p[0] == 255)
        );
    }

    #[test]
    fn test_ink_bleed_introduces_gray() {
        let entry = test_entry("memo");
        let mut rng = StdRng::seed_from_u64(5);
        let img = render_with_rng(&entry, None, true, &mut rng);
        assert!(
            img.pixels()
                .filter(|p| p[3] == 255)
                .any(|p| p[0] > 0 && p[0] < 255)
        );
    }

    #[test]
    fn test_encode_png_round_trips() {
        let entry = test_entry("memo");
        let mut rng = StdRng::seed_from_u64(6);
        let img = render_with_rng(&entry, None, false, &mut rng);
        let png = encode_png(&img).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.width(), img.width());
        assert_eq!(decoded.height(), img.height());
    }
}
