//! # Thermal Effect Processor
//!
//! Converts a source photo into the look of a thermal print head: binary
//! black/white with dithering noise. The primary effect blends a full-frame
//! random noise field into the grayscale photo before a hard threshold, so
//! darker regions keep statistically more ink without any gray surviving.
//! The fallback is a plain high-contrast monochrome conversion for photos
//! the primary pipeline cannot handle.
//!
//! Callers run the ordered chain via [`process`] / [`process_bytes`]: try
//! the dithered effect, fall back to the simple effect, and degrade to
//! `None` (text-only receipt) when both fail. No failure here ever aborts
//! a render.

use image::{DynamicImage, GrayImage, Luma};
use rand::Rng;
use rayon::prelude::*;

use crate::error::RecuerdoError;
use crate::shader;

/// Default threshold for the dithered effect. Kept as a visible parameter;
/// the value is inherited, not derived.
pub const DEFAULT_INTENSITY: f32 = 0.6;

/// Contrast multiplier of the fallback effect.
const FALLBACK_CONTRAST: f32 = 1.5;
/// Brightness lift of the fallback effect.
const FALLBACK_BRIGHTNESS: f32 = 0.1;

/// Decode source photo bytes.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, RecuerdoError> {
    image::load_from_memory(bytes).map_err(|e| RecuerdoError::Decode(e.to_string()))
}

/// Apply the primary dithered thermal effect, seeded from system entropy.
///
/// The noise field is freshly randomized per invocation; run-to-run output
/// differs by design. Structural properties (binary-only luminance,
/// preserved dimensions) are stable.
pub fn dithered(photo: &DynamicImage, intensity: f32) -> Result<GrayImage, RecuerdoError> {
    dithered_with_rng(photo, intensity, &mut rand::rng())
}

/// Apply the primary dithered thermal effect with an injected random source.
///
/// Pipeline: perceptual grayscale, full-frame uniform noise field,
/// saturating additive blend, hard threshold at `intensity` (blended
/// luminance at or above the threshold prints white, everything else
/// black). Output dimensions equal input dimensions.
pub fn dithered_with_rng(
    photo: &DynamicImage,
    intensity: f32,
    rng: &mut impl Rng,
) -> Result<GrayImage, RecuerdoError> {
    let (width, height) = (photo.width(), photo.height());
    if width == 0 || height == 0 {
        return Err(RecuerdoError::FilterStage(
            "source photo has no pixels".to_string(),
        ));
    }

    let rgb = photo.to_rgb8();
    let pixels = (width as usize) * (height as usize);

    // One uniform sample per pixel, independent of photo content. Filled
    // sequentially so a seeded run is well-defined.
    let mut noise = vec![0.0f32; pixels];
    for sample in noise.iter_mut() {
        *sample = rng.random::<f32>();
    }

    let mut out = vec![0u8; pixels];
    out.par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.iter_mut().enumerate() {
                let p = rgb.get_pixel(x as u32, y as u32);
                let gray = shader::luma(p[0], p[1], p[2]);
                let blended = shader::clamp01(gray + noise[y * width as usize + x]);
                *px = if blended >= intensity { 255 } else { 0 };
            }
        });

    GrayImage::from_raw(width, height, out).ok_or_else(|| {
        RecuerdoError::FilterStage("threshold stage produced no output".to_string())
    })
}

/// Apply the simple fallback effect: higher-contrast monochrome conversion.
///
/// Deterministic: the same decoded photo always yields byte-identical
/// output.
pub fn simple(photo: &DynamicImage) -> Result<GrayImage, RecuerdoError> {
    let (width, height) = (photo.width(), photo.height());
    if width == 0 || height == 0 {
        return Err(RecuerdoError::FilterStage(
            "source photo has no pixels".to_string(),
        ));
    }

    let rgb = photo.to_rgb8();
    let mut out = GrayImage::new(width, height);
    for (x, y, px) in out.enumerate_pixels_mut() {
        let p = rgb.get_pixel(x, y);
        let gray = shader::luma709(p[0], p[1], p[2]);
        let adjusted = shader::brightness(
            shader::contrast(gray, 0.5, FALLBACK_CONTRAST),
            FALLBACK_BRIGHTNESS,
        );
        *px = Luma([(adjusted * 255.0).round() as u8]);
    }
    Ok(out)
}

/// Run the ordered effect chain at the default intensity.
pub fn process(photo: &DynamicImage) -> Option<GrayImage> {
    process_with_intensity(photo, DEFAULT_INTENSITY)
}

/// Run the ordered effect chain: dithered first, simple on failure, `None`
/// when both fail.
pub fn process_with_intensity(photo: &DynamicImage, intensity: f32) -> Option<GrayImage> {
    let attempts: [fn(&DynamicImage, f32) -> Result<GrayImage, RecuerdoError>; 2] =
        [dithered, |p, _| simple(p)];
    attempts
        .iter()
        .find_map(|attempt| attempt(photo, intensity).ok())
}

/// Decode photo bytes and run the effect chain. A decode failure means
/// neither effect can run, so the processed image is simply absent.
pub fn process_bytes(bytes: &[u8]) -> Option<GrayImage> {
    let photo = decode(bytes).ok()?;
    process(&photo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn gradient_photo(width: u32, height: u32) -> DynamicImage {
        let img = GrayImage::from_fn(width, height, |x, _| {
            Luma([(x * 255 / width.max(1)) as u8])
        });
        DynamicImage::ImageLuma8(img)
    }

    #[test]
    fn test_dithered_output_is_binary() {
        let photo = gradient_photo(64, 48);
        let mut rng = StdRng::seed_from_u64(11);
        let out = dithered_with_rng(&photo, DEFAULT_INTENSITY, &mut rng).unwrap();
        assert_eq!(out.dimensions(), (64, 48));
        assert!(out.pixels().all(|p| p[0] == 0 || p[0] == 255));
        // A gradient must produce both ink and paper
        assert!(out.pixels().any(|p| p[0] == 0));
        assert!(out.pixels().any(|p| p[0] == 255));
    }

    #[test]
    fn test_dithered_tracks_source_darkness() {
        // Darker source pixels must print statistically more ink
        let photo = gradient_photo(128, 64);
        let mut rng = StdRng::seed_from_u64(12);
        let out = dithered_with_rng(&photo, DEFAULT_INTENSITY, &mut rng).unwrap();
        let ink_in = |x0: u32, x1: u32| -> usize {
            (x0..x1)
                .flat_map(|x| (0..64).map(move |y| (x, y)))
                .filter(|&(x, y)| out.get_pixel(x, y)[0] == 0)
                .count()
        };
        assert!(ink_in(0, 32) > ink_in(96, 128));
    }

    #[test]
    fn test_dithered_rejects_empty_photo() {
        let photo = DynamicImage::new_luma8(0, 0);
        let err = dithered(&photo, DEFAULT_INTENSITY).unwrap_err();
        assert!(matches!(err, RecuerdoError::FilterStage(_)));
    }

    #[test]
    fn test_simple_is_deterministic() {
        let photo = gradient_photo(32, 32);
        let a = simple(&photo).unwrap();
        let b = simple(&photo).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_simple_boosts_contrast() {
        let photo = gradient_photo(64, 4);
        let out = simple(&photo).unwrap();
        // Dark inputs get pushed darker than the +0.1 lift alone would allow,
        // bright inputs saturate to white
        assert!(out.get_pixel(0, 0)[0] < 64);
        assert_eq!(out.get_pixel(63, 0)[0], 255);
    }

    #[test]
    fn test_process_prefers_dithered() {
        let photo = gradient_photo(40, 40);
        let out = process(&photo).expect("chain must succeed on a valid photo");
        // Dithered output is strictly binary; the fallback is not
        assert!(out.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn test_process_bytes_degrades_to_none() {
        assert!(process_bytes(&[0x00, 0x01, 0x02, 0x03]).is_none());
        assert!(process_bytes(&[]).is_none());
    }
}
