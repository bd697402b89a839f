//! # Torn Edge Mask
//!
//! Procedural torn-paper silhouette. The top and bottom of the receipt get
//! a jittered sawtooth edge; clipping the composite through the closed
//! polygon makes it read as hand-torn off the spool. Randomized per
//! invocation, but every edge point stays inside a hard clamp band.

use image::{GrayImage, Rgba, RgbaImage};
use rand::Rng;

use crate::shader::lerp;

/// Tear geometry parameters.
#[derive(Debug, Clone, Copy)]
pub struct TearParams {
    /// Nominal tooth height. Edge points stay within `[0, 2 * tear_height]`
    /// of the paper edge.
    pub tear_height: f32,
    /// Number of teeth across the paper width.
    pub tear_count: usize,
}

impl Default for TearParams {
    fn default() -> Self {
        Self {
            tear_height: 6.0,
            tear_count: 32,
        }
    }
}

/// Generate the closed torn-edge polygon for a `width` x `height` rect.
///
/// The top edge runs left to right, the bottom edge right to left; the
/// vertical closures at both sides are implicit in the point order. Top
/// points satisfy `y in [0, 2 * tear_height]`, bottom points
/// `y in [height - 2 * tear_height, height]`.
pub fn polygon(
    width: f32,
    height: f32,
    params: &TearParams,
    rng: &mut impl Rng,
) -> Vec<(f32, f32)> {
    let count = params.tear_count.max(1);
    let step = width / count as f32;
    let th = params.tear_height;
    let mut points = Vec::with_capacity((count + 1) * 2);

    for i in 0..=count {
        let x = i as f32 * step;
        let y = tooth_y(i, th, rng).clamp(0.0, 2.0 * th);
        points.push((x, y));
    }
    for i in (0..=count).rev() {
        let x = i as f32 * step;
        let y = (height - tooth_y(i, th, rng)).clamp(height - 2.0 * th, height);
        points.push((x, y));
    }

    points
}

/// Alternating baseline plus independent jitter for tooth `i`.
fn tooth_y(i: usize, tear_height: f32, rng: &mut impl Rng) -> f32 {
    let baseline = if i % 2 == 0 { 0.0 } else { tear_height };
    let jitter = rng.random_range(-0.3 * tear_height..=0.3 * tear_height);
    baseline + jitter
}

/// Clip a grayscale composite through a fresh torn-edge polygon.
///
/// Pixels above the top profile or below the bottom profile become fully
/// transparent; paper pixels keep their gray value at full alpha.
pub fn apply(composite: &GrayImage, params: &TearParams, rng: &mut impl Rng) -> RgbaImage {
    let (width, height) = composite.dimensions();
    let points = polygon(width as f32, height as f32, params, rng);
    let count = params.tear_count.max(1);
    let (top, bottom) = points.split_at(count + 1);

    let top_profile = edge_profile(width, top);
    // Bottom points run right to left; the profile wants ascending x.
    let mut bottom_sorted = bottom.to_vec();
    bottom_sorted.reverse();
    let bottom_profile = edge_profile(width, &bottom_sorted);

    let mut out = RgbaImage::new(width, height);
    for y in 0..height {
        let yc = y as f32 + 0.5;
        for x in 0..width {
            let inside = yc >= top_profile[x as usize] && yc <= bottom_profile[x as usize];
            let px = if inside {
                let v = composite.get_pixel(x, y)[0];
                Rgba([v, v, v, 255])
            } else {
                Rgba([0, 0, 0, 0])
            };
            out.put_pixel(x, y, px);
        }
    }
    out
}

/// Boundary y per pixel column, linearly interpolated between edge points.
fn edge_profile(width: u32, points: &[(f32, f32)]) -> Vec<f32> {
    let mut profile = vec![0.0f32; width as usize];
    for (x_px, slot) in profile.iter_mut().enumerate() {
        let x = x_px as f32 + 0.5;
        let mut y = points[points.len() - 1].1;
        for pair in points.windows(2) {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            if x >= x0 && x <= x1 {
                let t = if x1 > x0 { (x - x0) / (x1 - x0) } else { 0.0 };
                y = lerp(y0, y1, t);
                break;
            }
        }
        *slot = y;
    }
    profile
}
