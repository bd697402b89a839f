//! Bayer 8x8 ordered dithering.
//!
//! Threshold matrix used when blitting continuous-tone pixels (the fallback
//! photo effect produces real grays) into the 1-bit receipt buffer. Binary
//! input passes through unchanged: full ink always prints, bare paper never
//! does.

/// Bayer 8x8 dithering matrix. Values 0-63, each exactly once, arranged to
/// minimize visible patterning.
pub const BAYER8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Dithering threshold for a pixel position, strictly inside (0, 1).
///
/// The +0.5 bias guarantees that full ink (1.0) always prints and bare
/// paper (0.0) never does.
#[inline]
pub fn threshold(x: usize, y: usize) -> f32 {
    let matrix_value = BAYER8[y & 7][x & 7];
    (matrix_value as f32 + 0.5) / 64.0
}

/// Whether an ink dot should be placed at the given position for the given
/// intensity (0.0 = paper, 1.0 = ink).
#[inline]
pub fn should_print(x: usize, y: usize, intensity: f32) -> bool {
    intensity > threshold(x, y)
}
