//! Perceptual pixel comparator.
//!
//! Colour distance is measured in YIQ space with alpha blended over white.
//! Pixels whose distance exceeds the threshold are differences, unless they
//! look like anti-aliasing in either image: those are painted yellow and
//! not counted. Unchanged pixels are painted as a faded grayscale copy of the
//! first image so the differences stand out.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "pixel_tests.rs"]
mod tests;

/// Largest possible YIQ delta between two colours.
const MAX_YIQ_DELTA: f64 = 35215.0;

const AA_COLOR: [u8; 3] = [255, 255, 0];
const DIFF_COLOR: [u8; 3] = [255, 0, 0];

/// Comparator options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiffOptions {
    /// Matching threshold in `0..=1`; smaller is more sensitive.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Count anti-aliased pixels as differences.
    #[serde(default)]
    pub include_aa: bool,

    /// Opacity of the first image in the unchanged areas of the output.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

fn default_threshold() -> f64 {
    0.1
}

fn default_alpha() -> f64 {
    0.1
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            include_aa: false,
            alpha: default_alpha(),
        }
    }
}

/// The two images have different dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("image sizes differ: {left:?} vs {right:?}")]
pub struct SizeMismatch {
    pub left: (u32, u32),
    pub right: (u32, u32),
}

/// Result of comparing two images.
#[derive(Debug, Clone)]
pub struct PixelDiff {
    /// Number of pixels counted as different.
    pub differing: u64,
    /// Visualisation of the differences.
    pub image: RgbaImage,
}

impl PixelDiff {
    pub fn total_pixels(&self) -> u64 {
        u64::from(self.image.width()) * u64::from(self.image.height())
    }

    /// Differing pixels as a percentage of all pixels.
    pub fn ratio_percent(&self) -> f64 {
        let total = self.total_pixels();
        if total == 0 {
            return 0.0;
        }
        self.differing as f64 / total as f64 * 100.0
    }
}

/// Compare two equally sized RGBA images.
pub fn compare(a: &RgbaImage, b: &RgbaImage, options: &DiffOptions) -> Result<PixelDiff, SizeMismatch> {
    if a.dimensions() != b.dimensions() {
        return Err(SizeMismatch {
            left: a.dimensions(),
            right: b.dimensions(),
        });
    }

    let (width, height) = a.dimensions();
    let mut output = RgbaImage::new(width, height);
    let img1: &[u8] = a.as_raw();
    let img2: &[u8] = b.as_raw();
    let out: &mut [u8] = &mut output;

    if img1 == img2 {
        for pos in (0..img1.len()).step_by(4) {
            draw_gray_pixel(img1, pos, options.alpha, out);
        }
        return Ok(PixelDiff {
            differing: 0,
            image: output,
        });
    }

    let max_delta = MAX_YIQ_DELTA * options.threshold * options.threshold;
    let (w, h) = (width as usize, height as usize);
    let mut differing = 0u64;

    for y in 0..h {
        for x in 0..w {
            let pos = (y * w + x) * 4;
            let delta = color_delta(img1, img2, pos, pos, false);

            if delta.abs() > max_delta {
                if !options.include_aa
                    && (antialiased(img1, x, y, w, h, img2) || antialiased(img2, x, y, w, h, img1))
                {
                    draw_pixel(out, pos, AA_COLOR);
                } else {
                    draw_pixel(out, pos, DIFF_COLOR);
                    differing += 1;
                }
            } else {
                draw_gray_pixel(img1, pos, options.alpha, out);
            }
        }
    }

    Ok(PixelDiff {
        differing,
        image: output,
    })
}

/// Whether the pixel at `(x1, y1)` is likely part of an anti-aliased edge.
///
/// The pixel must have at most two identical neighbours, and its darkest
/// and brightest neighbours must sit in flat regions of both images.
fn antialiased(img: &[u8], x1: usize, y1: usize, width: usize, height: usize, img2: &[u8]) -> bool {
    let x0 = x1.saturating_sub(1);
    let y0 = y1.saturating_sub(1);
    let x2 = (x1 + 1).min(width - 1);
    let y2 = (y1 + 1).min(height - 1);
    let pos = (y1 * width + x1) * 4;

    let mut zeroes = if x1 == x0 || x1 == x2 || y1 == y0 || y1 == y2 { 1 } else { 0 };
    let mut min = 0.0;
    let mut max = 0.0;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (0, 0, 0, 0);

    for x in x0..=x2 {
        for y in y0..=y2 {
            if x == x1 && y == y1 {
                continue;
            }

            let delta = color_delta(img, img, pos, (y * width + x) * 4, true);
            if delta == 0.0 {
                zeroes += 1;
                if zeroes > 2 {
                    return false;
                }
            } else if delta < min {
                min = delta;
                min_x = x;
                min_y = y;
            } else if delta > max {
                max = delta;
                max_x = x;
                max_y = y;
            }
        }
    }

    if min == 0.0 || max == 0.0 {
        return false;
    }

    (has_many_siblings(img, min_x, min_y, width, height)
        && has_many_siblings(img2, min_x, min_y, width, height))
        || (has_many_siblings(img, max_x, max_y, width, height)
            && has_many_siblings(img2, max_x, max_y, width, height))
}

/// Whether the pixel has more than two identical neighbours.
fn has_many_siblings(img: &[u8], x1: usize, y1: usize, width: usize, height: usize) -> bool {
    let x0 = x1.saturating_sub(1);
    let y0 = y1.saturating_sub(1);
    let x2 = (x1 + 1).min(width - 1);
    let y2 = (y1 + 1).min(height - 1);
    let pos = (y1 * width + x1) * 4;

    let mut zeroes = if x1 == x0 || x1 == x2 || y1 == y0 || y1 == y2 { 1 } else { 0 };

    for x in x0..=x2 {
        for y in y0..=y2 {
            if x == x1 && y == y1 {
                continue;
            }
            let pos2 = (y * width + x) * 4;
            if img[pos..pos + 4] == img[pos2..pos2 + 4] {
                zeroes += 1;
            }
            if zeroes > 2 {
                return true;
            }
        }
    }
    false
}

/// Squared YIQ distance between pixel `k` of `img1` and pixel `m` of `img2`.
///
/// Negative when the first pixel is brighter. With `y_only` the signed
/// luma difference is returned instead.
fn color_delta(img1: &[u8], img2: &[u8], k: usize, m: usize, y_only: bool) -> f64 {
    let [mut r1, mut g1, mut b1, a1] = channels(img1, k);
    let [mut r2, mut g2, mut b2, a2] = channels(img2, m);

    if a1 == a2 && r1 == r2 && g1 == g2 && b1 == b2 {
        return 0.0;
    }

    if a1 < 255.0 {
        let a = a1 / 255.0;
        r1 = blend(r1, a);
        g1 = blend(g1, a);
        b1 = blend(b1, a);
    }
    if a2 < 255.0 {
        let a = a2 / 255.0;
        r2 = blend(r2, a);
        g2 = blend(g2, a);
        b2 = blend(b2, a);
    }

    let y1 = rgb2y(r1, g1, b1);
    let y2 = rgb2y(r2, g2, b2);
    let y = y1 - y2;
    if y_only {
        return y;
    }

    let i = rgb2i(r1, g1, b1) - rgb2i(r2, g2, b2);
    let q = rgb2q(r1, g1, b1) - rgb2q(r2, g2, b2);
    let delta = 0.5053 * y * y + 0.299 * i * i + 0.1957 * q * q;

    if y1 > y2 { -delta } else { delta }
}

fn channels(img: &[u8], pos: usize) -> [f64; 4] {
    [
        f64::from(img[pos]),
        f64::from(img[pos + 1]),
        f64::from(img[pos + 2]),
        f64::from(img[pos + 3]),
    ]
}

fn rgb2y(r: f64, g: f64, b: f64) -> f64 {
    r * 0.29889531 + g * 0.58662247 + b * 0.11448223
}

fn rgb2i(r: f64, g: f64, b: f64) -> f64 {
    r * 0.59597799 - g * 0.27417610 - b * 0.32180189
}

fn rgb2q(r: f64, g: f64, b: f64) -> f64 {
    r * 0.21147017 - g * 0.52261711 + b * 0.31114694
}

/// Blend a channel with white at opacity `a`.
fn blend(c: f64, a: f64) -> f64 {
    255.0 + (c - 255.0) * a
}

fn draw_pixel(out: &mut [u8], pos: usize, [r, g, b]: [u8; 3]) {
    out[pos] = r;
    out[pos + 1] = g;
    out[pos + 2] = b;
    out[pos + 3] = 255;
}

fn draw_gray_pixel(img: &[u8], pos: usize, alpha: f64, out: &mut [u8]) {
    let [r, g, b, a] = channels(img, pos);
    let value = blend(rgb2y(r, g, b), alpha * a / 255.0) as u8;
    draw_pixel(out, pos, [value, value, value]);
}
