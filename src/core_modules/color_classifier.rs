// THEORY:
// The color classifiers summarize the color composition of a frame (or a region of it)
// as a single verdict or scalar. They answer questions like "is this a flat, solid
// panel?", "is this area colorful or washed out?" without locating anything.
//
// Three lenses, each a stateless function:
// 1.  **Purity** (`is_close_to_pure_color`): tallies exact colors and asks whether one
//     of them dominates. A distinct-color budget short-circuits the tally so that a
//     photographic frame costs at most a few thousand map inserts before bailing out.
// 2.  **Colorfulness** (`calculate_colorfulness`): Hasler and Süsstrunk's statistic over
//     the opponent components rg and yb. It rewards both vivid averages and variety.
//     It has no upper bound; callers threshold it themselves.
// 3.  **Saturation** (`get_saturation`): the mean 8-bit HSV saturation normalized to
//     [0, 1]. Near 0 means grayscale-like, near 1 means strongly saturated.
//
// Bounds policy: colorfulness and saturation enforce the region through
// `region_extractor::extract` and fail with `Error::OutOfBounds`. An empty frame is an
// input-validation error for both. Purity takes no region and treats an empty frame as
// "not pure".

use crate::core_modules::error::{Error, Result};
use crate::core_modules::frame::frame::Frame;
use crate::core_modules::pixel::pixel::Pixel;
use crate::core_modules::region::Region;
use crate::core_modules::region_extractor::region_extractor;
use log::{debug, trace};
use std::collections::HashMap;

/// Default distinct-color budget for the purity tally.
pub const DEFAULT_MAX_COLORS: usize = 5000;
/// Default share the dominant color must exceed for a frame to count as pure.
pub const DEFAULT_PURITY_THRESHOLD: f64 = 0.97;

/// Weight of the mean term in the colorfulness statistic.
const COLORFULNESS_MEAN_WEIGHT: f64 = 0.3;

/// The most frequent exact color of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DominantColor {
    pub color: Pixel,
    /// Number of pixels with exactly this color.
    pub count: usize,
    /// `count` divided by the frame's pixel count.
    pub share: f64,
}

/// Finds the most frequent exact color of `frame`.
///
/// Returns `None` for an empty frame, or as soon as more than `max_colors` distinct
/// colors have been seen. Ties in count go to the lexicographically smallest RGB value.
pub fn dominant_color(frame: &Frame<'_>, max_colors: usize) -> Option<DominantColor> {
    if frame.is_empty() {
        return None;
    }

    let mut counts: HashMap<Pixel, usize> = HashMap::new();
    for pixel in frame.pixels() {
        *counts.entry(pixel).or_insert(0) += 1;
        if counts.len() > max_colors {
            debug!("color tally exceeded budget of {max_colors} distinct colors");
            return None;
        }
    }

    let (color, count) = counts
        .into_iter()
        .max_by(|(color_a, count_a), (color_b, count_b)| {
            count_a.cmp(count_b).then_with(|| color_b.cmp(color_a))
        })?;

    Some(DominantColor {
        color,
        count,
        share: count as f64 / frame.pixel_count() as f64,
    })
}

/// True when a single exact color covers strictly more than `percent` of the frame
/// and the frame holds no more than `max_colors` distinct colors.
pub fn is_close_to_pure_color(frame: &Frame<'_>, max_colors: usize, percent: f64) -> bool {
    match dominant_color(frame, max_colors) {
        Some(dominant) => {
            trace!(
                "dominant color {:?} covers {:.4} of the frame",
                dominant.color, dominant.share
            );
            dominant.share > percent
        }
        None => false,
    }
}

/// Hasler–Süsstrunk colorfulness of `frame`, or of `region` within it, divided by 100.
pub fn calculate_colorfulness(frame: &Frame<'_>, region: Option<&Region>) -> Result<f64> {
    if frame.is_empty() {
        return Err(Error::EmptyFrame);
    }
    let view = region_extractor::extract(frame, region)?;
    let count = view.pixel_count() as f64;

    let (sum_rg, sum_yb) = view.pixels().fold((0.0, 0.0), |(rg, yb), pixel| {
        (rg + pixel.red_green_opponent(), yb + pixel.yellow_blue_opponent())
    });
    let mean_rg = sum_rg / count;
    let mean_yb = sum_yb / count;

    // Second pass keeps the variance exact for uniform regions.
    let (sq_rg, sq_yb) = view.pixels().fold((0.0, 0.0), |(rg, yb), pixel| {
        let d_rg = pixel.red_green_opponent() - mean_rg;
        let d_yb = pixel.yellow_blue_opponent() - mean_yb;
        (rg + d_rg * d_rg, yb + d_yb * d_yb)
    });
    let var_rg = sq_rg / count;
    let var_yb = sq_yb / count;

    let std_root = (var_rg + var_yb).sqrt();
    let mean_root = (mean_rg * mean_rg + mean_yb * mean_yb).sqrt();
    let colorfulness = (std_root + COLORFULNESS_MEAN_WEIGHT * mean_root) / 100.0;

    trace!("colorfulness {colorfulness:.4} over {}x{}", view.width(), view.height());
    Ok(colorfulness)
}

/// Mean HSV saturation of `frame`, or of `region` within it, in [0, 1].
pub fn get_saturation(frame: &Frame<'_>, region: Option<&Region>) -> Result<f64> {
    if frame.is_empty() {
        return Err(Error::EmptyFrame);
    }
    let view = region_extractor::extract(frame, region)?;

    let total: u64 = view
        .pixels()
        .map(|pixel| pixel.saturation_hsv_byte() as u64)
        .sum();
    let saturation = total as f64 / view.pixel_count() as f64 / 255.0;

    trace!("saturation {saturation:.4} over {}x{}", view.width(), view.height());
    Ok(saturation)
}
