// THEORY:
// The rectangle detector is the part of the probe that answers "where". Given a color
// range it finds solid, axis-aligned areas of that color (buttons, bars, highlight
// boxes) and scores how completely each one is filled.
//
// Algorithm steps for `find_color_rectangles`:
// 1.  **Search Area**: The optional region is enforced by the extractor. Its origin is
//     remembered so results can be reported in frame coordinates.
// 2.  **Masking**: `Mask::from_frame` marks every pixel inside the color range.
// 3.  **Grouping**: `blob_detector::find_blobs` extracts 8-connected blobs and their
//     bounding rectangles, in scan order.
// 4.  **Size Filter**: Rectangles must meet the minimum size and, when given, stay within
//     the maximum size.
// 5.  **Scoring**: The fill ratio is the share of on-pixels inside the rectangle, counted
//     over the whole mask, so other blobs nested inside the box count too.
// 6.  **Acceptance**: Rectangles whose fill ratio reaches the threshold are emitted, with
//     the ratio as confidence.
//
// `calculate_color_percentage` shares the masking step and reports the on-pixel share of
// the whole search area. It is polled speculatively by automation loops, so an unusable
// region or an empty frame yields 0 instead of an error.

use crate::core_modules::blob_detector::blob_detector;
use crate::core_modules::color_range::ColorRange;
use crate::core_modules::error::{Error, Result};
use crate::core_modules::frame::frame::Frame;
use crate::core_modules::mask::Mask;
use crate::core_modules::region::Region;
use crate::core_modules::region_extractor::region_extractor;
use log::{debug, trace};
use serde::{Deserialize, Deserializer, Serialize};

/// Default minimum fill ratio for a detected rectangle.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.95;

/// Size limits and acceptance threshold for `find_color_rectangles`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectangleQuery {
    pub min_width: u32,
    pub min_height: u32,
    /// `None` leaves the width unbounded. A negative value in configuration means the same.
    #[serde(default, deserialize_with = "unbounded_if_negative")]
    pub max_width: Option<u32>,
    #[serde(default, deserialize_with = "unbounded_if_negative")]
    pub max_height: Option<u32>,
    /// Minimum fill ratio; `None` uses `DEFAULT_MATCH_THRESHOLD` or the probe's configuration.
    #[serde(default)]
    pub threshold: Option<f64>,
}

fn unbounded_if_negative<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<i64>::deserialize(deserializer)?;
    match value {
        Some(limit) if limit >= 0 => u32::try_from(limit)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

impl RectangleQuery {
    pub fn new(min_width: u32, min_height: u32) -> Self {
        Self {
            min_width,
            min_height,
            max_width: None,
            max_height: None,
            threshold: None,
        }
    }

    #[must_use]
    pub fn with_max_width(mut self, max_width: u32) -> Self {
        self.max_width = Some(max_width);
        self
    }

    #[must_use]
    pub fn with_max_height(mut self, max_height: u32) -> Self {
        self.max_height = Some(max_height);
        self
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// The fill ratio a rectangle must reach.
    pub fn effective_threshold(&self) -> f64 {
        self.threshold.unwrap_or(DEFAULT_MATCH_THRESHOLD)
    }

    /// Whether a `width` x `height` rectangle passes the size filter.
    pub fn accepts_size(&self, width: u32, height: u32) -> bool {
        width >= self.min_width
            && height >= self.min_height
            && self.max_width.is_none_or(|max| width <= max)
            && self.max_height.is_none_or(|max| height <= max)
    }
}

/// Finds filled rectangles of `range`-colored pixels in `frame`, or in `region` within it.
///
/// Results are in frame coordinates, in the scan order of the blobs they came from, and
/// carry their fill ratio as confidence.
pub fn find_color_rectangles(
    frame: &Frame<'_>,
    range: &ColorRange,
    query: &RectangleQuery,
    region: Option<&Region>,
) -> Result<Vec<Region>> {
    if frame.is_empty() {
        return Err(Error::EmptyFrame);
    }
    let view = region_extractor::extract(frame, region)?;
    let (x_offset, y_offset) = region.map_or((0, 0), |r| (r.x(), r.y()));

    let mask = Mask::from_frame(&view, range);
    let threshold = query.effective_threshold();
    let blobs = blob_detector::find_blobs(&mask);
    let blob_count = blobs.len();

    let mut results = Vec::new();
    for blob in blobs {
        let (width, height) = (blob.width(), blob.height());
        if !query.accepts_size(width, height) {
            continue;
        }

        let top_left = blob.bounding_box.0;
        let matching = mask.count_on_in(top_left.x, top_left.y, width, height);
        let fill_ratio = matching as f64 / (width as u64 * height as u64) as f64;
        if fill_ratio < threshold {
            debug!(
                "rejected {width}x{height} candidate at ({}, {}) of {} px: fill {fill_ratio:.3} < {threshold}",
                top_left.x, top_left.y, blob.size_in_pixels
            );
            continue;
        }

        results.push(
            Region::new(top_left.x as i32, top_left.y as i32, width as i32, height as i32)
                .translated(x_offset, y_offset)
                .with_confidence(fill_ratio),
        );
    }

    trace!("{} of {blob_count} blobs accepted as rectangles", results.len());
    Ok(results)
}

/// Share of pixels in `frame`, or in `region` within it, whose color lies in `range`.
///
/// Never fails: an empty frame or an unusable region yields 0.
pub fn calculate_color_percentage(
    frame: &Frame<'_>,
    range: &ColorRange,
    region: Option<&Region>,
) -> f64 {
    if frame.is_empty() {
        debug!("color percentage of an empty frame is 0");
        return 0.0;
    }
    let view = match region_extractor::extract(frame, region) {
        Ok(view) => view,
        Err(err) => {
            debug!("color percentage degraded to 0: {err}");
            return 0.0;
        }
    };

    let matching = Mask::from_frame(&view, range).count_on();
    matching as f64 / view.pixel_count() as f64
}
