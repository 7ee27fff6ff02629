// THEORY:
// The `pipeline` module is the top-level API of the probe. It gathers the stateless
// operations from `core_modules` behind a small facade and owns the one thing they
// deliberately do not: configuration.
//
// Every threshold and budget the operations use is a parameter with a documented
// default. `ProbeConfig` bundles those defaults so an automation layer can load them
// from its own configuration store and apply them consistently, and `ColorProbe` is a
// thin, cloneable carrier of that config. It holds no frame data and no caches, so one
// probe can be shared freely across threads.

use crate::core_modules::color_classifier::{self, DEFAULT_MAX_COLORS, DEFAULT_PURITY_THRESHOLD};
use crate::core_modules::error::Result;
use crate::core_modules::rectangle_detector::{self, DEFAULT_MATCH_THRESHOLD};
use serde::{Deserialize, Serialize};

// Re-export key data structures for the public API.
pub use crate::core_modules::color_classifier::DominantColor;
pub use crate::core_modules::color_range::{BLACK, ColorRange, WHITE};
pub use crate::core_modules::error::Error;
pub use crate::core_modules::frame::frame::{Frame, FrameBuffer, PixelLayout};
pub use crate::core_modules::pixel::pixel::Pixel;
pub use crate::core_modules::rectangle_detector::RectangleQuery;
pub use crate::core_modules::region::Region;

/// Tunable thresholds shared by all probe operations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Distinct-color budget for the purity tally.
    pub max_colors: usize,
    /// Share the dominant color must exceed for a region to count as pure.
    pub purity_threshold: f64,
    /// Fill ratio a detected rectangle must reach when the query does not set its own.
    pub match_threshold: f64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            max_colors: DEFAULT_MAX_COLORS,
            purity_threshold: DEFAULT_PURITY_THRESHOLD,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

impl ProbeConfig {
    /// Parses a config from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Applies a `ProbeConfig` to the color-region operations.
#[derive(Debug, Clone, Default)]
pub struct ColorProbe {
    config: ProbeConfig,
}

impl ColorProbe {
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Whether a single color dominates the frame.
    pub fn is_pure(&self, frame: &Frame<'_>) -> bool {
        color_classifier::is_close_to_pure_color(
            frame,
            self.config.max_colors,
            self.config.purity_threshold,
        )
    }

    /// The most frequent color within the configured budget.
    pub fn dominant_color(&self, frame: &Frame<'_>) -> Option<DominantColor> {
        color_classifier::dominant_color(frame, self.config.max_colors)
    }

    pub fn colorfulness(&self, frame: &Frame<'_>, region: Option<&Region>) -> Result<f64> {
        color_classifier::calculate_colorfulness(frame, region)
    }

    pub fn saturation(&self, frame: &Frame<'_>, region: Option<&Region>) -> Result<f64> {
        color_classifier::get_saturation(frame, region)
    }

    /// Finds filled rectangles of `range`; the query's own threshold wins over the config.
    pub fn find_rectangles(
        &self,
        frame: &Frame<'_>,
        range: &ColorRange,
        query: &RectangleQuery,
        region: Option<&Region>,
    ) -> Result<Vec<Region>> {
        let query = RectangleQuery {
            threshold: query.threshold.or(Some(self.config.match_threshold)),
            ..*query
        };
        rectangle_detector::find_color_rectangles(frame, range, &query, region)
    }

    pub fn color_percentage(
        &self,
        frame: &Frame<'_>,
        range: &ColorRange,
        region: Option<&Region>,
    ) -> f64 {
        rectangle_detector::calculate_color_percentage(frame, range, region)
    }
}
