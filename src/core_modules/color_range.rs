// THEORY:
// A `ColorRange` describes an acceptable color band as three independent inclusive
// intervals, one per canonical channel. It is the only color description the masking
// operations understand, and it is deliberately simple: a box in RGB space.
//
// Ranges are always expressed in canonical RGB. Frames stored as BGR(A) are converted
// on read by `Frame::pixel`, so a range written against a screenshot's visible colors
// works regardless of how the capture layer ordered the bytes.
//
// Ranges usually come from an external configuration store, so they deserialize from
// the `{"r": [lo, hi], "g": [lo, hi], "b": [lo, hi]}` shape and are validated on the way in.

use crate::core_modules::error::{Error, Result};
use crate::core_modules::pixel::pixel::{Channel, Pixel};
use serde::{Deserialize, Serialize};

/// Inclusive `(min, max)` bounds for one channel.
pub type ChannelBounds = (Channel, Channel);

/// A per-channel inclusive color band in canonical RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawColorRange")]
pub struct ColorRange {
    r: ChannelBounds,
    g: ChannelBounds,
    b: ChannelBounds,
}

/// Unvalidated wire shape of a `ColorRange`.
#[derive(Deserialize)]
struct RawColorRange {
    r: ChannelBounds,
    g: ChannelBounds,
    b: ChannelBounds,
}

impl TryFrom<RawColorRange> for ColorRange {
    type Error = Error;

    fn try_from(raw: RawColorRange) -> Result<Self> {
        ColorRange::new(raw.r, raw.g, raw.b)
    }
}

/// Exactly black.
pub const BLACK: ColorRange = ColorRange {
    r: (0, 0),
    g: (0, 0),
    b: (0, 0),
};

/// Exactly white.
pub const WHITE: ColorRange = ColorRange {
    r: (255, 255),
    g: (255, 255),
    b: (255, 255),
};

impl ColorRange {
    /// Builds a range, rejecting any channel whose minimum exceeds its maximum.
    pub fn new(r: ChannelBounds, g: ChannelBounds, b: ChannelBounds) -> Result<Self> {
        for (channel, (min, max)) in [('r', r), ('g', g), ('b', b)] {
            if min > max {
                return Err(Error::InvalidColorRange { channel, min, max });
            }
        }
        Ok(Self { r, g, b })
    }

    /// A band of `tolerance` around `color` on every channel, saturating at 0 and 255.
    pub fn around(color: Pixel, tolerance: Channel) -> Self {
        let band = |value: Channel| (value.saturating_sub(tolerance), value.saturating_add(tolerance));
        Self {
            r: band(color.red),
            g: band(color.green),
            b: band(color.blue),
        }
    }

    pub fn red(&self) -> ChannelBounds {
        self.r
    }

    pub fn green(&self) -> ChannelBounds {
        self.g
    }

    pub fn blue(&self) -> ChannelBounds {
        self.b
    }

    /// True when every channel of `pixel` lies within its inclusive bounds.
    #[inline]
    pub fn contains(&self, pixel: Pixel) -> bool {
        (self.r.0..=self.r.1).contains(&pixel.red)
            && (self.g.0..=self.g.1).contains(&pixel.green)
            && (self.b.0..=self.b.1).contains(&pixel.blue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        let range = ColorRange::new((10, 20), (0, 0), (255, 255)).unwrap();
        assert!(range.contains(Pixel::new(10, 0, 255)));
        assert!(range.contains(Pixel::new(20, 0, 255)));
        assert!(!range.contains(Pixel::new(9, 0, 255)));
        assert!(!range.contains(Pixel::new(21, 0, 255)));
        assert!(!range.contains(Pixel::new(15, 1, 255)));
    }

    #[test]
    fn named_constants_match_only_their_color() {
        assert!(BLACK.contains(Pixel::new(0, 0, 0)));
        assert!(!BLACK.contains(Pixel::new(0, 0, 1)));
        assert!(WHITE.contains(Pixel::new(255, 255, 255)));
        assert!(!WHITE.contains(Pixel::new(254, 255, 255)));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        assert!(matches!(
            ColorRange::new((0, 10), (30, 20), (0, 0)),
            Err(Error::InvalidColorRange {
                channel: 'g',
                min: 30,
                max: 20
            })
        ));
    }

    #[test]
    fn around_saturates_at_channel_limits() {
        let range = ColorRange::around(Pixel::new(5, 128, 250), 10);
        assert_eq!(range.red(), (0, 15));
        assert_eq!(range.green(), (118, 138));
        assert_eq!(range.blue(), (240, 255));
    }

    #[test]
    fn deserializes_from_configuration_shape() {
        let range: ColorRange =
            serde_json::from_str(r#"{"r": [200, 255], "g": [0, 40], "b": [0, 40]}"#).unwrap();
        assert_eq!(range.red(), (200, 255));
        assert_eq!(range.green(), (0, 40));
        assert_eq!(range.blue(), (0, 40));

        let inverted = serde_json::from_str::<ColorRange>(r#"{"r": [9, 1], "g": [0, 0], "b": [0, 0]}"#);
        assert!(inverted.is_err());
    }
}
