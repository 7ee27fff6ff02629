// THEORY:
// The region extractor is the shared safety gate between caller geometry and pixel
// access. Every higher-level operation that accepts an optional `Region` routes it
// through here, so the rule for "is this box usable on this frame" lives in exactly
// one place.
//
// Key architectural principles:
// 1.  **Single Validity Rule**: A region is usable iff it starts inside the frame, has
//     a positive size, and ends on or before the frame's right and bottom edges.
// 2.  **Zero-Copy**: A valid region becomes a narrowed `Frame` view over the same
//     bytes. No pixel is copied.
// 3.  **Loud by Default**: `extract` reports a violation as `Error::OutOfBounds`.
//     Operations that prefer a sentinel (e.g. color percentage) call `is_within`
//     first and pick their own fallback, so the policy is visible at each call site.

pub mod region_extractor {
    use crate::core_modules::error::{Error, Result};
    use crate::core_modules::frame::frame::Frame;
    use crate::core_modules::region::Region;

    /// True when `region` lies entirely within `frame` and has a positive size.
    pub fn is_within(frame: &Frame<'_>, region: &Region) -> bool {
        region.x() >= 0
            && region.y() >= 0
            && region.width() > 0
            && region.height() > 0
            && region.right() <= frame.width() as i64
            && region.bottom() <= frame.height() as i64
    }

    /// Restricts `frame` to `region`, or returns the whole frame when no region is given.
    pub fn extract<'a>(frame: &Frame<'a>, region: Option<&Region>) -> Result<Frame<'a>> {
        let Some(region) = region else {
            return Ok(*frame);
        };
        if !is_within(frame, region) {
            return Err(Error::OutOfBounds {
                region: *region,
                frame_width: frame.width(),
                frame_height: frame.height(),
            });
        }
        Ok(frame.sub_view(
            region.x() as u32,
            region.y() as u32,
            region.width() as u32,
            region.height() as u32,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::region_extractor::*;
    use crate::core_modules::error::Error;
    use crate::core_modules::frame::frame::{Frame, PixelLayout};
    use crate::core_modules::pixel::pixel::Pixel;
    use crate::core_modules::region::Region;

    /// A 4x3 RGB frame whose pixel at (x, y) is (x, y, x + 10 * y).
    fn coordinate_frame() -> Vec<u8> {
        let mut data = Vec::new();
        for y in 0..3u8 {
            for x in 0..4u8 {
                data.extend_from_slice(&[x, y, x + 10 * y]);
            }
        }
        data
    }

    #[test]
    fn no_region_returns_the_full_frame() {
        let data = coordinate_frame();
        let frame = Frame::new(&data, 4, 3, PixelLayout::Rgb).unwrap();
        let view = extract(&frame, None).unwrap();
        assert_eq!((view.width(), view.height()), (4, 3));
    }

    #[test]
    fn valid_region_is_a_view_onto_the_same_pixels() {
        let data = coordinate_frame();
        let frame = Frame::new(&data, 4, 3, PixelLayout::Rgb).unwrap();
        let view = extract(&frame, Some(&Region::new(1, 1, 3, 2))).unwrap();
        assert_eq!((view.width(), view.height()), (3, 2));
        assert_eq!(view.pixel(0, 0), Pixel::new(1, 1, 11));
        assert_eq!(view.pixel(2, 1), Pixel::new(3, 2, 23));
        assert_eq!(view.pixels().count(), 6);
    }

    #[test]
    fn region_touching_the_far_edges_is_valid() {
        let data = coordinate_frame();
        let frame = Frame::new(&data, 4, 3, PixelLayout::Rgb).unwrap();
        assert!(is_within(&frame, &Region::new(0, 0, 4, 3)));
        assert!(is_within(&frame, &Region::new(3, 2, 1, 1)));
    }

    #[test]
    fn invalid_regions_are_rejected() {
        let data = coordinate_frame();
        let frame = Frame::new(&data, 4, 3, PixelLayout::Rgb).unwrap();
        for region in [
            Region::new(-1, 0, 2, 2),
            Region::new(0, -1, 2, 2),
            Region::new(3, 0, 2, 1),
            Region::new(0, 2, 1, 2),
            Region::new(0, 0, 0, 1),
            Region::new(0, 0, 1, 0),
            Region::new(i32::MAX, 0, i32::MAX, 1),
        ] {
            assert!(!is_within(&frame, &region), "{region} should be rejected");
            match extract(&frame, Some(&region)) {
                Err(Error::OutOfBounds {
                    region: reported,
                    frame_width: 4,
                    frame_height: 3,
                }) => assert_eq!(reported, region),
                other => panic!("unexpected result for {region}: {other:?}"),
            }
        }
    }
}
