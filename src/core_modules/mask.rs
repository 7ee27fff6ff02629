// THEORY:
// A `Mask` is the binary answer to "which pixels of this view fall inside this color
// range?" It is built once per detection call, consumed by the blob detector and the
// fill-ratio scoring, and dropped when the call returns. Nothing keeps a mask alive.
//
// Key architectural principles:
// 1.  **Same Extent as the View**: Mask coordinates are view coordinates. Translating
//     back to frame space is the caller's job, done once on the final results.
// 2.  **Counting Is the Product**: Both consumers only ever ask "how many on-pixels in
//     this rectangle", so that is the one aggregate the mask provides.
// 3.  **Debuggable**: A mask can be written out as a grayscale PNG, which is the fastest
//     way to see why a color range matches too much or too little on a real capture.

use crate::core_modules::color_range::ColorRange;
use crate::core_modules::error::Result;
use crate::core_modules::frame::frame::Frame;
use image::{GrayImage, ImageEncoder, Luma};
use std::path::Path;

const ON: u8 = 255;
const OFF: u8 = 0;

/// A per-pixel in-range flag over a frame view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    /// Marks every pixel of `frame` whose channels all lie within `range`.
    pub fn from_frame(frame: &Frame<'_>, range: &ColorRange) -> Self {
        let bits = frame.pixels().map(|pixel| range.contains(pixel)).collect();
        Self {
            width: frame.width(),
            height: frame.height(),
            bits,
        }
    }

    /// Builds a mask from a predicate over `(x, y)`.
    pub fn from_fn(width: u32, height: u32, mut is_on: impl FnMut(u32, u32) -> bool) -> Self {
        let mut bits = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                bits.push(is_on(x, y));
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether `(x, y)` is on. Coordinates outside the mask read as off.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.bits[self.index(x, y)]
    }

    /// Total number of on-pixels.
    pub fn count_on(&self) -> usize {
        self.bits.iter().filter(|&&on| on).count()
    }

    /// Number of on-pixels inside the rectangle at `(x, y)` of size `width` x `height`,
    /// clipped to the mask.
    pub fn count_on_in(&self, x: u32, y: u32, width: u32, height: u32) -> usize {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        if x >= x_end || y >= y_end {
            return 0;
        }
        (y..y_end)
            .map(|row| {
                let start = self.index(x, row);
                let end = self.index(x_end - 1, row) + 1;
                self.bits[start..end].iter().filter(|&&on| on).count()
            })
            .sum()
    }

    /// Renders the mask as an 8-bit image: 255 for on, 0 for off.
    pub fn to_luma_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([if self.get(x, y) { ON } else { OFF }])
        })
    }

    /// Writes the mask as a grayscale PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let output = std::fs::File::create(path)?;
        let encoder = image::codecs::png::PngEncoder::new(output);
        encoder.write_image(
            self.to_luma_image().as_raw(),
            self.width,
            self.height,
            image::ExtendedColorType::L8,
        )?;
        Ok(())
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::color_range::{BLACK, WHITE};
    use crate::core_modules::frame::frame::PixelLayout;

    #[test]
    fn mask_marks_in_range_pixels() {
        // Row 0: white, black; row 1: black, gray.
        let data = [255u8, 255, 255, 0, 0, 0, 0, 0, 0, 128, 128, 128];
        let frame = Frame::new(&data, 2, 2, PixelLayout::Rgb).unwrap();

        let white = Mask::from_frame(&frame, &WHITE);
        assert!(white.get(0, 0));
        assert_eq!(white.count_on(), 1);

        let black = Mask::from_frame(&frame, &BLACK);
        assert!(black.get(1, 0) && black.get(0, 1));
        assert!(!black.get(1, 1));
        assert_eq!(black.count_on(), 2);
    }

    #[test]
    fn rectangle_counts_are_clipped() {
        let mask = Mask::from_fn(5, 4, |x, y| (x + y) % 2 == 0);
        assert_eq!(mask.count_on(), 10);
        assert_eq!(mask.count_on_in(0, 0, 2, 2), 2);
        assert_eq!(mask.count_on_in(1, 1, 3, 1), 2);
        assert_eq!(mask.count_on_in(3, 2, 10, 10), 2);
        assert_eq!(mask.count_on_in(5, 0, 1, 1), 0);
        assert_eq!(mask.count_on_in(0, 0, 0, 4), 0);
    }

    #[test]
    fn outside_coordinates_read_as_off() {
        let mask = Mask::from_fn(2, 2, |_, _| true);
        assert!(!mask.get(2, 0));
        assert!(!mask.get(0, 2));
    }

    #[test]
    fn mask_round_trips_through_png() {
        let mask = Mask::from_fn(6, 3, |x, _| x < 2);
        let path = std::env::temp_dir().join("chroma_probe_mask_round_trip.png");
        mask.save_png(&path).expect("Error Saving File.");

        let decoded = image::open(&path).unwrap().to_luma8();
        assert_eq!(decoded.dimensions(), (6, 3));
        assert_eq!(decoded.get_pixel(1, 2), &Luma([255]));
        assert_eq!(decoded.get_pixel(2, 0), &Luma([0]));
        std::fs::remove_file(&path).ok();
    }
}
