// THEORY:
// The `Frame` module is the bridge between a caller's raw capture buffer and every
// analysis in this crate. A frame is not owned here: screen capture code hands us a
// byte slice and a description of how to read it, and we only ever read.
//
// Key architectural principles:
// 1.  **Zero-Copy Views**: A `Frame` borrows the caller's bytes and carries a row
//     stride. Restricting it to a sub-region (see `region_extractor`) only moves the
//     start of the slice and shrinks the dimensions, so nested views never copy pixels.
// 2.  **Explicit Channel Order**: Capture APIs disagree about channel order (BGRA from
//     desktop duplication, RGBA from most image libraries). The layout travels with the
//     frame and `Frame::pixel` is the single place where stored order becomes canonical
//     RGB. Alpha is dropped at that same point.
// 3.  **Fail Fast on Malformed Input**: A buffer that cannot hold the declared
//     geometry is rejected at construction, never padded or truncated.
// 4.  **Owned Frames for Workers**: `FrameBuffer` owns its bytes so a frame can be shared
//     through an `Arc` with worker tasks that outlive the caller's stack frame.

pub mod frame {
    use crate::core_modules::error::{Error, Result};
    use crate::core_modules::pixel::pixel::{Byte, Pixel};
    use image::{RgbImage, RgbaImage};
    use serde::{Deserialize, Serialize};

    /// How the channels of one stored pixel are ordered.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum PixelLayout {
        Rgb,
        Bgr,
        Rgba,
        Bgra,
    }

    impl PixelLayout {
        /// Bytes per stored pixel.
        pub const fn channels(self) -> usize {
            match self {
                PixelLayout::Rgb | PixelLayout::Bgr => 3,
                PixelLayout::Rgba | PixelLayout::Bgra => 4,
            }
        }

        /// Converts one stored pixel into canonical RGB, ignoring alpha.
        #[inline]
        fn to_pixel(self, bytes: &[Byte]) -> Pixel {
            match self {
                PixelLayout::Rgb | PixelLayout::Rgba => Pixel::new(bytes[0], bytes[1], bytes[2]),
                PixelLayout::Bgr | PixelLayout::Bgra => Pixel::new(bytes[2], bytes[1], bytes[0]),
            }
        }
    }

    /// A read-only, strided view over caller-owned pixel data.
    #[derive(Debug, Clone, Copy)]
    pub struct Frame<'a> {
        data: &'a [Byte],
        width: u32,
        height: u32,
        /// Bytes between the starts of two consecutive rows.
        stride: usize,
        layout: PixelLayout,
    }

    impl<'a> Frame<'a> {
        /// Wraps a tightly packed buffer (no row padding).
        pub fn new(data: &'a [Byte], width: u32, height: u32, layout: PixelLayout) -> Result<Self> {
            let stride = (width as usize)
                .checked_mul(layout.channels())
                .ok_or(Error::FrameTooLarge {
                    width,
                    height,
                    stride: usize::MAX,
                })?;
            Self::with_stride(data, width, height, stride, layout)
        }

        /// Wraps a buffer whose rows are `stride` bytes apart.
        pub fn with_stride(
            data: &'a [Byte],
            width: u32,
            height: u32,
            stride: usize,
            layout: PixelLayout,
        ) -> Result<Self> {
            if width > 0 && height > 0 {
                let too_large = || Error::FrameTooLarge {
                    width,
                    height,
                    stride,
                };
                let row_bytes = (width as usize)
                    .checked_mul(layout.channels())
                    .ok_or_else(too_large)?;
                if stride < row_bytes {
                    return Err(Error::InvalidStride { stride, row_bytes });
                }
                let expected = stride
                    .checked_mul(height as usize - 1)
                    .and_then(|bytes| bytes.checked_add(row_bytes))
                    .ok_or_else(too_large)?;
                if data.len() < expected {
                    return Err(Error::BufferTooSmall {
                        expected,
                        actual: data.len(),
                    });
                }
            }
            Ok(Self {
                data,
                width,
                height,
                stride,
                layout,
            })
        }

        pub fn from_rgb_image(image: &'a RgbImage) -> Self {
            let (width, height) = image.dimensions();
            Self {
                data: image.as_raw(),
                width,
                height,
                stride: width as usize * PixelLayout::Rgb.channels(),
                layout: PixelLayout::Rgb,
            }
        }

        pub fn from_rgba_image(image: &'a RgbaImage) -> Self {
            let (width, height) = image.dimensions();
            Self {
                data: image.as_raw(),
                width,
                height,
                stride: width as usize * PixelLayout::Rgba.channels(),
                layout: PixelLayout::Rgba,
            }
        }

        pub fn width(&self) -> u32 {
            self.width
        }

        pub fn height(&self) -> u32 {
            self.height
        }

        /// Number of pixels (not bytes) in the view.
        pub fn pixel_count(&self) -> usize {
            self.width as usize * self.height as usize
        }

        /// A frame without pixels stands in for a missing capture.
        pub fn is_empty(&self) -> bool {
            self.width == 0 || self.height == 0
        }

        /// Reads the pixel at `(x, y)` in canonical RGB.
        ///
        /// Panics if the coordinate lies outside the view.
        #[inline]
        pub fn pixel(&self, x: u32, y: u32) -> Pixel {
            assert!(x < self.width && y < self.height, "pixel ({x}, {y}) outside frame");
            let channels = self.layout.channels();
            let start = y as usize * self.stride + x as usize * channels;
            self.layout.to_pixel(&self.data[start..start + channels])
        }

        /// Iterates one row of the view in canonical RGB.
        pub fn row(self, y: u32) -> impl Iterator<Item = Pixel> + 'a {
            let data: &'a [Byte] = self.data;
            let channels = self.layout.channels();
            let layout = self.layout;
            let row: &'a [Byte] = if y < self.height {
                let start = y as usize * self.stride;
                &data[start..start + self.width as usize * channels]
            } else {
                &[]
            };
            row
                .chunks_exact(channels)
                .map(move |bytes| layout.to_pixel(bytes))
        }

        /// Iterates every pixel of the view in row-major order.
        pub fn pixels(self) -> impl Iterator<Item = Pixel> + 'a {
            (0..self.height).flat_map(move |y| self.row(y))
        }

        /// Narrows the view without validation; callers go through `region_extractor`.
        pub(crate) fn sub_view(&self, x: u32, y: u32, width: u32, height: u32) -> Frame<'a> {
            let data: &'a [Byte] = self.data;
            let start = y as usize * self.stride + x as usize * self.layout.channels();
            Frame {
                data: &data[start..],
                width,
                height,
                stride: self.stride,
                layout: self.layout,
            }
        }
    }

    /// An owned frame that can be shared with worker tasks.
    #[derive(Debug, Clone)]
    pub struct FrameBuffer {
        data: Vec<Byte>,
        width: u32,
        height: u32,
        layout: PixelLayout,
        /// Caller-assigned identifier, carried into log lines.
        pub frame_id: u64,
    }

    impl FrameBuffer {
        /// Takes ownership of a tightly packed buffer after validating its geometry.
        pub fn new(
            data: Vec<Byte>,
            width: u32,
            height: u32,
            layout: PixelLayout,
            frame_id: u64,
        ) -> Result<Self> {
            Frame::new(&data, width, height, layout)?;
            Ok(Self {
                data,
                width,
                height,
                layout,
                frame_id,
            })
        }

        pub fn from_rgb_image(image: RgbImage, frame_id: u64) -> Self {
            let (width, height) = image.dimensions();
            Self {
                data: image.into_raw(),
                width,
                height,
                layout: PixelLayout::Rgb,
                frame_id,
            }
        }

        /// Borrows the buffer as a `Frame`.
        pub fn as_frame(&self) -> Frame<'_> {
            Frame {
                data: &self.data,
                width: self.width,
                height: self.height,
                stride: self.width as usize * self.layout.channels(),
                layout: self.layout,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::frame::*;
    use crate::core_modules::error::Error;
    use crate::core_modules::pixel::pixel::Pixel;

    #[test]
    fn bgr_layout_is_read_as_rgb() {
        let data = [10u8, 20, 30, 40, 50, 60];
        let frame = Frame::new(&data, 2, 1, PixelLayout::Bgr).unwrap();
        assert_eq!(frame.pixel(0, 0), Pixel::new(30, 20, 10));
        assert_eq!(frame.pixel(1, 0), Pixel::new(60, 50, 40));
    }

    #[test]
    fn alpha_is_dropped() {
        let data = [1u8, 2, 3, 255, 4, 5, 6, 0];
        let rgba = Frame::new(&data, 2, 1, PixelLayout::Rgba).unwrap();
        let bgra = Frame::new(&data, 2, 1, PixelLayout::Bgra).unwrap();
        assert_eq!(rgba.pixels().collect::<Vec<_>>(), vec![
            Pixel::new(1, 2, 3),
            Pixel::new(4, 5, 6)
        ]);
        assert_eq!(bgra.pixel(1, 0), Pixel::new(6, 5, 4));
    }

    #[test]
    fn short_buffers_are_rejected() {
        let data = vec![0u8; 11];
        match Frame::new(&data, 2, 2, PixelLayout::Rgb) {
            Err(Error::BufferTooSmall { expected, actual }) => {
                assert_eq!(expected, 12);
                assert_eq!(actual, 11);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn stride_smaller_than_a_row_is_rejected() {
        let data = vec![0u8; 64];
        assert!(matches!(
            Frame::with_stride(&data, 4, 2, 8, PixelLayout::Rgb),
            Err(Error::InvalidStride { stride: 8, row_bytes: 12 })
        ));
    }

    #[test]
    fn strides_that_overflow_the_address_space_are_rejected() {
        let data = [0u8; 3];
        let stride = usize::MAX / 2 + 1;
        assert!(matches!(
            Frame::with_stride(&data, 1, 3, stride, PixelLayout::Rgb),
            Err(Error::FrameTooLarge { width: 1, height: 3, .. })
        ));
        // A single row never multiplies the stride, so it only needs one row of bytes.
        let single = Frame::with_stride(&data, 1, 1, stride, PixelLayout::Rgb).unwrap();
        assert_eq!(single.pixel(0, 0), Pixel::new(0, 0, 0));
    }

    #[test]
    fn padded_rows_are_skipped() {
        // Two 1-pixel rows, each padded to 4 bytes.
        let data = [1u8, 2, 3, 99, 4, 5, 6, 99];
        let frame = Frame::with_stride(&data, 1, 2, 4, PixelLayout::Rgb).unwrap();
        assert_eq!(frame.pixels().collect::<Vec<_>>(), vec![
            Pixel::new(1, 2, 3),
            Pixel::new(4, 5, 6)
        ]);
    }

    #[test]
    fn last_row_may_omit_padding() {
        let data = [1u8, 2, 3, 99, 4, 5, 6];
        assert!(Frame::with_stride(&data, 1, 2, 4, PixelLayout::Rgb).is_ok());
    }

    #[test]
    fn empty_frames_are_constructible() {
        let frame = Frame::new(&[], 0, 0, PixelLayout::Rgb).unwrap();
        assert!(frame.is_empty());
        assert_eq!(frame.pixels().count(), 0);
    }

    #[test]
    fn image_crate_buffers_convert() {
        let image = image::RgbImage::from_pixel(3, 2, image::Rgb([7, 8, 9]));
        let frame = Frame::from_rgb_image(&image);
        assert_eq!((frame.width(), frame.height()), (3, 2));
        assert!(frame.pixels().all(|p| p == Pixel::new(7, 8, 9)));

        let owned = FrameBuffer::from_rgb_image(image, 42);
        assert_eq!(owned.frame_id, 42);
        assert_eq!(owned.as_frame().pixel(2, 1), Pixel::new(7, 8, 9));
    }
}
