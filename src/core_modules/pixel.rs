// THEORY (Single-Pixel Color Heuristics):
// The `Pixel` module is the most fundamental unit of the probe. It is a "dumb" data
// container for one pixel in canonical RGB order plus the handful of 1-dimensional
// heuristics the classifiers aggregate over a region. Nothing in here reads a
// neighbor; anything spatial belongs in `mask` or `blob_detector`.
//
// What lives here:
// - Raw channels (R, G, B) as bytes. Alpha never reaches a `Pixel`: the frame drops it
//   when it converts a stored pixel into canonical order.
// - HSV building blocks: value (max channel), chroma (max - min), and the saturation
//   expressed as an 8-bit value.
// - Opponent-color components used by the colorfulness statistic:
//   • rg = |R - G|
//   • yb = |0.5 * (R + G) - B|
//
// Why an 8-bit saturation?
// Screen automation thresholds are tuned against 8-bit HSV images, where saturation is
// stored as round(255 * chroma / value). Averaging those rounded bytes keeps the mean
// identical to what such tooling reports for the same region.
//
// Key principles:
// 1) Single-pixel scope: heuristics never read neighbors or history.
// 2) Ordering is total and lexicographic on (R, G, B), which makes pixel colors usable
//    as deterministic map keys and tie-breakers.

pub mod pixel {
    pub type Byte = u8;
    pub type Channel = Byte;
    pub type SaturationByte = Byte;
    pub type Opponent = f64;

    pub const CHANNELS: usize = 3;

    /// A single pixel in canonical RGB channel order.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
    }

    impl Pixel {
        pub const fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Pixel { red, green, blue }
        }

        /// HSV Value (V): the brightest channel.
        #[inline]
        pub fn value_hsv(&self) -> Channel {
            self.red.max(self.green).max(self.blue)
        }

        /// Chroma (C): max(R, G, B) - min(R, G, B). Zero for any gray.
        #[inline]
        pub fn chroma(&self) -> Channel {
            self.value_hsv() - self.red.min(self.green).min(self.blue)
        }

        /// Saturation (HSV) as an 8-bit value: round(255 * C / V), zero for black.
        #[inline]
        pub fn saturation_hsv_byte(&self) -> SaturationByte {
            let value = self.value_hsv() as u32;
            if value == 0 {
                return 0;
            }
            let chroma = self.chroma() as u32;
            // Integer round-half-up of 255 * chroma / value; chroma <= value keeps it <= 255.
            ((255 * chroma * 2 + value) / (value * 2)) as SaturationByte
        }

        /// Red-green opponent component: |R - G|.
        #[inline]
        pub fn red_green_opponent(&self) -> Opponent {
            (self.red as Opponent - self.green as Opponent).abs()
        }

        /// Yellow-blue opponent component: |0.5 * (R + G) - B|.
        #[inline]
        pub fn yellow_blue_opponent(&self) -> Opponent {
            (0.5 * (self.red as Opponent + self.green as Opponent) - self.blue as Opponent).abs()
        }
    }

    impl From<[Byte; CHANNELS]> for Pixel {
        fn from(bytes: [Byte; CHANNELS]) -> Self {
            Pixel::new(bytes[0], bytes[1], bytes[2])
        }
    }

    impl From<Pixel> for [Byte; CHANNELS] {
        fn from(pixel: Pixel) -> Self {
            [pixel.red, pixel.green, pixel.blue]
        }
    }

    impl From<image::Rgb<Byte>> for Pixel {
        fn from(rgb: image::Rgb<Byte>) -> Self {
            Pixel::from(rgb.0)
        }
    }
}


// -----------------------------------------------------------------------------
// Glossary: Single-Pixel Color Terms
//
// - Value (HSV): Brightness defined as the maximum of the RGB channels.
//
// - Chroma: max(R,G,B) - min(R,G,B). Zero means perfectly gray.
//
// - Saturation (HSV): Chroma divided by Value. Zero for grays and for black, where the
//   hue is undefined.
//
// - Opponent components: The red-green and yellow-blue differences from Hasler and
//   Süsstrunk's colorfulness measure. Both vanish for any gray pixel.
