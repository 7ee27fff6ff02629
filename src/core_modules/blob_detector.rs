// THEORY:
// The `BlobDetector` turns a binary `Mask` into a list of spatially coherent objects.
// Every group of on-pixels that touch each other, including diagonally, is one blob,
// summarized by the smallest axis-aligned rectangle that encloses it.
//
// Key architectural principles & algorithm steps:
// 1.  **Seeding in Scan Order**: The mask is scanned row by row. The first unvisited
//     on-pixel encountered becomes the seed of a new blob, which fixes the output
//     order: blobs appear in the raster order of their top-most, left-most pixel.
// 2.  **Region Growing**: From each seed, an iterative depth-first fill adds every
//     8-connected on-pixel. A shared `visited` grid guarantees each pixel joins
//     exactly one blob. Interior holes simply stay off; they are never reported.
// 3.  **Data Aggregation**: While growing, the fill tracks the min/max coordinates and
//     the pixel count, so a blob is summarized without storing its pixels.
// 4.  **Stateless Utility**: `find_blobs` takes one mask and returns blobs for that mask
//     only. It holds no memory between calls.

use crate::core_modules::mask::Mask;

/// A coordinate in mask space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

/// One connected group of on-pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    /// Inclusive top-left and bottom-right corners of the enclosing rectangle.
    pub bounding_box: (Point, Point),
    /// The number of on-pixels that make up this blob.
    pub size_in_pixels: usize,
}

impl Blob {
    pub fn width(&self) -> u32 {
        self.bounding_box.1.x - self.bounding_box.0.x + 1
    }

    pub fn height(&self) -> u32 {
        self.bounding_box.1.y - self.bounding_box.0.y + 1
    }
}

pub mod blob_detector {
    use super::*;

    /// The 8 neighbors of a pixel, as offsets.
    const NEIGHBORS: [(i64, i64); 8] = [
        (-1, -1),
        (0, -1),
        (1, -1),
        (-1, 0),
        (1, 0),
        (-1, 1),
        (0, 1),
        (1, 1),
    ];

    /// Finds all 8-connected blobs of on-pixels in `mask`, in scan order of their seeds.
    pub fn find_blobs(mask: &Mask) -> Vec<Blob> {
        let width = mask.width() as usize;
        let height = mask.height() as usize;
        let mut visited = vec![false; width * height];
        let mut blobs: Vec<Blob> = Vec::new();

        for y in 0..mask.height() {
            for x in 0..mask.width() {
                let index = y as usize * width + x as usize;
                if visited[index] || !mask.get(x, y) {
                    continue;
                }
                blobs.push(grow_blob_from_seed(Point { x, y }, mask, &mut visited));
            }
        }

        blobs
    }

    /// Collects every on-pixel connected to `seed` and summarizes them.
    fn grow_blob_from_seed(seed: Point, mask: &Mask, visited: &mut [bool]) -> Blob {
        let width = mask.width() as i64;
        let height = mask.height() as i64;

        let mut stack: Vec<Point> = vec![seed];
        visited[(seed.y as i64 * width + seed.x as i64) as usize] = true;

        let mut min = seed;
        let mut max = seed;
        let mut size_in_pixels = 0;

        while let Some(current) = stack.pop() {
            size_in_pixels += 1;
            min.x = min.x.min(current.x);
            min.y = min.y.min(current.y);
            max.x = max.x.max(current.x);
            max.y = max.y.max(current.y);

            for (dx, dy) in NEIGHBORS {
                let nx = current.x as i64 + dx;
                let ny = current.y as i64 + dy;
                if nx < 0 || nx >= width || ny < 0 || ny >= height {
                    continue;
                }
                let index = (ny * width + nx) as usize;
                if !visited[index] && mask.get(nx as u32, ny as u32) {
                    visited[index] = true;
                    stack.push(Point {
                        x: nx as u32,
                        y: ny as u32,
                    });
                }
            }
        }

        Blob {
            bounding_box: (min, max),
            size_in_pixels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::blob_detector::find_blobs;
    use super::*;

    fn mask_from_rows(rows: &[&str]) -> Mask {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |row| row.len()) as u32;
        Mask::from_fn(width, height, |x, y| rows[y as usize].as_bytes()[x as usize] == b'#')
    }

    #[test]
    fn empty_mask_has_no_blobs() {
        assert!(find_blobs(&mask_from_rows(&["....", "...."])).is_empty());
        assert!(find_blobs(&Mask::from_fn(0, 0, |_, _| true)).is_empty());
    }

    #[test]
    fn solid_rectangle_is_one_blob() {
        let mask = mask_from_rows(&["......", ".###..", ".###..", "......"]);
        let blobs = find_blobs(&mask);
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].bounding_box, (Point { x: 1, y: 1 }, Point { x: 3, y: 2 }));
        assert_eq!((blobs[0].width(), blobs[0].height()), (3, 2));
        assert_eq!(blobs[0].size_in_pixels, 6);
    }

    #[test]
    fn diagonal_neighbors_are_connected() {
        let mask = mask_from_rows(&["#...", ".#..", "..#.", "...#"]);
        let blobs = find_blobs(&mask);
        assert_eq!(blobs.len(), 1);
        assert_eq!((blobs[0].width(), blobs[0].height()), (4, 4));
        assert_eq!(blobs[0].size_in_pixels, 4);
    }

    #[test]
    fn blobs_come_out_in_scan_order_of_their_seeds() {
        let mask = mask_from_rows(&["....##", "#.....", "#...#.", "......"]);
        let blobs = find_blobs(&mask);
        let seeds: Vec<Point> = blobs.iter().map(|b| b.bounding_box.0).collect();
        assert_eq!(seeds, vec![
            Point { x: 4, y: 0 },
            Point { x: 0, y: 1 },
            Point { x: 4, y: 2 },
        ]);
    }

    #[test]
    fn holes_are_not_reported() {
        let mask = mask_from_rows(&["#####", "#...#", "#...#", "#####"]);
        let blobs = find_blobs(&mask);
        assert_eq!(blobs.len(), 1);
        assert_eq!((blobs[0].width(), blobs[0].height()), (5, 4));
        assert_eq!(blobs[0].size_in_pixels, 14);
    }

    #[test]
    fn concave_shapes_grow_around_corners() {
        // A "U" whose arms only join at the bottom row.
        let mask = mask_from_rows(&["#..#", "#..#", "####"]);
        let blobs = find_blobs(&mask);
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].size_in_pixels, 8);
    }
}
