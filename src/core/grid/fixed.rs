//! Deterministic fixed-grid partitioning.

use super::{extract_region, GridRegion};
use image::RgbaImage;

/// Partition an image into `rows x cols` equal-size cells.
///
/// Cell dimensions are floor-divided, so a few trailing pixels on the
/// right/bottom edge may be dropped when the image does not divide
/// evenly. Cells are returned row-major. Zero counts are treated as 1;
/// a 1x1 request returns the single whole-image cell, which callers
/// treat as "no split".
pub fn split_fixed(image: &RgbaImage, rows: u32, cols: u32) -> Vec<(GridRegion, RgbaImage)> {
    let rows = rows.max(1);
    let cols = cols.max(1);

    let cell_width = image.width() / cols;
    let cell_height = image.height() / rows;
    if cell_width == 0 || cell_height == 0 {
        return Vec::new();
    }

    let mut cells = Vec::with_capacity(rows as usize * cols as usize);
    for row in 0..rows {
        for col in 0..cols {
            let region = GridRegion {
                x: col * cell_width,
                y: row * cell_height,
                width: cell_width,
                height: cell_height,
            };
            cells.push((region, extract_region(image, &region)));
        }
    }

    cells
}
