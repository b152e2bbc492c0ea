//! Edge-detection based grid detection.
//!
//! Pipeline: grayscale -> Sobel edge magnitude -> binary edge map ->
//! flood fill from a coarse seed grid over non-edge pixels -> bounding
//! boxes filtered by aspect ratio and area -> overlapping boxes merged.
//! Two or more surviving candidates mean the image is a grid.

use super::{extract_region, GridRegion};
use image::RgbaImage;
use rayon::prelude::*;
use std::collections::VecDeque;

/// Sobel kernel pair (horizontal gradient, vertical gradient)
const SOBEL_X: [i32; 9] = [-1, 0, 1, -2, 0, 2, -1, 0, 1];
const SOBEL_Y: [i32; 9] = [-1, -2, -1, 0, 0, 0, 1, 2, 1];

/// Candidate aspect ratio bounds; regions outside are text/UI noise
const MIN_ASPECT: f64 = 0.3;
const MAX_ASPECT: f64 = 3.0;

/// Minimum candidate area as a fraction of the full image
const MIN_AREA_FRACTION: f64 = 0.05;

/// Auto-detector for multi-image screenshots.
pub struct GridDetector {
    /// 0-100; higher detects fainter edges
    sensitivity: u8,
    /// Flood-fill seeds are sampled every this many pixels
    seed_stride: u32,
    /// Visited-pixel budget per flood fill, bounding worst-case cost
    fill_budget: usize,
    /// Smallest candidate area as a fraction of the full image
    min_area_fraction: f64,
}

impl GridDetector {
    /// Create a detector with the given sensitivity (clamped to 0-100)
    pub fn new(sensitivity: u8) -> Self {
        Self {
            sensitivity: sensitivity.min(100),
            seed_stride: 10,
            fill_budget: 10_000,
            min_area_fraction: MIN_AREA_FRACTION,
        }
    }

    /// Override the seed sampling stride
    pub fn with_seed_stride(mut self, stride: u32) -> Self {
        self.seed_stride = stride.max(1);
        self
    }

    /// Override the per-fill visited-pixel budget
    pub fn with_fill_budget(mut self, budget: usize) -> Self {
        self.fill_budget = budget.max(1);
        self
    }

    /// Override the minimum candidate area fraction
    pub fn with_min_area_fraction(mut self, fraction: f64) -> Self {
        self.min_area_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    /// Detect candidate sub-image regions.
    ///
    /// Returns the merged candidate list; fewer than two candidates
    /// means the image should be treated as a single unit.
    pub fn detect(&self, image: &RgbaImage) -> Vec<GridRegion> {
        let width = image.width() as usize;
        let height = image.height() as usize;
        if width < 3 || height < 3 {
            return Vec::new();
        }

        let gray = grayscale(image);
        let edges = self.edge_map(&gray, width, height);

        // Area is judged only after merging: individual fills are
        // bounded by the budget and may each cover a small patch of a
        // large panel. The minimum itself is inclusive.
        let min_area = (width as f64 * height as f64 * self.min_area_fraction) as u64;
        let candidates = self.collect_regions(&edges, width, height);
        merge_overlapping(candidates)
            .into_iter()
            .filter(|region| region.area() >= min_area)
            .collect()
    }

    /// Detect and, when the image really is a grid, extract each region
    /// as an independent pixel copy.
    pub fn split(&self, image: &RgbaImage) -> Option<Vec<(GridRegion, RgbaImage)>> {
        let regions = self.detect(image);
        if regions.len() < 2 {
            return None;
        }

        Some(
            regions
                .into_iter()
                .map(|region| {
                    let pixels = extract_region(image, &region);
                    (region, pixels)
                })
                .collect(),
        )
    }

    /// Threshold Sobel magnitude into a binary edge map.
    ///
    /// Sensitivity 0-100 maps linearly onto the brightness-difference
    /// threshold: 0 -> 255 (nothing is an edge), 100 -> 0 (everything
    /// is). The one-pixel image border, where the kernel does not fit,
    /// always counts as edge so fills stay inside the frame. Interior
    /// rows are independent, so they run in parallel.
    fn edge_map(&self, gray: &[u8], width: usize, height: usize) -> Vec<bool> {
        let threshold = 255.0 - self.sensitivity as f64 * 2.55;

        let mut edges = vec![false; width * height];
        edges
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                if y == 0 || y == height - 1 {
                    row.fill(true);
                    return;
                }
                row[0] = true;
                row[width - 1] = true;
                for x in 1..width - 1 {
                    let mut gx = 0i32;
                    let mut gy = 0i32;
                    for ky in 0..3usize {
                        for kx in 0..3usize {
                            let sample = gray[(y + ky - 1) * width + (x + kx - 1)] as i32;
                            let k = ky * 3 + kx;
                            gx += sample * SOBEL_X[k];
                            gy += sample * SOBEL_Y[k];
                        }
                    }
                    let magnitude = ((gx * gx + gy * gy) as f64).sqrt();
                    row[x] = magnitude > threshold;
                }
            });

        edges
    }

    /// Seed flood fills from a coarse grid over non-edge pixels and keep
    /// bounding boxes that look like pictures.
    fn collect_regions(&self, edges: &[bool], width: usize, height: usize) -> Vec<GridRegion> {
        let stride = self.seed_stride as usize;

        let mut visited = vec![false; width * height];
        let mut regions = Vec::new();

        let mut y = 0;
        while y < height {
            let mut x = 0;
            while x < width {
                let idx = y * width + x;
                if !visited[idx] && !edges[idx] {
                    if let Some(region) = self.flood_fill(edges, width, height, x, y, &mut visited)
                    {
                        regions.push(region);
                    }
                }
                x += stride;
            }
            y += stride;
        }

        regions
    }

    /// Breadth-first fill over non-edge pixels, bounded by the visited
    /// budget. Returns the bounding box when its shape passes the aspect
    /// filter.
    fn flood_fill(
        &self,
        edges: &[bool],
        width: usize,
        height: usize,
        start_x: usize,
        start_y: usize,
        visited: &mut [bool],
    ) -> Option<GridRegion> {
        let (mut min_x, mut max_x) = (start_x, start_x);
        let (mut min_y, mut max_y) = (start_y, start_y);

        let mut queue = VecDeque::new();
        queue.push_back((start_x, start_y));
        let mut filled = 0usize;

        while let Some((x, y)) = queue.pop_front() {
            if filled >= self.fill_budget {
                break;
            }
            let idx = y * width + x;
            if visited[idx] || edges[idx] {
                continue;
            }
            visited[idx] = true;
            filled += 1;

            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);

            if x + 1 < width {
                queue.push_back((x + 1, y));
            }
            if x > 0 {
                queue.push_back((x - 1, y));
            }
            if y + 1 < height {
                queue.push_back((x, y + 1));
            }
            if y > 0 {
                queue.push_back((x, y - 1));
            }
        }

        let region_width = (max_x - min_x + 1) as u32;
        let region_height = (max_y - min_y + 1) as u32;

        let aspect = region_width as f64 / region_height as f64;
        if !(MIN_ASPECT..=MAX_ASPECT).contains(&aspect) {
            return None;
        }

        Some(GridRegion {
            x: min_x as u32,
            y: min_y as u32,
            width: region_width,
            height: region_height,
        })
    }
}

impl Default for GridDetector {
    fn default() -> Self {
        Self::new(50)
    }
}

fn grayscale(image: &RgbaImage) -> Vec<u8> {
    image
        .pixels()
        .map(|p| {
            let [r, g, b, _] = p.0;
            ((r as u16 + g as u16 + b as u16) / 3) as u8
        })
        .collect()
}

/// Merge overlapping bounding boxes into their unions, iterated until no
/// pair overlaps (merging can create new overlaps).
fn merge_overlapping(mut regions: Vec<GridRegion>) -> Vec<GridRegion> {
    loop {
        let mut merged: Vec<GridRegion> = Vec::with_capacity(regions.len());
        let mut changed = false;

        for region in regions {
            match merged.iter_mut().find(|m| m.overlaps(&region)) {
                Some(existing) => {
                    *existing = existing.union(&region);
                    changed = true;
                }
                None => merged.push(region),
            }
        }

        if !changed {
            return merged;
        }
        regions = merged;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    /// 1200x600 white canvas with two full-height black separator lines,
    /// giving three 400x600 panels.
    fn three_panel_image() -> RgbaImage {
        ImageBuffer::from_fn(1200, 600, |x, _| {
            if (398..=402).contains(&x) || (798..=802).contains(&x) {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        })
    }

    #[test]
    fn uniform_image_is_single_unit() {
        let image: RgbaImage = ImageBuffer::from_pixel(400, 400, Rgba([200, 200, 200, 255]));

        assert!(GridDetector::new(50).split(&image).is_none());
    }

    #[test]
    fn three_panels_are_detected() {
        let image = three_panel_image();
        let detector = GridDetector::new(60);

        let regions = detector.detect(&image);

        assert_eq!(regions.len(), 3, "expected three panels, got {regions:?}");
        for region in &regions {
            assert!((350..=450).contains(&region.width), "width {region:?}");
            assert!(region.height >= 550, "height {region:?}");
        }
    }

    #[test]
    fn split_extracts_independent_copies() {
        let image = three_panel_image();
        let detector = GridDetector::new(60);

        let parts = detector.split(&image).expect("image should split");

        assert_eq!(parts.len(), 3);
        let total_area: u64 = parts.iter().map(|(r, _)| r.area()).sum();
        assert!(total_area <= 1200 * 600, "split conservation violated");
        for (region, pixels) in &parts {
            assert_eq!(pixels.dimensions(), (region.width, region.height));
        }
    }

    #[test]
    fn tiny_image_yields_no_regions() {
        let image: RgbaImage = ImageBuffer::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        assert!(GridDetector::default().detect(&image).is_empty());
    }

    #[test]
    fn region_at_exactly_the_minimum_area_is_kept() {
        // Uniform 128x128: the border is always edge, so the single
        // interior candidate is exactly 126x126 = 15876 pixels. The
        // fraction 3969/4096 makes min_area land on exactly 15876
        // (both terms are dyadic, so the product is exact in f64).
        let image: RgbaImage = ImageBuffer::from_pixel(128, 128, Rgba([50, 50, 50, 255]));
        let detector = GridDetector::new(50)
            .with_min_area_fraction(3969.0 / 4096.0)
            .with_fill_budget(126 * 126);

        assert_eq!(detector.detect(&image).len(), 1);
    }

    #[test]
    fn truncated_fills_do_not_fake_a_grid() {
        let image: RgbaImage = ImageBuffer::from_pixel(500, 500, Rgba([255, 255, 255, 255]));
        // Tiny budget: every fill truncates, but the merged result must
        // still read as a single unit
        let detector = GridDetector::new(50).with_fill_budget(100);

        assert!(detector.split(&image).is_none());
    }

    #[test]
    fn merge_unions_transitive_overlaps() {
        let regions = vec![
            GridRegion { x: 0, y: 0, width: 10, height: 10 },
            GridRegion { x: 8, y: 0, width: 10, height: 10 },
            GridRegion { x: 16, y: 0, width: 10, height: 10 },
        ];

        let merged = merge_overlapping(regions);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].width, 26);
    }
}
