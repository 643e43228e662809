use crate::config::{Connectivity, RegionConfig};
use crate::models::{BinaryMask, Region};

const FOUR: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const EIGHT: [(i64, i64); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Labels connected ink components and measures each one.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionExtractor {
    config: RegionConfig,
}

impl RegionExtractor {
    pub fn new(config: RegionConfig) -> Self {
        Self { config }
    }

    /// Regions come back in raster order of their first pixel, which carries no
    /// meaning beyond being deterministic.
    pub fn extract(&self, mask: &BinaryMask) -> Vec<Region> {
        let neighbours: &[(i64, i64)] = match self.config.connectivity {
            Connectivity::Four => &FOUR,
            Connectivity::Eight => &EIGHT,
        };

        let (width, height) = (mask.width(), mask.height());
        let mut labels = vec![0u32; width as usize * height as usize];
        let mut regions = Vec::new();
        let mut stack = Vec::new();

        for y in 0..height {
            for x in 0..width {
                let idx = y as usize * width as usize + x as usize;
                if !mask.is_ink(x, y) || labels[idx] != 0 {
                    continue;
                }

                let label = regions.len() as u32 + 1;
                labels[idx] = label;
                stack.push((x, y));
                let mut region = Region {
                    label,
                    min_x: x,
                    min_y: y,
                    max_x: x,
                    max_y: y,
                    pixel_count: 0,
                };

                while let Some((px, py)) = stack.pop() {
                    region.min_x = region.min_x.min(px);
                    region.min_y = region.min_y.min(py);
                    region.max_x = region.max_x.max(px);
                    region.max_y = region.max_y.max(py);
                    region.pixel_count += 1;

                    for &(dx, dy) in neighbours {
                        let nx = px as i64 + dx;
                        let ny = py as i64 + dy;
                        if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                            continue;
                        }
                        let (nx, ny) = (nx as u32, ny as u32);
                        let nidx = ny as usize * width as usize + nx as usize;
                        if mask.is_ink(nx, ny) && labels[nidx] == 0 {
                            labels[nidx] = label;
                            stack.push((nx, ny));
                        }
                    }
                }

                regions.push(region);
            }
        }

        regions
    }
}
