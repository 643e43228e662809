use crate::config::AreaBand;
use crate::models::Region;

/// Drops implausibly sized components and orders the rest left to right.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionFilter {
    band: AreaBand,
}

impl RegionFilter {
    pub fn new(band: AreaBand) -> Self {
        Self { band }
    }

    /// Regions sharing a left edge keep the order they were extracted in.
    pub fn filter_and_order(&self, regions: Vec<Region>) -> Vec<Region> {
        let mut kept: Vec<Region> = regions
            .into_iter()
            .filter(|r| self.band.contains(r.area()))
            .collect();
        kept.sort_by_key(|r| r.min_x);
        kept
    }
}
