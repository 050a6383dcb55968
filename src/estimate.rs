//! Area heuristic that turns each region into a cell count.

use std::collections::BTreeMap;

use image::Rgb;

use crate::config::CountConfig;
use crate::segmentation::Region;

/// Area calibration for one imaging setup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaThresholds {
    pub minimum_area: f64,
    pub avg_cell_area: f64,
    pub connected_cell_area: f64,
}

impl AreaThresholds {
    pub fn from_config(config: &CountConfig) -> Self {
        Self {
            minimum_area: config.minimum_area,
            avg_cell_area: config.avg_cell_area,
            connected_cell_area: config.connected_cell_area,
        }
    }
}

impl Default for AreaThresholds {
    fn default() -> Self {
        Self::from_config(&CountConfig::default())
    }
}

/// A kept region with its estimated number of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRegion {
    pub region: Region,
    pub estimated_count: u32,
    pub is_cluster: bool,
}

impl ClassifiedRegion {
    /// Outline color for the render sink.
    pub fn display_color(&self, config: &CountConfig) -> Rgb<u8> {
        if self.is_cluster {
            Rgb(config.cluster_color)
        } else {
            Rgb(config.single_color)
        }
    }
}

/// Occurrences per cluster size, where size 1 means a single cell.
/// Iterates in ascending size order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeHistogram(BTreeMap<u32, u32>);

impl SizeHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, size: u32) {
        *self.0.entry(size).or_insert(0) += 1;
    }

    pub fn get(&self, size: u32) -> Option<u32> {
        self.0.get(&size).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `(size, occurrences)` pairs, smallest size first.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.0.iter().map(|(&size, &count)| (size, count))
    }

    /// Sum of `size * occurrences` over all buckets.
    pub fn cell_total(&self) -> u64 {
        self.iter().map(|(size, count)| size as u64 * count as u64).sum()
    }

    pub fn merge(&mut self, other: &SizeHistogram) {
        for (size, count) in other.iter() {
            *self.0.entry(size).or_insert(0) += count;
        }
    }
}

impl FromIterator<(u32, u32)> for SizeHistogram {
    fn from_iter<I: IntoIterator<Item = (u32, u32)>>(iter: I) -> Self {
        let mut histogram = Self::new();
        for (size, count) in iter {
            if count > 0 {
                *histogram.0.entry(size).or_insert(0) += count;
            }
        }
        histogram
    }
}

/// Terminal output of one counting run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    pub histogram: SizeHistogram,
    pub total_cells: u64,
}

impl RunResult {
    /// Combines two runs. Per-bucket and total sums, so order does not matter.
    pub fn merge(&mut self, other: &RunResult) {
        self.histogram.merge(&other.histogram);
        self.total_cells += other.total_cells;
    }
}

/// Classifies regions as noise, single cells or clusters.
#[derive(Debug, Clone, Default)]
pub struct CellEstimator {
    thresholds: AreaThresholds,
}

impl CellEstimator {
    pub fn new(thresholds: AreaThresholds) -> Self {
        Self { thresholds }
    }

    pub fn from_config(config: &CountConfig) -> Self {
        Self::new(AreaThresholds::from_config(config))
    }

    pub fn thresholds(&self) -> &AreaThresholds {
        &self.thresholds
    }

    /// Estimated cells for a region of `area`, or `None` when the region is
    /// noise. Comparisons are strict: an area equal to `minimum_area` is noise
    /// and an area equal to `connected_cell_area` is still one cell.
    pub fn estimate(&self, area: f64) -> Option<u32> {
        let t = &self.thresholds;
        if area <= t.minimum_area {
            None
        } else if area > t.connected_cell_area {
            Some((area / t.avg_cell_area).ceil() as u32)
        } else {
            Some(1)
        }
    }

    /// Classifies every region and accumulates the histogram and total in the
    /// same pass. Noise regions are dropped from both outputs.
    pub fn classify(&self, regions: Vec<Region>) -> (Vec<ClassifiedRegion>, RunResult) {
        let mut kept = Vec::with_capacity(regions.len());
        let mut result = RunResult::default();

        for region in regions {
            let Some(estimated_count) = self.estimate(region.area()) else {
                continue;
            };
            let is_cluster = region.area() > self.thresholds.connected_cell_area;
            result.histogram.record(estimated_count);
            result.total_cells += estimated_count as u64;
            kept.push(ClassifiedRegion {
                region,
                estimated_count,
                is_cluster,
            });
        }

        log::debug!(
            "kept {} regions, {} cells across {} cluster sizes",
            kept.len(),
            result.total_cells,
            result.histogram.len()
        );
        (kept, result)
    }
}
