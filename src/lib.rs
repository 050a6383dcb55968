//! Estimates the number of cells in a stained microscopy image.
//!
//! Foreground is separated by a color window, cleaned with morphology and
//! traced into regions; each region's polygon area is then turned into either
//! one cell or a cluster of several.

pub mod config;
pub mod estimate;
pub mod overlay;
pub mod pipeline;
pub mod plot_histogram;
pub mod report;
pub mod segmentation;
pub mod test_image_gen;

pub use config::CountConfig;
pub use estimate::{CellEstimator, ClassifiedRegion, RunResult, SizeHistogram};
pub use pipeline::{CellCount, CountError, count_cells, load_image};
