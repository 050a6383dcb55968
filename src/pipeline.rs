//! Image in, cell count out.

use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::config::{ConfigError, CountConfig};
use crate::estimate::{CellEstimator, ClassifiedRegion, RunResult};
use crate::segmentation::{self, Mask, StructuringElement, color_filter::FilterError};

/// Errors surfaced to the caller of the counting pipeline.
#[derive(Debug, thiserror::Error)]
pub enum CountError {
    #[error("could not read image '{}': {source}", path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("could not save image '{}': {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Everything one counting run produces.
#[derive(Debug, Clone)]
pub struct CellCount {
    /// Color threshold before cleaning.
    pub raw_mask: Mask,
    /// Mask after opening and closing; regions are traced from this one.
    pub mask: Mask,
    pub regions: Vec<ClassifiedRegion>,
    pub result: RunResult,
}

/// Decodes an image file into RGB.
pub fn load_image(path: impl AsRef<Path>) -> Result<RgbImage, CountError> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| CountError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgb8())
}

/// Saves any image buffer, reporting the destination on failure.
pub fn save_image<P, C>(
    img: &image::ImageBuffer<P, C>,
    path: impl AsRef<Path>,
) -> Result<(), CountError>
where
    P: image::Pixel + image::PixelWithColorType,
    [P::Subpixel]: image::EncodableLayout,
    C: std::ops::Deref<Target = [P::Subpixel]>,
{
    let path = path.as_ref();
    img.save(path).map_err(|source| CountError::Save {
        path: path.to_path_buf(),
        source,
    })
}

/// Runs the full pipeline: color threshold, mask cleaning, boundary tracing
/// and area classification.
///
/// The configuration is validated before any pixel is touched.
pub fn count_cells(image: &RgbImage, config: &CountConfig) -> Result<CellCount, CountError> {
    config.validate()?;

    let (lower, upper) = config.rgb_bounds();
    let raw_mask = segmentation::filter(image, lower, upper)?;
    log::debug!(
        "color mask: {} of {} pixels in range",
        segmentation::foreground_count(&raw_mask),
        raw_mask.as_raw().len()
    );

    let element = StructuringElement::from_config(config);
    let mask = segmentation::clean(
        &raw_mask,
        &element,
        config.open_iterations,
        config.close_iterations,
    );

    let regions = segmentation::extract_regions(&mask);
    let (regions, result) = CellEstimator::from_config(config).classify(regions);
    log::info!(
        "counted {} cells in {} regions",
        result.total_cells,
        regions.len()
    );

    Ok(CellCount {
        raw_mask,
        mask,
        regions,
        result,
    })
}
