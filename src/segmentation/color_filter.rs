use image::RgbImage;
use kornia::{
    image::{Image, ImageError, ImageSize, allocator::CpuAllocator},
    imgproc,
};

use super::Mask;

type CpuImage<T, const C: usize> = Image<T, C, CpuAllocator>;

/// Errors raised while building the color mask.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("kornia image error: {0}")]
    Kornia(#[from] ImageError),

    #[error("mask buffer does not fit a {width}x{height} image")]
    MaskBuffer { width: u32, height: u32 },
}

/// Marks every pixel whose channels all lie inside `[lower, upper]` (inclusive)
/// as foreground.
///
/// Bounds are indexed in the image's own channel order; callers holding
/// bounds written for another order reorder them first
/// (see [`crate::config::CountConfig::rgb_bounds`]).
pub fn filter(image: &RgbImage, lower: [u8; 3], upper: [u8; 3]) -> Result<Mask, FilterError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Ok(Mask::new(width, height));
    }

    let source = CpuImage::<u8, 3>::new(
        ImageSize {
            width: width as usize,
            height: height as usize,
        },
        image.as_raw().clone(),
        CpuAllocator,
    )?;
    let mut binary = CpuImage::<u8, 1>::from_size_val(source.size(), 0u8, CpuAllocator)?;
    imgproc::threshold::in_range(&source, &mut binary, &lower, &upper)?;

    Mask::from_raw(width, height, binary.as_slice().to_vec())
        .ok_or(FilterError::MaskBuffer { width, height })
}
