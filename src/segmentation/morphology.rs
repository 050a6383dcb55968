use crate::config::{CountConfig, ElementShape};

use super::{BACKGROUND, FOREGROUND, Mask};

/// Small binary kernel defining the neighbourhood of erosion and dilation.
///
/// Cells are stored as `(dx, dy)` offsets from the anchor, which sits at
/// `(width / 2, height / 2)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuringElement {
    width: usize,
    height: usize,
    offsets: Vec<(i32, i32)>,
}

#[derive(Clone, Copy)]
enum Op {
    Erode,
    Dilate,
}

impl StructuringElement {
    /// Builds an element the way common vision libraries do: `Rect` fills the
    /// box, `Cross` keeps the anchor row and column, and `Ellipse` keeps the
    /// cells inside the ellipse inscribed in the box (a 3x3 ellipse is a cross).
    pub fn new(shape: ElementShape, width: usize, height: usize) -> Self {
        let (anchor_x, anchor_y) = (width / 2, height / 2);
        let r = (height / 2) as f64;
        let c = (width / 2) as f64;
        let inv_r2 = if r > 0.0 { 1.0 / (r * r) } else { 0.0 };

        let mut offsets = Vec::new();
        for row in 0..height {
            let (start, end) = match shape {
                ElementShape::Rect => (0, width),
                ElementShape::Cross if row == anchor_y => (0, width),
                ElementShape::Cross => (anchor_x, anchor_x + 1),
                ElementShape::Ellipse => {
                    let dy = row as f64 - r;
                    if dy.abs() > r {
                        (0, 0)
                    } else {
                        let dx = (c * ((r * r - dy * dy) * inv_r2).sqrt()).round() as usize;
                        (anchor_x.saturating_sub(dx), (anchor_x + dx + 1).min(width))
                    }
                }
            };
            for col in start..end {
                offsets.push((col as i32 - anchor_x as i32, row as i32 - anchor_y as i32));
            }
        }

        Self {
            width,
            height,
            offsets,
        }
    }

    pub fn from_config(config: &CountConfig) -> Self {
        Self::new(
            config.element_shape,
            config.element_width,
            config.element_height,
        )
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn offsets(&self) -> &[(i32, i32)] {
        &self.offsets
    }

    /// Whether the kernel cell at `(col, row)` is set.
    pub fn contains(&self, col: usize, row: usize) -> bool {
        let dx = col as i32 - (self.width / 2) as i32;
        let dy = row as i32 - (self.height / 2) as i32;
        self.offsets.contains(&(dx, dy))
    }
}

impl Default for StructuringElement {
    fn default() -> Self {
        Self::from_config(&CountConfig::default())
    }
}

/// Pixels outside the image are ignored, so erosion does not eat regions that
/// touch the border and dilation does not grow from outside.
fn apply(mask: &Mask, element: &StructuringElement, op: Op) -> Mask {
    let (width, height) = mask.dimensions();
    let (w, h) = (width as i64, height as i64);
    let src = mask.as_raw();
    let mut out = Mask::new(width, height);

    for (x, y, px) in out.enumerate_pixels_mut() {
        let mut covered = element.offsets.iter().filter_map(|&(dx, dy)| {
            let nx = x as i64 + dx as i64;
            let ny = y as i64 + dy as i64;
            if nx < 0 || ny < 0 || nx >= w || ny >= h {
                return None;
            }
            Some(src[(ny * w + nx) as usize] != BACKGROUND)
        });
        let on = match op {
            Op::Erode => covered.all(|fg| fg),
            Op::Dilate => covered.any(|fg| fg),
        };
        px.0[0] = if on { FOREGROUND } else { BACKGROUND };
    }

    out
}

/// A pixel stays foreground only if every covered neighbour is foreground.
pub fn erode(mask: &Mask, element: &StructuringElement) -> Mask {
    apply(mask, element, Op::Erode)
}

/// A pixel becomes foreground if any covered neighbour is foreground.
pub fn dilate(mask: &Mask, element: &StructuringElement) -> Mask {
    apply(mask, element, Op::Dilate)
}

fn repeat(mask: &Mask, element: &StructuringElement, op: Op, times: usize) -> Mask {
    let mut out = mask.clone();
    for _ in 0..times {
        out = apply(&out, element, op);
    }
    out
}

/// `iterations` erosions followed by as many dilations.
pub fn open(mask: &Mask, element: &StructuringElement, iterations: usize) -> Mask {
    let eroded = repeat(mask, element, Op::Erode, iterations);
    repeat(&eroded, element, Op::Dilate, iterations)
}

/// `iterations` dilations followed by as many erosions.
pub fn close(mask: &Mask, element: &StructuringElement, iterations: usize) -> Mask {
    let dilated = repeat(mask, element, Op::Dilate, iterations);
    repeat(&dilated, element, Op::Erode, iterations)
}

/// Strips speckles smaller than the element, then bridges small gaps and holes.
pub fn clean(
    mask: &Mask,
    element: &StructuringElement,
    open_iterations: usize,
    close_iterations: usize,
) -> Mask {
    let opened = open(mask, element, open_iterations);
    let closed = close(&opened, element, close_iterations);
    log::debug!(
        "cleaned mask: {} -> {} foreground pixels",
        super::foreground_count(mask),
        super::foreground_count(&closed)
    );
    closed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(element: &StructuringElement) -> Vec<String> {
        let (w, h) = element.size();
        (0..h)
            .map(|row| {
                (0..w)
                    .map(|col| if element.contains(col, row) { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn ellipse_3x3_is_a_cross() {
        let element = StructuringElement::new(ElementShape::Ellipse, 3, 3);
        assert_eq!(pattern(&element), [".#.", "###", ".#."]);
        assert_eq!(element, StructuringElement::new(ElementShape::Cross, 3, 3));
    }

    #[test]
    fn ellipse_5x5_matches_reference_shape() {
        let element = StructuringElement::new(ElementShape::Ellipse, 5, 5);
        assert_eq!(
            pattern(&element),
            ["..#..", "#####", "#####", "#####", "..#.."]
        );
    }

    #[test]
    fn rect_fills_box() {
        let element = StructuringElement::new(ElementShape::Rect, 3, 2);
        assert_eq!(element.offsets().len(), 6);
        assert_eq!(pattern(&element), ["###", "###"]);
    }

    #[test]
    fn zero_iterations_leave_mask_untouched() {
        let mut mask = Mask::new(5, 5);
        mask.put_pixel(2, 2, image::Luma([FOREGROUND]));
        let element = StructuringElement::default();
        assert_eq!(open(&mask, &element, 0), mask);
        assert_eq!(close(&mask, &element, 0), mask);
    }
}
