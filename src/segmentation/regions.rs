use imageproc::contours::{BorderType, find_contours};
use imageproc::point::Point;

use super::Mask;

/// One connected foreground component, described by its outer boundary.
///
/// The boundary runs through pixel centres with collinear steps collapsed, and
/// `area` is the shoelace area of that polygon. This is not the pixel count: a
/// lone pixel has area 0 and an `n x n` block has area `(n - 1)^2`. The area
/// thresholds in [`crate::config::CountConfig`] are calibrated against this
/// polygon area.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    boundary: Vec<Point<i32>>,
    area: f64,
}

impl Region {
    pub fn from_boundary(boundary: Vec<Point<i32>>) -> Self {
        let area = polygon_area(&boundary);
        Self { boundary, area }
    }

    pub fn boundary(&self) -> &[Point<i32>] {
        &self.boundary
    }

    pub fn area(&self) -> f64 {
        self.area
    }
}

/// Finds every outermost foreground component (8-connected) and returns one
/// region per component. Islands sitting inside a hole of another component
/// are not reported.
pub fn extract_regions(mask: &Mask) -> Vec<Region> {
    if mask.width() == 0 || mask.height() == 0 {
        return Vec::new();
    }

    let regions: Vec<Region> = find_contours::<i32>(&pad_with_background(mask))
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .map(|c| {
            let points: Vec<Point<i32>> =
                c.points.iter().map(|p| Point::new(p.x - 1, p.y - 1)).collect();
            Region::from_boundary(simplify_collinear(&points))
        })
        .collect();

    log::debug!("extracted {} external regions", regions.len());
    regions
}

/// Copies `mask` into a frame one background pixel wider on every side.
///
/// The tracer loses components that touch two opposite image edges; with the
/// frame every component is enclosed by background.
fn pad_with_background(mask: &Mask) -> Mask {
    let mut padded = Mask::new(mask.width() + 2, mask.height() + 2);
    for (x, y, px) in mask.enumerate_pixels() {
        padded.put_pixel(x + 1, y + 1, *px);
    }
    padded
}

/// Drops boundary points that lie on a straight run between their neighbours.
pub fn simplify_collinear(points: &[Point<i32>]) -> Vec<Point<i32>> {
    let mut deduped: Vec<Point<i32>> = Vec::with_capacity(points.len());
    for &p in points {
        if deduped.last() != Some(&p) {
            deduped.push(p);
        }
    }
    while deduped.len() > 1 && deduped.first() == deduped.last() {
        deduped.pop();
    }

    let n = deduped.len();
    if n < 3 {
        return deduped;
    }

    let step = |a: Point<i32>, b: Point<i32>| ((b.x - a.x).signum(), (b.y - a.y).signum());
    (0..n)
        .filter(|&i| {
            let prev = deduped[(i + n - 1) % n];
            let cur = deduped[i];
            let next = deduped[(i + 1) % n];
            step(prev, cur) != step(cur, next)
        })
        .map(|i| deduped[i])
        .collect()
}

/// Shoelace area of a closed polygon.
pub fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let n = points.len();
    let twice: i64 = (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64
        })
        .sum();

    (twice as f64 / 2.0).abs()
}
