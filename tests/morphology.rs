use cell_counter::config::ElementShape;
use cell_counter::segmentation::morphology::{clean, close, open};
use cell_counter::segmentation::{FOREGROUND, Mask, StructuringElement, foreground_count};
use image::Luma;

fn paint(mask: &mut Mask, x: u32, y: u32, w: u32, h: u32) {
    for yy in y..y + h {
        for xx in x..x + w {
            mask.put_pixel(xx, yy, Luma([FOREGROUND]));
        }
    }
}

fn is_fg(mask: &Mask, x: u32, y: u32) -> bool {
    mask.get_pixel(x, y).0[0] == FOREGROUND
}

#[test]
fn opening_removes_speckles() {
    let mut mask = Mask::new(20, 20);
    paint(&mut mask, 3, 3, 1, 1);
    paint(&mut mask, 10, 10, 2, 2);
    let opened = open(&mask, &StructuringElement::default(), 1);
    assert_eq!(foreground_count(&opened), 0);
}

#[test]
fn opening_with_cross_trims_square_corners() {
    let mut mask = Mask::new(30, 30);
    paint(&mut mask, 10, 10, 10, 10);
    let opened = open(&mask, &StructuringElement::default(), 1);
    assert_eq!(foreground_count(&opened), 96);
    assert!(!is_fg(&opened, 10, 10));
    assert!(is_fg(&opened, 11, 10));
    assert!(!is_fg(&opened, 19, 19));
}

#[test]
fn rect_opening_keeps_squares() {
    let mut mask = Mask::new(30, 30);
    paint(&mut mask, 10, 10, 10, 10);
    let element = StructuringElement::new(ElementShape::Rect, 3, 3);
    assert_eq!(open(&mask, &element, 1), mask);
}

#[test]
fn closing_fills_small_hole() {
    let mut square = Mask::new(20, 20);
    paint(&mut square, 5, 5, 9, 9);
    let mut holed = square.clone();
    holed.put_pixel(9, 9, Luma([0]));

    let closed = close(&holed, &StructuringElement::default(), 1);
    assert_eq!(closed, square);
}

#[test]
fn closing_is_idempotent() {
    let mut mask = Mask::new(40, 32);
    for (x, y, px) in mask.enumerate_pixels_mut() {
        if (x * 7 + y * 13) % 5 == 0 || (x / 6 + y / 5) % 3 == 0 {
            *px = Luma([FOREGROUND]);
        }
    }
    let element = StructuringElement::default();
    let once = close(&mask, &element, 2);
    let twice = close(&once, &element, 2);
    assert_eq!(once, twice);
}

#[test]
fn regions_touching_the_border_survive_opening() {
    let mut mask = Mask::new(20, 20);
    paint(&mut mask, 0, 0, 10, 10);
    let opened = open(&mask, &StructuringElement::default(), 1);
    assert!(is_fg(&opened, 0, 0));
    assert!(!is_fg(&opened, 9, 9));
    assert_eq!(foreground_count(&opened), 99);
}

#[test]
fn clean_keeps_cells_and_drops_noise() {
    let mut mask = Mask::new(60, 30);
    paint(&mut mask, 5, 5, 10, 10);
    paint(&mut mask, 40, 5, 1, 1);
    let cleaned = clean(&mask, &StructuringElement::default(), 1, 2);
    assert!(is_fg(&cleaned, 10, 10));
    assert!(!is_fg(&cleaned, 40, 5));
    assert_eq!(foreground_count(&cleaned), 96);
}
