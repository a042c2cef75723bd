use super::*;
use crate::foundation::core::Rgba8Premul;

fn size(w: u32, h: u32) -> SurfaceSize {
    SurfaceSize::new(w, h).unwrap()
}

fn gradient(w: u32, h: u32) -> Pixmap {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            data.extend_from_slice(&[(x * 17 % 256) as u8, (y * 29 % 256) as u8, 7, 255]);
        }
    }
    Pixmap::from_premul(w, h, data).unwrap()
}

#[test]
fn draw_image_at_origin_is_exact_copy() {
    let img = gradient(13, 9);
    let mut s = Surface::new(img.size());
    s.draw_image(&img, Point::ORIGIN);
    assert_eq!(s.pixmap(), &img);
}

#[test]
fn fractional_strips_partition_without_overlap() {
    let img = gradient(10, 23);
    let mut s = Surface::new(img.size());
    let n = 7;
    for i in 0..n {
        let y0 = 23.0 * f64::from(i) / f64::from(n);
        let y1 = 23.0 * f64::from(i + 1) / f64::from(n);
        let r = Rect::new(0.0, y0, 10.0, y1);
        s.set_global_alpha(0.5);
        s.draw_image_rect(&img, r, r);
    }
    // Every pixel was drawn exactly once at half opacity.
    let once = {
        let mut t = Surface::new(img.size());
        t.set_global_alpha(0.5);
        t.draw_image(&img, Point::ORIGIN);
        t.into_pixmap()
    };
    assert_eq!(s.pixmap(), &once);
}

#[test]
fn clear_rect_only_touches_covered_pixels() {
    let img = Pixmap::solid(size(4, 4), Rgba8Premul::opaque(9, 9, 9));
    let mut s = Surface::from_pixmap(img);
    s.clear_rect(Rect::new(0.6, 0.4, 2.4, 1.6));
    assert_eq!(s.pixmap().pixel(0, 0)[3], 255);
    assert_eq!(s.pixmap().pixel(1, 0)[3], 0);
    assert_eq!(s.pixmap().pixel(1, 1)[3], 0);
    assert_eq!(s.pixmap().pixel(2, 1)[3], 255);
    assert_eq!(s.pixmap().pixel(1, 2)[3], 255);
}

#[test]
fn offset_draw_shifts_and_clips() {
    let img = gradient(8, 2);
    let mut s = Surface::new(img.size());
    s.draw_image(&img, Point::new(3.0, 0.0));
    assert_eq!(s.pixmap().pixel(0, 0), [0, 0, 0, 0]);
    assert_eq!(s.pixmap().pixel(3, 0), img.pixel(0, 0));
    assert_eq!(s.pixmap().pixel(7, 1), img.pixel(4, 1));
}

#[test]
fn sub_rect_does_not_bleed_neighbours() {
    let img = gradient(8, 8);
    let mut s = Surface::new(img.size());
    let src = Rect::new(2.0, 2.0, 4.0, 4.0);
    s.draw_image_rect(&img, src, Rect::new(0.0, 0.0, 4.0, 4.0));
    // 2x upscale of a 2x2 region.
    assert_eq!(s.pixmap().pixel(0, 0), img.pixel(2, 2));
    assert_eq!(s.pixmap().pixel(1, 1), img.pixel(2, 2));
    assert_eq!(s.pixmap().pixel(3, 3), img.pixel(3, 3));
    assert_eq!(s.pixmap().pixel(4, 4), [0, 0, 0, 0]);
}

#[test]
fn zero_alpha_and_degenerate_rects_draw_nothing() {
    let img = gradient(4, 4);
    let mut s = Surface::new(img.size());
    s.set_global_alpha(0.0);
    s.draw_image(&img, Point::ORIGIN);
    assert!(s.pixmap().is_blank());

    s.set_global_alpha(1.0);
    s.draw_image_rect(&img, Rect::new(0.0, 0.0, 0.0, 4.0), img.rect());
    s.set_global_alpha(f64::NAN);
    s.draw_image(&img, Point::ORIGIN);
    assert!(s.pixmap().is_blank());
}

#[test]
fn tinted_copy_keeps_alpha() {
    let img = Pixmap::solid(size(2, 2), Rgba8Premul::from_straight_rgba(10, 20, 30, 128));
    let red = img.tinted(Rgba8Premul::opaque(255, 0, 0));
    assert_eq!(red.pixel(1, 1), [128, 0, 0, 128]);
}

#[test]
fn from_premul_validates_length() {
    assert!(Pixmap::from_premul(2, 2, vec![0; 15]).is_err());
    assert!(Pixmap::from_premul(0, 2, vec![]).is_err());
}
