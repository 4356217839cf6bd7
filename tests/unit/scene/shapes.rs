use super::*;
use crate::foundation::core::Viewport;

fn buffer() -> FrameBuffer {
    FrameBuffer::new(Viewport::centered(64, 64)).unwrap()
}

#[test]
fn rect_scaling_keeps_or_moves_center() {
    let r = Rect::new(2.0, 1.0, 4.0, 2.0);
    let s = r.scaled(0.5);
    assert_eq!((s.x, s.y, s.width, s.height), (2.0, 1.0, 2.0, 1.0));

    let about = r.scaled_about(2.0, 0.0, 0.0);
    assert_eq!((about.x, about.y, about.width), (4.0, 2.0, 8.0));
    assert_eq!(r.moved(1.0, -1.0).position(), (3.0, 0.0));
}

#[test]
fn rect_morph_switches_color_at_the_end() {
    let a = Rect::new(0.0, 0.0, 1.0, 1.0);
    let b = Rect::new(2.0, 0.0, 1.0, 1.0).with_color(Rgba8::opaque(255, 0, 0));
    assert_eq!(a.morphed(&b, 0.5).color, Rgba8::WHITE);
    assert_eq!(a.morphed(&b, 1.0), b);
}

#[test]
fn rect_paints_outline() {
    let mut fb = buffer();
    fb.clear(Rgba8::BLACK);
    Rect::new(0.0, 0.0, 8.0, 8.0).paint(&mut fb).unwrap();
    let frame = fb.finish();
    // 4 px per unit: the outline spans pixels 16..48.
    assert_eq!(frame.pixel(32, 16), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(32, 32), Some([0, 0, 0, 255]));
}

#[test]
fn degenerate_rect_paints_nothing() {
    let mut fb = buffer();
    fb.clear(Rgba8::BLACK);
    Rect::new(0.0, 0.0, 0.0, 8.0).paint(&mut fb).unwrap();
    let frame = fb.finish();
    assert!(frame.data.chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
}

#[test]
fn triangle_fills_and_scales_corners() {
    let t = Triangle::new(0.0, 0.0, [(-4.0, 4.0), (4.0, 4.0), (0.0, -4.0)]);
    assert_eq!(t.scaled(0.5).corners[2], (0.0, -2.0));
    assert_eq!(t.scaled_about(2.0, 1.0, 0.0).position(), (-1.0, 0.0));

    let mut fb = buffer();
    fb.clear(Rgba8::BLACK);
    t.paint(&mut fb).unwrap();
    assert_eq!(fb.finish().pixel(32, 40), Some([255, 255, 255, 255]));
}

#[test]
fn triangle_morph_blends_corners() {
    let a = Triangle::new(0.0, 0.0, [(0.0, 0.0); 3]);
    let b = Triangle::new(2.0, 2.0, [(2.0, -2.0); 3]);
    let m = a.morphed(&b, 0.5);
    assert_eq!(m.position(), (1.0, 1.0));
    assert_eq!(m.corners, [(1.0, -1.0); 3]);
}

#[test]
fn nil_only_has_a_position() {
    let n = Nil::new(1.0, 2.0);
    assert_eq!(n.scaled(5.0), n);
    assert_eq!(n.scaled_about(2.0, 0.0, 0.0), Nil::new(2.0, 4.0));
    assert_eq!(n.morphed(&Nil::new(3.0, 0.0), 0.5), Nil::new(2.0, 1.0));
    assert_eq!(n.aligned(Align::LU), n);

    let mut fb = buffer();
    fb.clear(Rgba8::BLACK);
    n.paint(&mut fb).unwrap();
}
