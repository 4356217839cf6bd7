use super::*;
use std::io::Cursor;

const RED: Rgba8 = Rgba8::opaque(255, 0, 0);

fn buffer(width: u32, height: u32) -> FrameBuffer {
    FrameBuffer::new(Viewport::centered(width, height)).unwrap()
}

fn close(a: [u8; 4], b: [u8; 4], tol: u8) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= tol)
}

fn png_bytes(width: u32, height: u32, rgba: Vec<u8>) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(width, height, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn zero_sized_viewport_is_rejected() {
    assert!(FrameBuffer::new(Viewport::centered(0, 10)).is_err());
}

#[test]
fn clear_fills_the_whole_frame() {
    let mut fb = buffer(32, 16);
    fb.clear(Rgba8::opaque(10, 20, 30));
    let frame = fb.finish();
    assert_eq!((frame.width, frame.height), (32, 16));
    assert_eq!(frame.data.len(), 32 * 16 * 4);
    assert!(frame.premultiplied);
    assert_eq!(frame.pixel(0, 0), Some([10, 20, 30, 255]));
    assert_eq!(frame.pixel(31, 15), Some([10, 20, 30, 255]));
    assert_eq!(frame.pixel(32, 0), None);
}

#[test]
fn fill_rect_uses_scene_coordinates() {
    // 64 px wide -> 4 px per unit, origin at (32, 16).
    let mut fb = buffer(64, 32);
    fb.clear(Rgba8::BLACK);
    fb.fill_rect(-2.0, -2.0, 2.0, 2.0, RED);
    let frame = fb.finish();
    assert_eq!(frame.pixel(32, 16), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(25, 9), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(2, 2), Some([0, 0, 0, 255]));
    assert_eq!(frame.pixel(50, 16), Some([0, 0, 0, 255]));
}

#[test]
fn clear_discards_previous_commands() {
    let mut fb = buffer(64, 32);
    fb.clear(Rgba8::BLACK);
    fb.fill_rect(-2.0, -2.0, 2.0, 2.0, RED);
    let _ = fb.finish();

    fb.clear(Rgba8::BLACK);
    let frame = fb.finish();
    assert_eq!(frame.pixel(32, 16), Some([0, 0, 0, 255]));
}

#[test]
fn outline_leaves_interior_untouched() {
    let mut fb = buffer(64, 64);
    fb.clear(Rgba8::BLACK);
    fb.outline_rect(0.0, 0.0, 10.0, 10.0, 2.0, Rgba8::WHITE);
    let frame = fb.finish();
    // Rect spans pixels 12..52 on both axes.
    assert_eq!(frame.pixel(32, 32), Some([0, 0, 0, 255]));
    assert_eq!(frame.pixel(32, 12), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(12, 32), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(51, 32), Some([255, 255, 255, 255]));
}

#[test]
fn polygon_fill_covers_its_inside() {
    let mut fb = buffer(64, 64);
    fb.clear(Rgba8::BLACK);
    fb.fill_polygon(&[(-6.0, 6.0), (6.0, 6.0), (0.0, -6.0)], RED);
    let frame = fb.finish();
    assert_eq!(frame.pixel(32, 40), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(4, 4), Some([0, 0, 0, 255]));
}

#[test]
fn empty_polygon_draws_nothing() {
    let mut fb = buffer(8, 8);
    fb.clear(Rgba8::BLACK);
    fb.fill_polygon(&[], RED);
    assert!(fb.finish().data.chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
}

#[test]
fn opacity_layer_blends_with_background() {
    let mut fb = buffer(32, 32);
    fb.clear(Rgba8::BLACK);
    fb.push_opacity(0.5);
    fb.fill_rect(-8.0, -8.0, 8.0, 8.0, Rgba8::WHITE);
    fb.pop_layer();
    let px = fb.finish().pixel(16, 16).unwrap();
    assert!(close(px, [128, 128, 128, 255], 2), "{px:?}");
}

#[test]
fn decode_premultiplies_alpha() {
    let bytes = png_bytes(2, 1, vec![200, 100, 0, 128, 1, 2, 3, 255]);
    let bitmap = Bitmap::decode(&bytes).unwrap();
    assert_eq!((bitmap.width, bitmap.height), (2, 1));

    let mut data = vec![200, 100, 0, 128];
    premultiply_rgba8_in_place(&mut data);
    assert_eq!(data, vec![100, 50, 0, 128]);
}

#[test]
fn decode_rejects_garbage() {
    assert!(Bitmap::decode(b"not an image").is_err());
}

#[test]
fn bitmap_byte_len_must_match() {
    assert!(Bitmap::from_premul_rgba8(&[0; 12], 2, 2).is_err());
    assert!(Bitmap::from_premul_rgba8(&[0; 16], 2, 2).is_ok());
}

#[test]
fn draw_bitmap_blits_scaled_pixels() {
    let green = [0u8, 255, 0, 255];
    let bitmap = Bitmap::from_premul_rgba8(&green.repeat(16), 4, 4).unwrap();

    let mut fb = buffer(32, 32);
    fb.clear(Rgba8::BLACK);
    fb.draw_bitmap(&bitmap, 4.0, 4.0, 2.0);
    let frame = fb.finish();
    let inside = frame.pixel(8, 8).unwrap();
    assert!(close(inside, green, 2), "{inside:?}");
    assert_eq!(frame.pixel(24, 24), Some([0, 0, 0, 255]));
}
