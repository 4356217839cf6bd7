use super::*;
use crate::foundation::core::{Rgba8, Viewport};
use std::io::Cursor;

fn write_png(dir: &Path, name: &str, px: [u8; 4]) -> PathBuf {
    let img = image::RgbaImage::from_raw(4, 4, px.repeat(16)).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    let path = dir.join(name);
    std::fs::write(&path, &buf).unwrap();
    path
}

// 192 px wide: 12 px per unit, reference scale 0.1.
fn buffer() -> FrameBuffer {
    FrameBuffer::new(Viewport::centered(192, 108)).unwrap()
}

#[test]
fn paint_draws_centered_bitmap_and_caches_it() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write_png(tmp.path(), "red.png", [255, 0, 0, 255]);
    let cache = bitmap_cache();
    let sprite = Sprite::new(&path, 0.0, 0.0, Arc::clone(&cache)).with_scale(10.0);

    let mut fb = buffer();
    for _ in 0..2 {
        fb.clear(Rgba8::BLACK);
        sprite.paint(&mut fb).unwrap();
    }
    let frame = fb.finish();
    assert_eq!(frame.pixel(95, 53), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(10, 10), Some([0, 0, 0, 255]));
    assert_eq!(cache.len(), 1);
    assert!(Arc::ptr_eq(
        &sprite.bitmap().unwrap(),
        &sprite.moved(1.0, 0.0).bitmap().unwrap()
    ));
}

#[test]
fn invisible_sprite_is_never_loaded() {
    let cache = bitmap_cache();
    let sprite = Sprite::new("does/not/exist.png", 0.0, 0.0, Arc::clone(&cache)).with_scale(0.1);
    let mut fb = buffer();
    fb.clear(Rgba8::BLACK);
    sprite.paint(&mut fb).unwrap();
    assert!(cache.is_empty());
}

#[test]
fn missing_file_surfaces_cache_error() {
    let cache = bitmap_cache();
    let sprite = Sprite::new("does/not/exist.png", 0.0, 0.0, cache).with_scale(10.0);
    let mut fb = buffer();
    fb.clear(Rgba8::BLACK);
    let err = sprite.paint(&mut fb).unwrap_err();
    match err {
        LanimError::CacheComputation { key, message } => {
            assert!(key.contains("exist.png"));
            assert!(message.contains("read image"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn morph_requires_same_source() {
    let cache = bitmap_cache();
    let a = Sprite::new("a.png", 0.0, 0.0, Arc::clone(&cache));
    let b = Sprite::new("b.png", 0.0, 0.0, Arc::clone(&cache));
    assert!(matches!(
        a.check_morph(&b),
        Err(LanimError::CompositionShape(_))
    ));

    let far = a.moved(4.0, 0.0).scaled(3.0).aligned(Align::LU);
    a.check_morph(&far).unwrap();
    let mid = a.morphed(&far, 0.5);
    assert_eq!((mid.x, mid.scale), (2.0, 2.0));
    assert_eq!(mid.align, Align::new(-0.25, -0.25));
    assert_eq!(mid.source(), Path::new("a.png"));
}

#[test]
fn scaled_about_moves_anchor() {
    let sprite = Sprite::new("a.png", 2.0, 2.0, bitmap_cache());
    let s = sprite.scaled_about(0.5, 0.0, 0.0);
    assert_eq!((s.x, s.y, s.scale), (1.0, 1.0, 0.5));
}
