use super::*;

fn solid(width: u32, height: u32, px: [u8; 4], premultiplied: bool) -> FrameRGBA {
    FrameRGBA {
        width,
        height,
        data: px.repeat((width * height) as usize),
        premultiplied,
    }
}

#[test]
fn png_dir_sink_creates_directory_and_names_by_index() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("nested").join("frames");
    let sink = PngDirSink::new(&dir).unwrap();
    assert!(dir.is_dir());
    assert_eq!(sink.path_for(FrameIndex(7)), dir.join("frame_7.png"));

    sink.persist(FrameIndex(0), &solid(3, 2, [9, 8, 7, 255], true))
        .unwrap();
    sink.persist(FrameIndex(12), &solid(3, 2, [1, 2, 3, 255], true))
        .unwrap();

    let img = image::open(dir.join("frame_12.png")).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (3, 2));
    assert_eq!(img.get_pixel(2, 1).0, [1, 2, 3, 255]);
    assert!(dir.join("frame_0.png").is_file());
    assert!(!dir.join("frame_1.png").exists());
}

#[test]
fn png_dir_sink_writes_straight_alpha() {
    let tmp = tempfile::tempdir().unwrap();
    let sink = PngDirSink::new(tmp.path()).unwrap();
    sink.persist(FrameIndex(0), &solid(1, 1, [100, 50, 0, 128], true))
        .unwrap();
    let img = image::open(sink.path_for(FrameIndex(0)))
        .unwrap()
        .to_rgba8();
    assert_eq!(img.get_pixel(0, 0).0, [199, 100, 0, 128]);
}

#[test]
fn png_dir_sink_reports_unwritable_target() {
    let tmp = tempfile::tempdir().unwrap();
    let sink = PngDirSink::new(tmp.path()).unwrap();
    // A directory squatting on the artifact path makes the write fail.
    std::fs::create_dir(sink.path_for(FrameIndex(3))).unwrap();
    assert!(
        sink.persist(FrameIndex(3), &solid(1, 1, [0, 0, 0, 255], false))
            .is_err()
    );
}

#[test]
fn in_memory_sink_sorts_by_index() {
    let sink = InMemorySink::new();
    assert!(sink.is_empty());
    for i in [2u64, 0, 1] {
        sink.persist(FrameIndex(i), &solid(1, 1, [i as u8, 0, 0, 255], true))
            .unwrap();
    }
    assert_eq!(sink.len(), 3);
    assert_eq!(
        sink.arrival_order(),
        vec![FrameIndex(2), FrameIndex(0), FrameIndex(1)]
    );
    let frames = sink.frames();
    for (k, (idx, frame)) in frames.iter().enumerate() {
        assert_eq!(idx.0, k as u64);
        assert_eq!(frame.data[0], k as u8);
    }
}

#[test]
fn unpremultiply_keeps_opaque_and_transparent_pixels() {
    let out = unpremultiply_rgba8(&[10, 20, 30, 255, 0, 0, 0, 0, 64, 32, 0, 128]);
    assert_eq!(&out[..8], &[10, 20, 30, 255, 0, 0, 0, 0]);
    assert_eq!(&out[8..], &[128, 64, 0, 128]);
}
