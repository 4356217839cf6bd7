use super::*;
use crate::animation::anim::sequence;

fn fps(n: u32) -> Fps {
    Fps::new(n, 1).unwrap()
}

#[test]
fn constant_at_two_fps_yields_three_frames() {
    let values: Vec<_> = frames(&Animation::constant("x"), fps(2))
        .unwrap()
        .map(|f| f.value)
        .collect();
    assert_eq!(values, vec!["x", "x", "x"]);

    let progress: Vec<_> = frames(&Animation::constant("x"), fps(2))
        .unwrap()
        .map(|f| f.progress)
        .collect();
    assert_eq!(progress, vec![0.0, 0.5, 1.0]);
}

#[test]
fn frame_count_matches_rounded_duration() {
    for (duration, rate) in [(1.0, 30), (2.5, 24), (0.37, 30), (3.0, 1)] {
        let a = Animation::new(duration, |t| t).unwrap();
        let out: Vec<_> = frames(&a, fps(rate)).unwrap().collect();
        let expected = (f64::from(rate) * duration).round() as usize + 1;
        assert_eq!(out.len(), expected, "duration={duration} fps={rate}");
        assert_eq!(out.first().unwrap().value, a.sample(0.0));
        assert_eq!(out.last().unwrap().value, a.sample(1.0));
    }
}

#[test]
fn indices_are_dense_and_ordered() {
    let a = Animation::new(1.0, |t| t).unwrap();
    let idx: Vec<_> = frames(&a, fps(10)).unwrap().map(|f| f.index.0).collect();
    assert_eq!(idx, (0..=10).collect::<Vec<_>>());
}

#[test]
fn zero_steps_yield_single_first_frame() {
    let a = Animation::new(0.0, |t| t).unwrap();
    let out: Vec<_> = frames(&a, fps(30)).unwrap().collect();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].progress, 0.0);
}

#[test]
fn sampling_is_restartable_and_deterministic() {
    let a = sequence([
        Animation::new(1.0, |t| t).unwrap(),
        Animation::new(0.5, |t| 1.0 + t).unwrap(),
    ])
    .unwrap();
    let first: Vec<_> = frames(&a, fps(12)).unwrap().collect();
    let second: Vec<_> = frames(&a, fps(12)).unwrap().collect();
    assert_eq!(first, second);

    let it = frames(&a, fps(12)).unwrap();
    assert_eq!(it.len(), 19);
    assert_eq!(it.total(), 19);
}

#[test]
fn strided_shards_only_project_their_own_frames() {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let a = Animation::new(1.0, move |t| {
        counter.fetch_add(1, Ordering::SeqCst);
        t
    })
    .unwrap();

    let shard: Vec<_> = frames(&a, fps(10))
        .unwrap()
        .skip(1)
        .step_by(4)
        .map(|f| f.index.0)
        .collect();
    assert_eq!(shard, vec![1, 5, 9]);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn unrepresentable_frame_count_is_rejected() {
    let a = Animation::new(1e300, |t| t).unwrap();
    assert!(matches!(
        frames(&a, fps(30)),
        Err(crate::foundation::error::LanimError::Validation(_))
    ));

    let long = Animation::new(1e15, |t| t).unwrap();
    let it = frames(&long, fps(1)).unwrap();
    assert_eq!(it.total(), 1_000_000_000_000_001);
}
