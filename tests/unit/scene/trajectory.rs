use super::*;
use crate::animation::ease::Ease;
use crate::scene::shapes::Rect;

const EPS: f64 = 1e-9;

fn close(a: (f64, f64), b: (f64, f64)) -> bool {
    (a.0 - b.0).abs() < EPS && (a.1 - b.1).abs() < EPS
}

#[test]
fn every_trajectory_starts_and_ends_on_its_endpoints() {
    let (from, to) = ((-2.0, 1.0), (3.0, -4.0));
    for traj in [
        linear_traj(),
        half_circle_traj(),
        low_arc_traj(),
        lift_traj(1.5),
    ] {
        assert!(close(traj(from, to, 0.0), from));
        assert!(close(traj(from, to, 1.0), to));
    }
}

#[test]
fn linear_midpoint_is_halfway() {
    assert!(close(linear_traj()((0.0, 0.0), (4.0, 2.0), 0.5), (2.0, 1.0)));
}

#[test]
fn half_circle_peaks_one_radius_off_the_line() {
    let top = half_circle_traj()((0.0, 0.0), (2.0, 0.0), 0.5);
    assert!(close(top, (1.0, 1.0)), "{top:?}");
    let low = low_arc_traj()((0.0, 0.0), (2.0, 0.0), 0.5);
    assert!(close(low, (1.0, 0.5)), "{low:?}");
}

#[test]
fn lift_rises_crosses_then_drops() {
    let lift = lift_traj(1.0);
    let (from, to) = ((0.0, 0.0), (4.0, 2.0));
    assert!(close(lift(from, to, 0.125), (0.0, -0.5)));
    assert!(close(lift(from, to, 0.25), (0.0, -1.0)));
    assert!(close(lift(from, to, 0.5), (2.0, -1.0)));
    assert!(close(lift(from, to, 0.75), (4.0, -1.0)));
    assert!(close(lift(from, to, 0.875), (4.0, 0.5)));
}

#[test]
fn eased_trajectory_reparameterizes_progress() {
    let reversed = ease_traj(linear_traj(), Ease::Invert);
    assert!(close(reversed((0.0, 0.0), (4.0, 0.0), 0.25), (3.0, 0.0)));
    assert!(close(reversed((0.0, 0.0), (4.0, 0.0), 1.0), (0.0, 0.0)));
}

#[test]
fn move_along_follows_the_path_to_the_target() {
    let rect = Rect::new(0.0, 0.0, 1.0, 2.0);
    let a = move_along(rect, 2.0, 0.0, half_circle_traj()).unwrap();
    assert_eq!(a.duration(), 1.0);
    assert_eq!(a.sample(0.0), rect);
    let mid = a.sample(0.5);
    assert!(close(mid.position(), (1.0, 1.0)), "{:?}", mid.position());
    assert_eq!((mid.width, mid.height), (1.0, 2.0));
    assert!(close(a.sample(1.0).position(), (2.0, 0.0)));
}
