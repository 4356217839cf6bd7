use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    assert_eq!(Fps::new(30000, 1001).unwrap().as_f64(), 30000.0 / 1001.0);
}

#[test]
fn fps_steps_round_to_nearest() {
    let fps = Fps::new(2, 1).unwrap();
    assert_eq!(fps.steps_for(1.0).unwrap(), 2);
    assert_eq!(fps.steps_for(1.3).unwrap(), 3);
    assert_eq!(fps.steps_for(1.2).unwrap(), 2);
    assert_eq!(fps.steps_for(0.0).unwrap(), 0);
}

#[test]
fn centered_viewport_maps_origin_to_middle() {
    let vp = Viewport::centered(1600, 900);
    assert_eq!(vp.unit, 100.0);
    assert_eq!(vp.to_pixels(0.0, 0.0), (800.0, 450.0));
    assert_eq!(vp.to_pixels(-8.0, 1.0), (0.0, 550.0));
}

#[test]
fn viewport_validation_limits() {
    assert!(Viewport::centered(64, 64).validate().is_ok());
    assert!(Viewport::centered(0, 64).validate().is_err());
    assert!(Viewport::centered(70_000, 64).validate().is_err());
    let mut vp = Viewport::centered(64, 64);
    vp.unit = 0.0;
    assert!(vp.validate().is_err());
}

#[test]
fn narrow_and_odd_viewports_keep_fractional_geometry() {
    let tiny = Viewport::centered(8, 8);
    assert_eq!(tiny.unit, 0.5);
    tiny.validate().unwrap();

    let odd = Viewport::centered(33, 17);
    assert_eq!(odd.to_pixels(0.0, 0.0), (16.5, 8.5));
    assert_eq!(odd.unit, 33.0 / 16.0);
}

#[test]
fn steps_beyond_counting_range_are_rejected() {
    let fps = Fps::new(30, 1).unwrap();
    assert!(matches!(fps.steps_for(1e300), Err(LanimError::Validation(_))));
    assert!(fps.steps_for(f64::INFINITY).is_err());
    assert_eq!(fps.steps_for(-2.0).unwrap(), 0);
}
