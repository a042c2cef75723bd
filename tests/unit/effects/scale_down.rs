use super::*;
use crate::effects::test_support::{pattern, run_until, setup, surface_for};

#[test]
fn scale_curve_runs_from_max_to_natural() {
    assert_eq!(ScaleDownState::scale_at(0.0), 1.5);
    assert_eq!(ScaleDownState::scale_at(1.0), 1.0);
    let mid = ScaleDownState::scale_at(0.5);
    assert!(mid > 1.0 && mid < 1.5);
    // Parabolic ease-out: more than half the distance covered at the midpoint.
    assert!(mid < 1.25);
}

#[test]
fn scaling_is_about_the_surface_centre() {
    let size = SurfaceSize::new(40, 20).unwrap();
    let full = Rect::new(0.0, 0.0, 40.0, 20.0);
    assert_eq!(ScaleDownState::scaled(size, full, 1.0), full);
    assert_eq!(
        ScaleDownState::scaled(size, full, 1.5),
        Rect::new(-10.0, -5.0, 50.0, 25.0)
    );
}

#[test]
fn setup_rolls_block_timing_within_bounds() {
    let img = pattern(64, 32);
    let state = setup(&ScaleDown, &img, 6);
    assert_eq!(state.blocks.len(), 15);
    for b in &state.blocks {
        assert!(b.anim_time >= 0.4 && b.anim_time <= 1.0);
        assert!(b.stop_at >= 0.0 && b.stop_at < b.anim_time);
        assert!(b.stop_length >= 0.0 && b.stop_length < b.anim_time.min(0.4));
        assert!(b.stop_scale.is_none());
    }
    assert_eq!(state.runtime_ms(), 1500.0);
}

#[test]
fn first_frame_is_fully_transparent() {
    let img = pattern(64, 32);
    let mut state = setup(&ScaleDown, &img, 6);
    let mut surface = surface_for(&img);
    ScaleDown.animate(&mut surface, &img, &mut state, 0.0);
    assert!(surface.pixmap().is_blank());
}

#[test]
fn frozen_block_latches_its_first_scale() {
    let img = pattern(64, 32);
    let mut state = setup(&ScaleDown, &img, 6);
    state.blocks.truncate(1);
    state.blocks[0].anim_time = 1.0;
    state.blocks[0].stop_at = 0.1;
    state.blocks[0].stop_length = 0.2;
    let mut surface = surface_for(&img);

    ScaleDown.animate(&mut surface, &img, &mut state, 0.05);
    assert!(state.blocks[0].stop_scale.is_none());

    ScaleDown.animate(&mut surface, &img, &mut state, 0.15);
    let latched = state.blocks[0].stop_scale.unwrap();
    assert_eq!(latched, ScaleDownState::scale_at(0.15));

    ScaleDown.animate(&mut surface, &img, &mut state, 0.25);
    assert_eq!(state.blocks[0].stop_scale, Some(latched));
}

#[test]
fn freeze_window_never_outlives_completion() {
    let img = pattern(64, 32);
    let mut state = setup(&ScaleDown, &img, 6);
    for b in &mut state.blocks {
        b.stop_at = 0.9;
        b.stop_length = 0.4;
        b.stop_scale = Some(1.4);
    }
    let mut surface = surface_for(&img);
    ScaleDown.animate(&mut surface, &img, &mut state, 1.0);
    assert_eq!(surface.pixmap(), &img);
}

#[test]
fn completion_draws_source_exactly() {
    let img = pattern(57, 33);
    let mut state = setup(&ScaleDown, &img, 13);
    let mut surface = surface_for(&img);
    run_until(&ScaleDown, &img, &mut state, &mut surface, 40);
    ScaleDown.animate(&mut surface, &img, &mut state, 1.0);
    assert_eq!(surface.pixmap(), &img);
    ScaleDown.animate(&mut surface, &img, &mut state, 1.03);
    assert_eq!(surface.pixmap(), &img);
}
