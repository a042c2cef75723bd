use super::*;

#[test]
fn surface_size_rejects_empty() {
    assert!(SurfaceSize::new(0, 10).is_err());
    assert!(SurfaceSize::new(10, 0).is_err());
    let s = SurfaceSize::new(4, 3).unwrap();
    assert_eq!(s.byte_len(), 48);
    assert_eq!(s.to_rect(), Rect::new(0.0, 0.0, 4.0, 3.0));
}

#[test]
fn timestamps_measure_elapsed_millis() {
    let a = Timestamp::from_millis(16.0);
    let b = Timestamp::from_millis(48.5);
    assert_eq!(b.millis_since(a), 32.5);
    assert_eq!(a.millis_since(b), -32.5);
}

#[test]
fn premul_matches_rounding() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.a, 128);
    assert_eq!(c.r, 128);
    assert_eq!(c.g, 64);
    assert_eq!(c.b, 0);
    assert_eq!(Rgba8Premul::transparent().to_array(), [0, 0, 0, 0]);
}

#[test]
fn ids_display_with_kind() {
    assert_eq!(InstanceId(12).to_string(), "instance #12");
    assert_eq!(ElementHandle(4).to_string(), "element #4");
    assert!(InstanceId(1) < InstanceId(2));
}
