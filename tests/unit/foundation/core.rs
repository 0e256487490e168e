use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    assert!(Fps::new(30000, 1001).is_ok());
}

#[test]
fn whole_frame_times_match_decimal_offsets() {
    let fps = Fps::new(60, 1).unwrap();
    assert_eq!(fps.frames_to_secs(6), 0.1);
    assert_eq!(fps.frames_to_secs(90), 1.5);
}

#[test]
fn fps_frame_duration_matches_rate() {
    let fps = Fps::new(60, 1).unwrap();
    assert!((fps.frame_duration_secs() - 1.0 / 60.0).abs() < 1e-12);
    assert_eq!(Fps::default(), fps);
}

#[test]
fn canvas_rgba8_len_is_tightly_packed() {
    let c = Canvas {
        width: 64,
        height: 10,
    };
    assert_eq!(c.rgba8_len(), 64 * 10 * 4);
}
