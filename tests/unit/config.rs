use super::*;

#[test]
fn empty_object_gives_defaults() {
    let cfg = DanmakuConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, DanmakuConfig::default());
    assert_eq!((cfg.width, cfg.height), (1920, 1080));
    assert_eq!(cfg.spacing, 20.0);
    assert_eq!(cfg.speed, 0.1);
    cfg.validate().unwrap();
}

#[test]
fn partial_config_overrides_fields() {
    let json = r#"{
        "width": 1280,
        "height": 720,
        "fps": {"num": 30, "den": 1},
        "font": {"path": "fonts/NotoSansCJK.ttc"},
        "boost": {"enabled": false}
    }"#;
    let cfg = DanmakuConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.canvas(), Canvas { width: 1280, height: 720 });
    assert_eq!(cfg.fps, Fps { num: 30, den: 1 });
    assert_eq!(cfg.font.as_ref().map(|f| f.size_px), Some(48.0));
    assert!(!cfg.boost.enabled);
    assert_eq!(cfg.boost.max_factor, 3.0);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = DanmakuConfig::from_reader(r#"{"widht": 10}"#.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("parse config JSON"), "{err}");
}

#[test]
fn validate_catches_bad_values() {
    let mut cfg = DanmakuConfig {
        width: 0,
        ..DanmakuConfig::default()
    };
    assert!(cfg.validate().is_err());

    cfg.width = 70_000;
    assert!(cfg.validate().is_err());

    cfg.width = 640;
    cfg.fps = Fps { num: 30, den: 0 };
    assert!(cfg.validate().is_err());

    cfg.fps = Fps::default();
    cfg.lane_height = Some(-1.0);
    assert!(cfg.validate().is_err());

    cfg.lane_height = Some(1e-12);
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("lane_height"), "{err}");

    cfg.lane_height = Some(1.0);
    cfg.validate().unwrap();

    cfg.lane_height = None;
    cfg.max_frame_delta_ms = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn speed_policies_follow_boost_setting() {
    let mut cfg = DanmakuConfig::default();
    assert!(cfg.live_speed().speed(50) > cfg.speed);
    assert_eq!(cfg.batch_speed().speed(50), cfg.speed);

    cfg.boost.enabled = false;
    assert_eq!(cfg.live_speed().speed(50), cfg.speed);
}

#[test]
fn missing_font_is_reported_with_purpose() {
    let cfg = DanmakuConfig::default();
    let err = cfg.require_font("render").unwrap_err();
    assert!(err.to_string().contains("render"));
}

#[test]
fn engine_config_carries_geometry() {
    let cfg = DanmakuConfig {
        lane_height: Some(30.0),
        spacing: 5.0,
        ..DanmakuConfig::default()
    };
    let e = cfg.engine_config();
    assert_eq!(e.canvas, cfg.canvas());
    assert_eq!(e.lane_height, Some(30.0));
    assert_eq!(e.spacing, 5.0);
}
