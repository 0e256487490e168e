use super::*;

#[test]
fn rejects_non_positive_size() {
    let err = TextLayoutEngine::new(Vec::new(), 0.0, TextBrushRgba8::default())
        .err()
        .unwrap();
    assert!(err.to_string().contains("size_px"));

    assert!(TextLayoutEngine::new(Vec::new(), f32::NAN, TextBrushRgba8::default()).is_err());
}

#[test]
fn rejects_bytes_that_are_not_a_font() {
    let err = TextLayoutEngine::new(vec![0u8; 64], 32.0, TextBrushRgba8::default())
        .err()
        .unwrap();
    assert!(err.to_string().contains("text error:"));
}

#[test]
fn missing_font_file_reports_path() {
    let spec = FontSpec {
        path: PathBuf::from("does/not/exist.ttf"),
        size_px: 32.0,
    };
    let err = spec.read_bytes().unwrap_err();
    assert!(err.to_string().contains("does/not/exist.ttf"));
}

#[test]
fn brush_from_rgba_keeps_channel_order() {
    let b = TextBrushRgba8::from_rgba([1, 2, 3, 4]);
    assert_eq!((b.r, b.g, b.b, b.a), (1, 2, 3, 4));
}

#[test]
fn font_spec_size_defaults_when_omitted() {
    let spec: FontSpec = serde_json::from_str(r#"{ "path": "font.ttf" }"#).unwrap();
    assert_eq!(spec.size_px, 48.0);
}
