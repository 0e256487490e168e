use super::*;

#[test]
fn fixed_advance_counts_chars_not_bytes() {
    let mut m = FixedAdvanceMetrics::new(10.0, 40.0);
    let ascii = m.measure("abc").unwrap();
    assert_eq!(ascii.width, 30.0);

    let cjk = m.measure("兰那罗").unwrap();
    assert_eq!(cjk.width, 30.0);
}

#[test]
fn fixed_advance_splits_line_height() {
    let mut m = FixedAdvanceMetrics::new(8.0, 50.0);
    let out = m.measure("x").unwrap();
    assert!((out.ascent - 40.0).abs() < 1e-9);
    assert!((out.descent - 10.0).abs() < 1e-9);
    assert!((out.ascent + out.descent - 50.0).abs() < 1e-9);
}
