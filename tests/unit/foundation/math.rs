use super::*;

#[test]
fn flatten_premul_alpha_0_returns_bg() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg(&mut dst, &src, [10, 20, 30, 255]);
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_premul_alpha_255_is_identity() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg(&mut dst, &src, [10, 20, 30, 255]);
    assert_eq!(dst, src);
}

#[test]
fn flatten_premul_over_black_keeps_premul_rgb() {
    // Premultiplied red @ 50% alpha over black stays 128,0,0.
    let src = vec![128u8, 0, 0, 128];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg(&mut dst, &src, [0, 0, 0, 255]);
    assert_eq!(dst, vec![128, 0, 0, 255]);
}

#[test]
fn unpremultiply_restores_straight_color() {
    let mut data = vec![128u8, 64, 0, 128, 9, 9, 9, 0, 7, 8, 9, 255];
    unpremultiply_rgba8(&mut data);
    assert_eq!(data, vec![255, 128, 0, 128, 9, 9, 9, 0, 7, 8, 9, 255]);
}
