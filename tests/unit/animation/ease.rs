use super::*;

const ALL: [Ease; 9] = [
    Ease::Linear,
    Ease::InOutSine,
    Ease::Smoothstep,
    Ease::InQuad,
    Ease::OutQuad,
    Ease::InOutQuad,
    Ease::InCubic,
    Ease::OutCubic,
    Ease::InOutCubic,
];

#[test]
fn ease_in_out_hits_endpoints_exactly() {
    assert_eq!(ease_in_out(0.0), 0.0);
    assert_eq!(ease_in_out(1.0), 1.0);
    assert!((ease_in_out(0.5) - 0.5).abs() < 1e-12);
}

#[test]
fn every_curve_is_monotone_on_unit_interval() {
    for ease in ALL {
        assert_eq!(ease.apply(0.0), 0.0, "{ease:?} at 0");
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-12, "{ease:?} at 1");
        let mut prev = ease.apply(0.0);
        for i in 1..=1000 {
            let v = ease.apply(i as f64 / 1000.0);
            assert!(v >= prev, "{ease:?} decreased at step {i}");
            prev = v;
        }
    }
}

#[test]
fn apply_clamps_out_of_range_input() {
    assert_eq!(Ease::InOutSine.apply(-3.0), 0.0);
    assert_eq!(Ease::InOutSine.apply(7.0), 1.0);
}

#[test]
fn default_is_in_out_sine_and_serializes_snake_case() {
    assert_eq!(Ease::default(), Ease::InOutSine);
    let s = serde_json::to_string(&Ease::InOutCubic).unwrap();
    assert_eq!(s, "\"in_out_cubic\"");
}
