use super::*;

#[test]
fn noise_is_a_pure_function_of_key() {
    for key in [0u64, 1, 7, 10_000, u64::MAX] {
        assert_eq!(noise2(key), noise2(key));
        assert_eq!(hash01(key).to_bits(), hash01(key).to_bits());
    }
}

#[test]
fn noise_components_stay_in_range() {
    for key in 0..2048u64 {
        let n = noise2(key);
        assert!((-1.0..1.0).contains(&n.x), "x out of range for key {key}");
        assert!((-1.0..1.0).contains(&n.y), "y out of range for key {key}");
        let h = hash01(key);
        assert!((0.0..1.0).contains(&h));
    }
}

#[test]
fn neighbouring_keys_decorrelate() {
    let a = noise2(41);
    let b = noise2(42);
    assert_ne!(a, b);
    assert_ne!(a.x, a.y);
}
