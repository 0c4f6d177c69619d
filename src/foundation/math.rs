pub fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

pub fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Position of `v` between `a` and `b`, clamped to `[0, 1]`. A degenerate span yields 1.
pub fn remap(v: f64, a: f64, b: f64) -> f64 {
    if b == a {
        return 1.0;
    }
    clamp01((v - a) / (b - a))
}

/// Round to three decimal digits, the precision used for persisted point lists.
pub fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}
