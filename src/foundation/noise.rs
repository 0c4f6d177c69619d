//! Stateless pseudo-random values keyed by an integer.
//!
//! Every function here is a pure function of its key, so padding and render
//! jitter stay identical no matter which worker computes a frame or in which
//! order frames are requested.

use crate::foundation::core::Vec2;

const KEY_SALT_X: u64 = 0x2545_F491_4F6C_DD1D;
const KEY_SALT_Y: u64 = 0xD6E8_FEB8_6659_FD93;

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn unit_from_bits(bits: u64) -> f64 {
    // 53 bits of precision.
    ((bits >> 11) as f64) * (1.0 / ((1u64 << 53) as f64))
}

/// Uniform value in `[0, 1)` for `key`.
pub fn hash01(key: u64) -> f64 {
    unit_from_bits(splitmix64(key))
}

/// 2D offset with both components in `[-1, 1)` for `key`.
pub fn noise2(key: u64) -> Vec2 {
    let a = unit_from_bits(splitmix64(key ^ KEY_SALT_X));
    let b = unit_from_bits(splitmix64(key.wrapping_mul(KEY_SALT_Y).rotate_left(17)));
    Vec2::new(a * 2.0 - 1.0, b * 2.0 - 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/noise.rs"]
mod tests;
