//! Deterministic spring resimulation.
//!
//! Particle state at frame `f` is reconstructed by running the spring update
//! exactly `f` times from rest at the segment's `from` positions. Nothing is
//! carried between calls, so any frame can be computed on any worker in any
//! order and the result is bit-identical.

use crate::{
    assets::color::Rgba8,
    assets::points::Dot,
    foundation::core::{FrameIndex, Point, Vec2},
    foundation::error::{MorphError, MorphResult},
    foundation::math::lerp,
    scene::prepared::Segment,
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpringParams {
    #[serde(default = "default_stiffness")]
    pub stiffness: f64,
    #[serde(default = "default_damping")]
    pub damping: f64,
}

fn default_stiffness() -> f64 {
    0.12
}

fn default_damping() -> f64 {
    0.78
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            stiffness: default_stiffness(),
            damping: default_damping(),
        }
    }
}

impl SpringParams {
    pub fn validate(&self) -> MorphResult<()> {
        if !(self.stiffness.is_finite() && self.stiffness > 0.0) {
            return Err(MorphError::validation("spring stiffness must be finite and > 0"));
        }
        if !(self.damping.is_finite() && (0.0..1.0).contains(&self.damping)) {
            return Err(MorphError::validation("spring damping must be in [0, 1)"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Integrated state of one particle at the requested frame.
pub struct Particle {
    /// Index into the segment's point sets; stable for the whole composition.
    pub id: usize,
    pub position: Point,
    pub velocity: Vec2,
    /// Rest position the simulation started from.
    pub base: Point,
    pub radius: f64,
    /// `None` renders with the scene's particle color.
    pub color: Option<Rgba8>,
}

/// Resimulate `segment` from rest for `frame` steps.
///
/// The spring target of particle `i` is `lerp(from[i], to[i], ease(progress))`
/// for every step; progress selects the target, the frame count drives the
/// spring. Once eased progress exceeds 0.5 (and at least one step ran) the
/// particle adopts its target's color; an uncolored target keeps the source
/// color.
pub fn integrate_segment(
    segment: &Segment<'_>,
    frame: FrameIndex,
    params: &SpringParams,
) -> Vec<Particle> {
    let k = segment.ease.apply(segment.progress);
    let steps = frame.0;
    let adopt_target_color = steps > 0 && k > 0.5;

    segment
        .from
        .iter()
        .enumerate()
        .map(|(id, from)| {
            let to = partner(segment.to, id).unwrap_or(from);
            let target = Point::new(lerp(from.x, to.x, k), lerp(from.y, to.y, k));

            let mut position = from.pos();
            let mut velocity = Vec2::ZERO;
            for _ in 0..steps {
                let acceleration = (target - position) * params.stiffness;
                velocity = (velocity + acceleration) * params.damping;
                position += velocity;
            }

            Particle {
                id,
                position,
                velocity,
                base: from.pos(),
                radius: lerp(from.r, to.r, k),
                color: if adopt_target_color {
                    to.color.or(from.color)
                } else {
                    from.color
                },
            }
        })
        .collect()
}

fn partner(to: &[Dot], i: usize) -> Option<&Dot> {
    if to.is_empty() {
        None
    } else {
        to.get(i).or_else(|| to.get(i % to.len()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/integrator.rs"]
mod tests;
