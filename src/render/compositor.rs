use crate::{
    assets::color::Rgba8,
    engine::integrator::Particle,
    foundation::core::{Canvas, FrameIndex},
    foundation::math::{clamp01, lerp, smoothstep},
    foundation::noise::noise2,
    scene::config::DepthLayer,
    timeline::model::RenderMode,
};

const MICRO_JITTER: f64 = 0.2;
const LAYER_KEY_STRIDE: u64 = 10_000;
const LAYER_RADIUS_FACTOR: f64 = 0.9;

const WAKE_RADIUS: f64 = 520.0;
const SWEEP_BAND: f64 = 130.0;
const SWEEP_SLOPE: f64 = 0.85;
const SWEEP_JITTER: f64 = 6.0;
const PULSE_BAND: f64 = 70.0;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One circle to draw, in canvas pixels. `alpha` multiplies `color.a`.
pub struct DrawCircle {
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub color: Rgba8,
    pub alpha: f64,
}

#[derive(Clone, Copy, Debug)]
/// Scene-wide inputs of [`composite_frame`].
pub struct CompositeParams<'a> {
    pub canvas: Canvas,
    pub layers: &'a [DepthLayer],
    pub base_alpha: f64,
    pub default_color: Rgba8,
}

/// Turn integrated particles into draw circles for one frame.
///
/// Every layer redraws the whole particle set (back to front, in particle id
/// order) with its own jitter, radius scale and opacity. The mode modulation
/// depends only on positions, `frame` and `progress`.
pub fn composite_frame(
    particles: &[Particle],
    params: &CompositeParams<'_>,
    mode: RenderMode,
    progress: f64,
    frame: FrameIndex,
) -> Vec<DrawCircle> {
    let w = params.canvas.width_f64();
    let h = params.canvas.height_f64();
    let t = clamp01(progress);
    let f = frame.0 as f64;

    let focus_x = w * (0.35 + 0.30 * (f * 0.006).sin());
    let focus_y = h * (0.45 + 0.25 * (f * 0.005).cos());
    let sweep_pos = lerp(-w * 0.2, w * 1.2, t);
    let pulse_x = lerp(w * 0.25, w * 0.75, t);
    let micro = if mode == RenderMode::Logo {
        0.0
    } else {
        MICRO_JITTER
    };

    let mut out = Vec::with_capacity(particles.len() * params.layers.len());
    for (li, layer) in params.layers.iter().enumerate() {
        let key_base = li as u64 * LAYER_KEY_STRIDE;
        for p in particles {
            let n = noise2(p.id as u64 + key_base);
            let mut x = p.position.x + n.x * micro * layer.z;
            let mut y = p.position.y + n.y * micro * layer.z;
            let mut r = p.radius * layer.z * LAYER_RADIUS_FACTOR;
            let mut alpha = params.base_alpha;

            match mode {
                RenderMode::Wake => {
                    let d = (x - focus_x).hypot(y - focus_y);
                    let g = smoothstep(1.0 - clamp01(d / WAKE_RADIUS));
                    alpha *= lerp(0.12, 1.0, g);
                    r *= lerp(0.85, 1.25, g);
                }
                RenderMode::Sweep => {
                    let dist = (x - y * SWEEP_SLOPE - sweep_pos).abs();
                    let hit = smoothstep(1.0 - clamp01(dist / SWEEP_BAND));
                    alpha *= lerp(0.35, 1.0, hit);
                    x += n.x * SWEEP_JITTER * hit * layer.z;
                    y += n.y * SWEEP_JITTER * hit * layer.z;
                }
                RenderMode::Pulse => {
                    let dist = (x - pulse_x).abs();
                    let hit = smoothstep(1.0 - clamp01(dist / PULSE_BAND));
                    alpha *= lerp(0.7, 1.0, hit);
                    r *= lerp(0.95, 1.08, hit);
                }
                RenderMode::Logo => {
                    alpha *= lerp(0.9, 1.0, smoothstep(t));
                }
                RenderMode::Morph => {}
            }

            out.push(DrawCircle {
                x,
                y,
                r,
                color: p.color.unwrap_or(params.default_color),
                alpha: alpha * layer.opacity,
            });
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
