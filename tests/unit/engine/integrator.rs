use super::*;
use crate::{animation::ease::Ease, timeline::model::RenderMode};

fn seg<'a>(from: &'a [Dot], to: &'a [Dot], progress: f64) -> Segment<'a> {
    Segment {
        interval: 0,
        from,
        to,
        progress,
        mode: RenderMode::Morph,
        ease: Ease::InOutSine,
    }
}

fn field(n: usize, x: f64, y: f64) -> Vec<Dot> {
    (0..n).map(|i| Dot::new(x + i as f64, y, 2.0)).collect()
}

#[test]
fn frame_zero_returns_from_exactly() {
    let from = field(5, 3.25, -7.5);
    let to = field(5, 400.0, 90.0);
    let ps = integrate_segment(&seg(&from, &to, 0.7), FrameIndex(0), &SpringParams::default());
    assert_eq!(ps.len(), 5);
    for (p, d) in ps.iter().zip(&from) {
        assert_eq!(p.position, d.pos());
        assert_eq!(p.velocity, Vec2::ZERO);
        assert_eq!(p.base, d.pos());
    }
}

#[test]
fn repeated_calls_are_bit_identical() {
    let from = field(32, 0.0, 0.0);
    let to = field(32, 123.456, 789.0);
    let s = seg(&from, &to, 0.37);
    let params = SpringParams::default();
    for f in [1u64, 17, 250] {
        let a = integrate_segment(&s, FrameIndex(f), &params);
        let b = integrate_segment(&s, FrameIndex(f), &params);
        for (pa, pb) in a.iter().zip(&b) {
            assert_eq!(pa.position.x.to_bits(), pb.position.x.to_bits());
            assert_eq!(pa.position.y.to_bits(), pb.position.y.to_bits());
        }
    }
}

#[test]
fn first_step_follows_spring_update() {
    let from = vec![Dot::new(0.0, 0.0, 1.0)];
    let to = vec![Dot::new(10.0, 0.0, 1.0)];
    let ps = integrate_segment(&seg(&from, &to, 1.0), FrameIndex(1), &SpringParams::default());
    // acc = 10 * 0.12; vel = acc * 0.78
    assert!((ps[0].velocity.x - 0.936).abs() < 1e-12);
    assert!((ps[0].position.x - 0.936).abs() < 1e-12);
    assert_eq!(ps[0].position.y, 0.0);
}

#[test]
fn converges_to_eased_target() {
    let from = field(4, 0.0, 0.0);
    let to = field(4, 100.0, 50.0);
    let ps = integrate_segment(&seg(&from, &to, 1.0), FrameIndex(200), &SpringParams::default());
    for (p, d) in ps.iter().zip(&to) {
        assert!((p.position.x - d.x).abs() < 1e-6);
        assert!((p.position.y - d.y).abs() < 1e-6);
    }

    let half = integrate_segment(&seg(&from, &to, 0.5), FrameIndex(200), &SpringParams::default());
    assert!((half[0].position.x - 50.0).abs() < 1e-6);
    assert!((half[0].position.y - 25.0).abs() < 1e-6);
}

#[test]
fn color_switches_after_eased_midpoint() {
    let red = Rgba8::rgb(255, 0, 0);
    let blue = Rgba8::rgb(0, 0, 255);
    let from = vec![Dot::new(0.0, 0.0, 1.0).with_color(red)];
    let to = vec![Dot::new(10.0, 0.0, 1.0).with_color(blue)];
    let p = SpringParams::default();

    assert_eq!(integrate_segment(&seg(&from, &to, 0.6), FrameIndex(1), &p)[0].color, Some(blue));
    assert_eq!(integrate_segment(&seg(&from, &to, 0.4), FrameIndex(1), &p)[0].color, Some(red));
    assert_eq!(integrate_segment(&seg(&from, &to, 0.6), FrameIndex(0), &p)[0].color, Some(red));

    let plain = vec![Dot::new(10.0, 0.0, 1.0)];
    assert_eq!(integrate_segment(&seg(&from, &plain, 0.9), FrameIndex(3), &p)[0].color, Some(red));
}

#[test]
fn uncolored_pair_stays_uncolored() {
    let from = vec![Dot::new(0.0, 0.0, 1.0)];
    let to = vec![Dot::new(10.0, 0.0, 1.0)];
    let ps = integrate_segment(&seg(&from, &to, 0.9), FrameIndex(3), &SpringParams::default());
    assert_eq!(ps[0].color, None);
}

#[test]
fn radius_follows_eased_progress() {
    let from = vec![Dot::new(0.0, 0.0, 2.0)];
    let to = vec![Dot::new(0.0, 0.0, 6.0)];
    let p = SpringParams::default();
    assert_eq!(integrate_segment(&seg(&from, &to, 0.0), FrameIndex(5), &p)[0].radius, 2.0);
    assert_eq!(integrate_segment(&seg(&from, &to, 1.0), FrameIndex(5), &p)[0].radius, 6.0);
    assert!((integrate_segment(&seg(&from, &to, 0.5), FrameIndex(5), &p)[0].radius - 4.0).abs() < 1e-12);
}

#[test]
fn empty_target_keeps_particles_at_rest() {
    let from = field(3, 1.0, 2.0);
    let ps = integrate_segment(&seg(&from, &[], 1.0), FrameIndex(40), &SpringParams::default());
    for (p, d) in ps.iter().zip(&from) {
        assert_eq!(p.position, d.pos());
    }
}

#[test]
fn spring_params_validation() {
    assert!(SpringParams::default().validate().is_ok());
    assert!(SpringParams { stiffness: 0.0, damping: 0.5 }.validate().is_err());
    assert!(SpringParams { stiffness: 0.1, damping: 1.0 }.validate().is_err());
    assert!(SpringParams { stiffness: f64::NAN, damping: 0.5 }.validate().is_err());
}
