use super::*;
use crate::{
    shape::matcher::{Matching, match_by_sort},
    shape::sampler::ShapeKind,
    timeline::model::IntervalSpec,
};

fn config(count: usize) -> SceneConfig {
    let mut cfg = SceneConfig::promo_default();
    cfg.particles.count = count;
    cfg.assets = None;
    cfg.duration = None;
    cfg.shapes.clear();
    cfg.shapes.insert(
        "ring".to_string(),
        ShapeKind::Circle {
            radius: 200.0,
            center_offset: Default::default(),
        },
    );
    cfg.shapes.insert(
        "box".to_string(),
        ShapeKind::RoundedRect {
            width: 300.0,
            height: 120.0,
            corner_radius: 20.0,
        },
    );
    cfg.shapes.insert(
        "grid".to_string(),
        ShapeKind::Grid {
            spacing: 64.0,
            margin: 100.0,
        },
    );
    cfg.timeline = vec![
        IntervalSpec::hold(0, 30, "ring", RenderMode::Logo),
        IntervalSpec::transition(30, 60, "ring", "box", RenderMode::Wake),
        IntervalSpec::transition(60, 90, "box", "grid", RenderMode::Sweep),
        IntervalSpec::transition(100, 130, "ring", "grid", RenderMode::Pulse)
            .with_matching(Matching::Index),
    ];
    cfg
}

#[test]
fn prepare_samples_each_used_shape_once_with_fixed_count() {
    let scene = PreparedScene::prepare(&config(120), &PointAssetStore::new()).unwrap();
    for name in ["ring", "box", "grid"] {
        assert_eq!(scene.shape(name).map(<[Dot]>::len), Some(120), "{name}");
    }
    assert_eq!(scene.duration_frames(), 130);
    assert!(scene.asset_issues().is_empty());
}

#[test]
fn transitions_chain_from_previous_target() {
    let scene = PreparedScene::prepare(&config(80), &PointAssetStore::new()).unwrap();
    let first = scene.segment_at(FrameIndex(45));
    let second = scene.segment_at(FrameIndex(75));
    assert_eq!(first.interval, 1);
    assert_eq!(second.interval, 2);
    assert_eq!(second.from, first.to);

    let ring = scene.shape("ring").unwrap();
    let boxed = scene.shape("box").unwrap();
    assert_eq!(first.from, ring);
    assert_eq!(first.to, match_by_sort(ring, boxed).as_slice());
}

#[test]
fn unchained_interval_resamples_and_respects_index_matching() {
    let scene = PreparedScene::prepare(&config(80), &PointAssetStore::new()).unwrap();
    let seg = scene.segment_at(FrameIndex(110));
    assert_eq!(seg.interval, 3);
    assert_eq!(seg.from, scene.shape("ring").unwrap());
    assert_eq!(seg.to, scene.shape("grid").unwrap());
    assert_eq!(seg.mode, RenderMode::Pulse);
}

#[test]
fn holds_pair_a_set_with_itself() {
    let scene = PreparedScene::prepare(&config(50), &PointAssetStore::new()).unwrap();
    let seg = scene.segment_at(FrameIndex(10));
    assert_eq!(seg.from, seg.to);
    assert_eq!(seg.progress, 1.0);
    assert_eq!(seg.mode, RenderMode::Logo);
}

#[test]
fn gap_frames_hold_previous_terminal_state() {
    let scene = PreparedScene::prepare(&config(50), &PointAssetStore::new()).unwrap();
    let seg = scene.segment_at(FrameIndex(95));
    assert_eq!(seg.interval, 2);
    assert_eq!(seg.progress, 1.0);
}

#[test]
fn missing_assets_degrade_to_centered_padding() {
    let mut cfg = config(40);
    cfg.shapes.insert(
        "brain".to_string(),
        ShapeKind::Asset {
            name: "brain".to_string(),
            placement: Default::default(),
            border: None,
        },
    );
    cfg.timeline = vec![IntervalSpec::transition(0, 30, "ring", "brain", RenderMode::Morph)];
    let scene = PreparedScene::prepare(&cfg, &PointAssetStore::new()).unwrap();
    let brain = scene.shape("brain").unwrap();
    assert_eq!(brain.len(), 40);
    assert!(brain.iter().all(|d| (d.x - 960.0).abs() < 1.0 && (d.y - 540.0).abs() < 1.0));
}

#[test]
fn invalid_config_is_rejected() {
    let mut cfg = config(10);
    cfg.timeline[0].from = "missing".to_string();
    cfg.timeline[0].to = "missing".to_string();
    assert!(PreparedScene::prepare(&cfg, &PointAssetStore::new()).is_err());
}
