use super::*;
use crate::assets::color::Rgba8;

fn canvas() -> Canvas {
    Canvas {
        width: 1920,
        height: 1080,
    }
}

fn store_with(name: &str, pts: PointSet) -> PointAssetStore {
    let mut store = PointAssetStore::new();
    store.insert(name, pts);
    store
}

#[test]
fn pad_points_identity_when_length_matches() {
    let pts = vec![Dot::new(1.0, 2.0, 3.0), Dot::new(4.0, 5.0, 6.0)];
    assert_eq!(pad_points(pts.clone(), 2), pts);
}

#[test]
fn pad_points_truncates_to_prefix() {
    let pts: PointSet = (0..5).map(|i| Dot::new(i as f64, 0.0, 1.0)).collect();
    let out = pad_points(pts.clone(), 3);
    assert_eq!(out, pts[..3].to_vec());
}

#[test]
fn pad_points_cycles_with_small_jitter() {
    let pts = vec![Dot::new(10.0, 10.0, 2.0), Dot::new(50.0, 50.0, 4.0)];
    let out = pad_points(pts.clone(), 7);
    assert_eq!(out.len(), 7);
    assert_eq!(&out[..2], &pts[..]);
    for (i, d) in out.iter().enumerate().skip(2) {
        let base = pts[(i - 2) % 2];
        assert!((d.x - base.x).abs() < PAD_JITTER);
        assert!((d.y - base.y).abs() < PAD_JITTER);
        assert_eq!(d.r, base.r);
    }
    assert_eq!(out, pad_points(pts, 7));
}

#[test]
fn pad_points_from_empty_uses_fallback() {
    let out = pad_points_from(Vec::new(), 4, Dot::new(960.0, 540.0, 3.0));
    assert_eq!(out.len(), 4);
    assert_eq!(out[0], Dot::new(960.0, 540.0, 3.0));
    for d in &out {
        assert!((d.x - 960.0).abs() < PAD_JITTER);
        assert!((d.y - 540.0).abs() < PAD_JITTER);
    }
    assert!(pad_points(Vec::new(), 0).is_empty());
}

#[test]
fn every_kind_yields_exact_count() {
    let store = store_with("logo", vec![Dot::new(100.0, 100.0, 5.0)]);
    let sampler = ShapeSampler::new(canvas(), 500, 3.0, &store);
    let kinds = [
        ShapeKind::Grid {
            spacing: 32.0,
            margin: 80.0,
        },
        ShapeKind::Circle {
            radius: 240.0,
            center_offset: Vec2::ZERO,
        },
        ShapeKind::Ellipsis {
            radius: 26.0,
            gap: 140.0,
        },
        ShapeKind::RoundedRect {
            width: 400.0,
            height: 200.0,
            corner_radius: 30.0,
        },
        ShapeKind::Wordmark {
            text: "ISOMETRY".to_string(),
            dot_size: 9.0,
            gap: 4.0,
            vertical_offset: 20.0,
        },
        ShapeKind::Asset {
            name: "logo".to_string(),
            placement: AssetPlacement::default(),
            border: None,
        },
        ShapeKind::Asset {
            name: "missing".to_string(),
            placement: AssetPlacement::default(),
            border: None,
        },
    ];
    for kind in &kinds {
        assert_eq!(sampler.sample(kind).len(), 500, "{kind:?}");
    }
}

#[test]
fn dense_grid_stops_at_particle_count() {
    let store = PointAssetStore::new();
    let sampler = ShapeSampler::new(canvas(), 4, 3.0, &store);
    let pts = sampler.sample(&ShapeKind::Grid {
        spacing: 0.01,
        margin: 0.0,
    });
    assert_eq!(pts.len(), 4);
    for (i, d) in pts.iter().enumerate() {
        assert!((d.x - i as f64 * 0.01).abs() < 1e-9);
        assert_eq!(d.y, 0.0);
        assert_eq!(d.r, 3.0);
    }
}

#[test]
fn circle_points_lie_on_radius() {
    let store = PointAssetStore::new();
    let sampler = ShapeSampler::new(canvas(), 64, 3.0, &store);
    let pts = sampler.sample(&ShapeKind::Circle {
        radius: 100.0,
        center_offset: Vec2::new(10.0, 0.0),
    });
    for d in &pts {
        let r = ((d.x - 970.0).powi(2) + (d.y - 540.0).powi(2)).sqrt();
        assert!((r - 100.0).abs() < 1e-9);
        assert_eq!(d.r, 3.0);
    }
    assert!((pts[0].x - 1070.0).abs() < 1e-9);
}

#[test]
fn rounded_rect_stays_within_bounds() {
    let store = PointAssetStore::new();
    let sampler = ShapeSampler::new(canvas(), 200, 2.0, &store);
    let pts = sampler.sample(&ShapeKind::RoundedRect {
        width: 400.0,
        height: 200.0,
        corner_radius: 40.0,
    });
    for d in &pts {
        assert!(d.x >= 760.0 - 1e-9 && d.x <= 1160.0 + 1e-9);
        assert!(d.y >= 440.0 - 1e-9 && d.y <= 640.0 + 1e-9);
    }
    assert!((pts[0].x - 800.0).abs() < 1e-9);
    assert!((pts[0].y - 440.0).abs() < 1e-9);
}

#[test]
fn wordmark_lays_out_lit_cells_centered() {
    let store = PointAssetStore::new();
    let sampler = ShapeSampler::new(canvas(), 1, 3.0, &store);
    let raw = sampler.wordmark("I", 9.0, 4.0, 0.0);
    // "I" has 9 lit cells across 3 columns.
    assert_eq!(raw.len(), 9);
    let min_x = raw.iter().map(|d| d.x).fold(f64::INFINITY, f64::min);
    let max_y = raw.iter().map(|d| d.y).fold(f64::NEG_INFINITY, f64::max);
    assert!((min_x - (960.0 - 1.5 * 13.0)).abs() < 1e-9);
    assert!((max_y - (540.0 - 2.5 * 13.0 + 4.0 * 13.0)).abs() < 1e-9);
    assert!(raw.iter().all(|d| d.r == 4.5));
}

#[test]
fn wordmark_skips_unknown_glyphs() {
    let store = PointAssetStore::new();
    let sampler = ShapeSampler::new(canvas(), 1, 3.0, &store);
    assert_eq!(
        sampler.wordmark("I#", 9.0, 4.0, 0.0),
        sampler.wordmark("I", 9.0, 4.0, 0.0)
    );
    assert!(sampler.wordmark("###", 9.0, 4.0, 0.0).is_empty());
}

#[test]
fn placement_fits_source_into_canvas() {
    let placement = AssetPlacement {
        source_width: 960.0,
        source_height: 540.0,
        scale: 1.0,
        offset_x: 0.0,
        offset_y: 10.0,
        dot_scale: 0.5,
    };
    let d = placement.apply(canvas(), Dot::new(480.0, 270.0, 4.0));
    assert!((d.x - 960.0).abs() < 1e-9);
    assert!((d.y - 550.0).abs() < 1e-9);
    assert!((d.r - 4.0).abs() < 1e-9);
}

#[test]
fn edges_filter_keeps_inclusive_boundary() {
    let f = BorderFilter {
        left_edge: 10.0,
        right_edge: 100.0,
        top_edge: 20.0,
        bottom_edge: 200.0,
        mode: BorderMode::Edges,
    };
    assert!(f.keeps(&Dot::new(10.0, 20.0, 1.0)));
    assert!(f.keeps(&Dot::new(100.0, 200.0, 1.0)));
    assert!(!f.keeps(&Dot::new(9.9, 50.0, 1.0)));
    assert!(!f.keeps(&Dot::new(50.0, 200.1, 1.0)));
}

#[test]
fn corners_filter_only_drops_diagonal_outliers() {
    let f = BorderFilter {
        left_edge: 10.0,
        right_edge: 100.0,
        top_edge: 20.0,
        bottom_edge: 200.0,
        mode: BorderMode::Corners,
    };
    assert!(f.keeps(&Dot::new(5.0, 50.0, 1.0)));
    assert!(f.keeps(&Dot::new(50.0, 5.0, 1.0)));
    assert!(!f.keeps(&Dot::new(5.0, 5.0, 1.0)));
    assert!(!f.keeps(&Dot::new(150.0, 250.0, 1.0)));
}

#[test]
fn asset_sampling_filters_places_and_keeps_colors() {
    let red = Rgba8::rgb(255, 0, 0);
    let store = store_with(
        "logo",
        vec![
            Dot::new(1920.0, 1080.0, 2.0).with_color(red),
            Dot::new(0.0, 0.0, 2.0),
        ],
    );
    let sampler = ShapeSampler::new(canvas(), 1, 3.0, &store);
    let pts = sampler.sample(&ShapeKind::Asset {
        name: "logo".to_string(),
        placement: AssetPlacement::default(),
        border: Some(BorderFilter {
            left_edge: 100.0,
            right_edge: 2000.0,
            top_edge: 100.0,
            bottom_edge: 2000.0,
            mode: BorderMode::Edges,
        }),
    });
    assert_eq!(pts, vec![Dot::new(1920.0, 1080.0, 2.0).with_color(red)]);
}

#[test]
fn missing_asset_pads_around_canvas_center() {
    let store = PointAssetStore::new();
    let sampler = ShapeSampler::new(canvas(), 10, 3.0, &store);
    let pts = sampler.sample(&ShapeKind::Asset {
        name: "nope".to_string(),
        placement: AssetPlacement::default(),
        border: None,
    });
    assert_eq!(pts.len(), 10);
    for d in &pts {
        assert!((d.x - 960.0).abs() < PAD_JITTER);
        assert!((d.y - 540.0).abs() < PAD_JITTER);
        assert_eq!(d.r, 3.0);
    }
}

#[test]
fn malformed_asset_degrades_like_missing_one() {
    let store = PointAssetStore::from_json_str(r#"{ "bad": [[1, "two", 3]] }"#);
    let sampler = ShapeSampler::new(canvas(), 6, 3.0, &store);
    let pts = sampler.sample(&ShapeKind::Asset {
        name: "bad".to_string(),
        placement: AssetPlacement::default(),
        border: Some(BorderFilter {
            left_edge: 0.0,
            right_edge: 1.0,
            top_edge: 0.0,
            bottom_edge: 1.0,
            mode: BorderMode::Edges,
        }),
    });
    assert_eq!(pts.len(), 6);
    for d in &pts {
        assert!((d.x - 960.0).abs() < PAD_JITTER);
        assert!((d.y - 540.0).abs() < PAD_JITTER);
    }
}

#[test]
fn shape_kind_json_uses_kind_tag_and_defaults() {
    let k: ShapeKind = serde_json::from_str(r#"{"kind":"grid"}"#).unwrap();
    assert_eq!(
        k,
        ShapeKind::Grid {
            spacing: 32.0,
            margin: 80.0
        }
    );
    let k: ShapeKind = serde_json::from_str(
        r#"{"kind":"asset","name":"bci","placement":{"source_width":1536,"source_height":1049,"scale":1.05,"dot_scale":0.85},"border":{"left_edge":320,"right_edge":1230,"top_edge":340,"bottom_edge":700,"mode":"corners"}}"#,
    )
    .unwrap();
    match k {
        ShapeKind::Asset {
            name,
            placement,
            border,
        } => {
            assert_eq!(name, "bci");
            assert_eq!(placement.offset_x, 0.0);
            assert_eq!(border.map(|b| b.mode), Some(BorderMode::Corners));
        }
        other => panic!("unexpected {other:?}"),
    }
}
