use super::*;

const MINIMAL: &str = r#"{
    "shapes": {
        "ring": { "kind": "circle", "radius": 100 },
        "grid": { "kind": "grid" }
    },
    "timeline": [
        { "start": 0, "end": 30, "from": "ring", "to": "ring", "mode": "logo" },
        { "start": 30, "end": 75, "from": "ring", "to": "grid", "mode": "wake" }
    ]
}"#;

#[test]
fn minimal_json_fills_promo_defaults() {
    let cfg = SceneConfig::from_reader(MINIMAL.as_bytes()).unwrap();
    assert_eq!(cfg.canvas, default_canvas());
    assert_eq!(cfg.fps, Fps { num: 30, den: 1 });
    assert_eq!(cfg.particles.count, 2000);
    assert_eq!(cfg.particles.radius, 3.0);
    assert_eq!(cfg.particles.color, Rgba8::WHITE);
    assert_eq!(cfg.particles.spring, SpringParams::default());
    assert_eq!(cfg.layers, vec![DepthLayer::default()]);
    assert_eq!(cfg.background, Rgba8::BLACK);
    assert_eq!(cfg.duration_frames(), 75);
    cfg.validate().unwrap();
}

#[test]
fn particle_overrides_parse() {
    let cfg = SceneConfig::from_reader(
        r##"{
            "particles": { "count": 64, "color": "#4fd1ff", "spring": { "damping": 0.5 } },
            "duration": 120,
            "shapes": { "a": { "kind": "ellipsis" } },
            "timeline": [ { "start": 0, "end": 10, "from": "a", "to": "a" } ]
        }"##
        .as_bytes(),
    )
    .unwrap();
    assert_eq!(cfg.particles.count, 64);
    assert_eq!(cfg.particles.color, Rgba8::rgb(0x4f, 0xd1, 0xff));
    assert_eq!(cfg.particles.spring.stiffness, 0.12);
    assert_eq!(cfg.particles.spring.damping, 0.5);
    assert_eq!(cfg.duration_frames(), 120);
}

#[test]
fn validation_rejects_unknown_shapes_and_bad_ranges() {
    let mut cfg = SceneConfig::from_reader(MINIMAL.as_bytes()).unwrap();
    cfg.timeline[1].to = "nope".to_string();
    assert!(cfg.validate().is_err());

    let mut cfg = SceneConfig::from_reader(MINIMAL.as_bytes()).unwrap();
    cfg.particles.count = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = SceneConfig::from_reader(MINIMAL.as_bytes()).unwrap();
    cfg.canvas.width = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = SceneConfig::from_reader(MINIMAL.as_bytes()).unwrap();
    cfg.layers[0].z = 0.0;
    assert!(cfg.validate().is_err());

    let mut cfg = SceneConfig::from_reader(MINIMAL.as_bytes()).unwrap();
    cfg.shapes.insert(
        "bad".to_string(),
        ShapeKind::Grid {
            spacing: 0.0,
            margin: 0.0,
        },
    );
    assert!(cfg.validate().is_err());
}

#[test]
fn malformed_json_is_a_validation_error() {
    let err = SceneConfig::from_reader("{ not json".as_bytes()).unwrap_err();
    assert!(matches!(err, MorphError::Validation(_)));
}

#[test]
fn promo_default_is_valid_and_covers_765_frames() {
    let cfg = SceneConfig::promo_default();
    cfg.validate().unwrap();
    assert_eq!(cfg.duration_frames(), 765);
    assert_eq!(cfg.timeline.len(), 7);
    assert_eq!(cfg.timeline[0].from, "logo");
    assert_eq!(cfg.timeline.last().map(|iv| iv.end), Some(765));
    assert!(matches!(
        cfg.shapes.get("bci"),
        Some(ShapeKind::Asset {
            border: Some(BorderFilter {
                mode: BorderMode::Corners,
                ..
            }),
            ..
        })
    ));
}

#[test]
fn relative_asset_path_resolves_against_config_dir() {
    let dir = std::env::temp_dir().join(format!("dotmorph_cfg_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("scene.json");
    let mut cfg = SceneConfig::from_reader(MINIMAL.as_bytes()).unwrap();
    cfg.assets = Some(PathBuf::from("points.json"));
    std::fs::write(&path, serde_json::to_string(&cfg).unwrap()).unwrap();

    let loaded = SceneConfig::from_json_path(&path).unwrap();
    assert_eq!(loaded.assets, Some(dir.join("points.json")));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn asset_path_may_not_escape_config_dir() {
    let dir = std::env::temp_dir().join(format!("dotmorph_cfg_escape_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("scene.json");
    let mut cfg = SceneConfig::from_reader(MINIMAL.as_bytes()).unwrap();
    cfg.assets = Some(PathBuf::from("../points.json"));
    std::fs::write(&path, serde_json::to_string(&cfg).unwrap()).unwrap();

    assert!(SceneConfig::from_json_path(&path).is_err());
    let _ = std::fs::remove_dir_all(&dir);
}
