use std::{
    collections::BTreeMap,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use crate::{
    assets::color::Rgba8,
    assets::store::resolve_asset_path,
    engine::integrator::SpringParams,
    foundation::core::{Canvas, Fps},
    foundation::error::{MorphError, MorphResult},
    shape::sampler::{AssetPlacement, BorderFilter, BorderMode, ShapeKind},
    timeline::model::{IntervalSpec, RenderMode, validate_intervals},
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Global particle parameters shared by every shape and interval.
pub struct ParticleConfig {
    /// Fixed particle count `N`; every sampled shape is padded or truncated to it.
    #[serde(default = "default_count")]
    pub count: usize,
    /// Radius of procedural dots and of padding seeded at the canvas center.
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default = "default_color")]
    pub color: Rgba8,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub spring: SpringParams,
}

fn default_count() -> usize {
    2000
}

fn default_radius() -> f64 {
    3.0
}

fn default_color() -> Rgba8 {
    Rgba8::WHITE
}

fn default_opacity() -> f64 {
    1.0
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
            radius: default_radius(),
            color: default_color(),
            opacity: default_opacity(),
            spring: SpringParams::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One parallax layer: the particle field is redrawn once per layer.
pub struct DepthLayer {
    pub z: f64,
    pub opacity: f64,
}

impl Default for DepthLayer {
    fn default() -> Self {
        Self {
            z: 1.0,
            opacity: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Complete, JSON-facing description of a dot-morph composition.
///
/// Only `shapes` and `timeline` are required; everything else has the
/// defaults of the 1920x1080 / 30 fps / 2000 particle promo.
pub struct SceneConfig {
    #[serde(default = "default_canvas")]
    pub canvas: Canvas,
    #[serde(default = "default_fps")]
    pub fps: Fps,
    /// Composition length in frames. Defaults to the end of the timeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(default = "default_background")]
    pub background: Rgba8,
    #[serde(default)]
    pub particles: ParticleConfig,
    #[serde(default = "default_layers")]
    pub layers: Vec<DepthLayer>,
    /// Point-list asset file backing `asset` shapes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<PathBuf>,
    pub shapes: BTreeMap<String, ShapeKind>,
    pub timeline: Vec<IntervalSpec>,
}

fn default_canvas() -> Canvas {
    Canvas {
        width: 1920,
        height: 1080,
    }
}

fn default_fps() -> Fps {
    Fps { num: 30, den: 1 }
}

fn default_background() -> Rgba8 {
    Rgba8::BLACK
}

fn default_layers() -> Vec<DepthLayer> {
    vec![DepthLayer::default()]
}

impl SceneConfig {
    pub fn from_reader<R: std::io::Read>(r: R) -> MorphResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| MorphError::validation(format!("parse scene config JSON: {e}")))
    }

    /// Load a config file. A relative `assets` path is resolved against the
    /// directory containing the config.
    pub fn from_json_path(path: impl AsRef<Path>) -> MorphResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            MorphError::validation(format!("open scene config '{}': {e}", path.display()))
        })?;
        let mut cfg = Self::from_reader(BufReader::new(f))?;
        if let Some(assets) = cfg.assets.as_ref()
            && assets.is_relative()
        {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            cfg.assets = Some(resolve_asset_path(dir, &assets.to_string_lossy())?);
        }
        Ok(cfg)
    }

    pub fn duration_frames(&self) -> u64 {
        self.duration
            .unwrap_or_else(|| self.timeline.iter().map(|iv| iv.end).max().unwrap_or(0))
    }

    pub fn validate(&self) -> MorphResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(MorphError::validation("canvas width/height must be non-zero"));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        if self.duration == Some(0) {
            return Err(MorphError::validation("duration must be > 0 frames"));
        }

        let p = &self.particles;
        if p.count == 0 {
            return Err(MorphError::validation("particle count must be > 0"));
        }
        if !(p.radius.is_finite() && p.radius >= 0.0) {
            return Err(MorphError::validation("particle radius must be finite and >= 0"));
        }
        if !(0.0..=1.0).contains(&p.opacity) {
            return Err(MorphError::validation("particle opacity must be in [0, 1]"));
        }
        p.spring.validate()?;

        for (i, layer) in self.layers.iter().enumerate() {
            if !(layer.z.is_finite() && layer.z > 0.0) {
                return Err(MorphError::validation(format!(
                    "layer {i} z must be finite and > 0"
                )));
            }
            if !(0.0..=1.0).contains(&layer.opacity) {
                return Err(MorphError::validation(format!(
                    "layer {i} opacity must be in [0, 1]"
                )));
            }
        }

        for (name, shape) in &self.shapes {
            validate_shape(name, shape)?;
        }

        validate_intervals(&self.timeline)?;
        for (i, iv) in self.timeline.iter().enumerate() {
            for name in [&iv.from, &iv.to] {
                if !self.shapes.contains_key(name) {
                    return Err(MorphError::validation(format!(
                        "timeline interval {i} references unknown shape '{name}'"
                    )));
                }
            }
        }
        Ok(())
    }

    /// The 25.5 second promo: wordmark hold, four asset morphs, back to the
    /// wordmark, final hold.
    pub fn promo_default() -> Self {
        let asset = |name: &str,
                     source: (f64, f64),
                     scale: f64,
                     offset_y: f64,
                     dot_scale: f64,
                     border: Option<BorderFilter>| {
            ShapeKind::Asset {
                name: name.to_string(),
                placement: AssetPlacement {
                    source_width: source.0,
                    source_height: source.1,
                    scale,
                    offset_x: 0.0,
                    offset_y,
                    dot_scale,
                },
                border,
            }
        };
        let border = |left, right, top, bottom, mode| BorderFilter {
            left_edge: left,
            right_edge: right,
            top_edge: top,
            bottom_edge: bottom,
            mode,
        };

        let mut shapes = BTreeMap::new();
        shapes.insert(
            "logo".to_string(),
            ShapeKind::Wordmark {
                text: "ISOMETRY".to_string(),
                dot_size: 9.0,
                gap: 4.0,
                vertical_offset: 20.0,
            },
        );
        shapes.insert(
            "brain".to_string(),
            asset("brain", (540.0, 395.0), 0.85, 0.0, 0.9, None),
        );
        shapes.insert(
            "bci".to_string(),
            asset(
                "bci",
                (1536.0, 1049.0),
                1.05,
                0.0,
                0.85,
                Some(border(320.0, 1230.0, 340.0, 700.0, BorderMode::Corners)),
            ),
        );
        shapes.insert(
            "clinical".to_string(),
            asset(
                "clinical",
                (1536.0, 1272.0),
                1.25,
                60.0,
                0.85,
                Some(border(130.0, 1400.0, 310.0, 960.0, BorderMode::Edges)),
            ),
        );
        shapes.insert(
            "assistive".to_string(),
            asset(
                "assistive",
                (1536.0, 1237.0),
                1.25,
                120.0,
                0.85,
                Some(border(110.0, 1480.0, 240.0, 9999.0, BorderMode::Edges)),
            ),
        );

        let timeline = vec![
            IntervalSpec::hold(0, 90, "logo", RenderMode::Logo),
            IntervalSpec::transition(90, 180, "logo", "brain", RenderMode::Morph),
            IntervalSpec::transition(180, 300, "brain", "bci", RenderMode::Morph),
            IntervalSpec::transition(300, 420, "bci", "clinical", RenderMode::Morph),
            IntervalSpec::transition(420, 540, "clinical", "assistive", RenderMode::Morph),
            IntervalSpec::transition(540, 660, "assistive", "logo", RenderMode::Logo),
            IntervalSpec::hold(660, 765, "logo", RenderMode::Logo),
        ];

        Self {
            canvas: default_canvas(),
            fps: default_fps(),
            duration: Some(765),
            background: default_background(),
            particles: ParticleConfig::default(),
            layers: default_layers(),
            assets: Some(PathBuf::from("assets/scenes.json")),
            shapes,
            timeline,
        }
    }
}

fn validate_shape(name: &str, shape: &ShapeKind) -> MorphResult<()> {
    let bad = |what: &str| Err(MorphError::validation(format!("shape '{name}': {what}")));
    match shape {
        ShapeKind::Grid { spacing, margin } => {
            if !(spacing.is_finite() && *spacing > 0.0) {
                return bad("grid spacing must be finite and > 0");
            }
            if !margin.is_finite() {
                return bad("grid margin must be finite");
            }
        }
        ShapeKind::Circle { radius, .. } | ShapeKind::Ellipsis { radius, .. } => {
            if !(radius.is_finite() && *radius >= 0.0) {
                return bad("radius must be finite and >= 0");
            }
        }
        ShapeKind::RoundedRect {
            width,
            height,
            corner_radius,
        } => {
            if ![width, height, corner_radius]
                .iter()
                .all(|v| v.is_finite() && **v >= 0.0)
            {
                return bad("rounded rect dimensions must be finite and >= 0");
            }
        }
        ShapeKind::Wordmark { dot_size, gap, .. } => {
            if !(dot_size.is_finite() && *dot_size > 0.0 && gap.is_finite() && *gap >= 0.0) {
                return bad("wordmark dot size must be > 0 and gap >= 0");
            }
        }
        ShapeKind::Asset { placement, .. } => {
            if !(placement.source_width > 0.0 && placement.source_height > 0.0) {
                return bad("asset source dimensions must be > 0");
            }
            if !(placement.scale.is_finite() && placement.dot_scale.is_finite()) {
                return bad("asset scale factors must be finite");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
