use std::{collections::BTreeMap, path::Path};

use crate::{
    animation::ease::Ease,
    assets::color::Rgba8,
    assets::points::{Dot, PointSet},
    assets::store::{AssetIssue, PointAssetStore},
    foundation::core::{Canvas, FrameIndex, Fps},
    foundation::error::MorphResult,
    scene::config::{DepthLayer, ParticleConfig, SceneConfig},
    shape::sampler::ShapeSampler,
    timeline::model::RenderMode,
    timeline::state::Timeline,
};

#[derive(Clone, Copy, Debug)]
/// What to interpolate at one frame: two equally long point sets paired by
/// index, and the linear progress between them.
pub struct Segment<'a> {
    pub interval: usize,
    pub from: &'a [Dot],
    pub to: &'a [Dot],
    pub progress: f64,
    pub mode: RenderMode,
    pub ease: Ease,
}

#[derive(Clone, Debug)]
struct ResolvedInterval {
    from: PointSet,
    to: PointSet,
}

#[derive(Clone, Debug)]
/// A validated scene with every shape sampled and every transition matched.
///
/// Built once per composition; afterwards it is immutable and shared by all
/// frame workers.
pub struct PreparedScene {
    canvas: Canvas,
    fps: Fps,
    duration: u64,
    background: Rgba8,
    particles: ParticleConfig,
    layers: Vec<DepthLayer>,
    timeline: Timeline,
    shapes: BTreeMap<String, PointSet>,
    resolved: Vec<ResolvedInterval>,
    asset_issues: Vec<AssetIssue>,
}

impl PreparedScene {
    /// Load the config at `path` together with its point-list asset file.
    pub fn load(path: impl AsRef<Path>) -> MorphResult<Self> {
        let config = SceneConfig::from_json_path(path)?;
        let assets = match config.assets.as_deref() {
            Some(p) => PointAssetStore::load(p),
            None => PointAssetStore::new(),
        };
        Self::prepare(&config, &assets)
    }

    #[tracing::instrument(
        skip_all,
        fields(
            shapes = config.shapes.len(),
            intervals = config.timeline.len(),
            particles = config.particles.count
        )
    )]
    pub fn prepare(config: &SceneConfig, assets: &PointAssetStore) -> MorphResult<Self> {
        config.validate()?;
        let timeline = Timeline::new(config.timeline.clone())?;
        let sampler = ShapeSampler::new(
            config.canvas,
            config.particles.count,
            config.particles.radius,
            assets,
        );

        // Shapes are sampled lazily, once each, and only if the timeline uses them.
        let mut shapes = BTreeMap::<String, PointSet>::new();
        let mut sampled = |name: &str| -> PointSet {
            if let Some(pts) = shapes.get(name) {
                return pts.clone();
            }
            // Presence is guaranteed by `SceneConfig::validate`.
            let pts = config
                .shapes
                .get(name)
                .map(|kind| sampler.sample(kind))
                .unwrap_or_default();
            shapes.insert(name.to_string(), pts.clone());
            pts
        };

        let mut resolved = Vec::<ResolvedInterval>::with_capacity(timeline.intervals().len());
        for (i, iv) in timeline.intervals().iter().enumerate() {
            let chained = i
                .checked_sub(1)
                .filter(|&prev| timeline.intervals()[prev].to == iv.from)
                .map(|prev| resolved[prev].to.clone());
            let from = match chained {
                Some(pts) => pts,
                None => sampled(&iv.from),
            };
            let to = if iv.is_hold() {
                from.clone()
            } else {
                iv.matching.apply(&from, &sampled(&iv.to))
            };
            tracing::debug!(
                interval = i,
                from = %iv.from,
                to = %iv.to,
                chained = i > 0 && timeline.intervals()[i - 1].to == iv.from,
                "resolved interval"
            );
            resolved.push(ResolvedInterval { from, to });
        }

        let asset_issues = assets.issues().to_vec();
        if !asset_issues.is_empty() {
            tracing::warn!(
                issues = asset_issues.len(),
                "scene prepared with degraded point assets"
            );
        }

        Ok(Self {
            canvas: config.canvas,
            fps: config.fps,
            duration: config.duration_frames(),
            background: config.background,
            particles: config.particles,
            layers: config.layers.clone(),
            timeline,
            shapes,
            resolved,
            asset_issues,
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn duration_frames(&self) -> u64 {
        self.duration
    }

    pub fn background(&self) -> Rgba8 {
        self.background
    }

    pub fn particles(&self) -> &ParticleConfig {
        &self.particles
    }

    pub fn layers(&self) -> &[DepthLayer] {
        &self.layers
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Sampled (unmatched) point set of a shape used by the timeline.
    pub fn shape(&self, name: &str) -> Option<&[Dot]> {
        self.shapes.get(name).map(Vec::as_slice)
    }

    pub fn asset_issues(&self) -> &[AssetIssue] {
        &self.asset_issues
    }

    pub fn segment_at(&self, frame: FrameIndex) -> Segment<'_> {
        let cursor = self.timeline.locate(frame);
        let iv = &self.timeline.intervals()[cursor.interval];
        let r = &self.resolved[cursor.interval];
        Segment {
            interval: cursor.interval,
            from: &r.from,
            to: &r.to,
            progress: cursor.progress,
            mode: cursor.mode,
            ease: iv.ease,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/prepared.rs"]
mod tests;
