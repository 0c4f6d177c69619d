//! Dotmorph is a deterministic particle morphing engine for dot-field animations.
//!
//! A composition is a field of `N` particles that morphs between named shapes
//! (procedural layouts, text wordmarks, point lists clustered from images)
//! along a frame-based timeline. Every frame is a pure function of the
//! prepared scene and the frame number:
//!
//! - Load a [`SceneConfig`] and build a [`PreparedScene`] (shapes are sampled
//!   and transitions matched once)
//! - Call [`render_frame`] for any frame, in any order, on any thread
//! - Rasterize with [`rasterize_frame`] or stream to MP4 with [`render_to_mp4`]
//!
//! Point-list assets are produced offline by [`cluster_image_file`].
#![forbid(unsafe_code)]

pub mod animation;
pub mod assets;
pub mod encode;
pub mod engine;
pub mod foundation;
pub mod raster;
pub mod render;
pub mod scene;
pub mod shape;
pub mod timeline;

pub use crate::animation::ease::{Ease, ease_in_out};
pub use crate::assets::color::Rgba8;
pub use crate::assets::points::{Dot, PointSet};
pub use crate::assets::store::{
    AssetIssue, AssetIssueKind, AssetLookup, PointAssetStore, normalize_rel_path,
    resolve_asset_path,
};
pub use crate::encode::ffmpeg::{EncodeConfig, FfmpegEncoder};
pub use crate::engine::integrator::{Particle, SpringParams, integrate_segment};
pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange, Point, Vec2};
pub use crate::foundation::error::{MorphError, MorphResult};
pub use crate::foundation::noise::{hash01, noise2};
pub use crate::raster::cluster::{
    ClusterParams, ClusterStats, cluster_image, cluster_image_file, cluster_rgba8,
};
pub use crate::render::compositor::{CompositeParams, DrawCircle, composite_frame};
pub use crate::render::cpu::{FrameRGBA, rasterize_frame};
pub use crate::render::pipeline::{
    RenderThreading, RenderToMp4Opts, render_frame, render_frame_rgba, render_frames,
    render_to_mp4,
};
pub use crate::scene::config::{DepthLayer, ParticleConfig, SceneConfig};
pub use crate::scene::prepared::{PreparedScene, Segment};
pub use crate::shape::matcher::{Matching, match_by_sort, sort_points_xy};
pub use crate::shape::sampler::{
    AssetPlacement, BorderFilter, BorderMode, ShapeKind, ShapeSampler, pad_points,
    pad_points_from,
};
pub use crate::timeline::model::{IntervalKind, IntervalSpec, RenderMode};
pub use crate::timeline::state::{Timeline, TimelineCursor};
