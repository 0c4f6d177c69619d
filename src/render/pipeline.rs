use std::path::PathBuf;

use rayon::prelude::*;

use crate::{
    encode::ffmpeg::{EncodeConfig, FfmpegEncoder},
    engine::integrator::integrate_segment,
    foundation::core::{FrameIndex, FrameRange},
    foundation::error::{MorphError, MorphResult},
    render::compositor::{CompositeParams, DrawCircle, composite_frame},
    render::cpu::{FrameRGBA, rasterize_frame},
    scene::prepared::PreparedScene,
};

/// Draw list for one frame.
///
/// This is the per-frame contract: a pure function of the prepared scene and
/// the frame number, safe to call concurrently and in any order.
pub fn render_frame(scene: &PreparedScene, frame: FrameIndex) -> Vec<DrawCircle> {
    let segment = scene.segment_at(frame);
    let particles = integrate_segment(&segment, frame, &scene.particles().spring);
    let params = CompositeParams {
        canvas: scene.canvas(),
        layers: scene.layers(),
        base_alpha: scene.particles().opacity,
        default_color: scene.particles().color,
    };
    composite_frame(&particles, &params, segment.mode, segment.progress, frame)
}

/// Draw list for one frame rasterized over the scene background.
pub fn render_frame_rgba(scene: &PreparedScene, frame: FrameIndex) -> MorphResult<FrameRGBA> {
    rasterize_frame(
        &render_frame(scene, frame),
        scene.canvas(),
        scene.background(),
    )
}

#[derive(Clone, Debug)]
pub struct RenderThreading {
    pub parallel: bool,
    pub chunk_size: usize,
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
        }
    }
}

/// Render the draw lists of `range` (start inclusive, end exclusive) in frame order.
///
/// With `threading.parallel` the frames of each chunk are computed on a rayon
/// pool; output is identical to the sequential path.
pub fn render_frames(
    scene: &PreparedScene,
    range: FrameRange,
    threading: &RenderThreading,
) -> MorphResult<Vec<Vec<DrawCircle>>> {
    if range.is_empty() {
        return Err(MorphError::validation("render range must be non-empty"));
    }
    let mut out = Vec::with_capacity(range.len_frames().min(4096) as usize);
    for_each_chunk(range, threading, |chunk, pool| {
        let mut frames = render_chunk(scene, chunk, pool, |scene, f| Ok(render_frame(scene, f)))?;
        out.append(&mut frames);
        Ok(())
    })?;
    Ok(out)
}

/// Options for [`render_to_mp4`].
#[derive(Clone, Debug)]
pub struct RenderToMp4Opts {
    /// Frames to encode; `None` renders the whole composition.
    pub range: Option<FrameRange>,
    pub overwrite: bool,
    pub crf: Option<u8>,
    pub threading: RenderThreading,
}

impl Default for RenderToMp4Opts {
    fn default() -> Self {
        Self {
            range: None,
            overwrite: true,
            crf: None,
            threading: RenderThreading::default(),
        }
    }
}

/// Render a scene to MP4 through the system `ffmpeg` binary.
///
/// Requires an integer frame rate. Returns the number of frames encoded.
pub fn render_to_mp4(
    scene: &PreparedScene,
    out_path: impl Into<PathBuf>,
    opts: &RenderToMp4Opts,
) -> MorphResult<u64> {
    let range = match opts.range {
        Some(r) => r,
        None => FrameRange::new(FrameIndex(0), FrameIndex(scene.duration_frames()))?,
    };
    if range.is_empty() {
        return Err(MorphError::validation("render_to_mp4 range must be non-empty"));
    }
    if range.end.0 > scene.duration_frames() {
        return Err(MorphError::validation(
            "render_to_mp4 range must be within composition duration",
        ));
    }
    let fps = scene.fps();
    if fps.den != 1 {
        return Err(MorphError::validation(
            "render_to_mp4 currently requires integer fps (fps.den == 1)",
        ));
    }

    let cfg = EncodeConfig {
        crf: opts.crf,
        overwrite: opts.overwrite,
        ..EncodeConfig::new(out_path, scene.canvas(), fps.num)
    };
    let mut enc = FfmpegEncoder::new(cfg, scene.background())?;

    for_each_chunk(range, &opts.threading, |chunk, pool| {
        let frames = render_chunk(scene, chunk, pool, render_frame_rgba)?;
        for frame in &frames {
            enc.encode_frame(frame)?;
        }
        tracing::debug!(start = chunk.start.0, end = chunk.end.0, "encoded chunk");
        Ok(())
    })?;

    let written = enc.finish()?;
    tracing::info!(
        frames = written,
        seconds = fps.frames_to_secs(written),
        "mp4 render finished"
    );
    Ok(written)
}

fn for_each_chunk(
    range: FrameRange,
    threading: &RenderThreading,
    mut f: impl FnMut(FrameRange, Option<&rayon::ThreadPool>) -> MorphResult<()>,
) -> MorphResult<()> {
    let pool = if threading.parallel {
        Some(build_thread_pool(threading.threads)?)
    } else {
        None
    };
    let chunk_size = normalized_chunk_size(threading.chunk_size);

    let mut chunk_start = range.start.0;
    while chunk_start < range.end.0 {
        let chunk_end = (chunk_start + chunk_size).min(range.end.0);
        let chunk = FrameRange::new(FrameIndex(chunk_start), FrameIndex(chunk_end))
            .map_err(|e| MorphError::evaluation(format!("invalid chunk range: {e}")))?;
        f(chunk, pool.as_ref())?;
        chunk_start = chunk_end;
    }
    Ok(())
}

fn render_chunk<T: Send>(
    scene: &PreparedScene,
    range: FrameRange,
    pool: Option<&rayon::ThreadPool>,
    render: impl Fn(&PreparedScene, FrameIndex) -> MorphResult<T> + Sync,
) -> MorphResult<Vec<T>> {
    match pool {
        None => (range.start.0..range.end.0)
            .map(|f| render(scene, FrameIndex(f)))
            .collect(),
        Some(pool) => pool.install(|| {
            (0..range.len_frames() as usize)
                .into_par_iter()
                .map(|i| render(scene, FrameIndex(range.start.0 + i as u64)))
                .collect()
        }),
    }
}

fn build_thread_pool(threads: Option<usize>) -> MorphResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(MorphError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| MorphError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    chunk_size.max(1) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
