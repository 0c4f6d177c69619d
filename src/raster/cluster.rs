//! Connected-component extraction of bright dots from a bitmap.
//!
//! Runs once per source image, offline; its output is persisted as a named
//! point list (see [`crate::PointAssetStore`]).

use std::{collections::VecDeque, path::Path};

use anyhow::Context;

use crate::{
    assets::points::{Dot, PointSet},
    foundation::error::{MorphError, MorphResult},
    foundation::math::round3,
};

/// Scale from mean member distance to the reported radius.
///
/// The mean distance of a filled disc's pixels from its center is about two
/// thirds of its radius; 1.2 is the empirically tuned compromise for small,
/// pixelated dots. Tunable, not exact.
pub const RADIUS_BIAS: f64 = 1.2;

/// Components smaller than this are treated as noise.
pub const MIN_COMPONENT_PIXELS: usize = 3;

/// Alpha must exceed this for a pixel to qualify.
const ALPHA_CUTOFF: u8 = 128;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Thresholds for dot extraction.
pub struct ClusterParams {
    /// Minimum brightness (mean of R, G, B) a pixel needs to qualify.
    #[serde(default = "default_threshold")]
    pub threshold: u8,
    /// Smallest accepted dot radius, inclusive.
    #[serde(default = "default_min_radius")]
    pub min_radius: f64,
    /// Largest accepted dot radius, inclusive.
    #[serde(default = "default_max_radius")]
    pub max_radius: f64,
    /// Detect dark dots on a light background.
    #[serde(default)]
    pub invert: bool,
}

fn default_threshold() -> u8 {
    200
}

fn default_min_radius() -> f64 {
    1.0
}

fn default_max_radius() -> f64 {
    50.0
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            min_radius: default_min_radius(),
            max_radius: default_max_radius(),
            invert: false,
        }
    }
}

impl ClusterParams {
    pub fn validate(&self) -> MorphResult<()> {
        if !(self.min_radius.is_finite() && self.max_radius.is_finite()) {
            return Err(MorphError::validation("cluster radius bounds must be finite"));
        }
        if self.min_radius < 0.0 || self.min_radius > self.max_radius {
            return Err(MorphError::validation(
                "cluster radius bounds must satisfy 0 <= min_radius <= max_radius",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Counters describing one clustering run.
pub struct ClusterStats {
    pub qualifying_pixels: usize,
    pub components: usize,
    pub rejected_small: usize,
    pub rejected_radius: usize,
    pub accepted: usize,
}

/// One connected bright region. Lives only for the duration of a clustering run.
#[derive(Clone, Debug)]
struct Cluster {
    pixels: Vec<(u32, u32)>,
    centroid: (f64, f64),
    radius: f64,
}

impl Cluster {
    fn from_pixels(pixels: Vec<(u32, u32)>) -> Self {
        let n = pixels.len() as f64;
        let (sx, sy) = pixels.iter().fold((0.0, 0.0), |(sx, sy), &(x, y)| {
            (sx + f64::from(x), sy + f64::from(y))
        });
        let centroid = (sx / n, sy / n);
        let dist_sum: f64 = pixels
            .iter()
            .map(|&(x, y)| (f64::from(x) - centroid.0).hypot(f64::from(y) - centroid.1))
            .sum();
        Self {
            centroid,
            radius: (dist_sum / n) * RADIUS_BIAS,
            pixels,
        }
    }

    fn to_dot(&self) -> Dot {
        Dot::new(
            round3(self.centroid.0),
            round3(self.centroid.1),
            round3(self.radius),
        )
    }
}

/// Cluster a row-major straight-alpha RGBA8 buffer into dots.
///
/// Output is sorted by `(y, x)` so it does not depend on scan order.
#[tracing::instrument(skip(rgba8), fields(len = rgba8.len()))]
pub fn cluster_rgba8(
    width: u32,
    height: u32,
    rgba8: &[u8],
    params: &ClusterParams,
) -> MorphResult<(PointSet, ClusterStats)> {
    params.validate()?;
    let w = width as usize;
    let h = height as usize;
    if rgba8.len() != w * h * 4 {
        return Err(MorphError::validation(format!(
            "rgba8 buffer length {} does not match {width}x{height}x4",
            rgba8.len()
        )));
    }

    let qualifies: Vec<bool> = rgba8
        .chunks_exact(4)
        .map(|px| pixel_qualifies(px, params))
        .collect();

    let mut stats = ClusterStats {
        qualifying_pixels: qualifies.iter().filter(|&&q| q).count(),
        ..ClusterStats::default()
    };

    let mut visited = vec![false; w * h];
    let mut queue = VecDeque::<(u32, u32)>::new();
    let mut dots = PointSet::new();

    for start in 0..w * h {
        if visited[start] || !qualifies[start] {
            continue;
        }

        let pixels = flood_fill(start, w, h, &qualifies, &mut visited, &mut queue);
        stats.components += 1;

        if pixels.len() < MIN_COMPONENT_PIXELS {
            stats.rejected_small += 1;
            continue;
        }

        let cluster = Cluster::from_pixels(pixels);
        if cluster.radius < params.min_radius || cluster.radius > params.max_radius {
            stats.rejected_radius += 1;
            continue;
        }
        debug_assert!(cluster.pixels.len() >= MIN_COMPONENT_PIXELS);
        dots.push(cluster.to_dot());
    }

    dots.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
    stats.accepted = dots.len();
    tracing::debug!(?stats, "clustered bitmap");
    Ok((dots, stats))
}

/// Cluster a decoded image.
pub fn cluster_image(
    img: &image::RgbaImage,
    params: &ClusterParams,
) -> MorphResult<(PointSet, ClusterStats)> {
    let (width, height) = img.dimensions();
    cluster_rgba8(width, height, img.as_raw(), params)
}

/// Decode an image file and cluster it.
pub fn cluster_image_file(
    path: &Path,
    params: &ClusterParams,
) -> MorphResult<(PointSet, ClusterStats)> {
    let img = image::open(path)
        .with_context(|| format!("decode image '{}'", path.display()))?
        .to_rgba8();
    cluster_image(&img, params)
}

fn pixel_qualifies(px: &[u8], params: &ClusterParams) -> bool {
    if px[3] <= ALPHA_CUTOFF {
        return false;
    }
    let mut brightness = (f64::from(px[0]) + f64::from(px[1]) + f64::from(px[2])) / 3.0;
    if params.invert {
        brightness = 255.0 - brightness;
    }
    brightness >= f64::from(params.threshold)
}

/// Breadth-first 4-connected fill from `start`, marking every claimed pixel visited.
fn flood_fill(
    start: usize,
    w: usize,
    h: usize,
    qualifies: &[bool],
    visited: &mut [bool],
    queue: &mut VecDeque<(u32, u32)>,
) -> Vec<(u32, u32)> {
    let mut pixels = Vec::new();
    queue.clear();
    visited[start] = true;
    queue.push_back(((start % w) as u32, (start / w) as u32));

    while let Some((x, y)) = queue.pop_front() {
        pixels.push((x, y));
        let (xu, yu) = (x as usize, y as usize);

        let neighbours = [
            (xu + 1 < w).then(|| (xu + 1, yu)),
            xu.checked_sub(1).map(|nx| (nx, yu)),
            (yu + 1 < h).then(|| (xu, yu + 1)),
            yu.checked_sub(1).map(|ny| (xu, ny)),
        ];
        for (nx, ny) in neighbours.into_iter().flatten() {
            let idx = ny * w + nx;
            if !visited[idx] && qualifies[idx] {
                visited[idx] = true;
                queue.push_back((nx as u32, ny as u32));
            }
        }
    }

    pixels
}

#[cfg(test)]
#[path = "../../tests/unit/raster/cluster.rs"]
mod tests;
