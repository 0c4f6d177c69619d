use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::{
    assets::points::{Dot, PointSet},
    assets::store::{AssetLookup, PointAssetStore},
    foundation::core::{Canvas, Vec2},
    foundation::noise::noise2,
    shape::glyphs::{GLYPH_ROWS, glyph},
};

/// Positional jitter amplitude for synthesized padding points.
pub const PAD_JITTER: f64 = 0.6;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// A named target configuration of particle positions.
pub enum ShapeKind {
    /// Regular grid covering the canvas inside a margin.
    Grid {
        #[serde(default = "default_grid_spacing")]
        spacing: f64,
        #[serde(default = "default_grid_margin")]
        margin: f64,
    },
    /// Exactly `N` points evenly spaced on a circle around the canvas center.
    Circle {
        #[serde(default = "default_circle_radius")]
        radius: f64,
        #[serde(default)]
        center_offset: Vec2,
    },
    /// Three small rings side by side ("...").
    Ellipsis {
        #[serde(default = "default_ellipsis_radius")]
        radius: f64,
        #[serde(default = "default_ellipsis_gap")]
        gap: f64,
    },
    /// Perimeter of a centered rounded rectangle walked at equal arclength steps.
    RoundedRect {
        width: f64,
        height: f64,
        #[serde(default)]
        corner_radius: f64,
    },
    /// Text rasterized with the built-in 5-row dot font.
    Wordmark {
        #[serde(default = "default_wordmark_text")]
        text: String,
        #[serde(default = "default_wordmark_dot_size")]
        dot_size: f64,
        #[serde(default = "default_wordmark_gap")]
        gap: f64,
        #[serde(default = "default_wordmark_vertical_offset")]
        vertical_offset: f64,
    },
    /// A clustered point list loaded from the asset store by name.
    Asset {
        name: String,
        #[serde(default)]
        placement: AssetPlacement,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        border: Option<BorderFilter>,
    },
}

fn default_grid_spacing() -> f64 {
    32.0
}

fn default_grid_margin() -> f64 {
    80.0
}

fn default_circle_radius() -> f64 {
    240.0
}

fn default_ellipsis_radius() -> f64 {
    26.0
}

fn default_ellipsis_gap() -> f64 {
    140.0
}

fn default_wordmark_text() -> String {
    "ISOMETRY".to_string()
}

fn default_wordmark_dot_size() -> f64 {
    9.0
}

fn default_wordmark_gap() -> f64 {
    4.0
}

fn default_wordmark_vertical_offset() -> f64 {
    20.0
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Maps source-image pixel coordinates onto the canvas.
///
/// The source is fitted into the canvas preserving aspect ratio, scaled by
/// `scale`, centered, then shifted by the offsets. Radii additionally scale by
/// `dot_scale`.
pub struct AssetPlacement {
    pub source_width: f64,
    pub source_height: f64,
    #[serde(default = "one")]
    pub scale: f64,
    #[serde(default)]
    pub offset_x: f64,
    #[serde(default)]
    pub offset_y: f64,
    #[serde(default = "one")]
    pub dot_scale: f64,
}

fn one() -> f64 {
    1.0
}

impl Default for AssetPlacement {
    fn default() -> Self {
        Self {
            source_width: 1920.0,
            source_height: 1080.0,
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            dot_scale: 1.0,
        }
    }
}

impl AssetPlacement {
    pub fn apply(&self, canvas: Canvas, dot: Dot) -> Dot {
        let (w, h) = (canvas.width_f64(), canvas.height_f64());
        let fit = (w / self.source_width).min(h / self.source_height) * self.scale;
        let ox = w / 2.0 - (self.source_width * fit) / 2.0 + self.offset_x;
        let oy = h / 2.0 - (self.source_height * fit) / 2.0 + self.offset_y;
        Dot {
            x: dot.x * fit + ox,
            y: dot.y * fit + oy,
            r: dot.r * fit * self.dot_scale,
            color: dot.color,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderMode {
    /// Discard any point outside the rectangle on any side.
    #[default]
    Edges,
    /// Discard only points outside on one axis and beyond the near edge of the other axis.
    Corners,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Rectangular filter evaluated in source-image space. Edges are inclusive.
pub struct BorderFilter {
    pub left_edge: f64,
    pub right_edge: f64,
    pub top_edge: f64,
    pub bottom_edge: f64,
    #[serde(default)]
    pub mode: BorderMode,
}

impl BorderFilter {
    pub fn keeps(&self, dot: &Dot) -> bool {
        let left = dot.x < self.left_edge;
        let right = dot.x > self.right_edge;
        let top = dot.y < self.top_edge;
        let bottom = dot.y > self.bottom_edge;
        match self.mode {
            BorderMode::Edges => !(left || right || top || bottom),
            BorderMode::Corners => {
                let outside_x = left || right;
                let outside_y = top || bottom;
                !(outside_x && outside_y)
            }
        }
    }

    pub fn apply(&self, dots: &[Dot]) -> PointSet {
        dots.iter().copied().filter(|d| self.keeps(d)).collect()
    }
}

/// Pad or truncate `pts` to exactly `n` points.
///
/// Equal length is returned unchanged; longer input keeps its first `n` points;
/// shorter input is extended by cycling through the originals with a small
/// deterministic jitter. Empty input is padded from a zero-radius dot at the origin.
pub fn pad_points(pts: PointSet, n: usize) -> PointSet {
    pad_points_from(pts, n, Dot::new(0.0, 0.0, 0.0))
}

/// [`pad_points`] with an explicit seed dot used when `pts` is empty.
pub fn pad_points_from(mut pts: PointSet, n: usize, fallback: Dot) -> PointSet {
    if pts.len() >= n {
        pts.truncate(n);
        return pts;
    }
    if pts.is_empty() {
        pts.push(fallback);
        if n == 1 {
            return pts;
        }
    }

    let originals = pts.len();
    pts.reserve(n - originals);
    let mut i = 0usize;
    while pts.len() < n {
        let base = pts[i % originals];
        let jitter = noise2((i + pts.len()) as u64) * PAD_JITTER;
        pts.push(base.offset(jitter));
        i += 1;
    }
    pts
}

#[derive(Clone, Copy, Debug)]
/// Produces fixed-cardinality point sets for shape descriptions.
pub struct ShapeSampler<'a> {
    canvas: Canvas,
    count: usize,
    default_radius: f64,
    assets: &'a PointAssetStore,
}

impl<'a> ShapeSampler<'a> {
    pub fn new(
        canvas: Canvas,
        count: usize,
        default_radius: f64,
        assets: &'a PointAssetStore,
    ) -> Self {
        Self {
            canvas,
            count,
            default_radius,
            assets,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Sample `kind`; the result always has exactly `count` points.
    pub fn sample(&self, kind: &ShapeKind) -> PointSet {
        let raw = match kind {
            ShapeKind::Grid { spacing, margin } => self.grid(*spacing, *margin),
            ShapeKind::Circle {
                radius,
                center_offset,
            } => self.ring(
                self.canvas.center().to_vec2() + *center_offset,
                *radius,
                self.count,
            ),
            ShapeKind::Ellipsis { radius, gap } => self.ellipsis(*radius, *gap),
            ShapeKind::RoundedRect {
                width,
                height,
                corner_radius,
            } => self.rounded_rect(*width, *height, *corner_radius),
            ShapeKind::Wordmark {
                text,
                dot_size,
                gap,
                vertical_offset,
            } => self.wordmark(text, *dot_size, *gap, *vertical_offset),
            ShapeKind::Asset {
                name,
                placement,
                border,
            } => self.asset(name, placement, border.as_ref()),
        };
        pad_points_from(raw, self.count, self.fallback_dot())
    }

    fn fallback_dot(&self) -> Dot {
        let c = self.canvas.center();
        Dot::new(c.x, c.y, self.default_radius)
    }

    fn grid(&self, spacing: f64, margin: f64) -> PointSet {
        let mut pts = PointSet::new();
        if spacing <= 0.0 {
            return pts;
        }
        let (w, h) = (self.canvas.width_f64(), self.canvas.height_f64());
        let mut y = margin;
        while y <= h - margin && pts.len() < self.count {
            let mut x = margin;
            while x <= w - margin && pts.len() < self.count {
                pts.push(Dot::new(x, y, self.default_radius));
                x += spacing;
            }
            y += spacing;
        }
        pts
    }

    fn ring(&self, center: Vec2, radius: f64, n: usize) -> PointSet {
        (0..n)
            .map(|i| {
                let a = (i as f64 / n as f64) * TAU;
                Dot::new(
                    center.x + a.cos() * radius,
                    center.y + a.sin() * radius,
                    self.default_radius,
                )
            })
            .collect()
    }

    fn ellipsis(&self, radius: f64, gap: f64) -> PointSet {
        let c = self.canvas.center().to_vec2();
        let per_ring = self.count / 3;
        [-gap, 0.0, gap]
            .into_iter()
            .flat_map(|dx| self.ring(c + Vec2::new(dx, 0.0), radius, per_ring))
            .collect()
    }

    fn rounded_rect(&self, width: f64, height: f64, corner_radius: f64) -> PointSet {
        let width = width.max(0.0);
        let height = height.max(0.0);
        let rc = corner_radius.clamp(0.0, width.min(height) / 2.0);
        let c = self.canvas.center();
        let (left, top) = (c.x - width / 2.0, c.y - height / 2.0);
        let (right, bottom) = (left + width, top + height);

        let straight_w = width - 2.0 * rc;
        let straight_h = height - 2.0 * rc;
        let arc = FRAC_PI_2 * rc;
        let perimeter = 2.0 * (straight_w + straight_h) + 4.0 * arc;
        if perimeter <= 0.0 || self.count == 0 {
            return PointSet::new();
        }

        // Clockwise from the top-left end of the top edge.
        let segments = [
            PerimeterPiece::Line {
                from: (left + rc, top),
                dir: (1.0, 0.0),
                len: straight_w,
            },
            PerimeterPiece::Arc {
                center: (right - rc, top + rc),
                start: -FRAC_PI_2,
                radius: rc,
            },
            PerimeterPiece::Line {
                from: (right, top + rc),
                dir: (0.0, 1.0),
                len: straight_h,
            },
            PerimeterPiece::Arc {
                center: (right - rc, bottom - rc),
                start: 0.0,
                radius: rc,
            },
            PerimeterPiece::Line {
                from: (right - rc, bottom),
                dir: (-1.0, 0.0),
                len: straight_w,
            },
            PerimeterPiece::Arc {
                center: (left + rc, bottom - rc),
                start: FRAC_PI_2,
                radius: rc,
            },
            PerimeterPiece::Line {
                from: (left, bottom - rc),
                dir: (0.0, -1.0),
                len: straight_h,
            },
            PerimeterPiece::Arc {
                center: (left + rc, top + rc),
                start: PI,
                radius: rc,
            },
        ];

        (0..self.count)
            .map(|i| {
                let mut s = perimeter * (i as f64) / (self.count as f64);
                let mut pos = segments[0].at(0.0);
                for seg in &segments {
                    let len = seg.len();
                    if s <= len {
                        pos = seg.at(s);
                        break;
                    }
                    s -= len;
                }
                Dot::new(pos.0, pos.1, self.default_radius)
            })
            .collect()
    }

    fn wordmark(&self, text: &str, dot_size: f64, gap: f64, vertical_offset: f64) -> PointSet {
        let glyphs: Vec<_> = text.chars().filter_map(glyph).collect();
        if glyphs.is_empty() {
            return PointSet::new();
        }

        let pitch = dot_size + gap;
        let total_cols: usize =
            glyphs.iter().map(|g| g[0].len()).sum::<usize>() + (glyphs.len() - 1);
        let c = self.canvas.center();
        let start_x = c.x - (total_cols as f64 * pitch) / 2.0;
        let start_y = c.y - (GLYPH_ROWS as f64 * pitch) / 2.0 + vertical_offset;

        let mut pts = PointSet::new();
        let mut cursor = 0usize;
        for g in glyphs {
            for (row, bits) in g.iter().enumerate() {
                for (col, bit) in bits.bytes().enumerate() {
                    if bit == b'1' {
                        pts.push(Dot::new(
                            start_x + (cursor + col) as f64 * pitch,
                            start_y + row as f64 * pitch,
                            dot_size / 2.0,
                        ));
                    }
                }
            }
            cursor += g[0].len() + 1;
        }
        pts
    }

    fn asset(
        &self,
        name: &str,
        placement: &AssetPlacement,
        border: Option<&BorderFilter>,
    ) -> PointSet {
        let lookup = self.assets.lookup(name);
        if !matches!(lookup, AssetLookup::Found(_)) {
            tracing::warn!(
                asset = name,
                ?lookup,
                "point asset unavailable; scene renders padded placeholder"
            );
        }
        let source = lookup.points();

        let filtered = match border {
            Some(filter) => filter.apply(source),
            None => source.to_vec(),
        };
        tracing::debug!(
            asset = name,
            source = source.len(),
            kept = filtered.len(),
            "sampled asset shape"
        );
        filtered
            .into_iter()
            .map(|d| placement.apply(self.canvas, d))
            .collect()
    }
}

#[derive(Clone, Copy, Debug)]
enum PerimeterPiece {
    Line {
        from: (f64, f64),
        dir: (f64, f64),
        len: f64,
    },
    /// Quarter circle swept clockwise (in screen space) from `start`.
    Arc {
        center: (f64, f64),
        start: f64,
        radius: f64,
    },
}

impl PerimeterPiece {
    fn len(&self) -> f64 {
        match *self {
            Self::Line { len, .. } => len,
            Self::Arc { radius, .. } => FRAC_PI_2 * radius,
        }
    }

    fn at(&self, s: f64) -> (f64, f64) {
        match *self {
            Self::Line { from, dir, .. } => (from.0 + dir.0 * s, from.1 + dir.1 * s),
            Self::Arc {
                center,
                start,
                radius,
            } => {
                let a = if radius > 0.0 { start + s / radius } else { start };
                (center.0 + a.cos() * radius, center.1 + a.sin() * radius)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shape/sampler.rs"]
mod tests;
