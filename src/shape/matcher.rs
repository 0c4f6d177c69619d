use std::cmp::Ordering;

use crate::assets::points::{Dot, PointSet};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// How the `to` set of a transition is paired with its `from` set.
pub enum Matching {
    /// Rank correspondence by (x, then y); see [`match_by_sort`].
    #[default]
    Sort,
    /// Pair by raw index.
    Index,
}

impl Matching {
    /// Reorder `to` so that `out[i]` is the partner of `from[i]`.
    pub fn apply(self, from: &[Dot], to: &[Dot]) -> PointSet {
        match self {
            Self::Sort => match_by_sort(from, to),
            Self::Index => match_by_index(from, to),
        }
    }
}

fn cmp_xy(a: &Dot, b: &Dot) -> Ordering {
    a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y))
}

/// Stable sort by x, then y.
pub fn sort_points_xy(pts: &mut [Dot]) {
    pts.sort_by(cmp_xy);
}

/// Pair `from` and `to` by sort rank.
///
/// `to` is stably ordered by (x, then y) and its i-th smallest point becomes
/// the partner of particle `i`, clamped to the last one when `to` is shorter.
/// The result has the length of `from`. Particle `i` therefore lands on the
/// i-th ranked target regardless of where `from[i]` sits, so the pairing is a
/// true rank correspondence only when `from` is itself sorted.
///
/// An empty `to` pairs every point with itself.
pub fn match_by_sort(from: &[Dot], to: &[Dot]) -> PointSet {
    if to.is_empty() {
        return from.to_vec();
    }

    let mut sorted_to = to.to_vec();
    sort_points_xy(&mut sorted_to);
    let last = sorted_to.len() - 1;
    (0..from.len()).map(|i| sorted_to[i.min(last)]).collect()
}

fn match_by_index(from: &[Dot], to: &[Dot]) -> PointSet {
    if to.is_empty() {
        return from.to_vec();
    }
    let last = to.len() - 1;
    (0..from.len()).map(|i| to[i.min(last)]).collect()
}
