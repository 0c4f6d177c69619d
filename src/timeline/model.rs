use crate::{
    animation::ease::Ease,
    foundation::core::{FrameIndex, FrameRange},
    foundation::error::{MorphError, MorphResult},
    shape::matcher::Matching,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Per-frame draw modulation applied by the compositor.
pub enum RenderMode {
    /// Radial brightness falloff around a slowly orbiting focus point.
    Wake,
    /// Diagonal band of brightness moving across the canvas.
    Sweep,
    /// No modulation.
    #[default]
    Morph,
    /// Vertical band moving left to right.
    Pulse,
    /// Near-static settle used while a wordmark is on screen.
    Logo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalKind {
    /// Steady state on one shape; progress is always 1.
    Hold,
    /// Morph between two shapes.
    Transition,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One timeline entry: frames `[start, end)` morph `from` into `to`.
pub struct IntervalSpec {
    pub start: u64,
    pub end: u64,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub mode: RenderMode,
    /// Inferred from the shape names when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<IntervalKind>,
    #[serde(default)]
    pub ease: Ease,
    #[serde(default)]
    pub matching: Matching,
}

impl IntervalSpec {
    pub fn hold(start: u64, end: u64, shape: impl Into<String>, mode: RenderMode) -> Self {
        let shape = shape.into();
        Self {
            start,
            end,
            from: shape.clone(),
            to: shape,
            mode,
            kind: Some(IntervalKind::Hold),
            ease: Ease::default(),
            matching: Matching::default(),
        }
    }

    pub fn transition(
        start: u64,
        end: u64,
        from: impl Into<String>,
        to: impl Into<String>,
        mode: RenderMode,
    ) -> Self {
        Self {
            start,
            end,
            from: from.into(),
            to: to.into(),
            mode,
            kind: Some(IntervalKind::Transition),
            ease: Ease::default(),
            matching: Matching::default(),
        }
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn with_matching(mut self, matching: Matching) -> Self {
        self.matching = matching;
        self
    }

    pub fn kind(&self) -> IntervalKind {
        self.kind.unwrap_or(if self.from == self.to {
            IntervalKind::Hold
        } else {
            IntervalKind::Transition
        })
    }

    pub fn is_hold(&self) -> bool {
        self.kind() == IntervalKind::Hold
    }

    pub fn range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(self.start),
            end: FrameIndex(self.end),
        }
    }
}

/// Check that `intervals` form a usable timeline.
///
/// Intervals must be non-empty, listed in start order and must not overlap.
/// Gaps between intervals are allowed.
pub fn validate_intervals(intervals: &[IntervalSpec]) -> MorphResult<()> {
    if intervals.is_empty() {
        return Err(MorphError::validation("timeline must contain at least one interval"));
    }
    for (i, iv) in intervals.iter().enumerate() {
        if iv.start >= iv.end {
            return Err(MorphError::validation(format!(
                "timeline interval {i} ({}..{}) must have start < end",
                iv.start, iv.end
            )));
        }
        if iv.from.is_empty() || iv.to.is_empty() {
            return Err(MorphError::validation(format!(
                "timeline interval {i} must name both shapes"
            )));
        }
        if iv.kind == Some(IntervalKind::Hold) && iv.from != iv.to {
            return Err(MorphError::validation(format!(
                "timeline interval {i} is a hold but morphs '{}' into '{}'",
                iv.from, iv.to
            )));
        }
    }
    for (i, pair) in intervals.windows(2).enumerate() {
        if pair[1].start < pair[0].end {
            return Err(MorphError::validation(format!(
                "timeline intervals {i} and {} overlap or are out of order",
                i + 1
            )));
        }
    }
    Ok(())
}
