use crate::{
    foundation::core::FrameIndex,
    foundation::error::MorphResult,
    timeline::model::{IntervalKind, IntervalSpec, RenderMode, validate_intervals},
};

#[derive(Clone, Copy, Debug, PartialEq)]
/// Where a frame falls on the timeline.
pub struct TimelineCursor {
    /// Index into [`Timeline::intervals`].
    pub interval: usize,
    /// Linear progress through the interval in `[0, 1]`. Holds always report 1.
    pub progress: f64,
    pub mode: RenderMode,
    pub kind: IntervalKind,
}

#[derive(Clone, Debug)]
/// Validated, immutable list of timeline intervals.
///
/// [`Timeline::locate`] is a pure function of the frame number. Frames that
/// fall outside every interval clamp to a neighbouring interval: before the
/// first one at progress 0, in a gap or past the end at the preceding
/// interval's terminal state.
pub struct Timeline {
    intervals: Vec<IntervalSpec>,
}

impl Timeline {
    pub fn new(intervals: Vec<IntervalSpec>) -> MorphResult<Self> {
        validate_intervals(&intervals)?;
        Ok(Self { intervals })
    }

    pub fn intervals(&self) -> &[IntervalSpec] {
        &self.intervals
    }

    /// End frame (exclusive) of the last interval.
    pub fn end_frame(&self) -> u64 {
        self.intervals.last().map_or(0, |iv| iv.end)
    }

    pub fn locate(&self, frame: FrameIndex) -> TimelineCursor {
        let after = self.intervals.partition_point(|iv| iv.start <= frame.0);
        let (interval, progress) = match after.checked_sub(1) {
            None => (0, 0.0),
            Some(i) => {
                let range = self.intervals[i].range();
                if range.contains(frame) {
                    (i, range.progress(frame))
                } else {
                    (i, 1.0)
                }
            }
        };

        let iv = &self.intervals[interval];
        let kind = iv.kind();
        TimelineCursor {
            interval,
            progress: if kind == IntervalKind::Hold {
                1.0
            } else {
                progress
            },
            mode: iv.mode,
            kind,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/state.rs"]
mod tests;
