//! Single-machine timeline layout.
//!
//! Tasks run back to back in ordering order: each segment starts where the
//! previous one ended. Positions are expressed in percent of the track
//! width through [`Scale`].

use serde::{Deserialize, Serialize};

use crate::config::{DueDatePolicy, ScheduleConfig};
use crate::snapshot::{Ordering, TaskData};

/// Upper bound on axis markers; wider spacing is used past it.
pub const MAX_TIME_MARKERS: usize = 100;

/// One task on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Position in the ordering, 0-based.
    pub position: usize,
    /// Task index.
    pub index: usize,
    pub duration: f64,
    pub start: f64,
    pub end: f64,
    /// Due date used for tardiness, `None` when the task is never late.
    pub due_date: Option<f64>,
    /// `max(0, end - due)`.
    pub tardiness: f64,
}

impl Segment {
    /// Whether the task finished after its due date.
    #[must_use]
    pub fn is_late(&self) -> bool {
        self.tardiness > 0.0
    }
}

/// Time-units-to-percent mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "factor", rename_all = "snake_case")]
pub enum Scale {
    /// `100 / total_time` percent per time unit.
    Proportional(f64),
    /// Total time is zero; nothing can be scaled.
    Degenerate,
}

impl Scale {
    /// Scale for a timeline of `total_time` units.
    #[must_use]
    pub fn for_total(total_time: f64) -> Self {
        if total_time > 0.0 && total_time.is_finite() {
            Self::Proportional(100.0 / total_time)
        } else {
            Self::Degenerate
        }
    }

    /// Percent of the track covered by `time` units. Zero when degenerate.
    #[must_use]
    pub fn percent(&self, time: f64) -> f64 {
        match self {
            Self::Proportional(factor) => time * factor,
            Self::Degenerate => 0.0,
        }
    }

    /// Whether the scale is unusable.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        matches!(self, Self::Degenerate)
    }
}

/// Laid-out timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleLayout {
    segments: Vec<Segment>,
    total_time: f64,
    scale: Scale,
}

impl ScheduleLayout {
    /// Lay out `ordering` with per-task data.
    ///
    /// Without task data every task takes `config.missing_duration`. A task
    /// index with no usable duration is left off the timeline.
    #[must_use]
    pub fn compute(ordering: &Ordering, tasks: Option<&TaskData>, config: &ScheduleConfig) -> Self {
        let mut segments = Vec::with_capacity(ordering.len());
        let mut clock = 0.0;

        for (position, &index) in ordering.as_slice().iter().enumerate() {
            let duration = match tasks {
                Some(data) => match data.duration(index) {
                    Some(d) => d,
                    None => {
                        tracing::warn!(task = index, "task has no duration, skipping");
                        continue;
                    }
                },
                None => config.missing_duration,
            };

            let start = clock;
            let end = start + duration;
            clock = end;

            let due_date = match (tasks.and_then(|d| d.due_date(index)), config.due_date_policy) {
                (Some(due), _) => Some(due),
                (None, DueDatePolicy::ZeroDefault) => Some(0.0),
                (None, DueDatePolicy::NoDueDateNoTardiness) => None,
            };
            let tardiness = due_date.map_or(0.0, |due| (end - due).max(0.0));

            segments.push(Segment {
                position,
                index,
                duration,
                start,
                end,
                due_date,
                tardiness,
            });
        }

        let total_time = segments.last().map_or(0.0, |s| s.end);
        Self {
            segments,
            total_time,
            scale: Scale::for_total(total_time),
        }
    }

    /// Segments in ordering order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// End time of the last segment.
    #[must_use]
    pub const fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Percent mapping.
    #[must_use]
    pub const fn scale(&self) -> Scale {
        self.scale
    }

    /// Number of laid-out tasks.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.segments.len()
    }

    /// Number of tasks with positive tardiness.
    #[must_use]
    pub fn late_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_late()).count()
    }

    /// Sum of tardiness over all tasks.
    #[must_use]
    pub fn total_tardiness(&self) -> f64 {
        self.segments.iter().map(|s| s.tardiness).sum()
    }

    /// Axis marker times: `0, k, 2k, ..` up to the total time.
    ///
    /// The spacing is widened to a multiple of `interval` when more than
    /// [`MAX_TIME_MARKERS`] would be needed.
    #[must_use]
    pub fn time_markers(&self, interval: f64) -> Vec<f64> {
        if !(interval > 0.0 && interval.is_finite()) || self.scale.is_degenerate() {
            return vec![0.0];
        }
        let cap = MAX_TIME_MARKERS as f64;
        let needed = (self.total_time / interval).floor() + 1.0;
        let step = if needed > cap {
            interval * (needed / cap).ceil()
        } else {
            interval
        };
        // Counted in f64 so huge totals cannot overflow the cast.
        let count = ((self.total_time / step).floor() + 1.0).min(cap) as usize;
        (0..count).map(|k| k as f64 * step).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(order: &[usize], durations: &[f64], due: &[f64]) -> ScheduleLayout {
        ScheduleLayout::compute(
            &Ordering::new(order.to_vec()),
            Some(&TaskData::new(durations.to_vec(), due.to_vec())),
            &ScheduleConfig::default(),
        )
    }

    #[test]
    fn test_cumulative_segments() {
        let l = layout(&[0, 1, 2, 3], &[3.0, 1.0, 4.0, 1.0], &[]);
        let spans: Vec<(f64, f64)> = l.segments().iter().map(|s| (s.start, s.end)).collect();
        assert_eq!(spans, vec![(0.0, 3.0), (3.0, 4.0), (4.0, 8.0), (8.0, 9.0)]);
        assert!((l.total_time() - 9.0).abs() < 1e-12);
        assert_eq!(l.scale(), Scale::Proportional(100.0 / 9.0));
    }

    #[test]
    fn test_ordering_drives_start_times() {
        let l = layout(&[2, 0, 1], &[3.0, 1.0, 4.0], &[]);
        let starts: Vec<f64> = l.segments().iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![0.0, 4.0, 7.0]);
        assert_eq!(l.segments()[0].index, 2);
    }

    #[test]
    fn test_tardiness_with_due_dates() {
        let l = layout(&[0, 1], &[5.0, 5.0], &[4.0, 100.0]);
        assert!((l.segments()[0].tardiness - 1.0).abs() < 1e-12);
        assert!(l.segments()[1].tardiness.abs() < 1e-12);
        assert_eq!(l.late_count(), 1);
        assert!((l.total_tardiness() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_default_due_date() {
        let l = layout(&[0, 1], &[2.0, 3.0], &[]);
        assert!((l.segments()[0].tardiness - 2.0).abs() < 1e-12);
        assert!((l.segments()[1].tardiness - 5.0).abs() < 1e-12);
        assert_eq!(l.late_count(), 2);
    }

    #[test]
    fn test_no_due_date_policy() {
        let config = ScheduleConfig {
            due_date_policy: DueDatePolicy::NoDueDateNoTardiness,
            ..ScheduleConfig::default()
        };
        let l = ScheduleLayout::compute(
            &Ordering::new(vec![0, 1]),
            Some(&TaskData::new(vec![2.0, 3.0], vec![1.0])),
            &config,
        );
        assert!((l.segments()[0].tardiness - 1.0).abs() < 1e-12);
        assert!(l.segments()[1].due_date.is_none());
        assert!(l.segments()[1].tardiness.abs() < 1e-12);
        assert_eq!(l.late_count(), 1);
    }

    #[test]
    fn test_degenerate_scale() {
        let l = layout(&[0], &[0.0], &[]);
        assert_eq!(l.scale(), Scale::Degenerate);
        assert!(l.scale().percent(5.0).abs() < 1e-12);
        assert_eq!(l.time_markers(5.0), vec![0.0]);

        let empty = layout(&[], &[], &[]);
        assert!(empty.scale().is_degenerate());
        assert_eq!(empty.task_count(), 0);
    }

    #[test]
    fn test_missing_task_data_uses_default_duration() {
        let l = ScheduleLayout::compute(
            &Ordering::new(vec![1, 0, 2]),
            None,
            &ScheduleConfig::default(),
        );
        assert!((l.total_time() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_task_without_duration_is_skipped() {
        let l = layout(&[0, 7, 1], &[2.0, 2.0], &[]);
        assert_eq!(l.task_count(), 2);
        assert_eq!(l.segments()[1].index, 1);
        assert_eq!(l.segments()[1].position, 2);
        assert!((l.total_time() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_time_markers() {
        let l = layout(&[0, 1], &[6.0, 6.0], &[]);
        assert_eq!(l.time_markers(5.0), vec![0.0, 5.0, 10.0]);
        assert_eq!(l.time_markers(0.0), vec![0.0]);
    }

    #[test]
    fn test_time_markers_huge_total() {
        let l = layout(&[0], &[1e300], &[]);
        let markers = l.time_markers(5.0);
        assert!(!markers.is_empty());
        assert!(markers.len() <= MAX_TIME_MARKERS);
        assert!(markers[0].abs() < 1e-12);
        assert!(markers.iter().all(|m| m.is_finite() && *m <= l.total_time()));
    }

    #[test]
    fn test_time_markers_capped() {
        let l = layout(&[0], &[10_000.0], &[]);
        let markers = l.time_markers(5.0);
        assert!(markers.len() <= MAX_TIME_MARKERS);
        assert!(markers.len() > 1);
    }
}
