use std::ops::Range;

use onbeat_config::SchedulerConfig;
use onbeat_types::Chart;

/// Paces note activation against the clock.
///
/// A cursor walks the chart; entries are activated while they fall inside the
/// lookahead window and fewer than `max_pending` notes are unresolved. When
/// either condition fails the walk stops for this call. Entries are never
/// skipped, so a blocked entry is activated as soon as room frees up.
#[derive(Debug, Clone)]
pub struct NoteScheduler {
    cursor: usize,
    lookahead: f64,
    max_pending: usize,
}

impl NoteScheduler {
    pub fn new(lookahead: f64, max_pending: usize) -> Self {
        Self {
            cursor: 0,
            lookahead,
            max_pending,
        }
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Index of the next chart entry to activate.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn max_pending(&self) -> usize {
        self.max_pending
    }

    pub fn is_finished(&self, chart: &Chart) -> bool {
        self.cursor >= chart.len()
    }

    /// Advances the cursor at `now` given the current number of pending
    /// notes. Returns the chart indices to activate.
    pub fn advance(&mut self, now: f64, chart: &Chart, pending: usize) -> Range<usize> {
        let start = self.cursor;
        let horizon = now + self.lookahead;
        let mut pending = pending;
        while let Some(entry) = chart.get(self.cursor) {
            if entry.time >= horizon || pending >= self.max_pending {
                break;
            }
            self.cursor += 1;
            pending += 1;
        }
        if self.cursor > start {
            log::trace!("activated chart entries {start}..{}", self.cursor);
        }
        start..self.cursor
    }
}

impl Default for NoteScheduler {
    fn default() -> Self {
        Self::from(&SchedulerConfig::default())
    }
}

impl From<&SchedulerConfig> for NoteScheduler {
    fn from(config: &SchedulerConfig) -> Self {
        Self::new(config.lookahead, config.max_pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onbeat_types::{Lane, NoteTemplate};

    fn chart(times: &[f64]) -> Chart {
        Chart::new(
            times
                .iter()
                .map(|&time| NoteTemplate {
                    time,
                    lane: Lane::Key1,
                })
                .collect(),
            None,
        )
    }

    #[test]
    fn lookahead_limits_activation() {
        let c = chart(&[1.0, 5.0, 8.0, 9.0]);
        let mut s = NoteScheduler::default();
        assert_eq!(s.advance(0.0, &c, 0), 0..2);
        assert_eq!(s.advance(0.5, &c, 2), 2..3);
        assert_eq!(s.advance(1.5, &c, 3), 3..4);
        assert!(s.is_finished(&c));
        assert_eq!(s.advance(100.0, &c, 0), 4..4);
    }

    #[test]
    fn cap_blocks_without_skipping() {
        let c = chart(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
        let mut s = NoteScheduler::default();
        assert_eq!(s.advance(0.0, &c, 0), 0..4);
        assert_eq!(s.advance(0.1, &c, 4), 4..4);
        assert_eq!(s.cursor(), 4);
        // One note resolved: exactly one more is let in.
        assert_eq!(s.advance(0.2, &c, 3), 4..5);
        assert_eq!(s.advance(0.3, &c, 1), 5..6);
    }

    #[test]
    fn existing_pending_counts_toward_cap() {
        let c = chart(&[0.1, 0.2]);
        let mut s = NoteScheduler::new(8.0, 2);
        assert_eq!(s.advance(0.0, &c, 1), 0..1);
    }

    #[test]
    fn reset_rewinds() {
        let c = chart(&[0.1]);
        let mut s = NoteScheduler::default();
        s.advance(0.0, &c, 0);
        s.reset();
        assert_eq!(s.cursor(), 0);
    }
}
