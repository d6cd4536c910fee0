use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::lane::Lane;

/// One physical tap. Sources must already have suppressed key repeat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// A keyed tap on a lane.
    Lane { lane: Lane, at: f64 },
    /// A pointer or touch tap at a playfield position.
    Pointer { x: f32, y: f32, at: f64 },
}

impl InputEvent {
    pub fn at(&self) -> f64 {
        match *self {
            InputEvent::Lane { at, .. } | InputEvent::Pointer { at, .. } => at,
        }
    }
}

/// Lazy producer of input events, drained once per tick.
pub trait InputSource {
    /// Returns the next event that has happened by clock time `now`, if any.
    fn next_event(&mut self, now: f64) -> Option<InputEvent>;
}

/// A recorded input trace released in time order as the clock passes each event.
#[derive(Debug, Clone, Default)]
pub struct TraceInput {
    events: VecDeque<InputEvent>,
}

impl TraceInput {
    pub fn new(mut events: Vec<InputEvent>) -> Self {
        events.sort_by(|a, b| a.at().total_cmp(&b.at()));
        Self {
            events: events.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl InputSource for TraceInput {
    fn next_event(&mut self, now: f64) -> Option<InputEvent> {
        if self.events.front()?.at() <= now {
            self.events.pop_front()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_releases_in_order_up_to_now() {
        let mut src = TraceInput::new(vec![
            InputEvent::Lane { lane: Lane::Key2, at: 2.0 },
            InputEvent::Pointer { x: 1.0, y: 2.0, at: 1.0 },
        ]);
        assert_eq!(src.next_event(0.5), None);
        assert_eq!(src.next_event(1.5).map(|e| e.at()), Some(1.0));
        assert_eq!(src.next_event(1.5), None);
        assert_eq!(src.next_event(2.0).map(|e| e.at()), Some(2.0));
        assert_eq!(src.remaining(), 0);
    }
}
