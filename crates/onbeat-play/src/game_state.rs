//! The owned gameplay aggregate: active notes, scheduler, judgment engine
//! and approach smoother, advanced one tick at a time.

use std::collections::VecDeque;

use onbeat_config::GameConfig;
use onbeat_types::{
    Chart, Clock, DecayWindows, InputEvent, JudgeLabel, JudgmentResult, LaneBindings, Note,
    Position, ScoreState,
};

use crate::approach::ApproachSmoother;
use crate::judge_manager::JudgeEngine;
use crate::judge_property::JudgeProperty;
use crate::placement::{Placement, ScatterPlacement};
use crate::scheduler::NoteScheduler;

/// Callback fired synchronously for every judgment.
pub type JudgmentListener = Box<dyn FnMut(&JudgmentResult) + Send>;

/// What one tick did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Clock time the tick ran at.
    pub now: f64,
    /// Notes activated by the scheduler.
    pub activated: usize,
    /// Judgments in emission order: input first, then automatic misses.
    pub judgments: Vec<JudgmentResult>,
    /// Judged notes dropped after their fade.
    pub pruned: usize,
}

/// Single-writer game state. Input is queued and only applied inside
/// [`GameState::tick_at`].
pub struct GameState {
    chart: Chart,
    scheduler: NoteScheduler,
    smoother: ApproachSmoother,
    judge: JudgeEngine,
    placement: Box<dyn Placement + Send>,
    bindings: LaneBindings,
    decay: DecayWindows,
    note_radius: f32,
    notes: Vec<Note>,
    queue: VecDeque<InputEvent>,
    listeners: Vec<JudgmentListener>,
    now: f64,
}

impl GameState {
    pub fn new(chart: Chart, config: &GameConfig) -> Self {
        let playfield = &config.playfield;
        Self {
            scheduler: NoteScheduler::from(&config.scheduler),
            smoother: ApproachSmoother::new(chart.tempo, &config.approach),
            judge: JudgeEngine::new(JudgeProperty::from(&config.judge)),
            placement: Box::new(ScatterPlacement::new(
                playfield.width,
                playfield.height,
                playfield.seed,
            )),
            bindings: LaneBindings::default(),
            decay: config.decay,
            note_radius: playfield.note_radius(),
            notes: Vec::new(),
            queue: VecDeque::new(),
            listeners: Vec::new(),
            now: 0.0,
            chart,
        }
    }

    pub fn with_placement(mut self, placement: Box<dyn Placement + Send>) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_bindings(mut self, bindings: LaneBindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    pub fn bindings(&self) -> &LaneBindings {
        &self.bindings
    }

    /// Queues an input event for the next tick. Events with a non-finite
    /// timestamp are dropped.
    pub fn enqueue_input(&mut self, event: InputEvent) {
        if !event.at().is_finite() {
            log::debug!("dropping input with non-finite time: {event:?}");
            return;
        }
        self.queue.push_back(event);
    }

    /// Queues a lane tap for a bound key. Unbound keys are dropped.
    pub fn press_key(&mut self, key: char, at: f64) -> bool {
        match self.bindings.lane_for_key(key) {
            Some(lane) => {
                self.enqueue_input(InputEvent::Lane { lane, at });
                true
            }
            None => false,
        }
    }

    pub fn on_judgment<F>(&mut self, listener: F)
    where
        F: FnMut(&JudgmentResult) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Notes currently in the working set, pending or fading.
    pub fn active_notes(&self) -> &[Note] {
        &self.notes
    }

    /// Notes a renderer should draw at the last tick: fading notes, and
    /// pending notes whose approach progress is in range.
    pub fn drawable_notes(&self) -> impl Iterator<Item = &Note> + '_ {
        let (now, approach) = (self.now, self.smoother.value());
        self.notes
            .iter()
            .filter(move |n| !n.is_pending() || n.is_visible(now, approach))
    }

    /// Chart entries the scheduler has activated so far.
    pub fn scheduled_count(&self) -> usize {
        self.scheduler.cursor()
    }

    pub fn pending_count(&self) -> usize {
        self.notes.iter().filter(|n| n.is_pending()).count()
    }

    pub fn score_state(&self) -> &ScoreState {
        self.judge.score()
    }

    /// Smoothed approach time in seconds.
    pub fn approach(&self) -> f64 {
        self.smoother.value()
    }

    pub fn note_radius(&self) -> f32 {
        self.note_radius
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn last_judgment_visible(&self, now: f64) -> Option<JudgeLabel> {
        self.judge.last_judgment_visible(now)
    }

    pub fn judge(&self) -> &JudgeEngine {
        &self.judge
    }

    /// Every chart entry has been activated, judged and faded out.
    pub fn is_finished(&self) -> bool {
        self.scheduler.is_finished(&self.chart) && self.notes.is_empty()
    }

    /// Restarts the session from the beginning of the chart, e.g. when the
    /// playback clock is reset for a replay.
    pub fn reset(&mut self) {
        self.scheduler.reset();
        self.smoother.reset();
        self.judge.reset();
        self.notes.clear();
        self.queue.clear();
        self.now = 0.0;
    }

    pub fn tick<C: Clock + ?Sized>(&mut self, clock: &C) -> TickReport {
        self.tick_at(clock.now())
    }

    /// Runs one tick at clock time `now`.
    ///
    /// Order: clock, approach smoothing, scheduling, queued input,
    /// automatic misses, pruning of faded notes.
    pub fn tick_at(&mut self, now: f64) -> TickReport {
        if now < self.now {
            log::debug!("clock went backwards ({now:.3} < {:.3}), holding", self.now);
        }
        let now = now.max(self.now);
        self.now = now;

        let pending = self.pending_count();
        self.smoother.update(pending);

        let range = self.scheduler.advance(now, &self.chart, pending);
        let activated = range.len();
        for index in range {
            if let Some(entry) = self.chart.get(index) {
                let mut note = Note::new(index, entry.lane, entry.time);
                self.placement.place(&mut note);
                self.notes.push(note);
            }
        }

        let mut judgments = Vec::new();
        while let Some(event) = self.queue.pop_front() {
            let result = match event {
                InputEvent::Lane { lane, at } => self.judge.judge_lane(&mut self.notes, lane, at),
                InputEvent::Pointer { x, y, at } => self.judge.judge_pointer(
                    &mut self.notes,
                    Position::new(x, y),
                    at,
                    self.note_radius,
                ),
            };
            if let Some(result) = result {
                self.emit(&result);
                judgments.push(result);
            }
        }

        for result in self.judge.sweep_misses(&mut self.notes, now) {
            self.emit(&result);
            judgments.push(result);
        }

        let before = self.notes.len();
        let decay = self.decay;
        self.notes.retain(|n| !n.is_expired(now, &decay));

        TickReport {
            now,
            activated,
            judgments,
            pruned: before - self.notes.len(),
        }
    }

    fn emit(&mut self, result: &JudgmentResult) {
        for listener in &mut self.listeners {
            listener(result);
        }
    }
}
