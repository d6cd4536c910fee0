//! Session plumbing: chart preparation before play, the per-frame driver,
//! and deterministic replays on a manual clock.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use onbeat_audio::{AudioSource, OnsetDetector};
use onbeat_config::GameConfig;
use onbeat_pattern::ChartGenerator;
use onbeat_types::{
    Chart, ChartWarning, Clock, InputEvent, InputSource, JudgmentResult, ManualClock, ScoreState,
    TraceInput,
};

use crate::game_state::{GameState, TickReport};

/// Decodes and analyses the track, falling back to the metronome grid when
/// decoding fails. Always yields a playable chart; play must not start
/// before this completes.
pub async fn prepare_chart<S>(
    source: &S,
    detector: &OnsetDetector,
    generator: &mut ChartGenerator,
) -> Chart
where
    S: AudioSource + Sync,
{
    match source.decode().await {
        Ok(buffer) => {
            log::info!(
                "decoded {} frames at {} Hz",
                buffer.num_frames(),
                buffer.sample_rate
            );
            let detection = detector.detect(&buffer);
            generator.generate(&detection.beat_times, detection.tempo, detection.warnings)
        }
        Err(err) => {
            log::warn!("audio decode failed: {err}");
            generator.fallback(
                None,
                ChartWarning::DecodeFailure {
                    reason: err.to_string(),
                },
            )
        }
    }
}

/// Drives a [`GameState`] from a clock and an input source, one call per
/// frame. Stopping is simply not calling [`GameLoop::tick`] again.
pub struct GameLoop<C, I> {
    state: GameState,
    clock: C,
    input: I,
}

impl<C: Clock, I: InputSource> GameLoop<C, I> {
    pub fn new(state: GameState, clock: C, input: I) -> Self {
        Self {
            state,
            clock,
            input,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Reads the clock, queues every input due by then, and ticks.
    pub fn tick(&mut self) -> TickReport {
        let now = self.clock.now();
        while let Some(event) = self.input.next_event(now) {
            self.state.enqueue_input(event);
        }
        self.state.tick_at(now)
    }
}

/// Score after one judgment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub time: f64,
    pub score: u64,
    pub combo: u32,
}

/// Outcome of a replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Replay {
    /// One entry per judgment, in emission order.
    pub trajectory: Vec<ScoreSnapshot>,
    pub judgments: Vec<JudgmentResult>,
    pub final_score: ScoreState,
    /// Clock time of the last tick.
    pub end_time: f64,
}

const DEFAULT_FRAME_STEP: f64 = 1.0 / 60.0;

/// Plays `trace` against `chart` on a manual clock advanced by `frame_step`
/// seconds per tick, until every note has been judged and faded.
///
/// Placement is seeded with 0 when the config has no seed so pointer traces
/// replay identically.
pub fn replay(
    chart: &Chart,
    config: &GameConfig,
    trace: Vec<InputEvent>,
    frame_step: f64,
) -> Replay {
    let step = if frame_step.is_finite() && frame_step > 0.0 {
        frame_step
    } else {
        DEFAULT_FRAME_STEP
    };
    let mut config = config.clone();
    config.playfield.seed.get_or_insert(0);

    let state = GameState::new(chart.clone(), &config);
    let auto_miss = state.judge().property().auto_miss_us() as f64 / 1e6;
    // The pending cap admits at most `max_pending` notes per tick, so dense
    // charts need one extra frame per batch beyond the last note.
    let batches = chart.len().div_ceil(config.scheduler.max_pending.max(1));
    let limit = chart.last_time()
        + auto_miss
        + config.decay.hit.max(config.decay.miss)
        + 1.0
        + batches as f64 * step;

    let mut game = GameLoop::new(state, ManualClock::new(), TraceInput::new(trace));
    let mut trajectory = Vec::new();
    let mut judgments = Vec::new();
    let mut running = 0;
    let mut frame: u64 = 0;
    loop {
        let report = game.tick();
        for j in report.judgments {
            running += j.score_delta;
            trajectory.push(ScoreSnapshot {
                time: report.now,
                score: running,
                combo: j.combo_after,
            });
            judgments.push(j);
        }
        if game.state().is_finished() || report.now >= limit {
            break;
        }
        frame += 1;
        game.clock_mut().set(frame as f64 * step);
    }

    let state = game.into_state();
    if !state.is_finished() {
        log::warn!(
            "replay stopped at {:.3}s with {} of {} notes unscheduled and {} still active",
            state.now(),
            state.chart().len() - state.scheduled_count(),
            state.chart().len(),
            state.active_notes().len()
        );
    }
    log::info!(
        "replay finished at {:.3}s: score {}, max combo {}",
        state.now(),
        state.score_state().score,
        state.score_state().max_combo
    );
    Replay {
        trajectory,
        judgments,
        final_score: state.score_state().clone(),
        end_time: state.now(),
    }
}

/// Lane taps for every chart note, each offset by a uniform timing error in
/// `[-max_error, max_error]` seconds.
pub fn autoplay_trace(chart: &Chart, max_error: f64, seed: u64) -> Vec<InputEvent> {
    let mut rng = StdRng::seed_from_u64(seed);
    let max_error = if max_error.is_finite() { max_error.abs() } else { 0.0 };
    chart
        .notes()
        .iter()
        .map(|n| {
            let error = if max_error > 0.0 {
                rng.gen_range(-max_error..=max_error)
            } else {
                0.0
            };
            InputEvent::Lane {
                lane: n.lane,
                at: (n.time + error).max(0.0),
            }
        })
        .collect()
}
