use std::sync::{Arc, Mutex};

use onbeat_config::GameConfig;
use onbeat_play::GameState;
use onbeat_types::{
    Chart, InputEvent, JudgeLabel, Lane, NoteState, NoteTemplate, Position,
};
use proptest::prelude::*;

fn config() -> GameConfig {
    let mut config = GameConfig::default();
    config.playfield.seed = Some(1);
    config
}

fn chart(notes: &[(f64, Lane)]) -> Chart {
    Chart::new(
        notes
            .iter()
            .map(|&(time, lane)| NoteTemplate { time, lane })
            .collect(),
        None,
    )
}

fn tap(lane: Lane, at: f64) -> InputEvent {
    InputEvent::Lane { lane, at }
}

#[test]
fn tap_timing_against_note_at_two_seconds() {
    for (at, expected) in [
        (2.03, Some(JudgeLabel::Cool)),
        (2.12, Some(JudgeLabel::Fine)),
        (2.30, Some(JudgeLabel::Miss)),
    ] {
        let mut game = GameState::new(chart(&[(2.0, Lane::Key1)]), &config());
        game.tick_at(0.0);
        game.enqueue_input(tap(Lane::Key1, at));
        let report = game.tick_at(at);
        let labels: Vec<JudgeLabel> = report.judgments.iter().map(|j| j.label).collect();
        assert_eq!(labels, expected.into_iter().collect::<Vec<_>>(), "tap at {at}");
    }
}

#[test]
fn late_stray_tap_leaves_note_alone() {
    let mut game = GameState::new(chart(&[(2.0, Lane::Key1)]), &config());
    game.tick_at(0.0);
    game.enqueue_input(tap(Lane::Key1, 2.40));
    let report = game.tick_at(2.36);
    assert!(report.judgments.is_empty());
    assert_eq!(game.active_notes()[0].state, NoteState::Pending);
    assert_eq!(game.score_state().judged_count(), 0);
}

#[test]
fn consecutive_cools_score_615() {
    let mut game = GameState::new(chart(&[(1.0, Lane::Key1), (1.5, Lane::Key4)]), &config());
    game.tick_at(0.0);
    game.enqueue_input(tap(Lane::Key1, 1.0));
    game.tick_at(1.0);
    game.enqueue_input(tap(Lane::Key4, 1.5));
    game.tick_at(1.5);
    assert_eq!(game.score_state().score, 615);
    assert_eq!(game.score_state().combo, 2);
}

#[test]
fn automatic_miss_resets_combo() {
    let mut game = GameState::new(
        chart(&[(1.0, Lane::Key1), (1.5, Lane::Key2), (2.0, Lane::Key3)]),
        &config(),
    );
    game.tick_at(0.0);
    game.enqueue_input(tap(Lane::Key1, 1.0));
    game.enqueue_input(tap(Lane::Key2, 1.5));
    game.tick_at(1.5);
    assert_eq!(game.score_state().combo, 2);

    let report = game.tick_at(2.39);
    assert_eq!(report.judgments.len(), 1);
    assert!(report.judgments[0].is_automatic());
    assert_eq!(report.judgments[0].label, JudgeLabel::Miss);
    assert_eq!(game.score_state().combo, 0);
    assert_eq!(game.score_state().max_combo, 2);
}

#[test]
fn cap_holds_back_notes_until_room_frees() {
    let notes: Vec<(f64, Lane)> = (0..10)
        .map(|i| (1.0 + i as f64 * 0.01, Lane::from_index(i % 4).unwrap()))
        .collect();
    let mut game = GameState::new(chart(&notes), &config());

    let report = game.tick_at(0.0);
    assert_eq!(report.activated, 4);
    assert_eq!(game.pending_count(), 4);
    assert_eq!(game.tick_at(0.5).activated, 0);

    let mut t = 0.5;
    while !game.is_finished() {
        t += 0.01;
        game.tick_at(t);
        assert!(game.pending_count() <= 4);
        assert!(t < 10.0, "session never finished");
    }
    assert_eq!(game.score_state().miss_count, 10);
}

#[test]
fn listeners_see_every_judgment() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let mut game = GameState::new(chart(&[(1.0, Lane::Key1), (1.2, Lane::Key2)]), &config());
    game.on_judgment(move |j| sink.lock().unwrap().push((j.note.id, j.label)));
    game.tick_at(0.0);
    game.enqueue_input(tap(Lane::Key2, 1.25));
    game.tick_at(1.25);
    game.tick_at(2.0);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![(1, JudgeLabel::Cool), (0, JudgeLabel::Miss)]
    );
}

#[test]
fn judged_notes_fade_out() {
    let mut game = GameState::new(chart(&[(1.0, Lane::Key1), (1.0, Lane::Key2)]), &config());
    game.tick_at(0.0);
    game.enqueue_input(tap(Lane::Key1, 1.0));
    game.tick_at(1.0);
    // Key2 note is missed automatically at 1.39.
    game.tick_at(1.39);
    assert_eq!(game.active_notes().len(), 2);

    let report = game.tick_at(1.41);
    assert_eq!(report.pruned, 1);
    assert_eq!(game.active_notes()[0].state, NoteState::Missed);

    assert_eq!(game.tick_at(1.95).pruned, 0);
    assert_eq!(game.tick_at(2.0).pruned, 1);
    assert!(game.is_finished());
}

#[test]
fn keys_map_through_bindings() {
    let mut game = GameState::new(chart(&[(1.0, Lane::Key2)]), &config());
    game.tick_at(0.0);
    assert!(!game.press_key('x', 1.0));
    assert!(game.press_key('A', 1.0));
    let report = game.tick_at(1.0);
    assert_eq!(report.judgments.len(), 1);
    assert_eq!(report.judgments[0].note.lane, Lane::Key2);
}

#[test]
fn pointer_tap_on_target() {
    let mut game = GameState::new(chart(&[(1.0, Lane::Key3)]), &config());
    game.tick_at(0.0);
    let target = game.active_notes()[0].target;
    game.enqueue_input(InputEvent::Pointer {
        x: target.x + 1.0,
        y: target.y,
        at: 1.02,
    });
    let report = game.tick_at(1.02);
    assert_eq!(report.judgments[0].label, JudgeLabel::Cool);

    // A far-away tap reaches nothing.
    let mut game = GameState::new(chart(&[(1.0, Lane::Key3)]), &config());
    game.tick_at(0.0);
    let target = game.active_notes()[0].target;
    let far = Position::new(target.x + game.note_radius() * 2.0, target.y);
    game.enqueue_input(InputEvent::Pointer {
        x: far.x,
        y: far.y,
        at: 1.0,
    });
    assert!(game.tick_at(1.0).judgments.is_empty());
}

#[test]
fn drawable_notes_follow_approach_progress() {
    let mut game = GameState::new(chart(&[(7.0, Lane::Key1)]), &config());
    game.tick_at(0.0);
    assert_eq!(game.active_notes().len(), 1);
    assert_eq!(game.drawable_notes().count(), 0);
    game.tick_at(4.5);
    assert_eq!(game.drawable_notes().count(), 1);
}

#[test]
fn approach_grows_with_density() {
    let notes: Vec<(f64, Lane)> = (0..4).map(|i| (5.0 + i as f64, Lane::Key1)).collect();
    let mut game = GameState::new(chart(&notes), &config());
    let base = game.approach();
    game.tick_at(0.0);
    // First tick smooths on the count before activation.
    assert_eq!(game.approach(), base);
    game.tick_at(0.1);
    assert!(game.approach() > base);
}

#[test]
fn hud_label_visibility() {
    let mut game = GameState::new(chart(&[(1.0, Lane::Key1)]), &config());
    game.tick_at(0.0);
    game.enqueue_input(tap(Lane::Key1, 1.0));
    game.tick_at(1.0);
    assert_eq!(game.last_judgment_visible(1.3), Some(JudgeLabel::Cool));
    assert_eq!(game.last_judgment_visible(1.6), None);
}

#[test]
fn reset_starts_over() {
    let mut game = GameState::new(chart(&[(1.0, Lane::Key1)]), &config());
    game.tick_at(0.0);
    game.enqueue_input(tap(Lane::Key1, 1.0));
    game.tick_at(1.0);
    game.reset();
    assert!(game.active_notes().is_empty());
    assert_eq!(game.score_state().score, 0);
    assert_eq!(game.tick_at(0.0).activated, 1);
}

#[test]
fn clock_going_backwards_is_held() {
    let mut game = GameState::new(chart(&[(1.0, Lane::Key1)]), &config());
    game.tick_at(2.0);
    assert_eq!(game.tick_at(1.0).now, 2.0);
}

#[test]
fn non_finite_tap_times_are_dropped() {
    let mut game = GameState::new(chart(&[(0.05, Lane::Key1)]), &config());
    game.tick_at(0.0);
    game.enqueue_input(tap(Lane::Key1, f64::NAN));
    game.enqueue_input(tap(Lane::Key1, f64::INFINITY));
    game.enqueue_input(InputEvent::Pointer {
        x: 640.0,
        y: 360.0,
        at: f64::NEG_INFINITY,
    });
    let report = game.tick_at(0.01);
    assert!(report.judgments.is_empty());
    assert_eq!(game.active_notes()[0].state, NoteState::Pending);

    game.enqueue_input(tap(Lane::Key1, 0.05));
    let report = game.tick_at(0.05);
    assert_eq!(report.judgments.len(), 1);
    assert_eq!(report.judgments[0].label, JudgeLabel::Cool);
}

fn lane_strategy() -> impl Strategy<Value = Lane> {
    (0usize..4).prop_map(|i| Lane::from_index(i).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn cap_and_single_transition_hold(
        gaps in prop::collection::vec((0.0f64..0.6, lane_strategy()), 1..40),
        taps in prop::collection::vec((0.0f64..20.0, lane_strategy()), 0..60),
    ) {
        let mut t = 0.5;
        let notes: Vec<(f64, Lane)> = gaps.iter().map(|&(g, lane)| { t += g; (t, lane) }).collect();
        let mut taps = taps;
        taps.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut game = GameState::new(chart(&notes), &config());
        let mut judged = vec![0u32; notes.len()];
        let mut pending_taps = taps.into_iter().peekable();
        let mut now = 0.0;
        for _ in 0..3000 {
            while let Some(&(at, lane)) = pending_taps.peek() {
                if at > now {
                    break;
                }
                game.enqueue_input(tap(lane, at));
                pending_taps.next();
            }
            let report = game.tick_at(now);
            for j in &report.judgments {
                judged[j.note.id] += 1;
            }
            prop_assert!(game.pending_count() <= 4);
            if game.is_finished() {
                break;
            }
            now += 1.0 / 60.0;
        }
        prop_assert!(game.is_finished());
        prop_assert!(judged.iter().all(|&n| n == 1), "{judged:?}");
        prop_assert_eq!(game.score_state().judged_count() as usize, notes.len());
    }
}
