//! Integration tests for a full breathing session, from pattern selection to
//! recorded history and stats.

use breathwork_core::{
    BreathingTimer, Database, Event, MeditationSession, PatternDraft, Phase, SessionTracker,
};
use chrono::Utc;

#[test]
fn box_breathing_minute_runs_three_and_a_bit_cycles() {
    let db = Database::open_memory().unwrap();
    let mut tracker = SessionTracker::load(&db);
    let pattern = tracker.select_pattern("Box Breathing").unwrap().clone();
    assert_eq!(pattern.cycle(), 16);

    let mut timer = BreathingTimer::new(pattern, 1);
    timer.start();

    let mut ticks = 0;
    let mut entered = vec![Phase::Inhale];
    while !timer.is_completed() {
        ticks += 1;
        match timer.tick() {
            Some(Event::PhaseChanged { to, .. }) => entered.push(to),
            Some(Event::SessionCompleted { elapsed_secs, .. }) => assert_eq!(elapsed_secs, 60),
            _ => {}
        }
    }
    assert_eq!(ticks, 600);

    // 3 full cycles (12 phases) plus inhale, hold and exhale of the 4th.
    assert_eq!(entered.len(), 15);
    assert_eq!(entered[12..], [Phase::Inhale, Phase::Hold, Phase::Exhale]);
    assert_eq!(timer.phase(), Phase::Completed);

    tracker
        .record_session(&db, MeditationSession::from_timer(&timer, Utc::now()))
        .unwrap();
    let stats = SessionTracker::load(&db).stats_at(Utc::now());
    assert_eq!(stats.total_sessions, 1);
    assert_eq!(stats.total_duration.total_minutes, 1);
}

#[test]
fn custom_patterns_survive_reopen_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("breathwork.db");

    let created: Vec<_> = {
        let db = Database::open_at(&path).unwrap();
        let mut tracker = SessionTracker::load(&db);
        ["Morning", "Evening", "Night"]
            .iter()
            .enumerate()
            .map(|(i, name)| {
                tracker
                    .create_pattern(
                        &db,
                        PatternDraft {
                            name: (*name).into(),
                            inhale: 3 + i as i64,
                            hold: i as i64,
                            exhale: 6,
                            hold_empty: 0,
                        },
                    )
                    .unwrap()
            })
            .collect()
    };

    let db = Database::open_at(&path).unwrap();
    let tracker = SessionTracker::load(&db);
    assert_eq!(tracker.patterns().custom(), created.as_slice());
    let night = tracker.patterns().find("Night").unwrap();
    assert_eq!(night.cycle(), 5 + 2 + 6);
}

#[test]
fn deleting_selected_custom_pattern_falls_back_to_default() {
    let db = Database::open_memory().unwrap();
    let mut tracker = SessionTracker::load(&db);
    let draft = PatternDraft {
        name: "Mine".into(),
        ..PatternDraft::default()
    };
    let mine = tracker.create_pattern(&db, draft).unwrap();
    assert_eq!(tracker.patterns().selected().custom_id(), Some(mine.id.as_str()));

    assert!(tracker.delete_pattern(&db, &mine.id).unwrap());
    assert_eq!(tracker.patterns().selected().name, "4-7-8");
    assert!(tracker.delete_pattern(&db, &mine.id).is_err());
}

#[test]
fn early_ended_session_is_recorded_incomplete() {
    let db = Database::open_memory().unwrap();
    let mut tracker = SessionTracker::load(&db);
    let mut timer = BreathingTimer::new(tracker.patterns().selected().clone(), 10);
    timer.start();
    for _ in 0..1_800 {
        timer.tick();
    }
    timer.pause();

    tracker
        .record_session(&db, MeditationSession::from_timer(&timer, Utc::now()))
        .unwrap();
    let sessions = SessionTracker::load(&db).sessions().to_vec();
    assert_eq!(sessions.len(), 1);
    assert!(!sessions[0].completed);
    assert_eq!(sessions[0].duration_secs, 180);
    assert!(sessions[0].end_time.is_some());
}
