//! End-to-end flow: run a practice session, persist it, read it back, and
//! round-trip the whole store through export/import.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tempfile::TempDir;

use mathdr::config::Config;
use mathdr::engine::achievements::{AchievementBook, Badge};
use mathdr::engine::levels::{self, LevelBook};
use mathdr::session::attempt::Operation;
use mathdr::session::practice::{Phase, PracticeSession, SessionKind};
use mathdr::session::question::OperationChoice;
use mathdr::session::summary::SessionSummary;
use mathdr::store::json_store::JsonStore;
use mathdr::store::schema::{AchievementData, AttemptLogData, LevelProgressData, SessionLogData};
use mathdr::store::source::{DataSource, resolve_attempt_log};

fn test_store() -> (TempDir, JsonStore) {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    (dir, store)
}

fn answer(session: &mut PracticeSession, value: i64) {
    for ch in value.to_string().chars() {
        session.type_char(ch);
    }
    session.submit();
    session.advance();
}

/// Run a 20-question addition drill with the given number of correct answers,
/// mistakes spread through the session.
fn run_drill(correct_count: usize) -> PracticeSession {
    let mut session = PracticeSession::new(
        SessionKind::Drill,
        OperationChoice::Fixed(Operation::Addition),
        1,
        20,
        60,
        SmallRng::seed_from_u64(3),
    );
    for i in 0..20 {
        let expected = session.expected_answer().unwrap();
        if i < correct_count {
            answer(&mut session, expected);
        } else {
            answer(&mut session, expected + 1);
        }
    }
    session
}

#[test]
fn drill_session_completes_with_expected_summary() {
    let session = run_drill(15);
    assert_eq!(session.phase, Phase::Complete);

    let summary = SessionSummary::from_session(&session);
    assert_eq!(summary.total, 20);
    assert_eq!(summary.correct, 15);
    assert!((summary.accuracy - 75.0).abs() < f64::EPSILON);
    assert_eq!(summary.mistakes.len(), 5);
    assert_eq!(summary.mode, "Drill");
    assert_eq!(summary.operation, "Addition");
    assert_eq!(summary.best_run, 15);
}

#[test]
fn session_attempts_persist_and_reload_with_ids() {
    let (_dir, store) = test_store();
    let session = run_drill(18);

    let mut log = AttemptLogData::default();
    for attempt in &session.attempts {
        log.append(attempt.clone());
    }
    store.save_attempt_log(&log).unwrap();

    let (reloaded, source) = resolve_attempt_log(&store);
    assert_eq!(source, DataSource::UserFile);
    assert_eq!(reloaded.attempts.len(), 20);
    assert_eq!(reloaded.attempts[0].id, 1);
    assert_eq!(reloaded.attempts[19].id, 20);
    assert_eq!(reloaded.last_id, 20);
    // Attempts stay in the order they were answered
    let mistakes: Vec<u64> = reloaded
        .attempts
        .iter()
        .filter(|a| !a.correct)
        .map(|a| a.id)
        .collect();
    assert_eq!(mistakes.len(), 2);
    assert!(mistakes[0] < mistakes[1]);
}

#[test]
fn export_import_round_trip_preserves_everything() {
    let (_dir, store) = test_store();
    let session = run_drill(15);

    let mut log = AttemptLogData::default();
    for attempt in &session.attempts {
        log.append(attempt.clone());
    }
    store.save_attempt_log(&log).unwrap();

    let mut sessions = SessionLogData::default();
    sessions.sessions.push(SessionSummary::from_session(&session));
    store.save_session_log(&sessions).unwrap();

    let mut achievements = AchievementData::default();
    achievements.unlocked.push("first_steps".to_string());
    store.save_achievements(&achievements).unwrap();

    let mut level_book = LevelBook::default();
    level_book.record(1, 3);
    level_book.record(2, 2);
    store
        .save_level_progress(&LevelProgressData {
            stars: level_book.to_map(),
            ..Default::default()
        })
        .unwrap();

    let export = store.export_all(&Config::default());

    let (_dir2, other) = test_store();
    other.import_all(&export).unwrap();

    let (imported, source) = resolve_attempt_log(&other);
    assert_eq!(source, DataSource::UserFile);
    assert_eq!(imported.attempts, log.attempts);
    assert_eq!(imported.last_id, log.last_id);

    let imported_sessions = other.load_session_log();
    assert_eq!(imported_sessions.sessions.len(), 1);
    assert_eq!(imported_sessions.sessions[0].correct, 15);

    assert_eq!(other.load_achievements().unlocked, vec!["first_steps"]);

    let imported_levels = LevelBook::from_map(other.load_level_progress().stars);
    assert_eq!(imported_levels.total_stars(), 5);
    assert_eq!(imported_levels.stars(1), 3);
}

#[test]
fn fresh_store_falls_back_to_seed_until_first_save() {
    let (_dir, store) = test_store();

    let (seeded, source) = resolve_attempt_log(&store);
    assert_eq!(source, DataSource::Seed);
    assert!(!seeded.attempts.is_empty());

    // First real save switches the source to the user file
    let mut log = AttemptLogData::default();
    let session = run_drill(20);
    for attempt in &session.attempts {
        log.append(attempt.clone());
    }
    store.save_attempt_log(&log).unwrap();

    let (_, source) = resolve_attempt_log(&store);
    assert_eq!(source, DataSource::UserFile);

    // A deliberate clear does not bring the seed back
    store.clear_all().unwrap();
    let (cleared, source) = resolve_attempt_log(&store);
    assert_eq!(source, DataSource::UserFile);
    assert!(cleared.attempts.is_empty());
}

#[test]
fn perfect_drill_unlocks_first_steps_and_sniper() {
    let session = run_drill(20);
    let summary = SessionSummary::from_session(&session);

    let mut book = AchievementBook::default();
    let unlocked = book.check_session(&summary, summary.total);

    assert!(unlocked.contains(&Badge::FirstSteps));
    assert!(unlocked.contains(&Badge::Sniper));
    assert!(book.is_unlocked(Badge::FirstSteps));

    // Unlock-once: a second qualifying session awards nothing new
    let again = book.check_session(&summary, summary.total * 2);
    assert!(!again.contains(&Badge::FirstSteps));
    assert!(!again.contains(&Badge::Sniper));
}

#[test]
fn perfect_level_run_earns_stars_and_unlocks_the_next() {
    let (_dir, store) = test_store();

    let spec = levels::level_spec(1).unwrap();
    let mut session = PracticeSession::new(
        SessionKind::Drill,
        spec.choice,
        spec.digits,
        spec.questions,
        0,
        SmallRng::seed_from_u64(9),
    );
    for _ in 0..spec.questions {
        let expected = session.expected_answer().unwrap();
        answer(&mut session, expected);
    }
    assert_eq!(session.phase, Phase::Complete);

    let summary = SessionSummary::from_session(&session);
    let stars = levels::score_stars(&spec, &summary);
    assert_eq!(stars, 3);

    let mut book = LevelBook::default();
    assert!(!book.is_unlocked(&levels::level_spec(2).unwrap()));
    book.record(spec.id, stars);
    assert!(book.is_unlocked(&levels::level_spec(2).unwrap()));
    assert_eq!(book.next_level(), 2);

    store
        .save_level_progress(&LevelProgressData {
            stars: book.to_map(),
            ..Default::default()
        })
        .unwrap();
    let reloaded = LevelBook::from_map(store.load_level_progress().stars);
    assert_eq!(reloaded, book);
}

#[test]
fn retake_queue_drains_only_after_double_correct() {
    let session = run_drill(17);
    let summary = SessionSummary::from_session(&session);
    assert_eq!(summary.mistakes.len(), 3);

    let mut retake = PracticeSession::retake(&summary.mistakes, SmallRng::seed_from_u64(5));
    assert!(retake.is_retake());
    assert_eq!(retake.retake_remaining(), 3);

    // Two clean passes over the queue finish it
    for _ in 0..6 {
        let expected = retake.expected_answer().unwrap();
        answer(&mut retake, expected);
    }
    assert_eq!(retake.retake_remaining(), 0);
    assert_eq!(retake.phase, Phase::Complete);
    assert!(retake.attempts.is_empty(), "retake rounds are not logged");
}
