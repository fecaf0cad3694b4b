//! Deterministic synthetic attempt-log generator. Produces importable export
//! files at a few proficiency stages so the stats screens can be exercised
//! without weeks of real practice.

use std::fs;

use chrono::{DateTime, Duration, TimeZone, Utc};
use clap::Parser;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use mathdr::config::Config;
use mathdr::session::attempt::{ALL_OPERATIONS, Attempt};
use mathdr::session::question;
use mathdr::store::schema::{
    AchievementData, AttemptLogData, EXPORT_VERSION, ExportData, LevelProgressData, SessionLogData,
};

#[derive(Parser)]
#[command(name = "generate_attempts", about = "Generate synthetic mathdr export fixtures")]
struct Cli {
    #[arg(short, long, default_value = "test-profiles", help = "Output directory")]
    out: String,

    #[arg(short, long, default_value_t = 42, help = "RNG seed")]
    seed: u64,
}

/// Fixed exported_at timestamp for deterministic output.
fn fixed_export_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap()
}

fn base_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap()
}

/// One synthetic attempt. `skill` in 0.0..=1.0 drives both accuracy and speed.
fn make_attempt(rng: &mut SmallRng, digits: u8, skill: f64, timestamp: DateTime<Utc>) -> Attempt {
    let operation = ALL_OPERATIONS[rng.gen_range(0..ALL_OPERATIONS.len())];
    let question = question::generate(operation, digits, rng);

    let p_correct = (0.60 + skill * 0.38).min(0.98);
    let correct = rng.gen_bool(p_correct);
    let base_time = match digits {
        1 => 4.0,
        2 => 7.0,
        _ => 11.0,
    };
    let time_taken = (base_time * (1.0 - skill * 0.7) + rng.gen_range(-0.5..0.8)).max(0.6);

    let user_answer = if correct {
        question.answer.to_string()
    } else {
        let deltas: [i64; 6] = [-10, -2, -1, 1, 2, 10];
        (question.answer + deltas[rng.gen_range(0..deltas.len())]).to_string()
    };

    Attempt {
        id: 0, // assigned by append
        operation: question.operation,
        digits: question.digits,
        correct,
        time_taken: (time_taken * 100.0).round() / 100.0,
        question_text: question.text(),
        user_answer,
        correct_answer: question.answer,
        timestamp: Some(timestamp),
    }
}

/// Attempts spread over `days` practice days, skill ramping from
/// `skill_start` to `skill_end`. Digit tiers widen as skill grows.
fn generate_log(
    rng: &mut SmallRng,
    days: u32,
    per_day: usize,
    skill_start: f64,
    skill_end: f64,
) -> AttemptLogData {
    let base = base_date();
    let mut log = AttemptLogData::default();

    for day in 0..days {
        let progress = if days > 1 {
            day as f64 / (days - 1) as f64
        } else {
            0.0
        };
        let skill = skill_start + (skill_end - skill_start) * progress;

        for i in 0..per_day {
            let digits = if skill > 0.7 && rng.gen_bool(0.3) {
                3
            } else if skill > 0.35 && rng.gen_bool(0.4) {
                2
            } else {
                1
            };
            let ts = base + Duration::days(day as i64) + Duration::seconds(i as i64 * 45);
            log.append(make_attempt(rng, digits, skill, ts));
        }
    }

    log
}

fn make_export(attempt_log: AttemptLogData) -> ExportData {
    ExportData {
        mathdr_export_version: EXPORT_VERSION,
        exported_at: fixed_export_timestamp(),
        config: Config::default(),
        attempt_log,
        session_log: SessionLogData::default(),
        achievements: AchievementData::default(),
        levels: LevelProgressData::default(),
    }
}

fn main() {
    let cli = Cli::parse();
    let mut rng = SmallRng::seed_from_u64(cli.seed);

    let profiles: Vec<(&str, ExportData)> = vec![
        (
            "01-first-week",
            make_export(generate_log(&mut rng, 5, 12, 0.1, 0.25)),
        ),
        (
            "02-one-month",
            make_export(generate_log(&mut rng, 24, 20, 0.2, 0.55)),
        ),
        (
            "03-seasoned",
            make_export(generate_log(&mut rng, 60, 25, 0.4, 0.85)),
        ),
        (
            "04-expert",
            make_export(generate_log(&mut rng, 120, 30, 0.6, 0.98)),
        ),
    ];

    fs::create_dir_all(&cli.out).unwrap();
    for (name, data) in &profiles {
        let json = serde_json::to_string_pretty(data).unwrap();
        let path = format!("{}/{name}.json", cli.out);
        fs::write(&path, &json).unwrap();
        println!(
            "Wrote {path} ({} attempts, {} bytes)",
            data.attempt_log.attempts.len(),
            json.len()
        );
    }

    println!("\nGenerated {} fixtures.", profiles.len());
}
