use std::collections::VecDeque;
use std::time::{Duration, Instant};

use chrono::Utc;
use rand::rngs::SmallRng;

use crate::session::attempt::Attempt;
use crate::session::question::{self, OperationChoice, Question};

/// How long the correct/incorrect flash stays on screen before the next
/// question. Input is ignored while it shows.
pub const FEEDBACK_MS: u64 = 700;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionKind {
    /// Fixed number of questions.
    Drill,
    /// Countdown timer, answer as many as possible.
    Sprint,
    /// Drill with a random operation per question.
    Mixed,
}

impl SessionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionKind::Drill => "Drill",
            SessionKind::Sprint => "Sprint",
            SessionKind::Mixed => "Mixed",
        }
    }

    pub fn is_timed(self) -> bool {
        matches!(self, SessionKind::Sprint)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Posed,
    Feedback { correct: bool },
    Complete,
}

/// One missed item being re-drilled. Retired after two consecutive correct
/// answers; a miss resets the run and requeues it.
#[derive(Clone, Debug)]
pub struct RetakeItem {
    pub prompt: String,
    pub answer: i64,
    pub correct_run: u8,
}

const RETAKE_REQUIRED_RUN: u8 = 2;

pub struct PracticeSession {
    pub kind: SessionKind,
    pub choice: OperationChoice,
    pub digits: u8,
    /// Question budget for Drill/Mixed; ignored for Sprint.
    pub target_total: usize,
    pub time_limit: Option<Duration>,
    pub phase: Phase,
    pub question: Question,
    pub input: String,
    pub asked: usize,
    pub correct: usize,
    /// Consecutive correct answers right now / best this session.
    pub run: usize,
    pub best_run: usize,
    pub attempts: Vec<Attempt>,
    pub mistakes: Vec<Attempt>,
    pub started_at: Instant,
    pub question_posed_at: Instant,
    pub feedback_since: Option<Instant>,
    /// Present only in retake sub-mode.
    pub retake: Option<VecDeque<RetakeItem>>,
    rng: SmallRng,
}

impl PracticeSession {
    pub fn new(
        kind: SessionKind,
        choice: OperationChoice,
        digits: u8,
        question_count: usize,
        sprint_secs: u64,
        mut rng: SmallRng,
    ) -> Self {
        let choice = if kind == SessionKind::Mixed {
            OperationChoice::Mixed
        } else {
            choice
        };
        let question = question::generate(choice.pick(&mut rng), digits, &mut rng);
        let now = Instant::now();
        Self {
            kind,
            choice,
            digits,
            target_total: question_count,
            time_limit: kind
                .is_timed()
                .then(|| Duration::from_secs(sprint_secs)),
            phase: Phase::Posed,
            question,
            input: String::new(),
            asked: 0,
            correct: 0,
            run: 0,
            best_run: 0,
            attempts: Vec::new(),
            mistakes: Vec::new(),
            started_at: now,
            question_posed_at: now,
            feedback_since: None,
            retake: None,
            rng,
        }
    }

    /// Re-drill the given mistakes. Attempts made here are not logged; the
    /// queue drains once every item has been answered correctly twice in a
    /// row.
    pub fn retake(mistakes: &[Attempt], mut rng: SmallRng) -> Self {
        let queue: VecDeque<RetakeItem> = mistakes
            .iter()
            .map(|m| RetakeItem {
                prompt: m.question_text.clone(),
                answer: m.correct_answer,
                correct_run: 0,
            })
            .collect();
        // The generated question is unused in retake mode; prompts come from
        // the queue. Still needs a placeholder for the shared struct.
        let question = question::generate(OperationChoice::Mixed.pick(&mut rng), 1, &mut rng);
        let now = Instant::now();
        Self {
            kind: SessionKind::Drill,
            choice: OperationChoice::Mixed,
            digits: 1,
            target_total: 0,
            time_limit: None,
            phase: if queue.is_empty() {
                Phase::Complete
            } else {
                Phase::Posed
            },
            question,
            input: String::new(),
            asked: 0,
            correct: 0,
            run: 0,
            best_run: 0,
            attempts: Vec::new(),
            mistakes: Vec::new(),
            started_at: now,
            question_posed_at: now,
            feedback_since: None,
            retake: Some(queue),
            rng,
        }
    }

    pub fn is_retake(&self) -> bool {
        self.retake.is_some()
    }

    pub fn prompt(&self) -> String {
        match &self.retake {
            Some(queue) => queue
                .front()
                .map(|item| item.prompt.clone())
                .unwrap_or_default(),
            None => self.question.text(),
        }
    }

    pub fn expected_answer(&self) -> Option<i64> {
        match &self.retake {
            Some(queue) => queue.front().map(|item| item.answer),
            None => Some(self.question.answer),
        }
    }

    /// Items left in the retake queue (0 outside retake mode).
    pub fn retake_remaining(&self) -> usize {
        self.retake.as_ref().map(|q| q.len()).unwrap_or(0)
    }

    pub fn type_char(&mut self, ch: char) {
        if self.phase != Phase::Posed {
            return; // input locked during feedback
        }
        if ch.is_ascii_digit() && self.input.len() < 9 {
            self.input.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if self.phase == Phase::Posed {
            self.input.pop();
        }
    }

    /// Submit the typed answer. No-op on empty input or outside the Posed
    /// phase; otherwise records the attempt and enters the feedback flash.
    pub fn submit(&mut self) {
        if self.phase != Phase::Posed || self.input.is_empty() {
            return;
        }
        let Some(expected) = self.expected_answer() else {
            return;
        };

        let parsed: Option<i64> = self.input.parse().ok();
        let correct = parsed == Some(expected);
        let time_taken = self.question_posed_at.elapsed().as_secs_f64();

        self.asked += 1;
        if correct {
            self.correct += 1;
            self.run += 1;
            self.best_run = self.best_run.max(self.run);
        } else {
            self.run = 0;
        }

        if let Some(queue) = &mut self.retake {
            if let Some(mut item) = queue.pop_front() {
                if correct {
                    item.correct_run += 1;
                    if item.correct_run < RETAKE_REQUIRED_RUN {
                        queue.push_back(item);
                    }
                } else {
                    item.correct_run = 0;
                    queue.push_back(item);
                }
            }
        } else {
            let attempt = Attempt {
                id: 0, // assigned by the store on append
                operation: self.question.operation,
                digits: self.question.digits,
                correct,
                time_taken,
                question_text: self.question.text(),
                user_answer: self.input.clone(),
                correct_answer: self.question.answer,
                timestamp: Some(Utc::now()),
            };
            if !correct {
                self.mistakes.push(attempt.clone());
            }
            self.attempts.push(attempt);
        }

        self.input.clear();
        self.phase = Phase::Feedback { correct };
        self.feedback_since = Some(Instant::now());
    }

    /// Leave the feedback flash: pose the next question or complete.
    pub fn advance(&mut self) {
        if !matches!(self.phase, Phase::Feedback { .. }) {
            return;
        }
        self.feedback_since = None;

        let done = match &self.retake {
            Some(queue) => queue.is_empty(),
            None => match self.kind {
                SessionKind::Sprint => self.time_expired(),
                _ => self.asked >= self.target_total,
            },
        };
        if done {
            self.phase = Phase::Complete;
            return;
        }

        if self.retake.is_none() {
            let operation = self.choice.pick(&mut self.rng);
            self.question = question::generate(operation, self.digits, &mut self.rng);
        }
        self.question_posed_at = Instant::now();
        self.phase = Phase::Posed;
    }

    /// Tick-driven upkeep: auto-advance the feedback flash, expire sprints.
    pub fn on_tick(&mut self) {
        if let Some(since) = self.feedback_since {
            if since.elapsed() >= Duration::from_millis(FEEDBACK_MS) {
                self.advance();
            }
        }
        if self.phase == Phase::Posed && self.kind == SessionKind::Sprint && self.time_expired() {
            self.phase = Phase::Complete;
        }
    }

    pub fn time_expired(&self) -> bool {
        self.time_limit
            .is_some_and(|limit| self.started_at.elapsed() >= limit)
    }

    pub fn remaining_secs(&self) -> Option<u64> {
        self.time_limit.map(|limit| {
            limit
                .saturating_sub(self.started_at.elapsed())
                .as_secs()
        })
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }

    pub fn accuracy(&self) -> f64 {
        if self.asked == 0 {
            0.0
        } else {
            self.correct as f64 / self.asked as f64 * 100.0
        }
    }
}
