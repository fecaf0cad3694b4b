use std::path::PathBuf;

use chrono::Local;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rust_i18n::t;

use crate::config::Config;
use crate::engine::achievements::{AchievementBook, Badge};
use crate::engine::coach::{self, Recommendation};
use crate::engine::levels::{self, LevelBook};
use crate::session::attempt::Operation;
use crate::session::practice::{Phase, PracticeSession, SessionKind};
use crate::session::question::OperationChoice;
use crate::session::summary::SessionSummary;
use crate::stats::mastery::mastery_grid;
use crate::store::export;
use crate::store::json_store::JsonStore;
use crate::store::schema::{AchievementData, AttemptLogData, LevelProgressData, SessionLogData};
use crate::store::source::{self, DataSource};
use crate::ui::components::menu::Menu;
use crate::ui::components::stats_dashboard::TAB_COUNT;
use crate::ui::sound::Sound;
use crate::ui::theme::Theme;

pub const VALID_OPERATIONS: [&str; 5] = [
    "addition",
    "subtraction",
    "multiplication",
    "division",
    "mixed",
];

const EXPORT_JSON_NAME: &str = "mathdr_export.json";
const EXPORT_CSV_NAME: &str = "mathdr_attempts.csv";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Practice,
    SessionSummary,
    StatsDashboard,
    Levels,
    Settings,
}

pub struct App {
    pub screen: AppScreen,
    pub session: Option<PracticeSession>,
    pub last_summary: Option<SessionSummary>,
    pub new_badges: Vec<Badge>,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub attempt_log: AttemptLogData,
    pub session_log: SessionLogData,
    pub achievements: AchievementBook,
    pub data_source: DataSource,
    pub store: Option<JsonStore>,
    pub sound: Sound,
    pub should_quit: bool,
    pub settings_selected: usize,
    pub stats_tab: usize,
    pub level_book: LevelBook,
    pub level_selected: usize,
    /// Set while a ladder level is being played; cleared on free practice.
    pub active_level: Option<u32>,
    /// Outcome of the last ladder run, shown on the summary screen.
    pub level_result: Option<(u32, u8)>,
    pub confirm_clear: bool,
    pub recommendation: Option<Recommendation>,
    /// One-line export/import outcome shown in the footer until dismissed.
    pub status_message: Option<String>,
    rng: SmallRng,
}

impl App {
    pub fn new() -> Self {
        let mut config = Config::load().unwrap_or_default();
        config.validate(&VALID_OPERATIONS);
        rust_i18n::set_locale(&config.locale);

        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let menu = Menu::new(theme);

        let store = JsonStore::new().ok();

        let (attempt_log, data_source) = match &store {
            Some(s) => source::resolve_attempt_log(s),
            None => (AttemptLogData::default(), DataSource::Empty),
        };
        let session_log = store
            .as_ref()
            .map(|s| s.load_session_log())
            .unwrap_or_default();
        let achievements = AchievementBook::from_codes(
            store
                .as_ref()
                .map(|s| s.load_achievements().unlocked)
                .unwrap_or_default(),
        );
        let level_book = LevelBook::from_map(
            store
                .as_ref()
                .map(|s| s.load_level_progress().stars)
                .unwrap_or_default(),
        );

        let sound = Sound::new(config.sound_enabled);

        let mut app = Self {
            screen: AppScreen::Menu,
            session: None,
            last_summary: None,
            new_badges: Vec::new(),
            menu,
            theme,
            config,
            attempt_log,
            session_log,
            achievements,
            data_source,
            store,
            sound,
            should_quit: false,
            settings_selected: 0,
            stats_tab: 0,
            level_book,
            level_selected: 0,
            active_level: None,
            level_result: None,
            confirm_clear: false,
            recommendation: None,
            status_message: None,
            rng: SmallRng::from_entropy(),
        };
        app.refresh_recommendation();
        app
    }

    /// Recompute the coach's suggestion and mirror it onto the menu widget.
    fn refresh_recommendation(&mut self) {
        self.recommendation =
            coach::recommend(&mastery_grid(&self.attempt_log.attempts), &mut self.rng);
        self.menu.recommendation = self.recommendation;
    }

    fn operation_choice(&self) -> OperationChoice {
        match self.config.operation.as_str() {
            "subtraction" => OperationChoice::Fixed(Operation::Subtraction),
            "multiplication" => OperationChoice::Fixed(Operation::Multiplication),
            "division" => OperationChoice::Fixed(Operation::Division),
            "mixed" => OperationChoice::Mixed,
            _ => OperationChoice::Fixed(Operation::Addition),
        }
    }

    pub fn start_session(&mut self, kind: SessionKind) {
        let rng = SmallRng::from_rng(&mut self.rng).unwrap_or_else(|_| SmallRng::from_entropy());
        self.session = Some(PracticeSession::new(
            kind,
            self.operation_choice(),
            self.config.digits,
            self.config.question_count,
            self.config.sprint_secs,
            rng,
        ));
        self.active_level = None;
        self.level_result = None;
        self.new_badges.clear();
        self.screen = AppScreen::Practice;
    }

    /// Play one rung of the ladder. Ignored for unknown or locked levels.
    pub fn start_level(&mut self, id: u32) {
        let Some(spec) = levels::level_spec(id) else {
            return;
        };
        if !self.level_book.is_unlocked(&spec) {
            return;
        }
        let rng = SmallRng::from_rng(&mut self.rng).unwrap_or_else(|_| SmallRng::from_entropy());
        self.session = Some(PracticeSession::new(
            SessionKind::Drill,
            spec.choice,
            spec.digits,
            spec.questions,
            0,
            rng,
        ));
        self.active_level = Some(id);
        self.level_result = None;
        self.new_badges.clear();
        self.screen = AppScreen::Practice;
    }

    /// Re-drill the last session's mistakes. Available from the summary
    /// screen when there is anything to retake.
    pub fn start_retake(&mut self) {
        let Some(summary) = &self.last_summary else {
            return;
        };
        if summary.mistakes.is_empty() {
            return;
        }
        let rng = SmallRng::from_rng(&mut self.rng).unwrap_or_else(|_| SmallRng::from_entropy());
        self.session = Some(PracticeSession::retake(&summary.mistakes, rng));
        self.active_level = None;
        self.screen = AppScreen::Practice;
    }

    pub fn type_char(&mut self, ch: char) {
        if let Some(session) = &mut self.session {
            session.type_char(ch);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(session) = &mut self.session {
            session.backspace();
        }
    }

    pub fn submit_answer(&mut self) {
        let Some(session) = &mut self.session else {
            return;
        };
        session.submit();
        if session.phase == (Phase::Feedback { correct: false }) {
            self.sound.wrong_answer();
        }
    }

    /// Escape during practice: clear the typed input first; on empty input,
    /// leave the session (logging whatever was answered so far).
    pub fn cancel_or_leave_session(&mut self) {
        let Some(session) = &mut self.session else {
            return;
        };
        if !session.input.is_empty() {
            session.input.clear();
            return;
        }
        if session.asked > 0 && !session.is_retake() {
            self.finish_session();
        } else {
            self.go_to_menu();
        }
    }

    pub fn on_tick(&mut self) {
        let Some(session) = &mut self.session else {
            return;
        };
        session.on_tick();
        if session.phase == Phase::Complete {
            self.finish_session();
        }
    }

    pub fn finish_session(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        if session.is_retake() {
            // Retake rounds are never logged or summarized; fall back to the
            // original session's summary screen.
            self.screen = AppScreen::SessionSummary;
            return;
        }

        let summary = SessionSummary::from_session(&session);

        for attempt in &session.attempts {
            self.attempt_log.append(attempt.clone());
        }
        self.session_log.sessions.push(summary.clone());

        self.new_badges = self
            .achievements
            .check_session(&summary, self.attempt_log.attempts.len());

        if let Some(id) = self.active_level.take()
            && let Some(spec) = levels::level_spec(id)
        {
            let stars = levels::score_stars(&spec, &summary);
            if stars > 0 {
                self.level_book.record(id, stars);
            }
            self.level_result = Some((id, stars));
        }

        self.last_summary = Some(summary);
        self.save_data();
        // Once we have persisted our own history, the seed no longer applies.
        self.data_source = DataSource::UserFile;
        self.screen = AppScreen::SessionSummary;
    }

    fn save_data(&self) {
        if let Some(store) = &self.store {
            let _ = store.save_attempt_log(&self.attempt_log);
            let _ = store.save_session_log(&self.session_log);
            let _ = store.save_achievements(&AchievementData {
                unlocked: self.achievements.codes(),
                ..Default::default()
            });
            let _ = store.save_level_progress(&LevelProgressData {
                stars: self.level_book.to_map(),
                ..Default::default()
            });
        }
    }

    pub fn go_to_menu(&mut self) {
        self.screen = AppScreen::Menu;
        self.session = None;
        self.status_message = None;
        self.refresh_recommendation();
    }

    pub fn go_to_stats(&mut self) {
        self.stats_tab = 0;
        self.confirm_clear = false;
        self.refresh_recommendation();
        self.screen = AppScreen::StatsDashboard;
    }

    pub fn go_to_levels(&mut self) {
        self.level_selected = (self.level_book.next_level() - 1) as usize;
        self.screen = AppScreen::Levels;
    }

    pub fn go_to_settings(&mut self) {
        self.settings_selected = 0;
        self.screen = AppScreen::Settings;
    }

    pub fn next_stats_tab(&mut self) {
        self.stats_tab = (self.stats_tab + 1) % TAB_COUNT;
    }

    /// Wipe all logged history. Only reachable through the y/n confirm.
    pub fn clear_all_data(&mut self) {
        if let Some(store) = &self.store {
            let _ = store.clear_all();
        }
        self.attempt_log = AttemptLogData::default();
        self.session_log = SessionLogData::default();
        self.achievements = AchievementBook::default();
        self.level_book = LevelBook::default();
        self.level_result = None;
        self.last_summary = None;
        self.data_source = DataSource::UserFile;
        self.recommendation = None;
        self.menu.recommendation = None;
        self.confirm_clear = false;
    }

    fn export_dir() -> PathBuf {
        dirs::download_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn export_json(&mut self) {
        let Some(store) = &self.store else {
            return;
        };
        let data = store.export_all(&self.config);
        let path = Self::export_dir().join(EXPORT_JSON_NAME);
        self.status_message = Some(match export::write_json_export(&path, &data) {
            Ok(()) => t!("stats.exported", path = path.display()).to_string(),
            Err(e) => t!("stats.export_failed", error = e).to_string(),
        });
    }

    pub fn export_csv(&mut self) {
        let path = Self::export_dir().join(EXPORT_CSV_NAME);
        self.status_message =
            Some(
                match export::write_csv_export(&path, &self.attempt_log.attempts) {
                    Ok(()) => t!("stats.exported", path = path.display()).to_string(),
                    Err(e) => t!("stats.export_failed", error = e).to_string(),
                },
            );
    }

    /// Import a previously exported snapshot from the download directory,
    /// replacing all current data.
    pub fn import_json(&mut self) {
        let Some(store) = &self.store else {
            return;
        };
        let path = Self::export_dir().join(EXPORT_JSON_NAME);
        let result = export::read_json_export(&path)
            .map_err(anyhow::Error::from)
            .and_then(|data| store.import_all(&data).map(|()| data));
        match result {
            Ok(data) => {
                self.attempt_log = data.attempt_log;
                self.session_log = data.session_log;
                self.achievements = AchievementBook::from_codes(data.achievements.unlocked);
                self.level_book = LevelBook::from_map(data.levels.stars);
                self.data_source = DataSource::UserFile;
                self.status_message = Some(t!("stats.imported", path = path.display()).to_string());
            }
            Err(e) => {
                self.status_message = Some(t!("stats.import_failed", error = e).to_string());
            }
        }
    }

    pub fn today(&self) -> chrono::NaiveDate {
        Local::now().date_naive()
    }

    pub fn settings_cycle_forward(&mut self) {
        match self.settings_selected {
            0 => {
                let themes = Theme::available_themes();
                if let Some(idx) = themes.iter().position(|t| *t == self.config.theme) {
                    let next = (idx + 1) % themes.len();
                    self.config.theme = themes[next].clone();
                } else if let Some(first) = themes.first() {
                    self.config.theme = first.clone();
                }
                self.reload_theme();
            }
            1 => {
                self.config.locale = if self.config.locale == "en" {
                    "de".to_string()
                } else {
                    "en".to_string()
                };
                rust_i18n::set_locale(&self.config.locale);
                self.menu = Menu::new(self.theme);
            }
            2 => {
                self.config.sound_enabled = !self.config.sound_enabled;
                self.sound.enabled = self.config.sound_enabled;
            }
            3 => {
                self.config.question_count = (self.config.question_count + 5).min(100);
            }
            4 => {
                self.config.sprint_secs = (self.config.sprint_secs + 15).min(300);
            }
            5 => {
                let idx = VALID_OPERATIONS
                    .iter()
                    .position(|&op| op == self.config.operation)
                    .unwrap_or(0);
                self.config.operation = VALID_OPERATIONS[(idx + 1) % VALID_OPERATIONS.len()].to_string();
            }
            6 => {
                self.config.digits = if self.config.digits >= 3 {
                    1
                } else {
                    self.config.digits + 1
                };
            }
            _ => {}
        }
    }

    pub fn settings_cycle_backward(&mut self) {
        match self.settings_selected {
            0 => {
                let themes = Theme::available_themes();
                if let Some(idx) = themes.iter().position(|t| *t == self.config.theme) {
                    let next = if idx == 0 { themes.len() - 1 } else { idx - 1 };
                    self.config.theme = themes[next].clone();
                } else if let Some(first) = themes.first() {
                    self.config.theme = first.clone();
                }
                self.reload_theme();
            }
            1 | 2 => self.settings_cycle_forward(), // two-state toggles
            3 => {
                self.config.question_count = self.config.question_count.saturating_sub(5).max(5);
            }
            4 => {
                self.config.sprint_secs = self.config.sprint_secs.saturating_sub(15).max(15);
            }
            5 => {
                let idx = VALID_OPERATIONS
                    .iter()
                    .position(|&op| op == self.config.operation)
                    .unwrap_or(0);
                let prev = if idx == 0 {
                    VALID_OPERATIONS.len() - 1
                } else {
                    idx - 1
                };
                self.config.operation = VALID_OPERATIONS[prev].to_string();
            }
            6 => {
                self.config.digits = if self.config.digits <= 1 {
                    3
                } else {
                    self.config.digits - 1
                };
            }
            _ => {}
        }
    }

    fn reload_theme(&mut self) {
        if let Some(new_theme) = Theme::load(&self.config.theme) {
            let theme: &'static Theme = Box::leak(Box::new(new_theme));
            self.theme = theme;
            self.menu.theme = theme;
        }
    }

    pub fn save_config(&self) {
        let _ = self.config.save();
    }
}
