mod app;
mod config;
mod engine;
mod event;
mod session;
mod stats;
mod store;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use app::{App, AppScreen};
use event::{AppEvent, EventHandler};
use session::practice::SessionKind;
use stats::streak::{active_dates, streaks};
use ui::components::level_list::LevelList;
use ui::components::practice_area::PracticeArea;
use ui::components::progress_bar::ProgressBar;
use ui::components::session_summary::SummaryScreen;
use ui::components::stats_dashboard::StatsDashboard;
use ui::layout::{AppLayout, pack_hint_lines};

rust_i18n::i18n!("locales", fallback = "en");

#[derive(Parser)]
#[command(name = "mathdr", version, about = "Terminal mental-math trainer with adaptive coaching")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Interface language (en, de)")]
    locale: Option<String>,

    #[arg(short, long, help = "Questions per drill")]
    questions: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut app = App::new();

    if let Some(questions) = cli.questions {
        app.config.question_count = questions.clamp(5, 100);
    }
    if let Some(locale) = cli.locale {
        if locale == "en" || locale == "de" {
            rust_i18n::set_locale(&locale);
            app.config.locale = locale;
        }
    }
    if let Some(theme_name) = cli.theme {
        if let Some(theme) = ui::theme::Theme::load(&theme_name) {
            let theme: &'static ui::theme::Theme = Box::leak(Box::new(theme));
            app.theme = theme;
            app.menu.theme = theme;
        }
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Practice => handle_practice_key(app, key),
        AppScreen::SessionSummary => handle_summary_key(app, key),
        AppScreen::StatsDashboard => handle_stats_key(app, key),
        AppScreen::Levels => handle_levels_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('1') => app.start_session(SessionKind::Drill),
        KeyCode::Char('2') => app.start_session(SessionKind::Sprint),
        KeyCode::Char('3') => app.start_session(SessionKind::Mixed),
        KeyCode::Char('4') => app.go_to_levels(),
        KeyCode::Char('s') => app.go_to_stats(),
        KeyCode::Char('c') => app.go_to_settings(),
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => match app.menu.selected {
            0 => app.start_session(SessionKind::Drill),
            1 => app.start_session(SessionKind::Sprint),
            2 => app.start_session(SessionKind::Mixed),
            3 => app.go_to_levels(),
            4 => app.go_to_stats(),
            5 => app.go_to_settings(),
            _ => {}
        },
        _ => {}
    }
}

fn handle_practice_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_or_leave_session(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Enter => app.submit_answer(),
        KeyCode::Char(ch) => app.type_char(ch),
        _ => {}
    }
}

fn handle_summary_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.start_retake(),
        KeyCode::Char('s') => app.go_to_stats(),
        KeyCode::Enter | KeyCode::Char('q') | KeyCode::Esc => app.go_to_menu(),
        _ => {}
    }
}

fn handle_stats_key(app: &mut App, key: KeyEvent) {
    // Confirmation dialog takes priority
    if app.confirm_clear {
        match key.code {
            KeyCode::Char('y') => app.clear_all_data(),
            KeyCode::Char('n') | KeyCode::Esc => app.confirm_clear = false,
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Char('1') => app.stats_tab = 0,
        KeyCode::Char('2') => app.stats_tab = 1,
        KeyCode::Char('3') => app.stats_tab = 2,
        KeyCode::Char('4') => app.stats_tab = 3,
        KeyCode::Tab => app.next_stats_tab(),
        KeyCode::BackTab => {
            app.stats_tab = if app.stats_tab == 0 {
                ui::components::stats_dashboard::TAB_COUNT - 1
            } else {
                app.stats_tab - 1
            }
        }
        KeyCode::Char('x') => {
            if !app.attempt_log.attempts.is_empty() {
                app.confirm_clear = true;
            }
        }
        KeyCode::Char('e') => app.export_json(),
        KeyCode::Char('v') => app.export_csv(),
        KeyCode::Char('i') => app.import_json(),
        _ => {}
    }
}

fn handle_levels_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Up | KeyCode::Char('k') => {
            app.level_selected = app.level_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.level_selected + 1 < engine::levels::LEVEL_COUNT as usize {
                app.level_selected += 1;
            }
        }
        KeyCode::Enter => app.start_level(app.level_selected as u32 + 1),
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.save_config();
            app.go_to_menu();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.settings_selected = app.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.settings_selected < 6 {
                app.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
            app.settings_cycle_forward();
        }
        KeyCode::Left | KeyCode::Char('h') => {
            app.settings_cycle_backward();
        }
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::Practice => render_practice(frame, app),
        AppScreen::SessionSummary => render_summary(frame, app),
        AppScreen::StatsDashboard => render_stats(frame, app),
        AppScreen::Levels => render_levels(frame, app),
        AppScreen::Settings => render_settings(frame, app),
    }
}

fn render_levels(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let centered = ui::layout::centered_rect(70, 90, layout[0]);
    let list = LevelList {
        book: &app.level_book,
        selected: app.level_selected,
        theme: app.theme,
    };
    frame.render_widget(&list, centered);

    let hints = [t!("levels.footer_hints").to_string()];
    let hint_refs: Vec<&str> = hints.iter().map(|s| s.as_str()).collect();
    render_footer_hints(frame, app, &hint_refs, layout[1]);
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let streak = streaks(&active_dates(&app.attempt_log.attempts), app.today());
    let streak_text = if streak.current > 0 {
        format!(" | {}", t!("menu.header_streak", days = streak.current))
    } else {
        String::new()
    };
    let header_info = format!(
        " {}{streak_text}",
        t!(
            "menu.header_attempts",
            count = app.attempt_log.attempts.len()
        ),
    );
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " mathdr ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            &*header_info,
            Style::default().fg(colors.muted()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout[0]);

    let menu_area = ui::layout::centered_rect(50, 80, layout[1]);
    frame.render_widget(&app.menu, menu_area);

    let footer = Paragraph::new(Line::from(Span::styled(
        format!(" {}", t!("menu.footer_hints")),
        Style::default().fg(colors.muted()),
    )));
    frame.render_widget(footer, layout[2]);
}

fn render_practice(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let Some(session) = &app.session else {
        return;
    };

    let app_layout = AppLayout::new(area);

    let header_text = format!(" mathdr | {} ", session.kind.as_str());
    let header = Paragraph::new(Line::from(Span::styled(
        &*header_text,
        Style::default()
            .fg(colors.header_fg())
            .bg(colors.header_bg())
            .add_modifier(Modifier::BOLD),
    )))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, app_layout.header);

    // Retake rounds have no fixed length, so the bar is dropped there.
    let bar_height = if session.is_retake() { 0 } else { 3 };
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(bar_height)])
        .split(app_layout.main);

    frame.render_widget(PracticeArea::new(session, app.theme), main_layout[0]);

    if !session.is_retake() {
        let bar = match session.time_limit {
            Some(limit) => ProgressBar::countdown(
                &t!("practice.progress_time"),
                session.remaining_secs().unwrap_or(0),
                limit.as_secs(),
                app.theme,
            ),
            None => ProgressBar::questions(
                &t!("practice.progress_questions"),
                session.asked,
                session.target_total,
                app.theme,
            ),
        };
        frame.render_widget(bar, main_layout[1]);
    }

    if let Some(sidebar_area) = app_layout.sidebar {
        render_session_sidebar(frame, app, sidebar_area);
    }

    let hints = [
        t!("practice.hint_submit").to_string(),
        t!("practice.hint_backspace").to_string(),
        t!("practice.hint_leave").to_string(),
    ];
    let hint_refs: Vec<&str> = hints.iter().map(|s| s.as_str()).collect();
    render_footer_hints(frame, app, &hint_refs, app_layout.footer);
}

fn render_session_sidebar(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let Some(session) = &app.session else {
        return;
    };

    let block = Block::bordered()
        .title(format!(" {} ", t!("practice.sidebar_title")))
        .border_style(Style::default().fg(colors.border()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}: {:.1}%", t!("summary.accuracy"), session.accuracy()),
            Style::default().fg(colors.fg()),
        )),
        Line::from(Span::styled(
            format!("  {}: {}", t!("summary.best_run"), session.best_run),
            Style::default().fg(colors.fg()),
        )),
        Line::from(Span::styled(
            format!(
                "  {}: {:.0}s",
                t!("practice.sidebar_elapsed"),
                session.elapsed_secs()
            ),
            Style::default().fg(colors.muted()),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_summary(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    let Some(summary) = &app.last_summary else {
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let centered = ui::layout::centered_rect(60, 80, layout[0]);
    frame.render_widget(
        SummaryScreen::new(summary, &app.new_badges, app.level_result, app.theme),
        centered,
    );

    let mut hints = vec![
        t!("summary.hint_menu").to_string(),
        t!("summary.hint_stats").to_string(),
    ];
    if !summary.mistakes.is_empty() {
        hints.push(t!("summary.hint_retake").to_string());
    }
    let hint_refs: Vec<&str> = hints.iter().map(|s| s.as_str()).collect();
    render_footer_hints(frame, app, &hint_refs, layout[1]);
}

fn render_stats(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let (dash_area, status_area) = if app.status_message.is_some() {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);
        (layout[0], Some(layout[1]))
    } else {
        (area, None)
    };

    let dashboard = StatsDashboard {
        attempts: &app.attempt_log.attempts,
        today: app.today(),
        active_tab: app.stats_tab,
        confirm_clear: app.confirm_clear,
        source: app.data_source,
        recommendation: app.recommendation.as_ref(),
        achievements: &app.achievements,
        theme: app.theme,
    };
    frame.render_widget(dashboard, dash_area);

    if let (Some(status_area), Some(message)) = (status_area, &app.status_message) {
        let status = Paragraph::new(Line::from(Span::styled(
            format!("  {message}"),
            Style::default().fg(colors.accent()),
        )));
        frame.render_widget(status, status_area);
    }
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let centered = ui::layout::centered_rect(60, 90, area);

    let block = Block::bordered()
        .title(format!(" {} ", t!("settings.title")))
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let on_off = |enabled: bool| {
        if enabled {
            t!("common.on").to_string()
        } else {
            t!("common.off").to_string()
        }
    };

    let fields: Vec<(String, String)> = vec![
        (t!("settings.theme").to_string(), app.config.theme.clone()),
        (t!("settings.locale").to_string(), app.config.locale.clone()),
        (
            t!("settings.sound").to_string(),
            on_off(app.config.sound_enabled),
        ),
        (
            t!("settings.question_count").to_string(),
            format!("{}", app.config.question_count),
        ),
        (
            t!("settings.sprint_secs").to_string(),
            format!("{}s", app.config.sprint_secs),
        ),
        (
            t!("settings.operation").to_string(),
            app.config.operation.clone(),
        ),
        (
            t!("settings.digits").to_string(),
            format!("{}", app.config.digits),
        ),
    ];

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(fields.len() as u16 * 3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(inner);

    let header = Paragraph::new(Line::from(Span::styled(
        format!("  {}", t!("settings.help")),
        Style::default().fg(colors.muted()),
    )));
    header.render(layout[0], frame.buffer_mut());

    let field_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            fields
                .iter()
                .map(|_| Constraint::Length(3))
                .collect::<Vec<_>>(),
        )
        .split(layout[1]);

    for (i, (label, value)) in fields.iter().enumerate() {
        let is_selected = i == app.settings_selected;
        let indicator = if is_selected { " > " } else { "   " };

        let label_text = format!("{indicator}{label}:");
        let value_text = format!("  < {value} >");

        let label_style = Style::default()
            .fg(if is_selected {
                colors.accent()
            } else {
                colors.fg()
            })
            .add_modifier(if is_selected {
                Modifier::BOLD
            } else {
                Modifier::empty()
            });

        let value_style = Style::default().fg(if is_selected {
            colors.warning()
        } else {
            colors.muted()
        });

        let lines = vec![
            Line::from(Span::styled(label_text, label_style)),
            Line::from(Span::styled(value_text, value_style)),
        ];
        Paragraph::new(lines).render(field_layout[i], frame.buffer_mut());
    }

    let footer = Paragraph::new(Line::from(Span::styled(
        format!("  {}", t!("settings.footer_hints")),
        Style::default().fg(colors.accent()),
    )));
    footer.render(layout[3], frame.buffer_mut());
}

fn render_footer_hints(
    frame: &mut ratatui::Frame,
    app: &App,
    hints: &[&str],
    area: ratatui::layout::Rect,
) {
    let colors = &app.theme.colors;
    let lines: Vec<Line> = pack_hint_lines(hints, area.width as usize)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.muted()))))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}
