use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::session::practice::{Phase, PracticeSession, SessionKind};
use crate::ui::theme::Theme;

pub struct PracticeArea<'a> {
    pub session: &'a PracticeSession,
    pub theme: &'a Theme,
}

impl<'a> PracticeArea<'a> {
    pub fn new(session: &'a PracticeSession, theme: &'a Theme) -> Self {
        Self { session, theme }
    }

    fn status_line(&self) -> String {
        let session = self.session;
        if session.is_retake() {
            return t!(
                "practice.retake_remaining",
                count = session.retake_remaining()
            )
            .to_string();
        }
        match session.kind {
            SessionKind::Sprint => {
                let secs = session.remaining_secs().unwrap_or(0);
                t!(
                    "practice.sprint_status",
                    secs = secs,
                    correct = session.correct,
                    asked = session.asked
                )
                .to_string()
            }
            _ => t!(
                "practice.drill_status",
                asked = session.asked + 1,
                total = session.target_total,
                correct = session.correct
            )
            .to_string(),
        }
    }
}

impl Widget for PracticeArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let session = self.session;

        let title = if session.is_retake() {
            format!(" {} ", t!("practice.retake_title"))
        } else {
            format!(" {} ", session.kind.as_str())
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // status
                Constraint::Min(3),    // question
                Constraint::Length(2), // input
                Constraint::Length(2), // feedback / streak
            ])
            .split(inner);

        let status = Paragraph::new(Line::from(Span::styled(
            format!("  {}", self.status_line()),
            Style::default().fg(colors.muted()),
        )));
        status.render(layout[0], buf);

        // The question, centered and bold
        let question = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("{} = ?", session.prompt()),
                Style::default()
                    .fg(colors.fg())
                    .add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center);
        question.render(layout[1], buf);

        // Typed input with a block cursor
        let input_line = Line::from(vec![
            Span::styled(session.input.clone(), Style::default().fg(colors.accent())),
            Span::styled(
                " ",
                Style::default()
                    .fg(colors.input_cursor_fg())
                    .bg(colors.input_cursor_bg()),
            ),
        ]);
        Paragraph::new(input_line)
            .alignment(Alignment::Center)
            .render(layout[2], buf);

        let footer_line = match session.phase {
            Phase::Feedback { correct: true } => Line::from(Span::styled(
                t!("practice.correct").to_string(),
                Style::default()
                    .fg(colors.answer_correct())
                    .add_modifier(Modifier::BOLD),
            )),
            Phase::Feedback { correct: false } => Line::from(Span::styled(
                t!(
                    "practice.incorrect",
                    answer = session.expected_answer().unwrap_or_default()
                )
                .to_string(),
                Style::default()
                    .fg(colors.answer_incorrect())
                    .add_modifier(Modifier::BOLD),
            )),
            _ if session.run >= 3 => Line::from(Span::styled(
                t!("practice.streak", run = session.run).to_string(),
                Style::default().fg(colors.warning()),
            )),
            _ => Line::from(""),
        };
        Paragraph::new(footer_line)
            .alignment(Alignment::Center)
            .render(layout[3], buf);
    }
}
