use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::engine::achievements::Badge;
use crate::session::summary::SessionSummary;
use crate::ui::theme::Theme;

pub struct SummaryScreen<'a> {
    pub summary: &'a SessionSummary,
    pub new_badges: &'a [Badge],
    /// Level id and earned stars when the session was a ladder run; 0 stars
    /// means the level was failed.
    pub level_result: Option<(u32, u8)>,
    pub theme: &'a Theme,
}

impl<'a> SummaryScreen<'a> {
    pub fn new(
        summary: &'a SessionSummary,
        new_badges: &'a [Badge],
        level_result: Option<(u32, u8)>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            summary,
            new_badges,
            level_result,
            theme,
        }
    }
}

impl Widget for SummaryScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let summary = self.summary;

        let block = Block::bordered()
            .title(format!(" {} ", t!("summary.title")))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let badge_rows = if self.new_badges.is_empty() {
            0
        } else {
            self.new_badges.len() as u16 + 1
        };
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),          // headline numbers
                Constraint::Length(badge_rows), // new achievements
                Constraint::Min(3),             // mistakes
            ])
            .split(inner);

        let acc_color = if summary.accuracy >= 90.0 {
            colors.success()
        } else if summary.accuracy >= 70.0 {
            colors.warning()
        } else {
            colors.error()
        };

        let mut headline = vec![
            Line::from(vec![
                Span::styled(
                    format!("  {} {} ", summary.mode, summary.operation),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("· {}/{}", summary.correct, summary.total),
                    Style::default().fg(colors.fg()),
                ),
            ]),
            Line::from(vec![
                Span::styled(
                    format!("  {}: ", t!("summary.accuracy")),
                    Style::default().fg(colors.fg()),
                ),
                Span::styled(
                    format!("{:.1}%", summary.accuracy),
                    Style::default().fg(acc_color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("    {}: ", t!("summary.avg_speed")),
                    Style::default().fg(colors.fg()),
                ),
                Span::styled(
                    format!("{:.2}s", summary.avg_speed),
                    Style::default().fg(colors.accent()),
                ),
                Span::styled(
                    format!("    {}: ", t!("summary.best_run")),
                    Style::default().fg(colors.fg()),
                ),
                Span::styled(
                    format!("{}", summary.best_run),
                    Style::default().fg(colors.warning()),
                ),
            ]),
            Line::from(Span::styled(
                format!(
                    "  {}: {:.0}s",
                    t!("summary.total_time"),
                    summary.total_time
                ),
                Style::default().fg(colors.muted()),
            )),
        ];
        if let Some((id, stars)) = self.level_result {
            let line = if stars > 0 {
                Line::from(Span::styled(
                    format!(
                        "  {} {}",
                        t!("levels.passed", id = id),
                        "\u{2605}".repeat(stars as usize)
                    ),
                    Style::default()
                        .fg(colors.success())
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(
                    format!("  {}", t!("levels.failed", id = id)),
                    Style::default().fg(colors.error()),
                ))
            };
            headline.push(line);
        }
        Paragraph::new(headline).render(layout[0], buf);

        if !self.new_badges.is_empty() {
            let mut lines = Vec::with_capacity(self.new_badges.len());
            for badge in self.new_badges {
                let code = badge.code();
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  ★ {} ", t!(format!("achievements.{code}.name"))),
                        Style::default()
                            .fg(colors.warning())
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        t!(format!("achievements.{code}.description")).to_string(),
                        Style::default().fg(colors.muted()),
                    ),
                ]));
            }
            Paragraph::new(lines).render(layout[1], buf);
        }

        let mistakes_block = Block::bordered()
            .title(format!(" {} ", t!("summary.mistakes")))
            .border_style(Style::default().fg(colors.border()));
        let mistakes_inner = mistakes_block.inner(layout[2]);
        mistakes_block.render(layout[2], buf);

        if summary.mistakes.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                format!("  {}", t!("summary.no_mistakes")),
                Style::default().fg(colors.success()),
            )))
            .render(mistakes_inner, buf);
        } else {
            let lines: Vec<Line> = summary
                .mistakes
                .iter()
                .take(mistakes_inner.height as usize)
                .map(|m| {
                    Line::from(vec![
                        Span::styled(
                            format!("  {} = {}", m.question_text, m.correct_answer),
                            Style::default().fg(colors.fg()),
                        ),
                        Span::styled(
                            format!("   ({} {})", t!("summary.you_answered"), m.user_answer),
                            Style::default().fg(colors.answer_incorrect()),
                        ),
                    ])
                })
                .collect();
            Paragraph::new(lines).render(mistakes_inner, buf);
        }
    }
}
