use chrono::NaiveDate;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};
use rust_i18n::t;

use crate::engine::achievements::{ALL_BADGES, AchievementBook};
use crate::engine::coach::{Reason, Recommendation};
use crate::session::attempt::Attempt;
use crate::stats::aggregate::{
    self, daily_buckets, difficulty_progression, operation_breakdown, overall_stats, today_stats,
    weekly_stats,
};
use crate::stats::streak::{active_dates, streaks};
use crate::stats::velocity::{Trend, learning_velocity};
use crate::stats::weakness::{WeaknessReason, weak_spots};
use crate::store::source::DataSource;
use crate::ui::components::activity_heatmap::ActivityHeatmap;
use crate::ui::components::chart::TrendChart;
use crate::ui::components::mastery_grid::MasteryGrid;
use crate::ui::theme::Theme;

pub const TAB_COUNT: usize = 4;

pub struct StatsDashboard<'a> {
    pub attempts: &'a [Attempt],
    pub today: NaiveDate,
    pub active_tab: usize,
    pub confirm_clear: bool,
    pub source: DataSource,
    pub recommendation: Option<&'a Recommendation>,
    pub achievements: &'a AchievementBook,
    pub theme: &'a Theme,
}

impl Widget for StatsDashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("stats.title")))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.attempts.is_empty() {
            let msg = Paragraph::new(Line::from(Span::styled(
                t!("stats.empty").to_string(),
                Style::default().fg(colors.muted()),
            )));
            msg.render(inner, buf);
            return;
        }

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(10),
                Constraint::Length(2),
            ])
            .split(inner);

        let tabs = [
            format!("[1] {}", t!("stats.tab_overview")),
            format!("[2] {}", t!("stats.tab_progress")),
            format!("[3] {}", t!("stats.tab_mastery")),
            format!("[4] {}", t!("stats.tab_weak_spots")),
        ];
        let tab_spans: Vec<Span> = tabs
            .iter()
            .enumerate()
            .flat_map(|(i, label)| {
                let style = if i == self.active_tab {
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                } else {
                    Style::default().fg(colors.muted())
                };
                vec![Span::styled(format!(" {label} "), style), Span::raw("  ")]
            })
            .collect();
        Paragraph::new(Line::from(tab_spans)).render(layout[0], buf);

        // One tab at a time so each gets full breathing room.
        match self.active_tab {
            0 => self.render_overview_tab(layout[1], buf),
            1 => self.render_progress_tab(layout[1], buf),
            2 => self.render_mastery_tab(layout[1], buf),
            3 => self.render_weak_spots_tab(layout[1], buf),
            _ => {}
        }

        // Footer: hints plus where the data came from
        let source_note = match self.source {
            DataSource::UserFile => String::new(),
            DataSource::Seed => format!("  ({})", t!("stats.source_seed")),
            DataSource::Empty => format!("  ({})", t!("stats.source_empty")),
        };
        let footer = Paragraph::new(Line::from(Span::styled(
            format!("  {}{source_note}", t!("stats.footer_hints")),
            Style::default().fg(colors.accent()),
        )));
        footer.render(layout[2], buf);

        if self.confirm_clear {
            let dialog_width = 44u16;
            let dialog_height = 5u16;
            let dialog_x = area.x + area.width.saturating_sub(dialog_width) / 2;
            let dialog_y = area.y + area.height.saturating_sub(dialog_height) / 2;
            let dialog_area = Rect::new(dialog_x, dialog_y, dialog_width, dialog_height);

            Clear.render(dialog_area, buf);
            let dialog = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("  {}  ", t!("stats.confirm_clear")),
                    Style::default().fg(colors.fg()),
                )),
            ])
            .style(Style::default().bg(colors.bg()))
            .block(
                Block::bordered()
                    .title(format!(" {} ", t!("stats.confirm_title")))
                    .border_style(Style::default().fg(colors.error()))
                    .style(Style::default().bg(colors.bg())),
            );
            dialog.render(dialog_area, buf);
        }
    }
}

impl StatsDashboard<'_> {
    fn render_overview_tab(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6), // period summary
                Constraint::Length(3), // streaks + achievements
                Constraint::Min(6),    // per-operation breakdown
            ])
            .split(area);

        let today = today_stats(self.attempts, self.today);
        let weekly = weekly_stats(self.attempts, self.today);
        let overall = overall_stats(self.attempts);

        let summary_block = Block::bordered()
            .title(Line::from(Span::styled(
                format!(" {} ", t!("stats.summary_title")),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )))
            .border_style(Style::default().fg(colors.accent()));
        let summary_inner = summary_block.inner(layout[0]);
        summary_block.render(layout[0], buf);

        let period_line = |label: String, stats: &aggregate::PeriodStats| {
            Line::from(vec![
                Span::styled(format!("  {label:<9}"), Style::default().fg(colors.fg())),
                Span::styled(
                    format!("{:>5}", stats.attempts),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {:>5.1}%", stats.accuracy),
                    Style::default().fg(if stats.accuracy >= 90.0 {
                        colors.success()
                    } else if stats.accuracy >= 70.0 {
                        colors.warning()
                    } else {
                        colors.error()
                    }),
                ),
                Span::styled(
                    format!("  {:>5.2}s", stats.avg_time),
                    Style::default().fg(colors.muted()),
                ),
            ])
        };

        let header = Line::from(Span::styled(
            format!(
                "  {:<9}{:>5}  {:>6}  {:>6}",
                "",
                t!("stats.col_attempts"),
                t!("stats.col_accuracy"),
                t!("stats.col_speed")
            ),
            Style::default().fg(colors.muted()),
        ));
        let summary = vec![
            header,
            period_line(t!("stats.period_today").to_string(), &today),
            period_line(t!("stats.period_week").to_string(), &weekly.totals),
            period_line(t!("stats.period_overall").to_string(), &overall.totals),
        ];
        Paragraph::new(summary).render(summary_inner, buf);

        let streak = streaks(&active_dates(self.attempts), self.today);
        let unlocked = ALL_BADGES
            .iter()
            .filter(|b| self.achievements.is_unlocked(**b))
            .count();
        let streak_line = Line::from(vec![
            Span::styled(
                format!("  {}: ", t!("stats.streak_current")),
                Style::default().fg(colors.fg()),
            ),
            Span::styled(
                format!("{}d", streak.current),
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("    {}: ", t!("stats.streak_best")),
                Style::default().fg(colors.fg()),
            ),
            Span::styled(
                format!("{}d", streak.best),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("    {}: ", t!("stats.active_days")),
                Style::default().fg(colors.fg()),
            ),
            Span::styled(
                format!("{}", overall.unique_days),
                Style::default().fg(colors.muted()),
            ),
            Span::styled(
                format!("    {}: ", t!("stats.achievements")),
                Style::default().fg(colors.fg()),
            ),
            Span::styled(
                format!("{}/{}", unlocked, ALL_BADGES.len()),
                Style::default().fg(colors.warning()),
            ),
        ]);
        Paragraph::new(vec![Line::from(""), streak_line]).render(layout[1], buf);

        self.render_operation_breakdown(layout[2], buf);
    }

    fn render_operation_breakdown(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(Line::from(Span::styled(
                format!(" {} ", t!("stats.breakdown_title")),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )))
            .border_style(Style::default().fg(colors.accent()));
        let inner = block.inner(area);
        block.render(area, buf);

        let breakdown = operation_breakdown(self.attempts);
        let max_count = breakdown.iter().map(|s| s.count).max().unwrap_or(1);

        for (i, stats) in breakdown.iter().take(inner.height as usize).enumerate() {
            let y = inner.y + i as u16;
            let label = format!(
                " {:<14} {:>5}  {:>5.1}%  {:>5.2}s ",
                stats.operation.as_str(),
                stats.count,
                stats.accuracy,
                stats.avg_time
            );
            let label_len = label.len() as u16;
            let color = if stats.accuracy >= 90.0 {
                colors.success()
            } else if stats.accuracy >= 70.0 {
                colors.warning()
            } else {
                colors.error()
            };
            buf.set_string(inner.x, y, &label, Style::default().fg(color));

            let bar_space = inner.width.saturating_sub(label_len) as usize;
            if bar_space > 0 {
                let filled =
                    ((stats.count as f64 / max_count as f64) * bar_space as f64).round() as usize;
                let bar = "\u{2588}".repeat(filled.min(bar_space));
                buf.set_string(inner.x + label_len, y, &bar, Style::default().fg(color));
            }
        }
    }

    fn render_progress_tab(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(8),    // trend charts
                Constraint::Length(9), // heatmap
                Constraint::Length(2), // velocity line
            ])
            .split(area);

        let buckets = daily_buckets(self.attempts);
        let accuracy_data: Vec<(f64, f64)> = buckets
            .values()
            .enumerate()
            .map(|(i, b)| (i as f64, b.accuracy()))
            .collect();
        let time_data: Vec<(f64, f64)> = buckets
            .values()
            .enumerate()
            .map(|(i, b)| (i as f64, b.avg_time()))
            .collect();

        let charts = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(layout[0]);

        TrendChart::new(
            t!("stats.chart_accuracy").to_string(),
            "%".to_string(),
            &accuracy_data,
            colors.success(),
            Some([0.0, 100.0]),
            self.theme,
        )
        .render(charts[0], buf);
        TrendChart::new(
            t!("stats.chart_speed").to_string(),
            "s".to_string(),
            &time_data,
            colors.accent(),
            None,
            self.theme,
        )
        .render(charts[1], buf);

        ActivityHeatmap::new(self.attempts, self.today, self.theme).render(layout[1], buf);

        let velocity = learning_velocity(self.attempts, self.today, 30);
        let velocity_line = match velocity.trend {
            Trend::InsufficientData => Line::from(Span::styled(
                format!("  {}", t!("stats.velocity_insufficient")),
                Style::default().fg(colors.muted()),
            )),
            trend => Line::from(vec![
                Span::styled(
                    format!("  {}: ", t!("stats.velocity")),
                    Style::default().fg(colors.fg()),
                ),
                Span::styled(
                    format!("{:.1}", velocity.velocity_score),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(
                        "  ({}, {:+.1}pp, {} {:.0})",
                        t!(format!("stats.trend_{}", trend_key(trend))),
                        velocity.improvement_rate,
                        t!("stats.consistency"),
                        velocity.consistency_score
                    ),
                    Style::default().fg(colors.muted()),
                ),
            ]),
        };
        Paragraph::new(velocity_line).render(layout[2], buf);
    }

    fn render_mastery_tab(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(11),
                Constraint::Length(6),
                Constraint::Length(2),
            ])
            .split(area);

        let grid = crate::stats::mastery::mastery_grid(self.attempts);
        MasteryGrid::new(&grid, self.theme).render(layout[0], buf);

        let block = Block::bordered()
            .title(format!(" {} ", t!("stats.difficulty_title")))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(layout[1]);
        block.render(layout[1], buf);

        for (i, tier) in difficulty_progression(self.attempts)
            .iter()
            .take(inner.height as usize)
            .enumerate()
        {
            let line = format!(
                " {}  {:>5} {:>6.1}% {:>5.2}s",
                t!("stats.digit_header", digits = tier.digits),
                tier.count,
                tier.accuracy,
                tier.avg_time
            );
            buf.set_string(
                inner.x,
                inner.y + i as u16,
                &line,
                Style::default().fg(colors.fg()),
            );
        }

        if let Some(rec) = self.recommendation {
            self.render_coach_line(rec, layout[2], buf);
        }
    }

    fn render_weak_spots_tab(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(3)])
            .split(area);

        let block = Block::bordered()
            .title(format!(" {} ", t!("stats.weak_spots_title")))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(layout[0]);
        block.render(layout[0], buf);

        let spots = weak_spots(self.attempts);
        if spots.is_empty() {
            buf.set_string(
                inner.x + 1,
                inner.y,
                t!("stats.no_weak_spots").to_string(),
                Style::default().fg(colors.success()),
            );
        } else {
            for (i, spot) in spots.iter().take(inner.height as usize).enumerate() {
                let reason = match spot.reason {
                    WeaknessReason::Accuracy => t!("stats.reason_accuracy"),
                    WeaknessReason::Speed => t!("stats.reason_speed"),
                };
                let line = format!(
                    " {:<12} {:>3}× {:>3} {}  {:>5.1}%  {:>5.2}s  [{}]",
                    spot.question_text,
                    spot.count,
                    spot.misses,
                    t!("stats.misses"),
                    spot.accuracy,
                    spot.avg_time,
                    reason
                );
                let color = match spot.reason {
                    WeaknessReason::Accuracy => colors.error(),
                    WeaknessReason::Speed => colors.warning(),
                };
                buf.set_string(inner.x, inner.y + i as u16, &line, Style::default().fg(color));
            }
        }

        // Coach recommendation under the list
        if let Some(rec) = self.recommendation {
            self.render_coach_line(rec, layout[1], buf);
        }
    }

    fn render_coach_line(&self, rec: &Recommendation, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let line = Line::from(vec![
            Span::styled(
                format!("  {}: ", t!("coach.title")),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                coach_summary(rec),
                Style::default().fg(colors.fg()),
            ),
        ]);
        Paragraph::new(vec![Line::from(""), line]).render(area, buf);
    }
}

/// One-line rendering of a recommendation, shared with the menu screen.
pub fn coach_summary(rec: &Recommendation) -> String {
    let reason_text = match rec.reason {
        Reason::Explore => t!("coach.explore").to_string(),
        Reason::FixAccuracy(acc) => {
            t!("coach.fix_accuracy", accuracy = format!("{acc:.0}")).to_string()
        }
        Reason::PushSpeed(speed) => {
            t!("coach.push_speed", speed = format!("{speed:.1}")).to_string()
        }
        Reason::Maintain => t!("coach.maintain").to_string(),
    };
    format!(
        "{} · {} · {reason_text}",
        rec.operation.as_str(),
        t!("stats.digit_header", digits = rec.digits)
    )
}

fn trend_key(trend: Trend) -> &'static str {
    match trend {
        Trend::Improving => "improving",
        Trend::Stable => "stable",
        Trend::Declining => "declining",
        Trend::InsufficientData => "insufficient",
    }
}
