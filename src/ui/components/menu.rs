use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::engine::coach::Recommendation;
use crate::ui::components::stats_dashboard::coach_summary;
use crate::ui::theme::Theme;

pub struct MenuItem {
    pub key: String,
    pub label: String,
    pub description: String,
}

pub struct Menu<'a> {
    pub items: Vec<MenuItem>,
    pub selected: usize,
    /// Coach line under the title; refreshed whenever the menu is entered.
    pub recommendation: Option<Recommendation>,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            items: vec![
                MenuItem {
                    key: "1".to_string(),
                    label: t!("menu.drill.label").to_string(),
                    description: t!("menu.drill.description").to_string(),
                },
                MenuItem {
                    key: "2".to_string(),
                    label: t!("menu.sprint.label").to_string(),
                    description: t!("menu.sprint.description").to_string(),
                },
                MenuItem {
                    key: "3".to_string(),
                    label: t!("menu.mixed.label").to_string(),
                    description: t!("menu.mixed.description").to_string(),
                },
                MenuItem {
                    key: "4".to_string(),
                    label: t!("menu.levels.label").to_string(),
                    description: t!("menu.levels.description").to_string(),
                },
                MenuItem {
                    key: "s".to_string(),
                    label: t!("menu.stats.label").to_string(),
                    description: t!("menu.stats.description").to_string(),
                },
                MenuItem {
                    key: "c".to_string(),
                    label: t!("menu.settings.label").to_string(),
                    description: t!("menu.settings.description").to_string(),
                },
            ],
            selected: 0,
            recommendation: None,
            theme,
        }
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "mathdr",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                t!("app.subtitle").to_string(),
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
        ];

        let title = Paragraph::new(title_lines).alignment(Alignment::Center);
        title.render(layout[0], buf);

        if let Some(rec) = &self.recommendation {
            let coach = Paragraph::new(Line::from(vec![
                Span::styled(
                    format!("{}: ", t!("coach.title")),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(coach_summary(rec), Style::default().fg(colors.muted())),
            ]))
            .alignment(Alignment::Center);
            coach.render(layout[1], buf);
        }

        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.items
                    .iter()
                    .map(|_| Constraint::Length(3))
                    .collect::<Vec<_>>(),
            )
            .split(layout[2]);

        for (i, item) in self.items.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };

            let label_text =
                format!(" {indicator} [{key}] {label}", key = item.key, label = item.label);
            let desc_text = format!("     {}", item.description);

            let lines = vec![
                Line::from(Span::styled(
                    &*label_text,
                    Style::default()
                        .fg(if is_selected {
                            colors.accent()
                        } else {
                            colors.fg()
                        })
                        .add_modifier(if is_selected {
                            Modifier::BOLD
                        } else {
                            Modifier::empty()
                        }),
                )),
                Line::from(Span::styled(
                    &*desc_text,
                    Style::default().fg(colors.muted()),
                )),
            ];

            let p = Paragraph::new(lines);
            if i < menu_layout.len() {
                p.render(menu_layout[i], buf);
            }
        }
    }
}
