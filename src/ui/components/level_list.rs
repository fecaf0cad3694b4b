use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Widget};
use rust_i18n::t;

use crate::engine::levels::{self, LevelBook, LevelKind, LevelSpec};
use crate::ui::theme::Theme;

/// Scrollable ladder overview. One row per level, locked rungs dimmed with
/// the star count still needed to open them.
pub struct LevelList<'a> {
    pub book: &'a LevelBook,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl LevelList<'_> {
    fn level_title(spec: &LevelSpec) -> String {
        match spec.kind {
            LevelKind::Standard => t!("levels.title_standard", id = spec.id).to_string(),
            LevelKind::SpeedRun => t!("levels.title_speed_run", id = spec.id).to_string(),
            LevelKind::MasteryChallenge => {
                t!("levels.title_mastery", id = spec.id).to_string()
            }
        }
    }

    fn star_field(stars: u8) -> String {
        let mut field = String::new();
        for i in 0..3 {
            field.push(if i < stars { '\u{2605}' } else { '\u{2606}' });
        }
        field
    }

    fn detail(spec: &LevelSpec) -> String {
        let mut detail = format!(
            "{} \u{00b7} {} \u{00b7} {}",
            spec.choice.as_str(),
            t!("stats.digit_header", digits = spec.digits),
            t!("levels.question_count", count = spec.questions),
        );
        if let Some(budget) = spec.time_budget {
            detail.push_str(&format!(
                " \u{00b7} {}",
                t!("levels.time_budget", secs = budget)
            ));
        }
        detail
    }
}

impl Widget for &LevelList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("levels.title")))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height < 3 {
            return;
        }

        let progress = t!(
            "levels.progress",
            completed = self.book.completed_levels(),
            total = levels::LEVEL_COUNT,
            stars = self.book.total_stars(),
            max = levels::LEVEL_COUNT * 3
        );
        buf.set_string(
            inner.x + 1,
            inner.y,
            progress,
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        );

        let list_top = inner.y + 2;
        let visible = (inner.height - 2) as usize;
        let total_stars = self.book.total_stars();

        // Keep the selection inside the window.
        let first = self
            .selected
            .saturating_sub(visible.saturating_sub(1))
            .min(levels::LEVEL_COUNT as usize - visible.min(levels::LEVEL_COUNT as usize));

        for row in 0..visible {
            let idx = first + row;
            let Some(spec) = levels::level_spec(idx as u32 + 1) else {
                break;
            };
            let is_selected = idx == self.selected;
            let unlocked = spec.is_unlocked(total_stars);
            let stars = self.book.stars(spec.id);

            let indicator = if is_selected { ">" } else { " " };
            let row_color = if !unlocked {
                colors.muted()
            } else if is_selected {
                colors.accent()
            } else {
                colors.fg()
            };
            let row_style = Style::default().fg(row_color).add_modifier(if is_selected {
                Modifier::BOLD
            } else {
                Modifier::empty()
            });

            let tail = if unlocked {
                LevelList::detail(&spec)
            } else {
                t!("levels.locked", stars = spec.required_stars).to_string()
            };

            let line = Line::from(vec![
                Span::styled(format!(" {indicator} "), row_style),
                Span::styled(
                    LevelList::star_field(stars),
                    Style::default().fg(if stars > 0 {
                        colors.warning()
                    } else {
                        colors.muted()
                    }),
                ),
                Span::styled(format!("  {:<24}", LevelList::level_title(&spec)), row_style),
                Span::styled(tail, Style::default().fg(colors.muted())),
            ]);
            buf.set_line(inner.x, list_top + row as u16, &line, inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_text(buf: &Buffer, area: Rect) -> String {
        let mut text = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                text.push_str(buf[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_renders_progress_and_locked_rungs() {
        let theme = Theme::default();
        let mut book = LevelBook::default();
        book.record(1, 3);

        let list = LevelList {
            book: &book,
            selected: 1,
            theme: &theme,
        };
        let area = Rect::new(0, 0, 80, 12);
        let mut buf = Buffer::empty(area);
        (&list).render(area, &mut buf);

        let text = buffer_text(&buf, area);
        assert!(text.contains("1 / 100"), "completed count shown");
        assert!(text.contains('\u{2605}'), "earned stars drawn filled");
        // Level 3 needs 4 stars, only 3 earned so far
        assert!(text.contains("needs 4"), "locked rung names its star requirement");
    }

    #[test]
    fn test_selection_scrolls_into_view() {
        let theme = Theme::default();
        let book = LevelBook::default();
        let list = LevelList {
            book: &book,
            selected: 50,
            theme: &theme,
        };
        let area = Rect::new(0, 0, 80, 10);
        let mut buf = Buffer::empty(area);
        (&list).render(area, &mut buf);

        let text = buffer_text(&buf, area);
        assert!(text.contains("51"), "selected level is visible");
    }
}
