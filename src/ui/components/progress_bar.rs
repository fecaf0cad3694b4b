use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

/// Seconds left at which a countdown switches to the warning color.
const LOW_TIME_SECS: u64 = 10;

/// Session progress line under the practice area. Drill/Mixed fill up with
/// answered questions; Sprint drains down with the clock.
pub struct ProgressBar<'a> {
    title: String,
    ratio: f64,
    value_label: String,
    low_time: bool,
    theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn questions(title: &str, answered: usize, total: usize, theme: &'a Theme) -> Self {
        let ratio = if total == 0 {
            0.0
        } else {
            answered as f64 / total as f64
        };
        Self {
            title: title.to_string(),
            ratio: ratio.clamp(0.0, 1.0),
            value_label: format!("{answered} / {total}"),
            low_time: false,
            theme,
        }
    }

    pub fn countdown(title: &str, remaining_secs: u64, total_secs: u64, theme: &'a Theme) -> Self {
        let ratio = if total_secs == 0 {
            0.0
        } else {
            remaining_secs as f64 / total_secs as f64
        };
        Self {
            title: title.to_string(),
            ratio: ratio.clamp(0.0, 1.0),
            value_label: format!("{}:{:02}", remaining_secs / 60, remaining_secs % 60),
            low_time: remaining_secs <= LOW_TIME_SECS,
            theme,
        }
    }

    #[cfg(test)]
    fn filled_cells(&self, width: u16) -> u16 {
        (self.ratio * width as f64).round() as u16
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled = (self.ratio * inner.width as f64).round() as u16;
        let fill_color = if self.low_time {
            colors.warning()
        } else {
            colors.bar_filled()
        };

        let track: String = (0..inner.width)
            .map(|x| if x < filled { '\u{2588}' } else { '\u{2591}' })
            .collect();
        buf.set_string(inner.x, inner.y, &track, Style::default().fg(fill_color));

        // Value label overlaid mid-track
        let label = format!(" {} ", self.value_label);
        let label_width = label.chars().count() as u16;
        if label_width <= inner.width {
            let label_x = inner.x + (inner.width - label_width) / 2;
            buf.set_string(
                label_x,
                inner.y,
                &label,
                Style::default().fg(colors.fg()).bg(colors.bar_empty()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, y: u16, width: u16) -> String {
        (0..width).map(|x| buf[(x, y)].symbol().to_string()).collect()
    }

    #[test]
    fn test_question_ratio_and_label() {
        let theme = Theme::default();
        let bar = ProgressBar::questions("Progress", 5, 20, &theme);
        assert_eq!(bar.value_label, "5 / 20");
        assert_eq!(bar.filled_cells(40), 10);
    }

    #[test]
    fn test_question_bar_with_zero_total_stays_empty() {
        let theme = Theme::default();
        let bar = ProgressBar::questions("Progress", 3, 0, &theme);
        assert_eq!(bar.filled_cells(40), 0);
    }

    #[test]
    fn test_countdown_drains_and_flags_low_time() {
        let theme = Theme::default();
        let half = ProgressBar::countdown("Time", 30, 60, &theme);
        assert_eq!(half.filled_cells(40), 20);
        assert_eq!(half.value_label, "0:30");
        assert!(!half.low_time);

        let nearly_out = ProgressBar::countdown("Time", 8, 60, &theme);
        assert!(nearly_out.low_time);

        let long = ProgressBar::countdown("Time", 90, 300, &theme);
        assert_eq!(long.value_label, "1:30");
    }

    #[test]
    fn test_render_overlays_label_on_track() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 30, 3);
        let mut buf = Buffer::empty(area);
        ProgressBar::questions("Progress", 7, 10, &theme).render(area, &mut buf);

        let row = row_text(&buf, 1, area.width);
        assert!(row.contains("7 / 10"));
        assert!(row.contains('\u{2588}'), "filled cells drawn");
        assert!(row.contains('\u{2591}'), "empty cells drawn");
    }
}
