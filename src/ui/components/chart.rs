use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols;
use ratatui::widgets::{Axis, Block, Chart, Dataset, GraphType, Widget};

use crate::ui::theme::Theme;

/// Braille line chart over (day index, value) points. Used for the daily
/// accuracy and average-time trends on the stats screen.
pub struct TrendChart<'a> {
    pub title: String,
    pub y_title: String,
    pub data: &'a [(f64, f64)],
    pub color: Color,
    /// Fixed y bounds, or None to autoscale to max * 1.1.
    pub y_bounds: Option<[f64; 2]>,
    pub theme: &'a Theme,
}

impl<'a> TrendChart<'a> {
    pub fn new(
        title: String,
        y_title: String,
        data: &'a [(f64, f64)],
        color: Color,
        y_bounds: Option<[f64; 2]>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            title,
            y_title,
            data,
            color,
            y_bounds,
            theme,
        }
    }
}

impl Widget for TrendChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let title = format!(" {} ", self.title);

        if self.data.is_empty() {
            let block = Block::bordered()
                .title(title)
                .border_style(Style::default().fg(colors.border()));
            block.render(area, buf);
            return;
        }

        let max_x = self.data.last().map(|(x, _)| *x).unwrap_or(1.0).max(1.0);
        let y_bounds = self.y_bounds.unwrap_or_else(|| {
            let max_y = self
                .data
                .iter()
                .map(|(_, y)| *y)
                .fold(0.0f64, f64::max)
                .max(1.0);
            [0.0, max_y * 1.1]
        });

        let dataset = Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(self.color))
            .data(self.data);

        let chart = Chart::new(vec![dataset])
            .block(
                Block::bordered()
                    .title(title)
                    .border_style(Style::default().fg(colors.border())),
            )
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(colors.muted()))
                    .bounds([0.0, max_x]),
            )
            .y_axis(
                Axis::default()
                    .title(self.y_title)
                    .style(Style::default().fg(colors.muted()))
                    .bounds(y_bounds),
            );

        chart.render(area, buf);
    }
}
