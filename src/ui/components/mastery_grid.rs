use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Widget};
use rust_i18n::t;

use crate::stats::mastery::{DIGIT_TIERS, MasteryCell, MasteryLevel};
use crate::ui::theme::{Theme, ThemeColors};

/// Operation × digit-tier table of mastery levels. Expects the cells in
/// operation-major order, one per (operation, tier) pair.
pub struct MasteryGrid<'a> {
    pub cells: &'a [MasteryCell],
    pub theme: &'a Theme,
}

impl<'a> MasteryGrid<'a> {
    pub fn new(cells: &'a [MasteryCell], theme: &'a Theme) -> Self {
        Self { cells, theme }
    }
}

const OP_COL_WIDTH: u16 = 16;
const CELL_WIDTH: u16 = 22;

impl Widget for MasteryGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("stats.mastery_title")))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 6 || inner.width < OP_COL_WIDTH + CELL_WIDTH {
            return;
        }

        // Column headers: digit tiers
        for (col, digits) in DIGIT_TIERS.iter().enumerate() {
            let x = inner.x + OP_COL_WIDTH + col as u16 * CELL_WIDTH;
            if x + CELL_WIDTH > inner.x + inner.width {
                break;
            }
            buf.set_string(
                x,
                inner.y,
                t!("stats.digit_header", digits = digits).to_string(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            );
        }

        let tier_count = DIGIT_TIERS.len();
        for (row, chunk) in self.cells.chunks(tier_count).enumerate() {
            let y = inner.y + 2 + row as u16 * 2;
            if y >= inner.y + inner.height {
                break;
            }

            let Some(first) = chunk.first() else { continue };
            buf.set_string(
                inner.x + 1,
                y,
                first.operation.as_str(),
                Style::default().fg(colors.fg()),
            );

            for (col, cell) in chunk.iter().enumerate() {
                let x = inner.x + OP_COL_WIDTH + col as u16 * CELL_WIDTH;
                if x + CELL_WIDTH > inner.x + inner.width {
                    break;
                }
                let color = level_color(cell.level, colors);
                let label = if cell.count == 0 {
                    format!("{:<10} —", cell.level.as_str())
                } else {
                    format!(
                        "{:<10} {:>3.0}% {:>4.1}s",
                        cell.level.as_str(),
                        cell.accuracy,
                        cell.avg_speed
                    )
                };
                buf.set_string(x, y, &label, Style::default().fg(color));
            }
        }
    }
}

pub fn level_color(level: MasteryLevel, colors: &ThemeColors) -> Color {
    match level {
        MasteryLevel::Novice => colors.muted(),
        MasteryLevel::Apprentice => colors.warning(),
        MasteryLevel::Pro => colors.accent(),
        MasteryLevel::Master => colors.success(),
    }
}
