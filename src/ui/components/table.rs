use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Widget;

use crate::table::wrap::display_width;
use crate::table::{Align, ColumnSpec};
use crate::ui::theme::Theme;
use crate::view::TableFrame;

/// Header row plus the visible rows of a laid-out table.
pub struct TableView<'a> {
    pub frame: &'a TableFrame,
    pub columns: &'a [ColumnSpec],
    pub selected: Option<usize>,
    pub focused_column: Option<usize>,
    pub theme: &'a Theme,
}

fn aligned(text: &str, width: usize, align: Align) -> String {
    let pad = width.saturating_sub(display_width(text));
    match align {
        Align::Left => text.to_string(),
        Align::Right => format!("{}{text}", " ".repeat(pad)),
        Align::Center => format!("{}{text}", " ".repeat(pad / 2)),
    }
}

impl Widget for &TableView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let colors = &self.theme.colors;
        let layout = &self.frame.layout;
        let header_style = Style::default()
            .fg(colors.header_fg())
            .bg(colors.header_bg())
            .add_modifier(Modifier::BOLD);

        buf.set_style(Rect::new(area.x, area.y, area.width, 1), header_style);
        for (idx, spec) in self.columns.iter().enumerate() {
            let (Some(width), Some(offset)) = (layout.widths.get(idx), layout.offsets.get(idx)) else {
                continue;
            };
            let style = if self.focused_column == Some(idx) {
                header_style.fg(colors.accent()).add_modifier(Modifier::UNDERLINED)
            } else {
                header_style
            };
            let text = aligned(spec.header, *width, spec.align);
            buf.set_stringn(area.x + *offset as u16, area.y, text, *width, style);
        }

        let bottom = area.y + area.height;
        let mut y = area.y + 1;
        for (row_idx, row) in self.frame.visible_rows() {
            if y >= bottom {
                break;
            }
            let is_selected = self.selected == Some(row_idx);
            let style = if is_selected {
                Style::default()
                    .fg(colors.selection_fg())
                    .bg(colors.selection_bg())
            } else {
                Style::default().fg(colors.fg())
            };
            let lines = (row.height as u16).min(bottom - y);
            buf.set_style(Rect::new(area.x, y, area.width, lines), style);
            for line in 0..lines {
                for (idx, spec) in self.columns.iter().enumerate() {
                    let (Some(width), Some(offset)) = (layout.widths.get(idx), layout.offsets.get(idx))
                    else {
                        continue;
                    };
                    let text = row
                        .cells
                        .get(idx)
                        .and_then(|cell| cell.get(line as usize))
                        .map(String::as_str)
                        .unwrap_or("");
                    let text = aligned(text, *width, spec.align);
                    buf.set_stringn(area.x + *offset as u16, y + line, text, *width, style);
                }
            }
            y += lines;
        }
    }
}
