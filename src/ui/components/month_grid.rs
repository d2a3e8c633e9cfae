use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Widget;

use crate::model::dates::{month_title, month_weeks};
use crate::ui::theme::Theme;
use crate::view::month::cell_label;

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Title, weekday header and one line per week of the selected month.
pub struct MonthGrid<'a> {
    pub selected: NaiveDate,
    pub today: NaiveDate,
    pub counts: &'a HashMap<NaiveDate, usize>,
    pub grid_focused: bool,
    pub theme: &'a Theme,
}

impl MonthGrid<'_> {
    /// Lines the grid needs for `selected`'s month.
    pub fn height_for(selected: NaiveDate) -> u16 {
        2 + month_weeks(selected).len() as u16
    }
}

impl Widget for &MonthGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width < 7 {
            return;
        }
        let colors = &self.theme.colors;
        let cell_width = area.width / 7;

        let title = month_title(self.selected);
        let title_x = area.x + area.width.saturating_sub(title.len() as u16) / 2;
        buf.set_stringn(
            title_x,
            area.y,
            &title,
            area.width as usize,
            Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
        );
        if area.height < 2 {
            return;
        }

        let header_style = Style::default().fg(colors.muted());
        for (col, name) in WEEKDAYS.iter().enumerate() {
            let x = area.x + col as u16 * cell_width;
            buf.set_stringn(x, area.y + 1, name, cell_width as usize, header_style);
        }

        let bottom = area.y + area.height;
        for (row, week) in month_weeks(self.selected).iter().enumerate() {
            let y = area.y + 2 + row as u16;
            if y >= bottom {
                break;
            }
            for (col, day) in week.iter().enumerate() {
                let x = area.x + col as u16 * cell_width;
                let count = self.counts.get(day).copied().unwrap_or(0);
                let label = cell_label(*day, count, cell_width.saturating_sub(1) as usize);

                let mut style = Style::default().fg(colors.fg());
                if day.month() != self.selected.month() {
                    style = style.fg(colors.muted()).add_modifier(Modifier::DIM);
                } else if count > 0 {
                    style = style.fg(colors.accent());
                }
                if *day == self.today {
                    style = style.fg(colors.today()).add_modifier(Modifier::BOLD);
                }
                if *day == self.selected {
                    style = if self.grid_focused {
                        style.add_modifier(Modifier::REVERSED)
                    } else {
                        style.add_modifier(Modifier::UNDERLINED)
                    };
                }
                buf.set_stringn(x, y, label, cell_width.saturating_sub(1) as usize, style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_grid_shows_title_weekdays_and_counts() {
        let theme = Theme::default();
        let mut counts = HashMap::new();
        counts.insert(d(2026, 6, 1), 2);
        let grid = MonthGrid {
            selected: d(2026, 6, 1),
            today: d(2026, 6, 10),
            counts: &counts,
            grid_focused: true,
            theme: &theme,
        };
        let area = Rect::new(0, 0, 70, MonthGrid::height_for(d(2026, 6, 1)));
        let mut buf = Buffer::empty(area);
        (&grid).render(area, &mut buf);

        let line = |y: u16| -> String { (0..70).map(|x| buf[(x, y)].symbol().to_string()).collect() };
        assert!(line(0).contains("June 2026"));
        assert!(line(1).starts_with("Mon"));
        // 2026-06-01 is a Monday, so the first week starts on it.
        assert!(line(2).starts_with(" 1 (2)"));
        assert!(buf[(0, 2)].modifier.contains(Modifier::REVERSED));
    }
}
