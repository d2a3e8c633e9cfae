use ratatui::layout::{Constraint, Layout, Rect};

use crate::table::wrap::display_width;

/// Title bar, view body and key-hint footer.
pub struct AppLayout {
    pub header: Rect,
    pub body: Rect,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect, footer_lines: u16) -> Self {
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(footer_lines),
        ])
        .areas(area);
        Self { header, body, footer }
    }
}

const HINT_INDENT: &str = " ";
const HINT_GAP: &str = "  ";

/// Fill footer lines left to right with key hints, starting a new line when
/// the next hint would run past `width`.
pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    if width == 0 {
        return lines;
    }
    let mut line: Option<String> = None;
    for hint in hints.iter().filter(|h| !h.is_empty()) {
        line = Some(match line.take() {
            Some(open) if display_width(&open) + HINT_GAP.len() + display_width(hint) <= width => {
                format!("{open}{HINT_GAP}{hint}")
            }
            Some(full) => {
                lines.push(full);
                format!("{HINT_INDENT}{hint}")
            }
            None => format!("{HINT_INDENT}{hint}"),
        });
    }
    lines.extend(line);
    lines
}

/// Popup rect covering `percent_x` x `percent_y` of `area`, grown to at least
/// `min_w` x `min_h` but never past `area`, centred.
pub fn centered_rect(percent_x: u16, percent_y: u16, min_w: u16, min_h: u16, area: Rect) -> Rect {
    let scaled = |len: u16, percent: u16| (u32::from(len) * u32::from(percent.min(100)) / 100) as u16;
    let width = scaled(area.width, percent_x).max(min_w).min(area.width);
    let height = scaled(area.height, percent_y).max(min_h).min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
