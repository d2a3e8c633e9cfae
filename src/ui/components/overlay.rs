use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::input::Overlay;
use crate::ui::help::help_lines;
use crate::ui::layout::centered_rect;
use crate::ui::theme::Theme;

/// Help, error or message popup drawn over the active view.
pub struct OverlayPopup<'a> {
    pub overlay: &'a Overlay,
    pub theme: &'a Theme,
}

impl Widget for &OverlayPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let (title, accent, lines, popup) = match self.overlay {
            Overlay::None => return,
            Overlay::Help => {
                let lines: Vec<Line> = help_lines()
                    .into_iter()
                    .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.fg()))))
                    .collect();
                (" Help ", colors.accent(), lines, centered_rect(60, 80, 56, 20, area))
            }
            Overlay::Error(message) => (
                " Error ",
                colors.error(),
                vec![Line::from(message.as_str()), Line::from(""), dismiss_hint(self.theme)],
                centered_rect(50, 20, 40, 6, area),
            ),
            Overlay::Message(message) => (
                " Notice ",
                colors.success(),
                vec![Line::from(message.as_str()), Line::from(""), dismiss_hint(self.theme)],
                centered_rect(50, 20, 40, 6, area),
            ),
        };

        Clear.render(popup, buf);
        let block = Block::bordered()
            .title(Span::styled(
                title,
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ))
            .border_style(Style::default().fg(accent))
            .style(Style::default().bg(colors.bg()).fg(colors.fg()));
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(popup, buf);
    }
}

fn dismiss_hint(theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        "Press any key to dismiss",
        Style::default().fg(theme.colors.muted()),
    ))
}
