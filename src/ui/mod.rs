pub mod components;
pub mod help;
pub mod layout;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::app::App;
use crate::input::InputState;
use crate::view::agenda::{AGENDA_COLUMNS, AGENDA_SCHEMA};
use crate::view::month::{DAY_COLUMNS, DAY_SCHEMA, counts_for_month};
use crate::view::{MonthFocus, ViewMode, build_table_frame};
use components::month_grid::MonthGrid;
use components::overlay::OverlayPopup;
use components::table::TableView;
use layout::{AppLayout, pack_hint_lines};

const AGENDA_HINTS: &[&str] = &[
    "[q] Quit", "[?] Help", "[j/k] Row", "[h/l] Column", "[i] Edit", "[dd] Delete",
    "[o/O] Expand", "[a] Month", "[Tab] Bucket", "[,] Leader",
];
const MONTH_HINTS: &[&str] = &[
    "[q] Quit", "[?] Help", "[hjkl] Move", "[C-h/l] Month", "[C-j/k] Year", "[Enter] Focus",
    "[i] Edit", "[dd] Delete", "[a] Agenda", "[Tab] Bucket",
];

/// Draw one frame. Scroll offsets settled by the viewport are written back
/// to the view state.
pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    let hints = match app.state.view {
        ViewMode::Agenda => AGENDA_HINTS,
        ViewMode::Month => MONTH_HINTS,
    };
    let hint_lines = pack_hint_lines(hints, area.width as usize);
    let footer_height = (hint_lines.len() as u16 + 1).min(area.height / 3).max(1);
    let layout = AppLayout::new(area, footer_height);

    let bg = Block::default().style(Style::default().bg(app.theme.colors.bg()));
    frame.render_widget(bg, area);

    render_header(app, frame, layout.header);
    match app.state.view {
        ViewMode::Agenda => render_agenda(app, frame, layout.body),
        ViewMode::Month => render_month(app, frame, layout.body),
    }
    render_footer(app, frame, layout.footer, &hint_lines);

    if app.state.input.overlay().is_active() {
        let popup = OverlayPopup {
            overlay: app.state.input.overlay(),
            theme: &app.theme,
        };
        frame.render_widget(&popup, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let colors = &app.theme.colors;
    let line = Line::from(vec![
        Span::styled(
            " tcal ",
            Style::default()
                .fg(colors.header_fg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} ", app.state.view.label()),
            Style::default().fg(colors.accent()),
        ),
        Span::styled(
            format!(" bucket: {} ", app.state.bucket_filter.label()),
            Style::default().fg(colors.muted()),
        ),
        Span::styled(
            format!(" {} records ", app.records.len()),
            Style::default().fg(colors.muted()),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(colors.header_bg())),
        area,
    );
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect, hint_lines: &[String]) {
    let colors = &app.theme.colors;
    let status = match app.state.input.state() {
        InputState::Idle => Span::raw(""),
        InputState::LeaderPending { .. } => Span::styled(
            format!(" leader: {} ", app.state.input.pending_label().unwrap_or_default()),
            Style::default().fg(colors.warning()).add_modifier(Modifier::BOLD),
        ),
        InputState::DeleteArmed { .. } => Span::styled(
            " press d again to delete ",
            Style::default().fg(colors.error()).add_modifier(Modifier::BOLD),
        ),
    };
    let mut lines = vec![Line::from(status)];
    lines.extend(
        hint_lines
            .iter()
            .map(|l| Line::from(Span::styled(l.as_str(), Style::default().fg(colors.muted())))),
    );
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_empty(app: &App, frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(app.theme.colors.muted()),
    )));
    frame.render_widget(text, area);
}

fn render_agenda(app: &mut App, frame: &mut Frame, area: Rect) {
    let table = {
        let records = app.visible_records();
        (!records.is_empty()).then(|| {
            build_table_frame(
                &records,
                &AGENDA_SCHEMA,
                area.width as usize,
                area.height.saturating_sub(1) as usize,
                app.state.agenda_index,
                app.state.agenda_scroll,
                |r| app.state.is_expanded(r),
            )
        })
    };
    let Some(table) = table else {
        render_empty(app, frame, area, " No records. Press i to add one.");
        return;
    };
    // Too narrow for one column per field: skip the table this frame.
    let Some(table) = table else {
        return;
    };
    app.state.agenda_scroll = table.viewport.scroll;
    let view = TableView {
        frame: &table,
        columns: &AGENDA_COLUMNS,
        selected: Some(app.state.agenda_index),
        focused_column: Some(app.state.agenda_column),
        theme: &app.theme,
    };
    frame.render_widget(&view, area);
}

fn render_month(app: &mut App, frame: &mut Frame, area: Rect) {
    let grid_height = MonthGrid::height_for(app.state.month_date).min(area.height);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(grid_height),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    let counts = counts_for_month(&app.visible_records(), app.state.month_date);
    let grid = MonthGrid {
        selected: app.state.month_date,
        today: app.today(),
        counts: &counts,
        grid_focused: app.state.month_focus == MonthFocus::Grid,
        theme: &app.theme,
    };
    frame.render_widget(&grid, chunks[0]);

    let day_label = app.state.month_date.format(" %A %Y-%m-%d ").to_string();
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            day_label,
            Style::default()
                .fg(app.theme.colors.accent())
                .add_modifier(Modifier::BOLD),
        ))),
        chunks[1],
    );

    let pane = chunks[2];
    let table = {
        let day = app.day_records();
        (!day.is_empty()).then(|| {
            build_table_frame(
                &day,
                &DAY_SCHEMA,
                pane.width as usize,
                pane.height.saturating_sub(1) as usize,
                app.state.month_index,
                app.state.month_scroll,
                |r| app.state.is_expanded(r),
            )
        })
    };
    let Some(table) = table else {
        render_empty(app, frame, pane, " No records on this day.");
        return;
    };
    let Some(table) = table else {
        return;
    };
    app.state.month_scroll = table.viewport.scroll;
    let records_focused = app.state.month_focus == MonthFocus::Records;
    let view = TableView {
        frame: &table,
        columns: &DAY_COLUMNS,
        selected: records_focused.then_some(app.state.month_index),
        focused_column: None,
        theme: &app.theme,
    };
    frame.render_widget(&view, pane);
}
