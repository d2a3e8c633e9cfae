pub mod agenda;
pub mod month;

use serde::{Deserialize, Serialize};

use crate::model::Record;
use crate::table::{ComputedLayout, DisplayRow, TableSchema, Viewport, build_row, compute_layout, compute_visible};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Agenda,
    Month,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Agenda => ViewMode::Month,
            ViewMode::Month => ViewMode::Agenda,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Agenda => "Agenda",
            ViewMode::Month => "Month",
        }
    }
}

/// Which half of the month view receives navigation keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MonthFocus {
    #[default]
    Grid,
    Records,
}

/// Everything needed to paint one scrollable table.
#[derive(Clone, Debug)]
pub struct TableFrame {
    pub layout: ComputedLayout,
    pub rows: Vec<DisplayRow>,
    pub viewport: Viewport,
}

impl TableFrame {
    /// Rows in the viewport paired with their index in the full row list.
    pub fn visible_rows(&self) -> impl Iterator<Item = (usize, &DisplayRow)> {
        self.viewport
            .visible
            .iter()
            .filter_map(|idx| self.rows.get(*idx).map(|row| (*idx, row)))
    }
}

/// Lay out `records` for a `width` x `height` body (header row excluded).
/// Returns `None` when the columns cannot fit, in which case the caller skips
/// drawing the table this frame.
pub fn build_table_frame(
    records: &[&Record],
    schema: &TableSchema,
    width: usize,
    height: usize,
    selected: usize,
    previous_scroll: usize,
    is_expanded: impl Fn(&Record) -> bool,
) -> Option<TableFrame> {
    let samples = schema.sample_rows(records.iter().copied());
    let layout = compute_layout(schema.columns, &samples, width);
    if layout.degenerate {
        return None;
    }
    let rows: Vec<DisplayRow> = records
        .iter()
        .map(|record| build_row(record, schema, &layout, is_expanded(*record)))
        .collect();
    let heights: Vec<usize> = rows.iter().map(|row| row.height).collect();
    let viewport = compute_visible(&heights, selected, previous_scroll, height);
    Some(TableFrame {
        layout,
        rows,
        viewport,
    })
}

/// Clamp `index` into a list of `len` rows; 0 for an empty list.
pub fn clamp_index(index: usize, len: usize) -> usize {
    if len == 0 { 0 } else { index.min(len - 1) }
}

/// Move `index` by one step, staying inside `[0, len)`.
pub fn step_index(index: usize, delta: i64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let moved = index as i64 + delta;
    moved.clamp(0, len as i64 - 1) as usize
}
