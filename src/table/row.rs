use crate::model::Record;
use crate::table::columns::{ColumnSpec, ComputedLayout};
use crate::table::wrap::{truncate, wrap};

/// Columns of a table plus how a record fills them.
#[derive(Clone, Copy)]
pub struct TableSchema {
    pub columns: &'static [ColumnSpec],
    pub cells: fn(&Record) -> Vec<String>,
}

impl TableSchema {
    pub fn sample_rows<'a>(&self, records: impl IntoIterator<Item = &'a Record>) -> Vec<Vec<String>> {
        records.into_iter().map(|r| (self.cells)(r)).collect()
    }
}

/// One record laid out for painting. Rebuilt every frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayRow {
    pub identity: Record,
    pub cells: Vec<Vec<String>>,
    pub height: usize,
    pub expanded: bool,
}

/// Lay `record` out under `layout`. Collapsed rows keep only the first line
/// of each cell; columns that do not wrap always show a single clipped line.
pub fn build_row(
    record: &Record,
    schema: &TableSchema,
    layout: &ComputedLayout,
    expanded: bool,
) -> DisplayRow {
    let texts = (schema.cells)(record);
    let cells: Vec<Vec<String>> = schema
        .columns
        .iter()
        .enumerate()
        .map(|(idx, spec)| {
            let text = texts.get(idx).map(String::as_str).unwrap_or("");
            let width = layout.widths.get(idx).copied().unwrap_or(1);
            let mut lines = if spec.wrap {
                wrap(text, width)
            } else {
                let first = text.split('\n').next().unwrap_or("");
                vec![truncate(first, width).to_string()]
            };
            if !expanded {
                lines.truncate(1);
            }
            lines
        })
        .collect();

    let height = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
    DisplayRow {
        identity: record.clone(),
        cells,
        height,
        expanded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::columns::compute_layout;
    use chrono::NaiveDate;

    static COLUMNS: [ColumnSpec; 2] = [
        ColumnSpec::new("When", 5, 5).no_wrap(),
        ColumnSpec::new("Outcome", 4, 8),
    ];

    fn cells(record: &Record) -> Vec<String> {
        vec![record.x.format("%H:%M").to_string(), record.y.clone()]
    }

    fn schema() -> TableSchema {
        TableSchema {
            columns: &COLUMNS,
            cells,
        }
    }

    fn record(y: &str) -> Record {
        let x = NaiveDate::from_ymd_opt(2026, 3, 4)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap();
        Record::new(x, y, "")
    }

    #[test]
    fn test_expanded_row_height_is_tallest_cell() {
        let rec = record("one two three four");
        let layout = compute_layout(schema().columns, &[cells(&rec)], 14);
        assert_eq!(layout.widths, vec![5, 8]);
        let row = build_row(&rec, &schema(), &layout, true);
        assert_eq!(row.cells[0], vec!["09:15"]);
        assert_eq!(row.cells[1], vec!["one two ", "three ", "four"]);
        assert_eq!(row.height, 3);
        assert_eq!(row.identity, rec);
    }

    #[test]
    fn test_collapsed_row_keeps_first_line() {
        let rec = record("one two three four");
        let layout = compute_layout(schema().columns, &[cells(&rec)], 14);
        let row = build_row(&rec, &schema(), &layout, false);
        assert_eq!(row.cells[1], vec!["one two "]);
        assert_eq!(row.height, 1);
        assert!(!row.expanded);
    }

    #[test]
    fn test_height_follows_layout_changes() {
        let rec = record("one two three four");
        let wide = compute_layout(schema().columns, &[cells(&rec)], 40);
        let narrow = compute_layout(schema().columns, &[cells(&rec)], 10);
        let wide_row = build_row(&rec, &schema(), &wide, true);
        let narrow_row = build_row(&rec, &schema(), &narrow, true);
        assert_eq!(narrow.widths, vec![5, 4]);
        assert!(wide_row.height < narrow_row.height);
    }
}
