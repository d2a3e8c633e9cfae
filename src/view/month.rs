use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::input::{JumpUnit, Step};
use crate::model::Record;
use crate::model::dates::{add_days, add_months, month_start};
use crate::table::{ColumnSpec, TableSchema};

pub static DAY_COLUMNS: [ColumnSpec; 3] = [
    ColumnSpec::new("Time", 5, 5).no_wrap(),
    ColumnSpec::new("Outcome", 10, 60),
    ColumnSpec::new("Impact", 8, 60),
];

fn day_cells(record: &Record) -> Vec<String> {
    vec![
        record.x.format("%H:%M").to_string(),
        record.y.clone(),
        record.z.clone(),
    ]
}

pub static DAY_SCHEMA: TableSchema = TableSchema {
    columns: &DAY_COLUMNS,
    cells: day_cells,
};

/// Records on `day`, in list order.
pub fn day_records<'a>(records: &[&'a Record], day: NaiveDate) -> Vec<&'a Record> {
    records.iter().copied().filter(|r| r.date() == day).collect()
}

/// Record counts per day for the month containing `day`.
pub fn counts_for_month(records: &[&Record], day: NaiveDate) -> HashMap<NaiveDate, usize> {
    let first = month_start(day);
    let mut counts = HashMap::new();
    for record in records {
        let date = record.date();
        if month_start(date) == first {
            *counts.entry(date).or_insert(0) += 1;
        }
    }
    counts
}

/// Grid cursor movement. Months and years clamp the day to the target
/// month's length.
pub fn move_date(day: NaiveDate, unit: JumpUnit, step: Step) -> NaiveDate {
    let delta = step.delta();
    match unit {
        JumpUnit::Day => add_days(day, delta),
        JumpUnit::Week => add_days(day, delta * 7),
        JumpUnit::Month => add_months(day, delta as i32),
        JumpUnit::Year => add_months(day, delta as i32 * 12),
    }
}

/// Day-cell label, with the record count when there is room for it.
pub fn cell_label(day: NaiveDate, count: usize, cell_width: usize) -> String {
    let base = format!("{:>2}", day.day());
    if count == 0 {
        return base;
    }
    let with_count = format!("{base} ({count})");
    if with_count.len() <= cell_width {
        with_count
    } else {
        base
    }
}
