use chrono::{NaiveDate, NaiveDateTime};

use crate::input::{JumpUnit, Step};
use crate::model::Record;
use crate::model::dates::{month_start, week_start, year_start};
use crate::table::{ColumnSpec, TableSchema};

pub static AGENDA_COLUMNS: [ColumnSpec; 4] = [
    ColumnSpec::new("When", 16, 16).no_wrap(),
    ColumnSpec::new("Bucket", 6, 20).no_wrap(),
    ColumnSpec::new("Outcome", 12, 60),
    ColumnSpec::new("Impact", 8, 60),
];

fn agenda_cells(record: &Record) -> Vec<String> {
    vec![
        record.x.format("%Y-%m-%d %H:%M").to_string(),
        record.bucket.map(|b| b.as_str().to_string()).unwrap_or_default(),
        record.y.clone(),
        record.z.clone(),
    ]
}

pub static AGENDA_SCHEMA: TableSchema = TableSchema {
    columns: &AGENDA_COLUMNS,
    cells: agenda_cells,
};

fn period_key(unit: JumpUnit, day: NaiveDate) -> NaiveDate {
    match unit {
        JumpUnit::Day => day,
        JumpUnit::Week => week_start(day),
        JumpUnit::Month => month_start(day),
        JumpUnit::Year => year_start(day),
    }
}

/// Index of the record to select after jumping one period from `current`.
///
/// Forward lands on the first record in a later period. Backward lands on
/// the first record of the nearest earlier period. `None` when no such
/// period exists in the list, which must be sorted by timestamp.
pub fn jump_target(records: &[&Record], current: usize, unit: JumpUnit, step: Step) -> Option<usize> {
    let here = period_key(unit, records.get(current)?.date());
    match step {
        Step::Forward => records
            .iter()
            .enumerate()
            .skip(current + 1)
            .find(|(_, r)| period_key(unit, r.date()) > here)
            .map(|(idx, _)| idx),
        Step::Back => {
            let target = records[..current]
                .iter()
                .rev()
                .map(|r| period_key(unit, r.date()))
                .find(|key| *key < here)?;
            records
                .iter()
                .position(|r| period_key(unit, r.date()) == target)
        }
    }
}

/// First record at or after `now`, else the last record.
pub fn today_index(records: &[&Record], now: NaiveDateTime) -> usize {
    records
        .iter()
        .position(|r| r.x >= now)
        .unwrap_or_else(|| records.len().saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(day: u32, hour: u32, y: &str) -> Record {
        let x = NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        Record::new(x, y, "")
    }

    fn sample() -> Vec<Record> {
        vec![
            rec(2, 9, "a"),
            rec(2, 10, "b"),
            rec(3, 9, "c"),
            rec(9, 9, "d"),
            rec(9, 11, "e"),
        ]
    }

    #[test]
    fn test_jump_next_day_skips_same_day() {
        let records = sample();
        let refs: Vec<&Record> = records.iter().collect();
        assert_eq!(jump_target(&refs, 0, JumpUnit::Day, Step::Forward), Some(2));
        assert_eq!(jump_target(&refs, 1, JumpUnit::Day, Step::Forward), Some(2));
        assert_eq!(jump_target(&refs, 4, JumpUnit::Day, Step::Forward), None);
    }

    #[test]
    fn test_jump_back_lands_on_first_of_previous_day() {
        let records = sample();
        let refs: Vec<&Record> = records.iter().collect();
        assert_eq!(jump_target(&refs, 4, JumpUnit::Day, Step::Back), Some(2));
        assert_eq!(jump_target(&refs, 2, JumpUnit::Day, Step::Back), Some(0));
        assert_eq!(jump_target(&refs, 1, JumpUnit::Day, Step::Back), None);
    }

    #[test]
    fn test_jump_by_week() {
        // 2026-03-02 is a Monday; the 9th starts the next week.
        let records = sample();
        let refs: Vec<&Record> = records.iter().collect();
        assert_eq!(jump_target(&refs, 0, JumpUnit::Week, Step::Forward), Some(3));
        assert_eq!(jump_target(&refs, 4, JumpUnit::Week, Step::Back), Some(0));
        assert_eq!(jump_target(&refs, 0, JumpUnit::Month, Step::Forward), None);
    }

    #[test]
    fn test_jump_on_empty_list() {
        assert_eq!(jump_target(&[], 0, JumpUnit::Day, Step::Forward), None);
    }

    #[test]
    fn test_today_index() {
        let records = sample();
        let refs: Vec<&Record> = records.iter().collect();
        let noon_third = NaiveDate::from_ymd_opt(2026, 3, 3)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(today_index(&refs, noon_third), 3);
        let later = NaiveDate::from_ymd_opt(2027, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(today_index(&refs, later), 4);
        assert_eq!(today_index(&[], later), 0);
    }
}
