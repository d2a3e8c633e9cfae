use crate::table::wrap::{display_width, max_line_width};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
    Center,
}

/// Static description of one table column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnSpec {
    pub header: &'static str,
    pub min_width: usize,
    pub max_width: usize,
    pub align: Align,
    pub wrap: bool,
}

impl ColumnSpec {
    pub const fn new(header: &'static str, min_width: usize, max_width: usize) -> Self {
        Self {
            header,
            min_width,
            max_width,
            align: Align::Left,
            wrap: true,
        }
    }

    pub const fn no_wrap(mut self) -> Self {
        self.wrap = false;
        self
    }

    pub const fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    fn bounds(&self) -> (usize, usize) {
        let min = self.min_width.max(1);
        (min, self.max_width.max(min))
    }
}

/// Column widths negotiated for one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComputedLayout {
    pub widths: Vec<usize>,
    /// Blank columns after each column but the last.
    pub gaps: Vec<usize>,
    /// Left edge of each column relative to the table origin.
    pub offsets: Vec<usize>,
    /// Unused columns to the right of the last column.
    pub trailing_pad: usize,
    /// Set when the table cannot fit at one column per field; such a frame is
    /// skipped rather than drawn.
    pub degenerate: bool,
}

impl ComputedLayout {
    pub fn used_width(&self) -> usize {
        self.widths.iter().sum::<usize>() + self.gaps.iter().sum::<usize>()
    }

    pub fn column_count(&self) -> usize {
        self.widths.len()
    }
}

/// Negotiate column widths for `available_width` terminal columns.
///
/// Each column starts at its natural width (header or widest sample line)
/// clamped to its bounds. Over budget, the widest column still above its
/// minimum gives up one column at a time (leftmost wins ties); then every
/// column shrinks round-robin down to 1; then the single-column gaps collapse
/// from the right. Below one column per field the layout is degenerate.
pub fn compute_layout(
    columns: &[ColumnSpec],
    sample_rows: &[Vec<String>],
    available_width: usize,
) -> ComputedLayout {
    let count = columns.len();
    if count == 0 {
        return ComputedLayout {
            widths: Vec::new(),
            gaps: Vec::new(),
            offsets: Vec::new(),
            trailing_pad: available_width,
            degenerate: false,
        };
    }

    let mut widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(idx, spec)| {
            let natural = sample_rows
                .iter()
                .filter_map(|row| row.get(idx))
                .map(|cell| max_line_width(cell))
                .fold(display_width(spec.header), usize::max);
            let (min, max) = spec.bounds();
            natural.clamp(min, max)
        })
        .collect();
    let mut gaps = vec![1usize; count - 1];

    let total = |widths: &[usize], gaps: &[usize]| -> usize {
        widths.iter().sum::<usize>() + gaps.iter().sum::<usize>()
    };

    // Widest column above its minimum shrinks first.
    while total(&widths, &gaps) > available_width {
        let candidate = widths
            .iter()
            .enumerate()
            .filter(|(idx, w)| **w > columns[*idx].bounds().0)
            .fold(None, |best: Option<(usize, usize)>, (idx, &w)| match best {
                Some((_, best_w)) if best_w >= w => best,
                _ => Some((idx, w)),
            });
        match candidate {
            Some((idx, _)) => widths[idx] -= 1,
            None => break,
        }
    }

    // Round-robin below the stated minimums, floor of one column.
    let mut cursor = 0;
    while total(&widths, &gaps) > available_width && widths.iter().any(|w| *w > 1) {
        if widths[cursor] > 1 {
            widths[cursor] -= 1;
        }
        cursor = (cursor + 1) % count;
    }

    // Drop separators, right-most first.
    for idx in (0..gaps.len()).rev() {
        if total(&widths, &gaps) <= available_width {
            break;
        }
        gaps[idx] = 0;
    }

    let degenerate = total(&widths, &gaps) > available_width;

    let mut offsets = Vec::with_capacity(count);
    let mut x = 0;
    for idx in 0..count {
        offsets.push(x);
        x += widths[idx] + gaps.get(idx).copied().unwrap_or(0);
    }

    ComputedLayout {
        trailing_pad: available_width.saturating_sub(x),
        widths,
        gaps,
        offsets,
        degenerate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("When", 16, 16).no_wrap(),
            ColumnSpec::new("Outcome", 10, 40),
            ColumnSpec::new("Impact", 10, 40),
        ]
    }

    fn rows(cells: &[[&str; 3]]) -> Vec<Vec<String>> {
        cells
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_natural_widths_when_everything_fits() {
        let sample = rows(&[["2026-01-01 09:00", "short", "tiny"]]);
        let layout = compute_layout(&specs(), &sample, 80);
        // Outcome/Impact fall back to their minimum of 10
        assert_eq!(layout.widths, vec![16, 10, 10]);
        assert_eq!(layout.offsets, vec![0, 17, 28]);
        assert_eq!(layout.trailing_pad, 80 - 38);
        assert!(!layout.degenerate);
    }

    #[test]
    fn test_multiline_samples_measured_per_line() {
        let sample = rows(&[["x", "aaaa\nbbbbbbbbbbbbbbbbbbbb", "c"]]);
        let layout = compute_layout(&specs(), &sample, 200);
        assert_eq!(layout.widths[1], 20);
    }

    #[test]
    fn test_widest_column_shrinks_first_leftmost_on_tie() {
        let long = "x".repeat(40);
        let sample = rows(&[["2026", long.as_str(), long.as_str()]]);
        // 16 + 40 + 40 + 2 gaps = 98; give 96 so two columns must go.
        let layout = compute_layout(&specs(), &sample, 96);
        assert_eq!(layout.widths, vec![16, 39, 39]);

        let layout = compute_layout(&specs(), &sample, 95);
        // Tie at 39/39 → leftmost (Outcome) shrinks.
        assert_eq!(layout.widths, vec![16, 38, 39]);
    }

    #[test]
    fn test_shrinks_below_minimum_round_robin() {
        let long = "x".repeat(40);
        let sample = rows(&[["2026", long.as_str(), long.as_str()]]);
        // Minimums sum to 36 + 2 gaps = 38; 35 forces three round-robin steps.
        let layout = compute_layout(&specs(), &sample, 35);
        assert_eq!(layout.widths, vec![15, 9, 9]);
        assert_eq!(layout.used_width(), 35);
        assert!(!layout.degenerate);
    }

    #[test]
    fn test_gaps_collapse_right_first_before_degenerate() {
        let layout = compute_layout(&specs(), &[], 4);
        assert_eq!(layout.widths, vec![1, 1, 1]);
        assert_eq!(layout.gaps, vec![1, 0]);
        assert_eq!(layout.used_width(), 4);
        assert!(!layout.degenerate);
    }

    #[test]
    fn test_too_narrow_is_degenerate() {
        let layout = compute_layout(&specs(), &[], 2);
        assert_eq!(layout.widths, vec![1, 1, 1]);
        assert_eq!(layout.gaps, vec![0, 0]);
        assert!(layout.degenerate);
        assert_eq!(layout.trailing_pad, 0);
    }

    #[test]
    fn test_empty_column_list() {
        let layout = compute_layout(&[], &[], 10);
        assert!(layout.widths.is_empty());
        assert_eq!(layout.trailing_pad, 10);
    }
}
