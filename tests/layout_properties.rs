//! Property tests for the table layout primitives.
//!
//! 1. A non-degenerate layout fills exactly the available width.
//! 2. Enough room for one column per field is never degenerate.
//! 3. Wrapping a single line loses nothing and no line is wider than the
//!    width, whitespace included.
//! 4. The viewport always contains the selection as a contiguous run.

use proptest::prelude::*;

use tcal::table::wrap::display_width;
use tcal::table::{ColumnSpec, compute_layout, compute_visible, wrap};

const HEADERS: [&str; 5] = ["When", "Bucket", "Outcome", "Impact", "Notes"];

fn column_strategy() -> impl Strategy<Value = Vec<ColumnSpec>> {
    prop::collection::vec((1usize..12, 0usize..30, any::<bool>()), 1..=HEADERS.len()).prop_map(
        |specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(idx, (min, extra, wraps))| {
                    let spec = ColumnSpec::new(HEADERS[idx], min, min + extra);
                    if wraps { spec } else { spec.no_wrap() }
                })
                .collect()
        },
    )
}

fn sample_strategy(columns: usize) -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(
        prop::collection::vec("[a-z ]{0,40}(\n[a-z ]{0,20})?", columns),
        0..8,
    )
}

/// Words mixed with whitespace runs, some much longer than any width used.
fn spaced_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof!["[a-z]{1,12}", " {1,40}"], 0..12)
        .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn layout_fills_available_width(
        (columns, samples) in column_strategy()
            .prop_flat_map(|cols| { let n = cols.len(); (Just(cols), sample_strategy(n)) }),
        available in 0usize..200,
    ) {
        let layout = compute_layout(&columns, &samples, available);
        prop_assert_eq!(layout.widths.len(), columns.len());
        prop_assert_eq!(layout.gaps.len(), columns.len() - 1);
        if available >= columns.len() {
            prop_assert!(!layout.degenerate, "{} columns in {}", columns.len(), available);
        }
        if !layout.degenerate {
            prop_assert!(layout.widths.iter().all(|w| *w >= 1));
            prop_assert_eq!(layout.used_width() + layout.trailing_pad, available);
            let last = columns.len() - 1;
            prop_assert_eq!(
                layout.offsets[last] + layout.widths[last] + layout.trailing_pad,
                available
            );
        }
    }

    #[test]
    fn layout_is_generous_when_room_allows(
        columns in column_strategy(),
    ) {
        let roomy: usize = columns.iter().map(|c| c.max_width + 1).sum();
        let layout = compute_layout(&columns, &[], roomy);
        for (spec, width) in columns.iter().zip(&layout.widths) {
            prop_assert!(*width >= spec.min_width);
            prop_assert!(*width <= spec.max_width.max(spec.min_width));
        }
        prop_assert!(layout.gaps.iter().all(|g| *g == 1));
    }

    #[test]
    fn wrap_is_lossless_and_bounded(text in spaced_text(), width in 1usize..30) {
        let lines = wrap(&text, width);
        prop_assert!(!lines.is_empty());
        prop_assert_eq!(lines.concat(), text.clone());
        for line in &lines {
            prop_assert!(
                display_width(line) <= width,
                "line {:?} is {} wide, limit {}",
                line,
                display_width(line),
                width
            );
        }
    }

    #[test]
    fn wrap_honours_hard_breaks(text in "[a-z \n]{0,80}", width in 1usize..30) {
        let expected: usize = text.split('\n').map(|unit| wrap(unit, width).len()).sum();
        prop_assert_eq!(wrap(&text, width).len(), expected);
    }

    #[test]
    fn viewport_contains_selection(
        (heights, selected) in prop::collection::vec(1usize..6, 1..40)
            .prop_flat_map(|h| { let n = h.len(); (Just(h), 0..n) }),
        previous_scroll in 0usize..50,
        viewport_height in 1usize..20,
    ) {
        let vp = compute_visible(&heights, selected, previous_scroll, viewport_height);
        prop_assert!(vp.contains(selected), "{:?} misses {}", vp, selected);
        prop_assert_eq!(vp.visible.first().copied(), Some(vp.scroll));
        prop_assert!(vp.visible.windows(2).all(|w| w[1] == w[0] + 1));
        prop_assert!(vp.scroll <= selected);

        let used: usize = vp.visible.iter().map(|idx| heights[*idx]).sum();
        prop_assert!(used <= viewport_height || vp.visible.len() == 1);
    }
}
