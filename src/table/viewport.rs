/// Rows of a variable-height list that fit the viewport this frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    pub scroll: usize,
    pub visible: Vec<usize>,
}

impl Viewport {
    pub fn contains(&self, index: usize) -> bool {
        self.visible.contains(&index)
    }
}

/// Rows from `scroll` onwards that fit `viewport_height`. A first row taller
/// than the viewport is returned alone.
fn fill(row_heights: &[usize], scroll: usize, viewport_height: usize) -> (Vec<usize>, usize) {
    let mut visible = Vec::new();
    let mut used = 0;
    for (idx, height) in row_heights.iter().enumerate().skip(scroll) {
        let height = (*height).max(1);
        if used + height > viewport_height {
            if visible.is_empty() {
                visible.push(idx);
                used = height;
            }
            break;
        }
        visible.push(idx);
        used += height;
    }
    (visible, used)
}

/// Work out which rows to show so that `selected` is on screen.
///
/// The window never starts after the selection, moves forward one row at a
/// time until the selection fits, then slides back over any rows that fit in
/// the space left at the bottom. Shared by every list in the application.
pub fn compute_visible(
    row_heights: &[usize],
    selected: usize,
    previous_scroll: usize,
    viewport_height: usize,
) -> Viewport {
    if row_heights.is_empty() {
        return Viewport::default();
    }
    let last = row_heights.len() - 1;
    let viewport_height = viewport_height.max(1);
    let selected = selected.min(last);

    let mut scroll = previous_scroll.min(last);
    if scroll > selected {
        scroll = selected;
    }

    let (mut visible, mut used) = fill(row_heights, scroll, viewport_height);
    while !visible.contains(&selected) && scroll < last {
        scroll += 1;
        (visible, used) = fill(row_heights, scroll, viewport_height);
    }

    while scroll > 0 {
        let height = row_heights[scroll - 1].max(1);
        if used + height > viewport_height {
            break;
        }
        scroll -= 1;
        used += height;
        visible.insert(0, scroll);
    }

    Viewport { scroll, visible }
}
