//! Ordered distribution of footnotes over a fixed number of columns.
//!
//! Every function here works on line heights alone: `heights[i]` lists the
//! line heights of footnote `i`. Footnotes stay in order and occupy
//! contiguous columns. A footnote taller than a whole column is the only one
//! split, at line boundaries, into the following columns.

use crate::util::{EPSILON, fits_within};
use std::ops::Range;

/// Lines `lines` of footnote `footnote` sit in column `column`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub footnote: usize,
    pub column: usize,
    pub lines: Range<usize>,
}

struct Grid {
    capacity: f32,
    columns: usize,
    column: usize,
    used: f32,
    placements: Vec<Placement>,
}

impl Grid {
    fn new(capacity: f32, columns: usize) -> Self {
        Self {
            capacity,
            columns,
            column: 0,
            used: 0.0,
            placements: Vec::new(),
        }
    }

    fn next_column(&mut self) -> Option<()> {
        self.column += 1;
        self.used = 0.0;
        (self.column < self.columns).then_some(())
    }

    fn place_whole(&mut self, footnote: usize, lines: &[f32], total: f32) -> Option<()> {
        if !fits_within(self.used + total, self.capacity) {
            return None;
        }
        self.placements.push(Placement {
            footnote,
            column: self.column,
            lines: 0..lines.len(),
        });
        self.used += total;
        Some(())
    }

    // Fills the current column line by line, continuing into the next ones.
    fn place_spanning(&mut self, footnote: usize, lines: &[f32]) -> Option<()> {
        let mut first = 0;
        for (index, height) in lines.iter().enumerate() {
            if !fits_within(*height, self.capacity) {
                return None;
            }
            if !fits_within(self.used + height, self.capacity) {
                if index > first {
                    self.placements.push(Placement {
                        footnote,
                        column: self.column,
                        lines: first..index,
                    });
                    first = index;
                }
                self.next_column()?;
            }
            self.used += height;
        }
        self.placements.push(Placement {
            footnote,
            column: self.column,
            lines: first..lines.len(),
        });
        Some(())
    }
}

/// Front-loaded greedy packing: each column is filled as far as `capacity` allows.
///
/// Returns `None` when the footnotes do not fit in `columns` columns.
pub fn pack(heights: &[Vec<f32>], capacity: f32, columns: usize) -> Option<Vec<Placement>> {
    let mut grid = Grid::new(capacity, columns);
    if heights.is_empty() {
        return Some(grid.placements);
    }
    if columns == 0 {
        return None;
    }
    for (footnote, lines) in heights.iter().enumerate() {
        let total: f32 = lines.iter().sum();
        if fits_within(total, capacity) {
            if !fits_within(grid.used + total, capacity) {
                grid.next_column()?;
            }
            grid.place_whole(footnote, lines, total)?;
        } else {
            grid.place_spanning(footnote, lines)?;
        }
    }
    Some(grid.placements)
}

/// Length of the longest prefix of `heights` that [`pack`] can place.
pub fn placeable_prefix(heights: &[Vec<f32>], capacity: f32, columns: usize) -> usize {
    if pack(heights, capacity, columns).is_some() {
        return heights.len();
    }
    // Feasibility is monotone in the prefix length.
    let (mut fits, mut fails) = (0, heights.len());
    while fails - fits > 1 {
        let mid = (fits + fails) / 2;
        if pack(&heights[..mid], capacity, columns).is_some() {
            fits = mid;
        } else {
            fails = mid;
        }
    }
    fits
}

/// Balanced distribution: every column aims at `remaining / columns_left`,
/// recomputed as each column opens.
///
/// A footnote joins the current column while its overshoot past the target is
/// no larger than the undershoot it would otherwise leave, plus `tolerance`.
/// Ties join, so earlier columns end up fuller. Returns `None` when the result
/// would exceed `capacity`; callers then fall back to [`pack`].
pub fn balance(
    heights: &[Vec<f32>],
    capacity: f32,
    columns: usize,
    tolerance: f32,
) -> Option<Vec<Placement>> {
    let mut grid = Grid::new(capacity, columns);
    if heights.is_empty() {
        return Some(grid.placements);
    }
    if columns == 0 {
        return None;
    }

    let totals: Vec<f32> = heights.iter().map(|lines| lines.iter().sum()).collect();
    let mut remaining: f32 = totals.iter().sum();
    let mut target = remaining / columns as f32;

    for (footnote, lines) in heights.iter().enumerate() {
        let total = totals[footnote];
        if fits_within(total, capacity) {
            if grid.used > 0.0 && grid.column + 1 < columns {
                let overshoot = grid.used + total - target;
                let undershoot = target - grid.used;
                let overflows = !fits_within(grid.used + total, capacity);
                if overflows || overshoot > undershoot + tolerance + EPSILON {
                    grid.next_column()?;
                    target = remaining / (columns - grid.column) as f32;
                }
            }
            grid.place_whole(footnote, lines, total)?;
        } else {
            let opened_at = grid.column;
            grid.place_spanning(footnote, lines)?;
            if grid.column != opened_at {
                target = (remaining - total + grid.used) / (columns - grid.column) as f32;
            }
        }
        remaining -= total;
    }
    Some(grid.placements)
}

/// Height of each column under `placements`.
pub fn column_heights(heights: &[Vec<f32>], placements: &[Placement], columns: usize) -> Vec<f32> {
    let mut result = vec![0.0; columns];
    for placement in placements {
        if let Some(column) = result.get_mut(placement.column) {
            *column += heights[placement.footnote][placement.lines.clone()]
                .iter()
                .sum::<f32>();
        }
    }
    result
}
