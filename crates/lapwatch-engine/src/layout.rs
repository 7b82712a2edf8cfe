//! Row packing for timeline diagrams.
//!
//! Each timeline is given a display row such that no two intervals on the
//! same row collide. Children are placed at least one row below their parent,
//! and earlier placements are never revisited, so the result is greedy and
//! deterministic for a given input order.

use std::time::Duration;

use crate::timeline::Timeline;

/// Rows assigned to a sequence of timelines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    rows: Vec<usize>,
    row_count: usize,
}

impl Layout {
    /// Row of every timeline, indexed like the input sequence.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Row of the timeline at `index`.
    pub fn row(&self, index: usize) -> Option<usize> {
        self.rows.get(index).copied()
    }

    /// Number of rows in use.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Indices of the timelines placed on `row`, in input order.
    pub fn members(&self, row: usize) -> impl Iterator<Item = usize> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter(move |(_, r)| **r == row)
            .map(|(index, _)| index)
    }
}

fn strictly_between(value: Duration, lower: Duration, upper: Duration) -> bool {
    value > lower && value < upper
}

/// Whether two intervals may not share a row.
///
/// Intervals collide when they share a start or an end, or when a boundary of
/// one lies strictly inside the other. An interval that ends exactly where
/// another begins does not collide with it.
pub fn collides(a: &Timeline, b: &Timeline) -> bool {
    let (start, end) = (a.relative_start, a.relative_end());
    let (other_start, other_end) = (b.relative_start, b.relative_end());

    if start == other_start || end == other_end {
        return true;
    }

    strictly_between(start, other_start, other_end)
        || strictly_between(end, other_start, other_end)
        || strictly_between(other_start, start, end)
        || strictly_between(other_end, start, end)
}

/// Assign a display row to every timeline.
///
/// Timelines are placed in input order. A timeline whose parent index points
/// at an earlier entry starts searching one row below that parent; any other
/// timeline starts at row 0. The first row without a collision wins.
pub fn pack(timelines: &[Timeline]) -> Layout {
    let mut occupied: Vec<Vec<usize>> = Vec::new();
    let mut rows = Vec::with_capacity(timelines.len());

    for (index, timeline) in timelines.iter().enumerate() {
        let mut row = timeline
            .parent
            .filter(|&parent| parent < index)
            .map_or(0, |parent| rows[parent] + 1);

        while occupied.get(row).is_some_and(|members| {
            members
                .iter()
                .any(|&other| collides(timeline, &timelines[other]))
        }) {
            row += 1;
        }

        if occupied.len() <= row {
            occupied.resize_with(row + 1, Vec::new);
        }
        occupied[row].push(index);
        rows.push(row);
    }

    Layout {
        row_count: occupied.len(),
        rows,
    }
}
