// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The cost & backtrack engine ("index map"): a bottom-up dynamic program
//! over an energy field, producing the minimum accumulated cost to reach
//! every cell from the top row, and a parent table recording which column
//! in the row above was chosen.
//!
//! Row 0 has no predecessor; every other row can, in principle, be computed
//! independently across its columns once the row above is finished, so each
//! row is divided into column segments and farmed out to worker threads,
//! the same split used for the forward-energy pass itself.

use crossbeam::thread::ScopedJoinHandle;

use crate::energy::EnergyField;
use crate::twodmap::TwoDimensionalMap;

/// H×W accumulated minimum cost to reach each cell from the top row.
pub type CostField = TwoDimensionalMap<i32>;

/// H×W table of predecessor offsets in {-1, 0, +1}; row 0 is unused.
pub type ParentTable = TwoDimensionalMap<i8>;

// One candidate cell's minimum cost and the offset to its chosen parent.
// Ties are broken deterministically: center, then left, then right. This
// is intentionally a *different* rule from the randomized bottom-row
// selection in `select`.
#[inline]
fn candidate(x: u32, width: u32, prev_row: &[i32], e_here: i32) -> (i32, i8) {
    let mut best = (e_here + prev_row[x as usize], 0i8);

    if x > 0 {
        let left = e_here + prev_row[(x - 1) as usize];
        if left < best.0 {
            best = (left, -1);
        }
    }
    if x + 1 < width {
        let right = e_here + prev_row[(x + 1) as usize];
        if right < best.0 {
            best = (right, 1);
        }
    }
    best
}

fn start_and_end(index: usize, segment_size: usize, width: usize, last_thread: usize) -> (usize, usize) {
    (
        index * segment_size,
        if index == last_thread {
            width
        } else {
            (index + 1) * segment_size
        },
    )
}

fn compute_row(
    width: usize,
    segment_size: usize,
    thread_count: usize,
    energy_row: &[i32],
    prev_cost_row: &[i32],
) -> (Vec<i32>, Vec<i8>) {
    let last_thread = thread_count - 1;
    crossbeam::scope(|nursery| {
        let mut costs = vec![0i32; width];
        let mut parents = vec![0i8; width];

        let handles: Vec<ScopedJoinHandle<(Vec<i32>, Vec<i8>)>> = (0..thread_count)
            .map(|index| {
                nursery.spawn(move |_| {
                    let (sx, ex) = start_and_end(index, segment_size, width, last_thread);
                    let mut seg_costs = Vec::with_capacity(ex - sx);
                    let mut seg_parents = Vec::with_capacity(ex - sx);
                    for x in sx..ex {
                        let (c, p) = candidate(x as u32, width as u32, prev_cost_row, energy_row[x]);
                        seg_costs.push(c);
                        seg_parents.push(p);
                    }
                    (seg_costs, seg_parents)
                })
            })
            .collect();

        handles.into_iter().enumerate().for_each(|(index, handle)| {
            let (seg_costs, seg_parents) = handle.join().unwrap();
            let (sx, ex) = start_and_end(index, segment_size, width, last_thread);
            costs[sx..ex].copy_from_slice(&seg_costs);
            parents[sx..ex].copy_from_slice(&seg_parents);
        });

        (costs, parents)
    })
    .expect("row-segment worker thread panicked")
}

/// Run the bottom-up dynamic program over `energy`, returning the
/// accumulated cost field and the parent table needed to backtrack any
/// seam in O(H).
pub fn cost_and_backtrack(energy: &EnergyField) -> (CostField, ParentTable) {
    let (width, height) = (energy.width, energy.height);
    let mut costs = CostField::new(width, height);
    let mut parents = ParentTable::new(width, height);

    // E is non-negative by construction, so C can never go below zero and
    // can never exceed the sum of the largest per-row energy seen so far;
    // a blown `i32` sum wrapping negative (or past this bound) implies an
    // implausible frame size, not a reachable runtime condition.
    let max_energy = energy.as_slice().iter().copied().max().unwrap_or(0) as i64;

    costs.set_row(0, energy.row(0));
    debug_assert!(costs.row(0).iter().all(|&c| (0..=max_energy).contains(&(c as i64))));

    if height == 1 {
        return (costs, parents);
    }

    let thread_count = num_cpus::get().max(1).min(width as usize).max(1);
    let segment_size = ((width as usize) + thread_count - 1) / thread_count;

    for y in 1..height {
        let (row_costs, row_parents) =
            compute_row(width as usize, segment_size, thread_count, energy.row(y), costs.row(y - 1));
        let row_bound = (y as i64 + 1) * max_energy;
        debug_assert!(
            row_costs.iter().all(|&c| (0..=row_bound).contains(&(c as i64))),
            "cost row {y} exceeded the sane bound {row_bound}; implausible frame size or overflow"
        );
        costs.set_row(y, &row_costs);
        parents.set_row(y, &row_parents);
    }

    (costs, parents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::EnergyField;

    #[test]
    fn first_row_copies_energy_verbatim() {
        let e = EnergyField::from_vec(3, 2, vec![5, 1, 2, 0, 0, 0]);
        let (c, _) = cost_and_backtrack(&e);
        assert_eq!(c.row(0), &[5, 1, 2]);
    }

    #[test]
    fn accumulates_minimum_over_three_way_neighborhood() {
        // Column 1 of row 0 is cheapest, so every cell in row 1 should
        // route through it where reachable.
        let e = EnergyField::from_vec(3, 2, vec![5, 0, 5, 1, 1, 1]);
        let (c, p) = cost_and_backtrack(&e);
        assert_eq!(c[(0, 1)], 1); // col 0 reaches col 1's cheap cost via its right neighbor
        assert_eq!(p[(0, 1)], 1);
        assert_eq!(p[(1, 1)], 0); // center column routes straight down, already cheapest
    }

    #[test]
    fn ties_prefer_center_then_left_then_right() {
        let e = EnergyField::from_vec(3, 2, vec![0, 0, 0, 0, 0, 0]);
        let (_, p) = cost_and_backtrack(&e);
        // All three neighbors tie at zero delta; center must win everywhere
        // it is available.
        assert_eq!(p[(1, 1)], 0);
    }

    #[test]
    fn single_row_frame_has_no_predecessors() {
        let e = EnergyField::from_vec(4, 1, vec![3, 1, 2, 0]);
        let (c, _) = cost_and_backtrack(&e);
        assert_eq!(c.row(0), &[3, 1, 2, 0]);
    }
}
