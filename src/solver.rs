//! This module contains the logic for solving Sudoku grids.
//!
//! Most importantly, this module contains the definition of the
//! [BacktrackingSolver], which fills the blank cells of a [SudokuGrid] using
//! a most-constrained-cell-first backtracking search, and of the [Solution]
//! enumeration returned by its uniqueness probe.

use crate::SudokuGrid;
use crate::error::{SudokuError, SudokuResult};
use crate::util::DigitSet;

/// An enumeration of the different ways a Sudoku grid can be solveable, as
/// reported by [BacktrackingSolver::solve].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Solution {

    /// Indicates that the grid is not solveable at all.
    Impossible,

    /// Indicates that the grid has a unique solution according to the
    /// two-order probe, which is wrapped in this instance.
    Unique(SudokuGrid),

    /// Indicates that the grid has multiple solutions.
    Ambiguous
}

/// The order in which candidate digits are tried for a chosen cell.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ValueOrder {
    Ascending,
    Descending
}

/// The blank cells of a grid together with their legal-digit sets. The sets
/// are computed once per solve attempt: a digit is legal for a blank cell iff
/// no cell sharing the blank's row, column, or block currently holds it.
struct Blanks {
    positions: Vec<(usize, usize)>,
    blocks: Vec<usize>,
    candidates: Vec<DigitSet>,
    filled: Vec<bool>
}

impl Blanks {
    fn new(grid: &SudokuGrid) -> Blanks {
        let size = grid.size();
        let mut positions = Vec::new();

        for row in 0..size {
            for column in 0..size {
                if grid.get_cell(column, row).unwrap().is_none() {
                    positions.push((column, row));
                }
            }
        }

        let mut blocks = Vec::with_capacity(positions.len());
        let mut candidates = Vec::with_capacity(positions.len());

        for &(column, row) in positions.iter() {
            let block = grid.block_index(column, row).unwrap();
            let mut legal = DigitSet::full(size);
            let peers = grid.row_cells(row).unwrap().into_iter()
                .chain(grid.column_cells(column).unwrap())
                .chain(grid.block_cells(block).unwrap());

            for (peer_column, peer_row) in peers {
                if let Some(number) =
                        grid.get_cell(peer_column, peer_row).unwrap() {
                    legal.remove(number);
                }
            }

            blocks.push(block);
            candidates.push(legal);
        }

        let filled = vec![false; positions.len()];

        Blanks {
            positions,
            blocks,
            candidates,
            filled
        }
    }

    fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the blanks at indices `i` and `j` share a row, column, or
    /// block.
    fn neighbors(&self, i: usize, j: usize) -> bool {
        let (column_i, row_i) = self.positions[i];
        let (column_j, row_j) = self.positions[j];

        column_i == column_j || row_i == row_j ||
            self.blocks[i] == self.blocks[j]
    }
}

/// One choice point of the backtracking search: a chosen blank cell, the
/// candidate digits that remain to be tried for it, and the legal-set
/// removals performed on behalf of the currently assigned candidate, which
/// must be undone before the next candidate or on backtracking.
struct ChoicePoint {
    blank: usize,
    digits: Vec<usize>,
    cursor: usize,
    removals: Vec<(usize, usize)>
}

fn ordered_digits(candidates: &DigitSet, order: ValueOrder) -> Vec<usize> {
    let mut digits: Vec<usize> = candidates.iter().collect();

    if order == ValueOrder::Descending {
        digits.reverse();
    }

    digits
}

/// Runs one backtracking search over the given grid and returns the first
/// solution found, trying candidate digits in the given order. The search is
/// iterative with an explicit stack of [ChoicePoint]s, so its memory use is
/// bounded by the number of blank cells rather than the call-stack depth.
fn probe(grid: &SudokuGrid, order: ValueOrder) -> Option<SudokuGrid> {
    if !grid.is_valid() {
        return None;
    }

    let mut board = grid.clone();
    let mut blanks = Blanks::new(grid);
    let mut stack: Vec<ChoicePoint> = Vec::new();

    loop {
        // Pick the unfilled blank with the fewest legal digits (first found
        // wins ties). A blank without any legal digit fails the branch.
        let mut chosen = None;
        let mut chosen_options = usize::MAX;
        let mut dead_end = false;

        for i in 0..blanks.len() {
            if blanks.filled[i] {
                continue;
            }

            let options = blanks.candidates[i].len();

            if options == 0 {
                dead_end = true;
                break;
            }

            if options < chosen_options {
                chosen_options = options;
                chosen = Some(i);
            }
        }

        if !dead_end {
            if let Some(blank) = chosen {
                let digits = ordered_digits(&blanks.candidates[blank], order);
                blanks.filled[blank] = true;
                stack.push(ChoicePoint {
                    blank,
                    digits,
                    cursor: 0,
                    removals: Vec::new()
                });
            }
            else {
                // No unfilled blank remains.
                return Some(board);
            }
        }

        // Advance the top choice point to its next candidate, popping
        // exhausted choice points along the way.
        loop {
            let top = match stack.last_mut() {
                Some(top) => top,
                None => return None
            };

            for &(neighbor, digit) in top.removals.iter() {
                blanks.candidates[neighbor].insert(digit);
            }

            top.removals.clear();
            let (column, row) = blanks.positions[top.blank];

            if top.cursor < top.digits.len() {
                let digit = top.digits[top.cursor];
                top.cursor += 1;
                board.set_cell(column, row, digit).unwrap();

                for j in 0..blanks.len() {
                    if j == top.blank || blanks.filled[j] {
                        continue;
                    }

                    if blanks.neighbors(top.blank, j) &&
                            blanks.candidates[j].remove(digit) {
                        top.removals.push((j, digit));
                    }
                }

                break;
            }
            else {
                board.clear_cell(column, row).unwrap();
                blanks.filled[top.blank] = false;
                stack.pop();
            }
        }
    }
}

/// A solver which fills the blank cells of a [SudokuGrid] by backtracking.
/// The most constrained blank cell is always chosen next, which keeps typical
/// Sudoku instances tractable, although the worst-case runtime remains
/// exponential in the number of blanks.
///
/// The solver never mutates its input; every call operates on its own copy
/// of the grid, so it is safe to use one `BacktrackingSolver` from multiple
/// independent contexts.
pub struct BacktrackingSolver;

impl BacktrackingSolver {

    /// Attempts to solve the given grid and returns the first solution
    /// found, trying candidate digits in ascending order. `None` indicates
    /// that no valid completion exists, which is a normal outcome for
    /// contradictory input, not an error.
    pub fn solve_any(&self, grid: &SudokuGrid) -> Option<SudokuGrid> {
        probe(grid, ValueOrder::Ascending)
    }

    /// Like [BacktrackingSolver::solve_any], but for callers which assert
    /// that the given grid is solvable.
    ///
    /// # Errors
    ///
    /// `SudokuError::Unsolvable` if the grid has no valid completion.
    pub fn solve_any_required(&self, grid: &SudokuGrid)
            -> SudokuResult<SudokuGrid> {
        self.solve_any(grid).ok_or(SudokuError::Unsolvable)
    }

    /// Solves the given grid twice on independent copies, once trying
    /// candidate digits in ascending and once in descending order, and
    /// compares the two results cell by cell. Equal results yield
    /// [Solution::Unique], different results [Solution::Ambiguous], and a
    /// failed search [Solution::Impossible].
    ///
    /// Note that this is a heuristic, not an exhaustive proof: a grid with
    /// multiple solutions whose ascending and descending searches happen to
    /// arrive at the same solution would be misclassified as unique. In
    /// practice the two orders explore opposite ends of the solution space,
    /// which makes this a strong proxy for uniqueness.
    pub fn solve(&self, grid: &SudokuGrid) -> Solution {
        let ascending = match probe(grid, ValueOrder::Ascending) {
            Some(solution) => solution,
            None => return Solution::Impossible
        };

        match probe(grid, ValueOrder::Descending) {
            Some(descending) =>
                if ascending == descending {
                    Solution::Unique(ascending)
                }
                else {
                    Solution::Ambiguous
                }
            None => Solution::Impossible
        }
    }
}
