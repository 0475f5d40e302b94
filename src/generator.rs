//! This module contains the logic for generating random Sudoku puzzles.
//!
//! Generation is done in two steps: [Generator::generate_solved] produces a
//! full, valid grid from a shuffled diagonal seed, and [Generator::carve]
//! removes cells from it until a target clue density is reached, while
//! guarding the result with the uniqueness probe of the
//! [solver](crate::solver) module.

use crate::SudokuGrid;
use crate::error::{SudokuError, SudokuResult};
use crate::solver::{BacktrackingSolver, Solution};

use rand::{Rng, SeedableRng};
use rand::rngs::{StdRng, ThreadRng};

/// Fisher-Yates-shuffles the given values into a random order.
pub(crate) fn shuffle<T>(rng: &mut impl Rng, values: impl Iterator<Item = T>)
        -> Vec<T> {
    let mut vec: Vec<T> = values.collect();

    for i in (1..vec.len()).rev() {
        let j = rng.gen_range(0..=i);
        vec.swap(i, j);
    }

    vec
}

/// A carved puzzle together with the solution it was derived from. The
/// solution is the one found by an ascending solver run over the carved
/// board, so solving [CarvedPuzzle::puzzle] again reproduces it exactly.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CarvedPuzzle {

    /// The playable board, i.e. the solution with some cells removed.
    pub puzzle: SudokuGrid,

    /// The full solution of the playable board.
    pub solution: SudokuGrid
}

/// A generator randomly generates solved Sudoku grids and carves playable
/// puzzles out of them. It uses a random number generator to decide the
/// content; a single generator instance threads the same RNG through every
/// random choice, so a seeded generator reproduces entire puzzles, not just
/// their solved grids.
///
/// For most cases, sensible defaults are provided by
/// [Generator::new_default] and [Generator::new_seeded].
pub struct Generator<R: Rng> {
    rng: R
}

impl Generator<ThreadRng> {

    /// Creates a new generator that uses a `ThreadRng` to generate the
    /// random digits.
    pub fn new_default() -> Generator<ThreadRng> {
        Generator::new(rand::thread_rng())
    }
}

impl Generator<StdRng> {

    /// Creates a new generator whose random number generator is seeded with
    /// the given value. Two generators created with the same seed produce
    /// the same sequence of grids and puzzles.
    pub fn new_seeded(seed: u64) -> Generator<StdRng> {
        Generator::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Generator<R> {

    /// Creates a new generator that uses the given random number generator
    /// to generate random digits.
    pub fn new(rng: R) -> Generator<R> {
        Generator {
            rng
        }
    }

    /// Generates a new fully solved [SudokuGrid] with the given block
    /// dimensions. A shuffled permutation of the digits `1..=size` is placed
    /// on the main diagonal of an empty grid, which is then completed by the
    /// backtracking solver. The diagonal seed keeps every generation attempt
    /// solvable by construction while the shuffle provides the randomness.
    ///
    /// # Arguments
    ///
    /// * `block_width`: The horizontal dimension of one sub-block of the
    /// grid. For an ordinary Sudoku grid, this is 3.
    /// * `block_height`: The vertical dimension of one sub-block of the
    /// grid. For an ordinary Sudoku grid, this is 3.
    ///
    /// # Errors
    ///
    /// * `SudokuError::InvalidDimensions` If `block_width` or `block_height`
    /// is invalid (see [SudokuGrid::new]).
    /// * `SudokuError::Unsolvable` If the seeded grid cannot be completed.
    /// This does not happen for sensible block dimensions.
    pub fn generate_solved(&mut self, block_width: usize, block_height: usize)
            -> SudokuResult<SudokuGrid> {
        let mut grid = SudokuGrid::new(block_width, block_height)?;
        let size = grid.size();
        let diagonal = shuffle(&mut self.rng, 1..=size);

        for (i, &digit) in diagonal.iter().enumerate() {
            grid.set_cell(i, i, digit)?;
        }

        BacktrackingSolver.solve_any_required(&grid)
    }

    fn carve_board(&mut self, solution: &SudokuGrid, difficulty: f64)
            -> SudokuResult<SudokuGrid> {
        if difficulty <= 0.0 || difficulty >= 1.0 {
            return Err(SudokuError::InvalidDifficulty);
        }

        let size = solution.size();
        let cell_count = size * size;
        let cells_to_remove = (difficulty * cell_count as f64) as usize;
        let indices = shuffle(&mut self.rng, 0..cell_count);
        let mut puzzle = solution.clone();

        for &index in indices[..cells_to_remove].iter() {
            puzzle.clear_cell(index % size, index / size)?;
        }

        Ok(puzzle)
    }

    /// Carves a playable puzzle out of the given solved grid by removing
    /// `floor(difficulty · size²)` cells at uniformly shuffled positions
    /// from a copy, then running the uniqueness probe over the result. The
    /// input grid is not modified.
    ///
    /// # Arguments
    ///
    /// * `solution`: A full, valid grid, usually obtained from
    /// [Generator::generate_solved].
    /// * `difficulty`: The fraction of cells to remove. Must lie strictly
    /// between 0 and 1.
    ///
    /// # Errors
    ///
    /// * `SudokuError::InvalidDifficulty` If `difficulty` is not in the open
    /// interval (0, 1). No cells are removed in that case.
    /// * `SudokuError::AmbiguousPuzzle` If the carved board admits more than
    /// one solution. Recoverable: carving again removes a different set of
    /// cells.
    /// * `SudokuError::Unsolvable` If the carved board has no solution at
    /// all, which indicates that `solution` was not actually a valid full
    /// grid.
    pub fn carve(&mut self, solution: &SudokuGrid, difficulty: f64)
            -> SudokuResult<CarvedPuzzle> {
        let puzzle = self.carve_board(solution, difficulty)?;

        match BacktrackingSolver.solve(&puzzle) {
            Solution::Unique(found) => Ok(CarvedPuzzle {
                puzzle,
                solution: found
            }),
            Solution::Ambiguous => Err(SudokuError::AmbiguousPuzzle),
            Solution::Impossible => Err(SudokuError::Unsolvable)
        }
    }

    /// Like [Generator::carve], but without the uniqueness gate: the carved
    /// board is returned even if it admits multiple solutions, paired with
    /// the solution an ascending solver run finds for it. This is the
    /// fallback used by the [assembly](crate::assembly) module when every
    /// uniqueness-checked attempt was rejected.
    ///
    /// # Errors
    ///
    /// * `SudokuError::InvalidDifficulty` If `difficulty` is not in the open
    /// interval (0, 1).
    /// * `SudokuError::Unsolvable` If the carved board has no solution.
    pub fn carve_unchecked(&mut self, solution: &SudokuGrid, difficulty: f64)
            -> SudokuResult<CarvedPuzzle> {
        let puzzle = self.carve_board(solution, difficulty)?;
        let found = BacktrackingSolver.solve_any_required(&puzzle)?;

        Ok(CarvedPuzzle {
            puzzle,
            solution: found
        })
    }
}
