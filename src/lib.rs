// Code lints

#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused_import_braces)]
#![warn(unused_lifetimes)]
#![warn(unused_qualifications)]

// Doc lints

#![warn(missing_docs)]

//! This crate implements a self-contained Sudoku puzzle engine. It supports
//! the following key features:
//!
//! * Parsing and printing Sudoku grids of configurable block dimensions
//! * Checking validity of grids according to standard Sudoku rules
//! * Solving grids with a most-constrained-cell-first backtracking search
//! * Probing whether a puzzle has a unique solution
//! * Generating ready-to-play puzzles for named difficulty tiers, with
//! structural difficulty scoring and a bounded retry policy
//!
//! Note that in this introduction we will mostly be using 4x4 Sudoku due to
//! their simpler nature. These are divided in 4 2x2 blocks, each with the
//! digits 1 to 4, just like each row and column.
//!
//! # Parsing and printing grids
//!
//! See [SudokuGrid::parse] for the exact format of a grid code. Codes can be
//! used to exchange grids, while pretty prints can be used to display a grid
//! in a clearer manner.
//!
//! ```
//! use sudoku_forge::SudokuGrid;
//!
//! let grid =
//!     SudokuGrid::parse("2x2;2, ,3, , ,1, , ,1, , ,4, ,2, ,3").unwrap();
//! println!("{}", grid);
//! ```
//!
//! # Checking validity
//!
//! [SudokuGrid::is_valid] checks that no row, column, or block contains a
//! duplicate digit. Blank cells never cause a conflict.
//!
//! ```
//! use sudoku_forge::SudokuGrid;
//!
//! let grid = SudokuGrid::parse("2x2;1,1, , , , , , , , , , , , , , ")
//!     .unwrap();
//! assert!(!grid.is_valid());
//! ```
//!
//! # Solving
//!
//! The [BacktrackingSolver](solver::BacktrackingSolver) fills every blank
//! cell, or reports that no completion exists. Calling
//! [solve](solver::BacktrackingSolver::solve) additionally probes for
//! uniqueness by searching in two different candidate orders.
//!
//! ```
//! use sudoku_forge::SudokuGrid;
//! use sudoku_forge::solver::{BacktrackingSolver, Solution};
//!
//! let puzzle =
//!     SudokuGrid::parse("2x2; , , ,4, ,4,3, , ,3, , , , ,1, ").unwrap();
//! let expected =
//!     SudokuGrid::parse("2x2;3,1,2,4,2,4,3,1,1,3,4,2,4,2,1,3").unwrap();
//!
//! assert_eq!(Solution::Unique(expected), BacktrackingSolver.solve(&puzzle));
//! ```
//!
//! # Generating puzzles
//!
//! The [PuzzleAssembler](assembly::PuzzleAssembler) is the entry point most
//! callers need. It owns a registry of difficulty tiers and hands out
//! complete [PuzzleBundle](assembly::PuzzleBundle)s.
//!
//! ```
//! use sudoku_forge::assembly::PuzzleAssembler;
//!
//! let assembler = PuzzleAssembler::new_default();
//! let bundle = assembler.generate_puzzle("beginner", Some(42)).unwrap();
//!
//! assert_eq!("beginner", bundle.difficulty_name());
//! assert!(bundle.board().is_valid());
//! assert!(bundle.solution().is_full());
//! ```
//!
//! # Note regarding performance
//!
//! Generating puzzles involves repeated solver runs. It is strongly
//! recommended to use at least `opt-level = 2`, even in tests that use
//! puzzle generation.

pub mod assembly;
pub mod difficulty;
pub mod error;
pub mod generator;
pub mod solver;
pub mod util;

use error::{
    SudokuError,
    SudokuParseError,
    SudokuParseResult,
    SudokuResult
};

use serde::{Deserialize, Serialize};

use std::convert::TryFrom;
use std::fmt::{self, Display, Error, Formatter};

/// A Sudoku grid is composed of cells that are organized into blocks of a
/// given width and height in a way that makes the entire grid a square.
/// Consequently, the number of blocks in a row is equal to the block height
/// and vice versa. Each cell may or may not be occupied by a number.
///
/// In ordinary Sudoku, the block width and height are both 3. Here, more
/// exotic dimensions are permitted, for example 4x4 blocks, which yield a
/// 16x16 grid.
///
/// A *valid* grid never has two equal non-blank digits sharing a row, column,
/// or block; this is checked by [SudokuGrid::is_valid].
///
/// `SudokuGrid` implements `Display`, but only grids with a size (that is,
/// width or height) of less than or equal to 9 can be displayed with digits
/// 1 to 9. Grids of all other sizes will raise an error.
///
/// Serialization uses the same code format as [SudokuGrid::parse], so grids
/// embedded in JSON or similar stay human-readable.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(into = "String", try_from = "String")]
pub struct SudokuGrid {
    block_width: usize,
    block_height: usize,
    size: usize,
    cells: Vec<Option<usize>>
}

pub(crate) fn index(column: usize, row: usize, size: usize) -> usize {
    row * size + column
}

fn to_char(cell: Option<usize>) -> char {
    if let Some(n) = cell {
        (b'0' + n as u8) as char
    }
    else {
        ' '
    }
}

fn line(grid: &SudokuGrid, start: char, thick_sep: char, thin_sep: char,
        segment: impl Fn(usize) -> char, pad: char, end: char) -> String {
    let size = grid.size();
    let mut result = String::new();

    for x in 0..size {
        if x == 0 {
            result.push(start);
        }
        else if x % grid.block_width == 0 {
            result.push(thick_sep);
        }
        else {
            result.push(thin_sep);
        }

        result.push(pad);
        result.push(segment(x));
        result.push(pad);
    }

    result.push(end);
    result
}

impl Display for SudokuGrid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let size = self.size();

        if size > 9 {
            return Err(Error::default());
        }

        for y in 0..size {
            let border = if y == 0 {
                line(self, '╔', '╦', '╤', |_| '═', '═', '╗')
            }
            else if y % self.block_height == 0 {
                line(self, '╠', '╬', '╪', |_| '═', '═', '╣')
            }
            else {
                line(self, '╟', '╫', '┼', |_| '─', '─', '╢')
            };
            let content = line(self, '║', '║', '│',
                |x| to_char(self.cells[index(x, y, size)]), ' ', '║');

            writeln!(f, "{}", border)?;
            writeln!(f, "{}", content)?;
        }

        f.write_str(&line(self, '╚', '╩', '╧', |_| '═', '═', '╝'))
    }
}

fn parse_dimensions(code: &str) -> Result<(usize, usize), SudokuParseError> {
    let parts: Vec<&str> = code.split('x').collect();

    if parts.len() != 2 {
        return Err(SudokuParseError::MalformedDimensions);
    }

    Ok((parts[0].parse()?, parts[1].parse()?))
}

impl SudokuGrid {

    /// Creates a new, empty Sudoku grid where the blocks have the given
    /// dimensions. The total width and height of the grid will be equal to
    /// the product of `block_width` and `block_height`.
    ///
    /// # Arguments
    ///
    /// * `block_width`: The horizontal dimension of one sub-block of the
    /// grid. To ensure a square grid, this is also the number of blocks that
    /// compose the grid vertically. For an ordinary Sudoku grid, this is 3.
    /// * `block_height`: The vertical dimension of one sub-block of the grid.
    /// To ensure a square grid, this is also the number of blocks that
    /// compose the grid horizontally. For an ordinary Sudoku grid, this is 3.
    ///
    /// # Errors
    ///
    /// `SudokuError::InvalidDimensions` if `block_width` or `block_height` is
    /// zero, or if the resulting grid would have only one cell.
    pub fn new(block_width: usize, block_height: usize)
            -> SudokuResult<SudokuGrid> {
        let size = block_width * block_height;

        if block_width == 0 || block_height == 0 || size <= 1 {
            return Err(SudokuError::InvalidDimensions);
        }

        Ok(SudokuGrid {
            block_width,
            block_height,
            size,
            cells: vec![None; size * size]
        })
    }

    /// Builds a grid from a row-major slice of cell values, where `0` denotes
    /// a blank cell. Any entry outside the range `[1, size]` is normalized to
    /// blank rather than rejected. The returned pair consists of the grid and
    /// the number of blank cells it ended up with (including normalized
    /// entries), which callers can use to validate their input afterwards.
    ///
    /// # Errors
    ///
    /// `SudokuError::InvalidDimensions` if the dimensions are invalid (see
    /// [SudokuGrid::new]) or `values` does not contain exactly `size²`
    /// entries.
    pub fn from_values(block_width: usize, block_height: usize,
            values: &[usize]) -> SudokuResult<(SudokuGrid, usize)> {
        let mut grid = SudokuGrid::new(block_width, block_height)?;
        let size = grid.size();

        if values.len() != size * size {
            return Err(SudokuError::InvalidDimensions);
        }

        let mut blanks = 0usize;

        for (i, &value) in values.iter().enumerate() {
            if value >= 1 && value <= size {
                grid.cells[i] = Some(value);
            }
            else {
                blanks += 1;
            }
        }

        Ok((grid, blanks))
    }

    /// Parses a code encoding a Sudoku grid. The code has to be of the format
    /// `<block_width>x<block_height>;<cells>` where `<cells>` is a
    /// comma-separated list of entries, which are either empty or a number.
    /// The entries are assigned left-to-right, top-to-bottom, where each row
    /// is completed before the next one is started. Whitespace in the entries
    /// is ignored to allow for more intuitive formatting. The number of
    /// entries must match the amount of cells in a grid with the given
    /// dimensions, i.e. it must be `(block_width · block_height)²`.
    ///
    /// As an example, the code `2x2;1, ,2, , ,3, ,4, , , ,3, ,1, ,2` parses
    /// to a 4x4 grid with nine filled cells.
    ///
    /// # Errors
    ///
    /// Any specialization of `SudokuParseError` (see that documentation).
    pub fn parse(code: &str) -> SudokuParseResult<SudokuGrid> {
        let parts: Vec<&str> = code.split(';').collect();

        if parts.len() != 2 {
            return Err(SudokuParseError::WrongNumberOfParts);
        }

        let (block_width, block_height) = parse_dimensions(parts[0])?;
        let mut grid = SudokuGrid::new(block_width, block_height)
            .map_err(|_| SudokuParseError::InvalidDimensions)?;
        let size = grid.size();
        let entries: Vec<&str> = parts[1].split(',').collect();

        if entries.len() != size * size {
            return Err(SudokuParseError::WrongNumberOfCells);
        }

        for (i, entry) in entries.iter().enumerate() {
            let entry = entry.trim();

            if entry.is_empty() {
                continue;
            }

            let number = entry.parse::<usize>()?;

            if number == 0 || number > size {
                return Err(SudokuParseError::InvalidNumber);
            }

            grid.cells[i] = Some(number);
        }

        Ok(grid)
    }

    /// Converts the grid into a `String` in a way that is consistent with
    /// [SudokuGrid::parse]. That is, a grid that is converted to a string and
    /// parsed again will not change.
    ///
    /// ```
    /// use sudoku_forge::SudokuGrid;
    ///
    /// let mut grid = SudokuGrid::new(3, 2).unwrap();
    ///
    /// // Just some arbitrary changes to create some content.
    /// grid.set_cell(1, 1, 4).unwrap();
    /// grid.set_cell(1, 2, 5).unwrap();
    ///
    /// let grid_str = grid.to_parseable_string();
    /// let grid_parsed = SudokuGrid::parse(grid_str.as_str()).unwrap();
    /// assert_eq!(grid, grid_parsed);
    /// ```
    pub fn to_parseable_string(&self) -> String {
        let mut s = format!("{}x{};", self.block_width, self.block_height);
        let cells = self.cells.iter()
            .map(|c| c.map(|n| n.to_string()).unwrap_or_default())
            .collect::<Vec<String>>()
            .join(",");
        s.push_str(cells.as_str());
        s
    }

    /// Converts the grid into a row-major vector of cell values, where `0`
    /// denotes a blank cell. This is the inverse of [SudokuGrid::from_values]
    /// and the format expected by most presentation layers.
    pub fn to_values(&self) -> Vec<usize> {
        self.cells.iter()
            .map(|c| c.unwrap_or(0))
            .collect()
    }

    /// Gets the width (number of columns) of one sub-block of the grid. To
    /// ensure a square grid, this is also the number of blocks that compose
    /// the grid vertically.
    pub fn block_width(&self) -> usize {
        self.block_width
    }

    /// Gets the height (number of rows) of one sub-block of the grid. To
    /// ensure a square grid, this is also the number of blocks that compose
    /// the grid horizontally.
    pub fn block_height(&self) -> usize {
        self.block_height
    }

    /// Gets the total size of the grid on one axis (horizontally or
    /// vertically). Since a square grid is enforced at construction time,
    /// this is guaranteed to be valid for both axes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Gets the content of the cell at the specified position.
    ///
    /// # Arguments
    ///
    /// * `column`: The column (x-coordinate) of the desired cell. Must be in
    /// the range `[0, size[`.
    /// * `row`: The row (y-coordinate) of the desired cell. Must be in the
    /// range `[0, size[`.
    ///
    /// # Errors
    ///
    /// If either `column` or `row` are not in the specified range. In that
    /// case, `SudokuError::OutOfBounds` is returned.
    pub fn get_cell(&self, column: usize, row: usize)
            -> SudokuResult<Option<usize>> {
        if column >= self.size || row >= self.size {
            Err(SudokuError::OutOfBounds)
        }
        else {
            Ok(self.cells[index(column, row, self.size)])
        }
    }

    /// Sets the content of the cell at the specified position to the given
    /// number. If the cell was not empty, the old number will be overwritten.
    ///
    /// # Arguments
    ///
    /// * `column`: The column (x-coordinate) of the assigned cell. Must be in
    /// the range `[0, size[`.
    /// * `row`: The row (y-coordinate) of the assigned cell. Must be in the
    /// range `[0, size[`.
    /// * `number`: The number to assign to the specified cell. Must be in the
    /// range `[1, size]`.
    ///
    /// # Errors
    ///
    /// * `SudokuError::OutOfBounds` If either `column` or `row` are not in
    /// the specified range.
    /// * `SudokuError::InvalidNumber` If `number` is not in the specified
    /// range.
    pub fn set_cell(&mut self, column: usize, row: usize, number: usize)
            -> SudokuResult<()> {
        if column >= self.size || row >= self.size {
            return Err(SudokuError::OutOfBounds);
        }

        if number == 0 || number > self.size {
            return Err(SudokuError::InvalidNumber);
        }

        self.cells[index(column, row, self.size)] = Some(number);
        Ok(())
    }

    /// Clears the content of the cell at the specified position, that is, if
    /// it contains a number, that number is removed. If the cell is already
    /// empty, it will be left that way.
    ///
    /// # Arguments
    ///
    /// * `column`: The column (x-coordinate) of the cleared cell. Must be in
    /// the range `[0, size[`.
    /// * `row`: The row (y-coordinate) of the cleared cell. Must be in the
    /// range `[0, size[`.
    ///
    /// # Errors
    ///
    /// If either `column` or `row` are not in the specified range. In that
    /// case, `SudokuError::OutOfBounds` is returned.
    pub fn clear_cell(&mut self, column: usize, row: usize)
            -> SudokuResult<()> {
        if column >= self.size || row >= self.size {
            return Err(SudokuError::OutOfBounds);
        }

        self.cells[index(column, row, self.size)] = None;
        Ok(())
    }

    /// Gets the index of the block which contains the cell at the specified
    /// position. Blocks are numbered left-to-right, top-to-bottom, so the
    /// top-left block has index 0 and the bottom-right block has index
    /// `size - 1`.
    ///
    /// # Errors
    ///
    /// If either `column` or `row` are not in the range `[0, size[`. In that
    /// case, `SudokuError::OutOfBounds` is returned.
    pub fn block_index(&self, column: usize, row: usize)
            -> SudokuResult<usize> {
        if column >= self.size || row >= self.size {
            return Err(SudokuError::OutOfBounds);
        }

        Ok((row / self.block_height) * self.block_height
            + column / self.block_width)
    }

    /// Gets the coordinates of all cells in the block with the given index,
    /// as `(column, row)` pairs in left-to-right, top-to-bottom order. See
    /// [SudokuGrid::block_index] for the numbering of blocks.
    ///
    /// # Errors
    ///
    /// If `block` is not in the range `[0, size[`. In that case,
    /// `SudokuError::OutOfBounds` is returned.
    pub fn block_cells(&self, block: usize)
            -> SudokuResult<Vec<(usize, usize)>> {
        if block >= self.size {
            return Err(SudokuError::OutOfBounds);
        }

        let start_row = (block / self.block_height) * self.block_height;
        let start_column = (block % self.block_height) * self.block_width;
        let mut cells = Vec::with_capacity(self.size);

        for y in start_row..(start_row + self.block_height) {
            for x in start_column..(start_column + self.block_width) {
                cells.push((x, y));
            }
        }

        Ok(cells)
    }

    /// Gets the coordinates of all cells in the given row, as
    /// `(column, row)` pairs in left-to-right order.
    ///
    /// # Errors
    ///
    /// If `row` is not in the range `[0, size[`. In that case,
    /// `SudokuError::OutOfBounds` is returned.
    pub fn row_cells(&self, row: usize) -> SudokuResult<Vec<(usize, usize)>> {
        if row >= self.size {
            return Err(SudokuError::OutOfBounds);
        }

        Ok((0..self.size).map(|column| (column, row)).collect())
    }

    /// Gets the coordinates of all cells in the given column, as
    /// `(column, row)` pairs in top-to-bottom order.
    ///
    /// # Errors
    ///
    /// If `column` is not in the range `[0, size[`. In that case,
    /// `SudokuError::OutOfBounds` is returned.
    pub fn column_cells(&self, column: usize)
            -> SudokuResult<Vec<(usize, usize)>> {
        if column >= self.size {
            return Err(SudokuError::OutOfBounds);
        }

        Ok((0..self.size).map(|row| (column, row)).collect())
    }

    /// Indicates whether this grid satisfies the standard Sudoku rules, that
    /// is, no row, column, or block contains the same digit twice. Blank
    /// cells are ignored. This is a pure O(size²) scan with no side effects.
    pub fn is_valid(&self) -> bool {
        let size = self.size;
        let mut rows = vec![vec![false; size]; size];
        let mut columns = vec![vec![false; size]; size];
        let mut blocks = vec![vec![false; size]; size];

        for row in 0..size {
            for column in 0..size {
                let cell = self.cells[index(column, row, size)];

                if let Some(number) = cell {
                    let block = (row / self.block_height) * self.block_height
                        + column / self.block_width;
                    let digit = number - 1;

                    if rows[row][digit] || columns[column][digit] ||
                            blocks[block][digit] {
                        return false;
                    }

                    rows[row][digit] = true;
                    columns[column][digit] = true;
                    blocks[block][digit] = true;
                }
            }
        }

        true
    }

    /// Counts the number of clues given by this grid. This is the number of
    /// non-empty cells. While on average Sudoku with less clues are harder,
    /// this is *not* a reliable measure of difficulty; see the
    /// [difficulty](crate::difficulty) module for a better estimate.
    pub fn count_clues(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Indicates whether this grid is full, i.e. every cell is filled with a
    /// number. In this case, [SudokuGrid::count_clues] returns the square of
    /// [SudokuGrid::size].
    pub fn is_full(&self) -> bool {
        !self.cells.iter().any(|c| c.is_none())
    }

    /// Indicates whether this grid is empty, i.e. no cell is filled with a
    /// number. In this case, [SudokuGrid::count_clues] returns 0.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_none())
    }

    /// Gets a reference to the vector which holds the cells. They are in
    /// left-to-right, top-to-bottom order, where rows are together.
    pub fn cells(&self) -> &Vec<Option<usize>> {
        &self.cells
    }
}

impl From<SudokuGrid> for String {
    fn from(grid: SudokuGrid) -> String {
        grid.to_parseable_string()
    }
}

impl TryFrom<String> for SudokuGrid {
    type Error = SudokuParseError;

    fn try_from(code: String) -> SudokuParseResult<SudokuGrid> {
        SudokuGrid::parse(&code)
    }
}
