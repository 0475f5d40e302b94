//! This module contains some error and result definitions used in this crate.

use std::fmt::{self, Display, Formatter};
use std::num::ParseIntError;

/// Miscellaneous errors that can occur on some methods in the
/// [root module](../index.html) as well as the [generator](crate::generator)
/// and [assembly](crate::assembly) modules. This does not exclude errors that
/// occur when parsing Sudoku grids, see [SudokuParseError] for that.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SudokuError {

    /// Indicates that the dimensions specified for a created Sudoku grid are
    /// invalid. This is the case if a block dimension is zero or the resulting
    /// grid would have only one cell.
    InvalidDimensions,

    /// Indicates that some number is invalid for the size of the grid in
    /// question. This is the case if it is less than 1 or greater than the
    /// size.
    InvalidNumber,

    /// Indicates that the specified coordinates (column and row) lie outside
    /// the Sudoku grid in question. This is the case if they are greater than
    /// or equal to the size.
    OutOfBounds,

    /// Indicates that a target difficulty handed to the generator lies
    /// outside the open interval (0, 1). Raised before any generation work is
    /// done.
    InvalidDifficulty,

    /// Indicates that a difficulty tier name is not present in the registry
    /// that was asked for it. The requested name is attached.
    UnknownTier(String),

    /// Indicates that a caller asserted a board to be solvable, but the
    /// solver found no valid completion.
    Unsolvable,

    /// Indicates that a carved puzzle candidate admits more than one solution
    /// according to the uniqueness probe. Recoverable: the retry policy in
    /// the [assembly](crate::assembly) module reacts by carving again.
    AmbiguousPuzzle
}

/// Syntactic sugar for `Result<V, SudokuError>`.
pub type SudokuResult<V> = Result<V, SudokuError>;

/// An enumeration of the errors that may occur when parsing a [SudokuGrid]
/// code.
///
/// [SudokuGrid]: crate::SudokuGrid
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SudokuParseError {

    /// Indicates that the code has the wrong number of parts, which are
    /// separated by semicolons. The code should have two parts: dimensions and
    /// cells (separated by ';'), so if the code does not contain exactly one
    /// semicolon, this error will be returned.
    WrongNumberOfParts,

    /// Indicates that the number of cells (which are separated by commas) does
    /// not equal the number deduced from the dimensions.
    WrongNumberOfCells,

    /// Indicates that the dimensions have the wrong format. They should be of
    /// the form `<block_width>x<block_height>`, so if the amount of 'x's in
    /// the dimension string is not exactly one, this error will be raised.
    MalformedDimensions,

    /// Indicates that the provided dimensions are invalid (i.e. at least one
    /// is zero, or the grid would have only one cell).
    InvalidDimensions,

    /// Indicates that one of the numbers (dimension or cell content) could not
    /// be parsed.
    NumberFormatError,

    /// Indicates that a cell is filled with an invalid number (0 or more than
    /// the grid size).
    InvalidNumber
}

/// Syntactic sugar for `Result<V, SudokuParseError>`.
pub type SudokuParseResult<V> = Result<V, SudokuParseError>;

impl From<ParseIntError> for SudokuParseError {
    fn from(_: ParseIntError) -> Self {
        SudokuParseError::NumberFormatError
    }
}

impl Display for SudokuParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let message = match self {
            SudokuParseError::WrongNumberOfParts =>
                "expected exactly one semicolon in the grid code",
            SudokuParseError::WrongNumberOfCells =>
                "number of cell entries does not match the dimensions",
            SudokuParseError::MalformedDimensions =>
                "dimensions must have the form <block_width>x<block_height>",
            SudokuParseError::InvalidDimensions =>
                "block dimensions must be positive and yield more than one \
                cell",
            SudokuParseError::NumberFormatError =>
                "a dimension or cell entry is not a valid number",
            SudokuParseError::InvalidNumber =>
                "a cell entry is zero or greater than the grid size"
        };
        f.write_str(message)
    }
}
