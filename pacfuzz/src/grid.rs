// Copyright 2025 pacfuzz developers
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use core::{
    fmt::{self, Display},
    str::FromStr,
};

use rand::Rng;

use crate::{Alphabet, Error};

/// A rectangular map: every row has the same width.
///
/// A grid may have no rows at all, or rows of width zero; all operations
/// accept both shapes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: Vec<Vec<char>>,
}

impl Grid {
    /// Build a grid from rows of symbols.
    ///
    /// # Errors
    ///
    /// Fails when the rows are not all of the same width.
    pub fn new(rows: Vec<Vec<char>>) -> Result<Self, Error> {
        if let Some(first) = rows.first() {
            let expected = first.len();
            if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
                return Err(Error::RaggedGrid {
                    row,
                    width: r.len(),
                    expected,
                });
            }
        }
        Ok(Self { rows })
    }

    /// Build a grid from textual rows, one `char` per cell.
    ///
    /// # Errors
    ///
    /// Fails when the rows are not all of the same width.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, Error> {
        Self::new(rows.iter().map(|r| r.as_ref().chars().collect()).collect())
    }

    /// Parse a map file: one row per line, surrounding whitespace and
    /// trailing blank lines ignored, every cell checked against `alphabet`.
    ///
    /// # Errors
    ///
    /// Fails on ragged rows or cells outside `alphabet`.
    pub fn parse(text: &str, alphabet: &Alphabet) -> Result<Self, Error> {
        let mut rows: Vec<&str> = text.lines().map(str::trim).collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        alphabet.validate(rows.iter().flat_map(|r| r.chars()))?;
        Self::from_rows(&rows)
    }

    /// The rows, top to bottom.
    #[must_use]
    pub fn rows(&self) -> &[Vec<char>] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Common row width; zero when there are no rows.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Whether the grid has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether there is no cell to address (no rows, or rows of width zero).
    #[must_use]
    pub fn has_no_cells(&self) -> bool {
        self.is_empty() || self.width() == 0
    }

    /// Copy with `row` inserted before row `pos` (`pos == row_count` appends).
    #[must_use]
    #[track_caller]
    pub fn with_row(&self, pos: usize, row: Vec<char>) -> Self {
        assert!(pos <= self.row_count(), "row position {pos} out of 0..={}", self.row_count());
        assert!(
            self.is_empty() || row.len() == self.width(),
            "row of width {} does not fit grid of width {}",
            row.len(),
            self.width()
        );
        let mut rows = self.rows.clone();
        rows.insert(pos, row);
        Self { rows }
    }

    /// Copy with one cell spliced into every row before column `pos`;
    /// `column` holds the new cells, top to bottom.
    #[must_use]
    #[track_caller]
    pub fn with_column(&self, pos: usize, column: &[char]) -> Self {
        assert!(pos <= self.width(), "column position {pos} out of 0..={}", self.width());
        assert_eq!(column.len(), self.row_count(), "column height mismatch");
        let rows = self
            .rows
            .iter()
            .zip(column)
            .map(|(row, &cell)| {
                let mut row = row.clone();
                row.insert(pos, cell);
                row
            })
            .collect();
        Self { rows }
    }

    /// Copy without row `ix`.
    #[must_use]
    #[track_caller]
    pub fn without_row(&self, ix: usize) -> Self {
        assert!(ix < self.row_count(), "row index {ix} out of 0..{}", self.row_count());
        let mut rows = self.rows.clone();
        rows.remove(ix);
        Self { rows }
    }

    /// Copy without column `ix`. Rows left with no cells are dropped,
    /// so removing the only column yields the empty grid.
    #[must_use]
    #[track_caller]
    pub fn without_column(&self, ix: usize) -> Self {
        assert!(ix < self.width(), "column index {ix} out of 0..{}", self.width());
        let rows = self
            .rows
            .iter()
            .filter_map(|row| {
                let mut row = row.clone();
                row.remove(ix);
                (!row.is_empty()).then_some(row)
            })
            .collect();
        Self { rows }
    }

    /// Copy with cell `(row, col)` overwritten by `symbol`.
    #[must_use]
    #[track_caller]
    pub fn with_cell(&self, row: usize, col: usize, symbol: char) -> Self {
        assert!(
            row < self.row_count() && col < self.width(),
            "cell ({row}, {col}) out of {}x{}",
            self.row_count(),
            self.width()
        );
        let mut rows = self.rows.clone();
        rows[row][col] = symbol;
        Self { rows }
    }
}

impl FromStr for Grid {
    type Err = Error;

    /// Parse newline-separated rows without any alphabet check.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s.lines().collect();
        Self::from_rows(&rows)
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            row.iter().try_for_each(|c| write!(f, "{c}"))?;
        }
        Ok(())
    }
}

/// Structural edits of a [`Grid`].
///
/// Like [`SequenceMutator`](crate::SequenceMutator), every operator is total
/// and keeps the grid rectangular.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridMutator {
    /// Insert a row of random cells; a 1x1 grid when there were no rows.
    AddRow,
    /// Insert a column of random cells; same as `AddRow` when there are no rows.
    AddColumn,
    /// Remove a random row; no-op when there are no rows.
    DeleteRow,
    /// Remove a random column, dropping rows that become empty; no-op without cells.
    DeleteColumn,
    /// Overwrite a random cell; no-op without cells.
    ReplaceCell,
}

impl GridMutator {
    /// All operators, in a fixed order.
    pub const ALL: [Self; 5] = [
        Self::AddRow,
        Self::AddColumn,
        Self::DeleteRow,
        Self::DeleteColumn,
        Self::ReplaceCell,
    ];

    /// Short kebab-case name, as accepted by [`FromStr`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::AddRow => "add-row",
            Self::AddColumn => "add-column",
            Self::DeleteRow => "delete-row",
            Self::DeleteColumn => "delete-column",
            Self::ReplaceCell => "replace-cell",
        }
    }

    /// Apply the operator to a copy of `grid`.
    pub fn apply<R: Rng + ?Sized>(self, grid: &Grid, alphabet: &Alphabet, rng: &mut R) -> Grid {
        match self {
            Self::AddRow => add_row(grid, alphabet, rng),
            Self::AddColumn if grid.is_empty() => add_row(grid, alphabet, rng),
            Self::AddColumn => {
                let pos = rng.gen_range(0..=grid.width());
                let column: Vec<char> =
                    (0..grid.row_count()).map(|_| alphabet.choose(rng)).collect();
                grid.with_column(pos, &column)
            }
            Self::DeleteRow if grid.is_empty() => grid.clone(),
            Self::DeleteRow => grid.without_row(rng.gen_range(0..grid.row_count())),
            Self::DeleteColumn | Self::ReplaceCell if grid.has_no_cells() => grid.clone(),
            Self::DeleteColumn => grid.without_column(rng.gen_range(0..grid.width())),
            Self::ReplaceCell => {
                let row = rng.gen_range(0..grid.row_count());
                let col = rng.gen_range(0..grid.width());
                grid.with_cell(row, col, alphabet.choose(rng))
            }
        }
    }
}

fn add_row<R: Rng + ?Sized>(grid: &Grid, alphabet: &Alphabet, rng: &mut R) -> Grid {
    let pos = rng.gen_range(0..=grid.row_count());
    let width = if grid.is_empty() { 1 } else { grid.width() };
    let row = (0..width).map(|_| alphabet.choose(rng)).collect();
    grid.with_row(pos, row)
}

impl FromStr for GridMutator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| format!("unknown grid mutator {s:?}"))
    }
}
