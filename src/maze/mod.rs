//! Grid maps and level data.
//!
//! A level is a rectangular grid of cell codes. The grid is built once by the
//! loader, validated, and then only read for the lifetime of the level.
//!
//! # Level format
//!
//! Levels are JSON arrays of rows, each row an array of cell codes:
//!
//! ```text
//! [[2, 2, 2, 2],
//!  [2, "D", 1, 2],
//!  [2, 2, "A", 2],
//!  [2, 2, 2, 2]]
//! ```
//!
//! - `1` is open floor
//! - any other number is a wall variant
//! - `"D"` is the start cell (exactly one)
//! - `"A"` is an exit cell (at least one)

pub mod loader;

use serde::Deserialize;

use crate::error::{MazeError, Result};

/// Represents a cell in the maze grid
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Row index of the cell
    pub row: usize,
    /// Column index of the cell
    pub col: usize,
}

impl Cell {
    /// Creates a new Cell with the given coordinates
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Classification of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Walkable floor (code `1`).
    Open,
    /// A wall variant; the code selects the wall style in the renderer.
    Wall(i64),
    /// The player's spawn cell (`"D"`).
    Start,
    /// A level exit (`"A"`).
    Exit,
}

impl CellKind {
    /// Whether this cell stops movement and rays.
    pub fn is_wall(self) -> bool {
        matches!(self, CellKind::Wall(_))
    }

    /// Classifies a numeric code. `1` is open floor, everything else is a wall.
    pub fn from_code(code: f64) -> Self {
        if code == 1.0 {
            CellKind::Open
        } else {
            CellKind::Wall(code as i64)
        }
    }

    /// Classifies a string marker.
    ///
    /// Numeric strings follow the numeric rule so `"1"` and `1` mean the same
    /// thing. Returns `None` for any other text.
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "D" => Some(CellKind::Start),
            "A" => Some(CellKind::Exit),
            other => other.trim().parse::<f64>().ok().map(Self::from_code),
        }
    }
}

/// Cell code as it appears in a level document.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawCell {
    Number(f64),
    Text(String),
}

/// An immutable, validated level grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMap {
    level: u32,
    width: usize,
    height: usize,
    cells: Vec<CellKind>,
    start: Cell,
    exits: Vec<Cell>,
}

impl GridMap {
    /// Parses and validates a level document.
    ///
    /// # Errors
    /// Any malformed document is rejected as a whole: bad JSON, ragged rows,
    /// unknown markers, or a missing start or exit.
    pub fn parse(level: u32, raw: &str) -> Result<Self> {
        let rows: Vec<Vec<RawCell>> =
            serde_json::from_str(raw).map_err(|source| MazeError::Json { level, source })?;

        let mut kinds = Vec::with_capacity(rows.len());
        for (row_idx, row) in rows.into_iter().enumerate() {
            let mut kind_row = Vec::with_capacity(row.len());
            for (col_idx, raw_cell) in row.into_iter().enumerate() {
                let kind = match raw_cell {
                    RawCell::Number(code) => CellKind::from_code(code),
                    RawCell::Text(marker) => {
                        CellKind::from_marker(&marker).ok_or_else(|| MazeError::InvalidCell {
                            level,
                            row: row_idx,
                            col: col_idx,
                            code: marker.clone(),
                        })?
                    }
                };
                kind_row.push(kind);
            }
            kinds.push(kind_row);
        }

        Self::from_rows(level, kinds)
    }

    /// Builds a grid from already classified rows.
    pub fn from_rows(level: u32, rows: Vec<Vec<CellKind>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(MazeError::EmptyMap { level });
        }

        let mut cells = Vec::with_capacity(width * height);
        let mut starts = Vec::new();
        let mut exits = Vec::new();

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(MazeError::RaggedRow {
                    level,
                    row: row_idx,
                    expected: width,
                    found: row.len(),
                });
            }
            for (col_idx, kind) in row.into_iter().enumerate() {
                match kind {
                    CellKind::Start => starts.push(Cell::new(row_idx, col_idx)),
                    CellKind::Exit => exits.push(Cell::new(row_idx, col_idx)),
                    _ => {}
                }
                cells.push(kind);
            }
        }

        let start = match starts.as_slice() {
            [] => return Err(MazeError::MissingStart { level }),
            [start] => *start,
            many => {
                return Err(MazeError::MultipleStarts {
                    level,
                    count: many.len(),
                });
            }
        };
        if exits.is_empty() {
            return Err(MazeError::MissingExit { level });
        }

        Ok(Self {
            level,
            width,
            height,
            cells,
            start,
            exits,
        })
    }

    /// The level index this grid was loaded for.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)` in cells.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// The start cell.
    pub fn start(&self) -> Cell {
        self.start
    }

    /// All exit cells in row-major order.
    pub fn exits(&self) -> &[Cell] {
        &self.exits
    }

    /// Looks up a cell, returning `None` outside the grid.
    pub fn get(&self, cell: Cell) -> Option<CellKind> {
        if cell.row < self.height && cell.col < self.width {
            Some(self.cells[cell.row * self.width + cell.col])
        } else {
            None
        }
    }

    /// Whether the cell is inside the grid and is a wall.
    pub fn is_wall(&self, cell: Cell) -> bool {
        self.get(cell).is_some_and(CellKind::is_wall)
    }

    /// Iterates over every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, CellKind)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, kind)| (Cell::new(idx / self.width, idx % self.width), *kind))
    }
}
