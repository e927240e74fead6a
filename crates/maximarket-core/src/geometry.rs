//! Grid geometry and coordinate conversion for store plans.
//!
//! Maps pixel coordinates on the plan image (0,0 at top-left, +Y down) to
//! discrete grid cells and back. Column index `x` grows to the right, row
//! index `y` grows downward, matching the image.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Default number of grid rows for a new store plan.
pub const DEFAULT_ROWS: u32 = 24;

/// Default number of grid columns for a new store plan.
pub const DEFAULT_COLS: u32 = 47;

/// A discrete grid coordinate.
///
/// Cells are plain values. Coordinates are signed because pixel conversion is
/// not clamped, so a click left of or above the plan yields a negative cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two cell coordinates.
    pub fn distance_to(&self, other: &Cell) -> f64 {
        let dx = f64::from(other.x) - f64::from(self.x);
        let dy = f64::from(other.y) - f64::from(self.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Comma-joined `"x,y"` form used as a JSON object key in project files.
    pub fn to_key(&self) -> String {
        format!("{},{}", self.x, self.y)
    }

    /// Parses the `"x,y"` key form. Surrounding whitespace around each number
    /// is tolerated; anything else returns `None`.
    pub fn parse_key(key: &str) -> Option<Self> {
        let (x, y) = key.split_once(',')?;
        let x = x.trim().parse().ok()?;
        let y = y.trim().parse().ok()?;
        Some(Self { x, y })
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Row and column counts of a store grid. Both are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridDimensions {
    rows: u32,
    cols: u32,
}

impl GridDimensions {
    /// Creates grid dimensions, rejecting zero rows or columns.
    pub fn new(rows: u32, cols: u32) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidDimensions { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Tests `0 <= x < cols` and `0 <= y < rows`.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.cols && (cell.y as u32) < self.rows
    }

    /// Like [`contains`](Self::contains), but as a `Result` for `?` chains.
    pub fn check(&self, cell: Cell) -> Result<Cell, GridError> {
        if self.contains(cell) {
            Ok(cell)
        } else {
            Err(GridError::OutOfBounds {
                cell,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
        }
    }
}

impl fmt::Display for GridDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rows x {} columns", self.rows, self.cols)
    }
}

/// Pixel mapping of a grid laid over a plan image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    dims: GridDimensions,
    pixel_width: f64,
    pixel_height: f64,
}

impl GridGeometry {
    /// Creates a geometry for a plan of `pixel_width` x `pixel_height` pixels.
    pub fn new(dims: GridDimensions, pixel_width: f64, pixel_height: f64) -> Result<Self, GridError> {
        let valid = |v: f64| v.is_finite() && v >= 0.0;
        if !valid(pixel_width) || !valid(pixel_height) {
            return Err(GridError::InvalidPixelSize {
                width: pixel_width,
                height: pixel_height,
            });
        }
        Ok(Self {
            dims,
            pixel_width,
            pixel_height,
        })
    }

    /// Creates a geometry sized to the plan image at `path`.
    ///
    /// Only the image header is read, the pixels are not decoded.
    pub fn from_image(path: impl AsRef<Path>, dims: GridDimensions) -> Result<Self, GridError> {
        let path = path.as_ref();
        let (width, height) = image::image_dimensions(path).map_err(|e| GridError::Image {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::new(dims, f64::from(width), f64::from(height))
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.dims
    }

    pub fn rows(&self) -> u32 {
        self.dims.rows
    }

    pub fn cols(&self) -> u32 {
        self.dims.cols
    }

    pub fn pixel_width(&self) -> f64 {
        self.pixel_width
    }

    pub fn pixel_height(&self) -> f64 {
        self.pixel_height
    }

    /// Returns a copy with different row/column counts over the same plan.
    pub fn with_dimensions(&self, dims: GridDimensions) -> Self {
        Self { dims, ..*self }
    }

    /// Width and height of one cell in pixels.
    pub fn cell_size(&self) -> (f64, f64) {
        (
            self.pixel_width / f64::from(self.dims.cols),
            self.pixel_height / f64::from(self.dims.rows),
        )
    }

    /// Converts a pixel position to the cell under it.
    ///
    /// The result is not clamped to the grid; use [`GridGeometry::contains`]
    /// or [`GridGeometry::cell_at`] before trusting it.
    pub fn pixel_to_cell(&self, px: f64, py: f64) -> Cell {
        let (cell_w, cell_h) = self.cell_size();
        Cell::new((px / cell_w).floor() as i32, (py / cell_h).floor() as i32)
    }

    /// Like [`GridGeometry::pixel_to_cell`] but `None` outside the grid.
    pub fn cell_at(&self, px: f64, py: f64) -> Option<Cell> {
        let cell = self.pixel_to_cell(px, py);
        self.contains(cell).then_some(cell)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.dims.contains(cell)
    }

    /// Pixel position of the centre of `cell`.
    pub fn cell_to_pixel_center(&self, cell: Cell) -> (f64, f64) {
        let (cell_w, cell_h) = self.cell_size();
        (
            (f64::from(cell.x) + 0.5) * cell_w,
            (f64::from(cell.y) + 0.5) * cell_h,
        )
    }

    /// Offsets of the grid overlay lines.
    ///
    /// Returns `(horizontal, vertical)`: `rows + 1` y offsets and `cols + 1`
    /// x offsets, both running from 0 to the full plan size.
    pub fn grid_lines(&self) -> (Vec<f64>, Vec<f64>) {
        let (cell_w, cell_h) = self.cell_size();
        let horizontal = (0..=self.dims.rows).map(|r| f64::from(r) * cell_h).collect();
        let vertical = (0..=self.dims.cols).map(|c| f64::from(c) * cell_w).collect();
        (horizontal, vertical)
    }
}

impl fmt::Display for GridGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (cell_w, cell_h) = self.cell_size();
        write!(
            f,
            "{} over {:.0}x{:.0} px | Cell: {:.2}x{:.2} px",
            self.dims, self.pixel_width, self.pixel_height, cell_w, cell_h
        )
    }
}
