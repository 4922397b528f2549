#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure level compiler that resolves level data into grid coordinates.
//!
//! The playing field is a square grid of rounded [`Coordinate`]s. Level data
//! references cells of that grid by `[row, column]` index; compiling a level
//! yields the ordered path the character should follow and the complementary
//! set of hazard cells.

use std::collections::HashSet;

use path_puzzle_core::{
    CatalogError, CellCoord, Coordinate, CoordinateKey, Facing, LevelError, LevelSpec,
};
use tracing::debug;

/// Every addressable position of the playing field in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    axis_len: usize,
    increment: f64,
    points: Vec<Coordinate>,
}

impl Grid {
    /// Number of cells along each axis.
    #[must_use]
    pub const fn axis_len(&self) -> usize {
        self.axis_len
    }

    /// Spacing between neighbouring cells in world units.
    #[must_use]
    pub const fn increment(&self) -> f64 {
        self.increment
    }

    /// All grid coordinates; the row index selects x and the column selects z.
    #[must_use]
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Reports whether the grid contains no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Resolves a cell index pair into its coordinate.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<Coordinate> {
        self.index(cell)
            .and_then(|index| self.points.get(index).copied())
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        if row < self.axis_len && column < self.axis_len {
            Some(row * self.axis_len + column)
        } else {
            None
        }
    }
}

/// Builds the grid spanning `-half_extent..=half_extent` on both axes.
///
/// `half_extent` must be a whole multiple of a positive `increment`, the
/// increment a whole number of ten-thousandths, and the axis no longer than
/// `MAX_AXIS_LEN` cells; the caller is responsible for those preconditions
/// (see `SessionConfig::validate`). Positions are derived from integer step
/// counts and rounded to four decimal places, so equal cells always compare
/// equal.
#[must_use]
pub fn build_grid(half_extent: f64, increment: f64) -> Grid {
    debug_assert!(increment > 0.0, "grid increment must be positive");
    let steps = (2.0 * half_extent / increment).round() as usize;
    let axis_len = steps + 1;

    let axis: Vec<f64> = (0..axis_len)
        .map(|step| -half_extent + step as f64 * increment)
        .collect();

    let mut points = Vec::with_capacity(axis_len * axis_len);
    for &x in &axis {
        for &z in &axis {
            points.push(Coordinate::rounded(x, z));
        }
    }

    Grid {
        axis_len,
        increment,
        points,
    }
}

/// Ordered route from the start cell to the goal cell. Never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct PathCoordinates {
    cells: Vec<Coordinate>,
}

impl PathCoordinates {
    /// Cell the character starts on.
    #[must_use]
    pub fn start(&self) -> Coordinate {
        self.cells[0]
    }

    /// Cell the character must reach.
    #[must_use]
    pub fn goal(&self) -> Coordinate {
        self.cells[self.cells.len() - 1]
    }

    /// Path cells in travel order.
    #[must_use]
    pub fn as_slice(&self) -> &[Coordinate] {
        &self.cells
    }

    /// Number of cells on the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`; paths hold at least one cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Grid cells that are not part of the path, in grid order.
#[derive(Clone, Debug, PartialEq)]
pub struct HazardCoordinates {
    cells: Vec<Coordinate>,
}

impl HazardCoordinates {
    /// Hazard cells in grid order.
    #[must_use]
    pub fn as_slice(&self) -> &[Coordinate] {
        &self.cells
    }

    /// Number of hazard cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the level has no hazards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reports whether the coordinate is a hazard.
    #[must_use]
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        self.cells.iter().any(|cell| cell.key() == coordinate.key())
    }
}

/// Resolves the level's index pairs into grid coordinates, preserving order.
pub fn compile_path(spec: &LevelSpec, grid: &Grid) -> Result<PathCoordinates, LevelError> {
    if spec.path().is_empty() {
        return Err(LevelError::EmptyPath);
    }

    let cells = spec
        .path()
        .iter()
        .map(|&cell| {
            grid.get(cell).ok_or(LevelError::IndexOutOfRange {
                row: cell.row(),
                column: cell.column(),
                axis_len: grid.axis_len(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PathCoordinates { cells })
}

/// Computes `grid \ path` by coordinate value without mutating the grid.
#[must_use]
pub fn compile_hazards(path: &PathCoordinates, grid: &Grid) -> HazardCoordinates {
    let on_path: HashSet<CoordinateKey> = path.as_slice().iter().map(Coordinate::key).collect();
    let cells = grid
        .points()
        .iter()
        .copied()
        .filter(|point| !on_path.contains(&point.key()))
        .collect();
    HazardCoordinates { cells }
}

/// Fully resolved level ready to be played.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledLevel {
    index: usize,
    facing: Facing,
    path: PathCoordinates,
    hazards: HazardCoordinates,
}

impl CompiledLevel {
    /// Position of the level within the catalog.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Facing the character starts with.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Route from start to goal.
    #[must_use]
    pub const fn path(&self) -> &PathCoordinates {
        &self.path
    }

    /// Cells that fail the level when entered.
    #[must_use]
    pub const fn hazards(&self) -> &HazardCoordinates {
        &self.hazards
    }
}

/// Compiles a level, checking that its path fits the available platforms.
pub fn compile_level(
    index: usize,
    spec: &LevelSpec,
    grid: &Grid,
    platform_slots: usize,
) -> Result<CompiledLevel, LevelError> {
    let path = compile_path(spec, grid)?;
    if path.len() > platform_slots {
        return Err(LevelError::TooManyPlatforms {
            required: path.len(),
            available: platform_slots,
        });
    }
    let hazards = compile_hazards(&path, grid);
    debug!(
        level = index,
        path = path.len(),
        hazards = hazards.len(),
        "compiled level"
    );
    Ok(CompiledLevel {
        index,
        facing: spec.facing(),
        path,
        hazards,
    })
}

/// Ordered, validated list of levels played during a session.
#[derive(Clone, Debug)]
pub struct LevelCatalog {
    specs: Vec<LevelSpec>,
    grid: Grid,
    platform_slots: usize,
}

impl LevelCatalog {
    /// Validates every level against the grid so broken data fails at load time.
    pub fn load(
        specs: Vec<LevelSpec>,
        grid: Grid,
        platform_slots: usize,
    ) -> Result<Self, CatalogError> {
        if specs.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (index, spec) in specs.iter().enumerate() {
            let _ = compile_level(index, spec, &grid, platform_slots)
                .map_err(|source| CatalogError::InvalidLevel { index, source })?;
        }
        Ok(Self {
            specs,
            grid,
            platform_slots,
        })
    }

    /// Number of levels in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Always `false`; loaded catalogs hold at least one level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Grid shared by every level.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Number of platform slots a path may occupy.
    #[must_use]
    pub const fn platform_slots(&self) -> usize {
        self.platform_slots
    }

    /// Index of the level following `current`, wrapping to the first level.
    #[must_use]
    pub fn next_index(&self, current: usize) -> usize {
        if current + 1 < self.specs.len() {
            current + 1
        } else {
            0
        }
    }

    /// Compiles the first level of the catalog.
    pub fn compile_first(&self) -> Result<CompiledLevel, LevelError> {
        self.compile_at(0)
    }

    /// Compiles the level that follows `current`.
    pub fn compile_next(&self, current: usize) -> Result<CompiledLevel, LevelError> {
        self.compile_at(self.next_index(current))
    }

    fn compile_at(&self, index: usize) -> Result<CompiledLevel, LevelError> {
        compile_level(index, &self.specs[index], &self.grid, self.platform_slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_includes_both_endpoints() {
        let grid = build_grid(0.36, 0.12);
        let points = grid.points();
        assert_eq!(points.first(), Some(&Coordinate::rounded(-0.36, -0.36)));
        assert_eq!(points.last(), Some(&Coordinate::rounded(0.36, 0.36)));
    }

    #[test]
    fn cells_index_rows_along_x_and_columns_along_z() {
        let grid = build_grid(0.36, 0.12);
        assert_eq!(
            grid.get(CellCoord::new(1, 2)),
            Some(Coordinate::rounded(-0.24, -0.12))
        );
        assert_eq!(grid.get(CellCoord::new(7, 0)), None);
    }

    #[test]
    fn grid_of_zero_extent_is_single_cell() {
        let grid = build_grid(0.0, 0.12);
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.points()[0], Coordinate::rounded(0.0, 0.0));
    }

    #[test]
    fn hazards_contains_matches_by_value() {
        let grid = build_grid(0.12, 0.12);
        let spec = LevelSpec::new(Facing::North, vec![CellCoord::new(1, 1)]);
        let path = compile_path(&spec, &grid).expect("path");
        let hazards = compile_hazards(&path, &grid);
        assert!(!hazards.contains(Coordinate::rounded(0.0, 0.0)));
        assert!(hazards.contains(Coordinate::rounded(0.12 + 1e-7, -0.12)));
    }
}
