//! Static level geometry
//!
//! The level is a grid of square tiles built once from a character grid.
//! Queries index straight into the grid, so their cost depends on the size
//! of the query rectangle rather than the size of the level.

use std::ops::Range;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::geom::Rect;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH, TILE_SIZE};
use crate::error::LevelError;

/// Surface a tile is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileMaterial {
    Sand,
    Stone,
    Cave,
}

impl TileMaterial {
    /// Map a level character to a material (unknown characters leave a hole)
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'G' => Some(TileMaterial::Sand),
            'B' => Some(TileMaterial::Stone),
            'W' => Some(TileMaterial::Cave),
            _ => None,
        }
    }

    pub fn kind(self) -> TileKind {
        match self {
            TileMaterial::Sand => TileKind::Passable,
            TileMaterial::Stone | TileMaterial::Cave => TileKind::Blocking,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    Passable,
    Blocking,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaticTile {
    pub material: TileMaterial,
    pub kind: TileKind,
    /// Top-left corner in world space
    pub world_pos: Vec2,
}

impl StaticTile {
    pub fn rect(&self) -> Rect {
        Rect::new(self.world_pos, Vec2::splat(TILE_SIZE))
    }

    #[inline]
    pub fn is_blocking(&self) -> bool {
        self.kind == TileKind::Blocking
    }
}

/// Raw character grid, one entry per cell
#[derive(Debug, Clone, Default)]
pub struct LevelGrid {
    pub rows: Vec<Vec<char>>,
}

impl LevelGrid {
    /// Parse a grid where each line is a row of tile characters
    pub fn parse(text: &str) -> Self {
        let rows = text
            .trim_end()
            .lines()
            .map(|line| line.trim_end_matches('\r').chars().collect())
            .collect();
        Self { rows }
    }

    /// Parse a CSV export whose first line is a header row. Each cell
    /// contributes its first non-blank character, or a hole when empty.
    pub fn from_csv(text: &str) -> Self {
        let rows = text
            .trim_end()
            .lines()
            .skip(1)
            .map(|line| {
                line.trim_end_matches('\r')
                    .split(',')
                    .map(|cell| cell.trim().chars().next().unwrap_or(' '))
                    .collect()
            })
            .collect();
        Self { rows }
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

/// Immutable tile map
#[derive(Debug, Clone)]
pub struct StaticMap {
    cols: usize,
    rows: usize,
    cells: Vec<Option<StaticTile>>,
}

impl StaticMap {
    /// Build the map from a character grid. Unknown characters produce no tile.
    pub fn from_grid(grid: &LevelGrid) -> Result<Self, LevelError> {
        let cols = grid.width();
        let rows = grid.height();
        if cols == 0 {
            return Err(LevelError::Empty);
        }

        let mut cells = vec![None; cols * rows];
        let mut placed = 0usize;
        for (row, line) in grid.rows.iter().enumerate() {
            for (col, &c) in line.iter().enumerate() {
                if let Some(material) = TileMaterial::from_char(c) {
                    cells[row * cols + col] = Some(StaticTile {
                        material,
                        kind: material.kind(),
                        world_pos: Vec2::new(col as f32, row as f32) * TILE_SIZE,
                    });
                    placed += 1;
                }
            }
        }

        log::info!("Built level: {}x{} cells, {} tiles", cols, rows, placed);
        Ok(Self { cols, rows, cells })
    }

    /// Convenience constructor from row strings
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, LevelError> {
        let grid = LevelGrid {
            rows: rows.iter().map(|r| r.as_ref().chars().collect()).collect(),
        };
        Self::from_grid(&grid)
    }

    /// Load a level file. `.csv` files are expected to carry a header row.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        let grid = if is_csv {
            LevelGrid::from_csv(&text)
        } else {
            LevelGrid::parse(&text)
        };
        Self::from_grid(&grid)
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Level extent in world units
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.cols as f32, self.rows as f32) * TILE_SIZE
    }

    pub fn tile_at(&self, col: usize, row: usize) -> Option<&StaticTile> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells[row * self.cols + col].as_ref()
    }

    /// All tiles, row-major
    pub fn tiles(&self) -> impl Iterator<Item = &StaticTile> {
        self.cells.iter().flatten()
    }

    /// Every tile whose rectangle strictly overlaps `rect`
    pub fn tiles_overlapping(&self, rect: Rect) -> impl Iterator<Item = &StaticTile> {
        let max = rect.max();
        let cols = index_range(rect.min.x, max.x, self.cols);
        let rows = index_range(rect.min.y, max.y, self.rows);
        CellWalk::new(self, cols, rows).filter(move |tile| tile.rect().overlaps(&rect))
    }

    pub fn blocking_tiles_overlapping(&self, rect: Rect) -> impl Iterator<Item = &StaticTile> {
        self.tiles_overlapping(rect).filter(|tile| tile.is_blocking())
    }

    /// Whether `rect` overlaps any blocking tile
    pub fn is_blocking(&self, rect: Rect) -> bool {
        self.blocking_tiles_overlapping(rect).next().is_some()
    }

    /// Tiles within the viewport grown by one tile on every side
    pub fn visible_tiles(&self, camera: &Camera) -> VisibleTiles<'_> {
        let lo = camera.offset - Vec2::splat(TILE_SIZE);
        let hi = camera.offset + Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT) + Vec2::splat(TILE_SIZE);
        VisibleTiles {
            walk: CellWalk::new(
                self,
                inclusive_index_range(lo.x, hi.x, self.cols),
                inclusive_index_range(lo.y, hi.y, self.rows),
            ),
        }
    }
}

/// Cells whose span `[i*T, (i+1)*T)` strictly overlaps `(lo, hi)`
fn index_range(lo: f32, hi: f32, len: usize) -> Range<usize> {
    let start = (lo / TILE_SIZE).floor().max(0.0) as usize;
    let end = ((hi / TILE_SIZE).ceil().max(0.0) as usize).min(len);
    start.min(end)..end
}

/// Cells whose origin `i*T` lies within `[lo, hi]`
fn inclusive_index_range(lo: f32, hi: f32, len: usize) -> Range<usize> {
    let start = (lo / TILE_SIZE).ceil().max(0.0) as usize;
    let end = (((hi / TILE_SIZE).floor() + 1.0).max(0.0) as usize).min(len);
    start.min(end)..end
}

/// Row-major walk over a sub-rectangle of the grid, skipping holes
#[derive(Debug, Clone)]
struct CellWalk<'a> {
    map: &'a StaticMap,
    cols: Range<usize>,
    rows: Range<usize>,
    col: usize,
    row: usize,
}

impl<'a> CellWalk<'a> {
    fn new(map: &'a StaticMap, cols: Range<usize>, rows: Range<usize>) -> Self {
        let (col, row) = (cols.start, rows.start);
        Self { map, cols, rows, col, row }
    }
}

impl<'a> Iterator for CellWalk<'a> {
    type Item = &'a StaticTile;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cols.is_empty() {
            return None;
        }
        while self.row < self.rows.end {
            let (col, row) = (self.col, self.row);
            self.col += 1;
            if self.col >= self.cols.end {
                self.col = self.cols.start;
                self.row += 1;
            }
            if let Some(tile) = self.map.tile_at(col, row) {
                return Some(tile);
            }
        }
        None
    }
}

/// Lazy iterator over visible tiles. Cloning it restarts from the current position.
#[derive(Debug, Clone)]
pub struct VisibleTiles<'a> {
    walk: CellWalk<'a>,
}

impl<'a> Iterator for VisibleTiles<'a> {
    type Item = &'a StaticTile;

    fn next(&mut self) -> Option<Self::Item> {
        self.walk.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walled_map() -> StaticMap {
        StaticMap::from_rows(&["BBBB", "BGGB", "BGxB", "BBBB"]).expect("map builds")
    }

    #[test]
    fn test_unknown_chars_leave_holes() {
        let map = walled_map();
        assert_eq!(map.cols(), 4);
        assert_eq!(map.rows(), 4);
        assert!(map.tile_at(2, 2).is_none());
        assert_eq!(map.tiles().count(), 15);
        assert_eq!(map.world_size(), Vec2::new(256.0, 256.0));
    }

    #[test]
    fn test_is_blocking() {
        let map = walled_map();
        // Fully inside the sand cell at (1, 1)
        let inside = Rect::new(Vec2::new(70.0, 70.0), Vec2::splat(20.0));
        assert!(!map.is_blocking(inside));
        // Crosses into the stone column at x = 0
        let wall = Rect::new(Vec2::new(60.0, 70.0), Vec2::splat(20.0));
        assert!(map.is_blocking(wall));
        // Touching the wall edge is not overlapping
        let touching = Rect::new(Vec2::new(64.0, 70.0), Vec2::splat(20.0));
        assert!(!map.is_blocking(touching));
    }

    #[test]
    fn test_far_outside_is_open() {
        let map = walled_map();
        let outside = Rect::new(Vec2::new(-500.0, -500.0), Vec2::splat(32.0));
        assert!(!map.is_blocking(outside));
        let beyond = Rect::new(Vec2::new(5000.0, 10.0), Vec2::splat(32.0));
        assert!(!map.is_blocking(beyond));
    }

    #[test]
    fn test_blocking_tiles_counted_per_tile() {
        let map = walled_map();
        // Straddles two stone tiles of the top row
        let rect = Rect::new(Vec2::new(100.0, 10.0), Vec2::new(64.0, 10.0));
        assert_eq!(map.blocking_tiles_overlapping(rect).count(), 2);
    }

    #[test]
    fn test_visible_tiles_margin_and_restart() {
        let rows: Vec<String> = (0..40).map(|_| "G".repeat(40)).collect();
        let map = StaticMap::from_rows(&rows).expect("map builds");
        let cam = Camera::new(Vec2::new(640.0, 640.0));

        let visible = map.visible_tiles(&cam);
        let restarted = visible.clone();
        // x from 576..=1504 -> cols 9..=23, y from 576..=1304 -> rows 9..=20
        assert_eq!(visible.count(), 15 * 12);
        assert_eq!(restarted.count(), 15 * 12);

        for tile in map.visible_tiles(&cam) {
            let screen = cam.apply(tile.world_pos);
            assert!(screen.x >= -TILE_SIZE && screen.x <= SCREEN_WIDTH + TILE_SIZE);
            assert!(screen.y >= -TILE_SIZE && screen.y <= SCREEN_HEIGHT + TILE_SIZE);
        }
    }

    #[test]
    fn test_parse_csv_and_plain() {
        let grid = LevelGrid::from_csv("a,b,c\nG,B,W\nG, ,x\n");
        assert_eq!(grid.rows, vec![vec!['G', 'B', 'W'], vec!['G', ' ', 'x']]);

        let grid = LevelGrid::parse("GGB\r\nBWG\n\n");
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.rows[1], vec!['B', 'W', 'G']);
    }

    #[test]
    fn test_empty_grid_rejected() {
        assert!(matches!(
            StaticMap::from_grid(&LevelGrid::parse("")),
            Err(LevelError::Empty)
        ));
    }
}
