//! Board module - the grid store
//!
//! The board is a 9x9 grid of tile handles plus the arena that owns the tiles
//! and the color pool that new tiles draw from.
//! Uses a flat array of handles for cache locality; an empty slot is a gap
//! awaiting gravity.
//! Coordinates: (x, y), both 1-based; x runs left to right, y bottom to top.

use std::fmt;

use crate::error::{ResolveError, Result};
use crate::matcher::{run_from, Axis};
use crate::rng::ColorPool;
use crate::snapshot::BoardSnapshot;
use crate::tile::{Tile, TileArena};
use crate::types::{
    GridPos, SpecialStatus, TileId, TileKind, GRID_HEIGHT, GRID_SIZE, GRID_WIDTH,
    MAX_INIT_ATTEMPTS,
};

/// The game board - 9 columns x 9 rows of optional tile handles
#[derive(Debug, Clone)]
pub struct Board {
    /// Flat array of slots, row-major order ((y - 1) * WIDTH + (x - 1))
    slots: [Option<TileId>; GRID_SIZE],
    tiles: TileArena,
    pool: ColorPool,
}

impl Board {
    /// Fill a board with random tiles from a fresh pool of `color_count` colors.
    ///
    /// A cell's color is redrawn whenever it would complete a run of three in
    /// either axis, so the new board contains no ready-made match.
    pub fn generate(color_count: u8, seed: u32) -> Result<Self> {
        let pool = ColorPool::new(color_count, seed)?;
        Self::generate_with_pool(pool)
    }

    pub(crate) fn generate_with_pool(pool: ColorPool) -> Result<Self> {
        let mut board = Self {
            slots: [None; GRID_SIZE],
            tiles: TileArena::new(),
            pool,
        };

        for pos in GridPos::all() {
            let kind = board.pool.draw();
            let id = board.tiles.spawn(kind, pos, pos);
            board.put(pos, id);

            let mut attempts = 1;
            while board.completes_run(pos) {
                if attempts >= MAX_INIT_ATTEMPTS {
                    return Err(ResolveError::GenerationStall {
                        x: pos.x,
                        y: pos.y,
                        attempts,
                    });
                }
                let kind = board.pool.draw();
                if let Some(tile) = board.tiles.get_mut(id) {
                    tile.kind = kind;
                }
                attempts += 1;
            }
        }

        Ok(board)
    }

    /// Build a board from rows of layout symbols, top row first.
    ///
    /// `A`-`F` are base colors and `*` is a color-bomb (Bird) tile. Refills
    /// draw from the base colors the layout uses, which must be at least three.
    ///
    /// ```
    /// use match3_core::Board;
    /// use match3_types::{GridPos, SpecialStatus, TileKind};
    ///
    /// let board = Board::from_layout(
    ///     &[
    ///         "ABCABCABC",
    ///         "BCABCABCA",
    ///         "CABCABCAB",
    ///         "ABCABCABC",
    ///         "BCABCABCA",
    ///         "CABCABCAB",
    ///         "ABCABCABC",
    ///         "BCABCABCA",
    ///         "CAB*ABCAB",
    ///     ],
    ///     1,
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(board.kind_at(GridPos::new(1, 9)), Some(TileKind::A));
    /// assert_eq!(board.kind_at(GridPos::new(4, 1)), Some(TileKind::Bird));
    /// assert_eq!(board.status_at(GridPos::new(4, 1)), Some(SpecialStatus::ColorBomb));
    /// ```
    pub fn from_layout(rows: &[&str], seed: u32) -> Result<Self> {
        if rows.len() != GRID_HEIGHT as usize {
            return Err(ResolveError::Layout(format!(
                "expected {} rows, got {}",
                GRID_HEIGHT,
                rows.len()
            )));
        }

        let mut kinds = [[TileKind::A; GRID_WIDTH as usize]; GRID_HEIGHT as usize];
        let mut palette: Vec<TileKind> = Vec::new();
        for (row_idx, row) in rows.iter().enumerate() {
            let symbols: Vec<char> = row.chars().collect();
            if symbols.len() != GRID_WIDTH as usize {
                return Err(ResolveError::Layout(format!(
                    "row {} has {} cells, expected {}",
                    row_idx + 1,
                    symbols.len(),
                    GRID_WIDTH
                )));
            }
            for (col, &c) in symbols.iter().enumerate() {
                let kind = TileKind::from_symbol(c).ok_or_else(|| {
                    ResolveError::Layout(format!("unknown symbol '{}' in row {}", c, row_idx + 1))
                })?;
                if kind.is_base() && !palette.contains(&kind) {
                    palette.push(kind);
                }
                kinds[row_idx][col] = kind;
            }
        }
        palette.sort();

        let mut board = Self {
            slots: [None; GRID_SIZE],
            tiles: TileArena::new(),
            pool: ColorPool::with_kinds(&palette, seed)?,
        };

        for (row_idx, row) in kinds.iter().enumerate() {
            let y = GRID_HEIGHT as i8 - row_idx as i8;
            for (col, &kind) in row.iter().enumerate() {
                let pos = GridPos::new(col as i8 + 1, y);
                let id = board.tiles.spawn(kind, pos, pos);
                if kind == TileKind::Bird {
                    if let Some(tile) = board.tiles.get_mut(id) {
                        tile.status = SpecialStatus::ColorBomb;
                    }
                }
                board.put(pos, id);
            }
        }

        Ok(board)
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(pos: GridPos) -> Option<usize> {
        if !pos.in_bounds() {
            return None;
        }
        Some((pos.y as usize - 1) * GRID_WIDTH as usize + (pos.x as usize - 1))
    }

    /// Get width of the board
    pub fn width(&self) -> u8 {
        GRID_WIDTH
    }

    /// Get height of the board
    pub fn height(&self) -> u8 {
        GRID_HEIGHT
    }

    /// Handle of the tile occupying `pos`, if any
    pub fn get(&self, pos: GridPos) -> Option<TileId> {
        Self::index(pos).and_then(|idx| self.slots[idx])
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id)
    }

    pub(crate) fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(id)
    }

    pub fn tile_at(&self, pos: GridPos) -> Option<&Tile> {
        self.get(pos).and_then(|id| self.tiles.get(id))
    }

    pub fn kind_at(&self, pos: GridPos) -> Option<TileKind> {
        self.tile_at(pos).map(|t| t.kind)
    }

    pub fn status_at(&self, pos: GridPos) -> Option<SpecialStatus> {
        self.tile_at(pos).map(|t| t.status)
    }

    /// Check if every slot holds a tile
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_some())
    }

    /// Swap the occupants of two slots and rewrite their positions. Never animates.
    pub fn exchange(&mut self, a: GridPos, b: GridPos) -> Result<()> {
        let ia = Self::index(a).ok_or(ResolveError::InvalidPosition { x: a.x, y: a.y })?;
        let ib = Self::index(b).ok_or(ResolveError::InvalidPosition { x: b.x, y: b.y })?;

        self.slots.swap(ia, ib);
        if let Some(tile) = self.slots[ia].and_then(|id| self.tiles.get_mut(id)) {
            tile.pos = a;
        }
        if let Some(tile) = self.slots[ib].and_then(|id| self.tiles.get_mut(id)) {
            tile.pos = b;
        }
        Ok(())
    }

    /// Empty a slot and return its former occupant
    pub(crate) fn take(&mut self, pos: GridPos) -> Option<TileId> {
        Self::index(pos).and_then(|idx| self.slots[idx].take())
    }

    /// Occupy a slot. Out-of-bounds positions are ignored.
    pub(crate) fn put(&mut self, pos: GridPos, id: TileId) {
        if let Some(idx) = Self::index(pos) {
            self.slots[idx] = Some(id);
        }
    }

    /// Create a tile in the arena without placing it
    pub(crate) fn spawn(&mut self, kind: TileKind, pos: GridPos, spawn_pos: GridPos) -> TileId {
        self.tiles.spawn(kind, pos, spawn_pos)
    }

    /// Draw a random color from the board's pool
    pub(crate) fn draw_kind(&mut self) -> TileKind {
        self.pool.draw()
    }

    pub fn pool(&self) -> &ColorPool {
        &self.pool
    }

    /// Give the tile at `pos` a special status (fixtures and scripted demos)
    pub fn set_status(&mut self, pos: GridPos, status: SpecialStatus) -> Result<()> {
        let id = self
            .get(pos)
            .ok_or(ResolveError::InvalidPosition { x: pos.x, y: pos.y })?;
        if let Some(tile) = self.tiles.get_mut(id) {
            tile.status = status;
            if status == SpecialStatus::ColorBomb {
                tile.kind = TileKind::Bird;
            }
        }
        Ok(())
    }

    /// Discard all command logs and forget dead tiles. Returns commands discarded.
    pub fn clear_command_logs(&mut self) -> usize {
        self.tiles.clear_command_logs()
    }

    pub fn arena(&self) -> &TileArena {
        &self.tiles
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mut snap = BoardSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }

    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        out.clear();
        for pos in GridPos::all() {
            if let Some(tile) = self.tile_at(pos) {
                let (row, col) = (pos.y as usize - 1, pos.x as usize - 1);
                out.kinds[row][col] = tile.kind.code();
                out.statuses[row][col] = tile.status.code();
            }
        }
        out.colors = self.pool.len() as u8;
        out.rehash();
    }

    /// True if the tile at `pos` sits in a horizontal or vertical run of three or more
    fn completes_run(&self, pos: GridPos) -> bool {
        run_from(self, pos, Axis::Row).len() >= 3 || run_from(self, pos, Axis::Column).len() >= 3
    }
}

impl fmt::Display for Board {
    /// Kind grid, top row first; `.` marks a gap
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (1..=GRID_HEIGHT as i8).rev() {
            for x in 1..=GRID_WIDTH as i8 {
                let c = self
                    .kind_at(GridPos::new(x, y))
                    .map(|k| k.symbol())
                    .unwrap_or('.');
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
