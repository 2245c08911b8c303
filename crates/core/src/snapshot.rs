use crate::types::{GRID_HEIGHT, GRID_WIDTH};

type Grid = [[u8; GRID_WIDTH as usize]; GRID_HEIGHT as usize];

/// Plain-data copy of the board for collaborators.
///
/// Grids are indexed `[y - 1][x - 1]`, so row 0 is the bottom row. Kind codes
/// follow [`TileKind::code`](crate::types::TileKind::code) with 0 for a gap;
/// status codes follow [`SpecialStatus::code`](crate::types::SpecialStatus::code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardSnapshot {
    pub kinds: Grid,
    pub statuses: Grid,
    /// Size of the color pool in play
    pub colors: u8,
    /// FNV-1a over `kinds` then `statuses`
    pub board_hash: u64,
}

impl BoardSnapshot {
    pub fn clear(&mut self) {
        self.kinds = [[0u8; GRID_WIDTH as usize]; GRID_HEIGHT as usize];
        self.statuses = [[0u8; GRID_WIDTH as usize]; GRID_HEIGHT as usize];
        self.colors = 0;
        self.board_hash = 0;
    }

    /// Recompute `board_hash` from the grids
    pub fn rehash(&mut self) {
        let bytes = self
            .kinds
            .iter()
            .chain(self.statuses.iter())
            .flat_map(|row| row.iter().copied());
        self.board_hash = fnv1a64(bytes);
    }

    /// Check if every slot holds a tile
    pub fn is_full(&self) -> bool {
        self.kinds.iter().all(|row| row.iter().all(|&k| k != 0))
    }
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        let mut s = Self {
            kinds: [[0u8; GRID_WIDTH as usize]; GRID_HEIGHT as usize],
            statuses: [[0u8; GRID_WIDTH as usize]; GRID_HEIGHT as usize],
            colors: 0,
            board_hash: 0,
        };
        s.rehash();
        s
    }
}

/// Stable 64-bit FNV-1a.
///
/// `DefaultHasher` output is not guaranteed stable across Rust versions.
pub fn fnv1a64(bytes: impl Iterator<Item = u8>) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    let mut h = OFFSET_BASIS;
    for b in bytes {
        h ^= b as u64;
        h = h.wrapping_mul(PRIME);
    }
    h
}
