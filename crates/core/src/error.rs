//! Error taxonomy for the resolver.
//!
//! "No match found" is not an error: it is an ordinary empty resolution.
//! Illegal swaps (non-adjacent taps) are absorbed as new selections.

use thiserror::Error;

use crate::types::{BASE_KIND_COUNT, GRID_HEIGHT, GRID_WIDTH, MIN_COLOR_COUNT};

pub type Result<T, E = ResolveError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Coordinate outside `[1, GRID_WIDTH] x [1, GRID_HEIGHT]`. Nothing was mutated.
    #[error("position ({x}, {y}) is outside the {w}x{h} board", w = GRID_WIDTH, h = GRID_HEIGHT)]
    InvalidPosition { x: i8, y: i8 },

    /// Color pool size outside the supported range.
    #[error("color count {requested} is outside [{min}, {max}]")]
    ColorCount { requested: u32, min: u8, max: u8 },

    /// Board generation could not place a tile without completing a run.
    #[error("no match-free color for ({x}, {y}) after {attempts} attempts")]
    GenerationStall { x: i8, y: i8, attempts: u32 },

    /// Malformed fixture layout.
    #[error("invalid layout: {0}")]
    Layout(String),
}

impl ResolveError {
    /// Out-of-range color count. Takes `u32` so oversized wire values keep
    /// their number in the message.
    pub fn color_count(requested: impl Into<u32>) -> Self {
        ResolveError::ColorCount {
            requested: requested.into(),
            min: MIN_COLOR_COUNT,
            max: BASE_KIND_COUNT,
        }
    }

    /// True for errors that abort board construction.
    pub fn is_config(&self) -> bool {
        !matches!(self, ResolveError::InvalidPosition { .. })
    }
}
