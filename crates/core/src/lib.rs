//! Core board logic - pure, deterministic, and testable
//!
//! This crate contains the rules of the board: matching, crushing, special
//! tile detonation and gravity. It has **no dependencies** on rendering,
//! input or I/O, making it:
//!
//! - **Deterministic**: the same seed and the same taps produce identical resolutions
//! - **Testable**: fixture boards can be built from text layouts
//! - **Portable**: any presentation layer can replay the emitted timelines
//!
//! # Module Structure
//!
//! - [`board`]: 9x9 grid of tile handles backed by a tile arena
//! - [`matcher`]: run detection and match classification
//! - [`cascade`]: the resolver, swap handling and the crush/settle loop
//! - [`bomb`]: wavefront detonation of special tiles
//! - [`pass`]: per-interaction accumulator for the clock, changed tiles and effects
//! - [`tile`]: tiles and their animation command logs
//! - [`rng`]: seeded LCG and the color pool
//! - [`snapshot`]: plain-data board snapshots for observers
//!
//! # Coordinates
//!
//! Positions are 1-based with `y = 1` as the bottom row. Gravity pulls toward
//! `y = 1` and refills enter from above the top row.
//!
//! # Example
//!
//! ```
//! use match3_core::{Resolver, ResolverConfig};
//! use match3_core::types::GridPos;
//!
//! let mut resolver = Resolver::new(ResolverConfig::default().with_seed(42)).unwrap();
//!
//! // The first tap only selects
//! let res = resolver.select_cell(GridPos::new(4, 4)).unwrap();
//! assert!(res.is_empty());
//!
//! // The second, adjacent tap swaps (or bounces back)
//! let res = resolver.select_cell(GridPos::new(5, 4)).unwrap();
//! assert!(!res.changed.is_empty());
//! assert!(resolver.board().is_full());
//! ```
//!
//! # Timing
//!
//! Resolution runs instantly; animation time is virtual. Every command and
//! effect carries a `play_ms` offset from the start of the interaction, and
//! [`Resolution::duration_ms`] is the time at which the last settle finishes.

pub mod board;
pub mod bomb;
pub mod cascade;
pub mod config;
pub mod error;
pub mod matcher;
pub mod pass;
pub mod rng;
pub mod snapshot;
pub mod tile;

pub use match3_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use cascade::{Resolver, Selection};
pub use config::ResolverConfig;
pub use error::{ResolveError, Result};
pub use matcher::{classify, classify_best, run_from, Axis, MatchOutcome};
pub use pass::{Pass, Resolution};
pub use rng::{ColorPool, SimpleRng};
pub use snapshot::BoardSnapshot;
pub use tile::{Tile, TileArena, TileView};
