//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the resolver.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, presentation protocol, replay logs).
//!
//! # Board Dimensions
//!
//! - **Width**: 9 columns (indexed 1-9, left to right)
//! - **Height**: 9 rows (indexed 1-9, bottom to top)
//! - Gravity pulls tiles toward row 1; refills fall in from above row 9
//!
//! # Virtual Clock Constants
//!
//! Timing values are in milliseconds of virtual time. The resolver never
//! sleeps; these only timestamp the commands handed to the presentation layer.
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TOUCH_MOVE_MS` | 300 | Swap, bounce and fall moves |
//! | `DIE_MS` | 200 | Death animation |
//! | `DIE_SHAKE_MS` | 400 | Pre-death flinch for color-bomb victims |
//! | `BOMB_DELAY_MS` | 300 | Row/column/wrap wave |
//! | `BOMB_BIRD_DELAY_MS` | 700 | Color-bomb wave |
//! | `SETTLE_BUFFER_MS` | 300 | Pause after every gravity pass |
//!
//! # Examples
//!
//! ```
//! use match3_types::{GridPos, SpecialStatus, TileKind, GRID_HEIGHT, GRID_WIDTH};
//!
//! let kind = TileKind::from_str("c").unwrap();
//! assert_eq!(kind, TileKind::C);
//! assert!(kind.is_base());
//!
//! assert!(SpecialStatus::ColorBomb.rank() > SpecialStatus::Wrap.rank());
//!
//! let a = GridPos::new(3, 4);
//! assert_eq!(a.manhattan(GridPos::new(4, 4)), 1);
//! assert!(a.in_bounds());
//!
//! assert_eq!(GRID_WIDTH, 9);
//! assert_eq!(GRID_HEIGHT, 9);
//! ```

/// Board width in cells (9 columns)
pub const GRID_WIDTH: u8 = 9;

/// Board height in cells (9 rows)
pub const GRID_HEIGHT: u8 = 9;

/// Total number of slots on the board
pub const GRID_SIZE: usize = (GRID_WIDTH as usize) * (GRID_HEIGHT as usize);

/// Number of distinct base colors a board may draw from
pub const BASE_KIND_COUNT: u8 = 6;

/// Smallest color pool that can always avoid pre-made matches
pub const MIN_COLOR_COUNT: u8 = 3;

/// Color pool size used when none is given
pub const DEFAULT_COLOR_COUNT: u8 = 5;

/// Rejection-sampling cap per cell during board generation
pub const MAX_INIT_ATTEMPTS: u32 = 1000;

/// Move duration for swaps, invalid-swap bounces and falls
pub const TOUCH_MOVE_MS: u32 = 300;

/// Death animation duration
pub const DIE_MS: u32 = 200;

/// Pre-death shake duration for tiles swept by a color bomb
pub const DIE_SHAKE_MS: u32 = 400;

/// Clock advance for a wave of row, column or wrap bombs
pub const BOMB_DELAY_MS: u32 = 300;

/// Clock advance for a wave containing a color bomb
pub const BOMB_BIRD_DELAY_MS: u32 = 700;

/// Extra pause after every gravity pass
pub const SETTLE_BUFFER_MS: u32 = 300;

/// A 1-based grid coordinate. `x` is the column, `y` the row (row 1 at the bottom).
///
/// Positions above the board (`y > GRID_HEIGHT`) are legal values: refilled
/// tiles start there so they can animate falling in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPos {
    pub x: i8,
    pub y: i8,
}

impl GridPos {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Manhattan distance between two positions
    pub fn manhattan(self, other: GridPos) -> u32 {
        (self.x as i32 - other.x as i32).unsigned_abs()
            + (self.y as i32 - other.y as i32).unsigned_abs()
    }

    /// Check if the position lies on the visible board
    pub fn in_bounds(self) -> bool {
        self.x >= 1 && self.x <= GRID_WIDTH as i8 && self.y >= 1 && self.y <= GRID_HEIGHT as i8
    }

    /// Offset by a direction vector
    pub fn offset(self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Iterate every on-board position, column by column, bottom to top
    pub fn all() -> impl Iterator<Item = GridPos> {
        (1..=GRID_WIDTH as i8)
            .flat_map(|x| (1..=GRID_HEIGHT as i8).map(move |y| GridPos::new(x, y)))
    }
}

/// Tile kinds
///
/// - **A**-**F**: the six base colors a board draws its pool from
/// - **Bird**: marker kind carried by color-bomb tiles; never matches a base color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TileKind {
    A,
    B,
    C,
    D,
    E,
    F,
    Bird,
}

/// All base colors in declaration order
pub const BASE_KINDS: [TileKind; BASE_KIND_COUNT as usize] = [
    TileKind::A,
    TileKind::B,
    TileKind::C,
    TileKind::D,
    TileKind::E,
    TileKind::F,
];

impl TileKind {
    /// Parse tile kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use match3_types::TileKind;
    ///
    /// assert_eq!(TileKind::from_str("a"), Some(TileKind::A));
    /// assert_eq!(TileKind::from_str("F"), Some(TileKind::F));
    /// assert_eq!(TileKind::from_str("bird"), Some(TileKind::Bird));
    /// assert_eq!(TileKind::from_str("g"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "a" => Some(TileKind::A),
            "b" => Some(TileKind::B),
            "c" => Some(TileKind::C),
            "d" => Some(TileKind::D),
            "e" => Some(TileKind::E),
            "f" => Some(TileKind::F),
            "bird" => Some(TileKind::Bird),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TileKind::A => "a",
            TileKind::B => "b",
            TileKind::C => "c",
            TileKind::D => "d",
            TileKind::E => "e",
            TileKind::F => "f",
            TileKind::Bird => "bird",
        }
    }

    /// Single-character layout symbol (`A`-`F`, `*` for Bird)
    pub fn symbol(&self) -> char {
        match self {
            TileKind::A => 'A',
            TileKind::B => 'B',
            TileKind::C => 'C',
            TileKind::D => 'D',
            TileKind::E => 'E',
            TileKind::F => 'F',
            TileKind::Bird => '*',
        }
    }

    /// Inverse of [`TileKind::symbol`]
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            'A' | 'a' => Some(TileKind::A),
            'B' | 'b' => Some(TileKind::B),
            'C' | 'c' => Some(TileKind::C),
            'D' | 'd' => Some(TileKind::D),
            'E' | 'e' => Some(TileKind::E),
            'F' | 'f' => Some(TileKind::F),
            '*' => Some(TileKind::Bird),
            _ => None,
        }
    }

    pub fn is_base(&self) -> bool {
        !matches!(self, TileKind::Bird)
    }

    /// Compact numeric code for snapshots (0 is reserved for an empty slot)
    pub fn code(&self) -> u8 {
        match self {
            TileKind::A => 1,
            TileKind::B => 2,
            TileKind::C => 3,
            TileKind::D => 4,
            TileKind::E => 5,
            TileKind::F => 6,
            TileKind::Bird => 7,
        }
    }
}

/// Special status carried by a tile, orthogonal to its kind
///
/// Decides what happens when the tile is crushed:
/// - **None**: plain tile
/// - **Line**: clears its row
/// - **Column**: clears its column
/// - **Wrap**: clears the diamond of Manhattan radius 2 around it
/// - **ColorBomb**: clears every tile of one color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialStatus {
    None,
    Line,
    Column,
    Wrap,
    ColorBomb,
}

impl SpecialStatus {
    /// Priority used when choosing between candidate matches.
    ///
    /// Line and Column share a rank; neither displaces the other.
    ///
    /// ```
    /// use match3_types::SpecialStatus;
    ///
    /// assert_eq!(SpecialStatus::Line.rank(), SpecialStatus::Column.rank());
    /// assert!(SpecialStatus::Wrap.rank() > SpecialStatus::Line.rank());
    /// assert!(SpecialStatus::None.rank() < SpecialStatus::Column.rank());
    /// ```
    pub fn rank(&self) -> u8 {
        match self {
            SpecialStatus::None => 0,
            SpecialStatus::Line | SpecialStatus::Column => 1,
            SpecialStatus::Wrap => 2,
            SpecialStatus::ColorBomb => 3,
        }
    }

    pub fn is_special(&self) -> bool {
        !matches!(self, SpecialStatus::None)
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" | "common" => Some(SpecialStatus::None),
            "line" => Some(SpecialStatus::Line),
            "column" => Some(SpecialStatus::Column),
            "wrap" => Some(SpecialStatus::Wrap),
            "colorbomb" | "bird" => Some(SpecialStatus::ColorBomb),
            _ => None,
        }
    }

    /// Convert to camelCase string for the presentation protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialStatus::None => "none",
            SpecialStatus::Line => "line",
            SpecialStatus::Column => "column",
            SpecialStatus::Wrap => "wrap",
            SpecialStatus::ColorBomb => "colorBomb",
        }
    }

    /// Compact numeric code for snapshots
    pub fn code(&self) -> u8 {
        match self {
            SpecialStatus::None => 0,
            SpecialStatus::Line => 1,
            SpecialStatus::Column => 2,
            SpecialStatus::Wrap => 3,
            SpecialStatus::ColorBomb => 4,
        }
    }
}

/// Stable handle of a tile in the board's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

/// Per-tile animation instruction payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    /// Slide to a grid position
    MoveTo(GridPos),
    /// Play the death animation
    Die,
    /// Flinch before dying
    Shake,
    /// Show or hide the tile
    SetVisible(bool),
}

impl CommandAction {
    /// camelCase name used by the presentation protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandAction::MoveTo(_) => "moveTo",
            CommandAction::Die => "die",
            CommandAction::Shake => "shake",
            CommandAction::SetVisible(_) => "setVisible",
        }
    }
}

/// One timed animation instruction for one tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub action: CommandAction,
    /// Start time in virtual milliseconds from the beginning of the pass
    pub play_ms: u32,
    /// Duration in virtual milliseconds
    pub keep_ms: u32,
}

/// Global visual events not tied to one tile's lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectAction {
    Crush,
    RowBomb,
    ColBomb,
}

impl EffectAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectAction::Crush => "crush",
            EffectAction::RowBomb => "rowBomb",
            EffectAction::ColBomb => "colBomb",
        }
    }
}

/// One timed visual event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effect {
    pub action: EffectAction,
    pub play_ms: u32,
    pub pos: GridPos,
    /// Cascade cycle index; set on crush effects so the same sound is not
    /// re-triggered within one instant
    pub step: Option<u32>,
}
