//! Cascade module - the resolution state machine
//!
//! [`Resolver`] owns the board and the two-tap selection state. Each
//! [`Resolver::select_cell`] call runs to completion: swap, match, crush,
//! detonate and settle repeat until the board is quiescent, and every step is
//! stamped on a virtual clock so the presentation layer can replay it.

use crate::board::Board;
use crate::bomb::detonate;
use crate::config::ResolverConfig;
use crate::error::{ResolveError, Result};
use crate::matcher::{classify, classify_best, MatchOutcome};
use crate::pass::{Pass, Resolution};
use crate::snapshot::BoardSnapshot;
use crate::types::{
    GridPos, SpecialStatus, TileId, TileKind, DIE_MS, GRID_HEIGHT, GRID_WIDTH, SETTLE_BUFFER_MS,
    TOUCH_MOVE_MS,
};

/// Two-tap selection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    /// First tap of a potential swap
    Pending(GridPos),
}

/// The board resolver
#[derive(Debug, Clone)]
pub struct Resolver {
    board: Board,
    selection: Selection,
    config: ResolverConfig,
    /// Number of swaps that were kept (not bounced back)
    swaps: u32,
}

impl Resolver {
    /// Create a resolver with a freshly generated board
    pub fn new(config: ResolverConfig) -> Result<Self> {
        let board = Board::generate(config.color_count, config.seed)?;
        Ok(Self::with_board(board, config))
    }

    /// Wrap an existing board (fixtures, scripted demos)
    pub fn with_board(board: Board, config: ResolverConfig) -> Self {
        Self {
            board,
            selection: Selection::None,
            config,
            swaps: 0,
        }
    }

    /// Replace the board with a new one drawing from `color_count` colors.
    ///
    /// The RNG continues from the current board's state, so consecutive boards
    /// differ while the session stays reproducible from its seed.
    pub fn init_board(&mut self, color_count: u8) -> Result<BoardSnapshot> {
        let seed = self.board.pool().seed();
        self.board = Board::generate(color_count, seed)?;
        self.config.color_count = color_count;
        self.selection = Selection::None;
        self.swaps = 0;
        Ok(self.board.snapshot())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn config(&self) -> ResolverConfig {
        self.config
    }

    pub fn swaps(&self) -> u32 {
        self.swaps
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.board.snapshot()
    }

    /// Discard consumed command logs. Call after playing back a resolution.
    pub fn clear_command_logs(&mut self) -> usize {
        self.board.clear_command_logs()
    }

    /// Handle one tap.
    ///
    /// A tap that is not orthogonally adjacent to the pending one (or the
    /// first tap of a turn) becomes the new pending selection and resolves to
    /// nothing. An adjacent tap attempts the swap and clears the selection,
    /// whatever the outcome.
    pub fn select_cell(&mut self, pos: GridPos) -> Result<Resolution> {
        if !pos.in_bounds() {
            return Err(ResolveError::InvalidPosition { x: pos.x, y: pos.y });
        }

        let last = match self.selection {
            Selection::Pending(last) if last.manhattan(pos) == 1 => last,
            _ => {
                self.selection = Selection::Pending(pos);
                return Ok(Resolution::empty());
            }
        };

        self.selection = Selection::None;
        self.attempt_swap(last, pos)
    }

    fn attempt_swap(&mut self, last: GridPos, pos: GridPos) -> Result<Resolution> {
        let (Some(cur_id), Some(last_id)) = (self.board.get(pos), self.board.get(last)) else {
            return Ok(Resolution::empty());
        };

        self.board.exchange(last, pos)?;
        let matched = |board: &Board, p: GridPos| classify(board, p).is_some_and(|m| m.is_match());
        let any_match = matched(&self.board, pos) || matched(&self.board, last);

        let mut pass = Pass::new();
        pass.touch(cur_id);
        pass.touch(last_id);

        let status_of = |board: &Board, id| {
            board
                .tile(id)
                .map(|t| t.status)
                .unwrap_or(SpecialStatus::None)
        };
        let (cur_status, last_status) = (
            status_of(&self.board, cur_id),
            status_of(&self.board, last_id),
        );
        let bomb_eligible = (cur_status.is_special() && last_status.is_special())
            || cur_status == SpecialStatus::ColorBomb
            || last_status == SpecialStatus::ColorBomb;

        if !any_match && !bomb_eligible {
            self.board.exchange(last, pos)?;
            if let Some(tile) = self.board.tile_mut(cur_id) {
                tile.move_to_and_back(last);
            }
            if let Some(tile) = self.board.tile_mut(last_id) {
                tile.move_to_and_back(pos);
            }
            pass.advance(2 * TOUCH_MOVE_MS);
            return Ok(pass.finish(&self.board));
        }

        let now = pass.clock_ms();
        if let Some(tile) = self.board.tile_mut(cur_id) {
            tile.move_to(last, now);
        }
        if let Some(tile) = self.board.tile_mut(last_id) {
            tile.move_to(pos, now);
        }
        pass.advance(TOUCH_MOVE_MS);
        self.swaps = self.swaps.wrapping_add(1);

        process_crush(&mut self.board, &mut pass, vec![pos, last]);
        Ok(pass.finish(&self.board))
    }
}

/// Run match, crush, detonate, settle cycles until a settle moves nothing.
pub fn process_crush(board: &mut Board, pass: &mut Pass, frontier: Vec<GridPos>) {
    let mut frontier = frontier;
    let mut step: u32 = 0;

    while !frontier.is_empty() {
        let mut bombs = Vec::new();
        let effects_before = pass.effects().len();

        if step == 0 && frontier.len() == 2 {
            if let Some(id) = adopt_partner_color(board, frontier[0], frontier[1]) {
                bombs.push(id);
            }
        }

        for &pos in &frontier {
            if board.get(pos).is_none() {
                continue;
            }
            let Some(outcome) = classify_best(board, pos) else {
                continue;
            };
            if !outcome.is_match() {
                continue;
            }

            for &point in &outcome.points {
                if let Some(id) = pass.crush(board, point, false, step) {
                    if board.tile(id).is_some_and(|t| t.status.is_special()) {
                        bombs.push(id);
                    }
                }
            }
            spawn_special(board, pass, &outcome);
        }

        detonate(board, pass, bombs, step);
        if pass.effects().len() > effects_before {
            pass.count_cycle();
        }

        pass.advance(DIE_MS);
        frontier = settle(board, pass);
        step += 1;
    }
}

/// A color bomb swapped next to any tile takes on that tile's color and
/// detonates. Returns the bomb's handle when one of the two is a color bomb.
fn adopt_partner_color(board: &mut Board, a: GridPos, b: GridPos) -> Option<TileId> {
    let (id_a, id_b) = (board.get(a)?, board.get(b)?);
    let (status_a, kind_a) = board.tile(id_a).map(|t| (t.status, t.kind))?;
    let (status_b, kind_b) = board.tile(id_b).map(|t| (t.status, t.kind))?;

    let (bomb, color) = if status_a == SpecialStatus::ColorBomb {
        (id_a, kind_b)
    } else if status_b == SpecialStatus::ColorBomb {
        (id_b, kind_a)
    } else {
        return None;
    };

    board.tile_mut(bomb)?.kind = color;
    Some(bomb)
}

/// Put the special tile a match earned at its pivot. Plain matches spawn nothing.
fn spawn_special(board: &mut Board, pass: &mut Pass, outcome: &MatchOutcome) {
    if !outcome.status.is_special() {
        return;
    }

    let kind = match outcome.status {
        SpecialStatus::ColorBomb => TileKind::Bird,
        _ => outcome.kind,
    };

    let pivot = outcome.pivot;
    let id = board.spawn(kind, pivot, pivot);
    let now = pass.clock_ms();
    if let Some(tile) = board.tile_mut(id) {
        tile.status = outcome.status;
        tile.set_visible(0, false);
        tile.set_visible(now, true);
    }
    board.put(pivot, id);
    pass.touch(id);
}

/// Apply gravity column by column and refill from above.
///
/// Returns the positions of every tile that moved or spawned; an empty result
/// means the board was already full.
pub fn settle(board: &mut Board, pass: &mut Pass) -> Vec<GridPos> {
    let mut moved = Vec::new();
    let now = pass.clock_ms();
    let height = GRID_HEIGHT as i8;

    for x in 1..=GRID_WIDTH as i8 {
        let Some(first_gap) = (1..=height).find(|&y| board.get(GridPos::new(x, y)).is_none())
        else {
            continue;
        };

        let mut write = first_gap;
        for read in first_gap + 1..=height {
            let Some(id) = board.take(GridPos::new(x, read)) else {
                continue;
            };
            let dest = GridPos::new(x, write);
            board.put(dest, id);
            if let Some(tile) = board.tile_mut(id) {
                tile.move_to(dest, now);
            }
            pass.touch(id);
            moved.push(dest);
            write += 1;
        }

        for (count, y) in (write..=height).enumerate() {
            let origin = GridPos::new(x, height + 1 + count as i8);
            let dest = GridPos::new(x, y);
            let kind = board.draw_kind();
            let id = board.spawn(kind, origin, origin);
            board.put(dest, id);
            if let Some(tile) = board.tile_mut(id) {
                tile.move_to(dest, now);
            }
            pass.touch(id);
            moved.push(dest);
        }
    }

    pass.advance(TOUCH_MOVE_MS + SETTLE_BUFFER_MS);
    moved
}
