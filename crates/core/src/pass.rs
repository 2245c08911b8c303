//! Resolution pass accumulator
//!
//! Everything one `select_cell` call produces (the virtual clock, the set of
//! changed tiles and the effect queue) lives in a [`Pass`] that the cascade
//! and bomb code thread through explicitly.

use std::collections::HashSet;

use crate::board::Board;
use crate::tile::TileView;
use crate::types::{Effect, EffectAction, GridPos, TileId, DIE_SHAKE_MS};

/// Accumulator for one resolution pass
#[derive(Debug, Clone, Default)]
pub struct Pass {
    clock_ms: u32,
    changed: Vec<TileId>,
    seen: HashSet<TileId>,
    effects: Vec<Effect>,
    cycles: u32,
}

impl Pass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds
    pub fn clock_ms(&self) -> u32 {
        self.clock_ms
    }

    pub fn advance(&mut self, ms: u32) {
        self.clock_ms = self.clock_ms.saturating_add(ms);
    }

    /// Record a tile as changed; repeated calls keep the first position in order
    pub fn touch(&mut self, id: TileId) {
        if self.seen.insert(id) {
            self.changed.push(id);
        }
    }

    pub fn changed(&self) -> &[TileId] {
        &self.changed
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn push_effect(&mut self, action: EffectAction, play_ms: u32, pos: GridPos, step: Option<u32>) {
        self.effects.push(Effect {
            action,
            play_ms,
            pos,
            step,
        });
    }

    /// Count a cascade cycle that crushed at least one tile
    pub(crate) fn count_cycle(&mut self) {
        self.cycles += 1;
    }

    /// Crush the tile at `pos`: it leaves the grid now and dies on the timeline.
    ///
    /// With `shake` the tile flinches first and its death (and the matching
    /// crush effect) is pushed back by the shake duration. Returns the crushed
    /// tile's handle, or `None` if the slot was already empty.
    pub fn crush(&mut self, board: &mut Board, pos: GridPos, shake: bool, step: u32) -> Option<TileId> {
        let id = board.take(pos)?;
        self.touch(id);

        let now = self.clock_ms;
        let die_at = if shake { now + DIE_SHAKE_MS } else { now };
        let tile = board.tile_mut(id)?;
        if shake {
            tile.shake(now);
        }
        tile.die(die_at);
        let at = tile.pos;

        self.push_effect(EffectAction::Crush, die_at, at, Some(step));
        Some(id)
    }

    /// Turn the accumulated handles into views of their final state
    pub fn finish(self, board: &Board) -> Resolution {
        let changed = self
            .changed
            .iter()
            .filter_map(|&id| board.tile(id).map(|t| t.view()))
            .collect();

        Resolution {
            changed,
            effects: self.effects,
            cycles: self.cycles,
            duration_ms: self.clock_ms,
        }
    }
}

/// Output of one player interaction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Tiles whose position, status or life changed, in first-touched order
    pub changed: Vec<TileView>,
    /// Global visual events
    pub effects: Vec<Effect>,
    /// Cascade cycles that crushed at least one tile
    pub cycles: u32,
    /// Virtual time at which the pass ended
    pub duration_ms: u32,
}

impl Resolution {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.effects.is_empty()
    }

    /// Views of tiles that died during the pass
    pub fn crushed(&self) -> impl Iterator<Item = &TileView> {
        self.changed.iter().filter(|t| t.dead)
    }

    /// Views of tiles still on the board
    pub fn survivors(&self) -> impl Iterator<Item = &TileView> {
        self.changed.iter().filter(|t| !t.dead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::STRIPES;
    use crate::types::{CommandAction, DIE_MS};

    #[test]
    fn test_touch_dedups_in_order() {
        let mut pass = Pass::new();
        pass.touch(TileId(3));
        pass.touch(TileId(1));
        pass.touch(TileId(3));
        assert_eq!(pass.changed(), &[TileId(3), TileId(1)]);
    }

    #[test]
    fn test_crush_plain() {
        let mut board = Board::from_layout(&STRIPES, 1).unwrap();
        let mut pass = Pass::new();
        pass.advance(300);

        let pos = GridPos::new(2, 3);
        let id = pass.crush(&mut board, pos, false, 4).unwrap();

        assert!(board.get(pos).is_none());
        let tile = board.tile(id).unwrap();
        assert!(tile.dead);
        assert_eq!(tile.commands.len(), 1);
        assert_eq!(tile.commands[0].action, CommandAction::Die);
        assert_eq!(tile.commands[0].play_ms, 300);
        assert_eq!(tile.commands[0].keep_ms, DIE_MS);

        assert_eq!(
            pass.effects(),
            &[Effect {
                action: EffectAction::Crush,
                play_ms: 300,
                pos,
                step: Some(4),
            }]
        );
    }

    #[test]
    fn test_crush_with_shake_delays_death() {
        let mut board = Board::from_layout(&STRIPES, 1).unwrap();
        let mut pass = Pass::new();
        pass.advance(100);

        let id = pass.crush(&mut board, GridPos::new(1, 1), true, 0).unwrap();
        let tile = board.tile(id).unwrap();
        assert_eq!(tile.commands[0].action, CommandAction::Shake);
        assert_eq!(tile.commands[0].play_ms, 100);
        assert_eq!(tile.commands[1].action, CommandAction::Die);
        assert_eq!(tile.commands[1].play_ms, 100 + DIE_SHAKE_MS);
        assert_eq!(pass.effects()[0].play_ms, 100 + DIE_SHAKE_MS);
    }

    #[test]
    fn test_crush_empty_slot_is_noop() {
        let mut board = Board::from_layout(&STRIPES, 1).unwrap();
        let mut pass = Pass::new();
        let pos = GridPos::new(5, 5);
        assert!(pass.crush(&mut board, pos, false, 0).is_some());
        assert!(pass.crush(&mut board, pos, false, 0).is_none());
        assert_eq!(pass.effects().len(), 1);
        assert_eq!(pass.changed().len(), 1);
    }

    #[test]
    fn test_finish_reports_views_and_clock() {
        let mut board = Board::from_layout(&STRIPES, 1).unwrap();
        let mut pass = Pass::new();
        pass.crush(&mut board, GridPos::new(1, 1), false, 0);
        pass.advance(DIE_MS);
        pass.count_cycle();

        let res = pass.finish(&board);
        assert_eq!(res.changed.len(), 1);
        assert!(res.changed[0].dead);
        assert_eq!(res.crushed().count(), 1);
        assert_eq!(res.survivors().count(), 0);
        assert_eq!(res.cycles, 1);
        assert_eq!(res.duration_ms, DIE_MS);
    }
}
