//! Bomb module - wavefront detonation of special tiles
//!
//! Special tiles crushed during a cascade cycle detonate in waves. Every
//! special tile a wave crushes joins the next wave; the loop ends once a wave
//! crushes no further specials. The virtual clock advances once per wave.

use std::collections::HashSet;

use crate::board::Board;
use crate::pass::Pass;
use crate::types::{
    EffectAction, GridPos, SpecialStatus, TileId, TileKind, BOMB_BIRD_DELAY_MS, BOMB_DELAY_MS,
    GRID_HEIGHT, GRID_WIDTH,
};

/// Manhattan radius of a wrap bomb's blast (a diamond, not a square)
pub const WRAP_RADIUS: u32 = 2;

/// Detonate `wave` and every special tile it chains into.
///
/// A tile detonates at most once per call, however many times it is queued.
pub fn detonate(board: &mut Board, pass: &mut Pass, wave: Vec<TileId>, step: u32) {
    let mut detonated: HashSet<TileId> = HashSet::new();
    let mut wave = wave;

    loop {
        wave.retain(|id| detonated.insert(*id));
        if wave.is_empty() {
            break;
        }

        let mut next = Vec::new();
        let mut delay = BOMB_DELAY_MS;

        for id in wave {
            let Some(tile) = board.tile(id) else {
                continue;
            };
            let (status, kind, at) = (tile.status, tile.kind, tile.pos);

            match status {
                SpecialStatus::Line => {
                    for x in 1..=GRID_WIDTH as i8 {
                        crush_chained(board, pass, GridPos::new(x, at.y), false, step, &mut next);
                    }
                    pass.push_effect(EffectAction::RowBomb, pass.clock_ms(), at, None);
                }
                SpecialStatus::Column => {
                    for y in 1..=GRID_HEIGHT as i8 {
                        crush_chained(board, pass, GridPos::new(at.x, y), false, step, &mut next);
                    }
                    pass.push_effect(EffectAction::ColBomb, pass.clock_ms(), at, None);
                }
                SpecialStatus::Wrap => {
                    for pos in sweep_order().filter(|p| p.manhattan(at) <= WRAP_RADIUS) {
                        crush_chained(board, pass, pos, false, step, &mut next);
                    }
                }
                SpecialStatus::ColorBomb => {
                    delay = delay.max(BOMB_BIRD_DELAY_MS);
                    let target = color_target(board, kind);
                    for pos in sweep_order() {
                        if board.kind_at(pos) == Some(target) {
                            crush_chained(board, pass, pos, true, step, &mut next);
                        }
                    }
                }
                SpecialStatus::None => {}
            }
        }

        pass.advance(delay);
        wave = next;
    }
}

/// Color a color bomb clears: its adopted base color, or a random pool color
/// when it still carries the Bird marker.
fn color_target(board: &mut Board, kind: TileKind) -> TileKind {
    if kind.is_base() {
        kind
    } else {
        board.draw_kind()
    }
}

/// Row by row from the bottom, left to right within a row
fn sweep_order() -> impl Iterator<Item = GridPos> {
    (1..=GRID_HEIGHT as i8).flat_map(|y| (1..=GRID_WIDTH as i8).map(move |x| GridPos::new(x, y)))
}

fn crush_chained(
    board: &mut Board,
    pass: &mut Pass,
    pos: GridPos,
    shake: bool,
    step: u32,
    next: &mut Vec<TileId>,
) {
    if let Some(id) = pass.crush(board, pos, shake, step) {
        if board.tile(id).is_some_and(|t| t.status.is_special()) {
            next.push(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::STRIPES;
    use crate::types::{CommandAction, EffectAction};

    fn stripes() -> Board {
        Board::from_layout(&STRIPES, 1).unwrap()
    }

    /// Take a tile off the board the way a match would, leaving it queued
    fn lift(board: &mut Board, pass: &mut Pass, pos: GridPos, status: SpecialStatus) -> TileId {
        board.set_status(pos, status).unwrap();
        pass.crush(board, pos, false, 0).unwrap()
    }

    #[test]
    fn test_line_clears_row() {
        let mut board = stripes();
        let mut pass = Pass::new();
        let id = lift(&mut board, &mut pass, GridPos::new(4, 3), SpecialStatus::Line);

        detonate(&mut board, &mut pass, vec![id], 0);

        for x in 1..=9 {
            assert!(board.get(GridPos::new(x, 3)).is_none());
        }
        assert!(board.get(GridPos::new(4, 2)).is_some());
        assert!(board.get(GridPos::new(4, 4)).is_some());
        assert_eq!(pass.clock_ms(), BOMB_DELAY_MS);
        assert!(pass
            .effects()
            .iter()
            .any(|e| e.action == EffectAction::RowBomb && e.pos == GridPos::new(4, 3)));
    }

    #[test]
    fn test_column_clears_column() {
        let mut board = stripes();
        let mut pass = Pass::new();
        let id = lift(&mut board, &mut pass, GridPos::new(7, 5), SpecialStatus::Column);

        detonate(&mut board, &mut pass, vec![id], 0);

        for y in 1..=9 {
            assert!(board.get(GridPos::new(7, y)).is_none());
        }
        assert!(board.get(GridPos::new(6, 5)).is_some());
        assert!(pass.effects().iter().any(|e| e.action == EffectAction::ColBomb));
    }

    #[test]
    fn test_wrap_clears_diamond() {
        let mut board = stripes();
        let mut pass = Pass::new();
        let center = GridPos::new(5, 5);
        let id = lift(&mut board, &mut pass, center, SpecialStatus::Wrap);

        detonate(&mut board, &mut pass, vec![id], 0);

        for pos in GridPos::all() {
            let inside = pos.manhattan(center) <= 2;
            assert_eq!(board.get(pos).is_none(), inside, "{:?}", pos);
        }
        // 13 cells in a radius-2 diamond, one of them the wrap tile itself
        assert_eq!(pass.effects().len(), 13);
    }

    #[test]
    fn test_color_bomb_clears_adopted_color_with_shake() {
        let mut board = stripes();
        let mut pass = Pass::new();
        let pos = GridPos::new(5, 5);
        board.set_status(pos, SpecialStatus::ColorBomb).unwrap();
        let id = board.get(pos).unwrap();
        board.tile_mut(id).unwrap().kind = TileKind::A;

        detonate(&mut board, &mut pass, vec![id], 0);

        for p in GridPos::all() {
            assert_ne!(board.kind_at(p), Some(TileKind::A));
        }
        assert!(board.kind_at(GridPos::new(1, 1)).is_some());
        assert_eq!(pass.clock_ms(), BOMB_BIRD_DELAY_MS);

        // Swept tiles flinch before dying
        let victim = pass.changed()[0];
        let cmds = &board.tile(victim).unwrap().commands;
        assert_eq!(cmds[0].action, CommandAction::Shake);
        assert_eq!(cmds[1].action, CommandAction::Die);
    }

    #[test]
    fn test_chained_detonation_runs_in_waves() {
        let mut board = stripes();
        let mut pass = Pass::new();
        // Line on row 2 hits a column bomb at (8, 2)
        board.set_status(GridPos::new(8, 2), SpecialStatus::Column).unwrap();
        let id = lift(&mut board, &mut pass, GridPos::new(1, 2), SpecialStatus::Line);

        detonate(&mut board, &mut pass, vec![id], 3);

        for y in 1..=9 {
            assert!(board.get(GridPos::new(8, y)).is_none());
        }
        assert_eq!(pass.clock_ms(), 2 * BOMB_DELAY_MS);

        let col_effect = pass
            .effects()
            .iter()
            .find(|e| e.action == EffectAction::ColBomb)
            .unwrap();
        assert_eq!(col_effect.play_ms, BOMB_DELAY_MS);
        // The first crush is the lift itself
        assert!(pass
            .effects()
            .iter()
            .skip(1)
            .filter(|e| e.action == EffectAction::Crush)
            .all(|e| e.step == Some(3)));
    }

    #[test]
    fn test_mixed_wave_uses_longest_delay() {
        let mut board = stripes();
        let mut pass = Pass::new();
        let line = lift(&mut board, &mut pass, GridPos::new(1, 9), SpecialStatus::Line);
        let bird = lift(&mut board, &mut pass, GridPos::new(5, 1), SpecialStatus::ColorBomb);
        board.tile_mut(bird).unwrap().kind = TileKind::B;

        detonate(&mut board, &mut pass, vec![line, bird], 0);

        assert_eq!(pass.clock_ms(), BOMB_BIRD_DELAY_MS);
    }

    #[test]
    fn test_duplicate_queue_entries_detonate_once() {
        let mut board = stripes();
        let mut pass = Pass::new();
        let id = lift(&mut board, &mut pass, GridPos::new(4, 3), SpecialStatus::Line);

        detonate(&mut board, &mut pass, vec![id, id], 0);

        let row_bombs = pass
            .effects()
            .iter()
            .filter(|e| e.action == EffectAction::RowBomb)
            .count();
        assert_eq!(row_bombs, 1);
        assert_eq!(pass.clock_ms(), BOMB_DELAY_MS);
    }

    #[test]
    fn test_bird_marker_picks_pool_color() {
        let mut board = stripes();
        let mut pass = Pass::new();
        let id = lift(&mut board, &mut pass, GridPos::new(5, 5), SpecialStatus::ColorBomb);
        assert_eq!(board.tile(id).unwrap().kind, TileKind::Bird);

        detonate(&mut board, &mut pass, vec![id], 0);

        // Exactly one of the stripe colors vanished entirely
        let survivors: Vec<TileKind> = GridPos::all().filter_map(|p| board.kind_at(p)).collect();
        let gone: Vec<TileKind> = [TileKind::A, TileKind::B, TileKind::C]
            .into_iter()
            .filter(|k| !survivors.contains(k))
            .collect();
        assert_eq!(gone.len(), 1);
    }

    #[test]
    fn test_empty_wave_does_not_advance_clock() {
        let mut board = stripes();
        let mut pass = Pass::new();
        detonate(&mut board, &mut pass, Vec::new(), 0);
        assert_eq!(pass.clock_ms(), 0);
        assert!(pass.effects().is_empty());
    }
}
