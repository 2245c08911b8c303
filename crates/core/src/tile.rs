//! Tile module - tile identity, position bookkeeping and command logs
//!
//! Tiles live in an arena keyed by [`TileId`]. The grid stores handles only,
//! so a crushed tile leaves the grid immediately but stays reachable through
//! its handle until the presentation layer has consumed its final log.

use std::collections::HashMap;

use crate::types::{
    Command, CommandAction, GridPos, SpecialStatus, TileId, TileKind, DIE_MS, DIE_SHAKE_MS,
    TOUCH_MOVE_MS,
};

/// One grid cell occupant
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub id: TileId,
    pub kind: TileKind,
    pub status: SpecialStatus,
    /// Current grid coordinate
    pub pos: GridPos,
    /// Coordinate the tile visually originates from
    pub spawn_pos: GridPos,
    /// Timed commands accumulated during the current resolution pass
    pub commands: Vec<Command>,
    pub dead: bool,
}

impl Tile {
    fn new(id: TileId, kind: TileKind, pos: GridPos, spawn_pos: GridPos) -> Self {
        Self {
            id,
            kind,
            status: SpecialStatus::None,
            pos,
            spawn_pos,
            commands: Vec::new(),
            dead: false,
        }
    }

    /// Slide to `pos` starting at `play_ms`; the tile's position follows.
    pub fn move_to(&mut self, pos: GridPos, play_ms: u32) {
        self.commands.push(Command {
            action: CommandAction::MoveTo(pos),
            play_ms,
            keep_ms: TOUCH_MOVE_MS,
        });
        self.pos = pos;
    }

    /// Bounce toward `pos` and back, starting at time 0. Position is unchanged.
    pub fn move_to_and_back(&mut self, pos: GridPos) {
        let home = self.pos;
        self.commands.push(Command {
            action: CommandAction::MoveTo(pos),
            play_ms: 0,
            keep_ms: TOUCH_MOVE_MS,
        });
        self.commands.push(Command {
            action: CommandAction::MoveTo(home),
            play_ms: TOUCH_MOVE_MS,
            keep_ms: TOUCH_MOVE_MS,
        });
    }

    pub fn die(&mut self, play_ms: u32) {
        self.commands.push(Command {
            action: CommandAction::Die,
            play_ms,
            keep_ms: DIE_MS,
        });
        self.dead = true;
    }

    pub fn shake(&mut self, play_ms: u32) {
        self.commands.push(Command {
            action: CommandAction::Shake,
            play_ms,
            keep_ms: DIE_SHAKE_MS,
        });
    }

    pub fn set_visible(&mut self, play_ms: u32, visible: bool) {
        self.commands.push(Command {
            action: CommandAction::SetVisible(visible),
            play_ms,
            keep_ms: 0,
        });
    }

    pub fn view(&self) -> TileView {
        TileView {
            id: self.id,
            kind: self.kind,
            status: self.status,
            pos: self.pos,
            spawn_pos: self.spawn_pos,
            dead: self.dead,
            commands: self.commands.clone(),
        }
    }
}

/// Read-only copy of a changed tile handed to the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct TileView {
    pub id: TileId,
    pub kind: TileKind,
    pub status: SpecialStatus,
    pub pos: GridPos,
    pub spawn_pos: GridPos,
    pub dead: bool,
    pub commands: Vec<Command>,
}

/// Owner of every tile, live or awaiting log consumption
#[derive(Debug, Clone, Default)]
pub struct TileArena {
    tiles: HashMap<TileId, Tile>,
    next_id: u32,
}

impl TileArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh tile and return its handle
    pub fn spawn(&mut self, kind: TileKind, pos: GridPos, spawn_pos: GridPos) -> TileId {
        let id = TileId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.tiles.insert(id, Tile::new(id, kind, pos, spawn_pos));
        id
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    pub fn get_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Drop every command log and forget dead tiles.
    ///
    /// Returns the number of commands discarded; a second call returns 0.
    pub fn clear_command_logs(&mut self) -> usize {
        let mut cleared = 0;
        self.tiles.retain(|_, tile| {
            cleared += tile.commands.len();
            tile.commands.clear();
            !tile.dead
        });
        cleared
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }
}
