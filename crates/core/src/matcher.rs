//! Matcher module - run detection and match classification
//!
//! Pure functions over a [`Board`]: nothing here mutates the grid. The
//! cascade engine applies whatever outcome these functions pick.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::types::{GridPos, SpecialStatus, TileKind, GRID_HEIGHT, GRID_SIZE, GRID_WIDTH};

/// Longest possible run along one axis
pub const RUN_CAP: usize = if GRID_WIDTH > GRID_HEIGHT {
    GRID_WIDTH as usize
} else {
    GRID_HEIGHT as usize
};

/// Largest union of a row run and a column run (they share the pivot)
pub const MATCH_CAP: usize = GRID_WIDTH as usize + GRID_HEIGHT as usize - 1;

pub type Run = ArrayVec<GridPos, RUN_CAP>;
pub type MatchPoints = ArrayVec<GridPos, MATCH_CAP>;

/// Search axis for [`run_from`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl Axis {
    fn directions(self) -> [(i8, i8); 2] {
        match self {
            Axis::Row => [(1, 0), (-1, 0)],
            Axis::Column => [(0, -1), (0, 1)],
        }
    }
}

/// Result of classifying one grid position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Every tile the match crushes; empty when nothing matched
    pub points: MatchPoints,
    /// Special tile the match produces at `pivot`
    pub status: SpecialStatus,
    /// Kind of the matched tiles
    pub kind: TileKind,
    /// Anchor of the classification; a special tile spawns here
    pub pivot: GridPos,
}

impl MatchOutcome {
    pub fn is_match(&self) -> bool {
        self.points.len() >= 3
    }

    /// Check if `other` should replace `self` as the best candidate.
    ///
    /// Higher rank wins; equal rank falls back to the larger match. Line and
    /// Column share a rank, so at equal size the first one found stays.
    pub fn is_beaten_by(&self, other: &MatchOutcome) -> bool {
        let (mine, theirs) = (self.status.rank(), other.status.rank());
        theirs > mine || (theirs == mine && other.points.len() > self.points.len())
    }
}

#[inline(always)]
fn slot(pos: GridPos) -> usize {
    (pos.y as usize - 1) * GRID_WIDTH as usize + (pos.x as usize - 1)
}

/// Collect the connected run of same-kind tiles through `pos` along one axis.
///
/// Breadth-first flood fill restricted to the axis' two directions. The run
/// includes `pos` itself; order is unspecified. An empty or off-board start
/// yields an empty run.
pub fn run_from(board: &Board, pos: GridPos, axis: Axis) -> Run {
    let mut run = Run::new();
    let Some(kind) = board.kind_at(pos) else {
        return run;
    };

    let mut visited = [false; GRID_SIZE];
    visited[slot(pos)] = true;
    run.push(pos);

    let mut front = 0;
    while front < run.len() {
        let point = run[front];
        front += 1;

        for (dx, dy) in axis.directions() {
            let next = point.offset(dx, dy);
            if !next.in_bounds() || visited[slot(next)] {
                continue;
            }
            if board.kind_at(next) == Some(kind) {
                visited[slot(next)] = true;
                run.push(next);
            }
        }
    }

    run
}

/// Classify the match anchored at `pos`.
///
/// Returns `None` for an empty slot. Otherwise the special status is decided
/// most-specific first: a run of five in either axis makes a color bomb,
/// runs of three in both axes make a wrap, a row of four makes a line and a
/// column of four makes a column bomb.
pub fn classify(board: &Board, pos: GridPos) -> Option<MatchOutcome> {
    let kind = board.kind_at(pos)?;
    let row = run_from(board, pos, Axis::Row);
    let col = run_from(board, pos, Axis::Column);

    let status = if row.len() >= 5 || col.len() >= 5 {
        SpecialStatus::ColorBomb
    } else if row.len() >= 3 && col.len() >= 3 {
        SpecialStatus::Wrap
    } else if row.len() >= 4 {
        SpecialStatus::Line
    } else if col.len() >= 4 {
        SpecialStatus::Column
    } else {
        SpecialStatus::None
    };

    let mut points = MatchPoints::new();
    if row.len() >= 3 {
        points.extend(row.iter().copied());
    }
    if col.len() >= 3 {
        for p in col {
            if !points.contains(&p) {
                points.push(p);
            }
        }
    }

    Some(MatchOutcome {
        points,
        status,
        kind,
        pivot: pos,
    })
}

/// Classify at `pos`, then probe every other matched point for a better outcome.
///
/// An L-shaped cluster is anchored wherever it yields the strongest special
/// tile, not wherever the player happened to swap.
pub fn classify_best(board: &Board, pos: GridPos) -> Option<MatchOutcome> {
    let mut best = classify(board, pos)?;
    if !best.is_match() {
        return Some(best);
    }

    let probes: MatchPoints = best.points.iter().copied().filter(|&p| p != pos).collect();
    for point in probes {
        if let Some(candidate) = classify(board, point) {
            if best.is_beaten_by(&candidate) {
                best = candidate;
            }
        }
    }

    Some(best)
}
