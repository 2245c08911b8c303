//! Shared fixtures for integration tests

#![allow(dead_code)]

use match3::core::{run_from, Axis, Board, Resolution, Resolver, ResolverConfig};
use match3::types::{GridPos, GRID_HEIGHT};

/// Diagonal stripes of A, B and C: no runs anywhere, kind(x, y) = ABC[(x - y + 2) % 3]
pub const STRIPES: [&str; 9] = [
    "ABCABCABC",
    "BCABCABCA",
    "CABCABCAB",
    "ABCABCABC",
    "BCABCABCA",
    "CABCABCAB",
    "ABCABCABC",
    "BCABCABCA",
    "CABCABCAB",
];

/// Stripe board with `edits` applied as (x, y, symbol)
pub fn layout_with(edits: &[(i8, i8, char)]) -> Board {
    let mut rows: Vec<Vec<char>> = STRIPES.iter().map(|r| r.chars().collect()).collect();
    for &(x, y, c) in edits {
        rows[(GRID_HEIGHT as i8 - y) as usize][(x - 1) as usize] = c;
    }
    let rows: Vec<String> = rows.into_iter().map(|r| r.into_iter().collect()).collect();
    let refs: Vec<&str> = rows.iter().map(|s| s.as_str()).collect();
    Board::from_layout(&refs, 3).unwrap()
}

pub fn resolver_with(edits: &[(i8, i8, char)]) -> Resolver {
    Resolver::with_board(layout_with(edits), ResolverConfig::default())
}

/// Tap `a` then `b`
pub fn swap(resolver: &mut Resolver, a: (i8, i8), b: (i8, i8)) -> Resolution {
    let first = resolver.select_cell(GridPos::new(a.0, a.1)).unwrap();
    assert!(first.is_empty(), "first tap must only select");
    resolver.select_cell(GridPos::new(b.0, b.1)).unwrap()
}

/// True if any row or column run of three or more base-color tiles exists.
///
/// Bird runs are skipped: a bird spawned at its pivot is not re-examined, so
/// stacked birds can stay on a settled board.
pub fn has_run(board: &Board) -> bool {
    GridPos::all()
        .filter(|&p| board.kind_at(p).is_some_and(|k| k.is_base()))
        .any(|p| {
            run_from(board, p, Axis::Row).len() >= 3 || run_from(board, p, Axis::Column).len() >= 3
        })
}

/// Every orthogonally adjacent pair, each once
pub fn adjacent_pairs() -> impl Iterator<Item = (GridPos, GridPos)> {
    GridPos::all().flat_map(|p| {
        [p.offset(1, 0), p.offset(0, 1)]
            .into_iter()
            .filter(|q| q.in_bounds())
            .map(move |q| (p, q))
    })
}

/// First adjacent swap that resolves into at least one cascade cycle
pub fn find_productive_swap(resolver: &Resolver) -> Option<(GridPos, GridPos)> {
    adjacent_pairs().find(|&(a, b)| {
        let mut trial = resolver.clone();
        let _ = trial.select_cell(a);
        trial.select_cell(b).map(|r| r.cycles > 0).unwrap_or(false)
    })
}
