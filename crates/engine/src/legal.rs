//! Legal move enumeration

use serde::{Deserialize, Serialize};

use crate::core::types::LANE_COUNT;
use crate::core::{resolve_move, Board, IdSource, MoveOutcome};

/// An ordered (source, destination) lane pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LaneMove {
    pub from: usize,
    pub to: usize,
}

impl LaneMove {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }
}

/// Every accepted move on `board` together with its outcome.
///
/// Simulated on a scratch id source; the caller's ids are untouched.
pub fn accepted_moves(board: &Board) -> impl Iterator<Item = (LaneMove, MoveOutcome)> + '_ {
    let mut ids = IdSource::scratch();
    (0..LANE_COUNT)
        .filter(move |&from| !board.is_empty(from))
        .flat_map(|from| (0..LANE_COUNT).map(move |to| LaneMove::new(from, to)))
        .filter(|mv| mv.from != mv.to)
        .filter_map(move |mv| {
            let out = resolve_move(board, mv.from, mv.to, &mut ids);
            out.is_accepted().then_some((mv, out))
        })
}

/// Every move the move resolver would accept on `board`, in (from, to) order.
pub fn legal_moves(board: &Board) -> Vec<LaneMove> {
    accepted_moves(board).map(|(mv, _)| mv).collect()
}
