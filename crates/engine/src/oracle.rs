//! Forced-loss oracle - prove the next forced drop cannot be survived
//!
//! Only a lane capped by a linked size-1 cup (or already full) can doom the next
//! drop, so the search is a flat scan: skip, then every legal move, each followed
//! by the drop. The first survivable line ends the scan.

use tracing::{debug, instrument};

use crate::core::types::MAX_HEIGHT;
use crate::core::{resolve_drop, Board, BoardError, IdSource};
use crate::legal::accepted_moves;

/// Returns a loss message when every option ahead of the drop into
/// `next_drop_lane` loses, `None` when at least one line survives.
///
/// All simulation runs on scratch id sources.
#[instrument(level = "debug", skip(board))]
pub fn detect_forced_loss(
    board: &Board,
    next_drop_lane: usize,
) -> Result<Option<String>, BoardError> {
    let lane = board
        .lane(next_drop_lane)
        .ok_or(BoardError::LaneOutOfRange(next_drop_lane))?;

    if lane.len() >= MAX_HEIGHT {
        debug!(next_drop_lane, "forced loss: drop lane is full");
        return Ok(Some(format!(
            "Lane {} is full and the next drop is headed there.",
            next_drop_lane + 1
        )));
    }

    if !lane.last().is_some_and(|top| top.is_locking()) {
        return Ok(None);
    }

    if survives_drop(board, next_drop_lane)? {
        debug!("safe: skipping survives");
        return Ok(None);
    }

    for (mv, out) in accepted_moves(board) {
        if out.won {
            debug!(?mv, "safe: move wins outright");
            return Ok(None);
        }
        if out.lost {
            continue;
        }
        if survives_drop(&out.board, next_drop_lane)? {
            debug!(?mv, "safe: move then drop survives");
            return Ok(None);
        }
    }

    debug!(next_drop_lane, "forced loss: no move avoids the drop");
    Ok(Some(format!(
        "No move can save lane {} from the next drop.",
        next_drop_lane + 1
    )))
}

fn survives_drop(board: &Board, lane: usize) -> Result<bool, BoardError> {
    let mut ids = IdSource::scratch();
    Ok(!resolve_drop(board, lane, &mut ids)?.lost)
}
