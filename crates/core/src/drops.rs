//! Drop resolver - the forced size-1 drop that ends every turn

use tracing::{debug, instrument};

use crate::board::{Board, BoardError};
use crate::ids::IdSource;
use crate::types::{Cup, GameEvent, MAX_HEIGHT, MIN_SIZE};

/// Result of [`resolve_drop`]
#[derive(Debug, Clone, PartialEq)]
pub struct DropOutcome {
    pub board: Board,
    pub events: Vec<GameEvent>,
    pub message: String,
    pub lost: bool,
}

impl DropOutcome {
    fn game_over(board: &Board, message: String) -> Self {
        Self {
            board: board.clone(),
            events: vec![GameEvent::GameOver {
                message: message.clone(),
            }],
            message,
            lost: true,
        }
    }
}

/// Drop a new size-1 cup onto `lane`.
///
/// A full lane or a locked size-1 top ends the game and leaves the board as it was.
/// An unlocked size-1 top absorbs the drop into a size-2 cup. Anything else takes the
/// new cup on top, chained when it lands on a size-2 cup.
///
/// `lane` must exist; anything else is a caller bug reported as [`BoardError`].
#[instrument(level = "debug", skip(board, ids))]
pub fn resolve_drop(
    board: &Board,
    lane: usize,
    ids: &mut IdSource,
) -> Result<DropOutcome, BoardError> {
    let cups = board.lane(lane).ok_or(BoardError::LaneOutOfRange(lane))?;

    if cups.len() >= MAX_HEIGHT {
        debug!(lane, height = cups.len(), "drop into full lane");
        return Ok(DropOutcome::game_over(
            board,
            format!("Lane {} is full; the drop cannot land.", lane + 1),
        ));
    }

    let top = cups.last().copied();
    if top.is_some_and(|t| t.is_locking()) {
        debug!(lane, "drop onto locked size-1 cup");
        return Ok(DropOutcome::game_over(
            board,
            format!(
                "Lane {} is capped by a linked size-1 cup and cannot take another.",
                lane + 1
            ),
        ));
    }

    let mut next = board.clone();
    let dropped = Cup::new(ids.fresh(), MIN_SIZE);
    let mut events = Vec::with_capacity(3);

    let (message, landed) = match top {
        Some(t) if t.size == MIN_SIZE => {
            events.push(GameEvent::Drop {
                cup: dropped.id,
                lane,
                index: cups.len(),
                size: MIN_SIZE,
            });
            next.pop(lane);
            let size = MIN_SIZE + 1;
            let (index, merged) = next.place(lane, Cup::new(ids.fresh(), size));
            events.push(GameEvent::Merge {
                cup: merged.id,
                consumed: [t.id, dropped.id],
                lane,
                index,
                size,
            });
            (
                format!("The drop merged into a size-{} cup in lane {}.", size, lane + 1),
                (index, merged),
            )
        }
        _ => {
            let (index, placed) = next.place(lane, dropped);
            events.push(GameEvent::Drop {
                cup: placed.id,
                lane,
                index,
                size: MIN_SIZE,
            });
            (format!("A cup dropped into lane {}.", lane + 1), (index, placed))
        }
    };

    let (index, cup) = landed;
    if cup.linked {
        events.push(GameEvent::Link {
            cup: cup.id,
            lane,
            index,
        });
    }

    let height = next.height(lane);
    if height > MAX_HEIGHT {
        let message = format!("Lane {} overflowed.", lane + 1);
        events.push(GameEvent::GameOver {
            message: message.clone(),
        });
        return Ok(DropOutcome {
            board: next,
            events,
            message,
            lost: true,
        });
    }

    Ok(DropOutcome {
        board: next,
        events,
        message,
        lost: false,
    })
}
