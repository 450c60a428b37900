//! Move resolver - reposition the top group of one lane onto another
//!
//! `resolve_move` is pure over its board argument: it clones, reshapes the clone,
//! and reports what changed as an ordered event list. Illegal moves come back as
//! a rejection with zero events and the original board.

use tracing::{debug, instrument};

use crate::board::Board;
use crate::ids::IdSource;
use crate::types::{Cup, GameEvent, LANE_CAPACITY, LANE_COUNT, MAX_HEIGHT};
use crate::win::check_win;

/// Why a move was refused. Always resumable: the player simply picks again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveRejection {
    LaneOutOfRange,
    SameLane,
    EmptySource,
    LargerOntoSmaller,
    ChainedMerge,
    MaxSize,
    LockedMerge,
}

impl MoveRejection {
    pub fn code(self) -> &'static str {
        match self {
            MoveRejection::LaneOutOfRange => "lane_out_of_range",
            MoveRejection::SameLane => "same_lane",
            MoveRejection::EmptySource => "empty_source",
            MoveRejection::LargerOntoSmaller => "larger_onto_smaller",
            MoveRejection::ChainedMerge
            | MoveRejection::MaxSize
            | MoveRejection::LockedMerge => "illegal_merge",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            MoveRejection::LaneOutOfRange => "That lane does not exist.",
            MoveRejection::SameLane => "Pick a different lane to move to.",
            MoveRejection::EmptySource => "There is nothing to move in that lane.",
            MoveRejection::LargerOntoSmaller => "A cup cannot sit on a smaller cup.",
            MoveRejection::ChainedMerge => "Linked cups cannot merge.",
            MoveRejection::MaxSize => "Size-5 cups cannot merge any further.",
            MoveRejection::LockedMerge => "Locked cups cannot merge.",
        }
    }
}

/// Result of [`resolve_move`]
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    pub board: Board,
    pub events: Vec<GameEvent>,
    pub message: String,
    pub rejection: Option<MoveRejection>,
    /// The destination lane overflowed
    pub lost: bool,
    /// The move completed a winning stack
    pub won: bool,
}

impl MoveOutcome {
    fn rejected(board: &Board, why: MoveRejection) -> Self {
        Self {
            board: board.clone(),
            events: Vec::new(),
            message: why.message().to_string(),
            rejection: Some(why),
            lost: false,
            won: false,
        }
    }

    /// Lane `lane` ends up `height` cups tall: the game is lost. `board` is
    /// returned as given.
    fn overflowed(board: &Board, lane: usize, height: usize) -> Self {
        let message = overflow_message(lane, height);
        Self {
            board: board.clone(),
            events: vec![GameEvent::GameOver {
                message: message.clone(),
            }],
            message,
            rejection: None,
            lost: true,
            won: false,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.rejection.is_none()
    }
}

/// Move the top group of `from` onto `to`.
///
/// - Empty destination: the group lands as is.
/// - Smaller base: the group stacks and each cup relinks against its new neighbor.
/// - Equal size: a single, unlocked, sub-5 cup merges with the destination top into
///   a new cup with a fresh id from `ids`.
/// - Larger base: rejected.
///
/// A destination pushed past the height limit ends the game (`lost`).
#[instrument(level = "debug", skip(board, ids))]
pub fn resolve_move(board: &Board, from: usize, to: usize, ids: &mut IdSource) -> MoveOutcome {
    let rejection = if from >= LANE_COUNT || to >= LANE_COUNT {
        Some(MoveRejection::LaneOutOfRange)
    } else if from == to {
        Some(MoveRejection::SameLane)
    } else if board.is_empty(from) {
        Some(MoveRejection::EmptySource)
    } else {
        None
    };
    if let Some(why) = rejection {
        debug!(code = why.code(), "move rejected");
        return MoveOutcome::rejected(board, why);
    }

    if let Some(lane) = board.overflowed_lane() {
        debug!(lane, "move on a board that already overflowed");
        return MoveOutcome::overflowed(board, lane, board.height(lane));
    }

    let group = board.moving_group(from);
    let base = group[0];
    let group_len = group.len();

    // Unvalidated links can make a group longer than any real chain.
    let stacked = board.height(to) + group_len;
    if stacked > LANE_CAPACITY {
        debug!(to, stacked, "move would spill past lane storage");
        return MoveOutcome::overflowed(board, to, stacked);
    }

    match board.top(to).copied() {
        Some(top) if base.size > top.size => {
            debug!(base = base.size, top = top.size, "move rejected: larger onto smaller");
            MoveOutcome::rejected(board, MoveRejection::LargerOntoSmaller)
        }
        Some(top) if base.size == top.size => {
            merge(board, from, to, base, top, group_len, ids)
        }
        _ => stack(board, from, to, group_len),
    }
}

fn stack(board: &Board, from: usize, to: usize, group_len: usize) -> MoveOutcome {
    let mut next = board.clone();
    let group = next.take_group(from, group_len);

    let mut events = Vec::with_capacity(group.len() + 1);
    let mut links = Vec::new();
    for cup in group {
        let was_linked = cup.linked;
        let (index, placed) = next.place(to, cup);
        events.push(GameEvent::Move {
            cup: placed.id,
            lane: to,
            index,
        });
        if placed.linked && !was_linked {
            links.push(GameEvent::Link {
                cup: placed.id,
                lane: to,
                index,
            });
        }
    }
    events.extend(links);

    let moved = group_len;
    let message = if moved == 1 {
        format!("Moved a cup from lane {} to lane {}.", from + 1, to + 1)
    } else {
        format!("Moved {} cups from lane {} to lane {}.", moved, from + 1, to + 1)
    };

    finish(next, events, message)
}

fn merge(
    board: &Board,
    from: usize,
    to: usize,
    base: Cup,
    top: Cup,
    group_len: usize,
    ids: &mut IdSource,
) -> MoveOutcome {
    if group_len > 1 {
        return MoveOutcome::rejected(board, MoveRejection::ChainedMerge);
    }
    if !base.can_merge() {
        return MoveOutcome::rejected(board, MoveRejection::MaxSize);
    }
    if top.linked || base.linked {
        return MoveOutcome::rejected(board, MoveRejection::LockedMerge);
    }

    let mut next = board.clone();
    next.pop(from);
    next.pop(to);

    let size = base.size + 1;
    let (index, merged) = next.place(to, Cup::new(ids.fresh(), size));

    let mut events = vec![GameEvent::Merge {
        cup: merged.id,
        consumed: [base.id, top.id],
        lane: to,
        index,
        size,
    }];
    if merged.linked {
        events.push(GameEvent::Link {
            cup: merged.id,
            lane: to,
            index,
        });
    }

    let message = format!("Merged into a size-{} cup in lane {}.", size, to + 1);
    finish(next, events, message)
}

fn finish(board: Board, mut events: Vec<GameEvent>, mut message: String) -> MoveOutcome {
    let mut lost = false;
    let mut won = false;
    if let Some(lane) = board.overflowed_lane() {
        message = overflow_message(lane, board.height(lane));
        events.push(GameEvent::GameOver {
            message: message.clone(),
        });
        lost = true;
    } else if check_win(&board) {
        won = true;
    }

    MoveOutcome {
        board,
        events,
        message,
        rejection: None,
        lost,
        won,
    }
}

fn overflow_message(lane: usize, height: usize) -> String {
    format!(
        "Lane {} is stacked {} high; the limit is {}.",
        lane + 1,
        height,
        MAX_HEIGHT
    )
}
