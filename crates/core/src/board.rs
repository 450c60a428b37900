//! Board module - four lanes of stacked cups
//!
//! Each lane is a bottom-up stack stored inline (no heap allocation per lane).
//! Index 0 is the bottom cup; the last element is the top.
//!
//! Mutation is crate-private: resolvers clone the input board and reshape the clone,
//! so callers only ever observe whole board values.

use std::collections::HashSet;
use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Cup, CupId, LANE_CAPACITY, LANE_COUNT, MAX_HEIGHT, MAX_SIZE, MIN_SIZE};

/// A single lane, bottom cup first
pub type Lane = ArrayVec<Cup, LANE_CAPACITY>;

/// Structural problems with a board value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("lane {0} does not exist")]
    LaneOutOfRange(usize),
    #[error("lane {lane} holds {height} cups, more than it can store")]
    Capacity { lane: usize, height: usize },
    #[error("lane {lane} is {height} cups tall")]
    Overflow { lane: usize, height: usize },
    #[error("cup at lane {lane} index {index} has size {size}")]
    InvalidSize { lane: usize, index: usize, size: u8 },
    #[error("cup at lane {lane} index {index} is linked to a cup it cannot chain onto")]
    BadLink { lane: usize, index: usize },
    #[error("cup id {0} appears more than once")]
    DuplicateId(CupId),
}

impl BoardError {
    pub fn code(&self) -> &'static str {
        match self {
            BoardError::LaneOutOfRange(_) => "lane_out_of_range",
            BoardError::Capacity { .. } | BoardError::Overflow { .. } => "lane_overflow",
            BoardError::InvalidSize { .. } => "invalid_size",
            BoardError::BadLink { .. } => "bad_link",
            BoardError::DuplicateId(_) => "duplicate_id",
        }
    }
}

/// The game board - exactly four lanes
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    lanes: [Lane; LANE_COUNT],
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from explicit lanes, bottom cup first.
    ///
    /// Cups are taken as given (including `linked`); call [`Board::validate`] to
    /// check them against the rule set.
    pub fn with_lanes(lanes: [Vec<Cup>; LANE_COUNT]) -> Result<Self, BoardError> {
        let mut board = Self::new();
        for (i, cups) in lanes.into_iter().enumerate() {
            if cups.len() > LANE_CAPACITY {
                return Err(BoardError::Capacity {
                    lane: i,
                    height: cups.len(),
                });
            }
            board.lanes[i].extend(cups);
        }
        Ok(board)
    }

    /// Cups of a lane, bottom first. `None` if the lane does not exist.
    pub fn lane(&self, lane: usize) -> Option<&[Cup]> {
        self.lanes.get(lane).map(|l| l.as_slice())
    }

    /// All lanes in index order
    pub fn lanes(&self) -> impl Iterator<Item = &[Cup]> + '_ {
        self.lanes.iter().map(|l| l.as_slice())
    }

    /// Number of cups in a lane (0 for a lane that does not exist)
    pub fn height(&self, lane: usize) -> usize {
        self.lanes.get(lane).map_or(0, |l| l.len())
    }

    pub fn is_empty(&self, lane: usize) -> bool {
        self.height(lane) == 0
    }

    /// Top cup of a lane
    pub fn top(&self, lane: usize) -> Option<&Cup> {
        self.lanes.get(lane).and_then(|l| l.last())
    }

    /// Total number of cups on the board
    pub fn cup_count(&self) -> usize {
        self.lanes.iter().map(|l| l.len()).sum()
    }

    /// Length of the moving group at the top of `lane`.
    ///
    /// The group is the top cup plus every cup below it reachable through
    /// `linked` cups. Empty or missing lanes have a group of length 0.
    pub fn moving_group_len(&self, lane: usize) -> usize {
        let Some(cups) = self.lane(lane) else {
            return 0;
        };
        if cups.is_empty() {
            return 0;
        }
        let mut start = cups.len() - 1;
        while start > 0 && cups[start].linked {
            start -= 1;
        }
        cups.len() - start
    }

    /// The moving group itself, bottom cup first
    pub fn moving_group(&self, lane: usize) -> &[Cup] {
        let len = self.moving_group_len(lane);
        match self.lane(lane) {
            Some(cups) => &cups[cups.len() - len..],
            None => &[],
        }
    }

    /// Highest cup id on the board
    pub fn max_id(&self) -> Option<CupId> {
        self.lanes.iter().flat_map(|l| l.iter()).map(|c| c.id).max()
    }

    /// Whether any lane exceeds the legal resting height
    pub fn overflowed_lane(&self) -> Option<usize> {
        self.lanes.iter().position(|l| l.len() > MAX_HEIGHT)
    }

    /// Check sizes, linkage, and id uniqueness.
    ///
    /// Height is not checked here: an overflowed lane is a terminal state, not a
    /// malformed one. Use [`Board::overflowed_lane`] for that.
    pub fn validate(&self) -> Result<(), BoardError> {
        let mut seen = HashSet::new();
        for (lane, cups) in self.lanes.iter().enumerate() {
            for (index, cup) in cups.iter().enumerate() {
                if !(MIN_SIZE..=MAX_SIZE).contains(&cup.size) {
                    return Err(BoardError::InvalidSize {
                        lane,
                        index,
                        size: cup.size,
                    });
                }
                if cup.linked {
                    let chains = index > 0 && cup.can_link_onto(&cups[index - 1]);
                    if !chains {
                        return Err(BoardError::BadLink { lane, index });
                    }
                }
                if !seen.insert(cup.id) {
                    return Err(BoardError::DuplicateId(cup.id));
                }
            }
        }
        Ok(())
    }

    /// Put `cup` on top of `lane`, recomputing `linked` against its new neighbor.
    ///
    /// Returns the index it landed at and the cup as placed.
    pub(crate) fn place(&mut self, lane: usize, mut cup: Cup) -> (usize, Cup) {
        let stack = &mut self.lanes[lane];
        cup.linked = stack.last().is_some_and(|below| cup.can_link_onto(below));
        let index = stack.len();
        stack.push(cup);
        (index, cup)
    }

    pub(crate) fn pop(&mut self, lane: usize) -> Option<Cup> {
        self.lanes[lane].pop()
    }

    /// Lift the top `len` cups off `lane`, bottom cup first.
    pub(crate) fn take_group(&mut self, lane: usize, len: usize) -> Lane {
        let stack = &mut self.lanes[lane];
        let start = stack.len().saturating_sub(len);
        stack.drain(start..).collect()
    }
}

impl fmt::Display for Board {
    /// One line per lane, bottom first; `~` marks a linked cup.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, lane) in self.lanes.iter().enumerate() {
            write!(f, "{}:", i)?;
            for cup in lane {
                write!(f, " {}{}", cup.size, if cup.linked { "~" } else { "" })?;
            }
            if i + 1 < LANE_COUNT {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cup(id: u32, size: u8, linked: bool) -> Cup {
        Cup {
            id: CupId(id),
            size,
            linked,
        }
    }

    #[test]
    fn new_board_is_empty() {
        let board = Board::new();
        for lane in 0..LANE_COUNT {
            assert_eq!(board.height(lane), 0);
            assert!(board.top(lane).is_none());
            assert_eq!(board.moving_group_len(lane), 0);
        }
        assert_eq!(board.lane(LANE_COUNT), None);
        assert_eq!(board.cup_count(), 0);
    }

    #[test]
    fn moving_group_follows_links_from_the_top() {
        let board = Board::with_lanes([
            vec![cup(1, 5, false), cup(2, 4, true), cup(3, 3, true)],
            vec![cup(4, 3, false), cup(5, 1, false)],
            vec![cup(6, 2, false)],
            vec![],
        ])
        .unwrap();

        assert_eq!(board.moving_group_len(0), 3);
        assert_eq!(board.moving_group_len(1), 1);
        assert_eq!(board.moving_group_len(2), 1);
        assert_eq!(board.moving_group_len(3), 0);
        assert_eq!(board.moving_group(0)[0].id, CupId(1));
    }

    #[test]
    fn moving_group_stops_at_unlinked_cup() {
        let board = Board::with_lanes([
            vec![cup(1, 4, false), cup(2, 2, false), cup(3, 1, true)],
            vec![],
            vec![],
            vec![],
        ])
        .unwrap();
        let group = board.moving_group(0);
        assert_eq!(group.len(), 2);
        assert_eq!(group[0].id, CupId(2));
    }

    #[test]
    fn place_recomputes_link() {
        let mut board = Board::new();
        let (i0, c0) = board.place(0, cup(1, 3, true));
        assert_eq!(i0, 0);
        assert!(!c0.linked, "a bottom cup never links");

        let (i1, c1) = board.place(0, cup(2, 2, false));
        assert_eq!(i1, 1);
        assert!(c1.linked);

        let (_, c2) = board.place(0, cup(3, 1, false));
        assert!(c2.linked);
        assert_eq!(board.moving_group_len(0), 3);
    }

    #[test]
    fn take_group_preserves_order() {
        let mut board = Board::with_lanes([
            vec![cup(1, 4, false), cup(2, 3, true), cup(3, 2, true)],
            vec![],
            vec![],
            vec![],
        ])
        .unwrap();
        let group = board.take_group(0, 2);
        assert_eq!(group.iter().map(|c| c.id.0).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(board.height(0), 1);
    }

    #[test]
    fn validate_rejects_bad_state() {
        let oversized = Board::with_lanes([vec![cup(1, 6, false)], vec![], vec![], vec![]]).unwrap();
        assert!(matches!(
            oversized.validate(),
            Err(BoardError::InvalidSize { size: 6, .. })
        ));

        let bottom_link = Board::with_lanes([vec![cup(1, 2, true)], vec![], vec![], vec![]]).unwrap();
        assert_eq!(
            bottom_link.validate(),
            Err(BoardError::BadLink { lane: 0, index: 0 })
        );

        let wrong_gap =
            Board::with_lanes([vec![cup(1, 4, false), cup(2, 2, true)], vec![], vec![], vec![]])
                .unwrap();
        assert_eq!(
            wrong_gap.validate(),
            Err(BoardError::BadLink { lane: 0, index: 1 })
        );

        let dup = Board::with_lanes([vec![cup(1, 2, false)], vec![cup(1, 3, false)], vec![], vec![]])
            .unwrap();
        assert_eq!(dup.validate(), Err(BoardError::DuplicateId(CupId(1))));
    }

    #[test]
    fn with_lanes_rejects_capacity() {
        let tall = (0..=LANE_CAPACITY as u32).map(|i| cup(i, 1, false)).collect();
        let err = Board::with_lanes([tall, vec![], vec![], vec![]]).unwrap_err();
        assert_eq!(err.code(), "lane_overflow");
    }

    #[test]
    fn display_marks_links() {
        let board = Board::with_lanes([
            vec![cup(1, 3, false), cup(2, 2, true)],
            vec![],
            vec![cup(3, 1, false)],
            vec![],
        ])
        .unwrap();
        assert_eq!(board.to_string(), "0: 3 2~\n1:\n2: 1\n3:");
    }
}
