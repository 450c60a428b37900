//! Core types module - shared data structures and rule constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are plain data with no behavior beyond small helpers, making them
//! usable in any context (resolvers, the turn state machine, host protocols).
//!
//! # Rule Set
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `LANE_COUNT` | 4 | Number of lanes on the board |
//! | `MAX_HEIGHT` | 6 | Tallest legal resting height of a lane |
//! | `MIN_SIZE` | 1 | Size of a freshly dropped cup |
//! | `MAX_SIZE` | 5 | Largest cup; cannot merge further |
//!
//! A lane is indexed bottom-up: index 0 is the bottom cup.
//!
//! # Examples
//!
//! ```
//! use cup_stack_types::{Cup, CupId, GameEvent, MAX_SIZE};
//!
//! let cup = Cup::new(CupId(7), 2);
//! assert!(!cup.linked);
//! assert!(cup.can_link_onto(&Cup::new(CupId(6), 3)));
//! assert!(!Cup::new(CupId(8), MAX_SIZE).can_merge());
//!
//! let ev = GameEvent::Link { cup: CupId(7), lane: 0, index: 1 };
//! assert_eq!(ev.kind(), "link");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of lanes on the board
pub const LANE_COUNT: usize = 4;

/// Maximum legal resting height of a lane (6 cups)
pub const MAX_HEIGHT: usize = 6;

/// Size of a freshly dropped cup
pub const MIN_SIZE: u8 = 1;

/// Largest cup size; size-5 cups never merge
pub const MAX_SIZE: u8 = 5;

/// Bottom-to-top sizes of a winning window.
pub const WIN_PATTERN: [u8; 5] = [5, 4, 3, 2, 1];

/// Lane storage capacity.
///
/// A lane at `MAX_HEIGHT` can receive a full moving group (at most `MAX_SIZE` cups)
/// before the overflow is reported, so storage must hold both.
pub const LANE_CAPACITY: usize = MAX_HEIGHT + MAX_SIZE as usize;

/// Opaque cup identity.
///
/// Ids are unique for the lifetime of a game and never reused. A merge consumes
/// its two inputs and produces a cup with a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CupId(pub u32);

impl fmt::Display for CupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A sized token resting in a lane
///
/// `linked` means the cup is chained to the cup directly below it and must move
/// with it. It is a derived value: whoever places a cup on a new neighbor
/// recomputes it with [`Cup::can_link_onto`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cup {
    pub id: CupId,
    pub size: u8,
    #[serde(default)]
    pub linked: bool,
}

impl Cup {
    /// Create an unlinked cup
    pub fn new(id: CupId, size: u8) -> Self {
        Self {
            id,
            size,
            linked: false,
        }
    }

    /// Whether this cup would chain onto `below` (sizes differ by exactly one)
    pub fn can_link_onto(&self, below: &Cup) -> bool {
        below.size.checked_sub(self.size) == Some(1)
    }

    /// Whether a cup of this size can still grow by merging
    pub fn can_merge(&self) -> bool {
        self.size < MAX_SIZE
    }

    /// A size-1 cup chained to a size-2 cup; the lane can no longer absorb a drop.
    pub fn is_locking(&self) -> bool {
        self.linked && self.size == MIN_SIZE
    }
}

/// A single declarative fact about a board change.
///
/// Resolvers emit these in order; consumers apply them in emitted order and are
/// free to batch or animate them however they like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    /// A cup was repositioned to `lane`/`index`
    Move { cup: CupId, lane: usize, index: usize },
    /// Two equal cups were consumed and `cup` now sits at `lane`/`index` with `size`
    Merge {
        cup: CupId,
        consumed: [CupId; 2],
        lane: usize,
        index: usize,
        size: u8,
    },
    /// `cup` became chained to the cup below it
    Link { cup: CupId, lane: usize, index: usize },
    /// A new cup landed at `lane`/`index`
    Drop {
        cup: CupId,
        lane: usize,
        index: usize,
        size: u8,
    },
    /// Terminal: the game is lost
    GameOver { message: String },
}

impl GameEvent {
    /// Protocol tag of the event
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::Move { .. } => "move",
            GameEvent::Merge { .. } => "merge",
            GameEvent::Link { .. } => "link",
            GameEvent::Drop { .. } => "drop",
            GameEvent::GameOver { .. } => "gameOver",
        }
    }

    /// The cup the event is about, if any
    pub fn cup(&self) -> Option<CupId> {
        match self {
            GameEvent::Move { cup, .. }
            | GameEvent::Merge { cup, .. }
            | GameEvent::Link { cup, .. }
            | GameEvent::Drop { cup, .. } => Some(*cup),
            GameEvent::GameOver { .. } => None,
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self, GameEvent::GameOver { .. })
    }
}
