//! Game engine - lookahead and turn sequencing on top of the core rules
//!
//! - [`oracle`]: proves a position is lost before the losing drop happens
//! - [`legal`]: enumerates the moves the core would accept
//! - [`game`]: the turn state machine that turns player input into event streams
//! - [`snapshot`]: serializable game state
//!
//! # Example
//!
//! ```
//! use cup_stack_engine::{Game, Phase, TurnOutcome};
//!
//! let (mut game, opening) = Game::new(12345).unwrap();
//! assert_eq!(opening.events.len(), 2);
//!
//! // The host plays back the opening drops, then hands control to the player.
//! game.finish_animation().unwrap();
//! assert_eq!(game.phase(), Phase::SelectSource);
//!
//! let report = game.skip().unwrap();
//! assert_ne!(report.outcome, TurnOutcome::Rejected);
//! ```

pub mod game;
pub mod legal;
pub mod oracle;
pub mod snapshot;

pub use cup_stack_core as core;
pub use cup_stack_types as types;

pub use game::{Game, Phase, Selection, SnapshotError, TurnError, TurnOutcome, TurnReport};
pub use legal::{accepted_moves, legal_moves, LaneMove};
pub use oracle::detect_forced_loss;
pub use snapshot::GameSnapshot;
