//! Core board logic - pure, deterministic, and testable
//!
//! This crate holds the rules of the cup stacking puzzle: what a move or a drop
//! does to a board, and when a board is won. It has no I/O and no global state.
//!
//! - **Deterministic**: same board, same ids, same seed give the same result
//! - **Pure**: every resolver takes `&Board` and returns a new board plus events
//! - **Explicit state**: the id counter ([`IdSource`]) and the RNG ([`SimpleRng`])
//!   are values owned and threaded by the caller
//!
//! # Module Structure
//!
//! - [`board`]: four lanes of cups, moving groups, structural validation
//! - [`ids`]: cup id source, with isolated scratch sources for simulation
//! - [`rng`]: seeded LCG and the forced-drop lane picker
//! - [`moves`]: the move resolver
//! - [`drops`]: the drop resolver
//! - [`win`]: the win detector
//!
//! # Example
//!
//! ```
//! use cup_stack_core::{resolve_drop, resolve_move, check_win, Board, IdSource};
//!
//! let mut ids = IdSource::new();
//! let board = Board::new();
//!
//! let drop = resolve_drop(&board, 0, &mut ids).unwrap();
//! assert_eq!(drop.board.height(0), 1);
//!
//! let mv = resolve_move(&drop.board, 0, 2, &mut ids);
//! assert!(mv.is_accepted());
//! assert_eq!(mv.board.height(2), 1);
//! assert!(!check_win(&mv.board));
//!
//! // The input board is never touched.
//! assert_eq!(board, Board::new());
//! ```

pub mod board;
pub mod drops;
pub mod ids;
pub mod moves;
pub mod rng;
pub mod win;

pub use cup_stack_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, BoardError, Lane};
pub use drops::{resolve_drop, DropOutcome};
pub use ids::IdSource;
pub use moves::{resolve_move, MoveOutcome, MoveRejection};
pub use rng::{pick_next_lane, SimpleRng};
pub use win::{check_win, lane_has_win, winning_lane};
