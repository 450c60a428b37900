//! Serializable game snapshot for persistence, replay, and fixtures

use serde::{Deserialize, Serialize};

use crate::core::{Board, IdSource, SimpleRng};
use crate::game::Phase;

/// Everything needed to resume a [`crate::Game`] exactly where it stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub board: Board,
    pub ids: IdSource,
    pub rng: SimpleRng,
    pub seed: u32,
    pub next_drop_lane: usize,
    pub phase: Phase,
    pub turn: u32,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        self.phase.accepts_input()
    }
}
