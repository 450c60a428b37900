//! Headless host - line-delimited JSON over any reader/writer pair
//!
//! Each input line is one [`Request`]; each request produces exactly one [`Reply`].
//! The host performs no playback, so it acknowledges every event stream as soon
//! as it has been written out.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::{
    Game, GameSnapshot, LaneMove, Selection, SnapshotError, TurnError, TurnReport,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Click-style lane pick (source, then destination)
    Select { lane: usize },
    /// Direct move from one lane to another
    Move { from: usize, to: usize },
    /// No move; take the forced drop
    Skip,
    /// Moves the player could make right now
    Hint,
    Snapshot,
    Restore { snapshot: GameSnapshot },
    Restart {
        #[serde(default)]
        seed: Option<u32>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reply {
    Turn(TurnReport),
    Selected { lane: usize },
    Deselected,
    Hint { moves: Vec<LaneMove> },
    Snapshot(GameSnapshot),
    Error { code: String, message: String },
}

impl Reply {
    fn error(code: &str, message: impl Into<String>) -> Self {
        Reply::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl From<TurnError> for Reply {
    fn from(e: TurnError) -> Self {
        Reply::error(e.code(), e.to_string())
    }
}

impl From<SnapshotError> for Reply {
    fn from(e: SnapshotError) -> Self {
        Reply::error(e.code(), e.to_string())
    }
}

/// Parse a single request line
pub fn parse_request(line: &str) -> Result<Request, serde_json::Error> {
    serde_json::from_str(line)
}

pub struct Host {
    game: Game,
}

impl Host {
    /// Start a game and return the opening turn
    pub fn new(seed: u32) -> Result<(Self, Reply), TurnError> {
        let (game, opening) = Game::new(seed)?;
        let mut host = Self { game };
        let reply = host.played(opening);
        Ok((host, reply))
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Handle one raw input line
    pub fn handle_line(&mut self, line: &str) -> Reply {
        match parse_request(line) {
            Ok(req) => self.handle(req),
            Err(e) => {
                warn!(error = %e, "unparseable request");
                Reply::error("invalid_request", e.to_string())
            }
        }
    }

    pub fn handle(&mut self, req: Request) -> Reply {
        debug!(?req, "request");
        match req {
            Request::Select { lane } => match self.game.select(lane) {
                Ok(Selection::Source(lane)) => Reply::Selected { lane },
                Ok(Selection::Deselected) => Reply::Deselected,
                Ok(Selection::EmptySource(lane)) => Reply::error(
                    "empty_source",
                    format!("Lane {} has nothing to move.", lane + 1),
                ),
                Ok(Selection::Turn(report)) => self.played(report),
                Err(e) => e.into(),
            },
            Request::Move { from, to } => match self.game.play_move(from, to) {
                Ok(report) => self.played(report),
                Err(e) => e.into(),
            },
            Request::Skip => match self.game.skip() {
                Ok(report) => self.played(report),
                Err(e) => e.into(),
            },
            Request::Hint => Reply::Hint {
                moves: self.game.legal_moves(),
            },
            Request::Snapshot => Reply::Snapshot(self.game.snapshot()),
            Request::Restore { snapshot } => match Game::restore(snapshot) {
                Ok(game) => {
                    self.game = game;
                    self.ack();
                    Reply::Snapshot(self.game.snapshot())
                }
                Err(e) => e.into(),
            },
            Request::Restart { seed } => {
                let seed = seed.unwrap_or_else(|| self.game.seed().wrapping_add(1));
                self.restart(seed)
            }
        }
    }

    fn restart(&mut self, seed: u32) -> Reply {
        match Game::new(seed) {
            Ok((game, opening)) => {
                self.game = game;
                self.played(opening)
            }
            Err(e) => e.into(),
        }
    }

    fn played(&mut self, report: TurnReport) -> Reply {
        self.ack();
        Reply::Turn(report)
    }

    /// Nothing is animated here; release the game for the next input.
    fn ack(&mut self) {
        if self.game.finish_animation().is_err() {
            debug!(phase = ?self.game.phase(), "no playback to finish");
        }
    }
}
