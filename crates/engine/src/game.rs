//! Game module - the explicit turn state machine
//!
//! `Game` owns the live board, the id source, and the RNG, and sequences the
//! resolvers into one event stream per turn:
//!
//! ```text
//! move (optional) -> win? -> forced drop -> win? -> pick next lane -> forced loss?
//! ```
//!
//! The board is only replaced once the whole stream has been produced. After an
//! accepted turn the game waits in [`Phase::Animating`] until the host calls
//! [`Game::finish_animation`], so turns can never overlap.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::core::types::{GameEvent, LANE_COUNT, MAX_HEIGHT};
use crate::core::{
    check_win, pick_next_lane, resolve_drop, resolve_move, winning_lane, Board, BoardError,
    IdSource, MoveRejection, SimpleRng,
};
use crate::legal::{legal_moves, LaneMove};
use crate::oracle::detect_forced_loss;
use crate::snapshot::GameSnapshot;

/// Where the game is in its turn cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for the player to pick a lane to move from (or to skip)
    SelectSource,
    /// A source lane is picked; waiting for the destination (or to skip)
    SelectDestination { from: usize },
    /// A turn's events were handed to the host and are being played back
    Animating,
    Won,
    Lost,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Won | Phase::Lost)
    }

    pub fn accepts_input(self) -> bool {
        matches!(self, Phase::SelectSource | Phase::SelectDestination { .. })
    }
}

/// How a turn ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOutcome {
    /// The move was refused; nothing happened and the player picks again
    Rejected,
    /// Play continues
    Continue,
    Won,
    Lost,
}

/// Everything a host needs to present one turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    pub turn: u32,
    pub events: Vec<GameEvent>,
    pub message: String,
    pub outcome: TurnOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection: Option<String>,
    /// Lane receiving the next forced drop; `None` once the game is over
    pub next_drop_lane: Option<usize>,
}

/// Result of [`Game::select`]
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// The lane is now the move source
    Source(usize),
    /// The source lane was picked again and is released
    Deselected,
    /// The lane is empty and cannot be a source
    EmptySource(usize),
    /// A destination was picked and the turn resolved
    Turn(TurnReport),
}

/// Caller contract violations. Player mistakes are never errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TurnError {
    #[error("a turn is still being played back")]
    Busy,
    #[error("the game is over")]
    GameOver,
    #[error("nothing is being played back")]
    NotAnimating,
    #[error("lane {0} does not exist")]
    LaneOutOfRange(usize),
    #[error(transparent)]
    Board(#[from] BoardError),
}

impl TurnError {
    pub fn code(&self) -> &'static str {
        match self {
            TurnError::Busy => "busy",
            TurnError::GameOver => "game_over",
            TurnError::NotAnimating => "not_animating",
            TurnError::LaneOutOfRange(_) => "lane_out_of_range",
            TurnError::Board(e) => e.code(),
        }
    }
}

/// Reasons a snapshot cannot be resumed
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("next drop lane {0} does not exist")]
    DropLaneOutOfRange(usize),
    #[error("id source would reissue {next}, but {max} is already on the board")]
    StaleIds { next: u32, max: u32 },
    #[error("source lane {0} is empty")]
    EmptySource(usize),
}

impl SnapshotError {
    pub fn code(&self) -> &'static str {
        match self {
            SnapshotError::Board(e) => e.code(),
            SnapshotError::DropLaneOutOfRange(_) => "lane_out_of_range",
            SnapshotError::StaleIds { .. } => "stale_ids",
            SnapshotError::EmptySource(_) => "empty_source",
        }
    }
}

/// A live game
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    ids: IdSource,
    rng: SimpleRng,
    seed: u32,
    next_drop_lane: usize,
    phase: Phase,
    /// Resolved turns (rejected moves do not count).
    turn: u32,
}

impl Game {
    /// Start a game: two seeding drops on an empty board, then the first
    /// forced-drop lane is picked.
    ///
    /// Returns the game and the opening event stream (turn 0).
    #[instrument]
    pub fn new(seed: u32) -> Result<(Self, TurnReport), TurnError> {
        let mut rng = SimpleRng::new(seed);
        let mut ids = IdSource::new();
        let mut board = Board::new();
        let mut events = Vec::new();

        let mut lane = pick_next_lane(&mut rng, None);
        for _ in 0..2 {
            let drop = resolve_drop(&board, lane, &mut ids)?;
            events.extend(drop.events);
            board = drop.board;
            lane = pick_next_lane(&mut rng, Some(lane));
        }

        let mut game = Self {
            board,
            ids,
            rng,
            seed,
            next_drop_lane: lane,
            phase: Phase::Animating,
            turn: 0,
        };
        let report = game.settle(events, "A new game begins.".to_string())?;
        Ok((game, report))
    }

    /// Resume a game from a snapshot, validating it first.
    ///
    /// A live phase over a board that is already won, or already a forced loss,
    /// resumes in [`Phase::Won`] or [`Phase::Lost`].
    pub fn restore(snapshot: GameSnapshot) -> Result<Self, SnapshotError> {
        let GameSnapshot {
            board,
            ids,
            rng,
            seed,
            next_drop_lane,
            phase,
            turn,
        } = snapshot;

        board.validate()?;
        if next_drop_lane >= LANE_COUNT {
            return Err(SnapshotError::DropLaneOutOfRange(next_drop_lane));
        }
        if let Some(max) = board.max_id() {
            if ids.peek() <= max {
                return Err(SnapshotError::StaleIds {
                    next: ids.peek().0,
                    max: max.0,
                });
            }
        }
        if !phase.is_terminal() {
            if let Some(lane) = board.overflowed_lane() {
                return Err(BoardError::Overflow {
                    lane,
                    height: board.height(lane),
                }
                .into());
            }
        }
        if let Phase::SelectDestination { from } = phase {
            if board.is_empty(from) {
                return Err(SnapshotError::EmptySource(from));
            }
        }

        let mut game = Self {
            board,
            ids,
            rng,
            seed,
            next_drop_lane,
            phase,
            turn,
        };
        if !game.phase.is_terminal() {
            if check_win(&game.board) {
                info!(turn, "restored position is already won");
                game.phase = Phase::Won;
            } else if let Some(loss) = detect_forced_loss(&game.board, next_drop_lane)? {
                info!(turn, %loss, "restored position is already lost");
                game.phase = Phase::Lost;
            }
        }
        Ok(game)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.clone(),
            ids: self.ids,
            rng: self.rng,
            seed: self.seed,
            next_drop_lane: self.next_drop_lane,
            phase: self.phase,
            turn: self.turn,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn next_drop_lane(&self) -> usize {
        self.next_drop_lane
    }

    /// Moves the player could make right now
    pub fn legal_moves(&self) -> Vec<LaneMove> {
        if self.phase.accepts_input() {
            legal_moves(&self.board)
        } else {
            Vec::new()
        }
    }

    /// Click-style input: the first pick chooses the source, the second the
    /// destination (or releases the source when it is the same lane).
    #[instrument(skip(self), fields(phase = ?self.phase))]
    pub fn select(&mut self, lane: usize) -> Result<Selection, TurnError> {
        self.ensure_input()?;
        if lane >= LANE_COUNT {
            return Err(TurnError::LaneOutOfRange(lane));
        }

        let phase = self.phase;
        match phase {
            Phase::SelectDestination { from } if from == lane => {
                self.phase = Phase::SelectSource;
                Ok(Selection::Deselected)
            }
            Phase::SelectDestination { from } => {
                self.play_move(from, lane).map(Selection::Turn)
            }
            _ if self.board.is_empty(lane) => Ok(Selection::EmptySource(lane)),
            _ => {
                self.phase = Phase::SelectDestination { from: lane };
                Ok(Selection::Source(lane))
            }
        }
    }

    /// Resolve a turn with a move from `from` to `to`.
    ///
    /// A refused move yields a [`TurnOutcome::Rejected`] report with no events and
    /// leaves the game waiting for a source lane.
    #[instrument(skip(self), fields(turn = self.turn))]
    pub fn play_move(&mut self, from: usize, to: usize) -> Result<TurnReport, TurnError> {
        self.ensure_input()?;

        let mv = resolve_move(&self.board, from, to, &mut self.ids);
        if let Some(why) = mv.rejection {
            debug!(code = why.code(), "move refused");
            self.phase = Phase::SelectSource;
            return Ok(self.rejected(why));
        }

        self.turn += 1;
        let events = mv.events;
        if mv.lost {
            return Ok(self.end(mv.board, events, mv.message, TurnOutcome::Lost));
        }
        if mv.won {
            let message = win_message(&mv.board);
            return Ok(self.end(mv.board, events, message, TurnOutcome::Won));
        }
        self.drop_and_settle(mv.board, events)
    }

    /// Resolve a turn without moving: only the forced drop happens.
    #[instrument(skip(self), fields(turn = self.turn))]
    pub fn skip(&mut self) -> Result<TurnReport, TurnError> {
        self.ensure_input()?;
        self.turn += 1;
        if check_win(&self.board) {
            let board = self.board.clone();
            let message = win_message(&board);
            return Ok(self.end(board, Vec::new(), message, TurnOutcome::Won));
        }
        self.drop_and_settle(self.board.clone(), Vec::new())
    }

    /// The host finished consuming the last event stream.
    pub fn finish_animation(&mut self) -> Result<(), TurnError> {
        match self.phase {
            Phase::Animating => {
                self.phase = Phase::SelectSource;
                Ok(())
            }
            Phase::Won | Phase::Lost => Err(TurnError::GameOver),
            _ => Err(TurnError::NotAnimating),
        }
    }

    fn ensure_input(&self) -> Result<(), TurnError> {
        match self.phase {
            Phase::Animating => Err(TurnError::Busy),
            Phase::Won | Phase::Lost => Err(TurnError::GameOver),
            _ => Ok(()),
        }
    }

    fn drop_and_settle(
        &mut self,
        board: Board,
        mut events: Vec<GameEvent>,
    ) -> Result<TurnReport, TurnError> {
        let drop = resolve_drop(&board, self.next_drop_lane, &mut self.ids)?;
        events.extend(drop.events);
        if drop.lost {
            return Ok(self.end(drop.board, events, drop.message, TurnOutcome::Lost));
        }

        self.board = drop.board;
        let exclude = self.next_drop_lane;
        self.next_drop_lane = pick_next_lane(&mut self.rng, Some(exclude));
        self.settle(events, drop.message)
    }

    /// Close a turn whose board is already in place: win check, then the
    /// forced-loss lookahead for the upcoming drop.
    fn settle(
        &mut self,
        mut events: Vec<GameEvent>,
        message: String,
    ) -> Result<TurnReport, TurnError> {
        if check_win(&self.board) {
            let board = self.board.clone();
            let message = win_message(&board);
            return Ok(self.end(board, events, message, TurnOutcome::Won));
        }

        if let Some(loss) = detect_forced_loss(&self.board, self.next_drop_lane)? {
            events.push(GameEvent::GameOver {
                message: loss.clone(),
            });
            let board = self.board.clone();
            return Ok(self.end(board, events, loss, TurnOutcome::Lost));
        }

        self.phase = Phase::Animating;
        Ok(TurnReport {
            turn: self.turn,
            events,
            message,
            outcome: TurnOutcome::Continue,
            rejection: None,
            next_drop_lane: Some(self.next_drop_lane),
        })
    }

    fn end(
        &mut self,
        board: Board,
        events: Vec<GameEvent>,
        message: String,
        outcome: TurnOutcome,
    ) -> TurnReport {
        self.board = board;
        self.phase = match outcome {
            TurnOutcome::Won => Phase::Won,
            _ => Phase::Lost,
        };
        info!(turn = self.turn, ?outcome, %message, "game over");
        debug_assert!(
            self.phase == Phase::Lost || self.board.overflowed_lane().is_none(),
            "won with a lane above {MAX_HEIGHT}"
        );
        TurnReport {
            turn: self.turn,
            events,
            message,
            outcome,
            rejection: None,
            next_drop_lane: None,
        }
    }

    fn rejected(&self, why: MoveRejection) -> TurnReport {
        TurnReport {
            turn: self.turn,
            events: Vec::new(),
            message: why.message().to_string(),
            outcome: TurnOutcome::Rejected,
            rejection: Some(why.code().to_string()),
            next_drop_lane: Some(self.next_drop_lane),
        }
    }
}

fn win_message(board: &Board) -> String {
    match winning_lane(board) {
        Some(lane) => format!("Lane {} holds a full 5-4-3-2-1 chain. You win!", lane + 1),
        None => "You win!".to_string(),
    }
}
