//! Id source - explicit, copyable cup id counter
//!
//! Every cup-creating operation takes `&mut IdSource`. A live game owns one source;
//! lookahead simulations use [`IdSource::scratch`] so they never consume or
//! collide with the live sequence.

use serde::{Deserialize, Serialize};

use crate::types::CupId;

/// First id handed out by scratch sources. Live ids stay below it.
const SCRATCH_BASE: u32 = 1 << 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdSource {
    next: u32,
}

impl IdSource {
    /// Live source for a new game (ids start at 1)
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Disposable source for simulations
    pub fn scratch() -> Self {
        Self { next: SCRATCH_BASE }
    }

    /// Live source that continues after `last` (for restored games)
    pub fn after(last: Option<CupId>) -> Self {
        Self {
            next: last.map_or(1, |id| id.0.wrapping_add(1)),
        }
    }

    /// Issue the next id
    pub fn fresh(&mut self) -> CupId {
        let id = CupId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }

    /// The id `fresh()` would return next
    pub fn peek(&self) -> CupId {
        CupId(self.next)
    }

    pub fn is_scratch_id(id: CupId) -> bool {
        id.0 >= SCRATCH_BASE
    }
}

impl Default for IdSource {
    fn default() -> Self {
        Self::new()
    }
}
