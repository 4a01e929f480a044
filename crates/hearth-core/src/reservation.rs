//! Time-locked reservation windows.
//!
//! A reservation covers the half-open block interval `[from, until)`: the
//! holder is in use at `from` and free again exactly at `until`. Windows are
//! never shortened; they lapse once the chain passes `until`.

use crate::id::BlockIndex;
use serde::{Deserialize, Serialize};

/// A half-open block interval during which a holder is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub from: BlockIndex,
    pub until: BlockIndex,
}

impl Reservation {
    pub fn new(from: BlockIndex, until: BlockIndex) -> Self {
        Self { from, until }
    }

    /// Window starting at `start` and lasting `duration` blocks.
    pub fn for_duration(start: BlockIndex, duration: BlockIndex) -> Self {
        Self::new(start, start.saturating_add(duration))
    }

    pub fn contains(&self, at: BlockIndex) -> bool {
        self.from <= at && at < self.until
    }
}

/// Anything that can be reserved for a block window: free-standing equipment
/// and appliance spaces.
pub trait Reservable {
    fn reservation(&self) -> Option<Reservation>;

    fn set_reservation(&mut self, reservation: Reservation);

    /// Whether the holder is reserved at `at`.
    fn is_in_use(&self, at: BlockIndex) -> bool {
        self.reservation().is_some_and(|r| r.contains(at))
    }

    /// Stamp a new window unconditionally. Callers check `is_in_use` first.
    fn reserve(&mut self, from: BlockIndex, until: BlockIndex) {
        self.set_reservation(Reservation::new(from, until));
    }
}
