// state.rs - The reconciled goal state shared with readers.
//
// Status is tri-state: Unknown only until the first check decides it.
// Afterwards it moves between Set and Unset as verifications land:
//   Unknown → Set | Unset
//   Set ⇄ Unset
// `Set` always comes with a record; every other status comes without one.

use std::fmt;

use serde::{Deserialize, Serialize};
use sf_api::GoalRecord;

/// Whether the user has a goal, as far as we know.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// Not checked yet.
    #[default]
    Unknown,
    /// Checked; there is no goal (or the check could not confirm one in time).
    Unset,
    /// Checked; a goal exists.
    Set,
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalStatus::Unknown => write!(f, "unknown"),
            GoalStatus::Unset => write!(f, "unset"),
            GoalStatus::Set => write!(f, "set"),
        }
    }
}

impl GoalStatus {
    pub fn is_decided(&self) -> bool {
        !matches!(self, GoalStatus::Unknown)
    }
}

/// Snapshot of the shared goal state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalState {
    pub status: GoalStatus,

    /// Present exactly when `status` is `Set`.
    pub record: Option<GoalRecord>,

    /// Last user-facing error message, if any.
    pub error: Option<String>,

    /// True while at least one remote verification is in flight.
    pub loading: bool,

    /// How many service answers have been applied so far: landed
    /// verifications, cache fallbacks after a failed one, and saved goals.
    #[serde(skip)]
    pub(crate) verifications: u64,
}

impl GoalState {
    pub fn has_goal(&self) -> bool {
        self.status == GoalStatus::Set
    }

    /// True once at least one service answer has been applied and no
    /// check is still in flight.
    pub fn is_settled(&self) -> bool {
        !self.loading && self.verifications > 0
    }

    /// Move to `Set` with `record`, or to `Unset` when there is none.
    pub(crate) fn apply(&mut self, record: Option<GoalRecord>) {
        self.status = if record.is_some() {
            GoalStatus::Set
        } else {
            GoalStatus::Unset
        };
        self.record = record;
    }
}
