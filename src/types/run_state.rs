// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The device's self-reported coarse operational mode.
//!
//! The `run_state` property carries one of a small set of firmware codes.
//! This is the vendor-side vocabulary; [`VacuumState`](crate::state::VacuumState)
//! is the client-side vocabulary it gets translated into.

use std::fmt;

/// Firmware run-state codes.
///
/// Codes not in the known set are preserved in [`RunState::Unknown`] so
/// newer firmware degrades gracefully instead of crashing the mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Code 0: idle, away from the dock.
    IdleNotDocked,
    /// Code 1: idle.
    Idle,
    /// Code 2: paused mid-task.
    Paused,
    /// Code 3: cleaning (vacuum only).
    Cleaning,
    /// Code 4: driving back to the dock.
    Returning,
    /// Code 5: sitting on the dock, charging.
    Docked,
    /// Code 6: vacuuming and mopping simultaneously.
    VacuumingAndMopping,
    /// Code 7: mopping only.
    Mopping,
    /// A code this library does not know about.
    Unknown(i64),
}

impl RunState {
    /// Translates a raw firmware code.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            0 => Self::IdleNotDocked,
            1 => Self::Idle,
            2 => Self::Paused,
            3 => Self::Cleaning,
            4 => Self::Returning,
            5 => Self::Docked,
            6 => Self::VacuumingAndMopping,
            7 => Self::Mopping,
            other => Self::Unknown(other),
        }
    }

    /// Returns the raw firmware code.
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::IdleNotDocked => 0,
            Self::Idle => 1,
            Self::Paused => 2,
            Self::Cleaning => 3,
            Self::Returning => 4,
            Self::Docked => 5,
            Self::VacuumingAndMopping => 6,
            Self::Mopping => 7,
            Self::Unknown(raw) => *raw,
        }
    }

    /// Returns `true` if the device is actively working a cleaning task.
    #[must_use]
    pub const fn is_cleaning(&self) -> bool {
        matches!(self, Self::Cleaning | Self::VacuumingAndMopping | Self::Mopping)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IdleNotDocked => write!(f, "idle (not docked)"),
            Self::Idle => write!(f, "idle"),
            Self::Paused => write!(f, "paused"),
            Self::Cleaning => write!(f, "cleaning"),
            Self::Returning => write!(f, "returning"),
            Self::Docked => write!(f, "docked"),
            Self::VacuumingAndMopping => write!(f, "vacuuming and mopping"),
            Self::Mopping => write!(f, "mopping"),
            Self::Unknown(raw) => write!(f, "unknown run state ({raw})"),
        }
    }
}
