// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The derived, host-facing vacuum status.

use std::fmt;
use std::time::Duration;

use crate::types::{FanSpeed, FaultCode, RunState};

/// Discrete operational state derived from device telemetry.
///
/// This is the client-side vocabulary the host automation platform
/// renders; [`RunState`] is the firmware-side vocabulary it is derived
/// from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum VacuumState {
    /// Not doing anything (docked or not).
    Idle,
    /// Actively cleaning (vacuuming and/or mopping).
    Cleaning,
    /// Paused mid-task.
    Paused,
    /// Driving back to the dock.
    Returning,
    /// On the dock, charging.
    Charging,
    /// A genuine fault is active.
    Error,
    /// No snapshot has been reconciled yet.
    #[default]
    Unknown,
}

impl From<RunState> for VacuumState {
    fn from(run_state: RunState) -> Self {
        match run_state {
            RunState::IdleNotDocked | RunState::Idle => Self::Idle,
            RunState::Paused => Self::Paused,
            RunState::Cleaning | RunState::VacuumingAndMopping | RunState::Mopping => {
                Self::Cleaning
            }
            RunState::Returning => Self::Returning,
            RunState::Docked => Self::Charging,
            RunState::Unknown(_) => Self::Unknown,
        }
    }
}

impl fmt::Display for VacuumState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Cleaning => "cleaning",
            Self::Paused => "paused",
            Self::Returning => "returning",
            Self::Charging => "charging",
            Self::Error => "error",
            Self::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

/// The reconciled status of one vacuum.
///
/// Fields other than `state` are `None` until the device has reported
/// them at least once; afterwards they hold the latest reading (or the
/// previous one across a transient dropout).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VacuumStatus {
    /// Derived operational state.
    pub state: VacuumState,
    /// Battery charge, 0-100.
    pub battery_percent: Option<u8>,
    /// Active fault reading, genuine or routine; `None` once the device
    /// reads back zero.
    pub fault: Option<FaultCode>,
    /// Current fan speed.
    pub fan_speed: Option<FanSpeed>,
    /// Area cleaned during the current/last task, in square meters.
    pub cleaned_area_m2: Option<f64>,
    /// Time spent on the current/last task.
    pub cleaned_time: Option<Duration>,
}

impl VacuumStatus {
    /// Returns `true` if a genuine (non-routine) fault is active.
    #[must_use]
    pub fn has_fault(&self) -> bool {
        self.fault.is_some_and(|f| f.is_fault())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_status_is_unknown_and_empty() {
        let status = VacuumStatus::default();
        assert_eq!(status.state, VacuumState::Unknown);
        assert_eq!(status.battery_percent, None);
        assert!(!status.has_fault());
    }

    #[test]
    fn run_state_translation_table() {
        let table = [
            (0, VacuumState::Idle),
            (1, VacuumState::Idle),
            (2, VacuumState::Paused),
            (3, VacuumState::Cleaning),
            (4, VacuumState::Returning),
            (5, VacuumState::Charging),
            (6, VacuumState::Cleaning),
            (7, VacuumState::Cleaning),
        ];
        for (code, expected) in table {
            assert_eq!(
                VacuumState::from(RunState::from_code(code)),
                expected,
                "run_state code {code}"
            );
        }
    }

    #[test]
    fn unseen_run_state_maps_to_unknown() {
        assert_eq!(
            VacuumState::from(RunState::from_code(99)),
            VacuumState::Unknown
        );
    }

    #[test]
    fn routine_fault_is_not_a_fault() {
        let status = VacuumStatus {
            fault: FaultCode::from_reported(2103),
            ..VacuumStatus::default()
        };
        assert!(!status.has_fault());
    }
}
