// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The reconciliation step: previous status + snapshot -> next status.

use std::time::Duration;

use crate::telemetry::{
    PROP_BATTERY, PROP_CLEANED_AREA, PROP_CLEANED_TIME, PROP_FAN_SPEED, PROP_FAULT,
    PROP_RUN_STATE, PropertySnapshot,
};
use crate::types::{FanSpeed, FaultCode, RunState};

use super::{VacuumState, VacuumStatus};

/// Derives the next status from the previous one and a fresh snapshot.
///
/// Rules, in order:
///
/// 1. A present run-state reading is translated through the fixed code
///    table. An absent reading **holds** the previous state — a single
///    missed read on a lossy network must not flap the host-visible
///    state through `Unknown`.
/// 2. A present, non-zero, non-routine fault reading forces the state
///    to [`VacuumState::Error`] regardless of the run-state. The fault
///    clears only when the property reads back as zero (or a routine
///    code); an absent fault read holds the previous fault.
/// 3. Battery, fan speed, cleaned area and cleaned time copy through
///    when present, else hold their previous values.
#[must_use]
pub fn advance(previous: &VacuumStatus, snapshot: &PropertySnapshot) -> VacuumStatus {
    let mut state = snapshot
        .int(PROP_RUN_STATE)
        .map_or(previous.state, |code| RunState::from_code(code).into());

    let fault = snapshot
        .int(PROP_FAULT)
        .map_or(previous.fault, FaultCode::from_reported);

    if fault.is_some_and(|f| f.is_fault()) {
        state = VacuumState::Error;
    }

    VacuumStatus {
        state,
        fault,
        battery_percent: snapshot
            .int(PROP_BATTERY)
            .map(|v| u8::try_from(v.clamp(0, 100)).unwrap_or(100))
            .or(previous.battery_percent),
        fan_speed: snapshot
            .int(PROP_FAN_SPEED)
            .map(FanSpeed::from_reported)
            .or(previous.fan_speed),
        cleaned_area_m2: snapshot
            .float(PROP_CLEANED_AREA)
            .or(previous.cleaned_area_m2),
        cleaned_time: snapshot
            .int(PROP_CLEANED_TIME)
            .map(|secs| Duration::from_secs(secs.max(0).unsigned_abs()))
            .or(previous.cleaned_time),
    }
}
