// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Do-Not-Disturb window.
//!
//! The `get_notdisturb` method answers with
//! `[enabled, start_hour, start_minute, end_hour, end_minute]`. While
//! the window is active the device mutes announcements and suppresses
//! scheduled cleanups.

use chrono::NaiveTime;
use serde_json::Value;

/// The device's Do-Not-Disturb configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DndStatus {
    /// Whether the window is enabled at all.
    pub enabled: bool,
    /// Daily start of the window, device-local time.
    pub start: NaiveTime,
    /// Daily end of the window, device-local time.
    pub end: NaiveTime,
}

impl DndStatus {
    /// Parses a positional `get_notdisturb` reply.
    ///
    /// Returns `None` if the array is shorter than five entries, an
    /// entry is not an integer, or an hour/minute pair is not a valid
    /// clock time.
    #[must_use]
    pub fn from_values(values: &[Value]) -> Option<Self> {
        let int = |position: usize| values.get(position).and_then(Value::as_i64);
        Some(Self {
            enabled: int(0)? != 0,
            start: clock_time(int(1)?, int(2)?)?,
            end: clock_time(int(3)?, int(4)?)?,
        })
    }
}

fn clock_time(hour: i64, minute: i64) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(u32::try_from(hour).ok()?, u32::try_from(minute).ok()?, 0)
}
