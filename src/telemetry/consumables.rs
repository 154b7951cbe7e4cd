// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Consumable wear tracking.
//!
//! The `get_consumables` method answers with the hours each consumable
//! has been in use: `[main_brush, side_brush, mop, filter]`. The
//! firmware counts usage up; the service-life totals below turn that
//! into the time-remaining figures a host platform displays.

use std::time::Duration;

use serde_json::Value;

/// Rated service life of the main brush, in hours.
const MAIN_BRUSH_SERVICE_HOURS: u64 = 360;
/// Rated service life of the side brush, in hours.
const SIDE_BRUSH_SERVICE_HOURS: u64 = 180;
/// Rated service life of the mop, in hours.
const MOP_SERVICE_HOURS: u64 = 180;
/// Rated service life of the filter, in hours.
const FILTER_SERVICE_HOURS: u64 = 180;

/// Remaining service life of each consumable.
///
/// An overdue consumable reads as zero remaining, never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumableLife {
    /// Time until the main brush is due for replacement.
    pub main_brush_left: Duration,
    /// Time until the side brush is due for replacement.
    pub side_brush_left: Duration,
    /// Time until the mop is due for replacement.
    pub mop_left: Duration,
    /// Time until the filter is due for replacement.
    pub filter_left: Duration,
}

impl ConsumableLife {
    /// Parses a positional `get_consumables` reply.
    ///
    /// Returns `None` if the array is shorter than four entries or any
    /// entry is not an integer.
    #[must_use]
    pub fn from_values(values: &[Value]) -> Option<Self> {
        let used = |position: usize| values.get(position).and_then(Value::as_i64);
        Some(Self {
            main_brush_left: remaining(used(0)?, MAIN_BRUSH_SERVICE_HOURS),
            side_brush_left: remaining(used(1)?, SIDE_BRUSH_SERVICE_HOURS),
            mop_left: remaining(used(2)?, MOP_SERVICE_HOURS),
            filter_left: remaining(used(3)?, FILTER_SERVICE_HOURS),
        })
    }
}

/// Translates hours used into time remaining against a service life.
fn remaining(used_hours: i64, service_hours: u64) -> Duration {
    let used = used_hours.max(0).unsigned_abs();
    Duration::from_secs(service_hours.saturating_sub(used) * 3600)
}
