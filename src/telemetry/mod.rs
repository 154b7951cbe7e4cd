// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw device telemetry and its translation into typed snapshots.
//!
//! A poll cycle issues one batched `get_prop` read over
//! [`POLLED_PROPERTIES`], and [`map_properties`] zips the positional
//! result back into a [`PropertySnapshot`]. The mapper is a pure
//! function; everything stateful happens in the
//! [`state`](crate::state) machine that consumes the snapshots.
//!
//! Consumable wear ([`ConsumableLife`]) and the Do-Not-Disturb window
//! ([`DndStatus`]) live on their own firmware methods rather than in
//! the `get_prop` batch and are read on demand.

mod consumables;
mod dnd;
mod mapper;
mod property;

pub use consumables::ConsumableLife;
pub use dnd::DndStatus;
pub use mapper::map_properties;
pub use property::{PropertySnapshot, PropertyValue};

/// The property batch read on every poll cycle.
///
/// Names are firmware identifiers and carry the firmware's own spelling
/// (`battary_life` is not a typo on our side).
pub const POLLED_PROPERTIES: &[&str] = &[
    "run_state",
    "err_state",
    "battary_life",
    "suction_grade",
    "s_area",
    "s_time",
    "box_type",
    "mop_type",
    "is_mop",
    "is_charge",
    "is_work",
    "water_grade",
    "mode",
    "remember_map",
    "has_map",
    "light_state",
    "repeat_state",
];

/// Property name carrying the run-state code.
pub const PROP_RUN_STATE: &str = "run_state";
/// Property name carrying the fault code.
pub const PROP_FAULT: &str = "err_state";
/// Property name carrying the battery percentage.
pub const PROP_BATTERY: &str = "battary_life";
/// Property name carrying the fan speed level.
pub const PROP_FAN_SPEED: &str = "suction_grade";
/// Property name carrying the cleaned area in square meters.
pub const PROP_CLEANED_AREA: &str = "s_area";
/// Property name carrying the cleaning time in seconds.
pub const PROP_CLEANED_TIME: &str = "s_time";
