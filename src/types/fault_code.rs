// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fault codes reported via the `err_state` property.
//!
//! The firmware reuses the fault channel for a handful of routine
//! conditions (charging, fully charged, low-battery auto-return). Those
//! codes must not flip the vacuum into an error state, so they are kept
//! but classified as non-faults.

use std::fmt;

/// Codes the firmware reports through `err_state` during normal
/// operation. Anything else non-zero is a genuine fault.
const FALSE_POSITIVES: &[i64] = &[
    2101, // battery low, returning to charge automatically
    2102, // returning to the dock
    2103, // charging
    2105, // fully charged
];

/// A non-zero `err_state` reading.
///
/// Zero readings are represented as the absence of a `FaultCode`, not as
/// a code with value zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaultCode(i64);

impl FaultCode {
    /// Wraps a raw `err_state` reading; zero maps to `None`.
    #[must_use]
    pub fn from_reported(code: i64) -> Option<Self> {
        (code != 0).then_some(Self(code))
    }

    /// Returns the raw code.
    #[must_use]
    pub const fn code(&self) -> i64 {
        self.0
    }

    /// Returns `true` if this code indicates a genuine fault rather than
    /// one of the firmware's routine status codes.
    #[must_use]
    pub fn is_fault(&self) -> bool {
        !FALSE_POSITIVES.contains(&self.0)
    }

    /// Human-readable description of the known codes.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self.0 {
            500 => "radar timed out",
            501 => "wheels stuck",
            502 => "low battery",
            503 => "dust bin missing",
            508 => "uneven ground",
            509 => "cliff sensor error",
            510 => "collision sensor error",
            511 => "could not return to dock",
            512 => "could not return to start point",
            513 => "could not enter the area",
            514 => "vacuum stuck",
            2101 => "battery low, returning to charge",
            2102 => "returning to dock",
            2103 => "charging",
            2105 => "fully charged",
            _ => "unknown fault",
        }
    }
}

impl fmt::Display for FaultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.description(), self.0)
    }
}
