// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Suction fan speed.
//!
//! The firmware reports and accepts the fan speed as a small integer
//! (`suction_grade`). Unseen values from newer firmware are preserved in
//! the [`FanSpeed::Unknown`] variant instead of failing the mapper.

use std::fmt;

use crate::error::ValueError;

/// Fan speed levels accepted by the `set_suction` method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FanSpeed {
    /// Quietest mode, level 0.
    Silent,
    /// Default mode, level 1.
    Standard,
    /// Level 2.
    Medium,
    /// Strongest mode, level 3.
    Turbo,
    /// A level this library does not know about.
    ///
    /// Reported as-is so newer firmware degrades gracefully; it cannot be
    /// constructed via [`FanSpeed::new`] and is never sent to the device.
    Unknown(i64),
}

impl FanSpeed {
    /// Creates a fan speed from a firmware level, rejecting levels the
    /// device would not accept.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidFanSpeed` if the level is outside 0-3.
    pub const fn new(level: i64) -> Result<Self, ValueError> {
        match level {
            0 => Ok(Self::Silent),
            1 => Ok(Self::Standard),
            2 => Ok(Self::Medium),
            3 => Ok(Self::Turbo),
            other => Err(ValueError::InvalidFanSpeed(other)),
        }
    }

    /// Creates a fan speed from a reported firmware level, mapping unseen
    /// values to [`FanSpeed::Unknown`].
    #[must_use]
    pub const fn from_reported(level: i64) -> Self {
        match level {
            0 => Self::Silent,
            1 => Self::Standard,
            2 => Self::Medium,
            3 => Self::Turbo,
            other => Self::Unknown(other),
        }
    }

    /// Returns the firmware level for this speed.
    #[must_use]
    pub const fn level(&self) -> i64 {
        match self {
            Self::Silent => 0,
            Self::Standard => 1,
            Self::Medium => 2,
            Self::Turbo => 3,
            Self::Unknown(raw) => *raw,
        }
    }

    /// All speeds that can be requested, in ascending order.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Silent, Self::Standard, Self::Medium, Self::Turbo]
    }
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Silent => write!(f, "silent"),
            Self::Standard => write!(f, "standard"),
            Self::Medium => write!(f, "medium"),
            Self::Turbo => write!(f, "turbo"),
            Self::Unknown(raw) => write!(f, "unknown ({raw})"),
        }
    }
}

impl TryFrom<i64> for FanSpeed {
    type Error = ValueError;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_levels_round_trip() {
        for speed in FanSpeed::all() {
            assert_eq!(FanSpeed::new(speed.level()).unwrap(), speed);
        }
    }

    #[test]
    fn out_of_range_level_rejected() {
        assert_eq!(FanSpeed::new(4), Err(ValueError::InvalidFanSpeed(4)));
        assert_eq!(FanSpeed::new(-1), Err(ValueError::InvalidFanSpeed(-1)));
    }

    #[test]
    fn reported_level_degrades_to_unknown() {
        assert_eq!(FanSpeed::from_reported(2), FanSpeed::Medium);
        assert_eq!(FanSpeed::from_reported(9), FanSpeed::Unknown(9));
        assert_eq!(FanSpeed::Unknown(9).level(), 9);
    }

    #[test]
    fn display_names() {
        assert_eq!(FanSpeed::Turbo.to_string(), "turbo");
        assert_eq!(FanSpeed::Unknown(7).to_string(), "unknown (7)");
    }
}
