// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan speed command.

use serde_json::{Value, json};

use super::Command;
use crate::types::FanSpeed;

/// Sets the suction fan speed.
///
/// Carries an absolute level, so repeating the command is harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuctionCommand(FanSpeed);

impl SuctionCommand {
    /// Creates a command for the given speed.
    #[must_use]
    pub const fn new(speed: FanSpeed) -> Self {
        Self(speed)
    }

    /// Returns the requested speed.
    #[must_use]
    pub const fn speed(&self) -> FanSpeed {
        self.0
    }
}

impl Command for SuctionCommand {
    fn method(&self) -> &'static str {
        "set_suction"
    }

    fn params(&self) -> Vec<Value> {
        vec![json!(self.0.level())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suction_wire_shape() {
        let cmd = SuctionCommand::new(FanSpeed::Medium);
        assert_eq!(cmd.method(), "set_suction");
        assert_eq!(cmd.params(), vec![json!(2)]);
    }

    #[test]
    fn repeating_produces_identical_request() {
        let first = SuctionCommand::new(FanSpeed::Turbo);
        let second = SuctionCommand::new(FanSpeed::Turbo);
        assert_eq!(first.params(), second.params());
    }
}
