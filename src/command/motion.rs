// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cleaning task and movement commands.

use serde_json::{Value, json};

use super::Command;

/// Controls the cleaning task.
///
/// Start and pause go through `set_mode_withroom` (the whole-house
/// variant: the first parameter selects "all rooms", the second the
/// requested mode); stop is its own method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanCommand {
    /// Start or resume cleaning.
    Start,
    /// Pause the current task in place.
    Pause,
    /// Stop the current task entirely.
    Stop,
}

impl Command for CleanCommand {
    fn method(&self) -> &'static str {
        match self {
            Self::Start | Self::Pause => "set_mode_withroom",
            Self::Stop => "set_mode",
        }
    }

    fn params(&self) -> Vec<Value> {
        match self {
            Self::Start => vec![json!(0), json!(1), json!(0)],
            Self::Pause => vec![json!(0), json!(2), json!(0)],
            Self::Stop => vec![json!(0)],
        }
    }
}

/// Sends the vacuum back to its charging dock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DockCommand;

impl Command for DockCommand {
    fn method(&self) -> &'static str {
        "set_charge"
    }

    fn params(&self) -> Vec<Value> {
        vec![json!(1)]
    }
}

/// Makes the vacuum announce its position audibly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocateCommand;

impl Command for LocateCommand {
    fn method(&self) -> &'static str {
        "set_resetpos"
    }

    fn params(&self) -> Vec<Value> {
        vec![json!(1)]
    }
}
