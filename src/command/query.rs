// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Batched property reads.

use serde_json::{Value, json};

use super::Command;

/// Reads a batch of properties in one request.
///
/// The device answers with an ordered array positionally aligned with
/// the requested names; the
/// [`telemetry`](crate::telemetry) mapper zips the two back together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetPropertiesCommand {
    names: Vec<&'static str>,
}

impl GetPropertiesCommand {
    /// Creates a query for the given property names.
    #[must_use]
    pub fn new(names: &[&'static str]) -> Self {
        Self {
            names: names.to_vec(),
        }
    }

    /// Returns the requested names, in request order.
    #[must_use]
    pub fn names(&self) -> &[&'static str] {
        &self.names
    }
}

impl Command for GetPropertiesCommand {
    fn method(&self) -> &'static str {
        "get_prop"
    }

    fn params(&self) -> Vec<Value> {
        self.names.iter().map(|name| json!(name)).collect()
    }
}

/// Reads the hours each consumable has been in use.
///
/// The reply is positional: `[main_brush, side_brush, mop, filter]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetConsumablesCommand;

impl Command for GetConsumablesCommand {
    fn method(&self) -> &'static str {
        "get_consumables"
    }

    fn params(&self) -> Vec<Value> {
        vec![]
    }
}

/// Reads the Do-Not-Disturb window configuration.
///
/// The reply is positional:
/// `[enabled, start_hour, start_minute, end_hour, end_minute]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetDndCommand;

impl Command for GetDndCommand {
    fn method(&self) -> &'static str {
        "get_notdisturb"
    }

    fn params(&self) -> Vec<Value> {
        vec![]
    }
}
