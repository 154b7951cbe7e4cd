// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device command definitions.
//!
//! Each command pins one firmware method name and parameter shape,
//! confirmed against the Viomi vacuum firmware:
//!
//! | Command | Method | Purpose |
//! |---------|--------|---------|
//! | [`CleanCommand`] | `set_mode_withroom` / `set_mode` | start, pause, stop |
//! | [`DockCommand`] | `set_charge` | return to the dock |
//! | [`LocateCommand`] | `set_resetpos` | make the vacuum announce itself |
//! | [`SuctionCommand`] | `set_suction` | set the fan speed |
//! | [`GetPropertiesCommand`] | `get_prop` | batched property read |
//! | [`GetConsumablesCommand`] | `get_consumables` | consumable usage hours |
//! | [`GetDndCommand`] | `get_notdisturb` | Do-Not-Disturb window |
//!
//! All write commands are absolute rather than relative, so resending
//! one after a lost reply cannot double-apply.

mod motion;
mod query;
mod suction;

pub use motion::{CleanCommand, DockCommand, LocateCommand};
pub use query::{GetConsumablesCommand, GetDndCommand, GetPropertiesCommand};
pub use suction::SuctionCommand;

use serde_json::Value;

/// A command that can be sent to a Viomi vacuum.
///
/// Commands are serialized into the JSON-RPC payload's `method` and
/// `params` fields by the command channel.
pub trait Command {
    /// Returns the firmware method name.
    fn method(&self) -> &'static str;

    /// Returns the ordered positional parameters.
    fn params(&self) -> Vec<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clean_command_wire_shape() {
        assert_eq!(CleanCommand::Start.method(), "set_mode_withroom");
        assert_eq!(CleanCommand::Start.params(), vec![json!(0), json!(1), json!(0)]);
        assert_eq!(CleanCommand::Stop.method(), "set_mode");
        assert_eq!(CleanCommand::Stop.params(), vec![json!(0)]);
    }

    #[test]
    fn dock_and_locate_wire_shape() {
        assert_eq!(DockCommand.method(), "set_charge");
        assert_eq!(DockCommand.params(), vec![json!(1)]);
        assert_eq!(LocateCommand.method(), "set_resetpos");
        assert_eq!(LocateCommand.params(), vec![json!(1)]);
    }
}
