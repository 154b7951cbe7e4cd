// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core value types shared across the library.
//!
//! These are small, validated types for the values that cross the public
//! API: the device secret token and the vendor-defined enumerations for
//! fan speed, run state, and fault codes.

mod fan_speed;
mod fault_code;
mod run_state;
mod token;

pub use fan_speed::FanSpeed;
pub use fault_code::FaultCode;
pub use run_state::RunState;
pub use token::DeviceToken;
