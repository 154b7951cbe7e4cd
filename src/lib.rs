// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `ViomR` Lib - A Rust library to control Viomi robot vacuums.
//!
//! This library speaks the encrypted miIO local protocol directly to the
//! device over UDP and reconciles its raw telemetry into a stable
//! vacuum state machine for host automation platforms.
//!
//! # What it does
//!
//! - **Wire protocol**: binary framing, AES-128-CBC payload encryption
//!   keyed by the per-device token, stamp tracking, MD5 frame checksums
//! - **Request/response correlation**: id-matched JSON-RPC exchanges
//!   with timeouts, retries, and stamp-drift recovery on a lossy network
//! - **State reconciliation**: batched property polls folded into a
//!   [`VacuumStatus`] with hysteresis over transient dropouts and fault
//!   precedence
//! - **Control**: start, stop, pause, locate, return-to-dock, fan speed
//! - **Maintenance readings**: consumable wear countdowns and the
//!   Do-Not-Disturb window
//!
//! Device discovery, cloud-account binding, and credential UI are out of
//! scope: the library assumes a known address and a 16-byte token
//! acquired out-of-band.
//!
//! # Quick Start
//!
//! ```no_run
//! use viomr_lib::{FanSpeed, Vacuum};
//!
//! #[tokio::main]
//! async fn main() -> viomr_lib::Result<()> {
//!     let token = "00112233445566778899aabbccddeeff".parse()?;
//!     let vacuum = Vacuum::builder("192.168.1.42", token)
//!         .connect()
//!         .await?;
//!
//!     // Poll once and look at the reconciled status.
//!     let status = vacuum.refresh().await?;
//!     println!("state: {}, battery: {:?}", status.state, status.battery_percent);
//!
//!     // Commands never touch the cached status; the next refresh()
//!     // reflects whatever the device actually did.
//!     vacuum.set_fan_speed(FanSpeed::Turbo).await?;
//!     vacuum.start_clean().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Background polling
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use viomr_lib::Vacuum;
//!
//! # async fn example() -> viomr_lib::Result<()> {
//! # let token = "00112233445566778899aabbccddeeff".parse()?;
//! let vacuum = Arc::new(Vacuum::builder("192.168.1.42", token).connect().await?);
//! let poller = vacuum.spawn_polling(Duration::from_secs(15));
//!
//! // Elsewhere, read the cached status without touching the network.
//! let status = vacuum.status();
//! # drop(poller);
//! # Ok(())
//! # }
//! ```

pub mod command;
mod device;
pub mod error;
pub mod protocol;
pub mod state;
pub mod telemetry;
pub mod types;

pub use command::{
    CleanCommand, Command, DockCommand, GetConsumablesCommand, GetDndCommand,
    GetPropertiesCommand, LocateCommand, SuctionCommand,
};
pub use device::{Vacuum, VacuumBuilder};
pub use error::{
    CodecError, CommandError, ControllerError, Error, Result, TransportError, ValueError,
};
pub use protocol::{CallConfig, DeviceIdentity};
pub use state::{VacuumState, VacuumStatus};
pub use telemetry::{ConsumableLife, DndStatus, PropertySnapshot, PropertyValue};
pub use types::{DeviceToken, FanSpeed, FaultCode, RunState};
