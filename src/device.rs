// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level vacuum abstraction.
//!
//! [`Vacuum`] is the only type the host automation layer talks to. It
//! owns the command channel behind a FIFO mutex (one exchange in flight
//! per device, callers served in submission order) and a cached
//! [`VacuumStatus`] that is replaced atomically by [`Vacuum::refresh`].
//!
//! Control operations deliberately do *not* touch the cached status:
//! the next `refresh()` is the single source of truth, so the core
//! never presents a state the device would contradict.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::command::{
    CleanCommand, Command, DockCommand, GetConsumablesCommand, GetDndCommand,
    GetPropertiesCommand, LocateCommand, SuctionCommand,
};
use crate::error::{ControllerError, TransportError};
use crate::protocol::transport::DEFAULT_PORT;
use crate::protocol::{CallConfig, CommandChannel, DeviceIdentity, Session};
use crate::state::{VacuumStatus, advance};
use crate::telemetry::{ConsumableLife, DndStatus, POLLED_PROPERTIES, map_properties};
use crate::types::{DeviceToken, FanSpeed};

/// A Viomi robot vacuum on the local network.
///
/// # Creating a Vacuum
///
/// ```no_run
/// use viomr_lib::Vacuum;
///
/// # async fn example() -> viomr_lib::Result<()> {
/// let token = "00112233445566778899aabbccddeeff".parse()?;
/// let vacuum = Vacuum::builder("192.168.1.42", token)
///     .connect()
///     .await?;
///
/// let status = vacuum.refresh().await?;
/// println!("vacuum is {}", status.state);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Vacuum {
    channel: Mutex<CommandChannel>,
    identity: DeviceIdentity,
    status: RwLock<VacuumStatus>,
}

impl Vacuum {
    /// Creates a builder for the device at `host`.
    #[must_use]
    pub fn builder(host: impl Into<String>, token: DeviceToken) -> VacuumBuilder {
        VacuumBuilder::new(host, token)
    }

    /// Returns the identity the device revealed during the handshake.
    #[must_use]
    pub const fn identity(&self) -> DeviceIdentity {
        self.identity
    }

    /// Returns the last reconciled status without touching the network.
    ///
    /// Before the first successful [`Vacuum::refresh`] this is the
    /// default status with state `Unknown`.
    #[must_use]
    pub fn status(&self) -> VacuumStatus {
        *self.status.read()
    }

    /// Polls the device and reconciles the cached status.
    ///
    /// Performs one batched property read, maps it into a snapshot,
    /// advances the state machine, and atomically replaces the cached
    /// status. On failure the cached status is left untouched — a failed
    /// poll must not erase what is known.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError` wrapping the underlying command failure.
    pub async fn refresh(&self) -> Result<VacuumStatus, ControllerError> {
        let query = GetPropertiesCommand::new(POLLED_PROPERTIES);

        // The channel stays locked until the cached status has been
        // swapped: concurrent refreshers publish in exchange order, so a
        // slow caller can never overwrite a fresher status with a stale
        // one.
        let mut channel = self.channel.lock().await;
        let result = channel.call(query.method(), query.params()).await?;

        let Value::Array(values) = result else {
            return Err(ControllerError::UnexpectedReply(format!(
                "get_prop result is not an array: {result}"
            )));
        };

        let snapshot = map_properties(query.names(), &values);
        let next = {
            let mut status = self.status.write();
            let next = advance(&status, &snapshot);
            *status = next;
            next
        };
        drop(channel);

        tracing::debug!(state = %next.state, battery = ?next.battery_percent, "status refreshed");
        Ok(next)
    }

    /// Starts or resumes cleaning.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError` if the command fails; the cached status
    /// is unaffected either way.
    pub async fn start_clean(&self) -> Result<(), ControllerError> {
        self.dispatch_ok(&CleanCommand::Start).await
    }

    /// Pauses the current cleaning task in place.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError` if the command fails.
    pub async fn pause(&self) -> Result<(), ControllerError> {
        self.dispatch_ok(&CleanCommand::Pause).await
    }

    /// Stops the current cleaning task.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError` if the command fails.
    pub async fn stop(&self) -> Result<(), ControllerError> {
        self.dispatch_ok(&CleanCommand::Stop).await
    }

    /// Sends the vacuum back to its dock.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError` if the command fails.
    pub async fn return_to_dock(&self) -> Result<(), ControllerError> {
        self.dispatch_ok(&DockCommand).await
    }

    /// Makes the vacuum announce its position.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError` if the command fails.
    pub async fn locate(&self) -> Result<(), ControllerError> {
        self.dispatch_ok(&LocateCommand).await
    }

    /// Sets the suction fan speed.
    ///
    /// The level is absolute, so repeating the call is harmless.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError` if the command fails.
    pub async fn set_fan_speed(&self, speed: FanSpeed) -> Result<(), ControllerError> {
        self.dispatch_ok(&SuctionCommand::new(speed)).await
    }

    /// Reads the remaining service life of each consumable.
    ///
    /// Hours in use are reported by the device; this translates them
    /// against the rated service life of each part. Not cached; every
    /// call is one device exchange.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::UnexpectedReply` if the reply does not
    /// carry the four expected usage counters, or the underlying command
    /// failure.
    pub async fn consumables(&self) -> Result<ConsumableLife, ControllerError> {
        let result = self.dispatch(&GetConsumablesCommand).await?;
        let Value::Array(values) = result else {
            return Err(ControllerError::UnexpectedReply(format!(
                "get_consumables result is not an array: {result}"
            )));
        };
        ConsumableLife::from_values(&values).ok_or_else(|| {
            ControllerError::UnexpectedReply(format!(
                "get_consumables reply not understood: {values:?}"
            ))
        })
    }

    /// Reads the Do-Not-Disturb window configuration.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::UnexpectedReply` if the reply does not
    /// carry a valid window, or the underlying command failure.
    pub async fn dnd_status(&self) -> Result<DndStatus, ControllerError> {
        let result = self.dispatch(&GetDndCommand).await?;
        let Value::Array(values) = result else {
            return Err(ControllerError::UnexpectedReply(format!(
                "get_notdisturb result is not an array: {result}"
            )));
        };
        DndStatus::from_values(&values).ok_or_else(|| {
            ControllerError::UnexpectedReply(format!(
                "get_notdisturb reply not understood: {values:?}"
            ))
        })
    }

    /// Sends a raw method/params pair and returns the raw result.
    ///
    /// Escape hatch for firmware methods this library has no typed
    /// command for.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError` if the command fails.
    pub async fn send_raw(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<Value, ControllerError> {
        let mut channel = self.channel.lock().await;
        Ok(channel.call(method, params).await?)
    }

    /// Spawns a background task that refreshes the status on a fixed
    /// interval until the returned handle is aborted or all other
    /// references to this vacuum are dropped.
    ///
    /// Poll failures are logged and the cached status keeps its last
    /// good value; the host layer can watch for staleness via
    /// [`PropertySnapshot::taken_at`](crate::telemetry::PropertySnapshot::taken_at)
    /// semantics or simply mark the entity unavailable when `refresh`
    /// errors.
    pub fn spawn_polling(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let vacuum = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(vacuum) = vacuum.upgrade() else {
                    return;
                };
                if let Err(e) = vacuum.refresh().await {
                    tracing::warn!(error = %e, "poll cycle failed");
                }
            }
        })
    }

    /// Dispatches a typed command through the FIFO queue.
    async fn dispatch<C: Command>(&self, command: &C) -> Result<Value, ControllerError> {
        let mut channel = self.channel.lock().await;
        Ok(channel.call(command.method(), command.params()).await?)
    }

    /// Dispatches a command whose result only signals success.
    async fn dispatch_ok<C: Command>(&self, command: &C) -> Result<(), ControllerError> {
        let result = self.dispatch(command).await?;
        tracing::debug!(method = command.method(), %result, "command acknowledged");
        Ok(())
    }
}

/// Builder for a [`Vacuum`].
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use viomr_lib::Vacuum;
///
/// # async fn example() -> viomr_lib::Result<()> {
/// # let token = "00112233445566778899aabbccddeeff".parse()?;
/// let vacuum = Vacuum::builder("192.168.1.42", token)
///     .with_timeout(Duration::from_secs(5))
///     .with_max_retries(1)
///     .connect()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct VacuumBuilder {
    host: String,
    port: u16,
    token: DeviceToken,
    config: CallConfig,
}

impl VacuumBuilder {
    /// Creates a builder with the default port and timing.
    #[must_use]
    pub fn new(host: impl Into<String>, token: DeviceToken) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            token,
            config: CallConfig::default(),
        }
    }

    /// Sets a non-standard device port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the per-attempt response timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Sets how many times a silent request is resent.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    /// Opens the socket and performs the initial handshake.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Unreachable` if the device does not
    /// answer the handshake, or other `TransportError` variants on
    /// socket/address failures.
    pub async fn connect(self) -> Result<Vacuum, TransportError> {
        let mut session = Session::connect(&self.host, self.port, self.token).await?;
        let identity = session.handshake(self.config.timeout).await?;

        tracing::info!(
            host = %self.host,
            device_id = identity.device_id(),
            "connected to vacuum"
        );

        Ok(Vacuum {
            channel: Mutex::new(CommandChannel::new(session, self.config)),
            identity,
            status: RwLock::new(VacuumStatus::default()),
        })
    }
}
