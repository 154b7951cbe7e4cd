// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The UDP transport session.
//!
//! A [`Session`] owns one device's socket, its identity, and its stamp.
//! It performs the handshake and offers single send/receive primitives.
//! Retry policy lives one layer up in the
//! [`CommandChannel`](crate::protocol::CommandChannel); the session never
//! retries anything.
//!
//! A session permits exactly one in-flight exchange at a time (the device
//! itself serializes requests); concurrent callers must be serialized by
//! the layer above.

use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::net::UdpSocket;

use crate::error::{CodecError, TransportError};
use crate::protocol::codec::{self, Frame};
use crate::protocol::crypto::CryptoKeys;
use crate::types::DeviceToken;

/// Default UDP port miIO devices listen on.
pub const DEFAULT_PORT: u16 = 54321;

/// Largest datagram we expect from a device.
const RECV_BUFFER_LEN: usize = 4096;

/// A failure during one send/receive exchange.
///
/// Splitting codec from transport failures lets the command channel
/// apply different recovery to each: codec failures on a reply count
/// toward the stamp-drift re-handshake heuristic, receive timeouts count
/// toward plain retries, and socket errors abort the call.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The reply arrived but could not be decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The socket failed or nothing arrived in time.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// The identity a device reveals in its handshake reply.
///
/// The device id is learned from the handshake, never user-supplied. The
/// paired token is held privately by the session and is not part of this
/// struct on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceIdentity {
    device_id: u32,
}

impl DeviceIdentity {
    /// Returns the device id.
    #[must_use]
    pub const fn device_id(&self) -> u32 {
        self.device_id
    }
}

/// The device-side monotonic stamp, tracked locally.
///
/// Every outgoing frame must carry the device's current stamp. We only
/// observe it at discrete points (handshake, replies), so outgoing frames
/// project it forward by the wall-clock seconds elapsed since the last
/// observation.
#[derive(Debug, Clone, Copy)]
struct Stamp {
    value: u32,
    observed_at: Instant,
}

impl Stamp {
    fn observe(value: u32) -> Self {
        Self {
            value,
            observed_at: Instant::now(),
        }
    }

    /// The stamp to put on a frame sent now.
    fn projected(&self) -> u32 {
        #[allow(clippy::cast_possible_truncation)]
        let elapsed = self.observed_at.elapsed().as_secs() as u32;
        self.value.wrapping_add(elapsed)
    }
}

/// One device's transport session.
///
/// Owns the socket, the token-derived key material, and the
/// identity/stamp state learned from the handshake.
#[derive(Debug)]
pub struct Session {
    socket: UdpSocket,
    token: DeviceToken,
    keys: CryptoKeys,
    identity: Option<DeviceIdentity>,
    stamp: Option<Stamp>,
}

impl Session {
    /// Opens a socket towards `host:port`.
    ///
    /// No traffic is exchanged yet; call [`Session::handshake`] before
    /// sending data frames.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::InvalidAddress` if the address does not
    /// resolve, or `TransportError::Io` if the socket cannot be opened.
    pub async fn connect(host: &str, port: u16, token: DeviceToken) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind(("0.0.0.0", 0)).await?;
        socket
            .connect((host, port))
            .await
            .map_err(|e| TransportError::InvalidAddress(format!("{host}:{port}: {e}")))?;

        tracing::debug!(host, port, "transport session opened");

        Ok(Self {
            socket,
            keys: CryptoKeys::derive(&token),
            token,
            identity: None,
            stamp: None,
        })
    }

    /// Returns the identity learned from the last handshake, if any.
    #[must_use]
    pub fn identity(&self) -> Option<DeviceIdentity> {
        self.identity
    }

    /// Sends a hello frame and waits for the reply that reveals the
    /// device's id and current stamp.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Unreachable` if no reply arrives within
    /// the timeout, or `TransportError::Io` on socket failure.
    pub async fn handshake(&mut self, timeout: Duration) -> Result<DeviceIdentity, TransportError> {
        self.socket.send(&codec::hello_frame()).await?;

        let mut buf = [0u8; RECV_BUFFER_LEN];
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let received = tokio::time::timeout(remaining, self.socket.recv(&mut buf))
                .await
                .map_err(|_| {
                    #[allow(clippy::cast_possible_truncation)]
                    let ms = timeout.as_millis() as u64;
                    TransportError::Unreachable(ms)
                })??;

            // Anything that does not parse as a hello frame is a stray
            // datagram (or a late data reply); keep waiting until the
            // deadline.
            let Ok(frame) = codec::parse_frame(&buf[..received]) else {
                continue;
            };
            if !frame.is_hello() {
                continue;
            }

            let identity = DeviceIdentity {
                device_id: frame.header.device_id,
            };
            self.identity = Some(identity);
            self.stamp = Some(Stamp::observe(frame.header.stamp));

            tracing::debug!(
                device_id = identity.device_id,
                stamp = frame.header.stamp,
                "handshake complete"
            );
            return Ok(identity);
        }
    }

    /// Encrypts a plaintext payload and sends it as one data frame.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::NotConnected` if no handshake has
    /// completed yet, or `TransportError::Io` on socket failure.
    pub async fn send_payload(&mut self, plaintext: &[u8]) -> Result<(), TransportError> {
        let (Some(identity), Some(stamp)) = (self.identity, self.stamp) else {
            return Err(TransportError::NotConnected);
        };

        let ciphertext = self.keys.encrypt(plaintext);
        let frame = codec::build_frame(
            identity.device_id,
            stamp.projected(),
            &self.token,
            &ciphertext,
        );

        tracing::trace!(
            device_id = identity.device_id,
            stamp = stamp.projected(),
            frame_len = frame.len(),
            "sending data frame"
        );
        self.socket.send(&frame).await?;
        Ok(())
    }

    /// Waits for one frame, verifies it, and returns the decrypted
    /// payload.
    ///
    /// A valid reply also refreshes the local stamp observation, keeping
    /// it loosely synchronized with the device clock.
    ///
    /// # Errors
    ///
    /// - `TransportError::Timeout` if nothing arrives in time
    /// - `CodecError` variants if a datagram arrives but fails parsing,
    ///   checksum verification, or decryption (the frame is dropped;
    ///   recovery is the caller's decision)
    pub async fn receive_payload(&mut self, timeout: Duration) -> Result<Vec<u8>, ExchangeError> {
        let mut buf = [0u8; RECV_BUFFER_LEN];
        let received = tokio::time::timeout(timeout, self.socket.recv(&mut buf))
            .await
            .map_err(|_| {
                #[allow(clippy::cast_possible_truncation)]
                let ms = timeout.as_millis() as u64;
                TransportError::Timeout(ms)
            })?
            .map_err(TransportError::Io)?;

        let frame = codec::parse_frame(&buf[..received]).map_err(CodecError::from)?;
        frame.verify_checksum(&self.token)?;
        self.observe_reply(&frame);

        let plaintext = self.keys.decrypt(&frame.payload)?;
        tracing::trace!(payload_len = plaintext.len(), "received data frame");
        Ok(plaintext)
    }

    fn observe_reply(&mut self, frame: &Frame) {
        self.stamp = Some(Stamp::observe(frame.header.stamp));
    }
}
