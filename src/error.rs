// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `ViomR` library.
//!
//! This module provides a layered error hierarchy matching the protocol
//! stack: frame encoding/decoding, socket transport, request/response
//! exchange, and the public controller surface.

use thiserror::Error;

/// The main error type for this library.
///
/// This enum encompasses all possible errors that can occur when
/// interacting with Viomi vacuums.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while encoding or decoding a frame.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Error occurred at the socket/handshake level.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Error occurred during a request/response exchange.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// Error surfaced by the vacuum controller.
    #[error("controller error: {0}")]
    Controller(#[from] ControllerError),
}

/// Errors related to value validation and constraints.
///
/// These errors occur when attempting to create constrained types
/// with invalid values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A device token had the wrong decoded length.
    #[error("device token must be 16 bytes, got {actual}")]
    InvalidTokenLength {
        /// The decoded length that was provided.
        actual: usize,
    },

    /// A device token string was neither valid hex nor valid base64.
    #[error("device token is not valid hex or base64: {0}")]
    InvalidTokenEncoding(String),

    /// A fan speed level is outside the set the firmware accepts.
    #[error("fan speed level {0} is not supported")]
    InvalidFanSpeed(i64),
}

/// Errors at the frame payload level.
///
/// These are never retried by the codec itself; recovery (if any) is the
/// command channel's job.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The frame did not start with the protocol magic bytes.
    #[error("bad magic bytes: {found:02x?}")]
    BadMagic {
        /// The first two bytes that were found instead.
        found: [u8; 2],
    },

    /// The declared frame length disagrees with the actual byte count.
    #[error("truncated frame: header declares {declared} bytes, got {actual}")]
    Truncated {
        /// Length declared in the frame header.
        declared: usize,
        /// Number of bytes actually received.
        actual: usize,
    },

    /// The frame checksum did not match the recomputed digest.
    #[error("frame checksum mismatch")]
    BadChecksum,

    /// The decrypted payload had structurally invalid padding.
    #[error("invalid payload padding")]
    BadPadding,
}

impl CodecError {
    /// Returns `true` if this failure usually indicates stamp drift or a
    /// wrong key rather than line noise.
    ///
    /// The command channel uses this to decide when a fresh handshake is
    /// worth attempting.
    #[must_use]
    pub const fn is_auth_shaped(&self) -> bool {
        matches!(self, Self::BadChecksum | Self::BadPadding)
    }
}

/// Errors at the socket/handshake level.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The device did not answer the handshake within the timeout.
    #[error("device unreachable: no handshake reply within {0} ms")]
    Unreachable(u64),

    /// No datagram arrived within the receive timeout.
    #[error("receive timed out after {0} ms")]
    Timeout(u64),

    /// The configured device address could not be resolved.
    #[error("invalid device address: {0}")]
    InvalidAddress(String),

    /// A data frame was sent before a handshake completed.
    #[error("not connected: handshake has not completed")]
    NotConnected,

    /// Underlying socket I/O failed.
    #[error("socket I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced after the command channel's retry policy.
#[derive(Debug, Error)]
pub enum CommandError {
    /// No valid response arrived after all retries were exhausted.
    #[error("device unreachable after {attempts} attempts")]
    Unreachable {
        /// Total number of send attempts performed.
        attempts: u32,
    },

    /// The device explicitly rejected the request. Never retried.
    #[error("device rejected request: {message} (code {code})")]
    DeviceRejected {
        /// Vendor error code from the response.
        code: i64,
        /// Vendor error message from the response.
        message: String,
    },

    /// The response decrypted cleanly but was not valid JSON-RPC.
    #[error("malformed response payload: {0}")]
    MalformedResponse(String),

    /// A non-recoverable transport failure (socket error, bad address).
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Errors surfaced by the public [`Vacuum`](crate::Vacuum) operations.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The underlying command exchange failed.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The device answered with an unexpected result shape.
    #[error("unexpected reply from device: {0}")]
    UnexpectedReply(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
