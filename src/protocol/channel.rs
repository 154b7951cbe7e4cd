// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Correlated request/response exchanges over an unreliable transport.
//!
//! The [`CommandChannel`] turns `method` + `params` into one JSON-RPC
//! exchange: it allocates a request id, sends the encrypted frame, and
//! waits for the response carrying the same id. Loss is handled by
//! resending with the *same* id, so a device that already acted on the
//! first copy answers rather than acting twice — which is also why all
//! write methods in this library are absolute ("set fan speed to 2"),
//! never relative.
//!
//! Device-level rejections are final and never retried; retries exist
//! only for transport-level silence.

use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;

use crate::error::{CommandError, TransportError};
use crate::protocol::transport::{DeviceIdentity, ExchangeError, Session};
use crate::protocol::{RpcRequest, RpcResponse};

/// Per-call timing configuration.
///
/// The defaults match typical local-network round-trip variance for
/// these devices: a worst case of `timeout × (1 + max_retries)` per
/// call.
#[derive(Debug, Clone, Copy)]
pub struct CallConfig {
    /// How long to wait for a matching response per attempt.
    pub timeout: Duration,
    /// How many times to resend after the first attempt times out.
    pub max_retries: u32,
}

impl CallConfig {
    /// Default per-attempt timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);
    /// Default retry count.
    pub const DEFAULT_MAX_RETRIES: u32 = 2;
}

impl Default for CallConfig {
    fn default() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
            max_retries: Self::DEFAULT_MAX_RETRIES,
        }
    }
}

/// Number of consecutive authentication-shaped reply failures after
/// which the stamp is assumed to have drifted and a fresh handshake is
/// run before the next attempt.
const AUTH_FAILURES_BEFORE_REHANDSHAKE: u32 = 2;

/// A correlated command channel over one transport session.
///
/// Not internally synchronized: the session below permits one in-flight
/// exchange, so callers must serialize access (the
/// [`Vacuum`](crate::Vacuum) facade does this with a FIFO mutex).
#[derive(Debug)]
pub struct CommandChannel {
    session: Session,
    config: CallConfig,
    next_id: u32,
    auth_failures: u32,
}

impl CommandChannel {
    /// Wraps a transport session.
    #[must_use]
    pub fn new(session: Session, config: CallConfig) -> Self {
        Self {
            session,
            config,
            next_id: 1,
            auth_failures: 0,
        }
    }

    /// Returns the device identity, handshaking first if the session has
    /// none yet.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::Transport` if the handshake fails.
    pub async fn ensure_session(&mut self) -> Result<DeviceIdentity, CommandError> {
        if let Some(identity) = self.session.identity() {
            return Ok(identity);
        }
        self.session
            .handshake(self.config.timeout)
            .await
            .map_err(CommandError::from)
    }

    /// Performs one correlated `method`/`params` exchange.
    ///
    /// Returns the response's `result` value on success.
    ///
    /// # Errors
    ///
    /// - `CommandError::DeviceRejected` if the device answers with an
    ///   `error` object (surfaced immediately, zero retries)
    /// - `CommandError::Unreachable` once every attempt has timed out
    /// - `CommandError::MalformedResponse` if a matching reply is not
    ///   valid JSON-RPC
    /// - `CommandError::Transport` on unrecoverable socket failures
    pub async fn call(&mut self, method: &str, params: Vec<Value>) -> Result<Value, CommandError> {
        self.ensure_session().await?;

        let request = RpcRequest::new(self.allocate_id(), method, params);
        let payload = request.to_payload();
        let attempts = 1 + self.config.max_retries;

        for attempt in 1..=attempts {
            if self.auth_failures >= AUTH_FAILURES_BEFORE_REHANDSHAKE {
                tracing::debug!(
                    method,
                    "consecutive auth-shaped failures, refreshing handshake"
                );
                self.session.handshake(self.config.timeout).await?;
                self.auth_failures = 0;
            }

            self.session.send_payload(&payload).await?;

            match self.await_response(request.id).await? {
                Some(response) => {
                    self.auth_failures = 0;
                    return Self::unwrap_response(method, response);
                }
                None => {
                    tracing::debug!(
                        method,
                        id = request.id,
                        attempt,
                        "no matching response, will resend with the same id"
                    );
                }
            }
        }

        tracing::warn!(method, id = request.id, attempts, "device unreachable");
        Err(CommandError::Unreachable { attempts })
    }

    /// Waits up to one attempt's timeout for the response matching `id`.
    ///
    /// Returns `Ok(None)` when the attempt should be retried (silence or
    /// an authentication-shaped decode failure).
    async fn await_response(&mut self, id: u32) -> Result<Option<RpcResponse>, CommandError> {
        let deadline = Instant::now() + self.config.timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.session.receive_payload(remaining).await {
                Ok(plaintext) => {
                    let response = RpcResponse::from_payload(&plaintext).map_err(|e| {
                        CommandError::MalformedResponse(format!("{e}: {plaintext:02x?}"))
                    })?;
                    if response.id == id {
                        return Ok(Some(response));
                    }
                    // A reply to an abandoned earlier request; discard.
                    tracing::trace!(got = response.id, want = id, "discarding stale response");
                }
                Err(ExchangeError::Transport(TransportError::Timeout(_))) => {
                    return Ok(None);
                }
                Err(ExchangeError::Codec(e)) if e.is_auth_shaped() => {
                    self.auth_failures += 1;
                    tracing::debug!(
                        error = %e,
                        consecutive = self.auth_failures,
                        "reply failed verification"
                    );
                    return Ok(None);
                }
                Err(ExchangeError::Codec(e)) => {
                    // A stray or mangled datagram; the response proper
                    // may still arrive before the deadline.
                    tracing::trace!(error = %e, "ignoring undecodable datagram");
                }
                Err(ExchangeError::Transport(e)) => return Err(e.into()),
            }
        }
    }

    fn unwrap_response(method: &str, response: RpcResponse) -> Result<Value, CommandError> {
        if let Some(error) = response.error {
            tracing::debug!(method, code = error.code, "device rejected request");
            return Err(CommandError::DeviceRejected {
                code: error.code,
                message: error.message,
            });
        }
        response.result.ok_or_else(|| {
            CommandError::MalformedResponse(format!(
                "response to {method} carries neither result nor error"
            ))
        })
    }

    /// Allocates the next request id, skipping 0 on wrap-around.
    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.checked_add(1).unwrap_or(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_config_defaults() {
        let config = CallConfig::default();
        assert_eq!(config.timeout, Duration::from_millis(3000));
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn unwrap_response_prefers_error() {
        let response = RpcResponse {
            id: 1,
            result: Some(Value::String("ok".to_string())),
            error: Some(crate::protocol::RpcError {
                code: -5,
                message: "busy".to_string(),
            }),
        };
        let err = CommandChannel::unwrap_response("set_mode", response).unwrap_err();
        assert!(matches!(
            err,
            CommandError::DeviceRejected { code: -5, .. }
        ));
    }

    #[test]
    fn unwrap_response_requires_a_body() {
        let response = RpcResponse {
            id: 1,
            result: None,
            error: None,
        };
        let err = CommandChannel::unwrap_response("get_prop", response).unwrap_err();
        assert!(matches!(err, CommandError::MalformedResponse(_)));
    }
}
