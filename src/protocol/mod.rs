// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The encrypted miIO local protocol.
//!
//! Layers, bottom up:
//!
//! - [`crypto`]: token-derived AES-128-CBC encryption of frame payloads
//! - [`codec`]: the 32-byte binary frame header, build/parse, MD5 checksum
//! - [`transport`]: one UDP socket per device, handshake, stamp tracking
//! - [`channel`]: request/response correlation, timeouts, retry policy
//!
//! The plaintext carried inside a data frame is a JSON-RPC-shaped object:
//! requests are `{"id", "method", "params"}`, responses are `{"id",
//! "result"}` or `{"id", "error": {"code", "message"}}`.

pub mod channel;
pub mod codec;
pub mod crypto;
pub mod transport;

pub use channel::{CallConfig, CommandChannel};
pub use codec::{Frame, FrameHeader};
pub use transport::{DeviceIdentity, ExchangeError, Session};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A JSON-RPC request payload.
///
/// The id is allocated by the command channel and is unique per session;
/// retries of the same call reuse the same id so a late first reply still
/// correlates.
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest {
    /// Request id, monotonically increasing per session.
    pub id: u32,
    /// Device method name, e.g. `get_prop` or `set_suction`.
    pub method: String,
    /// Ordered positional parameters.
    pub params: Vec<Value>,
}

impl RpcRequest {
    /// Creates a new request.
    #[must_use]
    pub fn new(id: u32, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            id,
            method: method.into(),
            params,
        }
    }

    /// Serializes the request to its wire plaintext.
    #[must_use]
    pub fn to_payload(&self) -> Vec<u8> {
        // Value-based serialization cannot fail.
        serde_json::json!({
            "id": self.id,
            "method": self.method,
            "params": self.params,
        })
        .to_string()
        .into_bytes()
    }
}

/// A JSON-RPC response payload.
///
/// Exactly one of `result` and `error` is expected to be present.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    /// Id of the request this response answers.
    #[serde(default)]
    pub id: u32,
    /// Successful result, if any.
    #[serde(default)]
    pub result: Option<Value>,
    /// Device-level rejection, if any.
    #[serde(default)]
    pub error: Option<RpcError>,
}

/// A device-level error embedded in a response.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
    /// Vendor error code.
    pub code: i64,
    /// Vendor error message.
    #[serde(default)]
    pub message: String,
}

impl RpcResponse {
    /// Parses a decrypted payload into a response.
    ///
    /// Device firmware pads response plaintext with trailing NUL bytes;
    /// these are stripped before JSON parsing.
    ///
    /// # Errors
    ///
    /// Returns the underlying JSON error if the payload is not a valid
    /// response object.
    pub fn from_payload(payload: &[u8]) -> Result<Self, serde_json::Error> {
        let end = payload
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |pos| pos + 1);
        serde_json::from_slice(&payload[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_payload_shape() {
        let req = RpcRequest::new(7, "get_prop", vec![json!("run_state"), json!("battary_life")]);
        let payload = String::from_utf8(req.to_payload()).unwrap();
        let value: Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["method"], "get_prop");
        assert_eq!(value["params"], json!(["run_state", "battary_life"]));
    }

    #[test]
    fn response_with_result() {
        let resp = RpcResponse::from_payload(br#"{"id":7,"result":[2,87]}"#).unwrap();
        assert_eq!(resp.id, 7);
        assert_eq!(resp.result, Some(json!([2, 87])));
        assert!(resp.error.is_none());
    }

    #[test]
    fn response_with_error() {
        let resp =
            RpcResponse::from_payload(br#"{"id":7,"error":{"code":-1,"message":"unknown method"}}"#)
                .unwrap();
        let err = resp.error.unwrap();
        assert_eq!(err.code, -1);
        assert_eq!(err.message, "unknown method");
    }

    #[test]
    fn response_strips_trailing_nuls() {
        let mut payload = br#"{"id":3,"result":["ok"]}"#.to_vec();
        payload.extend_from_slice(&[0, 0, 0]);
        let resp = RpcResponse::from_payload(&payload).unwrap();
        assert_eq!(resp.id, 3);
        assert_eq!(resp.result, Some(json!(["ok"])));
    }

    #[test]
    fn response_garbage_rejected() {
        assert!(RpcResponse::from_payload(b"not json at all").is_err());
    }
}
