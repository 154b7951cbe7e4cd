// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The per-device secret token.
//!
//! Every miIO device is paired with a 128-bit token that keys all
//! encrypted traffic. The token is acquired out-of-band (vendor app
//! database, provisioning capture) and entered at configuration time as
//! either a 32-character hex string or a base64 string.

use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::ValueError;

/// A 16-byte device secret token.
///
/// The token never appears in `Debug` or `Display` output beyond its
/// first two bytes, so it is safe to log configuration structs that
/// contain one.
///
/// # Examples
///
/// ```
/// use viomr_lib::types::DeviceToken;
///
/// let token: DeviceToken = "00112233445566778899aabbccddeeff".parse().unwrap();
/// assert_eq!(token.as_bytes().len(), 16);
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DeviceToken([u8; 16]);

impl DeviceToken {
    /// Creates a token from raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Parses a token from a 32-character hex string.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidTokenEncoding` if the string is not
    /// valid hex, or `ValueError::InvalidTokenLength` if it decodes to a
    /// length other than 16 bytes.
    pub fn from_hex(s: &str) -> Result<Self, ValueError> {
        let bytes =
            hex::decode(s.trim()).map_err(|e| ValueError::InvalidTokenEncoding(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Parses a token from a base64 string.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidTokenEncoding` if the string is not
    /// valid base64, or `ValueError::InvalidTokenLength` if it decodes to
    /// a length other than 16 bytes.
    pub fn from_base64(s: &str) -> Result<Self, ValueError> {
        let bytes = BASE64
            .decode(s.trim())
            .map_err(|e| ValueError::InvalidTokenEncoding(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Returns the raw token bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    fn from_slice(bytes: &[u8]) -> Result<Self, ValueError> {
        let arr: [u8; 16] = bytes
            .try_into()
            .map_err(|_| ValueError::InvalidTokenLength {
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }
}

impl FromStr for DeviceToken {
    type Err = ValueError;

    /// Parses a token string, accepting hex first and base64 as a
    /// fallback (the two encodings configuration UIs commonly hand over).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::from_hex(s) {
            Ok(token) => Ok(token),
            // A 32-char hex string is unambiguous; only fall back when
            // the input was not hex-shaped at all.
            Err(ValueError::InvalidTokenEncoding(_)) => Self::from_base64(s),
            Err(e) => Err(e),
        }
    }
}

impl fmt::Debug for DeviceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceToken({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}

impl fmt::Display for DeviceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}..", self.0[0], self.0[1])
    }
}
