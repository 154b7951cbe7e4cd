// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Binary frame encoding and decoding.
//!
//! Every datagram is one frame: a fixed 32-byte header followed by the
//! encrypted payload. All integer fields are big-endian.
//!
//! ```text
//! offset  size  field
//! 0       2     magic 0x21 0x31
//! 2       2     total frame length, header included
//! 4       4     reserved (0xFFFFFFFF in hello frames, 0 otherwise)
//! 8       4     device id
//! 12      4     stamp
//! 16      16    checksum (hello: 0xFF..FF, ignored; data: MD5, see below)
//! ```
//!
//! The data-frame checksum is `MD5(header[0..16] ++ token ++ payload)`:
//! the header with its checksum field replaced by the device token. The
//! codec knows nothing about sockets or session state.

use crate::error::CodecError;
use crate::protocol::crypto::md5_digest;
use crate::types::DeviceToken;

/// Protocol magic bytes, the first two bytes of every frame.
pub const MAGIC: [u8; 2] = [0x21, 0x31];

/// Size of the fixed frame header in bytes.
pub const HEADER_LEN: usize = 32;

/// Reserved-field value that marks a hello frame.
const HELLO_RESERVED: u32 = 0xFFFF_FFFF;

/// A parsed frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Total frame length as declared on the wire, header included.
    pub length: u16,
    /// Reserved field; `0xFFFFFFFF` in hello frames.
    pub reserved: u32,
    /// Device id, learned from the handshake reply.
    pub device_id: u32,
    /// Device stamp at the time the frame was built.
    pub stamp: u32,
    /// Checksum field as received; unused in hello frames.
    pub checksum: [u8; 16],
}

/// A parsed frame: header plus (still encrypted) payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The fixed header.
    pub header: FrameHeader,
    /// The encrypted payload; empty for hello frames.
    pub payload: Vec<u8>,
}

impl Frame {
    /// Returns `true` if this is a hello (handshake) frame.
    #[must_use]
    pub fn is_hello(&self) -> bool {
        self.header.reserved == HELLO_RESERVED && self.payload.is_empty()
    }

    /// Verifies the data-frame checksum against the token.
    ///
    /// Hello frames carry no meaningful checksum and always verify.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::BadChecksum` if the recomputed digest does
    /// not match the checksum field. The frame must then be dropped; the
    /// codec never retries.
    pub fn verify_checksum(&self, token: &DeviceToken) -> Result<(), CodecError> {
        if self.is_hello() {
            return Ok(());
        }
        let expected = checksum(&self.header, token, &self.payload);
        if expected == self.header.checksum {
            Ok(())
        } else {
            Err(CodecError::BadChecksum)
        }
    }
}

/// Builds the 32-byte hello frame used to probe a device.
#[must_use]
pub fn hello_frame() -> [u8; HEADER_LEN] {
    let mut frame = [0xFF; HEADER_LEN];
    frame[0] = MAGIC[0];
    frame[1] = MAGIC[1];
    // Safe: HEADER_LEN is 32.
    #[allow(clippy::cast_possible_truncation)]
    frame[2..4].copy_from_slice(&(HEADER_LEN as u16).to_be_bytes());
    frame
}

/// Builds a data frame around an already encrypted payload.
///
/// # Panics
///
/// Panics if the total frame length exceeds `u16::MAX`; request payloads
/// are tiny JSON objects and never approach the limit.
#[must_use]
pub fn build_frame(device_id: u32, stamp: u32, token: &DeviceToken, payload: &[u8]) -> Vec<u8> {
    let length = u16::try_from(HEADER_LEN + payload.len()).expect("frame exceeds u16 length field");
    let mut header = FrameHeader {
        length,
        reserved: 0,
        device_id,
        stamp,
        checksum: [0; 16],
    };
    header.checksum = checksum(&header, token, payload);

    let mut bytes = Vec::with_capacity(usize::from(length));
    bytes.extend_from_slice(&header_prefix(&header));
    bytes.extend_from_slice(&header.checksum);
    bytes.extend_from_slice(payload);
    bytes
}

/// Parses raw datagram bytes into a frame.
///
/// # Errors
///
/// Returns `CodecError::BadMagic` if the frame does not start with the
/// protocol magic, or `CodecError::Truncated` if fewer bytes arrived
/// than the header declares (or than a header needs at all).
pub fn parse_frame(bytes: &[u8]) -> Result<Frame, CodecError> {
    if bytes.len() < HEADER_LEN {
        return Err(CodecError::Truncated {
            declared: HEADER_LEN,
            actual: bytes.len(),
        });
    }
    if bytes[0..2] != MAGIC {
        return Err(CodecError::BadMagic {
            found: [bytes[0], bytes[1]],
        });
    }

    let length = u16::from_be_bytes([bytes[2], bytes[3]]);
    if usize::from(length) != bytes.len() {
        return Err(CodecError::Truncated {
            declared: usize::from(length),
            actual: bytes.len(),
        });
    }

    let mut checksum = [0u8; 16];
    checksum.copy_from_slice(&bytes[16..32]);

    Ok(Frame {
        header: FrameHeader {
            length,
            reserved: u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            device_id: u32::from_be_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            stamp: u32::from_be_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
            checksum,
        },
        payload: bytes[HEADER_LEN..].to_vec(),
    })
}

/// Serializes the first 16 header bytes (everything before the checksum).
fn header_prefix(header: &FrameHeader) -> [u8; 16] {
    let mut prefix = [0u8; 16];
    prefix[0..2].copy_from_slice(&MAGIC);
    prefix[2..4].copy_from_slice(&header.length.to_be_bytes());
    prefix[4..8].copy_from_slice(&header.reserved.to_be_bytes());
    prefix[8..12].copy_from_slice(&header.device_id.to_be_bytes());
    prefix[12..16].copy_from_slice(&header.stamp.to_be_bytes());
    prefix
}

/// Computes the data-frame checksum.
fn checksum(header: &FrameHeader, token: &DeviceToken, payload: &[u8]) -> [u8; 16] {
    md5_digest(&[&header_prefix(header), token.as_bytes(), payload])
}
