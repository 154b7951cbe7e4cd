// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Payload encryption.
//!
//! The protocol's pinned primitives, confirmed against device captures:
//! MD5 for key derivation and frame checksums, AES-128-CBC with PKCS#7
//! padding for the payload. `key = MD5(token)`, `iv = MD5(key ++ token)`.
//! Any mismatch here produces undecryptable traffic with no diagnostic
//! from the device, so none of these constants are negotiable.

use aes::Aes128;
use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use md5::{Digest, Md5};

use crate::error::CodecError;
use crate::types::DeviceToken;

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

/// Computes the MD5 digest of the concatenation of `parts`.
pub(crate) fn md5_digest(parts: &[&[u8]]) -> [u8; 16] {
    let mut hasher = Md5::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Encryption key material derived from a device token.
#[derive(Clone)]
pub struct CryptoKeys {
    key: [u8; 16],
    iv: [u8; 16],
}

impl CryptoKeys {
    /// Derives the AES key and IV from the device token.
    #[must_use]
    pub fn derive(token: &DeviceToken) -> Self {
        let key = md5_digest(&[token.as_bytes()]);
        let iv = md5_digest(&[&key, token.as_bytes()]);
        Self { key, iv }
    }

    /// Encrypts a plaintext payload.
    #[must_use]
    pub fn encrypt(&self, plaintext: &[u8]) -> Vec<u8> {
        Aes128CbcEnc::new(&self.key.into(), &self.iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext)
    }

    /// Decrypts a ciphertext payload and strips the padding.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::BadPadding` if the ciphertext length is not a
    /// whole number of blocks or the padding is structurally invalid —
    /// the symptom of a wrong key or a corrupted frame.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CodecError> {
        Aes128CbcDec::new(&self.key.into(), &self.iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| CodecError::BadPadding)
    }
}

impl std::fmt::Debug for CryptoKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key material stays out of logs.
        f.debug_struct("CryptoKeys").finish_non_exhaustive()
    }
}
