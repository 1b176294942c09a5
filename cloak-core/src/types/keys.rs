//! Key material types for cloak.
//!
//! This module defines the byte-level key structures used in the protocol:
//!
//! - [`RootSecret`]: 32-byte user secret, source of all derived keys (zeroized on drop)
//! - [`PublicKeyBytes`]: SEC1-compressed secp256k1 public key (33 bytes)
//!
//! Curve membership of a [`PublicKeyBytes`] is *not* checked here — this
//! crate carries no curve arithmetic. Decoding for use validates the point
//! in `cloak-crypto`.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{COMPRESSED_POINT_SIZE, ROOT_SECRET_SIZE};
use crate::error::{CloakError, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// ROOT SECRET
// ═══════════════════════════════════════════════════════════════════════════════

/// The 32-byte root secret controlled by a single user.
///
/// Never transmitted and never serialized; all of a user's derived keys
/// (spending and viewing) come from this value. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RootSecret {
    bytes: [u8; ROOT_SECRET_SIZE],
}

impl RootSecret {
    /// Creates a root secret from raw bytes.
    ///
    /// The caller is responsible for sourcing real entropy. A root derived
    /// from public data (e.g. a wallet address string) breaks every
    /// unlinkability property of the protocol.
    pub fn new(bytes: [u8; ROOT_SECRET_SIZE]) -> Self {
        Self { bytes }
    }

    /// Creates a root secret from a slice.
    ///
    /// # Errors
    /// Returns an error if the slice is not exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != ROOT_SECRET_SIZE {
            return Err(CloakError::InvalidKeySize {
                expected: ROOT_SECRET_SIZE,
                actual: bytes.len(),
            });
        }

        let mut arr = [0u8; ROOT_SECRET_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Returns the raw bytes of the secret.
    ///
    /// # Security
    /// Handle the returned bytes carefully - do not log or expose them.
    pub fn as_bytes(&self) -> &[u8; ROOT_SECRET_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for RootSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose secret content
        write!(f, "RootSecret([REDACTED])")
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPRESSED PUBLIC KEY
// ═══════════════════════════════════════════════════════════════════════════════

/// A SEC1-compressed secp256k1 public key (33 bytes).
///
/// Safe to share publicly. Used for the spending and viewing halves of a
/// meta-address and for the ephemeral key carried in announcements.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKeyBytes {
    bytes: [u8; COMPRESSED_POINT_SIZE],
}

impl PublicKeyBytes {
    /// Creates a public key from raw bytes.
    ///
    /// Checks length and the SEC1 compression prefix (0x02 or 0x03) only;
    /// curve membership is validated when the point is decoded for use.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != COMPRESSED_POINT_SIZE {
            return Err(CloakError::InvalidKeySize {
                expected: COMPRESSED_POINT_SIZE,
                actual: bytes.len(),
            });
        }

        if bytes[0] != 0x02 && bytes[0] != 0x03 {
            return Err(CloakError::InvalidPublicKey(format!(
                "bad SEC1 prefix byte: 0x{:02x}",
                bytes[0]
            )));
        }

        let mut arr = [0u8; COMPRESSED_POINT_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Creates a public key from a fixed-size array, skipping prefix checks.
    ///
    /// Intended for bytes that already came out of a curve library.
    pub fn from_array(bytes: [u8; COMPRESSED_POINT_SIZE]) -> Self {
        Self { bytes }
    }

    /// Returns the raw bytes of the public key.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the public key as a fixed-size array reference.
    pub fn as_array(&self) -> &[u8; COMPRESSED_POINT_SIZE] {
        &self.bytes
    }

    /// Returns the hex-encoded public key.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Creates a public key from a hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)?;
        Self::from_bytes(&bytes)
    }
}

impl std::fmt::Debug for PublicKeyBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Only show first/last 4 bytes for readability
        write!(
            f,
            "PublicKeyBytes({}...{})",
            hex::encode(&self.bytes[..4]),
            hex::encode(&self.bytes[COMPRESSED_POINT_SIZE - 4..])
        )
    }
}

// Serde implementation that uses hex encoding
impl Serialize for PublicKeyBytes {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKeyBytes {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
