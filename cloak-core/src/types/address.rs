//! Address types: Ethereum addresses, meta-addresses, and stealth bundles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    COMPRESSED_POINT_SIZE, ETH_ADDRESS_SIZE, META_ADDRESS_PAYLOAD_SIZE, META_ADDRESS_PREFIX,
    META_ADDRESS_TEXT_LEN,
};
use crate::error::{CloakError, Result};
use crate::types::keys::PublicKeyBytes;

// ═══════════════════════════════════════════════════════════════════════════════
// ETHEREUM ADDRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// A 20-byte Ethereum-style address.
///
/// Stealth addresses are values of this type: the last 20 bytes of the
/// Keccak-256 hash of the uncompressed stealth public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EthAddress {
    bytes: [u8; ETH_ADDRESS_SIZE],
}

impl EthAddress {
    /// Creates an address from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != ETH_ADDRESS_SIZE {
            return Err(CloakError::InvalidStealthAddress(format!(
                "expected {} bytes, got {}",
                ETH_ADDRESS_SIZE,
                bytes.len()
            )));
        }

        let mut arr = [0u8; ETH_ADDRESS_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Creates an address from a fixed-size array.
    pub fn from_array(bytes: [u8; ETH_ADDRESS_SIZE]) -> Self {
        Self { bytes }
    }

    /// Parses an address from a hex string, with or without `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(stripped)?;
        Self::from_bytes(&bytes)
    }

    /// Returns the raw bytes of the address.
    pub fn as_bytes(&self) -> &[u8; ETH_ADDRESS_SIZE] {
        &self.bytes
    }

    /// Returns the address as `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.bytes))
    }

    /// The all-zero address.
    pub fn zero() -> Self {
        Self {
            bytes: [0u8; ETH_ADDRESS_SIZE],
        }
    }

    /// Returns true if this is the all-zero address.
    pub fn is_zero(&self) -> bool {
        self.bytes == [0u8; ETH_ADDRESS_SIZE]
    }
}

impl fmt::Display for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EthAddress({})", self.to_hex())
    }
}

impl FromStr for EthAddress {
    type Err = CloakError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// META-ADDRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// A recipient's published stealth meta-address.
///
/// A pair of compressed secp256k1 public keys. The spending key controls
/// funds; the viewing key lets a scanner detect payments without being able
/// to spend them. The text form is `st:eth:0x` followed by 132 hex chars
/// (spending key first).
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaAddress {
    /// Compressed spending public key.
    pub spending_pk: PublicKeyBytes,
    /// Compressed viewing public key.
    pub viewing_pk: PublicKeyBytes,
}

impl MetaAddress {
    /// Creates a meta-address from its two component keys.
    pub fn new(spending_pk: PublicKeyBytes, viewing_pk: PublicKeyBytes) -> Self {
        Self {
            spending_pk,
            viewing_pk,
        }
    }

    /// Serializes to the 66-byte wire form: spending key then viewing key.
    pub fn to_bytes(&self) -> [u8; META_ADDRESS_PAYLOAD_SIZE] {
        let mut out = [0u8; META_ADDRESS_PAYLOAD_SIZE];
        out[..COMPRESSED_POINT_SIZE].copy_from_slice(self.spending_pk.as_bytes());
        out[COMPRESSED_POINT_SIZE..].copy_from_slice(self.viewing_pk.as_bytes());
        out
    }

    /// Parses the 66-byte wire form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != META_ADDRESS_PAYLOAD_SIZE {
            return Err(CloakError::InvalidMetaAddress(format!(
                "expected {} bytes, got {}",
                META_ADDRESS_PAYLOAD_SIZE,
                bytes.len()
            )));
        }

        let spending_pk = PublicKeyBytes::from_bytes(&bytes[..COMPRESSED_POINT_SIZE])
            .map_err(|e| CloakError::InvalidMetaAddress(format!("spending key: {}", e)))?;
        let viewing_pk = PublicKeyBytes::from_bytes(&bytes[COMPRESSED_POINT_SIZE..])
            .map_err(|e| CloakError::InvalidMetaAddress(format!("viewing key: {}", e)))?;

        Ok(Self {
            spending_pk,
            viewing_pk,
        })
    }
}

impl fmt::Display for MetaAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            META_ADDRESS_PREFIX,
            self.spending_pk.to_hex(),
            self.viewing_pk.to_hex()
        )
    }
}

impl fmt::Debug for MetaAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetaAddress")
            .field("spending_pk", &self.spending_pk)
            .field("viewing_pk", &self.viewing_pk)
            .finish()
    }
}

impl FromStr for MetaAddress {
    type Err = CloakError;

    fn from_str(s: &str) -> Result<Self> {
        if !s.starts_with(META_ADDRESS_PREFIX) {
            return Err(CloakError::InvalidMetaAddress(format!(
                "missing '{}' prefix",
                META_ADDRESS_PREFIX
            )));
        }

        if s.len() != META_ADDRESS_TEXT_LEN {
            return Err(CloakError::InvalidMetaAddress(format!(
                "expected {} chars, got {}",
                META_ADDRESS_TEXT_LEN,
                s.len()
            )));
        }

        let payload = hex::decode(&s[META_ADDRESS_PREFIX.len()..])
            .map_err(|e| CloakError::InvalidMetaAddress(format!("bad hex: {}", e)))?;
        Self::from_bytes(&payload)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STEALTH ADDRESS BUNDLE
// ═══════════════════════════════════════════════════════════════════════════════

/// The sender-side output of stealth address generation.
///
/// Contains everything a payer needs: the address to send funds to, and the
/// ephemeral key and view tag to announce so the recipient can find it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StealthAddressBundle {
    /// Where to send the payment.
    pub stealth_address: EthAddress,
    /// The sender's one-time public key, published in the announcement.
    pub ephemeral_pk: PublicKeyBytes,
    /// One-byte scan hint derived from the shared secret.
    pub view_tag: u8,
}
