//! Announcement types for the public registry.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::constants::{COMPRESSED_POINT_SIZE, ETH_ADDRESS_SIZE, VIEW_TAG_SPACE};
use crate::error::{CloakError, Result};
use crate::types::address::EthAddress;
use crate::types::keys::PublicKeyBytes;

/// Announcements more than an hour in the future are rejected as clock skew.
const MAX_FUTURE_SKEW_SECS: u64 = 3600;

/// A single payment announcement published to the registry.
///
/// Contains no recipient-identifying information: just the stealth address,
/// the sender's ephemeral public key, and a one-byte view tag. The `id` is
/// assigned by the registry on publication and is strictly increasing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    /// Registry-assigned sequence number. Zero until published.
    pub id: u64,
    /// The address the payment was sent to.
    pub stealth_address: EthAddress,
    /// The sender's one-time public key, needed to re-derive the shared secret.
    pub ephemeral_pk: PublicKeyBytes,
    /// One-byte scan hint. Scanners skip announcements whose tag mismatches.
    pub view_tag: u8,
    /// Optional application payload (e.g. a token amount note). Opaque here.
    pub metadata: Option<String>,
    /// Unix timestamp (seconds) when the announcement was created.
    pub timestamp: u64,
}

impl Announcement {
    /// Creates a new unpublished announcement stamped with the current time.
    pub fn new(stealth_address: EthAddress, ephemeral_pk: PublicKeyBytes, view_tag: u8) -> Self {
        Self {
            id: 0,
            stealth_address,
            ephemeral_pk,
            view_tag,
            metadata: None,
            timestamp: now_secs(),
        }
    }

    /// Attaches opaque metadata to the announcement.
    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }

    /// Validates structural fields before acceptance into a registry.
    pub fn validate(&self) -> Result<()> {
        if self.stealth_address.is_zero() {
            return Err(CloakError::InvalidAnnouncement(
                "stealth address is the zero address".to_string(),
            ));
        }

        let now = now_secs();
        if self.timestamp > now + MAX_FUTURE_SKEW_SECS {
            return Err(CloakError::InvalidAnnouncement(format!(
                "timestamp {} is too far in the future (now {})",
                self.timestamp, now
            )));
        }

        Ok(())
    }

    /// Serializes to a compact binary form.
    ///
    /// Layout: address (20) ‖ ephemeral key (33) ‖ view tag (1) ‖
    /// id (8 LE) ‖ timestamp (8 LE) ‖ metadata length (4 LE) ‖ metadata.
    pub fn to_bytes(&self) -> Vec<u8> {
        let meta = self.metadata.as_deref().unwrap_or("");
        let mut out = Vec::with_capacity(74 + meta.len());
        out.extend_from_slice(self.stealth_address.as_bytes());
        out.extend_from_slice(self.ephemeral_pk.as_bytes());
        out.push(self.view_tag);
        out.extend_from_slice(&self.id.to_le_bytes());
        out.extend_from_slice(&self.timestamp.to_le_bytes());
        out.extend_from_slice(&(meta.len() as u32).to_le_bytes());
        out.extend_from_slice(meta.as_bytes());
        out
    }

    /// Parses the binary form produced by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        const FIXED: usize = ETH_ADDRESS_SIZE + COMPRESSED_POINT_SIZE + 1 + 8 + 8 + 4;
        if bytes.len() < FIXED {
            return Err(CloakError::InvalidAnnouncement(format!(
                "truncated: {} bytes, need at least {}",
                bytes.len(),
                FIXED
            )));
        }

        let mut off = 0;
        let stealth_address = EthAddress::from_bytes(&bytes[off..off + ETH_ADDRESS_SIZE])?;
        off += ETH_ADDRESS_SIZE;
        let ephemeral_pk = PublicKeyBytes::from_bytes(&bytes[off..off + COMPRESSED_POINT_SIZE])?;
        off += COMPRESSED_POINT_SIZE;
        let view_tag = bytes[off];
        off += 1;

        let mut u64_buf = [0u8; 8];
        u64_buf.copy_from_slice(&bytes[off..off + 8]);
        let id = u64::from_le_bytes(u64_buf);
        off += 8;
        u64_buf.copy_from_slice(&bytes[off..off + 8]);
        let timestamp = u64::from_le_bytes(u64_buf);
        off += 8;

        let mut u32_buf = [0u8; 4];
        u32_buf.copy_from_slice(&bytes[off..off + 4]);
        let meta_len = u32::from_le_bytes(u32_buf) as usize;
        off += 4;

        if bytes.len() != off + meta_len {
            return Err(CloakError::InvalidAnnouncement(format!(
                "metadata length mismatch: declared {}, have {}",
                meta_len,
                bytes.len() - off
            )));
        }

        let metadata = if meta_len == 0 {
            None
        } else {
            Some(
                String::from_utf8(bytes[off..].to_vec())
                    .map_err(|e| CloakError::InvalidAnnouncement(format!("bad metadata: {}", e)))?,
            )
        };

        Ok(Self {
            id,
            stealth_address,
            ephemeral_pk,
            view_tag,
            metadata,
            timestamp,
        })
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Aggregate statistics over a set of announcements.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AnnouncementStats {
    /// Total number of announcements.
    pub total: u64,
    /// Highest assigned id, if any announcements exist.
    pub latest_id: Option<u64>,
    /// Count of announcements per view tag value.
    pub view_tag_distribution: HashMap<u8, u64>,
}

impl AnnouncementStats {
    /// Builds stats from a slice of announcements.
    pub fn from_announcements(announcements: &[Announcement]) -> Self {
        let mut stats = Self {
            total: announcements.len() as u64,
            ..Default::default()
        };
        for ann in announcements {
            stats.latest_id = Some(stats.latest_id.map_or(ann.id, |m| m.max(ann.id)));
            *stats.view_tag_distribution.entry(ann.view_tag).or_insert(0) += 1;
        }
        stats
    }

    /// Fraction of the view-tag space actually observed, in [0, 1].
    pub fn tag_space_coverage(&self) -> f64 {
        self.view_tag_distribution.len() as f64 / VIEW_TAG_SPACE as f64
    }
}
