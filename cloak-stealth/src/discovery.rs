//! Announcement checking and key recovery (recipient side).
//!
//! A recipient holds the viewing private key and the spending public key.
//! For each announcement they recompute the shared secret from the
//! announced ephemeral key and apply two checks:
//!
//! 1. Cheap filter: one hash, compared against the announcement's view
//!    tag. Mismatches (~255/256 of foreign traffic) stop here.
//! 2. Full check: recompute the stealth address and compare. A tag match
//!    with an address mismatch is an expected false positive, dropped
//!    silently.
//!
//! Spending requires the spending *private* key, which never participates
//! in scanning; [`recover_stealth_private_key`] combines it with the
//! per-announcement tweak only when the recipient wants control of a
//! discovered address.

use k256::{NonZeroScalar, PublicKey};

use cloak_core::constants::DOMAIN_STEALTH_SCALAR;
use cloak_core::error::{CloakError, Result};
use cloak_core::types::{Announcement, EthAddress};
use cloak_crypto::{
    decode_public_key, ecdh_x_coordinate, hash_to_scalar, verify_view_tag,
};

use crate::generation::bundle_from_shared_secret;

/// Outcome of checking one announcement against one recipient.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanOutcome {
    /// View tag mismatch; not for this recipient.
    ViewTagMismatch,
    /// View tag matched but the recomputed address did not. Expected for
    /// ~1/256 of foreign announcements; not an error.
    FalsePositive,
    /// The announcement is addressed to this recipient.
    Owned {
        /// The confirmed stealth address, equal to the announced one.
        stealth_address: EthAddress,
    },
}

impl ScanOutcome {
    /// Returns true if the announcement belongs to the recipient.
    pub fn is_owned(&self) -> bool {
        matches!(self, ScanOutcome::Owned { .. })
    }
}

/// Checks whether an announcement is addressed to the holder of
/// `viewing_sk`.
///
/// # Errors
/// Returns `InvalidAnnouncement` if the announced ephemeral key is not a
/// valid curve point. Malformed announcements are attacker-controlled
/// input; the caller decides whether to drop or surface them.
pub fn check_announcement(
    viewing_sk: &NonZeroScalar,
    spending_pk: &PublicKey,
    announcement: &Announcement,
) -> Result<ScanOutcome> {
    let ephemeral_pk = decode_public_key(&announcement.ephemeral_pk)
        .map_err(|e| CloakError::InvalidAnnouncement(format!("ephemeral key: {}", e)))?;

    let shared_x = ecdh_x_coordinate(viewing_sk, &ephemeral_pk)?;

    // Cheap filter: one hash, no point arithmetic beyond the ECDH above
    if !verify_view_tag(&shared_x, announcement.view_tag) {
        return Ok(ScanOutcome::ViewTagMismatch);
    }

    // Full check: recompute the stealth address and compare exactly
    let bundle = bundle_from_shared_secret(spending_pk, &shared_x, &ephemeral_pk)?;
    if bundle.stealth_address == announcement.stealth_address {
        Ok(ScanOutcome::Owned {
            stealth_address: bundle.stealth_address,
        })
    } else {
        Ok(ScanOutcome::FalsePositive)
    }
}

/// Recovers the private key controlling a discovered stealth address.
///
/// `k_stealth = k_spend + hashToScalar(shared.x) mod n`, where the shared
/// secret comes from the viewing private key and the announced ephemeral
/// key. Only called for announcements already confirmed as owned.
///
/// # Errors
/// Returns `DegenerateStealthKey` if the sum is zero mod the curve order,
/// matching the sender-side point-at-infinity rejection for the same case.
pub fn recover_stealth_private_key(
    viewing_sk: &NonZeroScalar,
    spending_sk: &NonZeroScalar,
    ephemeral_pk: &PublicKey,
) -> Result<NonZeroScalar> {
    let shared_x = ecdh_x_coordinate(viewing_sk, ephemeral_pk)?;
    let tweak = hash_to_scalar(DOMAIN_STEALTH_SCALAR, &[&shared_x]);

    let stealth_sk = **spending_sk + *tweak;
    Option::<NonZeroScalar>::from(NonZeroScalar::new(stealth_sk)).ok_or_else(|| {
        CloakError::DegenerateStealthKey("recovered stealth key is zero".to_string())
    })
}

/// Counters accumulated while scanning a stream of announcements.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Total announcements checked.
    pub total_scanned: u64,
    /// Announcements whose view tag matched (owned + false positives).
    pub view_tag_matches: u64,
    /// Announcements confirmed as owned.
    pub discoveries: u64,
    /// Announcements that failed to decode.
    pub errors: u64,
}

impl ScanStats {
    /// Records one check result.
    pub fn record(&mut self, outcome: &Result<ScanOutcome>) {
        self.total_scanned += 1;
        match outcome {
            Ok(ScanOutcome::Owned { .. }) => {
                self.view_tag_matches += 1;
                self.discoveries += 1;
            }
            Ok(ScanOutcome::FalsePositive) => {
                self.view_tag_matches += 1;
            }
            Ok(ScanOutcome::ViewTagMismatch) => {}
            Err(_) => {
                self.errors += 1;
            }
        }
    }

    /// Fraction of announcements that survived the cheap filter.
    pub fn filter_pass_rate(&self) -> f64 {
        if self.total_scanned == 0 {
            0.0
        } else {
            self.view_tag_matches as f64 / self.total_scanned as f64
        }
    }
}
