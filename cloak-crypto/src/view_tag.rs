//! View tag computation for efficient scanning.
//!
//! A view tag is one byte of a domain-separated hash of the ECDH shared
//! secret's x-coordinate. Each announcement carries one; a scanner
//! recomputes its expected tag per announcement and skips the full
//! stealth-address recomputation unless the tags match, discarding
//! ~255/256 of announcements not addressed to it.
//!
//! The tag leaks 8 bits of a 256-bit secret, which identifies nobody:
//! every recipient matches any given tag with probability 1/256.

use subtle::ConstantTimeEq;

use cloak_core::constants::DOMAIN_VIEW_TAG;

use crate::hash::keccak256_framed;

/// Computes the view tag from a shared secret x-coordinate.
///
/// First byte of `Keccak256(DOMAIN_VIEW_TAG || shared_x)`.
pub fn compute_view_tag(shared_x: &[u8]) -> u8 {
    keccak256_framed(DOMAIN_VIEW_TAG, &[shared_x])[0]
}

/// Checks a view tag against the expected value for a shared secret.
///
/// Constant-time comparison; the scanner calls this once per announcement.
pub fn verify_view_tag(shared_x: &[u8], expected_tag: u8) -> bool {
    compute_view_tag(shared_x).ct_eq(&expected_tag).into()
}
