//! secp256k1 scalar/point operations and address derivation.
//!
//! Thin, checked wrappers over `k256`. The checks matter: a zero scalar or
//! a point-at-infinity result in the stealth math would produce an address
//! nobody controls (or an attacker chose), so both are hard failures here
//! rather than values that flow onward.

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::{Field, Group};
use k256::{NonZeroScalar, ProjectivePoint, PublicKey, Scalar};

use cloak_core::constants::{ETH_ADDRESS_SIZE, KECCAK256_SIZE, SCALAR_SIZE};
use cloak_core::error::{CloakError, Result};
use cloak_core::types::{EthAddress, PublicKeyBytes};

use crate::hash::keccak256;

// ═══════════════════════════════════════════════════════════════════════════════
// POINT ENCODING
// ═══════════════════════════════════════════════════════════════════════════════

/// Decodes compressed bytes into a validated curve point.
///
/// Rejects encodings that are not on the curve or are the identity. This
/// is the curve-membership gate for all externally supplied keys
/// (meta-addresses, ephemeral keys from announcements).
pub fn decode_public_key(bytes: &PublicKeyBytes) -> Result<PublicKey> {
    PublicKey::from_sec1_bytes(bytes.as_bytes())
        .map_err(|_| CloakError::InvalidPublicKey("point is not on the curve".to_string()))
}

/// Encodes a curve point as SEC1-compressed bytes.
pub fn encode_public_key(pk: &PublicKey) -> PublicKeyBytes {
    let encoded = pk.to_encoded_point(true);
    let mut bytes = [0u8; 33];
    bytes.copy_from_slice(encoded.as_bytes());
    PublicKeyBytes::from_array(bytes)
}

// ═══════════════════════════════════════════════════════════════════════════════
// ARITHMETIC
// ═══════════════════════════════════════════════════════════════════════════════

/// Multiplies a point by a scalar.
///
/// # Errors
/// Returns `InvalidScalar` if the scalar is zero mod the curve order.
pub fn scalar_multiply(scalar: &Scalar, point: &ProjectivePoint) -> Result<ProjectivePoint> {
    if bool::from(scalar.is_zero()) {
        return Err(CloakError::InvalidScalar(
            "scalar is zero mod curve order".to_string(),
        ));
    }
    Ok(point * scalar)
}

/// Adds two points, rejecting a point-at-infinity result.
///
/// In stealth address derivation, `P_spend + h·G` landing on the identity
/// means the tweak cancelled the spending key. An attacker who can steer
/// the ephemeral key toward that case would produce an address with a
/// known discrete log, so the sum is a hard failure, never skipped.
pub fn point_add(p1: &ProjectivePoint, p2: &ProjectivePoint) -> Result<ProjectivePoint> {
    let sum = p1 + p2;
    if bool::from(sum.is_identity()) {
        return Err(CloakError::PointAtInfinity);
    }
    Ok(sum)
}

/// Computes the x-coordinate of an ECDH shared point.
///
/// `sk · pk` for a nonzero scalar and a validated public key is never the
/// identity on a prime-order curve, but the check stays as a guard against
/// a caller bypassing point validation.
pub fn ecdh_x_coordinate(sk: &NonZeroScalar, pk: &PublicKey) -> Result<[u8; SCALAR_SIZE]> {
    let shared = pk.to_projective() * **sk;
    if bool::from(shared.is_identity()) {
        return Err(CloakError::PointAtInfinity);
    }

    let encoded = shared.to_affine().to_encoded_point(false);
    let mut x = [0u8; SCALAR_SIZE];
    // x() is Some for any non-identity point
    match encoded.x() {
        Some(coord) => x.copy_from_slice(coord),
        None => return Err(CloakError::PointAtInfinity),
    }
    Ok(x)
}

// ═══════════════════════════════════════════════════════════════════════════════
// ADDRESS DERIVATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Derives the Ethereum-style address of a public key.
///
/// `keccak256(uncompressed_pubkey_without_prefix)[12..]` — the standard
/// Ethereum rule. Pure; used identically by the sender (to produce the
/// stealth address) and the scanner (to confirm ownership).
pub fn derive_eth_address(pk: &PublicKey) -> EthAddress {
    let encoded = pk.to_encoded_point(false);
    // Skip the 0x04 SEC1 prefix byte
    let hash = keccak256(&encoded.as_bytes()[1..]);
    let mut addr = [0u8; ETH_ADDRESS_SIZE];
    addr.copy_from_slice(&hash[KECCAK256_SIZE - ETH_ADDRESS_SIZE..]);
    EthAddress::from_array(addr)
}
