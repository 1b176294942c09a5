//! One-time stealth address generation (sender side).
//!
//! Given a recipient's meta-address, produce a fresh address only that
//! recipient can recognize and control, plus the public data (ephemeral
//! key, view tag) they need to find it:
//!
//! ```text
//! r        = fresh random scalar            (ephemeral, discarded)
//! S        = r · P_view                     (ECDH shared point)
//! h        = hashToScalar(S.x)
//! P_stealth = P_spend + h·G
//! address  = keccak256(P_stealth)[12..]
//! tag      = hash(S.x)[0]
//! ```
//!
//! The ephemeral private key never leaves this module. Reusing it across
//! two payments would link them, so it is generated fresh per call and
//! zeroized before returning.

use k256::elliptic_curve::rand_core::CryptoRngCore;
use k256::{NonZeroScalar, ProjectivePoint, PublicKey};
use rand::rngs::OsRng;
use zeroize::Zeroize;

use cloak_core::constants::DOMAIN_STEALTH_SCALAR;
use cloak_core::error::{CloakError, Result};
use cloak_core::types::{MetaAddress, StealthAddressBundle};
use cloak_crypto::{
    compute_view_tag, decode_public_key, derive_eth_address, ecdh_x_coordinate, encode_public_key,
    hash_to_scalar, point_add, scalar_multiply,
};

/// Generates a one-time stealth address for a recipient.
///
/// Two calls for the same recipient never produce the same address
/// (the ephemeral scalar is fresh entropy each time), and nothing in
/// the returned bundle links back to the recipient's meta-address for
/// an observer without the viewing private key.
///
/// # Errors
/// - `InvalidMetaAddress` if either component key fails curve validation
/// - `DegenerateStealthKey` if the derived point is the identity
///   (cryptographically negligible; retrying gets a fresh ephemeral key)
pub fn generate_stealth_address(meta: &MetaAddress) -> Result<StealthAddressBundle> {
    generate_stealth_address_with_rng(meta, &mut OsRng)
}

/// Same as [`generate_stealth_address`], with a caller-supplied RNG.
pub fn generate_stealth_address_with_rng(
    meta: &MetaAddress,
    rng: &mut impl CryptoRngCore,
) -> Result<StealthAddressBundle> {
    let (spending_pk, viewing_pk) = decode_meta_address(meta)?;

    let mut ephemeral_sk = NonZeroScalar::random(rng);
    let ephemeral_pk = PublicKey::from_secret_scalar(&ephemeral_sk);

    let mut shared_x = ecdh_x_coordinate(&ephemeral_sk, &viewing_pk)?;
    ephemeral_sk.zeroize();

    let result = bundle_from_shared_secret(&spending_pk, &shared_x, &ephemeral_pk);
    shared_x.zeroize();
    result
}

/// Decodes and curve-validates both halves of a meta-address.
///
/// Off-curve points are rejected here, before any scalar touches them,
/// closing off invalid-curve attacks from attacker-supplied meta-addresses.
pub fn decode_meta_address(meta: &MetaAddress) -> Result<(PublicKey, PublicKey)> {
    let spending_pk = decode_public_key(&meta.spending_pk)
        .map_err(|e| CloakError::InvalidMetaAddress(format!("spending key: {}", e)))?;
    let viewing_pk = decode_public_key(&meta.viewing_pk)
        .map_err(|e| CloakError::InvalidMetaAddress(format!("viewing key: {}", e)))?;
    Ok((spending_pk, viewing_pk))
}

/// Derives the stealth point and address from an established shared secret.
///
/// Shared between sender and scanner: the sender reaches the shared secret
/// via the ephemeral private key, the scanner via the viewing private key,
/// and both must compute the identical address from it.
pub(crate) fn bundle_from_shared_secret(
    spending_pk: &PublicKey,
    shared_x: &[u8; 32],
    ephemeral_pk: &PublicKey,
) -> Result<StealthAddressBundle> {
    let tweak = hash_to_scalar(DOMAIN_STEALTH_SCALAR, &[shared_x]);
    let tweak_point = scalar_multiply(&tweak, &ProjectivePoint::GENERATOR)?;

    let stealth_point = point_add(&spending_pk.to_projective(), &tweak_point).map_err(|e| {
        match e {
            CloakError::PointAtInfinity => CloakError::DegenerateStealthKey(
                "stealth tweak cancelled the spending key".to_string(),
            ),
            other => other,
        }
    })?;

    let stealth_pk = PublicKey::from_affine(stealth_point.to_affine()).map_err(|_| {
        CloakError::DegenerateStealthKey("stealth point is the identity".to_string())
    })?;

    Ok(StealthAddressBundle {
        stealth_address: derive_eth_address(&stealth_pk),
        ephemeral_pk: encode_public_key(ephemeral_pk),
        view_tag: compute_view_tag(shared_x),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloak_core::constants::COMPRESSED_POINT_SIZE;
    use cloak_core::types::{PublicKeyBytes, RootSecret};
    use cloak_crypto::derive_stealth_keys;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::collections::HashSet;

    fn test_meta(seed: u8) -> MetaAddress {
        derive_stealth_keys(&RootSecret::new([seed; 32])).meta_address()
    }

    #[test]
    fn test_generation_succeeds_for_valid_meta() {
        let bundle = generate_stealth_address(&test_meta(0x01)).unwrap();
        assert!(!bundle.stealth_address.is_zero());
    }

    #[test]
    fn test_generation_rejects_off_curve_meta() {
        let mut bad = [0xff; COMPRESSED_POINT_SIZE];
        bad[0] = 0x02;
        let meta = MetaAddress::new(
            PublicKeyBytes::from_bytes(&bad).unwrap(),
            test_meta(0x01).viewing_pk,
        );
        let result = generate_stealth_address(&meta);
        assert!(matches!(result, Err(CloakError::InvalidMetaAddress(_))));
    }

    #[test]
    fn test_repeated_generation_unique() {
        let meta = test_meta(0x02);
        let mut rng = ChaCha20Rng::seed_from_u64(99);

        let mut addresses = HashSet::new();
        let mut ephemerals = HashSet::new();
        for _ in 0..1000 {
            let bundle = generate_stealth_address_with_rng(&meta, &mut rng).unwrap();
            addresses.insert(bundle.stealth_address);
            ephemerals.insert(*bundle.ephemeral_pk.as_array());
        }
        assert_eq!(addresses.len(), 1000);
        assert_eq!(ephemerals.len(), 1000);
    }

    #[test]
    fn test_stealth_address_differs_from_recipient_address() {
        let keys = derive_stealth_keys(&RootSecret::new([0x03; 32]));
        let bundle = generate_stealth_address(&keys.meta_address()).unwrap();
        assert_ne!(
            bundle.stealth_address,
            derive_eth_address(&keys.spending.public_key)
        );
    }

    #[test]
    fn test_deterministic_given_fixed_rng() {
        let meta = test_meta(0x04);
        let a = generate_stealth_address_with_rng(&meta, &mut ChaCha20Rng::seed_from_u64(7))
            .unwrap();
        let b = generate_stealth_address_with_rng(&meta, &mut ChaCha20Rng::seed_from_u64(7))
            .unwrap();
        assert_eq!(a, b);
    }
}
