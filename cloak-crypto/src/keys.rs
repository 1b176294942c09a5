//! Deterministic key derivation from a root secret.
//!
//! A user's spending and viewing key pairs both derive from one 32-byte
//! root secret via domain-labelled hash-to-scalar:
//!
//! ```text
//! k_spend = hashToScalar("spend" || root)
//! k_view  = hashToScalar("view"  || root)
//! ```
//!
//! Derivation is deterministic, so a user can recompute their keys in any
//! session from the root secret alone, with nothing persisted.

use k256::{NonZeroScalar, PublicKey};
use zeroize::Zeroize;

use cloak_core::constants::{DOMAIN_ROOT_SECRET, LABEL_SPEND, LABEL_VIEW};
use cloak_core::types::{MetaAddress, PublicKeyBytes, RootSecret};

use crate::curve::encode_public_key;
use crate::hash::{hash_to_scalar, keccak256_framed};

/// A derived spending or viewing key pair.
///
/// The secret scalar is zeroized when the pair is dropped
/// (`NonZeroScalar`'s `Zeroize` impl resets it to one).
#[derive(Clone)]
pub struct KeyPair {
    /// The private scalar. Never leaves the recipient's machine.
    pub private_key: NonZeroScalar,
    /// The corresponding public point, `private_key · G`.
    pub public_key: PublicKey,
}

impl Drop for KeyPair {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("private_key", &"[REDACTED]")
            .field("public_key", &encode_public_key(&self.public_key))
            .finish()
    }
}

/// Both key pairs a user derives from their root secret.
#[derive(Clone, Debug)]
pub struct StealthKeys {
    /// Controls recovery of funds sent to the user's stealth addresses.
    pub spending: KeyPair,
    /// Controls detection of incoming stealth addresses, nothing more.
    pub viewing: KeyPair,
}

impl StealthKeys {
    /// The shareable meta-address encoding both public keys.
    pub fn meta_address(&self) -> MetaAddress {
        MetaAddress::new(
            encode_public_key(&self.spending.public_key),
            encode_public_key(&self.viewing.public_key),
        )
    }
}

/// Derives the spending and viewing key pairs from a root secret.
///
/// Infallible: `hash_to_scalar` always lands in `[1, n-1]`, even for an
/// all-zero root secret, so every root secret yields valid keys.
pub fn derive_stealth_keys(root: &RootSecret) -> StealthKeys {
    StealthKeys {
        spending: derive_key_pair(LABEL_SPEND, root),
        viewing: derive_key_pair(LABEL_VIEW, root),
    }
}

fn derive_key_pair(label: &[u8], root: &RootSecret) -> KeyPair {
    let private_key = hash_to_scalar(label, &[root.as_bytes()]);
    let public_key = PublicKey::from_secret_scalar(&private_key);
    KeyPair {
        private_key,
        public_key,
    }
}

/// Derives a root secret from a wallet signature.
///
/// A signature over a fixed message is only producible by the key holder,
/// deterministic for most wallet schemes, and high-entropy — unlike
/// anything derived from a public address string, which an observer could
/// recompute. The signature bytes are hashed down to 32 bytes under a
/// dedicated domain.
pub fn root_secret_from_signature(signature: &[u8]) -> RootSecret {
    RootSecret::new(keccak256_framed(DOMAIN_ROOT_SECRET, &[signature]))
}

/// Compresses both public keys of a derived key set.
///
/// Convenience for callers that work with byte-level keys (registry,
/// serialization) rather than curve types.
pub fn public_key_bytes(keys: &StealthKeys) -> (PublicKeyBytes, PublicKeyBytes) {
    (
        encode_public_key(&keys.spending.public_key),
        encode_public_key(&keys.viewing.public_key),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloak_core::constants::ROOT_SECRET_SIZE;
    use proptest::prelude::*;

    #[test]
    fn test_derivation_deterministic() {
        let root = RootSecret::new([0xaa; ROOT_SECRET_SIZE]);
        let keys1 = derive_stealth_keys(&root);
        let keys2 = derive_stealth_keys(&root);

        assert_eq!(
            keys1.spending.private_key.to_bytes(),
            keys2.spending.private_key.to_bytes()
        );
        assert_eq!(keys1.viewing.public_key, keys2.viewing.public_key);
        assert_eq!(keys1.meta_address(), keys2.meta_address());
    }

    #[test]
    fn test_spending_and_viewing_keys_differ() {
        let root = RootSecret::new([0x01; ROOT_SECRET_SIZE]);
        let keys = derive_stealth_keys(&root);
        assert_ne!(
            keys.spending.private_key.to_bytes(),
            keys.viewing.private_key.to_bytes()
        );
        assert_ne!(keys.spending.public_key, keys.viewing.public_key);
    }

    #[test]
    fn test_all_zero_root_secret_yields_valid_keys() {
        let root = RootSecret::new([0u8; ROOT_SECRET_SIZE]);
        let keys = derive_stealth_keys(&root);
        // NonZeroScalar construction already proves validity; check the
        // meta-address encodes cleanly too.
        let meta = keys.meta_address();
        let reparsed: MetaAddress = meta.to_string().parse().unwrap();
        assert_eq!(meta, reparsed);
    }

    #[test]
    fn test_public_keys_match_private_scalars() {
        let root = RootSecret::new([0x42; ROOT_SECRET_SIZE]);
        let keys = derive_stealth_keys(&root);
        assert_eq!(
            keys.spending.public_key,
            PublicKey::from_secret_scalar(&keys.spending.private_key)
        );
    }

    #[test]
    fn test_root_secret_from_signature_deterministic() {
        let sig = [0x5a; 65];
        let a = root_secret_from_signature(&sig);
        let b = root_secret_from_signature(&sig);
        assert_eq!(a.as_bytes(), b.as_bytes());

        let c = root_secret_from_signature(&[0x5b; 65]);
        assert_ne!(a.as_bytes(), c.as_bytes());
    }

    #[test]
    fn test_key_pair_debug_redacts_private_key() {
        let root = RootSecret::new([0x07; ROOT_SECRET_SIZE]);
        let keys = derive_stealth_keys(&root);
        let debug = format!("{:?}", keys.spending);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(&hex::encode(keys.spending.private_key.to_bytes())));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_distinct_roots_yield_distinct_keys(
            a in any::<[u8; ROOT_SECRET_SIZE]>(),
            b in any::<[u8; ROOT_SECRET_SIZE]>(),
        ) {
            prop_assume!(a != b);
            let keys_a = derive_stealth_keys(&RootSecret::new(a));
            let keys_b = derive_stealth_keys(&RootSecret::new(b));
            prop_assert_ne!(keys_a.spending.public_key, keys_b.spending.public_key);
            prop_assert_ne!(keys_a.viewing.public_key, keys_b.viewing.public_key);
        }
    }
}
