//! Development signer.
//!
//! The production signer is an external wallet; this one exists so tests
//! and local tooling can exercise registration flows without a wallet.
//! Signatures are deterministic keyed hashes, not real ECDSA — sufficient
//! for a channel backend that does not verify them.

use async_trait::async_trait;

use cloak_core::error::Result;
use cloak_core::traits::Signer;
use cloak_core::types::EthAddress;
use cloak_crypto::{derive_eth_address, hash_to_scalar, keccak256_framed};
use k256::PublicKey;

const DEV_SIGNER_DOMAIN: &[u8] = b"CLOAK_DEV_SIGNER_V1";

/// Deterministic in-process signer for development and tests.
pub struct DevSigner {
    secret: [u8; 32],
    identity: EthAddress,
}

impl DevSigner {
    /// Creates a signer from a fixed secret.
    ///
    /// The identity is the address of the secp256k1 key derived from the
    /// secret, so distinct secrets get distinct identities.
    pub fn new(secret: [u8; 32]) -> Self {
        let scalar = hash_to_scalar(DEV_SIGNER_DOMAIN, &[&secret]);
        let identity = derive_eth_address(&PublicKey::from_secret_scalar(&scalar));
        Self { secret, identity }
    }
}

#[async_trait]
impl Signer for DevSigner {
    fn identity(&self) -> EthAddress {
        self.identity
    }

    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        Ok(keccak256_framed(DEV_SIGNER_DOMAIN, &[&self.secret, message]).to_vec())
    }
}

impl std::fmt::Debug for DevSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevSigner")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_signing_deterministic() {
        let signer = DevSigner::new([0x42; 32]);
        let a = signer.sign(b"message").await.unwrap();
        let b = signer.sign(b"message").await.unwrap();
        assert_eq!(a, b);
        assert_ne!(a, signer.sign(b"other").await.unwrap());
    }

    #[test]
    fn test_distinct_secrets_distinct_identities() {
        let a = DevSigner::new([0x01; 32]);
        let b = DevSigner::new([0x02; 32]);
        assert_ne!(a.identity(), b.identity());
    }
}
