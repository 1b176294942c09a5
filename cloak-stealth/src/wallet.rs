//! Recipient-side wallet: derived keys plus the operations using them.
//!
//! Thin convenience layer. All cryptography lives in `cloak-crypto` and
//! the sibling modules; the wallet just keeps the derived key pairs
//! together and passes the right halves to each operation, so callers
//! cannot accidentally hand the spending private key to the scanner.

use k256::{NonZeroScalar, PublicKey};
use rand::rngs::OsRng;
use rand::RngCore;

use cloak_core::error::Result;
use cloak_core::types::{Announcement, MetaAddress, RootSecret};
use cloak_crypto::{decode_public_key, derive_stealth_keys, root_secret_from_signature, StealthKeys};

use crate::discovery::{check_announcement, recover_stealth_private_key, ScanOutcome};

/// A user's derived stealth keys and the operations they enable.
pub struct CloakWallet {
    keys: StealthKeys,
}

impl CloakWallet {
    /// Derives a wallet from an existing root secret.
    pub fn from_root_secret(root: &RootSecret) -> Self {
        Self {
            keys: derive_stealth_keys(root),
        }
    }

    /// Derives a wallet from a wallet-produced signature.
    ///
    /// Deterministic: the same signature always yields the same wallet,
    /// so a user can recreate their keys each session by re-signing the
    /// same fixed message.
    pub fn from_signature(signature: &[u8]) -> Self {
        Self::from_root_secret(&root_secret_from_signature(signature))
    }

    /// Creates a wallet from fresh OS entropy.
    pub fn generate() -> Self {
        let mut root = [0u8; 32];
        OsRng.fill_bytes(&mut root);
        Self::from_root_secret(&RootSecret::new(root))
    }

    /// The shareable meta-address for this wallet.
    pub fn meta_address(&self) -> MetaAddress {
        self.keys.meta_address()
    }

    /// The viewing private key, for handing to a scanner.
    pub fn viewing_private_key(&self) -> &NonZeroScalar {
        &self.keys.viewing.private_key
    }

    /// The spending public key, for handing to a scanner.
    pub fn spending_public_key(&self) -> &PublicKey {
        &self.keys.spending.public_key
    }

    /// Checks whether an announcement is addressed to this wallet.
    pub fn check_announcement(&self, announcement: &Announcement) -> Result<ScanOutcome> {
        check_announcement(
            &self.keys.viewing.private_key,
            &self.keys.spending.public_key,
            announcement,
        )
    }

    /// Recovers the private key for a stealth address confirmed as owned.
    pub fn recover_stealth_private_key(
        &self,
        announcement: &Announcement,
    ) -> Result<NonZeroScalar> {
        let ephemeral_pk = decode_public_key(&announcement.ephemeral_pk)?;
        recover_stealth_private_key(
            &self.keys.viewing.private_key,
            &self.keys.spending.private_key,
            &ephemeral_pk,
        )
    }
}

impl std::fmt::Debug for CloakWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloakWallet")
            .field("meta_address", &self.meta_address().to_string())
            .finish()
    }
}
