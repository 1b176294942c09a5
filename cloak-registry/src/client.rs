//! Registry client: the write-side operations a user performs against the
//! announcement channel.
//!
//! Pure plumbing over the [`AnnouncementChannel`] trait — no cryptography
//! beyond asking the signer for an authorization signature. Transient
//! channel failures propagate to the caller unchanged; retry policy for
//! the external channel belongs to the application, not here.

use std::sync::Arc;

use tracing::{info, instrument};

use cloak_core::error::Result;
use cloak_core::traits::{AnnouncementChannel, Signer};
use cloak_core::types::{Announcement, MetaAddress, StealthAddressBundle};

/// Client for publishing registrations and announcements.
#[derive(Clone)]
pub struct RegistryClient {
    channel: Arc<dyn AnnouncementChannel>,
}

impl RegistryClient {
    /// Creates a client over any channel implementation.
    pub fn new(channel: Arc<dyn AnnouncementChannel>) -> Self {
        Self { channel }
    }

    /// Registers a meta-address under the signer's identity.
    ///
    /// The signer authorizes the binding by signing the meta-address
    /// bytes. Idempotent: repeating the call with the same meta-address
    /// changes nothing; a different meta-address replaces the previous
    /// registration, and the channel holds the latest.
    #[instrument(skip(self, signer, meta), fields(identity = %signer.identity()))]
    pub async fn register_stealth_keys(
        &self,
        signer: &dyn Signer,
        meta: &MetaAddress,
    ) -> Result<()> {
        let signature = signer.sign(&meta.to_bytes()).await?;
        self.channel
            .register_meta_address(signer.identity(), *meta, &signature)
            .await?;
        info!("registered stealth keys");
        Ok(())
    }

    /// Looks up the registered meta-address for an identity.
    pub async fn lookup_meta_address(
        &self,
        identity: cloak_core::types::EthAddress,
    ) -> Result<Option<MetaAddress>> {
        self.channel.registered_meta_address(identity).await
    }

    /// Publishes one announcement for a freshly generated stealth address.
    ///
    /// Side-effecting write only; the bundle already contains everything
    /// the recipient needs. Returns the channel-assigned id. Not retried
    /// internally — a failed publish leaves no partial state and the
    /// caller may simply call again.
    #[instrument(skip(self, bundle), fields(view_tag = bundle.view_tag))]
    pub async fn announce(&self, bundle: &StealthAddressBundle) -> Result<u64> {
        self.announce_with_metadata(bundle, None).await
    }

    /// Publishes an announcement carrying an opaque metadata payload.
    pub async fn announce_with_metadata(
        &self,
        bundle: &StealthAddressBundle,
        metadata: Option<String>,
    ) -> Result<u64> {
        let mut announcement = Announcement::new(
            bundle.stealth_address,
            bundle.ephemeral_pk,
            bundle.view_tag,
        );
        announcement.metadata = metadata;

        let id = self.channel.publish(announcement).await?;
        info!(id, "announced stealth payment");
        Ok(id)
    }
}

impl std::fmt::Debug for RegistryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryClient").finish_non_exhaustive()
    }
}
