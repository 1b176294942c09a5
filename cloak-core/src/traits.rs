//! Common traits for cloak.
//!
//! These traits define the interfaces that different implementations can
//! satisfy, enabling modularity and testing.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::types::{Announcement, EthAddress, MetaAddress};

// ═══════════════════════════════════════════════════════════════════════════════
// ANNOUNCEMENT CHANNEL TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// A live feed of announcements handed to one subscriber.
///
/// Delivery is in id order with no gaps: every announcement published after
/// the subscription was opened arrives exactly once. Dropping the
/// subscription ends the feed.
pub struct Subscription {
    rx: mpsc::UnboundedReceiver<Announcement>,
}

impl Subscription {
    /// Wraps a receiver end produced by a channel implementation.
    pub fn new(rx: mpsc::UnboundedReceiver<Announcement>) -> Self {
        Self { rx }
    }

    /// Waits for the next announcement.
    ///
    /// Returns `None` once the publishing side has shut down and all
    /// buffered announcements have been consumed.
    pub async fn recv(&mut self) -> Option<Announcement> {
        self.rx.recv().await
    }

    /// Returns the next announcement if one is already buffered.
    pub fn try_recv(&mut self) -> Option<Announcement> {
        self.rx.try_recv().ok()
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

/// Interface to the public announcement registry.
///
/// Implementations might use:
/// - In-memory storage (for testing/development)
/// - An on-chain announcer contract (production)
///
/// The registry assigns each published announcement a strictly increasing
/// `id`, which doubles as the cursor for catch-up queries.
#[async_trait]
pub trait AnnouncementChannel: Send + Sync {
    /// Publishes an announcement and returns its assigned id.
    ///
    /// The `id` and `timestamp` fields of the input are overwritten by the
    /// registry; callers need not set them.
    async fn publish(&self, announcement: Announcement) -> Result<u64>;

    /// Opens a live subscription to announcements published from now on.
    async fn subscribe(&self) -> Result<Subscription>;

    /// Returns all announcements with id strictly greater than `id`,
    /// in ascending id order.
    async fn announcements_since(&self, id: u64) -> Result<Vec<Announcement>>;

    /// Returns the total number of published announcements.
    async fn count(&self) -> Result<u64>;

    /// Records a meta-address for an identity, authorized by a signature
    /// over the meta-address bytes.
    ///
    /// Re-registering the same meta-address for the same identity is a
    /// no-op; registering a different one overwrites the previous entry.
    async fn register_meta_address(
        &self,
        identity: EthAddress,
        meta: MetaAddress,
        signature: &[u8],
    ) -> Result<()>;

    /// Looks up the registered meta-address for an identity.
    async fn registered_meta_address(&self, identity: EthAddress) -> Result<Option<MetaAddress>>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// SIGNER TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface to an external signing identity (e.g. a browser wallet).
///
/// Signatures serve two roles: authorizing meta-address registration, and
/// acting as the deterministic entropy source for the root secret.
#[async_trait]
pub trait Signer: Send + Sync {
    /// The address this signer controls.
    fn identity(&self) -> EthAddress;

    /// Signs an arbitrary message.
    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{COMPRESSED_POINT_SIZE, ETH_ADDRESS_SIZE};
    use crate::types::PublicKeyBytes;

    fn test_announcement(id: u64) -> Announcement {
        let mut pk = [0x11; COMPRESSED_POINT_SIZE];
        pk[0] = 0x02;
        let mut ann = Announcement::new(
            EthAddress::from_array([0x22; ETH_ADDRESS_SIZE]),
            PublicKeyBytes::from_bytes(&pk).unwrap(),
            0x33,
        );
        ann.id = id;
        ann
    }

    #[tokio::test]
    async fn test_subscription_delivers_in_order() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut sub = Subscription::new(rx);

        for id in 1..=3 {
            tx.send(test_announcement(id)).unwrap();
        }
        drop(tx);

        assert_eq!(sub.recv().await.unwrap().id, 1);
        assert_eq!(sub.recv().await.unwrap().id, 2);
        assert_eq!(sub.recv().await.unwrap().id, 3);
        assert!(sub.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_subscription_try_recv_empty() {
        let (_tx, rx) = mpsc::unbounded_channel::<Announcement>();
        let mut sub = Subscription::new(rx);
        assert!(sub.try_recv().is_none());
    }
}
