//! In-memory announcement channel.
//!
//! Fast, thread-safe backend suitable for development, testing, and
//! single-process deployments. Stands in for the production append-only
//! log (e.g. an on-chain announcer contract) behind the same trait.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, instrument};

use cloak_core::error::Result;
use cloak_core::traits::{AnnouncementChannel, Subscription};
use cloak_core::types::{Announcement, AnnouncementStats, EthAddress, MetaAddress};

/// The append-only log plus the live subscriber fan-out.
///
/// Kept behind one lock so that assigning an id, appending, and fanning
/// out happen atomically relative to `subscribe`: a subscriber sees every
/// announcement published after its subscription, with no gap between
/// "catch up from the log" and "receive live".
#[derive(Debug, Default)]
struct Log {
    announcements: Vec<Announcement>,
    subscribers: Vec<mpsc::UnboundedSender<Announcement>>,
}

/// In-memory announcement channel.
///
/// # Ordering
///
/// Ids are assigned 1, 2, 3, ... in publication order. Subscribers
/// receive announcements in id order with no gaps; `announcements_since`
/// returns contiguous id ranges.
///
/// # Thread Safety
///
/// All operations are thread-safe and can be called concurrently.
#[derive(Debug)]
pub struct MemoryChannel {
    log: RwLock<Log>,
    /// Registered meta-address per identity; last registration wins.
    registrations: DashMap<EthAddress, MetaAddress>,
    next_id: AtomicU64,
}

impl MemoryChannel {
    /// Creates a new empty channel.
    pub fn new() -> Self {
        Self {
            log: RwLock::new(Log::default()),
            registrations: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Creates a channel with preallocated announcement capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            log: RwLock::new(Log {
                announcements: Vec::with_capacity(capacity),
                subscribers: Vec::new(),
            }),
            registrations: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Returns the number of stored announcements.
    pub fn len(&self) -> usize {
        self.log.read().announcements.len()
    }

    /// Returns true if no announcements have been published.
    pub fn is_empty(&self) -> bool {
        self.log.read().announcements.is_empty()
    }

    /// Returns the number of registered identities.
    pub fn registration_count(&self) -> usize {
        self.registrations.len()
    }

    /// Computes aggregate statistics over all announcements.
    pub fn stats(&self) -> AnnouncementStats {
        AnnouncementStats::from_announcements(&self.log.read().announcements)
    }

    /// Returns all announcements in publication order (for export/backup).
    pub fn all_announcements(&self) -> Vec<Announcement> {
        self.log.read().announcements.clone()
    }
}

impl Default for MemoryChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnnouncementChannel for MemoryChannel {
    #[instrument(skip(self, announcement), fields(view_tag = announcement.view_tag))]
    async fn publish(&self, mut announcement: Announcement) -> Result<u64> {
        announcement.validate()?;

        let mut log = self.log.write();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        announcement.id = id;

        // Drop subscribers whose receiver is gone
        log.subscribers
            .retain(|tx| tx.send(announcement.clone()).is_ok());
        log.announcements.push(announcement);

        debug!(id, subscribers = log.subscribers.len(), "published announcement");
        Ok(id)
    }

    async fn subscribe(&self) -> Result<Subscription> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.log.write().subscribers.push(tx);
        debug!("opened subscription");
        Ok(Subscription::new(rx))
    }

    async fn announcements_since(&self, id: u64) -> Result<Vec<Announcement>> {
        let log = self.log.read();
        // Ids are dense and 1-based, so the log index of id N is N-1
        let start = id as usize;
        Ok(log.announcements.get(start..).unwrap_or(&[]).to_vec())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.log.read().announcements.len() as u64)
    }

    #[instrument(skip(self, meta, _signature), fields(identity = %identity))]
    async fn register_meta_address(
        &self,
        identity: EthAddress,
        meta: MetaAddress,
        _signature: &[u8],
    ) -> Result<()> {
        // Idempotent: same identity + same meta is a no-op, a different
        // meta overwrites. The map is the source of truth for "latest".
        let replaced = self
            .registrations
            .insert(identity, meta)
            .map(|prev| prev != meta)
            .unwrap_or(false);
        debug!(replaced, "registered meta-address");
        Ok(())
    }

    async fn registered_meta_address(&self, identity: EthAddress) -> Result<Option<MetaAddress>> {
        Ok(self.registrations.get(&identity).map(|entry| *entry))
    }
}
