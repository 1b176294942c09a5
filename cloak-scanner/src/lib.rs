//! # Cloak Scanner
//!
//! Long-lived announcement scanning for a single recipient.
//!
//! The scanner subscribes to the announcement channel and checks every
//! incoming announcement against the recipient's viewing key: one ECDH
//! plus one hash for the view-tag filter, and a full stealth-address
//! recomputation only for the ~1/256 that pass. Confirmed discoveries go
//! to the caller's callback; everything else is dropped.
//!
//! ## Lifecycle
//!
//! A watch is *Idle* from subscription until the first announcement
//! arrives, then *Scanning* until stopped. There is no terminal state
//! while the watch runs; it ends only when the caller stops it, and
//! stopping simply ceases delivery — per-announcement checks have no
//! other side effects to unwind.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use cloak_registry::{MemoryChannel, RegistryClient};
//! use cloak_scanner::Scanner;
//! use cloak_stealth::{generate_stealth_address, CloakWallet};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> cloak_core::Result<()> {
//! let channel = Arc::new(MemoryChannel::new());
//! let wallet = CloakWallet::from_signature(&[0x42; 65]);
//!
//! let scanner = Scanner::for_wallet(&wallet);
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! let watch = scanner
//!     .watch(channel.clone(), move |discovery| {
//!         let _ = tx.send(discovery);
//!     })
//!     .await?;
//!
//! let client = RegistryClient::new(channel);
//! let bundle = generate_stealth_address(&wallet.meta_address())?;
//! client.announce(&bundle).await?;
//!
//! let discovery = rx.recv().await.unwrap();
//! assert_eq!(discovery.stealth_address, bundle.stealth_address);
//! watch.stop().await;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use k256::{NonZeroScalar, PublicKey};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use cloak_core::error::Result;
use cloak_core::traits::AnnouncementChannel;
use cloak_core::types::{Announcement, EthAddress};
use cloak_stealth::discovery::{check_announcement, ScanOutcome, ScanStats};
use cloak_stealth::CloakWallet;

/// A confirmed incoming payment found while scanning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discovery {
    /// The stealth address confirmed as owned by this recipient.
    pub stealth_address: EthAddress,
    /// The announcement it came from, including the ephemeral key needed
    /// later for spending-key recovery.
    pub announcement: Announcement,
}

/// State of a running watch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchState {
    /// Subscribed, no announcement processed yet.
    Idle,
    /// Processing the ingress stream.
    Scanning,
    /// Stopped by the caller (or the channel shut down).
    Stopped,
}

const STATE_IDLE: u8 = 0;
const STATE_SCANNING: u8 = 1;
const STATE_STOPPED: u8 = 2;

fn decode_state(raw: u8) -> WatchState {
    match raw {
        STATE_IDLE => WatchState::Idle,
        STATE_SCANNING => WatchState::Scanning,
        _ => WatchState::Stopped,
    }
}

/// Scanner for one recipient's viewing key.
///
/// Holds the viewing private key and the spending *public* key; the
/// spending private key is never needed for detection and stays with the
/// wallet.
pub struct Scanner {
    viewing_sk: NonZeroScalar,
    spending_pk: PublicKey,
    stats: Arc<RwLock<ScanStats>>,
}

impl Scanner {
    /// Creates a scanner from the two keys detection requires.
    pub fn new(viewing_sk: NonZeroScalar, spending_pk: PublicKey) -> Self {
        Self {
            viewing_sk,
            spending_pk,
            stats: Arc::new(RwLock::new(ScanStats::default())),
        }
    }

    /// Creates a scanner for a wallet's keys.
    pub fn for_wallet(wallet: &CloakWallet) -> Self {
        Self::new(*wallet.viewing_private_key(), *wallet.spending_public_key())
    }

    /// Returns a snapshot of accumulated scan statistics.
    pub fn stats(&self) -> ScanStats {
        self.stats.read().clone()
    }

    /// Checks announcements already in the channel, starting after `since_id`.
    ///
    /// Catch-up path for a recipient who was offline: pairs with a live
    /// [`watch`](Self::watch) opened *before* this call so no announcement
    /// falls between the backlog and the live stream.
    #[instrument(skip(self, channel))]
    pub async fn scan_backlog(
        &self,
        channel: &dyn AnnouncementChannel,
        since_id: u64,
    ) -> Result<Vec<Discovery>> {
        let announcements = channel.announcements_since(since_id).await?;
        debug!(count = announcements.len(), "scanning backlog");

        let mut discoveries = Vec::new();
        for announcement in announcements {
            if let Some(discovery) = self.check(&announcement) {
                discoveries.push(discovery);
            }
        }

        info!(discoveries = discoveries.len(), "backlog scan complete");
        Ok(discoveries)
    }

    /// Subscribes to the channel and processes announcements until stopped.
    ///
    /// The subscription is open before this returns, so every announcement
    /// published afterwards is delivered to `on_discovery` if owned. The
    /// callback runs on the scanner task; keep it cheap and hand heavy
    /// work to another task.
    #[instrument(skip(self, channel, on_discovery))]
    pub async fn watch<F>(
        &self,
        channel: Arc<dyn AnnouncementChannel>,
        on_discovery: F,
    ) -> Result<WatchHandle>
    where
        F: Fn(Discovery) + Send + Sync + 'static,
    {
        let mut subscription = channel.subscribe().await?;
        let state = Arc::new(AtomicU8::new(STATE_IDLE));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let worker = ScanWorker {
            viewing_sk: self.viewing_sk,
            spending_pk: self.spending_pk,
            stats: self.stats.clone(),
        };
        let task_state = state.clone();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        debug!("watch stopped by caller");
                        break;
                    }
                    next = subscription.recv() => {
                        let Some(announcement) = next else {
                            warn!("announcement channel closed");
                            break;
                        };
                        task_state.store(STATE_SCANNING, Ordering::SeqCst);
                        if let Some(discovery) = worker.check(&announcement) {
                            info!(
                                id = announcement.id,
                                address = %discovery.stealth_address,
                                "discovered incoming stealth address"
                            );
                            on_discovery(discovery);
                        }
                    }
                }
            }
            task_state.store(STATE_STOPPED, Ordering::SeqCst);
        });

        Ok(WatchHandle {
            state,
            shutdown: Some(shutdown_tx),
            task,
        })
    }

    fn check(&self, announcement: &Announcement) -> Option<Discovery> {
        let worker = ScanWorker {
            viewing_sk: self.viewing_sk,
            spending_pk: self.spending_pk,
            stats: self.stats.clone(),
        };
        worker.check(announcement)
    }
}

impl std::fmt::Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner").finish_non_exhaustive()
    }
}

/// The per-announcement check, shared by backlog scans and the live task.
struct ScanWorker {
    viewing_sk: NonZeroScalar,
    spending_pk: PublicKey,
    stats: Arc<RwLock<ScanStats>>,
}

impl ScanWorker {
    fn check(&self, announcement: &Announcement) -> Option<Discovery> {
        let outcome = check_announcement(&self.viewing_sk, &self.spending_pk, announcement);
        self.stats.write().record(&outcome);

        match outcome {
            Ok(ScanOutcome::Owned { stealth_address }) => Some(Discovery {
                stealth_address,
                announcement: announcement.clone(),
            }),
            Ok(ScanOutcome::ViewTagMismatch) | Ok(ScanOutcome::FalsePositive) => None,
            Err(e) => {
                // Malformed announcements on a public channel are expected
                // hostile noise; log and move on.
                warn!(id = announcement.id, error = %e, "skipping malformed announcement");
                None
            }
        }
    }
}

/// Handle to a running watch.
///
/// Dropping the handle also stops the watch (the subscription's receiver
/// is owned by the task, which exits once aborted), but [`stop`] is the
/// orderly path: it waits for the task to finish so no callback runs
/// after it returns.
#[derive(Debug)]
pub struct WatchHandle {
    state: Arc<AtomicU8>,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl WatchHandle {
    /// Current state of the watch.
    pub fn state(&self) -> WatchState {
        decode_state(self.state.load(Ordering::SeqCst))
    }

    /// Stops the watch and waits for in-flight processing to finish.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            // Err means the task already exited; nothing to signal
            let _ = shutdown.send(());
        }
        let _ = (&mut self.task).await;
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloak_core::types::RootSecret;
    use cloak_registry::{MemoryChannel, RegistryClient};
    use cloak_stealth::generate_stealth_address;
    use tokio::sync::mpsc;

    fn wallet(seed: u8) -> CloakWallet {
        CloakWallet::from_root_secret(&RootSecret::new([seed; 32]))
    }

    async fn watch_into_channel(
        scanner: &Scanner,
        channel: Arc<MemoryChannel>,
    ) -> (WatchHandle, mpsc::UnboundedReceiver<Discovery>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = scanner
            .watch(channel, move |d| {
                let _ = tx.send(d);
            })
            .await
            .unwrap();
        (handle, rx)
    }

    #[tokio::test]
    async fn test_watch_starts_idle() {
        let channel = Arc::new(MemoryChannel::new());
        let scanner = Scanner::for_wallet(&wallet(0x01));
        let (handle, _rx) = watch_into_channel(&scanner, channel).await;
        assert_eq!(handle.state(), WatchState::Idle);
        handle.stop().await;
    }

    #[tokio::test]
    async fn test_watch_discovers_own_announcement() {
        let channel = Arc::new(MemoryChannel::new());
        let alice = wallet(0x02);
        let scanner = Scanner::for_wallet(&alice);
        let (handle, mut rx) = watch_into_channel(&scanner, channel.clone()).await;

        let client = RegistryClient::new(channel);
        let bundle = generate_stealth_address(&alice.meta_address()).unwrap();
        client.announce(&bundle).await.unwrap();

        let discovery = rx.recv().await.unwrap();
        assert_eq!(discovery.stealth_address, bundle.stealth_address);
        assert_eq!(handle.state(), WatchState::Scanning);
        handle.stop().await;
    }

    #[tokio::test]
    async fn test_watch_ignores_foreign_announcements() {
        let channel = Arc::new(MemoryChannel::new());
        let alice = wallet(0x03);
        let carol = wallet(0x04);
        let scanner = Scanner::for_wallet(&carol);
        let (handle, mut rx) = watch_into_channel(&scanner, channel.clone()).await;

        let client = RegistryClient::new(channel);
        for _ in 0..16 {
            let bundle = generate_stealth_address(&alice.meta_address()).unwrap();
            client.announce(&bundle).await.unwrap();
        }

        // Wait for the watch task to drain the stream before stopping
        while scanner.stats().total_scanned < 16 {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        handle.stop().await;
        assert!(rx.try_recv().is_err());
        assert_eq!(scanner.stats().discoveries, 0);
        assert_eq!(scanner.stats().total_scanned, 16);
    }

    #[tokio::test]
    async fn test_stop_ends_delivery() {
        let channel = Arc::new(MemoryChannel::new());
        let alice = wallet(0x05);
        let scanner = Scanner::for_wallet(&alice);
        let (handle, mut rx) = watch_into_channel(&scanner, channel.clone()).await;

        handle.stop().await;

        let client = RegistryClient::new(channel);
        let bundle = generate_stealth_address(&alice.meta_address()).unwrap();
        client.announce(&bundle).await.unwrap();
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_scan_backlog_finds_earlier_announcements() {
        let channel = Arc::new(MemoryChannel::new());
        let alice = wallet(0x06);
        let client = RegistryClient::new(channel.clone());

        let bundle = generate_stealth_address(&alice.meta_address()).unwrap();
        client.announce(&bundle).await.unwrap();
        let foreign = generate_stealth_address(&wallet(0x07).meta_address()).unwrap();
        client.announce(&foreign).await.unwrap();

        let scanner = Scanner::for_wallet(&alice);
        let found = scanner.scan_backlog(channel.as_ref(), 0).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].stealth_address, bundle.stealth_address);
    }

    #[tokio::test]
    async fn test_malformed_announcement_is_skipped_not_fatal() {
        let channel = Arc::new(MemoryChannel::new());
        let alice = wallet(0x08);
        let scanner = Scanner::for_wallet(&alice);
        let (handle, mut rx) = watch_into_channel(&scanner, channel.clone()).await;

        // Off-curve ephemeral key straight into the channel
        let mut bad = [0xff; 33];
        bad[0] = 0x02;
        let mut ann = Announcement::new(
            EthAddress::from_array([0x99; 20]),
            cloak_core::types::PublicKeyBytes::from_bytes(&bad).unwrap(),
            0,
        );
        ann.validate().unwrap();
        channel.publish(ann).await.unwrap();

        // A good announcement afterwards still gets through
        let client = RegistryClient::new(channel);
        let bundle = generate_stealth_address(&alice.meta_address()).unwrap();
        client.announce(&bundle).await.unwrap();

        let discovery = rx.recv().await.unwrap();
        assert_eq!(discovery.stealth_address, bundle.stealth_address);
        assert_eq!(scanner.stats().errors, 1);
        handle.stop().await;
    }
}
