//! End-to-end flow: Alice registers, Bob pays, Alice discovers, Carol sees nothing.

use std::sync::Arc;

use k256::PublicKey;
use tokio::sync::mpsc;

use cloak_core::traits::Signer;
use cloak_core::types::RootSecret;
use cloak_crypto::derive_eth_address;
use cloak_registry::{DevSigner, MemoryChannel, RegistryClient};
use cloak_scanner::{Discovery, Scanner, WatchState};
use cloak_stealth::{generate_stealth_address, CloakWallet};

async fn watch(
    scanner: &Scanner,
    channel: Arc<MemoryChannel>,
) -> (cloak_scanner::WatchHandle, mpsc::UnboundedReceiver<Discovery>) {
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
async fn alice_receives_bobs_payment_and_carol_sees_nothing() {
    let channel = Arc::new(MemoryChannel::new());
    let client = RegistryClient::new(channel.clone());

    // Alice derives her keys from a fixed root secret and registers
    let alice_signer = DevSigner::new([0x01; 32]);
    let alice = CloakWallet::from_root_secret(&RootSecret::new([0xAA; 32]));
    client
        .register_stealth_keys(&alice_signer, &alice.meta_address())
        .await
        .unwrap();

    // Both scanners subscribe before anything is announced
    let alice_scanner = Scanner::for_wallet(&alice);
    let (alice_watch, mut alice_rx) = watch(&alice_scanner, channel.clone()).await;

    let carol = CloakWallet::from_root_secret(&RootSecret::new([0xCC; 32]));
    let carol_scanner = Scanner::for_wallet(&carol);
    let (carol_watch, mut carol_rx) = watch(&carol_scanner, channel.clone()).await;

    assert_eq!(alice_watch.state(), WatchState::Idle);

    // Bob looks Alice up and sends a stealth payment
    let alice_meta = client
        .lookup_meta_address(alice_signer.identity())
        .await
        .unwrap()
        .expect("alice registered");
    let bundle = generate_stealth_address(&alice_meta).unwrap();
    let announcement_id = client.announce(&bundle).await.unwrap();
    assert_eq!(announcement_id, 1);

    // Alice's scanner reports the address as hers
    let discovery = alice_rx.recv().await.unwrap();
    assert_eq!(discovery.stealth_address, bundle.stealth_address);
    assert_eq!(discovery.announcement.id, announcement_id);
    assert_eq!(alice_watch.state(), WatchState::Scanning);

    // Alice can recover the key that controls the discovered address
    let stealth_sk = alice
        .recover_stealth_private_key(&discovery.announcement)
        .unwrap();
    let stealth_pk = PublicKey::from_secret_scalar(&stealth_sk);
    assert_eq!(derive_eth_address(&stealth_pk), bundle.stealth_address);

    // Carol's scanner has processed the same stream and found nothing
    while carol_scanner.stats().total_scanned < 1 {
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    assert!(carol_rx.try_recv().is_err());
    assert_eq!(carol_scanner.stats().discoveries, 0);

    alice_watch.stop().await;
    carol_watch.stop().await;
}

#[tokio::test]
async fn offline_recipient_catches_up_without_gaps() {
    let channel = Arc::new(MemoryChannel::new());
    let client = RegistryClient::new(channel.clone());
    let alice = CloakWallet::from_root_secret(&RootSecret::new([0xAA; 32]));

    // Three payments land while Alice is offline
    let mut expected = Vec::new();
    for _ in 0..3 {
        let bundle = generate_stealth_address(&alice.meta_address()).unwrap();
        client.announce(&bundle).await.unwrap();
        expected.push(bundle.stealth_address);
    }

    // Alice comes online: subscribe first, then scan the backlog, so
    // nothing published in between can be missed
    let scanner = Scanner::for_wallet(&alice);
    let (watch_handle, mut rx) = watch(&scanner, channel.clone()).await;
    let backlog = scanner.scan_backlog(channel.as_ref(), 0).await.unwrap();

    let backlog_addresses: Vec<_> = backlog.iter().map(|d| d.stealth_address).collect();
    assert_eq!(backlog_addresses, expected);

    // A fourth payment arrives live
    let live = generate_stealth_address(&alice.meta_address()).unwrap();
    client.announce(&live).await.unwrap();
    let discovery = rx.recv().await.unwrap();
    assert_eq!(discovery.stealth_address, live.stealth_address);
    assert_eq!(discovery.announcement.id, 4);

    watch_handle.stop().await;
}

#[tokio::test]
async fn registration_is_idempotent_across_sessions() {
    let channel = Arc::new(MemoryChannel::new());
    let client = RegistryClient::new(channel.clone());
    let signer = DevSigner::new([0x07; 32]);

    // Same signature each session gives the same wallet and meta-address
    let session_sig = signer.sign(b"cloak stealth keys v1").await.unwrap();
    let first = CloakWallet::from_signature(&session_sig);
    let second = CloakWallet::from_signature(&session_sig);
    assert_eq!(first.meta_address(), second.meta_address());

    client
        .register_stealth_keys(&signer, &first.meta_address())
        .await
        .unwrap();
    client
        .register_stealth_keys(&signer, &second.meta_address())
        .await
        .unwrap();

    assert_eq!(channel.registration_count(), 1);
    assert_eq!(
        client.lookup_meta_address(signer.identity()).await.unwrap(),
        Some(first.meta_address())
    );
}
