//! # Cloak Stealth Address Protocol
//!
//! High-level API for creating and discovering stealth addresses.
//!
//! This crate provides:
//!
//! - **Generation**: one-time stealth addresses from a recipient's meta-address
//! - **Discovery**: view-tag filtering, ownership confirmation, key recovery
//! - **Wallet**: a recipient's derived keys bundled with their operations
//!
//! ## Quick Start
//!
//! ```rust
//! use cloak_stealth::{generate_stealth_address, CloakWallet};
//! use cloak_core::Announcement;
//!
//! // Recipient: derive keys and share the meta-address
//! let wallet = CloakWallet::from_signature(&[0x42; 65]);
//! let meta = wallet.meta_address();
//!
//! // Sender: generate a one-time address and announce it
//! let bundle = generate_stealth_address(&meta)?;
//! let announcement = Announcement::new(
//!     bundle.stealth_address,
//!     bundle.ephemeral_pk,
//!     bundle.view_tag,
//! );
//!
//! // Recipient: recognize the announcement
//! assert!(wallet.check_announcement(&announcement)?.is_owned());
//! # Ok::<(), cloak_core::CloakError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod discovery;
pub mod generation;
pub mod wallet;

pub use discovery::{
    check_announcement, recover_stealth_private_key, ScanOutcome, ScanStats,
};
pub use generation::{
    decode_meta_address, generate_stealth_address, generate_stealth_address_with_rng,
};
pub use wallet::CloakWallet;
