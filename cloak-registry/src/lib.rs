//! # Cloak Registry
//!
//! Client and backend for the public announcement channel.
//!
//! This crate provides:
//!
//! - **Client**: meta-address registration and announcement publication
//! - **Memory**: an in-memory channel backend for development and testing
//! - **DevSigner**: a deterministic signer for tests and local tooling
//!
//! The production channel (an on-chain announcer contract or equivalent
//! append-only log) plugs in behind the same [`Channel`] trait.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use cloak_core::traits::Signer;
//! use cloak_registry::{MemoryChannel, RegistryClient, DevSigner};
//! use cloak_stealth::{CloakWallet, generate_stealth_address};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> cloak_core::Result<()> {
//! let client = RegistryClient::new(Arc::new(MemoryChannel::new()));
//!
//! // Recipient registers their meta-address
//! let signer = DevSigner::new([0x01; 32]);
//! let wallet = CloakWallet::from_signature(&signer.sign(b"cloak keys").await?);
//! client.register_stealth_keys(&signer, &wallet.meta_address()).await?;
//!
//! // Sender announces a payment
//! let bundle = generate_stealth_address(&wallet.meta_address())?;
//! client.announce(&bundle).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod client;
mod memory;
mod signer;

pub use client::RegistryClient;
pub use memory::MemoryChannel;
pub use signer::DevSigner;

// Re-export the trait from core
pub use cloak_core::traits::AnnouncementChannel as Channel;
