//! # Cloak Cryptography
//!
//! secp256k1 primitives for the cloak stealth address protocol.
//!
//! This crate provides:
//!
//! - **Curve**: checked scalar/point operations and Ethereum address derivation
//! - **Hash**: Keccak-256 with domain separation, and hash-to-scalar
//! - **Keys**: deterministic spending/viewing key derivation from a root secret
//! - **View Tags**: the one-byte scan hint computed from ECDH shared secrets
//!
//! ## Security Properties
//!
//! - Hash-to-scalar rejection-samples, so derived scalars are unbiased and nonzero
//! - Secret scalars are zeroized on drop
//! - Domain separators keep every hash invocation in the protocol disjoint
//! - Externally supplied points are validated for curve membership before use
//!
//! ## Example
//!
//! ```rust
//! use cloak_core::RootSecret;
//! use cloak_crypto::derive_stealth_keys;
//!
//! let root = RootSecret::new([0x11; 32]);
//! let keys = derive_stealth_keys(&root);
//! let meta = keys.meta_address();
//! assert!(meta.to_string().starts_with("st:eth:0x"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod curve;
pub mod hash;
pub mod keys;
pub mod view_tag;

// Re-export main functions at crate root
pub use curve::{
    decode_public_key, derive_eth_address, ecdh_x_coordinate, encode_public_key, point_add,
    scalar_multiply,
};
pub use hash::{hash_to_scalar, keccak256, keccak256_framed};
pub use keys::{derive_stealth_keys, root_secret_from_signature, KeyPair, StealthKeys};
pub use view_tag::{compute_view_tag, verify_view_tag};
