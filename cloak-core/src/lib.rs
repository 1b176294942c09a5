//! # Cloak Core
//!
//! Core types, errors, and traits for the cloak stealth address protocol.
//!
//! This crate provides the foundational building blocks used by all other cloak crates:
//!
//! - **Types**: Domain models for keys, addresses, and announcements
//! - **Errors**: Comprehensive error types with context
//! - **Constants**: Protocol constants and sizes
//! - **Traits**: The collaborator boundary (announcement channel, signer)
//!
//! ## Example
//!
//! ```rust
//! use cloak_core::{MetaAddress, CloakError};
//!
//! // Types are serializable and well-documented
//! let parsed: Result<MetaAddress, CloakError> = "not-a-meta-address".parse();
//! assert!(parsed.is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{CloakError, Result};
pub use traits::*;
pub use types::*;
