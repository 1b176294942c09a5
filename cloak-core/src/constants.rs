//! Protocol constants for cloak.
//!
//! All sizes are fixed by secp256k1 (SEC1 encodings) and the Ethereum
//! address scheme. The domain separators keep every Keccak256 invocation
//! in the protocol disjoint.

// ═══════════════════════════════════════════════════════════════════════════════
// SECP256K1 SIZES
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of a SEC1-compressed secp256k1 public key in bytes (prefix + x).
pub const COMPRESSED_POINT_SIZE: usize = 33;

/// Size of a SEC1-uncompressed secp256k1 public key in bytes (prefix + x + y).
pub const UNCOMPRESSED_POINT_SIZE: usize = 65;

/// Size of a secp256k1 scalar (private key) in bytes.
pub const SCALAR_SIZE: usize = 32;

/// Size of the root secret from which all user keys derive.
pub const ROOT_SECRET_SIZE: usize = 32;

// ═══════════════════════════════════════════════════════════════════════════════
// VIEW TAG CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of view tag in bytes.
/// One byte gives a 1/256 false-positive rate during scanning — a cheap
/// hash comparison discards ~99.6% of announcements not addressed to us.
pub const VIEW_TAG_SIZE: usize = 1;

/// Number of possible view tag values (2^8 = 256).
pub const VIEW_TAG_SPACE: usize = 256;

// ═══════════════════════════════════════════════════════════════════════════════
// DOMAIN SEPARATORS
// ═══════════════════════════════════════════════════════════════════════════════
// Each Keccak256 invocation uses a unique domain separator so outputs from
// different operations never collide, even with identical inputs.

/// Domain label for spending key derivation from the root secret.
pub const LABEL_SPEND: &[u8] = b"spend";

/// Domain label for viewing key derivation from the root secret.
pub const LABEL_VIEW: &[u8] = b"view";

/// Domain separator for deriving the stealth tweak scalar from a shared secret.
pub const DOMAIN_STEALTH_SCALAR: &[u8] = b"CLOAK_STEALTH_SCALAR_V1";

/// Domain separator for view tag derivation from a shared secret.
pub const DOMAIN_VIEW_TAG: &[u8] = b"CLOAK_VIEW_TAG_V1";

/// Domain separator for deriving a root secret from a wallet signature.
pub const DOMAIN_ROOT_SECRET: &[u8] = b"CLOAK_ROOT_SECRET_V1";

// ═══════════════════════════════════════════════════════════════════════════════
// META-ADDRESS TEXT ENCODING
// ═══════════════════════════════════════════════════════════════════════════════

/// Scheme prefix for the meta-address text encoding:
/// `st:eth:0x<33-byte spending pk><33-byte viewing pk>` hex-encoded.
pub const META_ADDRESS_PREFIX: &str = "st:eth:0x";

/// Size of the packed meta-address payload (two compressed points).
pub const META_ADDRESS_PAYLOAD_SIZE: usize = 2 * COMPRESSED_POINT_SIZE;

/// Total length of the meta-address text form: prefix + 132 hex chars.
pub const META_ADDRESS_TEXT_LEN: usize = META_ADDRESS_PREFIX.len() + 2 * META_ADDRESS_PAYLOAD_SIZE;

// ═══════════════════════════════════════════════════════════════════════════════
// ETHEREUM CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of an Ethereum address in bytes (20 bytes = 160 bits).
pub const ETH_ADDRESS_SIZE: usize = 20;

/// Size of a keccak256 hash output.
pub const KECCAK256_SIZE: usize = 32;
