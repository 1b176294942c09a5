//! Error types for cloak.
//!
//! This module provides the protocol error hierarchy using `thiserror`.
//! All errors include context and are designed to be actionable.

use thiserror::Error;

/// Result type alias using `CloakError`.
pub type Result<T> = std::result::Result<T, CloakError>;

/// Main error type for all cloak operations.
#[derive(Debug, Error)]
pub enum CloakError {
    // ═══════════════════════════════════════════════════════════════════════════
    // CURVE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// A derived or supplied scalar is congruent to 0 mod the curve order.
    /// Fatal: signals a broken root secret or corrupted input.
    #[error("Invalid scalar: {0}")]
    InvalidScalar(String),

    /// A point operation produced the identity element. Treated as a hard
    /// failure: an attacker-influenced ephemeral key could otherwise force
    /// a degenerate stealth address.
    #[error("Point addition produced the point at infinity")]
    PointAtInfinity,

    /// The computed stealth public key was the point at infinity.
    /// Aborts the specific generation attempt; a caller may retry since the
    /// ephemeral key is freshly random each time.
    #[error("Degenerate stealth key: {0}")]
    DegenerateStealthKey(String),

    /// Byte string is not a valid SEC1 point encoding or not on the curve.
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Invalid key size or format.
    #[error("Invalid key: expected {expected} bytes, got {actual}")]
    InvalidKeySize {
        /// Expected byte length.
        expected: usize,
        /// Actual byte length supplied.
        actual: usize,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // STEALTH ADDRESS ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Malformed or off-curve input to stealth address generation.
    /// Always fatal to that call, never retried internally.
    #[error("Invalid meta-address: {0}")]
    InvalidMetaAddress(String),

    /// Invalid stealth address format.
    #[error("Invalid stealth address: {0}")]
    InvalidStealthAddress(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // REGISTRY ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Invalid announcement format.
    #[error("Invalid announcement: {0}")]
    InvalidAnnouncement(String),

    /// The announcement channel reported a failure. Transient channel errors
    /// are the caller's retry responsibility, not this core's.
    #[error("Registry error: {0}")]
    RegistryError(String),

    /// The signer refused or failed to produce a signature.
    #[error("Signer error: {0}")]
    SignerError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid hex encoding.
    #[error("Invalid hex encoding: {0}")]
    HexError(#[from] hex::FromHexError),

    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Input validation failed.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal invariant violation (should never happen).
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl CloakError {
    /// Returns true if this is a curve-level cryptographic error.
    pub fn is_crypto_error(&self) -> bool {
        matches!(
            self,
            CloakError::InvalidScalar(_)
                | CloakError::PointAtInfinity
                | CloakError::DegenerateStealthKey(_)
                | CloakError::InvalidPublicKey(_)
                | CloakError::InvalidKeySize { .. }
        )
    }

    /// Returns true if this is a validation error on caller-supplied input.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            CloakError::ValidationError(_)
                | CloakError::InvalidMetaAddress(_)
                | CloakError::InvalidStealthAddress(_)
                | CloakError::InvalidAnnouncement(_)
        )
    }

    /// Returns true if a caller may retry the failed generation attempt with
    /// fresh randomness (near-zero-probability curve edge cases).
    pub fn is_retryable_generation(&self) -> bool {
        matches!(
            self,
            CloakError::DegenerateStealthKey(_) | CloakError::PointAtInfinity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CloakError::InvalidKeySize {
            expected: 33,
            actual: 20,
        };
        assert!(err.to_string().contains("33"));
        assert!(err.to_string().contains("20"));
    }

    #[test]
    fn test_error_classification() {
        assert!(CloakError::PointAtInfinity.is_crypto_error());
        assert!(CloakError::InvalidScalar("zero".into()).is_crypto_error());
        assert!(!CloakError::RegistryError("down".into()).is_crypto_error());

        assert!(CloakError::InvalidMetaAddress("bad".into()).is_validation_error());
        assert!(!CloakError::PointAtInfinity.is_validation_error());

        assert!(CloakError::DegenerateStealthKey("identity".into()).is_retryable_generation());
        assert!(!CloakError::InvalidScalar("zero".into()).is_retryable_generation());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("invalid");
        let cloak_result: Result<serde_json::Value> = json_result.map_err(CloakError::from);
        assert!(matches!(cloak_result, Err(CloakError::JsonError(_))));
    }
}
