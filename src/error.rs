//! # Error Types
//!
//! Error handling for the crypto input parcel.
//!
//! This module defines every error variant that can occur while encoding,
//! decoding, framing, sealing or transporting a [`CryptoInput`](crate::CryptoInput).
//!
//! ## Error Categories
//! - **Decode Errors**: Truncated fields, bad tags, invalid lengths, trailing bytes
//! - **Framing Errors**: Invalid headers, unsupported versions, oversized packets
//! - **Cryptographic Errors**: Sealing and opening failures
//! - **Transport Errors**: I/O failures, closed connections, timeouts
//! - **Configuration Errors**: Unreadable or invalid configuration
//!
//! Decode errors are never recovered by substituting defaults: a malformed
//! record is always surfaced to the caller.
//!
//! ## Example Usage
//! ```rust
//! use crypto_input_parcel::error::ParcelError;
//! use crypto_input_parcel::CryptoInput;
//!
//! // A leading 1 promises a signature timestamp that never arrives
//! match CryptoInput::from_bytes(&[1]) {
//!     Err(ParcelError::Truncated { field, .. }) => assert_eq!(field, "signature_time"),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Transport errors
    pub const ERR_SEALED_WITHOUT_KEY: &str = "Received sealed packet but no sealing key is configured";
    pub const ERR_PLAIN_WITH_KEY: &str = "Received plaintext packet on a sealed channel";

    /// Cryptographic errors
    pub const ERR_NONCE_GENERATION: &str = "Failed to gather randomness for nonce";
    pub const ERR_INVALID_KEY_LENGTH: &str = "Sealing key must be exactly 32 bytes";

    /// Decode errors
    pub const ERR_EMPTY_PROXY_HOST: &str = "Proxy host cannot be empty";
    pub const ERR_FIELD_TOO_LARGE: &str = "Field length does not fit the wire format";
}

// ParcelError is the primary error type for all parcel operations
#[derive(Error, Debug)]
pub enum ParcelError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Truncated input while reading {field}: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        field: &'static str,
        needed: usize,
        remaining: usize,
    },

    #[error("Invalid tag byte {value:#04x} for {field}")]
    InvalidTag { field: &'static str, value: u8 },

    #[error("Invalid length {value} for {field}")]
    InvalidLength { field: &'static str, value: i64 },

    #[error("Limit exceeded for {field}: {value} > {limit}")]
    LimitExceeded {
        field: &'static str,
        value: usize,
        limit: usize,
    },

    #[error("Invalid UTF-8 in {0}")]
    InvalidUtf8(&'static str),

    #[error("{0} trailing bytes after record")]
    TrailingBytes(usize),

    #[error("Encode error: {0}")]
    EncodeError(String),

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Security error: {0}")]
    SecurityError(String),

    #[error("Invalid parcel header")]
    InvalidHeader,

    #[error("Unsupported parcel version: {0}")]
    UnsupportedVersion(u8),

    #[error("Packet too large: {0} bytes")]
    OversizedPacket(usize),

    #[error("Decryption failed")]
    DecryptionFailure,

    #[error("Encryption failed")]
    EncryptionFailure,

    #[error("Timeout occurred")]
    Timeout,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Type alias for Results using ParcelError
pub type Result<T> = std::result::Result<T, ParcelError>;
