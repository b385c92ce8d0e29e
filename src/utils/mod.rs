//! # Utility Modules
//!
//! Supporting utilities for payload sealing, logging, and timestamps.
//!
//! ## Components
//! - **Crypto**: XChaCha20-Poly1305 payload sealing
//! - **Logging**: Structured logging configuration
//! - **Time**: Millisecond timestamp conversions
//!
//! ## Security
//! - Cryptographically secure RNG (getrandom)
//! - Memory zeroing for key material (zeroize crate)

pub mod crypto;
pub mod logging;
pub mod time;
