//! # crypto-input-parcel
//!
//! Transport record for the inputs of an OpenPGP operation: the passphrase
//! that unlocks a key, the time to put in a signature, cached session keys
//! and signed hashes, passphrases collected for a batch export, and an
//! optional proxy override.
//!
//! ## Modules
//! - [`input`]: The [`CryptoInput`] record and its value types
//! - [`core`]: Wire primitives, packet framing, streaming codec
//! - [`transport`]: Async channel for sending records between processes
//! - [`config`]: TOML and environment configuration
//! - [`utils`]: Payload sealing, logging setup, time helpers
//! - [`error`]: The crate-wide error type

pub mod config;
pub mod core;
pub mod error;
pub mod input;
pub mod transport;
pub mod utils;

pub use crate::core::packet::Packet;
pub use error::{ParcelError, Result};
pub use input::{CryptoInput, Passphrase, ProxyDescriptor, ProxyKind, SignatureTime};
pub use transport::InputChannel;
