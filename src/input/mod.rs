//! # Crypto Operation Input
//!
//! The record handed to a cryptographic operation and the value types it
//! carries.
//!
//! ## Components
//! - **CryptoInput**: Signature time, passphrases, proxy override, crypto data
//! - **Passphrase**: Secret string, zeroized on drop, redacted in `Debug`
//! - **ProxyDescriptor**: Explicit HTTP or SOCKS proxy for one operation
//! - **SignatureTime**: Millisecond timestamp embedded in signatures
//!
//! ## Usage
//! ```rust
//! use crypto_input_parcel::input::{CryptoInput, Passphrase, SignatureTime};
//!
//! let mut input = CryptoInput::with_signature_time_and_passphrase(
//!     Some(SignatureTime::from_millis(1_425_000_000_000)),
//!     Passphrase::new("correct horse battery staple"),
//! );
//! input.add_crypto_data(vec![0xAB; 32], vec![0xCD; 64]);
//!
//! let bytes = input.encode()?;
//! assert_eq!(CryptoInput::from_bytes(&bytes)?, input);
//! # Ok::<(), crypto_input_parcel::error::ParcelError>(())
//! ```

pub mod passphrase;
pub mod proxy;
pub mod record;
pub mod signature_time;

pub use passphrase::Passphrase;
pub use proxy::{ProxyDescriptor, ProxyKind};
pub use record::{CryptoDataMap, CryptoInput, PassphraseMap};
pub use signature_time::SignatureTime;
