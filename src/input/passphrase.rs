//! Secret passphrase type.
//!
//! Passphrase memory is wiped when the value is dropped, and the `Debug`
//! output never contains the secret.

use crate::core::wire::{ParcelReader, ParcelWriter, WireFormat};
use crate::error::Result;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A passphrase used to unlock a private key
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Passphrase(String);

impl Passphrase {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The empty passphrase, used for keys stored without protection
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Borrow the secret. Callers must not retain copies beyond the operation.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Passphrase {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Passphrase {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passphrase([REDACTED])")
    }
}

impl WireFormat for Passphrase {
    fn write_to(&self, writer: &mut ParcelWriter) -> Result<()> {
        writer.write_str(&self.0)
    }

    fn read_from(reader: &mut ParcelReader<'_>) -> Result<Self> {
        reader.read_string("passphrase").map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let passphrase = Passphrase::new("correct horse battery staple");
        let debug = format!("{passphrase:?}");
        assert!(!debug.contains("horse"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_zeroize_clears_secret() {
        let mut passphrase = Passphrase::new("hunter2");
        passphrase.zeroize();
        assert!(passphrase.is_empty());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_empty_passphrase_roundtrip() {
        let mut writer = ParcelWriter::new();
        Passphrase::empty().write_to(&mut writer).unwrap();
        let bytes = writer.into_bytes();
        assert_eq!(bytes, vec![0, 0, 0, 0]);

        let mut reader = ParcelReader::new(&bytes);
        assert_eq!(Passphrase::read_from(&mut reader).unwrap(), Passphrase::empty());
    }
}
