//! The crypto operation input record and its binary encoding.
//!
//! ## Record Layout
//! ```text
//! [has_signature: bool]
//! [signature_time: i64]                       only if has_signature
//! [passphrase: option<bytes>]
//! [proxy: option<kind(1) host(bytes) port(2)>]
//! [cache_passphrase: bool]
//! [crypto_data: count(i32) (key(bytes) value(bytes))*]
//! [passphrases: option<count(i32) (key_id(u64) passphrase(bytes))*>]
//! ```

use crate::core::wire::{DecodeLimits, ParcelReader, ParcelWriter, WireFormat};
use crate::error::Result;
use crate::input::{Passphrase, ProxyDescriptor, SignatureTime};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, instrument, warn};

/// Passphrases collected for several keys, indexed by OpenPGP key ID
pub type PassphraseMap = BTreeMap<u64, Passphrase>;

/// Session keys or signed hashes, indexed by content hash or key identifier
pub type CryptoDataMap = BTreeMap<Vec<u8>, Vec<u8>>;

/// Inputs for one cryptographic operation
///
/// Built by the caller, optionally amended with a proxy, a signature time or
/// crypto data, and then handed read-only to the operation. Passphrases are
/// wiped when the record is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptoInput {
    has_signature: bool,
    signature_time: Option<SignatureTime>,
    passphrase: Option<Passphrase>,
    passphrases: Option<PassphraseMap>,
    proxy: Option<ProxyDescriptor>,
    cache_passphrase: bool,
    crypto_data: CryptoDataMap,
}

impl Default for CryptoInput {
    fn default() -> Self {
        Self {
            has_signature: false,
            signature_time: None,
            passphrase: None,
            passphrases: None,
            proxy: None,
            cache_passphrase: true,
            crypto_data: CryptoDataMap::new(),
        }
    }
}

impl CryptoInput {
    /// Empty input: no signature, no passphrases, caching enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a signature at `time`, or now when `None`
    pub fn with_signature_time(time: Option<SignatureTime>) -> Self {
        Self::with_signature_time_and_cache(time, true)
    }

    /// Request a signature and unlock the signing key with `passphrase`
    pub fn with_signature_time_and_passphrase(
        time: Option<SignatureTime>,
        passphrase: Passphrase,
    ) -> Self {
        Self {
            passphrase: Some(passphrase),
            ..Self::with_signature_time(time)
        }
    }

    pub fn with_passphrase(passphrase: Passphrase) -> Self {
        Self {
            passphrase: Some(passphrase),
            ..Self::default()
        }
    }

    /// Input for a batch export, carrying one passphrase per key ID
    pub fn with_passphrases(passphrases: PassphraseMap) -> Self {
        Self {
            passphrases: Some(passphrases),
            ..Self::default()
        }
    }

    pub fn with_signature_time_and_cache(
        time: Option<SignatureTime>,
        cache_passphrase: bool,
    ) -> Self {
        Self {
            has_signature: true,
            signature_time: Some(SignatureTime::or_now(time)),
            cache_passphrase,
            ..Self::default()
        }
    }

    pub fn with_cache_passphrase(cache_passphrase: bool) -> Self {
        Self {
            cache_passphrase,
            ..Self::default()
        }
    }

    pub fn with_proxy(proxy: ProxyDescriptor) -> Self {
        Self {
            proxy: Some(proxy),
            ..Self::default()
        }
    }

    /// Replace any existing proxy override
    pub fn set_proxy(&mut self, proxy: ProxyDescriptor) {
        self.proxy = Some(proxy);
    }

    /// Replace the signature time.
    ///
    /// Does not request a signature: the time is only encoded when
    /// [`has_signature`](Self::has_signature) is already set.
    pub fn set_signature_time(&mut self, time: SignatureTime) {
        self.signature_time = Some(time);
    }

    pub fn set_passphrase(&mut self, passphrase: Option<Passphrase>) {
        self.passphrase = passphrase;
    }

    pub fn set_cache_passphrase(&mut self, cache_passphrase: bool) {
        self.cache_passphrase = cache_passphrase;
    }

    /// Record a signed hash or session key, replacing any value under `hash`
    pub fn add_crypto_data(&mut self, hash: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.crypto_data.insert(hash.into(), value.into());
    }

    /// Merge cached session keys; incoming entries win on collision
    pub fn add_crypto_data_map<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Vec<u8>>,
        V: Into<Vec<u8>>,
    {
        self.crypto_data
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    pub fn has_signature(&self) -> bool {
        self.has_signature
    }

    pub fn signature_time(&self) -> Option<SignatureTime> {
        self.signature_time
    }

    pub fn has_passphrase(&self) -> bool {
        self.passphrase.is_some()
    }

    pub fn passphrase(&self) -> Option<&Passphrase> {
        self.passphrase.as_ref()
    }

    pub fn passphrases(&self) -> Option<&PassphraseMap> {
        self.passphrases.as_ref()
    }

    pub fn proxy(&self) -> Option<&ProxyDescriptor> {
        self.proxy.as_ref()
    }

    pub fn cache_passphrase(&self) -> bool {
        self.cache_passphrase
    }

    pub fn crypto_data(&self) -> &CryptoDataMap {
        &self.crypto_data
    }

    /// Encode the record into its binary form
    ///
    /// # Errors
    /// Returns `ParcelError::EncodeError` if a field or map is too large for
    /// its `i32` length prefix
    #[instrument(level = "debug", skip(self))]
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut writer = ParcelWriter::with_capacity(64);
        self.write_to(&mut writer)?;
        debug!(
            bytes = writer.len(),
            hashes = self.crypto_data.len(),
            "Encoded crypto input"
        );
        Ok(writer.into_bytes())
    }

    /// Decode a record using the default [`DecodeLimits`]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::decode_with_limits(data, &DecodeLimits::default())
    }

    /// Decode a record, rejecting input that is truncated, malformed,
    /// beyond `limits`, or followed by trailing bytes
    #[instrument(level = "debug", skip(data, limits), fields(bytes = data.len()))]
    pub fn decode_with_limits(data: &[u8], limits: &DecodeLimits) -> Result<Self> {
        let mut reader = ParcelReader::with_limits(data, *limits);
        let input = Self::read_from(&mut reader).and_then(|input| {
            reader.finish()?;
            Ok(input)
        });
        if let Err(ref e) = input {
            warn!(error = %e, "Rejected malformed crypto input");
        }
        input
    }
}

impl WireFormat for CryptoInput {
    fn write_to(&self, writer: &mut ParcelWriter) -> Result<()> {
        writer.write_bool(self.has_signature);
        if self.has_signature {
            // Constructors always resolve a time alongside has_signature
            let time = self.signature_time.unwrap_or_else(SignatureTime::now);
            writer.write_i64(time.as_millis());
        }
        writer.write_optional(self.passphrase.as_ref())?;
        writer.write_optional(self.proxy.as_ref())?;
        writer.write_bool(self.cache_passphrase);

        writer.write_len(self.crypto_data.len())?;
        for (key, value) in &self.crypto_data {
            writer.write_bytes(key)?;
            writer.write_bytes(value)?;
        }

        writer.write_optional(self.passphrases.as_ref())
    }

    fn read_from(reader: &mut ParcelReader<'_>) -> Result<Self> {
        let has_signature = reader.read_bool("has_signature")?;
        let signature_time = if has_signature {
            Some(SignatureTime::from_millis(
                reader.read_i64("signature_time")?,
            ))
        } else {
            None
        };
        let passphrase = reader.read_optional::<Passphrase>("passphrase_tag")?;
        let proxy = reader.read_optional::<ProxyDescriptor>("proxy_tag")?;
        let cache_passphrase = reader.read_bool("cache_passphrase")?;

        let count = reader.read_count("crypto_data_count")?;
        let mut crypto_data = CryptoDataMap::new();
        for _ in 0..count {
            let key = reader.read_bytes("crypto_data_key")?;
            let value = reader.read_bytes("crypto_data_value")?;
            crypto_data.insert(key, value);
        }

        let passphrases = reader.read_optional::<PassphraseMap>("passphrases_tag")?;

        Ok(Self {
            has_signature,
            signature_time,
            passphrase,
            passphrases,
            proxy,
            cache_passphrase,
            crypto_data,
        })
    }
}

impl WireFormat for PassphraseMap {
    fn write_to(&self, writer: &mut ParcelWriter) -> Result<()> {
        writer.write_len(self.len())?;
        for (key_id, passphrase) in self {
            writer.write_u64(*key_id);
            passphrase.write_to(writer)?;
        }
        Ok(())
    }

    fn read_from(reader: &mut ParcelReader<'_>) -> Result<Self> {
        let count = reader.read_count("passphrases_count")?;
        let mut map = PassphraseMap::new();
        for _ in 0..count {
            let key_id = reader.read_u64("passphrases_key_id")?;
            let passphrase = Passphrase::read_from(reader)?;
            map.insert(key_id, passphrase);
        }
        Ok(map)
    }
}

impl fmt::Display for CryptoInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CryptoInput: { ")?;
        match self.signature_time {
            Some(time) => write!(f, "{time} ")?,
            None => f.write_str("null ")?,
        }
        if self.passphrase.is_some() {
            f.write_str("passphrase ")?;
        }
        if self.passphrases.is_some() {
            f.write_str("passphrases ")?;
        }
        write!(f, "{} hashes }}", self.crypto_data.len())
    }
}
