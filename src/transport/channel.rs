use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::Framed;
use tracing::{debug, instrument, warn};

use crate::config::ParcelConfig;
use crate::core::codec::PacketCodec;
use crate::core::packet::{Packet, FLAG_SEALED};
use crate::core::wire::DecodeLimits;
use crate::error::{constants, ParcelError, Result};
use crate::input::CryptoInput;
use crate::utils::crypto::Crypto;

/// Sends and receives [`CryptoInput`] records over a framed byte stream
///
/// With a sealing key every payload is encrypted before framing, and plain
/// packets are refused. Without one, sealed packets are refused.
pub struct InputChannel<T> {
    framed: Framed<T, PacketCodec>,
    crypto: Option<Crypto>,
    limits: DecodeLimits,
    read_timeout: Duration,
}

impl<T> InputChannel<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    /// Plaintext channel with default limits and timeout
    pub fn new(stream: T) -> Self {
        Self {
            framed: Framed::new(stream, PacketCodec),
            crypto: None,
            limits: DecodeLimits::default(),
            read_timeout: crate::config::DEFAULT_READ_TIMEOUT,
        }
    }

    /// Channel that seals every payload with `crypto`
    pub fn sealed(stream: T, crypto: Crypto) -> Self {
        Self {
            crypto: Some(crypto),
            ..Self::new(stream)
        }
    }

    /// Build a channel from configuration
    ///
    /// # Errors
    /// Returns `ParcelError::ConfigError` if the configuration fails validation
    /// or if the supplied key does not match `seal_payloads`
    pub fn from_config(stream: T, config: &ParcelConfig, crypto: Option<Crypto>) -> Result<Self> {
        let errors: Vec<String> = config
            .limits
            .validate()
            .into_iter()
            .chain(config.transport.validate())
            .filter(|e| !e.starts_with("WARNING"))
            .collect();
        if !errors.is_empty() {
            return Err(ParcelError::ConfigError(errors.join("; ")));
        }

        let crypto = match (config.transport.seal_payloads, crypto) {
            (true, None) => {
                return Err(ParcelError::ConfigError(
                    "seal_payloads is enabled but no sealing key was supplied".into(),
                ))
            }
            (false, Some(_)) => {
                return Err(ParcelError::ConfigError(
                    "a sealing key was supplied but seal_payloads is disabled".into(),
                ))
            }
            (true, Some(c)) => Some(c),
            (false, None) => None,
        };

        Ok(Self {
            framed: Framed::new(stream, PacketCodec),
            crypto,
            limits: config.limits.decode_limits(),
            read_timeout: config.transport.read_timeout,
        })
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_limits(mut self, limits: DecodeLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn is_sealed(&self) -> bool {
        self.crypto.is_some()
    }

    /// Encode, optionally seal, and send one record
    #[instrument(skip(self, input), fields(sealed = self.crypto.is_some()))]
    pub async fn send(&mut self, input: &CryptoInput) -> Result<()> {
        let encoded = input.encode()?;
        let packet = match &self.crypto {
            Some(crypto) => Packet::new(crypto.seal(&encoded)?, FLAG_SEALED),
            None => Packet::new(encoded, 0),
        };
        debug!(bytes = packet.payload.len(), "Sending crypto input");
        self.framed.send(packet).await
    }

    /// Wait for the next record
    ///
    /// # Errors
    /// - `ParcelError::Timeout` if nothing arrives within the read timeout
    /// - `ParcelError::ConnectionClosed` if the stream ends
    /// - `ParcelError::SecurityError` on a sealing mismatch
    /// - any decode error from the record itself
    #[instrument(skip(self), fields(sealed = self.crypto.is_some()))]
    pub async fn recv(&mut self) -> Result<CryptoInput> {
        let next = tokio::time::timeout(self.read_timeout, self.framed.next())
            .await
            .map_err(|_| ParcelError::Timeout)?;

        let packet = match next {
            Some(packet) => packet?,
            None => return Err(ParcelError::ConnectionClosed),
        };

        let payload = match (&self.crypto, packet.is_sealed()) {
            (Some(crypto), true) => crypto.open(&packet.payload)?,
            (None, false) => packet.payload,
            (None, true) => {
                warn!("Refusing sealed packet on plaintext channel");
                return Err(ParcelError::SecurityError(
                    constants::ERR_SEALED_WITHOUT_KEY.into(),
                ));
            }
            (Some(_), false) => {
                warn!("Refusing plaintext packet on sealed channel");
                return Err(ParcelError::SecurityError(constants::ERR_PLAIN_WITH_KEY.into()));
            }
        };

        debug!(bytes = payload.len(), "Received crypto input");
        CryptoInput::decode_with_limits(&payload, &self.limits)
    }

    /// Recover the underlying stream
    pub fn into_inner(self) -> T {
        self.framed.into_inner()
    }
}
