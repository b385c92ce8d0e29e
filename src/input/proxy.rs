//! Per-operation network proxy override.

use crate::core::wire::{ParcelReader, ParcelWriter, WireFormat};
use crate::error::{constants, ParcelError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Proxy protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyKind {
    Http,
    Socks,
}

impl ProxyKind {
    /// Identifier byte on the wire
    pub fn wire_byte(self) -> u8 {
        match self {
            ProxyKind::Http => 0x01,
            ProxyKind::Socks => 0x02,
        }
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(ProxyKind::Http),
            0x02 => Some(ProxyKind::Socks),
            _ => None,
        }
    }

    pub fn scheme(self) -> &'static str {
        match self {
            ProxyKind::Http => "http",
            ProxyKind::Socks => "socks",
        }
    }
}

/// Explicit proxy to use for one operation instead of the default policy
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProxyDescriptor {
    kind: ProxyKind,
    host: String,
    port: u16,
}

impl ProxyDescriptor {
    /// # Errors
    /// Returns `ParcelError::DecodeError` if `host` is empty
    pub fn new(kind: ProxyKind, host: impl Into<String>, port: u16) -> Result<Self> {
        let host = host.into();
        if host.is_empty() {
            return Err(ParcelError::DecodeError(
                constants::ERR_EMPTY_PROXY_HOST.into(),
            ));
        }
        Ok(Self { kind, host, port })
    }

    pub fn kind(&self) -> ProxyKind {
        self.kind
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for ProxyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.kind.scheme(), self.host, self.port)
    }
}

impl WireFormat for ProxyDescriptor {
    fn write_to(&self, writer: &mut ParcelWriter) -> Result<()> {
        writer.write_u8(self.kind.wire_byte());
        writer.write_str(&self.host)?;
        writer.write_u16(self.port);
        Ok(())
    }

    fn read_from(reader: &mut ParcelReader<'_>) -> Result<Self> {
        let byte = reader.read_u8("proxy_kind")?;
        let kind = ProxyKind::from_byte(byte).ok_or(ParcelError::InvalidTag {
            field: "proxy_kind",
            value: byte,
        })?;
        let host = reader.read_string("proxy_host")?;
        let port = reader.read_u16("proxy_port")?;
        Self::new(kind, host, port)
    }
}
