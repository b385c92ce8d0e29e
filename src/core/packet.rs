use crate::config::{MAGIC_BYTES, MAX_PAYLOAD_SIZE, PARCEL_VERSION};
use crate::error::{ParcelError, Result};
use bytes::{Buf, BufMut, BytesMut};
use tracing::warn;

/// Size of the fixed header: magic(4) + version(1) + flags(1) + length(4)
pub const HEADER_SIZE: usize = 10;

/// Payload is sealed with the channel key
pub const FLAG_SEALED: u8 = 0x01;

const KNOWN_FLAGS: u8 = FLAG_SEALED;

/// One framed parcel on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub version: u8,
    pub flags: u8,
    pub payload: Vec<u8>,
}

/// Parsed fixed-size header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Header {
    pub version: u8,
    pub flags: u8,
    pub length: usize,
}

impl Packet {
    /// Build a packet with the current parcel version
    pub fn new(payload: Vec<u8>, flags: u8) -> Self {
        Self {
            version: PARCEL_VERSION,
            flags,
            payload,
        }
    }

    pub fn is_sealed(&self) -> bool {
        self.flags & FLAG_SEALED != 0
    }

    /// Serialize the packet into a contiguous buffer
    ///
    /// # Errors
    /// Returns `ParcelError::OversizedPacket` if the payload exceeds `MAX_PAYLOAD_SIZE`
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = BytesMut::with_capacity(HEADER_SIZE + self.payload.len());
        self.write_into(&mut buf)?;
        Ok(buf.to_vec())
    }

    pub(crate) fn write_into(&self, dst: &mut BytesMut) -> Result<()> {
        let length = self.payload.len();
        if length > MAX_PAYLOAD_SIZE {
            return Err(ParcelError::OversizedPacket(length));
        }
        let length_prefix =
            u32::try_from(length).map_err(|_| ParcelError::OversizedPacket(length))?;

        dst.reserve(HEADER_SIZE + length);
        dst.put_slice(&MAGIC_BYTES);
        dst.put_u8(self.version);
        dst.put_u8(self.flags);
        dst.put_u32(length_prefix);
        dst.put_slice(&self.payload);
        Ok(())
    }

    /// Parse exactly one packet from `data`
    ///
    /// # Errors
    /// - `ParcelError::Truncated` if the header or payload is incomplete
    /// - `ParcelError::InvalidHeader` on bad magic or unknown flags
    /// - `ParcelError::UnsupportedVersion` on a version mismatch
    /// - `ParcelError::OversizedPacket` if the declared length exceeds `MAX_PAYLOAD_SIZE`
    /// - `ParcelError::TrailingBytes` if data follows the payload
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(ParcelError::Truncated {
                field: "packet_header",
                needed: HEADER_SIZE,
                remaining: data.len(),
            });
        }

        let header = parse_header(&data[..HEADER_SIZE])?;
        let body = &data[HEADER_SIZE..];
        if body.len() < header.length {
            return Err(ParcelError::Truncated {
                field: "packet_payload",
                needed: header.length,
                remaining: body.len(),
            });
        }
        if body.len() > header.length {
            return Err(ParcelError::TrailingBytes(body.len() - header.length));
        }

        Ok(Self {
            version: header.version,
            flags: header.flags,
            payload: body.to_vec(),
        })
    }
}

/// Validate a header slice of exactly `HEADER_SIZE` bytes
pub(crate) fn parse_header(mut src: &[u8]) -> Result<Header> {
    let mut magic = [0u8; 4];
    src.copy_to_slice(&mut magic);
    if magic != MAGIC_BYTES {
        warn!(?magic, "Rejected packet with invalid magic bytes");
        return Err(ParcelError::InvalidHeader);
    }

    let version = src.get_u8();
    if version != PARCEL_VERSION {
        warn!(version, "Rejected packet with unsupported version");
        return Err(ParcelError::UnsupportedVersion(version));
    }

    let flags = src.get_u8();
    if flags & !KNOWN_FLAGS != 0 {
        warn!(flags, "Rejected packet with unknown flags");
        return Err(ParcelError::InvalidHeader);
    }

    let length = src.get_u32() as usize;
    if length > MAX_PAYLOAD_SIZE {
        warn!(length, "Rejected oversized packet");
        return Err(ParcelError::OversizedPacket(length));
    }

    Ok(Header {
        version,
        flags,
        length,
    })
}
