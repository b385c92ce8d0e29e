use crate::core::packet::{parse_header, Packet, HEADER_SIZE};
use crate::error::{ParcelError, Result};
use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

/// Streaming codec that frames [`Packet`]s over a byte stream
#[derive(Debug, Default, Clone, Copy)]
pub struct PacketCodec;

impl Decoder for PacketCodec {
    type Item = Packet;
    type Error = ParcelError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Packet>> {
        if src.len() < HEADER_SIZE {
            return Ok(None);
        }

        let header = parse_header(&src[..HEADER_SIZE])?;
        let frame_len = HEADER_SIZE + header.length;
        if src.len() < frame_len {
            // Wait for the rest of the frame without consuming anything
            src.reserve(frame_len - src.len());
            return Ok(None);
        }

        let mut frame = src.split_to(frame_len);
        let payload = frame.split_off(HEADER_SIZE).to_vec();
        Ok(Some(Packet {
            version: header.version,
            flags: header.flags,
            payload,
        }))
    }
}

impl Encoder<Packet> for PacketCodec {
    type Error = ParcelError;

    fn encode(&mut self, item: Packet, dst: &mut BytesMut) -> Result<()> {
        item.write_into(dst)
    }
}
