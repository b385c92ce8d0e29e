//! Integration tests for the streaming packet codec
//!
//! These tests validate buffer handling of the packet codec: partial frames,
//! concatenated frames, and exact space reservation.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use bytes::BytesMut;
use crypto_input_parcel::config::MAGIC_BYTES;
use crypto_input_parcel::core::codec::PacketCodec;
use crypto_input_parcel::core::packet::{Packet, HEADER_SIZE};
use crypto_input_parcel::CryptoInput;
use tokio_util::codec::{Decoder, Encoder};

#[test]
fn test_codec_decode_consumes_frame() {
    let mut codec = PacketCodec;
    let payload = CryptoInput::new().encode().unwrap();
    let bytes = Packet::new(payload.clone(), 0).to_bytes().unwrap();

    let mut buffer = BytesMut::from(&bytes[..]);
    let decoded = codec
        .decode(&mut buffer)
        .expect("Failed to decode")
        .expect("Should have packet");

    assert_eq!(decoded.payload, payload);
    assert_eq!(buffer.len(), 0);
}

#[test]
fn test_codec_partial_decode_preserves_buffer() {
    let mut codec = PacketCodec;

    // Only magic + version
    let mut buffer = BytesMut::from(&MAGIC_BYTES[..]);
    buffer.extend_from_slice(&[0x01]);

    let result = codec.decode(&mut buffer).expect("Decode should not error");
    assert!(result.is_none());
    assert_eq!(buffer.len(), 5);
}

#[test]
fn test_codec_partial_payload_waits() {
    let mut codec = PacketCodec;
    let bytes = Packet::new(vec![7; 100], 0).to_bytes().unwrap();

    let mut buffer = BytesMut::from(&bytes[..50]);
    assert!(codec.decode(&mut buffer).unwrap().is_none());
    assert_eq!(buffer.len(), 50);

    buffer.extend_from_slice(&bytes[50..]);
    let packet = codec.decode(&mut buffer).unwrap().expect("complete frame");
    assert_eq!(packet.payload, vec![7; 100]);
}

#[test]
fn test_codec_encode_exact_size() {
    let mut codec = PacketCodec;
    let mut buffer = BytesMut::new();

    codec
        .encode(Packet::new(vec![0u8; 100], 0), &mut buffer)
        .expect("Failed to encode");

    assert_eq!(buffer.len(), HEADER_SIZE + 100);
}

#[test]
fn test_codec_multiple_packets_in_buffer() {
    let mut codec = PacketCodec;

    let mut buffer = BytesMut::new();
    buffer.extend_from_slice(&Packet::new(vec![1, 2, 3], 0).to_bytes().unwrap());
    buffer.extend_from_slice(&Packet::new(vec![4, 5, 6], 0).to_bytes().unwrap());

    let first = codec.decode(&mut buffer).unwrap().expect("first packet");
    assert_eq!(first.payload, vec![1, 2, 3]);

    let second = codec.decode(&mut buffer).unwrap().expect("second packet");
    assert_eq!(second.payload, vec![4, 5, 6]);

    assert_eq!(buffer.len(), 0);
}
