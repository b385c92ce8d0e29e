//! Integration tests for the async record channel
//!
//! Runs sender and receiver over in-memory duplex streams.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use crypto_input_parcel::config::ParcelConfig;
use crypto_input_parcel::core::codec::PacketCodec;
use crypto_input_parcel::core::packet::{Packet, FLAG_SEALED};
use crypto_input_parcel::error::ParcelError;
use crypto_input_parcel::input::PassphraseMap;
use crypto_input_parcel::utils::crypto::Crypto;
use crypto_input_parcel::{CryptoInput, InputChannel, Passphrase, SignatureTime};
use futures::SinkExt;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio_util::codec::FramedWrite;

fn sample_input() -> CryptoInput {
    let mut passphrases = PassphraseMap::new();
    passphrases.insert(0xDEAD_BEEF, Passphrase::new("export me"));
    let mut input = CryptoInput::with_passphrases(passphrases);
    input.add_crypto_data(vec![0x11; 20], vec![0x22; 32]);
    input
}

#[tokio::test]
async fn test_sealed_roundtrip() {
    let key = Crypto::generate_key().unwrap();
    let (a, b) = tokio::io::duplex(8192);
    let mut tx = InputChannel::sealed(a, Crypto::new(&key));
    let mut rx = InputChannel::sealed(b, Crypto::new(&key));

    let input = sample_input();
    tx.send(&input).await.unwrap();
    assert_eq!(rx.recv().await.unwrap(), input);
}

#[tokio::test]
async fn test_sealed_payload_hides_passphrase() {
    let (a, b) = tokio::io::duplex(8192);
    let mut tx = InputChannel::sealed(a, Crypto::new(&[7u8; 32]));
    tx.send(&CryptoInput::with_passphrase(Passphrase::new("visible?")))
        .await
        .unwrap();
    drop(tx);

    let mut raw = Vec::new();
    let mut b = b;
    tokio::io::AsyncReadExt::read_to_end(&mut b, &mut raw)
        .await
        .unwrap();
    let packet = Packet::from_bytes(&raw).unwrap();
    assert!(packet.is_sealed());
    assert!(!raw.windows(8).any(|w| w == b"visible?"));
}

#[tokio::test]
async fn test_multiple_records_in_order() {
    let (a, b) = tokio::io::duplex(64 * 1024);
    let mut tx = InputChannel::new(a);
    let mut rx = InputChannel::new(b);

    let inputs: Vec<CryptoInput> = (0..10)
        .map(|i| CryptoInput::with_signature_time(Some(SignatureTime::from_millis(i))))
        .collect();
    for input in &inputs {
        tx.send(input).await.unwrap();
    }
    for expected in &inputs {
        assert_eq!(&rx.recv().await.unwrap(), expected);
    }
}

#[tokio::test]
async fn test_wrong_key_fails() {
    let (a, b) = tokio::io::duplex(8192);
    let mut tx = InputChannel::sealed(a, Crypto::new(&[1u8; 32]));
    let mut rx = InputChannel::sealed(b, Crypto::new(&[2u8; 32]));

    tx.send(&sample_input()).await.unwrap();
    assert!(matches!(
        rx.recv().await,
        Err(ParcelError::DecryptionFailure)
    ));
}

#[tokio::test]
async fn test_sealing_mismatch_rejected() {
    let (a, b) = tokio::io::duplex(8192);
    let mut tx = InputChannel::new(a);
    let mut rx = InputChannel::sealed(b, Crypto::new(&[1u8; 32]));
    tx.send(&sample_input()).await.unwrap();
    assert!(matches!(rx.recv().await, Err(ParcelError::SecurityError(_))));

    let (a, b) = tokio::io::duplex(8192);
    let mut tx = InputChannel::sealed(a, Crypto::new(&[1u8; 32]));
    let mut rx = InputChannel::new(b);
    tx.send(&sample_input()).await.unwrap();
    assert!(matches!(rx.recv().await, Err(ParcelError::SecurityError(_))));
}

#[tokio::test]
async fn test_read_timeout() {
    let (_a, b) = tokio::io::duplex(64);
    let mut rx = InputChannel::new(b).with_read_timeout(Duration::from_millis(20));
    assert!(matches!(rx.recv().await, Err(ParcelError::Timeout)));
}

#[tokio::test]
async fn test_malformed_record_surfaces_decode_error() {
    let (a, b) = tokio::io::duplex(8192);
    let mut writer = FramedWrite::new(a, PacketCodec);
    // Signature flag set but no timestamp follows
    writer.send(Packet::new(vec![1], 0)).await.unwrap();

    let mut rx = InputChannel::new(b);
    assert!(matches!(
        rx.recv().await,
        Err(ParcelError::Truncated {
            field: "signature_time",
            ..
        })
    ));
}

#[tokio::test]
async fn test_tampered_sealed_packet_rejected() {
    let (a, b) = tokio::io::duplex(8192);
    let crypto = Crypto::new(&[3u8; 32]);
    let mut sealed = crypto.seal(&sample_input().encode().unwrap()).unwrap();
    sealed[30] ^= 0xFF;

    let mut writer = FramedWrite::new(a, PacketCodec);
    writer.send(Packet::new(sealed, FLAG_SEALED)).await.unwrap();

    let mut rx = InputChannel::sealed(b, crypto);
    assert!(matches!(
        rx.recv().await,
        Err(ParcelError::DecryptionFailure)
    ));
}

#[tokio::test]
async fn test_garbage_stream_rejected() {
    let (mut a, b) = tokio::io::duplex(64);
    a.write_all(b"GET / HTTP/1.1\r\n\r\n").await.unwrap();

    let mut rx = InputChannel::new(b);
    assert!(matches!(rx.recv().await, Err(ParcelError::InvalidHeader)));
}

#[tokio::test]
async fn test_from_config_applies_limits() {
    let config = ParcelConfig::default_with_overrides(|c| {
        c.transport.seal_payloads = false;
        c.limits.max_map_entries = 1;
    });

    let (a, b) = tokio::io::duplex(8192);
    let mut tx = InputChannel::new(a);
    let mut rx = InputChannel::from_config(b, &config, None).unwrap();
    assert!(!rx.is_sealed());

    let mut input = CryptoInput::new();
    input.add_crypto_data(vec![1], vec![1]);
    input.add_crypto_data(vec![2], vec![2]);
    tx.send(&input).await.unwrap();
    assert!(matches!(
        rx.recv().await,
        Err(ParcelError::LimitExceeded { .. })
    ));
}
