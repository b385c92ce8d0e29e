//! Integration tests for the crypto input record
//!
//! Covers constructor contracts, mutator semantics, and lossless encoding.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use crypto_input_parcel::error::ParcelError;
use crypto_input_parcel::input::{CryptoDataMap, PassphraseMap};
use crypto_input_parcel::{CryptoInput, Passphrase, ProxyDescriptor, ProxyKind, SignatureTime};
use std::collections::BTreeMap;

fn roundtrip(input: &CryptoInput) -> CryptoInput {
    let bytes = input.encode().expect("encode");
    CryptoInput::from_bytes(&bytes).expect("decode")
}

fn tor_proxy() -> ProxyDescriptor {
    ProxyDescriptor::new(ProxyKind::Socks, "127.0.0.1", 9050).expect("valid proxy")
}

#[test]
fn test_every_constructor_roundtrips() {
    let mut passphrases = PassphraseMap::new();
    passphrases.insert(0x1234_5678_9ABC_DEF0, Passphrase::new("first"));
    passphrases.insert(u64::MAX, Passphrase::empty());

    let time = Some(SignatureTime::from_millis(1_425_000_000_000));
    let inputs = vec![
        CryptoInput::new(),
        CryptoInput::with_signature_time(time),
        CryptoInput::with_signature_time(None),
        CryptoInput::with_signature_time_and_passphrase(time, Passphrase::new("pw")),
        CryptoInput::with_passphrase(Passphrase::new("äöü passphrase")),
        CryptoInput::with_passphrases(passphrases),
        CryptoInput::with_signature_time_and_cache(time, false),
        CryptoInput::with_cache_passphrase(false),
        CryptoInput::with_proxy(tor_proxy()),
    ];

    for input in &inputs {
        assert_eq!(&roundtrip(input), input, "roundtrip failed for {input}");
    }
}

#[test]
fn test_mutated_record_roundtrips() {
    let mut input = CryptoInput::with_signature_time(None);
    input.set_proxy(tor_proxy());
    input.set_signature_time(SignatureTime::from_millis(-5));
    input.set_passphrase(Some(Passphrase::new("later")));
    input.set_cache_passphrase(false);
    input.add_crypto_data(vec![0u8; 32], vec![1u8; 256]);
    input.add_crypto_data_map(vec![(b"session".to_vec(), b"key".to_vec())]);
    input.add_crypto_data(Vec::new(), Vec::new());

    let decoded = roundtrip(&input);
    assert_eq!(decoded, input);
    assert_eq!(decoded.signature_time(), Some(SignatureTime::from_millis(-5)));
    assert_eq!(decoded.crypto_data().len(), 3);
}

#[test]
fn test_absent_time_defaults_to_now() {
    let before = SignatureTime::now();
    let input = CryptoInput::with_signature_time(None);
    let after = SignatureTime::now();

    let time = input.signature_time().expect("time resolved");
    assert!(input.has_signature());
    assert!(before <= time && time <= after);

    let cached = CryptoInput::with_signature_time_and_cache(None, true);
    assert!(cached.signature_time().is_some());

    let with_pw = CryptoInput::with_signature_time_and_passphrase(None, Passphrase::empty());
    assert!(with_pw.signature_time().is_some());
    assert!(with_pw.has_passphrase());
}

#[test]
fn test_add_crypto_data_overwrites_same_key() {
    let mut input = CryptoInput::new();
    input.add_crypto_data(b"k".to_vec(), b"v1".to_vec());
    input.add_crypto_data(b"k".to_vec(), b"v2".to_vec());

    assert_eq!(input.crypto_data().len(), 1);
    assert_eq!(input.crypto_data().get(b"k".as_slice()), Some(&b"v2".to_vec()));
}

#[test]
fn test_bulk_merge_incoming_wins() {
    let mut input = CryptoInput::new();
    input.add_crypto_data(b"a".to_vec(), vec![0]);

    let mut incoming = CryptoDataMap::new();
    incoming.insert(b"a".to_vec(), vec![1]);
    incoming.insert(b"b".to_vec(), vec![2]);
    input.add_crypto_data_map(incoming);

    let expected: BTreeMap<Vec<u8>, Vec<u8>> =
        [(b"a".to_vec(), vec![1]), (b"b".to_vec(), vec![2])].into_iter().collect();
    assert_eq!(input.crypto_data(), &expected);
}

#[test]
fn test_truncated_after_signature_flag_fails() {
    for _ in 0..3 {
        match CryptoInput::from_bytes(&[1]) {
            Err(ParcelError::Truncated {
                field, remaining, ..
            }) => {
                assert_eq!(field, "signature_time");
                assert_eq!(remaining, 0);
            }
            other => panic!("expected truncation, got {other:?}"),
        }
    }
}

#[test]
fn test_absent_passphrase_map_is_not_empty_map() {
    let empty = CryptoInput::new();
    let bytes = empty.encode().unwrap();
    assert_eq!(*bytes.last().unwrap(), 0, "passphrase map tag should be absent");
    assert!(roundtrip(&empty).passphrases().is_none());

    let with_empty_map = CryptoInput::with_passphrases(PassphraseMap::new());
    let decoded = roundtrip(&with_empty_map);
    assert_eq!(decoded.passphrases().map(|m| m.len()), Some(0));
    assert_ne!(decoded, empty);
}

#[test]
fn test_has_passphrase_tracks_field() {
    let mut input = CryptoInput::new();
    assert!(!input.has_passphrase());
    input.set_passphrase(Some(Passphrase::empty()));
    assert!(input.has_passphrase());
    input.set_passphrase(None);
    assert!(!input.has_passphrase());
}

#[test]
fn test_set_proxy_overwrites() {
    let mut input = CryptoInput::with_proxy(tor_proxy());
    let http = ProxyDescriptor::new(ProxyKind::Http, "proxy.example", 3128).unwrap();
    input.set_proxy(http.clone());
    assert_eq!(roundtrip(&input).proxy(), Some(&http));
}

#[test]
fn test_encoding_is_deterministic() {
    let build = |order: &[u8]| {
        let mut input = CryptoInput::new();
        for &k in order {
            input.add_crypto_data(vec![k], vec![k, k]);
        }
        input.encode().unwrap()
    };
    assert_eq!(build(&[3, 1, 2]), build(&[1, 2, 3]));
}

#[test]
fn test_signature_time_without_signature_is_dropped_on_roundtrip() {
    let mut input = CryptoInput::new();
    input.set_signature_time(SignatureTime::from_millis(1_425_000_000_000));
    assert!(!input.has_signature());
    assert_eq!(
        input.signature_time(),
        Some(SignatureTime::from_millis(1_425_000_000_000))
    );

    // Only has_signature gates the timestamp on the wire
    let decoded = roundtrip(&input);
    assert!(!decoded.has_signature());
    assert_eq!(decoded.signature_time(), None);
    assert_ne!(decoded, input);
    assert_eq!(decoded, CryptoInput::new());

    // A signed record keeps its replaced time
    let mut signed = CryptoInput::with_signature_time(None);
    signed.set_signature_time(SignatureTime::from_millis(7));
    assert_eq!(
        roundtrip(&signed).signature_time(),
        Some(SignatureTime::from_millis(7))
    );
}

#[test]
fn test_display_without_signature_time() {
    assert_eq!(CryptoInput::new().to_string(), "CryptoInput: { null 0 hashes }");

    let mut input = CryptoInput::with_passphrases(PassphraseMap::new());
    input.add_crypto_data(vec![1], vec![2]);
    input.add_crypto_data(vec![3], vec![4]);
    assert_eq!(input.to_string(), "CryptoInput: { null passphrases 2 hashes }");
}
