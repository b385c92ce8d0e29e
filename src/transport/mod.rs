//! # Record Transport
//!
//! Async channel that moves [`CryptoInput`](crate::CryptoInput) records
//! between processes over any `AsyncRead + AsyncWrite` stream: a Unix socket,
//! a TCP connection, a pipe, or an in-memory duplex.
//!
//! Each record is encoded, optionally sealed with XChaCha20-Poly1305, and
//! framed as one [`Packet`](crate::core::packet::Packet).

pub mod channel;

pub use channel::InputChannel;
