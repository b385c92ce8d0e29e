//! # Core Parcel Components
//!
//! Low-level wire primitives, packet framing, and the streaming codec.
//!
//! This module provides the foundation for moving a
//! [`CryptoInput`](crate::CryptoInput) between processes: the primitive
//! encoding every field is built from, and the envelope that frames one
//! encoded record on a byte stream.
//!
//! ## Components
//! - **Wire**: Big-endian primitives, tagged optionals, the `WireFormat` trait
//! - **Packet**: Framed envelope with magic bytes, version and flags
//! - **Codec**: Tokio codec for framing over byte streams
//!
//! ## Wire Format
//! ```text
//! [Magic(4)] [Version(1)] [Flags(1)] [Length(4)] [Payload(N)]
//! ```
//!
//! ## Security
//! - Maximum packet size: 16MB (prevents memory exhaustion)
//! - Magic bytes prevent accidental misinterpretation
//! - Length validation before allocation

pub mod codec;
pub mod packet;
pub mod wire;
