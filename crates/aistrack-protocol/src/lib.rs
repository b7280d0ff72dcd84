//! # aistrack-protocol
//!
//! NMEA 0183 AIS sentence handling.
//!
//! This crate turns raw datagram text into decoded messages:
//! - [`framing`] splits datagrams into sentence lines
//! - [`sentence`] reads fragment headers, payloads and checksums
//! - [`assembler`] reassembles multi-fragment messages
//! - [`decoder`] defines the decoding boundary and the six-bit decoder

pub mod assembler;
pub mod decoder;
pub mod framing;
pub mod sentence;

#[cfg(any(test, feature = "test"))]
pub mod testing;

pub use assembler::SentenceAssembler;
pub use decoder::{MessageDecoder, SixBitDecoder};
pub use framing::LineBuffer;
pub use sentence::{FragmentHeader, PayloadField, SentenceError};
