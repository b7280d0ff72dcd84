//! Message decoding boundary.
//!
//! The tracker only needs a [`MessageDecoder`]: something that turns one
//! reassembled message into a [`DecodedMessage`], or nothing at all when the
//! payload is incomplete or invalid. [`SixBitDecoder`] is the built-in
//! implementation for the message types the tracker consumes.

use aistrack_core::{DecodedMessage, PositionReport, StaticReport};
use tracing::debug;

use crate::sentence::PayloadField;

/// Turns an assembled message into a decoded record.
///
/// Returning `None` means "no result" and is never an error.
pub trait MessageDecoder: Send + Sync {
    fn decode(&self, message: &str) -> Option<DecodedMessage>;
}

impl<F> MessageDecoder for F
where
    F: Fn(&str) -> Option<DecodedMessage> + Send + Sync,
{
    fn decode(&self, message: &str) -> Option<DecodedMessage> {
        self(message)
    }
}

/// Minimum payload length of a usable position report (through COG).
const POSITION_MIN_BITS: usize = 128;

/// Minimum payload length of a usable static report (through draught).
const STATIC_MIN_BITS: usize = 302;

/// Decoder for armoured AIS payloads (message types 1, 2, 3 and 5).
#[derive(Debug, Clone, Copy, Default)]
pub struct SixBitDecoder;

impl MessageDecoder for SixBitDecoder {
    fn decode(&self, message: &str) -> Option<DecodedMessage> {
        let bits = match Payload::from_message(message) {
            Ok(bits) => bits,
            Err(reason) => {
                debug!("Undecodable message {:?}: {}", message, reason);
                return None;
            }
        };
        decode_payload(&bits)
    }
}

fn decode_payload(bits: &Payload) -> Option<DecodedMessage> {
    if bits.len() < 38 {
        debug!("Payload too short: {} bits", bits.len());
        return None;
    }
    let message_type = bits.unsigned(0, 6) as u8;
    let mmsi = bits.unsigned(8, 30);

    match message_type {
        1..=3 if bits.len() >= POSITION_MIN_BITS => {
            Some(DecodedMessage::Position(PositionReport {
                message_type,
                mmsi,
                longitude: f64::from(bits.signed(61, 28)) / 600_000.0,
                latitude: f64::from(bits.signed(89, 27)) / 600_000.0,
                sog: f64::from(bits.unsigned(50, 10)) / 10.0,
                cog: f64::from(bits.unsigned(116, 12)) / 10.0,
            }))
        }
        5 if bits.len() >= STATIC_MIN_BITS => Some(DecodedMessage::Static(StaticReport {
            message_type,
            mmsi,
            name: bits.text(112, 20),
            type_and_cargo: Some(bits.unsigned(232, 8) as u8),
            dim_a: bits.unsigned(240, 9) as u16,
            dim_b: bits.unsigned(249, 9) as u16,
            dim_c: bits.unsigned(258, 6) as u16,
            dim_d: bits.unsigned(264, 6) as u16,
            draught: f64::from(bits.unsigned(294, 8)) / 10.0,
        })),
        1..=3 | 5 => {
            debug!(
                "Truncated type {} payload from {}: {} bits",
                message_type,
                mmsi,
                bits.len()
            );
            None
        }
        _ => Some(DecodedMessage::Other { message_type, mmsi }),
    }
}

/// De-armoured payload as six-bit symbols.
struct Payload {
    symbols: Vec<u8>,
    len: usize,
}

impl Payload {
    /// Concatenate the payloads of every sentence in a message.
    fn from_message(message: &str) -> Result<Self, String> {
        let mut symbols = Vec::new();
        let mut fill_bits = 0;

        for line in message.lines() {
            let field = PayloadField::parse(line).map_err(|e| e.to_string())?;
            for c in field.payload.chars() {
                symbols.push(dearmor(c).ok_or_else(|| format!("invalid payload character {:?}", c))?);
            }
            fill_bits = usize::from(field.fill_bits);
        }

        let len = (symbols.len() * 6).saturating_sub(fill_bits);
        Ok(Self { symbols, len })
    }

    fn len(&self) -> usize {
        self.len
    }

    fn bit(&self, index: usize) -> u32 {
        let symbol = self.symbols[index / 6];
        u32::from((symbol >> (5 - index % 6)) & 1)
    }

    /// Unsigned field of up to 32 bits.
    fn unsigned(&self, start: usize, width: usize) -> u32 {
        (start..start + width).fold(0, |acc, i| (acc << 1) | self.bit(i))
    }

    /// Two's complement field of up to 32 bits.
    fn signed(&self, start: usize, width: usize) -> i32 {
        let raw = self.unsigned(start, width);
        let shift = 32 - width as u32;
        ((raw << shift) as i32) >> shift
    }

    /// Six-bit ASCII text of `chars` characters, padding included.
    fn text(&self, start: usize, chars: usize) -> String {
        (0..chars)
            .map(|i| start + i * 6)
            .take_while(|&offset| offset + 6 <= self.len)
            .map(|offset| {
                let value = self.unsigned(offset, 6) as u8;
                if value < 32 {
                    char::from(value + 64)
                } else {
                    char::from(value)
                }
            })
            .collect()
    }
}

/// Armoured character to six-bit value.
fn dearmor(c: char) -> Option<u8> {
    let code = u8::try_from(u32::from(c)).ok()?;
    match code {
        48..=87 => Some(code - 48),
        96..=119 => Some(code - 56),
        _ => None,
    }
}
