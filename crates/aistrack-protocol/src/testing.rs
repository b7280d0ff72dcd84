//! Sentence builders for tests.
//!
//! Produces armoured AIVDM sentences with valid checksums so tests can feed
//! realistic traffic through the assembler and decoder.

use crate::sentence::checksum;

/// Accumulates payload bits and armours them.
#[derive(Debug, Default)]
pub struct PayloadBuilder {
    bits: Vec<bool>,
}

impl PayloadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unsigned(&mut self, value: u64, width: usize) -> &mut Self {
        for i in (0..width).rev() {
            self.bits.push(value.checked_shr(i as u32).unwrap_or(0) & 1 == 1);
        }
        self
    }

    pub fn signed(&mut self, value: i64, width: usize) -> &mut Self {
        let mask = if width == 64 { u64::MAX } else { (1u64 << width) - 1 };
        self.unsigned(value as u64 & mask, width)
    }

    /// Six-bit text, padded with `@` to `chars` characters.
    pub fn text(&mut self, text: &str, chars: usize) -> &mut Self {
        let padded = text.chars().chain(std::iter::repeat('@')).take(chars);
        for c in padded {
            let code = c.to_ascii_uppercase() as u64;
            let value = if code >= 64 { code - 64 } else { code };
            self.unsigned(value & 0x3f, 6);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Armoured payload and the number of fill bits.
    pub fn armor(&self) -> (String, u8) {
        let fill = (6 - self.bits.len() % 6) % 6;
        let payload = self
            .bits
            .chunks(6)
            .map(|chunk| {
                let value = chunk
                    .iter()
                    .chain(std::iter::repeat(&false))
                    .take(6)
                    .fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit));
                char::from(if value < 40 { value + 48 } else { value + 56 })
            })
            .collect();
        (payload, fill as u8)
    }
}

/// A complete `!AIVDM` sentence with checksum.
pub fn sentence(total: u8, index: u8, sequence: Option<u8>, payload: &str, fill: u8) -> String {
    let sequence = sequence.map(|s| s.to_string()).unwrap_or_default();
    let body = format!("!AIVDM,{},{},{},B,{},{}", total, index, sequence, payload, fill);
    format!("{}*{:02X}", body, checksum(&body))
}

/// Armoured 168-bit class A position report.
pub fn position_payload(message_type: u8, mmsi: u32, lat: f64, lon: f64, cog: f64, sog: f64) -> String {
    let mut builder = PayloadBuilder::new();
    builder
        .unsigned(u64::from(message_type), 6)
        .unsigned(0, 2)
        .unsigned(u64::from(mmsi), 30)
        .unsigned(0, 4)
        .signed(-128, 8)
        .unsigned((sog * 10.0).round() as u64, 10)
        .unsigned(0, 1)
        .signed((lon * 600_000.0).round() as i64, 28)
        .signed((lat * 600_000.0).round() as i64, 27)
        .unsigned((cog * 10.0).round() as u64, 12)
        .unsigned(511, 9)
        .unsigned(60, 6)
        .unsigned(0, 2)
        .unsigned(0, 3)
        .unsigned(0, 1)
        .unsigned(0, 19);
    builder.armor().0
}

/// Single-sentence position report.
pub fn position_sentence(message_type: u8, mmsi: u32, lat: f64, lon: f64, cog: f64, sog: f64) -> String {
    sentence(1, 1, None, &position_payload(message_type, mmsi, lat, lon, cog, sog), 0)
}

/// Type 5 static report split over two sentences, as transmitters do.
pub fn static_sentences(
    mmsi: u32,
    name: &str,
    dimensions: [u16; 4],
    draught: f64,
    type_and_cargo: u8,
) -> [String; 2] {
    let mut builder = PayloadBuilder::new();
    builder
        .unsigned(5, 6)
        .unsigned(0, 2)
        .unsigned(u64::from(mmsi), 30)
        .unsigned(0, 2)
        .unsigned(9_000_000, 30)
        .text("DABC", 7)
        .text(name, 20)
        .unsigned(u64::from(type_and_cargo), 8)
        .unsigned(u64::from(dimensions[0]), 9)
        .unsigned(u64::from(dimensions[1]), 9)
        .unsigned(u64::from(dimensions[2]), 6)
        .unsigned(u64::from(dimensions[3]), 6)
        .unsigned(1, 4)
        .unsigned(0, 4)
        .unsigned(0, 5)
        .unsigned(24, 5)
        .unsigned(60, 6)
        .unsigned((draught * 10.0).round() as u64, 8)
        .text("KIEL", 20)
        .unsigned(0, 1)
        .unsigned(0, 1);

    let (payload, fill) = builder.armor();
    let (first, second) = payload.split_at(60);
    [
        sentence(2, 1, Some(1), first, 0),
        sentence(2, 2, Some(1), second, fill),
    ]
}
