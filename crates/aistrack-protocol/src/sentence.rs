//! NMEA encapsulated sentence fields.
//!
//! An AIS sentence looks like:
//!
//! ```text
//! !AIVDM,2,1,3,B,55P5TL01VIaAL@7WKO@mBplU@<PDhh000000001S;AJ::4A80?4i@E53,0*3E
//!        | |   |  |                                                         | |
//!        | |   |  payload                                                  fill checksum
//!        | |   channel
//!        | fragment number
//!        fragment count
//! ```

use thiserror::Error;

/// First character of an encapsulated (AIS) sentence.
pub const SENTENCE_START: char = '!';

const FIELD_COUNT: usize = 1;
const FIELD_NUMBER: usize = 2;
const FIELD_PAYLOAD: usize = 5;
const FIELD_FILL: usize = 6;

/// Errors that can occur while reading sentence fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SentenceError {
    /// The line does not start with `!`.
    #[error("Not an encapsulated sentence")]
    NotASentence,

    /// A required field is absent.
    #[error("Missing {0} field")]
    MissingField(&'static str),

    /// Fragment count is not 1, 2 or 3.
    #[error("Invalid fragment count {0:?}")]
    InvalidFragmentCount(String),

    /// Fragment number is not 1, 2 or 3.
    #[error("Invalid fragment number {0:?}")]
    InvalidFragmentNumber(String),

    /// Fill bit field is not a digit between 0 and 5.
    #[error("Invalid fill bits {0:?}")]
    InvalidFillBits(String),

    /// Checksum does not match the sentence body.
    #[error("Checksum mismatch: expected {expected:02X}, computed {computed:02X}")]
    ChecksumMismatch { expected: u8, computed: u8 },
}

/// Fragment position of one sentence within a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentHeader<'a> {
    /// Number of fragments in the message (1..=3).
    pub total: u8,
    /// This fragment's number (1..=3).
    pub index: u8,
    /// The complete sentence line.
    pub raw: &'a str,
}

impl<'a> FragmentHeader<'a> {
    /// Parse the fragment count and number of a sentence.
    pub fn parse(line: &'a str) -> Result<Self, SentenceError> {
        if !line.starts_with(SENTENCE_START) {
            return Err(SentenceError::NotASentence);
        }

        let mut fields = line.split(',');
        let count = fields
            .nth(FIELD_COUNT)
            .ok_or(SentenceError::MissingField("fragment count"))?;
        let number = fields
            .next()
            .ok_or(SentenceError::MissingField("fragment number"))?;

        let total = parse_fragment_field(count)
            .ok_or_else(|| SentenceError::InvalidFragmentCount(count.to_string()))?;
        let index = parse_fragment_field(number)
            .ok_or_else(|| SentenceError::InvalidFragmentNumber(number.to_string()))?;

        Ok(Self {
            total,
            index,
            raw: line,
        })
    }
}

fn parse_fragment_field(field: &str) -> Option<u8> {
    match field.trim().parse::<u8>() {
        Ok(value @ 1..=3) => Some(value),
        _ => None,
    }
}

/// Armoured payload and trailing fill bits of one sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadField<'a> {
    pub payload: &'a str,
    pub fill_bits: u8,
}

impl<'a> PayloadField<'a> {
    /// Extract the payload of a sentence, verifying its checksum if present.
    pub fn parse(line: &'a str) -> Result<Self, SentenceError> {
        if !line.starts_with(SENTENCE_START) {
            return Err(SentenceError::NotASentence);
        }
        verify_checksum(line)?;

        let body = line.split('*').next().unwrap_or(line);
        let mut fields = body.split(',');
        let payload = fields
            .nth(FIELD_PAYLOAD)
            .ok_or(SentenceError::MissingField("payload"))?;
        let fill = fields.next().unwrap_or("0");

        let fill_bits = match fill.trim() {
            "" => 0,
            text => match text.parse::<u8>() {
                Ok(bits @ 0..=5) => bits,
                _ => return Err(SentenceError::InvalidFillBits(text.to_string())),
            },
        };

        Ok(Self { payload, fill_bits })
    }
}

/// XOR of every byte between the leading `!` and the `*`.
pub fn checksum(line: &str) -> u8 {
    let body = line.strip_prefix(SENTENCE_START).unwrap_or(line);
    let body = body.split('*').next().unwrap_or(body);
    body.bytes().fold(0, |acc, b| acc ^ b)
}

/// Check the `*hh` suffix. Sentences without one are accepted.
pub fn verify_checksum(line: &str) -> Result<(), SentenceError> {
    let Some((_, suffix)) = line.rsplit_once('*') else {
        return Ok(());
    };
    let hex = suffix.trim().get(..2).unwrap_or("");
    let Ok(expected) = u8::from_str_radix(hex, 16) else {
        // An unreadable checksum cannot match anything
        return Err(SentenceError::ChecksumMismatch {
            expected: 0,
            computed: checksum(line),
        });
    };

    let computed = checksum(line);
    if expected == computed {
        Ok(())
    } else {
        Err(SentenceError::ChecksumMismatch { expected, computed })
    }
}
