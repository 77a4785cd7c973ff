//! FITS header parsing.
//!
//! A header is a sequence of 80-byte ASCII cards packed into 2880-byte
//! blocks and terminated by an `END` card. Value cards carry `= ` in columns
//! 9-10; everything after an unquoted `/` is a comment.

use crate::error::{FitsError, FitsResult};

/// FITS logical record length.
pub const BLOCK_SIZE: usize = 2880;

/// Header card length.
pub const CARD_SIZE: usize = 80;

/// One keyword/value pair. Commentary cards have no value.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub keyword: String,
    pub value: Option<String>,
}

/// A parsed HDU header.
#[derive(Debug, Clone, Default)]
pub struct Header {
    cards: Vec<Card>,
    /// Bytes occupied by the header, including block padding.
    byte_len: usize,
}

impl Header {
    /// Parse the header starting at the beginning of `data`.
    ///
    /// `hdu` is only used for error reporting.
    pub fn parse(data: &[u8], hdu: usize) -> FitsResult<Self> {
        let mut cards = Vec::new();

        for (i, raw) in data.chunks(CARD_SIZE).enumerate() {
            if raw.len() < CARD_SIZE {
                break;
            }

            let card = parse_card(raw);
            if card.keyword == "END" {
                let used = (i + 1) * CARD_SIZE;
                let byte_len = used.div_ceil(BLOCK_SIZE) * BLOCK_SIZE;
                if byte_len > data.len() {
                    return Err(FitsError::UnexpectedEof { hdu });
                }
                return Ok(Self { cards, byte_len });
            }

            cards.push(card);
        }

        Err(FitsError::UnexpectedEof { hdu })
    }

    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Raw value text of the first card with `keyword`.
    pub fn raw(&self, keyword: &str) -> Option<&str> {
        self.cards
            .iter()
            .find(|c| c.keyword == keyword)
            .and_then(|c| c.value.as_deref())
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.cards.iter().any(|c| c.keyword == keyword)
    }

    pub fn int(&self, keyword: &str, hdu: usize) -> FitsResult<Option<i64>> {
        self.raw(keyword)
            .map(|v| parse_int(v).ok_or_else(|| invalid(hdu, keyword, v)))
            .transpose()
    }

    pub fn require_int(&self, keyword: &str, hdu: usize) -> FitsResult<i64> {
        self.int(keyword, hdu)?
            .ok_or_else(|| FitsError::MissingKeyword {
                hdu,
                keyword: keyword.to_string(),
            })
    }

    pub fn float(&self, keyword: &str, hdu: usize) -> FitsResult<Option<f64>> {
        self.raw(keyword)
            .map(|v| parse_float(v).ok_or_else(|| invalid(hdu, keyword, v)))
            .transpose()
    }

    pub fn logical(&self, keyword: &str, hdu: usize) -> FitsResult<Option<bool>> {
        self.raw(keyword)
            .map(|v| match v {
                "T" => Ok(true),
                "F" => Ok(false),
                _ => Err(invalid(hdu, keyword, v)),
            })
            .transpose()
    }

    /// String value with quotes removed and trailing blanks trimmed.
    pub fn string(&self, keyword: &str) -> Option<String> {
        self.raw(keyword).and_then(parse_string)
    }
}

fn invalid(hdu: usize, keyword: &str, value: &str) -> FitsError {
    FitsError::InvalidValue {
        hdu,
        keyword: keyword.to_string(),
        value: value.to_string(),
    }
}

fn parse_card(raw: &[u8]) -> Card {
    let text = String::from_utf8_lossy(raw);
    let keyword = text.get(..8).unwrap_or(&text).trim_end().to_string();

    let value = match text.get(8..10) {
        Some("= ") => text.get(10..).map(strip_comment),
        _ => None,
    };

    Card { keyword, value }
}

/// Drop a trailing `/ comment`, honouring quoted strings (`''` is an
/// escaped quote).
fn strip_comment(field: &str) -> String {
    let trimmed = field.trim_start();
    if trimmed.starts_with('\'') {
        let bytes = trimmed.as_bytes();
        let mut i = 1;
        while i < bytes.len() {
            if bytes[i] == b'\'' {
                if bytes.get(i + 1) == Some(&b'\'') {
                    i += 2;
                    continue;
                }
                return trimmed[..=i].to_string();
            }
            i += 1;
        }
        return trimmed.trim_end().to_string();
    }

    match trimmed.find('/') {
        Some(pos) => trimmed[..pos].trim().to_string(),
        None => trimmed.trim().to_string(),
    }
}

fn parse_int(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

/// FITS floats may use `D` as the exponent marker.
fn parse_float(value: &str) -> Option<f64> {
    value.trim().replace(['D', 'd'], "E").parse().ok()
}

fn parse_string(value: &str) -> Option<String> {
    let inner = value.strip_prefix('\'')?.strip_suffix('\'')?;
    Some(inner.replace("''", "'").trim_end().to_string())
}
