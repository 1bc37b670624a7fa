//! Payload text encodings.
//!
//! A deployment picks exactly one [`Encoding`]; records carry its tag so a
//! mismatch is caught instead of being decoded with the wrong codec.

use std::fmt;
use std::io::{self, Read, Write};
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    Base64,
    Hex,
    #[default]
    ZlibBase64,
    ZlibHex,
}

impl Encoding {
    pub const ALL: [Encoding; 4] = [Self::Base64, Self::Hex, Self::ZlibBase64, Self::ZlibHex];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Base64 => "base64",
            Self::Hex => "hex",
            Self::ZlibBase64 => "zlib-base64",
            Self::ZlibHex => "zlib-hex",
        }
    }

    pub fn is_compressed(self) -> bool {
        matches!(self, Self::ZlibBase64 | Self::ZlibHex)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown payload encoding: {0}")]
pub struct ParseEncodingError(pub String);

impl FromStr for Encoding {
    type Err = ParseEncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseEncodingError(s.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid hex payload: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("zlib stream failed: {0}")]
    Zlib(#[source] io::Error),

    #[error("payload decodes to more than {limit} bytes")]
    TooLarge { limit: u64 },
}

/// An [`Encoding`] together with the zlib level used by compressed variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Codec {
    encoding: Encoding,
    level: u32,
    max_decoded: Option<u64>,
}

impl Default for Codec {
    fn default() -> Self {
        Self::new(Encoding::default())
    }
}

impl Codec {
    pub fn new(encoding: Encoding) -> Self {
        Self {
            encoding,
            level: 9,
            max_decoded: None,
        }
    }

    pub fn level(mut self, level: u32) -> Self {
        self.level = level.min(9);
        self
    }

    /// Refuse to decode payloads longer than `limit` bytes.
    pub fn max_decoded(mut self, limit: u64) -> Self {
        self.max_decoded = Some(limit);
        self
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Upper bound on the encoded text length for a `raw_len`-byte payload.
    ///
    /// Compressed variants allow for incompressible input, which deflate
    /// grows by a few bytes per stored block plus the zlib header and trailer.
    pub fn max_encoded_len(&self, raw_len: u64) -> u64 {
        let bytes = if self.encoding.is_compressed() {
            raw_len.saturating_add(raw_len / 16).saturating_add(128)
        } else {
            raw_len
        };

        match self.encoding {
            Encoding::Base64 | Encoding::ZlibBase64 => bytes.div_ceil(3).saturating_mul(4),
            Encoding::Hex | Encoding::ZlibHex => bytes.saturating_mul(2),
        }
    }

    pub fn encode(&self, raw: &[u8]) -> Result<String, CodecError> {
        let compressed;
        let bytes = if self.encoding.is_compressed() {
            compressed = deflate(raw, self.level)?;
            &compressed[..]
        } else {
            raw
        };

        Ok(match self.encoding {
            Encoding::Base64 | Encoding::ZlibBase64 => STANDARD.encode(bytes),
            Encoding::Hex | Encoding::ZlibHex => hex::encode(bytes),
        })
    }

    pub fn decode(&self, text: &str) -> Result<Vec<u8>, CodecError> {
        let text = text.trim();
        let bytes = match self.encoding {
            Encoding::Base64 | Encoding::ZlibBase64 => STANDARD.decode(text)?,
            Encoding::Hex | Encoding::ZlibHex => hex::decode(text)?,
        };

        let limit = self.max_decoded.unwrap_or(u64::MAX);
        let raw = if self.encoding.is_compressed() {
            inflate(&bytes, limit)?
        } else {
            bytes
        };

        if raw.len() as u64 > limit {
            return Err(CodecError::TooLarge { limit });
        }
        Ok(raw)
    }
}

fn deflate(raw: &[u8], level: u32) -> Result<Vec<u8>, CodecError> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(raw.len() / 2), Compression::new(level));
    encoder.write_all(raw).map_err(CodecError::Zlib)?;
    encoder.finish().map_err(CodecError::Zlib)
}

/// Inflate at most one byte past `limit`, so the caller can tell an overrun apart.
fn inflate(compressed: &[u8], limit: u64) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::with_capacity(compressed.len().saturating_mul(2));
    ZlibDecoder::new(compressed)
        .take(limit.saturating_add(1))
        .read_to_end(&mut out)
        .map_err(CodecError::Zlib)?;
    Ok(out)
}
