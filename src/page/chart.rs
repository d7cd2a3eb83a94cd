//! The attack chart image.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

/// Prefix of the data URI built from a chart payload.
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// The chart `<img>` element. Only its source is modelled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartImage {
    src: String,
}

/// Size details read from a decoded PNG payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub bytes: usize,
}

impl ChartImage {
    /// Current image source.
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Replace the source with a data URI for the given base64 payload.
    ///
    /// The payload is used verbatim; it is not validated here.
    pub fn set_base64_png(&mut self, payload: &str) {
        self.src = format!("{}{}", PNG_DATA_URI_PREFIX, payload);
    }

    /// Base64 payload of the current source, if it is a PNG data URI.
    pub fn payload(&self) -> Option<&str> {
        self.src.strip_prefix(PNG_DATA_URI_PREFIX)
    }

    /// Decode the payload and read the PNG header.
    ///
    /// Returns `None` if there is no payload or it is not a decodable PNG.
    pub fn info(&self) -> Option<ImageInfo> {
        let payload = self.payload().filter(|p| !p.is_empty())?;
        let bytes = STANDARD.decode(payload).ok()?;

        // Signature, then the IHDR chunk: length(4) type(4) width(4) height(4)
        if bytes.len() < 24 || bytes[..8] != PNG_SIGNATURE || &bytes[12..16] != b"IHDR" {
            return None;
        }
        let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
        let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);

        Some(ImageInfo {
            width,
            height,
            bytes: bytes.len(),
        })
    }
}
