//! Image loading through a pluggable decoder

use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::display::PixelBuffer;
use crate::error::{RasterError, Result};

/// Turns encoded bytes into pixels; `None` for data it cannot read
pub trait ImageDecoder {
    fn decode(&self, bytes: &[u8]) -> Option<PixelBuffer>;
}

/// Read `path` and decode it
pub fn load_image(path: impl AsRef<Path>, decoder: &dyn ImageDecoder) -> Result<PixelBuffer> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    debug!("decoding {} ({} bytes)", path.display(), bytes.len());
    decoder.decode(&bytes).ok_or_else(|| {
        warn!("could not decode image {}", path.display());
        RasterError::Decode(path.display().to_string())
    })
}

/// The raw wire format behind a header of little-endian `u32` width and
/// height
#[derive(Debug, Clone, Copy, Default)]
pub struct RawArgbDecoder;

impl RawArgbDecoder {
    const HEADER_LEN: usize = 8;

    pub fn encode(buffer: &PixelBuffer) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::HEADER_LEN + buffer.len() * 4);
        out.extend_from_slice(&buffer.width().to_le_bytes());
        out.extend_from_slice(&buffer.height().to_le_bytes());
        out.extend_from_slice(&buffer.to_argb_bytes());
        out
    }
}

impl ImageDecoder for RawArgbDecoder {
    fn decode(&self, bytes: &[u8]) -> Option<PixelBuffer> {
        if bytes.len() < Self::HEADER_LEN {
            return None;
        }
        let (header, body) = bytes.split_at(Self::HEADER_LEN);
        let width = u32::from_le_bytes(header[0..4].try_into().ok()?);
        let height = u32::from_le_bytes(header[4..8].try_into().ok()?);
        PixelBuffer::from_argb_bytes(width, height, body).ok()
    }
}
