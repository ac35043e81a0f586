//! Process-wide rendering configuration
//!
//! Read at the start of each affected call. Changing a flag while another
//! thread is drawing is not synchronized with that draw; callers own that.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::OnceLock;

use log::info;

static ANTI_ALIASING: AtomicBool = AtomicBool::new(true);
static TEXT_ANTI_ALIASING: AtomicBool = AtomicBool::new(true);
static TEXT_ENCODING: AtomicU8 = AtomicU8::new(TextEncoding::Utf8 as u8);
static CAPABILITIES: OnceLock<Capabilities> = OnceLock::new();

/// Encoding the text collaborator should assume for byte strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TextEncoding {
    Ansi = 0,
    Utf8 = 1,
    Utf16 = 2,
}

impl TextEncoding {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Ansi,
            2 => Self::Utf16,
            _ => Self::Utf8,
        }
    }
}

/// Shape edges and buffer transforms are anti-aliased (default: on)
pub fn anti_aliasing() -> bool {
    ANTI_ALIASING.load(Ordering::Relaxed)
}

pub fn set_anti_aliasing(enable: bool) {
    ANTI_ALIASING.store(enable, Ordering::Relaxed);
}

/// Passed through to the text collaborator (default: on)
pub fn text_anti_aliasing() -> bool {
    TEXT_ANTI_ALIASING.load(Ordering::Relaxed)
}

pub fn set_text_anti_aliasing(enable: bool) {
    TEXT_ANTI_ALIASING.store(enable, Ordering::Relaxed);
}

pub fn text_encoding() -> TextEncoding {
    TextEncoding::from_u8(TEXT_ENCODING.load(Ordering::Relaxed))
}

/// Set the text encoding, returning the previous one
pub fn set_text_encoding(encoding: TextEncoding) -> TextEncoding {
    TextEncoding::from_u8(TEXT_ENCODING.swap(encoding as u8, Ordering::Relaxed))
}

/// CPU features found by [`detect_capabilities`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub avx2: bool,
    pub sse41: bool,
}

/// Detect CPU features once. Call from the program entry point.
///
/// Rendering output never depends on the result.
pub fn detect_capabilities() -> Capabilities {
    *CAPABILITIES.get_or_init(|| {
        let caps = detect();
        info!(
            "rasterizer capabilities: avx2={} sse4.1={}",
            caps.avx2, caps.sse41
        );
        caps
    })
}

/// Detected capabilities, or the scalar baseline before detection
pub fn capabilities() -> Capabilities {
    CAPABILITIES.get().copied().unwrap_or_default()
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn detect() -> Capabilities {
    Capabilities {
        avx2: std::arch::is_x86_feature_detected!("avx2"),
        sse41: std::arch::is_x86_feature_detected!("sse4.1"),
    }
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
fn detect() -> Capabilities {
    Capabilities::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_encoding_swap() {
        let previous = set_text_encoding(TextEncoding::Utf16);
        assert_eq!(text_encoding(), TextEncoding::Utf16);
        set_text_encoding(previous);
    }

    #[test]
    fn test_detection_is_stable() {
        let first = detect_capabilities();
        assert_eq!(first, detect_capabilities());
        assert_eq!(first, capabilities());
    }
}
