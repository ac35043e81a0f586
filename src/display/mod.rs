mod pixel_buffer;
#[cfg(feature = "window")]
mod window;

pub use pixel_buffer::PixelBuffer;
#[cfg(feature = "window")]
pub use window::{
    Display, InputEvent, MouseButtonKind, RenderTarget, DEFAULT_HEIGHT, DEFAULT_WIDTH,
};
