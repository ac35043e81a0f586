use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton;
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect as SdlRect;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;

use super::PixelBuffer;
use crate::geometry::PixelRect;
use crate::transform;

pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;

/// An SDL window that shows pixel buffers
pub struct Display {
    canvas: Canvas<Window>,
    event_pump: EventPump,
    width: u32,
    height: u32,
}

/// Streaming texture the buffer is uploaded into. Pixels are ARGB words, so
/// the texture format is ARGB8888.
pub struct RenderTarget<'a> {
    texture: Texture<'a>,
    width: u32,
    height: u32,
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Quit,
    KeyDown(Keycode),
    MouseDown {
        x: i32,
        y: i32,
        button: MouseButtonKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButtonKind {
    Left,
    Right,
}

fn sdl_rect(rect: PixelRect) -> SdlRect {
    SdlRect::new(rect.x, rect.y, rect.width, rect.height)
}

impl Display {
    /// Create display with custom resolution and VSync settings
    pub fn with_options(
        title: &str,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<(Self, TextureCreator<WindowContext>), String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let mut canvas_builder = window.into_canvas().accelerated();
        if vsync {
            canvas_builder = canvas_builder.present_vsync();
        }
        let canvas = canvas_builder.build().map_err(|e| e.to_string())?;

        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump()?;

        Ok((
            Self {
                canvas,
                event_pump,
                width,
                height,
            },
            texture_creator,
        ))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Stretch the buffer over the window. Pixels past the render target's
    /// size are not shown.
    pub fn present(&mut self, target: &mut RenderTarget, buffer: &PixelBuffer) -> Result<(), String> {
        self.canvas.clear();
        if let Some(uploaded) = target.upload(buffer)? {
            self.canvas.copy(&target.texture, sdl_rect(uploaded), None)?;
        }
        self.canvas.present();
        Ok(())
    }

    /// Copy the `src` region of the buffer to the `dest` region of the window
    pub fn present_region(
        &mut self,
        target: &mut RenderTarget,
        buffer: &PixelBuffer,
        dest: PixelRect,
        src: PixelRect,
    ) -> Result<(), String> {
        self.canvas.clear();
        if let Some(src) = src.intersect(&buffer.bounds()) {
            let region = transform::crop(buffer, src.x, src.y, src.width, src.height);
            if let Some(uploaded) = target.upload(&region)? {
                self.canvas
                    .copy(&target.texture, sdl_rect(uploaded), sdl_rect(dest))?;
            }
        }
        self.canvas.present();
        Ok(())
    }

    /// Show the buffer at its own size in the middle of the window
    pub fn present_centered(&mut self, target: &mut RenderTarget, buffer: &PixelBuffer) -> Result<(), String> {
        let width = buffer.width().min(target.width);
        let height = buffer.height().min(target.height);
        let dest = PixelRect::new(
            (self.width as i32 - width as i32) / 2,
            (self.height as i32 - height as i32) / 2,
            width,
            height,
        );
        self.present_region(target, buffer, dest, PixelRect::new(0, 0, width, height))
    }

    pub fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => events.push(InputEvent::Quit),
                Event::KeyDown {
                    keycode: Some(k), ..
                } => events.push(InputEvent::KeyDown(k)),
                Event::MouseButtonDown {
                    x, y, mouse_btn, ..
                } => {
                    if let Some(button) = map_mouse_button(mouse_btn) {
                        events.push(InputEvent::MouseDown { x, y, button });
                    }
                },
                _ => {},
            }
        }

        events
    }
}

impl<'a> RenderTarget<'a> {
    pub fn with_size(
        texture_creator: &'a TextureCreator<WindowContext>,
        width: u32,
        height: u32,
    ) -> Result<Self, String> {
        let texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(|e| e.to_string())?;
        Ok(Self {
            texture,
            width,
            height,
        })
    }

    /// Upload the part of the buffer that fits the texture, anchored at the
    /// top-left. Returns the texture region that now holds it, or `None`
    /// for an empty buffer.
    fn upload(&mut self, buffer: &PixelBuffer) -> Result<Option<PixelRect>, String> {
        let Some(visible) = visible_region(buffer, self.width, self.height) else {
            return Ok(None);
        };
        let bytes = if visible == buffer.bounds() {
            buffer.to_argb_bytes()
        } else {
            transform::crop(buffer, 0, 0, visible.width, visible.height).to_argb_bytes()
        };
        self.texture
            .update(sdl_rect(visible), &bytes, visible.width as usize * 4)
            .map_err(|e| e.to_string())?;
        Ok(Some(visible))
    }
}

/// Top-left part of `buffer` that fits a `width x height` texture
fn visible_region(buffer: &PixelBuffer, width: u32, height: u32) -> Option<PixelRect> {
    buffer.bounds().intersect(&PixelRect::new(0, 0, width, height))
}

fn map_mouse_button(btn: MouseButton) -> Option<MouseButtonKind> {
    match btn {
        MouseButton::Left => Some(MouseButtonKind::Left),
        MouseButton::Right => Some(MouseButtonKind::Right),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn test_visible_region_clips_to_texture() {
        let small = PixelBuffer::new(300, 200, Color::BLACK);
        assert_eq!(
            visible_region(&small, 640, 480),
            Some(PixelRect::new(0, 0, 300, 200))
        );
        let large = PixelBuffer::new(800, 100, Color::BLACK);
        assert_eq!(
            visible_region(&large, 640, 480),
            Some(PixelRect::new(0, 0, 640, 100))
        );
        assert_eq!(visible_region(&PixelBuffer::empty(), 640, 480), None);
    }
}
