//! SDL2 window output for rendered surfaces.
//!
//! The rasterizer itself never touches SDL; this module converts a
//! [`Surface`] to RGBA and streams it into a window texture, either whole
//! or restricted to the surface's accumulated dirty rectangles.

use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};

use crate::surface::{Rect, Surface};

pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;

pub struct Display {
    canvas: Canvas<Window>,
    width: u32,
    height: u32,
}

pub struct RenderTarget<'a> {
    texture: Texture<'a>,
    width: u32,
    height: u32,
}

impl Display {
    /// Create a display with VSync enabled.
    pub fn new(title: &str) -> Result<(Self, TextureCreator<WindowContext>), String> {
        Self::with_options(title, DEFAULT_WIDTH, DEFAULT_HEIGHT, true)
    }

    /// Create a display with custom resolution and VSync settings.
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

        Ok((
            Self {
                canvas,
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

    /// Upload the whole surface and present it.
    pub fn present(
        &mut self,
        target: &mut RenderTarget,
        surface: &Surface,
    ) -> Result<(), String> {
        let full = Rect::new(0, 0, surface.width(), surface.height());
        target.upload(surface, full)?;
        self.canvas.copy(&target.texture, None, None)?;
        self.canvas.present();
        Ok(())
    }

    /// Upload only the surface's accumulated dirty rectangles, then
    /// present. Presents nothing when no draw call touched the surface.
    pub fn present_updates(
        &mut self,
        target: &mut RenderTarget,
        surface: &mut Surface,
    ) -> Result<(), String> {
        let updates = surface.take_updates();
        if updates.is_empty() {
            return Ok(());
        }
        for rect in updates {
            target.upload(surface, rect)?;
        }
        self.canvas.copy(&target.texture, None, None)?;
        self.canvas.present();
        Ok(())
    }

}

impl<'a> RenderTarget<'a> {
    /// Create a streaming texture matching the surface resolution.
    pub fn new(
        texture_creator: &'a TextureCreator<WindowContext>,
        width: u32,
        height: u32,
    ) -> Result<Self, String> {
        let texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::RGBA32, width, height)
            .map_err(|e| e.to_string())?;
        Ok(Self {
            texture,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Convert one surface region to RGBA and write it into the texture.
    fn upload(&mut self, surface: &Surface, rect: Rect) -> Result<(), String> {
        let x1 = rect.x.max(0);
        let y1 = rect.y.max(0);
        let x2 = (rect.x + rect.w).min(surface.width());
        let y2 = (rect.y + rect.h).min(surface.height());
        if x1 >= x2 || y1 >= y2 {
            return Ok(());
        }

        let w = (x2 - x1) as usize;
        let mut staging = Vec::with_capacity(w * (y2 - y1) as usize * 4);
        for y in y1..y2 {
            for x in x1..x2 {
                let c = surface.get_rgb(surface.get_pixel(x, y));
                staging.extend_from_slice(&[c.r, c.g, c.b, 255]);
            }
        }

        let dst = sdl2::rect::Rect::new(x1, y1, (x2 - x1) as u32, (y2 - y1) as u32);
        self.texture
            .update(Some(dst), &staging, w * 4)
            .map_err(|e| e.to_string())
    }
}
