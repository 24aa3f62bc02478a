//! Render target textures.
//!
//! Just enough texture to attach to a `FrameBuffer`: an uninitialized
//! GPU-side image with a format and dimensions. Loading image files and
//! caching them by path is the job of an external collaborator, which hands
//! already-constructed `Rc<Texture>`s to the frame buffer factories.

use std::rc::Rc;

use cgmath::Vector2;

use crate::context::Context;
use crate::errors::Result;

/// Storage format of a render target.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TextureFormat {
    Rgba8,
    Depth24,
}

impl TextureFormat {
    pub fn is_color(self) -> bool {
        match self {
            TextureFormat::Rgba8 => true,
            TextureFormat::Depth24 => false,
        }
    }
}

/// A GPU-side image usable as a frame buffer attachment.
pub struct Texture {
    ctx: Context,
    id: u32,
    dimensions: Vector2<u32>,
    format: TextureFormat,
}

impl Texture {
    /// Allocates an uninitialized texture suitable as a render target.
    pub fn render_target(
        ctx: &Context,
        dimensions: Vector2<u32>,
        format: TextureFormat,
    ) -> Result<Rc<Self>> {
        let id = ctx.shared().device.create_texture(dimensions, format)?;
        debug!("Created {:?} render target {} ({}x{}).", format, id, dimensions.x, dimensions.y);

        Ok(Rc::new(Texture {
            ctx: ctx.clone(),
            id,
            dimensions,
            format,
        }))
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn dimensions(&self) -> Vector2<u32> {
        self.dimensions
    }

    #[inline]
    pub fn format(&self) -> TextureFormat {
        self.format
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        let mut shared = self.ctx.shared();
        if let Err(err) = shared.device.delete_texture(self.id) {
            warn!("Failed to release texture {}: {}", self.id, err);
        }
    }
}
