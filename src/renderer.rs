//! The renderer: single authority over GPU render state, resource factory
//! and draw dispatcher.
//!
//! The renderer owns the only authoritative copy of every cached state
//! slot. `set_render_state` compares against the cache and skips the
//! native transition when nothing changes; on a typical frame most state
//! never does, so the elision removes almost every driver round-trip.

use std::rc::Rc;

use cgmath::{Vector2, Vector4};

use crate::color::Color;
use crate::context::Context;
use crate::device::{BufferTarget, Capability, Device};
use crate::errors::Result;
use crate::framebuffer::FrameBuffer;
use crate::geometry::{Primitive, StaticGeometry};
use crate::shader::Shader;
use crate::state::{BlendEquation, BlendFactor, CullMode, StateSlot};
use crate::texture::{Texture, TextureFormat};
use crate::vertex::VertexList;

/// Clear the color buffer.
pub const COLOR_BUFFER: u32 = 0b001;
/// Clear the depth buffer.
pub const DEPTH_BUFFER: u32 = 0b010;
/// Clear the stencil buffer.
pub const STENCIL_BUFFER: u32 = 0b100;

pub struct Renderer {
    ctx: Context,
    state: [u32; StateSlot::COUNT],
    clear_color: Color,
}

impl Renderer {
    /// Creates a renderer over `device` and applies the default render
    /// states natively, so cache and hardware agree before any external
    /// mutation.
    pub fn new(device: Box<dyn Device>) -> Result<Self> {
        info!("Creating renderer.");

        let mut renderer = Renderer {
            ctx: Context::new(device),
            state: [0; StateSlot::COUNT],
            clear_color: Color::transparent(),
        };

        renderer.reset_render_state()?;
        Ok(renderer)
    }

    /// The shared context, for constructing frame buffers, shaders and
    /// render targets against this renderer.
    #[inline]
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    fn reset_render_state(&mut self) -> Result<()> {
        self.set_clear_color(Color::transparent())?;

        self.state[StateSlot::DepthTest as usize] = u32::from(true);
        self.state[StateSlot::CullMode as usize] = CullMode::Nothing.into();
        self.state[StateSlot::Blend as usize] = u32::from(false);
        self.state[StateSlot::BlendSrc as usize] = BlendFactor::SrcAlpha.into();
        self.state[StateSlot::BlendDst as usize] = BlendFactor::OneMinusSrcAlpha.into();
        self.state[StateSlot::BlendOp as usize] = BlendEquation::Add.into();

        for &slot in &[
            StateSlot::DepthTest,
            StateSlot::CullMode,
            StateSlot::Blend,
            StateSlot::BlendSrc,
            StateSlot::BlendOp,
        ] {
            self.apply_render_state(slot, self.state[slot as usize])?;
        }

        Ok(())
    }

    /// Updates a cached render state slot and applies the corresponding
    /// native transition.
    ///
    /// When the cached value already equals `value` the call is a no-op;
    /// the skip is logged for diagnostics. Panics on a reserved slot or a
    /// value that is not legal for `slot` - both are caller bugs, never
    /// runtime conditions.
    pub fn set_render_state<V: Into<u32>>(&mut self, slot: StateSlot, value: V) -> Result<()> {
        let value = value.into();
        if self.state[slot as usize] == value {
            trace!("Ignoring redundant render state change ({:?}).", slot);
            return Ok(());
        }

        self.state[slot as usize] = value;
        self.apply_render_state(slot, value)
    }

    /// The cached value of a render state slot.
    #[inline]
    pub fn render_state(&self, slot: StateSlot) -> u32 {
        self.state[slot as usize]
    }

    fn apply_render_state(&mut self, slot: StateSlot, value: u32) -> Result<()> {
        let mut shared = self.ctx.shared();
        let device = &mut shared.device;

        match slot {
            StateSlot::Blend => device.set_capability(Capability::Blend, toggle(slot, value)),
            // A blend factor can not be set in isolation: the combined
            // native call needs both factors, so the sibling slot is read
            // from the cache.
            StateSlot::BlendSrc => {
                let dst = blend_factor(
                    StateSlot::BlendDst,
                    self.state[StateSlot::BlendDst as usize],
                );
                device.set_blend_func(blend_factor(slot, value), dst)
            }
            StateSlot::BlendDst => {
                let src = blend_factor(
                    StateSlot::BlendSrc,
                    self.state[StateSlot::BlendSrc as usize],
                );
                device.set_blend_func(src, blend_factor(slot, value))
            }
            StateSlot::BlendOp => device.set_blend_equation(
                BlendEquation::from_u32(value)
                    .unwrap_or_else(|| panic!("Invalid blend equation value {}.", value)),
            ),
            StateSlot::DepthTest => {
                device.set_capability(Capability::DepthTest, toggle(slot, value))
            }
            StateSlot::CullMode => {
                let mode = CullMode::from_u32(value)
                    .unwrap_or_else(|| panic!("Invalid cull mode value {}.", value));
                if mode == CullMode::Nothing {
                    device.set_capability(Capability::CullFace, false)
                } else {
                    device.set_capability(Capability::CullFace, true)?;
                    device.set_cull_face(mode)
                }
            }
            StateSlot::AlphaTest
            | StateSlot::AlphaTestFunc
            | StateSlot::AlphaTestRef
            | StateSlot::DepthWrite
            | StateSlot::DepthFunc
            | StateSlot::DepthClearValue
            | StateSlot::DepthBias
            | StateSlot::Multisample => {
                panic!("Render state {:?} is not implemented.", slot);
            }
        }
    }

    /// Clears the buffers selected by `mask`, a bitwise OR of
    /// `COLOR_BUFFER`, `DEPTH_BUFFER` and `STENCIL_BUFFER`, using the
    /// cached clear color.
    pub fn clear(&mut self, mask: u32) -> Result<()> {
        self.ctx.shared().device.clear(
            mask & COLOR_BUFFER != 0,
            mask & DEPTH_BUFFER != 0,
            mask & STENCIL_BUFFER != 0,
        )
    }

    /// Clears color, depth and stencil buffers.
    pub fn clear_all(&mut self) -> Result<()> {
        self.clear(COLOR_BUFFER | DEPTH_BUFFER | STENCIL_BUFFER)
    }

    /// Updates the cached clear color and the native equivalent. Applied
    /// unconditionally; this is rarely called per frame.
    pub fn set_clear_color(&mut self, color: Color) -> Result<()> {
        self.ctx.shared().device.set_clear_color(color)?;
        self.clear_color = color;
        Ok(())
    }

    #[inline]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    /// Sets the viewport in pixel coordinates (x, y, width, height),
    /// coerced to integers. Applied unconditionally.
    pub fn set_viewport(&mut self, viewport: Vector4<f32>) -> Result<()> {
        self.ctx.shared().device.set_viewport(
            viewport.x as i32,
            viewport.y as i32,
            viewport.z as i32,
            viewport.w as i32,
        )
    }

    /// Uploads `vertex_list` into freshly allocated immutable hardware
    /// buffers and configures one attribute binding per layout element.
    ///
    /// On return no vertex array, vertex buffer or index buffer is left
    /// bound, so later binds by other code can not accidentally touch
    /// these buffers. Panics when the vertex or index data is empty.
    pub fn create_static_geometry(
        &mut self,
        primitive: Primitive,
        vertex_list: VertexList,
    ) -> Result<Rc<StaticGeometry>> {
        assert!(
            vertex_list.vertex_count() > 0,
            "Static geometry needs vertex data."
        );
        assert!(
            vertex_list.index_count() > 0,
            "Static geometry needs index data."
        );

        debug!("Creating static geometry hardware buffers.");

        let (vao, vbo, ibo) = {
            let mut shared = self.ctx.shared();
            let device = &mut shared.device;

            let vao = device.create_vertex_array()?;
            device.bind_vertex_array(vao)?;

            let vbo = device.create_buffer()?;
            device.bind_buffer(BufferTarget::Vertex, vbo)?;
            device.upload_static_buffer(BufferTarget::Vertex, vertex_list.vertex_data())?;

            let stride = vertex_list.vertex_size();
            for attribute in vertex_list.layout().attributes() {
                device.set_vertex_attribute(
                    attribute.index,
                    attribute.size,
                    attribute.ty,
                    attribute.normalized,
                    stride,
                    attribute.offset,
                )?;
            }

            let ibo = device.create_buffer()?;
            device.bind_buffer(BufferTarget::Index, ibo)?;
            device.upload_static_buffer(BufferTarget::Index, vertex_list.index_data())?;

            // The index binding is captured by the vertex array, so
            // unbinding everything here leaves the geometry intact.
            device.bind_vertex_array(0)?;
            device.bind_buffer(BufferTarget::Vertex, 0)?;
            device.bind_buffer(BufferTarget::Index, 0)?;

            (vao, vbo, ibo)
        };

        debug!("Successfully created static geometry hardware buffers.");

        Ok(Rc::new(StaticGeometry::new(
            self.ctx.clone(),
            vao,
            vbo,
            ibo,
            primitive,
            Rc::new(vertex_list),
        )))
    }

    /// Creates a frame buffer wrapping the default back buffer.
    pub fn create_frame_buffer(&mut self) -> Rc<FrameBuffer> {
        FrameBuffer::back_buffer(&self.ctx)
    }

    /// Allocates an uninitialized render target texture.
    pub fn create_render_target(
        &mut self,
        dimensions: Vector2<u32>,
        format: TextureFormat,
    ) -> Result<Rc<Texture>> {
        Texture::render_target(&self.ctx, dimensions, format)
    }

    /// Compiles and links a shader program.
    pub fn create_shader(&mut self, vs: &str, fs: &str) -> Result<Rc<Shader>> {
        Shader::compile(&self.ctx, vs, fs)
    }

    /// Issues an indexed draw call using whatever geometry, shader and
    /// frame buffer are currently bound. Binding them first is the
    /// caller's responsibility; nothing is validated here.
    pub fn draw_indexed(&mut self, primitive: Primitive, count: u32, start: u32) -> Result<()> {
        self.ctx.shared().device.draw_elements(primitive, count, start)
    }
}

fn toggle(slot: StateSlot, value: u32) -> bool {
    match value {
        0 => false,
        1 => true,
        _ => panic!("Invalid value {} for {:?} - expected 0 or 1.", value, slot),
    }
}

fn blend_factor(slot: StateSlot, value: u32) -> BlendFactor {
    BlendFactor::from_u32(value)
        .unwrap_or_else(|| panic!("Invalid blend factor value {} for {:?}.", value, slot))
}
