//! Static geometry: vertex and index data uploaded once and never
//! rewritten.

use std::rc::Rc;

use crate::context::Context;
use crate::errors::Result;
use crate::vertex::VertexList;

/// How the indexed vertices are assembled into primitives.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Primitive {
    Points,
    Lines,
    LineStrip,
    Triangles,
    TriangleStrip,
}

/// The hardware buffers of an immutable piece of geometry. Created
/// exclusively by `Renderer::create_static_geometry`; the underlying
/// buffers are never resized or rewritten.
pub struct StaticGeometry {
    ctx: Context,
    vao: u32,
    vbo: u32,
    ibo: u32,
    primitive: Primitive,
    vertex_list: Rc<VertexList>,
}

impl StaticGeometry {
    pub(crate) fn new(
        ctx: Context,
        vao: u32,
        vbo: u32,
        ibo: u32,
        primitive: Primitive,
        vertex_list: Rc<VertexList>,
    ) -> Self {
        StaticGeometry {
            ctx,
            vao,
            vbo,
            ibo,
            primitive,
            vertex_list,
        }
    }

    /// Binds the vertex array for drawing. Geometry binding is plain
    /// native state, there is no redundancy tracker for it.
    pub fn bind(&self) -> Result<()> {
        self.ctx.shared().device.bind_vertex_array(self.vao)
    }

    /// The vertex array descriptor.
    #[inline]
    pub fn vao(&self) -> u32 {
        self.vao
    }

    /// The vertex buffer.
    #[inline]
    pub fn vbo(&self) -> u32 {
        self.vbo
    }

    /// The index buffer.
    #[inline]
    pub fn ibo(&self) -> u32 {
        self.ibo
    }

    #[inline]
    pub fn primitive(&self) -> Primitive {
        self.primitive
    }

    /// The vertex list this geometry was built from, retained for
    /// introspection.
    #[inline]
    pub fn vertex_list(&self) -> &Rc<VertexList> {
        &self.vertex_list
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_list.vertex_count()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.vertex_list.index_count()
    }
}

impl Drop for StaticGeometry {
    fn drop(&mut self) {
        debug!("Releasing static geometry buffers (vao {}).", self.vao);

        let mut shared = self.ctx.shared();
        if let Err(err) = shared.device.delete_vertex_array(self.vao) {
            warn!("Failed to release vertex array {}: {}", self.vao, err);
        }
        if let Err(err) = shared.device.delete_buffer(self.vbo) {
            warn!("Failed to release vertex buffer {}: {}", self.vbo, err);
        }
        if let Err(err) = shared.device.delete_buffer(self.ibo) {
            warn!("Failed to release index buffer {}: {}", self.ibo, err);
        }
    }
}
