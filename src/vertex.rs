//! Vertex layout description and vertex list storage.
//!
//! A `VertexLayout` describes how the untyped bytes of a vertex buffer map
//! to named attributes. It is pure value data, produced once with the
//! builder and consumed by `Renderer::create_static_geometry`.

use smallvec::SmallVec;

use crate::MAX_VERTEX_ATTRIBUTES;

/// The scalar type of a single attribute component.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AttributeType {
    Float,
    Int,
    Bool,
}

impl AttributeType {
    /// Size of one component in bytes.
    pub fn size(self) -> u32 {
        match self {
            AttributeType::Float | AttributeType::Int => 4,
            AttributeType::Bool => 1,
        }
    }
}

/// A generic vertex attribute: a named, typed slice of every vertex.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct VertexAttribute {
    /// Name of the attribute as declared in shader sources.
    pub name: String,
    /// The binding index of this attribute.
    pub index: u32,
    /// The number of components per vertex element.
    pub size: u32,
    /// The scalar type of each component.
    pub ty: AttributeType,
    /// Byte offset of this attribute from the start of a vertex.
    pub offset: u32,
    /// Whether fixed-point data values should be normalized.
    pub normalized: bool,
}

/// An ordered sequence of vertex attributes. Insertion order is significant,
/// it defines the binding order and the byte offsets within a vertex.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct VertexLayout {
    stride: u32,
    elements: SmallVec<[VertexAttribute; MAX_VERTEX_ATTRIBUTES]>,
}

impl VertexLayout {
    /// Creates a new empty `VertexLayoutBuilder`.
    #[inline]
    pub fn build() -> VertexLayoutBuilder {
        VertexLayoutBuilder::default()
    }

    /// Stride of a single vertex in bytes.
    #[inline]
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// The attributes in binding order.
    #[inline]
    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.elements
    }

    /// Returns the named `VertexAttribute` from the layout.
    pub fn element(&self, name: &str) -> Option<&VertexAttribute> {
        self.elements.iter().find(|v| v.name == name)
    }

    /// Relative byte offset of the named attribute.
    pub fn offset(&self, name: &str) -> Option<u32> {
        self.element(name).map(|v| v.offset)
    }
}

#[derive(Default)]
pub struct VertexLayoutBuilder {
    layout: VertexLayout,
}

impl VertexLayoutBuilder {
    /// Appends an attribute. The binding index and byte offset are assigned
    /// from the insertion position and the accumulated stride.
    pub fn with(mut self, name: &str, ty: AttributeType, size: u32, normalized: bool) -> Self {
        assert!(size > 0 && size <= 4, "Attribute size must be in [1, 4].");
        assert!(
            self.layout.elements.len() < MAX_VERTEX_ATTRIBUTES,
            "Out of layout bounds."
        );
        assert!(
            self.layout.element(name).is_none(),
            "Duplicated attribute {:?}.",
            name
        );

        let index = self.layout.elements.len() as u32;
        let offset = self.layout.stride;
        self.layout.elements.push(VertexAttribute {
            name: name.into(),
            index,
            size,
            ty,
            offset,
            normalized,
        });
        self.layout.stride += size * ty.size();
        self
    }

    #[inline]
    pub fn finish(self) -> VertexLayout {
        self.layout
    }
}

/// Raw vertex and index data together with the layout that gives the vertex
/// bytes a meaning. Retained by `StaticGeometry` for introspection.
#[derive(Debug, Clone)]
pub struct VertexList {
    layout: VertexLayout,
    vertices: Vec<u8>,
    indices: Vec<u32>,
}

impl VertexList {
    /// Creates a vertex list from raw vertex bytes and indices.
    ///
    /// The vertex bytes must be a whole number of vertices as described by
    /// `layout`.
    pub fn new(layout: VertexLayout, vertices: Vec<u8>, indices: Vec<u32>) -> Self {
        assert!(layout.stride() > 0, "Vertex layout is empty.");
        assert!(
            vertices.len() % layout.stride() as usize == 0,
            "Vertex data length {} is not a multiple of the vertex size {}.",
            vertices.len(),
            layout.stride()
        );

        VertexList {
            layout,
            vertices,
            indices,
        }
    }

    #[inline]
    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    /// Size of a single vertex in bytes.
    #[inline]
    pub fn vertex_size(&self) -> u32 {
        self.layout.stride()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / self.layout.stride() as usize
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn vertex_data(&self) -> &[u8] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// The index data as raw bytes, as uploaded to the index buffer.
    pub fn index_data(&self) -> &[u8] {
        unsafe {
            ::std::slice::from_raw_parts(
                self.indices.as_ptr() as *const u8,
                self.indices.len() * ::std::mem::size_of::<u32>(),
            )
        }
    }
}
