//! The OpenGL implementation of `Device`.

use gl;
use gl::types::*;

use cgmath::Vector2;

use crate::color::Color;
use crate::errors::{Error, Result};
use crate::geometry::Primitive;
use crate::shader::UniformVariable;
use crate::state::{BlendEquation, BlendFactor, CullMode};
use crate::texture::TextureFormat;
use crate::vertex::AttributeType;

use super::{BufferTarget, Capability, Device};

/// `Device` backed by a live OpenGL context.
///
/// All state caching happens above this layer; `GlDevice` itself issues
/// every call it is asked to and checks `glGetError` afterwards.
pub struct GlDevice {}

impl GlDevice {
    /// Creates a device over the OpenGL context that is current on the
    /// calling thread.
    ///
    /// # Safety
    ///
    /// The context must have been made current and its function pointers
    /// loaded before this is called, and it must stay current on this
    /// thread for the lifetime of the device.
    pub unsafe fn new() -> Result<Self> {
        check()?;
        Ok(GlDevice {})
    }
}

impl Device for GlDevice {
    fn set_capability(&mut self, capability: Capability, enable: bool) -> Result<()> {
        let cap = gl_capability(capability);
        unsafe {
            if enable {
                gl::Enable(cap);
            } else {
                gl::Disable(cap);
            }
            check()
        }
    }

    fn set_blend_func(&mut self, src: BlendFactor, dst: BlendFactor) -> Result<()> {
        unsafe {
            gl::BlendFunc(gl_blend_factor(src), gl_blend_factor(dst));
            check()
        }
    }

    fn set_blend_equation(&mut self, equation: BlendEquation) -> Result<()> {
        unsafe {
            gl::BlendEquation(gl_blend_equation(equation));
            check()
        }
    }

    fn set_cull_face(&mut self, cull: CullMode) -> Result<()> {
        unsafe {
            gl::CullFace(gl_cull_mode(cull));
            check()
        }
    }

    fn set_clear_color(&mut self, color: Color) -> Result<()> {
        unsafe {
            gl::ClearColor(color.0, color.1, color.2, color.3);
            check()
        }
    }

    fn clear(&mut self, color: bool, depth: bool, stencil: bool) -> Result<()> {
        let mut bits = 0;
        if color {
            bits |= gl::COLOR_BUFFER_BIT;
        }
        if depth {
            bits |= gl::DEPTH_BUFFER_BIT;
        }
        if stencil {
            bits |= gl::STENCIL_BUFFER_BIT;
        }

        unsafe {
            gl::Clear(bits);
            check()
        }
    }

    fn set_viewport(&mut self, x: i32, y: i32, width: i32, height: i32) -> Result<()> {
        unsafe {
            gl::Viewport(x, y, width, height);
            check()
        }
    }

    fn create_vertex_array(&mut self) -> Result<u32> {
        unsafe {
            let mut id = 0;
            gl::GenVertexArrays(1, &mut id);
            check()?;
            assert!(id != 0);
            Ok(id)
        }
    }

    fn bind_vertex_array(&mut self, id: u32) -> Result<()> {
        unsafe {
            gl::BindVertexArray(id);
            check()
        }
    }

    fn delete_vertex_array(&mut self, id: u32) -> Result<()> {
        unsafe {
            gl::DeleteVertexArrays(1, &id);
            check()
        }
    }

    fn create_buffer(&mut self) -> Result<u32> {
        unsafe {
            let mut id = 0;
            gl::GenBuffers(1, &mut id);
            check()?;
            assert!(id != 0);
            Ok(id)
        }
    }

    fn bind_buffer(&mut self, target: BufferTarget, id: u32) -> Result<()> {
        unsafe {
            gl::BindBuffer(gl_buffer_target(target), id);
            check()
        }
    }

    fn upload_static_buffer(&mut self, target: BufferTarget, data: &[u8]) -> Result<()> {
        let ptr = if data.is_empty() {
            ::std::ptr::null()
        } else {
            &data[0] as *const u8 as *const ::std::os::raw::c_void
        };

        unsafe {
            gl::BufferData(
                gl_buffer_target(target),
                data.len() as isize,
                ptr,
                gl::STATIC_DRAW,
            );
            check()
        }
    }

    fn delete_buffer(&mut self, id: u32) -> Result<()> {
        unsafe {
            gl::DeleteBuffers(1, &id);
            check()
        }
    }

    fn set_vertex_attribute(
        &mut self,
        index: u32,
        size: u32,
        ty: AttributeType,
        normalized: bool,
        stride: u32,
        offset: u32,
    ) -> Result<()> {
        unsafe {
            gl::EnableVertexAttribArray(index);
            gl::VertexAttribPointer(
                index,
                size as GLsizei,
                gl_attribute_type(ty),
                normalized as u8,
                stride as GLsizei,
                offset as usize as *const ::std::os::raw::c_void,
            );
            check()
        }
    }

    fn create_frame_buffer(&mut self) -> Result<u32> {
        unsafe {
            let mut id = 0;
            gl::GenFramebuffers(1, &mut id);
            check()?;
            assert!(id != 0);
            Ok(id)
        }
    }

    fn bind_frame_buffer(&mut self, id: u32) -> Result<()> {
        unsafe {
            gl::BindFramebuffer(gl::FRAMEBUFFER, id);
            check()
        }
    }

    fn delete_frame_buffer(&mut self, id: u32) -> Result<()> {
        unsafe {
            gl::DeleteFramebuffers(1, &id);
            check()
        }
    }

    fn attach_color_target(&mut self, index: usize, texture: u32) -> Result<()> {
        unsafe {
            gl::FramebufferTexture2D(
                gl::FRAMEBUFFER,
                gl::COLOR_ATTACHMENT0 + index as u32,
                gl::TEXTURE_2D,
                texture,
                0,
            );
            check()
        }
    }

    fn attach_depth_target(&mut self, texture: u32) -> Result<()> {
        unsafe {
            gl::FramebufferTexture2D(
                gl::FRAMEBUFFER,
                gl::DEPTH_ATTACHMENT,
                gl::TEXTURE_2D,
                texture,
                0,
            );
            check()
        }
    }

    fn check_frame_buffer(&mut self) -> Result<()> {
        let status = unsafe { gl::CheckFramebufferStatus(gl::FRAMEBUFFER) };
        match status {
            gl::FRAMEBUFFER_COMPLETE => Ok(()),
            gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => Err(Error::FrameBufferIncomplete(
                "at least one attachment point is not attachment complete".into(),
            )),
            gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => Err(Error::FrameBufferIncomplete(
                "no images are attached to the frame buffer".into(),
            )),
            gl::FRAMEBUFFER_UNSUPPORTED => Err(Error::FrameBufferIncomplete(
                "the combination of attached internal formats is unsupported".into(),
            )),
            _ => Err(Error::FrameBufferIncomplete(format!(
                "status 0x{:X}",
                status
            ))),
        }
    }

    fn create_texture(&mut self, dimensions: Vector2<u32>, format: TextureFormat) -> Result<u32> {
        let (internal_format, pixel_format, pixel_type) = gl_texture_format(format);

        unsafe {
            let mut id = 0;
            gl::GenTextures(1, &mut id);
            check()?;
            assert!(id != 0);

            gl::BindTexture(gl::TEXTURE_2D, id);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::CLAMP_TO_EDGE as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::CLAMP_TO_EDGE as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, gl::LINEAR as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as GLint);
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                internal_format as GLint,
                dimensions.x as GLsizei,
                dimensions.y as GLsizei,
                0,
                pixel_format,
                pixel_type,
                ::std::ptr::null(),
            );
            gl::BindTexture(gl::TEXTURE_2D, 0);
            check()?;
            Ok(id)
        }
    }

    fn delete_texture(&mut self, id: u32) -> Result<()> {
        unsafe {
            gl::DeleteTextures(1, &id);
            check()
        }
    }

    fn create_program(&mut self, vs: &str, fs: &str) -> Result<u32> {
        unsafe {
            let vs = compile(gl::VERTEX_SHADER, "vertex", vs)?;
            let fs = match compile(gl::FRAGMENT_SHADER, "fragment", fs) {
                Ok(fs) => fs,
                Err(err) => {
                    gl::DeleteShader(vs);
                    return Err(err);
                }
            };

            let id = link(vs, fs);
            if let Ok(id) = id {
                gl::DetachShader(id, vs);
                gl::DetachShader(id, fs);
            }

            gl::DeleteShader(vs);
            gl::DeleteShader(fs);
            check()?;

            id
        }
    }

    fn bind_program(&mut self, id: u32) -> Result<()> {
        unsafe {
            gl::UseProgram(id);
            check()
        }
    }

    fn delete_program(&mut self, id: u32) -> Result<()> {
        unsafe {
            gl::DeleteProgram(id);
            check()
        }
    }

    fn uniform_location(&mut self, program: u32, name: &str) -> Result<i32> {
        let c_name = c_name(name);
        unsafe {
            let location = gl::GetUniformLocation(program, c_name.as_ptr());
            check()?;
            Ok(location)
        }
    }

    fn attribute_location(&mut self, program: u32, name: &str) -> Result<i32> {
        let c_name = c_name(name);
        unsafe {
            let location = gl::GetAttribLocation(program, c_name.as_ptr());
            check()?;
            Ok(location)
        }
    }

    fn set_uniform(&mut self, location: i32, variable: UniformVariable) -> Result<()> {
        unsafe {
            match variable {
                UniformVariable::I32(v) => gl::Uniform1i(location, v),
                UniformVariable::F32(v) => gl::Uniform1f(location, v),
                UniformVariable::Vector2f(v) => gl::Uniform2f(location, v[0], v[1]),
                UniformVariable::Vector3f(v) => gl::Uniform3f(location, v[0], v[1], v[2]),
                UniformVariable::Vector4f(v) => gl::Uniform4f(location, v[0], v[1], v[2], v[3]),
            }
            check()
        }
    }

    fn draw_elements(&mut self, primitive: Primitive, count: u32, start: u32) -> Result<()> {
        // Indices are always u32, so the byte offset is start * 4.
        let offset = start as usize * ::std::mem::size_of::<u32>();
        unsafe {
            gl::DrawElements(
                gl_primitive(primitive),
                count as GLsizei,
                gl::UNSIGNED_INT,
                offset as *const ::std::os::raw::c_void,
            );
            check()
        }
    }
}

fn gl_capability(capability: Capability) -> GLenum {
    match capability {
        Capability::Blend => gl::BLEND,
        Capability::DepthTest => gl::DEPTH_TEST,
        Capability::CullFace => gl::CULL_FACE,
    }
}

fn gl_buffer_target(target: BufferTarget) -> GLenum {
    match target {
        BufferTarget::Vertex => gl::ARRAY_BUFFER,
        BufferTarget::Index => gl::ELEMENT_ARRAY_BUFFER,
    }
}

fn gl_blend_factor(factor: BlendFactor) -> GLenum {
    match factor {
        BlendFactor::Zero => gl::ZERO,
        BlendFactor::One => gl::ONE,
        BlendFactor::SrcColor => gl::SRC_COLOR,
        BlendFactor::SrcAlpha => gl::SRC_ALPHA,
        BlendFactor::DstColor => gl::DST_COLOR,
        BlendFactor::DstAlpha => gl::DST_ALPHA,
        BlendFactor::OneMinusSrcColor => gl::ONE_MINUS_SRC_COLOR,
        BlendFactor::OneMinusSrcAlpha => gl::ONE_MINUS_SRC_ALPHA,
        BlendFactor::OneMinusDstColor => gl::ONE_MINUS_DST_COLOR,
        BlendFactor::OneMinusDstAlpha => gl::ONE_MINUS_DST_ALPHA,
    }
}

fn gl_blend_equation(equation: BlendEquation) -> GLenum {
    match equation {
        BlendEquation::Add => gl::FUNC_ADD,
        BlendEquation::Subtract => gl::FUNC_SUBTRACT,
        BlendEquation::ReverseSubtract => gl::FUNC_REVERSE_SUBTRACT,
        BlendEquation::Min => gl::MIN,
        BlendEquation::Max => gl::MAX,
    }
}

fn gl_cull_mode(cull: CullMode) -> GLenum {
    match cull {
        CullMode::Front => gl::FRONT,
        CullMode::Back => gl::BACK,
        CullMode::FrontAndBack => gl::FRONT_AND_BACK,
        CullMode::Nothing => unreachable!("CullMode::Nothing disables culling instead."),
    }
}

fn gl_attribute_type(ty: AttributeType) -> GLenum {
    match ty {
        AttributeType::Float => gl::FLOAT,
        AttributeType::Int => gl::INT,
        AttributeType::Bool => gl::BOOL,
    }
}

fn gl_primitive(primitive: Primitive) -> GLenum {
    match primitive {
        Primitive::Points => gl::POINTS,
        Primitive::Lines => gl::LINES,
        Primitive::LineStrip => gl::LINE_STRIP,
        Primitive::Triangles => gl::TRIANGLES,
        Primitive::TriangleStrip => gl::TRIANGLE_STRIP,
    }
}

fn gl_texture_format(format: TextureFormat) -> (GLenum, GLenum, GLenum) {
    match format {
        TextureFormat::Rgba8 => (gl::RGBA8, gl::RGBA, gl::UNSIGNED_BYTE),
        TextureFormat::Depth24 => (
            gl::DEPTH_COMPONENT24,
            gl::DEPTH_COMPONENT,
            gl::UNSIGNED_INT,
        ),
    }
}

fn c_name(name: &str) -> ::std::ffi::CString {
    // Interior NULs can not come from shader source identifiers.
    ::std::ffi::CString::new(name.as_bytes())
        .unwrap_or_else(|_| panic!("Invalid name {:?}.", name))
}

unsafe fn compile(stage: GLenum, label: &'static str, src: &str) -> Result<GLuint> {
    let shader = gl::CreateShader(stage);
    let c_str = ::std::ffi::CString::new(src.as_bytes())
        .map_err(|_| Error::ShaderCompileFailure(label, "source contains NUL byte".into()))?;
    gl::ShaderSource(shader, 1, &c_str.as_ptr(), ::std::ptr::null());
    gl::CompileShader(shader);

    let mut status = GLint::from(gl::FALSE);
    gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status);

    if status != GLint::from(gl::TRUE) {
        let mut len = 0;
        gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
        let mut buf = vec![0u8; len.max(1) as usize - 1];
        gl::GetShaderInfoLog(
            shader,
            len,
            ::std::ptr::null_mut(),
            buf.as_mut_ptr() as *mut GLchar,
        );
        gl::DeleteShader(shader);

        Err(Error::ShaderCompileFailure(
            label,
            String::from_utf8_lossy(&buf).into_owned(),
        ))
    } else {
        Ok(shader)
    }
}

unsafe fn link(vs: GLuint, fs: GLuint) -> Result<GLuint> {
    let program = gl::CreateProgram();
    gl::AttachShader(program, vs);
    gl::AttachShader(program, fs);
    gl::LinkProgram(program);

    let mut status = GLint::from(gl::FALSE);
    gl::GetProgramiv(program, gl::LINK_STATUS, &mut status);

    if status != GLint::from(gl::TRUE) {
        let mut len: GLint = 0;
        gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
        let mut buf = vec![0u8; len.max(1) as usize - 1];
        gl::GetProgramInfoLog(
            program,
            len,
            ::std::ptr::null_mut(),
            buf.as_mut_ptr() as *mut GLchar,
        );
        gl::DeleteProgram(program);

        Err(Error::ShaderLinkFailure(
            String::from_utf8_lossy(&buf).into_owned(),
        ))
    } else {
        Ok(program)
    }
}

unsafe fn check() -> Result<()> {
    match gl::GetError() {
        gl::NO_ERROR => Ok(()),
        gl::INVALID_ENUM => Err(Error::Backend(
            "an unacceptable value is specified for an enumerated argument".into(),
        )),
        gl::INVALID_VALUE => Err(Error::Backend("a numeric argument is out of range".into())),
        gl::INVALID_OPERATION => Err(Error::Backend(
            "the specified operation is not allowed in the current state".into(),
        )),
        gl::INVALID_FRAMEBUFFER_OPERATION => Err(Error::Backend(
            "the currently bound framebuffer is not framebuffer complete".into(),
        )),
        gl::OUT_OF_MEMORY => Err(Error::Backend(
            "there is not enough memory left to execute the command".into(),
        )),
        other => Err(Error::Backend(format!("unknown OpenGL error 0x{:X}", other))),
    }
}
