//! Error types of the crate.
//!
//! Recoverable failures (shader compilation, framebuffer completeness, GL
//! errors reported by the driver) are surfaced as `Error`. Contract
//! violations like an undefined render state slot are programmer bugs and
//! panic instead, they are never represented here.

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "Backend: {}", _0)]
    Backend(String),
    #[fail(display = "Failed to compile {} shader:\n{}", _0, _1)]
    ShaderCompileFailure(&'static str, String),
    #[fail(display = "Failed to link shader program:\n{}", _0)]
    ShaderLinkFailure(String),
    #[fail(display = "Frame buffer is incomplete: {}", _0)]
    FrameBufferIncomplete(String),
    #[fail(display = "Too many color targets (max {}).", _0)]
    TooManyColorTargets(usize),
    #[fail(display = "{:?} is not a color format.", _0)]
    NotColorFormat(crate::texture::TextureFormat),
    #[fail(display = "{:?} is not a depth format.", _0)]
    NotDepthFormat(crate::texture::TextureFormat),
}

pub type Result<T> = ::std::result::Result<T, Error>;
