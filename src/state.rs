//! Render state slots and their legal values.
//!
//! The renderer keeps one authoritative `u32` per slot. Typed value enums
//! are provided for the slots that take an enumerated value; boolean slots
//! take `true`/`false` directly. Every enum carries a fallible `from_u32`
//! so that the renderer can reject values that are not legal for a slot.

/// The fixed set of cached render state slots.
///
/// A handful of slots are declared but not implemented yet. Writing to one
/// of them is a programmer error and panics, rather than being silently
/// dropped.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[repr(usize)]
pub enum StateSlot {
    AlphaTest,
    AlphaTestFunc,
    AlphaTestRef,
    Blend,
    BlendSrc,
    BlendDst,
    BlendOp,
    DepthWrite,
    DepthTest,
    DepthFunc,
    DepthClearValue,
    CullMode,
    DepthBias,
    Multisample,
}

impl StateSlot {
    pub const COUNT: usize = StateSlot::Multisample as usize + 1;
}

/// Blend factors applied to incoming (source) and framebuffer (destination)
/// color values.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(u32)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    SrcAlpha,
    DstColor,
    DstAlpha,
    OneMinusSrcColor,
    OneMinusSrcAlpha,
    OneMinusDstColor,
    OneMinusDstAlpha,
}

impl BlendFactor {
    pub fn from_u32(v: u32) -> Option<Self> {
        match v {
            0 => Some(BlendFactor::Zero),
            1 => Some(BlendFactor::One),
            2 => Some(BlendFactor::SrcColor),
            3 => Some(BlendFactor::SrcAlpha),
            4 => Some(BlendFactor::DstColor),
            5 => Some(BlendFactor::DstAlpha),
            6 => Some(BlendFactor::OneMinusSrcColor),
            7 => Some(BlendFactor::OneMinusSrcAlpha),
            8 => Some(BlendFactor::OneMinusDstColor),
            9 => Some(BlendFactor::OneMinusDstAlpha),
            _ => None,
        }
    }
}

impl From<BlendFactor> for u32 {
    fn from(v: BlendFactor) -> Self {
        v as u32
    }
}

/// Specifies how source and destination values are combined once both have
/// been multiplied by their blend factors.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(u32)]
pub enum BlendEquation {
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
}

impl BlendEquation {
    pub fn from_u32(v: u32) -> Option<Self> {
        match v {
            0 => Some(BlendEquation::Add),
            1 => Some(BlendEquation::Subtract),
            2 => Some(BlendEquation::ReverseSubtract),
            3 => Some(BlendEquation::Min),
            4 => Some(BlendEquation::Max),
            _ => None,
        }
    }
}

impl From<BlendEquation> for u32 {
    fn from(v: BlendEquation) -> Self {
        v as u32
    }
}

/// Specify whether front- or back-facing polygons are culled.
///
/// `Nothing` disables face culling entirely; every other value enables it
/// and selects the culled face set.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(u32)]
pub enum CullMode {
    Nothing,
    Front,
    Back,
    FrontAndBack,
}

impl CullMode {
    pub fn from_u32(v: u32) -> Option<Self> {
        match v {
            0 => Some(CullMode::Nothing),
            1 => Some(CullMode::Front),
            2 => Some(CullMode::Back),
            3 => Some(CullMode::FrontAndBack),
            _ => None,
        }
    }
}

impl From<CullMode> for u32 {
    fn from(v: CullMode) -> Self {
        v as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        for v in 0..10 {
            assert_eq!(u32::from(BlendFactor::from_u32(v).unwrap()), v);
        }
        for v in 0..5 {
            assert_eq!(u32::from(BlendEquation::from_u32(v).unwrap()), v);
        }
        for v in 0..4 {
            assert_eq!(u32::from(CullMode::from_u32(v).unwrap()), v);
        }
    }

    #[test]
    fn out_of_range() {
        assert_eq!(BlendFactor::from_u32(10), None);
        assert_eq!(BlendEquation::from_u32(5), None);
        assert_eq!(CullMode::from_u32(4), None);
    }
}
