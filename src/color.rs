//! A RGBA color value type.

/// A RGBA `Color`. Each color component is a floating point value
/// with a range from 0 to 1.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Color(pub f32, pub f32, pub f32, pub f32);

impl Color {
    #[inline]
    pub fn transparent() -> Self {
        Color(0.0, 0.0, 0.0, 0.0)
    }

    /// Clip to [0.0, 1.0] range.
    pub fn clip(&self) -> Color {
        Color(
            clamp(self.0, 0.0, 1.0),
            clamp(self.1, 0.0, 1.0),
            clamp(self.2, 0.0, 1.0),
            clamp(self.3, 0.0, 1.0),
        )
    }
}

fn clamp(v: f32, min: f32, max: f32) -> f32 {
    if v < min {
        min
    } else if v > max {
        max
    } else {
        v
    }
}
