//! Tile and overlay colours.

/// An RGB colour packed into a `u32` (0x00RRGGBB).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Self = Self::from_rgb(0, 0, 0);
    pub const WHITE: Self = Self::from_rgb(255, 255, 255);
    /// Start endpoint flag.
    pub const START: Self = Self::from_rgb(255, 0, 0);
    /// Goal endpoint flag.
    pub const GOAL: Self = Self::from_rgb(0, 255, 0);
    /// Solution path squares.
    pub const PATH: Self = Self::from_rgb(127, 255, 127);

    /// Construct from individual RGB components.
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    /// Red component.
    #[inline]
    pub const fn r(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    /// Green component.
    #[inline]
    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    /// Blue component.
    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Grey level used to paint a tile of the given traversal weight.
    ///
    /// Impassable tiles (weight 0) are black; weights saturate at 15, the
    /// darkest passable shade.
    pub const fn weight_shade(weight: u8) -> Self {
        if weight == 0 {
            return Self::BLACK;
        }
        let w = if weight > 15 { 15 } else { weight };
        let level = 255 - (w << 4);
        Self::from_rgb(level, level, level)
    }
}
