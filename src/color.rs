// Packed 32-bit colors: 0xAARRGGBB.
// The low 24 bits are exactly what minifb wants for a pixel, so a surface
// of `Color` can be handed to the window with the alpha byte masked off.

/// A packed RGBA color. A=255 is fully opaque, A=0 fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    /// Opaque color from RGB components.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    #[inline]
    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn is_opaque(self) -> bool {
        self.a() == 255
    }

    /// The same color with a different alpha.
    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Color((self.0 & 0x00FF_FFFF) | ((a as u32) << 24))
    }

    /// Saturating per-channel add of RGB. The result is always opaque.
    pub fn add(self, other: Color) -> Color {
        Color::rgb(
            self.r().saturating_add(other.r()),
            self.g().saturating_add(other.g()),
            self.b().saturating_add(other.b()),
        )
    }

    /// Composite `self` over `bottom` using `self`'s alpha.
    ///
    /// Each channel is `((a+1)*top + (256-a)*bottom) >> 8`, alpha included.
    /// At a=255 this returns `self` unchanged and at a=0 it returns `bottom`.
    pub fn blend(self, bottom: Color) -> Color {
        let a = self.a() as u32 + 1;
        let ia = 256 - self.a() as u32;
        let mix = |top: u8, bot: u8| ((a * top as u32 + ia * bot as u32) >> 8) as u8;
        Color::rgba(
            mix(self.r(), bottom.r()),
            mix(self.g(), bottom.g()),
            mix(self.b(), bottom.b()),
            mix(self.a(), bottom.a()),
        )
    }

    /// Write `self` over `dst`: plain store when opaque, blend otherwise.
    #[inline]
    pub fn over(self, dst: &mut Color) {
        *dst = if self.is_opaque() { self } else { self.blend(*dst) };
    }

    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const BRIGHT_BLUE: Color = Color::rgb(0, 0, 255);
    pub const BRIGHT_GREEN: Color = Color::rgb(0, 255, 0);
    pub const BRIGHT_CYAN: Color = Color::rgb(0, 255, 255);
    pub const BRIGHT_RED: Color = Color::rgb(255, 0, 0);
    pub const BRIGHT_MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const BRIGHT_YELLOW: Color = Color::rgb(255, 255, 0);

    pub const BLUE: Color = Color::rgb(0, 0, 192);
    pub const GREEN: Color = Color::rgb(0, 192, 0);
    pub const CYAN: Color = Color::rgb(0, 192, 192);
    pub const RED: Color = Color::rgb(192, 0, 0);
    pub const MAGENTA: Color = Color::rgb(192, 0, 192);
    pub const YELLOW: Color = Color::rgb(192, 192, 0);
    pub const GREY: Color = Color::rgb(192, 192, 192);

    pub const DARK_BLUE: Color = Color::rgb(0, 0, 128);
    pub const DARK_GREEN: Color = Color::rgb(0, 128, 0);
    pub const DARK_CYAN: Color = Color::rgb(0, 128, 128);
    pub const DARK_RED: Color = Color::rgb(128, 0, 0);
    pub const DARK_MAGENTA: Color = Color::rgb(128, 0, 128);
    pub const DARK_YELLOW: Color = Color::rgb(128, 128, 0);
    pub const DARK_GREY: Color = Color::rgb(128, 128, 128);

    pub const VERY_DARK_BLUE: Color = Color::rgb(0, 0, 64);
    pub const VERY_DARK_GREEN: Color = Color::rgb(0, 64, 0);
    pub const VERY_DARK_CYAN: Color = Color::rgb(0, 64, 64);
    pub const VERY_DARK_RED: Color = Color::rgb(64, 0, 0);
    pub const VERY_DARK_MAGENTA: Color = Color::rgb(64, 0, 64);
    pub const VERY_DARK_YELLOW: Color = Color::rgb(64, 64, 0);
    pub const VERY_DARK_GREY: Color = Color::rgb(64, 64, 64);
}

/// ZX Spectrum palette, indexed 0..=7 (normal) and 8..=15 (bright).
pub mod zx {
    use super::Color;

    pub const BLACK: Color = Color::BLACK;
    pub const BLUE: Color = Color::rgb(0, 0, 205);
    pub const RED: Color = Color::rgb(205, 0, 0);
    pub const MAGENTA: Color = Color::rgb(205, 0, 205);
    pub const GREEN: Color = Color::rgb(0, 205, 0);
    pub const CYAN: Color = Color::rgb(0, 205, 205);
    pub const YELLOW: Color = Color::rgb(205, 205, 0);
    pub const WHITE: Color = Color::rgb(205, 205, 205);

    pub const PALETTE: [Color; 16] = [
        BLACK,
        BLUE,
        RED,
        MAGENTA,
        GREEN,
        CYAN,
        YELLOW,
        WHITE,
        Color::BLACK,
        Color::BRIGHT_BLUE,
        Color::BRIGHT_RED,
        Color::BRIGHT_MAGENTA,
        Color::BRIGHT_GREEN,
        Color::BRIGHT_CYAN,
        Color::BRIGHT_YELLOW,
        Color::WHITE,
    ];
}

/// Commodore 64 palette in hardware order.
pub mod c64 {
    use super::Color;

    pub const BLACK: Color = Color::BLACK;
    pub const WHITE: Color = Color::WHITE;
    pub const RED: Color = Color::rgb(146, 74, 64);
    pub const CYAN: Color = Color::rgb(132, 197, 204);
    pub const PURPLE: Color = Color::rgb(147, 81, 182);
    pub const GREEN: Color = Color::rgb(114, 177, 75);
    pub const BLUE: Color = Color::rgb(72, 58, 170);
    pub const YELLOW: Color = Color::rgb(213, 223, 124);
    pub const ORANGE: Color = Color::rgb(153, 105, 45);
    pub const BROWN: Color = Color::rgb(103, 82, 0);
    pub const LIGHT_RED: Color = Color::rgb(193, 129, 120);
    pub const DARK_GREY: Color = Color::rgb(96, 96, 96);
    pub const GREY: Color = Color::rgb(138, 138, 138);
    pub const LIGHT_GREEN: Color = Color::rgb(179, 236, 145);
    pub const LIGHT_BLUE: Color = Color::rgb(134, 122, 222);
    pub const LIGHT_GREY: Color = Color::rgb(179, 179, 179);

    pub const PALETTE: [Color; 16] = [
        BLACK, WHITE, RED, CYAN, PURPLE, GREEN, BLUE, YELLOW, ORANGE, BROWN, LIGHT_RED,
        DARK_GREY, GREY, LIGHT_GREEN, LIGHT_BLUE, LIGHT_GREY,
    ];
}
