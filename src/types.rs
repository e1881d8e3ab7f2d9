// Small value types shared by the drawing and sprite code.

/// An integer rectangle in pixels: top-left corner plus size.
/// Used for texture source regions and animation frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// True if (px, py) lies inside (right and bottom edges excluded).
    pub const fn contains(&self, px: i32, py: i32) -> bool {
        let (px, py) = (px as i64, py as i64);
        let (x, y) = (self.x as i64, self.y as i64);
        px >= x && px < x + self.w as i64 && py >= y && py < y + self.h as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_excludes_far_edges() {
        let r = Rect::new(-2, 3, 4, 2);
        assert!(r.contains(-2, 3));
        assert!(r.contains(1, 4));
        assert!(!r.contains(2, 4));
        assert!(!r.contains(0, 5));
        assert!(!Rect::new(i32::MAX, 0, i32::MAX, 1).contains(i32::MIN, 0));
    }

    #[test]
    fn empty_when_any_side_is_not_positive() {
        assert!(Rect::new(0, 0, 0, 5).is_empty());
        assert!(Rect::new(0, 0, 5, -1).is_empty());
        assert!(!Rect::new(0, 0, 1, 1).is_empty());
    }
}
