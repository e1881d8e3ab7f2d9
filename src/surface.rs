// The back buffer: a fixed-size, row-major grid of colors, origin top-left.
// Every primitive in `draw` ends up in one of the raw writes below. They
// take integer pixel coordinates, clip against the surface and never fail.

use crate::color::Color;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSurface {
    width: usize,
    height: usize,
    pixels: Vec<Color>, // length = width * height
}

impl PixelSurface {
    /// Allocate a surface filled with `Color::default()` (transparent black).
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::default(); width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Index of (x, y) if it lies on the surface.
    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    /// Read one pixel; `None` outside the surface.
    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Fill the whole surface with `color` (no blending).
    ///
    /// Seeds pixel 0, then keeps copying the filled prefix onto the rest,
    /// doubling it each pass. The last copy is cut to whatever remains.
    pub fn clear(&mut self, color: Color) {
        let len = self.pixels.len();
        if len == 0 {
            return;
        }
        self.pixels[0] = color;
        let mut filled = 1;
        while filled < len {
            let n = filled.min(len - filled);
            self.pixels.copy_within(0..n, filled);
            filled += n;
        }
    }

    /// Store `color` at (x, y) as-is, ignoring alpha.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Draw `color` at (x, y): overwrite when opaque, blend otherwise.
    #[inline]
    pub fn plot(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            color.over(&mut self.pixels[i]);
        }
    }

    /// Horizontal span from x1 to x2 inclusive (either order).
    pub fn hline(&mut self, x1: i32, x2: i32, y: i32, color: Color) {
        if y < 0 || y as usize >= self.height || self.width == 0 {
            return;
        }
        let (x1, x2) = if x2 < x1 { (x2, x1) } else { (x1, x2) };
        let x1 = x1.max(0);
        let x2 = x2.min(self.width as i32 - 1);
        if x1 > x2 {
            return;
        }
        let row = y as usize * self.width;
        let span = &mut self.pixels[row + x1 as usize..=row + x2 as usize];
        if color.is_opaque() {
            span.fill(color);
        } else {
            span.iter_mut().for_each(|p| color.over(p));
        }
    }

    /// Vertical span from y1 to y2 inclusive (either order).
    pub fn vline(&mut self, x: i32, y1: i32, y2: i32, color: Color) {
        if x < 0 || x as usize >= self.width || self.height == 0 {
            return;
        }
        let (y1, y2) = if y2 < y1 { (y2, y1) } else { (y1, y2) };
        let y1 = y1.max(0);
        let y2 = y2.min(self.height as i32 - 1);
        if y1 > y2 {
            return;
        }
        let x = x as usize;
        for y in y1 as usize..=y2 as usize {
            color.over(&mut self.pixels[y * self.width + x]);
        }
    }

    /// Fill the `w` x `h` box whose top-left corner is (x, y).
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        if w <= 0 || h <= 0 {
            return;
        }
        let left = x.max(0);
        let top = y.max(0);
        let right = x.saturating_add(w).min(self.width as i32);
        let bottom = y.saturating_add(h).min(self.height as i32);
        if left >= right || top >= bottom {
            return;
        }
        let (left, right) = (left as usize, right as usize);
        let (top, bottom) = (top as usize, bottom as usize);
        let stride = self.width;

        if color.is_opaque() {
            // First row by hand, the rest copied from the row above.
            self.pixels[top * stride + left..top * stride + right].fill(color);
            for row in top + 1..bottom {
                let prev = (row - 1) * stride;
                self.pixels
                    .copy_within(prev + left..prev + right, row * stride + left);
            }
        } else {
            for row in top..bottom {
                let start = row * stride;
                self.pixels[start + left..start + right]
                    .iter_mut()
                    .for_each(|p| color.over(p));
            }
        }
    }

    /// Mutable view of the pixels `[x, x + len)` on row `y`.
    /// The caller has already clipped the span to the surface.
    #[inline]
    pub(crate) fn span_mut(&mut self, x: usize, y: usize, len: usize) -> &mut [Color] {
        debug_assert!(x + len <= self.width && y < self.height);
        let start = y * self.width + x;
        &mut self.pixels[start..start + len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_all(s: &PixelSurface, c: Color) {
        assert!(s.pixels().iter().all(|&p| p == c));
    }

    #[test]
    fn clear_fills_every_pixel() {
        for (w, h) in [(1, 1), (3, 5), (640, 480), (7, 1), (1, 13)] {
            let mut s = PixelSurface::new(w, h);
            s.clear(Color::MAGENTA);
            assert_all(&s, Color::MAGENTA);
            s.clear(Color::rgba(1, 2, 3, 4));
            assert_all(&s, Color::rgba(1, 2, 3, 4));
        }
    }

    #[test]
    fn clear_on_empty_surface_is_noop() {
        let mut s = PixelSurface::new(0, 10);
        s.clear(Color::RED);
        assert!(s.pixels().is_empty());
    }

    #[test]
    fn writes_outside_are_dropped() {
        let mut s = PixelSurface::new(4, 4);
        let before = s.clone();
        s.set_pixel(-1, 0, Color::RED);
        s.plot(4, 0, Color::RED);
        s.plot(0, 4, Color::RED);
        s.hline(-10, -1, 2, Color::RED);
        s.hline(0, 3, 4, Color::RED);
        s.vline(5, 0, 3, Color::RED);
        s.vline(1, 4, 9, Color::RED);
        s.fill_rect(4, 4, 3, 3, Color::RED);
        s.fill_rect(-3, -3, 3, 3, Color::RED);
        s.fill_rect(0, 0, 0, 3, Color::RED);
        s.fill_rect(i32::MAX - 1, 0, i32::MAX, 3, Color::RED);
        assert_eq!(s, before);
    }

    #[test]
    fn hline_is_inclusive_and_clipped() {
        let mut s = PixelSurface::new(5, 2);
        s.hline(3, -4, 1, Color::WHITE);
        let row: Vec<_> = (0..5).map(|x| s.get(x, 1).unwrap()).collect();
        assert_eq!(row[..4], [Color::WHITE; 4]);
        assert_eq!(row[4], Color::default());
        assert!((0..5).all(|x| s.get(x, 0) == Some(Color::default())));
    }

    #[test]
    fn vline_swaps_endpoints() {
        let mut s = PixelSurface::new(3, 6);
        s.vline(2, 4, 1, Color::GREEN);
        for y in 0..6 {
            let expected = if (1..=4).contains(&y) { Color::GREEN } else { Color::default() };
            assert_eq!(s.get(2, y), Some(expected));
        }
    }

    #[test]
    fn fill_rect_clips_to_surface() {
        let mut s = PixelSurface::new(6, 6);
        s.fill_rect(-2, 3, 4, 10, Color::BLUE);
        for y in 0..6 {
            for x in 0..6 {
                let inside = x < 2 && y >= 3;
                let expected = if inside { Color::BLUE } else { Color::default() };
                assert_eq!(s.get(x, y), Some(expected), "({x},{y})");
            }
        }
    }

    #[test]
    fn translucent_fill_blends() {
        let mut s = PixelSurface::new(2, 2);
        s.clear(Color::rgb(0, 0, 255));
        s.fill_rect(0, 0, 1, 1, Color::rgba(255, 0, 0, 127));
        let p = s.get(0, 0).unwrap();
        assert_eq!((p.r(), p.g(), p.b()), (127, 0, 128));
        assert_eq!(s.get(1, 1), Some(Color::rgb(0, 0, 255)));
    }
}
