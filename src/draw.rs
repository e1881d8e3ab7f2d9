// Software drawing onto a PixelSurface.
// Every function takes surface coordinates as f64, truncates them to whole
// pixels and clips silently: drawing off the edge is never an error.
// Colors with alpha below 255 are blended into what is already there.

use crate::color::Color;
use crate::font::Font;
use crate::surface::PixelSurface;
use crate::texture::Texture;
use crate::types::Rect;

// Keeps all integer math below comfortably inside i32/i64.
const COORD_LIMIT: f64 = (1 << 24) as f64;

/// Truncate a coordinate to a pixel index (toward zero, NaN -> 0).
#[inline]
fn px(v: f64) -> i32 {
    v.clamp(-COORD_LIMIT, COORD_LIMIT) as i32
}

/// Does the box [x0, x1] x [y0, y1] touch the surface at all?
#[inline]
fn touches(s: &PixelSurface, x0: i32, y0: i32, x1: i32, y1: i32) -> bool {
    x1 >= 0 && y1 >= 0 && (x0 as i64) < s.width() as i64 && (y0 as i64) < s.height() as i64
}

/// Conservative reject on the raw f64 box (corners in any order), done
/// before `px` clamps anything. Two pixels of slack cover truncation.
#[inline]
fn far_off(s: &PixelSurface, x0: f64, y0: f64, x1: f64, y1: f64) -> bool {
    let (w, h) = (s.width() as f64, s.height() as f64);
    x0.max(x1) < -2.0 || y0.max(y1) < -2.0 || x0.min(x1) >= w + 2.0 || y0.min(y1) >= h + 2.0
}

/// Plot a single pixel.
pub fn set_pixel(s: &mut PixelSurface, x: f64, y: f64, color: Color) {
    s.plot(px(x), px(y), color);
}

/// Draw a 1-pixel line between (x1, y1) and (x2, y2), both ends included.
pub fn draw_line(s: &mut PixelSurface, x1: f64, y1: f64, x2: f64, y2: f64, color: Color) {
    if far_off(s, x1, y1, x2, y2) {
        return;
    }
    let (mut x, mut y, x2, y2) = (px(x1), px(y1), px(x2), px(y2));
    if !touches(s, x.min(x2), y.min(y2), x.max(x2), y.max(y2)) {
        return;
    }

    let dy = (y2 - y).abs();
    if dy == 0 {
        s.hline(x, x2, y, color);
        return;
    }
    let dx = (x2 - x).abs();
    if dx == 0 {
        s.vline(x, y, y2, color);
        return;
    }

    // Bresenham, error term err = dx - dy.
    let sx = if x < x2 { 1 } else { -1 };
    let sy = if y < y2 { 1 } else { -1 };
    let mut err = dx - dy;
    loop {
        s.plot(x, y, color);
        if x == x2 && y == y2 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}

/// Outline the box from (x, y) to (x + w, y + h), corners included.
pub fn draw_rect(s: &mut PixelSurface, x: f64, y: f64, w: f64, h: f64, color: Color) {
    let (ix, iy, iw, ih) = (px(x), px(y), px(w), px(h));
    if iw <= 0 || ih <= 0 {
        return;
    }
    s.hline(ix, ix + iw, iy, color);
    s.hline(ix, ix + iw, iy + ih, color);
    // Corners already drawn by the horizontal edges.
    if ih > 1 {
        s.vline(ix, iy + 1, iy + ih - 1, color);
        s.vline(ix + iw, iy + 1, iy + ih - 1, color);
    }
}

/// Fill the `w` x `h` box whose top-left corner is (x, y).
pub fn fill_rect(s: &mut PixelSurface, x: f64, y: f64, w: f64, h: f64, color: Color) {
    s.fill_rect(px(x), px(y), px(w), px(h), color);
}

/// Outline a circle with the integer midpoint algorithm.
pub fn draw_circle(s: &mut PixelSurface, x: f64, y: f64, r: f64, color: Color) {
    if !(r > 0.0) || far_off(s, x - r, y - r, x + r, y + r) {
        return;
    }
    let (cx, cy, r) = (px(x), px(y), px(r));
    if !touches(s, cx - r, cy - r, cx + r, cy + r) {
        return;
    }

    let (mut ex, mut ey) = (0, r);
    let mut err = 3 - 2 * r;
    while ey >= ex {
        s.plot(cx + ex, cy - ey, color);
        s.plot(cx + ey, cy - ex, color);
        s.plot(cx + ey, cy + ex, color);
        s.plot(cx + ex, cy + ey, color);
        s.plot(cx - ex, cy + ey, color);
        s.plot(cx - ey, cy + ex, color);
        s.plot(cx - ey, cy - ex, color);
        s.plot(cx - ex, cy - ey, color);
        // Strict `>` here, `>=` in fill_circle: the two can differ by a pixel.
        if err > 0 {
            err += 4 * (ex - ey) + 10;
            ey -= 1;
        } else {
            err += 4 * ex + 6;
        }
        ex += 1;
    }
}

/// Fill a circle: same walk as `draw_circle`, spans instead of points.
pub fn fill_circle(s: &mut PixelSurface, x: f64, y: f64, r: f64, color: Color) {
    if !(r > 0.0) || far_off(s, x - r, y - r, x + r, y + r) {
        return;
    }
    let (cx, cy, r) = (px(x), px(y), px(r));
    if !touches(s, cx - r, cy - r, cx + r, cy + r) {
        return;
    }

    let (mut ex, mut ey) = (0, r);
    let mut err = 3 - 2 * r;
    while ey >= ex {
        s.hline(cx - ex, cx + ex, cy - ey, color);
        s.hline(cx - ey, cx + ey, cy - ex, color);
        s.hline(cx - ey, cx + ey, cy + ex, color);
        s.hline(cx - ex, cx + ex, cy + ey, color);
        if err >= 0 {
            err += 4 * (ex - ey) + 10;
            ey -= 1;
        } else {
            err += 4 * ex + 6;
        }
        ex += 1;
    }
}

/// Walk one quadrant of an ellipse with the two-region midpoint algorithm,
/// handing every (ex, ey) offset to `emit`.
///
/// The squared radii come from the unrounded float radii, the start points
/// from the truncated ones. Decision variables can get large, hence i128.
fn walk_ellipse(rx: f64, ry: f64, mut emit: impl FnMut(i32, i32)) {
    let rx = rx.min(COORD_LIMIT);
    let ry = ry.min(COORD_LIMIT);
    let a2 = (rx * rx) as i128;
    let b2 = (ry * ry) as i128;
    let (fa2, fb2) = (4 * a2, 4 * b2);

    // Region 1: from the top, stepping x.
    let (mut ex, mut ey) = (0i128, ry as i128);
    let mut sigma = 2 * b2 + a2 * (1 - 2 * ey);
    while b2 * ex <= a2 * ey {
        emit(ex as i32, ey as i32);
        if sigma >= 0 {
            sigma += fa2 * (1 - ey);
            ey -= 1;
        }
        sigma += b2 * (4 * ex + 6);
        ex += 1;
    }

    // Region 2: from the side, stepping y.
    let (mut ex, mut ey) = (rx as i128, 0i128);
    let mut sigma = 2 * a2 + b2 * (1 - 2 * ex);
    while a2 * ey <= b2 * ex {
        emit(ex as i32, ey as i32);
        if sigma >= 0 {
            sigma += fb2 * (1 - ex);
            ex -= 1;
        }
        sigma += a2 * (4 * ey + 6);
        ey += 1;
    }
}

/// Outline an axis-aligned ellipse centred on (x, y).
pub fn draw_ellipse(s: &mut PixelSurface, x: f64, y: f64, rx: f64, ry: f64, color: Color) {
    if !(rx > 0.0 && ry > 0.0) || far_off(s, x - rx, y - ry, x + rx, y + ry) {
        return;
    }
    let (cx, cy) = (px(x), px(y));
    let (irx, iry) = (px(rx), px(ry));
    if !touches(s, cx - irx, cy - iry, cx + irx, cy + iry) {
        return;
    }
    walk_ellipse(rx, ry, |ex, ey| {
        s.plot(cx + ex, cy + ey, color);
        s.plot(cx - ex, cy + ey, color);
        s.plot(cx + ex, cy - ey, color);
        s.plot(cx - ex, cy - ey, color);
    });
}

/// Fill an axis-aligned ellipse centred on (x, y).
pub fn fill_ellipse(s: &mut PixelSurface, x: f64, y: f64, rx: f64, ry: f64, color: Color) {
    if !(rx > 0.0 && ry > 0.0) || far_off(s, x - rx, y - ry, x + rx, y + ry) {
        return;
    }
    let (cx, cy) = (px(x), px(y));
    let (irx, iry) = (px(rx), px(ry));
    if !touches(s, cx - irx, cy - iry, cx + irx, cy + iry) {
        return;
    }
    walk_ellipse(rx, ry, |ex, ey| {
        s.hline(cx - ex, cx + ex, cy + ey, color);
        s.hline(cx - ex, cx + ex, cy - ey, color);
    });
}

/* ---------- Text ---------- */

fn blit_char(s: &mut PixelSurface, font: &Font, x: i32, y: i32, ch: u8, bg: Color, fg: Color) {
    for row in 0..font.height() {
        for col in 0..font.width() {
            let (dx, dy) = (x + col as i32, y + row as i32);
            if font.pixel(ch, col, row) {
                s.plot(dx, dy, fg);
            } else if bg != Color::TRANSPARENT {
                s.plot(dx, dy, bg);
            }
        }
    }
}

/// Draw one character. Codes outside the font's range use the nearest
/// glyph. A `Color::TRANSPARENT` background leaves cleared bits untouched.
pub fn draw_char(
    s: &mut PixelSurface,
    font: &Font,
    x: f64,
    y: f64,
    ch: u8,
    bg: Color,
    fg: Color,
) {
    blit_char(s, font, px(x), px(y), ch, bg, fg);
}

/// Draw a string left to right, one cell per character.
/// Each character is reduced to the low byte of its code point, then
/// clamped to the font's range like any other code.
pub fn draw_string(
    s: &mut PixelSurface,
    font: &Font,
    x: f64,
    y: f64,
    text: &str,
    bg: Color,
    fg: Color,
) {
    let (mut ix, iy) = (px(x), px(y));
    let cell = font.width() as i32;
    let count = text.chars().count().min(COORD_LIMIT as usize) as i32;
    let right = ix.saturating_add(count.saturating_mul(cell));
    if !touches(s, ix, iy, right, iy + font.height() as i32) {
        return;
    }
    for ch in text.chars() {
        // Low byte of the code point, then clamped to the font's range.
        let code = ch as u8;
        blit_char(s, font, ix, iy, code, bg, fg);
        ix += cell;
        if ix > s.width() as i32 {
            break;
        }
    }
}

/* ---------- Textures ---------- */

/// Draw the whole texture with its top-left corner at (x, y).
pub fn draw_texture(s: &mut PixelSurface, x: f64, y: f64, t: &Texture) {
    draw_texture_rect(s, x, y, t.bounds(), t);
}

/// Draw the `src` region of a texture with its top-left corner at (x, y).
///
/// `src` is clipped to the texture, then the result to the surface, one
/// edge at a time. Opaque texels are copied, the rest are blended.
pub fn draw_texture_rect(s: &mut PixelSurface, x: f64, y: f64, src: Rect, t: &Texture) {
    let (mut x, mut y) = (px(x), px(y));
    let Rect {
        x: mut sx,
        y: mut sy,
        w: mut sw,
        h: mut sh,
    } = src;

    // Source edges against the texture. Trimming the left/top of the source
    // moves the destination along with it.
    if sx < 0 {
        x = x.saturating_sub(sx);
        sw = sw.saturating_add(sx);
        sx = 0;
    }
    if sy < 0 {
        y = y.saturating_sub(sy);
        sh = sh.saturating_add(sy);
        sy = 0;
    }
    sw = sw.min((t.width() as i32).saturating_sub(sx));
    sh = sh.min((t.height() as i32).saturating_sub(sy));

    // Destination edges against the surface.
    if x < 0 {
        sx = sx.saturating_sub(x);
        sw = sw.saturating_add(x);
        x = 0;
    }
    if y < 0 {
        sy = sy.saturating_sub(y);
        sh = sh.saturating_add(y);
        y = 0;
    }
    sw = sw.min((s.width() as i32).saturating_sub(x));
    sh = sh.min((s.height() as i32).saturating_sub(y));

    if sw <= 0 || sh <= 0 {
        return;
    }

    let (x, y, sx, sy) = (x as usize, y as usize, sx as usize, sy as usize);
    let (sw, sh) = (sw as usize, sh as usize);
    for row in 0..sh {
        let src_row = t.span(sx, sy + row, sw);
        let dst_row = s.span_mut(x, y + row, sw);
        for (d, &c) in dst_row.iter_mut().zip(src_row) {
            c.over(d);
        }
    }
}

/// Draw the `src` region of a texture rotated by `angle` radians and scaled
/// by `(scale_x, scale_y)` around `pivot`, a point given relative to the top
/// left of `src`. The pivot lands on (x, y).
///
/// Each destination pixel in the rotated bounding box is mapped back into
/// the texture. Texels that match the texture's color-key (pixel 0) are
/// skipped.
#[allow(clippy::too_many_arguments)]
pub fn draw_texture_rotated(
    s: &mut PixelSurface,
    x: f64,
    y: f64,
    src: Rect,
    pivot: (i32, i32),
    scale_x: f64,
    scale_y: f64,
    angle: f64,
    t: &Texture,
) {
    if src.is_empty() || !(scale_x > 0.0 && scale_y > 0.0) || !angle.is_finite() {
        return;
    }
    let (src_x, src_y) = (src.x as i64, src.y as i64);
    let (src_r, src_b) = (src_x + src.w as i64, src_y + src.h as i64);
    if src_x < 0 || src_y < 0 || src_r > t.width() as i64 || src_b > t.height() as i64 {
        return;
    }
    let Some(key) = t.transparent_key() else {
        return;
    };

    let (ix, iy) = (px(x), px(y));
    let (cx, cy) = pivot;
    let (sin, cos) = angle.sin_cos();

    // Corners of the scaled source box, pivot at the origin, then rotated.
    let w = src.w as f64 * scale_x;
    let h = src.h as f64 * scale_y;
    let left = -(cx as f64) * scale_x;
    let top = -(cy as f64) * scale_y;
    let corners = [
        (left, top),
        (left + w, top),
        (left + w, top + h),
        (left, top + h),
    ]
    .map(|(rx, ry)| (cos * rx - sin * ry, sin * rx + cos * ry));

    let lo = |v: [f64; 4]| v.into_iter().fold(f64::INFINITY, f64::min);
    let hi = |v: [f64; 4]| v.into_iter().fold(f64::NEG_INFINITY, f64::max);
    let (xs, ys) = (corners.map(|c| c.0), corners.map(|c| c.1));
    // Bounding box, widened by 10% so truncation never shaves an edge.
    let min_x = px(lo(xs).floor() * 1.1);
    let min_y = px(lo(ys).floor() * 1.1);
    let max_x = px(hi(xs).ceil() * 1.1);
    let max_y = px(hi(ys).ceil() * 1.1);

    if !touches(s, ix + min_x, iy + min_y, ix + max_x, iy + max_y) {
        return;
    }

    // Only the part of the box that lands on the surface.
    let row_range = min_y.max(-iy)..max_y.min(s.height() as i32 - iy);
    let col_range = min_x.max(-ix)..max_x.min(s.width() as i32 - ix);

    let (inv_x, inv_y) = (1.0 / scale_x, 1.0 / scale_y);
    // Source bounds in f64; a tiny scale can push the mapped texel far out
    // of integer range, so the range check happens before any cast.
    let (left, right) = (src_x as f64, src_r as f64);
    let (top, bottom) = (src_y as f64, src_b as f64);
    let (cx, cy) = (f64::from(cx), f64::from(cy));
    for dy in row_range {
        for dx in col_range.clone() {
            let (fx, fy) = (dx as f64, dy as f64);
            // Inverse rotation. The y term is negated: raster y points down.
            let tx = left + (0.5 + (cos * fx + sin * fy) * inv_x).trunc() + cx;
            let ty = top - (0.5 + (sin * fx - cos * fy) * inv_y).trunc() + cy;
            // Written so NaN fails too.
            if !(tx >= left && tx < right && ty >= top && ty < bottom) {
                continue;
            }
            let Some(texel) = t.get(tx as usize, ty as usize) else {
                continue;
            };
            if texel != key {
                s.plot(ix + dx, iy + dy, texel);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FONT_6X8;

    const BG: Color = Color::rgb(10, 20, 30);

    fn surface(w: usize, h: usize) -> PixelSurface {
        let mut s = PixelSurface::new(w, h);
        s.clear(BG);
        s
    }

    /// Coordinates of every pixel that differs from the background.
    fn touched(s: &PixelSurface) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for y in 0..s.height() as i32 {
            for x in 0..s.width() as i32 {
                if s.get(x, y) != Some(BG) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    /// 10x10 texture whose texel at (x, y) is rgb(x, y, 1), all opaque.
    fn gradient(w: usize, h: usize) -> Texture {
        let pixels = (0..h)
            .flat_map(|y| (0..w).map(move |x| Color::rgb(x as u8, y as u8, 1)))
            .collect();
        Texture::from_pixels(w, h, pixels).unwrap()
    }

    #[test]
    fn fill_rect_scenario() {
        let mut s = surface(320, 240);
        fill_rect(&mut s, 100.0, 100.0, 50.0, 50.0, Color::RED);
        fill_rect(&mut s, 110.0, 110.0, 10.0, 10.0, Color::BLUE);
        assert_eq!(s.get(115, 115), Some(Color::BLUE));
        assert_eq!(s.get(101, 101), Some(Color::RED));
        assert_eq!(s.get(99, 99), Some(BG));
        assert_eq!(s.get(149, 149), Some(Color::RED));
        assert_eq!(s.get(150, 150), Some(BG));
    }

    #[test]
    fn everything_off_surface_is_a_noop() {
        let mut s = surface(32, 24);
        let font = &FONT_6X8;
        let tex = gradient(10, 10);
        for (x, y) in [(-500.0, 5.0), (5.0, -500.0), (500.0, 5.0), (5.0, 500.0)] {
            set_pixel(&mut s, x, y, Color::RED);
            draw_line(&mut s, x, y, x + 20.0 * x.signum(), y + 3.0, Color::RED);
            draw_rect(&mut s, x, y, 10.0, 10.0, Color::RED);
            fill_rect(&mut s, x, y, 10.0, 10.0, Color::RED);
            draw_circle(&mut s, x, y, 8.0, Color::RED);
            fill_circle(&mut s, x, y, 8.0, Color::RED);
            draw_ellipse(&mut s, x, y, 9.0, 4.0, Color::RED);
            fill_ellipse(&mut s, x, y, 9.0, 4.0, Color::RED);
            draw_string(&mut s, font, x, y, "HELLO", Color::BLACK, Color::RED);
            draw_texture(&mut s, x, y, &tex);
            draw_texture_rotated(&mut s, x, y, tex.bounds(), (5, 5), 1.0, 1.0, 0.7, &tex);
        }
        // Absurd values must not panic either.
        draw_line(&mut s, f64::MAX, f64::MIN, f64::NAN, 1e300, Color::RED);
        fill_circle(&mut s, -1e12, 0.0, 1e12 - 1e6, Color::RED);
        draw_ellipse(&mut s, -1e9, -1e9, 1e9 - 1e6, 1e18, Color::RED);
        assert!(touched(&s).is_empty());
    }

    #[test]
    fn degenerate_sizes_draw_nothing() {
        let mut s = surface(16, 16);
        draw_rect(&mut s, 2.0, 2.0, 0.0, 5.0, Color::RED);
        fill_rect(&mut s, 2.0, 2.0, 5.0, -1.0, Color::RED);
        draw_circle(&mut s, 8.0, 8.0, 0.0, Color::RED);
        fill_circle(&mut s, 8.0, 8.0, -3.0, Color::RED);
        draw_ellipse(&mut s, 8.0, 8.0, 0.0, 3.0, Color::RED);
        fill_ellipse(&mut s, 8.0, 8.0, 3.0, f64::NAN, Color::RED);
        assert!(touched(&s).is_empty());
    }

    #[test]
    fn lines_include_both_endpoints() {
        let mut s = surface(20, 20);
        draw_line(&mut s, 1.0, 2.0, 11.0, 6.0, Color::WHITE);
        assert_eq!(s.get(1, 2), Some(Color::WHITE));
        assert_eq!(s.get(11, 6), Some(Color::WHITE));
        // One pixel per column on a shallow line.
        let pts = touched(&s);
        assert_eq!(pts.len(), 11);

        let mut s = surface(20, 20);
        draw_line(&mut s, 15.9, 3.2, 4.0, 3.9, Color::WHITE);
        assert_eq!(touched(&s), (4..=15).map(|x| (x, 3)).collect::<Vec<_>>());

        let mut s = surface(20, 20);
        draw_line(&mut s, 7.0, 18.0, 7.0, 2.0, Color::WHITE);
        assert_eq!(touched(&s).len(), 17);
    }

    #[test]
    fn translucent_line_blends() {
        let mut s = surface(8, 8);
        draw_line(&mut s, 0.0, 0.0, 5.0, 5.0, Color::rgba(255, 255, 255, 0));
        assert!(touched(&s).is_empty());
    }

    #[test]
    fn rect_outline_is_inclusive() {
        let mut s = surface(12, 12);
        draw_rect(&mut s, 2.0, 3.0, 4.0, 2.0, Color::GREEN);
        let pts = touched(&s);
        // 5 wide x 3 tall box outline: 5 + 5 + 1 + 1 pixels.
        assert_eq!(pts.len(), 12);
        assert!(pts.contains(&(2, 3)) && pts.contains(&(6, 5)));
        assert_eq!(s.get(4, 4), Some(BG));
    }

    #[test]
    fn circle_pixels_hug_the_radius() {
        for r in 1..=30 {
            let mut outline = surface(80, 80);
            let mut disc = surface(80, 80);
            draw_circle(&mut outline, 40.0, 40.0, r as f64, Color::WHITE);
            fill_circle(&mut disc, 40.0, 40.0, r as f64, Color::WHITE);
            let rf = r as f64;

            let outline = touched(&outline);
            let disc = touched(&disc);
            for &(x, y) in &outline {
                let d = ((x - 40) as f64).hypot((y - 40) as f64);
                assert!((d - rf).abs() <= 1.0, "r={r} ({x},{y}) d={d}");
                assert!(disc.contains(&(x, y)), "r={r} ({x},{y}) not in disc");
            }
            for &(x, y) in &disc {
                let d = ((x - 40) as f64).hypot((y - 40) as f64);
                assert!(d <= rf + 0.5, "r={r} ({x},{y}) d={d}");
            }
            assert!(disc.contains(&(40, 40)));
        }
    }

    #[test]
    fn ellipse_reaches_its_radii() {
        let mut s = surface(40, 30);
        draw_ellipse(&mut s, 20.0, 15.0, 10.0, 5.0, Color::WHITE);
        for p in [(30, 15), (10, 15), (20, 20), (20, 10)] {
            assert_eq!(s.get(p.0, p.1), Some(Color::WHITE), "{p:?}");
        }
        assert!(touched(&s).iter().all(|&(x, y)| (10..=30).contains(&x) && (10..=20).contains(&y)));
        assert_eq!(s.get(20, 15), Some(BG));

        let mut f = surface(40, 30);
        fill_ellipse(&mut f, 20.0, 15.0, 10.0, 5.0, Color::WHITE);
        let filled = touched(&f);
        assert!(touched(&s).iter().all(|p| filled.contains(p)));
        assert_eq!(f.get(20, 15), Some(Color::WHITE));
    }

    #[test]
    fn text_uses_cell_width_and_transparent_background() {
        let mut s = surface(40, 10);
        draw_string(&mut s, &FONT_6X8, 0.0, 0.0, "II", Color::TRANSPARENT, Color::WHITE);
        // Top row of 'I' is columns 1..=3 of each 6-pixel cell.
        for x in 0..12 {
            let on = matches!(x, 1..=3 | 7..=9);
            let expected = if on { Color::WHITE } else { BG };
            assert_eq!(s.get(x, 0), Some(expected), "x={x}");
        }

        // U+0141 keeps only its low byte, 0x41 'A'.
        let mut wide = surface(20, 10);
        let mut plain = surface(20, 10);
        draw_string(&mut wide, &FONT_6X8, 0.0, 0.0, "\u{141}", Color::TRANSPARENT, Color::WHITE);
        draw_string(&mut plain, &FONT_6X8, 0.0, 0.0, "A", Color::TRANSPARENT, Color::WHITE);
        assert_eq!(wide, plain);
        assert!(!touched(&wide).is_empty());

        let mut s = surface(40, 10);
        draw_char(&mut s, &FONT_6X8, 0.0, 0.0, b' ', Color::BLACK, Color::WHITE);
        for y in 0..8 {
            for x in 0..6 {
                assert_eq!(s.get(x, y), Some(Color::BLACK));
            }
        }
        assert_eq!(s.get(6, 0), Some(BG));
    }

    #[test]
    fn texture_blit_clips_at_top_left() {
        let tex = gradient(10, 10);
        let mut s = surface(20, 20);
        draw_texture(&mut s, -5.0, -5.0, &tex);
        for y in 0..20 {
            for x in 0..20 {
                let expected = if x < 5 && y < 5 {
                    Color::rgb(x as u8 + 5, y as u8 + 5, 1)
                } else {
                    BG
                };
                assert_eq!(s.get(x, y), Some(expected), "({x},{y})");
            }
        }
    }

    #[test]
    fn texture_rect_clips_at_bottom_right_and_source() {
        let tex = gradient(10, 10);
        let mut s = surface(20, 20);
        // Source runs past the texture on the right; destination past the surface bottom.
        draw_texture_rect(&mut s, 15.0, 17.0, Rect::new(6, 2, 8, 8), &tex);
        let pts = touched(&s);
        assert_eq!(pts.len(), 4 * 3);
        assert_eq!(s.get(15, 17), Some(Color::rgb(6, 2, 1)));
        assert_eq!(s.get(18, 19), Some(Color::rgb(9, 4, 1)));

        // Negative source origin shifts the destination with it.
        let mut s = surface(20, 20);
        draw_texture_rect(&mut s, 0.0, 0.0, Rect::new(-2, 0, 4, 1), &tex);
        assert_eq!(touched(&s), vec![(2, 0), (3, 0)]);
        assert_eq!(s.get(2, 0), Some(Color::rgb(0, 0, 1)));
    }

    #[test]
    fn texture_alpha_blends_instead_of_keying() {
        let tex = Texture::from_pixels(2, 1, vec![Color::TRANSPARENT, Color::WHITE]).unwrap();
        let mut s = surface(4, 4);
        draw_texture(&mut s, 0.0, 0.0, &tex);
        assert_eq!(s.get(0, 0).map(|c| (c.r(), c.g(), c.b())), Some((10, 20, 30)));
        assert_eq!(s.get(1, 0), Some(Color::WHITE));
    }

    #[test]
    fn rotated_blit_at_zero_angle() {
        // 4x4 texture; texel (0,0) is the color-key.
        let pixels = (0..16).map(|i| Color::rgb(i as u8, 0, 0)).collect();
        let tex = Texture::from_pixels(4, 4, pixels).unwrap();
        let mut s = surface(20, 20);
        draw_texture_rotated(&mut s, 5.0, 5.0, tex.bounds(), (0, 0), 1.0, 1.0, 0.0, &tex);

        // The key texel is skipped.
        assert_eq!(s.get(5, 5), Some(BG));
        assert_eq!(s.get(6, 5), Some(Color::rgb(1, 0, 0)));
        // Rows 0 and 1 both sample texture row 0, then it tracks dy - 1.
        assert_eq!(s.get(6, 6), Some(Color::rgb(1, 0, 0)));
        assert_eq!(s.get(6, 7), Some(Color::rgb(5, 0, 0)));
        assert_eq!(s.get(8, 8), Some(Color::rgb(11, 0, 0)));
        assert_eq!(s.get(9, 5), Some(BG));
    }

    #[test]
    fn rotated_blit_quarter_turn_about_centre() {
        let pixels = (0..16).map(|i| Color::rgb(i as u8, 0, 0)).collect();
        let tex = Texture::from_pixels(4, 4, pixels).unwrap();
        let mut s = surface(20, 20);
        let quarter = std::f64::consts::FRAC_PI_2;
        draw_texture_rotated(&mut s, 10.0, 10.0, tex.bounds(), (2, 2), 1.0, 1.0, quarter, &tex);

        let pts = touched(&s);
        assert!(!pts.is_empty());
        assert!(pts.iter().all(|&(x, y)| (8..12).contains(&x) && (8..12).contains(&y)));
        // Source column 1 lands on destination row 8 (right to left).
        assert_eq!(s.get(8, 8), Some(Color::rgb(13, 0, 0)));
        assert_eq!(s.get(11, 8), Some(Color::rgb(5, 0, 0)));
    }

    #[test]
    fn rotated_blit_rejects_bad_source() {
        let tex = gradient(4, 4);
        let mut s = surface(10, 10);
        draw_texture_rotated(&mut s, 2.0, 2.0, Rect::new(1, 1, 4, 4), (0, 0), 1.0, 1.0, 0.0, &tex);
        draw_texture_rotated(&mut s, 2.0, 2.0, tex.bounds(), (0, 0), 0.0, 1.0, 0.0, &tex);
        assert!(touched(&s).is_empty());
    }

    #[test]
    fn rotated_blit_survives_vanishing_scale() {
        let tex = gradient(4, 4);
        let mut s = surface(10, 10);
        for scale in [1e-20, 1e-300, f64::MIN_POSITIVE, 5e-324] {
            for angle in [0.0, 0.3, std::f64::consts::FRAC_PI_2, std::f64::consts::PI] {
                draw_texture_rotated(&mut s, 5.0, 5.0, tex.bounds(), (1, 1), scale, scale, angle, &tex);
            }
        }
        // The quad collapses onto the pivot, so only its neighbourhood can change.
        assert!(touched(&s).iter().all(|&(x, y)| (4..=6).contains(&x) && (4..=6).contains(&y)));
    }
}
