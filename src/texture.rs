// Decoded images kept as packed colors, same layout as a PixelSurface.
// Loaded once, read-only afterwards. Decoding itself is the `image` crate's
// job; all we do here is repack its RGBA pixels into `Color`s.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::ImageReader;
use log::debug;

use crate::color::Color;
use crate::error::Error;
use crate::types::Rect;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl Texture {
    /// Open and decode an image file (any format the `image` crate knows).
    /// Channels of any bit depth are scaled proportionally to 8 bits.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();

        // 1) Open the file; a missing file is reported separately from bad data.
        let file = File::open(path).map_err(|source| Error::TextureOpen {
            path: path.to_path_buf(),
            source,
        })?;

        // 2) Sniff the container format from the header and decode.
        let decoded = ImageReader::new(BufReader::new(file))
            .with_guessed_format()
            .map_err(|source| Error::TextureOpen {
                path: path.to_path_buf(),
                source,
            })?
            .decode()
            .map_err(|source| Error::TextureDecode {
                path: path.to_path_buf(),
                source,
            })?;

        // 3) Go through 16-bit RGBA so every source depth takes the same path.
        let rgba = decoded.to_rgba16();
        let (w, h) = rgba.dimensions();
        let scale = |v: u16| (v as u32 * 255 / 65535) as u8;
        let pixels = rgba
            .pixels()
            .map(|p| Color::rgba(scale(p[0]), scale(p[1]), scale(p[2]), scale(p[3])))
            .collect();

        debug!("loaded texture {} ({w}x{h})", path.display());
        Self::from_pixels(w as usize, h as usize, pixels)
    }

    /// Wrap already-packed pixels (row-major, `width * height` of them).
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Color>) -> Result<Self, Error> {
        if pixels.len() != width * height {
            return Err(Error::InvalidTexture(format!(
                "{width}x{height} texture needs {} pixels, got {}",
                width * height,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build from raw 8-bit RGBA bytes, four per pixel.
    pub fn from_rgba8(width: usize, height: usize, bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != width * height * 4 {
            return Err(Error::InvalidTexture(format!(
                "{width}x{height} texture needs {} bytes, got {}",
                width * height * 4,
                bytes.len()
            )));
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|p| Color::rgba(p[0], p[1], p[2], p[3]))
            .collect();
        Self::from_pixels(width, height, pixels)
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

    /// The whole texture as a source rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    /// Pixel 0 doubles as the color-key for the rotated blit.
    pub fn transparent_key(&self) -> Option<Color> {
        self.pixels.first().copied()
    }

    /// Read one texel; `None` outside the texture.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// Row `y`, columns `[x, x + len)`. The caller clips first.
    #[inline]
    pub(crate) fn span(&self, x: usize, y: usize, len: usize) -> &[Color] {
        let start = y * self.width + x;
        &self.pixels[start..start + len]
    }
}
