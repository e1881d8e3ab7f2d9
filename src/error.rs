// One error type for the whole crate.
// Every variant states *where* things went wrong. Drawing never shows up
// here: out-of-bounds draws are clipped, not reported.
use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the native window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String), // Presenting a frame / pumping events failed
    #[error("Device init error: {0}")]
    DeviceInit(String), // Allocating the presentation surface failed
    #[error("Cannot open texture {}: {source}", path.display())]
    TextureOpen { path: PathBuf, source: io::Error },
    #[error("Cannot decode texture {}: {source}", path.display())]
    TextureDecode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Invalid texture: {0}")]
    InvalidTexture(String), // Pixel data does not match the stated size
    #[error("Invalid font: {0}")]
    InvalidFont(String), // Glyph table does not match the stated size
    #[error("Config error: {0}")]
    Config(String),
    #[error("Update thread error: {0}")]
    UpdateThread(String), // Spawning or joining the update loop failed
}
