// softgfx: a small software-rendered 2D framework.
//
// The application draws into a `PixelSurface` on its own update thread.
// Finished frames go through a single-slot `RenderSlot` to a
// `PlatformDriver`, which shows them and feeds keyboard/mouse state back.

pub mod animation;
pub mod color;
pub mod config;
pub mod draw;
pub mod error;
pub mod font;
pub mod input;
pub mod platform;
pub mod render;
pub mod scheduler;
pub mod sprite;
pub mod surface;
pub mod texture;
pub mod types;

pub use color::Color;
pub use config::{AnimationConfig, Config, SchedulerConfig, WindowConfig};
pub use error::Error;
pub use font::{FONT_6X8, Font};
pub use input::{InputState, Key, PhysicalInput};
pub use platform::{FrameSink, HeadlessDriver, MinifbDriver, PacedSink, PlatformDriver};
pub use render::RenderSlot;
pub use scheduler::{Application, Context, FrameScheduler, RunState, Shared, run};
pub use surface::PixelSurface;
pub use texture::Texture;
pub use types::Rect;
