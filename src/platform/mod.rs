// What the core needs from an operating system, and nothing more.
//
// A `PlatformDriver` lives on the main thread: it opens the window, pumps
// native events into `PhysicalInput` and shows whatever the `RenderSlot`
// holds. Its `FrameSink` travels to the update thread and decides, tick by
// tick, whether the frame just drawn should be published.

pub mod headless;
pub mod minifb;

use crate::config::WindowConfig;
use crate::error::Error;
use crate::render::RenderSlot;
use crate::scheduler::Shared;
use crate::surface::PixelSurface;

pub use self::headless::HeadlessDriver;
pub use self::minifb::MinifbDriver;

/// Update-thread half of a platform.
pub trait FrameSink: Send {
    /// Per-tick housekeeping, run before input is reconciled.
    fn update(&mut self, _delta: f64) {}

    /// Offer the finished back buffer for presentation. Returns whether it
    /// was published. Must never block.
    fn render(&mut self, delta: f64, frame: &PixelSurface, slot: &RenderSlot) -> bool;
}

/// Main-thread half of a platform.
pub trait PlatformDriver {
    type Sink: FrameSink + 'static;

    fn create_window(&mut self, config: &WindowConfig) -> Result<(), Error>;

    /// Allocate whatever the presenter draws into. Needs a window.
    fn create_device(&mut self) -> Result<(), Error>;

    fn set_window_title(&mut self, title: &str);

    fn frame_sink(&self) -> Self::Sink;

    /// Block in the native event loop until the window closes or a
    /// shutdown is requested through `shared`.
    fn run_event_loop(&mut self, shared: &Shared) -> Result<(), Error>;
}

/// Publishes at most `fps` frames per second.
///
/// Elapsed time piles up until a period has passed; only then is a publish
/// tried. A refused publish (presenter busy) keeps the time, so the very
/// next tick tries again.
#[derive(Debug, Clone)]
pub struct PacedSink {
    period: f64,
    elapsed: f64,
}

impl PacedSink {
    pub fn new(fps: u32) -> Self {
        Self {
            period: 1.0 / f64::from(fps.max(1)),
            elapsed: 0.0,
        }
    }

    pub fn period(&self) -> f64 {
        self.period
    }
}

impl FrameSink for PacedSink {
    fn render(&mut self, delta: f64, frame: &PixelSurface, slot: &RenderSlot) -> bool {
        self.elapsed += delta;
        if self.elapsed < self.period {
            return false;
        }
        if !slot.try_publish(frame) {
            return false;
        }
        // Never bank more than one period, or a stall turns into a burst.
        self.elapsed = (self.elapsed - self.period).min(self.period);
        true
    }
}
