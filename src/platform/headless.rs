// A driver with no window at all. Presented frames land in memory, and the
// driver asks for shutdown after a fixed number of them. Handy for tests and
// for rendering offscreen.

use std::sync::atomic::Ordering;
use std::time::Duration;

use log::{debug, info};

use super::{PacedSink, PlatformDriver};
use crate::config::WindowConfig;
use crate::error::Error;
use crate::input::PhysicalInput;
use crate::scheduler::Shared;

type InputScript = Box<dyn FnMut(&PhysicalInput, usize) + Send>;

pub struct HeadlessDriver {
    max_presents: usize,
    presents: usize,
    window: Option<WindowConfig>,
    frame: Option<Vec<u32>>,
    script: Option<InputScript>,
}

impl HeadlessDriver {
    /// Stop after `max_presents` frames have been shown.
    pub fn new(max_presents: usize) -> Self {
        Self {
            max_presents,
            presents: 0,
            window: None,
            frame: None,
            script: None,
        }
    }

    /// Drive the physical input from a script. It is called on every poll
    /// with the number of frames presented so far.
    pub fn with_input<F>(mut self, script: F) -> Self
    where
        F: FnMut(&PhysicalInput, usize) + Send + 'static,
    {
        self.script = Some(Box::new(script));
        self
    }

    pub fn presents(&self) -> usize {
        self.presents
    }

    pub fn title(&self) -> Option<&str> {
        self.window.as_ref().map(|w| w.title.as_str())
    }

    /// Last presented frame as packed `0xAARRGGBB` words.
    pub fn last_frame(&self) -> Option<&[u32]> {
        self.frame.as_deref().filter(|_| self.presents > 0)
    }
}

impl PlatformDriver for HeadlessDriver {
    type Sink = PacedSink;

    fn create_window(&mut self, config: &WindowConfig) -> Result<(), Error> {
        if config.width == 0 || config.height == 0 {
            return Err(Error::WindowInit(format!(
                "cannot create a {}x{} surface",
                config.width, config.height
            )));
        }
        self.window = Some(config.clone());
        Ok(())
    }

    fn create_device(&mut self) -> Result<(), Error> {
        let w = self
            .window
            .as_ref()
            .ok_or_else(|| Error::DeviceInit("no window to present into".into()))?;
        self.frame = Some(vec![0; w.width * w.height]);
        Ok(())
    }

    fn set_window_title(&mut self, title: &str) {
        if let Some(w) = self.window.as_mut() {
            w.title = title.to_string();
        }
    }

    fn frame_sink(&self) -> PacedSink {
        PacedSink::new(self.window.as_ref().map_or(60, |w| w.present_fps))
    }

    fn run_event_loop(&mut self, shared: &Shared) -> Result<(), Error> {
        let frame = self
            .frame
            .as_mut()
            .ok_or_else(|| Error::WindowUpdate("event loop started without a device".into()))?;

        while !shared.shutdown_requested() {
            if let Some(script) = self.script.as_mut() {
                script(shared.input(), self.presents);
            }
            let shown = shared.render().present_with(|pixels, _, _| {
                for (dst, src) in frame.iter_mut().zip(pixels) {
                    *dst = src.load(Ordering::Relaxed);
                }
            });
            if shown {
                self.presents += 1;
                debug!("headless present #{}", self.presents);
                if self.presents >= self.max_presents {
                    info!("presented {} frames, shutting down", self.presents);
                    shared.request_shutdown();
                }
            } else {
                std::thread::sleep(Duration::from_millis(1));
            }
        }
        Ok(())
    }
}
