// Desktop window backed by minifb.
// The logical surface is blown up by integer factors (nearest neighbour)
// into a window-sized 0RGB buffer, which minifb then shows.

use std::sync::atomic::{AtomicU32, Ordering};

use ::minifb::{Key as NativeKey, MouseButton, MouseMode, Window, WindowOptions};
use log::info;

use super::{PacedSink, PlatformDriver};
use crate::config::WindowConfig;
use crate::error::Error;
use crate::input::{Key, PhysicalInput};
use crate::scheduler::Shared;

// minifb key -> our key code. Keys without a counterpart are not tracked.
const KEY_MAP: &[(NativeKey, Key)] = &[
    (NativeKey::Backspace, Key::Back),
    (NativeKey::Tab, Key::Tab),
    (NativeKey::Enter, Key::Return),
    (NativeKey::NumPadEnter, Key::Return),
    (NativeKey::Pause, Key::Pause),
    (NativeKey::Escape, Key::Escape),
    (NativeKey::Space, Key::Space),
    (NativeKey::PageUp, Key::PageUp),
    (NativeKey::PageDown, Key::PageDown),
    (NativeKey::End, Key::End),
    (NativeKey::Home, Key::Home),
    (NativeKey::Left, Key::Left),
    (NativeKey::Up, Key::Up),
    (NativeKey::Right, Key::Right),
    (NativeKey::Down, Key::Down),
    (NativeKey::Insert, Key::Insert),
    (NativeKey::Delete, Key::Delete),
    (NativeKey::Key0, Key::Key0),
    (NativeKey::Key1, Key::Key1),
    (NativeKey::Key2, Key::Key2),
    (NativeKey::Key3, Key::Key3),
    (NativeKey::Key4, Key::Key4),
    (NativeKey::Key5, Key::Key5),
    (NativeKey::Key6, Key::Key6),
    (NativeKey::Key7, Key::Key7),
    (NativeKey::Key8, Key::Key8),
    (NativeKey::Key9, Key::Key9),
    (NativeKey::A, Key::A),
    (NativeKey::B, Key::B),
    (NativeKey::C, Key::C),
    (NativeKey::D, Key::D),
    (NativeKey::E, Key::E),
    (NativeKey::F, Key::F),
    (NativeKey::G, Key::G),
    (NativeKey::H, Key::H),
    (NativeKey::I, Key::I),
    (NativeKey::J, Key::J),
    (NativeKey::K, Key::K),
    (NativeKey::L, Key::L),
    (NativeKey::M, Key::M),
    (NativeKey::N, Key::N),
    (NativeKey::O, Key::O),
    (NativeKey::P, Key::P),
    (NativeKey::Q, Key::Q),
    (NativeKey::R, Key::R),
    (NativeKey::S, Key::S),
    (NativeKey::T, Key::T),
    (NativeKey::U, Key::U),
    (NativeKey::V, Key::V),
    (NativeKey::W, Key::W),
    (NativeKey::X, Key::X),
    (NativeKey::Y, Key::Y),
    (NativeKey::Z, Key::Z),
    (NativeKey::NumPad0, Key::NumPad0),
    (NativeKey::NumPad1, Key::NumPad1),
    (NativeKey::NumPad2, Key::NumPad2),
    (NativeKey::NumPad3, Key::NumPad3),
    (NativeKey::NumPad4, Key::NumPad4),
    (NativeKey::NumPad5, Key::NumPad5),
    (NativeKey::NumPad6, Key::NumPad6),
    (NativeKey::NumPad7, Key::NumPad7),
    (NativeKey::NumPad8, Key::NumPad8),
    (NativeKey::NumPad9, Key::NumPad9),
    (NativeKey::NumPadAsterisk, Key::Multiply),
    (NativeKey::NumPadPlus, Key::Add),
    (NativeKey::NumPadMinus, Key::Subtract),
    (NativeKey::NumPadDot, Key::Decimal),
    (NativeKey::NumPadSlash, Key::Divide),
    (NativeKey::F1, Key::F1),
    (NativeKey::F2, Key::F2),
    (NativeKey::F3, Key::F3),
    (NativeKey::F4, Key::F4),
    (NativeKey::F5, Key::F5),
    (NativeKey::F6, Key::F6),
    (NativeKey::F7, Key::F7),
    (NativeKey::F8, Key::F8),
    (NativeKey::F9, Key::F9),
    (NativeKey::F10, Key::F10),
    (NativeKey::F11, Key::F11),
    (NativeKey::F12, Key::F12),
    (NativeKey::F13, Key::F13),
    (NativeKey::F14, Key::F14),
    (NativeKey::F15, Key::F15),
    (NativeKey::ScrollLock, Key::ScrollLock),
    (NativeKey::LeftShift, Key::LeftShift),
    (NativeKey::RightShift, Key::RightShift),
    (NativeKey::LeftCtrl, Key::LeftControl),
    (NativeKey::RightCtrl, Key::RightControl),
];

const MOUSE_MAP: [(MouseButton, Key); 3] = [
    (MouseButton::Left, Key::MouseLeft),
    (MouseButton::Right, Key::MouseRight),
    (MouseButton::Middle, Key::MouseMiddle),
];

pub struct MinifbDriver {
    window: Option<Window>, // the on-screen window
    buffer: Vec<u32>,       // window-sized 0RGB pixels
    width: usize,
    height: usize,
    scale_x: usize,
    scale_y: usize,
    present_fps: u32,
}

impl Default for MinifbDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MinifbDriver {
    pub fn new() -> Self {
        Self {
            window: None,
            buffer: Vec::new(),
            width: 0,
            height: 0,
            scale_x: 1,
            scale_y: 1,
            present_fps: 60,
        }
    }

    fn poll_input(window: &Window, input: &PhysicalInput) {
        // Two native keys may share a code (both Enters); held if either is.
        let mut held = [false; crate::input::KEY_COUNT];
        for &(native, key) in KEY_MAP {
            held[key.index()] |= window.is_key_down(native);
        }
        for &(_, key) in KEY_MAP {
            input.set_key(key, held[key.index()]);
        }
        for (button, key) in MOUSE_MAP {
            input.set_key(key, window.get_mouse_down(button));
        }
        if let Some((mx, my)) = window.get_mouse_pos(MouseMode::Pass) {
            input.set_mouse_raw(f64::from(mx), f64::from(my));
        }
    }
}

impl PlatformDriver for MinifbDriver {
    type Sink = PacedSink;

    fn create_window(&mut self, config: &WindowConfig) -> Result<(), Error> {
        let (w, h) = (config.width * config.scale_x, config.height * config.scale_y);
        let mut window = Window::new(&config.title, w, h, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_position(config.x, config.y);
        window.set_target_fps(config.present_fps as usize);

        self.width = config.width;
        self.height = config.height;
        self.scale_x = config.scale_x;
        self.scale_y = config.scale_y;
        self.present_fps = config.present_fps;
        self.window = Some(window);
        info!("window {}x{} (scale {}x{})", w, h, config.scale_x, config.scale_y);
        Ok(())
    }

    fn create_device(&mut self) -> Result<(), Error> {
        if self.window.is_none() {
            return Err(Error::DeviceInit("no window to present into".into()));
        }
        self.buffer = vec![0; self.width * self.scale_x * self.height * self.scale_y];
        Ok(())
    }

    fn set_window_title(&mut self, title: &str) {
        if let Some(window) = self.window.as_mut() {
            window.set_title(title);
        }
    }

    fn frame_sink(&self) -> PacedSink {
        PacedSink::new(self.present_fps)
    }

    fn run_event_loop(&mut self, shared: &Shared) -> Result<(), Error> {
        let window = self
            .window
            .as_mut()
            .ok_or_else(|| Error::WindowUpdate("event loop started without a window".into()))?;
        let buffer = &mut self.buffer;
        let (sx, sy) = (self.scale_x, self.scale_y);

        while window.is_open() && !shared.shutdown_requested() {
            Self::poll_input(window, shared.input());

            let mut size = None;
            shared.render().present_with(|pixels, w, h| {
                scale_into(buffer, pixels, w, h, sx, sy);
                size = Some((w * sx, h * sy));
            });

            match size {
                Some((w, h)) => window
                    .update_with_buffer(buffer, w, h)
                    .map_err(|e| Error::WindowUpdate(e.to_string()))?,
                None => window.update(),
            }
        }
        info!("event loop finished");
        Ok(())
    }
}

// Nearest-neighbour upscale of a packed frame into a 0RGB window buffer.
fn scale_into(dst: &mut [u32], src: &[AtomicU32], w: usize, h: usize, sx: usize, sy: usize) {
    let dst_w = w * sx;
    if dst.len() < dst_w * h * sy {
        return;
    }
    for y in 0..h {
        let top = y * sy * dst_w;
        let line = &mut dst[top..top + dst_w];
        for (x, px) in src[y * w..(y + 1) * w].iter().enumerate() {
            let rgb = px.load(Ordering::Relaxed) & 0x00FF_FFFF; // minifb wants 0RGB
            line[x * sx..(x + 1) * sx].fill(rgb);
        }
        for r in 1..sy {
            dst.copy_within(top..top + dst_w, top + r * dst_w);
        }
    }
}
