// Keyboard and mouse state in two layers.
//
// `PhysicalInput` is the raw "is it held right now" table. Only the
// platform thread writes it (from its event pump), so it is made of atomics
// and shared by reference.
//
// `InputState` is the logical view the application reads. The scheduler
// rebuilds it from a physical snapshot once per tick, so the application
// never sees a half-updated table.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Number of slots in the key tables; every `Key` discriminant fits.
pub const KEY_COUNT: usize = 256;

/// Keys and mouse buttons, numbered like Windows virtual-key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Key {
    MouseLeft = 0x01,
    MouseRight = 0x02,
    MouseMiddle = 0x03,
    Back = 0x08,
    Tab = 0x09,
    Clear = 0x0C,
    Return = 0x0D,
    Pause = 0x13,
    Escape = 0x1B,
    Space = 0x20,
    PageUp = 0x21,
    PageDown = 0x22,
    End = 0x23,
    Home = 0x24,
    Left = 0x25,
    Up = 0x26,
    Right = 0x27,
    Down = 0x28,
    Insert = 0x2D,
    Delete = 0x2E,
    Key0 = 0x30,
    Key1 = 0x31,
    Key2 = 0x32,
    Key3 = 0x33,
    Key4 = 0x34,
    Key5 = 0x35,
    Key6 = 0x36,
    Key7 = 0x37,
    Key8 = 0x38,
    Key9 = 0x39,
    A = 0x41,
    B = 0x42,
    C = 0x43,
    D = 0x44,
    E = 0x45,
    F = 0x46,
    G = 0x47,
    H = 0x48,
    I = 0x49,
    J = 0x4A,
    K = 0x4B,
    L = 0x4C,
    M = 0x4D,
    N = 0x4E,
    O = 0x4F,
    P = 0x50,
    Q = 0x51,
    R = 0x52,
    S = 0x53,
    T = 0x54,
    U = 0x55,
    V = 0x56,
    W = 0x57,
    X = 0x58,
    Y = 0x59,
    Z = 0x5A,
    NumPad0 = 0x60,
    NumPad1 = 0x61,
    NumPad2 = 0x62,
    NumPad3 = 0x63,
    NumPad4 = 0x64,
    NumPad5 = 0x65,
    NumPad6 = 0x66,
    NumPad7 = 0x67,
    NumPad8 = 0x68,
    NumPad9 = 0x69,
    Multiply = 0x6A,
    Add = 0x6B,
    Separator = 0x6C,
    Subtract = 0x6D,
    Decimal = 0x6E,
    Divide = 0x6F,
    F1 = 0x70,
    F2 = 0x71,
    F3 = 0x72,
    F4 = 0x73,
    F5 = 0x74,
    F6 = 0x75,
    F7 = 0x76,
    F8 = 0x77,
    F9 = 0x78,
    F10 = 0x79,
    F11 = 0x7A,
    F12 = 0x7B,
    F13 = 0x7C,
    F14 = 0x7D,
    F15 = 0x7E,
    ScrollLock = 0x91,
    LeftShift = 0xA0,
    RightShift = 0xA1,
    LeftControl = 0xA2,
    RightControl = 0xA3,
}

impl Key {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Raw key/button table plus pointer position, written by the platform.
#[derive(Debug)]
pub struct PhysicalInput {
    keys: [AtomicBool; KEY_COUNT],
    // f64 bit patterns; logical (unscaled) coordinates.
    mouse_x: AtomicU64,
    mouse_y: AtomicU64,
    scale_x: f64,
    scale_y: f64,
}

impl PhysicalInput {
    /// `scale_x`/`scale_y` are the window's pixel scale factors; raw pointer
    /// coordinates are divided by them.
    pub fn new(scale_x: f64, scale_y: f64) -> Self {
        Self {
            keys: [const { AtomicBool::new(false) }; KEY_COUNT],
            mouse_x: AtomicU64::new(0f64.to_bits()),
            mouse_y: AtomicU64::new(0f64.to_bits()),
            scale_x: if scale_x > 0.0 { scale_x } else { 1.0 },
            scale_y: if scale_y > 0.0 { scale_y } else { 1.0 },
        }
    }

    #[inline]
    pub fn set_key(&self, key: Key, held: bool) {
        self.keys[key.index()].store(held, Ordering::Release);
    }

    #[inline]
    pub fn is_held(&self, key: Key) -> bool {
        self.keys[key.index()].load(Ordering::Acquire)
    }

    /// Record the pointer position in raw window pixels.
    pub fn set_mouse_raw(&self, x: f64, y: f64) {
        self.mouse_x.store((x / self.scale_x).to_bits(), Ordering::Release);
        self.mouse_y.store((y / self.scale_y).to_bits(), Ordering::Release);
    }

    /// Pointer position in logical coordinates.
    pub fn mouse(&self) -> (f64, f64) {
        (
            f64::from_bits(self.mouse_x.load(Ordering::Acquire)),
            f64::from_bits(self.mouse_y.load(Ordering::Acquire)),
        )
    }

    #[inline]
    fn held_at(&self, index: usize) -> bool {
        self.keys[index].load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct KeyState {
    pressed: bool,
    just_pressed: bool,
}

/// The application's view of the input, rebuilt once per tick.
#[derive(Debug, Clone)]
pub struct InputState {
    keys: [KeyState; KEY_COUNT],
    mouse: (f64, f64),
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys: [KeyState::default(); KEY_COUNT],
            mouse: (0.0, 0.0),
        }
    }

    /// Fold the current physical table into the logical one.
    ///
    /// A key going from released to held gets `just_pressed` for this tick.
    /// A key that stays held keeps whatever `just_pressed` it had, so the
    /// edge never re-fires while held. A released key clears both flags.
    pub fn reconcile(&mut self, physical: &PhysicalInput) {
        for (i, state) in self.keys.iter_mut().enumerate() {
            if physical.held_at(i) {
                if !state.pressed {
                    state.just_pressed = true;
                }
                state.pressed = true;
            } else {
                *state = KeyState::default();
            }
        }
        self.mouse = physical.mouse();
    }

    /// Is `key` held as of this tick?
    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys[key.index()].pressed
    }

    /// Was `key` pressed on this tick? Reading clears the flag.
    ///
    /// Each edge is reported at most once, so there should be exactly one
    /// place in the application that asks about a given key.
    pub fn key_just_pressed(&mut self, key: Key) -> bool {
        std::mem::take(&mut self.keys[key.index()].just_pressed)
    }

    /// Pointer position in logical (unscaled) surface coordinates.
    pub fn mouse_xy(&self) -> (f64, f64) {
        self.mouse
    }
}
