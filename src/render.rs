// Single-slot hand-off between the update loop and the presenter.
//
// The update loop owns the back buffer (a PixelSurface). The presenter owns
// whatever it shows on screen. Between them sits exactly one frame: the
// `RenderSlot`. Two flags guard it:
//   busy  - set by the publisher when it copies a frame in, cleared by the
//           presenter once that frame has been shown.
//   ready - set after a copy completes, taken by the presenter.
// A publish that finds `busy` set gives up at once and the frame is dropped.
// Nothing waits, nothing queues, and no lock is taken.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use log::trace;

use crate::surface::PixelSurface;

#[derive(Debug)]
pub struct RenderSlot {
    width: usize,
    height: usize,
    busy: AtomicBool,
    ready: AtomicBool,
    pixels: Vec<AtomicU32>, // 0xAARRGGBB, same layout as the back buffer
}

impl RenderSlot {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            busy: AtomicBool::new(false),
            ready: AtomicBool::new(false),
            pixels: (0..width * height).map(|_| AtomicU32::new(0)).collect(),
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

    /// True while a published frame is waiting for, or being shown by, the
    /// presenter.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Copy `frame` into the slot unless the presenter still holds it.
    ///
    /// Returns `false` (and leaves the slot untouched) when busy. A frame of
    /// the wrong size is never published.
    pub fn try_publish(&self, frame: &PixelSurface) -> bool {
        if frame.width() != self.width || frame.height() != self.height {
            return false;
        }
        if self
            .busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            trace!("presenter busy, frame dropped");
            return false;
        }
        for (dst, src) in self.pixels.iter().zip(frame.pixels()) {
            dst.store(src.0, Ordering::Relaxed);
        }
        self.ready.store(true, Ordering::Release);
        true
    }

    /// If a frame is waiting, hand it to `present` and release the slot.
    ///
    /// `present` sees the pixels as packed `0xAARRGGBB` words. Returns whether
    /// a frame was presented.
    pub fn present_with<F>(&self, present: F) -> bool
    where
        F: FnOnce(&[AtomicU32], usize, usize),
    {
        if !self.ready.swap(false, Ordering::Acquire) {
            return false;
        }
        present(&self.pixels, self.width, self.height);
        self.busy.store(false, Ordering::Release);
        true
    }

    /// Copy of the slot's current contents, regardless of the flags.
    pub fn snapshot(&self) -> Vec<u32> {
        self.pixels.iter().map(|p| p.load(Ordering::Relaxed)).collect()
    }
}
