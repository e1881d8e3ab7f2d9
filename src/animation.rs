// Frame-based animation over a sprite sheet.
//
// `Animation` is the immutable part: which texture regions make up the
// frames, how fast to step and in what pattern. Several `Animator`s (one per
// sprite, say) can share one `Animation` through an `Arc`; each keeps its
// own play-head.

use std::sync::Arc;

use crate::config::AnimationConfig;
use crate::types::Rect;

#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    frames: Vec<Rect>,
    frame_time: f64, // seconds per frame
    ping_pong: bool,
    reverse: bool,
}

impl Animation {
    /// Animation over explicit texture regions.
    ///
    /// # Panics
    /// If `frames` is empty.
    pub fn from_frames(frames: Vec<Rect>, config: AnimationConfig) -> Self {
        assert!(!frames.is_empty(), "an animation needs at least one frame");
        let frame_time = if config.fps > 0.0 { 1.0 / config.fps } else { f64::INFINITY };
        Self {
            frames,
            frame_time,
            ping_pong: config.ping_pong,
            reverse: config.reverse,
        }
    }

    /// Cut `cols` x `rows` equally sized frames out of a sheet, starting at
    /// (`offset_x`, `offset_y`), row by row.
    ///
    /// # Panics
    /// If `cols` or `rows` is zero.
    pub fn sliced(
        offset_x: i32,
        offset_y: i32,
        frame_w: i32,
        frame_h: i32,
        cols: usize,
        rows: usize,
        config: AnimationConfig,
    ) -> Self {
        let frames = (0..rows as i32)
            .flat_map(|row| {
                (0..cols as i32).map(move |col| {
                    Rect::new(
                        offset_x + col * frame_w,
                        offset_y + row * frame_h,
                        frame_w,
                        frame_h,
                    )
                })
            })
            .collect();
        Self::from_frames(frames, config)
    }

    pub fn frames(&self) -> &[Rect] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame_time(&self) -> f64 {
        self.frame_time
    }

    fn last(&self) -> usize {
        self.frames.len() - 1
    }
}

/// Play-head over a shared `Animation`. Starts stopped.
#[derive(Debug, Clone)]
pub struct Animator {
    animation: Arc<Animation>,
    frame: usize,
    elapsed: f64,
    forward: bool,
    playing: bool,
}

impl Animator {
    pub fn new(animation: Arc<Animation>) -> Self {
        let mut a = Self {
            animation,
            frame: 0,
            elapsed: 0.0,
            forward: true,
            playing: false,
        };
        a.rewind();
        a
    }

    pub fn animation(&self) -> &Arc<Animation> {
        &self.animation
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn frame_index(&self) -> usize {
        self.frame
    }

    /// Texture region to show right now.
    pub fn current_frame(&self) -> Rect {
        self.animation.frames[self.frame]
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Back to the start frame and direction. Does not change playing.
    pub fn restart(&mut self) {
        self.elapsed = 0.0;
        self.rewind();
    }

    fn rewind(&mut self) {
        if self.animation.reverse {
            self.frame = self.animation.last();
            self.forward = false;
        } else {
            self.frame = 0;
            self.forward = true;
        }
    }

    /// Advance by `delta` seconds. At most one frame per call.
    pub fn update(&mut self, delta: f64) {
        let anim = &self.animation;
        if !self.playing || anim.len() < 2 {
            return;
        }
        self.elapsed += delta;
        if self.elapsed < anim.frame_time {
            return;
        }
        self.elapsed -= anim.frame_time;

        let last = anim.last();
        let at_end = if self.forward { self.frame == last } else { self.frame == 0 };
        if !at_end {
            self.frame = if self.forward { self.frame + 1 } else { self.frame - 1 };
        } else if anim.ping_pong {
            // Bounce: the end frame is not repeated.
            self.forward = !self.forward;
            self.frame = if self.forward { 1 } else { last - 1 };
        } else {
            self.frame = if anim.reverse { last } else { 0 };
        }
    }
}
