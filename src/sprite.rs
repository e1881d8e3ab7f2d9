// A positioned texture with optional named animations.

use std::collections::HashMap;
use std::sync::Arc;

use crate::animation::{Animation, Animator};
use crate::draw;
use crate::surface::PixelSurface;
use crate::texture::Texture;

pub struct Sprite {
    pub x: f64,
    pub y: f64,
    origin: (f64, f64), // subtracted from (x, y) when drawing
    texture: Arc<Texture>,
    animations: HashMap<String, Animator>,
    current: Option<String>,
}

impl Sprite {
    pub fn new(texture: Arc<Texture>) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            origin: (0.0, 0.0),
            texture,
            animations: HashMap::new(),
            current: None,
        }
    }

    /// Point of the sprite that sits at (x, y).
    pub fn with_origin(mut self, ox: i32, oy: i32) -> Self {
        self.origin = (f64::from(ox), f64::from(oy));
        self
    }

    /// Add a named animation. The first one added becomes current.
    /// Re-using a name replaces that animation.
    pub fn with_animation(mut self, name: impl Into<String>, animation: Arc<Animation>) -> Self {
        let name = name.into();
        if self.current.is_none() {
            self.current = Some(name.clone());
        }
        self.animations.insert(name, Animator::new(animation));
        self
    }

    pub fn texture(&self) -> &Arc<Texture> {
        &self.texture
    }

    pub fn current_animation(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn animator(&self) -> Option<&Animator> {
        self.current.as_ref().and_then(|n| self.animations.get(n))
    }

    fn animator_mut(&mut self) -> Option<&mut Animator> {
        let name = self.current.as_ref()?;
        self.animations.get_mut(name)
    }

    /// Draw the sprite, then step its current animation by `delta`.
    /// With no animations the whole texture is drawn.
    pub fn update(&mut self, surface: &mut PixelSurface, delta: f64) {
        let (x, y) = (self.x - self.origin.0, self.y - self.origin.1);
        let texture = Arc::clone(&self.texture);
        match self.animator_mut() {
            Some(animator) => {
                draw::draw_texture_rect(surface, x, y, animator.current_frame(), &texture);
                animator.update(delta);
            }
            None => draw::draw_texture(surface, x, y, &texture),
        }
    }

    /// Make `name` current and play it. Switching away stops the old
    /// animation; `restart` rewinds the new one (only when switching).
    /// Unknown names are ignored.
    pub fn play_animation(&mut self, name: &str, restart: bool) {
        if !self.animations.contains_key(name) {
            return;
        }
        if self.current.as_deref() != Some(name) {
            if let Some(old) = self.animator_mut() {
                old.stop();
            }
            self.current = Some(name.to_string());
            if restart {
                if let Some(new) = self.animator_mut() {
                    new.restart();
                }
            }
        }
        if let Some(p) = self.animator_mut() {
            p.play();
        }
    }

    pub fn stop_animation(&mut self) {
        if let Some(p) = self.animator_mut() {
            p.stop();
        }
    }

    /// Rewind the current animation to its first frame.
    pub fn reset_animation(&mut self) {
        if let Some(p) = self.animator_mut() {
            p.restart();
        }
    }
}
