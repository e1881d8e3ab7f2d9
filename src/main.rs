// What you SEE:
// • A dark screen with a handful of outlined and filled shapes.
// • A spinning checker tile in the middle (rotated texture blit).
// • Hold Left Mouse: a translucent disc follows the pointer.
// • SPACE toggles filled/outlined shapes. ESC quits.
// • Top-left HUD shows the FPS counter.

use std::f64::consts::TAU;
use std::path::Path;

use log::info;
use softgfx::draw::{
    draw_circle, draw_ellipse, draw_line, draw_rect, draw_string, draw_texture_rotated,
    fill_circle, fill_ellipse, fill_rect,
};
use softgfx::{
    Application, Color, Config, Context, Error, FONT_6X8, Key, MinifbDriver, Rect, Texture,
};

const CONFIG_FILE: &str = "softgfx.toml";

struct Primitives {
    tile: Option<Texture>, // built in load()
    angle: f64,            // radians, grows every tick
    filled: bool,
}

impl Primitives {
    fn new() -> Self {
        Self {
            tile: None,
            angle: 0.0,
            filled: true,
        }
    }
}

// 16x16 checker; pixel 0 is the color-key, so the dark squares drop out.
fn checker_tile() -> Result<Texture, Error> {
    let pixels = (0..16 * 16)
        .map(|i| {
            let (x, y) = (i % 16, i / 16);
            if (x / 4 + y / 4) % 2 == 0 { Color::BLACK } else { Color::BRIGHT_YELLOW }
        })
        .collect();
    Texture::from_pixels(16, 16, pixels)
}

impl Application for Primitives {
    fn load(&mut self, ctx: &mut Context<'_>) -> Result<(), Error> {
        self.tile = Some(checker_tile()?);
        info!("demo loaded ({}x{})", ctx.width(), ctx.height());
        Ok(())
    }

    fn update(&mut self, ctx: &mut Context<'_>, delta: f64) {
        /* 1) Inputs */
        if ctx.input.key_just_pressed(Key::Escape) {
            ctx.quit();
        }
        if ctx.input.key_just_pressed(Key::Space) {
            self.filled = !self.filled; // visual: shapes switch between solid and outline
        }
        self.angle = (self.angle + delta * 1.5) % TAU;

        let (w, h) = (ctx.width() as f64, ctx.height() as f64);
        let s = &mut *ctx.surface;

        /* 2) Background */
        s.clear(Color::VERY_DARK_BLUE);

        /* 3) Shapes */
        if self.filled {
            fill_rect(s, 20.0, 40.0, 60.0, 40.0, Color::RED);
            fill_circle(s, w - 60.0, 70.0, 30.0, Color::GREEN);
            fill_ellipse(s, 70.0, h - 50.0, 50.0, 25.0, Color::MAGENTA);
        } else {
            draw_rect(s, 20.0, 40.0, 60.0, 40.0, Color::BRIGHT_RED);
            draw_circle(s, w - 60.0, 70.0, 30.0, Color::BRIGHT_GREEN);
            draw_ellipse(s, 70.0, h - 50.0, 50.0, 25.0, Color::BRIGHT_MAGENTA);
        }
        for i in 0..8 {
            let t = f64::from(i) * 8.0;
            draw_line(s, w - 120.0 + t, h - 20.0, w - 20.0, h - 90.0 + t, Color::CYAN);
        }

        /* 4) Spinning tile around its center */
        if let Some(tile) = &self.tile {
            draw_texture_rotated(
                s,
                w / 2.0,
                h / 2.0,
                Rect::new(0, 0, 16, 16),
                (8, 8),
                3.0,
                3.0,
                self.angle,
                tile,
            );
        }

        /* 5) Pointer disc, blended over everything */
        if ctx.input.key_pressed(Key::MouseLeft) {
            let (mx, my) = ctx.input.mouse_xy();
            fill_circle(ctx.surface, mx, my, 12.0, Color::WHITE.with_alpha(96));
        }

        /* 6) HUD */
        let hud = format!("FPS: {}  SPACE: fill  ESC: quit", ctx.fps());
        draw_string(ctx.surface, &FONT_6X8, 4.0, 4.0, &hud, Color::TRANSPARENT, Color::WHITE);
    }

    fn unload(&mut self, _ctx: &mut Context<'_>) {
        self.tile = None;
        info!("demo unloaded");
    }
}

fn main() -> Result<(), Error> {
    env_logger::init();

    /* --- Settings: softgfx.toml if present, defaults otherwise --- */
    let config = if Path::new(CONFIG_FILE).exists() {
        Config::load(CONFIG_FILE)?
    } else {
        info!("{CONFIG_FILE} not found, using defaults");
        Config::default()
    };

    /* --- Window + loop: returns when the window closes or ESC is hit --- */
    let mut driver = MinifbDriver::new();
    softgfx::run(&mut driver, &config, Primitives::new())
}
