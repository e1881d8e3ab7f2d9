// Plain, defaulted settings. Every field can be left out of a TOML file;
// whatever is missing falls back to `Default`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub scheduler: SchedulerConfig,
}

/// The native window and the logical surface inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Window position on the desktop
    pub x: isize,
    pub y: isize,
    /// Logical surface size; the window is this times the scale
    pub width: usize,
    pub height: usize,
    pub scale_x: usize,
    pub scale_y: usize,
    /// Upper bound on presented frames per second
    pub present_fps: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title: "softgfx".to_string(),
            x: 10,
            y: 10,
            width: 320,
            height: 240,
            scale_x: 2,
            scale_y: 2,
            present_fps: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SchedulerConfig {
    /// When set, the application sees a constant `1 / fps` delta every tick
    /// instead of the measured one.
    pub fixed_update_fps: Option<u32>,
}

/// How an `Animator` walks its frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub fps: f64,
    /// Bounce back at either end instead of wrapping
    pub ping_pong: bool,
    /// Start on the last frame and walk backwards
    pub reverse: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationConfig {
            fps: 10.0,
            ping_pong: false,
            reverse: false,
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        let config: Config = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<(), Error> {
        let w = &self.window;
        if w.width == 0 || w.height == 0 {
            return Err(Error::Config(format!(
                "window size must be non-zero, got {}x{}",
                w.width, w.height
            )));
        }
        if w.scale_x == 0 || w.scale_y == 0 {
            return Err(Error::Config("window scale must be at least 1".into()));
        }
        if w.present_fps == 0 {
            return Err(Error::Config("present_fps must be at least 1".into()));
        }
        if self.scheduler.fixed_update_fps == Some(0) {
            return Err(Error::Config("fixed_update_fps must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let c = Config::from_toml_str("").unwrap();
        assert_eq!(c, Config::default());
        assert_eq!(c.window.title, "softgfx");
        assert_eq!((c.window.width, c.window.height), (320, 240));
        assert_eq!(c.scheduler.fixed_update_fps, None);
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let c = Config::from_toml_str(
            r#"
            [window]
            title = "demo"
            scale_x = 3

            [scheduler]
            fixed_update_fps = 30
            "#,
        )
        .unwrap();
        assert_eq!(c.window.title, "demo");
        assert_eq!(c.window.scale_x, 3);
        assert_eq!(c.window.scale_y, 2);
        assert_eq!(c.window.present_fps, 60);
        assert_eq!(c.scheduler.fixed_update_fps, Some(30));
    }

    #[test]
    fn bad_values_are_config_errors() {
        for text in [
            "[window]\nwidth = 0",
            "[window]\nscale_y = 0",
            "[window]\npresent_fps = 0",
            "[scheduler]\nfixed_update_fps = 0",
            "[window]\nwidth = \"wide\"",
            "not toml at all",
        ] {
            let err = Config::from_toml_str(text).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{text}: {err}");
        }
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = Config::load("/definitely/not/here/softgfx.toml").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn animation_defaults() {
        let a = AnimationConfig::default();
        assert_eq!(a.fps, 10.0);
        assert!(!a.ping_pong && !a.reverse);
    }
}
