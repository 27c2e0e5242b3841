// config.rs
//
// Viewer tuning read from JSON. Every field has a default, so a partial file is fine.
//
// Location, first match wins:
// - CLI: --config <path>
// - Env: PANORAMA_CONFIG
// - <exe_dir>/assets/viewer.json
// - ./assets/viewer.json
// - built-in defaults
//
// CLI also takes a positional panorama path and --auto-rotate.

use crate::camera::{FovLimits, PhysicsParams};
use crate::error::ViewerError;
use crate::input::InputParams;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "PANORAMA_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub physics: PhysicsParams,
    pub input: InputParams,
    pub fov: FovLimits,
    pub auto_rotate: bool,
    /// Scale momentum and auto-rotate by real elapsed time instead of per frame.
    pub frame_rate_independent: bool,
    pub vsync: bool,
    pub window: WindowConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsParams::default(),
            input: InputParams::default(),
            fov: FovLimits::default(),
            auto_rotate: false,
            frame_rate_independent: false,
            vsync: true,
            window: WindowConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Parses and validates; a file that parses but describes an unusable camera is rejected.
    pub fn from_json(text: &str, path: &Path) -> Result<Self, ViewerError> {
        let config: Self = serde_json::from_str(text).map_err(|source| ViewerError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config
            .validate()
            .map_err(|reason| ViewerError::ConfigInvalid {
                path: path.to_path_buf(),
                reason,
            })?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.physics.validate()?;
        self.input.validate()?;
        self.fov.validate()?;
        if self.window.width == 0 || self.window.height == 0 {
            return Err("window size must be non-zero".into());
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ViewerError> {
        let text = std::fs::read_to_string(path).map_err(|source| ViewerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, path)
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaunchOptions {
    pub config_path: Option<PathBuf>,
    pub panorama: Option<PathBuf>,
    pub auto_rotate: bool,
}

impl LaunchOptions {
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Self {
        let mut opts = LaunchOptions::default();
        let mut it = args.into_iter().skip(1);
        while let Some(a) = it.next() {
            match a.as_str() {
                "--config" => opts.config_path = it.next().map(PathBuf::from),
                "--auto-rotate" => opts.auto_rotate = true,
                s if !s.starts_with("--") && opts.panorama.is_none() => {
                    opts.panorama = Some(PathBuf::from(s));
                }
                other => log::warn!("ignoring argument {}", other),
            }
        }
        opts
    }
}

fn find_default_config() -> Option<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let p = dir.join("assets").join("viewer.json");
            if p.exists() {
                return Some(p);
            }
        }
    }

    let p = PathBuf::from("assets").join("viewer.json");
    if p.exists() {
        return Some(p);
    }

    None
}

/// Picks the config file to read, if any.
pub fn resolve_config_path(opts: &LaunchOptions, env_value: Option<String>) -> Option<PathBuf> {
    if let Some(p) = &opts.config_path {
        return Some(p.clone());
    }
    if let Some(v) = env_value {
        if !v.trim().is_empty() {
            return Some(PathBuf::from(v));
        }
    }
    find_default_config()
}

/// Resolves and loads the configuration, then applies CLI overrides.
pub fn load_config(opts: &LaunchOptions) -> Result<ViewerConfig, ViewerError> {
    let mut config = match resolve_config_path(opts, std::env::var(CONFIG_ENV).ok()) {
        Some(path) => {
            log::info!("reading config {:?}", path);
            ViewerConfig::load(&path)?
        }
        None => ViewerConfig::default(),
    };
    if opts.auto_rotate {
        config.auto_rotate = true;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("pano_sphere")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = ViewerConfig::from_json(
            r#"{ "input": { "wheel_step": 10 }, "auto_rotate": true }"#,
            Path::new("inline"),
        )
        .unwrap();
        assert_eq!(cfg.input.wheel_step, 10.0);
        assert_eq!(cfg.input.mouse_sensitivity, 0.004);
        assert_eq!(cfg.physics.damping, 0.95);
        assert_eq!(cfg.fov.default, 90.0);
        assert!(cfg.auto_rotate);
        assert!(cfg.vsync);
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = ViewerConfig::from_json("{ nope", Path::new("bad.json")).unwrap_err();
        assert!(matches!(err, ViewerError::ConfigParse { .. }));
    }

    #[test]
    fn unusable_values_are_rejected() {
        let cases = [
            r#"{ "fov": { "min": 120, "max": 30 } }"#,
            r#"{ "fov": { "default": 150 } }"#,
            r#"{ "fov": { "min": 0 } }"#,
            r#"{ "physics": { "pitch_margin": 2.0 } }"#,
            r#"{ "physics": { "pitch_margin": -0.1 } }"#,
            r#"{ "physics": { "damping": 1.5 } }"#,
            r#"{ "input": { "mouse_sensitivity": -1 } }"#,
            r#"{ "window": { "width": 0 } }"#,
        ];
        for text in cases {
            let err = ViewerConfig::from_json(text, Path::new("viewer.json")).unwrap_err();
            assert!(
                matches!(err, ViewerError::ConfigInvalid { .. }),
                "{} gave {:?}",
                text,
                err
            );
        }
    }

    #[test]
    fn shipped_config_is_valid() {
        let text = include_str!("../assets/viewer.json");
        let cfg = ViewerConfig::from_json(text, Path::new("assets/viewer.json")).unwrap();
        assert_eq!(cfg.fov, FovLimits::default());
        assert_eq!(cfg.window, WindowConfig::default());
        assert!(cfg.vsync);
    }

    #[test]
    fn cli_parses_path_and_flags() {
        let opts = LaunchOptions::from_args(args(&["--config", "c.json", "--auto-rotate", "pano.jpg"]));
        assert_eq!(opts.config_path, Some(PathBuf::from("c.json")));
        assert_eq!(opts.panorama, Some(PathBuf::from("pano.jpg")));
        assert!(opts.auto_rotate);
    }

    #[test]
    fn cli_config_beats_env() {
        let opts = LaunchOptions::from_args(args(&["--config", "cli.json"]));
        let picked = resolve_config_path(&opts, Some("env.json".into()));
        assert_eq!(picked, Some(PathBuf::from("cli.json")));

        let opts = LaunchOptions::default();
        let picked = resolve_config_path(&opts, Some("env.json".into()));
        assert_eq!(picked, Some(PathBuf::from("env.json")));
    }
}
