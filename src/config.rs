//! Configuration for the visualizer window and its plots.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("HOME env var not set")]
    NoHome,
    #[error("i/o error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level configuration; missing keys take their defaults.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    // ── Window ───────────────────────────────────────────────────────────────
    /// Native window title.
    pub title: String,
    /// Optional eframe native-window options.
    #[serde(skip)]
    pub native_options: Option<eframe::NativeOptions>,

    // ── Data ─────────────────────────────────────────────────────────────────
    /// Upper bound on samples kept per probed stream.
    pub max_buffer_elements: usize,
    /// Upper bound on samples handed to a plot in one update.
    pub max_window_size: usize,

    // ── Layout ───────────────────────────────────────────────────────────────
    /// Initial plot size in points, `(width, height)`.
    pub default_plot_size: (f32, f32),
    pub min_plot_size: (f32, f32),
    /// Plots per row in the grid.
    pub columns: usize,

    // ── Export ───────────────────────────────────────────────────────────────
    /// Image size in pixels for exported plots.
    pub export_size: (u32, u32),
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            title: "Neuroscope".to_string(),
            native_options: None,
            max_buffer_elements: 100_000,
            max_window_size: 1000,
            default_plot_size: (300.0, 300.0),
            min_plot_size: (250.0, 250.0),
            columns: 2,
            export_size: (1024, 768),
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

impl VisualizerConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Read YAML (`.yaml`/`.yml`) or JSON (anything else).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if is_yaml(path) {
            Self::from_yaml_str(&s)
        } else {
            Ok(serde_json::from_str(&s)?)
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let s = if is_yaml(path) {
            serde_yaml::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };
        fs::write(path, s).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `~/.neuroscope/config.yaml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home = std::env::var("HOME").map_err(|_| ConfigError::NoHome)?;
        Ok(PathBuf::from(home).join(".neuroscope").join("config.yaml"))
    }

    /// Load the default config file, or the defaults if there is none.
    pub fn load_from_default_path() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path()?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        self.save(&path)
    }

    pub fn plot_size(&self) -> egui::Vec2 {
        let (w, h) = self.default_plot_size;
        let (mw, mh) = self.min_plot_size;
        egui::vec2(w.max(mw), h.max(mh))
    }
}
