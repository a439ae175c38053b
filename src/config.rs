//! Editor tunables, with defaults and environment overrides.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;

use crate::consts::{HISTORY_DEPTH, PASTE_OFFSET, SNAP_THRESHOLD};
use crate::snap::SnapOptions;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}'")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    /// Exclusive distance at which a dropped endpoint attaches to an anchor.
    pub snap_threshold: f64,
    /// Undo entries kept before the oldest is evicted.
    pub history_depth: usize,
    /// Grid for free endpoints and waypoints; `None` disables grid snapping.
    pub grid_spacing: Option<f64>,
    /// Per-axis shift applied to pasted shapes.
    pub paste_offset: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self { snap_threshold: SNAP_THRESHOLD, history_depth: HISTORY_DEPTH, grid_spacing: None, paste_offset: PASTE_OFFSET }
    }
}

impl EditorConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// Optional:
    /// - `SNAPDRAW_SNAP_THRESHOLD`: positive number, default 15
    /// - `SNAPDRAW_HISTORY_DEPTH`: positive integer, default 50
    /// - `SNAPDRAW_GRID_SPACING`: positive number; `0` or empty disables (default)
    /// - `SNAPDRAW_PASTE_OFFSET`: number, default 20
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let snap_threshold = env_parse("SNAPDRAW_SNAP_THRESHOLD", defaults.snap_threshold)?;
        if !(snap_threshold.is_finite() && snap_threshold > 0.0) {
            return Err(invalid("SNAPDRAW_SNAP_THRESHOLD", snap_threshold));
        }

        let history_depth = env_parse("SNAPDRAW_HISTORY_DEPTH", defaults.history_depth)?;
        if history_depth == 0 {
            return Err(invalid("SNAPDRAW_HISTORY_DEPTH", history_depth));
        }

        let grid = env_parse("SNAPDRAW_GRID_SPACING", 0.0_f64)?;
        let grid_spacing = match grid {
            g if g == 0.0 => None,
            g if g.is_finite() && g > 0.0 => Some(g),
            g => return Err(invalid("SNAPDRAW_GRID_SPACING", g)),
        };

        let paste_offset = env_parse("SNAPDRAW_PASTE_OFFSET", defaults.paste_offset)?;
        if !paste_offset.is_finite() {
            return Err(invalid("SNAPDRAW_PASTE_OFFSET", paste_offset));
        }

        Ok(Self { snap_threshold, history_depth, grid_spacing, paste_offset })
    }

    /// Snap settings for endpoint drops.
    #[must_use]
    pub fn snap_options(&self) -> SnapOptions {
        SnapOptions { threshold: self.snap_threshold, grid_spacing: self.grid_spacing }
    }
}

/// Parse `var` when set and non-empty; unset or blank yields `default`.
fn env_parse<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(raw) if raw.trim().is_empty() => Ok(default),
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => Ok(value),
            Err(_) => Err(ConfigError::Invalid { var, value: raw }),
        },
        Err(_) => Ok(default),
    }
}

fn invalid(var: &'static str, value: impl ToString) -> ConfigError {
    ConfigError::Invalid { var, value: value.to_string() }
}
