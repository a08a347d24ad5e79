//! Configuration file loading with precedence handling.

use super::policy::{ContainerChrome, KeyboardPolicy, PerformanceBudget};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// Environment variable naming an explicit config file.
pub const ENV_CONFIG: &str = "KBVP_CONFIG";
/// Environment override for the keyboard noise threshold (px).
pub const ENV_NOISE_THRESHOLD: &str = "KBVP_NOISE_THRESHOLD";
/// Environment override for the container lift cap (px).
pub const ENV_TRANSFORM_CAP: &str = "KBVP_TRANSFORM_CAP";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/kbvp/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Keyboard detection.
    #[serde(default)]
    pub keyboard: Option<KeyboardSection>,

    /// Default viewport preset.
    #[serde(default)]
    pub viewport: Option<ViewportSection>,

    /// Container lift, transition, and chrome.
    #[serde(default)]
    pub layout: Option<LayoutSection>,

    /// Safe-area inset floors.
    #[serde(default)]
    pub safe_area: Option<SafeAreaSection>,

    /// Performance budget.
    #[serde(default)]
    pub performance: Option<PerformanceSection>,
}

/// `[keyboard]`
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct KeyboardSection {
    /// Height reductions at or below this are treated as browser-chrome jitter.
    pub noise_threshold_px: Option<f64>,
}

/// `[viewport]`
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ViewportSection {
    /// Preset width in px.
    pub default_width: Option<f64>,
    /// Preset height in px.
    pub default_height: Option<f64>,
    /// Windows shorter than this count as reduced.
    pub reduced_height_threshold: Option<f64>,
}

/// `[layout]`
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LayoutSection {
    /// Maximum container lift in px.
    pub transform_cap_px: Option<f64>,
    /// Lift is keyboard height divided by this, before the cap.
    pub lift_divisor: Option<f64>,
    /// Height/transform transition duration.
    pub transition_ms: Option<u32>,
    /// CSS easing function.
    pub easing: Option<String>,
    /// Header height in px.
    pub header_height: Option<f64>,
    /// Footer height in px.
    pub footer_height: Option<f64>,
    /// Pin the header.
    pub header_fixed: Option<bool>,
    /// Pin the footer above the keyboard.
    pub footer_fixed: Option<bool>,
}

/// `[safe_area.portrait]` and `[safe_area.landscape]`
///
/// ```toml
/// [safe_area.portrait]
/// top = 47.0
/// bottom = 34.0
///
/// [safe_area.landscape]
/// left = 47.0
/// right = 47.0
/// bottom = 21.0
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SafeAreaSection {
    /// Portrait floors.
    #[serde(default)]
    pub portrait: Option<PortraitFloors>,
    /// Landscape floors.
    #[serde(default)]
    pub landscape: Option<LandscapeFloors>,
}

/// `[safe_area.portrait]`
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PortraitFloors {
    /// Minimum top inset.
    pub top: Option<f64>,
    /// Minimum bottom inset.
    pub bottom: Option<f64>,
}

/// `[safe_area.landscape]`
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LandscapeFloors {
    /// Minimum left inset.
    pub left: Option<f64>,
    /// Minimum right inset.
    pub right: Option<f64>,
    /// Minimum bottom inset.
    pub bottom: Option<f64>,
}

/// `[performance]`
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PerformanceSection {
    /// Exclusive layout transition limit.
    pub max_layout_transition_ms: Option<f64>,
    /// Exclusive input latency limit.
    pub max_input_latency_ms: Option<f64>,
    /// Minimum acceptable frame rate.
    pub min_frame_rate: Option<f64>,
    /// Reported keyboard show delay.
    pub keyboard_show_delay_ms: Option<f64>,
    /// Reported keyboard hide delay.
    pub keyboard_hide_delay_ms: Option<f64>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Detection and layout policy.
    pub policy: KeyboardPolicy,
    /// Performance budget.
    pub budget: PerformanceBudget,
    /// Header and footer chrome.
    pub chrome: ContainerChrome,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            policy: KeyboardPolicy::default(),
            budget: PerformanceBudget::default(),
            chrome: ContainerChrome::default(),
            log_file_path: default_log_path(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/kbvp/kbvp.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("kbvp").join("kbvp.log")
    } else {
        PathBuf::from("kbvp.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/kbvp/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("kbvp").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `KBVP_CONFIG` environment variable
/// 3. Default path `~/.config/kbvp/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let mut resolved = ResolvedConfig::default();

    let Some(config) = config_file else {
        return resolved;
    };

    if let Some(path) = config.log_file_path {
        resolved.log_file_path = path;
    }

    let policy = &mut resolved.policy;
    if let Some(keyboard) = config.keyboard {
        override_with(&mut policy.noise_threshold_px, keyboard.noise_threshold_px);
    }

    if let Some(viewport) = config.viewport {
        override_with(&mut policy.default_width, viewport.default_width);
        override_with(&mut policy.default_height, viewport.default_height);
        override_with(&mut policy.reduced_height_threshold, viewport.reduced_height_threshold);
    }

    if let Some(layout) = config.layout {
        override_with(&mut policy.transform_cap_px, layout.transform_cap_px);
        override_with(&mut policy.lift_divisor, layout.lift_divisor);
        override_with(&mut policy.transition.duration_ms, layout.transition_ms);
        override_with(&mut policy.transition.easing, layout.easing);

        let chrome = &mut resolved.chrome;
        override_with(&mut chrome.header_height, layout.header_height);
        override_with(&mut chrome.footer_height, layout.footer_height);
        override_with(&mut chrome.header_fixed, layout.header_fixed);
        override_with(&mut chrome.footer_fixed, layout.footer_fixed);
    }

    if let Some(safe_area) = config.safe_area {
        let floors = &mut policy.safe_area_floors;
        if let Some(portrait) = safe_area.portrait {
            override_with(&mut floors.portrait_top, portrait.top);
            override_with(&mut floors.portrait_bottom, portrait.bottom);
        }
        if let Some(landscape) = safe_area.landscape {
            override_with(&mut floors.landscape_left, landscape.left);
            override_with(&mut floors.landscape_right, landscape.right);
            override_with(&mut floors.landscape_bottom, landscape.bottom);
        }
    }

    if let Some(performance) = config.performance {
        let budget = &mut resolved.budget;
        override_with(&mut budget.max_layout_transition_ms, performance.max_layout_transition_ms);
        override_with(&mut budget.max_input_latency_ms, performance.max_input_latency_ms);
        override_with(&mut budget.min_frame_rate, performance.min_frame_rate);
        override_with(&mut budget.keyboard_show_delay_ms, performance.keyboard_show_delay_ms);
        override_with(&mut budget.keyboard_hide_delay_ms, performance.keyboard_hide_delay_ms);
    }

    resolved
}

fn override_with<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `KBVP_NOISE_THRESHOLD`: keyboard noise threshold (px)
/// - `KBVP_TRANSFORM_CAP`: container lift cap (px)
///
/// Unparsable values are logged and ignored.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Some(threshold) = env_f64(ENV_NOISE_THRESHOLD) {
        config.policy.noise_threshold_px = threshold;
    }

    if let Some(cap) = env_f64(ENV_TRANSFORM_CAP) {
        config.policy.transform_cap_px = cap;
    }

    config
}

fn env_f64(name: &str) -> Option<f64> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
        _ => {
            warn!(name, value = %raw, "ignoring invalid environment override");
            None
        }
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, noise_threshold_override: Option<f64>) -> ResolvedConfig {
    if let Some(threshold) = noise_threshold_override {
        config.policy.noise_threshold_px = threshold;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
