//! Renderer configuration.
//!
//! Handles loading, validating, and merging `coursepress.toml`. Every key is
//! optional: stock defaults are serialized to a TOML table and the user file
//! is overlaid on top, so a config file only needs the values it changes.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [media]
//! download = true           # false: pages reference remote media URLs
//! timeout_secs = 120        # Per-request timeout for media downloads
//! user_agent = "coursepress"
//! video_quality = ["720p", "480p", "1080p"]  # Transcoding preference order
//! subtitles = true          # Fetch and attach subtitle tracks
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#1d1d1f"
//! text_muted = "#6e6e73"    # Sidebar, atom titles, notes
//! border = "#e0e0e0"
//! link = "#02799a"
//! link_hover = "#01516a"
//!
//! [colors.dark]
//! background = "#111214"
//! text = "#eeeeee"
//! text_muted = "#9a9a9f"
//! border = "#333333"
//! link = "#4fc3e8"
//! link_hover = "#a7e4f7"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Transcoding qualities the video renderer knows how to look up.
pub const VIDEO_QUALITIES: &[&str] = &["1080p", "720p", "480p", "360p"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Renderer configuration loaded from `coursepress.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Media acquisition settings.
    pub media: MediaConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
}

impl RenderConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.media.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "media.timeout_secs must be greater than 0".into(),
            ));
        }
        if self.media.video_quality.is_empty() {
            return Err(ConfigError::Validation(
                "media.video_quality must not be empty".into(),
            ));
        }
        if let Some(bad) = self
            .media
            .video_quality
            .iter()
            .find(|q| !VIDEO_QUALITIES.contains(&q.as_str()))
        {
            return Err(ConfigError::Validation(format!(
                "media.video_quality: unknown quality '{bad}' (expected one of {})",
                VIDEO_QUALITIES.join(", ")
            )));
        }
        Ok(())
    }
}

/// Media acquisition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MediaConfig {
    /// Download images, videos and subtitles next to the lesson pages.
    pub download: bool,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// `User-Agent` header sent with media requests.
    pub user_agent: String,
    /// Video transcodings to try, in order.
    pub video_quality: Vec<String>,
    /// Fetch subtitle tracks for videos.
    pub subtitles: bool,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            download: true,
            timeout_secs: 120,
            user_agent: "coursepress".to_string(),
            video_quality: vec!["720p".to_string(), "480p".to_string(), "1080p".to_string()],
            subtitles: true,
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Secondary text (sidebar, atom titles, instructor notes).
    pub text_muted: String,
    pub border: String,
    pub link: String,
    pub link_hover: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#1d1d1f".to_string(),
            text_muted: "#6e6e73".to_string(),
            border: "#e0e0e0".to_string(),
            link: "#02799a".to_string(),
            link_hover: "#01516a".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#111214".to_string(),
            text: "#eeeeee".to_string(),
            text_muted: "#9a9a9f".to_string(),
            border: "#333333".to_string(),
            link: "#4fc3e8".to_string(),
            link_hover: "#a7e4f7".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(RenderConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config does not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<RenderConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: RenderConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the effective config: stock defaults, overlaid with `path` if given.
///
/// An explicitly named file that does not exist is an error.
pub fn load_config(path: Option<&Path>) -> Result<RenderConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = path.map(load_raw_config).transpose()?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `coursepress.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# coursepress configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.
#
# Use with: coursepress render <SOURCE> <TARGET> --config coursepress.toml

# ---------------------------------------------------------------------------
# Media acquisition
# ---------------------------------------------------------------------------
[media]
# Download images, videos and subtitles next to the lesson pages.
# When false, pages reference the remote URLs instead.
download = true

# Per-request timeout in seconds. A stalled download fails the render
# instead of hanging it.
timeout_secs = 120

# User-Agent header sent with media requests.
user_agent = "coursepress"

# Video transcodings to try, in order. Known values: 1080p, 720p, 480p, 360p.
video_quality = ["720p", "480p", "1080p"]

# Fetch subtitle tracks and attach them to the video player.
subtitles = true

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#1d1d1f"
text_muted = "#6e6e73"    # Sidebar, atom titles, notes
border = "#e0e0e0"
link = "#02799a"
link_hover = "#01516a"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#111214"
text = "#eeeeee"
text_muted = "#9a9a9f"
border = "#333333"
link = "#4fc3e8"
link_hover = "#a7e4f7"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-border: {light_border};
    --color-link: {light_link};
    --color-link-hover: {light_link_hover};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-text: {dark_text};
        --color-text-muted: {dark_text_muted};
        --color-border: {dark_border};
        --color-link: {dark_link};
        --color-link-hover: {dark_link_hover};
    }}
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_link = colors.light.link,
        light_link_hover = colors.light.link_hover,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_link = colors.dark.link,
        dark_link_hover = colors.dark.link_hover,
    )
}
