//! Configuration management for Floating Sticks
//!
//! Handles loading, parsing, and hot-reloading of YAML configuration files.

pub mod watcher;

use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::host::Side;
use crate::input::geometry::Size;
use crate::input::{GateConfig, StickConfig};

pub use watcher::ConfigWatcher;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct AppConfig {
    #[serde(default)]
    pub screen: ScreenConfig,
    #[serde(default)]
    pub sticks: SticksConfig,
    #[serde(default)]
    pub gate: GateConfig,
    #[serde(default)]
    pub host: HostConfig,
}

/// Screen (or pad window) size in points
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct ScreenConfig {
    #[serde(default = "default_screen_width")]
    pub width: f32,
    #[serde(default = "default_screen_height")]
    pub height: f32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: default_screen_width(),
            height: default_screen_height(),
        }
    }
}

impl ScreenConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// One stick per screen half
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct SticksConfig {
    #[serde(default = "default_left_stick")]
    pub left: StickConfig,
    #[serde(default = "default_right_stick")]
    pub right: StickConfig,
}

impl Default for SticksConfig {
    fn default() -> Self {
        Self {
            left: default_left_stick(),
            right: default_right_stick(),
        }
    }
}

impl SticksConfig {
    pub fn get(&self, side: Side) -> &StickConfig {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

/// Show/hide behavior of the floating sticks
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct HostConfig {
    /// Hide a released stick after this long
    #[serde(default = "default_hide_delay")]
    pub hide_delay_ms: u64,
    #[serde(default = "default_show_animation")]
    pub show_animation_ms: u64,
    #[serde(default = "default_hide_animation")]
    pub hide_animation_ms: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            hide_delay_ms: default_hide_delay(),
            show_animation_ms: default_show_animation(),
            hide_animation_ms: default_hide_animation(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file with validation
    pub async fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path))?;

        Self::from_yaml(&contents).with_context(|| format!("Invalid config file: {}", path))
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: AppConfig =
            serde_yaml::from_str(contents).context("Failed to parse YAML config")?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self, path: &str) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .await
            .with_context(|| format!("Failed to write config file: {}", path))?;

        Ok(())
    }

    /// JSON schema of the config file
    pub fn schema_json() -> Result<String> {
        let schema = schemars::schema_for!(AppConfig);
        serde_json::to_string_pretty(&schema).context("Failed to serialize config schema")
    }

    /// Validate configuration for correctness and consistency
    pub fn validate(&self) -> Result<()> {
        if !(self.screen.width > 0.0) || !(self.screen.height > 0.0) {
            anyhow::bail!(
                "Screen size must be positive (got {}x{})",
                self.screen.width,
                self.screen.height
            );
        }

        for side in Side::BOTH {
            let stick = self.sticks.get(side);
            if !(stick.radius > 0.0) || !stick.radius.is_finite() {
                anyhow::bail!("{} stick radius must be a positive number (got {})", side, stick.radius);
            }
            if stick.radius * 2.0 > self.screen.width / 2.0 {
                anyhow::bail!(
                    "{} stick diameter {} does not fit in half the screen width {}",
                    side,
                    stick.radius * 2.0,
                    self.screen.width / 2.0
                );
            }
        }

        if self.gate.tick_ms == 0 {
            anyhow::bail!("gate.tick_ms must be at least 1");
        }
        if self.gate.window_ms > 0 && self.gate.tick_ms > self.gate.window_ms {
            anyhow::bail!(
                "gate.tick_ms ({}) cannot exceed gate.window_ms ({})",
                self.gate.tick_ms,
                self.gate.window_ms
            );
        }

        Ok(())
    }
}

// Default value functions
fn default_screen_width() -> f32 { 800.0 }
fn default_screen_height() -> f32 { 480.0 }
fn default_hide_delay() -> u64 { 500 }
fn default_show_animation() -> u64 { 400 }
fn default_hide_animation() -> u64 { 600 }

fn default_left_stick() -> StickConfig {
    StickConfig::default()
}

fn default_right_stick() -> StickConfig {
    StickConfig {
        return_to_center_delay_ms: 0,
        return_animation_ms: 100,
        ..StickConfig::default()
    }
}
