use serde::Deserialize;
use std::collections::HashMap;
use anyhow::{Context, Result};
use tiny_skia::Color;

const BUILTIN_TABLE: &str = include_str!("launcher.toml");

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub apps: Vec<StaticEntry>,
    /// Per-OS addendum, keyed by `std::env::consts::OS`.
    #[serde(default)]
    pub platform: HashMap<String, Vec<StaticEntry>>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GeneralConfig {
    #[serde(default = "default_status_timeout_ms")]
    pub status_timeout_ms: u64,
    #[serde(default = "default_double_click_ms")]
    pub double_click_ms: u32,
}

fn default_status_timeout_ms() -> u64 { 5000 }
fn default_double_click_ms() -> u32 { 400 }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            status_timeout_ms: default_status_timeout_ms(),
            double_click_ms: default_double_click_ms(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StaticEntry {
    pub name: String,
    pub command: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ThemeConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_padding")]
    pub padding: f32,
    #[serde(default = "default_spacing")]
    pub spacing: f32,
    #[serde(default = "default_item_height")]
    pub item_height: f32,
    #[serde(default = "default_border_radius")]
    pub border_radius: f32,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_field_background")]
    pub field_background: String,
    #[serde(default = "default_border_color")]
    pub border_color: String,
    #[serde(default = "default_text")]
    pub text: String,
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    #[serde(default = "default_accent")]
    pub accent: String,
    #[serde(default = "default_error")]
    pub error: String,
    #[serde(default = "default_success")]
    pub success: String,
}

fn default_width() -> u32 { 500 }
fn default_height() -> u32 { 500 }
fn default_padding() -> f32 { 15.0 }
fn default_spacing() -> f32 { 10.0 }
fn default_item_height() -> f32 { 28.0 }
fn default_border_radius() -> f32 { 8.0 }
fn default_background() -> String { "2e2e2eff".to_string() }
fn default_field_background() -> String { "3c3c3cff".to_string() }
fn default_border_color() -> String { "505050ff".to_string() }
fn default_text() -> String { "e0e0e0ff".to_string() }
fn default_placeholder() -> String { "808080ff".to_string() }
fn default_accent() -> String { "007accff".to_string() }
fn default_error() -> String { "ff6b6bff".to_string() }
fn default_success() -> String { "77dd77ff".to_string() }

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            padding: default_padding(),
            spacing: default_spacing(),
            item_height: default_item_height(),
            border_radius: default_border_radius(),
            background: default_background(),
            field_background: default_field_background(),
            border_color: default_border_color(),
            text: default_text(),
            placeholder: default_placeholder(),
            accent: default_accent(),
            error: default_error(),
            success: default_success(),
        }
    }
}

impl ThemeConfig {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 8 || !hex.is_ascii() {
            return Color::BLACK;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
        let a = u8::from_str_radix(&hex[6..8], 16).unwrap_or(255);

        Color::from_rgba8(r, g, b, a)
    }
}

impl Config {
    /// Entries the built-in table adds for `os` on top of the base list.
    pub fn platform_items(&self, os: &str) -> &[StaticEntry] {
        self.platform.get(os).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Parses the application table compiled into the binary.
pub fn load_config() -> Result<Config> {
    parse_config(BUILTIN_TABLE).context("built-in launcher table is malformed")
}

fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    if let Some(blank) = config
        .apps
        .iter()
        .chain(config.platform.values().flatten())
        .find(|item| item.name.trim().is_empty())
    {
        anyhow::bail!("entry with command '{}' has an empty name", blank.command);
    }
    Ok(config)
}
