use std::collections::HashMap;
use std::path::{Path, PathBuf};

use color_eyre::eyre::eyre;
use color_eyre::Result;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use supports_color::Stream;

/// Manages the config directory and config file operations.
#[derive(Clone)]
pub struct ConfigManager {
    pub(crate) config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager with a custom config directory (primarily
    /// for testing).
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    pub fn new(app_name: &str) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| eyre!("Could not determine config directory"))?
            .join(app_name);
        Ok(Self { config_dir })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_path(&self, path: &str) -> PathBuf {
        self.config_dir.join(path)
    }

    pub fn ensure_config_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    pub fn generate_default_config(&self) -> String {
        DEFAULT_CONFIG_TEMPLATE.to_string()
    }

    /// Write the default configuration template to config.toml.
    pub fn write_default_config(&self, force: bool) -> Result<PathBuf> {
        let config_path = self.config_path("config.toml");
        if config_path.exists() && !force {
            return Err(eyre!(
                "Config file already exists at {}. Use --force to overwrite.",
                config_path.display()
            ));
        }
        self.ensure_config_dir()?;
        std::fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;
        Ok(config_path)
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Configuration format version (for future compatibility)
    pub version: String,
    pub display: DisplayConfig,
    pub performance: PerformanceConfig,
    pub theme: ThemeConfig,
    pub session: SessionConfig,
    pub ui: UiConfig,
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Rows per page when a module does not pick its own size.
    pub page_size: usize,
    /// Fixed card height (terminal rows) in the narrow layout.
    pub card_height: u16,
    /// Terminal width below which the narrow layout kicks in.
    pub narrow_threshold: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    pub event_poll_interval_ms: u64,
    /// Toast lifetime measured in event-loop ticks.
    pub toast_ttl_ticks: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub color_mode: String,
    pub colors: ColorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub primary: String,
    pub secondary: String,
    pub success: String,
    pub error: String,
    pub warning: String,
    pub info: String,
    pub dimmed: String,
    pub background: String,
    pub controls_bg: String,
    pub text_primary: String,
    pub text_inverse: String,
    pub table_header: String,
    pub table_selected: String,
    pub modal_border: String,
    pub modal_border_error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub user: String,
    pub pin: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub show_row_count: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DebugConfig {
    pub enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: "0.3".to_string(),
            display: DisplayConfig::default(),
            performance: PerformanceConfig::default(),
            theme: ThemeConfig::default(),
            session: SessionConfig::default(),
            ui: UiConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            card_height: 3,
            narrow_threshold: 90,
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            event_poll_interval_ms: 25,
            toast_ttl_ticks: 160,
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            color_mode: "auto".to_string(),
            colors: ColorConfig::default(),
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            primary: "cyan".to_string(),
            secondary: "yellow".to_string(),
            success: "green".to_string(),
            error: "red".to_string(),
            warning: "yellow".to_string(),
            info: "cyan".to_string(),
            dimmed: "dark_gray".to_string(),
            background: "black".to_string(),
            controls_bg: "indexed(236)".to_string(),
            text_primary: "white".to_string(),
            text_inverse: "black".to_string(),
            table_header: "white".to_string(),
            table_selected: "reversed".to_string(),
            modal_border: "cyan".to_string(),
            modal_border_error: "red".to_string(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user: "admin".to_string(),
            pin: "1234".to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_row_count: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from all layers (default → user).
    pub fn load(app_name: &str) -> Result<Self> {
        let mut config = AppConfig::default();
        if let Ok(user_config) = Self::load_user_config(app_name) {
            config.merge(user_config);
        }
        config.validate()?;
        Ok(config)
    }

    fn load_user_config(app_name: &str) -> Result<AppConfig> {
        let config_manager = ConfigManager::new(app_name)?;
        let config_path = config_manager.config_path("config.toml");
        if !config_path.exists() {
            return Ok(AppConfig::default());
        }
        let content = std::fs::read_to_string(&config_path).map_err(|e| {
            eyre!(
                "Failed to read config file at {}: {}",
                config_path.display(),
                e
            )
        })?;
        toml::from_str(&content).map_err(|e| {
            eyre!(
                "Failed to parse config file at {}: {}",
                config_path.display(),
                e
            )
        })
    }

    /// Merge another config into this one (other takes precedence for
    /// any value that differs from the defaults).
    pub fn merge(&mut self, other: AppConfig) {
        let default = AppConfig::default();
        if other.version != default.version {
            self.version = other.version;
        }
        self.display.merge(other.display);
        self.performance.merge(other.performance);
        self.theme.merge(other.theme);
        self.session.merge(other.session);
        self.ui.merge(other.ui);
        if other.debug.enabled != default.debug.enabled {
            self.debug.enabled = other.debug.enabled;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.version.starts_with("0.3") {
            return Err(eyre!(
                "Unsupported config version: {}. Expected 0.3.x",
                self.version
            ));
        }
        if self.display.page_size == 0 {
            return Err(eyre!("page_size must be greater than 0"));
        }
        if self.display.card_height < 2 {
            return Err(eyre!("card_height must be at least 2"));
        }
        if self.performance.event_poll_interval_ms == 0 {
            return Err(eyre!("event_poll_interval_ms must be greater than 0"));
        }
        match self.theme.color_mode.as_str() {
            "light" | "dark" | "auto" => {}
            _ => {
                return Err(eyre!(
                    "Invalid color_mode: {}. Must be 'light', 'dark', or 'auto'",
                    self.theme.color_mode
                ))
            }
        }
        let parser = ColorParser::new();
        self.theme.colors.validate(&parser)?;
        Ok(())
    }
}

impl DisplayConfig {
    pub fn merge(&mut self, other: Self) {
        let default = DisplayConfig::default();
        if other.page_size != default.page_size {
            self.page_size = other.page_size;
        }
        if other.card_height != default.card_height {
            self.card_height = other.card_height;
        }
        if other.narrow_threshold != default.narrow_threshold {
            self.narrow_threshold = other.narrow_threshold;
        }
    }
}

impl PerformanceConfig {
    pub fn merge(&mut self, other: Self) {
        let default = PerformanceConfig::default();
        if other.event_poll_interval_ms != default.event_poll_interval_ms {
            self.event_poll_interval_ms = other.event_poll_interval_ms;
        }
        if other.toast_ttl_ticks != default.toast_ttl_ticks {
            self.toast_ttl_ticks = other.toast_ttl_ticks;
        }
    }
}

impl ThemeConfig {
    pub fn merge(&mut self, other: Self) {
        let default = ThemeConfig::default();
        if other.color_mode != default.color_mode {
            self.color_mode = other.color_mode;
        }
        self.colors.merge(other.colors);
    }
}

impl SessionConfig {
    pub fn merge(&mut self, other: Self) {
        let default = SessionConfig::default();
        if other.user != default.user {
            self.user = other.user;
        }
        if other.pin != default.pin {
            self.pin = other.pin;
        }
    }
}

impl UiConfig {
    pub fn merge(&mut self, other: Self) {
        let default = UiConfig::default();
        if other.show_row_count != default.show_row_count {
            self.show_row_count = other.show_row_count;
        }
    }
}

impl ColorConfig {
    /// Named view of every color slot, in the order the theme exposes
    /// them. Keeps parse/validate/merge in one place.
    fn entries(&self) -> [(&'static str, &String); 15] {
        [
            ("primary", &self.primary),
            ("secondary", &self.secondary),
            ("success", &self.success),
            ("error", &self.error),
            ("warning", &self.warning),
            ("info", &self.info),
            ("dimmed", &self.dimmed),
            ("background", &self.background),
            ("controls_bg", &self.controls_bg),
            ("text_primary", &self.text_primary),
            ("text_inverse", &self.text_inverse),
            ("table_header", &self.table_header),
            ("table_selected", &self.table_selected),
            ("modal_border", &self.modal_border),
            ("modal_border_error", &self.modal_border_error),
        ]
    }

    fn entries_mut(&mut self) -> [(&'static str, &mut String); 15] {
        [
            ("primary", &mut self.primary),
            ("secondary", &mut self.secondary),
            ("success", &mut self.success),
            ("error", &mut self.error),
            ("warning", &mut self.warning),
            ("info", &mut self.info),
            ("dimmed", &mut self.dimmed),
            ("background", &mut self.background),
            ("controls_bg", &mut self.controls_bg),
            ("text_primary", &mut self.text_primary),
            ("text_inverse", &mut self.text_inverse),
            ("table_header", &mut self.table_header),
            ("table_selected", &mut self.table_selected),
            ("modal_border", &mut self.modal_border),
            ("modal_border_error", &mut self.modal_border_error),
        ]
    }

    fn validate(&self, parser: &ColorParser) -> Result<()> {
        for (name, value) in self.entries() {
            parser
                .parse(value)
                .map_err(|e| eyre!("Invalid color value for '{}': {}", name, e))?;
        }
        Ok(())
    }

    pub fn merge(&mut self, other: Self) {
        let default = ColorConfig::default();
        let defaults: HashMap<&str, String> = default
            .entries()
            .into_iter()
            .map(|(k, v)| (k, v.clone()))
            .collect();
        let incoming: HashMap<&str, String> = other
            .entries()
            .into_iter()
            .map(|(k, v)| (k, v.clone()))
            .collect();
        for (name, slot) in self.entries_mut() {
            let new = &incoming[name];
            if *new != defaults[name] {
                *slot = new.clone();
            }
        }
    }
}

/// Color parser with terminal capability detection.
pub struct ColorParser {
    supports_true_color: bool,
    supports_256: bool,
    no_color: bool,
}

impl ColorParser {
    pub fn new() -> Self {
        let no_color = std::env::var("NO_COLOR").is_ok();
        let support = supports_color::on(Stream::Stdout);
        Self {
            supports_true_color: support.as_ref().map(|s| s.has_16m).unwrap_or(false),
            supports_256: support.as_ref().map(|s| s.has_256).unwrap_or(false),
            no_color,
        }
    }

    /// Parse a color string (hex, indexed or named) into a terminal color
    /// the current terminal can actually show.
    pub fn parse(&self, s: &str) -> Result<Color> {
        if self.no_color {
            return Ok(Color::Reset);
        }
        let trimmed = s.trim();

        // Hex format: "#rrggbb"
        if trimmed.starts_with('#') && trimmed.len() == 7 {
            let (r, g, b) = parse_hex(trimmed)?;
            return Ok(self.convert_rgb(r, g, b));
        }

        // Indexed colors: "indexed(236)" for the 256-color palette
        if let Some(num_str) = trimmed
            .to_lowercase()
            .strip_prefix("indexed(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let num = num_str.parse::<u8>().map_err(|_| {
                eyre!(
                    "Invalid indexed color: '{}'. Expected format: indexed(0-255)",
                    trimmed
                )
            })?;
            return Ok(Color::Indexed(num));
        }

        match trimmed.to_lowercase().as_str() {
            "black" => Ok(Color::Black),
            "red" => Ok(Color::Red),
            "green" => Ok(Color::Green),
            "yellow" => Ok(Color::Yellow),
            "blue" => Ok(Color::Blue),
            "magenta" => Ok(Color::Magenta),
            "cyan" => Ok(Color::Cyan),
            "white" => Ok(Color::White),
            "gray" | "grey" | "dark_gray" | "dark_grey" => Ok(Color::DarkGray),
            "light_gray" | "light_grey" => Ok(Color::Indexed(7)),
            // Special modifiers pass through as Reset and are handled in
            // rendering.
            "reset" | "reversed" => Ok(Color::Reset),
            _ => Err(eyre!(
                "Unknown color name: '{}'. Supported: basic ANSI colors (red, blue, etc.), \
                 indexed(0-255), or hex colors (#ff0000)",
                trimmed
            )),
        }
    }

    fn convert_rgb(&self, r: u8, g: u8, b: u8) -> Color {
        if self.supports_true_color {
            Color::Rgb(r, g, b)
        } else if self.supports_256 {
            Color::Indexed(rgb_to_256_color(r, g, b))
        } else {
            rgb_to_basic_ansi(r, g, b)
        }
    }
}

impl Default for ColorParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_hex(s: &str) -> Result<(u8, u8, u8)> {
    if !s.starts_with('#') || s.len() != 7 {
        return Err(eyre!(
            "Invalid hex color format: '{}'. Expected format: #rrggbb",
            s
        ));
    }
    let component = |range: std::ops::Range<usize>, name: &str| {
        u8::from_str_radix(&s[range], 16)
            .map_err(|_| eyre!("Invalid {} component in hex color: {}", name, s))
    };
    Ok((
        component(1..3, "red")?,
        component(3..5, "green")?,
        component(5..7, "blue")?,
    ))
}

/// Convert RGB to the nearest xterm 256-color palette index.
pub fn rgb_to_256_color(r: u8, g: u8, b: u8) -> u8 {
    let max_diff = r.max(g).max(b) as i16 - r.min(g).min(b) as i16;
    if max_diff < 10 {
        // Grayscale ramp (232-255)
        let gray = (r as u16 + g as u16 + b as u16) / 3;
        return if gray < 8 {
            16
        } else if gray > 247 {
            231
        } else {
            232 + ((gray - 8) * 24 / 240) as u8
        };
    }
    let r_idx = (r as u16 * 5 / 255) as u8;
    let g_idx = (g as u16 * 5 / 255) as u8;
    let b_idx = (b as u16 * 5 / 255) as u8;
    16 + 36 * r_idx + 6 * g_idx + b_idx
}

/// Convert RGB to the nearest basic ANSI color (8 colors).
pub fn rgb_to_basic_ansi(r: u8, g: u8, b: u8) -> Color {
    let max_diff = r.max(g).max(b) as i16 - r.min(g).min(b) as i16;
    if max_diff < 30 {
        let avg = (r as u16 + g as u16 + b as u16) / 3;
        return if avg < 64 { Color::Black } else { Color::White };
    }
    match (r > 128, g > 128, b > 128) {
        (false, false, false) => Color::Black,
        (true, false, false) => Color::Red,
        (false, true, false) => Color::Green,
        (true, true, false) => Color::Yellow,
        (false, false, true) => Color::Blue,
        (true, false, true) => Color::Magenta,
        (false, true, true) => Color::Cyan,
        (true, true, true) => Color::White,
    }
}

/// Theme containing parsed colors ready for use.
#[derive(Debug, Clone)]
pub struct Theme {
    pub colors: HashMap<String, Color>,
}

impl Theme {
    pub fn from_config(config: &ThemeConfig) -> Result<Self> {
        let parser = ColorParser::new();
        let mut colors = HashMap::new();
        for (name, value) in config.colors.entries() {
            colors.insert(name.to_string(), parser.parse(value)?);
        }
        Ok(Self { colors })
    }

    /// Get a color by name, Reset if not found.
    pub fn get(&self, name: &str) -> Color {
        self.colors.get(name).copied().unwrap_or(Color::Reset)
    }
}

// Default configuration template
const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("../config/default.toml");
