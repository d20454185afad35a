use std::fs;
use std::path::Path;

use ratatui::style::Color;
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct Theme {
    pub panel_bg: Color,
    pub title_bg: Color,
    pub status_bg: Color,
    pub overlay_bg: Color,
    pub text_fg: Color,
    pub muted_fg: Color,
    pub active_fg: Color,
    pub type_fg: Color,
    pub field_fg: Color,
    pub arg_fg: Color,
    pub error_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            panel_bg: Color::Rgb(44, 44, 44),
            title_bg: Color::Rgb(54, 54, 54),
            status_bg: Color::Rgb(36, 36, 36),
            overlay_bg: Color::Rgb(20, 20, 20),
            text_fg: Color::Rgb(225, 225, 225),
            muted_fg: Color::Rgb(160, 160, 160),
            active_fg: Color::Rgb(255, 255, 255),
            type_fg: Color::Rgb(240, 170, 90),
            field_fg: Color::Rgb(100, 160, 230),
            arg_fg: Color::Rgb(200, 130, 220),
            error_fg: Color::Rgb(235, 95, 95),
        }
    }
}

impl Theme {
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path_ref = path.as_ref();
        match fs::read_to_string(path_ref) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(theme) => theme,
                Err(err) => {
                    tracing::warn!(
                        path = %path_ref.display(),
                        error = %err,
                        "failed to parse theme file; using defaults"
                    );
                    Self::default()
                }
            },
            Err(err) => {
                tracing::debug!(
                    path = %path_ref.display(),
                    error = %err,
                    "theme file not readable; using defaults"
                );
                Self::default()
            }
        }
    }

    /// Parses a theme where every color is optional; missing entries keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        let cfg: ThemeToml = toml::from_str(s)?;
        let colors = cfg.colors;
        let defaults = Self::default();
        let pick = |value: Option<RgbToml>, fallback: Color| {
            value.map(|rgb| rgb.to_color()).unwrap_or(fallback)
        };
        Ok(Self {
            panel_bg: pick(colors.panel_bg, defaults.panel_bg),
            title_bg: pick(colors.title_bg, defaults.title_bg),
            status_bg: pick(colors.status_bg, defaults.status_bg),
            overlay_bg: pick(colors.overlay_bg, defaults.overlay_bg),
            text_fg: pick(colors.text_fg, defaults.text_fg),
            muted_fg: pick(colors.muted_fg, defaults.muted_fg),
            active_fg: pick(colors.active_fg, defaults.active_fg),
            type_fg: pick(colors.type_fg, defaults.type_fg),
            field_fg: pick(colors.field_fg, defaults.field_fg),
            arg_fg: pick(colors.arg_fg, defaults.arg_fg),
            error_fg: pick(colors.error_fg, defaults.error_fg),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ThemeToml {
    #[serde(default)]
    colors: ThemeColorsToml,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ThemeColorsToml {
    panel_bg: Option<RgbToml>,
    title_bg: Option<RgbToml>,
    status_bg: Option<RgbToml>,
    overlay_bg: Option<RgbToml>,
    text_fg: Option<RgbToml>,
    muted_fg: Option<RgbToml>,
    active_fg: Option<RgbToml>,
    type_fg: Option<RgbToml>,
    field_fg: Option<RgbToml>,
    arg_fg: Option<RgbToml>,
    error_fg: Option<RgbToml>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct RgbToml {
    r: u8,
    g: u8,
    b: u8,
}

impl RgbToml {
    fn to_color(self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}
