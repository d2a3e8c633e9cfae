use std::fs;
use std::path::PathBuf;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::Config;

#[derive(Embed)]
#[folder = "assets/themes/"]
struct BundledThemes;

/// Named palette. Colour values stay as written in the TOML file and are
/// parsed when drawn.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub muted: String,
    pub accent: String,
    pub header_bg: String,
    pub header_fg: String,
    pub selection_bg: String,
    pub selection_fg: String,
    pub today: String,
    pub error: String,
    pub warning: String,
    pub success: String,
}

const FALLBACK_THEME: &str = "terminal-default";

impl Theme {
    /// Look `name` up in `<config_dir>/tcal/themes/` first, then among the
    /// bundled themes.
    pub fn load(name: &str) -> Option<Self> {
        let file = format!("{name}.toml");
        Self::from_user_dir(&file).or_else(|| Self::bundled(&file))
    }

    fn user_dir() -> PathBuf {
        Config::config_dir().join("themes")
    }

    fn from_user_dir(file: &str) -> Option<Self> {
        let path = Self::user_dir().join(file);
        let content = fs::read_to_string(&path).ok()?;
        match toml::from_str(&content) {
            Ok(theme) => Some(theme),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring unreadable theme");
                None
            }
        }
    }

    fn bundled(file: &str) -> Option<Self> {
        let asset = BundledThemes::get(file)?;
        toml::from_str(std::str::from_utf8(&asset.data).ok()?).ok()
    }

    /// Names of the themes shipped inside the binary.
    pub fn available_themes() -> Vec<String> {
        let mut names: Vec<String> = BundledThemes::iter()
            .filter_map(|file| file.strip_suffix(".toml").map(str::to_string))
            .collect();
        names.sort();
        names
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::bundled(&format!("{FALLBACK_THEME}.toml")).unwrap_or_else(|| Self {
            name: FALLBACK_THEME.to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        let named = |value: &str| value.to_string();
        Self {
            bg: named("reset"),
            fg: named("reset"),
            muted: named("darkgray"),
            accent: named("blue"),
            header_bg: named("reset"),
            header_fg: named("reset"),
            selection_bg: named("blue"),
            selection_fg: named("black"),
            today: named("yellow"),
            error: named("red"),
            warning: named("yellow"),
            success: named("green"),
        }
    }
}

/// `#rrggbb` or a named terminal colour such as `reset` or `darkgray`.
/// Anything else draws with the terminal default.
pub fn parse_color(value: &str) -> Color {
    let Some(hex) = value.strip_prefix('#') else {
        return value.parse().unwrap_or(Color::Reset);
    };
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Color::Reset;
    }
    u32::from_str_radix(hex, 16).map_or(Color::Reset, Color::from_u32)
}

macro_rules! color_accessors {
    ($($field:ident),* $(,)?) => {
        impl ThemeColors {
            $(
                pub fn $field(&self) -> Color {
                    parse_color(&self.$field)
                }
            )*
        }
    };
}

color_accessors!(
    bg,
    fg,
    muted,
    accent,
    header_bg,
    header_fg,
    selection_bg,
    selection_fg,
    today,
    error,
    warning,
    success,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_themes_parse() {
        let names = Theme::available_themes();
        assert!(names.contains(&FALLBACK_THEME.to_string()));
        for name in names {
            assert!(Theme::bundled(&format!("{name}.toml")).is_some(), "theme {name} failed to parse");
        }
    }

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let theme: Theme = toml::from_str("name = \"partial\"\n[colors]\naccent = \"#ff0000\"\n").unwrap();
        assert_eq!(theme.colors.accent(), Color::Rgb(0xff, 0, 0));
        assert_eq!(theme.colors.error(), Color::Red);
    }

    #[test]
    fn test_parse_color_forms() {
        assert_eq!(parse_color("#1e1e2e"), Color::Rgb(0x1e, 0x1e, 0x2e));
        assert_eq!(parse_color("darkgray"), Color::DarkGray);
        assert_eq!(parse_color("#12"), Color::Reset);
        assert_eq!(parse_color("#+12345"), Color::Reset);
        assert_eq!(parse_color("nonsense"), Color::Reset);
    }
}
