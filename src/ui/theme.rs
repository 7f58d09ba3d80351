use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub definition: String,
    pub slot_empty: String,
    pub slot_filled: String,
    pub slot_prefilled: String,
    pub slot_correct: String,
    pub slot_wrong: String,
    pub slot_active: String,
    pub accent: String,
    pub accent_dim: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub hazard_safe: String,
    pub hazard_danger: String,
    pub bar_empty: String,
    pub key_fg: String,
    pub key_border: String,
    pub reward: String,
    pub error: String,
    pub warning: String,
    pub success: String,
}

impl Theme {
    /// User themes in `{config}/wordfall/themes/` shadow bundled ones.
    pub fn load(name: &str) -> Option<Self> {
        if let Some(config_dir) = dirs::config_dir() {
            let user_theme_path = config_dir
                .join("wordfall")
                .join("themes")
                .join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&user_theme_path) {
                match toml::from_str::<Theme>(&content) {
                    Ok(theme) => return Some(theme),
                    Err(err) => tracing::warn!(path = %user_theme_path.display(), %err, "bad theme file"),
                }
            }
        }

        let filename = format!("{name}.toml");
        let file = ThemeAssets::get(&filename)?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect()
    }

    pub fn load_or_default(name: &str) -> Self {
        Self::load(name).unwrap_or_else(|| {
            tracing::warn!(theme = name, "unknown theme, using default");
            Self::default()
        })
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load("catppuccin-mocha").unwrap_or_else(|| Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#1e1e2e".to_string(),
            fg: "#cdd6f4".to_string(),
            definition: "#bac2de".to_string(),
            slot_empty: "#585b70".to_string(),
            slot_filled: "#f9e2af".to_string(),
            slot_prefilled: "#cdd6f4".to_string(),
            slot_correct: "#a6e3a1".to_string(),
            slot_wrong: "#f38ba8".to_string(),
            slot_active: "#f5e0dc".to_string(),
            accent: "#89b4fa".to_string(),
            accent_dim: "#45475a".to_string(),
            border: "#45475a".to_string(),
            border_focused: "#89b4fa".to_string(),
            header_bg: "#313244".to_string(),
            header_fg: "#cdd6f4".to_string(),
            hazard_safe: "#94e2d5".to_string(),
            hazard_danger: "#fab387".to_string(),
            bar_empty: "#313244".to_string(),
            key_fg: "#cdd6f4".to_string(),
            key_border: "#585b70".to_string(),
            reward: "#f9e2af".to_string(),
            error: "#f38ba8".to_string(),
            warning: "#f9e2af".to_string(),
            success: "#a6e3a1".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Color::Rgb(r, g, b);
            }
        }
        Color::White
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn definition(&self) -> Color { Self::parse_color(&self.definition) }
    pub fn slot_empty(&self) -> Color { Self::parse_color(&self.slot_empty) }
    pub fn slot_filled(&self) -> Color { Self::parse_color(&self.slot_filled) }
    pub fn slot_prefilled(&self) -> Color { Self::parse_color(&self.slot_prefilled) }
    pub fn slot_correct(&self) -> Color { Self::parse_color(&self.slot_correct) }
    pub fn slot_wrong(&self) -> Color { Self::parse_color(&self.slot_wrong) }
    pub fn slot_active(&self) -> Color { Self::parse_color(&self.slot_active) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn accent_dim(&self) -> Color { Self::parse_color(&self.accent_dim) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn hazard_safe(&self) -> Color { Self::parse_color(&self.hazard_safe) }
    pub fn hazard_danger(&self) -> Color { Self::parse_color(&self.hazard_danger) }
    pub fn bar_empty(&self) -> Color { Self::parse_color(&self.bar_empty) }
    pub fn key_fg(&self) -> Color { Self::parse_color(&self.key_fg) }
    pub fn key_border(&self) -> Color { Self::parse_color(&self.key_border) }
    pub fn reward(&self) -> Color { Self::parse_color(&self.reward) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_hex() {
        assert_eq!(ThemeColors::parse_color("#ff8000"), Color::Rgb(255, 128, 0));
        assert_eq!(ThemeColors::parse_color("00ff00"), Color::Rgb(0, 255, 0));
        assert_eq!(ThemeColors::parse_color("#zzz"), Color::White);
    }

    #[test]
    fn test_bundled_themes_parse() {
        let names = Theme::available_themes();
        assert!(names.iter().any(|n| n == "catppuccin-mocha"));
        for name in names {
            let theme = Theme::load(&name);
            assert!(theme.is_some(), "theme {name} failed to parse");
        }
    }
}
