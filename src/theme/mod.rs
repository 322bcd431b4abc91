//! Theme System
//!
//! Color themes for tclub. A theme is resolved once at startup and then
//! read by every renderer through `App`; nothing changes it afterwards.

use anyhow::{Context, Result};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_THEME: &str = "dark";

/// Validate theme name to prevent path traversal attacks
/// Theme names can only contain alphanumeric characters, hyphens, and underscores
fn validate_theme_name(name: &str) -> bool {
    if name.is_empty() || name.len() > 64 {
        return false;
    }

    if name.starts_with('.') || name.starts_with('-') {
        return false;
    }

    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// RGB color as [r, g, b]
pub type Rgb = [u8; 3];

pub fn rgb(color: Rgb) -> Color {
    Color::Rgb(color[0], color[1], color[2])
}

/// Complete theme definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default)]
    pub base: BaseColors,

    #[serde(default)]
    pub table: TableColors,

    #[serde(default)]
    pub dialog: DialogColors,

    /// Syntax highlighting (for JSON view)
    #[serde(default)]
    pub syntax: SyntaxColors,
}

fn default_name() -> String {
    DEFAULT_THEME.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseColors {
    #[serde(default = "default_bg")]
    pub background: Rgb,
    /// Panels and overlays
    #[serde(default = "default_paper")]
    pub paper: Rgb,
    #[serde(default = "default_fg")]
    pub foreground: Rgb,
    #[serde(default = "default_border")]
    pub border: Rgb,
    /// Titles, highlights, focused inputs
    #[serde(default = "default_primary")]
    pub primary: Rgb,
    #[serde(default = "default_secondary")]
    pub secondary: Rgb,
    #[serde(default = "default_info")]
    pub info: Rgb,
    /// Muted/secondary text
    #[serde(default = "default_muted")]
    pub muted: Rgb,
    #[serde(default = "default_error")]
    pub error: Rgb,
    #[serde(default = "default_warning")]
    pub warning: Rgb,
    #[serde(default = "default_success")]
    pub success: Rgb,
}

fn default_bg() -> Rgb {
    [28, 28, 30]
}
fn default_paper() -> Rgb {
    [44, 44, 46]
}
fn default_fg() -> Rgb {
    [255, 255, 255]
}
fn default_border() -> Rgb {
    [85, 85, 85]
}
fn default_primary() -> Rgb {
    [108, 99, 255]
}
fn default_secondary() -> Rgb {
    [255, 107, 107]
}
fn default_info() -> Rgb {
    [76, 201, 240]
}
fn default_muted() -> Rgb {
    [209, 209, 214]
}
fn default_error() -> Rgb {
    [255, 85, 85]
}
fn default_warning() -> Rgb {
    [244, 162, 97]
}
fn default_success() -> Rgb {
    [56, 176, 0]
}

impl Default for BaseColors {
    fn default() -> Self {
        Self {
            background: default_bg(),
            paper: default_paper(),
            foreground: default_fg(),
            border: default_border(),
            primary: default_primary(),
            secondary: default_secondary(),
            info: default_info(),
            muted: default_muted(),
            error: default_error(),
            warning: default_warning(),
            success: default_success(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColors {
    #[serde(default = "default_header")]
    pub header: Rgb,
    #[serde(default = "default_selected_bg")]
    pub selected_bg: Rgb,
    #[serde(default = "default_selected_fg")]
    pub selected_fg: Rgb,
}

fn default_header() -> Rgb {
    [76, 201, 240]
}
fn default_selected_bg() -> Rgb {
    [58, 54, 110]
}
fn default_selected_fg() -> Rgb {
    [255, 255, 255]
}

impl Default for TableColors {
    fn default() -> Self {
        Self {
            header: default_header(),
            selected_bg: default_selected_bg(),
            selected_fg: default_selected_fg(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogColors {
    #[serde(default = "default_paper")]
    pub background: Rgb,
    #[serde(default = "default_primary")]
    pub border: Rgb,
    #[serde(default = "default_button_bg")]
    pub button_bg: Rgb,
    #[serde(default = "default_primary")]
    pub button_selected: Rgb,
    /// Destructive action color
    #[serde(default = "default_secondary")]
    pub destructive: Rgb,
}

fn default_button_bg() -> Rgb {
    [68, 68, 70]
}

impl Default for DialogColors {
    fn default() -> Self {
        Self {
            background: default_paper(),
            border: default_primary(),
            button_bg: default_button_bg(),
            button_selected: default_primary(),
            destructive: default_secondary(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxColors {
    #[serde(default = "default_info")]
    pub key: Rgb,
    #[serde(default = "default_success")]
    pub string: Rgb,
    #[serde(default = "default_warning")]
    pub number: Rgb,
    #[serde(default = "default_secondary")]
    pub boolean: Rgb,
    #[serde(default = "default_muted")]
    pub null: Rgb,
}

impl Default for SyntaxColors {
    fn default() -> Self {
        Self {
            key: default_info(),
            string: default_success(),
            number: default_warning(),
            boolean: default_secondary(),
            null: default_muted(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: DEFAULT_THEME.to_string(),
            base: BaseColors::default(),
            table: TableColors::default(),
            dialog: DialogColors::default(),
            syntax: SyntaxColors::default(),
        }
    }
}

impl Theme {
    /// Get built-in theme by name
    pub fn builtin(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "dark" | "default" => Some(Self::default()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }

    /// Light palette
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            base: BaseColors {
                background: [253, 252, 251],
                paper: [255, 255, 255],
                foreground: [30, 41, 59],
                border: [203, 213, 225],
                primary: [108, 99, 255],
                secondary: [255, 107, 107],
                info: [76, 201, 240],
                muted: [100, 116, 139],
                error: [220, 38, 38],
                warning: [244, 162, 97],
                success: [56, 176, 0],
            },
            table: TableColors {
                header: [108, 99, 255],
                selected_bg: [226, 224, 255],
                selected_fg: [30, 41, 59],
            },
            dialog: DialogColors {
                background: [255, 255, 255],
                border: [108, 99, 255],
                button_bg: [226, 232, 240],
                button_selected: [108, 99, 255],
                destructive: [255, 107, 107],
            },
            syntax: SyntaxColors {
                key: [108, 99, 255],
                string: [56, 176, 0],
                number: [214, 120, 50],
                boolean: [255, 107, 107],
                null: [100, 116, 139],
            },
        }
    }

    /// Load theme from a YAML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read theme {:?}", path))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse theme YAML")
    }

    /// Resolve a theme name: builtin first, then `<config>/tclub/skins/<name>.yaml`
    ///
    /// Unknown or unsafe names fall back to the default theme.
    pub fn resolve(name: &str) -> Self {
        if !validate_theme_name(name) {
            tracing::warn!("Invalid theme name: '{}' contains unsafe characters", name);
            return Self::default();
        }

        if let Some(theme) = Self::builtin(name) {
            return theme;
        }

        let Some(path) = skin_path(name) else {
            return Self::default();
        };
        match Self::load_from_file(&path) {
            Ok(theme) => theme,
            Err(e) => {
                tracing::warn!("Theme '{}' not available: {:#}", name, e);
                Self::default()
            },
        }
    }
}

fn skins_dir() -> Option<PathBuf> {
    crate::config::Config::config_dir().map(|d| d.join("skins"))
}

fn skin_path(name: &str) -> Option<PathBuf> {
    skins_dir().map(|d| d.join(format!("{}.yaml", name)))
}

/// List available themes
pub fn list_available() -> Vec<String> {
    let mut themes = vec!["dark".to_string(), "light".to_string()];

    if let Some(dir) = skins_dir() {
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                if let Some(name) = entry.path().file_stem().and_then(|n| n.to_str()) {
                    if !themes.iter().any(|t| t == name) {
                        themes.push(name.to_string());
                    }
                }
            }
        }
    }

    themes
}
