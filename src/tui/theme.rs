// SPDX-FileCopyrightText: 2026 Tessera contributors
// SPDX-License-Identifier: MIT

use std::{env, error::Error, fmt};

use ratatui::style::{Color, Modifier, Style};

/// Optional `#rrggbb,#rrggbb` foreground/background override.
pub(crate) const THEME_ENV_VAR: &str = "TESSERA_COLORS";

#[derive(Debug, Clone, Default)]
pub(crate) struct TuiTheme {
    base: Option<(Color, Color)>,
}

impl TuiTheme {
    pub(crate) fn from_env() -> Result<Self, ThemeError> {
        match env::var(THEME_ENV_VAR) {
            Ok(raw) => Ok(Self { base: Some(parse_fg_bg(&raw)?) }),
            Err(_) => Ok(Self::default()),
        }
    }

    pub(crate) fn base_style(&self) -> Style {
        match self.base {
            Some((fg, bg)) => Style::default().fg(fg).bg(bg),
            None => Style::default(),
        }
    }

    pub(crate) fn panel_border_style(&self, focused: bool) -> Style {
        if focused {
            self.base_style().fg(Color::Yellow)
        } else {
            self.base_style().fg(Color::DarkGray)
        }
    }

    pub(crate) fn selection_style(&self) -> Style {
        self.base_style().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    }

    pub(crate) fn anchor_style(&self) -> Style {
        self.base_style().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    }

    pub(crate) fn error_style(&self) -> Style {
        self.base_style().fg(Color::Red)
    }

    pub(crate) fn status_style(&self) -> Style {
        self.base_style().fg(Color::Cyan)
    }

    pub(crate) fn footer_key_style(&self) -> Style {
        self.base_style().fg(Color::Cyan)
    }

    pub(crate) fn footer_label_style(&self) -> Style {
        self.base_style().fg(Color::Gray)
    }
}

fn parse_fg_bg(raw: &str) -> Result<(Color, Color), ThemeError> {
    let mut parts = raw.split(',');
    let (Some(fg), Some(bg), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ThemeError::Format { value: raw.to_owned() });
    };
    Ok((parse_hex_color(fg.trim())?, parse_hex_color(bg.trim())?))
}

fn parse_hex_color(raw: &str) -> Result<Color, ThemeError> {
    let invalid = || ThemeError::Color { value: raw.to_owned() };
    let hex = raw.strip_prefix('#').ok_or_else(invalid)?;
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let r = u8::from_str_radix(&hex[0..2], 16).map_err(|_| invalid())?;
    let g = u8::from_str_radix(&hex[2..4], 16).map_err(|_| invalid())?;
    let b = u8::from_str_radix(&hex[4..6], 16).map_err(|_| invalid())?;
    Ok(Color::Rgb(r, g, b))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ThemeError {
    Format { value: String },
    Color { value: String },
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format { value } => {
                write!(f, "{THEME_ENV_VAR} must be '<fg>,<bg>' (got '{value}')")
            }
            Self::Color { value } => {
                write!(f, "invalid hex color '{value}' (expected '#rrggbb')")
            }
        }
    }
}

impl Error for ThemeError {}
