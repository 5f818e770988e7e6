use crate::storage::{KeyValueStore, StoreError};
use log::warn;
use ratatui::prelude::Color;

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

/// Colors the TUI pulls from the active theme.
pub struct Palette {
    pub background: Color,
    pub surface: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub danger: Color,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(raw: &str) -> Option<Theme> {
        match raw.trim().trim_matches('"') {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Stored value, or the default when absent or unrecognised.
    pub fn load(store: &impl KeyValueStore) -> Result<Theme, StoreError> {
        let stored = store.get(THEME_KEY)?;
        Ok(match stored.as_deref().map(Theme::parse) {
            Some(Some(theme)) => theme,
            Some(None) => {
                warn!("event=theme_load status=unrecognised value={:?}", stored);
                Theme::default()
            }
            None => Theme::default(),
        })
    }

    pub fn save(self, store: &impl KeyValueStore) -> Result<(), StoreError> {
        store.set(THEME_KEY, &format!("\"{}\"", self.as_str()))
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                background: Color::Rgb(16, 18, 24),
                surface: Color::Rgb(30, 33, 42),
                text: Color::White,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                danger: Color::LightRed,
            },
            Theme::Light => Palette {
                background: Color::Rgb(250, 248, 240),
                surface: Color::Rgb(235, 232, 220),
                text: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                danger: Color::Red,
            },
        }
    }
}
