//! Dark/light theme with write-through persistence.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use tracing::warn;

use folio_core::store::THEME_KEY;
use folio_core::KvStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    /// Read the persisted choice, defaulting to dark on first run and
    /// persisting that default so later reads see an explicit value.
    pub fn load(store: &KvStore) -> Self {
        match store.get::<Theme>(THEME_KEY) {
            Ok(Some(theme)) => theme,
            Ok(None) => {
                let theme = Theme::Dark;
                if let Err(err) = store.set(THEME_KEY, &theme) {
                    warn!(error = %err, "could not persist default theme");
                }
                theme
            }
            Err(err) => {
                warn!(error = %err, "unreadable theme, falling back to dark");
                Theme::Dark
            }
        }
    }

    /// Flip the theme and write it through immediately.
    pub fn toggle(&mut self, store: &KvStore) {
        *self = match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        };
        if let Err(err) = store.set(THEME_KEY, self) {
            warn!(error = %err, "could not persist theme");
        }
    }

    pub fn bg(self) -> Color {
        match self {
            Theme::Dark => Color::Rgb(10, 25, 47),
            Theme::Light => Color::Rgb(245, 245, 250),
        }
    }

    pub fn fg(self) -> Color {
        match self {
            Theme::Dark => Color::Rgb(204, 214, 246),
            Theme::Light => Color::Rgb(40, 50, 70),
        }
    }

    pub fn accent(self) -> Color {
        Color::Rgb(34, 211, 238)
    }

    pub fn dim(self) -> Color {
        match self {
            Theme::Dark => Color::DarkGray,
            Theme::Light => Color::Gray,
        }
    }
}
