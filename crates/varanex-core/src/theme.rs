use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::constants::keys;
use crate::error::{Result, VaranexError};
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    Light,
    Dark,
    Blue,
    Purple,
    Green,
}

impl ThemeName {
    pub const ALL: [ThemeName; 5] = [
        ThemeName::Light,
        ThemeName::Dark,
        ThemeName::Blue,
        ThemeName::Purple,
        ThemeName::Green,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Light => "light",
            ThemeName::Dark => "dark",
            ThemeName::Blue => "blue",
            ThemeName::Purple => "purple",
            ThemeName::Green => "green",
        }
    }

    /// Every theme except `light` renders on a dark background.
    pub fn is_dark(&self) -> bool {
        !matches!(self, ThemeName::Light)
    }

    /// Guess from `COLORFGBG` ("fg;bg"); background codes 0-6 and 8 are dark.
    pub fn from_terminal_hint(colorfgbg: &str) -> Option<Self> {
        let bg: u8 = colorfgbg.rsplit(';').next()?.trim().parse().ok()?;
        Some(if bg <= 6 || bg == 8 {
            ThemeName::Dark
        } else {
            ThemeName::Light
        })
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeName {
    type Err = VaranexError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        ThemeName::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = ThemeName::ALL.iter().map(|t| t.as_str()).collect();
                VaranexError::Config(format!(
                    "Unknown theme '{}'. Available: {}",
                    s.trim(),
                    names.join(", ")
                ))
            })
    }
}

/// The current theme, persisted under the `theme` key.
pub struct ThemeState {
    current: Mutex<ThemeName>,
    store: Arc<dyn KeyValueStore>,
}

impl ThemeState {
    /// Stored value first, then the caller's preference, then `light`.
    pub fn load(store: Arc<dyn KeyValueStore>, preference: Option<ThemeName>) -> Self {
        let stored = match store.get(keys::THEME) {
            Ok(value) => value.and_then(|v| v.parse::<ThemeName>().ok()),
            Err(e) => {
                tracing::warn!("Could not read saved theme: {e}");
                None
            }
        };

        let current = stored.or(preference).unwrap_or(ThemeName::Light);
        Self {
            current: Mutex::new(current),
            store,
        }
    }

    pub fn get(&self) -> ThemeName {
        *self.current.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Switch themes. The in-memory value changes even if saving fails.
    pub fn set(&self, theme: ThemeName) -> Result<()> {
        *self.current.lock().unwrap_or_else(|p| p.into_inner()) = theme;
        self.store.set(keys::THEME, theme.as_str())
    }
}
