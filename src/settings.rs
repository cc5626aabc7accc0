//! Arcade settings and preferences
//!
//! Only the theme is persisted, as a plain string under its own key so it
//! stays independent of the score record.

use serde::Serialize;

use crate::error::{ArcadeError, Result};
use crate::games::{MemoryDifficulty, SnakeSpeed, TicTacToeDifficulty, TicTacToeMode};
use crate::persistence::KeyValueStorage;

/// Colour themes offered by the hub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum Theme {
    #[default]
    Cyan,
    Purple,
    Green,
    Orange,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Cyan, Theme::Purple, Theme::Green, Theme::Orange];

    /// CSS class applied to the document body
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Cyan => "theme-cyan",
            Theme::Purple => "theme-purple",
            Theme::Green => "theme-green",
            Theme::Orange => "theme-orange",
        }
    }

    /// Accepts the class name or the bare colour
    pub fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_lowercase();
        match lower.strip_prefix("theme-").unwrap_or(&lower) {
            "cyan" => Ok(Theme::Cyan),
            "purple" => Ok(Theme::Purple),
            "green" => Ok(Theme::Green),
            "orange" => Ok(Theme::Orange),
            _ => Err(ArcadeError::UnknownOption {
                kind: "theme",
                value: s.to_string(),
            }),
        }
    }
}

/// Arcade settings/preferences
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    pub theme: Theme,

    // === Audio ===
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,

    // === Last chosen options ===
    pub snake_speed: SnakeSpeed,
    pub tictactoe_mode: TicTacToeMode,
    pub tictactoe_difficulty: TicTacToeDifficulty,
    pub memory_difficulty: MemoryDifficulty,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Cyan,
            sound_enabled: true,
            master_volume: 1.0,
            snake_speed: SnakeSpeed::Normal,
            tictactoe_mode: TicTacToeMode::VsAi,
            tictactoe_difficulty: TicTacToeDifficulty::Hard,
            memory_difficulty: MemoryDifficulty::Easy,
        }
    }
}

impl Settings {
    /// Storage key for the theme
    pub const THEME_KEY: &'static str = "neon_arcade_theme";

    /// Defaults plus the stored theme, if any
    pub fn load<S: KeyValueStorage>(storage: &S) -> Self {
        let mut settings = Self::default();
        match storage.get_item(Self::THEME_KEY) {
            Ok(Some(raw)) => match Theme::from_str(&raw) {
                Ok(theme) => {
                    log::info!("Loaded theme {}", theme.as_str());
                    settings.theme = theme;
                }
                Err(e) => log::warn!("Ignoring stored theme: {}", e),
            },
            Ok(None) => log::info!("Using default theme"),
            Err(e) => log::warn!("Theme unavailable: {}", e),
        }
        settings
    }

    /// Write the theme through to storage
    pub fn save_theme<S: KeyValueStorage>(&self, storage: &mut S) -> Result<()> {
        storage.set_item(Self::THEME_KEY, self.theme.as_str())
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 1.0);
    }

    /// Effective gain for cues (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.sound_enabled {
            self.master_volume
        } else {
            0.0
        }
    }
}
