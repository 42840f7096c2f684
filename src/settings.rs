use crate::game::DrawMode;
use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};

pub const DEFAULT_AUTO_COMPLETE_DELAY_MS: u64 = 100;

/// Player preferences. Missing fields fall back to their defaults.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub draw_mode: DrawMode,
    /// Pause between auto-complete moves so a view can animate each card.
    pub auto_complete_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            draw_mode: DrawMode::One,
            auto_complete_delay_ms: DEFAULT_AUTO_COMPLETE_DELAY_MS,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|err| anyhow!("invalid settings: {}", err))
    }
}
