//! User settings, read from `settings.json` in the data directory.
//!
//! Every field has a default, so a partial or missing file is fine. The file
//! is never written by the game; edit it by hand.

use serde::{Deserialize, Serialize};

use crate::games::snake_battle::{DEFAULT_GRID_SIZE, MAX_GRID_SIZE, MIN_GRID_SIZE};
use crate::games::LaunchOptions;
use crate::utils::JsonStore;

pub const SETTINGS_KEY: &str = "settings";
pub const MAX_NAME_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub player1_name: String,
    pub player2_name: String,
    pub snake_grid_size: i16,
    /// Tracing filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player1_name: "Player 1".to_string(),
            player2_name: "Player 2".to_string(),
            snake_grid_size: DEFAULT_GRID_SIZE,
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn load(store: &JsonStore) -> Self {
        store.get_or_default::<Settings>(SETTINGS_KEY).sanitized()
    }

    /// Clamp out-of-range values and fill blank names.
    pub fn sanitized(mut self) -> Self {
        let defaults = Settings::default();
        self.snake_grid_size = self.snake_grid_size.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE);
        self.player1_name = clean_name(&self.player1_name, &defaults.player1_name);
        self.player2_name = clean_name(&self.player2_name, &defaults.player2_name);
        if self.log_filter.trim().is_empty() {
            self.log_filter = defaults.log_filter;
        }
        self
    }

    pub fn launch_options(&self, key_release_supported: bool) -> LaunchOptions {
        LaunchOptions {
            snake_grid_size: self.snake_grid_size,
            crouch_auto_release: !key_release_supported,
        }
    }
}

/// Trimmed and length-capped name, or `fallback` if blank.
pub fn clean_name(name: &str, fallback: &str) -> String {
    let trimmed: String = name.trim().chars().take(MAX_NAME_LEN).collect();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed
    }
}
