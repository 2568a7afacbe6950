//! User settings read from settings.json in the app data directory

use crate::constants::*;
use crate::ui::virtual_list::ListTuning;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Catalog endpoint
    pub catalog_url: String,
    pub catalog_limit: u32,

    // Screen size, read once at startup
    pub screen_w: f32,
    pub screen_h: f32,

    // List windowing knobs
    pub tuning: ListTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_url: CATALOG_URL.to_string(),
            catalog_limit: CATALOG_LIMIT,
            screen_w: DEFAULT_SCREEN_W,
            screen_h: DEFAULT_SCREEN_H,
            tuning: ListTuning::default(),
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => Self::parse(&s).unwrap_or_else(|e| {
                warn!(error = %e, "Failed to parse settings, using defaults");
                Self::default()
            }),
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    fn parse(s: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(s)?;
        if settings.screen_w <= 0.0 || settings.screen_h <= 0.0 {
            warn!(w = settings.screen_w, h = settings.screen_h, "Invalid screen size, using default");
            settings.screen_w = DEFAULT_SCREEN_W;
            settings.screen_h = DEFAULT_SCREEN_H;
        }
        debug!(url = %settings.catalog_url, limit = settings.catalog_limit, "Settings loaded");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let s = Settings::parse(r#"{"catalog_url":"http://localhost/products"}"#).unwrap();
        assert_eq!(s.catalog_url, "http://localhost/products");
        assert_eq!(s.catalog_limit, 200);
        assert_eq!(s.tuning.max_to_render_per_batch, 10);
        assert_eq!(s.tuning.window_size, 21);
    }

    #[test]
    fn rejects_nonpositive_screen() {
        let s = Settings::parse(r#"{"screen_w":0,"screen_h":-5}"#).unwrap();
        assert_eq!(s.screen_w, DEFAULT_SCREEN_W);
        assert_eq!(s.screen_h, DEFAULT_SCREEN_H);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = std::env::temp_dir().join("storefront-grid-settings-missing");
        let s = Settings::load(&dir);
        assert_eq!(s.catalog_url, CATALOG_URL);
    }
}
