use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::layout::colouring::ColourMode;

pub const DEFAULT_VIEW_DAYS: usize = 7;
/// Widest window the multi-day views accept, about ten years.
pub const MAX_VIEW_DAYS: usize = 3660;

/// User configuration as stored in the `config` key of the user file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UiConfig {
    /// Number of days shown by the multi-day views.
    pub view: usize,
    pub colour_mode: ColourMode,
    /// Foreground colour, also used for names missing from the palettes.
    pub colour: String,
    /// Colour of highlighted buckets.
    pub accent: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            view: DEFAULT_VIEW_DAYS,
            colour_mode: ColourMode::Sector,
            colour: "#ccc".into(),
            accent: "#eb4e32".into(),
        }
    }
}

impl UiConfig {
    /// `view` with `override_days` taking precedence.
    pub fn view_days(&self, override_days: Option<usize>) -> Result<usize> {
        let days = override_days.unwrap_or(self.view);
        ensure!(
            (1..=MAX_VIEW_DAYS).contains(&days),
            "A view spans 1 to {MAX_VIEW_DAYS} days, got {days}"
        );
        Ok(days)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use super::{Config, DEFAULT_VIEW_DAYS, MAX_VIEW_DAYS};
    use crate::layout::colouring::ColourMode;

    #[test]
    fn missing_keys_take_defaults() -> Result<()> {
        let config: Config = serde_json::from_str(r#"{"ui": {"view": 14, "colourMode": "project"}}"#)?;
        assert_eq!(config.ui.view, 14);
        assert_eq!(config.ui.colour_mode, ColourMode::Project);
        assert_eq!(config.ui.colour, "#ccc");

        let config: Config = serde_json::from_str("{}")?;
        assert_eq!(config.ui.view, DEFAULT_VIEW_DAYS);
        Ok(())
    }

    #[test]
    fn view_days_override() -> Result<()> {
        let config = Config::default();
        assert_eq!(config.ui.view_days(None)?, DEFAULT_VIEW_DAYS);
        assert_eq!(config.ui.view_days(Some(30))?, 30);
        assert_eq!(config.ui.view_days(Some(MAX_VIEW_DAYS))?, MAX_VIEW_DAYS);
        Ok(())
    }

    #[test]
    fn view_days_out_of_range() -> Result<()> {
        let config = Config::default();
        assert!(config.ui.view_days(Some(0)).is_err());
        assert!(config.ui.view_days(Some(MAX_VIEW_DAYS + 1)).is_err());

        let config: Config = serde_json::from_str(r#"{"ui": {"view": 200000000000000}}"#)?;
        assert!(config.ui.view_days(None).is_err());
        Ok(())
    }
}
