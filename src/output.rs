//! # Output Configuration
//!
//! Controls how the CLI prints its summary: with emoji and colour on an
//! interactive terminal, with plain `[TAGS]` everywhere else.
//!
//! Colour is decided from the `--color` flag first, then the environment:
//! - `NO_COLOR` (any value) disables it (https://no-color.org/)
//! - `CLICOLOR=0` disables it
//! - `CLICOLOR_FORCE=1` enables it even when stdout is not a TTY
//! - `TERM=dumb` disables it

use std::env;
use std::fmt::Display;

use console::style;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from the `--color` value
    /// (`always`, `never` or `auto`) and the environment.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    /// Render an entity name, bold when colours are on.
    pub fn entity(&self, name: impl Display) -> String {
        if self.use_color {
            style(name).bold().to_string()
        } else {
            name.to_string()
        }
    }

    /// Render a path or other secondary detail, dimmed when colours are on.
    pub fn detail(&self, value: impl Display) -> String {
        if self.use_color {
            style(value).dim().to_string()
        } else {
            value.to_string()
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// The emoji when colours are on, the plain tag otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_flag_overrides_detection() {
        assert!(OutputConfig::from_env_and_flag("always").use_color);
        assert!(OutputConfig::from_env_and_flag("ALWAYS").use_color);
        assert!(!OutputConfig::from_env_and_flag("never").use_color);
    }

    #[test]
    fn test_emoji_helper() {
        assert_eq!(emoji(&OutputConfig::with_color(), "📋", "[CLONE]"), "📋");
        assert_eq!(emoji(&OutputConfig::without_color(), "📋", "[CLONE]"), "[CLONE]");
    }

    #[test]
    fn test_plain_rendering_is_unstyled() {
        let config = OutputConfig::without_color();
        assert_eq!(config.entity("Catalog.Items"), "Catalog.Items");
        assert_eq!(config.detail("/cfg/Configuration.xml"), "/cfg/Configuration.xml");
    }
}
