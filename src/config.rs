use std::env;

use crate::data::DEFAULT_BANK_LOCATION;
use crate::error::ConfigError;
use crate::nav::{NavOptions, DEFAULT_THRESHOLD};

pub const ENV_BANK: &str = "TUTORIAL_BANK";
pub const ENV_CONTENTS_SLUG: &str = "TUTORIAL_CONTENTS_SLUG";
pub const ENV_HOME_HREF: &str = "TUTORIAL_HOME_HREF";
pub const ENV_CONTENTS_HREF: &str = "TUTORIAL_CONTENTS_HREF";
pub const ENV_BACK_TO_TOP: &str = "TUTORIAL_BACK_TO_TOP";
pub const ENV_LOG: &str = "TUTORIAL_LOG";

/// Runtime settings shared by the page enhancer and the terminal quiz.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Question bank location, relative to the page or absolute, or an
    /// `http(s)://` URL.
    pub bank_location: String,
    /// Slug of the contents page. It gets no outline and no contents link.
    pub contents_slug: String,
    pub home_href: String,
    pub contents_href: String,
    /// Scroll offset past which the back-to-top control shows.
    pub back_to_top_threshold: f64,
    /// `tracing_subscriber::EnvFilter` directives.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        let nav = NavOptions::default();
        Self {
            bank_location: DEFAULT_BANK_LOCATION.to_string(),
            contents_slug: nav.contents_slug,
            home_href: nav.home_href,
            contents_href: nav.contents_href,
            back_to_top_threshold: DEFAULT_THRESHOLD,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source; unset names keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default = Self::default();
        let back_to_top_threshold = match lookup(ENV_BACK_TO_TOP) {
            Some(value) => match value.trim().parse::<f64>() {
                Ok(threshold) if threshold.is_finite() && threshold >= 0.0 => threshold,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        name: ENV_BACK_TO_TOP,
                        value,
                    });
                }
            },
            None => default.back_to_top_threshold,
        };

        Ok(Self {
            bank_location: lookup(ENV_BANK).unwrap_or(default.bank_location),
            contents_slug: lookup(ENV_CONTENTS_SLUG).unwrap_or(default.contents_slug),
            home_href: lookup(ENV_HOME_HREF).unwrap_or(default.home_href),
            contents_href: lookup(ENV_CONTENTS_HREF).unwrap_or(default.contents_href),
            back_to_top_threshold,
            log_filter: lookup(ENV_LOG).unwrap_or(default.log_filter),
        })
    }

    pub fn nav_options(&self) -> NavOptions {
        NavOptions {
            home_href: self.home_href.clone(),
            contents_href: self.contents_href.clone(),
            contents_slug: self.contents_slug.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.bank_location, "../quiz/questions.json");
        assert_eq!(config.back_to_top_threshold, 280.0);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_BANK, "https://example.org/questions.json"),
            (ENV_CONTENTS_SLUG, "toc"),
            (ENV_BACK_TO_TOP, " 120 "),
        ]))
        .unwrap();

        assert_eq!(config.bank_location, "https://example.org/questions.json");
        assert_eq!(config.back_to_top_threshold, 120.0);
        let nav = config.nav_options();
        assert_eq!(nav.contents_slug, "toc");
        assert_eq!(nav.home_href, "../index.html");
    }

    #[test]
    fn rejects_bad_threshold() {
        for bad in ["tall", "-5", "NaN"] {
            let err = Config::from_lookup(lookup_from(&[(ENV_BACK_TO_TOP, bad)])).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidEnv { name: ENV_BACK_TO_TOP, .. }));
        }
    }
}
