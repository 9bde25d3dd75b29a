use std::env;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;
use log::warn;

use crate::modules::timing::assembler::LapValidation;

pub const DEFAULT_BASE_URL: &str = "https://www.motogp.com/api";
pub const DEFAULT_RIDERS_API_URL: &str = "https://api.motogp.com";
pub const DEFAULT_RESULTS_HOST: &str = "https://resources.motogp.com";
pub const DEFAULT_CATEGORY: &str = "MotoGP";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub base_url: String,
    pub riders_api_url: String,
    pub results_host: String,
    pub request_timeout: Duration,
    pub season: Option<u32>,
    pub category: String,
    pub event: Option<String>,
    pub performance: bool,
    pub lap_validation: LapValidation,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            riders_api_url: DEFAULT_RIDERS_API_URL.to_string(),
            results_host: DEFAULT_RESULTS_HOST.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            season: None,
            category: DEFAULT_CATEGORY.to_string(),
            event: None,
            performance: false,
            lap_validation: LapValidation::Positional,
        }
    }
}

impl Config {
    /// read the config from the environment, a `.env` file is loaded first
    pub fn from_env() -> Config {
        dotenv().ok();
        Config::from_lookup(|key| env::var(key).ok())
    }

    /// build the config from any key lookup, unset keys keep their default
    pub fn from_lookup<F>(lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let timeout_secs = parsed(&lookup, "MOTOGP_TIMEOUT_SECS").unwrap_or(DEFAULT_TIMEOUT_SECS);

        Config {
            base_url: lookup("MOTOGP_BASE_URL").unwrap_or(defaults.base_url),
            riders_api_url: lookup("MOTOGP_RIDERS_API_URL").unwrap_or(defaults.riders_api_url),
            results_host: lookup("MOTOGP_RESULTS_HOST").unwrap_or(defaults.results_host),
            request_timeout: Duration::from_secs(timeout_secs),
            season: parsed(&lookup, "MOTOGP_SEASON"),
            category: lookup("MOTOGP_CATEGORY").unwrap_or(defaults.category),
            event: lookup("MOTOGP_EVENT").map(|e| e.to_uppercase()),
            performance: parsed(&lookup, "MOTOGP_PERFORMANCE").unwrap_or(false),
            lap_validation: if parsed(&lookup, "MOTOGP_STRICT_LAPS").unwrap_or(false) {
                LapValidation::Strict
            } else {
                LapValidation::Positional
            },
        }
    }
}

fn parsed<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let value = lookup(key)?;
    match value.trim().parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(target: "config", "ignoring {}: can not parse '{}'", key, value);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        assert_eq!(config(&[]), Config::default());
        assert_eq!(Config::default().request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn values_are_read() {
        let config = config(&[
            ("MOTOGP_SEASON", "2022"),
            ("MOTOGP_EVENT", "qat"),
            ("MOTOGP_TIMEOUT_SECS", "5"),
            ("MOTOGP_PERFORMANCE", "true"),
            ("MOTOGP_STRICT_LAPS", "true"),
        ]);

        assert_eq!(config.season, Some(2022));
        assert_eq!(config.event.as_deref(), Some("QAT"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(config.performance);
        assert_eq!(config.lap_validation, LapValidation::Strict);
    }

    #[test]
    fn unparsable_values_fall_back() {
        let config = config(&[("MOTOGP_SEASON", "last"), ("MOTOGP_TIMEOUT_SECS", "soon")]);
        assert_eq!(config.season, None);
        assert_eq!(config.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}
