//! Configuration module - environment variable parsing

use std::env;
use std::str::FromStr;

use crate::sim::SignalTiming;
use crate::util::time::DEFAULT_TICK_MS;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Milliseconds per simulation tick; also the signal counter increment
    pub tick_interval_ms: u32,

    /// Approach green duration
    pub signal_green_ms: u32,
    /// Approach yellow duration
    pub signal_yellow_ms: u32,
    /// Validated timing built from the two durations above
    signal_timing: SignalTiming,

    /// Ticks between HUD log lines
    pub hud_interval_ticks: u32,
    /// Seed for tree placement
    pub scenery_seed: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let tick_interval_ms = parse_or(&lookup, "TICK_INTERVAL_MS", DEFAULT_TICK_MS)?;
        let defaults = SignalTiming::default();
        let signal_green_ms = parse_or(&lookup, "SIGNAL_GREEN_MS", defaults.green_ms())?;
        let signal_yellow_ms = parse_or(&lookup, "SIGNAL_YELLOW_MS", defaults.yellow_ms())?;
        let signal_timing = SignalTiming::new(signal_green_ms, signal_yellow_ms).ok_or(
            ConfigError::SignalTimingOverflow {
                green: signal_green_ms,
                yellow: signal_yellow_ms,
            },
        )?;
        let signal_red_ms = parse_or(&lookup, "SIGNAL_RED_MS", signal_timing.red_ms())?;

        for (key, value) in [
            ("TICK_INTERVAL_MS", tick_interval_ms),
            ("SIGNAL_GREEN_MS", signal_green_ms),
            ("SIGNAL_YELLOW_MS", signal_yellow_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroInterval(key));
            }
        }

        if signal_red_ms != signal_timing.red_ms() {
            return Err(ConfigError::UnbalancedSignalTiming {
                green: signal_green_ms,
                yellow: signal_yellow_ms,
                red: signal_red_ms,
            });
        }

        Ok(Self {
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            tick_interval_ms,
            signal_green_ms,
            signal_yellow_ms,
            signal_timing,
            hud_interval_ticks: parse_or(&lookup, "HUD_INTERVAL_TICKS", 25)?,
            scenery_seed: parse_or(&lookup, "SCENERY_SEED", 0)?,
        })
    }

    pub fn signal_timing(&self) -> SignalTiming {
        self.signal_timing
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),

    #[error("Red ({red} ms) must equal green ({green} ms) + yellow ({yellow} ms)")]
    UnbalancedSignalTiming { green: u32, yellow: u32, red: u32 },

    #[error("Signal cycle overflows u32 ms (green {green} ms, yellow {yellow} ms)")]
    SignalTimingOverflow { green: u32, yellow: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&'static str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<&'static str, String> =
            pairs.iter().map(|(k, v)| (*k, v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_reference_timing() {
        let config = load(&[]).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.tick_interval_ms, 20);
        assert_eq!(config.signal_timing(), SignalTiming::default());
        assert_eq!(config.hud_interval_ticks, 25);
        assert_eq!(config.scenery_seed, 0);
    }

    #[test]
    fn overrides_are_applied() {
        let config = load(&[
            ("TICK_INTERVAL_MS", "10"),
            ("SIGNAL_GREEN_MS", "4000"),
            ("SIGNAL_YELLOW_MS", "500"),
            ("LOG_LEVEL", "debug"),
        ])
        .unwrap();
        assert_eq!(config.tick_interval_ms, 10);
        assert_eq!(config.signal_timing().red_ms(), 4500);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn red_must_balance_green_and_yellow() {
        assert!(load(&[("SIGNAL_RED_MS", "6000")]).is_ok());
        assert!(matches!(
            load(&[("SIGNAL_RED_MS", "7000")]),
            Err(ConfigError::UnbalancedSignalTiming { red: 7000, .. })
        ));
    }

    #[test]
    fn rejects_zero_and_garbage() {
        assert!(matches!(
            load(&[("TICK_INTERVAL_MS", "0")]),
            Err(ConfigError::ZeroInterval("TICK_INTERVAL_MS"))
        ));
        assert!(matches!(
            load(&[("SIGNAL_GREEN_MS", "soon")]),
            Err(ConfigError::Invalid { key: "SIGNAL_GREEN_MS", .. })
        ));
    }

    #[test]
    fn rejects_timing_whose_cycle_overflows() {
        assert!(matches!(
            load(&[("SIGNAL_GREEN_MS", "4294967000")]),
            Err(ConfigError::SignalTimingOverflow { green: 4_294_967_000, yellow: 1000 })
        ));
        assert!(matches!(
            load(&[("SIGNAL_GREEN_MS", "2147483648"), ("SIGNAL_YELLOW_MS", "1000")]),
            Err(ConfigError::SignalTimingOverflow { .. })
        ));

        let config = load(&[("SIGNAL_GREEN_MS", "2147482647")]).unwrap();
        let timing = config.signal_timing();
        assert!(timing.cycle_ms() > timing.green_ms());
    }
}
