use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::ScheduleError;
use crate::model::*;

pub const DEFAULT_MIN_NIGHTS: usize = 2;
pub const DEFAULT_MAX_NIGHTS: usize = 5;
pub const DEFAULT_DEBOUNCE_MS: u64 = 3000;

/// Controller configuration. Every field has a default, so `{}` deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScheduleConfig {
    pub min_nights: usize,
    pub max_nights: usize,
    pub require_contiguous: bool,
    pub initial_selection: Vec<Day>,
    /// Delay before a click toggle is fully validated.
    pub debounce_ms: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            min_nights: DEFAULT_MIN_NIGHTS,
            max_nights: DEFAULT_MAX_NIGHTS,
            require_contiguous: true,
            initial_selection: Vec::new(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl ScheduleConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.min_nights > self.max_nights {
            return Err(ScheduleError::InvalidConfig(format!(
                "min_nights ({}) exceeds max_nights ({})",
                self.min_nights, self.max_nights
            )));
        }
        Ok(())
    }

    /// Read overrides from `WEEKSTAY_*` environment variables.
    pub fn from_env() -> Result<Self, ScheduleError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, with a pluggable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ScheduleError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = parse_var(&lookup, "WEEKSTAY_MIN_NIGHTS")? {
            config.min_nights = v;
        }
        if let Some(v) = parse_var(&lookup, "WEEKSTAY_MAX_NIGHTS")? {
            config.max_nights = v;
        }
        if let Some(v) = parse_var(&lookup, "WEEKSTAY_REQUIRE_CONTIGUOUS")? {
            config.require_contiguous = v;
        }
        if let Some(v) = parse_var(&lookup, "WEEKSTAY_DEBOUNCE_MS")? {
            config.debounce_ms = v;
        }
        if let Some(raw) = lookup("WEEKSTAY_INITIAL_DAYS") {
            config.initial_selection = parse_day_list(&raw)?;
        }
        config.validate()?;
        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ScheduleError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|_| ScheduleError::InvalidConfig(format!("{key}: cannot parse {raw:?}")))
}

/// Parse a comma-separated day-index list such as `"5,6,0"`. Blank input is empty.
pub fn parse_day_list(raw: &str) -> Result<Vec<Day>, ScheduleError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let index: u8 = s
                .parse()
                .map_err(|_| ScheduleError::InvalidConfig(format!("bad day index {s:?}")))?;
            Day::new(index)
        })
        .collect()
}
