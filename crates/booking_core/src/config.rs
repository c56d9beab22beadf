use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use shared::domain::SlotTime;
use thiserror::Error;

use crate::{
    calendar::DateLocale,
    lookup::DEFAULT_MIN_QUERY_LEN,
    slots::standard_grid,
    submission::{DEFAULT_SUCCESS_PROBABILITY, DEFAULT_TOKEN_PREFIX},
};

pub const DEFAULT_CONFIG_FILE: &str = "booking";
pub const ENV_PREFIX: &str = "APP";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BookingSettings {
    pub min_query_len: usize,
    pub success_probability: f64,
    pub token_prefix: String,
    pub locale: DateLocale,
    pub closed_slots: Vec<SlotTime>,
    pub rng_seed: Option<u64>,
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self {
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            success_probability: DEFAULT_SUCCESS_PROBABILITY,
            token_prefix: DEFAULT_TOKEN_PREFIX.to_string(),
            locale: DateLocale::default(),
            closed_slots: ["12:00", "12:30"]
                .into_iter()
                .filter_map(|raw| raw.parse().ok())
                .collect(),
            rng_seed: None,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("min_query_len must be at least 1")]
    MinQueryLen,
    #[error("success_probability must be within [0, 1], got {0}")]
    SuccessProbability(f64),
    #[error("token_prefix must be non-empty ASCII letters, got '{0}'")]
    TokenPrefix(String),
    #[error("closed slot {0} is not on the schedule grid")]
    ClosedSlotOffGrid(SlotTime),
}

impl BookingSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.min_query_len == 0 {
            return Err(SettingsError::MinQueryLen);
        }
        if !(0.0..=1.0).contains(&self.success_probability) {
            return Err(SettingsError::SuccessProbability(self.success_probability));
        }
        if self.token_prefix.is_empty()
            || !self.token_prefix.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(SettingsError::TokenPrefix(self.token_prefix.clone()));
        }
        let grid = standard_grid();
        if let Some(slot) = self.closed_slots.iter().find(|slot| !grid.contains(slot)) {
            return Err(SettingsError::ClosedSlotOffGrid(*slot));
        }
        Ok(())
    }
}

/// Layers defaults, an optional TOML file and `APP__*` environment variables.
///
/// With no explicit path, `booking.toml` in the working directory is used if
/// present. An explicit path must exist.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<BookingSettings> {
    load_settings_with_env(path, None)
}

/// `env` replaces the process environment when given; keys are variable names.
fn load_settings_with_env(
    path: Option<&Path>,
    env: Option<config::Map<String, String>>,
) -> anyhow::Result<BookingSettings> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let settings: BookingSettings = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("closed_slots")
                .source(env),
        )
        .build()
        .context("failed to read booking settings")?
        .try_deserialize()
        .context("failed to parse booking settings")?;

    settings
        .validate()
        .context("invalid booking settings")?;
    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
