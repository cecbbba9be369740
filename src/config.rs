//! Configuration for the metrics codec and its CLI.
//!
//! Env (prefix ODR_METRICS_):
//! - ODR_METRICS_FILE        - путь к metrics-файлу (default DEFAULT_METRICS_FILE)
//! - ODR_METRICS_MAX_SIGNAL  - верхняя граница signal (default: SIGRTMAX среды исполнения)
//! - ODR_METRICS_ATOMIC_WRITE - "1|true|on|yes" => запись через tmp+rename (default false)
//!
//! Нераспознанные значения игнорируются с warn!, остаётся значение по умолчанию.

use log::warn;
use std::path::PathBuf;

use crate::consts::DEFAULT_METRICS_FILE;
use crate::props::{EnvProperties, PropertySource};
use crate::signal::ReadOptions;

pub const ENV_PREFIX: &str = "ODR_METRICS_";
pub const ENV_FILE: &str = "ODR_METRICS_FILE";
pub const ENV_MAX_SIGNAL: &str = "ODR_METRICS_MAX_SIGNAL";
pub const ENV_ATOMIC_WRITE: &str = "ODR_METRICS_ATOMIC_WRITE";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetricsConfig {
    /// Where the record lives.
    pub metrics_file: PathBuf,

    /// Explicit signal bound; None means the runtime SIGRTMAX.
    pub max_signal: Option<i32>,

    /// Replace the file via tmp+rename instead of truncating it in place.
    pub atomic_write: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            metrics_file: PathBuf::from(DEFAULT_METRICS_FILE),
            max_signal: None,
            atomic_write: false,
        }
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

impl MetricsConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_properties(&EnvProperties::new(ENV_PREFIX))
    }

    pub fn from_properties(src: &dyn PropertySource) -> Self {
        let mut cfg = Self::default();

        src.for_each(&mut |key, value| match key {
            ENV_FILE => {
                let s = value.trim();
                if s.is_empty() {
                    warn!("{} is empty, keeping {}", ENV_FILE, cfg.metrics_file.display());
                } else {
                    cfg.metrics_file = PathBuf::from(s);
                }
            }
            ENV_MAX_SIGNAL => match value.trim().parse::<i32>() {
                Ok(n) if n >= 0 => cfg.max_signal = Some(n),
                _ => warn!("ignoring {}={:?}: expected a non-negative integer", ENV_MAX_SIGNAL, value),
            },
            ENV_ATOMIC_WRITE => match parse_flag(value) {
                Some(on) => cfg.atomic_write = on,
                None => warn!("ignoring {}={:?}: expected a boolean flag", ENV_ATOMIC_WRITE, value),
            },
            _ => {}
        });

        cfg
    }

    pub fn with_metrics_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.metrics_file = path.into();
        self
    }

    pub fn with_max_signal(mut self, max_signal: Option<i32>) -> Self {
        self.max_signal = max_signal;
        self
    }

    pub fn with_atomic_write(mut self, on: bool) -> Self {
        self.atomic_write = on;
        self
    }

    /// Параметры валидации для чтения.
    pub fn read_options(&self) -> ReadOptions {
        let opts = ReadOptions::from_runtime();
        match self.max_signal {
            Some(n) => opts.with_max_signal(n),
            None => opts,
        }
    }
}
