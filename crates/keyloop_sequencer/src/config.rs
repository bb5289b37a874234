// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback configuration.
//!
//! The host loop owns a [`PlaybackConfig`] and passes it where needed; the
//! engine itself reads no global state. Settings persist as RON.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default delay between steps in milliseconds
pub const DEFAULT_DELAY_MS: u32 = 160;

/// Default lower delay bound in milliseconds
pub const DEFAULT_MIN_DELAY_MS: u32 = 1;

/// Default upper delay bound in milliseconds
pub const DEFAULT_MAX_DELAY_MS: u32 = 10_000;

/// Default number of discrete steps per second
pub const DEFAULT_TICK_RATE_HZ: u32 = 30;

/// Playback timing settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Delay between steps in milliseconds
    pub delay_ms: u32,
    /// Smallest allowed delay
    pub min_delay_ms: u32,
    /// Largest allowed delay
    pub max_delay_ms: u32,
    /// Discrete steps per second, for converting milliseconds to keys
    pub tick_rate_hz: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            min_delay_ms: DEFAULT_MIN_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
        }
    }
}

impl PlaybackConfig {
    /// Load settings from a RON file
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: PlaybackConfig = ron::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;

        if config.min_delay_ms == 0 || config.min_delay_ms > config.max_delay_ms {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "Invalid delay bounds {}..={} ms",
                    config.min_delay_ms, config.max_delay_ms
                ),
            ));
        }
        if config.tick_rate_hz == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "Tick rate must be positive",
            ));
        }

        config.set_delay_ms(config.delay_ms);
        tracing::info!(path = %path.display(), delay_ms = config.delay_ms, "Loaded playback config");
        Ok(config)
    }

    /// Save settings to a RON file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);

        let content = ron::ser::to_string_pretty(self, config).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;

        std::fs::write(path, content)
    }

    /// Delay between steps
    pub fn delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.delay_ms))
    }

    /// Set the delay, clamped to the configured bounds
    pub fn set_delay_ms(&mut self, delay_ms: u32) {
        self.delay_ms = delay_ms.clamp(self.min_delay_ms, self.max_delay_ms.max(self.min_delay_ms));
    }

    /// Change the delay by `delta` milliseconds, clamped to the bounds
    pub fn adjust_delay(&mut self, delta: i64) {
        let target = (i64::from(self.delay_ms) + delta).clamp(0, i64::from(u32::MAX));
        self.set_delay_ms(u32::try_from(target).unwrap_or(u32::MAX));
    }

    /// Slow playback down by one millisecond per step
    pub fn slower(&mut self) {
        self.adjust_delay(1);
    }

    /// Speed playback up by one millisecond per step
    pub fn faster(&mut self) {
        self.adjust_delay(-1);
    }

    /// Convert milliseconds to discrete steps (rounded to nearest)
    pub fn ms_to_steps(&self, ms: u32) -> u32 {
        let rate = u64::from(self.tick_rate_hz.max(1));
        let steps = (u64::from(ms) * rate + 500) / 1000;
        u32::try_from(steps).unwrap_or(u32::MAX)
    }

    /// Convert discrete steps to milliseconds (rounded to nearest)
    pub fn steps_to_ms(&self, steps: u32) -> u32 {
        let rate = u64::from(self.tick_rate_hz.max(1));
        let ms = (u64::from(steps) * 1000 + rate / 2) / rate;
        u32::try_from(ms).unwrap_or(u32::MAX)
    }
}
