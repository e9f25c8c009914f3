use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

use crate::config::ChaosSettings;

/// Process-wide chaos toggle with a fixed failure probability
#[derive(Debug)]
pub struct ChaosState {
    enabled: AtomicBool,
    failure_rate: f64,
}

impl ChaosState {
    pub fn new(enabled: bool, failure_rate: f64) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            failure_rate,
        }
    }

    pub fn from_settings(settings: &ChaosSettings) -> Self {
        Self::new(settings.enabled, settings.failure_rate)
    }

    pub fn set_enabled(&self, enabled: bool) -> bool {
        let previous = self.enabled.swap(enabled, Ordering::SeqCst);
        if previous != enabled {
            info!("Chaos mode {}", if enabled { "enabled" } else { "disabled" });
        }
        enabled
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }

    /// Draws whether the current request should fail
    pub fn should_fail(&self) -> bool {
        self.is_enabled() && self.fails_on(rand::thread_rng().gen::<f64>())
    }

    /// Decision for a uniform draw in `[0, 1)`
    fn fails_on(&self, roll: f64) -> bool {
        roll < self.failure_rate
    }
}
