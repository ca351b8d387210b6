//! Simulated microphone level with loud-noise alerts.
//!
//! The level random-walks while the mic is on. Readings above the alert
//! threshold are counted and reported to the backend as sensor events.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::api::{SensorEvent, SerenoClient};
use crate::config::MicConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MicReading {
    pub level: f64,
    pub alert: bool,
}

pub struct MicSimulator {
    config: MicConfig,
    enabled: bool,
    level: f64,
    alerts: u32,
}

impl MicSimulator {
    pub fn new(config: MicConfig) -> Self {
        let level = config.initial_level.clamp(0.0, 100.0);
        Self {
            config,
            enabled: false,
            level,
            alerts: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flip the mic switch. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        info!("Mic simulation {}", if self.enabled { "on" } else { "off" });
        self.enabled
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    /// Level as shown on the meter.
    pub fn level_percent(&self) -> u8 {
        self.level.round() as u8
    }

    pub fn alerts(&self) -> u32 {
        self.alerts
    }

    /// Advance one step. Returns `None` while the mic is off.
    pub fn tick<R: Rng>(&mut self, rng: &mut R) -> Option<MicReading> {
        if !self.enabled {
            return None;
        }

        let step = self.config.max_step.abs();
        let delta = if step > 0.0 { rng.gen_range(-step..step) } else { 0.0 };
        self.level = (self.level + delta).clamp(0.0, 100.0);

        let alert = self.level > self.config.alert_threshold;
        if alert {
            self.alerts += 1;
        }

        Some(MicReading {
            level: self.level,
            alert,
        })
    }

    /// Drive the simulation every `tick_ms`, posting alerts to `/events`.
    /// Stops after `ticks` steps, or runs forever when `ticks` is `None`.
    pub async fn run(&mut self, client: &SerenoClient, device_id: Option<String>, ticks: Option<u64>) {
        let mut rng = StdRng::from_entropy();
        let mut interval = tokio::time::interval(Duration::from_millis(self.config.tick_ms.max(1)));
        let mut elapsed = 0u64;

        loop {
            if ticks.is_some_and(|limit| elapsed >= limit) {
                break;
            }
            interval.tick().await;
            elapsed += 1;

            let Some(reading) = self.tick(&mut rng) else {
                continue;
            };
            debug!("Mic level {}%", self.level_percent());

            if reading.alert {
                info!("Loud environment: {}% (alert #{})", self.level_percent(), self.alerts);
                let event = SensorEvent::now(&self.config.event_type, Some(reading.level), device_id.clone());
                let client = client.clone();
                tokio::spawn(async move {
                    if let Err(e) = client.log_event(&event).await {
                        debug!("Sensor event not delivered: {e}");
                    }
                });
            }
        }
    }
}
