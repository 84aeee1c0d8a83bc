//! Step counters and structured logging for the engine.

use crate::stats::GridStats;
use std::time::{Duration, Instant};

/// Ecology steps between summary log lines.
pub const SUMMARY_INTERVAL: u64 = 100;

/// Counters kept by the engine while it runs.
#[derive(Debug, Clone)]
pub struct Metrics {
    weather_steps: u64,
    ecology_steps: u64,
    storms: u64,
    remediations: u64,
    dropped_days: f64,
    dropped_weather_days: f64,
    ecology_time: Duration,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            weather_steps: 0,
            ecology_steps: 0,
            storms: 0,
            remediations: 0,
            dropped_days: 0.0,
            dropped_weather_days: 0.0,
            ecology_time: Duration::ZERO,
            start_time: Instant::now(),
        }
    }

    pub fn record_weather_step(&mut self, storm_onset: bool) {
        self.weather_steps += 1;
        if storm_onset {
            self.storms += 1;
        }
    }

    /// Records a completed ecology step and periodically logs a summary.
    pub fn record_ecology_step(
        &mut self,
        duration: Duration,
        elapsed_days: f64,
        stats: &GridStats,
    ) {
        self.ecology_steps += 1;
        self.ecology_time += duration;

        if self.ecology_steps % SUMMARY_INTERVAL == 0 {
            tracing::info!(
                step = self.ecology_steps,
                day = elapsed_days,
                avg_toxicity = stats.average_toxicity,
                fungal_cover = stats.total_fungal_cover,
                forest_cells = stats.forest_cells,
                mat_cells = stats.fungal_mat_cells,
                mean_step_us = self.mean_ecology_step().as_micros() as u64,
                "Ecology summary"
            );
        }
    }

    pub fn record_remediation(&mut self) {
        self.remediations += 1;
    }

    pub fn record_dropped_days(&mut self, days: f64) {
        self.dropped_days += days;
    }

    pub fn record_dropped_weather_days(&mut self, days: f64) {
        self.dropped_weather_days += days;
    }

    #[must_use]
    pub fn weather_steps(&self) -> u64 {
        self.weather_steps
    }

    #[must_use]
    pub fn ecology_steps(&self) -> u64 {
        self.ecology_steps
    }

    #[must_use]
    pub fn storms(&self) -> u64 {
        self.storms
    }

    #[must_use]
    pub fn remediations(&self) -> u64 {
        self.remediations
    }

    /// Simulated ecology days discarded by the catch-up clamp.
    #[must_use]
    pub fn dropped_days(&self) -> f64 {
        self.dropped_days
    }

    /// Simulated weather days discarded by the catch-up clamp.
    #[must_use]
    pub fn dropped_weather_days(&self) -> f64 {
        self.dropped_weather_days
    }

    #[must_use]
    pub fn mean_ecology_step(&self) -> Duration {
        if self.ecology_steps == 0 {
            Duration::ZERO
        } else {
            self.ecology_time / self.ecology_steps as u32
        }
    }

    /// Wall time since the engine was built.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Initialize tracing subscriber for logging.
pub fn init_logging() {
    init_logging_with_level(tracing::Level::INFO);
}

pub fn init_logging_with_level(level: tracing::Level) {
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(level)
            .finish(),
    )
    .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = Metrics::new();
        assert_eq!(metrics.ecology_steps(), 0);
        assert_eq!(metrics.mean_ecology_step(), Duration::ZERO);
    }

    #[test]
    fn test_record_steps() {
        let mut metrics = Metrics::new();
        metrics.record_weather_step(true);
        metrics.record_weather_step(false);
        metrics.record_ecology_step(Duration::from_millis(4), 1.0, &GridStats::default());
        metrics.record_ecology_step(Duration::from_millis(2), 2.0, &GridStats::default());
        metrics.record_remediation();
        assert_eq!(metrics.weather_steps(), 2);
        assert_eq!(metrics.storms(), 1);
        assert_eq!(metrics.ecology_steps(), 2);
        assert_eq!(metrics.remediations(), 1);
        assert_eq!(metrics.mean_ecology_step(), Duration::from_millis(3));
    }

    #[test]
    fn test_dropped_days_kept_per_cadence() {
        let mut metrics = Metrics::new();
        metrics.record_dropped_days(2.0);
        metrics.record_dropped_weather_days(1.5);
        metrics.record_dropped_weather_days(0.25);
        assert_eq!(metrics.dropped_days(), 2.0);
        assert_eq!(metrics.dropped_weather_days(), 1.75);
    }
}
