//! Step-timing monitor

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;

/// Rolling window of step-time samples
const WINDOW: usize = 1000;

/// Engine timing metrics derived from the rolling window
#[derive(Debug, Clone, Default, Serialize)]
pub struct EngineMetrics {
    pub total_steps: u64,
    pub avg_step_time_ms: f64,
    pub min_step_time_ms: f64,
    pub max_step_time_ms: f64,
    pub steps_per_second: f64,
}

/// Records the duration of each completed step
pub struct StepMonitor {
    inner: Mutex<MonitorInner>,
}

struct MonitorInner {
    step_times: Vec<Duration>,
    started: Instant,
    last_step: Option<Instant>,
    total_steps: u64,
}

impl StepMonitor {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MonitorInner {
                step_times: Vec::new(),
                started: Instant::now(),
                last_step: None,
                total_steps: 0,
            }),
        }
    }

    /// Called by the epoch closer once per completed step
    pub fn tick(&self) {
        let now = Instant::now();
        let mut inner = self.inner.lock();

        if let Some(last) = inner.last_step.replace(now) {
            inner.step_times.push(now - last);
            if inner.step_times.len() > WINDOW {
                inner.step_times.drain(0..WINDOW / 10);
            }
        }
        inner.total_steps += 1;
    }

    /// Forget the reference point, e.g. across an idle pause
    pub fn pause(&self) {
        self.inner.lock().last_step = None;
    }

    pub fn metrics(&self) -> EngineMetrics {
        let inner = self.inner.lock();
        let mut metrics = EngineMetrics {
            total_steps: inner.total_steps,
            ..Default::default()
        };

        if !inner.step_times.is_empty() {
            let times_ms: Vec<f64> = inner
                .step_times
                .iter()
                .map(|d| d.as_secs_f64() * 1000.0)
                .collect();
            metrics.avg_step_time_ms = times_ms.iter().sum::<f64>() / times_ms.len() as f64;
            metrics.min_step_time_ms = times_ms.iter().copied().fold(f64::INFINITY, f64::min);
            metrics.max_step_time_ms = times_ms.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        }

        let elapsed = inner.started.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            metrics.steps_per_second = inner.total_steps as f64 / elapsed;
        }

        metrics
    }
}

impl Default for StepMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_accumulates_steps() {
        let monitor = StepMonitor::new();
        for _ in 0..5 {
            monitor.tick();
        }
        let metrics = monitor.metrics();
        assert_eq!(metrics.total_steps, 5);
        assert!(metrics.avg_step_time_ms >= 0.0);
    }

    #[test]
    fn test_pause_drops_reference_point() {
        let monitor = StepMonitor::new();
        monitor.tick();
        monitor.pause();
        monitor.tick();
        // only consecutive ticks produce samples
        assert_eq!(monitor.metrics().total_steps, 2);
    }
}
