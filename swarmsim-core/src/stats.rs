//! Per-run statistics

use serde::{Deserialize, Serialize};

/// Monotonic per-run counters and their derived ratios
///
/// `collisions` is updated by workers during the collision scan, `time_step`
/// by the epoch closer, and `reached_goal` / `reach_ratio` by the reach
/// propagator at termination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub time_step: u64,
    pub reached_goal: usize,
    pub reach_ratio: f64,
    pub collisions: usize,
    pub collision_ratio: f64,
}

impl Statistics {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Count one agent's first collision
    pub fn record_collision(&mut self, agent_count: usize) {
        self.collisions += 1;
        self.collision_ratio = self.collisions as f64 / agent_count as f64;
    }

    /// Count one agent's transition to goal-reached
    pub fn record_reached(&mut self) {
        self.reached_goal += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_collision_updates_ratio() {
        let mut stats = Statistics::default();
        stats.record_collision(10);
        stats.record_collision(10);
        assert_eq!(stats.collisions, 2);
        assert_eq!(stats.collision_ratio, 0.2);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut stats = Statistics {
            time_step: 42,
            reached_goal: 3,
            reach_ratio: 0.3,
            collisions: 5,
            collision_ratio: 0.5,
        };
        stats.reset();
        assert_eq!(stats, Statistics::default());
    }
}
