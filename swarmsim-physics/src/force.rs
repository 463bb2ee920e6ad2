//! Pairwise force kernel
//!
//! Computes the signed scalar magnitude of the force a source agent feels
//! from one target: positive pulls the agent toward the target, negative
//! pushes it away. Direction is supplied by the integrator, which resolves
//! the magnitude along the line between the two objects.

use swarmsim_core::{Agent, ForceLaw, Goal, Obstacle};

use crate::perception::is_occluded;

/// Floor on the pairwise distance, preventing force singularities.
/// Applied to the absolute value: for an agent inside an obstacle the
/// surface distance goes negative and its magnitude is used, direction
/// still coming from the angle between centres.
const MIN_DISTANCE: f64 = 0.1;

/// Target object of a pairwise interaction
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Agent(&'a Agent),
    Obstacle(&'a Obstacle),
    Goal(&'a Goal),
}

/// Scalar pairwise force magnitude between `agent` and `target`.
///
/// Uses the agent's own force-law parameter block; the obstacle course is
/// needed for the Lennard-Jones line-of-sight check.
pub fn pairwise_force(agent: &Agent, target: Target<'_>, obstacles: &[Obstacle]) -> f64 {
    let surface = match target {
        Target::Agent(other) => (agent.position - other.position).norm(),
        Target::Obstacle(obstacle) => {
            (agent.position - obstacle.position).norm() - obstacle.radius
        }
        Target::Goal(goal) => (agent.position - goal.position).norm(),
    };
    let distance = surface.abs().max(MIN_DISTANCE);

    match agent.force.law {
        ForceLaw::Newtonian => newtonian(agent, target, distance),
        ForceLaw::LennardJones => lennard_jones(agent, target, distance, obstacles),
    }
}

fn newtonian(agent: &Agent, target: Target<'_>, distance: f64) -> f64 {
    let cfg = &agent.force;

    match target {
        Target::Agent(other) => {
            if distance > cfg.sensing_radius() {
                return 0.0;
            }
            let law = &cfg.newtonian_agent_agent;
            let mut f = law.g * agent.mass * other.mass / distance.powf(law.exponent);
            // short-range repulsion, long-range attraction around R
            if distance < cfg.desired_distance {
                f = -f;
            }
            f.clamp(-law.max_force, law.max_force)
        }
        Target::Obstacle(obstacle) => {
            if distance > cfg.sensing_radius() {
                return 0.0;
            }
            let law = &cfg.newtonian_agent_obstacle;
            let f = -(law.g * agent.mass * obstacle.mass / distance.powf(law.exponent));
            f.max(-law.max_force)
        }
        Target::Goal(goal) => {
            let law = &cfg.newtonian_agent_goal;
            let f = law.g * agent.mass * goal.mass / distance.powf(law.exponent);
            f.min(law.max_force)
        }
    }
}

fn lennard_jones(agent: &Agent, target: Target<'_>, distance: f64, obstacles: &[Obstacle]) -> f64 {
    let cfg = &agent.force;

    match target {
        Target::Agent(other) => {
            if distance > cfg.sensing_radius()
                || is_occluded(
                    &agent.position,
                    &other.position,
                    obstacles,
                    cfg.sensing_radius(),
                )
            {
                return 0.0;
            }
            let law = &cfg.lj_agent_agent;
            let sigma = cfg.desired_distance;
            let attractive = law.attractive * sigma.powi(6) / distance.powi(7);
            let repulsive = 2.0 * law.repulsive * sigma.powi(12) / distance.powi(13);
            let f = finite(24.0 * law.epsilon * (attractive - repulsive));
            f.clamp(-law.max_force, law.max_force)
        }
        Target::Obstacle(obstacle) => {
            if distance > cfg.lj_obstacle_range {
                return 0.0;
            }
            let law = &cfg.lj_agent_obstacle;
            let sigma = obstacle.radius + 1.0;
            let repulsive = 2.0 * law.repulsive * sigma.powi(12) / distance.powi(13);
            let f = finite(-24.0 * law.epsilon * repulsive);
            f.clamp(-law.max_force, law.max_force)
        }
        Target::Goal(_) => {
            let law = &cfg.lj_agent_goal;
            let sigma = 5.0 * cfg.desired_distance.powi(2);
            let attractive = law.attractive * sigma.powi(6) / distance.powi(7);
            let f = finite(24.0 * law.epsilon * attractive);
            f.min(law.max_force)
        }
    }
}

/// Map an overflowed result onto the representable extremes
fn finite(f: f64) -> f64 {
    if f == f64::INFINITY {
        f64::MAX
    } else if f == f64::NEG_INFINITY {
        f64::MIN
    } else {
        f
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use swarmsim_core::{ForceConfig, Position};

    fn agent_at(x: f64, y: f64) -> Agent {
        Agent::new(0, 1.0, 2.0, Position::new(x, y), ForceConfig::default())
    }

    fn agent_with(x: f64, y: f64, force: ForceConfig) -> Agent {
        Agent::new(0, 1.0, 2.0, Position::new(x, y), force)
    }

    #[test]
    fn test_newtonian_agent_attracts_beyond_r() {
        let a = agent_at(0.0, 0.0);
        // distance 60 is past R = 50 but inside sensing 75
        let b = agent_at(60.0, 0.0);
        let f = pairwise_force(&a, Target::Agent(&b), &[]);
        assert!(f > 0.0);
        assert_relative_eq!(f, 1000.0 / 3600.0, max_relative = 1e-12);
    }

    #[test]
    fn test_newtonian_agent_repels_within_r() {
        let a = agent_at(0.0, 0.0);
        let b = agent_at(40.0, 0.0);
        let f = pairwise_force(&a, Target::Agent(&b), &[]);
        assert!(f < 0.0);
    }

    #[test]
    fn test_newtonian_agent_out_of_range_is_zero() {
        let a = agent_at(0.0, 0.0);
        let b = agent_at(76.0, 0.0);
        assert_eq!(pairwise_force(&a, Target::Agent(&b), &[]), 0.0);
    }

    #[test]
    fn test_newtonian_agent_saturates() {
        let a = agent_at(0.0, 0.0);
        let b = agent_at(1.0, 0.0);
        // 1000 / 1 would be 1000; repulsive cap is 4
        let f = pairwise_force(&a, Target::Agent(&b), &[]);
        assert_eq!(f, -4.0);
    }

    #[test]
    fn test_newtonian_goal_is_unconditional_and_capped() {
        let a = agent_at(0.0, 0.0);
        let near = Goal::new(0, 10.0, 15.0, Position::new(5.0, 0.0));
        let far = Goal::new(0, 10.0, 15.0, Position::new(5000.0, 0.0));

        assert_eq!(pairwise_force(&a, Target::Goal(&near), &[]), 4.0);
        let f_far = pairwise_force(&a, Target::Goal(&far), &[]);
        assert!(f_far > 0.0 && f_far < 4.0);
    }

    #[test]
    fn test_newtonian_obstacle_is_repulsive_and_capped() {
        let a = agent_at(0.0, 0.0);
        let obstacle = Obstacle::new(0, 1.0, 3.0, Position::new(4.0, 0.0));
        let f = pairwise_force(&a, Target::Obstacle(&obstacle), &[]);
        assert_eq!(f, -14.0);

        let distant = Obstacle::new(0, 1.0, 3.0, Position::new(200.0, 0.0));
        assert_eq!(pairwise_force(&a, Target::Obstacle(&distant), &[]), 0.0);
    }

    #[test]
    fn test_distance_clamp_prevents_singularity() {
        let a = agent_at(0.0, 0.0);
        let b = agent_at(0.0, 0.0);
        let f = pairwise_force(&a, Target::Agent(&b), &[]);
        assert!(f.is_finite());
        assert_eq!(f, -4.0); // capped repulsion at the clamped distance
    }

    #[test]
    fn test_clamp_applies_to_negative_surface_distance() {
        // agent inside the obstacle: surface distance is negative, its
        // magnitude is used
        let a = agent_at(0.0, 0.0);
        let obstacle = Obstacle::new(0, 1.0, 10.0, Position::new(2.0, 0.0));
        let f = pairwise_force(&a, Target::Obstacle(&obstacle), &[]);
        assert!(f < 0.0);
        assert!(f.is_finite());
    }

    #[test]
    fn test_lj_agent_agent_repels_close_attracts_far() {
        let mut force = ForceConfig::default();
        force.law = ForceLaw::LennardJones;
        force.lj_agent_agent.max_force = 1e6;

        let a = agent_with(0.0, 0.0, force.clone());
        let close = agent_with(10.0, 0.0, force.clone());
        let far = agent_with(70.0, 0.0, force.clone());

        assert!(pairwise_force(&a, Target::Agent(&close), &[]) < 0.0);
        assert!(pairwise_force(&a, Target::Agent(&far), &[]) > 0.0);
    }

    #[test]
    fn test_lj_agent_agent_occluded_is_zero() {
        let mut force = ForceConfig::default();
        force.law = ForceLaw::LennardJones;

        let a = agent_with(0.0, 0.0, force.clone());
        let b = agent_with(60.0, 0.0, force);
        let wall = vec![Obstacle::new(0, 1.0, 5.0, Position::new(30.0, 0.0))];

        assert_ne!(pairwise_force(&a, Target::Agent(&b), &[]), 0.0);
        assert_eq!(pairwise_force(&a, Target::Agent(&b), &wall), 0.0);
    }

    #[test]
    fn test_lj_obstacle_gate_and_sign() {
        let mut force = ForceConfig::default();
        force.law = ForceLaw::LennardJones;
        let a = agent_with(0.0, 0.0, force);

        let near = Obstacle::new(0, 1.0, 3.0, Position::new(8.0, 0.0));
        let outside_gate = Obstacle::new(0, 1.0, 3.0, Position::new(20.0, 0.0));

        assert!(pairwise_force(&a, Target::Obstacle(&near), &[]) < 0.0);
        assert_eq!(pairwise_force(&a, Target::Obstacle(&outside_gate), &[]), 0.0);
    }

    #[test]
    fn test_lj_goal_attracts_and_caps() {
        let mut force = ForceConfig::default();
        force.law = ForceLaw::LennardJones;
        let a = agent_with(0.0, 0.0, force);
        let goal = Goal::new(0, 10.0, 15.0, Position::new(100.0, 0.0));

        let f = pairwise_force(&a, Target::Goal(&goal), &[]);
        assert!(f > 0.0);
        assert!(f <= a.force.lj_agent_goal.max_force);
    }

    #[test]
    fn test_lj_overflow_clamps_to_finite() {
        let mut force = ForceConfig::default();
        force.law = ForceLaw::LennardJones;
        // sigma = 5 R^2 overflows sigma^6 for astronomically large R
        force.desired_distance = 1e60;
        let a = agent_with(0.0, 0.0, force);
        let goal = Goal::new(0, 10.0, 15.0, Position::new(1.0, 0.0));

        let f = pairwise_force(&a, Target::Goal(&goal), &[]);
        assert!(f.is_finite());
        assert_eq!(f, a.force.lj_agent_goal.max_force);
    }
}
