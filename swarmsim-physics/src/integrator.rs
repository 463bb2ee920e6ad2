//! Per-agent time integration
//!
//! One call advances one agent by one step: friction, force accumulation
//! over the enabled interaction kinds, velocity saturation, staged
//! next-state, and the obstacle collision scan. The committed state of every
//! agent is only read here; the staged state of the one agent being advanced
//! is the only thing written (plus the collision counter, under its mutex).

use parking_lot::Mutex;

use swarmsim_core::{Params, Position, Statistics, World};

use crate::force::{pairwise_force, Target};

/// Advance agent `agent_id` of `world` by one step, staging its next-state.
///
/// Returns true when this call latched the agent's collided flag.
pub fn step_agent(
    world: &World,
    agent_id: usize,
    params: &Params,
    stats: &Mutex<Statistics>,
) -> bool {
    let this = world.agents[agent_id].read().clone();

    let mut force_x = 0.0;
    let mut force_y = 0.0;
    let mut accumulate = |magnitude: f64, target: &Position| {
        let angle = (target.y - this.position.y).atan2(target.x - this.position.x);
        force_x += magnitude * angle.cos();
        force_y += magnitude * angle.sin();
    };

    if params.enable_agent_obstacle {
        for obstacle in &world.obstacles {
            let f = pairwise_force(&this, Target::Obstacle(obstacle), &world.obstacles);
            accumulate(f, &obstacle.position);
        }
    }

    if params.enable_agent_agent {
        for (other_id, slot) in world.agents.iter().enumerate() {
            if other_id == agent_id {
                continue;
            }
            let other = slot.read().clone();
            let f = pairwise_force(&this, Target::Agent(&other), &world.obstacles);
            accumulate(f, &other.position);
        }
    }

    if params.enable_agent_goal {
        let f = pairwise_force(&this, Target::Goal(&world.goal), &world.obstacles);
        accumulate(f, &world.goal.position);
    }

    let mut next_velocity = this.velocity * params.friction_coefficient;
    next_velocity.x += force_x / this.mass;
    next_velocity.y += force_y / this.mass;

    let speed = next_velocity.norm();
    if speed > params.max_velocity {
        next_velocity *= params.max_velocity / speed;
    }

    let next_position = this.position + next_velocity;

    // collision scan against the pre-step position
    let mut collided_now = false;
    if !this.collided {
        for obstacle in &world.obstacles {
            let delta = this.position - obstacle.position;
            let surface = delta.norm() - obstacle.radius;
            if surface <= obstacle.radius
                && delta.x.abs() <= obstacle.radius
                && delta.y.abs() <= obstacle.radius
            {
                collided_now = true;
                break;
            }
        }
    }

    {
        let mut agent = world.agents[agent_id].write();
        agent.next_velocity = next_velocity;
        agent.next_position = next_position;
        if collided_now {
            agent.mark_collided();
        }
    }

    if collided_now {
        stats.lock().record_collision(world.agent_count());
    }

    collided_now
}
