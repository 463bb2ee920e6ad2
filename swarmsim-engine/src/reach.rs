//! Goal-reach propagation
//!
//! Runs once at termination. Repeated passes mark every agent satisfying
//! the configured predicate until a pass produces no change, which computes
//! the transitive closure of the proximity graph (edges of length at most
//! the sensing radius) rooted at the directly-reaching agents.

use parking_lot::Mutex;

use swarmsim_core::{Params, Position, ReachPredicate, Statistics, World};

/// Mark all reached agents and finalize the reach ratio
pub fn propagate_reach(world: &World, params: &Params, stats: &Mutex<Statistics>) {
    let agent_count = world.agent_count();
    let mut stats = stats.lock();

    loop {
        let mut changed = false;

        for slot in &world.agents {
            let position = {
                let agent = slot.read();
                if agent.goal_reached {
                    continue;
                }
                agent.position
            };

            if reached(world, &position, params) {
                slot.write().goal_reached = true;
                stats.record_reached();
                changed = true;
            }
        }

        if !changed {
            break;
        }
    }

    stats.reach_ratio = stats.reached_goal as f64 / agent_count as f64;
}

fn reached(world: &World, position: &Position, params: &Params) -> bool {
    match params.goal_reach_predicate {
        ReachPredicate::Touch => world.goal.contains(position),
        ReachPredicate::Radius => reached_radius(world, position, params),
        ReachPredicate::Chain => {
            reached_radius(world, position, params) || reached_via_neighbour(world, position, params)
        }
    }
}

/// Within the sensing radius of the goal centre
fn reached_radius(world: &World, position: &Position, params: &Params) -> bool {
    (position - world.goal.position).norm() < params.sensing_radius()
}

/// Within the sensing radius of an agent already marked reached
fn reached_via_neighbour(world: &World, position: &Position, params: &Params) -> bool {
    world.agents.iter().any(|slot| {
        let other = slot.read();
        other.goal_reached && (position - other.position).norm() <= params.sensing_radius()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarmsim_core::{Agent, ForceConfig, Goal, World};

    fn line_world(spacing: f64, count: usize) -> World {
        let goal = Goal::new(0, 10.0, 15.0, Position::new(0.0, 0.0));
        let agents = (0..count)
            .map(|id| {
                Agent::new(
                    id,
                    1.0,
                    2.0,
                    Position::new(spacing * (id as f64 + 1.0), 0.0),
                    ForceConfig::default(),
                )
            })
            .collect();
        World::new(agents, vec![], goal)
    }

    #[test]
    fn test_chain_marks_whole_line() {
        // default sensing radius is 75; agents at 70, 140, 210, 280, 350
        let world = line_world(70.0, 5);
        let params = Params::default();
        let stats = Mutex::new(Statistics::default());

        propagate_reach(&world, &params, &stats);

        for slot in &world.agents {
            assert!(slot.read().goal_reached);
        }
        let stats = stats.lock();
        assert_eq!(stats.reached_goal, 5);
        assert_eq!(stats.reach_ratio, 1.0);
    }

    #[test]
    fn test_radius_marks_only_direct_reachers() {
        let world = line_world(70.0, 5);
        let mut params = Params::default();
        params.goal_reach_predicate = ReachPredicate::Radius;
        let stats = Mutex::new(Statistics::default());

        propagate_reach(&world, &params, &stats);

        let reached: Vec<bool> = world
            .agents
            .iter()
            .map(|slot| slot.read().goal_reached)
            .collect();
        assert_eq!(reached, vec![true, false, false, false, false]);
        assert_eq!(stats.lock().reach_ratio, 0.2);
    }

    #[test]
    fn test_chain_stops_at_a_gap() {
        // agents at 70 and 140 chain; 300 is out of every radius
        let goal = Goal::new(0, 10.0, 15.0, Position::new(0.0, 0.0));
        let positions = [70.0, 140.0, 300.0];
        let agents = positions
            .iter()
            .enumerate()
            .map(|(id, &x)| {
                Agent::new(id, 1.0, 2.0, Position::new(x, 0.0), ForceConfig::default())
            })
            .collect();
        let world = World::new(agents, vec![], goal);
        let params = Params::default();
        let stats = Mutex::new(Statistics::default());

        propagate_reach(&world, &params, &stats);

        let reached: Vec<bool> = world
            .agents
            .iter()
            .map(|slot| slot.read().goal_reached)
            .collect();
        assert_eq!(reached, vec![true, true, false]);
    }

    #[test]
    fn test_touch_requires_entering_the_square() {
        let goal = Goal::new(0, 10.0, 15.0, Position::new(0.0, 0.0));
        let inside = Agent::new(0, 1.0, 2.0, Position::new(5.0, 5.0), ForceConfig::default());
        let outside = Agent::new(1, 1.0, 2.0, Position::new(20.0, 0.0), ForceConfig::default());
        let world = World::new(vec![inside, outside], vec![], goal);
        let mut params = Params::default();
        params.goal_reach_predicate = ReachPredicate::Touch;
        let stats = Mutex::new(Statistics::default());

        propagate_reach(&world, &params, &stats);

        assert!(world.agents[0].read().goal_reached);
        assert!(!world.agents[1].read().goal_reached);
    }

    #[test]
    fn test_propagation_is_idempotent() {
        let world = line_world(70.0, 4);
        let params = Params::default();
        let stats = Mutex::new(Statistics::default());

        propagate_reach(&world, &params, &stats);
        let first = stats.lock().clone();
        propagate_reach(&world, &params, &stats);
        let second = stats.lock().clone();

        assert_eq!(first.reached_goal, second.reached_goal);
        assert_eq!(first.reach_ratio, second.reach_ratio);
    }
}
