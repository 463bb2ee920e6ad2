//! Scenario persistence for deterministic replay
//!
//! A scenario file is whitespace-separated: one statistics line, one goal
//! line, then one line per agent and one per obstacle. Agent and obstacle
//! counts come from the parameter set. Floats are written in shortest
//! round-trip form, so save followed by load reproduces every field exactly.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::str::{FromStr, SplitWhitespace};

use crate::error::{SimError, SimResult};
use crate::params::Params;
use crate::stats::Statistics;
use crate::world::{Agent, Goal, Obstacle, Position, Velocity, World};

/// A loaded scenario: full world state plus the statistics it was saved with
pub struct ScenarioData {
    pub stats: Statistics,
    pub world: World,
}

/// Write the world and statistics to a scenario file
pub fn save_scenario(world: &World, stats: &Statistics, path: &Path) -> SimResult<()> {
    fs::write(path, render_scenario(world, stats))?;
    Ok(())
}

/// Render the scenario text
pub fn render_scenario(world: &World, stats: &Statistics) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} {} {} {} {}",
        stats.time_step, stats.reached_goal, stats.reach_ratio, stats.collisions,
        stats.collision_ratio
    );

    let goal = &world.goal;
    let _ = writeln!(
        out,
        "{} {} {} {} {}",
        goal.id, goal.mass, goal.width, goal.position.x, goal.position.y
    );

    for agent in world.agent_copies() {
        let _ = writeln!(
            out,
            "{} {} {} {} {} {} {} {} {} {}",
            agent.id,
            agent.mass,
            agent.radius,
            agent.goal_reached as u8,
            agent.initial_position.x,
            agent.initial_position.y,
            agent.position.x,
            agent.position.y,
            agent.velocity.x,
            agent.velocity.y
        );
    }

    for obstacle in &world.obstacles {
        let _ = writeln!(
            out,
            "{} {} {} {} {}",
            obstacle.id, obstacle.mass, obstacle.radius, obstacle.position.x, obstacle.position.y
        );
    }

    out
}

/// Read a scenario file; agent and obstacle counts come from `params`
pub fn load_scenario(path: &Path, params: &Params) -> SimResult<ScenarioData> {
    let text = fs::read_to_string(path)
        .map_err(|e| SimError::Scenario(format!("failed to open {}: {e}", path.display())))?;
    parse_scenario(&text, params)
}

/// Parse scenario text
pub fn parse_scenario(text: &str, params: &Params) -> SimResult<ScenarioData> {
    let mut tokens = Tokens::new(text);

    let stats = Statistics {
        time_step: tokens.next("time_step")?,
        reached_goal: tokens.next("reached_goal")?,
        reach_ratio: tokens.next("reach_ratio")?,
        collisions: tokens.next("collisions")?,
        collision_ratio: tokens.next("collision_ratio")?,
    };

    let goal = Goal::new(
        tokens.next("goal id")?,
        tokens.next("goal mass")?,
        tokens.next("goal width")?,
        Position::new(tokens.next("goal x")?, tokens.next("goal y")?),
    );

    let mut agents = Vec::with_capacity(params.agent_number);
    for _ in 0..params.agent_number {
        let id = tokens.next("agent id")?;
        let mass = tokens.next("agent mass")?;
        let radius = tokens.next("agent radius")?;
        let reached: i64 = tokens.next("agent reached")?;
        let initial = Position::new(tokens.next("agent ix")?, tokens.next("agent iy")?);
        let position = Position::new(tokens.next("agent x")?, tokens.next("agent y")?);
        let velocity = Velocity::new(tokens.next("agent vx")?, tokens.next("agent vy")?);

        let mut agent = Agent::new(id, mass, radius, initial, params.force.clone());
        agent.position = position;
        agent.next_position = position;
        agent.velocity = velocity;
        agent.next_velocity = velocity;
        agent.goal_reached = reached != 0;
        agents.push(agent);
    }

    let mut obstacles = Vec::with_capacity(params.obstacle_number);
    for _ in 0..params.obstacle_number {
        let id = tokens.next("obstacle id")?;
        let mass = tokens.next("obstacle mass")?;
        let radius = tokens.next("obstacle radius")?;
        let position = Position::new(tokens.next("obstacle x")?, tokens.next("obstacle y")?);
        obstacles.push(Obstacle::new(id, mass, radius, position));
    }

    Ok(ScenarioData {
        stats,
        world: World::new(agents, obstacles, goal),
    })
}

struct Tokens<'a> {
    iter: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            iter: text.split_whitespace(),
        }
    }

    fn next<T: FromStr>(&mut self, what: &str) -> SimResult<T> {
        let token = self
            .iter
            .next()
            .ok_or_else(|| SimError::Scenario(format!("truncated file, expected {what}")))?;
        token
            .parse()
            .map_err(|_| SimError::Scenario(format!("malformed {what}: `{token}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ForceConfig;

    fn sample_world() -> World {
        let force = ForceConfig::default();
        let mut a0 = Agent::new(0, 1.0, 2.0, Position::new(12.5, 37.25), force.clone());
        a0.velocity = Velocity::new(0.125, -0.0625);
        a0.next_velocity = a0.velocity;
        a0.position = Position::new(13.0, 37.0);
        a0.next_position = a0.position;
        a0.goal_reached = true;
        let a1 = Agent::new(1, 1.0, 2.0, Position::new(0.1, 0.30000000000000004), force);

        let obstacles = vec![Obstacle::new(0, 1.0, 3.5, Position::new(55.0, 66.0))];
        let goal = Goal::new(0, 10.0, 15.0, Position::new(700.5, 500.25));
        World::new(vec![a0, a1], obstacles, goal)
    }

    #[test]
    fn test_round_trip_is_exact() {
        let world = sample_world();
        let stats = Statistics {
            time_step: 321,
            reached_goal: 1,
            reach_ratio: 0.5,
            collisions: 1,
            collision_ratio: 0.5,
        };

        let mut params = Params::default();
        params.agent_number = 2;
        params.obstacle_number = 1;

        let text = render_scenario(&world, &stats);
        let loaded = parse_scenario(&text, &params).unwrap();

        assert_eq!(loaded.stats, stats);
        assert_eq!(loaded.world.goal.position, world.goal.position);
        assert_eq!(loaded.world.goal.width, world.goal.width);

        let original = world.agent_copies();
        let reloaded = loaded.world.agent_copies();
        for (a, b) in original.iter().zip(&reloaded) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.mass, b.mass);
            assert_eq!(a.radius, b.radius);
            assert_eq!(a.goal_reached, b.goal_reached);
            assert_eq!(a.initial_position, b.initial_position);
            assert_eq!(a.position, b.position);
            assert_eq!(a.velocity, b.velocity);
        }

        assert_eq!(loaded.world.obstacles[0].position, world.obstacles[0].position);
        assert_eq!(loaded.world.obstacles[0].radius, world.obstacles[0].radius);
    }

    #[test]
    fn test_truncated_file_is_an_error() {
        let mut params = Params::default();
        params.agent_number = 2;
        params.obstacle_number = 1;

        let result = parse_scenario("1 0 0 0 0\n0 10 15 700 500\n", &params);
        assert!(matches!(result, Err(SimError::Scenario(_))));
    }

    #[test]
    fn test_malformed_token_is_an_error() {
        let params = Params::default();
        let result = parse_scenario("abc 0 0 0 0\n", &params);
        assert!(matches!(result, Err(SimError::Scenario(_))));
    }
}
