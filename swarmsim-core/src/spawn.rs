//! World generation: goal placement, swarm deployment, obstacle course

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::error::SimResult;
use crate::params::Params;
use crate::rng::RngStreams;
use crate::world::{Agent, Goal, Obstacle, Position, World};

/// Margin kept between generated objects and the world boundary
const EDGE_MARGIN: f64 = 10.0;

/// Build a fresh world from the parameters and the seeded RNG streams.
///
/// Objects are created in a fixed order (goal, agents, obstacles), each from
/// its own stream, so identical seeds always reproduce the same world.
pub fn build_world(params: &Params, rngs: &mut RngStreams) -> SimResult<World> {
    let goal = place_goal(params, &mut rngs.goal);

    let agents = (0..params.agent_number)
        .map(|id| deploy_agent(id, params, rngs))
        .collect();

    let obstacles = (0..params.obstacle_number)
        .map(|id| place_obstacle(id, params, rngs))
        .collect();

    Ok(World::new(agents, obstacles, goal))
}

/// Place the goal centre uniformly inside its configured world cell
fn place_goal(params: &Params, rng: &mut ChaCha8Rng) -> Goal {
    let cell_w = params.world_width as f64 / 3.0;
    let cell_h = params.world_height as f64 / 3.0;
    let (col, row) = params.goal_quadrant.cell();

    let x = draw(rng, cell_w) + col as f64 * cell_w;
    let y = draw(rng, cell_h) + row as f64 * cell_h;

    Goal::new(0, params.goal_mass, params.goal_width, Position::new(x, y))
}

/// Deploy one agent uniformly inside the deployment rectangle
pub fn deploy_agent(id: usize, params: &Params, rngs: &mut RngStreams) -> Agent {
    let (offset_x, offset_y) = deployment_anchor(params);
    let x = draw(&mut rngs.agent, params.deployment_width as f64) + offset_x;
    let y = draw(&mut rngs.agent, params.deployment_height as f64) + offset_y;

    Agent::new(
        id,
        params.agent_mass,
        params.agent_radius,
        Position::new(x, y),
        params.force.clone(),
    )
}

/// Anchor of the deployment rectangle inside its world cell, with the edge
/// margin applied on outer cells and centring on inner ones
fn deployment_anchor(params: &Params) -> (f64, f64) {
    let cell_w = params.world_width as f64 / 3.0;
    let cell_h = params.world_height as f64 / 3.0;
    let dw = params.deployment_width as f64;
    let dh = params.deployment_height as f64;
    let (col, row) = params.deployment_quadrant.cell();

    let x = match col {
        0 => EDGE_MARGIN,
        1 => cell_w + (cell_w - dw) / 2.0,
        _ => params.world_width as f64 - dw - EDGE_MARGIN,
    };
    let y = match row {
        0 => EDGE_MARGIN,
        1 => cell_h + (cell_h - dh) / 2.0,
        _ => params.world_height as f64 - dh - EDGE_MARGIN,
    };
    (x, y)
}

/// Place one obstacle uniformly in the world, away from the boundary
pub fn place_obstacle(id: usize, params: &Params, rngs: &mut RngStreams) -> Obstacle {
    let radius = if params.obstacle_radius == 0.0 {
        let range = params.obstacle_radius_max - params.obstacle_radius_min;
        rngs.general.gen::<f64>() * range + params.obstacle_radius_min
    } else {
        params.obstacle_radius
    };

    let x = draw(&mut rngs.obstacle, params.world_width as f64 - 2.0 * EDGE_MARGIN) + EDGE_MARGIN;
    let y = draw(&mut rngs.obstacle, params.world_height as f64 - 2.0 * EDGE_MARGIN) + EDGE_MARGIN;

    Obstacle::new(id, params.obstacle_mass, radius, Position::new(x, y))
}

/// Uniform integer draw in `[0, extent)`, as a coordinate offset
fn draw(rng: &mut ChaCha8Rng, extent: f64) -> f64 {
    let bound = (extent as u64).max(1);
    rng.gen_range(0..bound) as f64
}
