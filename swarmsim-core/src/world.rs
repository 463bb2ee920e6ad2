//! World model: agents, obstacles, and the goal region

use nalgebra::{Point2, Vector2};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::params::ForceConfig;

/// 2D position in the simulation world
pub type Position = Point2<f64>;

/// 2D velocity
pub type Velocity = Vector2<f64>;

/// Display colours exposed through the snapshot API
pub const AGENT_COLOR: [f32; 3] = [0.0, 0.2, 1.0];
pub const AGENT_COLOR_COLLIDED: [f32; 3] = [1.0, 0.0, 0.0];
pub const GOAL_COLOR: [f32; 3] = [1.0, 0.0, 0.2];
pub const OBSTACLE_COLOR: [f32; 3] = [0.0, 0.4, 0.0];

/// Point-mass mobile entity being simulated
///
/// `next_position` / `next_velocity` hold the state staged during the compute
/// phase of a step; [`Agent::commit`] publishes them between the two barriers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: usize,
    pub mass: f64,
    pub radius: f64,
    pub position: Position,
    pub velocity: Velocity,
    pub next_position: Position,
    pub next_velocity: Velocity,
    /// Deployment position, restored on restart
    pub initial_position: Position,
    /// Monotonic within a run: once true, stays true
    pub collided: bool,
    /// Monotonic within a run; set only by the reach propagator
    pub goal_reached: bool,
    pub color: [f32; 3],
    /// Per-agent copy of the force-law parameter block
    pub force: ForceConfig,
}

impl Agent {
    pub fn new(id: usize, mass: f64, radius: f64, position: Position, force: ForceConfig) -> Self {
        Self {
            id,
            mass,
            radius,
            position,
            velocity: Velocity::zeros(),
            next_position: position,
            next_velocity: Velocity::zeros(),
            initial_position: position,
            collided: false,
            goal_reached: false,
            color: AGENT_COLOR,
            force,
        }
    }

    /// Publish the staged next-state
    pub fn commit(&mut self) {
        self.velocity = self.next_velocity;
        self.position = self.next_position;
    }

    /// Restore the deployment state: initial position, zero velocity,
    /// cleared flags
    pub fn reset(&mut self) {
        self.position = self.initial_position;
        self.velocity = Velocity::zeros();
        self.next_position = self.initial_position;
        self.next_velocity = Velocity::zeros();
        self.collided = false;
        self.goal_reached = false;
        self.color = AGENT_COLOR;
    }

    /// Latch the collided flag and recolour
    pub fn mark_collided(&mut self) {
        self.collided = true;
        self.color = AGENT_COLOR_COLLIDED;
    }
}

/// Static circular obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: usize,
    pub mass: f64,
    pub radius: f64,
    pub position: Position,
    pub color: [f32; 3],
}

impl Obstacle {
    pub fn new(id: usize, mass: f64, radius: f64, position: Position) -> Self {
        Self {
            id,
            mass,
            radius,
            position,
            color: OBSTACLE_COLOR,
        }
    }
}

/// Axis-aligned square region to be reached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: usize,
    pub mass: f64,
    /// Side length of the square
    pub width: f64,
    /// Centre of the square
    pub position: Position,
    pub color: [f32; 3],
}

impl Goal {
    pub fn new(id: usize, mass: f64, width: f64, position: Position) -> Self {
        Self {
            id,
            mass,
            width,
            position,
            color: GOAL_COLOR,
        }
    }

    /// True iff `point` lies inside the goal square
    pub fn contains(&self, point: &Position) -> bool {
        let half = self.width / 2.0;
        point.x >= self.position.x - half
            && point.x <= self.position.x + half
            && point.y >= self.position.y - half
            && point.y <= self.position.y + half
    }
}

/// Read-only snapshot of one agent, for observation layers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: usize,
    pub mass: f64,
    pub radius: f64,
    pub position: Position,
    pub velocity: Velocity,
    pub collided: bool,
    pub goal_reached: bool,
    pub color: [f32; 3],
}

impl From<&Agent> for AgentSnapshot {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id,
            mass: agent.mass,
            radius: agent.radius,
            position: agent.position,
            velocity: agent.velocity,
            collided: agent.collided,
            goal_reached: agent.goal_reached,
            color: agent.color,
        }
    }
}

/// The complete scenario world
///
/// Obstacles and the goal are immutable after setup. Agents are individually
/// locked: workers take shared reads of the committed state and exclusive
/// writes only on the agents they popped from the task pool.
pub struct World {
    pub agents: Vec<RwLock<Agent>>,
    pub obstacles: Vec<Obstacle>,
    pub goal: Goal,
}

impl World {
    pub fn new(agents: Vec<Agent>, obstacles: Vec<Obstacle>, goal: Goal) -> Self {
        Self {
            agents: agents.into_iter().map(RwLock::new).collect(),
            obstacles,
            goal,
        }
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Snapshot of all agents' committed state
    pub fn agent_snapshots(&self) -> Vec<AgentSnapshot> {
        self.agents
            .iter()
            .map(|slot| AgentSnapshot::from(&*slot.read()))
            .collect()
    }

    /// Owned copies of all agents, for persistence
    pub fn agent_copies(&self) -> Vec<Agent> {
        self.agents.iter().map(|slot| slot.read().clone()).collect()
    }
}
