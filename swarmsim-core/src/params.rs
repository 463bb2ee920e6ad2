//! Simulation parameters and force-law configuration

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Pairwise force law selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForceLaw {
    /// Gravitational-like law: `f = G * m_a * m_o / d^p`
    Newtonian,
    /// Lennard-Jones 6-12 potential with separate attractive/repulsive terms
    LennardJones,
}

impl ForceLaw {
    pub fn as_str(&self) -> &str {
        match self {
            ForceLaw::Newtonian => "newtonian",
            ForceLaw::LennardJones => "lennard_jones",
        }
    }

    /// Numeric selector used by the configuration format (0 / 1)
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(ForceLaw::Newtonian),
            1 => Some(ForceLaw::LennardJones),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            ForceLaw::Newtonian => 0,
            ForceLaw::LennardJones => 1,
        }
    }
}

/// Predicate deciding when an agent counts as having reached the goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReachPredicate {
    /// Agent position lies inside the goal square
    Touch,
    /// Agent is within the sensing radius of the goal centre
    Radius,
    /// Radius, or transitively within the sensing radius of a reached agent
    Chain,
}

impl ReachPredicate {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(ReachPredicate::Touch),
            1 => Some(ReachPredicate::Radius),
            2 => Some(ReachPredicate::Chain),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            ReachPredicate::Touch => 0,
            ReachPredicate::Radius => 1,
            ReachPredicate::Chain => 2,
        }
    }
}

/// 3x3 grid cell of the world, used for goal and deployment placement
///
/// ```text
///  -------------
/// | NW | N | NE |
/// |-------------
/// | W  | C | E  |
/// |-------------
/// | SW | S | SE |
///  -------------
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quadrant {
    NorthWest,
    North,
    NorthEast,
    West,
    Center,
    East,
    SouthWest,
    South,
    SouthEast,
}

impl Quadrant {
    /// Numeric selector used by the configuration format, row-major from NW
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Quadrant::NorthWest),
            1 => Some(Quadrant::North),
            2 => Some(Quadrant::NorthEast),
            3 => Some(Quadrant::West),
            4 => Some(Quadrant::Center),
            5 => Some(Quadrant::East),
            6 => Some(Quadrant::SouthWest),
            7 => Some(Quadrant::South),
            8 => Some(Quadrant::SouthEast),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Quadrant::NorthWest => 0,
            Quadrant::North => 1,
            Quadrant::NorthEast => 2,
            Quadrant::West => 3,
            Quadrant::Center => 4,
            Quadrant::East => 5,
            Quadrant::SouthWest => 6,
            Quadrant::South => 7,
            Quadrant::SouthEast => 8,
        }
    }

    /// Grid column (0 = west) and row (0 = south)
    pub fn cell(&self) -> (u32, u32) {
        match self {
            Quadrant::NorthWest => (0, 2),
            Quadrant::North => (1, 2),
            Quadrant::NorthEast => (2, 2),
            Quadrant::West => (0, 1),
            Quadrant::Center => (1, 1),
            Quadrant::East => (2, 1),
            Quadrant::SouthWest => (0, 0),
            Quadrant::South => (1, 0),
            Quadrant::SouthEast => (2, 0),
        }
    }
}

/// Coefficients of the Newtonian law for one interaction kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewtonianCoeffs {
    /// Gravitational constant G
    pub g: f64,
    /// Distance exponent p
    pub exponent: f64,
    /// Saturation bound on the force magnitude
    pub max_force: f64,
}

/// Coefficients of the Lennard-Jones law for one interaction kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LennardJonesCoeffs {
    /// Well depth epsilon
    pub epsilon: f64,
    /// Attractive term coefficient c
    pub attractive: f64,
    /// Repulsive term coefficient d
    pub repulsive: f64,
    /// Saturation bound on the force magnitude
    pub max_force: f64,
}

/// Complete force-law parameter block
///
/// Every agent carries its own copy, so a heterogeneous swarm is possible
/// even though the configuration loader sets identical values for all agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceConfig {
    /// Selected pairwise force law
    pub law: ForceLaw,

    /// Desired inter-agent distance R, the equilibrium of the Newtonian
    /// agent-agent law and the sigma of the Lennard-Jones agent-agent law
    pub desired_distance: f64,

    /// Range coefficient rho; the sensing radius is `rho * R`
    pub range_coefficient: f64,

    /// Proximity gate for Lennard-Jones agent-obstacle interactions,
    /// expressed as a surface distance
    pub lj_obstacle_range: f64,

    pub newtonian_agent_agent: NewtonianCoeffs,
    pub newtonian_agent_obstacle: NewtonianCoeffs,
    pub newtonian_agent_goal: NewtonianCoeffs,

    pub lj_agent_agent: LennardJonesCoeffs,
    pub lj_agent_obstacle: LennardJonesCoeffs,
    pub lj_agent_goal: LennardJonesCoeffs,
}

impl ForceConfig {
    /// Sensing radius `rho * R`
    pub fn sensing_radius(&self) -> f64 {
        self.range_coefficient * self.desired_distance
    }
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            law: ForceLaw::Newtonian,
            desired_distance: 50.0,
            range_coefficient: 1.5,
            lj_obstacle_range: 10.0,
            newtonian_agent_agent: NewtonianCoeffs {
                g: 1000.0,
                exponent: 2.0,
                max_force: 4.0,
            },
            newtonian_agent_obstacle: NewtonianCoeffs {
                g: 1000.0,
                exponent: 2.0,
                max_force: 14.0,
            },
            newtonian_agent_goal: NewtonianCoeffs {
                g: 1000.0,
                exponent: 2.0,
                max_force: 4.0,
            },
            lj_agent_agent: LennardJonesCoeffs {
                epsilon: 16.5,
                attractive: 0.1,
                repulsive: 0.1,
                max_force: 4.0,
            },
            lj_agent_obstacle: LennardJonesCoeffs {
                epsilon: 16.5,
                attractive: 0.1,
                repulsive: 0.1,
                max_force: 14.0,
            },
            lj_agent_goal: LennardJonesCoeffs {
                epsilon: 16.5,
                attractive: 0.1,
                repulsive: 0.1,
                max_force: 4.0,
            },
        }
    }
}

/// Full simulation parameter set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Params {
    /// Simulation area width
    pub world_width: u32,
    /// Simulation area height
    pub world_height: u32,
    /// Frame delay of the (external) rendering layer; parsed, unused here
    pub timer_delay_ms: u32,

    /// Seed for goal placement; negative seeds from wall time
    pub goal_random_seed: i64,
    /// Side length of the goal square
    pub goal_width: f64,
    /// Goal mass (for calculating forces)
    pub goal_mass: f64,
    /// World cell the goal is placed in
    pub goal_quadrant: Quadrant,

    /// Seed for agent deployment; negative seeds from wall time
    pub agent_random_seed: i64,
    /// Number of agents in the swarm
    pub agent_number: usize,
    /// Agent body radius
    pub agent_radius: f64,
    /// Agent mass
    pub agent_mass: f64,
    /// Initial deployment area width
    pub deployment_width: u32,
    /// Initial deployment area height
    pub deployment_height: u32,
    /// World cell the deployment area is anchored in
    pub deployment_quadrant: Quadrant,

    /// Seed for obstacle placement; negative seeds from wall time
    pub obstacle_random_seed: i64,
    /// Number of obstacles
    pub obstacle_number: usize,
    /// Obstacle radius; 0 draws radii uniformly from the min/max range
    pub obstacle_radius: f64,
    pub obstacle_radius_min: f64,
    pub obstacle_radius_max: f64,
    /// Obstacle mass (for calculating forces)
    pub obstacle_mass: f64,

    /// Enable agent-goal interactions
    pub enable_agent_goal: bool,
    /// Enable agent-obstacle interactions
    pub enable_agent_obstacle: bool,
    /// Enable agent-agent interactions
    pub enable_agent_agent: bool,

    /// Friction coefficient mu in [0, 1], applied to velocity every step
    pub friction_coefficient: f64,
    /// Velocity saturation bound
    pub max_velocity: f64,

    /// Force-law parameter block copied into every agent
    pub force: ForceConfig,

    /// Goal-reach predicate
    pub goal_reach_predicate: ReachPredicate,

    /// Steps per run
    pub time_limit: u64,
    /// Number of runs in batch mode
    pub runs_number: u32,
    /// Batch mode: run the simulator (true) or sample from `env_probability`
    pub run_simulation: bool,
    /// Batch mode environment probability, used when `run_simulation` is off
    pub env_probability: f64,

    /// Initialize world state from the scenario file instead of generating it
    pub initialize_from_file: bool,
    /// Scenario file path
    pub scenario_filename: String,
    /// Results file path
    pub results_filename: String,

    /// Worker thread count; 0 selects the number of hardware threads
    pub worker_threads: usize,

    /// Batch experiment arrays, parsed and echoed for the outer tooling
    pub n_array: Vec<i64>,
    pub k_array: Vec<i64>,
    pub alpha_array: Vec<f64>,
    pub beta_array: Vec<f64>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            world_width: 800,
            world_height: 600,
            timer_delay_ms: 8,
            goal_random_seed: 0,
            goal_width: 15.0,
            goal_mass: 10.0,
            goal_quadrant: Quadrant::NorthEast,
            agent_random_seed: 0,
            agent_number: 100,
            agent_radius: 2.0,
            agent_mass: 1.0,
            deployment_width: 100,
            deployment_height: 100,
            deployment_quadrant: Quadrant::Center,
            obstacle_random_seed: 0,
            obstacle_number: 20,
            obstacle_radius: 3.0,
            obstacle_radius_min: 2.0,
            obstacle_radius_max: 8.0,
            obstacle_mass: 1.0,
            enable_agent_goal: true,
            enable_agent_obstacle: true,
            enable_agent_agent: false,
            friction_coefficient: 0.5,
            max_velocity: 0.5,
            force: ForceConfig::default(),
            goal_reach_predicate: ReachPredicate::Chain,
            time_limit: 1000,
            runs_number: 10,
            run_simulation: false,
            env_probability: 0.9,
            initialize_from_file: false,
            scenario_filename: "scenario.dat".to_string(),
            results_filename: "results.dat".to_string(),
            worker_threads: 0,
            n_array: Vec::new(),
            k_array: Vec::new(),
            alpha_array: Vec::new(),
            beta_array: Vec::new(),
        }
    }
}

impl Params {
    /// Sensing radius `rho * R`
    pub fn sensing_radius(&self) -> f64 {
        self.force.sensing_radius()
    }

    /// Validate the parameter set before a simulation is built from it
    pub fn validate(&self) -> SimResult<()> {
        if self.world_width == 0 || self.world_height == 0 {
            return Err(SimError::Config("world dimensions must be > 0".into()));
        }
        if self.agent_number == 0 {
            return Err(SimError::Config("agent_number must be > 0".into()));
        }
        if self.agent_mass <= 0.0 {
            return Err(SimError::Config("agent_mass must be > 0".into()));
        }
        if !(0.0..=1.0).contains(&self.friction_coefficient) {
            return Err(SimError::Config(
                "friction_coefficient must lie in [0, 1]".into(),
            ));
        }
        if self.max_velocity <= 0.0 {
            return Err(SimError::Config("max_V must be > 0".into()));
        }
        if self.force.desired_distance <= 0.0 {
            return Err(SimError::Config("R must be > 0".into()));
        }
        if self.force.range_coefficient <= 0.0 {
            return Err(SimError::Config("range_coefficient must be > 0".into()));
        }
        if self.time_limit == 0 {
            return Err(SimError::Config("time_limit must be > 0".into()));
        }
        if self.obstacle_radius == 0.0 && self.obstacle_radius_max < self.obstacle_radius_min {
            return Err(SimError::Config(
                "obstacle_radius_max must be >= obstacle_radius_min".into(),
            ));
        }
        if self.deployment_width == 0 || self.deployment_height == 0 {
            return Err(SimError::Config("deployment area must be non-empty".into()));
        }
        Ok(())
    }
}
