//! SwarmSim Core Library
//!
//! This crate provides the world model and supporting types for the SwarmSim
//! simulation framework:
//!
//! - **World model**: agents, obstacles, and the goal region
//! - **Parameters**: force-law coefficients, physics constants, world layout
//! - **Statistics**: per-run counters and ratios
//! - **World generation**: quadrant-based goal placement, swarm deployment,
//!   obstacle course creation from seeded RNG streams
//! - **Configuration I/O**: the `key value  # comment` text format
//! - **Scenario I/O**: deterministic save/load of a full simulation state
//!
//! # Example
//!
//! ```rust,no_run
//! use swarmsim_core::prelude::*;
//!
//! fn main() -> SimResult<()> {
//!     let params = Params::default();
//!     params.validate()?;
//!
//!     let mut rngs = RngStreams::from_params(&params);
//!     let world = build_world(&params, &mut rngs)?;
//!
//!     println!("deployed {} agents", world.agents.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod params;
pub mod results;
pub mod rng;
pub mod scenario;
pub mod spawn;
pub mod stats;
pub mod world;

// Re-exports for convenience
pub use error::{SimError, SimResult};
pub use params::{
    ForceConfig, ForceLaw, LennardJonesCoeffs, NewtonianCoeffs, Params, Quadrant, ReachPredicate,
};
pub use rng::RngStreams;
pub use spawn::{build_world, deploy_agent, place_obstacle};
pub use stats::Statistics;
pub use world::{Agent, AgentSnapshot, Goal, Obstacle, Position, Velocity, World};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{SimError, SimResult};
    pub use crate::params::{
        ForceConfig, ForceLaw, LennardJonesCoeffs, NewtonianCoeffs, Params, Quadrant,
        ReachPredicate,
    };
    pub use crate::rng::RngStreams;
    pub use crate::spawn::build_world;
    pub use crate::stats::Statistics;
    pub use crate::world::{Agent, AgentSnapshot, Goal, Obstacle, Position, Velocity, World};
    pub use nalgebra::{Point2, Vector2};
}
