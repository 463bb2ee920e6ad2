//! SwarmSim physics kernels
//!
//! The numeric heart of the simulator:
//!
//! - **Force kernel**: signed scalar pairwise force magnitude under the
//!   Newtonian or Lennard-Jones law, with per-kind cutoffs and saturation
//! - **Perception**: line-of-sight occlusion against the obstacle course
//! - **Integrator**: per-agent friction, force accumulation, velocity
//!   saturation, staged next-state, and collision detection
//!
//! The kernel returns magnitude only; the integrator owns direction. All
//! routines read the committed world state and write nothing but the staged
//! next-state of the one agent being advanced (plus the collision counter,
//! under its mutex), which is what makes the lock-step engine sound.

pub mod force;
pub mod integrator;
pub mod perception;

pub use force::{pairwise_force, Target};
pub use integrator::step_agent;
pub use perception::is_occluded;
