//! SwarmSim execution engine
//!
//! Drives the physics stepper over a fixed pool of worker threads in
//! lock-step: the driver seeds a task pool with one task per agent, workers
//! drain it in parallel, and a two-phase barrier separates computing
//! next-states from publishing them. The last worker through the second
//! phase advances the simulation clock and either seeds the next step or
//! terminates the run and propagates goal-reach.
//!
//! # Example
//!
//! ```rust,no_run
//! use swarmsim_core::prelude::*;
//! use swarmsim_engine::Simulator;
//!
//! fn main() -> SimResult<()> {
//!     let mut params = Params::default();
//!     params.time_limit = 500;
//!
//!     let sim = Simulator::new(params)?;
//!     sim.run();
//!
//!     let stats = sim.statistics();
//!     println!("reach ratio {:.2}", stats.reach_ratio);
//!     Ok(())
//! }
//! ```

pub mod monitor;
pub mod pool;
pub mod reach;
mod worker;

use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex, RwLock};
use tracing::info;

use swarmsim_core::scenario;
use swarmsim_core::spawn::{self, build_world};
use swarmsim_core::{
    AgentSnapshot, Goal, Obstacle, Params, RngStreams, SimError, SimResult, Statistics, World,
};

pub use monitor::{EngineMetrics, StepMonitor};
pub use pool::{Task, TaskPool};
pub use reach::propagate_reach;

use worker::{worker_loop, Control, Shared};

/// The simulation driver: owns the world, the statistics, and the worker
/// pool, and exposes the run controls and observation snapshots
pub struct Simulator {
    shared: Arc<Shared>,
    rngs: Mutex<RngStreams>,
    handles: Vec<JoinHandle<()>>,
}

impl Simulator {
    /// Build a simulator with a freshly generated world
    pub fn new(params: Params) -> SimResult<Self> {
        params.validate()?;
        let mut rngs = RngStreams::from_params(&params);
        let world = build_world(&params, &mut rngs)?;
        Self::build(params, world, Statistics::default(), rngs)
    }

    /// Build a simulator from a saved scenario file
    pub fn from_scenario(params: Params, path: &Path) -> SimResult<Self> {
        params.validate()?;
        let rngs = RngStreams::from_params(&params);
        let data = scenario::load_scenario(path, &params)?;
        Self::build(params, data.world, data.stats, rngs)
    }

    /// Build a simulator around an explicitly constructed world
    pub fn with_world(params: Params, world: World, stats: Statistics) -> SimResult<Self> {
        params.validate()?;
        let rngs = RngStreams::from_params(&params);
        Self::build(params, world, stats, rngs)
    }

    fn build(
        params: Params,
        world: World,
        stats: Statistics,
        rngs: RngStreams,
    ) -> SimResult<Self> {
        let worker_count = if params.worker_threads == 0 {
            num_cpus::get()
        } else {
            params.worker_threads
        };

        let shared = Arc::new(Shared {
            world: RwLock::new(world),
            params,
            pool: TaskPool::new(),
            stats: Mutex::new(stats),
            control: Mutex::new(Control::default()),
            cond_start: Condvar::new(),
            cond_finished: Condvar::new(),
            barrier: Barrier::new(worker_count),
            monitor: StepMonitor::new(),
            worker_count,
        });

        let mut handles = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let shared = Arc::clone(&shared);
            let handle = thread::Builder::new()
                .name(format!("swarm-worker-{worker_id}"))
                .spawn(move || worker_loop(shared, worker_id))
                .map_err(|e| SimError::Resource(format!("failed to spawn worker: {e}")))?;
            handles.push(handle);
        }

        info!(
            workers = worker_count,
            agents = shared.world.read().agent_count(),
            obstacles = shared.world.read().obstacles.len(),
            "simulator ready"
        );

        Ok(Self {
            shared,
            rngs: Mutex::new(rngs),
            handles,
        })
    }

    /// Begin (or resume) stepping.
    ///
    /// At the beginning of a run the statistics are cleared; the task pool is
    /// seeded with one task per agent and the workers are released.
    pub fn start(&self) {
        let mut ctl = self.shared.control.lock();
        if ctl.running {
            return;
        }
        {
            let mut stats = self.shared.stats.lock();
            if stats.time_step == 0 {
                stats.reset();
            }
        }
        self.shared.pool.refill(self.shared.world.read().agent_count());
        ctl.running = true;
        ctl.stop_requested = false;
        self.shared.cond_start.notify_all();
    }

    /// Request a stop; takes effect at the next step boundary
    pub fn stop(&self) {
        let mut ctl = self.shared.control.lock();
        if ctl.running {
            ctl.stop_requested = true;
        }
    }

    /// Block until the current run terminates
    pub fn wait(&self) {
        let mut ctl = self.shared.control.lock();
        while ctl.running {
            self.shared.cond_finished.wait(&mut ctl);
        }
    }

    /// Run to termination: start, then wait
    pub fn run(&self) {
        self.start();
        self.wait();
    }

    pub fn is_running(&self) -> bool {
        self.shared.control.lock().running
    }

    /// Reset agents to their deployment state and clear the statistics.
    /// Stops the current run first if one is in flight.
    pub fn restart(&self) {
        self.stop();
        self.wait();

        {
            let world = self.shared.world.read();
            for slot in &world.agents {
                slot.write().reset();
            }
        }
        self.shared.stats.lock().reset();
        self.shared.pool.clear();
        info!("simulation restarted");
    }

    /// Statistics snapshot
    pub fn statistics(&self) -> Statistics {
        self.shared.stats.lock().clone()
    }

    /// Committed-state snapshot of every agent
    pub fn agent_snapshots(&self) -> Vec<AgentSnapshot> {
        self.shared.world.read().agent_snapshots()
    }

    /// Copy of the obstacle course
    pub fn obstacles(&self) -> Vec<Obstacle> {
        self.shared.world.read().obstacles.clone()
    }

    /// Copy of the goal
    pub fn goal(&self) -> Goal {
        self.shared.world.read().goal.clone()
    }

    /// Step-timing metrics
    pub fn metrics(&self) -> EngineMetrics {
        self.shared.monitor.metrics()
    }

    /// Construction-time parameters
    pub fn params(&self) -> &Params {
        &self.shared.params
    }

    /// Number of worker threads in the pool
    pub fn worker_count(&self) -> usize {
        self.shared.worker_count
    }

    /// Grow or shrink the swarm; requires a stopped simulation.
    /// New agents continue the deployment RNG stream; the count never drops
    /// below one.
    pub fn change_agent_number(&self, count: usize) -> SimResult<()> {
        if self.is_running() {
            return Err(SimError::SimulationRunning);
        }
        let count = count.max(1);
        let mut world = self.shared.world.write();
        let current = world.agents.len();

        if count > current {
            let mut rngs = self.rngs.lock();
            for id in current..count {
                let agent = spawn::deploy_agent(id, &self.shared.params, &mut rngs);
                world.agents.push(RwLock::new(agent));
            }
        } else {
            world.agents.truncate(count);
        }
        Ok(())
    }

    /// Grow or shrink the obstacle course; requires a stopped simulation
    pub fn change_obstacle_number(&self, count: usize) -> SimResult<()> {
        if self.is_running() {
            return Err(SimError::SimulationRunning);
        }
        let mut world = self.shared.world.write();
        let current = world.obstacles.len();

        if count > current {
            let mut rngs = self.rngs.lock();
            for id in current..count {
                let obstacle = spawn::place_obstacle(id, &self.shared.params, &mut rngs);
                world.obstacles.push(obstacle);
            }
        } else {
            world.obstacles.truncate(count);
        }
        Ok(())
    }

    /// Persist the world and statistics; requires a stopped simulation
    pub fn save_scenario(&self, path: &Path) -> SimResult<()> {
        if self.is_running() {
            return Err(SimError::SimulationRunning);
        }
        let world = self.shared.world.read();
        let stats = self.shared.stats.lock().clone();
        scenario::save_scenario(&world, &stats, path)
    }

    /// Replace the world and statistics from a scenario file; requires a
    /// stopped simulation
    pub fn load_scenario(&self, path: &Path) -> SimResult<()> {
        if self.is_running() {
            return Err(SimError::SimulationRunning);
        }
        let data = scenario::load_scenario(path, &self.shared.params)?;
        *self.shared.world.write() = data.world;
        *self.shared.stats.lock() = data.stats;
        Ok(())
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        self.stop();
        self.wait();
        {
            let mut ctl = self.shared.control.lock();
            ctl.shutdown = true;
        }
        self.shared.cond_start.notify_all();
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_params() -> Params {
        let mut params = Params::default();
        params.agent_number = 4;
        params.obstacle_number = 2;
        params.time_limit = 10;
        params.worker_threads = 2;
        params
    }

    #[test]
    fn test_validation_failure_surfaces() {
        let mut params = quick_params();
        params.agent_number = 0;
        assert!(matches!(Simulator::new(params), Err(SimError::Config(_))));
    }

    #[test]
    fn test_run_advances_clock_to_limit() {
        let sim = Simulator::new(quick_params()).unwrap();
        sim.run();
        assert_eq!(sim.statistics().time_step, 10);
        assert!(!sim.is_running());
        assert_eq!(sim.metrics().total_steps, 10);
    }

    #[test]
    fn test_restart_restores_deployment() {
        let sim = Simulator::new(quick_params()).unwrap();
        let before = sim.agent_snapshots();
        sim.run();
        sim.restart();

        let after = sim.agent_snapshots();
        assert_eq!(sim.statistics(), Statistics::default());
        for (a, b) in before.iter().zip(&after) {
            assert_eq!(a.position, b.position);
            assert_eq!(b.velocity.norm(), 0.0);
            assert!(!b.collided);
            assert!(!b.goal_reached);
        }
    }

    #[test]
    fn test_resize_requires_stopped() {
        let mut params = quick_params();
        params.time_limit = 10_000_000;
        params.enable_agent_obstacle = false;
        let sim = Simulator::new(params).unwrap();
        sim.start();
        assert!(matches!(
            sim.change_agent_number(8),
            Err(SimError::SimulationRunning)
        ));
        sim.stop();
        sim.wait();
        sim.change_agent_number(8).unwrap();
        assert_eq!(sim.agent_snapshots().len(), 8);
    }

    #[test]
    fn test_change_counts() {
        let sim = Simulator::new(quick_params()).unwrap();
        sim.change_agent_number(7).unwrap();
        assert_eq!(sim.agent_snapshots().len(), 7);
        sim.change_agent_number(0).unwrap();
        assert_eq!(sim.agent_snapshots().len(), 1);

        sim.change_obstacle_number(5).unwrap();
        assert_eq!(sim.obstacles().len(), 5);
        sim.change_obstacle_number(0).unwrap();
        assert!(sim.obstacles().is_empty());
    }

    #[test]
    fn test_stop_parks_at_step_boundary() {
        let mut params = quick_params();
        params.time_limit = 1_000_000;
        let sim = Simulator::new(params).unwrap();
        sim.start();
        sim.stop();
        sim.wait();

        let at_stop = sim.statistics().time_step;
        assert!(at_stop >= 1);
        assert!(!sim.is_running());
        // nothing moves while stopped
        std::thread::sleep(std::time::Duration::from_millis(20));
        assert_eq!(sim.statistics().time_step, at_stop);
    }
}
