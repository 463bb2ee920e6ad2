//! Worker threads and the two-phase lock-step barrier
//!
//! Each step is a fixed sequence for every worker:
//!
//! 1. **Idle**: wait on the start condition while the simulation is stopped
//! 2. **Draining**: pop tasks and stage next-states for the popped agents
//! 3. **Barrier 1**: rendezvous once every next-state is computed
//! 4. **Committing**: publish the staged state of the agents this worker owns
//! 5. **Epoch close**: the last worker into the critical section advances the
//!    clock and either refills the pool or terminates the run
//! 6. **Barrier 2**: rendezvous before the next step begins
//!
//! The epoch-closer role is decided by a counter inside the critical
//! section, so no thread is privileged. Workers are never cancelled
//! mid-step; termination is cooperative at step boundaries.

use std::sync::{Arc, Barrier};

use parking_lot::{Condvar, Mutex, RwLock};
use tracing::debug;

use swarmsim_core::{Params, Statistics, World};
use swarmsim_physics::step_agent;

use crate::monitor::StepMonitor;
use crate::pool::TaskPool;
use crate::reach::propagate_reach;

/// State shared between the driver and the worker pool
pub(crate) struct Shared {
    pub world: RwLock<World>,
    pub params: Params,
    pub pool: TaskPool,
    pub stats: Mutex<Statistics>,
    pub control: Mutex<Control>,
    pub cond_start: Condvar,
    pub cond_finished: Condvar,
    pub barrier: Barrier,
    pub monitor: StepMonitor,
    pub worker_count: usize,
}

/// Run-control flags, guarded by one mutex
#[derive(Debug, Default)]
pub(crate) struct Control {
    /// Workers step while this is set; cleared at termination
    pub running: bool,
    /// External stop, honoured at the next step boundary
    pub stop_requested: bool,
    /// Orderly thread teardown, honoured from the idle state
    pub shutdown: bool,
    /// Barrier-2-prep counter electing the epoch closer
    pub active_workers: usize,
}

pub(crate) fn worker_loop(shared: Arc<Shared>, worker_id: usize) {
    debug!(worker = worker_id, "worker online");
    let mut owned: Vec<usize> = Vec::new();

    loop {
        {
            let mut ctl = shared.control.lock();
            while !ctl.running && !ctl.shutdown {
                shared.cond_start.wait(&mut ctl);
            }
            if ctl.shutdown {
                break;
            }
        }

        let world = shared.world.read();

        owned.clear();
        while let Some(task) = shared.pool.pop() {
            step_agent(&world, task.agent_id, &shared.params, &shared.stats);
            owned.push(task.agent_id);
        }

        // every agent's next-state is staged past this point
        shared.barrier.wait();

        for &agent_id in &owned {
            world.agents[agent_id].write().commit();
        }

        close_epoch(&shared, &world);

        drop(world);

        // commits published and the next step seeded (or the run terminated)
        shared.barrier.wait();
    }

    debug!(worker = worker_id, "worker offline");
}

/// Barrier-2 preparation: the last worker in becomes the epoch closer
fn close_epoch(shared: &Shared, world: &World) {
    let mut ctl = shared.control.lock();
    ctl.active_workers += 1;
    if ctl.active_workers < shared.worker_count {
        return;
    }
    ctl.active_workers = 0;

    let time_step = {
        let mut stats = shared.stats.lock();
        stats.time_step += 1;
        stats.time_step
    };
    shared.monitor.tick();

    if time_step >= shared.params.time_limit || ctl.stop_requested {
        ctl.running = false;
        ctl.stop_requested = false;
        propagate_reach(world, &shared.params, &shared.stats);
        shared.monitor.pause();
        shared.cond_finished.notify_all();
        debug!(time_step, "run terminated");
    } else {
        shared.pool.refill(world.agent_count());
    }
}
