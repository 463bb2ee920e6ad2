use criterion::{black_box, criterion_group, criterion_main, Criterion};
use parking_lot::Mutex;

use swarmsim_core::{
    build_world, Agent, ForceConfig, ForceLaw, Params, Position, RngStreams, Statistics,
};
use swarmsim_physics::{pairwise_force, step_agent, Target};

fn bench_pairwise_force(c: &mut Criterion) {
    let newtonian = Agent::new(0, 1.0, 2.0, Position::new(0.0, 0.0), ForceConfig::default());
    let mut lj_config = ForceConfig::default();
    lj_config.law = ForceLaw::LennardJones;
    let lennard_jones = Agent::new(0, 1.0, 2.0, Position::new(0.0, 0.0), lj_config);
    let other = Agent::new(1, 1.0, 2.0, Position::new(60.0, 10.0), ForceConfig::default());

    c.bench_function("newtonian_agent_agent", |b| {
        b.iter(|| pairwise_force(black_box(&newtonian), Target::Agent(black_box(&other)), &[]))
    });
    c.bench_function("lennard_jones_agent_agent", |b| {
        b.iter(|| pairwise_force(black_box(&lennard_jones), Target::Agent(black_box(&other)), &[]))
    });
}

fn bench_step_agent(c: &mut Criterion) {
    let mut params = Params::default();
    params.agent_number = 100;
    params.obstacle_number = 20;
    params.enable_agent_agent = true;

    let mut rngs = RngStreams::from_params(&params);
    let world = build_world(&params, &mut rngs).unwrap();
    let stats = Mutex::new(Statistics::default());

    c.bench_function("step_agent_100_agents_20_obstacles", |b| {
        b.iter(|| step_agent(black_box(&world), 0, &params, &stats))
    });
}

criterion_group!(benches, bench_pairwise_force, bench_step_agent);
criterion_main!(benches);
