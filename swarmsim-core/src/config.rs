//! Configuration file I/O
//!
//! The format is line-oriented: a key token, a value token, and anything
//! after the value is ignored as a comment. Keys are case-insensitive.
//! Unknown keys produce a warning and are skipped; a known key with an
//! unparseable value is fatal.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use tracing::warn;

use crate::error::{SimError, SimResult};
use crate::params::{ForceLaw, Params, Quadrant, ReachPredicate};

/// Read and parse a configuration file
pub fn load_params(path: &Path) -> SimResult<Params> {
    let text = fs::read_to_string(path)
        .map_err(|e| SimError::Config(format!("failed to open {}: {e}", path.display())))?;
    parse_params(&text)
}

/// Parse configuration text into a parameter set, starting from defaults
pub fn parse_params(text: &str) -> SimResult<Params> {
    let mut params = Params::default();

    // Declared array lengths; the arrays themselves are checked against
    // these when they appear.
    let mut n_number: Option<usize> = None;
    let mut k_number: Option<usize> = None;
    let mut a_b_number: Option<usize> = None;

    for line in text.lines() {
        let mut tokens = line.split_whitespace();
        let Some(key) = tokens.next() else { continue };
        if key.starts_with('#') {
            continue;
        }
        let value = match tokens.next() {
            Some(v) if !v.starts_with('#') => v,
            _ => return Err(SimError::invalid(key, "<missing>")),
        };

        match key.to_ascii_lowercase().as_str() {
            "world_width" => params.world_width = parse_num(key, value)?,
            "world_height" => params.world_height = parse_num(key, value)?,
            "timer_delay_ms" => params.timer_delay_ms = parse_num(key, value)?,

            "goal_random_seed" => params.goal_random_seed = parse_num(key, value)?,
            "goal_width" => params.goal_width = parse_num(key, value)?,
            "goal_mass" => params.goal_mass = parse_num(key, value)?,
            "goal_quadrant" => {
                params.goal_quadrant = Quadrant::from_code(parse_num(key, value)?)
                    .ok_or_else(|| SimError::invalid(key, value))?;
            }

            "agent_random_seed" => params.agent_random_seed = parse_num(key, value)?,
            "agent_number" => params.agent_number = parse_num(key, value)?,
            "agent_radius" => params.agent_radius = parse_num(key, value)?,
            "agent_mass" => params.agent_mass = parse_num(key, value)?,
            "deployment_width" => params.deployment_width = parse_num(key, value)?,
            "deployment_height" => params.deployment_height = parse_num(key, value)?,
            "deployment_quadrant" => {
                params.deployment_quadrant = Quadrant::from_code(parse_num(key, value)?)
                    .ok_or_else(|| SimError::invalid(key, value))?;
            }

            "obstacle_random_seed" => params.obstacle_random_seed = parse_num(key, value)?,
            "obstacle_number" => params.obstacle_number = parse_num(key, value)?,
            "obstacle_radius" => params.obstacle_radius = parse_num(key, value)?,
            "obstacle_radius_min" => params.obstacle_radius_min = parse_num(key, value)?,
            "obstacle_radius_max" => params.obstacle_radius_max = parse_num(key, value)?,
            "obstacle_mass" => params.obstacle_mass = parse_num(key, value)?,

            "enable_agent_goal_f" => params.enable_agent_goal = parse_flag(key, value)?,
            "enable_agent_obstacle_f" => params.enable_agent_obstacle = parse_flag(key, value)?,
            "enable_agent_agent_f" => params.enable_agent_agent = parse_flag(key, value)?,

            "r" => params.force.desired_distance = parse_num(key, value)?,
            "friction_coefficient" => params.friction_coefficient = parse_num(key, value)?,
            "range_coefficient" => params.force.range_coefficient = parse_num(key, value)?,
            "max_v" => params.max_velocity = parse_num(key, value)?,
            "force_law" => {
                params.force.law = ForceLaw::from_code(parse_num(key, value)?)
                    .ok_or_else(|| SimError::invalid(key, value))?;
            }
            "lj_obstacle_range" => params.force.lj_obstacle_range = parse_num(key, value)?,
            "goal_reach_predicate" => {
                params.goal_reach_predicate = ReachPredicate::from_code(parse_num(key, value)?)
                    .ok_or_else(|| SimError::invalid(key, value))?;
            }
            "worker_threads" => params.worker_threads = parse_num(key, value)?,

            "g_agent_agent" => params.force.newtonian_agent_agent.g = parse_num(key, value)?,
            "g_agent_obstacle" => params.force.newtonian_agent_obstacle.g = parse_num(key, value)?,
            "g_agent_goal" => params.force.newtonian_agent_goal.g = parse_num(key, value)?,
            "p_agent_agent" => {
                params.force.newtonian_agent_agent.exponent = parse_num(key, value)?;
            }
            "p_agent_obstacle" => {
                params.force.newtonian_agent_obstacle.exponent = parse_num(key, value)?;
            }
            "p_agent_goal" => params.force.newtonian_agent_goal.exponent = parse_num(key, value)?,
            "max_f_agent_agent_n" => {
                params.force.newtonian_agent_agent.max_force = parse_num(key, value)?;
            }
            "max_f_agent_obstacle_n" => {
                params.force.newtonian_agent_obstacle.max_force = parse_num(key, value)?;
            }
            "max_f_agent_goal_n" => {
                params.force.newtonian_agent_goal.max_force = parse_num(key, value)?;
            }

            "epsilon_agent_agent" => params.force.lj_agent_agent.epsilon = parse_num(key, value)?,
            "epsilon_agent_obstacle" => {
                params.force.lj_agent_obstacle.epsilon = parse_num(key, value)?;
            }
            "epsilon_agent_goal" => params.force.lj_agent_goal.epsilon = parse_num(key, value)?,
            "c_agent_agent" => params.force.lj_agent_agent.attractive = parse_num(key, value)?,
            "c_agent_obstacle" => {
                params.force.lj_agent_obstacle.attractive = parse_num(key, value)?;
            }
            "c_agent_goal" => params.force.lj_agent_goal.attractive = parse_num(key, value)?,
            "d_agent_agent" => params.force.lj_agent_agent.repulsive = parse_num(key, value)?,
            "d_agent_obstacle" => {
                params.force.lj_agent_obstacle.repulsive = parse_num(key, value)?;
            }
            "d_agent_goal" => params.force.lj_agent_goal.repulsive = parse_num(key, value)?,
            "max_f_agent_agent_lj" => {
                params.force.lj_agent_agent.max_force = parse_num(key, value)?;
            }
            "max_f_agent_obstacle_lj" => {
                params.force.lj_agent_obstacle.max_force = parse_num(key, value)?;
            }
            "max_f_agent_goal_lj" => params.force.lj_agent_goal.max_force = parse_num(key, value)?,

            "time_limit" => params.time_limit = parse_num(key, value)?,
            "runs_number" => params.runs_number = parse_num(key, value)?,
            "run_simulation" => params.run_simulation = parse_flag(key, value)?,
            "env_probability" => params.env_probability = parse_num(key, value)?,
            "initialize_from_file" => params.initialize_from_file = parse_flag(key, value)?,
            "scenario_filename" => params.scenario_filename = value.to_string(),
            "results_filename" => params.results_filename = value.to_string(),

            "n_number" => n_number = Some(parse_num(key, value)?),
            "k_number" => k_number = Some(parse_num(key, value)?),
            "a_b_number" => a_b_number = Some(parse_num(key, value)?),
            "n_array" => params.n_array = parse_array(key, value, n_number)?,
            "k_array" => params.k_array = parse_array(key, value, k_number)?,
            "alpha_array" => params.alpha_array = parse_array(key, value, a_b_number)?,
            "beta_array" => params.beta_array = parse_array(key, value, a_b_number)?,

            _ => warn!(parameter = key, "unknown parameter, ignoring"),
        }
    }

    Ok(params)
}

fn parse_num<T: FromStr>(key: &str, value: &str) -> SimResult<T> {
    value.parse().map_err(|_| SimError::invalid(key, value))
}

fn parse_flag(key: &str, value: &str) -> SimResult<bool> {
    Ok(parse_num::<i64>(key, value)? != 0)
}

/// Parse a comma-separated array and check it against its declared length.
/// A single `-` stands for an empty array.
fn parse_array<T: FromStr>(key: &str, value: &str, declared: Option<usize>) -> SimResult<Vec<T>> {
    let items: Vec<T> = if value == "-" { "" } else { value }
        .split(',')
        .filter(|item| !item.is_empty())
        .map(|item| item.parse().map_err(|_| SimError::invalid(key, value)))
        .collect::<SimResult<_>>()?;

    if let Some(expected) = declared {
        if items.len() != expected {
            return Err(SimError::Config(format!(
                "{key} declares {expected} entries but lists {}",
                items.len()
            )));
        }
    }
    Ok(items)
}

/// Render the parameter set back into the configuration format
pub fn render_params(params: &Params) -> String {
    let mut out = String::new();
    let mut line = |key: &str, value: String, comment: &str| {
        let _ = writeln!(out, "{key:<24} {value:<12} # {comment}");
    };

    line("world_width", params.world_width.to_string(), "Simulation area width");
    line("world_height", params.world_height.to_string(), "Simulation area height");
    line("timer_delay_ms", params.timer_delay_ms.to_string(), "Controls rendering speed");

    line("goal_random_seed", params.goal_random_seed.to_string(), "Goal RNG seed; negative seeds from wall time");
    line("goal_width", params.goal_width.to_string(), "Size of the goal");
    line("goal_mass", params.goal_mass.to_string(), "Goal mass (for calculating forces)");
    line("goal_quadrant", params.goal_quadrant.code().to_string(), "Goal position");

    line("agent_random_seed", params.agent_random_seed.to_string(), "Agent RNG seed; negative seeds from wall time");
    line("agent_number", params.agent_number.to_string(), "Number of agents in the swarm");
    line("agent_radius", params.agent_radius.to_string(), "Size of the agent");
    line("agent_mass", params.agent_mass.to_string(), "Mass of the agent");
    line("deployment_width", params.deployment_width.to_string(), "Initial deployment area width");
    line("deployment_height", params.deployment_height.to_string(), "Initial deployment area height");
    line("deployment_quadrant", params.deployment_quadrant.code().to_string(), "Initial deployment area position");

    line("obstacle_random_seed", params.obstacle_random_seed.to_string(), "Obstacle RNG seed; negative seeds from wall time");
    line("obstacle_number", params.obstacle_number.to_string(), "Number of obstacles");
    line("obstacle_radius", params.obstacle_radius.to_string(), "Obstacle size; 0 for random between min and max");
    line("obstacle_radius_min", params.obstacle_radius_min.to_string(), "Minimum obstacle radius");
    line("obstacle_radius_max", params.obstacle_radius_max.to_string(), "Maximum obstacle radius");
    line("obstacle_mass", params.obstacle_mass.to_string(), "Obstacle mass (for calculating forces)");

    line("enable_agent_goal_f", flag(params.enable_agent_goal), "Agent-goal interactions, 0 - disable, 1 - enable");
    line("enable_agent_obstacle_f", flag(params.enable_agent_obstacle), "Agent-obstacle interactions, 0 - disable, 1 - enable");
    line("enable_agent_agent_f", flag(params.enable_agent_agent), "Agent-agent interactions, 0 - disable, 1 - enable");

    line("R", params.force.desired_distance.to_string(), "Desired inter-agent distance");
    line("friction_coefficient", params.friction_coefficient.to_string(), "Friction coefficient (for stabilization)");
    line("range_coefficient", params.force.range_coefficient.to_string(), "Agent visual range coefficient");
    line("max_V", params.max_velocity.to_string(), "Maximum agent velocity");
    line("force_law", params.force.law.code().to_string(), "0 - Newtonian, 1 - Lennard-Jones");
    line("lj_obstacle_range", params.force.lj_obstacle_range.to_string(), "LJ agent-obstacle proximity gate");
    line("goal_reach_predicate", params.goal_reach_predicate.code().to_string(), "0 - touch, 1 - radius, 2 - chain");
    line("worker_threads", params.worker_threads.to_string(), "Worker pool size; 0 for hardware threads");

    line("G_agent_agent", params.force.newtonian_agent_agent.g.to_string(), "Newtonian - gravitational constant, agent-agent");
    line("G_agent_obstacle", params.force.newtonian_agent_obstacle.g.to_string(), "Newtonian - gravitational constant, agent-obstacle");
    line("G_agent_goal", params.force.newtonian_agent_goal.g.to_string(), "Newtonian - gravitational constant, agent-goal");
    line("p_agent_agent", params.force.newtonian_agent_agent.exponent.to_string(), "Newtonian - distance exponent, agent-agent");
    line("p_agent_obstacle", params.force.newtonian_agent_obstacle.exponent.to_string(), "Newtonian - distance exponent, agent-obstacle");
    line("p_agent_goal", params.force.newtonian_agent_goal.exponent.to_string(), "Newtonian - distance exponent, agent-goal");
    line("max_f_agent_agent_n", params.force.newtonian_agent_agent.max_force.to_string(), "Newtonian - force cutoff, agent-agent");
    line("max_f_agent_obstacle_n", params.force.newtonian_agent_obstacle.max_force.to_string(), "Newtonian - force cutoff, agent-obstacle");
    line("max_f_agent_goal_n", params.force.newtonian_agent_goal.max_force.to_string(), "Newtonian - force cutoff, agent-goal");

    line("epsilon_agent_agent", params.force.lj_agent_agent.epsilon.to_string(), "LJ - interaction strength, agent-agent");
    line("epsilon_agent_obstacle", params.force.lj_agent_obstacle.epsilon.to_string(), "LJ - interaction strength, agent-obstacle");
    line("epsilon_agent_goal", params.force.lj_agent_goal.epsilon.to_string(), "LJ - interaction strength, agent-goal");
    line("c_agent_agent", params.force.lj_agent_agent.attractive.to_string(), "LJ - attractive parameter, agent-agent");
    line("c_agent_obstacle", params.force.lj_agent_obstacle.attractive.to_string(), "LJ - attractive parameter, agent-obstacle");
    line("c_agent_goal", params.force.lj_agent_goal.attractive.to_string(), "LJ - attractive parameter, agent-goal");
    line("d_agent_agent", params.force.lj_agent_agent.repulsive.to_string(), "LJ - repulsive parameter, agent-agent");
    line("d_agent_obstacle", params.force.lj_agent_obstacle.repulsive.to_string(), "LJ - repulsive parameter, agent-obstacle");
    line("d_agent_goal", params.force.lj_agent_goal.repulsive.to_string(), "LJ - repulsive parameter, agent-goal");
    line("max_f_agent_agent_lj", params.force.lj_agent_agent.max_force.to_string(), "LJ - force cutoff, agent-agent");
    line("max_f_agent_obstacle_lj", params.force.lj_agent_obstacle.max_force.to_string(), "LJ - force cutoff, agent-obstacle");
    line("max_f_agent_goal_lj", params.force.lj_agent_goal.max_force.to_string(), "LJ - force cutoff, agent-goal");

    line("time_limit", params.time_limit.to_string(), "Time limit per run");
    line("runs_number", params.runs_number.to_string(), "Number of runs");
    line("run_simulation", flag(params.run_simulation), "0 - sample env_probability, 1 - simulate");
    line("env_probability", params.env_probability.to_string(), "Used when run_simulation = 0");
    line("initialize_from_file", flag(params.initialize_from_file), "Load world state from the scenario file");
    line("scenario_filename", params.scenario_filename.clone(), "Scenario filename");
    line("results_filename", params.results_filename.clone(), "Results filename");

    line("n_number", params.n_array.len().to_string(), "Number of n values");
    line("k_number", params.k_array.len().to_string(), "Number of k values");
    line("a_b_number", params.alpha_array.len().to_string(), "Number of prior distributions");
    line("n_array", join(&params.n_array), "Actual n values");
    line("k_array", join(&params.k_array), "Actual k values");
    line("alpha_array", join(&params.alpha_array), "Actual alpha values");
    line("beta_array", join(&params.beta_array), "Actual beta values");

    out
}

/// Write the parameter set to a configuration file
pub fn save_params(params: &Params, path: &Path) -> SimResult<()> {
    fs::write(path, render_params(params))?;
    Ok(())
}

fn flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}

fn join<T: ToString>(items: &[T]) -> String {
    if items.is_empty() {
        // an empty value token would break the two-token line format
        return "-".to_string();
    }
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
