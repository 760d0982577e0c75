//! Headless episode driver.
//!
//! Builds a randomized scenario, runs one full episode with a simple
//! random-patrol policy (the stand-in for an external learning host) and
//! prints per-tick statistics.

use clap::Parser;
use fire_response_core::coordination::RewardConfig;
use fire_response_core::scenario::{AgentSpec, FacilityPenalties, FireModelParams, TargetSpec};
use fire_response_core::{
    AgentClass, AgentCommand, HotspotArea, RewardFn, ScenarioConfig, SimRng, Simulation,
    TargetCategory, Vec3,
};

/// Joint perception-action wildfire episode, headless.
#[derive(Parser, Debug)]
#[command(name = "demo-headless")]
#[command(about = "Run a seeded wildfire response episode without a UI", long_about = None)]
struct Args {
    /// World side length
    #[arg(long, default_value_t = 100)]
    world_size: u32,

    /// Episode length in ticks
    #[arg(long, default_value_t = 200)]
    duration: u32,

    /// Number of fire areas
    #[arg(long, default_value_t = 2)]
    fire_areas: u32,

    /// Number of perception agents
    #[arg(short = 'p', long, default_value_t = 2)]
    perception_agents: u32,

    /// Number of suppression agents
    #[arg(short = 'a', long, default_value_t = 2)]
    action_agents: u32,

    /// Number of hybrid agents
    #[arg(long, default_value_t = 0)]
    hybrid_agents: u32,

    /// Reward function: marginal, time, or fire-count
    #[arg(long, default_value = "marginal")]
    reward: String,

    /// RNG seed; same seed, same episode
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Print stats every N ticks
    #[arg(long, default_value_t = 10)]
    report_every: u32,
}

fn parse_reward(name: &str) -> Result<RewardFn, String> {
    match name {
        "marginal" => Ok(RewardFn::MarginalProgress),
        "time" => Ok(RewardFn::TimePenalty),
        "fire-count" => Ok(RewardFn::FireCountPenalty),
        other => Err(format!(
            "unknown reward function '{other}' (options: marginal, time, fire-count)"
        )),
    }
}

/// Randomized scenario in the style of the interactive game setups:
/// fire areas away from the borders, the team starting from a corner
/// base, a few facilities scattered over the far half of the map.
fn build_scenario(args: &Args, rng: &mut SimRng) -> ScenarioConfig {
    let margin = 20;
    let size = args.world_size as i32;
    let wind_options = [0.0, 45.0, 90.0, 135.0, 180.0];

    let hotspots = (0..args.fire_areas)
        .map(|_| {
            let cx = rng.uniform_i32(margin, size - margin);
            let cy = rng.uniform_i32(margin, size - margin);
            let num_points = rng.uniform_i32(5, 15) as u32;
            let wind_direction = wind_options[rng.index(wind_options.len())];
            HotspotArea::around((cx, cy), 5, num_points, 5.0, 5.0, wind_direction)
        })
        .collect();

    let home = [args.world_size as f32 - 10.0, args.world_size as f32 / 10.0];
    let spec = |class: AgentClass| AgentSpec {
        class,
        home,
        speed: 5.0,
        battery_capacity: 2000.0,
        battery_distance_cost: 0.1,
        battery_wait_cost: 0.05,
        tank_capacity: 20,
    };
    let mut agents = Vec::new();
    for _ in 0..args.perception_agents {
        agents.push(spec(AgentClass::Perception));
    }
    for _ in 0..args.action_agents {
        agents.push(spec(AgentClass::Suppression));
    }
    for _ in 0..args.hybrid_agents {
        agents.push(spec(AgentClass::Hybrid));
    }

    let far = args.world_size as f32 * 0.75;
    let targets = vec![
        TargetSpec {
            category: TargetCategory::House,
            center: [far, far],
            width: 10.0,
            height: 10.0,
        },
        TargetSpec {
            category: TargetCategory::Hospital,
            center: [far, args.world_size as f32 * 0.25],
            width: 10.0,
            height: 10.0,
        },
        TargetSpec {
            category: TargetCategory::Base,
            center: home,
            width: 10.0,
            height: 10.0,
        },
    ];

    ScenarioConfig {
        world_size: args.world_size,
        duration: args.duration,
        hotspots,
        targets,
        agents,
        comm_hop: 30.0,
        fire: FireModelParams::default(),
        temporal_penalty_exponent: 1.25,
        fire_propagation_weight: 0.1,
        action_pruning_confidence: 0.9,
        hybrid_pruning_confidence: 0.8,
        facility_penalties: FacilityPenalties::default(),
        completion_threshold: 0.95,
    }
}

/// Random-patrol policy: idle agents get a fresh random goal, flying
/// agents occasionally change altitude, suppressors always try to dump.
fn policy(sim: &Simulation, rng: &mut SimRng) -> Vec<AgentCommand> {
    let size = sim.config().world_size as f32;
    sim.agents()
        .iter()
        .map(|agent| {
            let needs_goal = agent.goals.current().is_none() && agent.active;
            let goal = needs_goal.then(|| {
                Vec3::new(
                    rng.uniform(5.0, size - 5.0),
                    rng.uniform(5.0, size - 5.0),
                    rng.uniform(5.0, 15.0),
                )
            });
            let altitude = (agent.capabilities().can_sense && rng.uniform(0.0, 1.0) < 0.1)
                .then(|| rng.uniform(5.0, 15.0));
            AgentCommand {
                goal,
                altitude,
                suppress: agent.capabilities().can_suppress,
            }
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let reward_fn = parse_reward(&args.reward)?;
    if args.world_size < 40 {
        return Err("world size must be at least 40".into());
    }

    let mut scenario_rng = SimRng::seed_from_u64(args.seed.wrapping_add(1));
    let config = build_scenario(&args, &mut scenario_rng);
    let reward = RewardConfig {
        function: reward_fn,
        ..RewardConfig::default()
    };

    println!(
        "world {}x{}, {} fire areas, {} agents, reward '{}', seed {}",
        args.world_size,
        args.world_size,
        args.fire_areas,
        config.agents.len(),
        args.reward,
        args.seed
    );

    let mut policy_rng = SimRng::seed_from_u64(args.seed.wrapping_add(2));
    let mut sim = Simulation::new(config, reward, args.seed)?;
    let mut total_reward = 0.0;
    let report_every = args.report_every.max(1);

    loop {
        let commands = policy(&sim, &mut policy_rng);
        let report = sim.step(&commands);
        total_reward += report.global_reward;

        if report.tick % report_every == 0 || report.done {
            println!(
                "tick {:4} | burning {:4} | sensed {:4} | extinguished {:4} | perception {:5.1}% | action {:5.1}% | reward {:9.2}",
                report.tick,
                sim.tracker().on_fire_count(),
                sim.tracker().sensed_count(),
                sim.tracker().pruned_count(),
                report.score.perception_completion,
                report.score.action_completion,
                total_reward,
            );
        }

        if report.done {
            let score = report.score;
            println!();
            println!(
                "episode {} after {} ticks",
                if report.won { "WON" } else { "over" },
                report.tick
            );
            println!("  overall completion    {:6.2}%", score.overall_completion);
            println!("  perception completion {:6.2}%", score.perception_completion);
            println!("  action completion     {:6.2}%", score.action_completion);
            println!(
                "  safe facilities       {}/{}",
                score.safe_facilities, score.facility_count
            );
            println!("  negative score        {:.2}", score.negative_score);
            println!("  of expected worst     {:6.2}%", score.negative_percent);
            println!("  accumulated reward    {:.2}", total_reward);
            break;
        }
    }
    Ok(())
}
