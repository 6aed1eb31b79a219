//! Timestep negotiation demo binary
//!
//! Builds a seeded demo herd and labour force, registers a weaning activity
//! (from a TOML file or a built-in default), and runs the negotiation
//! protocol for a number of monthly steps.

use clap::Parser;
use muster::config::loader::{load_activity, parse_activity_toml};
use muster::core::types::ResourceKind;
use muster::pool::SharedPool;
use muster::simulation::{HerdActivity, Simulation, StepEvent};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

const DEFAULT_ACTIVITY: &str = r#"
    [activity]
    name = "wean-calves"

    [[activity.filter_group]]
    label = "calves"
    field = "age"
    op = "<"
    value = 8.0

    [activity.labour]
    rate = 2.0
    unit_size = 10.0
    measure = "per-unit"
    whole_units = true
    policy = "as-days-required"
    max_per_person = 3.0
    max_per_group = 12.0
    min_per_person = 0.5
    category = "husbandry"

    [[activity.labour.group]]
    label = "stockmen"
    field = "supplied"
    op = ">"
    value = 0.0

    [activity.effect]
    set_status = "weaned"
    move_to = "weaner paddock"

    [activity.effect.condition]
    field = "weight"
    op = ">="
    value = 100.0
"#;

#[derive(Parser, Debug)]
#[command(name = "step_sim", about = "Run the resource negotiation protocol")]
struct Args {
    /// Number of monthly timesteps to run
    #[arg(long, default_value_t = 12)]
    steps: u64,

    /// Herd size
    #[arg(long, default_value_t = 100)]
    herd: u32,

    /// Number of workers in the labour force
    #[arg(long, default_value_t = 3)]
    workers: u32,

    /// Labour-days added to the pool each step
    #[arg(long, default_value_t = 20.0)]
    labour_per_step: f64,

    /// RNG seed for the demo herd
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Activity definition TOML (uses the built-in weaning demo if omitted)
    #[arg(long)]
    activity: Option<PathBuf>,

    /// Dump events as JSON instead of a text summary
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> muster::core::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.activity {
        Some(path) => load_activity(path)?,
        None => parse_activity_toml(DEFAULT_ACTIVITY)?,
    };

    let mut pool = SharedPool::new();
    pool.set_balance(ResourceKind::Labour, args.labour_per_step);
    pool.set_balance(ResourceKind::Money, 0.0);

    let mut sim = Simulation::new(pool);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    for _ in 0..args.herd {
        let age = rng.gen_range(1.0..24.0);
        let weight = rng.gen_range(60.0..240.0);
        sim.herd.spawn(age, weight);
    }
    for _ in 0..args.workers {
        sim.labour_force
            .spawn_with(|m| m.with_supplied(20.0).with_paddock("homestead"));
    }
    sim.register(Box::new(HerdActivity::new(config)));

    println!("Running {} steps over {} head", args.steps, args.herd);
    println!("=====================================");

    for step in 0..args.steps {
        let events = sim.run_step();
        if args.json {
            println!("{}", serde_json::to_string(&events)?);
            sim.pool.top_up(ResourceKind::Labour, args.labour_per_step);
            continue;
        }
        for event in &events {
            if let StepEvent::ActivityFinished {
                activity,
                status,
                performed,
                quota,
                eligible,
            } = event
            {
                println!(
                    "step {:3}  {:<16} {:?}: {}/{} performed, {} eligible",
                    step, activity, status, performed, quota, eligible
                );
            }
        }
        sim.pool.top_up(ResourceKind::Labour, args.labour_per_step);
    }

    if !sim.diagnostics().is_empty() {
        println!("\n--- Configuration Warnings ---");
        for warning in sim.diagnostics().warnings() {
            println!("{}", warning);
        }
    }

    Ok(())
}
