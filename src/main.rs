//! SWEEPERS - CLI entry point.
//!
//! Headless neuroevolution runs with checkpointing.

use clap::{Parser, Subcommand};
use sweepers::checkpoint::{Checkpoint, CheckpointManager};
use sweepers::{benchmark, Config, World};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "sweepers")]
#[command(version)]
#[command(about = "Neuroevolution simulator: mine sweepers bred by a genetic algorithm")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a new simulation
    Run {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Number of generations to simulate
        #[arg(short, long, default_value = "100")]
        generations: u64,

        /// Output directory for checkpoints
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Quiet mode (minimal output)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Resume simulation from checkpoint
    Resume {
        /// Checkpoint file to resume from
        #[arg(short, long)]
        checkpoint: PathBuf,

        /// Number of additional generations
        #[arg(short, long, default_value = "100")]
        generations: u64,

        /// Output directory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of generations
        #[arg(short, long, default_value = "5")]
        generations: u64,

        /// Number of sweepers
        #[arg(short, long, default_value = "45")]
        sweepers: usize,
    },

    /// Generate default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },

    /// Analyze a checkpoint file
    Analyze {
        /// Checkpoint file
        checkpoint: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            generations,
            output,
            seed,
            quiet,
        } => run_simulation(config, generations, output, seed, quiet),

        Commands::Resume {
            checkpoint,
            generations,
            output,
        } => resume_simulation(checkpoint, generations, output),

        Commands::Benchmark {
            generations,
            sweepers,
        } => run_benchmark(generations, sweepers),

        Commands::Init { output } => generate_config(output),

        Commands::Analyze { checkpoint } => analyze_checkpoint(checkpoint),
    }
}

fn run_simulation(
    config_path: PathBuf,
    generations: u64,
    output: PathBuf,
    seed: Option<u64>,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = if config_path.exists() {
        println!("Loading config from: {:?}", config_path);
        Config::from_file(&config_path)?
    } else {
        println!("Using default configuration");
        Config::default()
    };

    std::fs::create_dir_all(&output)?;

    let mut world = if let Some(s) = seed {
        println!("Using seed: {}", s);
        World::new_with_seed(config.clone(), s)
    } else {
        World::new(config.clone())
    };

    println!("Starting simulation");
    println!("  Sweepers: {}", world.population());
    println!(
        "  Arena: {}x{}",
        config.arena.width, config.arena.height
    );
    println!("  Generations: {}", generations);
    println!();

    let mut checkpoint_mgr = CheckpointManager::new(
        output.to_string_lossy().to_string(),
        config.logging.checkpoint_interval,
        10, // Keep last 10 checkpoints
    );

    let start = Instant::now();
    let stats_interval = config.logging.stats_interval;

    for _ in 0..generations {
        world.run_generations(1);

        if !quiet && world.generation % stats_interval == 0 {
            println!("{}", world.stats.summary());
        }

        if checkpoint_mgr.should_save(world.generation) {
            let checkpoint = world.create_checkpoint();
            match checkpoint_mgr.save(&checkpoint) {
                Ok(path) => {
                    if !quiet {
                        println!("  Checkpoint saved: {}", path);
                    }
                }
                Err(e) => eprintln!("  Checkpoint error: {}", e),
            }
        }
    }

    let elapsed = start.elapsed();
    let ticks = generations * config.evolution.ticks_per_generation;

    println!();
    println!("=== Simulation Complete ===");
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Generations: {}", world.generation);
    println!("Speed: {:.1} ticks/s", ticks as f64 / elapsed.as_secs_f64());
    println!("Best fitness: {:.1}", world.best_fitness());
    println!("Average fitness: {:.2}", world.avg_fitness());

    let final_checkpoint = world.create_checkpoint();
    let final_path = output.join("checkpoint_final.bin");
    final_checkpoint.save(&final_path)?;
    println!("Final checkpoint: {:?}", final_path);

    let stats_path = output.join("stats_history.json");
    world
        .stats_history
        .save(stats_path.to_string_lossy().as_ref())?;
    println!("Stats history: {:?}", stats_path);

    Ok(())
}

fn resume_simulation(
    checkpoint_path: PathBuf,
    generations: u64,
    output: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading checkpoint: {:?}", checkpoint_path);

    let checkpoint = Checkpoint::load(&checkpoint_path)?;
    let mut world = World::from_checkpoint(checkpoint);

    println!("Resumed at generation {}", world.generation);
    println!("Sweepers: {}", world.population());
    println!("Running {} additional generations", generations);
    println!();

    std::fs::create_dir_all(&output)?;

    let mut checkpoint_mgr = CheckpointManager::new(
        output.to_string_lossy().to_string(),
        world.config.logging.checkpoint_interval,
        10,
    );

    let start = Instant::now();
    let stats_interval = world.config.logging.stats_interval;
    let target = world.generation + generations;

    while world.generation < target {
        world.run_generations(1);

        if world.generation % stats_interval == 0 {
            println!("{}", world.stats.summary());
        }

        if checkpoint_mgr.should_save(world.generation) {
            let checkpoint = world.create_checkpoint();
            if let Ok(path) = checkpoint_mgr.save(&checkpoint) {
                println!("  Checkpoint: {}", path);
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("=== Resume Complete ===");
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Final generation: {}", world.generation);
    println!("Best fitness: {:.1}", world.best_fitness());

    Ok(())
}

fn run_benchmark(generations: u64, sweepers: usize) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== SWEEPERS Benchmark ===");
    println!("Generations: {}", generations);
    println!("Sweepers: {}", sweepers);
    println!();

    let result = benchmark(generations, sweepers);
    println!("{}", result);

    Ok(())
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    config.save(&output)?;
    println!("Configuration saved to: {:?}", output);
    Ok(())
}

fn analyze_checkpoint(checkpoint_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Checkpoint Analysis ===");
    println!("File: {:?}", checkpoint_path);
    println!();

    let checkpoint = Checkpoint::load(&checkpoint_path)?;

    println!("Generation: {}", checkpoint.generation);
    println!("Tick: {}", checkpoint.tick);
    println!("Sweepers: {}", checkpoint.sweepers.len());
    println!("Mines: {}", checkpoint.arena.mines.len());
    println!("Hazards: {}", checkpoint.arena.hazards.len());
    println!("Status: {}", checkpoint.status);
    println!();

    if !checkpoint.population.is_empty() {
        let fitnesses: Vec<f64> = checkpoint.population.iter().map(|g| g.fitness()).collect();
        let best = fitnesses.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let avg = fitnesses.iter().sum::<f64>() / fitnesses.len() as f64;

        println!("Chromosome length: {}", checkpoint.population[0].len());
        println!("Best fitness: {:.1}", best);
        println!("Average fitness: {:.2}", avg);
    }

    println!();
    println!(
        "Checkpoint size: {:.2} MB",
        checkpoint.size_bytes() as f64 / 1_000_000.0
    );

    Ok(())
}
