use clap::Parser;
use engine::api::{simulate_many, RunConfig};
use engine::TournamentConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tourney-stats")]
#[command(about = "Monte Carlo sim: many tournaments over one catalog")]
struct Args {
    /// Number of tournaments to run
    #[arg(long, default_value_t = 100)]
    samples: u32,

    /// RNG base seed (sample i uses seed+i)
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Teams per tournament (power of two)
    #[arg(long, default_value_t = 32)]
    teams: usize,

    /// Built-in catalog name (ignored with --catalog)
    #[arg(long, default_value = "starter")]
    builtin: String,

    /// Creature catalog JSON file
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Tournament config file for combat rules (.yaml/.yml or .json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Increase log verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    engine::init_tracing(args.verbose);

    let base = match args.config.as_deref() {
        Some(path) => TournamentConfig::load(path)?,
        None => TournamentConfig::default(),
    };
    let cfg = RunConfig {
        catalog_id: Some(args.builtin.clone()),
        catalog_path: args.catalog.as_ref().map(|p| p.to_string_lossy().into_owned()),
        record_path: None,
        tournament: base.with_team_count(args.teams).with_seed(args.seed),
    };
    let stats = simulate_many(cfg, args.samples)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("tourney-stats results");
    println!("---------------------");
    println!("samples:            {}", stats.samples);
    println!("base seed:          {}", stats.base_seed);
    println!("teams:              {}", args.teams);
    match &args.catalog {
        Some(path) => println!("catalog:            {}", path.display()),
        None => println!("catalog:            {} (built-in)", args.builtin),
    }
    println!();
    println!("avg exchanges/match: {:.2}", stats.mean_exchanges_per_match);
    println!("ceiling decisions:   {}", stats.ceiling_decisions);
    println!();
    println!("most titles");
    for (rank, c) in stats.top_creatures.iter().enumerate() {
        println!("{:>3}. {:<16} {}", rank + 1, c.name, c.titles);
    }

    Ok(())
}
