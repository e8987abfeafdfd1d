use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use encoding_rs::Encoding;
use engine::api::{
    build_teams, catalog_from_text, load_builtin_catalog, open_recorder, run_tournament,
    simulate_with_catalog,
};
use engine::combat::actions::damage_for;
use engine::narrate::{champion_line, Narrator};
use engine::{Catalog, CombatRules, Dice, TournamentConfig};
use std::{fs, path::Path, path::PathBuf, thread, time::Duration};

#[derive(Args)]
struct CatalogArgs {
    /// Creature catalog JSON file (array of records)
    #[arg(long, conflicts_with = "builtin")]
    catalog: Option<PathBuf>,
    /// Built-in catalog name (starter | mini)
    #[arg(long, default_value = "starter")]
    builtin: String,
}

#[derive(Subcommand)]
enum Cmd {
    /// Run a full single-elimination tournament
    Run {
        #[command(flatten)]
        source: CatalogArgs,
        /// RNG seed for a replayable run (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Number of teams; must be a power of two
        #[arg(long)]
        teams: Option<usize>,
        /// Tournament config file (.yaml/.yml or .json)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Append one JSON line per match to this file
        #[arg(long)]
        record: Option<PathBuf>,
        /// Print the full report as JSON instead of the live log
        #[arg(long, default_value_t = false)]
        json: bool,
        /// Delay between log lines in milliseconds (display only)
        #[arg(long, default_value_t = 0)]
        pace_ms: u64,
    },
    /// Form the teams for a seed and print them
    Teams {
        #[command(flatten)]
        source: CatalogArgs,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 32)]
        teams: usize,
        /// Print JSON instead of one line per team
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Dump a built-in catalog as JSON (stdout)
    Catalog {
        #[arg(long, default_value = "starter")]
        id: String,
        /// Pretty-print JSON
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Evaluate the damage formula for one strike
    Damage {
        #[arg(long)]
        attack: u32,
        #[arg(long)]
        defense: u32,
        /// Apply the critical multiplier
        #[arg(long, default_value_t = false)]
        crit: bool,
    },
}

#[derive(Parser)]
#[command(name = "tourney")]
#[command(about = "Creature tournament simulator")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Cmd,
}

fn read_text_auto(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

fn load_catalog(source: &CatalogArgs) -> anyhow::Result<Catalog> {
    match &source.catalog {
        Some(path) => catalog_from_text(&read_text_auto(path)?, &path.display().to_string()),
        None => load_builtin_catalog(&source.builtin),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<TournamentConfig> {
    match path {
        Some(path) => TournamentConfig::from_text(&read_text_auto(path)?, path),
        None => Ok(TournamentConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    engine::init_tracing(cli.verbose);

    match cli.cmd {
        Cmd::Run {
            source,
            seed,
            teams,
            config,
            record,
            json,
            pace_ms,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            if let Some(seed) = seed {
                cfg.seed = Some(seed);
            }
            if let Some(teams) = teams {
                cfg.team_count = teams;
            }
            let catalog = load_catalog(&source)?;
            let record = record.map(|p| p.to_string_lossy().into_owned());
            let mut recorder = open_recorder(record.as_deref());

            if json {
                let report = simulate_with_catalog(&catalog, &cfg, recorder.as_mut())?;
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            let pace = Duration::from_millis(pace_ms);
            let mut narrator = Narrator::new(|line: String| {
                println!("{}", line);
                if !pace.is_zero() {
                    thread::sleep(pace);
                }
            });
            let run = run_tournament(&catalog, &cfg, recorder.as_mut(), &mut narrator)
                .context("tournament setup failed")?;
            println!("{}", champion_line(run.outcome.champion_team()));
            println!(
                "seed={} rounds={} exchanges={}",
                run.seed,
                run.outcome.bracket.len(),
                run.outcome.total_exchanges
            );
        }
        Cmd::Teams {
            source,
            seed,
            teams,
            json,
        } => {
            let catalog = load_catalog(&source)?;
            let mut dice = Dice::from_seed(seed);
            let built = build_teams(&catalog, teams, &mut dice).context("team formation failed")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&built)?);
            } else {
                for team in &built {
                    let roster: Vec<String> = team
                        .members
                        .iter()
                        .map(|m| {
                            let s = m.creature.stats;
                            format!(
                                "{} (hp {} atk {} def {} spd {})",
                                m.name(),
                                s.hp,
                                s.attack,
                                s.defense,
                                s.speed
                            )
                        })
                        .collect();
                    println!("{}: {}", team.name, roster.join(", "));
                }
            }
        }
        Cmd::Catalog { id, pretty } => {
            let catalog = load_builtin_catalog(&id)?;
            let records: Vec<_> = catalog.records().collect();
            if pretty {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                println!("{}", serde_json::to_string(&records)?);
            }
        }
        Cmd::Damage {
            attack,
            defense,
            crit,
        } => {
            let dmg = damage_for(attack, defense, crit, &CombatRules::default());
            println!("{}", dmg);
        }
    }
    Ok(())
}
