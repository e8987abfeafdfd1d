use std::{fs, io::BufWriter};

use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::bracket::{Bracket, BracketEngine, BracketObserver, TournamentOutcome};
use crate::config::TournamentConfig;
use crate::content::builtin_catalog;
use crate::creature::Catalog;
use crate::error::SetupError;
use crate::narrate::{champion_line, Narrator};
use crate::recorder::{JsonLinesRecorder, MatchRecorder, NullRecorder};
use crate::roster::{ensure_capacity, select_eligible, shuffle};
use crate::team::{form_teams, Team, TeamId, ROSTER_SIZE};
use crate::{Dice, RandomSource};

const DEFAULT_CATALOG: &str = "starter";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RunConfig {
    /// Built-in catalog name. Ignored when `catalog_path` is set.
    #[serde(default)]
    pub catalog_id: Option<String>,
    #[serde(default)]
    pub catalog_path: Option<String>,
    /// Append one JSON line per resolved match to this file.
    #[serde(default)]
    pub record_path: Option<String>,
    #[serde(flatten)]
    pub tournament: TournamentConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MatchReport {
    pub first: String,
    pub second: String,
    pub winner: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RoundReport {
    pub number: u32,
    pub label: String,
    pub matches: Vec<MatchReport>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TournamentReport {
    pub seed: u64,
    pub team_count: usize,
    pub champion: Team,
    pub rounds: Vec<RoundReport>,
    pub total_exchanges: u64,
    pub ceiling_decisions: u32,
    pub log: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CreatureTitles {
    pub name: String,
    pub titles: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ManyStats {
    pub samples: u32,
    pub base_seed: u64,
    pub mean_exchanges_per_match: f64,
    pub ceiling_decisions: u32,
    /// Creatures ranked by how many champion rosters they appeared in.
    pub top_creatures: Vec<CreatureTitles>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TeamsPreview {
    pub seed: u64,
    pub teams: Vec<Team>,
}

/// A finished tournament together with the seed that reproduces it.
#[derive(Debug, Clone)]
pub struct TournamentRun {
    pub seed: u64,
    pub outcome: TournamentOutcome,
}

/// Parse catalog JSON already read from `origin` (a path, for error context).
pub fn catalog_from_text(text: &str, origin: &str) -> Result<Catalog> {
    Catalog::from_json_str(text).with_context(|| format!("in {}", origin))
}

pub fn load_builtin_catalog(id: &str) -> Result<Catalog> {
    let Some(text) = builtin_catalog(id) else {
        bail!("unknown built-in catalog '{}'", id);
    };
    Catalog::from_json_str(text).with_context(|| format!("in built-in catalog '{}'", id))
}

pub fn load_catalog(cfg: &RunConfig) -> Result<Catalog> {
    if let Some(path) = &cfg.catalog_path {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog JSON: {}", path))?;
        return catalog_from_text(&text, path);
    }
    load_builtin_catalog(cfg.catalog_id.as_deref().unwrap_or(DEFAULT_CATALOG))
}

fn resolve_seed(config: &TournamentConfig) -> u64 {
    match config.seed {
        Some(seed) => seed,
        None => {
            let seed = Dice::entropy_seed();
            info!(seed, "no seed configured; drew one from OS entropy");
            seed
        }
    }
}

/// Eligibility filter, capacity check, shuffle, partition. Nothing is built
/// when a precondition fails.
pub fn build_teams(
    catalog: &Catalog,
    team_count: usize,
    rng: &mut impl RandomSource,
) -> Result<Vec<Team>, SetupError> {
    if !team_count.is_power_of_two() {
        return Err(SetupError::TeamCountNotPowerOfTwo(team_count));
    }
    let mut pool = select_eligible(catalog.records());
    ensure_capacity(pool.len(), team_count, ROSTER_SIZE)?;
    shuffle(&mut pool, rng);
    form_teams(&pool, team_count, ROSTER_SIZE)
}

/// Run a full tournament over `catalog`. Team formation and every match draw
/// from one generator seeded once, so a fixed seed replays the whole run.
pub fn run_tournament(
    catalog: &Catalog,
    config: &TournamentConfig,
    recorder: &mut dyn MatchRecorder,
    observer: &mut dyn BracketObserver,
) -> Result<TournamentRun, SetupError> {
    let seed = resolve_seed(config);
    let mut dice = Dice::from_seed(seed);
    let teams = build_teams(catalog, config.team_count, &mut dice)?;
    let engine = BracketEngine::new(teams, config.rules.clone())?;
    let outcome = engine.run(&mut dice, recorder, observer);
    Ok(TournamentRun { seed, outcome })
}

pub fn open_recorder(path: Option<&str>) -> Box<dyn MatchRecorder> {
    let Some(path) = path else {
        return Box::new(NullRecorder);
    };
    match fs::OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => Box::new(JsonLinesRecorder::new(BufWriter::new(file))),
        Err(e) => {
            warn!(path, error = %e, "cannot open battle archive; matches will not be recorded");
            Box::new(NullRecorder)
        }
    }
}

fn team_name(teams: &[Team], id: TeamId) -> String {
    teams[id.index()].name.clone()
}

pub fn round_reports(bracket: &Bracket, teams: &[Team]) -> Vec<RoundReport> {
    bracket
        .rounds()
        .iter()
        .map(|round| RoundReport {
            number: round.number,
            label: round.label.clone(),
            matches: round
                .matches
                .iter()
                .map(|m| MatchReport {
                    first: team_name(teams, m.first),
                    second: team_name(teams, m.second),
                    winner: m.winner.map(|w| team_name(teams, w)).unwrap_or_default(),
                })
                .collect(),
        })
        .collect()
}

pub fn simulate_tournament(cfg: RunConfig) -> Result<TournamentReport> {
    let catalog = load_catalog(&cfg)?;
    let mut recorder = open_recorder(cfg.record_path.as_deref());
    simulate_with_catalog(&catalog, &cfg.tournament, recorder.as_mut())
}

pub fn simulate_with_catalog(
    catalog: &Catalog,
    config: &TournamentConfig,
    recorder: &mut dyn MatchRecorder,
) -> Result<TournamentReport> {
    let mut log = Vec::new();
    let mut narrator = Narrator::new(|line| log.push(line));
    let run = run_tournament(catalog, config, recorder, &mut narrator)
        .context("tournament setup failed")?;
    let outcome = run.outcome;
    let champion = outcome.champion_team().clone();
    log.push(champion_line(&champion));

    Ok(TournamentReport {
        seed: run.seed,
        team_count: outcome.teams.len(),
        rounds: round_reports(&outcome.bracket, &outcome.teams),
        champion,
        total_exchanges: outcome.total_exchanges,
        ceiling_decisions: outcome.ceiling_decisions,
        log,
    })
}

pub fn preview_teams(cfg: RunConfig) -> Result<TeamsPreview> {
    let catalog = load_catalog(&cfg)?;
    let seed = resolve_seed(&cfg.tournament);
    let mut dice = Dice::from_seed(seed);
    let teams = build_teams(&catalog, cfg.tournament.team_count, &mut dice)
        .context("team formation failed")?;
    Ok(TeamsPreview { seed, teams })
}

/// Run `samples` tournaments; sample `i` uses `base_seed + i`.
pub fn simulate_many(cfg: RunConfig, samples: u32) -> Result<ManyStats> {
    let catalog = load_catalog(&cfg)?;
    let base_seed = resolve_seed(&cfg.tournament);

    let mut titles: IndexMap<String, u32> = IndexMap::new();
    let mut exchanges = 0u64;
    let mut matches = 0u64;
    let mut ceiling_decisions = 0u32;

    for i in 0..samples {
        let config = cfg
            .tournament
            .clone()
            .with_seed(base_seed.wrapping_add(i as u64));
        let run = run_tournament(&catalog, &config, &mut NullRecorder, &mut ())
            .context("tournament setup failed")?;
        let outcome = run.outcome;
        exchanges += outcome.total_exchanges;
        matches += outcome.teams.len().saturating_sub(1) as u64;
        ceiling_decisions += outcome.ceiling_decisions;
        for member in &outcome.champion_team().members {
            *titles.entry(member.name().to_string()).or_insert(0) += 1;
        }
    }

    let mut top_creatures: Vec<CreatureTitles> = titles
        .into_iter()
        .map(|(name, titles)| CreatureTitles { name, titles })
        .collect();
    // Stable sort keeps first-seen order among equal counts.
    top_creatures.sort_by(|a, b| b.titles.cmp(&a.titles));
    top_creatures.truncate(10);

    Ok(ManyStats {
        samples,
        base_seed,
        mean_exchanges_per_match: if matches == 0 {
            0.0
        } else {
            exchanges as f64 / matches as f64
        },
        ceiling_decisions,
        top_creatures,
    })
}
