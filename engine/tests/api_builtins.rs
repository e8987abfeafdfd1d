use tourney_engine::api::{preview_teams, simulate_many, simulate_tournament, RunConfig};
use tourney_engine::TournamentConfig;

fn builtin(id: &str, team_count: usize, seed: u64) -> RunConfig {
    RunConfig {
        catalog_id: Some(id.into()),
        catalog_path: None,
        record_path: None,
        tournament: TournamentConfig::default()
            .with_team_count(team_count)
            .with_seed(seed),
    }
}

#[test]
fn mini_catalog_runs_a_four_team_cup() {
    let report = simulate_tournament(builtin("mini", 4, 2025)).unwrap();
    assert_eq!(report.seed, 2025);
    assert_eq!(report.team_count, 4);
    assert_eq!(report.rounds.len(), 2);
    assert_eq!(report.rounds[1].matches.len(), 1);
    assert_eq!(report.rounds[1].matches[0].winner, report.champion.name);
    assert!(report.log.first().unwrap().starts_with("[ROUND] 1"));
    assert!(report.log.last().unwrap().starts_with("[CHAMPION]"));
}

#[test]
fn starter_catalog_runs_the_reference_setup() {
    let report = simulate_tournament(builtin("starter", 32, 1)).unwrap();
    let labels: Vec<&str> = report.rounds.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, ["Round of 32", "Round of 16", "Quarter-final", "Semi-final", "Final"]);
    let matches: Vec<usize> = report.rounds.iter().map(|r| r.matches.len()).collect();
    assert_eq!(matches, [16, 8, 4, 2, 1]);
    assert_eq!(report.champion.members.len(), 6);
    assert_eq!(report.ceiling_decisions, 0);
}

#[test]
fn not_enough_creatures_is_fatal() {
    let err = simulate_tournament(builtin("mini", 8, 1)).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("not enough eligible creatures: need 48, have 24"), "{msg}");
}

#[test]
fn bad_team_count_is_fatal() {
    let err = simulate_tournament(builtin("mini", 3, 1)).unwrap_err();
    assert!(format!("{err:#}").contains("power of two"));
}

#[test]
fn unknown_builtin_is_fatal() {
    let err = simulate_tournament(builtin("nope", 4, 1)).unwrap_err();
    assert!(err.to_string().contains("unknown built-in catalog"));
}

#[test]
fn preview_builds_disjoint_teams() {
    let preview = preview_teams(builtin("mini", 4, 77)).unwrap();
    assert_eq!(preview.teams.len(), 4);
    let mut ids: Vec<u32> = preview
        .teams
        .iter()
        .flat_map(|t| t.members.iter().map(|m| m.id().0))
        .collect();
    assert_eq!(ids.len(), 24);
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 24);
    // The mini catalog's two zero-health entries never make a team.
    assert!(!ids.contains(&5) && !ids.contains(&20));
}

#[test]
fn many_runs_summarise() {
    let stats = simulate_many(builtin("mini", 4, 10), 5).unwrap();
    assert_eq!(stats.samples, 5);
    assert_eq!(stats.base_seed, 10);
    assert!(!stats.top_creatures.is_empty() && stats.top_creatures.len() <= 10);
    assert!(stats.top_creatures.windows(2).all(|w| w[0].titles >= w[1].titles));
    assert!(stats.mean_exchanges_per_match > 0.0);
}
