//! Human-readable log lines derived from structured events. Nothing in the
//! engine reads these back.

use crate::bracket::{BracketObserver, Progress, Round};
use crate::combat::{BattleEvent, CombatOutcome, Combatant, Decision, Side, Strike};
use crate::team::Team;

pub fn round_header(round: &Round) -> String {
    format!("[ROUND] {} ({})", round.number, round.label)
}

pub fn match_header(first: &Team, second: &Team) -> String {
    format!("[MATCH] {} vs {}", first.name, second.name)
}

fn who(c: &Combatant, teams: &[String; 2]) -> String {
    let team = match c.side {
        Side::First => &teams[0],
        Side::Second => &teams[1],
    };
    format!("{} ({})", c.name, team)
}

fn strike_line(tag: &str, s: &Strike, teams: &[String; 2]) -> String {
    format!(
        "[{}][{}] → {} dmg={}{}",
        tag,
        who(&s.attacker, teams),
        s.defender.name,
        s.damage,
        if s.critical { " CRIT!" } else { "" }
    )
}

/// `teams` holds the side-1 and side-2 team names.
pub fn describe(event: &BattleEvent, teams: &[String; 2]) -> String {
    match event {
        BattleEvent::Attack(s) => strike_line("ATTACK", s, teams),
        BattleEvent::Counter(s) => strike_line("COUNTER", s, teams),
        BattleEvent::KnockOut { creature, .. } => {
            format!("[KO][{}] is knocked out", who(creature, teams))
        }
    }
}

pub fn verdict(outcome: &CombatOutcome) -> Vec<String> {
    let summary = &outcome.summary;
    let mut lines = Vec::new();
    if outcome.decided_by == Decision::TurnCeiling {
        lines.push(format!(
            "[LIMIT] {} exchanges reached; {} wins on remaining HP",
            outcome.exchanges, summary.match_winner
        ));
    }
    lines.push(format!(
        "[WIN] {} wins after {} exchanges",
        summary.match_winner, outcome.exchanges
    ));
    lines
}

/// Every line for one resolved match, header to verdict.
pub fn match_log(outcome: &CombatOutcome) -> Vec<String> {
    let summary = &outcome.summary;
    let names = [summary.team1.name.clone(), summary.team2.name.clone()];
    let mut lines = vec![format!("[MATCH] {} vs {}", names[0], names[1])];
    lines.extend(summary.events.iter().map(|e| describe(e, &names)));
    lines.extend(verdict(outcome));
    lines
}

pub fn champion_line(team: &Team) -> String {
    let roster: Vec<&str> = team.members.iter().map(|m| m.name()).collect();
    format!("[CHAMPION] {} [{}]", team.name, roster.join(", "))
}

/// Observer that turns the live tournament into log lines.
pub struct Narrator<F: FnMut(String)> {
    emit: F,
    names: [String; 2],
}

impl<F: FnMut(String)> Narrator<F> {
    pub fn new(emit: F) -> Self {
        Self { emit, names: [String::new(), String::new()] }
    }
}

impl<F: FnMut(String)> BracketObserver for Narrator<F> {
    fn round_started(&mut self, round: &Round) {
        (self.emit)(round_header(round));
    }

    fn match_started(&mut self, _progress: Progress, first: &Team, second: &Team) {
        self.names = [first.name.clone(), second.name.clone()];
        (self.emit)(match_header(first, second));
    }

    fn battle_event(&mut self, event: &BattleEvent) {
        (self.emit)(describe(event, &self.names));
    }

    fn match_resolved(&mut self, _progress: Progress, _round: &Round, outcome: &CombatOutcome) {
        for line in verdict(outcome) {
            (self.emit)(line);
        }
    }
}
