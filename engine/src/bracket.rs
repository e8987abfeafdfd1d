//! Single-elimination bracket.
//!
//! Each round pairs the surviving teams by position (0 vs 1, 2 vs 3, ...),
//! plays the matches in list order, and carries the winners forward in match
//! order until one team is left.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::combat::{Battle, BattleEvent, BattleState, CombatOutcome, CombatRules, Decision, Side};
use crate::error::SetupError;
use crate::recorder::MatchRecorder;
use crate::team::{Team, TeamId};
use crate::RandomSource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub first: TeamId,
    pub second: TeamId,
    pub winner: Option<TeamId>,
}

impl Match {
    pub fn new(first: TeamId, second: TeamId) -> Self {
        Self { first, second, winner: None }
    }

    pub fn is_resolved(&self) -> bool {
        self.winner.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub number: u32,
    pub label: String,
    pub matches: Vec<Match>,
}

impl Round {
    pub fn is_complete(&self) -> bool {
        self.matches.iter().all(Match::is_resolved)
    }

    pub fn winners(&self) -> Vec<TeamId> {
        self.matches.iter().filter_map(|m| m.winner).collect()
    }
}

/// Completed rounds, oldest first. Append-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    rounds: Vec<Round>,
}

impl Bracket {
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Winner of the last round's only match.
    pub fn champion(&self) -> Option<TeamId> {
        match self.rounds.last() {
            Some(last) if last.matches.len() == 1 => last.matches[0].winner,
            _ => None,
        }
    }

    fn push(&mut self, round: Round) {
        debug_assert!(round.is_complete(), "only completed rounds enter the bracket");
        self.rounds.push(round);
    }
}

/// Display name of a round from the number of teams entering it.
pub fn round_label(teams_in_round: usize) -> String {
    match teams_in_round {
        2 => "Final".to_string(),
        4 => "Semi-final".to_string(),
        8 => "Quarter-final".to_string(),
        n => format!("Round of {n}"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketPhase {
    RoundPending,
    RoundInProgress,
    RoundComplete,
    TournamentComplete,
}

/// Position of a match within the tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub round: u32,
    pub match_index: usize,
    pub matches_in_round: usize,
}

/// Hooks for a display layer. Every method defaults to doing nothing, and
/// nothing an observer does can change the simulation.
pub trait BracketObserver {
    fn round_started(&mut self, _round: &Round) {}
    fn match_started(&mut self, _progress: Progress, _first: &Team, _second: &Team) {}
    fn battle_event(&mut self, _event: &BattleEvent) {}
    fn match_resolved(&mut self, _progress: Progress, _round: &Round, _outcome: &CombatOutcome) {}
    fn round_completed(&mut self, _bracket: &Bracket) {}
}

impl BracketObserver for () {}

#[derive(Debug, Clone)]
pub struct TournamentOutcome {
    pub champion: TeamId,
    pub bracket: Bracket,
    pub teams: Vec<Team>,
    pub total_exchanges: u64,
    pub ceiling_decisions: u32,
}

impl TournamentOutcome {
    pub fn champion_team(&self) -> &Team {
        &self.teams[self.champion.index()]
    }
}

pub struct BracketEngine {
    teams: Vec<Team>,
    rules: CombatRules,
    contenders: Vec<TeamId>,
    bracket: Bracket,
    current: Option<Round>,
    next_match: usize,
    phase: BracketPhase,
    total_exchanges: u64,
    ceiling_decisions: u32,
}

impl BracketEngine {
    /// `teams[i]` must carry ordinal `i + 1`. The count must be a power of two.
    pub fn new(teams: Vec<Team>, rules: CombatRules) -> Result<Self, SetupError> {
        if !teams.len().is_power_of_two() {
            return Err(SetupError::TeamCountNotPowerOfTwo(teams.len()));
        }
        if let Some((i, team)) = teams
            .iter()
            .enumerate()
            .find(|(i, t)| t.id.0 as usize != i + 1)
        {
            return Err(SetupError::TeamOrderMismatch { position: i + 1, found: team.id.0 });
        }
        rules.validate()?;
        let contenders = teams.iter().map(|t| t.id).collect();
        Ok(Self {
            teams,
            rules,
            contenders,
            bracket: Bracket::default(),
            current: None,
            next_match: 0,
            phase: BracketPhase::RoundPending,
            total_exchanges: 0,
            ceiling_decisions: 0,
        })
    }

    pub fn phase(&self) -> BracketPhase {
        self.phase
    }

    pub fn bracket(&self) -> &Bracket {
        &self.bracket
    }

    /// The round being played, if any.
    pub fn current_round(&self) -> Option<&Round> {
        self.current.as_ref()
    }

    /// 1-based number of the round being played or about to be played.
    pub fn round_number(&self) -> u32 {
        self.bracket.len() as u32 + 1
    }

    /// Index within the current round of the next match to play.
    pub fn match_index(&self) -> usize {
        self.next_match
    }

    pub fn contenders(&self) -> &[TeamId] {
        &self.contenders
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, id: TeamId) -> &Team {
        &self.teams[id.index()]
    }

    /// Advance the state machine by one transition. In `RoundInProgress` one
    /// transition is one match.
    pub fn step(
        &mut self,
        rng: &mut impl RandomSource,
        recorder: &mut dyn MatchRecorder,
        observer: &mut dyn BracketObserver,
    ) -> BracketPhase {
        match self.phase {
            BracketPhase::RoundPending => self.open_round(observer),
            BracketPhase::RoundInProgress => self.play_next_match(rng, recorder, observer),
            BracketPhase::RoundComplete => self.close_round(observer),
            BracketPhase::TournamentComplete => {}
        }
        self.phase
    }

    pub fn run(
        mut self,
        rng: &mut impl RandomSource,
        recorder: &mut dyn MatchRecorder,
        observer: &mut dyn BracketObserver,
    ) -> TournamentOutcome {
        while self.step(rng, recorder, observer) != BracketPhase::TournamentComplete {}
        let champion = self.contenders[0];
        info!(
            champion = %self.team(champion).name,
            rounds = self.bracket.len(),
            exchanges = self.total_exchanges,
            "tournament complete"
        );
        TournamentOutcome {
            champion,
            bracket: self.bracket,
            teams: self.teams,
            total_exchanges: self.total_exchanges,
            ceiling_decisions: self.ceiling_decisions,
        }
    }

    fn open_round(&mut self, observer: &mut dyn BracketObserver) {
        if self.contenders.len() == 1 {
            self.phase = BracketPhase::TournamentComplete;
            return;
        }
        let matches: Vec<Match> = self
            .contenders
            .chunks_exact(2)
            .map(|pair| Match::new(pair[0], pair[1]))
            .collect();
        debug_assert_eq!(matches.len() * 2, self.contenders.len());
        let round = Round {
            number: self.round_number(),
            label: round_label(self.contenders.len()),
            matches,
        };
        info!(
            round = round.number,
            label = %round.label,
            matches = round.matches.len(),
            "round started"
        );
        observer.round_started(&round);
        self.current = Some(round);
        self.next_match = 0;
        self.phase = BracketPhase::RoundInProgress;
    }

    fn play_next_match(
        &mut self,
        rng: &mut impl RandomSource,
        recorder: &mut dyn MatchRecorder,
        observer: &mut dyn BracketObserver,
    ) {
        let Some(round) = self.current.as_mut() else {
            self.phase = BracketPhase::RoundPending;
            return;
        };
        let index = self.next_match;
        let progress = Progress {
            round: round.number,
            match_index: index,
            matches_in_round: round.matches.len(),
        };
        let pairing = &round.matches[index];
        let (first_id, second_id) = (pairing.first, pairing.second);

        let (first, second) = pair_mut(&mut self.teams, first_id.index(), second_id.index());
        observer.match_started(progress, first, second);

        let mut battle = Battle::new(first, second, &self.rules);
        loop {
            let seen = battle.events().len();
            let state = battle.step(rng);
            for event in &battle.events()[seen..] {
                observer.battle_event(event);
            }
            if state == BattleState::MatchOver {
                break;
            }
        }
        let outcome = battle.finish();

        let winner = match outcome.winner {
            Side::First => first_id,
            Side::Second => second_id,
        };
        debug_assert_eq!(winner, outcome.winner_team);
        round.matches[index].winner = Some(winner);
        self.total_exchanges += outcome.exchanges as u64;
        if outcome.decided_by == Decision::TurnCeiling {
            self.ceiling_decisions += 1;
        }

        if let Err(e) = recorder.submit(&outcome.summary) {
            warn!(error = %e, round = progress.round, match_index = index, "failed to record match; continuing");
        }
        observer.match_resolved(progress, round, &outcome);

        self.next_match += 1;
        if self.next_match == round.matches.len() {
            self.phase = BracketPhase::RoundComplete;
        }
    }

    fn close_round(&mut self, observer: &mut dyn BracketObserver) {
        let Some(round) = self.current.take() else {
            self.phase = BracketPhase::RoundPending;
            return;
        };
        let winners = round.winners();
        debug_assert_eq!(winners.len(), round.matches.len(), "every match has a winner");
        self.contenders = winners;
        self.bracket.push(round);
        self.next_match = 0;
        observer.round_completed(&self.bracket);
        self.phase = if self.contenders.len() == 1 {
            BracketPhase::TournamentComplete
        } else {
            BracketPhase::RoundPending
        };
    }
}

fn pair_mut(teams: &mut [Team], a: usize, b: usize) -> (&mut Team, &mut Team) {
    assert_ne!(a, b, "a team cannot play itself");
    if a < b {
        let (left, right) = teams.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = teams.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
