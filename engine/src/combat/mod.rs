//! Match resolution between two teams.
//!
//! A match is a loop of exchanges. Each exchange draws one living member per
//! side, lets the faster one strike, and lets the target strike back if it is
//! still standing. The loop stops when a side has nobody left or when the
//! exchange ceiling is reached.

pub mod actions;
pub mod events;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::checks::initiative;
use crate::error::SetupError;
use crate::team::{Team, TeamId};
use crate::RandomSource;

use self::actions::strike;
pub use self::events::{
    BattleEvent, BattleSummary, Combatant, Decision, MemberRecord, Side, Strike, TeamRecord,
};

pub const DEFAULT_TURN_CEILING: u32 = 9999;
pub const DEFAULT_CRIT_CHANCE: f64 = 0.1;
pub const DEFAULT_CRIT_MULTIPLIER: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct CombatRules {
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    /// Exchanges allowed before the match is decided on remaining health.
    pub turn_ceiling: u32,
}

impl CombatRules {
    /// `crit_chance` must be a probability and `crit_multiplier` a finite, non-negative factor.
    pub fn validate(&self) -> Result<(), SetupError> {
        if !(0.0..=1.0).contains(&self.crit_chance) {
            return Err(SetupError::InvalidRule("crit_chance"));
        }
        if !self.crit_multiplier.is_finite() || self.crit_multiplier < 0.0 {
            return Err(SetupError::InvalidRule("crit_multiplier"));
        }
        Ok(())
    }
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            crit_chance: DEFAULT_CRIT_CHANCE,
            crit_multiplier: DEFAULT_CRIT_MULTIPLIER,
            turn_ceiling: DEFAULT_TURN_CEILING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleState {
    AwaitingTurn,
    TurnResolved,
    MatchOver,
}

#[derive(Debug, Clone)]
pub struct CombatOutcome {
    pub winner: Side,
    pub winner_team: TeamId,
    pub decided_by: Decision,
    pub exchanges: u32,
    pub summary: BattleSummary,
}

impl CombatOutcome {
    pub fn events(&self) -> &[BattleEvent] {
        &self.summary.events
    }
}

/// One match in progress. Owns mutable access to both teams until [`Battle::finish`].
pub struct Battle<'a> {
    first: &'a mut Team,
    second: &'a mut Team,
    rules: &'a CombatRules,
    starting: [Vec<u32>; 2],
    events: Vec<BattleEvent>,
    exchanges: u32,
    state: BattleState,
}

impl<'a> Battle<'a> {
    pub fn new(first: &'a mut Team, second: &'a mut Team, rules: &'a CombatRules) -> Self {
        let starting = [
            first.members.iter().map(|m| m.current_hp()).collect(),
            second.members.iter().map(|m| m.current_hp()).collect(),
        ];
        Self {
            first,
            second,
            rules,
            starting,
            events: Vec::new(),
            exchanges: 0,
            state: BattleState::AwaitingTurn,
        }
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn exchanges(&self) -> u32 {
        self.exchanges
    }

    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::First => &*self.first,
            Side::Second => &*self.second,
        }
    }

    /// Advance by one exchange, or move to `MatchOver` if the match is decided.
    pub fn step(&mut self, rng: &mut impl RandomSource) -> BattleState {
        if self.state == BattleState::MatchOver {
            return self.state;
        }
        let living_first = self.first.living();
        let living_second = self.second.living();
        if living_first.is_empty()
            || living_second.is_empty()
            || self.exchanges >= self.rules.turn_ceiling
        {
            self.state = BattleState::MatchOver;
            return self.state;
        }

        self.exchanges += 1;
        let a = living_first[rng.pick(living_first.len())];
        let b = living_second[rng.pick(living_second.len())];

        let speed_a = self.first.members[a].creature.stats.speed;
        let speed_b = self.second.members[b].creature.stats.speed;
        let order = initiative(speed_a, speed_b, rng);
        let (side, attacker_slot, defender_slot) = if order.first_acts() {
            (Side::First, a, b)
        } else {
            (Side::Second, b, a)
        };
        self.exchange(side, attacker_slot, defender_slot, rng);

        self.state = BattleState::TurnResolved;
        self.state
    }

    fn exchange(
        &mut self,
        side: Side,
        attacker_slot: usize,
        defender_slot: usize,
        rng: &mut impl RandomSource,
    ) {
        let rules = self.rules;
        let (att_team, def_team) = match side {
            Side::First => (&mut *self.first, &mut *self.second),
            Side::Second => (&mut *self.second, &mut *self.first),
        };
        let attacker = Combatant::of(att_team, side, attacker_slot);
        let defender = Combatant::of(def_team, side.other(), defender_slot);

        let attack = att_team.members[attacker_slot].creature.stats.attack;
        let hit = strike(attack, &mut def_team.members[defender_slot], rng, rules);
        push_event(
            &mut self.events,
            BattleEvent::Attack(Strike {
                attacker: attacker.clone(),
                defender: defender.clone(),
                damage: hit.damage,
                critical: hit.critical,
            }),
        );
        if hit.taken.knocked_out {
            push_event(
                &mut self.events,
                BattleEvent::KnockOut { creature: defender, remaining_hp: 0 },
            );
            return;
        }

        let counter_attack = def_team.members[defender_slot].creature.stats.attack;
        let counter = strike(counter_attack, &mut att_team.members[attacker_slot], rng, rules);
        push_event(
            &mut self.events,
            BattleEvent::Counter(Strike {
                attacker: defender,
                defender: attacker.clone(),
                damage: counter.damage,
                critical: counter.critical,
            }),
        );
        if counter.taken.knocked_out {
            push_event(
                &mut self.events,
                BattleEvent::KnockOut { creature: attacker, remaining_hp: 0 },
            );
        }
    }

    /// Run exchanges until the match is over.
    pub fn run(&mut self, rng: &mut impl RandomSource) {
        while self.step(rng) != BattleState::MatchOver {}
    }

    /// Declare the winner, capture the summary, then fully heal the winning team.
    pub fn finish(self) -> CombatOutcome {
        let first_up = self.first.has_living();
        let second_up = self.second.has_living();
        let (winner, decided_by) = match (first_up, second_up) {
            (true, false) => (Side::First, Decision::Knockout),
            (false, true) => (Side::Second, Decision::Knockout),
            (true, true) => (health_leader(self.first, self.second), Decision::TurnCeiling),
            // Nobody could fight from the start; fall back to the same rule.
            (false, false) => (health_leader(self.first, self.second), Decision::Knockout),
        };

        let team1 = TeamRecord::capture(self.first, &self.starting[0]);
        let team2 = TeamRecord::capture(self.second, &self.starting[1]);
        let winning = match winner {
            Side::First => self.first,
            Side::Second => self.second,
        };
        let winner_team = winning.id;
        let winner_name = winning.name.clone();
        winning.heal_all();

        debug!(
            winner = %winner_name,
            exchanges = self.exchanges,
            ?decided_by,
            "match resolved"
        );

        CombatOutcome {
            winner,
            winner_team,
            decided_by,
            exchanges: self.exchanges,
            summary: BattleSummary {
                team1,
                team2,
                events: self.events,
                match_winner: winner_name.clone(),
                team_winner: winner_name,
                winner: winner_team,
                decided_by,
                exchanges: self.exchanges,
            },
        }
    }
}

fn push_event(events: &mut Vec<BattleEvent>, event: BattleEvent) {
    trace!(?event, "battle event");
    events.push(event);
}

/// Larger summed current health wins; an exact tie goes to the second side.
fn health_leader(first: &Team, second: &Team) -> Side {
    if first.total_hp() > second.total_hp() {
        Side::First
    } else {
        Side::Second
    }
}

/// Resolve a full match between `first` and `second`.
pub fn resolve_match(
    first: &mut Team,
    second: &mut Team,
    rng: &mut impl RandomSource,
    rules: &CombatRules,
) -> CombatOutcome {
    let mut battle = Battle::new(first, second, rules);
    battle.run(rng);
    battle.finish()
}
