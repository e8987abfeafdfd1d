use serde::{Deserialize, Serialize};

use crate::creature::CreatureId;
use crate::team::{Team, TeamId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

/// A team member as named in an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub side: Side,
    pub slot: usize,
    pub creature_id: CreatureId,
    pub name: String,
}

impl Combatant {
    pub fn of(team: &Team, side: Side, slot: usize) -> Self {
        let member = &team.members[slot];
        Self {
            side,
            slot,
            creature_id: member.id(),
            name: member.name().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strike {
    pub attacker: Combatant,
    pub defender: Combatant,
    pub damage: u32,
    pub critical: bool,
}

/// One atomic occurrence in a match, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BattleEvent {
    Attack(Strike),
    Counter(Strike),
    #[serde(rename = "ko")]
    KnockOut {
        creature: Combatant,
        remaining_hp: u32,
    },
}

impl BattleEvent {
    pub fn strike(&self) -> Option<&Strike> {
        match self {
            BattleEvent::Attack(s) | BattleEvent::Counter(s) => Some(s),
            BattleEvent::KnockOut { .. } => None,
        }
    }
}

/// How the winner was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// The loser had no member left standing.
    Knockout,
    /// The exchange ceiling was hit; the larger remaining health total won.
    TurnCeiling,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub creature_id: CreatureId,
    pub name: String,
    pub starting_hp: u32,
    pub ending_hp: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub id: TeamId,
    pub name: String,
    pub members: Vec<MemberRecord>,
}

impl TeamRecord {
    pub(crate) fn capture(team: &Team, starting: &[u32]) -> Self {
        Self {
            id: team.id,
            name: team.name.clone(),
            members: team
                .members
                .iter()
                .zip(starting)
                .map(|(m, &starting_hp)| MemberRecord {
                    creature_id: m.id(),
                    name: m.name().to_string(),
                    starting_hp,
                    ending_hp: m.current_hp(),
                })
                .collect(),
        }
    }
}

/// The persisted artifact of one resolved match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleSummary {
    pub team1: TeamRecord,
    pub team2: TeamRecord,
    pub events: Vec<BattleEvent>,
    pub match_winner: String,
    pub team_winner: String,
    /// Id of the winning team; `team1` or `team2` carries the same id.
    pub winner: TeamId,
    pub decided_by: Decision,
    pub exchanges: u32,
}

impl BattleSummary {
    pub fn winner_record(&self) -> &TeamRecord {
        if self.team1.id == self.winner {
            &self.team1
        } else {
            &self.team2
        }
    }
}
