use std::fmt;

use serde::{Deserialize, Serialize};

use crate::creature::{CreatureId, CreatureRecord};
use crate::error::SetupError;
use crate::life::{restore_full, Health};
use crate::roster::ensure_capacity;

/// Creatures per team. Fixed for every tournament.
pub const ROSTER_SIZE: usize = 6;

/// 1-based ordinal of a team in the starting list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u32);

impl TeamId {
    pub fn index(self) -> usize {
        self.0 as usize - 1
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub creature: CreatureRecord,
    pub health: Health,
}

impl TeamMember {
    pub fn new(creature: CreatureRecord) -> Self {
        let health = Health::new(creature.stats.hp);
        Self { creature, health }
    }

    pub fn id(&self) -> CreatureId {
        self.creature.id
    }

    pub fn name(&self) -> &str {
        &self.creature.name
    }

    pub fn current_hp(&self) -> u32 {
        self.health.hp
    }

    pub fn is_up(&self) -> bool {
        self.health.is_up()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub members: Vec<TeamMember>,
}

impl Team {
    pub fn new(ordinal: u32, records: Vec<CreatureRecord>) -> Self {
        Self {
            id: TeamId(ordinal),
            name: team_name(ordinal),
            members: records.into_iter().map(TeamMember::new).collect(),
        }
    }

    /// Slot indices of members still standing.
    pub fn living(&self) -> Vec<usize> {
        self.members
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_up())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn has_living(&self) -> bool {
        self.members.iter().any(TeamMember::is_up)
    }

    pub fn total_hp(&self) -> u64 {
        self.members.iter().map(|m| m.current_hp() as u64).sum()
    }

    pub fn heal_all(&mut self) {
        for member in &mut self.members {
            restore_full(&mut member.health);
        }
    }
}

pub fn team_name(ordinal: u32) -> String {
    format!("Team {ordinal}")
}

/// Slice `shuffled` into `team_count` contiguous chunks of `roster_size`.
/// Surplus records past the last chunk are left out.
pub fn form_teams(
    shuffled: &[CreatureRecord],
    team_count: usize,
    roster_size: usize,
) -> Result<Vec<Team>, SetupError> {
    ensure_capacity(shuffled.len(), team_count, roster_size)?;
    let teams = shuffled
        .chunks_exact(roster_size)
        .take(team_count)
        .enumerate()
        .map(|(i, chunk)| Team::new(i as u32 + 1, chunk.to_vec()))
        .collect();
    Ok(teams)
}
