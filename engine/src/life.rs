use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub hp: u32,
    pub max_hp: u32,
}

impl Health {
    pub fn new(max_hp: u32) -> Self {
        Self { hp: max_hp, max_hp }
    }

    pub fn is_up(&self) -> bool {
        self.hp > 0
    }

    pub fn is_full(&self) -> bool {
        self.hp == self.max_hp
    }
}

/// Outcome of one damage application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageTaken {
    pub before: u32,
    pub after: u32,
    /// True when this hit took the creature from positive health to 0.
    pub knocked_out: bool,
}

/// Subtract `dmg`, flooring at 0.
pub fn apply_damage(health: &mut Health, dmg: u32) -> DamageTaken {
    let before = health.hp;
    health.hp = health.hp.saturating_sub(dmg);
    DamageTaken {
        before,
        after: health.hp,
        knocked_out: before > 0 && health.hp == 0,
    }
}

/// Back to base health, knocked out or not.
pub fn restore_full(health: &mut Health) {
    health.hp = health.max_hp;
}
