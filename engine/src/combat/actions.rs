use crate::combat::CombatRules;
use crate::life::{apply_damage, DamageTaken};
use crate::team::TeamMember;
use crate::RandomSource;

/// Damage after the critical multiplier and defense mitigation. Never below 1.
///
/// `max(1, floor(attack × mult))`, then `max(1, floor(raw × (1 − defense/100)))`.
/// Mitigation is done in integers so `floor` is exact; defense of 100 or more bottoms out at 1.
pub fn damage_for(attack: u32, defense: u32, critical: bool, rules: &CombatRules) -> u32 {
    if defense >= 100 {
        return 1;
    }
    let multiplier = if critical { rules.crit_multiplier } else { 1.0 };
    let raw = ((attack as f64) * multiplier).floor().max(1.0) as i128;
    let mitigated = raw * (100 - defense as i128) / 100;
    mitigated.clamp(1, u32::MAX as i128) as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrikeOutcome {
    pub damage: u32,
    pub critical: bool,
    pub taken: DamageTaken,
}

/// One attack: roll for a critical, compute damage against the target's defense, apply it.
pub fn strike(
    attack: u32,
    target: &mut TeamMember,
    rng: &mut impl RandomSource,
    rules: &CombatRules,
) -> StrikeOutcome {
    let critical = rng.chance(rules.crit_chance);
    let damage = damage_for(attack, target.creature.stats.defense, critical, rules);
    let taken = apply_damage(&mut target.health, damage);
    StrikeOutcome { damage, critical, taken }
}
