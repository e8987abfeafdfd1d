use crate::creature::CreatureRecord;
use crate::error::SetupError;
use crate::RandomSource;

/// Keep only creatures with a positive health stat, preserving catalog order.
pub fn select_eligible<'a>(
    records: impl IntoIterator<Item = &'a CreatureRecord>,
) -> Vec<CreatureRecord> {
    records
        .into_iter()
        .filter(|r| r.is_eligible())
        .cloned()
        .collect()
}

/// Fail unless `team_count × roster_size` creatures are available.
pub fn ensure_capacity(
    available: usize,
    team_count: usize,
    roster_size: usize,
) -> Result<(), SetupError> {
    if roster_size == 0 {
        return Err(SetupError::EmptyRoster);
    }
    let needed = team_count.saturating_mul(roster_size);
    if available < needed {
        return Err(SetupError::InsufficientCreatures { needed, available });
    }
    Ok(())
}

/// In-place Fisher–Yates. Every permutation is equally likely given a uniform `pick`.
pub fn shuffle<T>(items: &mut [T], rng: &mut impl RandomSource) {
    for i in (1..items.len()).rev() {
        let j = rng.pick(i + 1);
        items.swap(i, j);
    }
}
