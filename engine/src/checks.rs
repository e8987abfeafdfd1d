use crate::RandomSource;

/// Who swings first in an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initiative {
    /// The side-1 candidate was faster.
    FirstFaster,
    /// The side-2 candidate was faster.
    SecondFaster,
    /// Equal speed; the coin picked the side-1 candidate.
    TieFirst,
    /// Equal speed; the coin picked the side-2 candidate.
    TieSecond,
}

impl Initiative {
    pub fn first_acts(self) -> bool {
        matches!(self, Initiative::FirstFaster | Initiative::TieFirst)
    }

    pub fn was_tie(self) -> bool {
        matches!(self, Initiative::TieFirst | Initiative::TieSecond)
    }
}

/// Higher speed acts first; exact ties go to a fair coin. The coin is only drawn on a tie.
pub fn initiative(first_speed: u32, second_speed: u32, rng: &mut impl RandomSource) -> Initiative {
    if first_speed > second_speed {
        Initiative::FirstFaster
    } else if second_speed > first_speed {
        Initiative::SecondFaster
    } else if rng.coin() {
        Initiative::TieFirst
    } else {
        Initiative::TieSecond
    }
}
