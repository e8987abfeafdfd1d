use thiserror::Error;

/// Preconditions checked before any team is built or any round is played.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("not enough eligible creatures: need {needed}, have {available}")]
    InsufficientCreatures { needed: usize, available: usize },
    #[error("team count must be a non-zero power of two, got {0}")]
    TeamCountNotPowerOfTwo(usize),
    #[error("roster size must be at least 1")]
    EmptyRoster,
    #[error("team at position {position} carries id {found}; ids must run 1..=n in order")]
    TeamOrderMismatch { position: usize, found: u32 },
    #[error("combat rule {0} is out of range")]
    InvalidRule(&'static str),
}
