use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub mod api;
pub mod bracket;
pub mod checks;
pub mod combat;
pub mod config;
pub mod content;
pub mod creature;
pub mod error;
pub mod life;
pub mod narrate;
pub mod recorder;
pub mod roster;
pub mod team;

pub use bracket::{Bracket, BracketEngine, BracketObserver, BracketPhase, Match, Round};
pub use combat::{resolve_match, CombatOutcome, CombatRules, Decision, Side};
pub use config::TournamentConfig;
pub use creature::{Catalog, CreatureId, CreatureRecord, Stats};
pub use error::SetupError;
pub use recorder::{JsonLinesRecorder, MatchRecorder, MemoryRecorder, NullRecorder};
pub use team::{form_teams, Team, TeamId, TeamMember, ROSTER_SIZE};

/// Every random draw the simulation makes goes through this seam.
pub trait RandomSource {
    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize;

    /// Bernoulli draw that succeeds with probability `p`.
    fn chance(&mut self, p: f64) -> bool;

    /// Fair coin.
    fn coin(&mut self) -> bool {
        self.chance(0.5)
    }
}

enum Source {
    Seeded(ChaCha8Rng),
    Scripted { values: Vec<u32>, cursor: usize },
}

pub struct Dice {
    source: Source,
}

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self { source: Source::Seeded(ChaCha8Rng::seed_from_u64(seed)) }
    }

    /// Replays `values` in a loop. `pick(len)` yields `value % len`;
    /// `chance(p)` succeeds when `value < p * 100`.
    pub fn from_scripted(values: Vec<u32>) -> Self {
        Self { source: Source::Scripted { values, cursor: 0 } }
    }

    /// Draw a fresh seed from OS entropy. The caller should log it so the run can be replayed.
    pub fn entropy_seed() -> u64 {
        rand::rngs::OsRng.next_u64()
    }

    fn next_scripted(values: &[u32], cursor: &mut usize) -> u32 {
        if values.is_empty() {
            return 0;
        }
        let v = values[*cursor % values.len()];
        *cursor += 1;
        v
    }
}

impl RandomSource for Dice {
    fn pick(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "pick from an empty range");
        match &mut self.source {
            Source::Seeded(rng) => rng.gen_range(0..len.max(1)),
            Source::Scripted { values, cursor } => {
                Self::next_scripted(values, cursor) as usize % len.max(1)
            }
        }
    }

    fn chance(&mut self, p: f64) -> bool {
        // NaN survives `clamp`; treat it as an impossible event.
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        match &mut self.source {
            Source::Seeded(rng) => rng.gen_bool(p),
            Source::Scripted { values, cursor } => {
                (Self::next_scripted(values, cursor) as f64) < p * 100.0
            }
        }
    }
}

/// Install a stderr `fmt` subscriber. `verbosity` 0 = warn, 1 = info, 2 = debug, 3+ = trace.
pub fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    // A subscriber may already be installed (tests, embedding hosts); keep theirs.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
