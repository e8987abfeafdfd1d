use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::combat::CombatRules;

pub const DEFAULT_TEAM_COUNT: usize = 32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct TournamentConfig {
    /// Must be a power of two.
    pub team_count: usize,
    /// Fixed seed for a replayable run. `None` draws one from OS entropy.
    pub seed: Option<u64>,
    pub rules: CombatRules,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            team_count: DEFAULT_TEAM_COUNT,
            seed: None,
            rules: CombatRules::default(),
        }
    }
}

impl TournamentConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_team_count(mut self, team_count: usize) -> Self {
        self.team_count = team_count;
        self
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let cfg: Self =
            serde_yaml::from_str(text).context("failed to parse tournament config YAML")?;
        cfg.rules.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let cfg: Self =
            serde_json::from_str(text).context("failed to parse tournament config JSON")?;
        cfg.rules.validate()?;
        Ok(cfg)
    }

    /// YAML for `.yaml`/`.yml`, JSON otherwise.
    pub fn from_text(text: &str, path: &Path) -> Result<Self> {
        let yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let parsed = if yaml {
            Self::from_yaml_str(text)
        } else {
            Self::from_json_str(text)
        };
        parsed.with_context(|| format!("in {}", path.display()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::from_text(&text, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_setup() {
        let cfg = TournamentConfig::default();
        assert_eq!(cfg.team_count, 32);
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.rules.turn_ceiling, 9999);
        assert_eq!(cfg.rules.crit_chance, 0.1);
        assert_eq!(cfg.rules.crit_multiplier, 1.5);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let cfg = TournamentConfig::from_yaml_str("team_count: 8\nseed: 42\nrules:\n  turn_ceiling: 50\n")
            .unwrap();
        assert_eq!(cfg.team_count, 8);
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.rules.turn_ceiling, 50);
        assert_eq!(cfg.rules.crit_chance, 0.1);
    }

    #[test]
    fn rejects_nan_and_out_of_range_rules() {
        let err = TournamentConfig::from_yaml_str("team_count: 2\nrules:\n  crit_chance: .nan\n")
            .unwrap_err();
        assert!(err.to_string().contains("crit_chance"));
        assert!(TournamentConfig::from_yaml_str("rules:\n  crit_chance: 1.5\n").is_err());
        assert!(TournamentConfig::from_yaml_str("rules:\n  crit_multiplier: .inf\n").is_err());
        assert!(TournamentConfig::from_json_str(r#"{"rules":{"crit_multiplier":-2.0}}"#).is_err());
        assert!(TournamentConfig::from_yaml_str("rules:\n  crit_chance: 1.0\n").is_ok());
    }

    #[test]
    fn extension_selects_format() {
        let json = TournamentConfig::from_text(r#"{"team_count": 4}"#, Path::new("cfg.json")).unwrap();
        assert_eq!(json.team_count, 4);
        let yaml = TournamentConfig::from_text("team_count: 16", Path::new("cfg.yml")).unwrap();
        assert_eq!(yaml.team_count, 16);
    }
}
