use std::fmt;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreatureId(pub u32);

impl fmt::Display for CreatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:03}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub hp: u32,
    #[serde(default, alias = "atk")]
    pub attack: u32,
    #[serde(default, alias = "def")]
    pub defense: u32,
    #[serde(default, alias = "vit")]
    pub speed: u32,
}

/// Read-only stat and identity data for one creature species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureRecord {
    #[serde(alias = "pokedex_id")]
    pub id: CreatureId,
    pub name: String,
    /// Absent stat blocks read as zeros, which makes the record ineligible.
    #[serde(default)]
    pub stats: Stats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
}

impl CreatureRecord {
    pub fn new(id: u32, name: impl Into<String>, stats: Stats) -> Self {
        Self {
            id: CreatureId(id),
            name: name.into(),
            stats,
            sprite: None,
            types: Vec::new(),
        }
    }

    pub fn is_eligible(&self) -> bool {
        self.stats.hp > 0
    }
}

/// Creature records keyed by id, in the order the source listed them.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: IndexMap<CreatureId, CreatureRecord>,
}

impl Catalog {
    /// Duplicate ids keep the first occurrence.
    pub fn from_records(records: impl IntoIterator<Item = CreatureRecord>) -> Self {
        let mut map = IndexMap::new();
        for record in records {
            map.entry(record.id).or_insert(record);
        }
        Self { records: map }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let records: Vec<CreatureRecord> =
            serde_json::from_str(text).context("failed to parse creature catalog JSON")?;
        Ok(Self::from_records(records))
    }

    pub fn get(&self, id: CreatureId) -> Option<&CreatureRecord> {
        self.records.get(&id)
    }

    pub fn records(&self) -> impl Iterator<Item = &CreatureRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_source_field_names() {
        let json = r#"[
            {"pokedex_id": 25, "name": "Pikachu", "stats": {"hp": 35, "atk": 55, "def": 40, "vit": 90}},
            {"id": 1, "name": "Bulbasaur", "stats": {"hp": 45, "attack": 49, "defense": 49, "speed": 45}}
        ]"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        assert_eq!(catalog.len(), 2);
        let pika = catalog.get(CreatureId(25)).unwrap();
        assert_eq!(pika.stats.attack, 55);
        assert_eq!(pika.stats.speed, 90);
    }

    #[test]
    fn missing_stats_are_ineligible() {
        let json = r#"[{"id": 0, "name": "MissingNo"}]"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        let record = catalog.get(CreatureId(0)).unwrap();
        assert_eq!(record.stats, Stats::default());
        assert!(!record.is_eligible());
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let a = CreatureRecord::new(7, "First", Stats { hp: 10, ..Default::default() });
        let b = CreatureRecord::new(7, "Second", Stats { hp: 20, ..Default::default() });
        let catalog = Catalog::from_records([a, b]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(CreatureId(7)).unwrap().name, "First");
    }
}
