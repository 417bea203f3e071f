use crate::error::{Result, SimError};
use crate::types::TypeChart;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
pub struct BaseStats {
    pub atk: u32,
    pub def: u32,
    pub hp: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesData {
    pub species_id: String,
    #[serde(default)]
    pub species_name: Option<String>,
    pub base_stats: BaseStats,
    #[serde(default)]
    pub types: Vec<String>,
    /// `cp{cap}` -> `[level, atk_iv, def_iv, hp_iv]`
    #[serde(default, rename = "defaultIVs")]
    pub default_ivs: HashMap<String, Vec<f64>>,
    /// Fast move id followed by two charge move ids.
    #[serde(default)]
    pub moveset: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveData {
    pub move_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub move_type: String,
    #[serde(default)]
    pub power: f64,
    /// Charge move cost.
    #[serde(default)]
    pub energy: i32,
    /// Fast move gain.
    #[serde(default)]
    pub energy_gain: i32,
    /// Milliseconds; only meaningful for fast moves.
    #[serde(default)]
    pub cooldown: u32,
    #[serde(default)]
    pub archetype: Option<String>,
    #[serde(default)]
    pub buffs: Option<[i32; 2]>,
    #[serde(default)]
    pub buffs_self: Option<[i32; 2]>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub buff_apply_chance: Option<f64>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CpmEntry {
    pub level: f64,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMaster {
    pub pokemon: Vec<SpeciesData>,
    pub moves: Vec<MoveData>,
    #[serde(default)]
    pub cp_multipliers: Vec<CpmEntry>,
    #[serde(default)]
    pub type_chart: Option<HashMap<String, HashMap<String, f64>>>,
}

impl GameMaster {
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn species(&self, species_id: &str) -> Result<&SpeciesData> {
        self.pokemon
            .iter()
            .find(|p| p.species_id == species_id)
            .ok_or_else(|| SimError::MissingSpecies(species_id.to_string()))
    }

    pub fn move_data(&self, move_id: &str) -> Result<&MoveData> {
        self.moves
            .iter()
            .find(|m| m.move_id == move_id)
            .ok_or_else(|| SimError::MissingMove(move_id.to_string()))
    }

    pub fn type_chart(&self) -> TypeChart {
        match &self.type_chart {
            Some(table) => TypeChart::from_table(table),
            None => TypeChart::Standard,
        }
    }
}

// PvPoke ships buffApplyChance as a string ("0.3"); hand-written data tends to use numbers.
fn number_or_string<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Chance {
        Number(f64),
        Text(String),
    }

    match Option::<Chance>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Chance::Number(value)) => Ok(Some(value)),
        Some(Chance::Text(text)) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
