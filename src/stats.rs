use crate::error::{Result, SimError};
use crate::model::{CpmEntry, SpeciesData};
use phf::phf_map;
use std::collections::HashMap;

// Keys are lowercase; cup names resolve to the CP cap of their league.
static LEAGUE_CAPS: phf::Map<&'static str, u32> = phf_map! {
    "little" => 500,
    "lc" => 500,
    "jungle" => 500,
    "gl" => 1500,
    "great" => 1500,
    "remix" => 1500,
    "ul" => 2500,
    "ultra" => 2500,
    "ulp" => 2500,
    "ml" => 10000,
    "master" => 10000,
    "mlc" => 10000,
};

const MAX_IV: f64 = 15.0;

/// Spread used when the species has no entry for the league cap.
pub const FALLBACK_SPREAD: IvSpread = IvSpread {
    level: 40.0,
    atk: 15,
    def: 15,
    hp: 15,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct League {
    pub cp_cap: u32,
}

impl League {
    pub const GREAT: League = League { cp_cap: 1500 };
    pub const ULTRA: League = League { cp_cap: 2500 };
    pub const MASTER: League = League { cp_cap: 10000 };

    /// Accepts a CP cap (`"1500"`, `"2500-premier"`) or a league name (`"GL"`).
    pub fn parse(value: &str) -> Result<Self> {
        let head = value.split('-').next().unwrap_or(value).trim();
        if let Ok(cp_cap) = head.parse::<u32>() {
            return Ok(League { cp_cap });
        }
        LEAGUE_CAPS
            .get(head.to_ascii_lowercase().as_str())
            .map(|&cp_cap| League { cp_cap })
            .ok_or_else(|| SimError::InvalidConfig(format!("unknown league '{value}'")))
    }

    fn iv_key(&self) -> String {
        format!("cp{}", self.cp_cap)
    }
}

impl Default for League {
    fn default() -> Self {
        League::GREAT
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IvSpread {
    pub level: f64,
    pub atk: u8,
    pub def: u8,
    pub hp: u8,
}

impl IvSpread {
    fn from_tuple(species_id: &str, tuple: &[f64]) -> Result<Self> {
        let [level, atk, def, hp] = tuple else {
            return Err(SimError::InvalidConfig(format!(
                "default IVs for '{species_id}' must be [level, atk, def, hp], got {tuple:?}"
            )));
        };
        let iv = |value: f64| -> Result<u8> {
            if value.fract() == 0.0 && (0.0..=MAX_IV).contains(&value) {
                Ok(value as u8)
            } else {
                Err(SimError::InvalidConfig(format!(
                    "default IV {value} for '{species_id}' is outside 0..=15"
                )))
            }
        };
        if *level <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "default level {level} for '{species_id}' must be positive"
            )));
        }
        Ok(IvSpread {
            level: *level,
            atk: iv(*atk)?,
            def: iv(*def)?,
            hp: iv(*hp)?,
        })
    }
}

/// Per-league default spread for a species, falling back to level 40 hundos.
pub fn default_spread(species: &SpeciesData, league: League) -> Result<IvSpread> {
    match species.default_ivs.get(&league.iv_key()) {
        Some(tuple) => IvSpread::from_tuple(&species.species_id, tuple),
        None => Ok(FALLBACK_SPREAD),
    }
}

/// CP multipliers keyed by half-level so `20.5` is an exact key.
#[derive(Clone, Debug, Default)]
pub struct CpmTable {
    by_half_level: HashMap<u32, f64>,
}

impl CpmTable {
    pub fn new(entries: &[CpmEntry]) -> Self {
        let by_half_level = entries
            .iter()
            .filter_map(|entry| half_level(entry.level).map(|key| (key, entry.multiplier)))
            .collect();
        CpmTable { by_half_level }
    }

    pub fn multiplier(&self, level: f64) -> Result<f64> {
        half_level(level)
            .and_then(|key| self.by_half_level.get(&key).copied())
            .ok_or(SimError::MissingLevel(level))
    }

    pub fn is_empty(&self) -> bool {
        self.by_half_level.is_empty()
    }
}

fn half_level(level: f64) -> Option<u32> {
    let doubled = level * 2.0;
    if doubled.fract() != 0.0 || doubled < 0.0 {
        return None;
    }
    Some(doubled as u32)
}

/// Effective stats of one combatant at its league spread.
#[derive(Clone, Debug, PartialEq)]
pub struct CombatStats {
    pub species_id: String,
    pub types: Vec<String>,
    pub attack: f64,
    pub defense: f64,
    pub max_hp: u32,
}

impl CombatStats {
    pub fn resolve(species: &SpeciesData, league: League, cpm: &CpmTable) -> Result<Self> {
        let spread = default_spread(species, league)?;
        Self::at_spread(species, spread, cpm)
    }

    pub fn at_spread(species: &SpeciesData, spread: IvSpread, cpm: &CpmTable) -> Result<Self> {
        let multiplier = cpm.multiplier(spread.level)?;
        let base = &species.base_stats;
        let hp = ((base.hp + spread.hp as u32) as f64 * multiplier).floor() as u32;
        Ok(CombatStats {
            species_id: species.species_id.clone(),
            types: species.types.clone(),
            attack: (base.atk + spread.atk as u32) as f64 * multiplier,
            defense: (base.def + spread.def as u32) as f64 * multiplier,
            max_hp: hp.max(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BaseStats;

    fn species(default_ivs: &[(&str, Vec<f64>)]) -> SpeciesData {
        SpeciesData {
            species_id: "medicham".to_string(),
            species_name: None,
            base_stats: BaseStats {
                atk: 121,
                def: 152,
                hp: 155,
            },
            types: vec!["fighting".to_string(), "psychic".to_string()],
            default_ivs: default_ivs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            moveset: Vec::new(),
        }
    }

    fn table() -> CpmTable {
        CpmTable::new(&[
            CpmEntry {
                level: 40.0,
                multiplier: 0.7903,
            },
            CpmEntry {
                level: 49.5,
                multiplier: 0.83779999,
            },
        ])
    }

    #[test]
    fn league_names_and_caps() {
        assert_eq!(League::parse("GL").unwrap(), League::GREAT);
        assert_eq!(League::parse("2500-premier").unwrap(), League::ULTRA);
        assert_eq!(League::parse("master").unwrap(), League::MASTER);
        assert!(matches!(League::parse("moon"), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn half_levels_resolve_exactly() {
        let cpm = table();
        assert_eq!(cpm.multiplier(49.5).unwrap(), 0.83779999);
        assert!(matches!(cpm.multiplier(49.25), Err(SimError::MissingLevel(_))));
        assert!(matches!(cpm.multiplier(41.0), Err(SimError::MissingLevel(_))));
    }

    #[test]
    fn missing_league_entry_falls_back() {
        let mon = species(&[("cp1500", vec![49.5, 15.0, 15.0, 15.0])]);
        assert_eq!(default_spread(&mon, League::MASTER).unwrap(), FALLBACK_SPREAD);
        let stats = CombatStats::resolve(&mon, League::MASTER, &table()).unwrap();
        assert_eq!(stats.max_hp, ((155.0 + 15.0) * 0.7903f64).floor() as u32);
    }

    #[test]
    fn malformed_spread_is_invalid_config() {
        let short = species(&[("cp1500", vec![49.5, 15.0, 15.0])]);
        assert!(matches!(
            default_spread(&short, League::GREAT),
            Err(SimError::InvalidConfig(_))
        ));
        let too_high = species(&[("cp1500", vec![20.0, 16.0, 15.0, 15.0])]);
        assert!(matches!(
            default_spread(&too_high, League::GREAT),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn stats_scale_with_multiplier() {
        let mon = species(&[("cp1500", vec![49.5, 0.0, 15.0, 15.0])]);
        let stats = CombatStats::resolve(&mon, League::GREAT, &table()).unwrap();
        assert!((stats.attack - 121.0 * 0.83779999).abs() < 1e-9);
        assert!((stats.defense - 167.0 * 0.83779999).abs() < 1e-9);
        assert_eq!(stats.max_hp, (170.0 * 0.83779999f64).floor() as u32);
    }
}
