use std::collections::HashMap;

/// Placeholder PvPoke uses for the second slot of single-typed species.
pub const NO_TYPE: &str = "none";

const SUPER_EFFECTIVE: f64 = 1.6;
const NOT_VERY_EFFECTIVE: f64 = 0.625;
const IMMUNE: f64 = 0.390625;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Relation {
    Super,
    Resisted,
    Immune,
    Neutral,
}

impl Relation {
    fn multiplier(self) -> f64 {
        match self {
            Relation::Super => SUPER_EFFECTIVE,
            Relation::Resisted => NOT_VERY_EFFECTIVE,
            Relation::Immune => IMMUNE,
            Relation::Neutral => 1.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum TypeChart {
    /// Built-in chart with the competitive-format multipliers.
    #[default]
    Standard,
    /// attacking -> defending -> multiplier, keys lowercased.
    Custom(HashMap<String, HashMap<String, f64>>),
}

impl TypeChart {
    pub fn from_table(table: &HashMap<String, HashMap<String, f64>>) -> Self {
        let normalized = table
            .iter()
            .map(|(atk, row)| {
                let row = row
                    .iter()
                    .map(|(def, mult)| (def.to_ascii_lowercase(), *mult))
                    .collect();
                (atk.to_ascii_lowercase(), row)
            })
            .collect();
        TypeChart::Custom(normalized)
    }

    pub fn multiplier(&self, attacking: &str, defending: &str) -> f64 {
        match self {
            TypeChart::Standard => relation(attacking, defending).multiplier(),
            TypeChart::Custom(table) => table
                .get(&attacking.to_ascii_lowercase())
                .and_then(|row| row.get(&defending.to_ascii_lowercase()))
                .copied()
                .unwrap_or(1.0),
        }
    }

    /// Product of the per-type multipliers, skipping the `"none"` slot.
    pub fn effectiveness(&self, move_type: &str, defender_types: &[String]) -> f64 {
        defender_types
            .iter()
            .filter(|t| !t.eq_ignore_ascii_case(NO_TYPE))
            .map(|t| self.multiplier(move_type, t))
            .product()
    }
}

fn relation(attacking: &str, defending: &str) -> Relation {
    use Relation::*;
    let atk = attacking.to_ascii_lowercase();
    let def = defending.to_ascii_lowercase();
    match atk.as_str() {
        "normal" => match def.as_str() {
            "rock" | "steel" => Resisted,
            "ghost" => Immune,
            _ => Neutral,
        },
        "fire" => match def.as_str() {
            "fire" | "water" | "rock" | "dragon" => Resisted,
            "grass" | "ice" | "bug" | "steel" => Super,
            _ => Neutral,
        },
        "water" => match def.as_str() {
            "water" | "grass" | "dragon" => Resisted,
            "fire" | "ground" | "rock" => Super,
            _ => Neutral,
        },
        "electric" => match def.as_str() {
            "electric" | "grass" | "dragon" => Resisted,
            "water" | "flying" => Super,
            "ground" => Immune,
            _ => Neutral,
        },
        "grass" => match def.as_str() {
            "fire" | "grass" | "poison" | "flying" | "bug" | "dragon" | "steel" => Resisted,
            "water" | "ground" | "rock" => Super,
            _ => Neutral,
        },
        "ice" => match def.as_str() {
            "fire" | "water" | "ice" | "steel" => Resisted,
            "grass" | "ground" | "flying" | "dragon" => Super,
            _ => Neutral,
        },
        "fighting" => match def.as_str() {
            "normal" | "ice" | "rock" | "dark" | "steel" => Super,
            "poison" | "flying" | "psychic" | "bug" | "fairy" => Resisted,
            "ghost" => Immune,
            _ => Neutral,
        },
        "poison" => match def.as_str() {
            "grass" | "fairy" => Super,
            "poison" | "ground" | "rock" | "ghost" => Resisted,
            "steel" => Immune,
            _ => Neutral,
        },
        "ground" => match def.as_str() {
            "fire" | "electric" | "poison" | "rock" | "steel" => Super,
            "grass" | "bug" => Resisted,
            "flying" => Immune,
            _ => Neutral,
        },
        "flying" => match def.as_str() {
            "grass" | "fighting" | "bug" => Super,
            "electric" | "rock" | "steel" => Resisted,
            _ => Neutral,
        },
        "psychic" => match def.as_str() {
            "fighting" | "poison" => Super,
            "psychic" | "steel" => Resisted,
            "dark" => Immune,
            _ => Neutral,
        },
        "bug" => match def.as_str() {
            "grass" | "psychic" | "dark" => Super,
            "fire" | "fighting" | "poison" | "flying" | "ghost" | "steel" | "fairy" => Resisted,
            _ => Neutral,
        },
        "rock" => match def.as_str() {
            "fire" | "ice" | "flying" | "bug" => Super,
            "fighting" | "ground" | "steel" => Resisted,
            _ => Neutral,
        },
        "ghost" => match def.as_str() {
            "ghost" | "psychic" => Super,
            "dark" => Resisted,
            "normal" => Immune,
            _ => Neutral,
        },
        "dragon" => match def.as_str() {
            "dragon" => Super,
            "steel" => Resisted,
            "fairy" => Immune,
            _ => Neutral,
        },
        "dark" => match def.as_str() {
            "psychic" | "ghost" => Super,
            "fighting" | "dark" | "fairy" => Resisted,
            _ => Neutral,
        },
        "steel" => match def.as_str() {
            "rock" | "ice" | "fairy" => Super,
            "fire" | "water" | "electric" | "steel" => Resisted,
            _ => Neutral,
        },
        "fairy" => match def.as_str() {
            "fighting" | "dragon" | "dark" => Super,
            "fire" | "poison" | "steel" => Resisted,
            _ => Neutral,
        },
        _ => Neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn dual_types_multiply() {
        let chart = TypeChart::Standard;
        let eff = chart.effectiveness("ice", &types(&["ground", "flying"]));
        assert!((eff - 2.56).abs() < 1e-9);
        let eff = chart.effectiveness("electric", &types(&["ground", "flying"]));
        assert!((eff - IMMUNE * SUPER_EFFECTIVE).abs() < 1e-9);
    }

    #[test]
    fn none_slot_is_skipped() {
        let chart = TypeChart::Standard;
        let eff = chart.effectiveness("Fighting", &types(&["Normal", "none"]));
        assert!((eff - SUPER_EFFECTIVE).abs() < 1e-9);
    }

    #[test]
    fn custom_chart_is_case_insensitive() {
        let mut row = HashMap::new();
        row.insert("Water".to_string(), 1.6);
        let mut table = HashMap::new();
        table.insert("Grass".to_string(), row);
        let chart = TypeChart::from_table(&table);
        assert_eq!(chart.multiplier("grass", "WATER"), 1.6);
        assert_eq!(chart.multiplier("grass", "fire"), 1.0);
    }
}
