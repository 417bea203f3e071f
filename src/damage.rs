use crate::moves::Move;
use crate::stats::CombatStats;
use crate::types::TypeChart;

/// Competitive-format multiplier baked into every move's effective power.
pub const PVP_BONUS: f64 = 1.3;
pub const STAB: f64 = 1.2;

/// `floor(0.5 * power * atk/def * stab * effectiveness * 1.3) + 1`
pub fn move_damage(
    mv: &Move,
    attacker: &CombatStats,
    defender: &CombatStats,
    chart: &TypeChart,
) -> u32 {
    let stab = if attacker
        .types
        .iter()
        .any(|t| t.eq_ignore_ascii_case(&mv.move_type))
    {
        STAB
    } else {
        1.0
    };
    let effectiveness = chart.effectiveness(&mv.move_type, &defender.types);
    let base =
        0.5 * mv.power * attacker.attack / defender.defense * stab * effectiveness * PVP_BONUS;
    (base.floor() as u32).saturating_add(1)
}

/// Multiplier for a single stage counter: `+n` -> `(n+4)/4`, `-n` -> `4/(n+4)`.
pub fn boost_factor(stage: i32) -> f64 {
    (stage.max(0) as f64 + 4.0) / ((-stage).max(0) as f64 + 4.0)
}

/// Rescales raw damage by the attacker's attack stage and the defender's defense stage.
///
/// A positive defense stage reduces the damage taken.
pub fn apply_status(raw_damage: u32, attack_stage: i32, defense_stage: i32) -> u32 {
    if attack_stage == 0 && defense_stage == 0 {
        return raw_damage;
    }
    let multiplier = boost_factor(attack_stage) * boost_factor(-defense_stage);
    let scaled = ((raw_damage as f64 - 1.0) * multiplier).floor();
    (scaled.max(0.0) as u32).saturating_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::Move;

    fn stats(types: &[&str], attack: f64, defense: f64) -> CombatStats {
        CombatStats {
            species_id: "mon".to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
            attack,
            defense,
            max_hp: 100,
        }
    }

    fn mv(move_type: &str, power: f64) -> Move {
        Move {
            id: "TEST".to_string(),
            move_type: move_type.to_string(),
            power,
            damage: 0,
            energy_delta: -40,
            cooldown_ms: 500,
            buff: None,
        }
    }

    #[test]
    fn formula_matches_hand_computation() {
        let attacker = stats(&["fighting"], 100.0, 100.0);
        let defender = stats(&["normal"], 100.0, 100.0);
        // 0.5 * 10 * 1 * 1.2 * 1.6 * 1.3 = 12.48
        let damage = move_damage(&mv("fighting", 10.0), &attacker, &defender, &TypeChart::Standard);
        assert_eq!(damage, 13);
    }

    #[test]
    fn zero_power_still_chips() {
        let a = stats(&["water"], 50.0, 200.0);
        let damage = move_damage(&mv("normal", 0.0), &a, &a, &TypeChart::Standard);
        assert_eq!(damage, 1);
    }

    #[test]
    fn stage_factors() {
        assert_eq!(boost_factor(0), 1.0);
        assert_eq!(boost_factor(1), 1.25);
        assert_eq!(boost_factor(4), 2.0);
        assert_eq!(boost_factor(-1), 0.8);
        assert_eq!(boost_factor(-4), 0.5);
    }

    #[test]
    fn status_passthrough_and_scaling() {
        assert_eq!(apply_status(41, 0, 0), 41);
        // +1 attack: (41-1) * 1.25 + 1
        assert_eq!(apply_status(41, 1, 0), 51);
        // +1 defense on the target: (41-1) * 0.8 + 1
        assert_eq!(apply_status(41, 0, 1), 33);
        // -1 defense on the target: (41-1) * 1.25 + 1
        assert_eq!(apply_status(41, 0, -1), 51);
        assert_eq!(apply_status(1, -4, 4), 1);
    }
}
