use proptest::prelude::*;
use pvp_battle_sim::combatant::{Combatant, MAX_ENERGY};
use pvp_battle_sim::damage::{apply_status, move_damage};
use pvp_battle_sim::moves::{Move, Moveset};
use pvp_battle_sim::stats::CombatStats;
use pvp_battle_sim::types::TypeChart;

const TYPES: [&str; 6] = ["normal", "fighting", "water", "steel", "ghost", "fairy"];

fn stats(types: Vec<String>, attack: f64, defense: f64) -> CombatStats {
    CombatStats {
        species_id: "mon".to_string(),
        types,
        attack,
        defense,
        max_hp: 150,
    }
}

fn mv(move_type: &str, power: f64, energy_delta: i32) -> Move {
    Move {
        id: "MOVE".to_string(),
        move_type: move_type.to_string(),
        power,
        damage: 3,
        energy_delta,
        cooldown_ms: 1000,
        buff: None,
    }
}

fn type_list() -> impl Strategy<Value = Vec<String>> {
    prop::sample::subsequence(TYPES.to_vec(), 1..=2)
        .prop_map(|types| types.into_iter().map(str::to_string).collect())
}

proptest! {
    #[test]
    fn damage_is_positive_and_monotone(
        move_type in prop::sample::select(TYPES.to_vec()),
        atk_types in type_list(),
        def_types in type_list(),
        power in 0.0f64..300.0,
        extra_power in 0.0f64..100.0,
        attack in 50.0f64..300.0,
        extra_attack in 0.0f64..100.0,
        defense in 50.0f64..300.0,
        extra_defense in 0.0f64..100.0,
    ) {
        let chart = TypeChart::Standard;
        let attacker = stats(atk_types.clone(), attack, 100.0);
        let defender = stats(def_types.clone(), 100.0, defense);
        let base = move_damage(&mv(move_type, power, -50), &attacker, &defender, &chart);
        prop_assert!(base >= 1);

        let stronger_move = move_damage(&mv(move_type, power + extra_power, -50), &attacker, &defender, &chart);
        prop_assert!(stronger_move >= base);

        let stronger_attacker = stats(atk_types, attack + extra_attack, 100.0);
        prop_assert!(move_damage(&mv(move_type, power, -50), &stronger_attacker, &defender, &chart) >= base);

        let sturdier = stats(def_types, 100.0, defense + extra_defense);
        prop_assert!(move_damage(&mv(move_type, power, -50), &attacker, &sturdier, &chart) <= base);
    }

    #[test]
    fn status_never_drops_below_one(raw in 1u32..500, atk in -4i32..=4, def in -4i32..=4) {
        let scaled = apply_status(raw, atk, def);
        prop_assert!(scaled >= 1);
        if atk >= 0 && def <= 0 {
            prop_assert!(scaled >= raw);
        }
        if atk <= 0 && def >= 0 {
            prop_assert!(scaled <= raw);
        }
    }

    #[test]
    fn energy_stays_in_bounds(
        gain in 0i32..=20,
        ops in prop::collection::vec(prop::option::of(0u32..=120), 0..200),
    ) {
        let fast = mv("normal", 5.0, gain);
        let charge = mv("normal", 50.0, -50);
        let mut mon = Combatant::new(
            stats(vec!["normal".to_string()], 100.0, 100.0),
            Moveset { fast, charge: [charge.clone(), charge] },
            0,
        );
        for op in ops {
            match op {
                None => mon.register_fast_move(),
                Some(cost) => mon.spend_energy(cost),
            }
            prop_assert!(mon.energy <= MAX_ENERGY);
        }
    }

    #[test]
    fn each_shield_blocks_exactly_once(shields in 1u8..=3, damage in 2u32..100) {
        let fast = mv("normal", 5.0, 5);
        let charge = mv("normal", 50.0, -50);
        let mut mon = Combatant::new(
            stats(vec!["normal".to_string()], 100.0, 100.0),
            Moveset { fast, charge: [charge.clone(), charge] },
            shields,
        );
        for _ in 0..shields {
            mon.receive_charge(damage);
        }
        prop_assert_eq!(mon.shields, 0);
        prop_assert_eq!(mon.health, 150 - shields as u32);
        mon.receive_charge(damage);
        prop_assert_eq!(mon.health, (150 - shields as u32).saturating_sub(damage));
    }
}
