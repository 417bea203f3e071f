use crate::combatant::Combatant;
use crate::moves::ChargeSlot;

/// Decides, at a fast-move checkpoint, whether to throw a charge move.
///
/// Returns the charge slot to throw, or `None` to keep using the fast move.
pub trait ChargePolicy {
    fn decide(
        &self,
        me: &Combatant,
        opponent_shields: u8,
        opponent_fast_damage: u32,
    ) -> Option<ChargeSlot>;
}

/// Throws the stronger move once affordable, except that the first throw
/// baits a shield with the cheaper move. Falls back to the cheaper move when
/// the next incoming fast move would knock this combatant out.
#[derive(Clone, Copy, Debug, Default)]
pub struct BaitFirstPolicy;

impl ChargePolicy for BaitFirstPolicy {
    fn decide(
        &self,
        me: &Combatant,
        opponent_shields: u8,
        opponent_fast_damage: u32,
    ) -> Option<ChargeSlot> {
        let moveset = &me.moveset;
        if me.energy >= moveset.higher_damage().energy_cost() {
            if me.charge_moves_thrown == 0 && opponent_shields > 0 {
                return Some(moveset.bait_slot());
            }
            return Some(moveset.higher_damage_slot());
        }
        if me.health <= opponent_fast_damage && me.energy >= moveset.bait_move().energy_cost() {
            return Some(moveset.bait_slot());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::{Move, Moveset};
    use crate::stats::CombatStats;

    fn mv(id: &str, damage: u32, energy_delta: i32) -> Move {
        Move {
            id: id.to_string(),
            move_type: "normal".to_string(),
            power: damage as f64,
            damage,
            energy_delta,
            cooldown_ms: 1000,
            buff: None,
        }
    }

    // Bait costs 40, nuke costs 55.
    fn mon(energy: u32, health: u32, thrown: u32) -> Combatant {
        let stats = CombatStats {
            species_id: "medicham".to_string(),
            types: vec!["fighting".to_string()],
            attack: 100.0,
            defense: 100.0,
            max_hp: 140,
        };
        let moveset = Moveset {
            fast: mv("COUNTER", 8, 7),
            charge: [mv("PSYCHIC", 90, -55), mv("ICE_PUNCH", 55, -40)],
        };
        let mut mon = Combatant::new(stats, moveset, 1);
        mon.energy = energy;
        mon.health = health;
        mon.charge_moves_thrown = thrown;
        mon
    }

    #[test]
    fn first_throw_baits_into_shield() {
        let me = mon(60, 140, 0);
        assert_eq!(BaitFirstPolicy.decide(&me, 1, 5), Some(ChargeSlot::Second));
    }

    #[test]
    fn nuke_when_no_shields_or_after_first_throw() {
        assert_eq!(BaitFirstPolicy.decide(&mon(60, 140, 0), 0, 5), Some(ChargeSlot::First));
        assert_eq!(BaitFirstPolicy.decide(&mon(60, 140, 1), 1, 5), Some(ChargeSlot::First));
    }

    #[test]
    fn desperation_throws_bait() {
        assert_eq!(BaitFirstPolicy.decide(&mon(45, 6, 1), 0, 6), Some(ChargeSlot::Second));
        assert_eq!(BaitFirstPolicy.decide(&mon(45, 7, 1), 0, 6), None);
        assert_eq!(BaitFirstPolicy.decide(&mon(30, 6, 1), 0, 6), None);
    }
}
