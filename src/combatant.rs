use crate::moves::{Moveset, StageDelta};
use crate::stats::CombatStats;
use std::fmt;

pub const MAX_ENERGY: u32 = 100;

/// Result of a charge move hitting a combatant.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChargeOutcome {
    Blocked,
    Hit,
}

/// Mutable per-battle state of one side.
#[derive(Clone, Debug)]
pub struct Combatant {
    pub id: String,
    pub stats: CombatStats,
    pub moveset: Moveset,
    pub health: u32,
    pub max_health: u32,
    pub energy: u32,
    pub shields: u8,
    pub charge_moves_thrown: u32,
    pub attack_stage: i32,
    pub defense_stage: i32,
    /// Set while this combatant's charge move is being resolved; cleared on reconciliation.
    pub charge_thrown: bool,
    /// Fast moves since the last charge event of either side.
    pub fastmoves_thrown: u32,
    /// Total ticks spent on fast moves this battle. Diagnostic only; checkpoints
    /// come from the battle clock, which restarts after every charge event.
    pub elapsed_ticks: u64,
}

impl Combatant {
    pub fn new(stats: CombatStats, moveset: Moveset, shields: u8) -> Self {
        Combatant {
            id: stats.species_id.clone(),
            health: stats.max_hp,
            max_health: stats.max_hp,
            stats,
            moveset,
            energy: 0,
            shields,
            charge_moves_thrown: 0,
            attack_stage: 0,
            defense_stage: 0,
            charge_thrown: false,
            fastmoves_thrown: 0,
            elapsed_ticks: 0,
        }
    }

    pub fn apply_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    pub fn register_fast_move(&mut self) {
        let fast = &self.moveset.fast;
        self.energy = (self.energy + fast.energy_gain()).min(MAX_ENERGY);
        self.elapsed_ticks += fast.cooldown_ticks() as u64;
        self.fastmoves_thrown += 1;
    }

    pub fn spend_energy(&mut self, cost: u32) {
        self.energy = self.energy.saturating_sub(cost);
    }

    /// Shield if one is left (1 chip damage), otherwise take the full hit.
    pub fn receive_charge(&mut self, damage: u32) -> ChargeOutcome {
        if self.shields > 0 {
            self.shields -= 1;
            self.apply_damage(1);
            ChargeOutcome::Blocked
        } else {
            self.apply_damage(damage);
            ChargeOutcome::Hit
        }
    }

    pub fn apply_stages(&mut self, delta: StageDelta) {
        self.attack_stage += delta.atk;
        self.defense_stage += delta.def;
    }

    pub fn fast_ticks(&self) -> u32 {
        self.moveset.fast.cooldown_ticks().max(1)
    }

    /// Elapsed time of this combatant's fast moves since the last charge event.
    pub fn fast_phase(&self) -> u64 {
        self.fastmoves_thrown as u64 * self.fast_ticks() as u64
    }

    pub fn reset_phase(&mut self) {
        self.fastmoves_thrown = 0;
        self.charge_thrown = false;
    }

    pub fn is_fainted(&self) -> bool {
        self.health == 0
    }

    pub fn remaining_fraction(&self) -> f64 {
        self.health as f64 / self.max_health as f64
    }
}

impl fmt::Display for Combatant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}, {})",
            self.id, self.health, self.energy, self.fastmoves_thrown
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::Move;

    fn fast(gain: i32, cooldown_ms: u32) -> Move {
        Move {
            id: "FAST".to_string(),
            move_type: "normal".to_string(),
            power: 3.0,
            damage: 3,
            energy_delta: gain,
            cooldown_ms,
            buff: None,
        }
    }

    fn charge(cost: i32) -> Move {
        Move {
            id: "CHARGE".to_string(),
            move_type: "normal".to_string(),
            power: 80.0,
            damage: 80,
            energy_delta: -cost,
            cooldown_ms: 500,
            buff: None,
        }
    }

    fn combatant(gain: i32, cooldown_ms: u32, shields: u8) -> Combatant {
        let stats = CombatStats {
            species_id: "testmon".to_string(),
            types: vec!["normal".to_string()],
            attack: 100.0,
            defense: 100.0,
            max_hp: 150,
        };
        let moveset = Moveset {
            fast: fast(gain, cooldown_ms),
            charge: [charge(50), charge(65)],
        };
        Combatant::new(stats, moveset, shields)
    }

    #[test]
    fn five_fast_moves_reach_fifty_energy() {
        let mut mon = combatant(10, 2000, 0);
        for _ in 0..5 {
            mon.register_fast_move();
        }
        assert_eq!(mon.energy, 50);
        assert_eq!(mon.elapsed_ticks, 20);
        assert_eq!(mon.fastmoves_thrown, 5);
        assert!(mon.energy >= mon.moveset.charge[0].energy_cost());
    }

    #[test]
    fn energy_clamps_at_max() {
        let mut mon = combatant(13, 1000, 0);
        for _ in 0..20 {
            mon.register_fast_move();
        }
        assert_eq!(mon.energy, MAX_ENERGY);
        mon.spend_energy(250);
        assert_eq!(mon.energy, 0);
    }

    #[test]
    fn shield_absorbs_charge_for_chip_damage() {
        let mut mon = combatant(10, 1000, 1);
        assert_eq!(mon.receive_charge(80), ChargeOutcome::Blocked);
        assert_eq!(mon.health, 149);
        assert_eq!(mon.shields, 0);
        assert_eq!(mon.receive_charge(80), ChargeOutcome::Hit);
        assert_eq!(mon.health, 69);
    }

    #[test]
    fn damage_floors_at_zero() {
        let mut mon = combatant(10, 1000, 0);
        mon.apply_damage(0);
        assert_eq!(mon.health, 150);
        mon.apply_damage(1000);
        assert_eq!(mon.health, 0);
        assert!(mon.is_fainted());
    }
}
