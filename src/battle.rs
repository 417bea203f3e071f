use crate::combatant::{ChargeOutcome, Combatant};
use crate::damage::apply_status;
use crate::error::{Result, SimError};
use crate::log::BattleLog;
use crate::moves::{BuffTarget, ChargeSlot, Move};
use crate::policy::ChargePolicy;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub const DEFAULT_MAX_STALLED_ROUNDS: u32 = 10;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BattleOptions {
    /// Shields for side A and side B.
    pub shields: [u8; 2],
    /// Apply every buff regardless of its chance.
    pub deterministic_buffs: bool,
    pub seed: u64,
    /// Consecutive charge rounds without any fast move before giving up.
    pub max_stalled_rounds: u32,
}

impl Default for BattleOptions {
    fn default() -> Self {
        BattleOptions {
            shields: [1, 1],
            deterministic_buffs: false,
            seed: 0,
            max_stalled_rounds: DEFAULT_MAX_STALLED_ROUNDS,
        }
    }
}

/// Where the battle is between super-ticks.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    /// Fast-move ticks are running.
    Running,
    /// At least one charge move was announced and the clock is frozen.
    ChargePending,
    /// Charge moves landed; sneak check and phase reset still to do.
    Resolved,
    Over,
}

#[derive(Clone, Debug)]
pub struct BattleOutcome {
    pub winner: String,
    pub winner_side: Side,
    /// Winner's health over max health.
    pub remaining_fraction: f64,
    pub log: BattleLog,
    pub ticks: u64,
    pub charge_moves: u32,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Decision {
    Fast,
    Charge(ChargeSlot),
}

/// Lockstep battle between two combatants.
///
/// Each call to [`Battle::step`] advances one super-tick: a fast-move tick,
/// a charge resolution, or the reconciliation that follows it. While a charge
/// move is pending no fast move lands and the clock does not advance.
pub struct Battle<'p> {
    combatants: [Combatant; 2],
    priority: [Side; 2],
    policies: [&'p dyn ChargePolicy; 2],
    pending: [Option<ChargeSlot>; 2],
    phase: Phase,
    /// Ticks since the last charge event; checkpoints are multiples of a fast move's ticks.
    clock: u64,
    tick: u64,
    stalled_rounds: u32,
    max_stalled_rounds: u32,
    deterministic_buffs: bool,
    rng: SmallRng,
    log: BattleLog,
}

impl<'p> Battle<'p> {
    pub fn new(
        a: Combatant,
        b: Combatant,
        policies: [&'p dyn ChargePolicy; 2],
        options: &BattleOptions,
    ) -> Self {
        // Higher attack acts first, A keeps the lead on ties.
        let priority = if b.stats.attack > a.stats.attack {
            [Side::B, Side::A]
        } else {
            [Side::A, Side::B]
        };
        Battle {
            combatants: [a, b],
            priority,
            policies,
            pending: [None, None],
            phase: Phase::Running,
            clock: 0,
            tick: 0,
            stalled_rounds: 0,
            max_stalled_rounds: options.max_stalled_rounds,
            deterministic_buffs: options.deterministic_buffs,
            rng: SmallRng::seed_from_u64(options.seed),
            log: BattleLog::new(),
        }
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        &self.combatants[side.index()]
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn priority(&self) -> [Side; 2] {
        self.priority
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn log(&self) -> &BattleLog {
        &self.log
    }

    pub fn run(mut self) -> Result<BattleOutcome> {
        self.log_status();
        while self.phase != Phase::Over {
            self.step()?;
        }
        Ok(self.finish())
    }

    pub fn step(&mut self) -> Result<Phase> {
        match self.phase {
            Phase::Running => self.run_tick(),
            Phase::ChargePending => self.resolve_charges()?,
            Phase::Resolved => self.reconcile(),
            Phase::Over => {}
        }
        Ok(self.phase)
    }

    fn decide(&self, side: Side) -> Option<Decision> {
        let me = self.combatant(side);
        if self.clock % me.fast_ticks() as u64 != 0 {
            return None;
        }
        let opponent = self.combatant(side.opponent());
        let incoming = apply_status(
            opponent.moveset.fast.damage,
            opponent.attack_stage,
            me.defense_stage,
        );
        let choice = self.policies[side.index()].decide(me, opponent.shields, incoming);
        Some(choice.map_or(Decision::Fast, Decision::Charge))
    }

    fn run_tick(&mut self) {
        // Both sides decide against the state at the start of the tick.
        let decisions = [self.decide(Side::A), self.decide(Side::B)];
        if decisions
            .iter()
            .any(|d| matches!(d, Some(Decision::Charge(_))))
        {
            for side in self.priority {
                if let Some(Decision::Charge(slot)) = decisions[side.index()] {
                    self.pending[side.index()] = Some(slot);
                    let me = &mut self.combatants[side.index()];
                    me.charge_thrown = true;
                    self.log.log_charge_pending(self.tick, &me.to_string());
                }
            }
            self.phase = Phase::ChargePending;
            return;
        }

        for side in self.priority {
            if decisions[side.index()] == Some(Decision::Fast) {
                self.fast_attack(side, false);
                if self.combatant(side.opponent()).is_fainted() {
                    self.faint(side.opponent());
                    return;
                }
            }
        }
        self.clock += 1;
        self.tick += 1;
    }

    fn fast_attack(&mut self, side: Side, sneak: bool) {
        let (attacker, defender) = pair_mut(&mut self.combatants, side);
        attacker.register_fast_move();
        let damage = apply_status(
            attacker.moveset.fast.damage,
            attacker.attack_stage,
            defender.defense_stage,
        );
        defender.apply_damage(damage);
        self.stalled_rounds = 0;

        let (a, d) = (attacker.to_string(), defender.to_string());
        let move_id = &attacker.moveset.fast.id;
        if sneak {
            self.log.log_sneak(self.tick, &a, &d, move_id);
        } else {
            self.log.log_fast(self.tick, &a, &d, move_id);
        }
    }

    fn resolve_charges(&mut self) -> Result<()> {
        self.stalled_rounds += 1;
        if self.stalled_rounds > self.max_stalled_rounds {
            tracing::error!(
                rounds = self.stalled_rounds,
                tick = self.tick,
                a = %self.combatants[0],
                b = %self.combatants[1],
                "charge resolution did not converge"
            );
            self.phase = Phase::Over;
            return Err(SimError::NonConvergence {
                rounds: self.stalled_rounds,
            });
        }

        for side in self.priority {
            let Some(slot) = self.pending[side.index()].take() else {
                continue;
            };
            let (attacker, defender) = pair_mut(&mut self.combatants, side);
            let mv = attacker.moveset.charge_move(slot).clone();
            attacker.spend_energy(mv.energy_cost());
            attacker.charge_moves_thrown += 1;
            let damage = apply_status(mv.damage, attacker.attack_stage, defender.defense_stage);
            let outcome = defender.receive_charge(damage);

            self.log.log_charge(self.tick, &attacker.id, &mv.id);
            if outcome == ChargeOutcome::Blocked {
                self.log.log_shield(self.tick, &defender.id);
            }
            self.apply_buff(side, &mv);

            if self.combatant(side.opponent()).is_fainted() {
                self.pending = [None, None];
                self.faint(side.opponent());
                return Ok(());
            }
        }
        self.phase = Phase::Resolved;
        Ok(())
    }

    fn apply_buff(&mut self, side: Side, mv: &Move) {
        let Some(buff) = mv.buff else {
            return;
        };
        if !self.deterministic_buffs && self.rng.gen::<f64>() >= buff.chance {
            return;
        }
        let (attacker, defender) = pair_mut(&mut self.combatants, side);
        match buff.target {
            BuffTarget::SelfBuff => {
                attacker.apply_stages(buff.delta);
                self.log.log_boost(
                    self.tick,
                    &attacker.id,
                    attacker.attack_stage,
                    attacker.defense_stage,
                );
            }
            BuffTarget::OpponentDebuff => {
                defender.apply_stages(buff.delta);
                self.log.log_debuff(
                    self.tick,
                    &defender.id,
                    defender.attack_stage,
                    defender.defense_stage,
                );
            }
            BuffTarget::OpponentDebuffWithSelfBuff(self_delta) => {
                defender.apply_stages(buff.delta);
                self.log.log_debuff(
                    self.tick,
                    &defender.id,
                    defender.attack_stage,
                    defender.defense_stage,
                );
                attacker.apply_stages(self_delta);
                self.log.log_boost(
                    self.tick,
                    &attacker.id,
                    attacker.attack_stage,
                    attacker.defense_stage,
                );
            }
        }
    }

    /// Sneak check, then both phase clocks restart.
    fn reconcile(&mut self) {
        let [a, b] = &self.combatants;
        let sneaker = match (a.charge_thrown, b.charge_thrown) {
            (true, false) => Some(Side::B),
            (false, true) => Some(Side::A),
            _ => None,
        };
        // Counters still hold their values from when the charge was announced.
        let aligned = a.fast_phase() == b.fast_phase();

        if let Some(side) = sneaker.filter(|_| aligned) {
            self.fast_attack(side, true);
            if self.combatant(side.opponent()).is_fainted() {
                self.faint(side.opponent());
                return;
            }
        }

        for mon in &mut self.combatants {
            mon.reset_phase();
        }
        self.clock = 0;
        self.tick += 1;
        self.phase = Phase::Running;
        self.log_status();
    }

    fn faint(&mut self, side: Side) {
        self.log
            .log_faint(self.tick, &self.combatants[side.index()].id);
        self.phase = Phase::Over;
    }

    fn log_status(&mut self) {
        let [first, second] = self.priority;
        self.log.log_status(
            self.tick,
            &self.combatants[first.index()].to_string(),
            &self.combatants[second.index()].to_string(),
        );
    }

    fn winner_side(&self) -> Side {
        let [first, second] = self.priority;
        match (
            self.combatant(first).is_fainted(),
            self.combatant(second).is_fainted(),
        ) {
            (true, false) => second,
            // Double knockout goes to whoever acts first.
            _ => first,
        }
    }

    fn finish(mut self) -> BattleOutcome {
        self.log_status();
        let winner_side = self.winner_side();
        let winner = &self.combatants[winner_side.index()];
        let remaining_fraction = winner.remaining_fraction();
        let winner_id = winner.id.clone();
        self.log.log_win(self.tick, &winner_id, remaining_fraction);
        tracing::info!(
            winner = %winner_id,
            remaining = remaining_fraction,
            ticks = self.tick,
            fast_ticks_a = self.combatants[0].elapsed_ticks,
            fast_ticks_b = self.combatants[1].elapsed_ticks,
            "battle finished"
        );
        BattleOutcome {
            winner: winner_id,
            winner_side,
            remaining_fraction,
            ticks: self.tick,
            charge_moves: self
                .combatants
                .iter()
                .map(|c| c.charge_moves_thrown)
                .sum(),
            log: self.log,
        }
    }
}

fn pair_mut(combatants: &mut [Combatant; 2], side: Side) -> (&mut Combatant, &mut Combatant) {
    let [a, b] = combatants;
    match side {
        Side::A => (a, b),
        Side::B => (b, a),
    }
}
