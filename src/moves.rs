use crate::error::{Result, SimError};
use crate::model::{GameMaster, MoveData};
use phf::phf_set;

/// Length of one logical tick in game milliseconds.
pub const TICK_MS: u32 = 500;

// Moves whose primary payload debuffs the target while a second payload boosts the user.
static SPLIT_BUFF_MOVES: phf::Set<&'static str> = phf_set! {
    "OBSTRUCT",
};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StageDelta {
    pub atk: i32,
    pub def: i32,
}

impl StageDelta {
    fn from_pair(pair: [i32; 2]) -> Self {
        StageDelta {
            atk: pair[0],
            def: pair[1],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BuffTarget {
    SelfBuff,
    OpponentDebuff,
    /// Primary delta goes to the opponent, the carried delta to the user.
    OpponentDebuffWithSelfBuff(StageDelta),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuffPayload {
    pub chance: f64,
    pub delta: StageDelta,
    pub target: BuffTarget,
}

impl BuffPayload {
    fn from_data(data: &MoveData) -> Option<Self> {
        let chance = data.buff_apply_chance?;
        let buffs = data.buffs?;
        let target = if is_split_buff(data) {
            BuffTarget::OpponentDebuffWithSelfBuff(
                data.buffs_self.map(StageDelta::from_pair).unwrap_or_default(),
            )
        } else {
            let archetype = data.archetype.as_deref().unwrap_or("");
            if archetype.contains("Self") || archetype.contains("Boost") {
                BuffTarget::SelfBuff
            } else {
                BuffTarget::OpponentDebuff
            }
        };
        Some(BuffPayload {
            chance,
            delta: StageDelta::from_pair(buffs),
            target,
        })
    }
}

fn is_split_buff(data: &MoveData) -> bool {
    let id = data.move_id.to_ascii_uppercase();
    let name = data.name.to_ascii_uppercase();
    SPLIT_BUFF_MOVES.contains(id.as_str()) || SPLIT_BUFF_MOVES.contains(name.as_str())
}

#[derive(Clone, Debug, PartialEq)]
pub struct Move {
    pub id: String,
    pub move_type: String,
    pub power: f64,
    /// Damage against the current opponent; filled in per pairing.
    pub damage: u32,
    /// Positive: gain for fast moves. Negative: cost for charge moves.
    pub energy_delta: i32,
    pub cooldown_ms: u32,
    pub buff: Option<BuffPayload>,
}

impl Move {
    pub fn fast(data: &MoveData) -> Result<Self> {
        if data.cooldown < TICK_MS || data.cooldown % TICK_MS != 0 {
            return Err(SimError::InvalidConfig(format!(
                "fast move '{}' cooldown {}ms is not a positive multiple of {TICK_MS}ms",
                data.move_id, data.cooldown
            )));
        }
        Ok(Move {
            id: data.move_id.clone(),
            move_type: data.move_type.clone(),
            power: data.power,
            damage: 0,
            energy_delta: data.energy_gain,
            cooldown_ms: data.cooldown,
            buff: None,
        })
    }

    pub fn charge(data: &MoveData) -> Self {
        Move {
            id: data.move_id.clone(),
            move_type: data.move_type.clone(),
            power: data.power,
            damage: 0,
            energy_delta: -data.energy,
            cooldown_ms: data.cooldown,
            buff: BuffPayload::from_data(data),
        }
    }

    pub fn energy_cost(&self) -> u32 {
        (-self.energy_delta).max(0) as u32
    }

    pub fn energy_gain(&self) -> u32 {
        self.energy_delta.max(0) as u32
    }

    pub fn cooldown_ticks(&self) -> u32 {
        self.cooldown_ms / TICK_MS
    }

    /// Damage per point of energy; free moves rank first.
    pub fn efficiency(&self) -> f64 {
        match self.energy_cost() {
            0 => f64::INFINITY,
            cost => self.damage as f64 / cost as f64,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChargeSlot {
    First,
    Second,
}

impl ChargeSlot {
    pub fn index(self) -> usize {
        match self {
            ChargeSlot::First => 0,
            ChargeSlot::Second => 1,
        }
    }
}

/// One fast move and two charge moves bound to a combatant.
#[derive(Clone, Debug, PartialEq)]
pub struct Moveset {
    pub fast: Move,
    pub charge: [Move; 2],
}

impl Moveset {
    /// Builds a moveset from `[fast, charge, charge]` ids.
    pub fn from_ids<S: AsRef<str>>(gm: &GameMaster, ids: &[S]) -> Result<Self> {
        let [fast, first, second] = ids else {
            return Err(SimError::InvalidConfig(format!(
                "moveset needs exactly 3 moves, got {}",
                ids.len()
            )));
        };
        Ok(Moveset {
            fast: Move::fast(gm.move_data(fast.as_ref())?)?,
            charge: [
                Move::charge(gm.move_data(first.as_ref())?),
                Move::charge(gm.move_data(second.as_ref())?),
            ],
        })
    }

    /// Slot of the charge move with the better damage/energy ratio (first slot on ties).
    pub fn energy_efficient_slot(&self) -> ChargeSlot {
        if self.charge[1].efficiency() > self.charge[0].efficiency() {
            ChargeSlot::Second
        } else {
            ChargeSlot::First
        }
    }

    pub fn higher_damage_slot(&self) -> ChargeSlot {
        let [first, second] = &self.charge;
        if first.damage == second.damage {
            self.energy_efficient_slot()
        } else if first.damage > second.damage {
            ChargeSlot::First
        } else {
            ChargeSlot::Second
        }
    }

    /// Slot of the cheaper charge move (first slot on ties).
    pub fn bait_slot(&self) -> ChargeSlot {
        if self.charge[1].energy_cost() < self.charge[0].energy_cost() {
            ChargeSlot::Second
        } else {
            ChargeSlot::First
        }
    }

    pub fn charge_move(&self, slot: ChargeSlot) -> &Move {
        &self.charge[slot.index()]
    }

    pub fn higher_damage(&self) -> &Move {
        self.charge_move(self.higher_damage_slot())
    }

    pub fn bait_move(&self) -> &Move {
        self.charge_move(self.bait_slot())
    }
}
