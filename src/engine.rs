//! Battle setup and entry points.
//!
//! Resolves species, spreads and movesets from the game master, computes
//! per-pairing move damage, then hands both combatants to the synchronizer.

use crate::battle::{Battle, BattleOptions, BattleOutcome};
use crate::combatant::Combatant;
use crate::damage::move_damage;
use crate::error::{Result, SimError};
use crate::model::{GameMaster, SpeciesData};
use crate::moves::Moveset;
use crate::policy::{BaitFirstPolicy, ChargePolicy};
use crate::stats::{CombatStats, CpmTable, League};
use crate::types::TypeChart;

/// Lookup tables derived once from a game master and shared across battles.
pub struct StaticData<'a> {
    gm: &'a GameMaster,
    cpm: CpmTable,
    chart: TypeChart,
}

impl<'a> StaticData<'a> {
    pub fn new(gm: &'a GameMaster) -> Self {
        StaticData {
            gm,
            cpm: CpmTable::new(&gm.cp_multipliers),
            chart: gm.type_chart(),
        }
    }
}

/// One side of a pairing: a species, optionally with an explicit moveset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contender {
    pub species_id: String,
    /// `[fast, charge, charge]`; the species' own moveset is used when absent.
    pub moveset: Option<Vec<String>>,
}

impl Contender {
    pub fn new(species_id: impl Into<String>) -> Self {
        Contender {
            species_id: species_id.into(),
            moveset: None,
        }
    }

    pub fn with_moveset<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.moveset = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    fn moveset_ids<'s>(&'s self, species: &'s SpeciesData) -> &'s [String] {
        self.moveset.as_deref().unwrap_or(&species.moveset)
    }
}

/// Builds both combatants for a pairing, damage already computed against each other.
pub fn prepare_combatants(
    data: &StaticData<'_>,
    a: &Contender,
    b: &Contender,
    league: League,
    shields: [u8; 2],
) -> Result<[Combatant; 2]> {
    if data.cpm.is_empty() {
        return Err(SimError::InvalidConfig(
            "game master has no CP multipliers".to_string(),
        ));
    }
    let species_a = data.gm.species(&a.species_id)?;
    let species_b = data.gm.species(&b.species_id)?;
    let stats_a = CombatStats::resolve(species_a, league, &data.cpm)?;
    let stats_b = CombatStats::resolve(species_b, league, &data.cpm)?;

    let mut moves_a = Moveset::from_ids(data.gm, a.moveset_ids(species_a))?;
    let mut moves_b = Moveset::from_ids(data.gm, b.moveset_ids(species_b))?;
    assign_damage(&mut moves_a, &stats_a, &stats_b, &data.chart);
    assign_damage(&mut moves_b, &stats_b, &stats_a, &data.chart);

    tracing::debug!(
        a = %stats_a.species_id,
        b = %stats_b.species_id,
        hp_a = stats_a.max_hp,
        hp_b = stats_b.max_hp,
        league = league.cp_cap,
        "prepared pairing"
    );
    Ok([
        Combatant::new(stats_a, moves_a, shields[0]),
        Combatant::new(stats_b, moves_b, shields[1]),
    ])
}

fn assign_damage(
    moveset: &mut Moveset,
    attacker: &CombatStats,
    defender: &CombatStats,
    chart: &TypeChart,
) {
    moveset.fast.damage = move_damage(&moveset.fast, attacker, defender, chart);
    for mv in &mut moveset.charge {
        mv.damage = move_damage(mv, attacker, defender, chart);
    }
}

/// Runs one battle with the bait-first policy on both sides.
pub fn run_battle(
    data: &StaticData<'_>,
    a: &Contender,
    b: &Contender,
    league: League,
    options: &BattleOptions,
) -> Result<BattleOutcome> {
    let policy = BaitFirstPolicy;
    run_battle_with_policies(data, a, b, league, options, [&policy, &policy])
}

pub fn run_battle_with_policies(
    data: &StaticData<'_>,
    a: &Contender,
    b: &Contender,
    league: League,
    options: &BattleOptions,
    policies: [&dyn ChargePolicy; 2],
) -> Result<BattleOutcome> {
    let [mon_a, mon_b] = prepare_combatants(data, a, b, league, options.shields)?;
    Battle::new(mon_a, mon_b, policies, options).run()
}

/// Simulates `species_a` against `species_b` using their game-master movesets.
pub fn simulate_battle(
    gm: &GameMaster,
    species_a: &str,
    species_b: &str,
    league: League,
    options: &BattleOptions,
) -> Result<BattleOutcome> {
    let data = StaticData::new(gm);
    run_battle(
        &data,
        &Contender::new(species_a),
        &Contender::new(species_b),
        league,
        options,
    )
}
