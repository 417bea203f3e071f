pub mod battle;
pub mod combatant;
pub mod damage;
pub mod engine;
pub mod error;
pub mod log;
pub mod matrix;
pub mod model;
pub mod moves;
pub mod policy;
pub mod stats;
pub mod types;

pub use crate::battle::{BattleOptions, BattleOutcome, Side};
pub use crate::engine::{simulate_battle, Contender, StaticData};
pub use crate::error::SimError;
pub use crate::stats::League;

use crate::engine::run_battle;
use crate::matrix::compute_matrix;
use crate::model::GameMaster;
use anyhow::Context;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub enum RunMode {
    Single {
        species_a: String,
        species_b: String,
        json: bool,
    },
    Matrix {
        species: Vec<String>,
        output_path: PathBuf,
    },
}

#[derive(Debug, Clone)]
pub struct CliOptions {
    pub gamemaster_path: PathBuf,
    pub league: League,
    pub battle: BattleOptions,
    pub mode: RunMode,
}

pub fn load_game_master(path: &Path) -> anyhow::Result<GameMaster> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read game master at {}", path.display()))?;
    let parsed = GameMaster::from_json(&raw)
        .with_context(|| format!("Failed to parse JSON from {}", path.display()))?;
    if parsed.cp_multipliers.is_empty() {
        anyhow::bail!("{} has no cpMultipliers", path.display());
    }
    Ok(parsed)
}

pub fn run(opts: CliOptions) -> anyhow::Result<()> {
    let gm = load_game_master(&opts.gamemaster_path)?;
    let data = StaticData::new(&gm);
    match opts.mode {
        RunMode::Single {
            species_a,
            species_b,
            json,
        } => {
            let outcome = run_battle(
                &data,
                &Contender::new(species_a.as_str()),
                &Contender::new(species_b.as_str()),
                opts.league,
                &opts.battle,
            )
            .with_context(|| format!("Battle {species_a} vs {species_b} failed"))?;
            if json {
                let mut value = outcome.log.to_json();
                value["winner"] = outcome.winner.clone().into();
                value["remaining"] = outcome.remaining_fraction.into();
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                for line in outcome.log.by_tick() {
                    println!("{line}");
                }
            }
        }
        RunMode::Matrix {
            species,
            output_path,
        } => {
            if species.len() < 2 {
                anyhow::bail!("--matrix needs at least two species");
            }
            let matrix = compute_matrix(&data, &species, opts.league, &opts.battle);
            matrix::write_csv(&matrix, &output_path)?;
            for (pair, reason) in &matrix.failures {
                eprintln!("{pair}: {reason}");
            }
            println!(
                "Wrote {n}x{n} matrix to {}",
                output_path.display(),
                n = matrix.species.len()
            );
        }
    }
    Ok(())
}
