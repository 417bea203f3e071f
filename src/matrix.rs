use crate::battle::{BattleOptions, BattleOutcome};
use crate::engine::{run_battle, Contender, StaticData};
use crate::error::SimError;
use crate::stats::League;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use std::path::Path;

/// Order-independent identifier of a pairing, e.g. `"azumarill_medicham"`.
pub fn pair_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}_{b}")
    } else {
        format!("{b}_{a}")
    }
}

/// Signed remaining-health fractions from the row species' point of view.
#[derive(Clone, Debug)]
pub struct MatchupMatrix {
    pub species: Vec<String>,
    pub cells: Vec<Vec<f64>>,
    /// Pair key -> reason, for pairings that produced no winner.
    pub failures: BTreeMap<String, String>,
}

impl MatchupMatrix {
    pub fn cell(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.species.iter().position(|s| s == row)?;
        let j = self.species.iter().position(|s| s == col)?;
        Some(self.cells[i][j])
    }
}

/// Buff-roll seed for a pairing, derived from its key so list order does not matter.
pub fn pair_seed(base: u64, key: &str) -> u64 {
    let mut hasher = std::hash::DefaultHasher::new();
    key.hash(&mut hasher);
    base ^ hasher.finish()
}

struct PairResult {
    key: String,
    outcome: Result<BattleOutcome, SimError>,
}

pub fn compute_matrix(
    data: &StaticData<'_>,
    species: &[String],
    league: League,
    options: &BattleOptions,
) -> MatchupMatrix {
    let mut unique: Vec<String> = Vec::new();
    for id in species {
        if !unique.contains(id) {
            unique.push(id.clone());
        }
    }
    let n = unique.len();
    let tasks: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect();

    let results: Vec<PairResult> = tasks
        .par_iter()
        .map(|&(i, j)| {
            // Simulate in sorted order so a pair's result does not depend on row order.
            let (first, second) = if unique[i] <= unique[j] {
                (&unique[i], &unique[j])
            } else {
                (&unique[j], &unique[i])
            };
            let key = pair_key(first, second);
            let pair_options = BattleOptions {
                seed: pair_seed(options.seed, &key),
                ..options.clone()
            };
            let outcome = run_battle(
                data,
                &Contender::new(first.as_str()),
                &Contender::new(second.as_str()),
                league,
                &pair_options,
            );
            PairResult { key, outcome }
        })
        .collect();

    let mut by_key: HashMap<String, BattleOutcome> = HashMap::new();
    let mut failures = BTreeMap::new();
    for result in results {
        match result.outcome {
            Ok(outcome) => {
                by_key.insert(result.key, outcome);
            }
            Err(err) => {
                tracing::warn!(pair = %result.key, error = %err, "pairing failed");
                failures.insert(result.key, err.to_string());
            }
        }
    }

    let mut cells = vec![vec![0.0; n]; n];
    for (i, row) in unique.iter().enumerate() {
        for (j, col) in unique.iter().enumerate() {
            if i == j {
                continue;
            }
            if let Some(outcome) = by_key.get(&pair_key(row, col)) {
                cells[i][j] = if outcome.winner == *row {
                    outcome.remaining_fraction
                } else {
                    -outcome.remaining_fraction
                };
            }
        }
    }
    tracing::info!(species = n, failures = failures.len(), "matrix computed");

    MatchupMatrix {
        species: unique,
        cells,
        failures,
    }
}

pub fn write_csv(matrix: &MatchupMatrix, path: &Path) -> anyhow::Result<()> {
    let mut out = String::from("species");
    for id in &matrix.species {
        out.push(',');
        out.push_str(id);
    }
    for (id, row) in matrix.species.iter().zip(&matrix.cells) {
        out.push('\n');
        out.push_str(id);
        for value in row {
            out.push_str(&format!(",{value:.4}"));
        }
    }
    out.push('\n');
    std::fs::write(path, out)?;
    Ok(())
}
