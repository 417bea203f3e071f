use pvp_battle_sim::{run, BattleOptions, CliOptions, League, RunMode};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn usage() -> ! {
    eprintln!(
        "Usage: pvp-battle-sim [--gamemaster gamemaster.json] [--league GL|UL|ML|CP] [--shields N,N] \
[--seed SEED] [--always-buff] [--max-rounds N] [--json] SPECIES_A SPECIES_B\n       \
pvp-battle-sim [options] --matrix a,b,c [--output matrix.csv]"
    );
    std::process::exit(1);
}

fn parse_shields(val: &str) -> anyhow::Result<[u8; 2]> {
    let parts: Vec<&str> = val.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [one] => {
            let n = one.parse()?;
            Ok([n, n])
        }
        [a, b] => Ok([a.parse()?, b.parse()?]),
        _ => anyhow::bail!("--shields expects N or N,N, got {val}"),
    }
}

fn parse_args() -> anyhow::Result<CliOptions> {
    let mut gamemaster_path = PathBuf::from("data/gamemaster.json");
    let mut league = League::default();
    let mut battle = BattleOptions::default();
    let mut json = false;
    let mut matrix: Option<Vec<String>> = None;
    let mut output_path = PathBuf::from("matrix.csv");
    let mut positional = Vec::new();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--gamemaster" => {
                gamemaster_path = args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--gamemaster requires a path (e.g. --gamemaster gamemaster.json)")
                })?;
            }
            "--league" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--league requires a name or CP cap"))?;
                league = League::parse(&val)?;
            }
            "--shields" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--shields requires N or N,N"))?;
                battle.shields = parse_shields(&val)?;
            }
            "--seed" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--seed requires a number"))?;
                battle.seed = val.parse()?;
            }
            "--max-rounds" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--max-rounds requires a number"))?;
                battle.max_stalled_rounds = val.parse()?;
            }
            "--always-buff" => battle.deterministic_buffs = true,
            "--json" => json = true,
            "--matrix" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--matrix requires a,b,c"))?;
                matrix = Some(
                    val.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect(),
                );
            }
            "--output" => {
                output_path = args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--output requires a path (e.g. --output matrix.csv)")
                })?;
            }
            "--help" | "-h" => usage(),
            other if other.starts_with("--") => {
                return Err(anyhow::anyhow!("Unknown argument {other}"))
            }
            other => positional.push(other.to_string()),
        }
    }

    let mode = match matrix {
        Some(species) => RunMode::Matrix {
            species,
            output_path,
        },
        None => {
            let [species_a, species_b]: [String; 2] = positional
                .try_into()
                .map_err(|_| anyhow::anyhow!("expected exactly two species ids"))?;
            RunMode::Single {
                species_a,
                species_b,
                json,
            }
        }
    };

    Ok(CliOptions {
        gamemaster_path,
        league,
        battle,
        mode,
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();
    let opts = parse_args()?;
    run(opts)
}
