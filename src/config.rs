/// Command-line options and the optional `cotton.toml` tuning file.
///
/// The toml file carries solver/fuzzer knobs only; anything unset falls
/// back to the constants the search code was written against.

use clap::Parser;
use serde::Deserialize;

use crate::search::fuzz::FuzzerTuning;
use crate::search::solve::SolverTuning;

#[derive(Clone, Debug, Parser)]
#[command(name = "cotton", about = "Deterministic dungeon simulator, solver and fuzzer")]
pub struct Options {
    /// Custom dungeon file.
    pub dungeon: String,

    /// Dungeon level to load.
    #[arg(short = 'l', long, default_value_t = 1)]
    pub level: i32,

    /// RNG seed for the run.
    #[arg(short = 's', long, default_value_t = 42)]
    pub seed: u64,

    /// Preload an item by (a fragment of) its dungeon-file name.
    #[arg(short = 'i', long = "item")]
    pub items: Vec<String>,

    /// Inputs to replay before handing over control.
    #[arg(short = 'm', long, default_value = "")]
    pub moves: String,

    /// Search for a winning route instead of playing.
    #[arg(long, conflicts_with = "fuzz")]
    pub solve: bool,

    /// Fuzz the input space instead of playing.
    #[arg(long)]
    pub fuzz: bool,

    /// Solver worker threads (0 = one per core).
    #[arg(short = 'j', long, default_value_t = 0)]
    pub threads: usize,

    #[arg(long)]
    pub log_level: Option<String>,
}

// ── Tuning file ──

#[derive(Deserialize, Debug, Default)]
struct TomlTuning {
    #[serde(default)]
    solver: TomlSolver,
    #[serde(default)]
    fuzzer: TomlFuzzer,
}

#[derive(Deserialize, Debug)]
#[serde(default)]
struct TomlSolver {
    backtrack: i32,
    queue_cap: usize,
    validation_seeds: u32,
    min_successes: u32,
}

impl Default for TomlSolver {
    fn default() -> Self {
        let d = SolverTuning::default();
        TomlSolver {
            backtrack: d.backtrack,
            queue_cap: d.queue_cap,
            validation_seeds: d.validation_seeds,
            min_successes: d.min_successes,
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(default)]
struct TomlFuzzer {
    max_passes: u64,
    backtrack: u16,
    cycles: u64,
    routes_path: String,
}

impl Default for TomlFuzzer {
    fn default() -> Self {
        let d = FuzzerTuning::default();
        TomlFuzzer {
            max_passes: d.max_passes,
            backtrack: d.backtrack,
            cycles: d.cycles,
            routes_path: "routes".into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Tuning {
    pub solver: SolverTuning,
    pub fuzzer: FuzzerTuning,
}

/// Read `cotton.toml` from the working directory; missing file or keys
/// fall back to defaults, a malformed file is only worth a warning.
pub fn load_tuning(opts: &Options) -> Tuning {
    let toml_cfg = match std::fs::read_to_string("cotton.toml") {
        Ok(text) => match toml::from_str::<TomlTuning>(&text) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("cotton.toml parse error: {e}; using defaults");
                TomlTuning::default()
            }
        },
        Err(_) => TomlTuning::default(),
    };

    Tuning {
        solver: SolverTuning {
            threads: opts.threads,
            backtrack: toml_cfg.solver.backtrack,
            queue_cap: toml_cfg.solver.queue_cap,
            validation_seeds: toml_cfg.solver.validation_seeds,
            min_successes: toml_cfg.solver.min_successes,
        },
        fuzzer: FuzzerTuning {
            max_passes: toml_cfg.fuzzer.max_passes,
            backtrack: toml_cfg.fuzzer.backtrack,
            cycles: toml_cfg.fuzzer.cycles,
            rng_seed: opts.seed,
            routes_path: toml_cfg.fuzzer.routes_path,
        },
    }
}
