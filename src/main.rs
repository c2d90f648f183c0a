/// Entry point: load the dungeon, then play it, solve it or fuzz it.

mod config;
mod domain;
mod search;
mod sim;
mod ui;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use crossterm::style::Stylize;
use flexi_logger::Logger;

use config::Options;
use search::fuzz::Fuzzer;
use search::route::pretty_codes;
use search::solve::solve;
use sim::level::{load_dungeon_file, LoadOptions};

/// Fatal errors (bad usage, unloadable dungeon) exit 255; victory is 0
/// and death 254, matching the simulator's historical exit codes.
const EXIT_FATAL: u8 = 255;

fn main() -> ExitCode {
    let opts = Options::parse();

    let log_spec = opts.log_level.clone().unwrap_or_else(|| "info".into());
    let _logger = Logger::try_with_env_or_str(&log_spec)
        .and_then(|l| l.log_to_stderr().start())
        .ok();

    match run(&opts) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{}", format!("{e:#}").red());
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn run(opts: &Options) -> Result<u8> {
    let tuning = config::load_tuning(opts);
    let load = LoadOptions {
        level: opts.level,
        seed: opts.seed,
        items: opts.items.clone(),
        replay: opts.moves.clone(),
    };
    let world = load_dungeon_file(&opts.dungeon, &load)?;
    log::info!(
        "loaded {} level {} ({} monsters, {} traps)",
        opts.dungeon,
        opts.level,
        world.monsters.iter().filter(|m| m.alive()).count(),
        world.traps.len(),
    );

    if opts.solve {
        let solutions = solve(&world, tuning.solver);
        if solutions.is_empty() {
            log::warn!("no winning route found");
        }
        for s in &solutions {
            println!("{}\t({:.1}%)", pretty_codes(&s.codes), s.rate * 100.0);
        }
        Ok(0)
    } else if opts.fuzz {
        let mut fuzzer = Fuzzer::new(world, tuning.fuzzer);
        let routes = fuzzer.run();
        let stats = fuzzer.stats();
        log::info!(
            "done: {} routes, {} stems, {} execs over {} cycles",
            stats.total_routes,
            stats.queued_stems,
            stats.total_execs,
            stats.queue_cycles,
        );
        for route in &routes {
            println!("{}", pretty_codes(route));
        }
        Ok(0)
    } else {
        Ok(ui::play::run(world)? as u8)
    }
}
