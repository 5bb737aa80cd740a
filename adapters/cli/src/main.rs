#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Racetrack race in the terminal.

mod config;
mod console;
mod lineup;

use std::{fs, path::PathBuf, thread, time::Duration};

use anyhow::{Context, Result};
use clap::{builder::RangedU64ValueParser, Parser, ValueEnum};
use log::{debug, LevelFilter};
use racetrack_core::{CarSnapshot, Event, StrategyKind};
use racetrack_system_path_finder::Search;
use racetrack_system_race::{Race, RaceOutcome};
use racetrack_world::{query, World};
use serde::Serialize;

use crate::{
    config::{Config, FileKind},
    lineup::CarAssignment,
};

/// Turn-based vector racing on character-grid tracks.
#[derive(Debug, Parser)]
#[command(name = "racetrack", version, about)]
struct Cli {
    /// Configuration file; defaults to `racetrack.toml` when present.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Track file, looked up in the track directory when not found as given.
    #[arg(value_name = "TRACK")]
    track: PathBuf,

    /// Planner for one car, e.g. `a=path-finder` or `b=move-list:FILE`.
    ///
    /// Cars without a planner do not move.
    #[arg(long = "car", value_name = "ID=STRATEGY")]
    cars: Vec<CarAssignment>,

    /// Total number of turns after which the race is abandoned.
    #[arg(
        long,
        value_name = "TURNS",
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    max_turns: Option<usize>,

    /// Search used by path-finder cars: `cells` or `states`.
    #[arg(long, value_name = "SEARCH")]
    search: Option<Search>,

    /// Format of the result printed when the race ends.
    #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
    summary: SummaryFormat,

    /// Do not draw the track after every turn.
    #[arg(short, long)]
    quiet: bool,

    /// Log every event the turn engine emits.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SummaryFormat {
    Text,
    Json,
}

#[derive(Debug, Serialize)]
struct CarSummary {
    #[serde(flatten)]
    car: CarSnapshot,
    strategy: Option<StrategyKind>,
    turns: usize,
}

#[derive(Debug, Serialize)]
struct Summary {
    #[serde(flatten)]
    outcome: RaceOutcome,
    cars: Vec<CarSummary>,
}

/// Entry point for the Racetrack command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    let search = cli.search.unwrap_or(config.search());
    let turn_limit = cli.max_turns.unwrap_or(config.max_turns());

    let track_path = config.resolve(FileKind::Track, &cli.track);
    let text = fs::read_to_string(&track_path)
        .with_context(|| format!("failed to read track at {}", track_path.display()))?;
    let mut world = World::parse(&text)
        .with_context(|| format!("invalid track at {}", track_path.display()))?;

    let strategies = lineup::build(&world, &cli.cars, &config, search)?;
    let mut race = Race::new(strategies).with_turn_limit(turn_limit);

    let frame_delay = Duration::from_millis(config.frame_delay_ms());
    if !cli.quiet {
        print!("{}", query::render(&world));
    }
    let outcome = race.run(&mut world, |world, events| {
        for event in events {
            debug!("{event:?}");
        }
        if !cli.quiet {
            println!();
            print!("{}", query::render(world));
            report_events(world, events);
            if !frame_delay.is_zero() {
                thread::sleep(frame_delay);
            }
        }
    })?;

    match cli.summary {
        SummaryFormat::Text => println!("{}", describe(&world, outcome)),
        SummaryFormat::Json => {
            let cars = query::car_view(&world)
                .into_vec()
                .into_iter()
                .enumerate()
                .map(|(index, car)| -> Result<CarSummary> {
                    Ok(CarSummary {
                        car,
                        strategy: query::strategy_kind(&world, index)?,
                        turns: race.turns(index).unwrap_or(0),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            let summary = Summary { outcome, cars };
            println!(
                "{}",
                serde_json::to_string(&summary).context("failed to serialize race summary")?
            );
        }
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        let _ = builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn report_events(world: &World, events: &[Event]) {
    for event in events {
        let line = match *event {
            Event::CarCrashed { car, at } => format!("car {} crashed at {at}", label(world, car)),
            Event::FinishCrossedWrongWay { car, at } => {
                format!("car {} crossed the finish the wrong way at {at}", label(world, car))
            }
            Event::CheatCancelled { car, at } => {
                format!("car {} made up for its wrong-way crossing at {at}", label(world, car))
            }
            Event::RaceWon { car, at, .. } => format!("car {} won at {at}", label(world, car)),
            _ => continue,
        };
        println!("{line}");
    }
}

fn label(world: &World, car: usize) -> char {
    query::car_id(world, car).unwrap_or('?')
}

fn describe(world: &World, outcome: RaceOutcome) -> String {
    match outcome {
        RaceOutcome::Winner { id, turns, .. } => format!("car {id} wins after {turns} turns"),
        RaceOutcome::Tie => {
            let parked: String = query::car_view(world)
                .iter()
                .filter(|car| !car.crashed)
                .map(|car| car.id)
                .collect();
            format!("tie: only parked cars remain ({parked})")
        }
        RaceOutcome::TurnLimitReached { turns } => {
            let positions = query::car_view(world)
                .iter()
                .map(|car| format!("{} {}", car.id, car.position))
                .collect::<Vec<_>>()
                .join(", ");
            format!("no winner after {turns} turns: {positions}")
        }
    }
}
