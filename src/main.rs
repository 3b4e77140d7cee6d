// RouteSim: Interdomain Routing Simulator written in Rust
// Copyright (C) 2022-2023 Tibor Schneider <sctibor@ethz.ch>
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use itertools::Itertools;

use routesim::{
    config::ScenarioConfig, policies::local_pref_label, runner::RepetitionRunner,
    simulator::Simulator, types::Time,
};

#[derive(Debug, Parser)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the simulation of a scenario and print the results as JSON.
    Run {
        /// Scenario file (JSON)
        scenario: PathBuf,
        /// Number of repetitions (overrides the scenario)
        #[clap(short = 'n', long)]
        repetitions: Option<usize>,
        /// Seed of the delay generator (overrides the scenario)
        #[clap(short, long)]
        seed: Option<u64>,
        /// Time threshold of each run (overrides the scenario)
        #[clap(short, long)]
        threshold: Option<Time>,
        /// Minimum message delay (overrides the scenario)
        #[clap(long)]
        min_delay: Option<Time>,
        /// Maximum message delay (overrides the scenario)
        #[clap(long)]
        max_delay: Option<Time>,
        /// MRAI for all nodes (overrides the scenario)
        #[clap(short, long)]
        mrai: Option<Time>,
        /// Write the results to this file instead of stdout
        #[clap(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a scenario and print the resulting topology.
    Check {
        /// Scenario file (JSON)
        scenario: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_timed();

    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            scenario,
            repetitions,
            seed,
            threshold,
            min_delay,
            max_delay,
            mrai,
            output,
        } => {
            let mut scenario = ScenarioConfig::load(scenario)?;
            let settings = &mut scenario.simulation;
            settings.repetitions = repetitions.unwrap_or(settings.repetitions);
            settings.seed = seed.or(settings.seed);
            settings.threshold = threshold.unwrap_or(settings.threshold);
            settings.min_delay = min_delay.unwrap_or(settings.min_delay);
            settings.max_delay = max_delay.unwrap_or(settings.max_delay);
            settings.forced_mrai = mrai.or(settings.forced_mrai);
            run(scenario, output)?
        }
        Command::Check { scenario } => check(ScenarioConfig::load(scenario)?)?,
    }

    Ok(())
}

fn run(
    scenario: ScenarioConfig,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut topology = scenario.build_topology()?;
    let advertisements = scenario.advertisements()?;
    let mut sim = Simulator::with_delays(scenario.simulation.delay_generator()?);

    let runner = RepetitionRunner::new(
        scenario.simulation.repetitions,
        scenario.simulation.threshold,
    );
    let results = runner.run(&mut sim, &mut topology, &advertisements)?;

    let json = serde_json::to_string_pretty(&results)?;
    match output {
        Some(file) => std::fs::write(file, json)?,
        None => println!("{}", json),
    }
    Ok(())
}

fn check(scenario: ScenarioConfig) -> Result<(), Box<dyn std::error::Error>> {
    let topology = scenario.build_topology()?;
    let advertisements = scenario.advertisements()?;

    println!(
        "{} nodes, {} links, {} advertisements",
        topology.size(),
        topology.link_count(),
        advertisements.len()
    );
    for node in topology.nodes() {
        println!(
            "{:>6} [{}, mrai = {}] -> {}",
            node.id(),
            node.protocol().kind(),
            node.protocol().mrai(),
            node.neighbors()
                .iter()
                .map(|n| format!("{} ({})", n.node, n.extender.label()))
                .join(", ")
        );
    }
    for ad in advertisements {
        println!(
            "advertise {} from {} at time {}",
            local_pref_label(ad.route.local_pref()),
            ad.advertiser,
            ad.time
        );
    }
    Ok(())
}
