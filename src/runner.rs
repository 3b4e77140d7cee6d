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

//! Run the same simulation multiple times with different delay seeds.

use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    collector::{BasicDataCollector, BasicDataSet, DataCollector, NodeDataCollector, NodeDataSet},
    simulator::{Advertisement, Simulator},
    topology::Topology,
    types::{SimError, Time},
};

/// Results of one repetition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepetitionResult {
    /// Index of the repetition, starting at 0
    pub repetition: usize,
    /// Summary of the run
    pub basic: BasicDataSet,
    /// Per-node results
    pub nodes: NodeDataSet,
}

/// Runs a simulation several times. After each repetition, the topology is reset and the delay
/// generator draws a new seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepetitionRunner {
    /// Number of repetitions
    pub repetitions: usize,
    /// Time threshold of each run
    pub threshold: Time,
}

impl RepetitionRunner {
    /// Create a new runner.
    pub fn new(repetitions: usize, threshold: Time) -> Self {
        Self {
            repetitions,
            threshold,
        }
    }

    /// Run all repetitions and return their results.
    pub fn run(
        &self,
        sim: &mut Simulator,
        topology: &mut Topology,
        advertisements: &[Advertisement],
    ) -> Result<Vec<RepetitionResult>, SimError> {
        let mut basic = BasicDataCollector::new();
        let mut nodes = NodeDataCollector::new();
        basic.register(sim.notifier_mut());
        nodes.register(sim.notifier_mut());

        let results: Result<Vec<_>, SimError> = (0..self.repetitions)
            .map(|repetition| -> Result<RepetitionResult, SimError> {
                basic.clear();
                nodes.clear();
                let terminated = sim.simulate(topology, advertisements, self.threshold)?;
                info!(
                    "Repetition {}/{} (seed {}) {} at time {}",
                    repetition + 1,
                    self.repetitions,
                    sim.delays().seed(),
                    if terminated { "terminated" } else { "stopped" },
                    sim.time()
                );
                topology.reset();
                sim.delays_mut().generate_new_seed();
                Ok(RepetitionResult {
                    repetition,
                    basic: basic.data(),
                    nodes: nodes.data(),
                })
            })
            .collect();

        basic.unregister(sim.notifier_mut());
        nodes.unregister(sim.notifier_mut());
        results
    }
}
