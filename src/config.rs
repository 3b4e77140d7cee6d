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

//! # Scenario configuration
//!
//! A scenario describes a topology, the advertisements that start the simulation and the settings
//! of the run. Scenarios are stored as JSON:
//!
//! ```json
//! {
//!   "nodes": [
//!     { "id": 0, "protocol": "bgp" },
//!     { "id": 1, "protocol": "ssbgp", "mrai": 30 }
//!   ],
//!   "links": [
//!     { "tail": 1, "head": 0, "extender": "C" },
//!     { "tail": 0, "head": 1, "extender": "P" }
//!   ],
//!   "advertisements": [
//!     { "advertiser": 0 }
//!   ],
//!   "simulation": { "repetitions": 10, "min_delay": 1, "max_delay": 10 }
//! }
//! ```
//!
//! Protocols are given by their label (`bgp`, `ssbgp`, `issbgp`, `ssbgp2`, `issbgp2`, `aspa`,
//! `attack1`, `attack2`, `attack3`), extenders by theirs (`C`, `R`, `P`, `R+`, `R*`, `S`). An
//! advertisement originates the self route, unless a cost label (`c`, `r`, `p`, `r+`, `r*`) is
//! given, in which case a route with that local preference and an empty path is originated.

use std::path::Path as FilePath;

use serde::{Deserialize, Serialize};

use crate::{
    bgp::Route,
    event::{DelayGenerator, RandomDelayGenerator},
    policies::{parse_local_pref, Extender},
    protocol::{Protocol, ProtocolKind},
    simulator::Advertisement,
    topology::{Topology, TopologyBuilder},
    types::{NodeId, Path, SimError, Time},
};

/// A node of the scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Id of the node
    pub id: NodeId,
    /// Protocol label
    #[serde(default = "default_protocol")]
    pub protocol: String,
    /// Minimum route advertisement interval
    #[serde(default)]
    pub mrai: Time,
}

/// A link of the scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Node learning routes over the link
    pub tail: NodeId,
    /// Node exporting routes over the link
    pub head: NodeId,
    /// Extender label
    pub extender: String,
}

/// An advertisement of the scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvertisementConfig {
    /// Advertising node
    pub advertiser: NodeId,
    /// Time of the advertisement
    #[serde(default)]
    pub time: Time,
    /// Cost label of the advertised route. The self route is advertised if missing.
    #[serde(default)]
    pub cost: Option<String>,
}

/// Settings of the simulation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of repetitions
    pub repetitions: usize,
    /// Minimum message delay
    pub min_delay: Time,
    /// Maximum message delay
    pub max_delay: Time,
    /// Time after which a run is stopped
    pub threshold: Time,
    /// Seed of the delay generator. A random seed is used if missing.
    pub seed: Option<u64>,
    /// MRAI used for all nodes, overriding the per-node values.
    pub forced_mrai: Option<Time>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            repetitions: 1,
            min_delay: 1,
            max_delay: 1,
            threshold: 1_000_000,
            seed: None,
            forced_mrai: None,
        }
    }
}

impl SimulationConfig {
    /// Create the delay generator described by the settings.
    pub fn delay_generator(&self) -> Result<Box<dyn DelayGenerator>, SimError> {
        let delays = match self.seed {
            Some(seed) => RandomDelayGenerator::with(self.min_delay, self.max_delay, seed)?,
            None => RandomDelayGenerator::new(self.min_delay, self.max_delay)?,
        };
        Ok(Box::new(delays))
    }
}

/// Full description of a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Nodes
    pub nodes: Vec<NodeConfig>,
    /// Links
    #[serde(default)]
    pub links: Vec<LinkConfig>,
    /// Advertisements
    pub advertisements: Vec<AdvertisementConfig>,
    /// Simulation settings
    #[serde(default)]
    pub simulation: SimulationConfig,
}

fn default_protocol() -> String {
    ProtocolKind::Bgp.label().to_string()
}

impl ScenarioConfig {
    /// Parse a scenario from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a scenario from a JSON file.
    pub fn load(path: impl AsRef<FilePath>) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize the scenario as JSON.
    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the topology of the scenario.
    pub fn build_topology(&self) -> Result<Topology, SimError> {
        let mut builder = TopologyBuilder::new();
        for node in self.nodes.iter() {
            let kind: ProtocolKind = node.protocol.parse()?;
            let mrai = self.simulation.forced_mrai.unwrap_or(node.mrai);
            builder.add_node(node.id, Protocol::new(kind, mrai))?;
        }
        for link in self.links.iter() {
            let extender: Extender = link.extender.parse()?;
            builder.link(link.tail, link.head, extender)?;
        }
        Ok(builder.build())
    }

    /// Get the advertisements of the scenario.
    pub fn advertisements(&self) -> Result<Vec<Advertisement>, SimError> {
        self.advertisements
            .iter()
            .map(|ad| -> Result<Advertisement, SimError> {
                let route = match ad.cost.as_deref() {
                    Some(label) => Route::new(parse_local_pref(label)?, Path::new()),
                    None => Route::SelfRoute,
                };
                Ok(Advertisement::new(ad.advertiser)
                    .with_route(route)
                    .at(ad.time))
            })
            .collect()
    }
}
