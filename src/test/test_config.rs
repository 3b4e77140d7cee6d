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

use pretty_assertions::assert_eq;
use test_log::test;

use crate::{
    bgp::Route,
    config::{AdvertisementConfig, ScenarioConfig, SimulationConfig},
    event::DelayGenerator,
    policies::{Extender, PEERSTAR_LOCAL_PREF},
    protocol::ProtocolKind,
    simulator::Advertisement,
    types::{ConfigError, Path, SimError},
};

const SCENARIO: &str = r#"{
    "nodes": [
        { "id": 0 },
        { "id": 1, "protocol": "ssbgp", "mrai": 30 },
        { "id": 2, "protocol": "attack3" }
    ],
    "links": [
        { "tail": 1, "head": 0, "extender": "C" },
        { "tail": 0, "head": 1, "extender": "P" },
        { "tail": 2, "head": 1, "extender": "r+" }
    ],
    "advertisements": [
        { "advertiser": 0 },
        { "advertiser": 2, "time": 5, "cost": "r*" }
    ],
    "simulation": { "repetitions": 3, "max_delay": 10, "seed": 42 }
}"#;

#[test]
fn parse_scenario() {
    let scenario = ScenarioConfig::from_json(SCENARIO).unwrap();
    assert_eq!(scenario.nodes.len(), 3);
    assert_eq!(scenario.nodes[0].protocol, "bgp");
    assert_eq!(scenario.nodes[0].mrai, 0);
    assert_eq!(scenario.nodes[1].mrai, 30);
    assert_eq!(scenario.links.len(), 3);
    assert_eq!(
        scenario.simulation,
        SimulationConfig {
            repetitions: 3,
            min_delay: 1,
            max_delay: 10,
            threshold: 1_000_000,
            seed: Some(42),
            forced_mrai: None,
        }
    );
}

#[test]
fn default_settings() {
    let json = r#"{"nodes": [{"id": 0}], "advertisements": [{"advertiser": 0}]}"#;
    let scenario = ScenarioConfig::from_json(json).unwrap();
    assert!(scenario.links.is_empty());
    assert_eq!(scenario.simulation, SimulationConfig::default());
    assert_eq!(scenario.simulation.repetitions, 1);
}

#[test]
fn build_topology() {
    let scenario = ScenarioConfig::from_json(SCENARIO).unwrap();
    let t = scenario.build_topology().unwrap();
    assert_eq!(t.size(), 3);
    assert_eq!(t.link_count(), 3);
    assert_eq!(t.get(1).unwrap().protocol().kind(), ProtocolKind::SsBgp);
    assert_eq!(t.get(1).unwrap().protocol().mrai(), 30);
    assert!(t.get(2).unwrap().protocol().kind().attack().is_some());
    assert_eq!(t.get(1).unwrap().neighbors()[0].extender, Extender::Provider);
    assert_eq!(t.get(1).unwrap().neighbors()[1].extender, Extender::PeerPlus);
}

#[test]
fn forced_mrai() {
    let mut scenario = ScenarioConfig::from_json(SCENARIO).unwrap();
    scenario.simulation.forced_mrai = Some(7);
    let t = scenario.build_topology().unwrap();
    assert!(t.nodes().all(|n| n.protocol().mrai() == 7));
}

#[test]
fn advertisements() {
    let scenario = ScenarioConfig::from_json(SCENARIO).unwrap();
    assert_eq!(
        scenario.advertisements().unwrap(),
        vec![
            Advertisement::new(0),
            Advertisement::new(2)
                .with_route(Route::new(PEERSTAR_LOCAL_PREF, Path::new()))
                .at(5),
        ]
    );
}

#[test]
fn unknown_labels() {
    let mut scenario = ScenarioConfig::from_json(SCENARIO).unwrap();
    scenario.nodes[0].protocol = "ospf".to_string();
    assert_eq!(
        scenario.build_topology().unwrap_err(),
        SimError::ConfigError(ConfigError::UnknownProtocol("ospf".to_string()))
    );

    let mut scenario = ScenarioConfig::from_json(SCENARIO).unwrap();
    scenario.links[0].extender = "X".to_string();
    assert_eq!(
        scenario.build_topology().unwrap_err(),
        SimError::ConfigError(ConfigError::UnknownExtender("X".to_string()))
    );

    let mut scenario = ScenarioConfig::from_json(SCENARIO).unwrap();
    scenario.advertisements.push(AdvertisementConfig {
        advertiser: 0,
        time: 0,
        cost: Some("q".to_string()),
    });
    assert_eq!(
        scenario.advertisements().unwrap_err(),
        SimError::ConfigError(ConfigError::UnknownCostLabel("q".to_string()))
    );
}

#[test]
fn duplicate_node() {
    let mut scenario = ScenarioConfig::from_json(SCENARIO).unwrap();
    let node = scenario.nodes[1].clone();
    scenario.nodes.push(node);
    assert_eq!(
        scenario.build_topology().unwrap_err(),
        SimError::ConfigError(ConfigError::NodeExists(1))
    );
}

#[test]
fn invalid_json() {
    assert!(matches!(
        ScenarioConfig::from_json("{ \"nodes\": 3 }"),
        Err(SimError::JsonError(_))
    ));
}

#[test]
fn json_roundtrip() {
    let scenario = ScenarioConfig::from_json(SCENARIO).unwrap();
    let json = scenario.to_json().unwrap();
    assert_eq!(ScenarioConfig::from_json(&json).unwrap(), scenario);
}

#[test]
fn delay_generator() {
    let scenario = ScenarioConfig::from_json(SCENARIO).unwrap();
    let mut delays = scenario.simulation.delay_generator().unwrap();
    assert_eq!(delays.seed(), 42);
    assert!((0..100).map(|_| delays.next_delay()).all(|d| (1..=10).contains(&d)));

    let settings = SimulationConfig {
        min_delay: 5,
        max_delay: 2,
        ..Default::default()
    };
    assert_eq!(
        settings.delay_generator().unwrap_err(),
        SimError::ConfigError(ConfigError::InvalidDelayRange { min: 5, max: 2 })
    );
}
