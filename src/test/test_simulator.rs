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

use maplit::btreemap;
use pretty_assertions::assert_eq;
use test_log::test;

use super::{record, topology};
use crate::{
    bgp::{LeakKind, Route},
    event::RandomDelayGenerator,
    policies::*,
    protocol::ProtocolKind,
    simulator::{Advertisement, Simulator},
    topology::Topology,
    types::{ConfigError, Path, SimError},
};

use crate::policies::Extender::{Customer as C, Peer as R, PeerPlus as RPlus, Provider as P};
use crate::protocol::ProtocolKind::*;

/// 0 -> 1 -> 2, each node is a customer of the next one.
fn chain() -> Topology {
    topology(&[(0, Bgp, 0), (1, Bgp, 0), (2, Bgp, 0)], &[(1, 0, C), (2, 1, C)])
}

/// Two nodes 1 and 2 with a customer route from 0, which prefer the route through each other
/// (peer+) over the direct one.
fn twisted(kind: ProtocolKind) -> Topology {
    topology(
        &[(0, Bgp, 0), (1, kind, 0), (2, kind, 0)],
        &[(1, 0, C), (2, 0, C), (1, 2, RPlus), (2, 1, RPlus)],
    )
}

#[test]
fn chain_propagation() {
    let mut t = chain();
    let mut sim = Simulator::default();
    let exported = record(&mut sim.notifier_mut().export);

    assert_eq!(sim.simulate(&mut t, &[Advertisement::new(0)], 1000), Ok(true));

    assert_eq!(
        t.selected_routes(),
        btreemap! {
            0 => Route::SelfRoute,
            1 => Route::new(CUSTOMER_LOCAL_PREF, [0]),
            2 => Route::new(CUSTOMER_LOCAL_PREF, [0, 1]),
        }
    );
    // every node exports once, including the last one without neighbors
    assert_eq!(
        exported.borrow().iter().map(|e| (e.node, e.time)).collect::<Vec<_>>(),
        vec![(0, 0), (1, 1), (2, 2)]
    );
    assert_eq!(sim.time(), 2);
}

#[test]
fn loop_at_origin() {
    let mut t = topology(&[(0, Bgp, 0), (2, Bgp, 0)], &[(2, 0, C), (0, 2, P)]);
    let mut sim = Simulator::default();
    let learned = record(&mut sim.notifier_mut().learn);

    assert_eq!(sim.simulate(&mut t, &[Advertisement::new(0)], 1000), Ok(true));

    let at_origin: Vec<_> = learned
        .borrow()
        .iter()
        .filter(|l| l.node == 0)
        .map(|l| (l.neighbor, l.route.clone()))
        .collect();
    assert_eq!(at_origin, vec![(0, Route::SelfRoute), (2, Route::Invalid)]);
    assert_eq!(t.get(0).unwrap().selected_route(), &Route::SelfRoute);
    assert_eq!(
        t.get(2).unwrap().selected_route(),
        &Route::new(CUSTOMER_LOCAL_PREF, [0])
    );
}

#[test]
fn bgp_oscillates() {
    let mut t = twisted(Bgp);
    let mut sim = Simulator::default();
    let threshold = record(&mut sim.notifier_mut().threshold_reached);
    let end = record(&mut sim.notifier_mut().end);

    assert_eq!(sim.simulate(&mut t, &[Advertisement::new(0)], 100), Ok(false));

    assert_eq!(threshold.borrow().len(), 1);
    assert_eq!(threshold.borrow()[0].time, 100);
    assert_eq!(threshold.borrow()[0].threshold, 100);
    assert_eq!(end.borrow().len(), 1);
    // events remain in the queue
    assert!(sim.scheduler().has_events());
}

#[test]
fn ssbgp_variants_converge() {
    for kind in [SsBgp, IssBgp, SsBgp2, IssBgp2] {
        let mut t = twisted(kind);
        let mut sim = Simulator::default();
        let detected = record(&mut sim.notifier_mut().detect);

        assert_eq!(
            sim.simulate(&mut t, &[Advertisement::new(0)], 100),
            Ok(true),
            "{}",
            kind
        );

        let detections: Vec<_> = detected
            .borrow()
            .iter()
            .map(|d| (d.node, d.neighbor, d.alternative.clone()))
            .collect();
        assert_eq!(
            detections,
            vec![
                (1, 2, Route::new(CUSTOMER_LOCAL_PREF, [0])),
                (2, 1, Route::new(CUSTOMER_LOCAL_PREF, [0])),
            ],
            "{}",
            kind
        );
        for (node, disabled) in [(1, 2), (2, 1)] {
            let n = t.get(node).unwrap();
            assert_eq!(n.selected_route(), &Route::new(CUSTOMER_LOCAL_PREF, [0]));
            assert_eq!(n.protocol().selector().disabled_neighbors(), vec![disabled]);
        }
    }
}

#[test]
fn ssbgp_converges_with_random_delays() {
    for seed in 0..20 {
        let mut t = twisted(SsBgp);
        let mut sim = Simulator::new(RandomDelayGenerator::with(1, 10, seed).unwrap());
        assert_eq!(
            sim.simulate(&mut t, &[Advertisement::new(0)], 100_000),
            Ok(true)
        );
        for node in [1, 2] {
            assert!(t.get(node).unwrap().selected_route().is_valid());
        }
    }
}

/// 0 is a customer of 1, 1 is a provider of 2, and 2 peers with 3 and 4.
fn leak_topology(attacker: ProtocolKind) -> Topology {
    topology(
        &[(0, Bgp, 0), (1, Bgp, 0), (2, attacker, 0), (3, Aspa, 0), (4, Bgp, 0)],
        &[(1, 0, C), (2, 1, P), (3, 2, R), (4, 2, R)],
    )
}

#[test]
fn aspa_detects_leak() {
    let mut t = leak_topology(Attacker(AttackType::LeakToPeers));
    let mut sim = Simulator::default();
    let learned = record(&mut sim.notifier_mut().learn);

    assert_eq!(sim.simulate(&mut t, &[Advertisement::new(0)], 1000), Ok(true));

    let at_3: Vec<_> = learned
        .borrow()
        .iter()
        .filter(|l| l.node == 3)
        .map(|l| l.route.clone())
        .collect();
    assert_eq!(at_3.len(), 1);
    assert_eq!(at_3[0].leak_kind(), Some(LeakKind::ProviderPeer));
    assert_eq!(at_3[0].as_path(), &Path::from([0, 1, 2]));

    assert_eq!(
        t.selected_routes(),
        btreemap! {
            0 => Route::SelfRoute,
            1 => Route::new(CUSTOMER_LOCAL_PREF, [0]),
            2 => Route::new(PROVIDER_LOCAL_PREF, [0, 1]),
            3 => Route::Invalid,
            4 => Route::new(PEER_LOCAL_PREF, [0, 1, 2]),
        }
    );
}

#[test]
fn no_leak_without_attacker() {
    let mut t = leak_topology(Bgp);
    let mut sim = Simulator::default();
    assert_eq!(sim.simulate(&mut t, &[Advertisement::new(0)], 1000), Ok(true));
    assert_eq!(t.get(3).unwrap().selected_route(), &Route::Invalid);
    assert_eq!(t.get(4).unwrap().selected_route(), &Route::Invalid);
    assert_eq!(
        t.get(3).unwrap().protocol().selector().table().get(2),
        &Route::Invalid
    );
}

#[test]
fn mrai_holds_back_changes() {
    let mut t = topology(
        &[(0, Bgp, 0), (1, Bgp, 0), (2, Bgp, 10), (3, Bgp, 0)],
        &[(2, 0, C), (2, 1, RPlus), (3, 2, C)],
    );
    let mut sim = Simulator::default();
    let exported = record(&mut sim.notifier_mut().export);

    let ads = [Advertisement::new(0), Advertisement::new(1).at(1)];
    assert_eq!(sim.simulate(&mut t, &ads, 1000), Ok(true));

    let at_2: Vec<_> = exported
        .borrow()
        .iter()
        .filter(|e| e.node == 2)
        .map(|e| (e.time, e.route.clone()))
        .collect();
    assert_eq!(
        at_2,
        vec![
            (1, Route::new(CUSTOMER_LOCAL_PREF, [0])),
            (11, Route::new(PEERPLUS_LOCAL_PREF, [1])),
        ]
    );
    assert_eq!(
        t.get(3).unwrap().protocol().selector().table().get(2),
        &Route::new(CUSTOMER_LOCAL_PREF, [1, 2])
    );
    // the last (empty) timer expiry ends the simulation
    assert_eq!(sim.time(), 21);
}

#[test]
fn threshold_stops_before_processing() {
    let mut t = chain();
    let mut sim = Simulator::default();
    let received = record(&mut sim.notifier_mut().message_received);
    assert_eq!(sim.simulate(&mut t, &[Advertisement::new(0)], 1), Ok(false));
    assert!(received.borrow().is_empty());
    assert_eq!(t.get(1).unwrap().selected_route(), &Route::Invalid);
}

#[test]
fn start_and_end() {
    let mut t = chain();
    let mut sim = Simulator::new(RandomDelayGenerator::with(1, 1, 99).unwrap());
    let start = record(&mut sim.notifier_mut().start);
    let end = record(&mut sim.notifier_mut().end);
    assert_eq!(sim.simulate(&mut t, &[Advertisement::new(0)], 1000), Ok(true));

    assert_eq!(start.borrow().len(), 1);
    assert_eq!(start.borrow()[0].seed, 99);
    assert_eq!(start.borrow()[0].nodes, vec![0, 1, 2]);
    assert_eq!(end.borrow().len(), 1);
    assert_eq!(end.borrow()[0].selected, t.selected_routes());
    // one unit of delay plus one unit of transmission per hop
    assert_eq!(end.borrow()[0].time, 4);
}

#[test]
fn invalid_advertisements() {
    let mut t = chain();
    let mut sim = Simulator::default();
    assert_eq!(
        sim.simulate(&mut t, &[], 1000),
        Err(SimError::ConfigError(ConfigError::NoAdvertisements))
    );
    assert_eq!(
        sim.simulate(&mut t, &[Advertisement::new(7)], 1000),
        Err(SimError::ConfigError(ConfigError::NodeNotFound(7)))
    );
}

#[test]
fn advertise_custom_route() {
    let mut t = chain();
    let mut sim = Simulator::default();
    // a peer route is not exported to providers
    let route = Route::new(PEER_LOCAL_PREF, Path::new());
    let ad = Advertisement::new(0).with_route(route.clone());
    assert_eq!(sim.simulate(&mut t, &[ad], 1000), Ok(true));
    assert_eq!(t.get(0).unwrap().selected_route(), &route);
    assert_eq!(t.get(1).unwrap().selected_route(), &Route::Invalid);
}

#[test]
fn deterministic_runs() {
    let run = || {
        let mut t = twisted(IssBgp);
        let mut sim = Simulator::new(RandomDelayGenerator::with(1, 20, 3).unwrap());
        let selected = record(&mut sim.notifier_mut().select);
        sim.simulate(&mut t, &[Advertisement::new(0)], 10_000).unwrap();
        let log = selected.borrow().clone();
        log
    };
    assert_eq!(run(), run());
}

#[test]
fn reset_and_simulate_again() {
    let mut t = twisted(SsBgp);
    let mut sim = Simulator::default();
    let detected = record(&mut sim.notifier_mut().detect);

    assert_eq!(sim.simulate(&mut t, &[Advertisement::new(0)], 100), Ok(true));
    let first = t.selected_routes();
    t.reset();
    assert!(t.nodes().all(|n| n.selected_route() == &Route::Invalid));
    assert!(t.nodes().all(|n| n.protocol().selector().disabled_neighbors().is_empty()));

    assert_eq!(sim.simulate(&mut t, &[Advertisement::new(0)], 100), Ok(true));
    assert_eq!(t.selected_routes(), first);
    assert_eq!(detected.borrow().len(), 4);
}

#[test]
fn simulate_step() {
    let mut t = chain();
    let mut sim = Simulator::default();
    sim.scheduler_mut()
        .schedule(
            crate::event::Event::Advertise {
                node: 0,
                route: Route::SelfRoute,
            },
            0,
        )
        .unwrap();
    let mut steps = 0;
    while sim.simulate_step(&mut t).unwrap().is_some() {
        steps += 1;
    }
    // advertisement plus two messages
    assert_eq!(steps, 3);
    assert_eq!(
        t.get(2).unwrap().selected_route(),
        &Route::new(CUSTOMER_LOCAL_PREF, [0, 1])
    );
}
