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
    bgp::{LeakKind, Route},
    policies::*,
    types::{ConfigError, LocalPref, Path, Relation},
};

#[test]
fn customer_extender() {
    let e = Extender::Customer;
    assert_eq!(
        e.extend(&Route::SelfRoute, 7, None),
        Route::new(CUSTOMER_LOCAL_PREF, [7])
    );
    assert_eq!(
        e.extend(&Route::new(CUSTOMER_LOCAL_PREF, [1]), 7, None),
        Route::new(CUSTOMER_LOCAL_PREF, [1, 7])
    );
    assert_eq!(
        e.extend(&Route::new(PEERPLUS_LOCAL_PREF, [1]), 7, None),
        Route::new(CUSTOMER_LOCAL_PREF, [1, 7])
    );
    // peer, provider and peer* routes are not exported to providers
    for lp in [PEER_LOCAL_PREF, PROVIDER_LOCAL_PREF, PEERSTAR_LOCAL_PREF] {
        assert_eq!(e.extend(&Route::new(lp, [1]), 7, None), Route::Invalid);
    }
    assert_eq!(e.extend(&Route::Invalid, 7, None), Route::Invalid);
}

#[test]
fn peer_extenders() {
    let route = Route::new(CUSTOMER_LOCAL_PREF, [1]);
    assert_eq!(
        Extender::Peer.extend(&route, 2, None),
        Route::new(PEER_LOCAL_PREF, [1, 2])
    );
    assert_eq!(
        Extender::PeerPlus.extend(&route, 2, None),
        Route::new(PEERPLUS_LOCAL_PREF, [1, 2])
    );
    assert_eq!(
        Extender::PeerStar.extend(&route, 2, None),
        Route::new(PEERSTAR_LOCAL_PREF, [1, 2])
    );
    let provider_route = Route::new(PROVIDER_LOCAL_PREF, [1]);
    assert_eq!(
        Extender::Peer.extend(&provider_route, 2, None),
        Route::Invalid
    );
}

#[test]
fn provider_extender() {
    let e = Extender::Provider;
    for lp in [
        PEERPLUS_LOCAL_PREF,
        CUSTOMER_LOCAL_PREF,
        PEER_LOCAL_PREF,
        PROVIDER_LOCAL_PREF,
    ] {
        assert_eq!(
            e.extend(&Route::new(lp, [1]), 3, None),
            Route::new(PROVIDER_LOCAL_PREF, [1, 3])
        );
    }
    assert_eq!(e.extend(&Route::Invalid, 3, None), Route::Invalid);
    let leak = Route::Leak {
        kind: LeakKind::PeerPeer,
        as_path: Path::from([1]),
    };
    assert_eq!(e.extend(&leak, 3, None), Route::Invalid);
}

#[test]
fn sibling_extender() {
    let e = Extender::Sibling;
    assert_eq!(
        e.extend(&Route::SelfRoute, 4, None),
        Route::new(CUSTOMER_LOCAL_PREF - 1, [4])
    );
    assert_eq!(
        e.extend(&Route::new(PEER_LOCAL_PREF, [1]), 4, None),
        Route::new(PEER_LOCAL_PREF - 1, [1, 4])
    );
    assert_eq!(e.extend(&Route::Invalid, 4, None), Route::Invalid);
    // the lowest valid preference stays where it is
    assert_eq!(
        e.extend(&Route::new(LocalPref::MIN, [5]), 7, None),
        Route::new(LocalPref::MIN, [5, 7])
    );
}

#[test]
fn extenders_tag_relations() {
    let cases = [
        (Extender::Customer, Relation::Customer),
        (Extender::Peer, Relation::Peer),
        (Extender::PeerPlus, Relation::Peer),
        (Extender::PeerStar, Relation::Peer),
        (Extender::Provider, Relation::Provider),
        (Extender::Sibling, Relation::Sibling),
    ];
    for (e, rel) in cases {
        let route = e.extend(&Route::SelfRoute, 1, None);
        assert_eq!(route.as_path().relations().collect::<Vec<_>>(), vec![rel]);
    }
}

#[test]
fn attacker_leaks() {
    let provider_route = Route::new(PROVIDER_LOCAL_PREF, [1]);

    // leak to peers only
    let attack = Some(AttackType::LeakToPeers);
    assert_eq!(
        Extender::Peer.extend(&provider_route, 2, attack),
        Route::new(PEER_LOCAL_PREF, [1, 2])
    );
    assert_eq!(
        Extender::Customer.extend(&provider_route, 2, attack),
        Route::Invalid
    );

    // leak to providers only
    let attack = Some(AttackType::LeakToProviders);
    assert_eq!(
        Extender::Customer.extend(&provider_route, 2, attack),
        Route::new(CUSTOMER_LOCAL_PREF, [1, 2])
    );
    assert_eq!(
        Extender::Peer.extend(&provider_route, 2, attack),
        Route::Invalid
    );

    // leak to all
    let attack = Some(AttackType::LeakToAll);
    assert_eq!(
        Extender::Customer.extend(&provider_route, 2, attack),
        Route::new(CUSTOMER_LOCAL_PREF, [1, 2])
    );
    assert_eq!(
        Extender::PeerStar.extend(&provider_route, 2, attack),
        Route::new(PEERSTAR_LOCAL_PREF, [1, 2])
    );

    // invalid routes are never leaked
    assert_eq!(
        Extender::Customer.extend(&Route::Invalid, 2, attack),
        Route::Invalid
    );
}

#[test]
fn parse_labels() {
    assert_eq!("C".parse(), Ok(Extender::Customer));
    assert_eq!("r".parse(), Ok(Extender::Peer));
    assert_eq!("P".parse(), Ok(Extender::Provider));
    assert_eq!("R+".parse(), Ok(Extender::PeerPlus));
    assert_eq!("R*".parse(), Ok(Extender::PeerStar));
    assert_eq!("S".parse(), Ok(Extender::Sibling));
    assert_eq!(
        "X".parse::<Extender>(),
        Err(ConfigError::UnknownExtender("X".to_string()))
    );
    for e in [
        Extender::Customer,
        Extender::Peer,
        Extender::Provider,
        Extender::PeerPlus,
        Extender::PeerStar,
        Extender::Sibling,
    ] {
        assert_eq!(e.label().parse(), Ok(e));
    }
}

#[test]
fn cost_labels() {
    assert_eq!(parse_local_pref("c"), Ok(CUSTOMER_LOCAL_PREF));
    assert_eq!(parse_local_pref("r+"), Ok(PEERPLUS_LOCAL_PREF));
    assert_eq!(parse_local_pref("R*"), Ok(PEERSTAR_LOCAL_PREF));
    assert_eq!(parse_local_pref("r"), Ok(PEER_LOCAL_PREF));
    assert_eq!(parse_local_pref("p"), Ok(PROVIDER_LOCAL_PREF));
    assert_eq!(
        parse_local_pref("q"),
        Err(ConfigError::UnknownCostLabel("q".to_string()))
    );

    assert_eq!(local_pref_label(CUSTOMER_LOCAL_PREF), "c");
    assert_eq!(local_pref_label(CUSTOMER_LOCAL_PREF - 1), "c-1");
    assert_eq!(local_pref_label(PEER_LOCAL_PREF + 2), "r+2");
    assert_eq!(local_pref_label(i32::MIN), "•");
    assert_eq!(local_pref_label(i32::MAX), "◦");
}
