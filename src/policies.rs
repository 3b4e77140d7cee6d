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

//! # Interdomain routing policies
//!
//! This module contains the local-preference tiers of the interdomain (Gao-Rexford) model and the
//! [`Extender`]s that transform a route while it crosses a link. The extender of a link decides
//! whether the route is exported at all, with which local preference it is learned, and which
//! relation tag is recorded on its path.
//!
//! | Extender   | Label | Learned local preference | Relation tag |
//! |------------|-------|--------------------------|--------------|
//! | `PeerPlus` | `R+`  | 500000                   | Peer         |
//! | `PeerStar` | `R*`  | 400000                   | Peer         |
//! | `Customer` | `C`   | 300000                   | Customer     |
//! | `Peer`     | `R`   | 200000                   | Peer         |
//! | `Provider` | `P`   | 100000                   | Provider     |
//! | `Sibling`  | `S`   | one less than exported   | Sibling      |

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    bgp::{Route, INVALID_LOCAL_PREF, SELF_LOCAL_PREF},
    types::{ConfigError, LocalPref, NodeId, Relation},
};

/// Local preference of routes learned over a peer+ link.
pub const PEERPLUS_LOCAL_PREF: LocalPref = 500000;
/// Local preference of routes learned over a peer* link.
pub const PEERSTAR_LOCAL_PREF: LocalPref = 400000;
/// Local preference of routes learned from a customer.
pub const CUSTOMER_LOCAL_PREF: LocalPref = 300000;
/// Local preference of routes learned from a peer.
pub const PEER_LOCAL_PREF: LocalPref = 200000;
/// Local preference of routes learned from a provider.
pub const PROVIDER_LOCAL_PREF: LocalPref = 100000;

/// Parse a cost label (`r+`, `r*`, `c`, `r`, `p`) into the local preference of that tier.
pub fn parse_local_pref(label: &str) -> Result<LocalPref, ConfigError> {
    match label.to_lowercase().as_str() {
        "r+" => Ok(PEERPLUS_LOCAL_PREF),
        "r*" => Ok(PEERSTAR_LOCAL_PREF),
        "c" => Ok(CUSTOMER_LOCAL_PREF),
        "r" => Ok(PEER_LOCAL_PREF),
        "p" => Ok(PROVIDER_LOCAL_PREF),
        _ => Err(ConfigError::UnknownCostLabel(label.to_string())),
    }
}

/// Get the label of a local preference. Values between two tiers are expressed relative to the
/// closest tier, e.g., `c-1` or `r+2`.
pub fn local_pref_label(local_pref: LocalPref) -> String {
    match local_pref {
        INVALID_LOCAL_PREF => "•".to_string(),
        SELF_LOCAL_PREF => "◦".to_string(),
        PEERPLUS_LOCAL_PREF => "r+".to_string(),
        PEERSTAR_LOCAL_PREF => "r*".to_string(),
        CUSTOMER_LOCAL_PREF => "c".to_string(),
        PEER_LOCAL_PREF => "r".to_string(),
        PROVIDER_LOCAL_PREF => "p".to_string(),
        lp => {
            let (base, label) = [
                (PEERPLUS_LOCAL_PREF, "r+"),
                (PEERSTAR_LOCAL_PREF, "r*"),
                (CUSTOMER_LOCAL_PREF, "c"),
                (PEER_LOCAL_PREF, "r"),
            ]
            .into_iter()
            .find(|(tier, _)| lp > *tier - PROVIDER_LOCAL_PREF / 2)
            .unwrap_or((PROVIDER_LOCAL_PREF, "p"));
            format!("{}{:+}", label, i64::from(lp) - i64::from(base))
        }
    }
}

/// Kind of route leak an attacker performs. An attacker exports routes over the links named by its
/// attack type as if they were customer routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackType {
    /// Leak all routes to providers (label `attack1`).
    LeakToProviders,
    /// Leak all routes to peers (label `attack2`).
    LeakToPeers,
    /// Leak all routes to providers and peers (label `attack3`).
    LeakToAll,
}

impl AttackType {
    /// Returns `true` if routes crossing a link with the given extender are leaked.
    pub fn leaks_over(&self, extender: Extender) -> bool {
        let to_provider = extender == Extender::Customer;
        let to_peer = matches!(
            extender,
            Extender::Peer | Extender::PeerPlus | Extender::PeerStar
        );
        match self {
            AttackType::LeakToProviders => to_provider,
            AttackType::LeakToPeers => to_peer,
            AttackType::LeakToAll => to_provider || to_peer,
        }
    }
}

/// Transformation applied to a route when it crosses a link. The extender is attached to the
/// neighbor that learns the route, and describes the relation of the exporting node as seen by the
/// learning one (i.e., `Customer` means that the exporting node is a customer of the learner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Extender {
    /// The exporter is a customer of the learner.
    Customer,
    /// The exporter is a peer of the learner.
    Peer,
    /// The exporter is a provider of the learner.
    Provider,
    /// The exporter is a peer, preferred over customers.
    PeerPlus,
    /// The exporter is a peer, preferred over customers but less than peer+.
    PeerStar,
    /// The exporter is a sibling of the learner.
    Sibling,
}

impl Extender {
    /// Map a route exported by `sender` to the route the neighbor learns. `attack` is the attack
    /// type of the sender, if it is an attacker.
    pub fn extend(&self, route: &Route, sender: NodeId, attack: Option<AttackType>) -> Route {
        if !route.is_valid() {
            return Route::Invalid;
        }
        let local_pref = match attack {
            Some(attack) if attack.leaks_over(*self) => CUSTOMER_LOCAL_PREF,
            _ => route.local_pref(),
        };
        let path = route.as_path();

        match self {
            Extender::Customer => Self::tier(local_pref, CUSTOMER_LOCAL_PREF)
                .map(|lp| Route::new(lp, path.append_with(sender, Relation::Customer)))
                .unwrap_or_default(),
            Extender::Peer => Self::tier(local_pref, PEER_LOCAL_PREF)
                .map(|lp| Route::new(lp, path.append_with(sender, Relation::Peer)))
                .unwrap_or_default(),
            Extender::PeerPlus => Self::tier(local_pref, PEERPLUS_LOCAL_PREF)
                .map(|lp| Route::new(lp, path.append_with(sender, Relation::Peer)))
                .unwrap_or_default(),
            Extender::PeerStar => Self::tier(local_pref, PEERSTAR_LOCAL_PREF)
                .map(|lp| Route::new(lp, path.append_with(sender, Relation::Peer)))
                .unwrap_or_default(),
            Extender::Provider => Route::new(
                PROVIDER_LOCAL_PREF,
                path.append_with(sender, Relation::Provider),
            ),
            Extender::Sibling => {
                let lp = match route {
                    Route::SelfRoute => CUSTOMER_LOCAL_PREF - 1,
                    _ => local_pref.saturating_sub(1),
                };
                Route::new(lp, path.append_with(sender, Relation::Sibling))
            }
        }
    }

    /// Only routes learned from customers (or from preferred peers) are exported to providers and
    /// peers.
    fn tier(local_pref: LocalPref, tier: LocalPref) -> Option<LocalPref> {
        if local_pref <= PEER_LOCAL_PREF || local_pref == PEERSTAR_LOCAL_PREF {
            None
        } else {
            Some(tier)
        }
    }

    /// Label of the extender, as used in topology files.
    pub fn label(&self) -> &'static str {
        match self {
            Extender::Customer => "C",
            Extender::Peer => "R",
            Extender::Provider => "P",
            Extender::PeerPlus => "R+",
            Extender::PeerStar => "R*",
            Extender::Sibling => "S",
        }
    }
}

impl FromStr for Extender {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "C" => Ok(Extender::Customer),
            "R" => Ok(Extender::Peer),
            "P" => Ok(Extender::Provider),
            "R+" => Ok(Extender::PeerPlus),
            "R*" => Ok(Extender::PeerStar),
            "S" => Ok(Extender::Sibling),
            _ => Err(ConfigError::UnknownExtender(s.to_string())),
        }
    }
}
