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

//! Module containing the BGP route definitions, the route comparison and the leak classification.

use std::{
    cmp::Ordering,
    fmt::{Display, Formatter},
};

use serde::{Deserialize, Serialize};

use crate::types::{LocalPref, Path, SimError};

mod leak;

pub use leak::{classify_leak, FORBIDDEN_RELATIONS};

/// Local preference of the invalid route.
pub const INVALID_LOCAL_PREF: LocalPref = LocalPref::MIN;
/// Local preference of the self route.
pub const SELF_LOCAL_PREF: LocalPref = LocalPref::MAX;

static EMPTY_PATH: Path = Path::new();

/// Kind of a detected route leak, named after the pair of relations that violates the valley-free
/// property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LeakKind {
    /// A provider route exported to a peer.
    ProviderPeer,
    /// A provider route exported to a provider.
    ProviderCustomer,
    /// A peer route exported to a peer.
    PeerPeer,
    /// A peer route exported to a provider.
    PeerCustomer,
}

impl LeakKind {
    /// Get the leak kind that belongs to an entry of [`FORBIDDEN_RELATIONS`].
    pub fn from_index(index: usize) -> Result<Self, SimError> {
        match index {
            0 => Ok(Self::ProviderPeer),
            1 => Ok(Self::ProviderCustomer),
            2 => Ok(Self::PeerPeer),
            3 => Ok(Self::PeerCustomer),
            i => Err(SimError::UnknownLeakKind(i)),
        }
    }

    /// Sentinel local preference of a route flagged with this leak kind. All sentinels lie just
    /// above the invalid local preference.
    pub fn local_pref(&self) -> LocalPref {
        match self {
            Self::ProviderPeer => INVALID_LOCAL_PREF + 1,
            Self::ProviderCustomer => INVALID_LOCAL_PREF + 2,
            Self::PeerPeer => INVALID_LOCAL_PREF + 3,
            Self::PeerCustomer => INVALID_LOCAL_PREF + 4,
        }
    }

    /// Short label, as used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ProviderPeer => "PR",
            Self::ProviderCustomer => "PC",
            Self::PeerPeer => "RR",
            Self::PeerCustomer => "RC",
        }
    }
}

/// A BGP route as it is stored and exchanged by the nodes.
///
/// Routes are immutable values with structural equality: two routes are equal if they are of the
/// same kind and carry the same local preference and path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    /// No route. It is never selected over any valid route.
    #[default]
    Invalid,
    /// The route a node originates itself. It has the highest possible local preference and an
    /// empty path.
    SelfRoute,
    /// A regular route.
    Valid {
        /// Local preference
        local_pref: LocalPref,
        /// AS path
        as_path: Path,
    },
    /// A route that was classified as a route leak. It is kept for reporting, but it is never
    /// valid for selection.
    Leak {
        /// The violation that was detected
        kind: LeakKind,
        /// AS path
        as_path: Path,
    },
}

impl Route {
    /// Create a new valid route.
    pub fn new(local_pref: LocalPref, as_path: impl Into<Path>) -> Self {
        Self::Valid {
            local_pref,
            as_path: as_path.into(),
        }
    }

    /// Local preference of the route.
    pub fn local_pref(&self) -> LocalPref {
        match self {
            Route::Invalid => INVALID_LOCAL_PREF,
            Route::SelfRoute => SELF_LOCAL_PREF,
            Route::Valid { local_pref, .. } => *local_pref,
            Route::Leak { kind, .. } => kind.local_pref(),
        }
    }

    /// AS path of the route. The invalid and the self route have an empty path.
    pub fn as_path(&self) -> &Path {
        match self {
            Route::Invalid | Route::SelfRoute => &EMPTY_PATH,
            Route::Valid { as_path, .. } | Route::Leak { as_path, .. } => as_path,
        }
    }

    /// Returns `true` if the route may be selected, i.e., it is neither invalid nor a leak.
    pub fn is_valid(&self) -> bool {
        matches!(self, Route::SelfRoute | Route::Valid { .. })
    }

    /// Returns the leak kind, if the route was flagged as a leak.
    pub fn leak_kind(&self) -> Option<LeakKind> {
        match self {
            Route::Leak { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Route::Invalid => write!(f, "•"),
            Route::SelfRoute => write!(f, "◦"),
            Route::Valid {
                local_pref,
                as_path,
            } => write!(f, "({}, {})", local_pref, as_path),
            Route::Leak { kind, as_path } => write!(f, "(leak {}, {})", kind.label(), as_path),
        }
    }
}

/// Compare two routes by BGP preference. `Ordering::Greater` means that `a` is preferred over `b`.
///
/// Routes that are not valid for selection are equal among each other and less preferred than any
/// valid route. Valid routes are compared by:
///
/// 1. Higher local preference
/// 2. Shorter AS path
/// 3. Smaller next hop (the last node on the path). If either path is empty, the routes are equal.
pub fn bgp_route_compare(a: &Route, b: &Route) -> Ordering {
    match (a.is_valid(), b.is_valid()) {
        (false, false) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (true, true) => {}
    }

    match a.local_pref().cmp(&b.local_pref()) {
        Ordering::Equal => {}
        o => return o,
    }

    match b.as_path().len().cmp(&a.as_path().len()) {
        Ordering::Equal => {}
        o => return o,
    }

    match (a.as_path().next_hop(), b.as_path().next_hop()) {
        (Some(a_next), Some(b_next)) => b_next.cmp(&a_next),
        _ => Ordering::Equal,
    }
}

/// Signature of a route comparator, as used by the [`crate::selector::RouteSelector`].
pub type RouteCompare = fn(&Route, &Route) -> Ordering;
