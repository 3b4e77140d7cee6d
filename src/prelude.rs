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

//! Convenience re-export of common members.

pub use crate::bgp::{bgp_route_compare, LeakKind, Route};
pub use crate::event::{DelayGenerator, NoDelayGenerator, RandomDelayGenerator};
pub use crate::policies::{
    AttackType, Extender, CUSTOMER_LOCAL_PREF, PEERPLUS_LOCAL_PREF, PEERSTAR_LOCAL_PREF,
    PEER_LOCAL_PREF, PROVIDER_LOCAL_PREF,
};
pub use crate::protocol::{Protocol, ProtocolKind};
pub use crate::simulator::{Advertisement, Simulator};
pub use crate::topology::{Topology, TopologyBuilder};
pub use crate::types::{ConfigError, NodeId, Path, Relation, SimError, Time};
