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

//! Per-node table of candidate routes, one per neighbor.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{bgp::Route, types::NodeId};

/// Entry of the routing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingTableEntry {
    /// Candidate route learned from the neighbor.
    pub route: Route,
    /// Whether the neighbor may be selected.
    pub enabled: bool,
}

/// Mapping from neighbors to the candidate route learned from them. Neighbors without an entry read
/// as the invalid route and as enabled. Entries are kept ordered by neighbor id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingTable {
    invalid: Route,
    entries: BTreeMap<NodeId, RoutingTableEntry>,
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::new(Route::Invalid)
    }
}

impl RoutingTable {
    /// Create an empty table. `invalid` is returned for neighbors without an entry.
    pub fn new(invalid: Route) -> Self {
        Self {
            invalid,
            entries: BTreeMap::new(),
        }
    }

    /// The route returned for neighbors without an entry.
    pub fn invalid_route(&self) -> &Route {
        &self.invalid
    }

    /// Get the candidate route of `neighbor`.
    pub fn get(&self, neighbor: NodeId) -> &Route {
        self.entries
            .get(&neighbor)
            .map(|e| &e.route)
            .unwrap_or(&self.invalid)
    }

    /// Set the candidate route of `neighbor`, keeping its enabled flag.
    pub fn set(&mut self, neighbor: NodeId, route: Route) {
        match self.entries.get_mut(&neighbor) {
            Some(entry) => entry.route = route,
            None => {
                self.entries.insert(
                    neighbor,
                    RoutingTableEntry {
                        route,
                        enabled: true,
                    },
                );
            }
        }
    }

    /// Returns `false` only if `neighbor` was explicitly disabled.
    pub fn is_enabled(&self, neighbor: NodeId) -> bool {
        self.entries.get(&neighbor).map(|e| e.enabled).unwrap_or(true)
    }

    /// Set the enabled flag of `neighbor`. If the neighbor has no entry yet, it is created with the
    /// invalid route.
    pub fn set_enabled(&mut self, neighbor: NodeId, enabled: bool) {
        let invalid = &self.invalid;
        self.entries
            .entry(neighbor)
            .or_insert_with(|| RoutingTableEntry {
                route: invalid.clone(),
                enabled: true,
            })
            .enabled = enabled;
    }

    /// Iterate over all entries in ascending order of the neighbor id.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &RoutingTableEntry)> {
        self.entries.iter().map(|(n, e)| (*n, e))
    }

    /// Number of neighbors with an entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
