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

//! Module containing the [`RouteSelector`], which keeps the best route of a routing table up to
//! date while the table is modified.

use std::cmp::Ordering;

use crate::{
    bgp::{Route, RouteCompare},
    routing_table::RoutingTable,
    types::NodeId,
};

/// Wrapper around a [`RoutingTable`] that caches the selected route and the neighbor it was learned
/// from.
///
/// After every operation, the selected route is a most preferred route among all enabled
/// neighbors, or the invalid route if no enabled neighbor has a valid route. If multiple neighbors
/// share the most preferred route, the one with the smallest id is picked on a full reselection.
#[derive(Debug, Clone)]
pub struct RouteSelector {
    table: RoutingTable,
    compare: RouteCompare,
    selected_route: Route,
    selected_neighbor: Option<NodeId>,
}

impl PartialEq for RouteSelector {
    fn eq(&self, other: &Self) -> bool {
        self.table == other.table
            && self.selected_route == other.selected_route
            && self.selected_neighbor == other.selected_neighbor
    }
}

impl RouteSelector {
    /// Create a selector with a new, empty table. `invalid` is the route returned for neighbors
    /// without an entry.
    pub fn wrap_new_table(invalid: Route, compare: RouteCompare) -> Self {
        Self {
            selected_route: invalid.clone(),
            table: RoutingTable::new(invalid),
            compare,
            selected_neighbor: None,
        }
    }

    /// Wrap an existing table and select its best route.
    pub fn wrap(table: RoutingTable, compare: RouteCompare) -> Self {
        let mut s = Self {
            selected_route: table.invalid_route().clone(),
            table,
            compare,
            selected_neighbor: None,
        };
        s.reselect();
        s
    }

    /// The currently selected route.
    pub fn selected_route(&self) -> &Route {
        &self.selected_route
    }

    /// The neighbor from which the selected route was learned.
    pub fn selected_neighbor(&self) -> Option<NodeId> {
        self.selected_neighbor
    }

    /// Read-only access to the wrapped table.
    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    /// All neighbors that are currently disabled, in ascending order.
    pub fn disabled_neighbors(&self) -> Vec<NodeId> {
        self.table
            .iter()
            .filter(|(_, e)| !e.enabled)
            .map(|(n, _)| n)
            .collect()
    }

    /// Store `route` as the candidate of `neighbor` and update the selection. Returns `true` if the
    /// selected route or neighbor changed.
    pub fn update(&mut self, neighbor: NodeId, route: Route) -> bool {
        let enabled = self.table.is_enabled(neighbor);
        let ord = (self.compare)(&route, &self.selected_route);
        self.table.set(neighbor, route);

        if enabled && ord == Ordering::Greater {
            self.selected_route = self.table.get(neighbor).clone();
            self.selected_neighbor = Some(neighbor);
            true
        } else if Some(neighbor) == self.selected_neighbor && ord != Ordering::Equal {
            self.reselect();
            true
        } else {
            false
        }
    }

    /// Make `neighbor` ineligible for selection. Its route stays in the table. Returns `true` if
    /// the neighbor was selected, in which case a new route is selected.
    pub fn disable(&mut self, neighbor: NodeId) -> bool {
        self.table.set_enabled(neighbor, false);
        if Some(neighbor) == self.selected_neighbor {
            self.reselect();
            true
        } else {
            false
        }
    }

    /// Make a previously disabled `neighbor` eligible again. Returns `true` if its route is now
    /// selected.
    pub fn enable(&mut self, neighbor: NodeId) -> bool {
        if self.table.is_enabled(neighbor) {
            return false;
        }
        self.table.set_enabled(neighbor, true);
        let route = self.table.get(neighbor);
        if (self.compare)(route, &self.selected_route) == Ordering::Greater {
            self.selected_route = route.clone();
            self.selected_neighbor = Some(neighbor);
            true
        } else {
            false
        }
    }

    /// Enable all disabled neighbors. Returns `true` if the selection changed.
    pub fn enable_all(&mut self) -> bool {
        self.disabled_neighbors()
            .into_iter()
            .fold(false, |changed, neighbor| self.enable(neighbor) || changed)
    }

    /// Remove all entries and reset the selection to the invalid route.
    pub fn clear(&mut self) {
        self.table.clear();
        self.selected_route = self.table.invalid_route().clone();
        self.selected_neighbor = None;
    }

    /// Scan all enabled neighbors and select the most preferred route.
    fn reselect(&mut self) {
        let mut best = self.table.invalid_route();
        let mut best_neighbor = None;
        for (neighbor, entry) in self.table.iter() {
            if entry.enabled && (self.compare)(&entry.route, best) == Ordering::Greater {
                best = &entry.route;
                best_neighbor = Some(neighbor);
            }
        }
        self.selected_route = best.clone();
        self.selected_neighbor = best_neighbor;
    }
}
