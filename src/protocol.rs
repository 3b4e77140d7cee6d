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

//! # BGP protocol engine
//!
//! A single [`Protocol`] implements the learn, select and export cycle of every protocol variant.
//! The [`ProtocolKind`] decides what happens in the two places where the variants differ:
//!
//! - When a route with a loop is learned: plain BGP simply discards it. The stateful suppression
//!   variants (SS-BGP, ISS-BGP and their second versions) additionally check whether the loop is
//!   *recurrent*, and if so, disable the neighbor that sent it.
//! - After the loop check: the ASPA variant classifies route leaks based on the relation tags of
//!   the path. Leaked routes are stored, but never selected.
//!
//! Exports are rate-limited by the MRAI timer. While the timer runs, changes of the selected route
//! are held back and exported once the timer expires.

use std::{fmt::Display, str::FromStr};

use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    bgp::{bgp_route_compare, classify_leak, Route},
    event::Event,
    node::{export_to_neighbors, Neighbor},
    notifications::{DetectNotification, ExportNotification, LearnNotification, SelectNotification},
    policies::AttackType,
    routing_table::RoutingTable,
    selector::RouteSelector,
    simulator::Simulator,
    types::{ConfigError, NodeId, SimError, Time},
};

/// Protocol variant run by a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolKind {
    /// Plain BGP
    Bgp,
    /// Stateful suppression BGP: a loop is recurrent if the looping route was preferred over the
    /// alternative.
    SsBgp,
    /// Isolating SS-BGP: like SS-BGP, and the alternative must be the path of the looping route
    /// before it reached this node.
    IssBgp,
    /// SS-BGP, version 2: a loop is recurrent if the alternative is less preferred than the route
    /// selected before the loop was detected.
    SsBgp2,
    /// ISS-BGP, version 2: SS-BGP2 combined with the path condition of ISS-BGP.
    IssBgp2,
    /// BGP with route leak detection.
    Aspa,
    /// BGP node that leaks routes.
    Attacker(AttackType),
}

impl ProtocolKind {
    /// Attack type of attacker nodes.
    pub fn attack(&self) -> Option<AttackType> {
        match self {
            ProtocolKind::Attacker(a) => Some(*a),
            _ => None,
        }
    }

    /// Returns `true` if the protocol classifies and discards route leaks.
    pub fn detects_leaks(&self) -> bool {
        matches!(self, ProtocolKind::Aspa)
    }

    /// Returns `true` if the protocol disables neighbors that cause recurrent loops.
    pub fn suppresses_loops(&self) -> bool {
        matches!(
            self,
            ProtocolKind::SsBgp
                | ProtocolKind::IssBgp
                | ProtocolKind::SsBgp2
                | ProtocolKind::IssBgp2
        )
    }

    /// Decide whether the loop in `learned` is recurrent. `alternative` is the route selected after
    /// invalidating the sender, and `previous` the one selected before.
    pub fn is_recurrent(
        &self,
        node: NodeId,
        learned: &Route,
        alternative: &Route,
        previous: &Route,
    ) -> bool {
        let ss1 = || learned.local_pref() > alternative.local_pref();
        let ss2 = || alternative.local_pref() < previous.local_pref();
        let isolated = || *alternative.as_path() == learned.as_path().sub_path_before(node);
        match self {
            ProtocolKind::SsBgp => ss1(),
            ProtocolKind::IssBgp => ss1() && isolated(),
            ProtocolKind::SsBgp2 => ss2(),
            ProtocolKind::IssBgp2 => ss2() && isolated(),
            ProtocolKind::Bgp | ProtocolKind::Aspa | ProtocolKind::Attacker(_) => false,
        }
    }

    /// Label of the protocol, as used in topology files.
    pub fn label(&self) -> &'static str {
        match self {
            ProtocolKind::Bgp => "bgp",
            ProtocolKind::SsBgp => "ssbgp",
            ProtocolKind::IssBgp => "issbgp",
            ProtocolKind::SsBgp2 => "ssbgp2",
            ProtocolKind::IssBgp2 => "issbgp2",
            ProtocolKind::Aspa => "aspa",
            ProtocolKind::Attacker(AttackType::LeakToProviders) => "attack1",
            ProtocolKind::Attacker(AttackType::LeakToPeers) => "attack2",
            ProtocolKind::Attacker(AttackType::LeakToAll) => "attack3",
        }
    }
}

impl Display for ProtocolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProtocolKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bgp" => Ok(ProtocolKind::Bgp),
            "ssbgp" => Ok(ProtocolKind::SsBgp),
            "issbgp" => Ok(ProtocolKind::IssBgp),
            "ssbgp2" => Ok(ProtocolKind::SsBgp2),
            "issbgp2" => Ok(ProtocolKind::IssBgp2),
            "aspa" => Ok(ProtocolKind::Aspa),
            "attack1" => Ok(ProtocolKind::Attacker(AttackType::LeakToProviders)),
            "attack2" => Ok(ProtocolKind::Attacker(AttackType::LeakToPeers)),
            "attack3" => Ok(ProtocolKind::Attacker(AttackType::LeakToAll)),
            _ => Err(ConfigError::UnknownProtocol(s.to_string())),
        }
    }
}

/// State of the MRAI timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
    Disabled,
    Running { generation: u64 },
}

/// Routing state and behavior of a single node.
#[derive(Debug, Clone)]
pub struct Protocol {
    kind: ProtocolKind,
    mrai: Time,
    selector: RouteSelector,
    timer: Timer,
    generation: u64,
    last_exported: Route,
}

impl Protocol {
    /// Create a protocol with an empty routing table.
    pub fn new(kind: ProtocolKind, mrai: Time) -> Self {
        Self {
            kind,
            mrai,
            selector: RouteSelector::wrap_new_table(Route::Invalid, bgp_route_compare),
            timer: Timer::Disabled,
            generation: 0,
            last_exported: Route::Invalid,
        }
    }

    /// Create a protocol whose routing table is seeded with `table`.
    pub fn with_table(kind: ProtocolKind, mrai: Time, table: RoutingTable) -> Self {
        Self {
            selector: RouteSelector::wrap(table, bgp_route_compare),
            ..Self::new(kind, mrai)
        }
    }

    /// Protocol variant
    pub fn kind(&self) -> ProtocolKind {
        self.kind
    }

    /// Minimum route advertisement interval
    pub fn mrai(&self) -> Time {
        self.mrai
    }

    /// The currently selected route
    pub fn selected_route(&self) -> &Route {
        self.selector.selected_route()
    }

    /// The neighbor of the currently selected route
    pub fn selected_neighbor(&self) -> Option<NodeId> {
        self.selector.selected_neighbor()
    }

    /// The route selector and its routing table
    pub fn selector(&self) -> &RouteSelector {
        &self.selector
    }

    /// The last route that was exported to the neighbors
    pub fn last_exported(&self) -> &Route {
        &self.last_exported
    }

    /// Returns `true` while the MRAI timer is running.
    pub fn is_timer_running(&self) -> bool {
        matches!(self.timer, Timer::Running { .. })
    }

    /// Originate `route` at `node`.
    pub fn set_local_route(
        &mut self,
        node: NodeId,
        neighbors: &mut [Neighbor],
        route: Route,
        sim: &mut Simulator,
    ) -> Result<(), SimError> {
        self.process(node, neighbors, node, route, sim)
    }

    /// Process a route that `node` received from `sender`.
    pub fn process(
        &mut self,
        node: NodeId,
        neighbors: &mut [Neighbor],
        sender: NodeId,
        route: Route,
        sim: &mut Simulator,
    ) -> Result<(), SimError> {
        let previous = self.selected_route().clone();
        let mut changed = false;

        let learned = self.learn(node, sender, route, &mut changed, sim)?;

        let time = sim.scheduler.time();
        sim.notifier.learn.publish_with(|| LearnNotification {
            time,
            node,
            route: learned.clone(),
            neighbor: sender,
        });

        changed |= self.selector.update(sender, learned);

        if changed {
            self.selection_changed(node, neighbors, previous, sim)?;
        }
        Ok(())
    }

    /// Allow `neighbor` to be selected again. Exports if the selection changed.
    pub fn enable_neighbor(
        &mut self,
        node: NodeId,
        neighbors: &mut [Neighbor],
        neighbor: NodeId,
        sim: &mut Simulator,
    ) -> Result<bool, SimError> {
        let previous = self.selected_route().clone();
        let changed = self.selector.enable(neighbor);
        if changed {
            self.selection_changed(node, neighbors, previous, sim)?;
        }
        Ok(changed)
    }

    /// Prevent `neighbor` from being selected. Exports if the selection changed.
    pub fn disable_neighbor(
        &mut self,
        node: NodeId,
        neighbors: &mut [Neighbor],
        neighbor: NodeId,
        sim: &mut Simulator,
    ) -> Result<bool, SimError> {
        let previous = self.selected_route().clone();
        let changed = self.selector.disable(neighbor);
        if changed {
            self.selection_changed(node, neighbors, previous, sim)?;
        }
        Ok(changed)
    }

    /// Handle the expiry of the MRAI timer. Timers that were cancelled or restarted since the event
    /// was scheduled are ignored.
    pub fn on_timer_expired(
        &mut self,
        node: NodeId,
        neighbors: &mut [Neighbor],
        generation: u64,
        sim: &mut Simulator,
    ) -> Result<(), SimError> {
        if self.timer != (Timer::Running { generation }) {
            trace!("Node {} ignores stale timer (generation {})", node, generation);
            return Ok(());
        }
        self.timer = Timer::Disabled;
        self.export(node, neighbors, sim)
    }

    /// Export the selected route to all neighbors, unless the MRAI timer is running or the route
    /// was already exported.
    pub fn export(
        &mut self,
        node: NodeId,
        neighbors: &mut [Neighbor],
        sim: &mut Simulator,
    ) -> Result<(), SimError> {
        if self.is_timer_running() || *self.selected_route() == self.last_exported {
            return Ok(());
        }

        let route = self.selected_route().clone();
        export_to_neighbors(node, self.kind.attack(), neighbors, &route, sim)?;

        let time = sim.scheduler.time();
        sim.notifier.export.publish_with(|| ExportNotification {
            time,
            node,
            route: route.clone(),
        });
        self.last_exported = route;

        if self.mrai > 0 {
            self.generation += 1;
            self.timer = Timer::Running {
                generation: self.generation,
            };
            sim.scheduler.schedule_from_now(
                Event::TimerExpired {
                    node,
                    generation: self.generation,
                },
                self.mrai,
            )?;
        }
        Ok(())
    }

    /// Clear the routing table, cancel the MRAI timer and forget the last exported route.
    pub fn reset(&mut self) {
        self.selector.clear();
        self.timer = Timer::Disabled;
        self.last_exported = Route::Invalid;
    }

    fn selection_changed(
        &mut self,
        node: NodeId,
        neighbors: &mut [Neighbor],
        previous: Route,
        sim: &mut Simulator,
    ) -> Result<(), SimError> {
        let time = sim.scheduler.time();
        let selected = self.selected_route();
        sim.notifier.select.publish_with(|| SelectNotification {
            time,
            node,
            selected: selected.clone(),
            previous,
        });
        self.export(node, neighbors, sim)
    }

    /// Apply the loop check and, for leak-detecting protocols, the leak classification.
    fn learn(
        &mut self,
        node: NodeId,
        sender: NodeId,
        route: Route,
        changed: &mut bool,
        sim: &mut Simulator,
    ) -> Result<Route, SimError> {
        if route.as_path().contains(node) {
            trace!("Node {} learned a looping route {} from {}", node, route, sender);
            self.on_loop_detected(node, sender, &route, changed, sim);
            return Ok(Route::Invalid);
        }

        if self.kind.detects_leaks() {
            if let Some(kind) = classify_leak(route.as_path())? {
                trace!("Node {} classified {} from {} as a leak", node, route, sender);
                return Ok(Route::Leak {
                    kind,
                    as_path: route.as_path().clone(),
                });
            }
        }

        Ok(route)
    }

    fn on_loop_detected(
        &mut self,
        node: NodeId,
        sender: NodeId,
        learned: &Route,
        changed: &mut bool,
        sim: &mut Simulator,
    ) {
        if !self.kind.suppresses_loops() || !self.selector.table().is_enabled(sender) {
            return;
        }

        let previous = self.selected_route().clone();
        *changed |= self.selector.update(sender, Route::Invalid);
        let alternative = self.selected_route();

        if self.kind.is_recurrent(node, learned, alternative, &previous) {
            let alternative = alternative.clone();
            debug!("Node {} detected a recurrent loop, disabling {}", node, sender);
            *changed |= self.selector.disable(sender);
            let time = sim.scheduler.time();
            sim.notifier.detect.publish_with(|| DetectNotification {
                time,
                node,
                learned: learned.clone(),
                alternative,
                neighbor: sender,
            });
        }
    }
}
