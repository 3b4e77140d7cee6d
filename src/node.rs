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

//! Module defining a node (autonomous system) of the topology.

use log::*;

use crate::{
    bgp::Route,
    connection::Connection,
    event::Message,
    policies::{AttackType, Extender},
    protocol::Protocol,
    simulator::Simulator,
    types::{NodeId, SimError},
};

/// A neighbor to which a node exports its routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighbor {
    /// Id of the neighbor
    pub node: NodeId,
    /// Transformation applied to exported routes
    pub extender: Extender,
    /// Connection carrying the messages to the neighbor
    pub connection: Connection,
}

/// Send `route` from `sender` to every neighbor, each through its own extender.
pub(crate) fn export_to_neighbors(
    sender: NodeId,
    attack: Option<AttackType>,
    neighbors: &mut [Neighbor],
    route: &Route,
    sim: &mut Simulator,
) -> Result<(), SimError> {
    for neighbor in neighbors.iter_mut() {
        let message = Message {
            sender,
            recipient: neighbor.node,
            route: neighbor.extender.extend(route, sender, attack),
        };
        neighbor.connection.send(message, sim)?;
    }
    Ok(())
}

/// A node running a routing protocol.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    protocol: Protocol,
    neighbors: Vec<Neighbor>,
}

impl Node {
    /// Create a node without any neighbors.
    pub fn new(id: NodeId, protocol: Protocol) -> Self {
        Self {
            id,
            protocol,
            neighbors: Vec::new(),
        }
    }

    /// Id of the node
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The routing protocol of the node
    pub fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    /// Mutable access to the routing protocol of the node
    pub fn protocol_mut(&mut self) -> &mut Protocol {
        &mut self.protocol
    }

    /// All neighbors this node exports to, in the order they were added.
    pub fn neighbors(&self) -> &[Neighbor] {
        &self.neighbors
    }

    /// The currently selected route
    pub fn selected_route(&self) -> &Route {
        self.protocol.selected_route()
    }

    /// Add a neighbor that learns the routes of this node through `extender`. Returns `false` if
    /// the neighbor already exists.
    pub(crate) fn add_neighbor(&mut self, neighbor: NodeId, extender: Extender) -> bool {
        if self.neighbors.iter().any(|n| n.node == neighbor) {
            return false;
        }
        self.neighbors.push(Neighbor {
            node: neighbor,
            extender,
            connection: Connection::new(),
        });
        true
    }

    /// Start originating `route`.
    pub fn advertise(&mut self, route: Route, sim: &mut Simulator) -> Result<(), SimError> {
        trace!("Node {} advertises {}", self.id, route);
        self.protocol
            .set_local_route(self.id, &mut self.neighbors, route, sim)
    }

    /// Process a message delivered to this node.
    pub fn receive(&mut self, message: Message, sim: &mut Simulator) -> Result<(), SimError> {
        self.protocol
            .process(self.id, &mut self.neighbors, message.sender, message.route, sim)
    }

    /// Handle the expiry of the MRAI timer with the given generation.
    pub fn on_timer_expired(
        &mut self,
        generation: u64,
        sim: &mut Simulator,
    ) -> Result<(), SimError> {
        self.protocol
            .on_timer_expired(self.id, &mut self.neighbors, generation, sim)
    }

    /// Allow `neighbor` to be selected again.
    pub fn enable_neighbor(
        &mut self,
        neighbor: NodeId,
        sim: &mut Simulator,
    ) -> Result<bool, SimError> {
        self.protocol
            .enable_neighbor(self.id, &mut self.neighbors, neighbor, sim)
    }

    /// Prevent `neighbor` from being selected.
    pub fn disable_neighbor(
        &mut self,
        neighbor: NodeId,
        sim: &mut Simulator,
    ) -> Result<bool, SimError> {
        self.protocol
            .disable_neighbor(self.id, &mut self.neighbors, neighbor, sim)
    }

    /// Reset the protocol state and all connections.
    pub fn reset(&mut self) {
        self.protocol.reset();
        self.neighbors.iter_mut().for_each(|n| n.connection.reset());
    }
}
