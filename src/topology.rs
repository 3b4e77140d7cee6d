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

//! # Topology
//!
//! A [`Topology`] is the set of nodes taking part in a simulation, connected by directed links.
//! It is constructed with a [`TopologyBuilder`] and does not change afterwards. The link
//! `link(tail, head, extender)` means that `tail` learns the routes exported by `head`, after they
//! were transformed by `extender`.
//!
//! ```
//! use routesim::prelude::*;
//!
//! # fn main() -> Result<(), SimError> {
//! let mut builder = TopologyBuilder::new();
//! builder.add_node(0, Protocol::new(ProtocolKind::Bgp, 0))?;
//! builder.add_node(1, Protocol::new(ProtocolKind::Bgp, 0))?;
//! // 1 is a provider of 0
//! builder.link(1, 0, Extender::Customer)?;
//! builder.link(0, 1, Extender::Provider)?;
//! let topology = builder.build();
//! assert_eq!(topology.size(), 2);
//! assert_eq!(topology.link_count(), 2);
//! # Ok(())
//! # }
//! ```

use std::collections::{btree_map, BTreeMap};

use serde::{Deserialize, Serialize};

use crate::{
    bgp::Route,
    node::Node,
    policies::Extender,
    protocol::Protocol,
    types::{ConfigError, NodeId},
};

/// A directed link: `tail` learns the routes exported by `head` through `extender`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    /// The node learning routes over this link
    pub tail: NodeId,
    /// The node exporting routes over this link
    pub head: NodeId,
    /// Transformation of the exported routes
    pub extender: Extender,
}

/// Immutable set of nodes and links.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    nodes: BTreeMap<NodeId, Node>,
}

impl Topology {
    /// Number of nodes
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Number of directed links
    pub fn link_count(&self) -> usize {
        self.nodes.values().map(|n| n.neighbors().len()).sum()
    }

    /// Get a node by its id.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Get a mutable reference to a node by its id.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Returns `true` if the node is part of the topology.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Ids of all nodes, in ascending order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    /// Iterate over all nodes, in ascending order of their id.
    pub fn nodes(&self) -> btree_map::Values<'_, NodeId, Node> {
        self.nodes.values()
    }

    /// All links of the topology, ordered by the exporting node.
    pub fn links(&self) -> Vec<Link> {
        self.nodes
            .values()
            .flat_map(|head| {
                head.neighbors().iter().map(move |n| Link {
                    tail: n.node,
                    head: head.id(),
                    extender: n.extender,
                })
            })
            .collect()
    }

    /// The selected route of every node.
    pub fn selected_routes(&self) -> BTreeMap<NodeId, Route> {
        self.nodes
            .iter()
            .map(|(id, n)| (*id, n.selected_route().clone()))
            .collect()
    }

    /// Reset all nodes to their initial state, such that the topology can be simulated again.
    pub fn reset(&mut self) {
        self.nodes.values_mut().for_each(Node::reset);
    }
}

/// Builder of a [`Topology`].
#[derive(Debug, Clone, Default)]
pub struct TopologyBuilder {
    nodes: BTreeMap<NodeId, Node>,
}

impl TopologyBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node running `protocol`.
    pub fn add_node(&mut self, id: NodeId, protocol: Protocol) -> Result<&mut Self, ConfigError> {
        if self.nodes.contains_key(&id) {
            return Err(ConfigError::NodeExists(id));
        }
        self.nodes.insert(id, Node::new(id, protocol));
        Ok(self)
    }

    /// Add a link over which `tail` learns the routes exported by `head`, transformed by
    /// `extender`.
    pub fn link(
        &mut self,
        tail: NodeId,
        head: NodeId,
        extender: Extender,
    ) -> Result<&mut Self, ConfigError> {
        if !self.nodes.contains_key(&tail) {
            return Err(ConfigError::NodeNotFound(tail));
        }
        let head_node = self
            .nodes
            .get_mut(&head)
            .ok_or(ConfigError::NodeNotFound(head))?;
        if !head_node.add_neighbor(tail, extender) {
            return Err(ConfigError::LinkExists(tail, head));
        }
        Ok(self)
    }

    /// Returns `true` if a node with the given id was added.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Freeze the topology.
    pub fn build(self) -> Topology {
        Topology { nodes: self.nodes }
    }
}
