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

//! Module defining the AS path carried by each route.

use std::{
    fmt::{Display, Formatter},
    hash::{Hash, Hasher},
};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::NodeId;

/// Business relation of the link a route traversed, as seen from the node that learned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Relation {
    /// The route was learned from a customer.
    Customer,
    /// The route was learned from a peer (including peer+ and peer*).
    Peer,
    /// The route was learned from a provider.
    Provider,
    /// The route was learned from a sibling.
    Sibling,
}

/// A single hop on a [`Path`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PathHop {
    /// The node that was traversed.
    pub node: NodeId,
    /// Relation of the link over which the route left `node`, if known.
    pub relation: Option<Relation>,
}

/// Immutable sequence of nodes a route has traversed, ordered from the origin towards the most
/// recent hop.
///
/// Paths are never modified in place; [`Path::append`] returns a new path. Two paths are equal if
/// they traverse the same nodes in the same order. Relation tags do not take part in the
/// comparison.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Path {
    hops: Vec<PathHop>,
}

impl Path {
    /// Create an empty path.
    pub const fn new() -> Self {
        Self { hops: Vec::new() }
    }

    /// Return a new path extended by `node`, without a relation tag.
    pub fn append(&self, node: NodeId) -> Self {
        self.push(PathHop {
            node,
            relation: None,
        })
    }

    /// Return a new path extended by `node`, tagged with the relation of the traversed link.
    pub fn append_with(&self, node: NodeId, relation: Relation) -> Self {
        self.push(PathHop {
            node,
            relation: Some(relation),
        })
    }

    fn push(&self, hop: PathHop) -> Self {
        let mut hops = Vec::with_capacity(self.hops.len() + 1);
        hops.extend_from_slice(&self.hops);
        hops.push(hop);
        Self { hops }
    }

    /// Check whether `node` is part of the path.
    pub fn contains(&self, node: NodeId) -> bool {
        self.hops.iter().any(|hop| hop.node == node)
    }

    /// The last node of the path, which is the neighbor the route was learned from.
    pub fn next_hop(&self) -> Option<NodeId> {
        self.hops.last().map(|hop| hop.node)
    }

    /// Return the prefix of the path before the first occurrence of `node`. If `node` is not on the
    /// path, a copy of the entire path is returned.
    pub fn sub_path_before(&self, node: NodeId) -> Self {
        match self.hops.iter().position(|hop| hop.node == node) {
            Some(pos) => Self {
                hops: self.hops[..pos].to_vec(),
            },
            None => self.clone(),
        }
    }

    /// Number of hops on the path.
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    /// Returns `true` if the path has no hops.
    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Iterate over the nodes of the path, starting at the origin.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.hops.iter().map(|hop| hop.node)
    }

    /// Iterate over the relation tags of the path, starting at the origin. Untagged hops are
    /// skipped.
    pub fn relations(&self) -> impl Iterator<Item = Relation> + Clone + '_ {
        self.hops.iter().filter_map(|hop| hop.relation)
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.hops.len() == other.hops.len() && self.nodes().eq(other.nodes())
    }
}

impl Eq for Path {}

impl Hash for Path {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hops.len().hash(state);
        self.nodes().for_each(|n| n.hash(state));
    }
}

impl From<Vec<NodeId>> for Path {
    fn from(nodes: Vec<NodeId>) -> Self {
        nodes.into_iter().collect()
    }
}

impl<const N: usize> From<[NodeId; N]> for Path {
    fn from(nodes: [NodeId; N]) -> Self {
        nodes.into_iter().collect()
    }
}

impl FromIterator<NodeId> for Path {
    fn from_iter<T: IntoIterator<Item = NodeId>>(iter: T) -> Self {
        Self {
            hops: iter
                .into_iter()
                .map(|node| PathHop {
                    node,
                    relation: None,
                })
                .collect(),
        }
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.nodes().join(", "))
    }
}
