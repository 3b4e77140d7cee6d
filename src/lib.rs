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

#![deny(missing_docs, missing_debug_implementations)]

//! # RouteSim
//!
//! This is a library for simulating interdomain routing protocols on abstract topologies of
//! autonomous systems. It simulates plain BGP, the stateful suppression variants SS-BGP and ISS-BGP
//! (and their second versions), and an ASPA-style route leak defense, as well as attackers that
//! leak routes.
//!
//! ## Main Concepts
//!
//! A [`topology::Topology`] consists of [`node::Node`]s, each running a [`protocol::Protocol`].
//! Nodes are connected by directed links, each carrying a [`policies::Extender`] that transforms
//! the routes crossing it according to the business relation of the two nodes (customer, peer,
//! provider, sibling). Topologies are created with the [`topology::TopologyBuilder`], or from a
//! JSON scenario (see [`config::ScenarioConfig`]).
//!
//! The [`simulator::Simulator`] runs a discrete-event simulation on a topology. Routes are
//! exchanged as messages over FIFO [`connection::Connection`]s with delays drawn from a
//! [`event::DelayGenerator`]. Everything that happens during a run is published on the typed
//! channels of the [`notifications::Notifier`], which is how the [`collector`]s gather their data.
//!
//! Each node keeps one candidate route per neighbor in its [`routing_table::RoutingTable`], and
//! the [`selector::RouteSelector`] keeps track of the most preferred one according to
//! [`bgp::bgp_route_compare`]. Whenever the selected route changes, it is exported to all
//! neighbors, rate-limited by the MRAI timer.
//!
//! ## Example usage
//!
//! Three nodes in a chain, where each node is a customer of the next one. Node `0` originates a
//! route, which propagates up the chain.
//!
//! ```
//! use routesim::prelude::*;
//!
//! fn main() -> Result<(), SimError> {
//!     let mut builder = TopologyBuilder::new();
//!     for id in 0..3 {
//!         builder.add_node(id, Protocol::new(ProtocolKind::Bgp, 0))?;
//!     }
//!     builder.link(1, 0, Extender::Customer)?;
//!     builder.link(2, 1, Extender::Customer)?;
//!     let mut topology = builder.build();
//!
//!     let mut sim = Simulator::default();
//!     assert!(sim.simulate(&mut topology, &[Advertisement::new(0)], 1000)?);
//!
//!     assert_eq!(topology.get(0).unwrap().selected_route(), &Route::SelfRoute);
//!     assert_eq!(
//!         topology.get(2).unwrap().selected_route(),
//!         &Route::new(CUSTOMER_LOCAL_PREF, [0, 1])
//!     );
//!
//!     Ok(())
//! }
//! ```

pub mod bgp;
pub mod collector;
pub mod config;
pub mod connection;
pub mod event;
pub mod node;
pub mod notifications;
pub mod policies;
pub mod prelude;
pub mod protocol;
pub mod routing_table;
pub mod runner;
pub mod selector;
pub mod simulator;
pub mod topology;
pub mod types;

#[cfg(test)]
mod test;
