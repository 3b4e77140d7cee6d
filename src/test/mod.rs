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

use std::{cell::RefCell, rc::Rc};

use crate::{
    notifications::Channel,
    policies::Extender,
    protocol::{Protocol, ProtocolKind},
    topology::{Topology, TopologyBuilder},
    types::NodeId,
};

mod test_config;
mod test_policies;
mod test_simulator;

/// Record every notification published on `channel`.
pub(crate) fn record<N: Clone + 'static>(channel: &mut Channel<N>) -> Rc<RefCell<Vec<N>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let log_cloned = log.clone();
    channel.subscribe(move |n: &N| log_cloned.borrow_mut().push(n.clone()));
    log
}

/// Build a topology from a list of `(id, protocol, mrai)` and a list of `(tail, head, extender)`.
pub(crate) fn topology(
    nodes: &[(NodeId, ProtocolKind, u64)],
    links: &[(NodeId, NodeId, Extender)],
) -> Topology {
    let mut builder = TopologyBuilder::new();
    for (id, kind, mrai) in nodes {
        builder.add_node(*id, Protocol::new(*kind, *mrai)).unwrap();
    }
    for (tail, head, extender) in links {
        builder.link(*tail, *head, *extender).unwrap();
    }
    builder.build()
}
