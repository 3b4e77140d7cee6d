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

//! Module for defining events

use serde::{Deserialize, Serialize};

mod delay;
mod scheduler;
pub use delay::{DelayGenerator, NoDelayGenerator, RandomDelayGenerator};
pub use scheduler::Scheduler;

use crate::{bgp::Route, types::NodeId};

/// A route sent from `sender` to `recipient`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    /// Node that exported the route
    pub sender: NodeId,
    /// Node that will learn the route
    pub recipient: NodeId,
    /// Route after applying the extender of the link
    pub route: Route,
}

/// Event to handle
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    /// `node` starts to originate `route`.
    Advertise {
        /// Advertising node
        node: NodeId,
        /// Advertised route
        route: Route,
    },
    /// A message is delivered to its recipient.
    Message(Message),
    /// The MRAI timer of `node` expires. The event is ignored if `generation` does not match the
    /// currently running timer.
    TimerExpired {
        /// Node owning the timer
        node: NodeId,
        /// Generation of the timer when it was started
        generation: u64,
    },
}

impl Event {
    /// Return the node where the event is processed
    pub fn node(&self) -> NodeId {
        match self {
            Event::Advertise { node, .. } | Event::TimerExpired { node, .. } => *node,
            Event::Message(m) => m.recipient,
        }
    }

    /// Returns true if the event delivers a message
    pub fn is_message(&self) -> bool {
        matches!(self, Event::Message(_))
    }
}
