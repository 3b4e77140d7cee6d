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

//! # Notifications
//!
//! The simulator reports everything that happens during a run through the [`Notifier`]. It has one
//! typed [`Channel`] per kind of notification. Listeners are closures subscribed to a channel; they
//! are called synchronously in the order they were subscribed. A notification is only constructed
//! if at least one listener is subscribed to its channel.
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//! use routesim::notifications::Notifier;
//!
//! let mut notifier = Notifier::default();
//! let exports = Rc::new(RefCell::new(Vec::new()));
//! let exports_cloned = exports.clone();
//! let id = notifier.export.subscribe(move |n| exports_cloned.borrow_mut().push(n.node));
//! // ... run the simulation ...
//! assert!(notifier.unsubscribe(id));
//! assert!(exports.borrow().is_empty());
//! ```

use std::{
    collections::BTreeMap,
    fmt::{Debug, Formatter},
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::{
    bgp::Route,
    event::Message,
    types::{NodeId, Time},
};

static NEXT_LISTENER_ID: AtomicUsize = AtomicUsize::new(0);

/// Handle of a subscribed listener, used to unsubscribe it again. Handles are unique across all
/// channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(usize);

type Listener<N> = Box<dyn FnMut(&N)>;

/// Publish/subscribe channel for a single notification type.
pub struct Channel<N> {
    listeners: Vec<(ListenerId, Listener<N>)>,
}

impl<N> Default for Channel<N> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }
}

impl<N> Debug for Channel<N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<N> Channel<N> {
    /// Subscribe a listener to this channel.
    pub fn subscribe(&mut self, listener: impl FnMut(&N) + 'static) -> ListenerId {
        let id = ListenerId(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed));
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it is not subscribed to this channel.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let len = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != len
    }

    /// Returns `true` if at least one listener is subscribed.
    pub fn has_listeners(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Number of subscribed listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns `true` if no listener is subscribed.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Call all listeners with `notification`.
    pub fn publish(&mut self, notification: &N) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(notification)
        }
    }

    /// Build the notification with `f` and publish it, but only if anyone is listening.
    pub fn publish_with(&mut self, f: impl FnOnce() -> N) {
        if self.has_listeners() {
            let notification = f();
            self.publish(&notification);
        }
    }

    /// Remove all listeners.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

/// A simulation starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartNotification {
    /// Time at which the simulation starts
    pub time: Time,
    /// Seed of the delay generator used for this run
    pub seed: u64,
    /// All nodes of the simulated topology
    pub nodes: Vec<NodeId>,
}

/// A simulation ended, either because no events are left or because the threshold was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndNotification {
    /// Time at which the simulation ended
    pub time: Time,
    /// Selected route of every node at the end of the run
    pub selected: BTreeMap<NodeId, Route>,
}

/// The simulation was stopped because the time threshold was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdReachedNotification {
    /// Time of the event that crossed the threshold
    pub time: Time,
    /// The configured threshold
    pub threshold: Time,
}

/// A message was handed to a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSentNotification {
    /// Time at which the message was sent
    pub time: Time,
    /// Time at which the message will be delivered
    pub deliver_time: Time,
    /// The message
    pub message: Message,
}

/// A message was delivered to its recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageReceivedNotification {
    /// Time of delivery
    pub time: Time,
    /// The message
    pub message: Message,
}

/// A node learned a route from a neighbor (after loop and leak checks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearnNotification {
    /// Time
    pub time: Time,
    /// The learning node
    pub node: NodeId,
    /// The learned route
    pub route: Route,
    /// Neighbor the route was learned from
    pub neighbor: NodeId,
}

/// The selected route of a node changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectNotification {
    /// Time
    pub time: Time,
    /// The node
    pub node: NodeId,
    /// Newly selected route
    pub selected: Route,
    /// Previously selected route
    pub previous: Route,
}

/// A node exported its selected route to all its neighbors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportNotification {
    /// Time
    pub time: Time,
    /// The exporting node
    pub node: NodeId,
    /// The exported route (before applying the extenders)
    pub route: Route,
}

/// A node detected a recurrent routing loop and disabled the neighbor causing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectNotification {
    /// Time
    pub time: Time,
    /// The detecting node
    pub node: NodeId,
    /// The route containing the loop
    pub learned: Route,
    /// The route selected after invalidating the looping route
    pub alternative: Route,
    /// The disabled neighbor
    pub neighbor: NodeId,
}

/// Collection of all notification channels of a simulator.
#[derive(Debug, Default)]
pub struct Notifier {
    /// Start of a simulation
    pub start: Channel<StartNotification>,
    /// End of a simulation
    pub end: Channel<EndNotification>,
    /// Threshold reached
    pub threshold_reached: Channel<ThresholdReachedNotification>,
    /// Message sent
    pub message_sent: Channel<MessageSentNotification>,
    /// Message received
    pub message_received: Channel<MessageReceivedNotification>,
    /// Route learned
    pub learn: Channel<LearnNotification>,
    /// Selected route changed
    pub select: Channel<SelectNotification>,
    /// Route exported
    pub export: Channel<ExportNotification>,
    /// Recurrent loop detected
    pub detect: Channel<DetectNotification>,
}

impl Notifier {
    /// Remove the listener `id` from whichever channel it is subscribed to. Returns `false` if no
    /// channel knows it.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.start.unsubscribe(id)
            || self.end.unsubscribe(id)
            || self.threshold_reached.unsubscribe(id)
            || self.message_sent.unsubscribe(id)
            || self.message_received.unsubscribe(id)
            || self.learn.unsubscribe(id)
            || self.select.unsubscribe(id)
            || self.export.unsubscribe(id)
            || self.detect.unsubscribe(id)
    }

    /// Remove all listeners from all channels.
    pub fn clear(&mut self) {
        self.start.clear();
        self.end.clear();
        self.threshold_reached.clear();
        self.message_sent.clear();
        self.message_received.clear();
        self.learn.clear();
        self.select.clear();
        self.export.clear();
        self.detect.clear();
    }
}
