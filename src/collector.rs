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

//! Data collectors that aggregate the notifications of a simulation run.

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use serde::{Deserialize, Serialize};

use crate::{
    bgp::Route,
    notifications::{ListenerId, Notifier},
    types::{NodeId, Time},
};

/// Something that listens to the notifications of a simulator and aggregates them.
pub trait DataCollector {
    /// Subscribe to all required channels of `notifier`.
    fn register(&mut self, notifier: &mut Notifier);

    /// Unsubscribe from `notifier`.
    fn unregister(&mut self, notifier: &mut Notifier);

    /// Forget all collected data.
    fn clear(&mut self);
}

/// Summary of a single run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicDataSet {
    /// Seed of the delay generator
    pub delay_seed: u64,
    /// Number of messages sent
    pub message_count: usize,
    /// Number of recurrent loops detected
    pub detection_count: usize,
    /// Whether the run finished before the threshold
    pub terminated: bool,
    /// Time at which the last message was sent
    pub termination_time: Time,
    /// Average over all nodes of the time the node exported its last route. Nodes that never
    /// export count with 0.
    pub avg_termination_time: f64,
    /// Number of nodes without a valid route at the end of the run
    pub disconnected_count: usize,
}

/// Collects a [`BasicDataSet`].
#[derive(Debug, Default)]
pub struct BasicDataCollector {
    data: Rc<RefCell<BasicDataSet>>,
    last_exported: Rc<RefCell<BTreeMap<NodeId, Time>>>,
    listeners: Vec<ListenerId>,
}

impl BasicDataCollector {
    /// Create a collector that is not yet registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// The data collected so far
    pub fn data(&self) -> BasicDataSet {
        self.data.borrow().clone()
    }
}

impl DataCollector for BasicDataCollector {
    fn register(&mut self, notifier: &mut Notifier) {
        let data = self.data.clone();
        let last_exported = self.last_exported.clone();
        self.listeners.push(notifier.start.subscribe(move |n| {
            let mut data = data.borrow_mut();
            data.delay_seed = n.seed;
            data.terminated = true;
            let mut last_exported = last_exported.borrow_mut();
            last_exported.clear();
            last_exported.extend(n.nodes.iter().map(|id| (*id, 0)));
        }));

        let data = self.data.clone();
        self.listeners.push(notifier.message_sent.subscribe(move |n| {
            let mut data = data.borrow_mut();
            data.message_count += 1;
            data.termination_time = n.time;
        }));

        let last_exported = self.last_exported.clone();
        self.listeners.push(notifier.export.subscribe(move |n| {
            last_exported.borrow_mut().insert(n.node, n.time);
        }));

        let data = self.data.clone();
        self.listeners.push(
            notifier
                .detect
                .subscribe(move |_| data.borrow_mut().detection_count += 1),
        );

        let data = self.data.clone();
        self.listeners.push(
            notifier
                .threshold_reached
                .subscribe(move |_| data.borrow_mut().terminated = false),
        );

        let data = self.data.clone();
        let last_exported = self.last_exported.clone();
        self.listeners.push(notifier.end.subscribe(move |n| {
            let mut data = data.borrow_mut();
            data.disconnected_count = n.selected.values().filter(|r| !r.is_valid()).count();
            let last_exported = last_exported.borrow();
            data.avg_termination_time = if last_exported.is_empty() {
                0.0
            } else {
                last_exported.values().sum::<Time>() as f64 / last_exported.len() as f64
            };
        }));
    }

    fn unregister(&mut self, notifier: &mut Notifier) {
        for id in self.listeners.drain(..) {
            notifier.unsubscribe(id);
        }
    }

    fn clear(&mut self) {
        *self.data.borrow_mut() = BasicDataSet::default();
        self.last_exported.borrow_mut().clear();
    }
}

/// Per-node results of a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDataSet {
    /// Time at which each node exported its last route, 0 if it never exported one
    pub termination_times: BTreeMap<NodeId, Time>,
    /// Selected route of each node at the end of the run
    pub selected_routes: BTreeMap<NodeId, Route>,
}

/// Collects a [`NodeDataSet`].
#[derive(Debug, Default)]
pub struct NodeDataCollector {
    data: Rc<RefCell<NodeDataSet>>,
    listeners: Vec<ListenerId>,
}

impl NodeDataCollector {
    /// Create a collector that is not yet registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// The data collected so far
    pub fn data(&self) -> NodeDataSet {
        self.data.borrow().clone()
    }
}

impl DataCollector for NodeDataCollector {
    fn register(&mut self, notifier: &mut Notifier) {
        let data = self.data.clone();
        self.listeners.push(notifier.start.subscribe(move |n| {
            data.borrow_mut()
                .termination_times
                .extend(n.nodes.iter().map(|id| (*id, 0)));
        }));

        let data = self.data.clone();
        self.listeners.push(notifier.export.subscribe(move |n| {
            data.borrow_mut().termination_times.insert(n.node, n.time);
        }));

        let data = self.data.clone();
        self.listeners.push(notifier.end.subscribe(move |n| {
            data.borrow_mut().selected_routes = n.selected.clone();
        }));
    }

    fn unregister(&mut self, notifier: &mut Notifier) {
        for id in self.listeners.drain(..) {
            notifier.unsubscribe(id);
        }
    }

    fn clear(&mut self) {
        *self.data.borrow_mut() = NodeDataSet::default();
    }
}
