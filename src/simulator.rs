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

//! # Simulator
//!
//! The [`Simulator`] owns everything a single run needs besides the topology: the [`Scheduler`],
//! the [`DelayGenerator`] of the connections and the [`Notifier`]. Independent simulators share no
//! state, and can therefore run side by side.
//!
//! ```
//! use routesim::prelude::*;
//!
//! # fn main() -> Result<(), SimError> {
//! let mut builder = TopologyBuilder::new();
//! builder.add_node(0, Protocol::new(ProtocolKind::Bgp, 0))?;
//! builder.add_node(1, Protocol::new(ProtocolKind::Bgp, 0))?;
//! builder.link(1, 0, Extender::Customer)?;
//! let mut topology = builder.build();
//!
//! let mut sim = Simulator::default();
//! let terminated = sim.simulate(&mut topology, &[Advertisement::new(0)], Time::MAX)?;
//! assert!(terminated);
//! assert_eq!(
//!     topology.get(1).unwrap().selected_route(),
//!     &Route::new(CUSTOMER_LOCAL_PREF, [0])
//! );
//! # Ok(())
//! # }
//! ```

use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    bgp::Route,
    event::{DelayGenerator, Event, NoDelayGenerator, Scheduler},
    notifications::{
        EndNotification, MessageReceivedNotification, Notifier, StartNotification,
        ThresholdReachedNotification,
    },
    topology::Topology,
    types::{ConfigError, NodeId, SimError, Time},
};

/// A node starting to originate a route at a given time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advertisement {
    /// The originating node
    pub advertiser: NodeId,
    /// The originated route
    pub route: Route,
    /// Time of the advertisement
    pub time: Time,
}

impl Advertisement {
    /// Advertise the self route at time 0.
    pub fn new(advertiser: NodeId) -> Self {
        Self {
            advertiser,
            route: Route::SelfRoute,
            time: 0,
        }
    }

    /// Change the advertised route.
    pub fn with_route(self, route: Route) -> Self {
        Self { route, ..self }
    }

    /// Change the time of the advertisement.
    pub fn at(self, time: Time) -> Self {
        Self { time, ..self }
    }
}

/// Driver of a simulation.
#[derive(Debug)]
pub struct Simulator {
    pub(crate) scheduler: Scheduler,
    pub(crate) delays: Box<dyn DelayGenerator>,
    pub(crate) notifier: Notifier,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(NoDelayGenerator)
    }
}

impl Simulator {
    /// Create a simulator whose connections use `delays`.
    pub fn new(delays: impl DelayGenerator + 'static) -> Self {
        Self::with_delays(Box::new(delays))
    }

    /// Create a simulator from a boxed delay generator.
    pub fn with_delays(delays: Box<dyn DelayGenerator>) -> Self {
        Self {
            scheduler: Scheduler::new(),
            delays,
            notifier: Notifier::default(),
        }
    }

    /// Current simulation time
    pub fn time(&self) -> Time {
        self.scheduler.time()
    }

    /// Get a reference to the scheduler
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Get a mutable reference to the scheduler
    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    /// Get a reference to the delay generator
    pub fn delays(&self) -> &dyn DelayGenerator {
        self.delays.as_ref()
    }

    /// Get a mutable reference to the delay generator
    pub fn delays_mut(&mut self) -> &mut dyn DelayGenerator {
        self.delays.as_mut()
    }

    /// Get a reference to the notifier
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Get a mutable reference to the notifier, e.g., to subscribe listeners.
    pub fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }

    /// Run a simulation on `topology`, starting with `advertisements`. The scheduler is reset
    /// before the run. The simulation stops once no events are left, or when an event at or after
    /// `threshold` is taken from the queue. Returns `true` if the simulation finished before the
    /// threshold.
    pub fn simulate(
        &mut self,
        topology: &mut Topology,
        advertisements: &[Advertisement],
        threshold: Time,
    ) -> Result<bool, SimError> {
        if advertisements.is_empty() {
            return Err(ConfigError::NoAdvertisements.into());
        }

        self.scheduler.reset();
        for ad in advertisements {
            if !topology.contains(ad.advertiser) {
                return Err(ConfigError::NodeNotFound(ad.advertiser).into());
            }
            self.scheduler.schedule(
                Event::Advertise {
                    node: ad.advertiser,
                    route: ad.route.clone(),
                },
                ad.time,
            )?;
        }

        let seed = self.delays.seed();
        self.notifier.start.publish_with(|| StartNotification {
            time: 0,
            seed,
            nodes: topology.node_ids(),
        });

        let mut terminated = true;
        while self.scheduler.has_events() {
            let event = self.scheduler.next_event()?;
            let time = self.scheduler.time();
            if time >= threshold {
                debug!("Simulation reached the threshold at time {}", time);
                self.notifier
                    .threshold_reached
                    .publish(&ThresholdReachedNotification { time, threshold });
                terminated = false;
                break;
            }
            self.process_event(topology, event)?;
        }

        let time = self.scheduler.time();
        self.notifier.end.publish_with(|| EndNotification {
            time,
            selected: topology.selected_routes(),
        });

        Ok(terminated)
    }

    /// Process the next event only. Returns the processed event, or `None` if the queue is empty.
    /// No threshold is checked.
    pub fn simulate_step(&mut self, topology: &mut Topology) -> Result<Option<Event>, SimError> {
        if !self.scheduler.has_events() {
            return Ok(None);
        }
        let event = self.scheduler.next_event()?;
        self.process_event(topology, event.clone())?;
        Ok(Some(event))
    }

    fn process_event(&mut self, topology: &mut Topology, event: Event) -> Result<(), SimError> {
        trace!("t={}: {:?}", self.scheduler.time(), event);
        let id = event.node();
        let node = topology
            .get_mut(id)
            .ok_or(ConfigError::NodeNotFound(id))?;
        match event {
            Event::Advertise { route, .. } => node.advertise(route, self),
            Event::Message(message) => {
                let time = self.scheduler.time();
                self.notifier
                    .message_received
                    .publish_with(|| MessageReceivedNotification {
                        time,
                        message: message.clone(),
                    });
                node.receive(message, self)
            }
            Event::TimerExpired { generation, .. } => node.on_timer_expired(generation, self),
        }
    }
}
