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

//! Module containing the FIFO message transport of a link.

use crate::{
    event::{Event, Message},
    notifications::MessageSentNotification,
    simulator::Simulator,
    types::{SimError, Time},
};

/// One direction of a link. Messages sent over the same connection are delivered in the order they
/// were sent, and never at the same time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Connection {
    last_deliver_time: Time,
}

impl Connection {
    /// Create a new connection without any message in flight.
    pub fn new() -> Self {
        Self::default()
    }

    /// Time at which the last message sent over this connection is delivered.
    pub fn last_deliver_time(&self) -> Time {
        self.last_deliver_time
    }

    /// Send `message`, scheduling its delivery after a delay drawn from the simulator's delay
    /// generator. Returns the time at which the message is delivered.
    pub fn send(&mut self, message: Message, sim: &mut Simulator) -> Result<Time, SimError> {
        let time = sim.scheduler.time();
        let delay = sim.delays.next_delay();
        let deliver_time = time
            .saturating_add(delay)
            .max(self.last_deliver_time)
            .saturating_add(1);

        sim.notifier
            .message_sent
            .publish_with(|| MessageSentNotification {
                time,
                deliver_time,
                message: message.clone(),
            });
        sim.scheduler
            .schedule(Event::Message(message), deliver_time)?;
        self.last_deliver_time = deliver_time;

        Ok(deliver_time)
    }

    /// Forget the last delivery time. Must only be called when no message is in flight.
    pub fn reset(&mut self) {
        self.last_deliver_time = 0;
    }
}
