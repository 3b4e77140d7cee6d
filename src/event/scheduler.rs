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

//! Module containing the time-ordered event queue.

use std::{
    cmp::Reverse,
    hash::{Hash, Hasher},
};

use priority_queue::PriorityQueue;

use super::Event;
use crate::types::{SchedulerError, Time};

/// Event together with its insertion sequence number. The sequence number alone identifies the
/// entry, so equal events scheduled twice are both kept.
#[derive(Debug, Clone)]
struct Scheduled {
    seq: u64,
    event: Event,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for Scheduled {}

impl Hash for Scheduled {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.seq.hash(state);
    }
}

/// Priority queue of events, ordered by their timestamp. Events with equal timestamps are returned
/// in the order they were scheduled. The current time only advances when an event is taken from
/// the queue.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    queue: PriorityQueue<Scheduled, Reverse<(Time, u64)>>,
    time: Time,
    seq: u64,
}

impl Scheduler {
    /// Create a new, empty scheduler at time 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulation time.
    pub fn time(&self) -> Time {
        self.time
    }

    /// Schedule `event` at the absolute time `timestamp`.
    pub fn schedule(&mut self, event: Event, timestamp: Time) -> Result<(), SchedulerError> {
        if timestamp < self.time {
            return Err(SchedulerError::InvalidTimestamp {
                timestamp,
                time: self.time,
            });
        }
        self.queue.push(
            Scheduled {
                seq: self.seq,
                event,
            },
            Reverse((timestamp, self.seq)),
        );
        self.seq += 1;
        Ok(())
    }

    /// Schedule `event` `interval` time units after the current time.
    pub fn schedule_from_now(
        &mut self,
        event: Event,
        interval: Time,
    ) -> Result<(), SchedulerError> {
        self.schedule(event, self.time.saturating_add(interval))
    }

    /// Take the earliest event from the queue and advance the time to its timestamp.
    pub fn next_event(&mut self) -> Result<Event, SchedulerError> {
        let (scheduled, Reverse((time, _))) = self.queue.pop().ok_or(SchedulerError::EmptyQueue)?;
        self.time = time;
        Ok(scheduled.event)
    }

    /// Timestamp of the earliest event, without removing it.
    pub fn peek_time(&self) -> Option<Time> {
        self.queue.peek().map(|(_, Reverse((time, _)))| *time)
    }

    /// Returns `true` if there are events left.
    pub fn has_events(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Number of events in the queue.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if no event is scheduled.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop all events and set the time back to 0.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.time = 0;
        self.seq = 0;
    }
}
