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

//! Module containing all type definitions

use thiserror::Error;

mod path;

pub use path::{Path, PathHop, Relation};

/// Identifier of a node (autonomous system) in the topology.
pub type NodeId = u32;

/// Simulation time. It has no relation to wall-clock time.
pub type Time = u64;

/// Local preference of a route. Higher values are preferred.
pub type LocalPref = i32;

/// Configuration Error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A node with the same id was already added.
    #[error("Node {0} already exists in the topology!")]
    NodeExists(NodeId),
    /// The node is not part of the topology.
    #[error("Node {0} was not found in the topology!")]
    NodeNotFound(NodeId),
    /// A link between the same two nodes (in the same direction) was already added.
    #[error("Link from {0} to {1} already exists!")]
    LinkExists(NodeId, NodeId),
    /// A simulation was started without a single advertisement.
    #[error("At least one advertisement is required to run a simulation!")]
    NoAdvertisements,
    /// The protocol label is not known.
    #[error("Unknown protocol label: {0}")]
    UnknownProtocol(String),
    /// The extender label is not known.
    #[error("Unknown extender label: {0}")]
    UnknownExtender(String),
    /// The cost (local-preference) label is not known.
    #[error("Unknown cost label: {0}")]
    UnknownCostLabel(String),
    /// The delay bounds do not describe a valid range.
    #[error("Invalid delay range: min = {min}, max = {max}")]
    InvalidDelayRange {
        /// lower bound
        min: Time,
        /// upper bound
        max: Time,
    },
}

/// Errors raised by the scheduler.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerError {
    /// The event would be scheduled in the past.
    #[error("Cannot schedule an event at time {timestamp}, current time is {time}")]
    InvalidTimestamp {
        /// requested timestamp
        timestamp: Time,
        /// current scheduler time
        time: Time,
    },
    /// No events are left in the queue.
    #[error("The event queue is empty")]
    EmptyQueue,
}

/// Simulation Errors
#[derive(Error, Debug)]
pub enum SimError {
    /// Configuration error
    #[error("Configuration Error: {0}")]
    ConfigError(#[from] ConfigError),
    /// Scheduler error
    #[error("Scheduler Error: {0}")]
    SchedulerError(#[from] SchedulerError),
    /// The leak classification produced an index without a matching leak kind.
    #[error("Unknown leak-kind index: {0}")]
    UnknownLeakKind(usize),
    /// IO error while reading a scenario
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    /// Json error
    #[error("{0}")]
    JsonError(Box<serde_json::Error>),
}

impl From<serde_json::Error> for SimError {
    fn from(value: serde_json::Error) -> Self {
        Self::JsonError(Box::new(value))
    }
}

impl PartialEq for SimError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::ConfigError(l0), Self::ConfigError(r0)) => l0 == r0,
            (Self::SchedulerError(l0), Self::SchedulerError(r0)) => l0 == r0,
            (Self::UnknownLeakKind(l0), Self::UnknownLeakKind(r0)) => l0 == r0,
            (Self::IoError(l), Self::IoError(r)) => l.kind() == r.kind(),
            (Self::JsonError(l), Self::JsonError(r)) => l.to_string() == r.to_string(),
            _ => false,
        }
    }
}
