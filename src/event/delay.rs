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

//! Message delay models.

use rand::prelude::*;

use crate::types::{ConfigError, Time};

/// Source of per-message transit delays.
pub trait DelayGenerator: std::fmt::Debug {
    /// Delay of the next message.
    fn next_delay(&mut self) -> Time;

    /// Seed the generator was (re)started with.
    fn seed(&self) -> u64;

    /// Restart the sequence of delays from the current seed.
    fn reset(&mut self);

    /// Draw a new seed and restart from it.
    fn generate_new_seed(&mut self);
}

/// Every message is delivered without additional delay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoDelayGenerator;

impl DelayGenerator for NoDelayGenerator {
    fn next_delay(&mut self) -> Time {
        0
    }

    fn seed(&self) -> u64 {
        0
    }

    fn reset(&mut self) {}

    fn generate_new_seed(&mut self) {}
}

/// Uniformly distributed delays in `min..=max`, drawn from a seeded RNG.
#[derive(Debug, Clone)]
pub struct RandomDelayGenerator {
    min: Time,
    max: Time,
    seed: u64,
    rng: StdRng,
}

impl RandomDelayGenerator {
    /// Create a generator with a fixed seed.
    pub fn with(min: Time, max: Time, seed: u64) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvalidDelayRange { min, max });
        }
        Ok(Self {
            min,
            max,
            seed,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Create a generator seeded from the thread-local RNG.
    pub fn new(min: Time, max: Time) -> Result<Self, ConfigError> {
        Self::with(min, max, thread_rng().gen())
    }

    /// Lower bound of the delays.
    pub fn min(&self) -> Time {
        self.min
    }

    /// Upper bound of the delays.
    pub fn max(&self) -> Time {
        self.max
    }
}

impl DelayGenerator for RandomDelayGenerator {
    fn next_delay(&mut self) -> Time {
        self.rng.gen_range(self.min..=self.max)
    }

    fn seed(&self) -> u64 {
        self.seed
    }

    fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }

    fn generate_new_seed(&mut self) {
        self.seed = self.rng.gen();
        self.reset();
    }
}
