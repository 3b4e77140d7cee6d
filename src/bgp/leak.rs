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

//! Route leak classification based on the relation tags of a path.

use itertools::Itertools;

use super::LeakKind;
use crate::types::{Path, Relation, SimError};

/// Pairs of consecutive relations (earlier hop, later hop) that violate the valley-free property.
/// The position in this table is the index passed to [`LeakKind::from_index`].
pub const FORBIDDEN_RELATIONS: [(Relation, Relation); 4] = [
    (Relation::Provider, Relation::Peer),
    (Relation::Provider, Relation::Customer),
    (Relation::Peer, Relation::Peer),
    (Relation::Peer, Relation::Customer),
];

/// Scan the relation tags of `path` (from the origin onwards) and return the kind of the first
/// forbidden pair of consecutive relations. Pairs involving a sibling relation are never
/// classified.
pub fn classify_leak(path: &Path) -> Result<Option<LeakKind>, SimError> {
    for pair in path.relations().tuple_windows::<(_, _)>() {
        if let Some(idx) = FORBIDDEN_RELATIONS.iter().position(|f| *f == pair) {
            return LeakKind::from_index(idx).map(Some);
        }
    }
    Ok(None)
}
