// Copyright 2024 Saptak Santra
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types.
//!
//! A small, closed taxonomy, all treated as unrecoverable: `EcsError` has
//! exactly five variants; `FailedLookup` carries a [`Lookup`] describing
//! which id was missing, so the diagnostic includes the offending id.
//! Nothing in this crate retries, degrades, or substitutes a default on
//! error -- callers either propagate with `?` or treat the `Err` as fatal.

use std::fmt;

use crate::entity::{ArchetypeId, ComponentId, EntityId};
use crate::system::SystemId;

/// What kind of lookup failed. Carried by [`EcsError::FailedLookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Entity(EntityId),
    Component(ComponentId),
    System(SystemId),
    Archetype(ArchetypeId),
    ComponentOnEntity {
        entity: EntityId,
        component: ComponentId,
    },
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Entity(e) => write!(f, "entity {}", e.raw()),
            Lookup::Component(c) => write!(f, "component {}", c.raw()),
            Lookup::System(s) => write!(f, "system {}", s.0),
            Lookup::Archetype(a) => write!(f, "archetype {a}"),
            Lookup::ComponentOnEntity { entity, component } => write!(
                f,
                "component {} on entity {}",
                component.raw(),
                entity.raw()
            ),
        }
    }
}

/// The closed error taxonomy this crate ever produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// Any allocator failure. The crate never triggers this itself (Rust's
    /// global allocator aborts on OOM), but the variant is kept so hosts
    /// embedding a custom allocator have somewhere to report it.
    OutOfMemory,

    /// A row or column index violated an archetype invariant.
    OutOfBounds { index: u32, bound: u32 },

    /// A map returned "absent" where an invariant required presence.
    FailedLookup(Lookup),

    /// A [`crate::map::Map`] probe chain exceeded the debug-mode bound.
    HashCollisionLimit,

    /// A graph or type-shape invariant that should never be violated was.
    InvariantViolation(String),
}

impl fmt::Display for EcsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcsError::OutOfMemory => write!(f, "out of memory"),
            EcsError::OutOfBounds { index, bound } => {
                write!(f, "index {index} out of bounds (capacity {bound})")
            }
            EcsError::FailedLookup(lookup) => write!(f, "failed lookup: {lookup}"),
            EcsError::HashCollisionLimit => write!(f, "too many hash collisions"),
            EcsError::InvariantViolation(msg) => write!(f, "invariant violation: {msg}"),
        }
    }
}

impl std::error::Error for EcsError {}

/// Result alias used throughout the public API.
pub type Result<T> = std::result::Result<T, EcsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_display_includes_offending_id() {
        let err = EcsError::FailedLookup(Lookup::Entity(EntityId::new(42)));
        assert!(err.to_string().contains("42"));
    }
}
