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

//! Entity identifiers and location metadata.
//!
//! Entities and components share one opaque, monotonically increasing
//! namespace: a component is just an entity the registry also knows a byte
//! size for. `0` is reserved as the sparse-dense map's "absent" sentinel and
//! is never handed out by [`crate::registry::Registry::entity`].

use crate::map::MapKey;
use crate::utils::mix_u64;

/// Opaque entity identifier, monotonically assigned from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EntityId(pub(crate) u64);

impl EntityId {
    /// The reserved sentinel value meaning "absent" inside [`crate::map::Map`].
    pub const NONE: EntityId = EntityId(0);

    pub(crate) fn new(raw: u64) -> Self {
        EntityId(raw)
    }

    /// Raw integer value, exposed for diagnostics and hashing elsewhere.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl MapKey for EntityId {
    fn map_hash(&self) -> u32 {
        mix_u64(self.0)
    }
}

/// Component identifier. Same namespace as [`EntityId`].
pub type ComponentId = EntityId;

/// An entity's location: which archetype it lives in, and which row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Record {
    pub archetype: ArchetypeId,
    pub row: u32,
}

/// Index into the registry's archetype slab.
pub type ArchetypeId = u32;
