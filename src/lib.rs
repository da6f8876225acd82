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

//! Archetype ECS core.
//!
//! An entity-component-system runtime organized around an archetype graph:
//! entities are opaque ids, components are raw byte payloads, and every
//! distinct set of components an entity carries -- its *archetype* -- is one
//! node in a directed graph whose edges are labeled by single component
//! additions. Entities sharing an archetype are stored together in a
//! column-major table, one contiguous array per component, for
//! cache-friendly sequential iteration.
//!
//! The pieces this crate implements, in dependency order: [`map`] (the
//! generic sparse-dense hash map backing every index), [`ty`] (the sorted
//! component-id set identifying an archetype), [`signature`] (a system's
//! declared, ordered component tuple), [`edge`] (labeled archetype
//! neighbours), [`archetype`] (the column-major storage table), [`graph`]
//! (construction and traversal of the archetype graph), and [`dispatcher`]
//! (walking the add-edge subgraph to run systems). [`registry::Registry`]
//! owns all of the above and exposes the public API.
//!
//! Out of scope, matching the upstream design this crate reimplements:
//! component removal/detach, generational entity ids, multi-threaded
//! scheduling, serialization, and a query language beyond "every archetype
//! whose type is a superset of a signature".

pub mod archetype;
pub mod config;
pub mod dispatcher;
pub mod edge;
pub mod entity;
pub mod error;
pub mod graph;
pub mod map;
pub mod registry;
pub mod signature;
pub mod system;
pub mod ty;
pub mod utils;

pub use entity::{ArchetypeId, ComponentId, EntityId, Record};
pub use error::{EcsError, Result};
pub use registry::Registry;
pub use signature::Signature;
pub use system::{view, SystemId, View};
