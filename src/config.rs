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

//! Tunable constants.
//!
//! Nothing here varies at runtime -- there is no scenario where a caller
//! needs to override the initial capacities or the growth load factor, so
//! they stay `pub const` rather than fields on a builder struct.

/// Initial row capacity for a freshly created [`crate::archetype::Archetype`].
pub const INITIAL_ARCHETYPE_CAPACITY: u32 = 16;

/// Initial slot count for a freshly created [`crate::map::Map`].
pub const INITIAL_MAP_CAPACITY: u32 = 16;

/// [`crate::map::Map`] grows once `count >= load_capacity * this`.
pub const MAP_GROWTH_LOAD_FACTOR: f32 = 0.5;

/// In debug builds, a probe chain this long panics as a hash-collision
/// limit rather than looping further.
pub const HASH_COLLISION_DEBUG_LIMIT: u32 = 30;
