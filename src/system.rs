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

//! System descriptors and the row-level `View` a callback reads/writes
//! through.
//!
//! A system callback is a boxed `FnMut(&View, u32)` rather than a bare
//! function pointer, so closures can capture state.

use crate::entity::ArchetypeId;
use crate::signature::Signature;

/// Opaque handle returned by [`crate::registry::Registry::system`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SystemId(pub(crate) u32);

impl SystemId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// What a dispatched system callback sees for one archetype: raw base
/// pointers into every column of that archetype (in the archetype's own
/// type order), an element size per column, and a map from the system's
/// declared signature position to the archetype's column index.
///
/// Mirrors `ecs_view_t` (`examples/original_source/ecs.h`): `component_arrays`
/// + `indices`. Deliberately **not** a borrow of the archetype -- raw
/// pointers let the dispatcher build it without holding a long-lived borrow
/// of the registry, matching the C source's unchecked-pointer design
/// (spec.md §9 "untyped storage").
pub struct View<'a> {
    pub(crate) base_ptrs: &'a [*mut u8],
    pub(crate) elem_sizes: &'a [u32],
    pub(crate) indices: &'a [usize],
}

impl<'a> View<'a> {
    /// Raw pointer to row `row`, column `column` (a position within the
    /// system's declared signature, *not* an archetype column index --
    /// spec.md §6 `view(v, row, col)`).
    ///
    /// # Safety
    /// `row` must be `< archetype.count()` at the time this view was built,
    /// and the pointer must not be read/written past the next structural
    /// mutation of that archetype.
    pub unsafe fn component_ptr(&self, row: u32, column: usize) -> *mut u8 {
        let col = self.indices[column];
        let size = self.elem_sizes[col];
        self.base_ptrs[col].add((row * size) as usize)
    }
}

/// Free-function form matching spec.md §6's `view(v, row, col)` entry.
///
/// # Safety
/// See [`View::component_ptr`].
pub unsafe fn view(v: &View, row: u32, column: usize) -> *mut u8 {
    v.component_ptr(row, column)
}

pub(crate) struct SystemEntry {
    pub(crate) archetype: ArchetypeId,
    pub(crate) signature: Signature,
    pub(crate) callback: Box<dyn FnMut(&View, u32)>,
}
