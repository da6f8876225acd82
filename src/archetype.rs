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

//! `Archetype`: a column-major entity×component table plus its left/right
//! edge lists.
//!
//! Columns are raw byte buffers -- this crate is generic over component
//! *shape*, not over a fixed set of Rust types, so each column only knows an
//! element size handed to it by the registry's component-size index at
//! archetype-creation time. Reading/writing a column is consequently an
//! `unsafe` pointer operation at the lowest level; [`crate::registry::Registry::set`]
//! and the [`crate::system::View`] passed to dispatched systems are the only
//! callers.

use tracing::debug;

use crate::config::INITIAL_ARCHETYPE_CAPACITY;
use crate::edge::EdgeList;
use crate::entity::{ArchetypeId, ComponentId, EntityId, Record};
use crate::map::Map;
use crate::ty::Type;

struct Column {
    data: Vec<u8>,
    elem_size: u32,
}

impl Column {
    fn new(elem_size: u32, capacity: u32) -> Self {
        Column {
            data: vec![0u8; (elem_size as usize) * (capacity as usize)],
            elem_size,
        }
    }

    fn grow(&mut self, new_capacity: u32) {
        self.data
            .resize((self.elem_size as usize) * (new_capacity as usize), 0);
    }

    fn byte_offset(&self, row: u32) -> usize {
        (row as usize) * (self.elem_size as usize)
    }

    fn slot(&self, row: u32) -> &[u8] {
        let start = self.byte_offset(row);
        &self.data[start..start + self.elem_size as usize]
    }

    fn slot_mut(&mut self, row: u32) -> &mut [u8] {
        let start = self.byte_offset(row);
        let size = self.elem_size as usize;
        &mut self.data[start..start + size]
    }

    /// Copy `src`'s bytes over `dst`'s, within this same column.
    fn copy_row(&mut self, src: u32, dst: u32) {
        if src == dst {
            return;
        }
        let size = self.elem_size as usize;
        let (src_off, dst_off) = (self.byte_offset(src), self.byte_offset(dst));
        let (a, b) = if src_off < dst_off {
            let (left, right) = self.data.split_at_mut(dst_off);
            (&left[src_off..src_off + size], &mut right[..size])
        } else {
            let (left, right) = self.data.split_at_mut(src_off);
            (&right[..size], &mut left[dst_off..dst_off + size])
        };
        b.copy_from_slice(a);
    }
}

/// A graph vertex: every entity sharing the same [`Type`] lives in one
/// `Archetype`, stored column-major.
pub struct Archetype {
    ty: Type,
    entity_ids: Vec<EntityId>,
    columns: Vec<Column>,
    capacity: u32,
    count: u32,
    left_edges: EdgeList,
    right_edges: EdgeList,
}

impl Archetype {
    /// Allocate a fresh archetype for `ty`, sizing one column per component
    /// from `component_sizes`.
    pub fn new(ty: Type, component_sizes: &Map<ComponentId, u32>) -> Self {
        let capacity = INITIAL_ARCHETYPE_CAPACITY;
        let columns = ty
            .iter()
            .map(|c| {
                let size = *component_sizes
                    .get(&c)
                    .expect("archetype created for a component with no registered size");
                Column::new(size, capacity)
            })
            .collect();
        debug!(len = ty.len(), "archetype created");
        Archetype {
            ty,
            entity_ids: Vec::with_capacity(capacity as usize),
            columns,
            capacity,
            count: 0,
            left_edges: EdgeList::new(),
            right_edges: EdgeList::new(),
        }
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn entity_at(&self, row: u32) -> EntityId {
        self.entity_ids[row as usize]
    }

    pub fn left_edges(&self) -> &EdgeList {
        &self.left_edges
    }

    pub fn left_edges_mut(&mut self) -> &mut EdgeList {
        &mut self.left_edges
    }

    pub fn right_edges(&self) -> &EdgeList {
        &self.right_edges
    }

    pub fn right_edges_mut(&mut self) -> &mut EdgeList {
        &mut self.right_edges
    }

    pub fn column_elem_size(&self, column: usize) -> u32 {
        self.columns[column].elem_size
    }

    fn grow(&mut self) {
        let new_capacity = self.capacity * 2;
        debug!(
            old = self.capacity,
            new = new_capacity,
            "archetype growing"
        );
        for col in &mut self.columns {
            col.grow(new_capacity);
        }
        self.capacity = new_capacity;
    }

    /// Append `entity` at the next free row, growing storage ×2 if full.
    /// Returns the row. Does **not** touch the entity index -- the registry
    /// is the single place that writes `(archetype, row)`.
    pub fn add(&mut self, entity: EntityId) -> u32 {
        if self.count == self.capacity {
            self.grow();
        }
        let row = self.count;
        if (row as usize) == self.entity_ids.len() {
            self.entity_ids.push(entity);
        } else {
            self.entity_ids[row as usize] = entity;
        }
        self.count += 1;
        row
    }

    /// Write raw bytes into a single component slot.
    pub fn set_component(&mut self, column: usize, row: u32, data: &[u8]) {
        self.columns[column].slot_mut(row).copy_from_slice(data);
    }

    pub fn component_slot(&self, column: usize, row: u32) -> &[u8] {
        self.columns[column].slot(row)
    }

    /// Base pointers for every column, in archetype-type order, for building
    /// a [`crate::system::View`]. `# Safety`: callers must not outlive the
    /// next structural mutation of this archetype (growth reallocates).
    pub fn column_ptrs_mut(&mut self) -> Vec<*mut u8> {
        self.columns.iter_mut().map(|c| c.data.as_mut_ptr()).collect()
    }

    pub fn column_elem_sizes(&self) -> Vec<u32> {
        self.columns.iter().map(|c| c.elem_size).collect()
    }
}

/// The edge-walk core of `attach`.
///
/// Preconditions: `right.ty() == left.ty() ∪ {c}` for the edge's labeled
/// component `c`. Moves the entity at `left_row` out of `left` (via
/// swap-remove) and into a fresh row of `right`, copying every shared
/// column's bytes across. The new column on `right` (the one holding `c`)
/// is left uninitialized: callers must `set` it before any `view` read
/// observes it.
///
/// The swap-remove relocates whichever entity previously sat at `left`'s
/// last row into `left_row`; `left_id` and `entities` let this function
/// rewrite that displaced entity's record in place, so every entity in
/// `entities` keeps pointing at its real row.
///
/// Returns the destination row in `right`.
pub fn move_entity_right(
    left: &mut Archetype,
    left_id: ArchetypeId,
    right: &mut Archetype,
    left_row: u32,
    entities: &mut Map<EntityId, Record>,
) -> u32 {
    debug_assert!(Type::is_superset(right.ty(), left.ty()));

    let removed = left.entity_ids[left_row as usize];
    let last_row = left.count - 1;
    left.entity_ids.swap(left_row as usize, last_row as usize);

    if left_row != last_row {
        let displaced = left.entity_ids[left_row as usize];
        entities.set(
            displaced,
            Record {
                archetype: left_id,
                row: left_row,
            },
        );
    }

    let right_row = right.add(removed);

    for (i, component) in left.ty.iter().enumerate() {
        let j = right
            .ty
            .index_of(component)
            .expect("right.ty must be a superset of left.ty");

        let bytes = left.columns[i].slot(left_row).to_vec();
        right.columns[j].slot_mut(right_row).copy_from_slice(&bytes);
        left.columns[i].copy_row(last_row, left_row);
    }

    left.count -= 1;
    right_row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityId;

    fn sizes(pairs: &[(u64, u32)]) -> Map<ComponentId, u32> {
        let mut m = Map::new();
        for &(id, size) in pairs {
            m.set(EntityId::new(id), size);
        }
        m
    }

    #[test]
    fn add_grows_geometrically_past_initial_capacity() {
        let ty = Type::new();
        let sizes_map = sizes(&[]);
        let mut arch = Archetype::new(ty, &sizes_map);
        assert_eq!(arch.capacity(), INITIAL_ARCHETYPE_CAPACITY);
        for i in 0..40u64 {
            arch.add(EntityId::new(i + 1));
        }
        assert_eq!(arch.count(), 40);
        assert!(arch.capacity() >= 40);
        assert_eq!(arch.capacity() % INITIAL_ARCHETYPE_CAPACITY, 0);
    }

    #[test]
    fn move_entity_right_preserves_shared_columns_and_swap_removes_source() {
        let comp_a = EntityId::new(100);
        let comp_b = EntityId::new(200);
        let sizes_map = sizes(&[(100, 4), (200, 4)]);

        let mut left_ty = Type::new();
        left_ty.add(comp_a);
        let mut right_ty = left_ty.clone();
        right_ty.add(comp_b);

        let left_id: ArchetypeId = 0;
        let mut left = Archetype::new(left_ty, &sizes_map);
        let mut right = Archetype::new(right_ty, &sizes_map);

        let e1 = EntityId::new(1);
        let e2 = EntityId::new(2);
        let row1 = left.add(e1);
        let row2 = left.add(e2);
        left.set_component(0, row1, &1i32.to_le_bytes());
        left.set_component(0, row2, &2i32.to_le_bytes());

        let mut entities: Map<EntityId, Record> = Map::new();
        entities.set(
            e1,
            Record {
                archetype: left_id,
                row: row1,
            },
        );
        entities.set(
            e2,
            Record {
                archetype: left_id,
                row: row2,
            },
        );

        let right_row = move_entity_right(&mut left, left_id, &mut right, row1, &mut entities);

        // e1 moved into `right` with its column-a data intact.
        assert_eq!(right.entity_at(right_row), e1);
        assert_eq!(right.component_slot(0, right_row), &1i32.to_le_bytes());

        // e2 swap-removed into row1's old slot inside `left`.
        assert_eq!(left.count(), 1);
        assert_eq!(left.entity_at(0), e2);
        assert_eq!(left.component_slot(0, 0), &2i32.to_le_bytes());

        // e2's record is rewritten to its new row, not left stale at row 1.
        assert_eq!(
            entities.get(&e2),
            Some(&Record {
                archetype: left_id,
                row: 0,
            })
        );
    }
}
