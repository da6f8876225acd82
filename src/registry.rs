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

//! `Registry`: owns the four global indices and the root archetype, and
//! exposes the public ECS surface (`entity`, `component`, `system`,
//! `attach`, `set`, `step`).
//!
//! Archetypes live in a registry-owned `Vec<Archetype>` slab addressed by
//! [`ArchetypeId`] index rather than heap nodes linked by raw pointers,
//! which keeps the graph memory-safe without unsafe lifetime bookkeeping.
//! The system index is a plain append-only `Vec` (systems are never
//! removed), which already gives "dense array in insertion order" for
//! free, so it is kept as a `Vec<SystemEntry>` rather than routed through
//! [`Map`].

use tracing::warn;

use crate::archetype::{self, Archetype};
use crate::dispatcher;
use crate::entity::{ArchetypeId, ComponentId, EntityId, Record};
use crate::error::{EcsError, Lookup, Result};
use crate::graph;
use crate::map::Map;
use crate::signature::Signature;
use crate::system::{SystemEntry, SystemId, View};
use crate::ty::Type;

/// The root archetype (empty type) always lives at slab index 0.
const ROOT: ArchetypeId = 0;

/// Owns every archetype, the four global indices, and the entity id
/// allocator. Not `Send`/`Sync` by convention: all ECS operations require
/// exclusive access and this crate never internally synchronizes.
pub struct Registry {
    next_id: u64,
    entities: Map<EntityId, Record>,
    component_sizes: Map<ComponentId, u32>,
    type_index: Map<Type, ArchetypeId>,
    slab: Vec<Archetype>,
    systems: Vec<SystemEntry>,
}

impl Registry {
    /// A fresh registry with just the root archetype.
    pub fn new() -> Self {
        let component_sizes: Map<ComponentId, u32> = Map::new();
        let root_ty = Type::new();
        let mut type_index = Map::new();
        type_index.set(root_ty.clone(), ROOT);
        let slab = vec![Archetype::new(root_ty, &component_sizes)];

        Registry {
            next_id: 1,
            entities: Map::new(),
            component_sizes,
            type_index,
            slab,
            systems: Vec::new(),
        }
    }

    /// Explicit teardown. Consumes `self`; ordinary `Drop` (when the value
    /// is simply let go out of scope) tears everything down identically.
    pub fn destroy(self) {}

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Allocate a new entity id, add it to the root archetype, record it.
    pub fn entity(&mut self) -> EntityId {
        let id = EntityId::new(self.next_id());
        let row = self.slab[ROOT as usize].add(id);
        self.entities.set(
            id,
            Record {
                archetype: ROOT,
                row,
            },
        );
        id
    }

    /// A component is itself an entity (same id namespace, added to root),
    /// with a registered byte size.
    pub fn component(&mut self, size: u32) -> ComponentId {
        let id = self.entity();
        self.component_sizes.set(id, size);
        id
    }

    /// Project the signature to its type, find-or-create the starting
    /// archetype, and record the descriptor.
    pub fn system(
        &mut self,
        signature: Signature,
        callback: impl FnMut(&View, u32) + 'static,
    ) -> SystemId {
        let ty = signature.as_type();
        let archetype = match self.type_index.get(&ty) {
            Some(&id) => id,
            None => graph::traverse_and_create(
                &mut self.slab,
                &mut self.type_index,
                &self.component_sizes,
                ROOT,
                &ty,
            ),
        };

        let id = SystemId(self.systems.len() as u32);
        self.systems.push(SystemEntry {
            archetype,
            signature,
            callback: Box::new(callback),
        });
        id
    }

    /// Move `entity` from its current archetype to the one for
    /// `current type ∪ {component}`, creating that archetype if it doesn't
    /// exist yet.
    pub fn attach(&mut self, entity: EntityId, component: ComponentId) -> Result<()> {
        let record = *self
            .entities
            .get(&entity)
            .ok_or_else(|| {
                warn!(entity = entity.raw(), "attach to unknown entity");
                EcsError::FailedLookup(Lookup::Entity(entity))
            })?;

        let mut target_ty = self.slab[record.archetype as usize].ty().clone();
        target_ty.add(component);

        let target_archetype = match self.type_index.get(&target_ty) {
            Some(&id) => id,
            None => graph::insert_vertex(
                &mut self.slab,
                &mut self.type_index,
                &self.component_sizes,
                ROOT,
                record.archetype,
                target_ty,
                component,
            ),
        };

        let new_row = move_row(
            &mut self.slab,
            &mut self.entities,
            record.archetype,
            target_archetype,
            record.row,
        );
        self.entities.set(
            entity,
            Record {
                archetype: target_archetype,
                row: new_row,
            },
        );
        Ok(())
    }

    /// Write raw component bytes into an entity's column slot.
    pub fn set(&mut self, entity: EntityId, component: ComponentId, data: &[u8]) -> Result<()> {
        let record = *self
            .entities
            .get(&entity)
            .ok_or(EcsError::FailedLookup(Lookup::Entity(entity)))?;

        if !self.component_sizes.contains_key(&component) {
            return Err(EcsError::FailedLookup(Lookup::Component(component)));
        }

        let arch = &mut self.slab[record.archetype as usize];
        let column = arch.ty().index_of(component).ok_or_else(|| {
            EcsError::FailedLookup(Lookup::ComponentOnEntity { entity, component })
        })?;

        debug_assert_eq!(data.len() as u32, arch.column_elem_size(column));
        arch.set_component(column, record.row, data);
        Ok(())
    }

    /// Dispatch every registered system once.
    pub fn step(&mut self) {
        dispatcher::step(&mut self.slab, &mut self.systems);
    }

    pub fn entity_count(&self) -> u32 {
        self.entities.len()
    }

    pub fn archetype_count(&self) -> usize {
        self.slab.len()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Move the row at `left_row` in `slab[left]` over to `slab[right]`,
/// obtaining two disjoint `&mut Archetype` borrows from the shared slab.
/// `entities` is threaded through so the entity displaced by `left`'s
/// swap-remove (if any) gets its record rewritten to its new row.
fn move_row(
    slab: &mut [Archetype],
    entities: &mut Map<EntityId, Record>,
    left: ArchetypeId,
    right: ArchetypeId,
    left_row: u32,
) -> u32 {
    let (left_idx, right_idx) = (left as usize, right as usize);
    debug_assert_ne!(left_idx, right_idx);
    let (lo, hi) = if left_idx < right_idx {
        (left_idx, right_idx)
    } else {
        (right_idx, left_idx)
    };
    let (first, second) = slab.split_at_mut(hi);
    if left_idx < right_idx {
        archetype::move_entity_right(&mut first[lo], left, &mut second[0], left_row, entities)
    } else {
        archetype::move_entity_right(&mut second[0], left, &mut first[lo], left_row, entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s1_minimal_init_destroy() {
        let r = Registry::new();
        r.destroy();
    }

    #[test]
    fn s2_attach_set_round_trip() {
        let mut r = Registry::new();
        let c = r.component(4);
        let e = r.entity();
        r.attach(e, c).unwrap();
        r.set(e, c, &42i32.to_le_bytes()).unwrap();

        assert_eq!(r.slab[r.entities.get(&e).unwrap().archetype as usize].count(), 1);
        let record = *r.entities.get(&e).unwrap();
        let arch = &r.slab[record.archetype as usize];
        let col = arch.ty().index_of(c).unwrap();
        let bytes = arch.component_slot(col, record.row);
        assert_eq!(i32::from_le_bytes(bytes.try_into().unwrap()), 42);
    }

    #[test]
    fn attach_does_not_leave_a_stale_record_on_the_swapped_sibling() {
        // e1 and e2 both start at root; attaching `c` to e1 swap-removes it
        // out of root, which displaces e2 (the last row) into e1's old row.
        // e2's record must follow it there.
        let mut r = Registry::new();
        let c = r.component(4);
        let e1 = r.entity();
        let e2 = r.entity();
        r.attach(e1, c).unwrap();

        let e2_record = *r.entities.get(&e2).unwrap();
        let root_arch = &r.slab[e2_record.archetype as usize];
        assert_eq!(root_arch.entity_at(e2_record.row), e2);

        // e2 is still fully usable: attaching a second component to it must
        // not panic or silently mutate the wrong row.
        r.attach(e2, c).unwrap();
        r.set(e2, c, &7i32.to_le_bytes()).unwrap();
        let e2_record = *r.entities.get(&e2).unwrap();
        let arch = &r.slab[e2_record.archetype as usize];
        let col = arch.ty().index_of(c).unwrap();
        let bytes = arch.component_slot(col, e2_record.row);
        assert_eq!(i32::from_le_bytes(bytes.try_into().unwrap()), 7);
    }

    #[test]
    fn attach_unknown_entity_is_an_error() {
        let mut r = Registry::new();
        let c = r.component(4);
        let bogus = EntityId::new(999);
        assert!(r.attach(bogus, c).is_err());
    }

    #[test]
    fn set_unknown_component_is_an_error() {
        let mut r = Registry::new();
        let e = r.entity();
        let bogus = EntityId::new(999);
        assert!(r.set(e, bogus, &[0, 0, 0, 0]).is_err());
    }

    #[test]
    fn set_component_not_on_entity_is_an_error() {
        let mut r = Registry::new();
        let c1 = r.component(4);
        let c2 = r.component(4);
        let e = r.entity();
        r.attach(e, c1).unwrap();
        assert!(r.set(e, c2, &[0, 0, 0, 0]).is_err());
    }

    #[test]
    fn s3_system_observes_value_via_view() {
        let mut r = Registry::new();
        let c = r.component(4);
        let e = r.entity();
        r.attach(e, c).unwrap();
        r.set(e, c, &42i32.to_le_bytes()).unwrap();

        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        r.system(Signature::new(vec![c]), move |view, row| unsafe {
            let ptr = view.component_ptr(row, 0) as *const i32;
            seen_clone.borrow_mut().push(*ptr);
        });

        r.step();
        assert_eq!(*seen.borrow(), vec![42]);
    }

    #[test]
    fn s4_move_system_accumulates_over_steps() {
        let mut r = Registry::new();
        let pos = r.component(4);
        let vel = r.component(4);
        let e = r.entity();
        r.attach(e, pos).unwrap();
        r.attach(e, vel).unwrap();
        r.set(e, pos, &0i32.to_le_bytes()).unwrap();
        r.set(e, vel, &1i32.to_le_bytes()).unwrap();

        r.system(Signature::new(vec![pos, vel]), |view, row| unsafe {
            let p = view.component_ptr(row, 0) as *mut i32;
            let v = view.component_ptr(row, 1) as *const i32;
            *p += *v;
        });

        for _ in 0..15 {
            r.step();
        }

        let record = *r.entities.get(&e).unwrap();
        let arch = &r.slab[record.archetype as usize];
        let col = arch.ty().index_of(pos).unwrap();
        let bytes = arch.component_slot(col, record.row);
        assert_eq!(i32::from_le_bytes(bytes.try_into().unwrap()), 15);
    }
}
