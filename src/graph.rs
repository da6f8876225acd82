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

//! Archetype graph construction and traversal.
//!
//! `Graph` has no storage of its own: it operates on the archetype slab and
//! type index owned by [`crate::registry::Registry`], taking them as
//! explicit parameters rather than reaching through a global.

use tracing::debug;

use crate::archetype::Archetype;
use crate::entity::{ArchetypeId, ComponentId};
use crate::map::Map;
use crate::ty::Type;

/// Wire the edge `A --c--> B` both directions.
/// Idempotent: a repeat call for the same `(A, c)` is a no-op on the `A`
/// side because [`crate::edge::EdgeList::push`] already is -- needed since
/// `insert_vertex`'s "obvious edge from left_neighbour" and its full
/// predecessor search can both reach the same pair.
pub fn make_edges(slab: &mut [Archetype], a: ArchetypeId, b: ArchetypeId, c: ComponentId) {
    slab[a as usize].right_edges_mut().push(c, b);
    slab[b as usize].left_edges_mut().push(c, a);
}

/// Allocate a new archetype for `new_type`, wire the edge from
/// `left_neighbour`, then wire every other direct type-predecessor found by
/// a depth-first search from `root`.
pub fn insert_vertex(
    slab: &mut Vec<Archetype>,
    type_index: &mut Map<Type, ArchetypeId>,
    component_sizes: &Map<ComponentId, u32>,
    root: ArchetypeId,
    left_neighbour: ArchetypeId,
    new_type: Type,
    edge_component: ComponentId,
) -> ArchetypeId {
    let new_id = slab.len() as ArchetypeId;
    slab.push(Archetype::new(new_type.clone(), component_sizes));
    type_index.set(new_type.clone(), new_id);
    debug!(archetype = new_id, "inserted archetype vertex");

    make_edges(slab, left_neighbour, new_id, edge_component);
    wire_predecessors(slab, root, new_id, &new_type);

    new_id
}

/// Depth-first predecessor search: every existing archetype whose type is a
/// direct subset (differs by exactly one element) of `new_type` gets a right
/// edge to `new_id`, so the dispatcher discovers `new_id` when walking from
/// any ancestor system.
fn wire_predecessors(slab: &mut [Archetype], n: ArchetypeId, new_id: ArchetypeId, new_type: &Type) {
    let k = new_type.len();
    let n_len = slab[n as usize].ty().len();

    if n_len + 1 > k {
        return;
    }

    if n_len + 1 == k {
        if Type::is_superset(new_type, slab[n as usize].ty()) {
            let label = new_type
                .first_missing_from(slab[n as usize].ty())
                .expect("new_type must have exactly one element missing from a k-1 predecessor");
            make_edges(slab, n, new_id, label);
        }
        return;
    }

    let children: Vec<ArchetypeId> = slab[n as usize].right_edges().iter().map(|e| e.archetype).collect();
    for child in children {
        wire_predecessors(slab, child, new_id, new_type);
    }
}

/// Descend from `root` toward `target`, following existing right edges
/// where possible and manufacturing intermediate archetypes via
/// [`insert_vertex`] otherwise.
pub fn traverse_and_create(
    slab: &mut Vec<Archetype>,
    type_index: &mut Map<Type, ArchetypeId>,
    component_sizes: &Map<ComponentId, u32>,
    root: ArchetypeId,
    target: &Type,
) -> ArchetypeId {
    let mut current = root;
    loop {
        if slab[current as usize].ty() == target {
            return current;
        }

        let missing = target
            .first_missing_from(slab[current as usize].ty())
            .expect("target must be a superset of every archetype visited on the path from root");

        if let Some(next) = slab[current as usize].right_edges().find(missing) {
            current = next;
            continue;
        }

        let mut next_type = slab[current as usize].ty().clone();
        next_type.add(missing);

        current = if let Some(&existing) = type_index.get(&next_type) {
            make_edges(slab, current, existing, missing);
            existing
        } else {
            insert_vertex(
                slab,
                type_index,
                component_sizes,
                root,
                current,
                next_type,
                missing,
            )
        };
    }
}
