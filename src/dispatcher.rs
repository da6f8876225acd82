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

//! The system dispatcher: for each registered system, walk the add-edge
//! subgraph rooted at the system's starting archetype and invoke its
//! callback on every row of every reachable archetype.
//!
//! Multiple ancestor paths can lead to the same descendant archetype once
//! the graph is fully wired, so this dispatcher keeps a per-`step()`
//! scratch bitset, sized to the archetype count, and visits each reachable
//! archetype exactly once.

use tracing::trace;

use crate::archetype::Archetype;
use crate::entity::ArchetypeId;
use crate::system::{SystemEntry, View};

#[cfg(feature = "profiling")]
use tracing::info_span;

/// Run every registered system once, in system-registration order.
pub(crate) fn step(slab: &mut [Archetype], systems: &mut [SystemEntry]) {
    #[cfg(feature = "profiling")]
    let _span = info_span!("dispatcher::step", systems = systems.len()).entered();

    let mut visited = vec![false; slab.len()];
    for sys_idx in 0..systems.len() {
        for v in visited.iter_mut() {
            *v = false;
        }
        let root = systems[sys_idx].archetype;
        visit(slab, systems, sys_idx, root, &mut visited);
    }
}

fn visit(
    slab: &mut [Archetype],
    systems: &mut [SystemEntry],
    sys_idx: usize,
    arch_id: ArchetypeId,
    visited: &mut [bool],
) {
    if visited[arch_id as usize] {
        return;
    }
    visited[arch_id as usize] = true;

    let (count, children, indices, elem_sizes, base_ptrs) = {
        let arch = &mut slab[arch_id as usize];
        let sig_ids = systems[sys_idx].signature.ids().to_vec();
        let indices: Vec<usize> = sig_ids
            .iter()
            .map(|c| {
                arch.ty()
                    .index_of(*c)
                    .expect("system signature must be a subset of every archetype it reaches")
            })
            .collect();
        let elem_sizes = arch.column_elem_sizes();
        let base_ptrs = arch.column_ptrs_mut();
        let children: Vec<ArchetypeId> = arch.right_edges().iter().map(|e| e.archetype).collect();
        (arch.count(), children, indices, elem_sizes, base_ptrs)
    };

    if count > 0 {
        let view = View {
            base_ptrs: &base_ptrs,
            elem_sizes: &elem_sizes,
            indices: &indices,
        };
        trace!(archetype = arch_id, rows = count, "dispatching system over archetype");
        let callback = &mut systems[sys_idx].callback;
        for row in 0..count {
            callback(&view, row);
        }
    }

    for child in children {
        visit(slab, systems, sys_idx, child, visited);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{ComponentId, EntityId};
    use crate::map::Map;
    use crate::signature::Signature;
    use crate::ty::Type;

    fn id(n: u64) -> ComponentId {
        EntityId::new(n)
    }

    #[test]
    fn visits_one_row_exactly_once_even_with_multiple_ancestor_paths() {
        let mut sizes: Map<ComponentId, u32> = Map::new();
        sizes.set(id(1), 4);
        sizes.set(id(2), 4);

        let root_ty = Type::new();
        let mut slab = vec![Archetype::new(root_ty.clone(), &sizes)];

        let mut t1 = Type::new();
        t1.add(id(1));
        slab.push(Archetype::new(t1.clone(), &sizes));
        crate::graph::make_edges(&mut slab, 0, 1, id(1));

        let mut t2 = Type::new();
        t2.add(id(2));
        slab.push(Archetype::new(t2.clone(), &sizes));
        crate::graph::make_edges(&mut slab, 0, 2, id(2));

        let mut t12 = t1.clone();
        t12.add(id(2));
        slab.push(Archetype::new(t12, &sizes));
        crate::graph::make_edges(&mut slab, 1, 3, id(2));
        crate::graph::make_edges(&mut slab, 2, 3, id(1));

        let e = slab[3 as usize].add(id(42));
        slab[3].set_component(0, e, &7i32.to_le_bytes());

        let hit_count = std::rc::Rc::new(std::cell::RefCell::new(0));
        let hit_count_in_system = hit_count.clone();
        let mut systems = vec![SystemEntry {
            archetype: 0,
            signature: Signature::new(vec![]),
            callback: Box::new(move |_v: &View, _row: u32| {
                *hit_count_in_system.borrow_mut() += 1;
            }),
        }];

        step(&mut slab, &mut systems);
        assert_eq!(*hit_count.borrow(), 1);
    }
}
