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

//! `Type`: the sorted, deduplicated component-id set that identifies an
//! archetype. Named `ty` rather than `type` since the latter is a reserved
//! word.

use crate::entity::ComponentId;
use crate::map::MapKey;
use crate::utils::djb2;

/// Strictly ascending, duplicate-free sequence of component ids.
#[derive(Debug, Clone, Default, Eq)]
pub struct Type {
    elements: Vec<ComponentId>,
}

impl Type {
    pub fn new() -> Self {
        Type {
            elements: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Type {
            elements: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.elements.iter().copied()
    }

    pub fn as_slice(&self) -> &[ComponentId] {
        &self.elements
    }

    /// Insert `e` keeping the array sorted and duplicate-free; no-op if
    /// already present.
    pub fn add(&mut self, e: ComponentId) {
        match self.elements.binary_search(&e) {
            Ok(_) => {}
            Err(pos) => self.elements.insert(pos, e),
        }
    }

    /// Remove `e`; no-op if absent.
    pub fn remove(&mut self, e: ComponentId) {
        if let Ok(pos) = self.elements.binary_search(&e) {
            self.elements.remove(pos);
        }
    }

    /// Position of `e`, or `None` if absent.
    pub fn index_of(&self, e: ComponentId) -> Option<usize> {
        self.elements.binary_search(&e).ok()
    }

    pub fn contains(&self, e: ComponentId) -> bool {
        self.elements.binary_search(&e).is_ok()
    }

    /// `sup` is a superset of `sub`: every element of `sub` appears in `sup`,
    /// via a two-pointer scan over both sorted arrays.
    pub fn is_superset(sup: &Type, sub: &Type) -> bool {
        let mut i = 0usize;
        let mut j = 0usize;
        while j < sub.elements.len() {
            if i >= sup.elements.len() {
                return false;
            }
            match sup.elements[i].cmp(&sub.elements[j]) {
                std::cmp::Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => return false,
            }
        }
        true
    }

    /// The first element present in `self` but absent from `other`, in
    /// ascending order -- used by the graph walker to pick which component
    /// to add next when descending toward a target type.
    pub fn first_missing_from(&self, other: &Type) -> Option<ComponentId> {
        self.elements.iter().copied().find(|e| !other.contains(*e))
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl MapKey for Type {
    /// djb2 fold over elements in (sorted, hence canonical) order.
    fn map_hash(&self) -> u32 {
        djb2(self.elements.iter().flat_map(|c| c.raw().to_le_bytes()))
    }
}

impl FromIterator<ComponentId> for Type {
    fn from_iter<I: IntoIterator<Item = ComponentId>>(iter: I) -> Self {
        let mut ty = Type::new();
        for e in iter {
            ty.add(e);
        }
        ty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityId;

    fn id(n: u64) -> ComponentId {
        EntityId::new(n)
    }

    #[test]
    fn add_keeps_sorted_and_dedups() {
        let mut t = Type::new();
        for n in [5, 1, 3, 1, 9, 3, 2] {
            t.add(id(n));
        }
        let vals: Vec<u64> = t.iter().map(|c| c.raw()).collect();
        assert_eq!(vals, vec![1, 2, 3, 5, 9]);
    }

    #[test]
    fn remove_from_middle_and_ends() {
        let mut t: Type = [1u64, 2, 3, 4, 5].into_iter().map(id).collect();
        t.remove(id(1));
        t.remove(id(5));
        t.remove(id(3));
        let vals: Vec<u64> = t.iter().map(|c| c.raw()).collect();
        assert_eq!(vals, vec![2, 4]);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut t: Type = [1u64, 2].into_iter().map(id).collect();
        t.remove(id(99));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn superset_reflexive_and_strict() {
        let a: Type = [1u64, 2, 3].into_iter().map(id).collect();
        assert!(Type::is_superset(&a, &a));

        let mut with_extra = a.clone();
        with_extra.add(id(4));
        assert!(Type::is_superset(&with_extra, &a));
        assert!(!Type::is_superset(&a, &with_extra));
    }

    #[test]
    fn equal_is_order_independent_of_insertion() {
        let a: Type = [3u64, 1, 2].into_iter().map(id).collect();
        let b: Type = [1u64, 2, 3].into_iter().map(id).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn hash_is_order_independent_of_insertion() {
        let a: Type = [3u64, 1, 2].into_iter().map(id).collect();
        let b: Type = [1u64, 2, 3].into_iter().map(id).collect();
        assert_eq!(a.map_hash(), b.map_hash());
    }

    #[test]
    fn stays_sorted_under_random_order_insertion() {
        let order = [17u64, 3, 42, 1, 9, 2, 100, 0];
        let t: Type = order.into_iter().map(id).collect();
        let vals: Vec<u64> = t.iter().map(|c| c.raw()).collect();
        let mut sorted = vals.clone();
        sorted.sort_unstable();
        assert_eq!(vals, sorted);
    }
}
