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

//! `Signature`: the ordered component-id tuple a system declares
//! (spec.md §4.3).
//!
//! The C source builds these variadically (`ecs_signature_new_n`); per
//! spec.md §9's REDESIGN FLAGS this becomes an ordinary constructor over a
//! slice, plus the `signature!` macro below for call-site ergonomics.

use smallvec::SmallVec;

use crate::entity::ComponentId;
use crate::ty::Type;

/// Most systems declare a handful of components; inlining up to 8 avoids a
/// heap allocation per `system()` call for the common case (the same
/// small-buffer-optimization the teacher crate leans on for its own
/// bundles).
type SignatureIds = SmallVec<[ComponentId; 8]>;

/// Ordered (not sorted) tuple of component ids, as declared by a system.
#[derive(Debug, Clone)]
pub struct Signature {
    ids: SignatureIds,
}

impl Signature {
    pub fn new(ids: impl Into<Vec<ComponentId>>) -> Self {
        Signature {
            ids: SignatureIds::from_vec(ids.into()),
        }
    }

    pub fn ids(&self) -> &[ComponentId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Project the declared order into a sorted, deduplicated [`Type`] for
    /// graph lookup (spec.md §4.3).
    pub fn as_type(&self) -> Type {
        self.ids.iter().copied().collect()
    }
}

/// Build a [`Signature`] from a list of component ids:
/// `signature![position, velocity]`.
#[macro_export]
macro_rules! signature {
    ($($id:expr),* $(,)?) => {
        $crate::signature::Signature::new(vec![$($id),*])
    };
}
