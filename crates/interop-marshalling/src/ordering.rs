//! Dependency Ordering
//!
//! The stub emitter must generate an element only after everything its
//! marshalling depends on. [`order_by_dependencies`] sorts the elements of a
//! signature topologically by [`MarshallingInfo::dependencies`], keeping the
//! original order wherever dependencies leave a choice.
//!
//! Elements are matched to dependencies by [`PositionKey`]. An element with
//! no managed index exists only in the unmanaged signature; it can be depended
//! on, but it has no dependencies of its own.

use interop_types::{PositionKey, TypePositionInfo};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::{OrderingError, OrderingResult};
use crate::info::Dependencies;
use crate::MarshallingInfo;

/// A signature element together with its marshalling.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoundElement {
    pub position: TypePositionInfo,
    pub marshalling: MarshallingInfo,
}

impl BoundElement {
    pub fn new(position: TypePositionInfo, marshalling: MarshallingInfo) -> Self {
        Self {
            position,
            marshalling,
        }
    }

    /// Positions that must be generated before this element
    pub fn dependencies(&self) -> Dependencies<'_> {
        if self.position.managed_index.is_none() {
            return Box::new(std::iter::empty());
        }
        self.marshalling.dependencies()
    }
}

/// Order `elements` so that every element follows the elements it depends on.
///
/// Among elements that are ready at the same time, the one earlier in
/// `elements` comes first, so a signature without dependencies keeps its
/// order.
#[tracing::instrument(level = "trace", skip_all, fields(elements = elements.len()))]
pub fn order_by_dependencies(elements: &[BoundElement]) -> OrderingResult<Vec<&BoundElement>> {
    let mut index_of: FxHashMap<PositionKey, usize> = FxHashMap::default();
    for (index, element) in elements.iter().enumerate() {
        if let Some(key) = element.position.position_key() {
            if index_of.insert(key, index).is_some() {
                return Err(OrderingError::DuplicatePosition { key });
            }
        }
    }

    // dependents[i] lists the elements waiting on element i
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); elements.len()];
    let mut in_degree = vec![0usize; elements.len()];

    for (index, element) in elements.iter().enumerate() {
        let mut seen = FxHashSet::default();
        for dependency in element.dependencies() {
            let Some(key) = dependency.position_key() else {
                continue;
            };
            let Some(&provider) = index_of.get(&key) else {
                return Err(OrderingError::UnknownDependency {
                    dependent: element.position.instance_identifier.clone(),
                    missing: key,
                });
            };
            if seen.insert(provider) {
                dependents[provider].push(index);
                in_degree[index] += 1;
            }
        }
    }

    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(index, _)| Reverse(index))
        .collect();

    let mut ordered = Vec::with_capacity(elements.len());
    while let Some(Reverse(index)) = ready.pop() {
        ordered.push(&elements[index]);
        for &dependent in &dependents[index] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                ready.push(Reverse(dependent));
            }
        }
    }

    if ordered.len() != elements.len() {
        // Elements left over either sit on a cycle or wait on one; report the former
        let cyclic: Vec<_> = (0..elements.len())
            .filter(|&index| in_degree[index] > 0 && lies_on_cycle(index, &dependents))
            .map(|index| elements[index].position.instance_identifier.clone())
            .collect();
        tracing::debug!(?cyclic, "dependency cycle");
        return Err(OrderingError::Cycle { elements: cyclic });
    }

    Ok(ordered)
}

/// Returns true if `start` can reach itself through dependency edges
fn lies_on_cycle(start: usize, dependents: &[Vec<usize>]) -> bool {
    let mut visited = FxHashSet::default();
    let mut stack: Vec<usize> = dependents[start].clone();
    while let Some(index) = stack.pop() {
        if index == start {
            return true;
        }
        if visited.insert(index) {
            stack.extend(&dependents[index]);
        }
    }
    false
}
