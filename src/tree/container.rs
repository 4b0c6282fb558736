//! The container/dependent pair shared by the tree nodes.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::keys::ParentRef;
use crate::error::SheetLabelError;

/// A node that lives inside a container.
pub trait Dependent {
    /// The node's key within its container.
    fn key(&self) -> String;

    /// The container the node belongs to.
    fn parent(&self) -> &ParentRef;
}

/// Children of a tree node, with two views over them.
///
/// Every child is in the *all-dependent* view. The *immediate* view holds
/// only the children whose direct parent is the owner of this container;
/// the rest are nested deeper (a range under a table, seen from the
/// worksheet).
///
/// Mutation is crate-internal: nodes change only through the workbook, which
/// checks the tree invariants first. Accessors hand out independent copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Serialize",
    deserialize = "T: Deserialize<'de>"
))]
pub struct Container<T> {
    dependents: BTreeMap<String, T>,
    immediate: BTreeSet<String>,
}

impl<T> Default for Container<T> {
    fn default() -> Self {
        Self {
            dependents: BTreeMap::new(),
            immediate: BTreeSet::new(),
        }
    }
}

impl<T: Dependent + Clone> Container<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `node` under `key`; also into the immediate view when
    /// `is_immediate` is set.
    ///
    /// # Errors
    /// Fails without modifying the container if `key` is already present or
    /// does not match the node's own key.
    pub(crate) fn add_annotation(
        &mut self,
        key: &str,
        node: T,
        is_immediate: bool,
    ) -> Result<(), SheetLabelError> {
        let own_key = node.key();
        if own_key != key {
            return Err(SheetLabelError::containment(
                key,
                format!("node registered under '{key}' has key '{own_key}'"),
            ));
        }
        if self.dependents.contains_key(key) {
            return Err(SheetLabelError::containment(
                key,
                "an annotation with this key is already registered",
            ));
        }
        if is_immediate {
            self.immediate.insert(key.to_string());
        }
        self.dependents.insert(key.to_string(), node);
        Ok(())
    }

    /// Removes `key` from both views, returning the node if it was present.
    pub(crate) fn remove_annotation(&mut self, key: &str) -> Option<T> {
        self.immediate.remove(key);
        self.dependents.remove(key)
    }

    pub(crate) fn clear(&mut self) {
        self.dependents.clear();
        self.immediate.clear();
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        self.dependents.get_mut(key)
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.dependents.get(key)
    }

    pub fn contains_annotation(&self, key: &str) -> bool {
        self.dependents.contains_key(key)
    }

    pub fn is_immediate_child(&self, key: &str) -> bool {
        self.immediate.contains(key)
    }

    pub fn len(&self) -> usize {
        self.dependents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependents.is_empty()
    }

    /// Keys of the all-dependent view, in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.dependents.keys().map(String::as_str)
    }

    /// Borrowing iterator over the all-dependent view.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.dependents.values()
    }

    pub fn all_dependent_as_list(&self) -> Vec<T> {
        self.dependents.values().cloned().collect()
    }

    pub fn all_dependent_as_map(&self) -> BTreeMap<String, T> {
        self.dependents.clone()
    }

    pub fn immediate_children_as_list(&self) -> Vec<T> {
        self.immediate
            .iter()
            .filter_map(|k| self.dependents.get(k))
            .cloned()
            .collect()
    }

    pub fn immediate_children_as_map(&self) -> BTreeMap<String, T> {
        self.immediate
            .iter()
            .filter_map(|k| self.dependents.get(k).map(|v| (k.clone(), v.clone())))
            .collect()
    }
}
