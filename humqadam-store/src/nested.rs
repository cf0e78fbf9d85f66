use std::collections::BTreeMap;

use humqadam_entity::{Entity, IdGenerator, NewEntity};
use serde::{Deserialize, Serialize};

use crate::collection::allocate_id;
use crate::error::StoreError;

/// Child entities grouped by the id of the entity they belong to.
///
/// Persisted as one JSON object per child kind, `{ parent_id: [child, ..] }`. Children are kept
/// in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NestedCollections<T> {
  by_parent: BTreeMap<String, Vec<T>>,
}

impl<T> Default for NestedCollections<T> {
  fn default() -> Self {
    Self {
      by_parent: BTreeMap::new(),
    }
  }
}

impl<T> From<BTreeMap<String, Vec<T>>> for NestedCollections<T> {
  fn from(by_parent: BTreeMap<String, Vec<T>>) -> Self {
    Self { by_parent }
  }
}

impl<T> NestedCollections<T>
where
  T: Entity,
{
  pub fn list(&self, parent_id: &str) -> &[T] {
    self
      .by_parent
      .get(parent_id)
      .map(Vec::as_slice)
      .unwrap_or_default()
  }

  pub fn get(&self, parent_id: &str, child_id: &str) -> Option<&T> {
    self.list(parent_id).iter().find(|child| child.id() == child_id)
  }

  pub fn contains_parent(&self, parent_id: &str) -> bool {
    self.by_parent.contains_key(parent_id)
  }

  pub fn parent_ids(&self) -> impl Iterator<Item = &str> {
    self.by_parent.keys().map(String::as_str)
  }

  /// Child ids are unique across all parents of one kind.
  pub fn contains_child(&self, child_id: &str) -> bool {
    self
      .by_parent
      .values()
      .any(|children| children.iter().any(|child| child.id() == child_id))
  }

  pub fn insert_new<N>(
    &mut self,
    parent_id: &str,
    new: N,
    id_gen: &dyn IdGenerator,
  ) -> Result<T, StoreError>
  where
    N: NewEntity<Entity = T>,
  {
    new.validate()?;
    let id = allocate_id(id_gen, |id| self.contains_child(id))?;
    let child = new.into_entity(id);
    self
      .by_parent
      .entry(parent_id.to_string())
      .or_default()
      .push(child.clone());
    Ok(child)
  }

  /// Inserts `child`, replacing an existing child of `parent_id` with the same id in place.
  /// Returns the replaced child.
  pub fn upsert(&mut self, parent_id: &str, child: T) -> Option<T> {
    let children = self.by_parent.entry(parent_id.to_string()).or_default();
    match children.iter_mut().find(|c| c.id() == child.id()) {
      Some(existing) => Some(std::mem::replace(existing, child)),
      None => {
        children.push(child);
        None
      },
    }
  }

  pub fn update_with<F>(&mut self, parent_id: &str, child_id: &str, f: F) -> Result<T, StoreError>
  where
    F: FnOnce(&mut T),
  {
    let child = self
      .by_parent
      .get_mut(parent_id)
      .and_then(|children| children.iter_mut().find(|child| child.id() == child_id))
      .ok_or_else(|| StoreError::NotFound(child_id.to_string()))?;
    let before = child.clone();
    f(child);
    if child.id() != child_id {
      *child = before;
      return Err(StoreError::Internal(anyhow::anyhow!(
        "update must not change the id of {}",
        child_id
      )));
    }
    Ok(child.clone())
  }

  pub fn remove(&mut self, parent_id: &str, child_id: &str) -> Result<T, StoreError> {
    let children = self
      .by_parent
      .get_mut(parent_id)
      .ok_or_else(|| StoreError::NotFound(child_id.to_string()))?;
    let index = children
      .iter()
      .position(|child| child.id() == child_id)
      .ok_or_else(|| StoreError::NotFound(child_id.to_string()))?;
    Ok(children.remove(index))
  }

  /// Drops every child of `parent_id`.
  pub fn remove_parent(&mut self, parent_id: &str) -> Vec<T> {
    self.by_parent.remove(parent_id).unwrap_or_default()
  }

  /// Keeps only the groups whose parent satisfies `f`. Returns how many groups were dropped.
  pub fn retain_parents<F>(&mut self, f: F) -> usize
  where
    F: Fn(&str) -> bool,
  {
    let before = self.by_parent.len();
    self.by_parent.retain(|parent_id, _| f(parent_id));
    before - self.by_parent.len()
  }

  pub fn len(&self) -> usize {
    self.by_parent.values().map(Vec::len).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}
