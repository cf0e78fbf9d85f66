use std::collections::HashSet;

use humqadam_entity::{Entity, IdGenerator, NewEntity};

use crate::error::StoreError;

/// How many fresh ids [allocate_id] tries before giving up.
pub const MAX_ID_ATTEMPTS: usize = 16;

/// Order of the user entities in the merged view. Seeds always come first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UserOrder {
  #[default]
  OldestFirst,
  NewestFirst,
}

/// Seed entities followed by the user entities of one kind.
///
/// This holds no lock and does no I/O. The stores wrap it in their own lock and persist
/// [Collection::user_entities] after every mutation.
#[derive(Debug, Clone)]
pub struct Collection<T> {
  seeds: Vec<T>,
  seed_ids: HashSet<String>,
  /// Insertion order, oldest first.
  user: Vec<T>,
  order: UserOrder,
}

impl<T> Collection<T>
where
  T: Entity,
{
  pub fn new(seeds: Vec<T>, order: UserOrder) -> Self {
    let mut seed_ids = HashSet::with_capacity(seeds.len());
    let seeds = seeds
      .into_iter()
      .filter(|seed| {
        let unique = seed_ids.insert(seed.id().to_string());
        if !unique {
          tracing::warn!("duplicate seed id: {}", seed.id());
        }
        unique
      })
      .collect();
    Self {
      seeds,
      seed_ids,
      user: vec![],
      order,
    }
  }

  pub fn set_order(&mut self, order: UserOrder) {
    self.order = order;
  }

  /// Replaces the user entities, dropping any that collide with a seed or with each other.
  pub fn set_user_entities(&mut self, entities: Vec<T>) {
    let mut seen = HashSet::with_capacity(entities.len());
    self.user = entities
      .into_iter()
      .filter(|entity| !self.seed_ids.contains(entity.id()) && seen.insert(entity.id().to_string()))
      .collect();
  }

  pub fn iter(&self) -> impl Iterator<Item = &T> {
    let user: Box<dyn Iterator<Item = &T> + '_> = match self.order {
      UserOrder::OldestFirst => Box::new(self.user.iter()),
      UserOrder::NewestFirst => Box::new(self.user.iter().rev()),
    };
    self.seeds.iter().chain(user)
  }

  pub fn list(&self) -> Vec<T> {
    self.iter().cloned().collect()
  }

  pub fn get(&self, id: &str) -> Option<&T> {
    self.iter().find(|entity| entity.id() == id)
  }

  pub fn contains(&self, id: &str) -> bool {
    self.is_seed(id) || self.user.iter().any(|entity| entity.id() == id)
  }

  pub fn is_seed(&self, id: &str) -> bool {
    self.seed_ids.contains(id)
  }

  pub fn seeds(&self) -> &[T] {
    &self.seeds
  }

  pub fn user_entities(&self) -> &[T] {
    &self.user
  }

  pub fn len(&self) -> usize {
    self.seeds.len() + self.user.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn insert_new<N>(&mut self, new: N, id_gen: &dyn IdGenerator) -> Result<T, StoreError>
  where
    N: NewEntity<Entity = T>,
  {
    new.validate()?;
    let id = allocate_id(id_gen, |id| self.contains(id))?;
    let entity = new.into_entity(id);
    self.user.push(entity.clone());
    Ok(entity)
  }

  /// Applies `f` to the user entity with `id` and returns the updated copy.
  pub fn update_with<F>(&mut self, id: &str, f: F) -> Result<T, StoreError>
  where
    F: FnOnce(&mut T),
  {
    if self.is_seed(id) {
      return Err(StoreError::SeedImmutable(id.to_string()));
    }
    let entity = self
      .user
      .iter_mut()
      .find(|entity| entity.id() == id)
      .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    let before = entity.clone();
    f(entity);
    if entity.id() != id {
      *entity = before;
      return Err(StoreError::Internal(anyhow::anyhow!(
        "update must not change the id of {}",
        id
      )));
    }
    Ok(entity.clone())
  }

  pub fn remove(&mut self, id: &str) -> Result<T, StoreError> {
    if self.is_seed(id) {
      return Err(StoreError::SeedImmutable(id.to_string()));
    }
    let index = self
      .user
      .iter()
      .position(|entity| entity.id() == id)
      .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    Ok(self.user.remove(index))
  }
}

/// Draws ids from `id_gen` until one is not `taken`.
pub fn allocate_id<F>(id_gen: &dyn IdGenerator, taken: F) -> Result<String, StoreError>
where
  F: Fn(&str) -> bool,
{
  for _ in 0..MAX_ID_ATTEMPTS {
    let id = id_gen.next_id();
    if !taken(&id) {
      return Ok(id);
    }
    tracing::debug!("id collision: {}, regenerating", id);
  }
  Err(StoreError::IdExhausted(MAX_ID_ATTEMPTS))
}
