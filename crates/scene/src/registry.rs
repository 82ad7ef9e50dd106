use shuen_common::{Entity, EntityId};

/// Flat, ordered collection of a scene's entities.
///
/// Iteration follows registration order until a render reorders the
/// registry into draw order.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entries: Vec<(EntityId, Entity)>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity under a fresh id.
    pub fn insert(&mut self, entity: Entity) -> EntityId {
        let id = EntityId::new();
        self.entries.push((id, entity));
        id
    }

    /// Remove an entity. Returns it if it was registered.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.entries.iter().position(|(e, _)| *e == id)?;
        Some(self.entries.remove(index).1)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entries.iter().find(|(e, _)| *e == id).map(|(_, e)| e)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entries
            .iter_mut()
            .find(|(e, _)| *e == id)
            .map(|(_, e)| e)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entries.iter().any(|(e, _)| *e == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entries.iter().map(|(id, e)| (*id, e))
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.entries.iter().map(|(id, _)| *id).collect()
    }

    pub fn as_slice(&self) -> &[(EntityId, Entity)] {
        &self.entries
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [(EntityId, Entity)] {
        &mut self.entries
    }
}
