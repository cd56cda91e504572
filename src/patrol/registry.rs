use std::collections::HashMap;

use bevy::prelude::*;

use super::Patrol;

/// Lookup of patrol entities by their actor's [`Name`].
///
/// Kept in sync automatically for patrols whose actor has a `Name` when the
/// patrol is added. Entries can also be registered by hand.
#[derive(Resource, Debug, Default)]
pub struct PatrolRegistry {
    by_name: HashMap<String, Entity>,
}

impl PatrolRegistry {
    /// Associate `name` with a patrol entity, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, patrol: Entity) -> Option<Entity> {
        self.by_name.insert(name.into(), patrol)
    }

    /// Remove every entry pointing at `patrol`.
    pub fn unregister(&mut self, patrol: Entity) {
        self.by_name.retain(|_, entity| *entity != patrol);
    }

    /// The patrol entity registered under `name`.
    pub fn get(&self, name: &str) -> Option<Entity> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Registered actor names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }
}

/// Register new patrols under their actor's name and drop removed ones.
pub fn sync_patrol_registry(
    mut registry: ResMut<PatrolRegistry>,
    added: Query<(Entity, &Patrol), Added<Patrol>>,
    names: Query<&Name>,
    mut removed: RemovedComponents<Patrol>,
) {
    for entity in removed.read() {
        registry.unregister(entity);
    }

    for (entity, patrol) in &added {
        let Ok(name) = names.get(patrol.actor) else {
            debug!("Patrol {:?} has an unnamed actor; not registered", entity);
            continue;
        };

        if let Some(previous) = registry.register(name.as_str(), entity) {
            if previous != entity {
                warn!(
                    "Patrol actor name '{}' reused; {:?} replaces {:?}",
                    name.as_str(),
                    entity,
                    previous
                );
            }
        }
    }
}
