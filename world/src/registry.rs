//! Ordered registry of the actors that take part in the actor turn.

use std::time::Duration;

use scavenge_core::{ActorId, ActorSnapshot, ActorView, GridPosition};

/// Reference to a spawned actor plus the time its single step takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActorHandle {
    id: ActorId,
    position: GridPosition,
    move_duration: Duration,
}

impl ActorHandle {
    /// Creates a handle for an actor spawned at `position`.
    #[must_use]
    pub const fn new(id: ActorId, position: GridPosition, move_duration: Duration) -> Self {
        Self {
            id,
            position,
            move_duration,
        }
    }

    /// Identifier assigned to the actor.
    #[must_use]
    pub const fn id(&self) -> ActorId {
        self.id
    }

    /// Time to wait after activating the actor before activating the next one.
    #[must_use]
    pub const fn move_duration(&self) -> Duration {
        self.move_duration
    }

    fn snapshot(&self) -> ActorSnapshot {
        ActorSnapshot {
            id: self.id,
            position: self.position,
            move_duration: self.move_duration,
        }
    }
}

/// Actors registered for the current level, in activation order.
///
/// Insertion order is the order actors were spawned while the board was
/// built. The registry is emptied, never pruned, when a level is replaced.
#[derive(Clone, Debug, Default)]
pub struct ActorRegistry {
    handles: Vec<ActorHandle>,
}

impl ActorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            handles: Vec::new(),
        }
    }

    /// Drops every handle registered for the previous level.
    pub fn clear(&mut self) {
        self.handles.clear();
    }

    /// Appends an actor to the end of the activation order.
    pub fn register(&mut self, handle: ActorHandle) {
        self.handles.push(handle);
    }

    /// Registered actors in activation order.
    #[must_use]
    pub fn all(&self) -> &[ActorHandle] {
        &self.handles
    }

    /// Looks up a registered actor by identifier.
    #[must_use]
    pub fn get(&self, id: ActorId) -> Option<&ActorHandle> {
        self.handles.iter().find(|handle| handle.id == id)
    }

    /// Number of registered actors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Reports whether no actor is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Captures a read-only view in activation order.
    #[must_use]
    pub fn view(&self) -> ActorView {
        ActorView::from_snapshots(self.handles.iter().map(ActorHandle::snapshot).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(id: u32, millis: u64) -> ActorHandle {
        ActorHandle::new(
            ActorId::new(id),
            GridPosition::new(id as i32, 0),
            Duration::from_millis(millis),
        )
    }

    #[test]
    fn preserves_registration_order() {
        let mut registry = ActorRegistry::new();
        registry.register(handle(7, 100));
        registry.register(handle(2, 300));
        registry.register(handle(5, 200));

        let ids: Vec<u32> = registry.all().iter().map(|h| h.id().get()).collect();
        assert_eq!(ids, vec![7, 2, 5]);

        let view_ids: Vec<u32> = registry.view().iter().map(|s| s.id.get()).collect();
        assert_eq!(view_ids, ids, "view must not reorder actors");
    }

    #[test]
    fn clear_empties_registry() {
        let mut registry = ActorRegistry::new();
        registry.register(handle(1, 100));
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.get(ActorId::new(1)).is_none());
    }
}
