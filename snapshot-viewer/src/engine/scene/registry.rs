//! Fixed-capacity registry of snapshot scene roots.
//!
//! Every snapshot stays resident for the whole session and is shown or hidden
//! by flipping its visibility flag, so switching is O(1) and never adds or
//! removes entities while the renderer is drawing.

use bevy::prelude::*;

/// Marker on the root entity of each instanced snapshot.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotRoot {
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    entity: Entity,
    visible: bool,
}

/// Entities whose visibility must change after a switch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibilityChange {
    pub hide: Option<Entity>,
    pub show: Option<Entity>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowOutcome {
    /// Requested index is already current.
    Unchanged,
    Switched(VisibilityChange),
    OutOfRange { index: usize, len: usize },
}

/// Ordered snapshot slots, index-aligned with the manifest.
/// At most one slot is flagged visible.
#[derive(Resource, Debug, Default)]
pub struct SnapshotRegistry {
    slots: Vec<Option<Slot>>,
    current: usize,
}

impl SnapshotRegistry {
    /// Registry with `capacity` empty slots and index 0 current.
    #[cfg(test)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            current: 0,
        }
    }

    /// Batch population: one slot per entity in manifest order, slot 0 visible.
    pub fn populate(entities: impl IntoIterator<Item = Entity>) -> Self {
        let slots = entities
            .into_iter()
            .enumerate()
            .map(|(index, entity)| {
                Some(Slot {
                    entity,
                    visible: index == 0,
                })
            })
            .collect();
        Self { slots, current: 0 }
    }

    /// Fill one empty slot. The slot takes the visibility implied by the current index.
    #[cfg(test)]
    pub fn insert(&mut self, index: usize, entity: Entity) -> bool {
        let current = self.current;
        match self.slots.get_mut(index) {
            Some(slot @ None) => {
                *slot = Some(Slot {
                    entity,
                    visible: index == current,
                });
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    #[cfg(test)]
    pub fn entity(&self, index: usize) -> Option<Entity> {
        self.slots.get(index).copied().flatten().map(|slot| slot.entity)
    }

    /// Visibility flag of a populated slot.
    pub fn is_visible(&self, index: usize) -> Option<bool> {
        self.slots.get(index).copied().flatten().map(|slot| slot.visible)
    }

    pub fn visible_count(&self) -> usize {
        self.slots.iter().flatten().filter(|slot| slot.visible).count()
    }

    /// Populated slots as `(index, entity, visible)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Entity, bool)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.map(|slot| (index, slot.entity, slot.visible)))
    }

    /// Make `index` the only visible snapshot.
    ///
    /// Clears the current slot's flag and sets the target's, skipping empty slots,
    /// and moves the current index even when the target slot is still empty.
    pub fn show_model(&mut self, index: usize) -> ShowOutcome {
        if index >= self.slots.len() {
            return ShowOutcome::OutOfRange {
                index,
                len: self.slots.len(),
            };
        }
        if index == self.current {
            return ShowOutcome::Unchanged;
        }

        let mut change = VisibilityChange::default();
        if let Some(slot) = self.slots[self.current].as_mut() {
            slot.visible = false;
            change.hide = Some(slot.entity);
        }
        if let Some(slot) = self.slots[index].as_mut() {
            slot.visible = true;
            change.show = Some(slot.entity);
        }
        self.current = index;

        ShowOutcome::Switched(change)
    }
}

pub fn visibility_from_flag(visible: bool) -> Visibility {
    if visible {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    }
}

/// Apply a switch to the two affected entities.
pub fn apply_visibility_change(change: VisibilityChange, visibilities: &mut Query<&mut Visibility>) {
    if let Some(entity) = change.hide {
        if let Ok(mut visibility) = visibilities.get_mut(entity) {
            *visibility = Visibility::Hidden;
        }
    }
    if let Some(entity) = change.show {
        if let Ok(mut visibility) = visibilities.get_mut(entity) {
            *visibility = Visibility::Inherited;
        }
    }
}

/// Write every slot's flag to its entity. Used once when initialisation completes.
pub fn apply_registry_visibility(
    registry: &SnapshotRegistry,
    visibilities: &mut Query<&mut Visibility>,
) {
    for (_, entity, visible) in registry.iter() {
        if let Ok(mut visibility) = visibilities.get_mut(entity) {
            *visibility = visibility_from_flag(visible);
        }
    }
}
