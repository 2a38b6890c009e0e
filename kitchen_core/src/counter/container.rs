use bevy::{ecs::entity::Entity, reflect::Reflect};
use tracing::{debug, warn};

use super::{hand_off, Handoff, KitchenContext};
use crate::{
    chef::Chef,
    event::KitchenEvent,
    item::Item,
    kitchen_object::OwnershipError,
};

/// Dispenses a fresh object of `item` to an empty-handed chef. It is also a regular
/// surface: a chef may set something down on it and pick it up again, and nothing is
/// dispensed while something rests there.
#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct ContainerCounter {
    item: Item,
}

impl ContainerCounter {
    pub fn new(item: Item) -> Self {
        Self { item }
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub(super) fn interact(
        &self,
        counter: Entity,
        chef: Entity,
        kitchen: &mut KitchenContext,
    ) -> Result<(), OwnershipError> {
        match hand_off(counter, chef, kitchen.objects)? {
            Handoff::Nothing => {
                let Some(definition) = kitchen.items.get(&self.item) else {
                    warn!(item = %self.item, "Container dispenses an item missing from the catalog");
                    return Ok(());
                };
                kitchen.objects.spawn(definition, Chef::holder(chef))?;
                debug!(item = %self.item, "Chef grabbed from container");
                kitchen.emit(KitchenEvent::ObjectGrabbed {
                    counter,
                    item: self.item.clone(),
                });
            }
            Handoff::Placed(_) | Handoff::PickedUp(_) | Handoff::BothHolding { .. } => {}
        }
        Ok(())
    }
}
