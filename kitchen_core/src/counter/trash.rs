use bevy::ecs::entity::Entity;
use tracing::debug;

use super::KitchenContext;
use crate::{
    chef::Chef,
    event::KitchenEvent,
    kitchen_object::{Holder, OwnershipError},
};

/// Destroys whatever the chef is carrying.
pub fn interact(
    counter: Entity,
    chef: Entity,
    kitchen: &mut KitchenContext,
) -> Result<(), OwnershipError> {
    if kitchen.objects.is_holding(Holder::Counter(counter)) {
        return Ok(());
    }
    let Some(carried) = Chef::carried(chef, kitchen.objects) else {
        return Ok(());
    };

    let trashed = kitchen.objects.destroy(carried)?;
    debug!(item = %trashed.item(), "Trashed kitchen object");
    kitchen.emit(KitchenEvent::ObjectTrashed {
        counter,
        item: trashed.item().clone(),
    });
    Ok(())
}
