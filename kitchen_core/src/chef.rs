use bevy::{
    app::{App, Plugin},
    ecs::{component::Component, entity::Entity, event::Event},
    reflect::Reflect,
};

use crate::kitchen_object::{Holder, KitchenObjectId, KitchenObjects};

pub struct ChefPlugin;

impl Plugin for ChefPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Chef>().add_event::<InteractEvent>();
    }
}

/// An actor that carries at most one kitchen object and interacts with counters.
/// Movement, input and animation live elsewhere; the kitchen only needs to know
/// which entity is doing the carrying.
#[derive(Component, Debug, Default, Reflect)]
pub struct Chef;

impl Chef {
    pub fn holder(entity: Entity) -> Holder {
        Holder::Chef(entity)
    }

    pub fn is_carrying(entity: Entity, objects: &KitchenObjects) -> bool {
        objects.is_holding(Holder::Chef(entity))
    }

    pub fn carried(entity: Entity, objects: &KitchenObjects) -> Option<KitchenObjectId> {
        objects.held_by(Holder::Chef(entity))
    }
}

/// `chef` uses `counter`.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractEvent {
    pub chef: Entity,
    pub counter: Entity,
}
