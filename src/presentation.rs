use bevy::{
    app::{App, Plugin, Update},
    core::Name,
    ecs::{
        entity::Entity,
        event::EventReader,
        schedule::IntoSystemConfigs,
        system::{Local, Query, Res, ResMut, Resource},
    },
    utils::HashSet,
};
use kitchen_core::{
    counter::{stove::StoveState, Counter, CounterSet},
    event::KitchenEvent,
    kitchen_object::KitchenObjects,
};
use tracing::{debug, info, trace, warn};

/// Fried food past this share of its burning time triggers a warning.
const BURN_WARNING_PROGRESS: f32 = 0.5;

/// Running totals for the end-of-shift summary.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct ShiftStats {
    pub grabbed: u32,
    pub plates_taken: u32,
    pub plated: u32,
    pub trashed: u32,
    pub burned: u32,
}

/// Headless stand-in for the visuals and audio: every kitchen event ends up in the log.
pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ShiftStats>().add_systems(
            Update,
            (log_kitchen_events, warn_before_burning).after(CounterSet),
        );
    }
}

fn counter_name(names: &Query<&Name>, counter: Entity) -> String {
    names
        .get(counter)
        .map_or_else(|_| format!("{counter:?}"), |name| name.to_string())
}

fn log_kitchen_events(
    mut events: EventReader<KitchenEvent>,
    names: Query<&Name>,
    objects: Res<KitchenObjects>,
    mut stats: ResMut<ShiftStats>,
) {
    for event in events.read() {
        match event {
            KitchenEvent::ObjectGrabbed { counter, item } => {
                stats.grabbed += 1;
                info!(counter = %counter_name(&names, *counter), %item, "Grabbed");
            }
            KitchenEvent::PlateSpawned { counter, plates } => {
                debug!(counter = %counter_name(&names, *counter), plates, "Plate ready");
            }
            KitchenEvent::PlateRemoved { counter, plates } => {
                stats.plates_taken += 1;
                info!(counter = %counter_name(&names, *counter), plates, "Took a plate");
            }
            KitchenEvent::ObjectTrashed { counter, item } => {
                stats.trashed += 1;
                info!(counter = %counter_name(&names, *counter), %item, "Trashed");
            }
            KitchenEvent::StoveStateChanged { counter, state } => {
                if *state == StoveState::Burned {
                    stats.burned += 1;
                    warn!(counter = %counter_name(&names, *counter), "Food burned");
                } else {
                    trace!(counter = %counter_name(&names, *counter), ?state, "Stove");
                }
            }
            KitchenEvent::StoveProgressChanged { counter, progress } => {
                trace!(counter = %counter_name(&names, *counter), progress, "Stove progress");
            }
            KitchenEvent::IngredientPlated { plate, item } => {
                stats.plated += 1;
                let on_plate = objects
                    .plate(*plate)
                    .map(|contents| {
                        contents
                            .ingredients()
                            .iter()
                            .map(|ingredient| ingredient.as_ref())
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .unwrap_or_default();
                info!(%plate, %item, on_plate = %on_plate, "Plated");
            }
        }
    }
}

fn warn_before_burning(
    stoves: Query<(Entity, &Name, &Counter)>,
    mut warned: Local<HashSet<Entity>>,
) {
    for (entity, name, counter) in &stoves {
        let Some(stove) = counter.stove() else {
            continue;
        };
        if stove.is_fried() && stove.progress() >= BURN_WARNING_PROGRESS {
            if warned.insert(entity) {
                warn!(counter = %name, "About to burn");
            }
        } else {
            warned.remove(&entity);
        }
    }
}

#[cfg(test)]
mod test {
    use bevy::ecs::event::Events;
    use kitchen_core::{
        item::{Item, ItemDefinition},
        kitchen_object::Holder,
    };

    use super::*;

    fn presentation_app() -> App {
        let mut app = App::new();
        app.add_event::<KitchenEvent>()
            .init_resource::<KitchenObjects>()
            .add_plugins(PresentationPlugin);
        app
    }

    #[test]
    fn events_are_tallied() {
        let mut app = presentation_app();
        let counter = app.world.spawn(Name::new("Trash")).id();
        let mut events = app.world.resource_mut::<Events<KitchenEvent>>();
        events.send(KitchenEvent::ObjectTrashed {
            counter,
            item: Item::new("Tomato"),
        });
        events.send(KitchenEvent::PlateRemoved { counter, plates: 0 });
        events.send(KitchenEvent::StoveStateChanged {
            counter,
            state: StoveState::Fried,
        });
        events.send(KitchenEvent::StoveStateChanged {
            counter,
            state: StoveState::Burned,
        });
        app.update();

        assert_eq!(
            *app.world.resource::<ShiftStats>(),
            ShiftStats {
                plates_taken: 1,
                trashed: 1,
                burned: 1,
                ..Default::default()
            }
        );
    }

    #[test]
    fn plated_events_read_plate_contents() {
        let mut app = presentation_app();
        let chef = app.world.spawn_empty().id();
        let plate = app
            .world
            .resource_mut::<KitchenObjects>()
            .spawn(
                &ItemDefinition::plate("Plate", vec![Item::new("Bread")]),
                Holder::Chef(chef),
            )
            .unwrap();
        app.world.send_event(KitchenEvent::IngredientPlated {
            plate,
            item: Item::new("Bread"),
        });
        app.update();

        assert_eq!(app.world.resource::<ShiftStats>().plated, 1);
    }

    #[test]
    fn spawned_plates_are_only_logged() {
        let mut app = presentation_app();
        let entity = app.world.spawn_empty().id();
        app.world.send_event(KitchenEvent::PlateSpawned {
            counter: entity,
            plates: 1,
        });
        app.update();
        assert_eq!(*app.world.resource::<ShiftStats>(), ShiftStats::default());
    }
}
