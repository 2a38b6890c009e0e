pub mod clear;
pub mod container;
pub mod plates;
pub mod stove;
pub mod trash;

use bevy::{
    app::{App, Plugin, Update},
    ecs::{
        component::Component,
        entity::Entity,
        event::{EventReader, EventWriter},
        query::With,
        schedule::{IntoSystemConfigs, State, SystemSet},
        system::{Query, Res, ResMut},
    },
    reflect::Reflect,
    time::Time,
};
use tracing::{debug_span, error, warn};

use crate::{
    chef::{Chef, InteractEvent},
    event::KitchenEvent,
    item::Items,
    kitchen_object::{Holder, KitchenObjectId, KitchenObjects, OwnershipError},
    recipe::CookingRecipes,
    session::SessionState,
};

use self::{container::ContainerCounter, plates::PlatesCounter, stove::StoveCounter};

#[derive(SystemSet, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CounterSet;

pub struct CounterPlugin;

impl Plugin for CounterPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Counter>()
            .register_type::<ContainerCounter>()
            .register_type::<PlatesCounter>()
            .register_type::<StoveCounter>()
            .add_systems(
                Update,
                (counter_interact, counter_tick).chain().in_set(CounterSet),
            );
    }
}

/// Everything a counter touches while it handles an interaction or a tick.
pub struct KitchenContext<'a> {
    pub objects: &'a mut KitchenObjects,
    pub items: &'a Items,
    pub recipes: &'a CookingRecipes,
    pub events: &'a mut Vec<KitchenEvent>,
}

impl KitchenContext<'_> {
    pub fn emit(&mut self, event: KitchenEvent) {
        self.events.push(event);
    }
}

/// A fixed station holding at most one kitchen object. The variant decides what
/// happens when a chef uses it and whether it does anything over time.
#[derive(Component, Clone, Debug, Reflect)]
pub enum Counter {
    /// Plain work surface.
    Clear,
    /// Endless supply of one item.
    Container(ContainerCounter),
    Plates(PlatesCounter),
    Trash,
    Stove(StoveCounter),
}

impl Counter {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Counter::Clear => "clear",
            Counter::Container(_) => "container",
            Counter::Plates(_) => "plates",
            Counter::Trash => "trash",
            Counter::Stove(_) => "stove",
        }
    }

    /// `chef` uses this counter. Disallowed actions are silent no-ops; an error means
    /// the ownership bookkeeping itself is broken.
    pub fn interact(
        &mut self,
        counter: Entity,
        chef: Entity,
        kitchen: &mut KitchenContext,
    ) -> Result<(), OwnershipError> {
        match self {
            Counter::Clear => clear::interact(counter, chef, kitchen),
            Counter::Container(container) => container.interact(counter, chef, kitchen),
            Counter::Plates(plates) => plates.interact(counter, chef, kitchen),
            Counter::Trash => trash::interact(counter, chef, kitchen),
            Counter::Stove(stove) => stove.interact(counter, chef, kitchen),
        }
    }

    /// Advance timers by `delta` seconds.
    pub fn advance(
        &mut self,
        counter: Entity,
        delta: f32,
        session_active: bool,
        kitchen: &mut KitchenContext,
    ) -> Result<(), OwnershipError> {
        debug_assert!(delta >= 0., "time deltas must not be negative");
        let delta = delta.max(0.);
        match self {
            Counter::Plates(plates) => {
                plates.advance(counter, delta, session_active, kitchen);
                Ok(())
            }
            Counter::Stove(stove) => stove.advance(counter, delta, kitchen),
            Counter::Clear | Counter::Container(_) | Counter::Trash => Ok(()),
        }
    }

    /// Forgets whatever the counter was doing, for a kitchen whose objects were just
    /// cleared away.
    pub fn reset(&mut self) {
        match self {
            Counter::Plates(plates) => plates.reset(),
            Counter::Stove(stove) => stove.reset(),
            Counter::Clear | Counter::Container(_) | Counter::Trash => {}
        }
    }

    pub fn stove(&self) -> Option<&StoveCounter> {
        match self {
            Counter::Stove(stove) => Some(stove),
            _ => None,
        }
    }

    pub fn plates(&self) -> Option<&PlatesCounter> {
        match self {
            Counter::Plates(plates) => Some(plates),
            _ => None,
        }
    }
}

/// Outcome of the transfer every counter shares: put down, pick up, or neither.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handoff {
    Nothing,
    Placed(KitchenObjectId),
    PickedUp(KitchenObjectId),
    BothHolding {
        on_counter: KitchenObjectId,
        in_hands: KitchenObjectId,
    },
}

/// Moves an object between chef and counter when exactly one of them holds one.
pub fn hand_off(
    counter: Entity,
    chef: Entity,
    objects: &mut KitchenObjects,
) -> Result<Handoff, OwnershipError> {
    let counter_holder = Holder::Counter(counter);
    let chef_holder = Chef::holder(chef);
    match (objects.held_by(counter_holder), objects.held_by(chef_holder)) {
        (None, None) => Ok(Handoff::Nothing),
        (None, Some(in_hands)) => {
            objects.reparent(in_hands, counter_holder)?;
            Ok(Handoff::Placed(in_hands))
        }
        (Some(on_counter), None) => {
            objects.reparent(on_counter, chef_holder)?;
            Ok(Handoff::PickedUp(on_counter))
        }
        (Some(on_counter), Some(in_hands)) => Ok(Handoff::BothHolding {
            on_counter,
            in_hands,
        }),
    }
}

/// Puts `ingredient` onto `plate`, consuming the ingredient object. Returns false
/// without touching anything when `plate` isn't a plate or refuses the ingredient.
pub fn plate_ingredient(
    plate: KitchenObjectId,
    ingredient: KitchenObjectId,
    kitchen: &mut KitchenContext,
) -> Result<bool, OwnershipError> {
    let item = kitchen
        .objects
        .item(ingredient)
        .cloned()
        .ok_or(OwnershipError::UnknownObject(ingredient))?;
    let Some(contents) = kitchen.objects.plate_mut(plate) else {
        return Ok(false);
    };
    if !contents.try_add_ingredient(&item) {
        return Ok(false);
    }
    kitchen.objects.destroy(ingredient)?;
    kitchen.emit(KitchenEvent::IngredientPlated { plate, item });
    Ok(true)
}

fn ownership_violated(err: OwnershipError) -> ! {
    error!(error = %err, "Kitchen object ownership violated");
    panic!("kitchen object ownership violated: {err}");
}

pub fn counter_interact(
    mut interactions: EventReader<InteractEvent>,
    chefs: Query<(), With<Chef>>,
    mut counters: Query<&mut Counter>,
    mut objects: ResMut<KitchenObjects>,
    items: Res<Items>,
    recipes: Res<CookingRecipes>,
    mut kitchen_events: EventWriter<KitchenEvent>,
) {
    let mut events = Vec::new();
    for interaction in interactions.read() {
        if !chefs.contains(interaction.chef) {
            warn!(chef = ?interaction.chef, "Interaction from an entity that isn't a chef");
            continue;
        }
        let Ok(mut counter) = counters.get_mut(interaction.counter) else {
            warn!(counter = ?interaction.counter, "Interaction with an entity that isn't a counter");
            continue;
        };

        let span = debug_span!(
            "Counter interaction",
            counter = ?interaction.counter,
            kind = counter.kind_name()
        );
        let _enter = span.enter();

        let mut kitchen = KitchenContext {
            objects: &mut objects,
            items: &items,
            recipes: &recipes,
            events: &mut events,
        };
        if let Err(err) = counter.interact(interaction.counter, interaction.chef, &mut kitchen) {
            ownership_violated(err);
        }
    }
    kitchen_events.send_batch(events);
}

pub fn counter_tick(
    time: Res<Time>,
    session: Res<State<SessionState>>,
    mut counters: Query<(Entity, &mut Counter)>,
    mut objects: ResMut<KitchenObjects>,
    items: Res<Items>,
    recipes: Res<CookingRecipes>,
    mut kitchen_events: EventWriter<KitchenEvent>,
) {
    let session = session.get();
    if *session == SessionState::Paused {
        return;
    }

    let delta = time.delta_seconds();
    let mut events = Vec::new();
    for (entity, mut counter) in &mut counters {
        let mut kitchen = KitchenContext {
            objects: &mut objects,
            items: &items,
            recipes: &recipes,
            events: &mut events,
        };
        if let Err(err) = counter.advance(entity, delta, session.is_active(), &mut kitchen) {
            ownership_violated(err);
        }
    }
    kitchen_events.send_batch(events);
}
