use bevy::{ecs::entity::Entity, reflect::Reflect};
use serde::Deserialize;
use tracing::{debug, debug_span, warn};

use super::{plate_ingredient, KitchenContext};
use crate::{
    chef::Chef,
    event::KitchenEvent,
    item::Item,
    kitchen_object::{Holder, KitchenObjectId, OwnershipError},
    recipe::CookingRecipe,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Reflect, Deserialize)]
pub enum StoveState {
    #[default]
    Idle,
    Frying,
    Fried,
    Burned,
}

/// Fries raw ingredients and, left alone, burns them.
///
/// `Idle → Frying` when a chef sets down something with a frying recipe,
/// `Frying → Fried` and `Fried → Burned` when the active recipe's duration elapses,
/// and back to `Idle` whenever the object leaves the stove. The frying recipe is
/// only set while `Frying`, the burning recipe only while `Fried`, and the timer
/// restarts from zero on every transition.
#[derive(Clone, Debug, Default, PartialEq, Reflect)]
pub struct StoveCounter {
    state: StoveState,
    timer: f32,
    frying_recipe: Option<CookingRecipe>,
    burning_recipe: Option<CookingRecipe>,
}

impl StoveCounter {
    pub fn state(&self) -> StoveState {
        self.state
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn is_fried(&self) -> bool {
        self.state == StoveState::Fried
    }

    /// Progress of the current timed step in `[0, 1]`. Zero when nothing is timed,
    /// including a fried item that has no burning recipe.
    pub fn progress(&self) -> f32 {
        match self.state {
            StoveState::Frying => self
                .frying_recipe
                .as_ref()
                .map_or(0., |recipe| recipe.progress(self.timer)),
            StoveState::Fried => self
                .burning_recipe
                .as_ref()
                .map_or(0., |recipe| recipe.progress(self.timer)),
            StoveState::Idle | StoveState::Burned => 0.,
        }
    }

    pub(super) fn advance(
        &mut self,
        counter: Entity,
        delta: f32,
        kitchen: &mut KitchenContext,
    ) -> Result<(), OwnershipError> {
        let Some(mut on_stove) = kitchen.objects.held_by(Holder::Counter(counter)) else {
            return Ok(());
        };

        let mut remaining = delta;
        loop {
            let recipe = match self.state {
                StoveState::Idle | StoveState::Burned => return Ok(()),
                StoveState::Frying => self.frying_recipe.clone(),
                StoveState::Fried => self.burning_recipe.clone(),
            };

            self.timer += remaining;
            let Some(recipe) = recipe.filter(|recipe| self.timer >= recipe.duration) else {
                self.notify(counter, kitchen);
                return Ok(());
            };

            // Time past the boundary carries into the next step.
            remaining = self.timer - recipe.duration;
            on_stove = self.cook(counter, on_stove, &recipe, kitchen)?;
            if remaining <= 0. {
                return Ok(());
            }
        }
    }

    /// Replaces the object on the stove with `recipe`'s output and moves on to the
    /// next state.
    fn cook(
        &mut self,
        counter: Entity,
        on_stove: KitchenObjectId,
        recipe: &CookingRecipe,
        kitchen: &mut KitchenContext,
    ) -> Result<KitchenObjectId, OwnershipError> {
        let span = debug_span!("Stove transition", ?counter, from = ?self.state);
        let _enter = span.enter();

        let Some(definition) = kitchen.items.get(&recipe.output) else {
            warn!(item = %recipe.output, "Recipe output missing from the catalog");
            self.reset();
            self.notify(counter, kitchen);
            return Ok(on_stove);
        };
        kitchen.objects.destroy(on_stove)?;
        let output = kitchen.objects.spawn(definition, Holder::Counter(counter))?;

        self.timer = 0.;
        match self.state {
            StoveState::Frying => {
                self.state = StoveState::Fried;
                self.frying_recipe = None;
                self.burning_recipe = kitchen.recipes.burning_recipe_for(&recipe.output).cloned();
                if self.burning_recipe.is_none() {
                    debug!(item = %recipe.output, "No burning recipe, stays fried");
                }
            }
            StoveState::Fried => {
                self.state = StoveState::Burned;
                self.burning_recipe = None;
            }
            StoveState::Idle | StoveState::Burned => {}
        }
        debug!(to = ?self.state, item = %recipe.output, "Stove changed state");
        self.notify(counter, kitchen);
        Ok(output)
    }

    pub(super) fn interact(
        &mut self,
        counter: Entity,
        chef: Entity,
        kitchen: &mut KitchenContext,
    ) -> Result<(), OwnershipError> {
        let counter_holder = Holder::Counter(counter);
        let chef_holder = Chef::holder(chef);

        match (
            kitchen.objects.held_by(counter_holder),
            kitchen.objects.held_by(chef_holder),
        ) {
            (None, None) => {}
            (None, Some(in_hands)) => {
                let Some(recipe) = kitchen
                    .objects
                    .item(in_hands)
                    .and_then(|item| kitchen.recipes.frying_recipe_for(item))
                    .cloned()
                else {
                    debug!("Nothing to fry");
                    return Ok(());
                };
                kitchen.objects.reparent(in_hands, counter_holder)?;
                debug!(item = %recipe.input, "Started frying");
                self.state = StoveState::Frying;
                self.timer = 0.;
                self.frying_recipe = Some(recipe);
                self.burning_recipe = None;
                self.notify(counter, kitchen);
            }
            (Some(on_stove), Some(in_hands)) => {
                if plate_ingredient(in_hands, on_stove, kitchen)? {
                    self.reset();
                    self.notify(counter, kitchen);
                }
            }
            (Some(on_stove), None) => {
                kitchen.objects.reparent(on_stove, chef_holder)?;
                self.reset();
                self.notify(counter, kitchen);
            }
        }
        Ok(())
    }

    pub(super) fn reset(&mut self) {
        *self = Self::default();
    }

    fn notify(&self, counter: Entity, kitchen: &mut KitchenContext) {
        kitchen.emit(KitchenEvent::StoveStateChanged {
            counter,
            state: self.state,
        });
        kitchen.emit(KitchenEvent::StoveProgressChanged {
            counter,
            progress: self.progress(),
        });
    }

    /// The item the stove would produce next, if anything is cooking.
    pub fn pending_output(&self) -> Option<&Item> {
        self.frying_recipe
            .as_ref()
            .or(self.burning_recipe.as_ref())
            .map(|recipe| &recipe.output)
    }
}
