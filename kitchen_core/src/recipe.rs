use bevy::{
    app::{App, Plugin},
    ecs::system::Resource,
    reflect::Reflect,
};
use serde::Deserialize;

use crate::item::Item;

pub struct RecipePlugin;

impl Plugin for RecipePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<CookingRecipe>()
            .init_resource::<CookingRecipes>();
    }
}

/// Turns one `input` into one `output` after `duration` seconds on the stove.
#[derive(Clone, Debug, PartialEq, Deserialize, Reflect)]
pub struct CookingRecipe {
    pub input: Item,
    pub output: Item,
    pub duration: f32,
}

impl CookingRecipe {
    pub fn new(input: impl Into<Item>, output: impl Into<Item>, duration: f32) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            duration,
        }
    }

    /// Fraction of this recipe completed after `elapsed` seconds, in `[0, 1]`.
    pub fn progress(&self, elapsed: f32) -> f32 {
        if self.duration > 0. {
            (elapsed / self.duration).clamp(0., 1.)
        } else {
            1.
        }
    }
}

/// The stove's recipe tables. Both are small, so lookups are a linear scan.
#[derive(Resource, Clone, Debug, Default)]
pub struct CookingRecipes {
    pub frying: Vec<CookingRecipe>,
    pub burning: Vec<CookingRecipe>,
}

impl CookingRecipes {
    pub fn new(frying: Vec<CookingRecipe>, burning: Vec<CookingRecipe>) -> Self {
        Self { frying, burning }
    }

    pub fn frying_recipe_for(&self, input: &Item) -> Option<&CookingRecipe> {
        self.frying.iter().find(|recipe| &recipe.input == input)
    }

    pub fn burning_recipe_for(&self, input: &Item) -> Option<&CookingRecipe> {
        self.burning.iter().find(|recipe| &recipe.input == input)
    }
}
