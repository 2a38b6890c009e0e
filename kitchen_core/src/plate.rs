use bevy::reflect::Reflect;

use crate::item::{Item, PlateDefinition};

/// The ingredients assembled on a plate. Holds at most one of each item, and only
/// items from the plate's allow-list.
#[derive(Clone, Debug, Default, PartialEq, Reflect)]
pub struct Plate {
    valid_ingredients: Vec<Item>,
    ingredients: Vec<Item>,
}

impl Plate {
    pub fn new(valid_ingredients: Vec<Item>) -> Self {
        Self {
            valid_ingredients,
            ingredients: Vec::new(),
        }
    }

    /// Adds `ingredient` to the plate. Returns false and leaves the plate untouched
    /// when the ingredient isn't allowed or is already on it.
    pub fn try_add_ingredient(&mut self, ingredient: &Item) -> bool {
        if !self.accepts(ingredient) {
            return false;
        }
        self.ingredients.push(ingredient.clone());
        true
    }

    pub fn accepts(&self, ingredient: &Item) -> bool {
        self.valid_ingredients.contains(ingredient) && !self.ingredients.contains(ingredient)
    }

    pub fn contains(&self, ingredient: &Item) -> bool {
        self.ingredients.contains(ingredient)
    }

    pub fn ingredients(&self) -> &[Item] {
        &self.ingredients
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }
}

impl From<&PlateDefinition> for Plate {
    fn from(definition: &PlateDefinition) -> Self {
        Self::new(definition.valid_ingredients.clone())
    }
}
