use std::{
    borrow::Cow,
    ops::{Deref, DerefMut},
};

use bevy::{
    app::{App, Plugin},
    core::Name,
    ecs::system::Resource,
    reflect::Reflect,
    utils::HashMap,
};
use serde::Deserialize;

pub struct ItemPlugin;

impl Plugin for ItemPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Item>().init_resource::<Items>();
    }
}

/// Identity of a kind of kitchen object: "Tomato", "Meat patty cooked", "Plate".
/// Many kitchen objects share one item, and items never change at runtime.
#[derive(Hash, Eq, PartialEq, Debug, Clone, Reflect, Deserialize)]
#[serde(from = "String")]
pub struct Item(Name);

impl Item {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(Name::new(name))
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Item {
    fn from(name: String) -> Self {
        Self(Name::new(name))
    }
}

impl From<&'static str> for Item {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl AsRef<str> for Item {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// The allow-list a plate checks ingredients against.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PlateDefinition {
    pub valid_ingredients: Vec<Item>,
}

/// Catalog entry for an item. Loaded once per session and treated as read-only.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ItemDefinition {
    pub item: Item,
    #[serde(default)]
    pub sprite: String,
    /// Present when objects of this item are plates.
    #[serde(default)]
    pub plate: Option<PlateDefinition>,
}

impl ItemDefinition {
    pub fn new(item: impl Into<Item>) -> Self {
        Self {
            item: item.into(),
            sprite: String::new(),
            plate: None,
        }
    }

    pub fn plate(item: impl Into<Item>, valid_ingredients: Vec<Item>) -> Self {
        Self {
            plate: Some(PlateDefinition { valid_ingredients }),
            ..Self::new(item)
        }
    }

    pub fn is_plate(&self) -> bool {
        self.plate.is_some()
    }
}

#[derive(Resource, Default, Debug)]
pub struct Items(HashMap<Item, ItemDefinition>);

impl Items {
    pub fn from_definitions(definitions: impl IntoIterator<Item = ItemDefinition>) -> Self {
        Self(
            definitions
                .into_iter()
                .map(|definition| (definition.item.clone(), definition))
                .collect(),
        )
    }
}

impl Deref for Items {
    type Target = HashMap<Item, ItemDefinition>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Items {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
