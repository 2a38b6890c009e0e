use bevy::app::{PluginGroup, PluginGroupBuilder};

pub mod chef;
pub mod counter;
pub mod event;
pub mod item;
pub mod kitchen_object;
pub mod layout;
pub mod plate;
pub mod recipe;
pub mod session;
pub mod types;

pub struct KitchenCorePlugins;

impl PluginGroup for KitchenCorePlugins {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::start::<Self>()
            .add(item::ItemPlugin)
            .add(recipe::RecipePlugin)
            .add(kitchen_object::KitchenObjectPlugin)
            .add(chef::ChefPlugin)
            .add(counter::CounterPlugin)
            .add(session::SessionPlugin)
    }
}
