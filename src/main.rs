use std::time::Duration;

use bevy::{
    app::{App, PluginGroup, ScheduleRunnerPlugin},
    asset::AssetPlugin,
    log::LogPlugin,
    MinimalPlugins,
};
use catalog_loader::CatalogLoaderPlugin;
use kitchen_core::{session::SessionSettings, types::AppState, KitchenCorePlugins};
use layout_loader::LayoutLoaderPlugin;
use loading::LoadingPlugin;
use presentation::PresentationPlugin;
use scene_setup::SceneSetupPlugin;
use shift::ShiftPlugin;

mod catalog_loader;
mod layout_loader;
mod loading;
mod presentation;
mod scene_setup;
mod shift;

fn main() {
    App::new()
        .add_plugins((
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1. / 60.,
            ))),
            LogPlugin::default(),
            AssetPlugin::default(),
        ))
        .add_state::<AppState>()
        .insert_resource(SessionSettings { shift_length: 35. })
        .add_plugins(KitchenCorePlugins)
        .add_plugins((CatalogLoaderPlugin, LayoutLoaderPlugin, LoadingPlugin))
        .add_plugins((SceneSetupPlugin, ShiftPlugin, PresentationPlugin))
        .run();
}
